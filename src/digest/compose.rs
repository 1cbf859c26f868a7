// Digest composition: one HTML document for the whole run.
//
// The output depends only on the candidate list and the summarize flag, so
// the dated draft on disk can be regenerated byte for byte from a backlog.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::store::models::PaperCandidate;
use crate::store::write_atomic;

/// Render the digest for `papers` in the order given.
pub fn compose(papers: &[PaperCandidate], summarized: bool) -> String {
    let heading = if summarized {
        "Summarized Abstract"
    } else {
        "Abstract"
    };

    let mut body = String::new();
    for paper in papers {
        body.push_str(&format!(
            "<b>{}</b><br/>{}<br/><br/><b>{}:</b><br/>{}<br/>",
            escape_html(&paper.title),
            escape_html(&paper.authors.join(", ")),
            heading,
            escape_html(&paper.abstract_text),
        ));

        let link = escape_html(&paper.link);
        body.push_str(&format!("<a href=\"{link}\">{link}</a><br/><br/>"));

        if !paper.author_match_reasons.is_empty() {
            body.push_str("<b>Author matches:</b><br/>");
            body.push_str(&escape_html(&paper.author_match_reasons.join(", ")));
            body.push_str("<br/>");
        }

        if !paper.keyword_matches.is_empty() {
            body.push_str("<b>Keyword matches:</b><br/>");
            for group in &paper.keyword_matches {
                body.push_str(&format!("<i>{}</i><br/>", escape_html(&group.group)));
                for hit in &group.hits {
                    body.push_str(&format!(
                        "Count={}; {}<br/>",
                        hit.count,
                        escape_html(&hit.explanation)
                    ));
                }
            }
        }

        body.push_str("<br/>\n");
    }
    body
}

/// `<history>/<YYYY-MM-DD>.html`
pub fn digest_path(history_dir: &Path, date: NaiveDate) -> PathBuf {
    history_dir.join(format!("{}.html", date.format("%Y-%m-%d")))
}

/// Write the day's digest draft, replacing any earlier draft for that date.
pub fn write_digest(history_dir: &Path, date: NaiveDate, html: &str) -> Result<PathBuf> {
    let path = digest_path(history_dir, date);
    write_atomic(&path, html.as_bytes())
        .with_context(|| format!("Failed to write digest {}", path.display()))?;
    Ok(path)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
