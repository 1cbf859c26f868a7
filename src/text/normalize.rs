// Markup stripping and arXiv summary cleanup.
//
// arXiv RSS descriptions arrive as a small HTML fragment: a header line with
// the identifier and announce type, then the abstract, sometimes wrapped in
// <p> tags. Author strings may carry anchor tags around each name.

use std::sync::LazyLock;

use regex_lite::Regex;

/// Any `<...>` tag on a single line, shortest match.
static MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>\n]*>").expect("markup pattern is valid"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// First line of an arXiv RSS summary, e.g. `arXiv:2401.00001v2 Announce Type: replace`.
static ARXIV_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*arXiv:\S+\s+Announce Type:").expect("arXiv header pattern is valid")
});

const ABSTRACT_PREFIX: &str = "Abstract: ";

/// Remove every tag-delimited substring and trim surrounding whitespace.
///
/// Idempotent: the output contains no complete tags, so a second pass
/// changes nothing.
pub fn strip_markup(raw: &str) -> String {
    MARKUP.replace_all(raw, "").trim().to_string()
}

/// Replace runs of whitespace (including newlines) with a single space.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Split a feed author field into individual, cleaned names.
///
/// Feeds join names with `, ` or with newlines depending on the format.
pub fn split_authors(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(strip_markup)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Pull the abstract out of an arXiv RSS summary block.
///
/// When the first line is the `arXiv:<id> Announce Type:` header it is
/// dropped and the remaining lines are joined with spaces. Paragraph tags
/// become spaces before the rest of the markup is stripped.
pub fn extract_abstract(summary: &str) -> String {
    let mut lines = summary.lines();
    let body = match lines.clone().next() {
        Some(first) if ARXIV_HEADER.is_match(first) => {
            lines.next();
            lines.collect::<Vec<_>>().join(" ")
        }
        _ => summary.to_string(),
    };

    let body = body.trim_start();
    let body = body.strip_prefix(ABSTRACT_PREFIX).unwrap_or(body);
    let body = body.replace("<p>", " ").replace("</p>", " ");

    collapse_whitespace(&strip_markup(&body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup_removes_tags() {
        assert_eq!(
            strip_markup("  <a href=\"https://arxiv.org/a/last_f_1\">First Last</a> "),
            "First Last"
        );
    }

    #[test]
    fn test_strip_markup_is_idempotent() {
        let once = strip_markup("<p>Quantum <i>many-body</i> systems</p>\n");
        assert_eq!(strip_markup(&once), once);
    }

    #[test]
    fn test_strip_markup_keeps_bare_angle_brackets() {
        assert_eq!(strip_markup("energies E < 5 MeV"), "energies E < 5 MeV");
    }

    #[test]
    fn test_split_authors_commas_and_newlines() {
        let authors = split_authors("First Last, A. Person\nNot Real, ");
        assert_eq!(authors, vec!["First Last", "A. Person", "Not Real"]);
    }

    #[test]
    fn test_extract_abstract_drops_header() {
        let summary = "arXiv:2401.00001v1 Announce Type: new \nAbstract: We study\nneutron stars.";
        assert_eq!(extract_abstract(summary), "We study neutron stars.");
    }

    #[test]
    fn test_extract_abstract_without_header() {
        assert_eq!(
            extract_abstract("<p>Dense nuclear matter\nat finite temperature.</p>"),
            "Dense nuclear matter at finite temperature."
        );
    }
}
