// Daily collection: fetch each subject feed and keep the papers worth reading.
//
// For every entry: normalize the title, abstract and author list, match the
// keyword groups against "title abstract", match the watched authors, and
// ask the importance policy for a score. Entries scoring zero are dropped.
// A subject whose feed cannot be fetched is logged and skipped; the other
// subjects still run.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::feed::traits::{FeedEntry, FeedSource};
use crate::matching::{AuthorMatcher, KeywordMatcher};
use crate::scoring::traits::{score_paper, ImportancePolicy, PaperStats};
use crate::store::models::PaperCandidate;
use crate::summarize::traits::Summarizer;
use crate::text::normalize::{collapse_whitespace, extract_abstract, split_authors};

/// What one collection pass produced.
#[derive(Debug, Default)]
pub struct CollectReport {
    /// Kept papers, highest importance first.
    pub candidates: Vec<PaperCandidate>,
    /// Feed entries examined across all subjects.
    pub total_entries: usize,
    /// Subjects whose feed could not be fetched or parsed.
    pub failed_subjects: Vec<String>,
}

pub struct Collector<'a> {
    feed: &'a dyn FeedSource,
    keywords: &'a KeywordMatcher,
    authors: &'a AuthorMatcher,
    policy: &'a dyn ImportancePolicy,
    summarizer: Option<(&'a dyn Summarizer, usize)>,
}

impl<'a> Collector<'a> {
    pub fn new(
        feed: &'a dyn FeedSource,
        keywords: &'a KeywordMatcher,
        authors: &'a AuthorMatcher,
        policy: &'a dyn ImportancePolicy,
    ) -> Self {
        Self {
            feed,
            keywords,
            authors,
            policy,
            summarizer: None,
        }
    }

    /// Replace kept abstracts with an extractive summary of `sentences` sentences.
    pub fn with_summarizer(mut self, summarizer: &'a dyn Summarizer, sentences: usize) -> Self {
        self.summarizer = Some((summarizer, sentences));
        self
    }

    /// Score a single feed entry. Returns None when the paper is not interesting.
    pub fn evaluate(&self, entry: &FeedEntry, subject: &str) -> Option<PaperCandidate> {
        let title = collapse_whitespace(&entry.title);
        let abstract_text = extract_abstract(&entry.summary);
        let authors = split_authors(&entry.authors);

        let keyword_matches = self.keywords.scan(&format!("{title} {abstract_text}"));
        let author_hits = self.authors.check(&authors);

        let groups: Vec<&str> = keyword_matches.iter().map(|m| m.group.as_str()).collect();
        let stats = PaperStats {
            author_count: authors.len(),
            subject,
        };
        let importance = score_paper(self.policy, &groups, &author_hits.names, &stats);
        if importance <= 0.0 {
            return None;
        }

        debug!(title = %title, importance, "Keeping paper");

        let abstract_text = match self.summarizer {
            Some((summarizer, sentences)) => summarizer.summarize(&abstract_text, sentences),
            None => abstract_text,
        };

        Some(PaperCandidate {
            importance,
            title,
            abstract_text,
            authors,
            link: entry.link.clone(),
            keyword_matches,
            author_match_reasons: author_hits.reasons,
        })
    }

    /// Fetch and evaluate every subject in order.
    pub async fn collect(&self, subjects: &[String]) -> CollectReport {
        let mut report = CollectReport::default();

        let pb = ProgressBar::new(subjects.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar().template("  Feeds [{bar:30}] {pos}/{len} {msg}") {
            pb.set_style(style);
        }

        for subject in subjects {
            pb.set_message(subject.clone());
            match self.feed.fetch(subject).await {
                Ok(entries) => {
                    info!(subject = %subject, entries = entries.len(), "Fetched feed");
                    report.total_entries += entries.len();
                    report
                        .candidates
                        .extend(entries.iter().filter_map(|e| self.evaluate(e, subject)));
                }
                Err(e) => {
                    warn!(subject = %subject, error = %format!("{e:#}"), "Feed unavailable, skipping subject");
                    report.failed_subjects.push(subject.clone());
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        report
            .candidates
            .sort_by(|a, b| b.importance.total_cmp(&a.importance));

        info!(
            found = report.candidates.len(),
            total = report.total_entries,
            "Found {} interesting papers out of {}",
            report.candidates.len(),
            report.total_entries
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::KeywordGroup;
    use crate::scoring::importance::KeywordAuthorPolicy;

    struct NoFeed;

    #[async_trait::async_trait]
    impl FeedSource for NoFeed {
        async fn fetch(&self, _subject: &str) -> anyhow::Result<Vec<FeedEntry>> {
            Ok(Vec::new())
        }
    }

    fn groups() -> Vec<KeywordGroup> {
        vec![
            KeywordGroup {
                id: "ML".to_string(),
                keywords: vec!["machine learning".to_string()],
            },
            KeywordGroup {
                id: "NN".to_string(),
                keywords: vec!["neural-network".to_string()],
            },
        ]
    }

    fn entry(title: &str, summary: &str, authors: &str) -> FeedEntry {
        FeedEntry {
            title: title.to_string(),
            summary: summary.to_string(),
            authors: authors.to_string(),
            link: "https://arxiv.org/abs/2401.00001".to_string(),
        }
    }

    #[test]
    fn test_evaluate_keeps_two_group_paper() {
        let keywords = KeywordMatcher::new(&groups()).unwrap();
        let authors = AuthorMatcher::new(Vec::new());
        let policy = KeywordAuthorPolicy::new("ML");
        let collector = Collector::new(&NoFeed, &keywords, &authors, &policy);

        let paper = collector
            .evaluate(
                &entry(
                    "Machine Learning for nuclei",
                    "Abstract: We train a neural-network.",
                    "A. Person",
                ),
                "nucl-th",
            )
            .unwrap();

        assert_eq!(paper.importance, 1.0);
        assert_eq!(paper.matched_groups(), vec!["ML", "NN"]);
        assert_eq!(paper.abstract_text, "We train a neural-network.");
    }

    #[test]
    fn test_evaluate_drops_single_group_paper() {
        let keywords = KeywordMatcher::new(&groups()).unwrap();
        let authors = AuthorMatcher::new(Vec::new());
        let policy = KeywordAuthorPolicy::new("ML");
        let collector = Collector::new(&NoFeed, &keywords, &authors, &policy);

        let kept = collector.evaluate(
            &entry("Machine learning for nuclei", "Abstract: Nothing else.", "A. Person"),
            "nucl-th",
        );
        assert!(kept.is_none());
    }

    #[test]
    fn test_evaluate_keeps_watched_author() {
        let keywords = KeywordMatcher::new(&groups()).unwrap();
        let authors = AuthorMatcher::new(vec!["First Last".to_string()]);
        let policy = KeywordAuthorPolicy::new("ML");
        let collector = Collector::new(&NoFeed, &keywords, &authors, &policy);

        let paper = collector
            .evaluate(
                &entry("Pairing gaps", "Abstract: Nothing to see.", "F. Last, B. Other"),
                "nucl-th",
            )
            .unwrap();
        assert_eq!(paper.author_match_reasons, vec!["Abbreviated match First Last"]);
        assert!(paper.keyword_matches.is_empty());
    }
}
