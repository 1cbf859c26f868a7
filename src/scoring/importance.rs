// Default importance policy: keyword co-occurrence or a watched author.
//
// A paper is worth reading when the primary keyword group shows up together
// with at least one other group (the primary topic in a context we care
// about), or when a watched author is on a paper small enough that their
// name means something. Large collaboration papers list hundreds of authors,
// so author hits only count below a ceiling.

use serde::Deserialize;

use super::traits::{ImportancePolicy, PaperStats};

/// Author lists at or above this size don't count as an author hit.
pub const DEFAULT_AUTHOR_CEILING: usize = 10;

/// The built-in policy. Returns 1.0 for keepers and 0.0 otherwise.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeywordAuthorPolicy {
    /// Group identifier that must co-occur with another group.
    pub primary_group: String,
    /// Maximum author count (exclusive) for an author hit to count.
    #[serde(default = "default_author_ceiling")]
    pub author_ceiling: usize,
}

fn default_author_ceiling() -> usize {
    DEFAULT_AUTHOR_CEILING
}

impl KeywordAuthorPolicy {
    pub fn new(primary_group: impl Into<String>) -> Self {
        Self {
            primary_group: primary_group.into(),
            author_ceiling: DEFAULT_AUTHOR_CEILING,
        }
    }
}

impl ImportancePolicy for KeywordAuthorPolicy {
    fn score(&self, groups: &[&str], authors: &[String], stats: &PaperStats<'_>) -> f64 {
        let interesting_keywords =
            groups.contains(&self.primary_group.as_str()) && groups.len() > 1;
        let interesting_authors = !authors.is_empty() && stats.author_count < self.author_ceiling;

        if interesting_keywords || interesting_authors {
            1.0
        } else {
            0.0
        }
    }
}
