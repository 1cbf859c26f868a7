// Data models: the records that flow from the matchers into the backlog
// and the digest.
//
// These are serialized as named JSON objects in the backlog file, so adding
// a field needs a serde default to keep older backlogs readable.

use serde::{Deserialize, Serialize};

/// One matched keyword inside a group: how often it occurred and why it matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordHit {
    pub count: usize,
    /// `Key: <keyword>` for literal hits, or the fuzzy explanation with the
    /// matched text and (substitutions, insertions, deletions).
    pub explanation: String,
}

/// All hits for one keyword group. Only groups with at least one hit exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMatch {
    pub group: String,
    pub hits: Vec<KeywordHit>,
}

/// A paper that passed the importance policy and is waiting to be delivered.
///
/// `link` is the identity key: the backlog never holds two candidates with
/// the same link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperCandidate {
    pub importance: f64,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub authors: Vec<String>,
    pub link: String,
    #[serde(default)]
    pub keyword_matches: Vec<GroupMatch>,
    #[serde(default)]
    pub author_match_reasons: Vec<String>,
}

impl PaperCandidate {
    /// Identifiers of the keyword groups that matched, in match order.
    pub fn matched_groups(&self) -> Vec<&str> {
        self.keyword_matches.iter().map(|m| m.group.as_str()).collect()
    }
}
