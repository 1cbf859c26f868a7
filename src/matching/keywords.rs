// Keyword-group matching over a paper's title and abstract.
//
// Each keyword is first looked up literally in the lower-cased text. Only
// when that fails is the approximate pattern tried. A group shows up in the
// result only if at least one of its keywords matched.

use serde::Deserialize;

use super::fuzzy::FuzzyPattern;
use crate::config::ConfigError;
use crate::store::models::{GroupMatch, KeywordHit};

/// A named set of related keywords. Matching any member marks the group as found.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeywordGroup {
    pub id: String,
    pub keywords: Vec<String>,
}

struct CompiledKeyword {
    literal: String,
    pattern: FuzzyPattern,
}

struct CompiledGroup {
    id: String,
    keywords: Vec<CompiledKeyword>,
}

/// Matches text against an ordered list of keyword groups.
///
/// Patterns are compiled once at construction, so a malformed keyword is
/// reported at startup rather than on the first paper.
pub struct KeywordMatcher {
    groups: Vec<CompiledGroup>,
}

impl KeywordMatcher {
    pub fn new(groups: &[KeywordGroup]) -> Result<Self, ConfigError> {
        let mut compiled = Vec::with_capacity(groups.len());

        for (position, group) in groups.iter().enumerate() {
            if group.id.trim().is_empty() {
                return Err(ConfigError::EmptyGroupId(position));
            }

            let mut keywords = Vec::with_capacity(group.keywords.len());
            for keyword in &group.keywords {
                let pattern =
                    FuzzyPattern::new(keyword).ok_or_else(|| ConfigError::EmptyKeyword {
                        group: group.id.clone(),
                    })?;
                keywords.push(CompiledKeyword {
                    literal: keyword.clone(),
                    pattern,
                });
            }

            compiled.push(CompiledGroup {
                id: group.id.clone(),
                keywords,
            });
        }

        Ok(Self { groups: compiled })
    }

    /// Number of configured groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Scan `text` and return one entry per group with at least one hit,
    /// in configuration order.
    pub fn scan(&self, text: &str) -> Vec<GroupMatch> {
        let text = text.to_lowercase();

        self.groups
            .iter()
            .filter_map(|group| {
                let hits: Vec<KeywordHit> = group
                    .keywords
                    .iter()
                    .filter_map(|keyword| match_keyword(keyword, &text))
                    .collect();

                if hits.is_empty() {
                    None
                } else {
                    Some(GroupMatch {
                        group: group.id.clone(),
                        hits,
                    })
                }
            })
            .collect()
    }
}

fn match_keyword(keyword: &CompiledKeyword, text: &str) -> Option<KeywordHit> {
    if text.contains(keyword.literal.as_str()) {
        return Some(KeywordHit {
            count: text.matches(keyword.literal.as_str()).count(),
            explanation: format!("Key: {}", keyword.literal),
        });
    }

    let first = keyword.pattern.find(text)?;
    Some(KeywordHit {
        count: keyword.pattern.count(text),
        explanation: format!(
            "Key: {} -> {}: fuzzy type: {}",
            keyword.literal, first.text, first.counts
        ),
    })
}
