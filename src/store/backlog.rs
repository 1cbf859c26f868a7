// Backlog store: papers carried across runs until a digest goes out.
//
// The backlog is a JSON array of candidates read and written wholesale.
// Saving always merges with whatever is already on disk, so a save never
// drops papers a previous run stored. A missing or unreadable file is an
// empty backlog: losing a day's carry-over is better than failing the run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::models::PaperCandidate;
use super::write_atomic;

/// Default backlog file name inside the state directory.
pub const BACKLOG_FILE: &str = "saved_papers.json";

/// Result of merging today's candidates with the backlog.
#[derive(Debug, Clone, Default)]
pub struct Merged {
    /// Sorted by importance (descending), unique by link.
    pub papers: Vec<PaperCandidate>,
    pub duplicates_removed: usize,
}

/// Concatenate `first` then `rest`, sort by importance descending, and keep
/// the first candidate seen for each link.
///
/// The sort is stable: equal-importance papers keep their concatenation
/// order, so re-running on the same inputs yields the same list.
pub fn merge(first: Vec<PaperCandidate>, rest: Vec<PaperCandidate>) -> Merged {
    let mut all = first;
    all.extend(rest);
    all.sort_by(|a, b| b.importance.total_cmp(&a.importance));

    let before = all.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(before);
    all.retain(|paper| seen.insert(paper.link.clone()));

    Merged {
        duplicates_removed: before - all.len(),
        papers: all,
    }
}

/// File-backed backlog of undelivered candidates.
#[derive(Debug, Clone)]
pub struct BacklogStore {
    path: PathBuf,
}

impl BacklogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backlog at `<dir>/saved_papers.json`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(BACKLOG_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted backlog. Never fails: missing or corrupt files
    /// load as empty.
    pub fn load(&self) -> Vec<PaperCandidate> {
        if !self.path.exists() {
            return Vec::new();
        }

        let parsed = std::fs::read_to_string(&self.path)
            .context("Failed to read backlog")
            .and_then(|json| {
                serde_json::from_str::<Vec<PaperCandidate>>(&json)
                    .context("Failed to parse backlog")
            });

        match parsed {
            Ok(papers) => {
                debug!(count = papers.len(), path = %self.path.display(), "Loaded backlog");
                papers
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %format!("{e:#}"),
                    "Backlog unreadable, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Merge `papers` with the stored backlog and overwrite the file.
    ///
    /// Returns the number of papers now stored.
    pub fn save(&self, papers: Vec<PaperCandidate>) -> Result<usize> {
        let merged = merge(papers, self.load());
        let json = serde_json::to_string_pretty(&merged.papers)?;
        write_atomic(&self.path, json.as_bytes())
            .with_context(|| format!("Failed to save backlog to {}", self.path.display()))?;

        info!(
            stored = merged.papers.len(),
            duplicates_removed = merged.duplicates_removed,
            "Saved backlog"
        );
        Ok(merged.papers.len())
    }

    /// Delete the backlog file. A missing file is fine.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "Cleared backlog");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove backlog {}", self.path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(link: &str, importance: f64) -> PaperCandidate {
        PaperCandidate {
            importance,
            title: format!("Paper {link}"),
            abstract_text: String::new(),
            authors: vec![],
            link: link.to_string(),
            keyword_matches: vec![],
            author_match_reasons: vec![],
        }
    }

    #[test]
    fn test_merge_sorts_descending() {
        let merged = merge(vec![paper("a", 1.0), paper("b", 3.0)], vec![paper("c", 2.0)]);
        let links: Vec<&str> = merged.papers.iter().map(|p| p.link.as_str()).collect();
        assert_eq!(links, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_merge_keeps_higher_importance_duplicate() {
        let merged = merge(vec![paper("a", 1.0)], vec![paper("a", 2.0)]);
        assert_eq!(merged.papers.len(), 1);
        assert_eq!(merged.papers[0].importance, 2.0);
        assert_eq!(merged.duplicates_removed, 1);
    }

    #[test]
    fn test_merge_ties_keep_input_order() {
        let merged = merge(vec![paper("today", 1.0)], vec![paper("old", 1.0)]);
        assert_eq!(merged.papers[0].link, "today");
        assert_eq!(merged.papers[1].link, "old");
    }
}
