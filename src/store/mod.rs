// Persistence: the backlog of undelivered papers and whole-file writes.
//
// Everything on disk is written through `write_atomic`: a temp file in the
// destination directory, synced, then renamed over the target. A crash mid
// write leaves the previous file intact.

pub mod backlog;
pub mod models;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

pub use backlog::{merge, BacklogStore, Merged};
pub use models::{GroupMatch, KeywordHit, PaperCandidate};

/// Replace the contents of `path` in one rename.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("Failed to move temp file over {}", path.display()))?;

    Ok(())
}
