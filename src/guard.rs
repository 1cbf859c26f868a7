// Once-per-day run guard.
//
// The day's log file under history/ doubles as the marker: it is created
// with create_new, so the first run of a date wins and any later run that
// day (including a concurrent one) sees it already exists. Forced runs
// append to the existing log instead.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Result of trying to claim today's run.
#[derive(Debug)]
pub enum GuardStatus {
    /// This process owns today's run.
    Acquired(RunGuard),
    /// Today's marker already exists.
    AlreadyRan(PathBuf),
}

/// Today's claimed marker, open for appending log lines.
#[derive(Debug)]
pub struct RunGuard {
    path: PathBuf,
    file: File,
}

/// `<history>/<YYYY-MM-DD>.log`
pub fn marker_path(history_dir: &Path, date: NaiveDate) -> PathBuf {
    history_dir.join(format!("{}.log", date.format("%Y-%m-%d")))
}

impl RunGuard {
    /// Claim the run for `date`, unless a marker for it already exists.
    pub fn acquire(history_dir: &Path, date: NaiveDate) -> Result<GuardStatus> {
        std::fs::create_dir_all(history_dir)
            .with_context(|| format!("Failed to create {}", history_dir.display()))?;

        let path = marker_path(history_dir, date);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => Ok(GuardStatus::Acquired(RunGuard { path, file })),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(GuardStatus::AlreadyRan(path)),
            Err(e) => Err(e).with_context(|| format!("Failed to create {}", path.display())),
        }
    }

    /// Claim the run for `date` even if it already ran.
    pub fn force(history_dir: &Path, date: NaiveDate) -> Result<RunGuard> {
        std::fs::create_dir_all(history_dir)
            .with_context(|| format!("Failed to create {}", history_dir.display()))?;

        let path = marker_path(history_dir, date);
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        Ok(RunGuard { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Hand the marker file over to the log writer.
    pub fn into_file(self) -> File {
        self.file
    }
}
