// System status display: backlog size, recent runs, mail setup.

use std::path::Path;

use anyhow::Result;

use crate::config::{Config, MailBackend};
use crate::store::backlog::BacklogStore;

/// Most recent history entries shown by `status`.
const RECENT_RUNS: usize = 5;

/// Display system status to the terminal.
pub fn show(config: &Config) -> Result<()> {
    println!("State directory: {}", config.home.display());

    match config.load_watchlist() {
        Ok(watchlist) => println!(
            "Watchlist: {} subjects, {} keyword groups, {} authors",
            watchlist.subjects.len(),
            watchlist.keyword_groups.len(),
            watchlist.authors.len()
        ),
        Err(e) => println!("Watchlist: {e}"),
    }

    let store = BacklogStore::new(config.backlog_path());
    let backlog = store.load();
    if backlog.is_empty() {
        println!("Backlog: empty");
    } else {
        println!("Backlog: {} papers waiting for the next send day", backlog.len());
    }

    let runs = recent_runs(&config.history_dir(), RECENT_RUNS)?;
    if runs.is_empty() {
        println!("Recent runs: none yet");
        println!("  Run `paperwatch run` to collect today's papers");
    } else {
        println!("Recent runs: {}", runs.join(", "));
    }

    if config.send_email {
        let backend = match config.mail_backend {
            MailBackend::Gmail => format!("gmail ({})", config.token_path.display()),
            MailBackend::Smtp => format!("smtp ({}:{})", config.smtp.host, config.smtp.port),
        };
        println!("Email: to {} via {}", config.to_email, backend);
    } else {
        println!("Email: disabled (digests are written to history/ only)");
    }

    Ok(())
}

/// Dates of the latest runs, newest first, from the `<date>.log` markers.
pub fn recent_runs(history_dir: &Path, limit: usize) -> Result<Vec<String>> {
    if !history_dir.exists() {
        return Ok(Vec::new());
    }

    let mut dates: Vec<String> = std::fs::read_dir(history_dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            name.strip_suffix(".log").map(str::to_string)
        })
        .collect();
    dates.sort_unstable_by(|a, b| b.cmp(a));
    dates.truncate(limit);
    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_runs_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["2024-05-01.log", "2024-05-03.log", "2024-05-02.log", "2024-05-03.html"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        let runs = recent_runs(dir.path(), 2).unwrap();
        assert_eq!(runs, vec!["2024-05-03", "2024-05-02"]);
    }

    #[test]
    fn test_recent_runs_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(recent_runs(&dir.path().join("nope"), 5).unwrap().is_empty());
    }
}
