// Colored terminal output for candidate lists and run outcomes.
//
// main.rs prints through these so every subcommand reads the same way.

use colored::Colorize;

use super::truncate_chars;
use crate::digest::RunOutcome;
use crate::pipeline::CollectReport;
use crate::store::models::PaperCandidate;

const TITLE_WIDTH: usize = 72;

/// Display the papers found by a collection pass.
pub fn display_candidates(report: &CollectReport) {
    println!(
        "\n{}",
        format!(
            "=== {} interesting papers out of {} ===",
            report.candidates.len(),
            report.total_entries
        )
        .bold()
    );

    if !report.failed_subjects.is_empty() {
        println!(
            "  {} {}",
            "Skipped feeds:".yellow(),
            report.failed_subjects.join(", ")
        );
    }
    println!();

    for (i, paper) in report.candidates.iter().enumerate() {
        display_candidate(i + 1, paper);
    }
}

fn display_candidate(rank: usize, paper: &PaperCandidate) {
    println!(
        "  {:>3}. {} {}",
        rank,
        truncate_chars(&paper.title, TITLE_WIDTH).bold(),
        format!("[{:.1}]", paper.importance).dimmed()
    );
    println!("       {}", paper.link.dimmed());

    let groups = paper.matched_groups();
    if !groups.is_empty() {
        println!("       {} {}", "groups:".cyan(), groups.join(", "));
    }
    if !paper.author_match_reasons.is_empty() {
        println!(
            "       {} {}",
            "authors:".cyan(),
            paper.author_match_reasons.join(", ")
        );
    }
}

/// Print the final state of a `run`.
pub fn display_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::NothingToDo => {
            println!("{}", "No new papers and nothing in the backlog.".dimmed());
        }
        RunOutcome::HeldForLater { stored, draft } => {
            println!(
                "{} {} papers in the backlog until the next send day",
                "Held".yellow().bold(),
                stored
            );
            println!("  Draft: {}", draft.display());
        }
        RunOutcome::SentAndCleared {
            message_id,
            papers,
            draft,
        } => {
            println!(
                "{} digest with {} papers (message {})",
                "Sent".green().bold(),
                papers,
                message_id
            );
            println!("  Draft: {}", draft.display());
        }
        RunOutcome::SendFailed {
            error,
            retained,
            draft,
        } => {
            println!("{} {}", "Send failed:".red().bold(), error);
            println!("  {retained} papers kept in the backlog for the next run");
            println!("  Draft: {}", draft.display());
        }
        RunOutcome::DraftOnly { papers, draft } => {
            println!(
                "{} digest with {} papers (email disabled)",
                "Wrote".green().bold(),
                papers
            );
            println!("  {papers} papers stay in the backlog");
            println!("  Draft: {}", draft.display());
        }
    }
}
