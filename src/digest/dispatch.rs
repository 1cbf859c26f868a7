// Digest dispatch: decide whether today's papers go out or wait.
//
// Every run ends in exactly one RunOutcome. Papers are never dropped on the
// way: anything not confirmed as delivered is written back to the backlog.
// The dated draft is written before any send attempt, so a failed send still
// leaves the digest on disk.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Datelike, NaiveDate, Weekday};
use tracing::{error, info, warn};

use super::compose::{compose, write_digest};
use crate::mail::traits::{MailSender, OutgoingMail};
use crate::store::backlog::{merge, BacklogStore};
use crate::store::models::PaperCandidate;

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Nothing new and nothing in the backlog.
    NothingToDo,
    /// Not a send day: papers stored in the backlog, draft written.
    HeldForLater { stored: usize, draft: PathBuf },
    /// Digest delivered and the backlog cleared.
    SentAndCleared {
        message_id: String,
        papers: usize,
        draft: PathBuf,
    },
    /// Send failed: papers kept in the backlog for the next run.
    SendFailed {
        error: String,
        retained: usize,
        draft: PathBuf,
    },
    /// Email disabled: draft written, papers kept in the backlog.
    DraftOnly { papers: usize, draft: PathBuf },
}

impl RunOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            RunOutcome::NothingToDo => "nothing-to-do",
            RunOutcome::HeldForLater { .. } => "held-for-later",
            RunOutcome::SentAndCleared { .. } => "sent-and-cleared",
            RunOutcome::SendFailed { .. } => "send-failed",
            RunOutcome::DraftOnly { .. } => "draft-only",
        }
    }
}

/// Where and how to email the digest.
pub struct Delivery<'a> {
    pub mailer: &'a dyn MailSender,
    pub from: String,
    pub to: String,
    pub subject: String,
}

pub struct Dispatcher<'a> {
    store: &'a BacklogStore,
    history_dir: PathBuf,
    send_days: Vec<Weekday>,
    summarized: bool,
    delivery: Option<Delivery<'a>>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        store: &'a BacklogStore,
        history_dir: impl Into<PathBuf>,
        send_days: Vec<Weekday>,
        summarized: bool,
    ) -> Self {
        Self {
            store,
            history_dir: history_dir.into(),
            send_days,
            summarized,
            delivery: None,
        }
    }

    /// Enable email delivery. Without it, send days only write the draft.
    pub fn with_delivery(mut self, delivery: Delivery<'a>) -> Self {
        self.delivery = Some(delivery);
        self
    }

    pub fn is_send_day(&self, date: NaiveDate) -> bool {
        self.send_days.contains(&date.weekday())
    }

    /// Merge `today` with the backlog and deliver or hold the result.
    pub async fn dispatch(&self, today: Vec<PaperCandidate>, date: NaiveDate) -> Result<RunOutcome> {
        let backlog = self.store.load();
        info!(today = today.len(), backlog = backlog.len(), "Merging with backlog");

        let merged = merge(today, backlog);
        info!(
            duplicates_removed = merged.duplicates_removed,
            "Removed duplicates"
        );
        let papers = merged.papers;

        if papers.is_empty() {
            info!("No papers to save or send");
            self.refresh_credentials().await;
            return Ok(RunOutcome::NothingToDo);
        }

        let html = compose(&papers, self.summarized);
        info!(papers = papers.len(), "Finished composing digest");

        if !self.is_send_day(date) {
            info!(weekday = %date.weekday(), "Not a send day, holding papers");
            let stored = self.store.save(papers)?;
            let draft = write_digest(&self.history_dir, date, &html)?;
            info!(path = %draft.display(), "Saved digest draft");
            self.refresh_credentials().await;
            return Ok(RunOutcome::HeldForLater { stored, draft });
        }

        let draft = match write_digest(&self.history_dir, date, &html) {
            Ok(path) => path,
            Err(e) => {
                self.store.save(papers)?;
                return Err(e);
            }
        };
        info!(path = %draft.display(), "Saved digest draft");

        let Some(delivery) = &self.delivery else {
            // Nothing was delivered, so the papers stay in the backlog
            let stored = self.store.save(papers)?;
            return Ok(RunOutcome::DraftOnly {
                papers: stored,
                draft,
            });
        };

        let mail = OutgoingMail {
            from: delivery.from.clone(),
            to: delivery.to.clone(),
            subject: delivery.subject.clone(),
            html_body: html.clone(),
            text_body: html,
        };

        match delivery.mailer.send(&mail).await {
            Ok(receipt) => {
                info!(id = %receipt.message_id, "Successfully sent digest");
                self.store.clear()?;
                Ok(RunOutcome::SentAndCleared {
                    message_id: receipt.message_id,
                    papers: papers.len(),
                    draft,
                })
            }
            Err(e) => {
                let detail = format!("{e:#}");
                error!(error = %detail, "Failed to send digest, keeping papers in backlog");
                let retained = self.store.save(papers)?;
                Ok(RunOutcome::SendFailed {
                    error: detail,
                    retained,
                    draft,
                })
            }
        }
    }

    /// Daily credential housekeeping. Failures are logged, never raised.
    async fn refresh_credentials(&self) {
        if let Some(delivery) = &self.delivery {
            if let Err(e) = delivery.mailer.refresh_credentials().await {
                warn!(error = %format!("{e:#}"), "Credential refresh failed");
            }
        }
    }
}
