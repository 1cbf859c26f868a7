use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs::File;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use paperwatch::config::{Config, MailBackend, Watchlist};
use paperwatch::digest::{Delivery, Dispatcher, RunOutcome};
use paperwatch::feed::arxiv::ArxivFeed;
use paperwatch::guard::{GuardStatus, RunGuard};
use paperwatch::mail::{GmailSender, MailSender, SmtpSender};
use paperwatch::matching::{AuthorMatcher, KeywordMatcher};
use paperwatch::output::terminal;
use paperwatch::pipeline::{CollectReport, Collector};
use paperwatch::store::BacklogStore;
use paperwatch::summarize::FrequencySummarizer;

/// Paperwatch: a daily arXiv digest.
///
/// Fetches the day's new papers for the watched subjects, keeps the ones
/// matching your keyword groups or authors, and emails them on send days.
#[derive(Parser)]
#[command(name = "paperwatch", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect today's papers and send or hold the digest (once per day)
    Run {
        /// Run even if today's run already happened
        #[arg(long)]
        force: bool,
    },

    /// Show what today's feeds would match, without touching the backlog
    Check,

    /// Show backlog size, recent runs and mail setup
    Status,

    /// Refresh the Gmail access token if it is close to expiry
    RefreshToken,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { force } => {
            let config = Config::load()?;
            let watchlist = config.load_watchlist()?;
            // Broken mail settings must fail before today's marker is claimed
            let mailer = create_mailer(&config)?;
            let today = Local::now().date_naive();
            let history = config.history_dir();

            let guard = if force {
                RunGuard::force(&history, today)?
            } else {
                match RunGuard::acquire(&history, today)? {
                    GuardStatus::Acquired(guard) => guard,
                    GuardStatus::AlreadyRan(path) => {
                        println!(
                            "Already ran today (see {}). Use --force to run again.",
                            path.display()
                        );
                        return Ok(());
                    }
                }
            };
            let _log_guard = init_logging(Some(guard.into_file()));

            // A failed send is a normal outcome: papers stay in the backlog
            let outcome = run(&config, &watchlist, mailer.as_deref(), today).await?;
            terminal::display_outcome(&outcome);
        }

        Commands::Check => {
            let _log_guard = init_logging(None);
            let config = Config::load()?;
            let watchlist = config.load_watchlist()?;

            let report = collect(&config, &watchlist).await?;
            terminal::display_candidates(&report);
            println!(
                "{}",
                "Nothing was saved or sent. Use `paperwatch run` for the daily digest.".dimmed()
            );
        }

        Commands::Status => {
            let config = Config::load()?;
            paperwatch::status::show(&config)?;
        }

        Commands::RefreshToken => {
            let _log_guard = init_logging(None);
            let config = Config::load()?;
            if config.mail_backend != MailBackend::Gmail {
                println!("The smtp backend has no token to refresh.");
                return Ok(());
            }
            let sender = GmailSender::new(&config.token_path)?;
            sender.refresh_credentials().await?;
            println!("Gmail token at {} is valid.", config.token_path.display());
        }
    }

    Ok(())
}

/// Structured logging to stderr, plus the day's log file when given.
fn init_logging(log_file: Option<File>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("paperwatch=info"));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match log_file {
        Some(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
    guard
}

async fn collect(config: &Config, watchlist: &Watchlist) -> Result<CollectReport> {
    let feed = ArxivFeed::new(&config.feed_url)?;
    let keywords = KeywordMatcher::new(&watchlist.keyword_groups)?;
    let authors = AuthorMatcher::new(watchlist.authors.clone());
    let summarizer = FrequencySummarizer::default();

    info!(
        subjects = watchlist.subjects.len(),
        groups = keywords.group_count(),
        authors = authors.watched().len(),
        "Collecting papers"
    );

    let mut collector = Collector::new(&feed, &keywords, &authors, &watchlist.policy);
    if watchlist.summarize_abstract {
        collector = collector.with_summarizer(&summarizer, watchlist.summary_sentences);
    }
    Ok(collector.collect(&watchlist.subjects).await)
}

async fn run(
    config: &Config,
    watchlist: &Watchlist,
    mailer: Option<&dyn MailSender>,
    today: NaiveDate,
) -> Result<RunOutcome> {
    match mailer {
        Some(_) => info!(backend = ?config.mail_backend, "Email enabled"),
        None => info!("Email disabled, digest will only be written to history/"),
    }

    let report = collect(config, watchlist).await?;
    terminal::display_candidates(&report);

    let store = BacklogStore::new(config.backlog_path());
    let mut dispatcher = Dispatcher::new(
        &store,
        config.history_dir(),
        watchlist.send_days.clone(),
        watchlist.summarize_abstract,
    );
    if let Some(mailer) = mailer {
        dispatcher = dispatcher.with_delivery(Delivery {
            mailer,
            from: config.from_email.clone(),
            to: config.to_email.clone(),
            subject: config.email_subject.clone(),
        });
    }

    let outcome = dispatcher.dispatch(report.candidates, today).await?;
    info!(outcome = outcome.label(), "Run finished");
    Ok(outcome)
}

/// Build the configured mail sender, or `None` when email is disabled.
/// Called before logging is set up.
fn create_mailer(config: &Config) -> Result<Option<Box<dyn MailSender>>> {
    if !config.send_email {
        return Ok(None);
    }
    config.require_email()?;

    let mailer: Box<dyn MailSender> = match config.mail_backend {
        MailBackend::Gmail => Box::new(GmailSender::new(&config.token_path)?),
        MailBackend::Smtp => Box::new(SmtpSender::new(config.smtp.clone())),
    };
    Ok(Some(mailer))
}
