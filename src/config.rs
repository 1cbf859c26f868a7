use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result;
use chrono::Weekday;
use serde::Deserialize;
use thiserror::Error;

use crate::feed::arxiv::DEFAULT_FEED_URL;
use crate::matching::{KeywordGroup, KeywordMatcher};
use crate::scoring::importance::{KeywordAuthorPolicy, DEFAULT_AUTHOR_CEILING};
use crate::store::backlog::BACKLOG_FILE;

pub const DEFAULT_EMAIL_SUBJECT: &str = "Arxiv Update";
pub const DEFAULT_SUMMARY_SENTENCES: usize = 3;
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Deployment mistakes. All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("watchlist not found at {0}")]
    MissingWatchlist(PathBuf),

    #[error("failed to read watchlist {path}")]
    ReadWatchlist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid watchlist {path}")]
    ParseWatchlist {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("keyword group #{0} has an empty identifier")]
    EmptyGroupId(usize),

    #[error("keyword group '{group}' contains an empty keyword")]
    EmptyKeyword { group: String },

    #[error("policy primary_group '{0}' is not one of the keyword groups")]
    UnknownPrimaryGroup(String),

    #[error("invalid send day '{0}' (use 0-6 for Monday-Sunday, or a weekday name)")]
    InvalidSendDay(String),

    #[error("watchlist has no subjects to fetch")]
    NoSubjects,

    #[error("unknown mail backend '{0}' (expected gmail or smtp)")]
    UnknownMailBackend(String),

    #[error("invalid value '{value}' for {name}")]
    InvalidValue { name: &'static str, value: String },
}

/// Which mail transport delivers the digest.
#[derive(Debug, Clone, PartialEq)]
pub enum MailBackend {
    /// Gmail REST API with an OAuth refresh token (default)
    Gmail,
    /// Plain SMTP relay with STARTTLS and a password
    Smtp,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// Central configuration loaded from environment variables.
///
/// Secrets and deployment paths come from env vars (a .env file is loaded
/// at startup via dotenvy). What to watch lives in the watchlist TOML.
pub struct Config {
    /// State directory holding history/, the backlog, and the Gmail token
    pub home: PathBuf,
    pub watchlist_path: PathBuf,
    pub send_email: bool,
    pub to_email: String,
    pub from_email: String,
    pub email_subject: String,
    pub mail_backend: MailBackend,
    /// Authorized-user token file for the Gmail backend
    pub token_path: PathBuf,
    pub smtp: SmtpConfig,
    /// Base URL of the RSS feeds; the subject is appended as a path segment
    pub feed_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let home = env::var("PAPERWATCH_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_home());

        let watchlist_path = env::var("PAPERWATCH_WATCHLIST")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join("watchlist.toml"));

        let token_path = env::var("PAPERWATCH_TOKEN_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join("token.json"));

        let mail_backend = match env::var("PAPERWATCH_MAIL_BACKEND").as_deref() {
            Ok("gmail") | Err(_) => MailBackend::Gmail,
            Ok("smtp") => MailBackend::Smtp,
            Ok(other) => return Err(ConfigError::UnknownMailBackend(other.to_string()).into()),
        };

        let smtp_port = match env::var("SMTP_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: "SMTP_PORT",
                value: raw.clone(),
            })?,
            Err(_) => DEFAULT_SMTP_PORT,
        };

        Ok(Self {
            send_email: env_flag("PAPERWATCH_SEND_EMAIL")?,
            to_email: env::var("PAPERWATCH_TO_EMAIL").unwrap_or_default(),
            from_email: env::var("PAPERWATCH_FROM_EMAIL").unwrap_or_default(),
            email_subject: env::var("PAPERWATCH_EMAIL_SUBJECT")
                .unwrap_or_else(|_| DEFAULT_EMAIL_SUBJECT.to_string()),
            mail_backend,
            token_path,
            smtp: SmtpConfig {
                host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
                port: smtp_port,
                username: env::var("SMTP_USERNAME").unwrap_or_default(),
                password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            },
            feed_url: env::var("PAPERWATCH_FEED_URL")
                .unwrap_or_else(|_| DEFAULT_FEED_URL.to_string()),
            home,
            watchlist_path,
        })
    }

    /// Directory for dated logs (the daily run marker) and digest drafts.
    pub fn history_dir(&self) -> PathBuf {
        self.home.join("history")
    }

    pub fn backlog_path(&self) -> PathBuf {
        self.home.join(BACKLOG_FILE)
    }

    pub fn load_watchlist(&self) -> Result<Watchlist, ConfigError> {
        Watchlist::load(&self.watchlist_path)
    }

    /// Check that the email settings are complete.
    /// Call this before building a mail sender.
    pub fn require_email(&self) -> Result<()> {
        if self.to_email.is_empty() || self.from_email.is_empty() {
            anyhow::bail!(
                "PAPERWATCH_TO_EMAIL and PAPERWATCH_FROM_EMAIL must be set when \
                 PAPERWATCH_SEND_EMAIL is enabled.\n\
                 Add them to your .env file."
            );
        }
        match self.mail_backend {
            MailBackend::Gmail => {
                if !self.token_path.exists() {
                    anyhow::bail!(
                        "Gmail token not found at {}\n\
                         Authorize the sending account and place its token.json there,\n\
                         or set PAPERWATCH_MAIL_BACKEND=smtp.",
                        self.token_path.display()
                    );
                }
            }
            MailBackend::Smtp => {
                if self.smtp.username.is_empty() || self.smtp.password.is_empty() {
                    anyhow::bail!("SMTP_USERNAME and SMTP_PASSWORD must be set for the smtp backend.");
                }
            }
        }
        Ok(())
    }
}

fn default_home() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("paperwatch"))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn env_flag(name: &'static str) -> Result<bool, ConfigError> {
    match env::var(name) {
        Err(_) => Ok(false),
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => Err(ConfigError::InvalidValue { name, value: raw }),
        },
    }
}

/// A send day as written in the watchlist: an index (0 = Monday) or a name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DaySpec {
    Index(u8),
    Name(String),
}

impl DaySpec {
    fn to_weekday(&self) -> Result<Weekday, ConfigError> {
        match self {
            DaySpec::Index(i) => {
                Weekday::try_from(*i).map_err(|_| ConfigError::InvalidSendDay(i.to_string()))
            }
            DaySpec::Name(name) => {
                Weekday::from_str(name).map_err(|_| ConfigError::InvalidSendDay(name.clone()))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct PolicySection {
    primary_group: Option<String>,
    author_ceiling: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct WatchlistFile {
    subjects: Vec<String>,
    #[serde(default)]
    authors: Vec<String>,
    send_days: Option<Vec<DaySpec>>,
    #[serde(default)]
    summarize_abstract: bool,
    summary_sentences: Option<usize>,
    policy: Option<PolicySection>,
    #[serde(default)]
    keyword_groups: Vec<KeywordGroup>,
}

/// What to watch: feeds, keyword groups, authors, and when to send.
#[derive(Debug, Clone)]
pub struct Watchlist {
    pub subjects: Vec<String>,
    pub authors: Vec<String>,
    pub keyword_groups: Vec<KeywordGroup>,
    pub send_days: Vec<Weekday>,
    pub summarize_abstract: bool,
    pub summary_sentences: usize,
    pub policy: KeywordAuthorPolicy,
}

impl Watchlist {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingWatchlist(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadWatchlist {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Parse and validate watchlist TOML. `origin` is only used in errors.
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let file: WatchlistFile =
            toml::from_str(text).map_err(|source| ConfigError::ParseWatchlist {
                path: origin.to_path_buf(),
                source,
            })?;

        if file.subjects.is_empty() {
            return Err(ConfigError::NoSubjects);
        }
        KeywordMatcher::new(&file.keyword_groups)?;

        let send_days = match &file.send_days {
            Some(days) => days
                .iter()
                .map(DaySpec::to_weekday)
                .collect::<Result<Vec<_>, _>>()?,
            None => ALL_WEEKDAYS.to_vec(),
        };

        let (primary, ceiling) = match file.policy {
            Some(section) => (section.primary_group, section.author_ceiling),
            None => (None, None),
        };
        if let Some(primary) = &primary {
            if !file.keyword_groups.iter().any(|g| &g.id == primary) {
                return Err(ConfigError::UnknownPrimaryGroup(primary.clone()));
            }
        }
        // Without an explicit primary group the first configured group plays that role
        let primary = primary
            .or_else(|| file.keyword_groups.first().map(|g| g.id.clone()))
            .unwrap_or_default();

        Ok(Self {
            subjects: file.subjects,
            authors: file.authors,
            keyword_groups: file.keyword_groups,
            send_days,
            summarize_abstract: file.summarize_abstract,
            summary_sentences: file.summary_sentences.unwrap_or(DEFAULT_SUMMARY_SENTENCES),
            policy: KeywordAuthorPolicy {
                primary_group: primary,
                author_ceiling: ceiling.unwrap_or(DEFAULT_AUTHOR_CEILING),
            },
        })
    }
}

const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];
