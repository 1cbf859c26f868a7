// arXiv RSS feed client.
//
// Each subject has a feed at `<base>/<subject>` listing the day's new and
// replaced papers. feed-rs handles both the RSS 2.0 and the older RDF
// layouts; authors arrive as dc:creator.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::traits::{FeedEntry, FeedSource};

pub const DEFAULT_FEED_URL: &str = "http://export.arxiv.org/rss";

/// Client for arXiv subject feeds.
pub struct ArxivFeed {
    client: reqwest::Client,
    base_url: String,
}

impl ArxivFeed {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("paperwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl FeedSource for ArxivFeed {
    async fn fetch(&self, subject: &str) -> Result<Vec<FeedEntry>> {
        let url = format!("{}/{}", self.base_url, subject);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Feed request failed for {subject}"))?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Feed for {} returned {}", subject, status);
        }

        let body = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read feed body for {subject}"))?;

        let entries = parse_feed(&body).with_context(|| format!("Invalid feed for {subject}"))?;
        debug!(subject, entries = entries.len(), "Fetched feed");
        Ok(entries)
    }
}

/// Parse an RSS or Atom document into feed entries.
///
/// Entries without a link are dropped: the link is the paper's identity.
pub fn parse_feed(body: &[u8]) -> Result<Vec<FeedEntry>> {
    let feed = feed_rs::parser::parse(body).context("Failed to parse feed XML")?;

    let entries = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let link = entry.links.first()?.href.clone();
            let summary = entry
                .summary
                .map(|text| text.content)
                .or_else(|| entry.content.and_then(|content| content.body))
                .unwrap_or_default();
            let authors = entry
                .authors
                .iter()
                .map(|person| person.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");

            Some(FeedEntry {
                title: entry.title.map(|text| text.content).unwrap_or_default(),
                summary,
                authors,
                link,
            })
        })
        .collect();

    Ok(entries)
}
