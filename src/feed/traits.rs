// Feed source trait: where paper listings come from.
//
// The collector only sees this trait, so tests can hand it canned entries
// and another listing service can be added without touching the pipeline.

use anyhow::Result;
use async_trait::async_trait;

/// One paper listing as it arrives from a feed, before any cleanup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedEntry {
    pub title: String,
    /// Summary block, possibly with markup and an identifier header line
    pub summary: String,
    /// Author names joined with commas or newlines, possibly with markup
    pub authors: String,
    pub link: String,
}

/// Trait for fetching one subject's listings.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch today's entries for a subject identifier such as `nucl-th`.
    async fn fetch(&self, subject: &str) -> Result<Vec<FeedEntry>>;
}
