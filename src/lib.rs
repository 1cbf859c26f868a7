// Paperwatch: a daily arXiv digest
//
// This is the library root. Each module corresponds to one stage of the
// daily run: fetch feeds, match and score papers, keep a backlog, and
// compose and deliver the digest.

pub mod config;
pub mod digest;
pub mod feed;
pub mod guard;
pub mod mail;
pub mod matching;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod status;
pub mod store;
pub mod summarize;
pub mod text;
