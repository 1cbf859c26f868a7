// Paper listing feeds: trait-based so the pipeline can run on canned data.

pub mod arxiv;
pub mod traits;

pub use traits::{FeedEntry, FeedSource};
