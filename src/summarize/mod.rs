// Abstract summarization: optional, trait-based.

pub mod frequency;
pub mod traits;

pub use frequency::FrequencySummarizer;
pub use traits::Summarizer;
