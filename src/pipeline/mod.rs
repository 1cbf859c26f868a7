// Collection pipeline: feeds in, scored paper candidates out.

pub mod collect;

pub use collect::{CollectReport, Collector};
