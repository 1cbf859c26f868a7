// Relevance matching: fuzzy keyword groups and watched authors.

pub mod authors;
pub mod fuzzy;
pub mod keywords;

pub use authors::{author_match, AuthorHits, AuthorMatchKind, AuthorMatcher};
pub use keywords::{KeywordGroup, KeywordMatcher};
