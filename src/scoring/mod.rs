// Importance scoring: a replaceable policy over match results.

pub mod importance;
pub mod traits;

pub use importance::KeywordAuthorPolicy;
pub use traits::{score_paper, ImportancePolicy, PaperStats};
