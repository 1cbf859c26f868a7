// Importance policy trait: the replaceable ranking strategy.
//
// The collector hands each paper's match results to a policy and keeps the
// paper only if the returned importance is positive. Higher values sort
// first in the digest.

/// Per-paper metadata available to the policy alongside the match results.
#[derive(Debug, Clone, Copy)]
pub struct PaperStats<'a> {
    pub author_count: usize,
    /// Feed subject the paper came from, e.g. `nucl-th`.
    pub subject: &'a str,
}

/// Trait for deciding how important a paper is.
pub trait ImportancePolicy: Send + Sync {
    /// Return 0 to discard the paper, anything above 0 to keep it.
    ///
    /// `groups` are the matched keyword-group identifiers; `authors` are the
    /// watched names that matched (one entry per matching listed author).
    fn score(&self, groups: &[&str], authors: &[String], stats: &PaperStats<'_>) -> f64;
}

/// Run a policy and clamp its output to a finite, non-negative number.
///
/// A misbehaving policy that returns NaN, an infinity or a negative value
/// discards the paper. Non-finite importances would not survive the JSON
/// backlog.
pub fn score_paper(
    policy: &dyn ImportancePolicy,
    groups: &[&str],
    authors: &[String],
    stats: &PaperStats<'_>,
) -> f64 {
    let score = policy.score(groups, authors, stats);
    if score.is_finite() {
        score.max(0.0)
    } else {
        0.0
    }
}
