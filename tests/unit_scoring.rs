// Importance policy tests: the built-in keyword/author rule and the
// contract every policy goes through.

use paperwatch::scoring::importance::{KeywordAuthorPolicy, DEFAULT_AUTHOR_CEILING};
use paperwatch::scoring::traits::{score_paper, ImportancePolicy, PaperStats};

fn stats(author_count: usize) -> PaperStats<'static> {
    PaperStats {
        author_count,
        subject: "nucl-th",
    }
}

fn watched(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

// ============================================================
// Built-in policy
// ============================================================

#[test]
fn primary_group_with_context_is_kept() {
    let policy = KeywordAuthorPolicy::new("ML");
    let score = score_paper(&policy, &["ML", "NN"], &[], &stats(3));
    assert_eq!(score, 1.0);
}

#[test]
fn primary_group_alone_is_dropped() {
    let policy = KeywordAuthorPolicy::new("ML");
    assert_eq!(score_paper(&policy, &["ML"], &[], &stats(3)), 0.0);
}

#[test]
fn context_groups_without_primary_are_dropped() {
    let policy = KeywordAuthorPolicy::new("ML");
    assert_eq!(score_paper(&policy, &["NN", "NS"], &[], &stats(3)), 0.0);
}

#[test]
fn watched_author_on_small_paper_is_kept() {
    let policy = KeywordAuthorPolicy::new("ML");
    let authors = watched(&["Jane Doe"]);
    assert_eq!(score_paper(&policy, &[], &authors, &stats(4)), 1.0);
}

#[test]
fn watched_author_on_large_collaboration_is_dropped() {
    let policy = KeywordAuthorPolicy::new("ML");
    let authors = watched(&["Jane Doe"]);
    let score = score_paper(&policy, &[], &authors, &stats(DEFAULT_AUTHOR_CEILING));
    assert_eq!(score, 0.0);
}

#[test]
fn ceiling_is_configurable() {
    let policy: KeywordAuthorPolicy =
        toml::from_str("primary_group = \"ML\"\nauthor_ceiling = 100").unwrap();
    let authors = watched(&["Jane Doe"]);
    assert_eq!(score_paper(&policy, &[], &authors, &stats(50)), 1.0);
}

#[test]
fn nothing_matched_scores_zero() {
    let policy = KeywordAuthorPolicy::new("ML");
    assert_eq!(score_paper(&policy, &[], &[], &stats(1)), 0.0);
}

// ============================================================
// Custom policies
// ============================================================

/// One point per matched group plus two per watched author.
struct Weighted;

impl ImportancePolicy for Weighted {
    fn score(&self, groups: &[&str], authors: &[String], _stats: &PaperStats<'_>) -> f64 {
        groups.len() as f64 + 2.0 * authors.len() as f64
    }
}

/// Always returns a value the caller must not trust.
struct Broken(f64);

impl ImportancePolicy for Broken {
    fn score(&self, _groups: &[&str], _authors: &[String], _stats: &PaperStats<'_>) -> f64 {
        self.0
    }
}

/// Only papers from one subject count.
struct SubjectOnly(&'static str);

impl ImportancePolicy for SubjectOnly {
    fn score(&self, _groups: &[&str], _authors: &[String], stats: &PaperStats<'_>) -> f64 {
        if stats.subject == self.0 {
            1.0
        } else {
            0.0
        }
    }
}

#[test]
fn graded_policy_orders_by_value() {
    let authors = watched(&["Jane Doe"]);
    let low = score_paper(&Weighted, &["ML"], &[], &stats(2));
    let high = score_paper(&Weighted, &["ML", "NN"], &authors, &stats(2));
    assert!(high > low);
    assert_eq!(high, 4.0);
}

#[test]
fn negative_scores_clamp_to_zero() {
    assert_eq!(score_paper(&Broken(-3.0), &["ML"], &[], &stats(1)), 0.0);
}

#[test]
fn nan_scores_clamp_to_zero() {
    assert_eq!(score_paper(&Broken(f64::NAN), &["ML"], &[], &stats(1)), 0.0);
}

#[test]
fn infinite_scores_clamp_to_zero() {
    assert_eq!(score_paper(&Broken(f64::INFINITY), &["ML"], &[], &stats(1)), 0.0);
    assert_eq!(score_paper(&Broken(f64::NEG_INFINITY), &["ML"], &[], &stats(1)), 0.0);
}

#[test]
fn largest_finite_score_is_kept() {
    let score = score_paper(&Broken(f64::MAX), &["ML"], &[], &stats(1));
    assert_eq!(score, f64::MAX);
}

#[test]
fn policy_sees_the_subject() {
    let policy = SubjectOnly("astro-ph.HE");
    let elsewhere = PaperStats {
        author_count: 1,
        subject: "astro-ph.HE",
    };
    assert_eq!(score_paper(&policy, &[], &[], &elsewhere), 1.0);
    assert_eq!(score_paper(&policy, &[], &[], &stats(1)), 0.0);
}
