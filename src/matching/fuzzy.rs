// Approximate keyword patterns.
//
// A keyword is split into words. Each word gets an error budget that depends
// on its length, and is aligned against the text with a small edit-distance
// table (substitutions, insertions, deletions). Consecutive words must be
// separated by one or more whitespace characters, and the whole match must
// start and end on word boundaries.
//
// A word never absorbs whitespace by insertion, so it cannot swallow the
// short word in front of it; whitespace is only crossed between words.

use std::fmt;
use std::ops::Add;

/// Words up to this many characters must match exactly.
const EXACT_MAX_LEN: usize = 2;
/// Words up to this many characters get the short budget; longer ones the long budget.
const SHORT_MAX_LEN: usize = 5;
/// Errors tolerated in a word of 3 to 5 characters.
pub const SHORT_WORD_MAX_ERRORS: usize = 2;
/// Errors tolerated in a word longer than 5 characters.
pub const LONG_WORD_MAX_ERRORS: usize = 3;

/// Maximum number of errors (inclusive) for a word of the given length in characters.
pub fn max_errors(word_len: usize) -> usize {
    match word_len {
        0..=EXACT_MAX_LEN => 0,
        l if l <= SHORT_MAX_LEN => SHORT_WORD_MAX_ERRORS,
        _ => LONG_WORD_MAX_ERRORS,
    }
}

/// Edit operations needed to turn a pattern into the matched text.
///
/// An insertion is an extra character in the text; a deletion is a pattern
/// character missing from the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FuzzyCounts {
    pub substitutions: usize,
    pub insertions: usize,
    pub deletions: usize,
}

impl FuzzyCounts {
    pub fn total(&self) -> usize {
        self.substitutions + self.insertions + self.deletions
    }
}

impl Add for FuzzyCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            substitutions: self.substitutions + rhs.substitutions,
            insertions: self.insertions + rhs.insertions,
            deletions: self.deletions + rhs.deletions,
        }
    }
}

impl fmt::Display for FuzzyCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.substitutions, self.insertions, self.deletions
        )
    }
}

/// A single approximate match in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    /// Start offset in characters.
    pub start: usize,
    /// End offset in characters (exclusive).
    pub end: usize,
    /// The matched slice of the original text.
    pub text: String,
    pub counts: FuzzyCounts,
}

#[derive(Debug, Clone)]
struct PatternWord {
    chars: Vec<char>,
    max_errors: usize,
}

/// A compiled approximate-match pattern for one keyword.
#[derive(Debug, Clone)]
pub struct FuzzyPattern {
    words: Vec<PatternWord>,
}

/// Best alignment found so far while exploring one start position.
type Candidate = (usize, FuzzyCounts);

impl FuzzyPattern {
    /// Compile a keyword. Returns `None` if the keyword has no words.
    pub fn new(keyword: &str) -> Option<Self> {
        let words: Vec<PatternWord> = keyword
            .split_whitespace()
            .map(|w| {
                let chars: Vec<char> = w.chars().map(fold_case).collect();
                let max_errors = max_errors(chars.len());
                PatternWord { chars, max_errors }
            })
            .collect();

        if words.is_empty() {
            None
        } else {
            Some(Self { words })
        }
    }

    /// Find the leftmost match in `text`.
    pub fn find(&self, text: &str) -> Option<FuzzyMatch> {
        let original: Vec<char> = text.chars().collect();
        let folded: Vec<char> = original.iter().copied().map(fold_case).collect();
        self.find_from(&folded, 0)
            .map(|(start, end, counts)| FuzzyMatch {
                start,
                end,
                text: original[start..end].iter().collect(),
                counts,
            })
    }

    /// Count non-overlapping matches, scanning left to right.
    pub fn count(&self, text: &str) -> usize {
        let folded: Vec<char> = text.chars().map(fold_case).collect();
        let mut pos = 0;
        let mut count = 0;
        while let Some((_, end, _)) = self.find_from(&folded, pos) {
            count += 1;
            pos = end;
        }
        count
    }

    fn find_from(&self, text: &[char], from: usize) -> Option<(usize, usize, FuzzyCounts)> {
        (from..text.len())
            .filter(|&start| is_boundary(text, start) && !text[start].is_whitespace())
            .find_map(|start| {
                let mut best: Option<Candidate> = None;
                self.extend(text, 0, start, FuzzyCounts::default(), &mut best);
                best.map(|(end, counts)| (start, end, counts))
            })
    }

    /// Align word `idx` starting at `pos`, then recurse into the next word.
    fn extend(
        &self,
        text: &[char],
        idx: usize,
        pos: usize,
        acc: FuzzyCounts,
        best: &mut Option<Candidate>,
    ) {
        let last = idx + 1 == self.words.len();

        for (end, counts) in align_word(&self.words[idx], text, pos) {
            let total = acc + counts;

            if last {
                if is_boundary(text, end) && improves(best, end, &total) {
                    *best = Some((end, total));
                }
                continue;
            }

            let mut gap_end = end;
            while gap_end < text.len() && text[gap_end].is_whitespace() {
                gap_end += 1;
                self.extend(text, idx + 1, gap_end, total, best);
            }
        }
    }
}

/// Fewer errors wins; on a tie the shorter span wins.
fn improves(best: &Option<Candidate>, end: usize, counts: &FuzzyCounts) -> bool {
    match best {
        None => true,
        Some((best_end, best_counts)) => {
            (counts.total(), end) < (best_counts.total(), *best_end)
        }
    }
}

/// Every end offset at which `word` aligns with `text[pos..end]` within its
/// budget, with the cheapest edit breakdown for that end.
fn align_word(word: &PatternWord, text: &[char], pos: usize) -> Vec<(usize, FuzzyCounts)> {
    let m = word.chars.len();
    let span = (m + word.max_errors).min(text.len().saturating_sub(pos));

    // table[i][j]: cheapest alignment of word[..i] against text[pos..pos + j],
    // None when that prefix can only be reached by inserting whitespace
    let mut table: Vec<Vec<Option<FuzzyCounts>>> = vec![vec![None; span + 1]; m + 1];
    table[0][0] = Some(FuzzyCounts::default());
    for i in 1..=m {
        table[i][0] = Some(FuzzyCounts {
            deletions: i,
            ..Default::default()
        });
    }
    for j in 1..=span {
        if text[pos + j - 1].is_whitespace() {
            break;
        }
        table[0][j] = Some(FuzzyCounts {
            insertions: j,
            ..Default::default()
        });
    }

    for i in 1..=m {
        for j in 1..=span {
            let c = text[pos + j - 1];
            let diagonal = table[i - 1][j - 1].map(|prev| {
                if word.chars[i - 1] == c {
                    prev
                } else {
                    FuzzyCounts {
                        substitutions: prev.substitutions + 1,
                        ..prev
                    }
                }
            });
            let deletion = table[i - 1][j].map(|prev| FuzzyCounts {
                deletions: prev.deletions + 1,
                ..prev
            });
            let insertion = if c.is_whitespace() {
                None
            } else {
                table[i][j - 1].map(|prev| FuzzyCounts {
                    insertions: prev.insertions + 1,
                    ..prev
                })
            };

            table[i][j] = [diagonal, deletion, insertion]
                .into_iter()
                .flatten()
                .reduce(|cell, option| if option.total() < cell.total() { option } else { cell });
        }
    }

    (1..=span)
        .filter_map(|j| table[m][j].map(|counts| (j, counts)))
        .filter(|(_, counts)| counts.total() <= word.max_errors)
        .map(|(j, counts)| (pos + j, counts))
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// `\b` semantics: a word character on exactly one side of the offset.
fn is_boundary(text: &[char], at: usize) -> bool {
    let before = at > 0 && is_word_char(text[at - 1]);
    let after = at < text.len() && is_word_char(text[at]);
    before != after
}

fn fold_case(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_errors_tiers() {
        assert_eq!(max_errors(2), 0);
        assert_eq!(max_errors(3), 2);
        assert_eq!(max_errors(5), 2);
        assert_eq!(max_errors(6), 3);
    }

    #[test]
    fn test_exact_word_matches_with_zero_errors() {
        let pattern = FuzzyPattern::new("nucleus").unwrap();
        let m = pattern.find("the atomic nucleus is small").unwrap();
        assert_eq!(m.text, "nucleus");
        assert_eq!(m.counts, FuzzyCounts::default());
    }

    #[test]
    fn test_single_substitution_in_long_word() {
        let pattern = FuzzyPattern::new("neural-network").unwrap();
        let m = pattern.find("a neural-netwerk model").unwrap();
        assert_eq!(m.text, "neural-netwerk");
        assert_eq!(m.counts.substitutions, 1);
        assert_eq!(m.counts.total(), 1);
    }

    #[test]
    fn test_short_word_tolerates_two_errors() {
        let pattern = FuzzyPattern::new("nucli").unwrap();
        assert!(pattern.find("heavy nuclei collide").is_some());
        let m = pattern.find("heavy nxcxi collide").unwrap();
        assert_eq!(m.text, "nxcxi");
        assert_eq!(m.counts.substitutions, 2);
        assert!(pattern.find("heavy nxcxx collide").is_none());
    }

    #[test]
    fn test_long_word_tolerates_three_errors() {
        let pattern = FuzzyPattern::new("neutron").unwrap();
        let m = pattern.find("a naxtrqn here").unwrap();
        assert_eq!(m.text, "naxtrqn");
        assert_eq!(m.counts.total(), 3);
        assert!(pattern.find("a naxtrqx here").is_none());
    }

    #[test]
    fn test_word_does_not_absorb_preceding_word() {
        let pattern = FuzzyPattern::new("deepmind").unwrap();
        let m = pattern.find("trained at deepmind last year").unwrap();
        assert_eq!(m.text, "deepmind");
        assert_eq!(m.counts, FuzzyCounts::default());
    }

    #[test]
    fn test_two_letter_word_must_be_exact() {
        let pattern = FuzzyPattern::new("qcd ab").unwrap();
        assert!(pattern.find("lattice qcd ab initio").is_some());
        assert!(pattern.find("lattice qcd ac initio").is_none());
    }

    #[test]
    fn test_multi_word_keyword_spans_whitespace() {
        let pattern = FuzzyPattern::new("neutron star").unwrap();
        let m = pattern.find("cooling of neutron\n  star interiors").unwrap();
        assert_eq!(m.text, "neutron\n  star");
        assert_eq!(m.counts, FuzzyCounts::default());
    }

    #[test]
    fn test_trailing_boundary_forces_insertion() {
        // "star" ends mid-token in "stars", so the match absorbs the "s"
        let pattern = FuzzyPattern::new("neutron star").unwrap();
        let m = pattern.find("rotating neutron stars").unwrap();
        assert_eq!(m.text, "neutron stars");
        assert_eq!(m.counts.insertions, 1);
    }

    #[test]
    fn test_match_must_start_on_word_boundary() {
        let pattern = FuzzyPattern::new("matter").unwrap();
        // "antimatter" contains the word only mid-token
        assert!(pattern.find("antimatterx").is_none());
    }

    #[test]
    fn test_count_is_non_overlapping() {
        let pattern = FuzzyPattern::new("nuclear matter").unwrap();
        let text = "nuclear mater and nuclear matter and nucleer matter";
        assert_eq!(pattern.count(text), 3);
    }

    #[test]
    fn test_case_insensitive() {
        let pattern = FuzzyPattern::new("DeepMind").unwrap();
        assert!(pattern.find("trained at deepmind last year").is_some());
    }

    #[test]
    fn test_empty_keyword_has_no_pattern() {
        assert!(FuzzyPattern::new("   ").is_none());
    }

    #[test]
    fn test_counts_display_as_tuple() {
        let counts = FuzzyCounts {
            substitutions: 1,
            insertions: 0,
            deletions: 2,
        };
        assert_eq!(counts.to_string(), "(1, 0, 2)");
    }
}
