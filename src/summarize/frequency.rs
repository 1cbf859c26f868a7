// Word-frequency extractive summarizer.
//
// Content words are counted across the whole text (stop words dropped) and
// normalized by the most frequent one. Each sentence scores the sum of its
// words' weights; the best sentences are kept and emitted in their original
// order so the summary still reads top to bottom.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex_lite::Regex;
use stop_words::{get, LANGUAGE};

use super::traits::Summarizer;

/// Sentence terminator: `.`, `!` or `?` followed by whitespace or the end.
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("sentence pattern is valid"));

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z][A-Za-z0-9'-]*").expect("word pattern is valid"));

/// Local summarizer with no model or network dependency.
pub struct FrequencySummarizer {
    stop_words: HashSet<String>,
}

impl Default for FrequencySummarizer {
    fn default() -> Self {
        let stop_words: Vec<String> = get(LANGUAGE::English);
        Self {
            stop_words: stop_words.into_iter().collect(),
        }
    }
}

impl FrequencySummarizer {
    fn content_words<'a>(&'a self, sentence: &'a str) -> impl Iterator<Item = String> + 'a {
        WORD.find_iter(sentence)
            .map(|m| m.as_str().to_lowercase())
            .filter(|w| w.len() > 1 && !self.stop_words.contains(w))
    }
}

impl Summarizer for FrequencySummarizer {
    fn summarize(&self, text: &str, sentences: usize) -> String {
        let split = split_sentences(text);
        if sentences == 0 || split.len() <= sentences {
            return text.to_string();
        }

        let mut frequency: HashMap<String, f64> = HashMap::new();
        for sentence in &split {
            for word in self.content_words(sentence) {
                *frequency.entry(word).or_insert(0.0) += 1.0;
            }
        }

        let max = frequency.values().copied().fold(0.0, f64::max);
        if max == 0.0 {
            return text.to_string();
        }

        let mut ranked: Vec<(usize, f64)> = split
            .iter()
            .enumerate()
            .map(|(i, sentence)| {
                let strength = self
                    .content_words(sentence)
                    .map(|w| frequency.get(&w).copied().unwrap_or(0.0) / max)
                    .sum();
                (i, strength)
            })
            .collect();

        // Strongest first; earlier sentences win ties
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        let mut keep: Vec<usize> = ranked.into_iter().take(sentences).map(|(i, _)| i).collect();
        keep.sort_unstable();

        keep.into_iter()
            .map(|i| split[i])
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Split text into trimmed sentences, keeping their terminators.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in SENTENCE_END.find_iter(text) {
        let sentence = text[start..m.end()].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        start = m.end();
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}
