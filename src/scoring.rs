//! Fuzzy relevance scoring
//!
//! Pure function mapping (candidate, query) to a score in [0, 1] using the
//! Sørensen-Dice coefficient over character bigrams. Case-insensitive;
//! whitespace is stripped before comparison so "new tab" and "newtab" score
//! identically. An empty query or a candidate with no bigram overlap scores
//! 0.0, documented as "no match" rather than undefined behavior.

use std::collections::HashMap;

/// Score `candidate` against `query`, returning a value in [0, 1].
///
/// Identical inputs always produce identical output; the ranking pass relies
/// on this purity to recompute scores safely.
pub fn score(candidate: &str, query: &str) -> f64 {
    let candidate = normalize(candidate);
    let query = normalize(query);

    if candidate.is_empty() || query.is_empty() {
        return 0.0;
    }
    if candidate == query {
        return 1.0;
    }
    // A single character has no bigrams to compare.
    if candidate.chars().count() < 2 || query.chars().count() < 2 {
        return 0.0;
    }

    let mut remaining = bigram_counts(&candidate);
    let query_bigrams = bigrams(&query);

    let mut intersection = 0usize;
    for bigram in &query_bigrams {
        if let Some(count) = remaining.get_mut(bigram) {
            if *count > 0 {
                *count -= 1;
                intersection += 1;
            }
        }
    }

    let total = bigram_len(&candidate) + query_bigrams.len();
    (2.0 * intersection as f64) / total as f64
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn bigrams(s: &str) -> Vec<(char, char)> {
    let chars: Vec<char> = s.chars().collect();
    chars.windows(2).map(|w| (w[0], w[1])).collect()
}

fn bigram_len(s: &str) -> usize {
    s.chars().count().saturating_sub(1)
}

fn bigram_counts(s: &str) -> HashMap<(char, char), usize> {
    let mut counts = HashMap::new();
    for bigram in bigrams(s) {
        *counts.entry(bigram).or_insert(0usize) += 1;
    }
    counts
}
