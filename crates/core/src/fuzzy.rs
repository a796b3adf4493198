// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typo-tolerant keyword filtering for inventory and queue search

/// Edit distance between two strings, counted in Unicode scalar values
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Typos allowed for a query word of the given length
pub fn default_tolerance(word_len: usize) -> usize {
    match word_len {
        0..=2 => 0,
        3..=4 => 1,
        _ => 2,
    }
}

/// Whether `text` matches every word of `query`
///
/// Matching is case-insensitive. A query word matches when it appears as a
/// substring of `text`, or when some word of `text` is within the word's
/// tolerance. `max_distance` caps the tolerance; `None` uses
/// [`default_tolerance`]. An empty query matches everything.
pub fn keyword_matches(query: &str, text: &str, max_distance: Option<usize>) -> bool {
    let text = text.to_lowercase();
    let words: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    query.to_lowercase().split_whitespace().all(|needle| {
        if text.contains(needle) {
            return true;
        }
        let len = needle.chars().count();
        let tolerance = match max_distance {
            Some(cap) => cap.min(default_tolerance(len)),
            None => default_tolerance(len),
        };
        tolerance > 0 && words.iter().any(|w| levenshtein(needle, w) <= tolerance)
    })
}

/// Keep the items whose key matches the query, preserving order
pub fn filter_by_keyword<'a, T, F>(items: &'a [T], query: &str, key: F) -> Vec<&'a T>
where
    F: Fn(&T) -> &str,
{
    items
        .iter()
        .filter(|item| keyword_matches(query, key(item), None))
        .collect()
}

#[cfg(test)]
#[path = "fuzzy_tests.rs"]
mod tests;
