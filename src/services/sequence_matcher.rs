//! Ratcliff/Obershelp ("gestalt pattern matching") string similarity.
//!
//! The similarity of two strings `a` and `b` is `2 * M / (|a| + |b|)`, where
//! `M` is the number of characters covered by matching blocks: the longest
//! common substring, then recursively the longest common substrings to its
//! left and right. Characters are compared as Unicode scalar values.
//!
//! The matcher is built once for the query (`b`) and then compared against
//! many candidates (`a`), so the query's character positions are indexed
//! up front.

use std::collections::HashMap;

/// Queries at least this long drop "popular" characters as match anchors
const POPULAR_MIN_LEN: usize = 200;

pub struct SequenceMatcher {
    b: Vec<char>,
    /// Ascending positions of each character in `b`, minus popular ones
    b2j: HashMap<char, Vec<usize>>,
    /// Full character counts of `b`, for `quick_ratio`
    b_counts: HashMap<char, usize>,
}

impl SequenceMatcher {
    pub fn new(b: &str) -> Self {
        let b: Vec<char> = b.chars().collect();

        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        let b_counts = b2j
            .iter()
            .map(|(&c, positions)| (c, positions.len()))
            .collect();

        if b.len() >= POPULAR_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }

        Self { b, b2j, b_counts }
    }

    /// Similarity in `[0, 1]`; two empty strings are identical
    pub fn ratio(&self, a: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let matches = self.matching_characters(&a);
        calculate_ratio(matches, a.len() + self.b.len())
    }

    /// Upper bound on `ratio` from the character multisets alone
    pub fn quick_ratio(&self, a: &str) -> f64 {
        let mut available: HashMap<char, usize> = HashMap::new();
        let mut matches = 0;
        let mut len = 0;

        for c in a.chars() {
            len += 1;
            let remaining = available
                .entry(c)
                .or_insert_with(|| self.b_counts.get(&c).copied().unwrap_or(0));
            if *remaining > 0 {
                *remaining -= 1;
                matches += 1;
            }
        }

        calculate_ratio(matches, len + self.b.len())
    }

    /// Upper bound on `ratio` from the lengths alone
    pub fn real_quick_ratio(&self, a: &str) -> f64 {
        let la = a.chars().count();
        let lb = self.b.len();
        calculate_ratio(la.min(lb), la + lb)
    }

    /// Total size of all matching blocks between `a` and `b`
    fn matching_characters(&self, a: &[char]) -> usize {
        let mut total = 0;
        let mut pending = vec![(0, a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, size) = self.find_longest_match(a, alo, ahi, blo, bhi);
            if size == 0 {
                continue;
            }
            total += size;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + size < ahi && j + size < bhi {
                pending.push((i + size, ahi, j + size, bhi));
            }
        }

        total
    }

    /// Longest block with `a[i..i+size] == b[j..j+size]` inside the given ranges
    ///
    /// Among equally long blocks, the one starting earliest in `a` wins, then
    /// earliest in `b`.
    fn find_longest_match(
        &self,
        a: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
        // j -> length of the match ending at a[i - 1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next_j2len = HashMap::new();
            if let Some(positions) = self.b2j.get(c) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next_j2len;
        }

        // Popular characters are not indexed; grow the block across them
        while best_i > alo && best_j > blo && a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }
}

fn calculate_ratio(matches: usize, length: usize) -> f64 {
    if length == 0 {
        return 1.0;
    }
    2.0 * matches as f64 / length as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(a: &str, b: &str) -> f64 {
        SequenceMatcher::new(b).ratio(a)
    }

    #[test]
    fn test_identical_strings() {
        assert_eq!(ratio("Inception", "Inception"), 1.0);
        assert_eq!(ratio("", ""), 1.0);
    }

    #[test]
    fn test_disjoint_strings() {
        assert_eq!(ratio("abc", "xyz"), 0.0);
        assert_eq!(ratio("abc", ""), 0.0);
    }

    #[test]
    fn test_known_ratios() {
        // blocks "ab" and "d"
        assert_eq!(ratio("abcd", "abd"), 6.0 / 7.0);
        // blocks "Incept" and "on"
        assert_eq!(ratio("Inception", "Incepton"), 16.0 / 17.0);
        // "a" then nothing further matches
        assert_eq!(ratio("ab", "ba"), 0.5);
    }

    #[test]
    fn test_ratio_is_case_sensitive() {
        assert!(ratio("inception", "INCEPTION") < 0.2);
    }

    #[test]
    fn test_longest_match_prefers_earliest_block() {
        let matcher = SequenceMatcher::new("xabyab");
        let a: Vec<char> = "ab".chars().collect();
        assert_eq!(matcher.find_longest_match(&a, 0, 2, 0, 6), (0, 1, 2));
    }

    #[test]
    fn test_quick_ratios_bound_ratio() {
        let pairs = [
            ("The Prestige", "Prestige"),
            ("Interstellar", "Incepton"),
            ("Avatar", "Avengers"),
            ("Toy Story 3", "Story Toy"),
        ];
        for (a, b) in pairs {
            let matcher = SequenceMatcher::new(b);
            let r = matcher.ratio(a);
            assert!(matcher.quick_ratio(a) >= r, "{} vs {}", a, b);
            assert!(matcher.real_quick_ratio(a) >= matcher.quick_ratio(a));
        }
    }

    #[test]
    fn test_multibyte_characters_count_once() {
        assert_eq!(ratio("Amélie", "Amelie"), 10.0 / 12.0);
    }

    #[test]
    fn test_long_query_still_matches_across_popular_characters() {
        // Every character of a 200+ char query is "popular", yet the block
        // extension still finds the shared run.
        let query = "ab".repeat(120);
        let matcher = SequenceMatcher::new(&query);
        assert!(matcher.b2j.is_empty());
        assert_eq!(matcher.ratio(&query), 1.0);
    }
}
