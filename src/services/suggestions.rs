use std::cmp::Ordering;

use super::sequence_matcher::SequenceMatcher;

/// Maximum number of suggestions returned
pub const SUGGESTION_COUNT: usize = 5;

/// Minimum similarity ratio for a title to be suggested
pub const SUGGESTION_CUTOFF: f64 = 0.5;

/// Finds titles that closely resemble `query`
///
/// The query is compared as given, without the trimming and lowercasing used
/// for exact resolution. Titles scoring at least `SUGGESTION_CUTOFF` are
/// ranked by descending ratio; equal ratios put the greater title first.
pub fn suggest<'a, I>(query: &str, titles: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let matcher = SequenceMatcher::new(query);

    let mut scored: Vec<(f64, &str)> = titles
        .into_iter()
        .filter(|title| {
            matcher.real_quick_ratio(title) >= SUGGESTION_CUTOFF
                && matcher.quick_ratio(title) >= SUGGESTION_CUTOFF
        })
        .map(|title| (matcher.ratio(title), title))
        .filter(|(ratio, _)| *ratio >= SUGGESTION_CUTOFF)
        .collect();

    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.1.cmp(a.1))
    });

    tracing::debug!(
        query = %query,
        candidates = scored.len(),
        "Suggestion search completed"
    );

    scored
        .into_iter()
        .take(SUGGESTION_COUNT)
        .map(|(_, title)| title.to_string())
        .collect()
}
