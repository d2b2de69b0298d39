//! "Did you mean" suggestions for misspelled keywords.

use strsim::levenshtein;

/// Maximum Levenshtein distance to consider a name as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Finds the closest candidate to `query` using Levenshtein distance.
///
/// Returns the best match if its edit distance is within the threshold and it
/// is not an exact match, otherwise `None`.
pub(crate) fn find_similar<'a>(
    query: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    let query_lower = query.to_lowercase();

    let (best_match, best_distance) = candidates
        .into_iter()
        .filter(|name| !name.is_empty())
        .map(|name| (name, levenshtein(&query_lower, &name.to_lowercase())))
        .min_by_key(|(_, d)| *d)?;

    (best_distance > 0 && best_distance <= MAX_SUGGESTION_DISTANCE)
        .then(|| best_match.to_string())
}
