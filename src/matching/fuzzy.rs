/*!
 * Fuzzy fallback matching.
 *
 * When no whole-word substring hit exists, the narrative is compared against
 * the full term set with a normalized Levenshtein ratio scaled to 0-100.
 * Callers accept the winner only when its score strictly exceeds their
 * threshold; a score exactly at the threshold is a rejection.
 */

use strsim::normalized_levenshtein;

/// Edit-distance similarity between two strings as an integer ratio 0-100.
pub fn similarity_ratio(a: &str, b: &str) -> u32 {
    (normalized_levenshtein(a, b) * 100.0).round() as u32
}

/// The highest-scoring term for `text` and its score.
///
/// Ties are broken deterministically: the first term encountered in the
/// given order wins, so callers passing a stable vocabulary ordering get
/// reproducible results across runs. Returns `None` for an empty term set.
pub fn best_match<'a>(text: &str, terms: &'a [String]) -> Option<(&'a str, u32)> {
    let mut best: Option<(&str, u32)> = None;
    for term in terms {
        let score = similarity_ratio(text, term);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((term, score)),
        }
    }
    best
}
