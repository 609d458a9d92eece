/*!
 * Whole-word substring matching.
 *
 * The primary match strategy: a vocabulary term counts as a hit only when it
 * occurs inside the narrative as a whole word. Word characters are letters,
 * digits and underscore, consistent with the normalizer's ASCII output, so
 * "AC" matches in "USO AC 123" but never inside "BRACO" or "PLACA".
 */

use std::collections::HashSet;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether `term` occurs in `text` anchored at word boundaries on both sides.
///
/// Both arguments are expected to be normalized already. An empty term never
/// matches.
pub fn contains_whole_word(text: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    for (start, _) in text.match_indices(term) {
        let before_ok = text[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !is_word_char(c));
        let after_ok = text[start + term.len()..]
            .chars()
            .next()
            .is_none_or(|c| !is_word_char(c));
        if before_ok && after_ok {
            return true;
        }
    }
    false
}

/// Every vocabulary term occurring as a whole word in `text`, excluding
/// blocklisted terms, in the iteration order of `terms`.
///
/// Passing a length-descending term sequence makes the first hit the longest
/// (most specific) one, which is how the resolvers select their winner.
pub fn find_whole_word_terms<'a>(
    text: &str,
    terms: &'a [String],
    blocklist: &HashSet<String>,
) -> Vec<&'a str> {
    terms
        .iter()
        .filter(|term| !blocklist.contains(term.as_str()))
        .filter(|term| contains_whole_word(text, term))
        .map(|term| term.as_str())
        .collect()
}
