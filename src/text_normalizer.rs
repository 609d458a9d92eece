/*!
 * Text normalization for dictionary and narrative comparison.
 *
 * Every comparison in the matching engine goes through `normalize` first:
 * invisible characters are stripped, the text is upper-cased and accents are
 * folded to their closest ASCII representation, so that "Normalização" and
 * "NORMALIZACAO " compare equal.
 */

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Normalize a text for matching.
///
/// - Replaces non-breaking spaces with ordinary spaces
/// - Removes zero-width spaces and byte-order marks
/// - Strips diacritics (NFD decomposition, combining marks dropped)
/// - Upper-cases and trims the result
///
/// This is a total function: it never fails and is idempotent.
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter_map(|c| match c {
            '\u{00A0}' => Some(' '),
            '\u{200B}' | '\u{FEFF}' => None,
            _ => Some(c),
        })
        .collect();

    let folded: String = cleaned
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    folded.to_uppercase().trim().to_string()
}

/// Normalize a column header for schema lookup: all whitespace removed,
/// upper-cased. Tolerates headers like "SAP 123" or "sap123 ".
pub fn normalize_header(name: &str) -> String {
    name.split_whitespace().collect::<String>().to_uppercase()
}
