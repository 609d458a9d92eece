/*!
 * Translation resolution.
 *
 * A translation table maps canonical-language terms to their equivalents in
 * N other languages. Resolution scans candidate texts in order (primary
 * description first, long narrative as fallback) against the term list
 * sorted by descending length: the first sufficiently long term contained in
 * a candidate wins immediately. When no term is contained anywhere, a fuzzy
 * fallback with its own threshold may still select a record.
 */

use crate::errors::DictionaryError;
use crate::matching::fuzzy::best_match;
use crate::sheet::Sheet;
use crate::text_normalizer::normalize;

use std::collections::HashMap;

/// Minimum canonical-term length for substring resolution (strict floor).
pub const DEFAULT_MIN_TERM_LENGTH: usize = 5;

/// One canonical term with its parallel translations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRecord {
    /// Canonical-language term as it appears in the table
    pub canonical: String,

    /// Translations parallel to `TranslationTable::languages`; `None` for
    /// blank cells
    pub translations: Vec<Option<String>>,
}

/// Read-only translation table built once per run.
#[derive(Debug)]
pub struct TranslationTable {
    /// Language column names, in table order (canonical column excluded)
    languages: Vec<String>,

    /// Records keyed by normalized canonical term
    records: HashMap<String, TranslationRecord>,

    /// Normalized canonical terms sorted by descending length
    ordered_terms: Vec<String>,

    /// Fuzzy fallback acceptance threshold (strict greater-than)
    fuzzy_threshold: u32,
}

impl TranslationTable {
    /// Build a table from a tabular sheet. Every column other than the
    /// canonical one is treated as a target language. Duplicate canonical
    /// terms collapse to their first occurrence.
    pub fn from_sheet(
        sheet: &Sheet,
        canonical_column: &str,
        fuzzy_threshold: u32,
    ) -> Result<Self, DictionaryError> {
        let canonical_idx = sheet
            .column_index(canonical_column)
            .ok_or_else(|| DictionaryError::MissingCanonicalColumn(canonical_column.to_string()))?;

        let language_columns: Vec<(usize, String)> = sheet
            .headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != canonical_idx)
            .map(|(idx, name)| (idx, name.clone()))
            .collect();

        let mut records = HashMap::new();
        let mut ordered_terms = Vec::new();
        // translation sheets carry no descriptive row: every row is a record
        for row in sheet.rows.iter() {
            let canonical = row.get(canonical_idx).map(|v| v.as_str()).unwrap_or("");
            let key = normalize(canonical);
            if key.is_empty() || records.contains_key(&key) {
                continue;
            }
            let translations = language_columns
                .iter()
                .map(|(idx, _)| {
                    let value = row.get(*idx).map(|v| v.trim()).unwrap_or("");
                    if value.is_empty() {
                        None
                    } else {
                        Some(value.to_string())
                    }
                })
                .collect();
            records.insert(
                key.clone(),
                TranslationRecord {
                    canonical: canonical.trim().to_string(),
                    translations,
                },
            );
            ordered_terms.push(key);
        }

        ordered_terms.sort_by_key(|term| std::cmp::Reverse(term.len()));

        Ok(Self {
            languages: language_columns.into_iter().map(|(_, name)| name).collect(),
            records,
            ordered_terms,
            fuzzy_threshold,
        })
    }

    /// Target language column names, parallel to each record's translations.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Number of records in the table.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by exact canonical term (normalized comparison).
    pub fn get(&self, canonical: &str) -> Option<&TranslationRecord> {
        self.records.get(&normalize(canonical))
    }

    /// Resolve the best translation record for the given candidate texts.
    ///
    /// Candidates are scanned in order; within each candidate the canonical
    /// terms are tried longest-first, and the first term longer than
    /// `min_term_length` contained in the candidate wins immediately. Terms
    /// at or below the floor are ignored. When no candidate contains any
    /// term, a fuzzy comparison of each candidate against the canonical
    /// terms may still pick a record if its score strictly exceeds the
    /// table's fuzzy threshold.
    ///
    /// `None` means the destination fields must be left untouched.
    pub fn resolve(
        &self,
        candidates: &[&str],
        min_term_length: usize,
    ) -> Option<&TranslationRecord> {
        for candidate in candidates {
            if candidate.trim().is_empty() {
                continue;
            }
            let candidate = normalize(candidate);
            for term in &self.ordered_terms {
                if term.len() > min_term_length && candidate.contains(term.as_str()) {
                    return self.records.get(term);
                }
            }
        }

        // Fuzzy fallback over whole candidates, first acceptable score wins
        for candidate in candidates {
            if candidate.trim().is_empty() {
                continue;
            }
            let candidate = normalize(candidate);
            if let Some((term, score)) = best_match(&candidate, &self.ordered_terms) {
                if score > self.fuzzy_threshold {
                    return self.records.get(term);
                }
            }
        }

        None
    }
}
