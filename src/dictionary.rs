/*!
 * Controlled-vocabulary dictionaries.
 *
 * A vocabulary file is line-oriented UTF-8. Each line, after normalization,
 * is either:
 * - `ABBREVIATION=EXPANSION` - an abbreviation entry (split on the first `=`)
 * - a plain term
 * - blank (skipped)
 *
 * Terms are kept both as a set (fuzzy matching) and as a sequence sorted by
 * descending length (substring matching - the longest, most specific term
 * wins ties). Vocabularies are built once per run and immutable afterwards.
 */

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::Result;
use regex::Regex;

use crate::errors::DictionaryError;
use crate::text_normalizer::normalize;

/// A controlled vocabulary: normalized terms plus abbreviation entries.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    /// All terms, for membership tests
    pub terms: HashSet<String>,

    /// Terms sorted by descending length, stable within equal lengths
    /// (declaration order in the source file)
    pub ordered: Vec<String>,

    /// Abbreviation entries in declaration order. Kept as a sequence rather
    /// than a map so expansion order is deterministic across runs.
    pub abbreviations: Vec<(String, String)>,
}

impl Vocabulary {
    /// Load a vocabulary from a dictionary file.
    ///
    /// A missing or unreadable file is a fatal error surfaced to the caller;
    /// it is never recovered into an empty vocabulary.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DictionaryError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::parse(&content))
    }

    /// Parse vocabulary content from an already-loaded string.
    pub fn parse(content: &str) -> Self {
        let mut vocabulary = Vocabulary::default();

        for line in content.lines() {
            let line = normalize(line);
            if line.is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                vocabulary
                    .abbreviations
                    .push((normalize(key), normalize(value)));
            } else {
                if vocabulary.terms.insert(line.clone()) {
                    vocabulary.ordered.push(line);
                }
            }
        }

        // Stable sort keeps declaration order for terms of equal length
        vocabulary.ordered.sort_by_key(|term| std::cmp::Reverse(term.len()));
        vocabulary
    }

    /// Number of plain terms in the vocabulary.
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Whether the vocabulary holds no terms.
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// Whole-word abbreviation expander built from one or more vocabularies.
///
/// Each entry is applied as a single `\b`-anchored pass in declaration order.
/// Expansion does not re-run to a fix point: if an expansion text happens to
/// equal another entry's key it is left as-is. This mirrors the upstream
/// dictionaries, whose expansions are full words and never keys themselves.
#[derive(Debug)]
pub struct AbbreviationExpander {
    entries: Vec<(Regex, String)>,
}

impl AbbreviationExpander {
    /// Build an expander from the union of the given vocabularies'
    /// abbreviation entries, in the order the vocabularies are given.
    pub fn from_vocabularies(vocabularies: &[&Vocabulary]) -> Result<Self> {
        let mut entries = Vec::new();
        for vocabulary in vocabularies {
            for (key, value) in &vocabulary.abbreviations {
                let pattern = format!(r"\b{}\b", regex::escape(key));
                entries.push((Regex::new(&pattern)?, value.clone()));
            }
        }
        Ok(AbbreviationExpander { entries })
    }

    /// Replace every whole-word occurrence of each abbreviation with its
    /// expansion. Partial words are never touched ("AC" does not match
    /// inside "BRACO").
    pub fn expand(&self, text: &str) -> String {
        let mut expanded = text.to_string();
        for (pattern, replacement) in &self.entries {
            // NoExpand: expansion text is literal, never a capture reference
            expanded = pattern
                .replace_all(&expanded, regex::NoExpand(replacement))
                .into_owned();
        }
        expanded
    }

    /// Number of abbreviation entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the expander has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
