/*!
 * Attribute resolvers: substring-then-fuzzy over one vocabulary.
 *
 * One configurable resolver covers every attribute column (material, norm,
 * size dimension, nomenclature) instead of near-duplicate per-caller
 * implementations. The differences between callers are expressed as
 * configuration: output mode, fuzzy threshold and blocklists.
 *
 * Blocklist asymmetry is deliberate and mirrors the upstream behavior: the
 * blocklist filters the substring phase only. The fuzzy phase runs over the
 * full vocabulary, and a blocklisted fuzzy winner is reported through a
 * sentinel value rather than returned as a match.
 */

use std::collections::HashSet;

use crate::dictionary::Vocabulary;
use crate::matching::fuzzy::best_match;
use crate::matching::substring::find_whole_word_terms;
use crate::text_normalizer::normalize;

/// Sentinel for a blocklisted fuzzy winner in the material resolver.
pub const MATERIAL_NOT_INFORMED: &str = "material nao informado";

/// Default fuzzy acceptance threshold (strict greater-than).
pub const DEFAULT_FUZZY_THRESHOLD: u32 = 80;

/// How a resolver reports its substring hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The single longest hit (most specific term)
    LongestMatch,
    /// The first hit in vocabulary iteration order, short-circuiting
    FirstMatch,
    /// Every hit, joined with ", "
    AllMatches,
}

/// Outcome of resolving one narrative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A confident match (or a sentinel standing in for one)
    Match(String),
    /// No confident match; the destination field is left unresolved
    Unresolved,
}

impl Resolution {
    /// The matched value, or `None` when unresolved.
    pub fn value(&self) -> Option<&str> {
        match self {
            Resolution::Match(value) => Some(value),
            Resolution::Unresolved => None,
        }
    }

    /// The matched value, or the given sentinel when unresolved.
    pub fn value_or<'a>(&'a self, sentinel: &'a str) -> &'a str {
        self.value().unwrap_or(sentinel)
    }
}

/// Configuration for an attribute resolver.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Fuzzy score must strictly exceed this to be accepted
    pub threshold: u32,

    /// Terms excluded from the substring phase
    pub substring_blocklist: HashSet<String>,

    /// Sentinel returned when the fuzzy winner is a blocklisted term.
    /// `None` means a blocklisted fuzzy winner is treated like any other.
    pub blocked_fuzzy_sentinel: Option<String>,

    /// Output mode for the substring phase
    pub mode: MatchMode,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_FUZZY_THRESHOLD,
            substring_blocklist: HashSet::new(),
            blocked_fuzzy_sentinel: None,
            mode: MatchMode::LongestMatch,
        }
    }
}

impl ResolverConfig {
    /// Material resolver: longest match, MOTOR/SPECIAL blocklisted in the
    /// substring phase, blocklisted fuzzy winners reported as a sentinel.
    pub fn material() -> Self {
        Self {
            substring_blocklist: ["MOTOR", "SPECIAL"]
                .iter()
                .map(|term| term.to_string())
                .collect(),
            blocked_fuzzy_sentinel: Some(MATERIAL_NOT_INFORMED.to_string()),
            ..Default::default()
        }
    }

    /// Norm resolver: longest match, no blocklist.
    pub fn norm() -> Self {
        Self::default()
    }

    /// Size-dimension resolver: longest match, no blocklist.
    pub fn size_dimension() -> Self {
        Self::default()
    }

    /// Nomenclature resolver: first hit wins, short-circuiting.
    pub fn nomenclature() -> Self {
        Self {
            mode: MatchMode::FirstMatch,
            ..Default::default()
        }
    }

    /// Replace the fuzzy threshold.
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Replace the output mode.
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Resolves a narrative to an attribute value over one vocabulary.
#[derive(Debug)]
pub struct AttributeResolver {
    vocabulary: Vocabulary,
    config: ResolverConfig,
}

impl AttributeResolver {
    /// Create a resolver over the given vocabulary.
    pub fn new(vocabulary: Vocabulary, config: ResolverConfig) -> Self {
        Self { vocabulary, config }
    }

    /// The vocabulary this resolver matches against.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Resolve a raw narrative to an attribute value.
    ///
    /// Absence of a match is never an error: an empty narrative, a fuzzy
    /// score at or below the threshold and an empty vocabulary all yield
    /// `Resolution::Unresolved`.
    pub fn resolve(&self, narrative: &str) -> Resolution {
        if narrative.trim().is_empty() {
            return Resolution::Unresolved;
        }
        let narrative = normalize(narrative);

        let hits = find_whole_word_terms(
            &narrative,
            &self.vocabulary.ordered,
            &self.config.substring_blocklist,
        );
        if !hits.is_empty() {
            // `ordered` is length-descending, so the first hit is the longest
            return match self.config.mode {
                MatchMode::LongestMatch | MatchMode::FirstMatch => {
                    Resolution::Match(hits[0].to_string())
                }
                MatchMode::AllMatches => Resolution::Match(hits.join(", ")),
            };
        }

        self.resolve_fuzzy(&narrative)
    }

    fn resolve_fuzzy(&self, narrative: &str) -> Resolution {
        let Some((term, score)) = best_match(narrative, &self.vocabulary.ordered) else {
            return Resolution::Unresolved;
        };

        // Sentinel check comes before the threshold check: a blocklisted
        // winner is reported even when its score would not have qualified.
        if self.config.substring_blocklist.contains(term) {
            if let Some(sentinel) = &self.config.blocked_fuzzy_sentinel {
                return Resolution::Match(sentinel.clone());
            }
        }

        if score > self.config.threshold {
            Resolution::Match(term.to_string())
        } else {
            Resolution::Unresolved
        }
    }
}
