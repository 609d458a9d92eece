/*!
 * Narrative matching engine.
 *
 * The layered strategy every attribute column goes through:
 * 1. `substring`: whole-word containment of a vocabulary term, longest wins
 * 2. `fuzzy`: edit-distance ratio fallback, accepted only above a threshold
 * 3. `resolver`: composes the two phases with per-attribute post-rules
 *    (blocklists, single-best vs all-matches output)
 * 4. `translation`: longest-match-first lookup of multi-language records
 */

pub mod fuzzy;
pub mod resolver;
pub mod substring;
pub mod translation;

pub use fuzzy::{best_match, similarity_ratio};
pub use resolver::{AttributeResolver, MatchMode, Resolution, ResolverConfig};
pub use substring::{contains_whole_word, find_whole_word_terms};
pub use translation::{TranslationRecord, TranslationTable};
