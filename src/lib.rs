/*!
 * # mdprep - Master Data Preparation Pipeline
 *
 * A Rust library for batch enrichment of master-data spreadsheets. Item
 * codes are expanded into fully attributed rows by matching each item's
 * free-text narrative against controlled vocabularies.
 *
 * ## Features
 *
 * - Generate a working sheet from a model sheet and a list of item codes
 * - Copy narratives, product groups and units from a reference base
 * - Resolve material, norm and size-dimension attributes by whole-word
 *   substring matching with a fuzzy fallback
 * - Expand dictionary abbreviations before matching
 * - Fill multi-language translation columns from a translation table
 * - Override over-long narratives with review sentinels
 * - Write a JSON run report after every stage
 * - Extract attribute terms from free-text comments into a review report
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `text_normalizer`: Narrative and header normalization
 * - `dictionary`: Vocabulary files and abbreviation expansion
 * - `matching`: The matching engine:
 *   - `matching::substring`: Whole-word substring scanning
 *   - `matching::fuzzy`: Edit-distance similarity scoring
 *   - `matching::resolver`: Configurable attribute resolvers
 *   - `matching::translation`: Translation table resolution
 * - `sheet`: Delimited-text sheet model
 * - `length_override`: Length-triggered field overrides
 * - `report`: JSON run report
 * - `app_controller`: The sequential pipeline controller
 * - `extraction`: Comment-mining report flow
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod dictionary;
pub mod errors;
pub mod extraction;
pub mod length_override;
pub mod matching;
pub mod report;
pub mod sheet;
pub mod text_normalizer;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use dictionary::{AbbreviationExpander, Vocabulary};
pub use matching::{AttributeResolver, MatchMode, Resolution, ResolverConfig, TranslationTable};
pub use errors::{AppError, DictionaryError, SheetError};
pub use sheet::Sheet;
