use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings: file paths, matching
/// thresholds, destination column names and the log level. All thresholds
/// are named fields here so the matching engine never carries hidden
/// constants.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Input/output file paths
    #[serde(default)]
    pub paths: PathsConfig,

    /// Matching thresholds and limits
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Destination/source column names in the working sheet
    #[serde(default)]
    pub columns: ColumnsConfig,

    /// Fixed values stamped on every row that carries an item code
    #[serde(default = "default_fixed_values")]
    pub fixed_values: Vec<FixedValueConfig>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// A fixed value stamped into one column
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FixedValueConfig {
    /// Destination column name
    pub column: String,

    /// Value written into every coded row
    pub value: String,
}

fn default_fixed_values() -> Vec<FixedValueConfig> {
    vec![
        FixedValueConfig {
            column: "SAP10".to_string(),
            value: "10".to_string(),
        },
        FixedValueConfig {
            column: "SAP14".to_string(),
            value: "NDB".to_string(),
        },
    ]
}

/// File paths used by the pipeline
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PathsConfig {
    /// Model sheet (header + descriptive row)
    #[serde(default = "default_model_sheet")]
    pub model_sheet: String,

    /// One item code per line
    #[serde(default = "default_codes_file")]
    pub codes_file: String,

    /// Reference base sheet (code -> narrative / product group / unit)
    #[serde(default = "default_reference_base")]
    pub reference_base: String,

    /// Working sheet rewritten by every stage
    #[serde(default = "default_working_sheet")]
    pub working_sheet: String,

    /// Materials dictionary
    #[serde(default = "default_materials_dictionary")]
    pub materials_dictionary: String,

    /// Norms dictionary
    #[serde(default = "default_norms_dictionary")]
    pub norms_dictionary: String,

    /// Size-dimension dictionary
    #[serde(default = "default_size_dimension_dictionary")]
    pub size_dimension_dictionary: String,

    /// Nomenclature (material name) dictionary, used by the extraction report
    #[serde(default = "default_nomenclature_dictionary")]
    pub nomenclature_dictionary: String,

    /// Multi-language translation table
    #[serde(default = "default_translations_table")]
    pub translations_table: String,

    /// JSON run report
    #[serde(default = "default_report_file")]
    pub report_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            model_sheet: default_model_sheet(),
            codes_file: default_codes_file(),
            reference_base: default_reference_base(),
            working_sheet: default_working_sheet(),
            materials_dictionary: default_materials_dictionary(),
            norms_dictionary: default_norms_dictionary(),
            size_dimension_dictionary: default_size_dimension_dictionary(),
            nomenclature_dictionary: default_nomenclature_dictionary(),
            translations_table: default_translations_table(),
            report_file: default_report_file(),
        }
    }
}

/// Thresholds and limits of the matching engine
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchingConfig {
    /// Fuzzy score must strictly exceed this for attribute resolvers
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: u32,

    /// Fuzzy score must strictly exceed this for translation fallback
    #[serde(default = "default_fuzzy_threshold")]
    pub translation_fuzzy_threshold: u32,

    /// Canonical terms must be strictly longer than this to translate
    #[serde(default = "default_min_translation_term_length")]
    pub min_translation_term_length: usize,

    /// Narrative length above which the narrative-check column is marked
    #[serde(default = "default_narrative_check_limit")]
    pub narrative_check_limit: usize,

    /// Narrative length above which the size-dimension column is overridden
    #[serde(default = "default_size_dimension_limit")]
    pub size_dimension_limit: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: default_fuzzy_threshold(),
            translation_fuzzy_threshold: default_fuzzy_threshold(),
            min_translation_term_length: default_min_translation_term_length(),
            narrative_check_limit: default_narrative_check_limit(),
            size_dimension_limit: default_size_dimension_limit(),
        }
    }
}

/// Working-sheet column names
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ColumnsConfig {
    /// Narrative text filled from the reference base
    #[serde(default = "default_narrative_column")]
    pub narrative: String,

    /// Resolved material
    #[serde(default = "default_material_column")]
    pub material: String,

    /// Resolved norm/standard
    #[serde(default = "default_norms_column")]
    pub norms: String,

    /// Resolved size dimension
    #[serde(default = "default_size_dimension_column")]
    pub size_dimension: String,

    /// Product group copied from the reference base
    #[serde(default = "default_product_group_column")]
    pub product_group: String,

    /// Unit copied from the reference base
    #[serde(default = "default_unit_column")]
    pub unit: String,

    /// Narrative-check column marked for over-long narratives
    #[serde(default = "default_narrative_check_column")]
    pub narrative_check: String,

    /// Primary description column used as the first translation candidate;
    /// optional in the working sheet, the narrative is the fallback
    #[serde(default = "default_description_column")]
    pub description: String,

    /// Canonical-language column of the translation table
    #[serde(default = "default_canonical_language_column")]
    pub canonical_language: String,

    /// Reference-base column holding the item code
    #[serde(default = "default_reference_code_column")]
    pub reference_code: String,

    /// Reference-base column holding the narrative text
    #[serde(default = "default_reference_narrative_column")]
    pub reference_narrative: String,

    /// Reference-base column holding the product group
    #[serde(default = "default_reference_product_group_column")]
    pub reference_product_group: String,

    /// Reference-base column holding the unit
    #[serde(default = "default_reference_unit_column")]
    pub reference_unit: String,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            narrative: default_narrative_column(),
            material: default_material_column(),
            norms: default_norms_column(),
            size_dimension: default_size_dimension_column(),
            product_group: default_product_group_column(),
            unit: default_unit_column(),
            narrative_check: default_narrative_check_column(),
            description: default_description_column(),
            canonical_language: default_canonical_language_column(),
            reference_code: default_reference_code_column(),
            reference_narrative: default_reference_narrative_column(),
            reference_product_group: default_reference_product_group_column(),
            reference_unit: default_reference_unit_column(),
        }
    }
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_model_sheet() -> String { "sheets/model.csv".to_string() }
fn default_codes_file() -> String { "data/item_codes.csv".to_string() }
fn default_reference_base() -> String { "sheets/reference_base.csv".to_string() }
fn default_working_sheet() -> String { "sheets/working_sheet.csv".to_string() }
fn default_materials_dictionary() -> String { "data/materials_dictionary.txt".to_string() }
fn default_norms_dictionary() -> String { "data/norms_dictionary.txt".to_string() }
fn default_size_dimension_dictionary() -> String { "data/size_dimension_dictionary.txt".to_string() }
fn default_nomenclature_dictionary() -> String { "data/nomenclature_dictionary.txt".to_string() }
fn default_translations_table() -> String { "data/translations.csv".to_string() }
fn default_report_file() -> String { "logs/run_report.json".to_string() }

fn default_fuzzy_threshold() -> u32 { 80 }
fn default_min_translation_term_length() -> usize { 5 }
// The two length limits diverged upstream (141 vs 144); both are kept as
// independent named fields rather than silently unified.
fn default_narrative_check_limit() -> usize { 141 }
fn default_size_dimension_limit() -> usize { 144 }

fn default_narrative_column() -> String { "SAP123".to_string() }
fn default_material_column() -> String { "Coluna4".to_string() }
fn default_norms_column() -> String { "SAP17".to_string() }
fn default_size_dimension_column() -> String { "SAP15".to_string() }
fn default_product_group_column() -> String { "SAP6".to_string() }
fn default_unit_column() -> String { "SAP5".to_string() }
fn default_narrative_check_column() -> String { "Narrativa".to_string() }
fn default_description_column() -> String { "Descrição".to_string() }
fn default_canonical_language_column() -> String { "SAP1".to_string() }
fn default_reference_code_column() -> String { "Item".to_string() }
fn default_reference_narrative_column() -> String { "Narrativa".to_string() }
fn default_reference_product_group_column() -> String { "Fam Coml".to_string() }
fn default_reference_unit_column() -> String { "Un".to_string() }

impl Config {
    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            anyhow!("Failed to open config file {}: {}", path.as_ref().display(), e)
        })?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader).map_err(|e| {
            anyhow!("Failed to parse config file {}: {}", path.as_ref().display(), e)
        })?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.matching.fuzzy_threshold > 100 {
            return Err(anyhow!(
                "fuzzy_threshold must be within 0-100, got {}",
                self.matching.fuzzy_threshold
            ));
        }
        if self.matching.translation_fuzzy_threshold > 100 {
            return Err(anyhow!(
                "translation_fuzzy_threshold must be within 0-100, got {}",
                self.matching.translation_fuzzy_threshold
            ));
        }
        if self.matching.narrative_check_limit == 0 || self.matching.size_dimension_limit == 0 {
            return Err(anyhow!("narrative length limits must be greater than zero"));
        }
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            paths: PathsConfig::default(),
            matching: MatchingConfig::default(),
            columns: ColumnsConfig::default(),
            fixed_values: default_fixed_values(),
            log_level: LogLevel::default(),
        }
    }
}
