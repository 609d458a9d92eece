/*!
 * Tests for application configuration functionality
 */

use mdprep::app_config::{Config, FixedValueConfig, LogLevel};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.matching.fuzzy_threshold, 80);
    assert_eq!(config.matching.translation_fuzzy_threshold, 80);
    assert_eq!(config.matching.min_translation_term_length, 5);
    assert_eq!(config.matching.narrative_check_limit, 141);
    assert_eq!(config.matching.size_dimension_limit, 144);

    assert_eq!(config.columns.narrative, "SAP123");
    assert_eq!(config.columns.material, "Coluna4");
    assert_eq!(config.columns.norms, "SAP17");
    assert_eq!(config.columns.size_dimension, "SAP15");
    assert_eq!(config.columns.canonical_language, "SAP1");

    assert_eq!(
        config.fixed_values,
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
    );

    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    // Thresholds are percentages
    config.matching.fuzzy_threshold = 101;
    assert!(config.validate().is_err());
    config.matching.fuzzy_threshold = 80;

    config.matching.translation_fuzzy_threshold = 200;
    assert!(config.validate().is_err());
    config.matching.translation_fuzzy_threshold = 80;

    // Length limits of zero would mark every row
    config.matching.narrative_check_limit = 0;
    assert!(config.validate().is_err());
    config.matching.narrative_check_limit = 141;
    assert!(config.validate().is_ok());
}

/// Test round trip through a config file
#[test]
fn test_config_fromFile_withSerializedDefault_shouldRoundTrip() {
    let dir = common::create_temp_dir().unwrap();
    let json = serde_json::to_string_pretty(&Config::default()).unwrap();
    let path = common::create_test_file(dir.path(), "conf.json", &json).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.matching.fuzzy_threshold, 80);
    assert_eq!(loaded.columns.narrative, "SAP123");
    assert_eq!(loaded.paths.working_sheet, "sheets/working_sheet.csv");
}

/// Test that a partial config file falls back to defaults per field
#[test]
fn test_config_fromFile_withPartialFile_shouldFillDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let json = r#"{ "matching": { "fuzzy_threshold": 75 }, "log_level": "debug" }"#;
    let path = common::create_test_file(dir.path(), "conf.json", json).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.matching.fuzzy_threshold, 75);
    assert_eq!(loaded.matching.translation_fuzzy_threshold, 80);
    assert_eq!(loaded.log_level, LogLevel::Debug);
    assert_eq!(loaded.columns.material, "Coluna4");
}

/// Test that an unreadable config file is an error, not a silent default
#[test]
fn test_config_fromFile_withMissingFile_shouldFail() {
    assert!(Config::from_file("/nonexistent/conf.json").is_err());
}
