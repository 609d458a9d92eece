/*!
 * Tests for the delimited-text sheet model
 */

use mdprep::errors::SheetError;
use mdprep::sheet::Sheet;

use crate::common;

/// Test loading a sheet file and addressing cells
#[test]
fn test_sheet_load_withWellFormedFile_shouldExposeCells() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "base.csv",
        "Item;Narrativa;Un\n100001;TUBO DE ACO;UN\n100002;VALVULA;PC\n",
    )
    .unwrap();

    let sheet = Sheet::load(&path).unwrap();
    assert_eq!(sheet.headers, vec!["Item", "Narrativa", "Un"]);
    assert_eq!(sheet.rows.len(), 2);
    assert_eq!(sheet.get(0, 1), "TUBO DE ACO");
    assert_eq!(sheet.get(1, 2), "PC");
    // out-of-range reads are empty, never a panic
    assert_eq!(sheet.get(9, 9), "");
}

/// Test that a missing file is a load error with the path in the message
#[test]
fn test_sheet_load_withMissingFile_shouldFailWithPath() {
    let result = Sheet::load("/nonexistent/base.csv");
    let err = result.unwrap_err();
    assert!(matches!(err, SheetError::LoadFailed { .. }));
    assert!(err.to_string().contains("/nonexistent/base.csv"));
}

/// Test storing into a nested directory and loading the result back
#[test]
fn test_sheet_store_withNestedPath_shouldCreateDirectories() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("sheets/out/working.csv");

    let mut sheet = Sheet::new("working.csv", vec!["A".to_string(), "B".to_string()]);
    sheet.push_row(vec!["valor; com delimitador".to_string(), "x".to_string()]);
    sheet.store(&path).unwrap();

    let loaded = Sheet::load(&path).unwrap();
    assert_eq!(loaded.get(0, 0), "valor; com delimitador");
}

/// Test that writing requires the destination column to exist
#[test]
fn test_sheet_requireColumn_withAbsentColumn_shouldNameSheetAndColumn() {
    let sheet = Sheet::parse("planilha_mestre.csv", "Item;Narrativa\n").unwrap();
    let err = sheet.require_column("SAP15").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("SAP15"));
    assert!(message.contains("planilha_mestre.csv"));
}

/// Test item counting against the descriptive-row convention
#[test]
fn test_sheet_itemCount_withDescriptiveRow_shouldExcludeIt() {
    let sheet = Sheet::parse(
        "t",
        "Item;Narrativa\nCódigo;Texto longo\n100001;TUBO\n100002;VALVULA\n",
    )
    .unwrap();
    assert_eq!(sheet.rows.len(), 3);
    assert_eq!(sheet.item_count(), 2);
    assert_eq!(sheet.count_nonempty(1), 2);
    assert_eq!(sheet.count_equals(1, "TUBO"), 1);
}
