/*!
 * End-to-end tests for the enrichment pipeline
 */

use std::fs;

use mdprep::app_controller::Controller;
use mdprep::sheet::Sheet;

use crate::common;

/// Test a full pipeline run over the fixture workspace
#[test]
fn test_pipeline_run_withFullWorkspace_shouldEnrichEveryColumn() {
    let workspace = common::build_workspace().unwrap();
    let controller = Controller::with_config(workspace.config.clone()).unwrap();
    controller.run().unwrap();

    let working = Sheet::load(&workspace.config.paths.working_sheet).unwrap();
    let col = |name: &str| working.require_column(name).unwrap();
    let (narrative, material, norm, size) =
        (col("SAP123"), col("Coluna4"), col("SAP17"), col("SAP15"));
    let (group, unit) = (col("SAP6"), col("SAP5"));
    let (canonical, lang2, lang3) = (col("SAP1"), col("SAP2"), col("SAP3"));

    // descriptive row untouched, one item row per code in codes-file order
    assert_eq!(working.get(0, 0), "Código");
    assert_eq!(working.item_count(), 4);
    assert_eq!(working.get(1, 0), "100001");
    assert_eq!(working.get(4, 0), "100009");

    // 100001: narrative copied, material/norm/translations resolved
    assert_eq!(
        working.get(1, narrative),
        "VALVULA DE RETENCAO EM ACO INOX DIN 934"
    );
    assert_eq!(working.get(1, material), "ACO INOX");
    assert_eq!(working.get(1, norm), "DIN 934");
    assert_eq!(working.get(1, size), "");
    assert_eq!(working.get(1, group), "VAL");
    assert_eq!(working.get(1, unit), "UN");
    assert_eq!(working.get(1, canonical), "VALVULA DE RETENCAO");
    assert_eq!(working.get(1, lang2), "CHECK VALVE");
    assert_eq!(working.get(1, lang3), "VALVULA DE RETENCION");

    // 100002: abbreviation AI expanded before material matching
    assert_eq!(working.get(2, material), "ACO INOX");
    assert_eq!(working.get(2, size), "M8");
    assert_eq!(working.get(2, norm), "");
    assert_eq!(working.get(2, canonical), "PARAFUSO SEXTAVADO");
    assert_eq!(working.get(2, lang2), "HEX SCREW");
    // blank translation cell leaves the destination untouched
    assert_eq!(working.get(2, lang3), "");

    // 100003: blank reference narrative, nothing to resolve
    assert_eq!(working.get(3, narrative), "");
    assert_eq!(working.get(3, material), "");
    assert_eq!(working.get(3, group), "JUN");
    assert_eq!(working.get(3, unit), "KG");

    // 100009: absent from the reference base entirely
    assert_eq!(working.get(4, narrative), "");
    assert_eq!(working.get(4, group), "");
}

/// Test that fixed values land on every coded row and nowhere else
#[test]
fn test_pipeline_run_withFixedValues_shouldStampCodedRows() {
    let workspace = common::build_workspace().unwrap();
    let controller = Controller::with_config(workspace.config.clone()).unwrap();
    controller.run().unwrap();

    let working = Sheet::load(&workspace.config.paths.working_sheet).unwrap();
    let org = working.require_column("SAP10").unwrap();
    let deposit = working.require_column("SAP14").unwrap();

    for row in 1..working.rows.len() {
        assert_eq!(working.get(row, org), "10");
        assert_eq!(working.get(row, deposit), "NDB");
    }
    // descriptive row keeps its original text
    assert_eq!(working.get(0, org), "Org");
}

/// Test the length overrides against an over-long narrative
#[test]
fn test_pipeline_run_withLongNarrative_shouldOverrideDestinations() {
    let workspace = common::build_workspace().unwrap();
    common::set_long_narrative(&workspace, "100003", 150).unwrap();

    let controller = Controller::with_config(workspace.config.clone()).unwrap();
    controller.run().unwrap();

    let working = Sheet::load(&workspace.config.paths.working_sheet).unwrap();
    let size = working.require_column("SAP15").unwrap();
    let check = working.require_column("Narrativa").unwrap();

    // the override wins over whatever the resolvers wrote
    assert_eq!(working.get(3, size), "see basic data text");
    assert_eq!(working.get(3, check), "verificar internal comment");
    // short narratives stay untouched
    assert_eq!(working.get(1, check), "");

    // the override step reports the sentinel counts
    let content = fs::read_to_string(&workspace.config.paths.report_file).unwrap();
    let report: serde_json::Value = serde_json::from_str(&content).unwrap();
    let overrides = &report["steps"].as_array().unwrap()[9];
    assert_eq!(overrides["name"], "apply_narrative_overrides");
    assert_eq!(overrides["metrics"]["narrative_check_marked"], 1);
    assert_eq!(overrides["metrics"]["size_dimension_overridden"], 1);
}

/// Test that the run report records every stage
#[test]
fn test_pipeline_run_withFullWorkspace_shouldWriteReport() {
    let workspace = common::build_workspace().unwrap();
    let controller = Controller::with_config(workspace.config.clone()).unwrap();
    controller.run().unwrap();

    let content = fs::read_to_string(&workspace.config.paths.report_file).unwrap();
    let report: serde_json::Value = serde_json::from_str(&content).unwrap();

    assert_eq!(report["status"], "ok");
    let steps = report["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 10);
    assert_eq!(steps[0]["name"], "generate_base");
    assert_eq!(steps[9]["name"], "apply_narrative_overrides");
    for step in steps {
        assert_eq!(step["status"], "ok");
    }
    // reference-copy steps report how many cells the column ended up with
    assert_eq!(steps[1]["name"], "insert_narratives");
    assert_eq!(steps[1]["metrics"]["filled"], 2);
    assert_eq!(steps[1]["metrics"]["nonempty"], 2);

    // resolver steps account for every item row
    assert_eq!(steps[4]["name"], "resolve_materials");
    assert_eq!(steps[4]["metrics"]["total_rows"], 4);
    assert_eq!(
        steps[4]["metrics"]["resolved"].as_u64().unwrap()
            + steps[4]["metrics"]["unresolved"].as_u64().unwrap(),
        4
    );
}

/// Test that a missing destination column aborts the run and is reported
#[test]
fn test_pipeline_run_withMissingColumn_shouldFailAndReportError() {
    let workspace = common::build_workspace().unwrap();
    // rebuild the model sheet without the size-dimension column
    let headers = common::MODEL_HEADERS.replace("SAP15;", "");
    let descriptive = common::MODEL_DESCRIPTIVE_ROW.replace("Dimensão;", "");
    fs::write(
        &workspace.config.paths.model_sheet,
        format!("{}\n{}\n", headers, descriptive),
    )
    .unwrap();

    let controller = Controller::with_config(workspace.config.clone()).unwrap();
    let outcome = controller.run();
    assert!(outcome.is_err());
    assert!(outcome.unwrap_err().to_string().contains("SAP15"));

    let content = fs::read_to_string(&workspace.config.paths.report_file).unwrap();
    let report: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(report["status"], "error");
    let failed = report["steps"]
        .as_array()
        .unwrap()
        .iter()
        .find(|step| step["status"] == "error")
        .unwrap();
    assert!(failed["error"]["message"].as_str().unwrap().contains("SAP15"));
}

/// Test that a run without model inputs reuses the existing working sheet
#[test]
fn test_pipeline_run_withMissingModel_shouldReuseWorkingSheet() {
    let workspace = common::build_workspace().unwrap();
    let controller = Controller::with_config(workspace.config.clone()).unwrap();
    controller.run().unwrap();

    fs::remove_file(&workspace.config.paths.model_sheet).unwrap();
    controller.run().unwrap();

    let working = Sheet::load(&workspace.config.paths.working_sheet).unwrap();
    assert_eq!(working.item_count(), 4);
    assert_eq!(working.get(1, 0), "100001");
}
