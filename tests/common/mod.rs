/*!
 * Common test utilities for the mdprep test suite
 */

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

use mdprep::app_config::Config;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A complete on-disk workspace for pipeline tests: model sheet, codes file,
/// reference base, dictionaries and translation table, with a Config whose
/// paths point into the temporary directory.
pub struct TestWorkspace {
    pub dir: TempDir,
    pub config: Config,
}

/// Working-sheet header row used by the fixtures. Column 0 carries the item
/// code; the remaining columns match the default column configuration.
pub const MODEL_HEADERS: &str =
    "Item;SAP123;Coluna4;SAP17;SAP15;SAP6;SAP5;Narrativa;Descrição;SAP1;SAP2;SAP3;SAP10;SAP14";

/// Descriptive second row of the model sheet, copied untouched into the
/// working sheet.
pub const MODEL_DESCRIPTIVE_ROW: &str =
    "Código;Narrativa;Material;Norma;Dimensão;Família;Unidade;Verificação;Descrição;Nome;Nome EN;Nome ES;Org;Depósito";

/// Builds a workspace with four item codes:
/// - 100001: valve narrative, material/norm/translation all resolvable
/// - 100002: screw narrative with an abbreviation and a size term
/// - 100003: present in the reference base but with a blank narrative
/// - 100009: absent from the reference base
pub fn build_workspace() -> Result<TestWorkspace> {
    let dir = create_temp_dir()?;
    let root = dir.path();

    create_test_file(
        root,
        "sheets/model.csv",
        &format!("{}\n{}\n", MODEL_HEADERS, MODEL_DESCRIPTIVE_ROW),
    )?;
    create_test_file(root, "data/item_codes.csv", "100001\n100002\n100003\n100009\n")?;
    create_test_file(
        root,
        "sheets/reference_base.csv",
        "Item;Narrativa;Fam Coml;Un\n\
         100001;VALVULA DE RETENCAO EM ACO INOX DIN 934;VAL;UN\n\
         100002;PARAFUSO SEXTAVADO AI M8;PAR;PC\n\
         100003;;JUN;KG\n",
    )?;
    create_test_file(
        root,
        "data/materials_dictionary.txt",
        "ACO INOX\nBRONZE\nAI=ACO INOX\n",
    )?;
    create_test_file(root, "data/norms_dictionary.txt", "DIN 934\nASTM A105\n")?;
    create_test_file(root, "data/size_dimension_dictionary.txt", "M8\nDN 50\n")?;
    create_test_file(
        root,
        "data/nomenclature_dictionary.txt",
        "VALVULA DE RETENCAO\nPARAFUSO SEXTAVADO\n",
    )?;
    create_test_file(
        root,
        "data/translations.csv",
        "SAP1;SAP2;SAP3\n\
         VALVULA DE RETENCAO;CHECK VALVE;VALVULA DE RETENCION\n\
         PARAFUSO SEXTAVADO;HEX SCREW;TORNILLO HEXAGONAL\n",
    )?;

    let mut config = Config::default();
    let in_root = |relative: &str| root.join(relative).display().to_string();
    config.paths.model_sheet = in_root("sheets/model.csv");
    config.paths.codes_file = in_root("data/item_codes.csv");
    config.paths.reference_base = in_root("sheets/reference_base.csv");
    config.paths.working_sheet = in_root("sheets/working_sheet.csv");
    config.paths.materials_dictionary = in_root("data/materials_dictionary.txt");
    config.paths.norms_dictionary = in_root("data/norms_dictionary.txt");
    config.paths.size_dimension_dictionary = in_root("data/size_dimension_dictionary.txt");
    config.paths.nomenclature_dictionary = in_root("data/nomenclature_dictionary.txt");
    config.paths.translations_table = in_root("data/translations.csv");
    config.paths.report_file = in_root("logs/run_report.json");

    Ok(TestWorkspace { dir, config })
}

/// Replaces a row of the reference base with an over-long narrative for the
/// given code, keeping the enclosing fields intact.
pub fn set_long_narrative(workspace: &TestWorkspace, code: &str, length: usize) -> Result<()> {
    let path = &workspace.config.paths.reference_base;
    let content = fs::read_to_string(path)?;
    let narrative = format!("VALVULA ESFERA EM ACO INOX {}", "X".repeat(length));
    let rewritten: Vec<String> = content
        .lines()
        .map(|line| {
            if line.starts_with(&format!("{};", code)) {
                format!("{};{};VAL;UN", code, narrative)
            } else {
                line.to_string()
            }
        })
        .collect();
    fs::write(path, rewritten.join("\n") + "\n")?;
    Ok(())
}
