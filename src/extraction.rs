/*!
 * Extraction report: mine attribute terms out of free-text comments.
 *
 * Unlike the enrichment pipeline, which fills columns of an existing working
 * sheet, extraction builds a fresh report sheet from scratch: one row per
 * input row, carrying every material and norm term found in the comment
 * text, the first nomenclature hit, and the nomenclature's translations
 * merged in from the translation table. Cells with no confident hit carry a
 * review marker instead of being left blank, so the report is directly
 * usable as a review worklist.
 */

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use log::info;

use crate::app_config::Config;
use crate::dictionary::{AbbreviationExpander, Vocabulary};
use crate::matching::{AttributeResolver, MatchMode, ResolverConfig, TranslationTable};
use crate::sheet::Sheet;
use crate::text_normalizer::normalize;

/// Review marker written where no confident term was found.
pub const VERIFY_MARKER: &str = "Verificar";

/// Output column holding the extracted material terms.
pub const BASIC_MATERIAL_COLUMN: &str = "Basic material";

/// Output column holding the extracted norm terms.
pub const NORM_COLUMN: &str = "Norma";

/// What to extract from and where to write the report.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Input sheet with one comment per row (header row, no descriptive row)
    pub input_sheet: String,

    /// Column holding the free-text comments
    pub comments_column: String,

    /// Column holding the item code carried over into the report
    pub code_column: String,

    /// Where the report sheet is written
    pub output_sheet: String,
}

/// Run the extraction flow, returning its metrics.
pub fn run(config: &Config, request: &ExtractionRequest) -> Result<BTreeMap<String, u64>> {
    let input = Sheet::load(&request.input_sheet)
        .context(format!("Failed to load input sheet: {}", request.input_sheet))?;
    let code_idx = input.require_column(&request.code_column)?;
    let comments_idx = input.require_column(&request.comments_column)?;

    let materials_vocabulary = Vocabulary::load(&config.paths.materials_dictionary)?;
    let norms_vocabulary = Vocabulary::load(&config.paths.norms_dictionary)?;
    let nomenclature_vocabulary = Vocabulary::load(&config.paths.nomenclature_dictionary)?;
    let expander = AbbreviationExpander::from_vocabularies(&[
        &materials_vocabulary,
        &norms_vocabulary,
        &nomenclature_vocabulary,
    ])?;

    let threshold = config.matching.fuzzy_threshold;
    let materials = AttributeResolver::new(
        materials_vocabulary,
        ResolverConfig::default()
            .with_mode(MatchMode::AllMatches)
            .with_threshold(threshold),
    );
    let norms = AttributeResolver::new(
        norms_vocabulary,
        ResolverConfig::default()
            .with_mode(MatchMode::AllMatches)
            .with_threshold(threshold),
    );
    let nomenclature = AttributeResolver::new(
        nomenclature_vocabulary,
        ResolverConfig::nomenclature().with_threshold(threshold),
    );

    let translations_sheet = Sheet::load(&config.paths.translations_table).context(format!(
        "Failed to load translation table: {}",
        config.paths.translations_table
    ))?;
    let table = TranslationTable::from_sheet(
        &translations_sheet,
        &config.columns.canonical_language,
        config.matching.translation_fuzzy_threshold,
    )?;

    let mut headers = vec![
        request.code_column.clone(),
        BASIC_MATERIAL_COLUMN.to_string(),
        NORM_COLUMN.to_string(),
        config.columns.canonical_language.clone(),
    ];
    headers.extend(table.languages().iter().cloned());
    headers.push(request.comments_column.clone());
    let mut output = Sheet::new(&request.output_sheet, headers);

    let mut materials_found = 0u64;
    let mut norms_found = 0u64;
    let mut names_found = 0u64;
    let mut translations_found = 0u64;

    // extraction inputs carry no descriptive row: every row is an item
    for row in 0..input.rows.len() {
        let code = input.get(row, code_idx).to_string();
        let comment = input.get(row, comments_idx);
        let prepared = expander.expand(&normalize(comment));

        let material = materials.resolve(&prepared);
        let norm = norms.resolve(&prepared);
        let name = nomenclature.resolve(&prepared);
        materials_found += u64::from(material.value().is_some());
        norms_found += u64::from(norm.value().is_some());
        names_found += u64::from(name.value().is_some());

        let record = name.value().and_then(|term| table.get(term));
        translations_found += u64::from(record.is_some());

        let mut fields = vec![
            code,
            material.value_or(VERIFY_MARKER).to_string(),
            norm.value_or(VERIFY_MARKER).to_string(),
            record
                .map(|r| r.canonical.clone())
                .unwrap_or_else(|| name.value_or(VERIFY_MARKER).to_string()),
        ];
        for slot in 0..table.languages().len() {
            fields.push(
                record
                    .and_then(|r| r.translations[slot].clone())
                    .unwrap_or_default(),
            );
        }
        fields.push(comment.to_string());
        output.push_row(fields);
    }

    output
        .store(&request.output_sheet)
        .context(format!("Failed to write report sheet: {}", request.output_sheet))?;

    let total = input.rows.len() as u64;
    info!(
        "Extraction report written to {}: {} rows, {} materials, {} norms, {} names, {} translated",
        request.output_sheet, total, materials_found, norms_found, names_found, translations_found
    );

    Ok(BTreeMap::from([
        ("total_rows".to_string(), total),
        ("materials_found".to_string(), materials_found),
        ("norms_found".to_string(), norms_found),
        ("names_found".to_string(), names_found),
        ("translations_found".to_string(), translations_found),
    ]))
}
