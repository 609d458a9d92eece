use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::collections::BTreeMap;
use std::path::Path;

use crate::app_config::Config;
use crate::dictionary::{AbbreviationExpander, Vocabulary};
use crate::length_override::{
    LengthOverride, SEE_BASIC_DATA_TEXT, VERIFY_INTERNAL_COMMENT,
};
use crate::matching::resolver::{AttributeResolver, ResolverConfig};
use crate::matching::translation::TranslationTable;
use crate::report::RunReport;
use crate::sheet::{FIRST_ITEM_ROW, Sheet};

// @module: Pipeline controller for sheet enrichment

type StepMetrics = BTreeMap<String, u64>;

/// Main application controller driving the enrichment pipeline.
///
/// Stages run strictly in sequence over one working sheet; every stage loads
/// the sheet from disk, rewrites it completely and stores it back before the
/// next stage reads it, so a run can be restarted between stages but not
/// within one.
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// Run the full pipeline, writing the JSON report after every stage.
    pub fn run(&self) -> Result<()> {
        let mut report = RunReport::new(self.report_paths());
        let outcome = self.run_stages(&mut report);
        if outcome.is_ok() {
            report.finish();
        }
        report.write(&self.config.paths.report_file)?;
        outcome
    }

    fn run_stages(&self, report: &mut RunReport) -> Result<()> {
        self.step(report, "generate_base", || self.generate_base())?;
        self.step(report, "insert_narratives", || {
            self.copy_from_reference(
                &self.config.columns.reference_narrative,
                &self.config.columns.narrative,
            )
        })?;
        self.step(report, "insert_product_group", || {
            self.copy_from_reference(
                &self.config.columns.reference_product_group,
                &self.config.columns.product_group,
            )
        })?;
        self.step(report, "insert_unit", || {
            self.copy_from_reference(
                &self.config.columns.reference_unit,
                &self.config.columns.unit,
            )
        })?;
        self.step(report, "resolve_materials", || {
            self.resolve_stage(
                &self.config.paths.materials_dictionary,
                ResolverConfig::material().with_threshold(self.config.matching.fuzzy_threshold),
                &self.config.columns.material,
                "materials",
            )
        })?;
        self.step(report, "resolve_norms", || {
            self.resolve_stage(
                &self.config.paths.norms_dictionary,
                ResolverConfig::norm().with_threshold(self.config.matching.fuzzy_threshold),
                &self.config.columns.norms,
                "norms",
            )
        })?;
        self.step(report, "resolve_size_dimensions", || {
            self.resolve_stage(
                &self.config.paths.size_dimension_dictionary,
                ResolverConfig::size_dimension()
                    .with_threshold(self.config.matching.fuzzy_threshold),
                &self.config.columns.size_dimension,
                "size dimensions",
            )
        })?;
        self.step(report, "resolve_translations", || self.resolve_translations())?;
        self.step(report, "apply_fixed_values", || self.apply_fixed_values())?;
        self.step(report, "apply_narrative_overrides", || {
            self.apply_narrative_overrides()
        })?;
        Ok(())
    }

    /// Run one step and persist the report regardless of the outcome.
    fn step<F>(&self, report: &mut RunReport, name: &str, step_fn: F) -> Result<()>
    where
        F: FnOnce() -> Result<StepMetrics>,
    {
        let outcome = report.run_step(name, step_fn);
        report.write(&self.config.paths.report_file)?;
        outcome.map(|_| ())
    }

    fn report_paths(&self) -> BTreeMap<String, String> {
        let paths = &self.config.paths;
        BTreeMap::from([
            ("model_sheet".to_string(), paths.model_sheet.clone()),
            ("codes_file".to_string(), paths.codes_file.clone()),
            ("reference_base".to_string(), paths.reference_base.clone()),
            ("working_sheet".to_string(), paths.working_sheet.clone()),
            ("report_file".to_string(), paths.report_file.clone()),
        ])
    }

    fn load_working_sheet(&self) -> Result<Sheet> {
        Ok(Sheet::load(&self.config.paths.working_sheet)?)
    }

    fn store_working_sheet(&self, sheet: &Sheet) -> Result<()> {
        sheet.store(&self.config.paths.working_sheet)
    }

    /// Generate the working sheet from the model sheet and codes file.
    ///
    /// When either input is missing an existing working sheet is reused;
    /// with no working sheet either, the run aborts.
    fn generate_base(&self) -> Result<StepMetrics> {
        let model_path = Path::new(&self.config.paths.model_sheet);
        let codes_path = Path::new(&self.config.paths.codes_file);

        if !model_path.exists() || !codes_path.exists() {
            if Path::new(&self.config.paths.working_sheet).exists() {
                warn!(
                    "Model sheet or codes file missing, reusing existing working sheet: {}",
                    self.config.paths.working_sheet
                );
                return Ok(StepMetrics::from([("reused_existing".to_string(), 1)]));
            }
            return Err(anyhow!(
                "Cannot generate working sheet: model '{}' or codes '{}' missing and no working sheet exists",
                self.config.paths.model_sheet,
                self.config.paths.codes_file
            ));
        }

        let model = Sheet::load(model_path)?;
        if model.rows.is_empty() {
            return Err(crate::errors::SheetError::TooFewRows {
                expected: 2,
                found: 1,
            }
            .into());
        }

        let codes = std::fs::read_to_string(codes_path)
            .context(format!("Failed to read codes file: {}", codes_path.display()))?;
        let codes: Vec<&str> = codes
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect();

        let mut working = Sheet::new(&self.config.paths.working_sheet, model.headers.clone());
        // keep the descriptive row, then one blank row per code
        working.push_row(model.rows[0].clone());
        for code in &codes {
            let mut row = vec![String::new(); working.headers.len()];
            row[0] = code.to_string();
            working.push_row(row);
        }
        self.store_working_sheet(&working)?;

        info!("Working sheet generated with {} item rows", codes.len());
        Ok(StepMetrics::from([(
            "item_rows".to_string(),
            codes.len() as u64,
        )]))
    }

    /// Copy a reference-base column into the working sheet, keyed by the
    /// item code in the first column.
    fn copy_from_reference(
        &self,
        reference_column: &str,
        dest_column: &str,
    ) -> Result<StepMetrics> {
        info!("Filling '{}' from reference '{}'", dest_column, reference_column);

        let reference = Sheet::load(&self.config.paths.reference_base)?;
        let ref_code_idx = reference.require_column(&self.config.columns.reference_code)?;
        let ref_value_idx = reference.require_column(reference_column)?;
        let values = reference.key_map(ref_code_idx, ref_value_idx);

        let mut working = self.load_working_sheet()?;
        let dest_idx = working.require_column(dest_column)?;

        let mut filled = 0u64;
        for row in FIRST_ITEM_ROW..working.rows.len() {
            let code = working.get(row, 0).trim().to_string();
            if code.is_empty() {
                continue;
            }
            if let Some(value) = values.get(&code) {
                if !value.trim().is_empty() {
                    let value = value.clone();
                    working.set(row, dest_idx, &value);
                    filled += 1;
                }
            }
        }
        self.store_working_sheet(&working)?;

        let total = working.item_count() as u64;
        info!("'{}' filled: {}/{} rows", dest_column, filled, total);
        Ok(StepMetrics::from([
            ("filled".to_string(), filled),
            // counted over the stored sheet, so reruns stay accurate
            ("nonempty".to_string(), working.count_nonempty(dest_idx) as u64),
            ("total_rows".to_string(), total),
        ]))
    }

    /// Abbreviation expander over the union of all run dictionaries.
    fn load_expander(&self) -> Result<AbbreviationExpander> {
        let materials = Vocabulary::load(&self.config.paths.materials_dictionary)?;
        let norms = Vocabulary::load(&self.config.paths.norms_dictionary)?;
        let sizes = Vocabulary::load(&self.config.paths.size_dimension_dictionary)?;
        AbbreviationExpander::from_vocabularies(&[&materials, &norms, &sizes])
    }

    /// Resolve one attribute column from the narrative for every item row.
    fn resolve_stage(
        &self,
        dictionary_path: &str,
        resolver_config: ResolverConfig,
        dest_column: &str,
        label: &str,
    ) -> Result<StepMetrics> {
        info!("Resolving {} (matching by narrative)...", label);

        let vocabulary = Vocabulary::load(dictionary_path)?;
        info!("Dictionary loaded: {} terms", vocabulary.len());
        let resolver = AttributeResolver::new(vocabulary, resolver_config);
        let expander = self.load_expander()?;

        let mut working = self.load_working_sheet()?;
        let narrative_idx = working.require_column(&self.config.columns.narrative)?;
        let dest_idx = working.require_column(dest_column)?;

        let progress = row_progress(working.item_count() as u64);
        let mut resolved = 0u64;
        let mut unresolved = 0u64;
        for row in FIRST_ITEM_ROW..working.rows.len() {
            let narrative = working.get(row, narrative_idx).to_string();
            let expanded = expander.expand(&crate::text_normalizer::normalize(&narrative));
            let resolution = resolver.resolve(&expanded);
            match resolution.value() {
                Some(value) => {
                    let value = value.to_string();
                    working.set(row, dest_idx, &value);
                    resolved += 1;
                }
                None => unresolved += 1,
            }
            progress.inc(1);
        }
        progress.finish_and_clear();
        self.store_working_sheet(&working)?;

        let total = working.item_count() as u64;
        info!("{} resolved: {}/{}", label, resolved, total);
        debug_assert_eq!(resolved + unresolved, total);
        Ok(StepMetrics::from([
            ("resolved".to_string(), resolved),
            ("unresolved".to_string(), unresolved),
            ("total_rows".to_string(), total),
        ]))
    }

    /// Fill the canonical and target-language columns from the translation
    /// table, matching on description first and narrative second.
    fn resolve_translations(&self) -> Result<StepMetrics> {
        info!("Resolving translations...");

        let table_sheet = Sheet::load(&self.config.paths.translations_table)?;
        let table = TranslationTable::from_sheet(
            &table_sheet,
            &self.config.columns.canonical_language,
            self.config.matching.translation_fuzzy_threshold,
        )?;
        info!("Translation table loaded: {} records", table.len());

        let mut working = self.load_working_sheet()?;
        let narrative_idx = working.require_column(&self.config.columns.narrative)?;
        let canonical_idx = working.require_column(&self.config.columns.canonical_language)?;
        // the description column is optional; the narrative is the fallback
        let description_idx = working.column_index(&self.config.columns.description);
        let language_indices: Vec<usize> = table
            .languages()
            .iter()
            .map(|language| working.require_column(language))
            .collect::<Result<_, _>>()?;

        let progress = row_progress(working.item_count() as u64);
        let mut resolved = 0u64;
        let mut unresolved = 0u64;
        for row in FIRST_ITEM_ROW..working.rows.len() {
            let description = description_idx
                .map(|idx| working.get(row, idx).to_string())
                .unwrap_or_default();
            let narrative = working.get(row, narrative_idx).to_string();
            let candidates = [description.as_str(), narrative.as_str()];

            match table.resolve(&candidates, self.config.matching.min_translation_term_length) {
                Some(record) => {
                    let canonical = record.canonical.clone();
                    let translations = record.translations.clone();
                    working.set(row, canonical_idx, &canonical);
                    for (idx, translation) in language_indices.iter().zip(&translations) {
                        if let Some(translation) = translation {
                            working.set(row, *idx, translation);
                        }
                    }
                    resolved += 1;
                }
                // no confident record: destination cells stay untouched
                None => unresolved += 1,
            }
            progress.inc(1);
        }
        progress.finish_and_clear();
        self.store_working_sheet(&working)?;

        let total = working.item_count() as u64;
        info!("Translations resolved: {}/{}", resolved, total);
        Ok(StepMetrics::from([
            ("resolved".to_string(), resolved),
            ("unresolved".to_string(), unresolved),
            ("total_rows".to_string(), total),
        ]))
    }

    /// Stamp the configured fixed values on every row carrying an item code.
    fn apply_fixed_values(&self) -> Result<StepMetrics> {
        info!("Applying fixed values...");

        let mut working = self.load_working_sheet()?;
        let columns: Vec<(usize, String)> = self
            .config
            .fixed_values
            .iter()
            .map(|fixed| {
                working
                    .require_column(&fixed.column)
                    .map(|idx| (idx, fixed.value.clone()))
            })
            .collect::<Result<_, _>>()?;

        let mut stamped = 0u64;
        for row in FIRST_ITEM_ROW..working.rows.len() {
            if working.get(row, 0).trim().is_empty() {
                continue;
            }
            for (idx, value) in &columns {
                working.set(row, *idx, value);
            }
            stamped += 1;
        }
        self.store_working_sheet(&working)?;

        info!("Fixed values applied: {} rows", stamped);
        Ok(StepMetrics::from([("stamped_rows".to_string(), stamped)]))
    }

    /// Apply the length-triggered overrides, after all resolvers have run.
    fn apply_narrative_overrides(&self) -> Result<StepMetrics> {
        info!("Applying narrative length overrides...");

        let mut working = self.load_working_sheet()?;
        let narrative_idx = working.require_column(&self.config.columns.narrative)?;
        let check_idx = working.require_column(&self.config.columns.narrative_check)?;
        let size_idx = working.require_column(&self.config.columns.size_dimension)?;

        let check_rule = LengthOverride::new(
            self.config.matching.narrative_check_limit,
            VERIFY_INTERNAL_COMMENT,
        );
        let size_rule = LengthOverride::new(
            self.config.matching.size_dimension_limit,
            SEE_BASIC_DATA_TEXT,
        );

        let check_applied = check_rule.apply(&mut working, narrative_idx, check_idx);
        let size_applied = size_rule.apply(&mut working, narrative_idx, size_idx);
        self.store_working_sheet(&working)?;

        info!(
            "Length overrides applied: {} narrative-check, {} size-dimension",
            check_applied, size_applied
        );
        // report totals are sentinel counts over the stored sheet, so a rerun
        // over an already marked sheet reports them all
        Ok(StepMetrics::from([
            (
                "narrative_check_marked".to_string(),
                working.count_equals(check_idx, VERIFY_INTERNAL_COMMENT) as u64,
            ),
            (
                "size_dimension_overridden".to_string(),
                working.count_equals(size_idx, SEE_BASIC_DATA_TEXT) as u64,
            ),
        ]))
    }
}

fn row_progress(total: u64) -> ProgressBar {
    let progress = ProgressBar::new(total);
    let template = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%)")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(template.progress_chars("█▓▒░"));
    progress
}
