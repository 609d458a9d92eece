/*!
 * In-memory tabular sheet model with delimited-text load/store.
 *
 * Sheets are exchanged as semicolon-delimited UTF-8 text with double-quote
 * escaping; a quoted field may span delimiters and line breaks. The expected
 * layout for working sheets is:
 * - row 1: technical header (becomes `headers`)
 * - row 2: descriptive row (data row index 0, left untouched by stages)
 * - items from row 3 onwards (data row index `FIRST_ITEM_ROW`)
 *
 * Column lookup is tolerant of whitespace and case variation in headers, and
 * falls back to prefix matching for exporter artifacts like `_X000D_`
 * suffixes. Writing requires the destination column to exist: stages never
 * fabricate columns, a missing one is a fatal schema error.
 */

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::errors::SheetError;
use crate::text_normalizer::normalize_header;

/// Index of the first item row in the data rows (index 0 is descriptive).
pub const FIRST_ITEM_ROW: usize = 1;

/// Field delimiter used by every sheet file.
const DELIMITER: char = ';';

/// A loaded tabular sheet.
#[derive(Debug, Clone)]
pub struct Sheet {
    /// Display name used in error messages (usually the file name)
    pub name: String,

    /// Technical header row
    pub headers: Vec<String>,

    /// Data rows, all padded to `headers.len()` columns
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Create an empty sheet with the given headers.
    pub fn new(name: &str, headers: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Load a sheet from a semicolon-delimited file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SheetError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SheetError::LoadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&path.display().to_string(), &content)
    }

    /// Parse sheet content from an already-loaded string.
    pub fn parse(name: &str, content: &str) -> Result<Self, SheetError> {
        let mut records = split_records(content).into_iter();
        let headers = match records.next() {
            Some(fields) => fields,
            None => {
                return Err(SheetError::LoadFailed {
                    path: name.to_string(),
                    message: "sheet file is empty".to_string(),
                });
            }
        };

        let width = headers.len();
        let mut rows = Vec::new();
        for mut fields in records {
            fields.resize(width, String::new());
            rows.push(fields);
        }

        Ok(Self {
            name: name.to_string(),
            headers,
            rows,
        })
    }

    /// Store the sheet to a semicolon-delimited file, creating parent
    /// directories as needed.
    pub fn store<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .context(format!("Failed to create sheet directory: {}", parent.display()))?;
            }
        }
        let mut out = String::new();
        out.push_str(&join_fields(&self.headers));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&join_fields(row));
            out.push('\n');
        }
        fs::write(path, out).context(format!("Failed to write sheet: {}", path.display()))?;
        Ok(())
    }

    /// Look up a column index by header name, tolerant of whitespace and
    /// case. Falls back to prefix matching for exporter suffixes.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = normalize_header(name);
        if let Some(idx) = self
            .headers
            .iter()
            .position(|h| normalize_header(h) == wanted)
        {
            return Some(idx);
        }
        self.headers
            .iter()
            .position(|h| normalize_header(h).starts_with(&wanted) && !wanted.is_empty())
    }

    /// Look up a column index, failing loudly when the column is absent.
    pub fn require_column(&self, name: &str) -> Result<usize, SheetError> {
        self.column_index(name).ok_or_else(|| SheetError::MissingColumn {
            column: name.to_string(),
            sheet: self.name.clone(),
        })
    }

    /// Cell value at (row, column); empty string when out of range.
    pub fn get(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(|v| v.as_str())
            .unwrap_or("")
    }

    /// Overwrite a cell value.
    pub fn set(&mut self, row: usize, column: usize, value: &str) {
        if let Some(r) = self.rows.get_mut(row) {
            if let Some(cell) = r.get_mut(column) {
                *cell = value.to_string();
            }
        }
    }

    /// Append a data row, padded or truncated to the header width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Number of item rows (data rows excluding the descriptive row).
    pub fn item_count(&self) -> usize {
        self.rows.len().saturating_sub(FIRST_ITEM_ROW)
    }

    /// Build a key -> value map from two columns over all data rows
    /// (reference sheets carry no descriptive row). The first occurrence of
    /// a key wins; blank keys are skipped.
    pub fn key_map(&self, key_column: usize, value_column: usize) -> HashMap<String, String> {
        let mut map = HashMap::new();
        for row in self.rows.iter() {
            let key = row.get(key_column).map(|v| v.trim()).unwrap_or("");
            if key.is_empty() {
                continue;
            }
            let value = row.get(value_column).cloned().unwrap_or_default();
            map.entry(key.to_string()).or_insert(value);
        }
        map
    }

    /// Count non-empty cells of a column over the item rows.
    pub fn count_nonempty(&self, column: usize) -> usize {
        self.rows
            .iter()
            .skip(FIRST_ITEM_ROW)
            .filter(|row| !row.get(column).map(|v| v.trim().is_empty()).unwrap_or(true))
            .count()
    }

    /// Count item-row cells of a column equal to `value` (trimmed).
    pub fn count_equals(&self, column: usize, value: &str) -> usize {
        self.rows
            .iter()
            .skip(FIRST_ITEM_ROW)
            .filter(|row| row.get(column).map(|v| v.trim() == value).unwrap_or(false))
            .count()
    }
}

/// Split delimited content into records of fields, honoring double-quote
/// escaping. A quoted field may span delimiters and line breaks, so a
/// multi-line cell stays one cell; a row break is a newline outside quotes.
fn split_records(content: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.is_empty() => in_quotes = true,
            '\r' if !in_quotes && chars.peek() == Some(&'\n') => {}
            '\n' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
                records.push(std::mem::take(&mut fields));
            }
            c if c == DELIMITER && !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            c => current.push(c),
        }
    }
    // final record without a trailing newline
    if !current.is_empty() || !fields.is_empty() {
        fields.push(current);
        records.push(fields);
    }
    records
}

/// Join fields into one delimited line, quoting where needed.
fn join_fields(fields: &[String]) -> String {
    fields
        .iter()
        .map(|field| {
            if field.contains(DELIMITER) || field.contains('"') || field.contains('\n') {
                format!("\"{}\"", field.replace('"', "\"\""))
            } else {
                field.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string())
}
