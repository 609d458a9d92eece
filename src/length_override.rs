/*!
 * Length-triggered override.
 *
 * A narrative longer than a fixed character limit cannot be carried in the
 * destination field, so the field is overwritten with a sentinel pointing
 * the reader elsewhere. The override runs after resolver assignment and
 * always wins over any value a resolver wrote.
 */

use crate::sheet::{FIRST_ITEM_ROW, Sheet};

/// Sentinel written into the size-dimension column for over-long narratives.
pub const SEE_BASIC_DATA_TEXT: &str = "see basic data text";

/// Sentinel written into the narrative-check column for over-long narratives.
pub const VERIFY_INTERNAL_COMMENT: &str = "verificar internal comment";

/// One length-triggered override rule.
#[derive(Debug, Clone)]
pub struct LengthOverride {
    /// Narrative character count must strictly exceed this to trigger
    pub limit: usize,

    /// Value forced into the destination cell
    pub sentinel: String,
}

impl LengthOverride {
    /// Create an override rule.
    pub fn new(limit: usize, sentinel: &str) -> Self {
        Self {
            limit,
            sentinel: sentinel.to_string(),
        }
    }

    /// Apply the rule over every item row of the sheet, returning how many
    /// cells were overridden.
    pub fn apply(&self, sheet: &mut Sheet, narrative_column: usize, dest_column: usize) -> usize {
        let mut overridden = 0;
        for row in FIRST_ITEM_ROW..sheet.rows.len() {
            let length = sheet.get(row, narrative_column).chars().count();
            if length > self.limit {
                sheet.set(row, dest_column, &self.sentinel);
                overridden += 1;
            }
        }
        overridden
    }
}
