//! Schema validation for the surveillance table
//!
//! Validation happens against the header row alone, before any data row is
//! parsed, so a malformed file never produces a half-enriched table.

use std::collections::HashSet;

use crate::error::{PipelineError, Result};

/// Columns that must be present in the input header
pub const REQUIRED_COLUMNS: [&str; 12] = [
    "Facility_ID",
    "HAI",
    "Operative_Procedure",
    "Year",
    "Infections_Predicted",
    "Infections_Reported",
    "SIR",
    "SIR_CI_95_Lower_Limit",
    "SIR_CI_95_Upper_Limit",
    "SIR_2015",
    "Comparison",
    "Met_2020_Goal",
];

/// Optional facility category column, carried through when present
pub const FACILITY_TYPE_COLUMN: &str = "Facility_Type";

/// Output-only provenance columns (optional on input, always written)
pub const MISSING_REASON_COLUMN: &str = "SIR_Missing_Reason";
/// See [`MISSING_REASON_COLUMN`]
pub const MISSING_FLAG_COLUMN: &str = "SIR_missing_flag";

/// Check that every required column is present in the header
///
/// # Errors
/// Returns [`PipelineError::SchemaError`] listing every missing column.
pub fn validate_header(headers: &csv::StringRecord) -> Result<()> {
    let present: HashSet<&str> = headers.iter().collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !present.contains(**name))
        .map(|name| (*name).to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::SchemaError { missing })
    }
}

/// Resolved column positions for one input file
///
/// Built once from the header and reused for every data row; construction
/// performs the schema validation.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    pub facility_id: usize,
    pub hai: usize,
    pub operative_procedure: usize,
    pub year: usize,
    pub infections_predicted: usize,
    pub infections_reported: usize,
    pub sir: usize,
    pub sir_ci_lower: usize,
    pub sir_ci_upper: usize,
    pub sir_2015: usize,
    pub comparison: usize,
    pub met_2020_goal: usize,
    /// Present only when the input carries a `Facility_Type` column
    pub facility_type: Option<usize>,
    /// Present only when re-reading an already-enriched file
    pub missing_flag: Option<usize>,
}

impl ColumnIndex {
    /// Resolve column positions from the header row
    ///
    /// # Errors
    /// Returns [`PipelineError::SchemaError`] if any required column is absent.
    pub fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        validate_header(headers)?;

        let position = |name: &str| -> usize {
            // validate_header guarantees every required column exists
            headers.iter().position(|h| h == name).unwrap_or_default()
        };
        let optional =
            |name: &str| -> Option<usize> { headers.iter().position(|h| h == name) };

        Ok(Self {
            facility_id: position("Facility_ID"),
            hai: position("HAI"),
            operative_procedure: position("Operative_Procedure"),
            year: position("Year"),
            infections_predicted: position("Infections_Predicted"),
            infections_reported: position("Infections_Reported"),
            sir: position("SIR"),
            sir_ci_lower: position("SIR_CI_95_Lower_Limit"),
            sir_ci_upper: position("SIR_CI_95_Upper_Limit"),
            sir_2015: position("SIR_2015"),
            comparison: position("Comparison"),
            met_2020_goal: position("Met_2020_Goal"),
            facility_type: optional(FACILITY_TYPE_COLUMN),
            missing_flag: optional(MISSING_FLAG_COLUMN),
        })
    }
}
