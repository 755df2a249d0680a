//! CSV ingestion for the surveillance table
//!
//! The reader validates the header against the required schema before any
//! data row is parsed, then converts each row into an [`SsiRecord`] with
//! typed per-column parsing. A numeric cell that fails to parse aborts the
//! load with the column name and 1-based data-row index.
//!
//! The surveillance export spells missing values as an empty cell or one of
//! the literal tokens `NA`, `N/A`, `NaN` (any case); those are nulls, not
//! type errors.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};

use crate::error::{PipelineError, Result};
use crate::models::{Comparison, GoalStatus, SsiRecord};
use crate::schema::ColumnIndex;

/// Read a surveillance table from a CSV file
///
/// # Errors
/// Returns [`PipelineError::SchemaError`] if a required column is missing,
/// [`PipelineError::TypeConversionError`] for unparseable numeric cells, and
/// IO/CSV errors for transport failures.
pub fn read_csv(path: &Path) -> Result<Vec<SsiRecord>> {
    debug!("Reading surveillance data from {}", path.display());
    let file = File::open(path)?;
    read_records(file)
}

/// Read a surveillance table from any reader (header row required, UTF-8)
///
/// # Errors
/// Same conditions as [`read_csv`].
pub fn read_records<R: Read>(input: R) -> Result<Vec<SsiRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut records = Vec::new();
    for (offset, row) in reader.records().enumerate() {
        let row = row?;
        records.push(parse_row(&columns, &row, offset + 1)?);
    }

    debug!("Parsed {} data rows", records.len());
    Ok(records)
}

/// Tokens the surveillance export uses for a missing value
fn is_null_token(value: &str) -> bool {
    value.is_empty()
        || value.eq_ignore_ascii_case("na")
        || value.eq_ignore_ascii_case("n/a")
        || value.eq_ignore_ascii_case("nan")
}

fn cell<'a>(row: &'a csv::StringRecord, index: usize) -> &'a str {
    row.get(index).unwrap_or("").trim()
}

fn parse_float(
    row: &csv::StringRecord,
    index: usize,
    column: &str,
    data_row: usize,
) -> Result<Option<f64>> {
    let raw = cell(row, index);
    if is_null_token(raw) {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| PipelineError::TypeConversionError {
            column: column.to_string(),
            row: data_row,
            value: raw.to_string(),
        })
}

fn parse_year(
    row: &csv::StringRecord,
    index: usize,
    data_row: usize,
) -> Result<i32> {
    let raw = cell(row, index);
    raw.parse::<i32>()
        .map_err(|_| PipelineError::TypeConversionError {
            column: "Year".to_string(),
            row: data_row,
            value: raw.to_string(),
        })
}

fn parse_string(row: &csv::StringRecord, index: usize) -> Option<String> {
    let raw = cell(row, index);
    if is_null_token(raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

fn parse_row(
    columns: &ColumnIndex,
    row: &csv::StringRecord,
    data_row: usize,
) -> Result<SsiRecord> {
    let comparison = parse_string(row, columns.comparison).and_then(|raw| {
        let parsed = Comparison::parse(&raw);
        if parsed.is_none() {
            warn!("Row {data_row}: unrecognized Comparison value '{raw}', treated as null");
        }
        parsed
    });
    let met_2020_goal = parse_string(row, columns.met_2020_goal).and_then(|raw| {
        let parsed = GoalStatus::parse(&raw);
        if parsed.is_none() {
            warn!("Row {data_row}: unrecognized Met_2020_Goal value '{raw}', treated as null");
        }
        parsed
    });

    let sir = parse_float(row, columns.sir, "SIR", data_row)?;
    let missing_flag = match columns.missing_flag {
        Some(index) => {
            let raw = cell(row, index);
            if is_null_token(raw) {
                u8::from(sir.is_none())
            } else {
                raw.parse::<u8>()
                    .map_err(|_| PipelineError::TypeConversionError {
                        column: "SIR_missing_flag".to_string(),
                        row: data_row,
                        value: raw.to_string(),
                    })?
            }
        }
        None => u8::from(sir.is_none()),
    };

    Ok(SsiRecord {
        facility_id: cell(row, columns.facility_id).to_string(),
        facility_type: columns
            .facility_type
            .and_then(|index| parse_string(row, index)),
        hai: cell(row, columns.hai).to_string(),
        operative_procedure: cell(row, columns.operative_procedure).to_string(),
        year: parse_year(row, columns.year, data_row)?,
        infections_predicted: parse_float(
            row,
            columns.infections_predicted,
            "Infections_Predicted",
            data_row,
        )?,
        infections_reported: parse_float(
            row,
            columns.infections_reported,
            "Infections_Reported",
            data_row,
        )?,
        sir,
        sir_ci_lower: parse_float(
            row,
            columns.sir_ci_lower,
            "SIR_CI_95_Lower_Limit",
            data_row,
        )?,
        sir_ci_upper: parse_float(
            row,
            columns.sir_ci_upper,
            "SIR_CI_95_Upper_Limit",
            data_row,
        )?,
        sir_2015: parse_float(row, columns.sir_2015, "SIR_2015", data_row)?,
        comparison,
        met_2020_goal,
        // Provenance is recomputed by the pipeline; parsed values are stale
        sir_missing_reason: None,
        sir_missing_flag: missing_flag,
    })
}
