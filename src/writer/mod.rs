//! CSV export of the enriched table
//!
//! Emits the input schema plus the two provenance columns, in a fixed
//! column order, so output is byte-reproducible for a given input. Nulls
//! are written as empty cells; floats use Rust's shortest round-trip
//! formatting.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::debug;

use crate::error::Result;
use crate::models::SsiRecord;
use crate::schema::{
    FACILITY_TYPE_COLUMN, MISSING_FLAG_COLUMN, MISSING_REASON_COLUMN, REQUIRED_COLUMNS,
};

/// Write the enriched table to a CSV file
///
/// # Errors
/// Returns IO/CSV errors for transport failures.
pub fn write_csv(path: &Path, records: &[SsiRecord]) -> Result<()> {
    debug!("Writing {} rows to {}", records.len(), path.display());
    let file = File::create(path)?;
    write_records(file, records)
}

/// Write the enriched table to any writer
///
/// The `Facility_Type` column is emitted only when at least one record
/// carries a value, mirroring its optional presence on input.
///
/// # Errors
/// Returns IO/CSV errors for transport failures.
pub fn write_records<W: Write>(output: W, records: &[SsiRecord]) -> Result<()> {
    let with_facility_type = records.iter().any(|r| r.facility_type.is_some());
    let mut writer = csv::Writer::from_writer(output);

    let mut header: Vec<&str> = Vec::with_capacity(REQUIRED_COLUMNS.len() + 3);
    header.push(REQUIRED_COLUMNS[0]); // Facility_ID
    if with_facility_type {
        header.push(FACILITY_TYPE_COLUMN);
    }
    header.extend(&REQUIRED_COLUMNS[1..]);
    header.push(MISSING_REASON_COLUMN);
    header.push(MISSING_FLAG_COLUMN);
    writer.write_record(&header)?;

    for record in records {
        let mut row: Vec<String> = Vec::with_capacity(header.len());
        row.push(record.facility_id.clone());
        if with_facility_type {
            row.push(record.facility_type.clone().unwrap_or_default());
        }
        row.push(record.hai.clone());
        row.push(record.operative_procedure.clone());
        row.push(record.year.to_string());
        row.push(format_opt(record.infections_predicted));
        row.push(format_opt(record.infections_reported));
        row.push(format_opt(record.sir));
        row.push(format_opt(record.sir_ci_lower));
        row.push(format_opt(record.sir_ci_upper));
        row.push(format_opt(record.sir_2015));
        row.push(
            record
                .comparison
                .map(|c| c.as_str().to_string())
                .unwrap_or_default(),
        );
        row.push(
            record
                .met_2020_goal
                .map(|g| g.as_str().to_string())
                .unwrap_or_default(),
        );
        row.push(
            record
                .sir_missing_reason
                .map(|r| r.as_str().to_string())
                .unwrap_or_default(),
        );
        row.push(record.sir_missing_flag.to_string());
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

fn format_opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
