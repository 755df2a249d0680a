//! Error handling for the SSI cleaning pipeline.
//!
//! Structural errors (missing columns, unparseable numeric values) abort the
//! run before any enriched output is produced. Rows left null after every
//! imputation tier has been exhausted are valid output, not errors, and are
//! reported through [`crate::pipeline::ImputationReport`] instead.

/// Errors that can occur while loading or cleaning a surveillance table
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// One or more required columns are absent from the input header
    #[error("schema error: missing required column(s): {}", missing.join(", "))]
    SchemaError {
        /// Names of the required columns that were not found
        missing: Vec<String>,
    },

    /// A value in a numeric column could not be parsed as a number
    #[error("type conversion error: column '{column}', data row {row}: cannot parse '{value}' as a number")]
    TypeConversionError {
        /// Name of the offending column
        column: String,
        /// 1-based data row index (the header row is not counted)
        row: usize,
        /// The raw value that failed to parse
        value: String,
    },

    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the CSV layer (malformed rows, encoding problems)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
