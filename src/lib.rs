//! A Rust library for cleaning Surgical Site Infection (SSI) surveillance
//! data: schema validation, typed CSV ingestion, deterministic group-median
//! imputation of the Standardized Infection Ratio (SIR) and its dependent
//! fields, and aggregate summaries over the enriched table.
//!
//! The core is [`Pipeline`], a single deterministic, idempotent pass over
//! the table. Rows whose SIR is structurally undefined (predicted infection
//! count below the reporting threshold) are never fabricated; they end with
//! an explicit provenance flag instead.

pub mod analysis;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod reader;
pub mod schema;
pub mod writer;

// Re-export the most common types for easier use
// Core types
pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use models::{Comparison, GoalStatus, MissingReason, SsiRecord};
pub use pipeline::{ImputationReport, Pipeline};

// Table I/O
pub use reader::{read_csv, read_records};
pub use writer::{write_csv, write_records};

// Aggregates and hypothesis testing
pub use analysis::{SummaryReport, WelchTTest, summarize, welch_t_test};
