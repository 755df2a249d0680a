//! Data models for SSI surveillance observations
//!
//! One [`SsiRecord`] represents a single (facility, year, procedure,
//! infection-type) observation row. The categorical fields derived by the
//! pipeline are modelled as dedicated enums so the exact surveillance
//! vocabulary ("Worse than National", "Below threshold (<0.2)", ...) lives
//! in one place.

pub mod record;
pub mod types;

pub use record::SsiRecord;
pub use types::{Comparison, GoalStatus, MissingReason};
