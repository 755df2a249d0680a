//! Aggregate summaries over the enriched table
//!
//! These are the data products the surveillance dashboard renders: median
//! SIR by year, median SIR by facility type, and Met_2020_Goal counts by
//! year. They consume the enriched table only and never mutate it.

pub mod welch;

use std::fmt;

use itertools::Itertools;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::models::{GoalStatus, SsiRecord};
use crate::pipeline::impute::median;

pub use welch::{WelchTTest, welch_t_test};

/// Met_2020_Goal tallies for one surveillance year
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GoalCounts {
    /// Surveillance year
    pub year: i32,
    /// Rows that met the goal
    pub met: usize,
    /// Rows that did not meet the goal
    pub not_met: usize,
    /// Rows where the goal is undefined
    pub undetermined: usize,
}

/// Median SIR per surveillance year, sorted by year
#[must_use]
pub fn median_sir_by_year(records: &[SsiRecord]) -> Vec<(i32, f64)> {
    median_by_key(records, |r| r.year)
}

/// Median SIR per facility type, sorted by type label
///
/// Rows without a facility type are skipped; the column is optional in the
/// source export.
#[must_use]
pub fn median_sir_by_facility_type(records: &[SsiRecord]) -> Vec<(String, f64)> {
    let mut groups: FxHashMap<String, Vec<f64>> = FxHashMap::default();
    for record in records {
        if let (Some(facility_type), Some(sir)) = (record.facility_type.as_ref(), record.sir) {
            groups.entry(facility_type.clone()).or_default().push(sir);
        }
    }
    groups
        .into_iter()
        .filter_map(|(key, mut values)| median(&mut values).map(|m| (key, m)))
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .collect()
}

/// Met_2020_Goal tallies per year, sorted by year
#[must_use]
pub fn goal_counts_by_year(records: &[SsiRecord]) -> Vec<GoalCounts> {
    let mut counts: FxHashMap<i32, GoalCounts> = FxHashMap::default();
    for record in records {
        let entry = counts.entry(record.year).or_insert(GoalCounts {
            year: record.year,
            ..GoalCounts::default()
        });
        match record.met_2020_goal {
            Some(GoalStatus::Yes) => entry.met += 1,
            Some(GoalStatus::No) => entry.not_met += 1,
            None => entry.undetermined += 1,
        }
    }
    counts
        .into_values()
        .sorted_by_key(|c| c.year)
        .collect()
}

/// Split SIR values into low-volume and high-volume cohorts
///
/// The split point is the table-wide median of predicted infections, a
/// proxy for procedure volume; rows at or above the median go to the
/// high-volume cohort. Returns `None` when no row has both a predicted
/// count and a resolved SIR.
#[must_use]
pub fn sir_volume_cohorts(records: &[SsiRecord]) -> Option<(Vec<f64>, Vec<f64>)> {
    let mut predicted: Vec<f64> = records
        .iter()
        .filter_map(|r| r.infections_predicted)
        .collect();
    let split = median(&mut predicted)?;

    let mut low = Vec::new();
    let mut high = Vec::new();
    for record in records {
        let (Some(p), Some(sir)) = (record.infections_predicted, record.sir) else {
            continue;
        };
        if p < split {
            low.push(sir);
        } else {
            high.push(sir);
        }
    }
    if low.is_empty() && high.is_empty() {
        None
    } else {
        Some((low, high))
    }
}

/// Aggregates the dashboard renders from the enriched table
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    /// Total rows summarized
    pub rows: usize,
    /// Median SIR per surveillance year
    pub median_sir_by_year: Vec<(i32, f64)>,
    /// Median SIR per facility type (empty when the column is absent)
    pub median_sir_by_facility_type: Vec<(String, f64)>,
    /// Met_2020_Goal tallies per year
    pub goal_counts_by_year: Vec<GoalCounts>,
}

/// Build the full summary over an enriched table
#[must_use]
pub fn summarize(records: &[SsiRecord]) -> SummaryReport {
    SummaryReport {
        rows: records.len(),
        median_sir_by_year: median_sir_by_year(records),
        median_sir_by_facility_type: median_sir_by_facility_type(records),
        goal_counts_by_year: goal_counts_by_year(records),
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Surveillance Summary ({} rows):", self.rows)?;
        writeln!(f, "  Median SIR by year:")?;
        for (year, sir) in &self.median_sir_by_year {
            writeln!(f, "    {year}: {sir:.3}")?;
        }
        if !self.median_sir_by_facility_type.is_empty() {
            writeln!(f, "  Median SIR by facility type:")?;
            for (facility_type, sir) in &self.median_sir_by_facility_type {
                writeln!(f, "    {facility_type}: {sir:.3}")?;
            }
        }
        writeln!(f, "  Met 2020 Goal by year:")?;
        for counts in &self.goal_counts_by_year {
            writeln!(
                f,
                "    {}: {} met, {} not met, {} undetermined",
                counts.year, counts.met, counts.not_met, counts.undetermined
            )?;
        }
        Ok(())
    }
}

fn median_by_key<K: Eq + std::hash::Hash + Ord + Copy>(
    records: &[SsiRecord],
    key: impl Fn(&SsiRecord) -> K,
) -> Vec<(K, f64)> {
    let mut groups: FxHashMap<K, Vec<f64>> = FxHashMap::default();
    for record in records {
        if let Some(sir) = record.sir {
            groups.entry(key(record)).or_default().push(sir);
        }
    }
    groups
        .into_iter()
        .filter_map(|(k, mut values)| median(&mut values).map(|m| (k, m)))
        .sorted_by_key(|entry| entry.0)
        .collect()
}
