//! The SIR imputation pipeline
//!
//! One deterministic pass over the table, in a fixed stage order:
//!
//! 1. direct SIR computation for rows above the predicted-count threshold
//! 2. group-median SIR imputation over (HAI, Operative_Procedure)
//! 3. the same group-median fill for each CI bound, independently
//! 4. Comparison derivation from the resolved CI bounds (fill-if-null)
//! 5. Met_2020_Goal derivation from the resolved SIR (fill-if-null)
//! 6. three-tier SIR_2015 imputation, ending in a global-median fallback
//! 7. missing-reason and missing-flag assignment, recomputed for every row
//!
//! The pass is idempotent: re-running it on its own output never changes a
//! resolved value, because every rule only touches nulls except stage 7,
//! which recomputes the provenance fields to the same values.

pub mod derive;
pub mod impute;
pub mod report;

use log::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::models::SsiRecord;

pub use report::{ImputationReport, RemainingNulls};

/// The SIR imputation pipeline
///
/// Pure function of its input table: no shared state across invocations, no
/// external resources. Schema and type validation have already happened in
/// the reader, so the run itself cannot fail.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline with custom thresholds
    #[must_use]
    pub const fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage over the table and report what was filled
    pub fn run(&self, records: &mut [SsiRecord]) -> ImputationReport {
        let mut report = ImputationReport {
            rows: records.len(),
            ..ImputationReport::default()
        };
        if records.is_empty() {
            debug!("Empty table, nothing to impute");
            return report;
        }

        report.sir_direct = self.compute_direct_sir(records);
        debug!("Stage 1: computed {} SIR values directly", report.sir_direct);

        let outcome = impute::fill_group_median(
            records,
            SsiRecord::procedure_key,
            |r| r.sir,
            |r, v| r.sir = Some(v),
            |_| true,
        );
        report.sir_imputed = outcome.filled;
        report.empty_partitions += outcome.empty_partitions;
        if outcome.unfilled > 0 {
            warn!(
                "Stage 2: {} SIR value(s) left null across {} partition(s) with no donors",
                outcome.unfilled, outcome.empty_partitions
            );
        }

        let outcome = impute::fill_group_median(
            records,
            SsiRecord::procedure_key,
            |r| r.sir_ci_lower,
            |r, v| r.sir_ci_lower = Some(v),
            |_| true,
        );
        report.ci_lower_imputed = outcome.filled;
        report.empty_partitions += outcome.empty_partitions;
        let outcome = impute::fill_group_median(
            records,
            SsiRecord::procedure_key,
            |r| r.sir_ci_upper,
            |r, v| r.sir_ci_upper = Some(v),
            |_| true,
        );
        report.ci_upper_imputed = outcome.filled;
        report.empty_partitions += outcome.empty_partitions;

        for record in records.iter_mut() {
            if record.comparison.is_none() {
                record.comparison = derive::derive_comparison(record);
                if record.comparison.is_some() {
                    report.comparison_derived += 1;
                }
            }
            if record.met_2020_goal.is_none() {
                record.met_2020_goal = derive::derive_goal(record, &self.config);
                if record.met_2020_goal.is_some() {
                    report.goal_derived += 1;
                }
            }
        }

        self.impute_sir_2015(records, &mut report);

        for record in records.iter_mut() {
            record.sir_missing_reason = Some(derive::missing_reason(record, &self.config));
            record.sir_missing_flag = u8::from(record.sir.is_none());
        }

        report.remaining = count_remaining_nulls(records);
        info!(
            "Pipeline complete: {} rows, {} SIR direct, {} SIR imputed, {} SIR still null",
            report.rows, report.sir_direct, report.sir_imputed, report.remaining.sir
        );
        report
    }

    /// Stage 1: SIR = reported / predicted where the threshold allows it
    fn compute_direct_sir(&self, records: &mut [SsiRecord]) -> usize {
        let threshold = self.config.predicted_threshold;
        let mut computed = 0;
        for record in records.iter_mut() {
            if record.sir.is_some() {
                continue;
            }
            let (Some(predicted), Some(reported)) =
                (record.infections_predicted, record.infections_reported)
            else {
                continue;
            };
            if predicted >= threshold && predicted != 0.0 {
                record.sir = Some(reported / predicted);
                computed += 1;
            }
        }
        computed
    }

    /// Stage 6: three-tier SIR_2015 fallback
    ///
    /// Tier (a) gates its target rows on the predicted-count threshold; the
    /// later tiers are ungated, mirroring the published cleaning logic.
    fn impute_sir_2015(&self, records: &mut [SsiRecord], report: &mut ImputationReport) {
        let threshold = self.config.predicted_threshold;
        let outcome = impute::fill_group_median(
            records,
            SsiRecord::facility_key,
            |r| r.sir_2015,
            |r, v| r.sir_2015 = Some(v),
            |r| r.infections_predicted.is_some_and(|p| p >= threshold),
        );
        report.sir_2015_facility_imputed = outcome.filled;

        let outcome = impute::fill_group_median(
            records,
            |r| r.hai.clone(),
            |r| r.sir_2015,
            |r, v| r.sir_2015 = Some(v),
            |_| true,
        );
        report.sir_2015_hai_imputed = outcome.filled;

        let outcome =
            impute::fill_global_median(records, |r| r.sir_2015, |r, v| r.sir_2015 = Some(v));
        report.sir_2015_global_imputed = outcome.filled;
        if outcome.unfilled > 0 {
            warn!(
                "SIR_2015 column has no values at all; {} row(s) remain null",
                outcome.unfilled
            );
        }
    }
}

fn count_remaining_nulls(records: &[SsiRecord]) -> RemainingNulls {
    RemainingNulls {
        sir: records.iter().filter(|r| r.sir.is_none()).count(),
        sir_ci_lower: records.iter().filter(|r| r.sir_ci_lower.is_none()).count(),
        sir_ci_upper: records.iter().filter(|r| r.sir_ci_upper.is_none()).count(),
        sir_2015: records.iter().filter(|r| r.sir_2015.is_none()).count(),
        comparison: records.iter().filter(|r| r.comparison.is_none()).count(),
        met_2020_goal: records
            .iter()
            .filter(|r| r.met_2020_goal.is_none())
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Comparison, GoalStatus, MissingReason};

    fn base(facility: &str, hai: &str, year: i32) -> SsiRecord {
        SsiRecord::new(facility, hai, "Colon surgery", year)
    }

    #[test]
    fn test_direct_computation_is_exact_ratio() {
        let mut r = base("230001", "SSI", 2022);
        r.infections_predicted = Some(2.0);
        r.infections_reported = Some(1.0);
        let mut records = vec![r];
        let report = Pipeline::default().run(&mut records);
        assert_eq!(report.sir_direct, 1);
        assert_eq!(records[0].sir, Some(0.5));
        assert_eq!(
            records[0].sir_missing_reason,
            Some(MissingReason::Calculated)
        );
        assert_eq!(records[0].sir_missing_flag, 0);
    }

    #[test]
    fn test_below_threshold_row_stays_null() {
        let mut r = base("230001", "SSI", 2022);
        r.infections_predicted = Some(0.1);
        r.infections_reported = Some(1.0);
        let mut records = vec![r];
        let report = Pipeline::default().run(&mut records);
        assert_eq!(report.sir_direct, 0);
        assert_eq!(records[0].sir, None);
        assert_eq!(
            records[0].sir_missing_reason,
            Some(MissingReason::BelowThreshold)
        );
        assert_eq!(records[0].sir_missing_flag, 1);
        assert_eq!(report.remaining.sir, 1);
    }

    #[test]
    fn test_group_imputed_sir_equals_partition_median() {
        let mut donor_a = base("230001", "SSI", 2022);
        donor_a.infections_predicted = Some(1.0);
        donor_a.infections_reported = Some(1.0); // SIR 1.0
        let mut donor_b = base("230002", "SSI", 2022);
        donor_b.infections_predicted = Some(2.0);
        donor_b.infections_reported = Some(1.0); // SIR 0.5
        let mut target = base("230003", "SSI", 2022);
        target.infections_predicted = Some(0.1);

        let mut records = vec![donor_a, donor_b, target];
        let report = Pipeline::default().run(&mut records);
        assert_eq!(report.sir_direct, 2);
        assert_eq!(report.sir_imputed, 1);
        // median of the directly-computed values [0.5, 1.0]
        assert_eq!(records[2].sir, Some(0.75));
        // imputed SIR counts as calculated
        assert_eq!(
            records[2].sir_missing_reason,
            Some(MissingReason::Calculated)
        );
        assert_eq!(records[2].sir_missing_flag, 0);
    }

    #[test]
    fn test_comparison_and_goal_fill_if_null_only() {
        let mut preset = base("230001", "SSI", 2022);
        preset.infections_predicted = Some(1.0);
        preset.infections_reported = Some(2.0); // SIR 2.0, would derive "No"
        preset.sir_ci_lower = Some(1.2);
        preset.sir_ci_upper = Some(1.5); // would derive "Worse than National"
        preset.comparison = Some(Comparison::NoDifferent);
        preset.met_2020_goal = Some(GoalStatus::Yes);

        let mut records = vec![preset];
        let report = Pipeline::default().run(&mut records);
        assert_eq!(report.comparison_derived, 0);
        assert_eq!(report.goal_derived, 0);
        assert_eq!(records[0].comparison, Some(Comparison::NoDifferent));
        assert_eq!(records[0].met_2020_goal, Some(GoalStatus::Yes));
    }

    #[test]
    fn test_comparison_stays_null_without_ci_donors() {
        let mut r = base("230001", "SSI", 2022);
        r.infections_predicted = Some(1.0);
        r.infections_reported = Some(1.0);
        let mut records = vec![r];
        let report = Pipeline::default().run(&mut records);
        assert_eq!(records[0].comparison, None);
        assert_eq!(report.remaining.comparison, 1);
        assert_eq!(report.remaining.sir_ci_lower, 1);
    }

    #[test]
    fn test_goal_undefined_before_2021() {
        let mut r = base("230001", "SSI", 2020);
        r.infections_predicted = Some(1.0);
        r.infections_reported = Some(0.5);
        let mut records = vec![r];
        Pipeline::default().run(&mut records);
        assert_eq!(records[0].sir, Some(0.5));
        assert_eq!(records[0].met_2020_goal, None);
    }

    #[test]
    fn test_sir_2015_three_tier_fallback() {
        // facility-tier donor for (230001, SSI)
        let mut facility_donor = base("230001", "SSI", 2021);
        facility_donor.sir_2015 = Some(0.8);
        facility_donor.infections_predicted = Some(1.0);
        facility_donor.infections_reported = Some(1.0);

        // eligible facility-tier target (above threshold)
        let mut facility_target = base("230001", "SSI", 2022);
        facility_target.infections_predicted = Some(1.0);
        facility_target.infections_reported = Some(1.0);

        // below threshold, misses tier (a), caught by the HAI tier
        let mut hai_target = base("230002", "SSI", 2022);
        hai_target.infections_predicted = Some(0.1);

        // no donors anywhere in its HAI, caught by the global tier
        let mut global_target = base("230003", "CLABSI", 2022);
        global_target.infections_predicted = Some(1.0);
        global_target.infections_reported = Some(2.0);

        let mut records = vec![facility_donor, facility_target, hai_target, global_target];
        let report = Pipeline::default().run(&mut records);

        assert_eq!(report.sir_2015_facility_imputed, 1);
        assert_eq!(records[1].sir_2015, Some(0.8));
        assert_eq!(report.sir_2015_hai_imputed, 1);
        assert_eq!(records[2].sir_2015, Some(0.8));
        assert_eq!(report.sir_2015_global_imputed, 1);
        assert_eq!(records[3].sir_2015, Some(0.8));
        assert_eq!(report.remaining.sir_2015, 0);
    }

    #[test]
    fn test_empty_table_is_a_no_op() {
        let mut records: Vec<SsiRecord> = Vec::new();
        let report = Pipeline::default().run(&mut records);
        assert_eq!(report.rows, 0);
        assert!(records.is_empty());
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let mut records = Vec::new();
        for (i, predicted) in [2.0, 1.5, 0.1, 4.0].iter().enumerate() {
            let mut r = base(&format!("23000{i}"), "SSI", 2022);
            r.infections_predicted = Some(*predicted);
            r.infections_reported = Some(1.0);
            records.push(r);
        }
        records[1].sir_ci_lower = Some(0.4);
        records[1].sir_ci_upper = Some(0.9);
        records[3].sir_2015 = Some(1.1);

        let pipeline = Pipeline::default();
        pipeline.run(&mut records);
        let enriched = records.clone();
        let second = pipeline.run(&mut records);
        assert_eq!(records, enriched);
        // nothing new to compute or impute the second time around
        assert_eq!(second.sir_direct, 0);
        assert_eq!(second.sir_imputed, 0);
        assert_eq!(second.sir_2015_global_imputed, 0);
    }

    #[test]
    fn test_every_row_gets_exactly_one_missing_reason() {
        let mut records = Vec::new();
        for predicted in [Some(2.0), Some(0.1), None] {
            let mut r = base("230001", "CAUTI", 2022);
            r.infections_predicted = predicted;
            r.infections_reported = Some(1.0);
            records.push(r);
        }
        Pipeline::default().run(&mut records);
        assert!(records.iter().all(|r| r.sir_missing_reason.is_some()));
    }
}
