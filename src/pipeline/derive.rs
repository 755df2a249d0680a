//! Row-wise derivation rules for the categorical fields

use crate::config::PipelineConfig;
use crate::models::{Comparison, GoalStatus, MissingReason, SsiRecord};

/// Compare a row's SIR confidence interval against the national benchmark
///
/// A row missing either CI bound is indeterminate and stays null rather
/// than guessing.
#[must_use]
pub fn derive_comparison(record: &SsiRecord) -> Option<Comparison> {
    let lower = record.sir_ci_lower?;
    let upper = record.sir_ci_upper?;
    if lower > 1.0 {
        Some(Comparison::WorseThanNational)
    } else if upper < 1.0 {
        Some(Comparison::BetterThanNational)
    } else {
        Some(Comparison::NoDifferent)
    }
}

/// Evaluate the 2020 reduction goal for a row
///
/// Only defined for years from `goal_first_year` onward and rows with a
/// resolved SIR.
#[must_use]
pub fn derive_goal(record: &SsiRecord, config: &PipelineConfig) -> Option<GoalStatus> {
    let sir = record.sir?;
    if record.year < config.goal_first_year {
        return None;
    }
    if sir < config.goal_threshold {
        Some(GoalStatus::Yes)
    } else {
        Some(GoalStatus::No)
    }
}

/// Explain why a row's SIR is (still) missing, or record that it resolved
///
/// The zero-predicted arm is shadowed by the threshold arm (0 < 0.2); the
/// rule order follows the published cleaning logic, which checks the
/// threshold first.
#[must_use]
pub fn missing_reason(record: &SsiRecord, config: &PipelineConfig) -> MissingReason {
    if record.sir.is_some() {
        return MissingReason::Calculated;
    }
    match record.infections_predicted {
        Some(predicted) if predicted < config.predicted_threshold => {
            MissingReason::BelowThreshold
        }
        Some(predicted) if predicted == 0.0 => MissingReason::ZeroPredicted,
        _ => MissingReason::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32) -> SsiRecord {
        SsiRecord::new("230001", "SSI", "Colon surgery", year)
    }

    #[test]
    fn test_comparison_worse_than_national() {
        let mut r = record(2022);
        r.sir_ci_lower = Some(1.2);
        r.sir_ci_upper = Some(1.5);
        assert_eq!(derive_comparison(&r), Some(Comparison::WorseThanNational));
    }

    #[test]
    fn test_comparison_better_than_national() {
        let mut r = record(2022);
        r.sir_ci_lower = Some(0.5);
        r.sir_ci_upper = Some(0.9);
        assert_eq!(derive_comparison(&r), Some(Comparison::BetterThanNational));
    }

    #[test]
    fn test_comparison_no_different() {
        let mut r = record(2022);
        r.sir_ci_lower = Some(0.8);
        r.sir_ci_upper = Some(1.1);
        assert_eq!(derive_comparison(&r), Some(Comparison::NoDifferent));
    }

    #[test]
    fn test_comparison_indeterminate_without_both_bounds() {
        let mut r = record(2022);
        r.sir_ci_lower = Some(1.2);
        assert_eq!(derive_comparison(&r), None);
        r.sir_ci_lower = None;
        r.sir_ci_upper = Some(0.9);
        assert_eq!(derive_comparison(&r), None);
    }

    #[test]
    fn test_goal_threshold_rule() {
        let config = PipelineConfig::default();
        let mut r = record(2022);
        r.sir = Some(0.65);
        assert_eq!(derive_goal(&r, &config), Some(GoalStatus::Yes));
        r.sir = Some(0.75);
        assert_eq!(derive_goal(&r, &config), Some(GoalStatus::No));
        // boundary: the rule is strictly-less-than
        r.sir = Some(0.70);
        assert_eq!(derive_goal(&r, &config), Some(GoalStatus::No));
    }

    #[test]
    fn test_goal_undefined_before_first_year_or_without_sir() {
        let config = PipelineConfig::default();
        let mut r = record(2020);
        r.sir = Some(0.5);
        assert_eq!(derive_goal(&r, &config), None);
        let r = record(2022);
        assert_eq!(derive_goal(&r, &config), None);
    }

    #[test]
    fn test_missing_reason_taxonomy() {
        let config = PipelineConfig::default();
        let mut r = record(2022);
        r.sir = Some(0.5);
        assert_eq!(missing_reason(&r, &config), MissingReason::Calculated);

        r.sir = None;
        r.infections_predicted = Some(0.1);
        assert_eq!(missing_reason(&r, &config), MissingReason::BelowThreshold);

        // zero predicted is caught by the threshold arm first
        r.infections_predicted = Some(0.0);
        assert_eq!(missing_reason(&r, &config), MissingReason::BelowThreshold);

        r.infections_predicted = None;
        assert_eq!(missing_reason(&r, &config), MissingReason::Unknown);

        r.infections_predicted = Some(0.5);
        assert_eq!(missing_reason(&r, &config), MissingReason::Unknown);
    }
}
