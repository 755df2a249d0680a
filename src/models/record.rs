//! The SSI observation row model

use serde::{Deserialize, Serialize};

use crate::models::types::{Comparison, GoalStatus, MissingReason};

/// One (facility, year, procedure, infection-type) surveillance observation
///
/// Nullable columns from the source table are modelled as `Option`; the two
/// provenance fields (`sir_missing_reason`, `sir_missing_flag`) are
/// recomputed unconditionally by the pipeline, so any value read from an
/// already-enriched file is treated as stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SsiRecord {
    /// Facility key (`Facility_ID`)
    pub facility_id: String,
    /// Facility category (`Facility_Type`), carried through when present
    pub facility_type: Option<String>,
    /// Healthcare-associated infection type (`HAI`)
    pub hai: String,
    /// Procedure code (`Operative_Procedure`)
    pub operative_procedure: String,
    /// Surveillance year (`Year`)
    pub year: i32,
    /// Risk-adjusted expected infection count (`Infections_Predicted`)
    pub infections_predicted: Option<f64>,
    /// Observed infection count (`Infections_Reported`)
    pub infections_reported: Option<f64>,
    /// Standardized Infection Ratio (`SIR`)
    pub sir: Option<f64>,
    /// 95% CI lower bound on the SIR (`SIR_CI_95_Lower_Limit`)
    pub sir_ci_lower: Option<f64>,
    /// 95% CI upper bound on the SIR (`SIR_CI_95_Upper_Limit`)
    pub sir_ci_upper: Option<f64>,
    /// Historical baseline SIR (`SIR_2015`)
    pub sir_2015: Option<f64>,
    /// Comparison to the national benchmark (`Comparison`)
    pub comparison: Option<Comparison>,
    /// Whether the 2020 reduction goal was met (`Met_2020_Goal`)
    pub met_2020_goal: Option<GoalStatus>,
    /// Provenance of the SIR value (`SIR_Missing_Reason`), set by the pipeline
    pub sir_missing_reason: Option<MissingReason>,
    /// 1 iff SIR is null after the pipeline has run (`SIR_missing_flag`)
    pub sir_missing_flag: u8,
}

impl SsiRecord {
    /// Create a record with the key fields set and every measure null
    #[must_use]
    pub fn new(
        facility_id: impl Into<String>,
        hai: impl Into<String>,
        operative_procedure: impl Into<String>,
        year: i32,
    ) -> Self {
        Self {
            facility_id: facility_id.into(),
            facility_type: None,
            hai: hai.into(),
            operative_procedure: operative_procedure.into(),
            year,
            infections_predicted: None,
            infections_reported: None,
            sir: None,
            sir_ci_lower: None,
            sir_ci_upper: None,
            sir_2015: None,
            comparison: None,
            met_2020_goal: None,
            sir_missing_reason: None,
            sir_missing_flag: 0,
        }
    }

    /// Partition key for SIR and CI imputation
    #[must_use]
    pub fn procedure_key(&self) -> (String, String) {
        (self.hai.clone(), self.operative_procedure.clone())
    }

    /// Partition key for the first SIR_2015 imputation tier
    #[must_use]
    pub fn facility_key(&self) -> (String, String) {
        (self.facility_id.clone(), self.hai.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_all_null() {
        let record = SsiRecord::new("230001", "SSI", "Colon surgery", 2022);
        assert_eq!(record.facility_id, "230001");
        assert_eq!(record.year, 2022);
        assert!(record.sir.is_none());
        assert!(record.infections_predicted.is_none());
        assert!(record.comparison.is_none());
        assert!(record.sir_missing_reason.is_none());
        assert_eq!(record.sir_missing_flag, 0);
    }

    #[test]
    fn test_partition_keys() {
        let record = SsiRecord::new("230001", "SSI", "Hip prosthesis", 2021);
        assert_eq!(
            record.procedure_key(),
            ("SSI".to_string(), "Hip prosthesis".to_string())
        );
        assert_eq!(
            record.facility_key(),
            ("230001".to_string(), "SSI".to_string())
        );
    }
}
