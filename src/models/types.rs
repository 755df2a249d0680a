//! Categorical types used by the surveillance vocabulary

use serde::{Deserialize, Serialize};

/// Qualitative comparison of a facility's SIR against the national benchmark
///
/// Derived from the 95% confidence interval on the SIR point estimate: an
/// interval entirely above 1 is worse than national, entirely below 1 is
/// better, and an interval straddling 1 is not distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    /// CI lower bound above 1
    #[serde(rename = "Worse than National")]
    WorseThanNational,
    /// CI upper bound below 1
    #[serde(rename = "Better than National")]
    BetterThanNational,
    /// CI straddles 1
    #[serde(rename = "No Different")]
    NoDifferent,
}

impl Comparison {
    /// The exact label used in the surveillance export
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WorseThanNational => "Worse than National",
            Self::BetterThanNational => "Better than National",
            Self::NoDifferent => "No Different",
        }
    }

    /// Parse a label from the surveillance export, `None` if unrecognized
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Worse than National" => Some(Self::WorseThanNational),
            "Better than National" => Some(Self::BetterThanNational),
            "No Different" => Some(Self::NoDifferent),
            _ => None,
        }
    }
}

/// Whether a row met the HHS 2020 reduction goal (SIR below 0.70)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalStatus {
    /// SIR below the goal threshold
    Yes,
    /// SIR at or above the goal threshold
    No,
}

impl GoalStatus {
    /// The exact label used in the surveillance export
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }

    /// Parse a label from the surveillance export, `None` if unrecognized
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Yes" => Some(Self::Yes),
            "No" => Some(Self::No),
            _ => None,
        }
    }
}

/// Provenance of a missing (or resolved) SIR value
///
/// Every row carries exactly one of these after the pipeline has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingReason {
    /// SIR is present, either reported, computed, or imputed
    Calculated,
    /// Predicted infections below the 0.2 reporting threshold
    #[serde(rename = "Below threshold (<0.2)")]
    BelowThreshold,
    /// Predicted infections exactly zero
    #[serde(rename = "Zero predicted")]
    ZeroPredicted,
    /// SIR missing with no structural explanation (e.g. predicted count absent)
    Unknown,
}

impl MissingReason {
    /// The exact label used in the surveillance export
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calculated => "Calculated",
            Self::BelowThreshold => "Below threshold (<0.2)",
            Self::ZeroPredicted => "Zero predicted",
            Self::Unknown => "Unknown",
        }
    }

    /// Parse a label from the surveillance export, `None` if unrecognized
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Calculated" => Some(Self::Calculated),
            "Below threshold (<0.2)" => Some(Self::BelowThreshold),
            "Zero predicted" => Some(Self::ZeroPredicted),
            "Unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}
