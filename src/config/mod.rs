//! Configuration for the cleaning pipeline

/// Thresholds governing the imputation and derivation rules
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Minimum predicted infection count for a direct SIR computation
    pub predicted_threshold: f64,
    /// SIR below this value counts as having met the 2020 reduction goal
    pub goal_threshold: f64,
    /// First surveillance year the 2020 goal is evaluated for
    pub goal_first_year: i32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            predicted_threshold: 0.2,
            goal_threshold: 0.70,
            goal_first_year: 2021,
        }
    }
}
