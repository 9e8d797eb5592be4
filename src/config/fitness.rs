use super::traits::ConfigSection;
use crate::error::GenprogError;
use serde::{Deserialize, Serialize};

/// Per-row error term summed into a genome's fitness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMetric {
    Squared,
    Absolute,
}

impl ErrorMetric {
    pub fn apply(self, diff: f64) -> f64 {
        match self {
            ErrorMetric::Squared => diff * diff,
            ErrorMetric::Absolute => diff.abs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    /// Share of rows allowed to fail before a genome is rejected.
    pub max_fraction_of_errors: f64,
    pub metric: ErrorMetric,
    /// Compare min-max normalized outputs against the normalized target.
    pub normalize_data: bool,
    /// Drop trailing nodes that evaluation never reaches.
    pub remove_introns: bool,
    /// Stop once the best-ever fitness is at or below this value.
    pub min_fitness: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            max_fraction_of_errors: 0.1,
            metric: ErrorMetric::Squared,
            normalize_data: false,
            remove_introns: false,
            min_fitness: 1e-6,
        }
    }
}

impl ConfigSection for FitnessConfig {
    fn section_name() -> &'static str {
        "fitness"
    }

    fn validate(&self) -> Result<(), GenprogError> {
        if !(0.0..=1.0).contains(&self.max_fraction_of_errors) {
            return Err(GenprogError::Configuration(
                "max_fraction_of_errors must be between 0 and 1".to_string()
            ));
        }
        if !self.min_fitness.is_finite() {
            return Err(GenprogError::Configuration(
                "min_fitness must be finite".to_string()
            ));
        }
        Ok(())
    }
}
