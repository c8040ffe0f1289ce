//! Health Evaluator
//!
//! Classifies a weighed pig against the expected weight for its age.

use serde::{Deserialize, Serialize};

/// Shortfall (kg) beyond which a pig is in critical condition
pub const CRITICAL_SHORTFALL_KG: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Excellent,
    Average,
    Critical,
}

impl HealthStatus {
    /// Exactly `expected - 10` is still `Average`.
    pub fn classify(expected_weight: f64, actual_weight: f64) -> Self {
        if actual_weight >= expected_weight {
            Self::Excellent
        } else if actual_weight < expected_weight - CRITICAL_SHORTFALL_KG {
            Self::Critical
        } else {
            Self::Average
        }
    }
}
