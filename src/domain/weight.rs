//! Weight type
//!
//! Live or carcass weight in kilograms, validated at construction time.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::DomainError;

/// Weight in kg.
///
/// # Invariants
/// - Value is finite and strictly positive
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Weight(f64);

impl Weight {
    pub fn new(kg: f64) -> Result<Self, DomainError> {
        if !kg.is_finite() || kg <= 0.0 {
            return Err(DomainError::InvalidWeight(kg));
        }
        Ok(Self(kg))
    }

    pub fn kg(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} kg", self.0)
    }
}

impl TryFrom<f64> for Weight {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Weight::new(value)
    }
}

impl From<Weight> for f64 {
    fn from(weight: Weight) -> Self {
        weight.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_positive() {
        let weight = Weight::new(75.5).unwrap();
        assert_eq!(weight.kg(), 75.5);
        assert_eq!(weight.to_string(), "75.500 kg");
    }

    #[test]
    fn test_weight_rejects_zero_negative_and_nan() {
        assert!(matches!(Weight::new(0.0), Err(DomainError::InvalidWeight(_))));
        assert!(matches!(Weight::new(-3.0), Err(DomainError::InvalidWeight(_))));
        assert!(Weight::new(f64::NAN).is_err());
        assert!(Weight::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_weight_deserialize_validates() {
        assert!(serde_json::from_str::<Weight>("80.25").is_ok());
        assert!(serde_json::from_str::<Weight>("-1").is_err());
    }
}
