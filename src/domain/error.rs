//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

/// Domain-specific errors
///
/// These errors represent rejected input and violated herd invariants.
/// They are independent of the web/storage layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Batch identifier is not `<letter><3 digits>`
    #[error("Malformed batch identifier: {0:?}")]
    MalformedIdentifier(String),

    /// Date is not in `YYYY-MM-DD` form
    #[error("Malformed date: {0:?} (expected YYYY-MM-DD)")]
    MalformedDate(String),

    /// Age lies past the last feed stage
    #[error("Age {0} days is outside the growth schedule")]
    OutOfRangeAge(i64),

    /// Reference date lies in the future
    #[error("Not yet born: {days_until} days to go")]
    NotYetBorn { days_until: i64 },

    /// Reduction would take a head count below zero
    #[error(
        "Insufficient stock: requested {requested_males} males / {requested_females} females, \
         available {available_males} males / {available_females} females"
    )]
    InsufficientStock {
        requested_males: u32,
        requested_females: u32,
        available_males: u32,
        available_females: u32,
    },

    /// Batch is younger than the slaughter threshold
    #[error("Batch is {age} days old; slaughter requires at least {threshold} days")]
    NotReadyForSlaughter { age: i64, threshold: i64 },

    /// Weight must be a positive, finite number
    #[error("Invalid weight: {0}")]
    InvalidWeight(f64),

    /// Date of birth after today
    #[error("Date {0} lies in the future")]
    FutureDate(chrono::NaiveDate),

    /// Allocated identifier is already held by another batch
    #[error("Batch identifier already in use: {0}")]
    DuplicateIdentifier(String),

    #[error("Batch not found: {0}")]
    BatchNotFound(String),

    #[error("Breeding entry not found: {0}")]
    EntryNotFound(i64),
}

impl DomainError {
    /// Create an insufficient stock error
    pub fn insufficient_stock(requested: (u32, u32), available: (u32, u32)) -> Self {
        Self::InsufficientStock {
            requested_males: requested.0,
            requested_females: requested.1,
            available_males: available.0,
            available_females: available.1,
        }
    }

    /// Check if this error comes from unparseable operator input
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::MalformedIdentifier(_) | Self::MalformedDate(_) | Self::InvalidWeight(_)
        )
    }

    /// Check if this error is a lookup miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BatchNotFound(_) | Self::EntryNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_error() {
        let err = DomainError::insufficient_stock((6, 0), (5, 3));

        assert!(!err.is_malformed_input());
        assert!(err.to_string().contains("6 males"));
        assert!(err.to_string().contains("available 5 males"));
    }

    #[test]
    fn test_malformed_input_classification() {
        assert!(DomainError::MalformedDate("2024/01/01".to_string()).is_malformed_input());
        assert!(DomainError::MalformedIdentifier("a1".to_string()).is_malformed_input());
        assert!(!DomainError::OutOfRangeAge(300).is_malformed_input());
    }

    #[test]
    fn test_not_found_classification() {
        assert!(DomainError::BatchNotFound("A001".to_string()).is_not_found());
        assert!(DomainError::EntryNotFound(7).is_not_found());
        assert!(!DomainError::DuplicateIdentifier("A001".to_string()).is_not_found());
    }
}
