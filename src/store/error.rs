//! Record Store Errors
//!
//! Error types for record store operations.

use crate::domain::DomainError;

/// Errors that can occur in the record store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Store could not be reached or initialized
    #[error("Record store unavailable: {0}")]
    Unavailable(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// No row with this id
    #[error("{table} record {id} not found")]
    NotFound { table: &'static str, id: i64 },

    /// Row lacks a declared column
    #[error("{table} record is missing field {field}")]
    MissingField {
        table: &'static str,
        field: &'static str,
    },

    /// Row holds a value the domain rejects
    #[error("{table} record is malformed: {source}")]
    MalformedRecord {
        table: &'static str,
        #[source]
        source: DomainError,
    },

    /// Update or delete of a record that was never inserted
    #[error("{0} record has no id")]
    Unsaved(&'static str),
}

impl StoreError {
    /// Check if this error means the store itself is out of reach
    pub fn is_unavailable(&self) -> bool {
        match self {
            StoreError::Unavailable(_) => true,
            StoreError::Database(e) => matches!(
                e,
                sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
            ),
            _ => false,
        }
    }

    pub fn malformed(table: &'static str, source: DomainError) -> Self {
        StoreError::MalformedRecord { table, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_classification() {
        assert!(StoreError::Unavailable("connection refused".to_string()).is_unavailable());
        assert!(StoreError::Database(sqlx::Error::PoolTimedOut).is_unavailable());
        assert!(!StoreError::Database(sqlx::Error::RowNotFound).is_unavailable());
        assert!(!StoreError::NotFound { table: "batches", id: 3 }.is_unavailable());
    }

    #[test]
    fn test_malformed_record_message() {
        let err = StoreError::malformed(
            "batches",
            DomainError::MalformedDate("2024/01/01".to_string()),
        );
        assert!(err.to_string().contains("batches"));
        assert!(err.to_string().contains("2024/01/01"));
    }
}
