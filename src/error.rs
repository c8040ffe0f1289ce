//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::DomainError;
use crate::store::StoreError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Server errors (5xx)
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Store could not be reached; the caller may retry later
    pub fn is_unavailable(&self) -> bool {
        matches!(self, AppError::Store(e) if e.is_unavailable())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

fn domain_status(err: &DomainError) -> (StatusCode, &'static str) {
    match err {
        DomainError::MalformedIdentifier(_) => (StatusCode::BAD_REQUEST, "malformed_identifier"),
        DomainError::MalformedDate(_) => (StatusCode::BAD_REQUEST, "malformed_date"),
        DomainError::InvalidWeight(_) => (StatusCode::BAD_REQUEST, "invalid_weight"),
        DomainError::OutOfRangeAge(_) => (StatusCode::UNPROCESSABLE_ENTITY, "out_of_range_age"),
        DomainError::NotYetBorn { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "not_yet_born"),
        DomainError::FutureDate(_) => (StatusCode::UNPROCESSABLE_ENTITY, "future_date"),
        DomainError::InsufficientStock { .. } => (StatusCode::CONFLICT, "insufficient_stock"),
        DomainError::NotReadyForSlaughter { .. } => {
            (StatusCode::CONFLICT, "not_ready_for_slaughter")
        }
        DomainError::DuplicateIdentifier(_) => (StatusCode::CONFLICT, "duplicate_identifier"),
        DomainError::BatchNotFound(_) => (StatusCode::NOT_FOUND, "batch_not_found"),
        DomainError::EntryNotFound(_) => (StatusCode::NOT_FOUND, "entry_not_found"),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            // 400 Bad Request
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", Some(msg.clone()))
            }

            // Domain errors - map to appropriate HTTP status
            AppError::Domain(domain_err) => {
                let (status, code) = domain_status(domain_err);
                (status, code, None)
            }

            // 503 Service Unavailable
            AppError::Store(e) if e.is_unavailable() => {
                tracing::error!("Record store unavailable: {:?}", e);
                (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", None)
            }

            // Stored data the domain rejects
            AppError::Store(StoreError::MalformedRecord { table, source }) => {
                tracing::error!(table = %table, "Malformed stored record: {}", source);
                let (_, code) = domain_status(source);
                (StatusCode::INTERNAL_SERVER_ERROR, code, Some(table.to_string()))
            }

            AppError::Store(StoreError::NotFound { table, id }) => {
                (StatusCode::NOT_FOUND, "record_not_found", Some(format!("{} {}", table, id)))
            }

            // 500 Internal Server Error
            AppError::Store(e) => {
                tracing::error!("Record store error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "store_error", None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_status() {
        let response = AppError::from(DomainError::insufficient_stock((6, 0), (5, 0))).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = AppError::from(DomainError::NotReadyForSlaughter {
            age: 30,
            threshold: 168,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = AppError::from(DomainError::MalformedDate("x".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::from(DomainError::OutOfRangeAge(300)).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_store_unavailable_is_503() {
        let err = AppError::from(StoreError::Unavailable("down".to_string()));
        assert!(err.is_unavailable());
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_store_not_found_is_404() {
        let err = AppError::from(StoreError::NotFound { table: "batches", id: 4 });
        assert!(!err.is_unavailable());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
