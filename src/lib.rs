//! pig_farm Library
//!
//! Herd records for a pig farm: batch registration, growth assessment,
//! breeding countdowns and slaughter bookkeeping.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
mod error;
pub mod handlers;
pub mod notify;
pub mod records;
pub mod store;

pub use config::{Config, HerdSettings};
pub use domain::{DomainError, OperationContext};
pub use error::{AppError, AppResult, ErrorResponse};
