//! Domain module
//!
//! Core herd rules: identifiers, ages, growth, health and breeding.
//! Everything here is pure; persistence and notification live elsewhere.

pub mod breeding;
pub mod context;
pub mod dates;
pub mod error;
pub mod growth;
pub mod health;
pub mod identifier;
pub mod weight;

pub use breeding::{expected_event_date, Urgency, GESTATION_DAYS};
pub use context::OperationContext;
pub use dates::{age_in_days, format_date, parse_date, today};
pub use error::DomainError;
pub use growth::{expected_weight_and_feed, FeedStage, GrowthExpectation};
pub use health::HealthStatus;
pub use identifier::BatchIdentifier;
pub use weight::Weight;
