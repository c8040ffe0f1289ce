//! Registration Handler
//!
//! Registers newborn batches under freshly allocated identifiers and lists
//! the herd with current ages.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{BatchIdentifier, DomainError};
use crate::error::AppResult;
use crate::records::{Batch, Record};
use crate::store::RecordStore;

use super::RegisterBatchCommand;

/// A batch together with its age on the listing date
#[derive(Debug, Clone, Serialize)]
pub struct BatchOverview {
    #[serde(flatten)]
    pub batch: Batch,
    pub age_in_days: i64,
}

/// Handler for batch registration
pub struct RegistrationHandler<S> {
    store: Arc<S>,
}

impl<S: RecordStore> RegistrationHandler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Execute the register command.
    ///
    /// The identifier follows the most recently inserted batch. Allocation
    /// is a read-then-write sequence, so registrations must not run
    /// concurrently against the same store.
    pub async fn register(
        &self,
        command: RegisterBatchCommand,
        today: NaiveDate,
    ) -> AppResult<Batch> {
        if command.date_of_birth > today {
            tracing::warn!(date_of_birth = %command.date_of_birth, "Rejected future date of birth");
            return Err(DomainError::FutureDate(command.date_of_birth).into());
        }

        let existing = self.store.fetch_all::<Batch>().await?;
        let last = existing
            .iter()
            .max_by_key(|batch| batch.id())
            .map(Batch::identifier);
        let identifier = BatchIdentifier::allocate_next(last.as_ref());

        if existing.iter().any(|batch| batch.identifier() == identifier) {
            tracing::warn!(batch = %identifier, "Allocated identifier already in use");
            return Err(DomainError::DuplicateIdentifier(identifier.to_string()).into());
        }

        let batch = Batch::new(
            identifier,
            command.date_of_birth,
            command.males,
            command.females,
            command.mother_id,
        );
        let id = self.store.insert(&batch).await?;

        tracing::info!(
            batch = %identifier,
            males = command.males,
            females = command.females,
            "Registered batch"
        );

        Ok(batch.with_id(id))
    }

    /// All batches with their age on `as_of`, in registration order
    pub async fn list(&self, as_of: NaiveDate) -> AppResult<Vec<BatchOverview>> {
        let batches = self.store.fetch_all::<Batch>().await?;

        Ok(batches
            .into_iter()
            .map(|batch| BatchOverview {
                age_in_days: batch.age_on(as_of),
                batch,
            })
            .collect())
    }
}
