//! Command Handlers module
//!
//! Handlers that orchestrate herd operations. Each handler receives the
//! record store it works on; the pure rules live in `domain` and `records`.

mod breeding_handler;
mod commands;
mod growth_handler;
mod registration_handler;
mod slaughter_handler;


pub use breeding_handler::{
    BreedingHandler, EffectOutcome, EntryStatus, ServiceOutcome, FARROWED_QUESTION,
    NOTIFICATION_TITLE,
};
pub use commands::*;
pub use growth_handler::{GrowthAssessment, GrowthHandler, ACTUAL_WEIGHT_PROMPT};
pub use registration_handler::{BatchOverview, RegistrationHandler};
pub use slaughter_handler::{HistoryEntry, ReadyBatch, ReductionOutcome, SlaughterHandler};

use crate::domain::{BatchIdentifier, DomainError};
use crate::error::AppResult;
use crate::records::Batch;
use crate::store::RecordStore;

/// Look a batch up by its identifier
pub(crate) async fn find_batch<S: RecordStore>(
    store: &S,
    identifier: BatchIdentifier,
) -> AppResult<Batch> {
    store
        .fetch_all::<Batch>()
        .await?
        .into_iter()
        .find(|batch| batch.identifier() == identifier)
        .ok_or_else(|| DomainError::BatchNotFound(identifier.to_string()).into())
}
