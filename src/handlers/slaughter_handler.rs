//! Slaughter Handler
//!
//! Lists batches old enough for slaughter, takes slaughtered animals off a
//! batch, and keeps the append-only slaughter history.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{BatchIdentifier, DomainError, OperationContext, Weight};
use crate::error::AppResult;
use crate::records::{select_ready, Batch, Record, SlaughterRecord};
use crate::store::RecordStore;

use super::{find_batch, ReduceBatchCommand};

/// A batch past the slaughter threshold
#[derive(Debug, Clone, Serialize)]
pub struct ReadyBatch {
    #[serde(flatten)]
    pub batch: Batch,
    pub age_in_days: i64,
}

/// Result of a successful reduction
#[derive(Debug, Clone, Serialize)]
pub struct ReductionOutcome {
    pub batch: Batch,
    pub record: SlaughterRecord,
}

/// One history line
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub record: SlaughterRecord,
    /// Number of reductions recorded against the same batch
    pub reductions_for_batch: usize,
}

/// Handler for slaughter operations
pub struct SlaughterHandler<S> {
    store: Arc<S>,
    threshold_days: i64,
}

impl<S: RecordStore> SlaughterHandler<S> {
    pub fn new(store: Arc<S>, threshold_days: i64) -> Self {
        Self {
            store,
            threshold_days,
        }
    }

    /// Batches at or past the threshold on `as_of`, in registration order
    pub async fn ready(&self, as_of: NaiveDate) -> AppResult<Vec<ReadyBatch>> {
        let batches = self.store.fetch_all::<Batch>().await?;

        Ok(select_ready(&batches, as_of, self.threshold_days)
            .into_iter()
            .map(|batch| ReadyBatch {
                age_in_days: batch.age_on(as_of),
                batch,
            })
            .collect())
    }

    /// Execute the reduce command.
    ///
    /// Only batches at or past the threshold can be reduced. Nothing is
    /// written when the stock is insufficient. On success the batch update
    /// and the appended slaughter record are stored together.
    pub async fn reduce(
        &self,
        command: ReduceBatchCommand,
        context: &OperationContext,
        today: NaiveDate,
    ) -> AppResult<ReductionOutcome> {
        let average_weight = Weight::new(command.average_weight)?;
        let batch = find_batch(self.store.as_ref(), command.batch_identifier).await?;

        if !batch.is_ready_for_slaughter(today, self.threshold_days) {
            tracing::warn!(batch = %command.batch_identifier, "Batch not ready for slaughter");
            return Err(DomainError::NotReadyForSlaughter {
                age: batch.age_on(today),
                threshold: self.threshold_days,
            }
            .into());
        }

        let (reduced, record) = batch
            .apply_reduction(
                command.males_removed,
                command.females_removed,
                average_weight,
                context.actor(),
                today,
            )
            .map_err(|e| {
                tracing::warn!(batch = %command.batch_identifier, "Reduction rejected: {}", e);
                e
            })?;

        let record_id = self
            .store
            .update_and_append(&reduced, &batch, &record)
            .await?;

        tracing::info!(
            batch = %command.batch_identifier,
            actor = %context.actor(),
            males_removed = command.males_removed,
            females_removed = command.females_removed,
            remaining = reduced.head_count(),
            "Reduced batch"
        );

        Ok(ReductionOutcome {
            batch: reduced,
            record: record.with_id(record_id),
        })
    }

    /// All slaughter records, oldest first
    pub async fn history(&self) -> AppResult<Vec<HistoryEntry>> {
        let records = self.store.fetch_all::<SlaughterRecord>().await?;

        let mut per_batch: HashMap<BatchIdentifier, usize> = HashMap::new();
        for record in &records {
            *per_batch.entry(record.batch_identifier()).or_default() += 1;
        }

        Ok(records
            .into_iter()
            .map(|record| HistoryEntry {
                reductions_for_batch: per_batch
                    .get(&record.batch_identifier())
                    .copied()
                    .unwrap_or_default(),
                record,
            })
            .collect())
    }
}
