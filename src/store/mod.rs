//! Record Store module
//!
//! Persistence layer for batches, slaughter records and breeding entries.
//! Handlers receive a `RecordStore` explicitly; there is no process-wide
//! connection.

mod error;
mod fields;
mod memory;
mod postgres;

use std::future::Future;

pub use error::StoreError;
pub use fields::{FieldType, FieldValue, Fields, RecordKind};
pub use memory::MemoryStore;
pub use postgres::PgRecordStore;

use crate::records::Record;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Keyed record store.
///
/// Reads and writes are independent calls; read-then-write sequences are
/// not isolated, so callers serialize mutation of the same batch.
pub trait RecordStore: Send + Sync + 'static {
    /// Insert a record and return its new id
    fn insert<R: Record>(&self, record: &R) -> impl Future<Output = StoreResult<i64>> + Send;

    /// All records of one kind, in insertion order
    fn fetch_all<R: Record>(&self) -> impl Future<Output = StoreResult<Vec<R>>> + Send;

    fn fetch_by_id<R: Record>(&self, id: i64)
        -> impl Future<Output = StoreResult<Option<R>>> + Send;

    /// Overwrite a previously inserted record
    fn update<R: Record>(&self, record: &R) -> impl Future<Output = StoreResult<()>> + Send;

    /// Delete by id; deleting a missing id is `NotFound`
    fn delete<R: Record>(&self, id: i64) -> impl Future<Output = StoreResult<()>> + Send;

    /// Overwrite `updated` and append `appended` as one unit of work.
    ///
    /// Returns the appended record's id. Either both writes persist or
    /// neither does. This default runs the two writes in sequence and,
    /// when the append fails, writes `previous` back over the update.
    fn update_and_append<U: Record, A: Record>(
        &self,
        updated: &U,
        previous: &U,
        appended: &A,
    ) -> impl Future<Output = StoreResult<i64>> + Send {
        async move {
            self.update(updated).await?;

            match self.insert(appended).await {
                Ok(id) => Ok(id),
                Err(e) => {
                    if let Err(restore) = self.update(previous).await {
                        tracing::error!(
                            table = U::KIND.table,
                            "Failed to restore record after aborted append: {}",
                            restore
                        );
                    }
                    Err(e)
                }
            }
        }
    }
}
