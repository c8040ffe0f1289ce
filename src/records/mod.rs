//! Records module
//!
//! The persisted herd entities and the rules that change them.

pub mod batch;
pub mod breeding_entry;
pub mod slaughter_record;

pub use batch::{select_ready, Batch, SLAUGHTER_THRESHOLD_DAYS};
pub use breeding_entry::BreedingEntry;
pub use slaughter_record::SlaughterRecord;

use crate::store::{Fields, RecordKind, StoreError};

/// Record trait that all persisted entities must implement
pub trait Record: Sized + Clone + Send + Sync + 'static {
    /// Table and column layout (for storage)
    const KIND: RecordKind;

    /// Store id, `None` until inserted
    fn id(&self) -> Option<i64>;

    /// Attach the id assigned by the store
    fn with_id(self, id: i64) -> Self;

    fn to_fields(&self) -> Fields;

    /// Rebuild from stored columns, validating every value
    fn from_fields(id: i64, fields: &Fields) -> Result<Self, StoreError>;
}
