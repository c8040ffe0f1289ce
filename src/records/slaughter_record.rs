//! Slaughter record
//!
//! One reduction against a batch. Records are append-only: created once,
//! never updated or deleted, and they outlive the batch's head counts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{BatchIdentifier, Weight};
use crate::store::{FieldType, Fields, RecordKind, StoreError};

use super::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlaughterRecord {
    id: Option<i64>,

    /// Batch the animals came from (lookup only)
    batch_identifier: BatchIdentifier,

    /// Who performed the reduction
    actor_id: String,

    males_removed: u32,

    females_removed: u32,

    average_weight: Weight,

    event_date: NaiveDate,
}

impl SlaughterRecord {
    pub fn new(
        batch_identifier: BatchIdentifier,
        actor_id: String,
        males_removed: u32,
        females_removed: u32,
        average_weight: Weight,
        event_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            batch_identifier,
            actor_id,
            males_removed,
            females_removed,
            average_weight,
            event_date,
        }
    }

    pub fn batch_identifier(&self) -> BatchIdentifier {
        self.batch_identifier
    }

    pub fn actor_id(&self) -> &str {
        &self.actor_id
    }

    pub fn males_removed(&self) -> u32 {
        self.males_removed
    }

    pub fn females_removed(&self) -> u32 {
        self.females_removed
    }

    pub fn total_removed(&self) -> u64 {
        u64::from(self.males_removed) + u64::from(self.females_removed)
    }

    pub fn average_weight(&self) -> Weight {
        self.average_weight
    }

    pub fn event_date(&self) -> NaiveDate {
        self.event_date
    }
}

impl Record for SlaughterRecord {
    const KIND: RecordKind = RecordKind {
        table: "slaughter_records",
        columns: &[
            ("batch_identifier", FieldType::Text),
            ("actor_id", FieldType::Text),
            ("males_removed", FieldType::Integer),
            ("females_removed", FieldType::Integer),
            ("average_weight", FieldType::Real),
            ("event_date", FieldType::Text),
        ],
    };

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    fn to_fields(&self) -> Fields {
        Fields::new(&Self::KIND)
            .text("batch_identifier", self.batch_identifier.to_string())
            .text("actor_id", self.actor_id.clone())
            .integer("males_removed", i64::from(self.males_removed))
            .integer("females_removed", i64::from(self.females_removed))
            .real("average_weight", self.average_weight.kg())
            .date("event_date", self.event_date)
    }

    fn from_fields(id: i64, fields: &Fields) -> Result<Self, StoreError> {
        let table = Self::KIND.table;
        let batch_identifier = fields
            .get_text("batch_identifier")?
            .parse()
            .map_err(|e| StoreError::malformed(table, e))?;
        let average_weight = Weight::new(fields.get_real("average_weight")?)
            .map_err(|e| StoreError::malformed(table, e))?;

        Ok(Self {
            id: Some(id),
            batch_identifier,
            actor_id: fields.get_text("actor_id")?.to_string(),
            males_removed: fields.get_count("males_removed")?,
            females_removed: fields.get_count("females_removed")?,
            average_weight,
            event_date: fields.get_date("event_date")?,
        })
    }
}
