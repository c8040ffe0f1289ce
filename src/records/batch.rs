//! Batch record
//!
//! A batch is one cohort born on the same date to the same sow. Its head
//! counts only ever go down, through slaughter reductions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{age_in_days, BatchIdentifier, DomainError, Weight};
use crate::store::{FieldType, Fields, RecordKind, StoreError};

use super::{Record, SlaughterRecord};

/// Minimum age (days) at which a batch may be slaughtered
pub const SLAUGHTER_THRESHOLD_DAYS: i64 = 168;

/// Batch record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    /// Store id
    id: Option<i64>,

    identifier: BatchIdentifier,

    date_of_birth: NaiveDate,

    males: u32,

    females: u32,

    /// Sow that farrowed the batch
    mother_id: String,
}

impl Batch {
    pub fn new(
        identifier: BatchIdentifier,
        date_of_birth: NaiveDate,
        males: u32,
        females: u32,
        mother_id: String,
    ) -> Self {
        Self {
            id: None,
            identifier,
            date_of_birth,
            males,
            females,
            mother_id,
        }
    }

    /// Remove slaughtered animals from the batch.
    ///
    /// Returns the reduced batch and the slaughter record to append. Fails
    /// without touching the batch when either count exceeds the stock.
    pub fn apply_reduction(
        &self,
        males_removed: u32,
        females_removed: u32,
        average_weight: Weight,
        actor_id: &str,
        event_date: NaiveDate,
    ) -> Result<(Batch, SlaughterRecord), DomainError> {
        if males_removed > self.males || females_removed > self.females {
            return Err(DomainError::insufficient_stock(
                (males_removed, females_removed),
                (self.males, self.females),
            ));
        }

        let reduced = Batch {
            males: self.males - males_removed,
            females: self.females - females_removed,
            ..self.clone()
        };

        let record = SlaughterRecord::new(
            self.identifier,
            actor_id.to_string(),
            males_removed,
            females_removed,
            average_weight,
            event_date,
        );

        Ok((reduced, record))
    }

    /// Age on `as_of`; negative before the date of birth
    pub fn age_on(&self, as_of: NaiveDate) -> i64 {
        age_in_days(self.date_of_birth, as_of)
    }

    pub fn is_ready_for_slaughter(&self, as_of: NaiveDate, threshold_days: i64) -> bool {
        self.age_on(as_of) >= threshold_days
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn identifier(&self) -> BatchIdentifier {
        self.identifier
    }

    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    pub fn males(&self) -> u32 {
        self.males
    }

    pub fn females(&self) -> u32 {
        self.females
    }

    pub fn head_count(&self) -> u64 {
        u64::from(self.males) + u64::from(self.females)
    }

    pub fn mother_id(&self) -> &str {
        &self.mother_id
    }
}

/// Batches old enough for slaughter on `as_of`, in input order
pub fn select_ready<'a, I>(batches: I, as_of: NaiveDate, threshold_days: i64) -> Vec<Batch>
where
    I: IntoIterator<Item = &'a Batch>,
{
    batches
        .into_iter()
        .filter(|batch| batch.is_ready_for_slaughter(as_of, threshold_days))
        .cloned()
        .collect()
}

impl Record for Batch {
    const KIND: RecordKind = RecordKind {
        table: "batches",
        columns: &[
            ("batch_identifier", FieldType::Text),
            ("date_of_birth", FieldType::Text),
            ("males", FieldType::Integer),
            ("females", FieldType::Integer),
            ("mother_id", FieldType::Text),
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
            .text("batch_identifier", self.identifier.to_string())
            .date("date_of_birth", self.date_of_birth)
            .integer("males", i64::from(self.males))
            .integer("females", i64::from(self.females))
            .text("mother_id", self.mother_id.clone())
    }

    fn from_fields(id: i64, fields: &Fields) -> Result<Self, StoreError> {
        let identifier = fields
            .get_text("batch_identifier")?
            .parse()
            .map_err(|e| StoreError::malformed(Self::KIND.table, e))?;

        Ok(Self {
            id: Some(id),
            identifier,
            date_of_birth: fields.get_date("date_of_birth")?,
            males: fields.get_count("males")?,
            females: fields.get_count("females")?,
            mother_id: fields.get_text("mother_id")?.to_string(),
        })
    }
}
