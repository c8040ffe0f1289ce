//! Breeding entry
//!
//! A served sow awaiting farrowing. Entries are removed once farrowing is
//! confirmed or the expected date has passed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{age_in_days, expected_event_date, Urgency};
use crate::store::{FieldType, Fields, RecordKind, StoreError};

use super::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingEntry {
    id: Option<i64>,

    pig_identifier: String,

    served_date: NaiveDate,

    expected_event_date: NaiveDate,
}

impl BreedingEntry {
    /// Record a service; the expected date follows from the gestation length
    pub fn new(pig_identifier: String, served_date: NaiveDate) -> Self {
        Self {
            id: None,
            pig_identifier,
            served_date,
            expected_event_date: expected_event_date(served_date),
        }
    }

    /// Days from `as_of` until the expected farrowing
    pub fn days_left(&self, as_of: NaiveDate) -> i64 {
        age_in_days(as_of, self.expected_event_date)
    }

    pub fn urgency(&self, as_of: NaiveDate) -> Urgency {
        Urgency::from_days_left(self.days_left(as_of))
    }

    /// Expected date has passed; the sow is assumed to have farrowed
    pub fn is_stale(&self, as_of: NaiveDate) -> bool {
        self.days_left(as_of) < 0
    }

    pub fn pig_identifier(&self) -> &str {
        &self.pig_identifier
    }

    pub fn served_date(&self) -> NaiveDate {
        self.served_date
    }

    pub fn expected_event_date(&self) -> NaiveDate {
        self.expected_event_date
    }
}

impl Record for BreedingEntry {
    const KIND: RecordKind = RecordKind {
        table: "breeding_entries",
        columns: &[
            ("pig_identifier", FieldType::Text),
            ("served_date", FieldType::Text),
            ("expected_event_date", FieldType::Text),
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
            .text("pig_identifier", self.pig_identifier.clone())
            .date("served_date", self.served_date)
            .date("expected_event_date", self.expected_event_date)
    }

    fn from_fields(id: i64, fields: &Fields) -> Result<Self, StoreError> {
        Ok(Self {
            id: Some(id),
            pig_identifier: fields.get_text("pig_identifier")?.to_string(),
            served_date: fields.get_date("served_date")?,
            expected_event_date: fields.get_date("expected_event_date")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn served() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_expected_date_derived() {
        let entry = BreedingEntry::new("SOW-3".to_string(), served());
        assert_eq!(
            entry.expected_event_date(),
            NaiveDate::from_ymd_opt(2024, 5, 24).unwrap()
        );
    }

    #[test]
    fn test_countdown_and_urgency() {
        let entry = BreedingEntry::new("SOW-3".to_string(), served());
        let due = entry.expected_event_date();

        assert_eq!(entry.days_left(due), 0);
        assert_eq!(entry.urgency(due), Urgency::Due);
        assert_eq!(entry.urgency(due - Duration::days(4)), Urgency::Imminent);
        assert_eq!(entry.urgency(due - Duration::days(5)), Urgency::Normal);
        assert_eq!(entry.days_left(served()), 144);
    }

    #[test]
    fn test_stale_after_expected_date() {
        let entry = BreedingEntry::new("SOW-3".to_string(), served());
        let due = entry.expected_event_date();

        assert!(!entry.is_stale(due));
        assert!(entry.is_stale(due + Duration::days(1)));
    }
}
