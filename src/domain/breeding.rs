//! Breeding Cycle Tracker
//!
//! Gestation arithmetic and time-to-farrowing classification. Side effects
//! (confirmation prompts, reminders) are applied by the breeding handler.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Days from service to expected farrowing
pub const GESTATION_DAYS: i64 = 144;

/// Days left below which a reminder is scheduled
pub const IMMINENT_WINDOW_DAYS: i64 = 5;

/// Expected farrowing date for a sow served on `served_date`
pub fn expected_event_date(served_date: NaiveDate) -> NaiveDate {
    served_date + Duration::days(GESTATION_DAYS)
}

/// How close an expected farrowing is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    /// Farrowing expected today
    Due,
    /// Within the reminder window
    Imminent,
    Normal,
}

impl Urgency {
    /// Negative `days_left` means the entry is stale; that is reported as
    /// `Normal` here and checked separately.
    pub fn from_days_left(days_left: i64) -> Self {
        match days_left {
            0 => Self::Due,
            d if d > 0 && d < IMMINENT_WINDOW_DAYS => Self::Imminent,
            _ => Self::Normal,
        }
    }
}

/// Notification text for a countdown
pub fn countdown_message(days_left: i64) -> String {
    if days_left == 0 {
        "Today is the expected birth date! Prepare for piglets.".to_string()
    } else {
        format!("{} days left until the expected birth date.", days_left)
    }
}
