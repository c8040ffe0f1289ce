//! Command definitions
//!
//! Commands represent intentions to change the herd records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::BatchIdentifier;

// =========================================================================
// RegisterBatchCommand
// =========================================================================

/// Command to register a newborn batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterBatchCommand {
    pub date_of_birth: NaiveDate,
    pub males: u32,
    pub females: u32,
    pub mother_id: String,
}

impl RegisterBatchCommand {
    pub fn new(date_of_birth: NaiveDate, males: u32, females: u32, mother_id: String) -> Self {
        Self {
            date_of_birth,
            males,
            females,
            mother_id,
        }
    }
}

// =========================================================================
// RecordServiceCommand
// =========================================================================

/// Command to record that a sow was served
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordServiceCommand {
    pub pig_identifier: String,
    pub served_date: NaiveDate,
}

impl RecordServiceCommand {
    pub fn new(pig_identifier: String, served_date: NaiveDate) -> Self {
        Self {
            pig_identifier,
            served_date,
        }
    }
}

// =========================================================================
// ReduceBatchCommand
// =========================================================================

/// Command to take slaughtered animals off a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReduceBatchCommand {
    pub batch_identifier: BatchIdentifier,
    pub males_removed: u32,
    pub females_removed: u32,
    /// Average carcass weight in kg (validated by the handler)
    pub average_weight: f64,
}

impl ReduceBatchCommand {
    pub fn new(
        batch_identifier: BatchIdentifier,
        males_removed: u32,
        females_removed: u32,
        average_weight: f64,
    ) -> Self {
        Self {
            batch_identifier,
            males_removed,
            females_removed,
            average_weight,
        }
    }
}
