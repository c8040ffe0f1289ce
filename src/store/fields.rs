//! Column values
//!
//! Records cross the store boundary as a map of column name to a small set
//! of scalar values, so any backend can persist them without knowing the
//! record types.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::domain::{format_date, parse_date};

use super::StoreError;

/// SQL-level type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer,
    Real,
}

/// One stored column value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Real(f64),
}

/// Table layout of a record kind (excluding the `id` primary key)
#[derive(Debug, Clone, Copy)]
pub struct RecordKind {
    pub table: &'static str,
    pub columns: &'static [(&'static str, FieldType)],
}

/// Column values of one record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    table: &'static str,
    values: BTreeMap<&'static str, FieldValue>,
}

impl Fields {
    pub fn new(kind: &RecordKind) -> Self {
        Self {
            table: kind.table,
            values: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, column: &'static str, value: FieldValue) -> &mut Self {
        self.values.insert(column, value);
        self
    }

    pub fn text(mut self, column: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(column, FieldValue::Text(value.into()));
        self
    }

    pub fn integer(mut self, column: &'static str, value: i64) -> Self {
        self.values.insert(column, FieldValue::Integer(value));
        self
    }

    pub fn real(mut self, column: &'static str, value: f64) -> Self {
        self.values.insert(column, FieldValue::Real(value));
        self
    }

    /// Dates are stored as `YYYY-MM-DD` text
    pub fn date(self, column: &'static str, value: NaiveDate) -> Self {
        self.text(column, format_date(value))
    }

    pub fn get(&self, column: &'static str) -> Result<&FieldValue, StoreError> {
        self.values.get(column).ok_or(StoreError::MissingField {
            table: self.table,
            field: column,
        })
    }

    pub fn get_text(&self, column: &'static str) -> Result<&str, StoreError> {
        match self.get(column)? {
            FieldValue::Text(s) => Ok(s),
            _ => Err(self.missing(column)),
        }
    }

    pub fn get_integer(&self, column: &'static str) -> Result<i64, StoreError> {
        match self.get(column)? {
            FieldValue::Integer(i) => Ok(*i),
            _ => Err(self.missing(column)),
        }
    }

    /// Integer column that must fit a head count
    pub fn get_count(&self, column: &'static str) -> Result<u32, StoreError> {
        let value = self.get_integer(column)?;
        u32::try_from(value).map_err(|_| self.missing(column))
    }

    pub fn get_real(&self, column: &'static str) -> Result<f64, StoreError> {
        match self.get(column)? {
            FieldValue::Real(r) => Ok(*r),
            FieldValue::Integer(i) => Ok(*i as f64),
            _ => Err(self.missing(column)),
        }
    }

    pub fn get_date(&self, column: &'static str) -> Result<NaiveDate, StoreError> {
        let raw = self.get_text(column)?;
        parse_date(raw).map_err(|e| StoreError::malformed(self.table, e))
    }

    fn missing(&self, column: &'static str) -> StoreError {
        StoreError::MissingField {
            table: self.table,
            field: column,
        }
    }
}
