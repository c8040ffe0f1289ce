//! In-memory record store
//!
//! Mutex-guarded tables with monotonically increasing ids. Used by tests
//! and for running the service without a database.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::records::Record;

use super::{Fields, RecordStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Tables {
    last_id: HashMap<&'static str, i64>,
    rows: HashMap<&'static str, BTreeMap<i64, Fields>>,
}

impl Tables {
    fn insert(&mut self, table: &'static str, fields: Fields) -> i64 {
        let id = {
            let last = self.last_id.entry(table).or_insert(0);
            *last += 1;
            *last
        };
        self.rows.entry(table).or_default().insert(id, fields);
        id
    }

    fn row_mut(&mut self, table: &'static str, id: i64) -> StoreResult<&mut Fields> {
        self.rows
            .get_mut(table)
            .and_then(|rows| rows.get_mut(&id))
            .ok_or(StoreError::NotFound { table, id })
    }
}

/// Record store kept in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline every call fails with `StoreError::Unavailable`
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn tables(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".to_string()));
        }
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl RecordStore for MemoryStore {
    async fn insert<R: Record>(&self, record: &R) -> StoreResult<i64> {
        let mut tables = self.tables()?;
        Ok(tables.insert(R::KIND.table, record.to_fields()))
    }

    async fn fetch_all<R: Record>(&self) -> StoreResult<Vec<R>> {
        let tables = self.tables()?;
        let Some(rows) = tables.rows.get(R::KIND.table) else {
            return Ok(Vec::new());
        };

        rows.iter()
            .map(|(id, fields)| R::from_fields(*id, fields))
            .collect()
    }

    async fn fetch_by_id<R: Record>(&self, id: i64) -> StoreResult<Option<R>> {
        let tables = self.tables()?;
        tables
            .rows
            .get(R::KIND.table)
            .and_then(|rows| rows.get(&id))
            .map(|fields| R::from_fields(id, fields))
            .transpose()
    }

    async fn update<R: Record>(&self, record: &R) -> StoreResult<()> {
        let table = R::KIND.table;
        let id = record.id().ok_or(StoreError::Unsaved(table))?;
        let mut tables = self.tables()?;

        *tables.row_mut(table, id)? = record.to_fields();
        Ok(())
    }

    async fn delete<R: Record>(&self, id: i64) -> StoreResult<()> {
        let table = R::KIND.table;
        let mut tables = self.tables()?;

        tables
            .rows
            .get_mut(table)
            .and_then(|rows| rows.remove(&id))
            .map(|_| ())
            .ok_or(StoreError::NotFound { table, id })
    }

    /// Both writes happen under one lock
    async fn update_and_append<U: Record, A: Record>(
        &self,
        updated: &U,
        _previous: &U,
        appended: &A,
    ) -> StoreResult<i64> {
        let table = U::KIND.table;
        let id = updated.id().ok_or(StoreError::Unsaved(table))?;
        let mut tables = self.tables()?;

        *tables.row_mut(table, id)? = updated.to_fields();
        Ok(tables.insert(A::KIND.table, appended.to_fields()))
    }
}
