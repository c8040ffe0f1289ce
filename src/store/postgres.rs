//! PostgreSQL record store
//!
//! Builds its SQL from each record kind's column layout. Every table has a
//! `BIGSERIAL id` primary key followed by the declared columns.

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};

use crate::records::Record;

use super::{FieldType, FieldValue, Fields, RecordKind, RecordStore, StoreError, StoreResult};

/// Record store backed by a Postgres pool
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    /// Create a new store with a database pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn column_list(kind: &RecordKind) -> String {
    kind.columns
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn insert_sql(kind: &RecordKind) -> String {
    let placeholders = (1..=kind.columns.len())
        .map(|i| format!("${}", i))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING id",
        kind.table,
        column_list(kind),
        placeholders
    )
}

fn update_sql(kind: &RecordKind) -> String {
    let assignments = kind
        .columns
        .iter()
        .enumerate()
        .map(|(i, (name, _))| format!("{} = ${}", name, i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {} WHERE id = ${}",
        kind.table,
        assignments,
        kind.columns.len() + 1
    )
}

fn select_sql(kind: &RecordKind, by_id: bool) -> String {
    let mut sql = format!("SELECT id, {} FROM {}", column_list(kind), kind.table);
    if by_id {
        sql.push_str(" WHERE id = $1");
    } else {
        sql.push_str(" ORDER BY id ASC");
    }
    sql
}

/// Bind every declared column of `fields`, in layout order
fn bind_columns<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    kind: &RecordKind,
    fields: &Fields,
) -> StoreResult<Query<'q, Postgres, PgArguments>> {
    for (name, _) in kind.columns {
        query = match fields.get(*name)? {
            FieldValue::Text(s) => query.bind(s.clone()),
            FieldValue::Integer(i) => query.bind(*i),
            FieldValue::Real(r) => query.bind(*r),
        };
    }
    Ok(query)
}

fn decode_row<R: Record>(row: &PgRow) -> StoreResult<R> {
    let kind = R::KIND;
    let id: i64 = row.try_get("id")?;

    let mut fields = Fields::new(&kind);
    for (name, field_type) in kind.columns {
        let value = match field_type {
            FieldType::Text => FieldValue::Text(row.try_get::<String, _>(*name)?),
            FieldType::Integer => FieldValue::Integer(row.try_get::<i64, _>(*name)?),
            FieldType::Real => FieldValue::Real(row.try_get::<f64, _>(*name)?),
        };
        fields.set(*name, value);
    }

    R::from_fields(id, &fields)
}

impl RecordStore for PgRecordStore {
    async fn insert<R: Record>(&self, record: &R) -> StoreResult<i64> {
        let kind = R::KIND;
        let sql = insert_sql(&kind);
        let fields = record.to_fields();

        let row = bind_columns(sqlx::query(&sql), &kind, &fields)?
            .fetch_one(&self.pool)
            .await?;
        let id: i64 = row.try_get("id")?;

        tracing::debug!(table = kind.table, id, "Inserted record");
        Ok(id)
    }

    async fn fetch_all<R: Record>(&self) -> StoreResult<Vec<R>> {
        let sql = select_sql(&R::KIND, false);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter().map(decode_row::<R>).collect()
    }

    async fn fetch_by_id<R: Record>(&self, id: i64) -> StoreResult<Option<R>> {
        let sql = select_sql(&R::KIND, true);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(decode_row::<R>).transpose()
    }

    async fn update<R: Record>(&self, record: &R) -> StoreResult<()> {
        let kind = R::KIND;
        let id = record.id().ok_or(StoreError::Unsaved(kind.table))?;
        let sql = update_sql(&kind);
        let fields = record.to_fields();

        let result = bind_columns(sqlx::query(&sql), &kind, &fields)?
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                table: kind.table,
                id,
            });
        }
        Ok(())
    }

    async fn delete<R: Record>(&self, id: i64) -> StoreResult<()> {
        let table = R::KIND.table;
        let sql = format!("DELETE FROM {} WHERE id = $1", table);

        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { table, id });
        }
        Ok(())
    }

    /// Both statements run in one transaction; an early return rolls back
    async fn update_and_append<U: Record, A: Record>(
        &self,
        updated: &U,
        _previous: &U,
        appended: &A,
    ) -> StoreResult<i64> {
        let update_kind = U::KIND;
        let append_kind = A::KIND;
        let id = updated.id().ok_or(StoreError::Unsaved(update_kind.table))?;

        let update = update_sql(&update_kind);
        let insert = insert_sql(&append_kind);
        let updated_fields = updated.to_fields();
        let appended_fields = appended.to_fields();

        let mut tx = self.pool.begin().await?;

        let result = bind_columns(sqlx::query(&update), &update_kind, &updated_fields)?
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                table: update_kind.table,
                id,
            });
        }

        let row = bind_columns(sqlx::query(&insert), &append_kind, &appended_fields)?
            .fetch_one(&mut *tx)
            .await?;
        let appended_id: i64 = row.try_get("id")?;

        tx.commit().await?;

        tracing::debug!(
            updated = update_kind.table,
            appended = append_kind.table,
            id = appended_id,
            "Committed update and append"
        );
        Ok(appended_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIND: RecordKind = RecordKind {
        table: "samples",
        columns: &[
            ("name", FieldType::Text),
            ("head_count", FieldType::Integer),
            ("weight", FieldType::Real),
        ],
    };

    #[test]
    fn test_insert_sql() {
        assert_eq!(
            insert_sql(&KIND),
            "INSERT INTO samples (name, head_count, weight) VALUES ($1, $2, $3) RETURNING id"
        );
    }

    #[test]
    fn test_update_sql() {
        assert_eq!(
            update_sql(&KIND),
            "UPDATE samples SET name = $1, head_count = $2, weight = $3 WHERE id = $4"
        );
    }

    #[test]
    fn test_select_sql() {
        assert_eq!(
            select_sql(&KIND, false),
            "SELECT id, name, head_count, weight FROM samples ORDER BY id ASC"
        );
        assert_eq!(
            select_sql(&KIND, true),
            "SELECT id, name, head_count, weight FROM samples WHERE id = $1"
        );
    }
}
