//! Database module
//!
//! Connection checks and schema setup for the Postgres record store.

use sqlx::PgPool;

/// Tables the record store reads and writes
pub const REQUIRED_TABLES: [&str; 3] = ["batches", "slaughter_records", "breeding_entries"];

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS batches (
        id BIGSERIAL PRIMARY KEY,
        batch_identifier TEXT NOT NULL,
        date_of_birth TEXT NOT NULL,
        males BIGINT NOT NULL CHECK (males >= 0),
        females BIGINT NOT NULL CHECK (females >= 0),
        mother_id TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS slaughter_records (
        id BIGSERIAL PRIMARY KEY,
        batch_identifier TEXT NOT NULL,
        actor_id TEXT NOT NULL,
        males_removed BIGINT NOT NULL,
        females_removed BIGINT NOT NULL,
        average_weight DOUBLE PRECISION NOT NULL,
        event_date TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS breeding_entries (
        id BIGSERIAL PRIMARY KEY,
        pig_identifier TEXT NOT NULL,
        served_date TEXT NOT NULL,
        expected_event_date TEXT NOT NULL
    )
    "#,
];

/// Simple connectivity check
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Create any missing table
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::debug!("Schema ensured");
    Ok(())
}

/// Check if required tables exist
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    for table in REQUIRED_TABLES {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    Ok(true)
}
