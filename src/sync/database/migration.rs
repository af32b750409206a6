//! Schema setup for the `employee` table.
//!
//! The table definition lives in `./migrations` and is applied through the
//! SQLx migrator, which records applied versions and skips them on later runs.

use crate::error::SyncResult;
use sqlx::{PgPool, migrate::Migrator};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Ensure the `employee` table exists.
///
/// Idempotent: migrations that have already been applied are skipped, and
/// the table DDL itself is `CREATE TABLE IF NOT EXISTS`.
pub async fn initialize(pool: &PgPool) -> SyncResult<()> {
    log::info!("checking employee table");
    MIGRATOR.run(pool).await?;
    log::info!("employee table ready");
    Ok(())
}

/// Remove every row from the `employee` table, keeping the schema.
pub async fn reset_table(pool: &PgPool) -> SyncResult<()> {
    log::info!("truncating employee table");
    sqlx::query("TRUNCATE TABLE employee").execute(pool).await?;
    Ok(())
}
