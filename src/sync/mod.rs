//! Employee CSV synchronization.
//!
//! Moves employee rows from a CSV file into the PostgreSQL `employee` table.
//!
//! # Components
//!
//! - **`validation`**: Turns raw header→text rows into typed [`EmployeeRecord`]s or a
//!   structured [`Rejection`]. The same length check runs again right before a write.
//!
//! - **`loader`**: Reads the whole CSV file, maps cells by header name, and drops rows
//!   that fail validation with a logged reason.
//!
//! - **`upsert`**: Looks each record up by `e_id` and inserts or updates it, committing
//!   per record or once per batch depending on [`CommitPolicy`].
//!
//! - **`database`**: Creates the `employee` table via embedded migrations.
//!
//! - **`stats`**: Per-run counts of inserted, updated and rejected records.
//!
//! ## Data Flow
//!
//! 1. **Load**: the file is read and validated completely before any connection is opened
//! 2. **Connect**: a pool is opened against the target database
//! 3. **Initialize**: the `employee` table is created if missing
//! 4. **Upsert**: records are written one after another in file order
//!
//! Invalid rows never stop a run. I/O and storage errors do.
//!
//! [`EmployeeRecord`]: crate::models::EmployeeRecord
//! [`Rejection`]: validation::Rejection
//! [`CommitPolicy`]: crate::config::CommitPolicy

pub mod database;
pub mod loader;
pub mod stats;
pub mod upsert;
pub mod validation;

use crate::config::SyncConfig;
use crate::db;
use crate::error::{SyncError, SyncResult};

pub use database::{initialize, reset_table};
pub use loader::{LoadOutcome, load, load_with_report};
pub use stats::SyncReport;
pub use upsert::{EmployeeSynchronizer, SyncOutcome};

/// Run one full sync: load the configured file, then upsert it.
pub async fn run(config: &SyncConfig) -> SyncResult<SyncReport> {
    let path = config
        .csv_path
        .as_deref()
        .ok_or_else(|| SyncError::InvalidArgument("no CSV path configured".into()))?;

    let outcome = load_with_report(path)?;

    let pool = db::connect(&config.database).await?;
    let synchronizer = EmployeeSynchronizer::new(pool.clone(), config.commit_policy);
    synchronizer.initialize().await?;

    let result = synchronizer.sync_all(&outcome.records).await;
    pool.close().await;

    let mut report = result?;
    report.merge(SyncReport {
        rejected: outcome.rejections.len(),
        ..SyncReport::default()
    });
    Ok(report)
}
