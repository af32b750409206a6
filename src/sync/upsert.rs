//! Key-based upsert of employee records.
//!
//! For every record the synchronizer re-runs [`validation::check_record`],
//! looks up the row by `e_id`, then issues exactly one INSERT or UPDATE.
//! Under [`CommitPolicy::PerRecord`] each record is committed before the next
//! one is touched, so a storage error keeps everything written before it.
//! Under [`CommitPolicy::Batch`] the whole run shares one transaction and a
//! storage error rolls all of it back.
//!
//! Storage errors are never caught here; they end the run.

use crate::config::CommitPolicy;
use crate::error::SyncResult;
use crate::models::EmployeeRecord;
use crate::sync::database::migration;
use crate::sync::stats::SyncReport;
use crate::sync::validation::{self, Rejection};
use sqlx::{PgPool, Postgres, Transaction};

/// Terminal state of a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Inserted,
    Updated,
    Rejected(Rejection),
}

/// Reconciles validated records against the `employee` table.
pub struct EmployeeSynchronizer {
    pool: PgPool,
    policy: CommitPolicy,
}

impl EmployeeSynchronizer {
    pub fn new(pool: PgPool, policy: CommitPolicy) -> Self {
        Self { pool, policy }
    }

    /// Ensure the `employee` table exists. Safe to call repeatedly.
    pub async fn initialize(&self) -> SyncResult<()> {
        migration::initialize(&self.pool).await
    }

    /// Upsert every record in order.
    ///
    /// An empty slice leaves storage untouched. The first storage error aborts
    /// the remaining records.
    pub async fn sync_all(&self, records: &[EmployeeRecord]) -> SyncResult<SyncReport> {
        let mut report = SyncReport::started();

        if records.is_empty() {
            log::warn!("no records to synchronize");
            report.finish();
            return Ok(report);
        }

        log::info!(
            "sync started: {} records, commit policy {}",
            records.len(),
            self.policy
        );

        match self.policy {
            CommitPolicy::PerRecord => {
                for record in records {
                    let outcome = self.sync_one(record).await?;
                    report.record(&outcome);
                }
            }
            CommitPolicy::Batch => {
                let mut tx = self.pool.begin().await?;
                for record in records {
                    let outcome = match precheck(record) {
                        Some(rejected) => rejected,
                        None => write_in_tx(&mut tx, record).await?,
                    };
                    report.record(&outcome);
                }
                tx.commit().await?;
            }
        }

        report.finish();
        log::info!("sync finished: {}", report);
        Ok(report)
    }

    /// Upsert one record and commit it immediately.
    pub async fn sync_one(&self, record: &EmployeeRecord) -> SyncResult<SyncOutcome> {
        if let Some(rejected) = precheck(record) {
            return Ok(rejected);
        }

        let mut tx = self.pool.begin().await?;
        let outcome = write_in_tx(&mut tx, record).await?;
        tx.commit().await?;
        Ok(outcome)
    }
}

/// Re-check a record before it reaches storage.
fn precheck(record: &EmployeeRecord) -> Option<SyncOutcome> {
    let rejection = validation::check_record(record).err()?;
    log::warn!("skipping employee {}: {}", record.id, rejection);
    Some(SyncOutcome::Rejected(rejection))
}

/// One lookup by key, then one INSERT or UPDATE. `e_id` is never modified.
async fn write_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    record: &EmployeeRecord,
) -> SyncResult<SyncOutcome> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM employee WHERE e_id = $1)")
        .bind(record.id)
        .fetch_one(&mut **tx)
        .await?;

    if exists {
        sqlx::query(
            r#"UPDATE employee
               SET e_name = $2,
                   e_designation = $3,
                   e_addr = $4,
                   e_branch = $5,
                   e_cont_no = $6
               WHERE e_id = $1"#,
        )
        .bind(record.id)
        .bind(&record.name)
        .bind(&record.designation)
        .bind(&record.address)
        .bind(&record.branch)
        .bind(record.contact_number)
        .execute(&mut **tx)
        .await?;

        log::debug!("updated employee {}", record.id);
        Ok(SyncOutcome::Updated)
    } else {
        sqlx::query(
            r#"INSERT INTO employee (e_id, e_name, e_designation, e_addr, e_branch, e_cont_no)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(record.id)
        .bind(&record.name)
        .bind(&record.designation)
        .bind(&record.address)
        .bind(&record.branch)
        .bind(record.contact_number)
        .execute(&mut **tx)
        .await?;

        log::debug!("inserted employee {}", record.id);
        Ok(SyncOutcome::Inserted)
    }
}
