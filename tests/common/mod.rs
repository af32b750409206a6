#![allow(dead_code)]

use employee_sync::{EmployeeRecord, SyncError, sync};
use log::LevelFilter;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use testcontainers::{ContainerAsync, ImageExt, core::error::TestcontainersError};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use thiserror::Error;
use tokio::runtime::Handle;
use uuid::Uuid;

const POSTGRES_TAG: &str = "16-alpine";

#[derive(Debug, Error)]
pub enum TestDatabaseError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("schema error: {0}")]
    Sync(#[from] SyncError),
    #[error("container error: {0}")]
    Container(#[from] TestcontainersError),
}

/// Ephemeral database for integration tests.
///
/// Uses the server behind `TEST_DATABASE_URL` when set, otherwise launches a
/// disposable Postgres container. Every instance gets its own database.
pub struct TestDatabase {
    pool: Option<PgPool>,
    server_url: String,
    database_name: String,
    container: Option<ContainerAsync<PostgresImage>>,
}

impl TestDatabase {
    pub async fn new_from_env() -> Result<Self, TestDatabaseError> {
        match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => Self::on_server(server_url(&url), None).await,
            Err(_) => Self::new().await,
        }
    }

    /// Provision a fresh database inside a new Postgres container.
    pub async fn new() -> Result<Self, TestDatabaseError> {
        let container = PostgresImage::default()
            .with_tag(POSTGRES_TAG)
            .start()
            .await?;

        let host = container.get_host().await?.to_string();
        let port = container.get_host_port_ipv4(5432).await?;
        let server = format!("postgres://postgres:postgres@{}:{}", host, port);

        Self::on_server(server, Some(container)).await
    }

    async fn on_server(
        server_url: String,
        container: Option<ContainerAsync<PostgresImage>>,
    ) -> Result<Self, TestDatabaseError> {
        let admin_pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(quiet_options(&format!("{}/postgres", server_url))?)
            .await?;

        let database_name = format!("employee_sync_{}", Uuid::new_v4().simple());
        let create_sql = format!("CREATE DATABASE \"{}\" TEMPLATE template0", database_name);
        sqlx::query(&create_sql).execute(&admin_pool).await?;
        admin_pool.close().await;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(quiet_options(&format!("{}/{}", server_url, database_name))?)
            .await?;

        sync::initialize(&pool).await?;

        Ok(Self {
            pool: Some(pool),
            server_url,
            database_name,
            container,
        })
    }

    pub fn pool(&self) -> &PgPool {
        self.pool.as_ref().expect("test database pool is available")
    }

    pub fn pool_clone(&self) -> PgPool {
        self.pool().clone()
    }

    /// Connection URL of this test database.
    pub fn url(&self) -> String {
        format!("{}/{}", self.server_url, self.database_name)
    }

    /// All stored employees ordered by key.
    pub async fn employees(&self) -> Vec<EmployeeRecord> {
        sqlx::query_as::<_, EmployeeRecord>(
            "SELECT e_id, e_name, e_designation, e_addr, e_branch, e_cont_no FROM employee ORDER BY e_id",
        )
        .fetch_all(self.pool())
        .await
        .expect("employee lookup succeeded")
    }

    /// Close pool connections and drop the ephemeral database.
    pub async fn close(mut self) -> Result<(), TestDatabaseError> {
        if let Some(pool) = self.pool.take() {
            pool.close().await;
        }

        drop_database(&self.server_url, &self.database_name).await?;

        if let Some(container) = self.container.take() {
            drop(container);
        }

        Ok(())
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        if let Some(pool) = self.pool.take() {
            let server_url = self.server_url.clone();
            let db_name = self.database_name.clone();
            if let Ok(handle) = Handle::try_current() {
                handle.spawn(async move {
                    pool.close().await;
                    let _ = drop_database(&server_url, &db_name).await;
                });
            }
        }

        if let Some(container) = self.container.take() {
            drop(container);
        }
    }
}

/// Provision a database, or explain why the test is being skipped.
pub async fn provision(test_name: &str) -> Option<TestDatabase> {
    match TestDatabase::new_from_env().await {
        Ok(db) => Some(db),
        Err(err) => {
            eprintln!("skipping {test_name}: no test database available ({err})");
            None
        }
    }
}

pub fn employee(id: i64, name: &str) -> EmployeeRecord {
    EmployeeRecord {
        id,
        name: name.to_string(),
        designation: "Engineer".to_string(),
        address: format!("{id} Main St"),
        branch: "HQ".to_string(),
        contact_number: 555_000_000 + id,
    }
}

fn quiet_options(url: &str) -> Result<PgConnectOptions, sqlx::Error> {
    let options: PgConnectOptions = url.parse()?;
    Ok(options.log_statements(LevelFilter::Off))
}

/// Strip the database path from a connection URL.
fn server_url(url: &str) -> String {
    let authority_start = url.find("://").map(|i| i + 3).unwrap_or(0);
    match url[authority_start..].find('/') {
        Some(i) => url[..authority_start + i].to_string(),
        None => url.to_string(),
    }
}

async fn drop_database(server_url: &str, database_name: &str) -> Result<(), sqlx::Error> {
    let admin_pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(quiet_options(&format!("{}/postgres", server_url))?)
        .await?;

    let drop_force = format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)", database_name);
    match sqlx::query(&drop_force).execute(&admin_pool).await {
        Ok(_) => Ok(()),
        Err(err) if force_drop_unsupported(&err) => {
            let drop_sql = format!("DROP DATABASE IF EXISTS \"{}\"", database_name);
            sqlx::query(&drop_sql).execute(&admin_pool).await?;
            Ok(())
        }
        Err(err) => Err(err),
    }
}

fn force_drop_unsupported(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err)
            if db_err
                .code()
                .map(|code| code == "42601" || code == "0A000")
                .unwrap_or(false)
    )
}
