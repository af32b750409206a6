use crate::config::DatabaseConfig;
use sqlx::migrate::MigrateDatabase;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres};

/// Open a connection pool to the target database.
///
/// When `create_database` is set the database named in the URL is created
/// first if it does not exist. The server version is logged once connected.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    if config.create_database && !Postgres::database_exists(&config.url).await? {
        log::info!("target database does not exist, creating it");
        Postgres::create_database(&config.url).await?;
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await?;

    let (version,): (String,) = sqlx::query_as("SELECT version()")
        .fetch_one(&pool)
        .await?;
    log::info!("connected to {}", version);

    Ok(pool)
}
