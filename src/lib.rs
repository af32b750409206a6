pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod sync;

use env_logger::Env;
use std::sync::Once;

pub use config::{CommitPolicy, DatabaseConfig, SyncConfig};
pub use error::{SyncError, SyncResult};
pub use models::{EmployeeRecord, Field, RawRow};

static LOGGER: Once = Once::new();

/// Install the `env_logger` backend once per process.
pub fn init_logger() {
    LOGGER.call_once(|| {
        env_logger::Builder::from_env(Env::default().default_filter_or("info,sqlx=warn")).init();
    });
}
