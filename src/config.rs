use crate::error::{SyncError, SyncResult};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

fn env_bool(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    lookup(key)
        .map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

fn env_u32(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u32) -> u32 {
    lookup(key)
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

fn env_duration_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default_millis: u64,
) -> Duration {
    lookup(key)
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or_else(|| Duration::from_millis(default_millis))
}

/// When changes are committed during a sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommitPolicy {
    /// Commit after every record; a failure keeps everything committed before it.
    #[default]
    PerRecord,
    /// One transaction for the whole batch; a failure rolls back every record.
    Batch,
}

impl fmt::Display for CommitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CommitPolicy::PerRecord => "per_record",
            CommitPolicy::Batch => "batch",
        })
    }
}

impl FromStr for CommitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "per_record" | "record" | "" => Ok(CommitPolicy::PerRecord),
            "batch" => Ok(CommitPolicy::Batch),
            other => Err(format!(
                "unknown commit policy '{other}' (expected 'per_record' or 'batch')"
            )),
        }
    }
}

/// Connection settings for the target database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// Create the database named in `url` when it does not exist yet.
    pub create_database: bool,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            create_database: true,
        }
    }
}

/// Runtime configuration for a sync run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub csv_path: Option<PathBuf>,
    pub database: DatabaseConfig,
    pub commit_policy: CommitPolicy,
}

impl SyncConfig {
    pub fn from_env() -> SyncResult<Self> {
        Self::from_lookup(|key| env::var(key).ok(), None)
    }

    /// Build a config from `lookup`, the environment in production.
    ///
    /// `database_url` stands in for `DATABASE_URL` and wins over it. Every
    /// other setting still comes from `lookup`, and a bad value is an error.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        database_url: Option<String>,
    ) -> SyncResult<Self> {
        let url = database_url
            .or_else(|| lookup("DATABASE_URL"))
            .ok_or_else(|| SyncError::Config("DATABASE_URL is required".into()))?;

        let commit_policy = match lookup("SYNC_COMMIT_POLICY") {
            Some(value) => CommitPolicy::from_str(&value).map_err(SyncError::Config)?,
            None => CommitPolicy::default(),
        };

        Ok(Self {
            csv_path: lookup("EMPLOYEE_CSV_PATH").map(PathBuf::from),
            database: DatabaseConfig {
                url,
                max_connections: env_u32(&lookup, "SYNC_DB_MAX_CONNECTIONS", 1),
                acquire_timeout: env_duration_millis(&lookup, "SYNC_DB_ACQUIRE_TIMEOUT_MS", 30_000),
                create_database: env_bool(&lookup, "SYNC_CREATE_DATABASE", true),
            },
            commit_policy,
        })
    }

    pub fn new(csv_path: impl Into<PathBuf>, database_url: impl Into<String>) -> Self {
        Self {
            csv_path: Some(csv_path.into()),
            database: DatabaseConfig::new(database_url),
            commit_policy: CommitPolicy::default(),
        }
    }

    pub fn with_commit_policy(mut self, policy: CommitPolicy) -> Self {
        self.commit_policy = policy;
        self
    }
}
