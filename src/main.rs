use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;

use employee_sync::{CommitPolicy, SyncConfig, SyncError, sync};

#[derive(Parser, Debug)]
#[command(
    name = "employee-sync",
    about = "Load employee records from a CSV file and upsert them into PostgreSQL"
)]
struct Args {
    /// CSV file to load (falls back to EMPLOYEE_CSV_PATH).
    csv_path: Option<PathBuf>,

    /// Target database URL (overrides DATABASE_URL).
    #[arg(long)]
    database_url: Option<String>,

    /// Commit after every record (`per_record`) or once for the whole file (`batch`).
    #[arg(long)]
    commit_policy: Option<CommitPolicy>,

    /// Print the run report as JSON.
    #[arg(long)]
    json: bool,
}

fn build_config(
    args: &Args,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SyncConfig, SyncError> {
    let mut config = SyncConfig::from_lookup(lookup, args.database_url.clone())?;

    if let Some(path) = &args.csv_path {
        config.csv_path = Some(path.clone());
    }
    if let Some(policy) = args.commit_policy {
        config.commit_policy = policy;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    employee_sync::init_logger();

    let args = Args::parse();
    let config = match build_config(&args, |key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(err) => {
            writeln!(io::stderr(), "error: {err}")?;
            std::process::exit(2);
        }
    };

    match sync::run(&config).await {
        Ok(report) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Synchronized employees: {report}");
            }
            Ok(())
        }
        Err(err) => {
            log::error!("sync failed: {}", err);
            writeln!(io::stderr(), "error: {err}")?;
            std::process::exit(1);
        }
    }
}
