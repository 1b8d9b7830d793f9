//! Journal Engine Binary
//!
//! Runs one journal operation against the JSON-file ledger and store and
//! prints the result as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin journal-engine -- generate --force
//! cargo run --bin journal-engine -- metrics --buy-ids 1,2 --sell-ids 3,4
//! cargo run --bin journal-engine -- repair --remove-duplicates
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log filter (default: `journal_engine=info`)
//! - Any `${VAR}` referenced from the YAML config

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use journal_engine::application::dto::CalculateMetricsRequestDto;
use journal_engine::config::{Config, DEFAULT_CONFIG_PATH, load_config};
use journal_engine::domain::shared::ExecutionId;
use journal_engine::observability::{TracingConfig, init_tracing};
use journal_engine::{JsonFileContainer, RepairOptions};

#[derive(Parser)]
#[command(author, version, about = "Trade journal episode engine")]
struct Cli {
    /// YAML config file (default: journal.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Override the ledger file path
    #[arg(long, global = true)]
    ledger: Option<String>,

    /// Override the store file path
    #[arg(long, global = true)]
    store: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List completed round-trips without persisting anything
    Identify,
    /// Compute metrics for explicit ledger executions
    Metrics {
        /// Buy execution ids
        #[arg(long, value_delimiter = ',', required = true)]
        buy_ids: Vec<i64>,
        /// Sell execution ids
        #[arg(long, value_delimiter = ',', required = true)]
        sell_ids: Vec<i64>,
    },
    /// Generate historical records (creates missing rows unless forced)
    Generate {
        /// Delete every row and regenerate from the ledger
        #[arg(long)]
        force: bool,
    },
    /// Incrementally sync historical records with the ledger
    Sync,
    /// Check integrity, then regenerate or sync
    Init {
        /// Regenerate even when the store is valid
        #[arg(long)]
        force: bool,
    },
    /// Compare the store with the ledger
    Check,
    /// Repair the store
    Repair(RepairArgs),
    /// Aggregate statistics over the store
    Stats,
}

#[derive(Args)]
struct RepairArgs {
    /// Keep the lowest-id row of each duplicate group
    #[arg(long)]
    remove_duplicates: bool,
    /// Rewrite rows whose metrics drifted from their executions
    #[arg(long)]
    fix_inconsistencies: bool,
    /// Delete rows whose executions no longer resolve
    #[arg(long, alias = "fix-invalid-references")]
    update_references: bool,
}

impl RepairArgs {
    /// Selected repairs; no flag means every repair.
    const fn options(&self) -> RepairOptions {
        let options = RepairOptions {
            remove_duplicates: self.remove_duplicates,
            fix_inconsistencies: self.fix_inconsistencies,
            update_references: self.update_references,
        };
        if options.any() {
            options
        } else {
            RepairOptions::all()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    load_dotenv();
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    init_tracing(&TracingConfig::from(&config.logging)).context("failed to initialize tracing")?;

    let container = JsonFileContainer::from_config(&config)
        .await
        .context("failed to open historical trade store")?;

    let success = match cli.command {
        Command::Identify => {
            let trades = container.identify_completed_trades_use_case().execute().await?;
            print_json(&trades)?;
            true
        }
        Command::Metrics { buy_ids, sell_ids } => {
            let request = CalculateMetricsRequestDto {
                buy_ids: buy_ids.into_iter().map(ExecutionId::new).collect(),
                sell_ids: sell_ids.into_iter().map(ExecutionId::new).collect(),
            };
            let metrics = container.calculate_metrics_use_case().execute(request).await?;
            print_json(&metrics)?;
            true
        }
        Command::Generate { force } => {
            let report = container.sync_history_use_case().generate(force).await?;
            print_json(&report)?;
            report.success
        }
        Command::Sync => {
            let report = container.sync_history_use_case().sync().await?;
            print_json(&report)?;
            report.success
        }
        Command::Init { force } => {
            let report = container.initialize_history_use_case().execute(force).await?;
            print_json(&report)?;
            report.success
        }
        Command::Check => {
            let report = container.check_integrity_use_case().execute().await?;
            print_json(&report)?;
            report.is_valid()
        }
        Command::Repair(args) => {
            let report = container
                .repair_integrity_use_case()
                .execute(args.options())
                .await?;
            print_json(&report)?;
            report.success
        }
        Command::Stats => {
            let stats = container.get_statistics_use_case().execute().await?;
            print_json(&stats)?;
            true
        }
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }
    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Config file if given or present, then command-line path overrides.
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match cli.config.as_deref() {
        Some(path) => load_config(Some(path))?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(None)?,
        None => Config::default(),
    };
    if let Some(ledger) = &cli.ledger {
        config.ledger.path.clone_from(ledger);
    }
    if let Some(store) = &cli.store {
        config.store.path.clone_from(store);
    }
    if config.ledger.path == config.store.path {
        anyhow::bail!("ledger and store must be different files");
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
