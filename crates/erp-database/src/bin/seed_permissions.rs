//! Grant every user a permission row on every menu
//!
//! Privileged roles (`admin`, `root`) receive full rights; everyone else can
//! only view. Existing rows of each user are replaced in one transaction.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use clap::Parser;
use erp_core::{Config, Result};
use erp_database::{Database, SeedReport};
use std::process::ExitCode;
use tracing::{error, info};

/// Command line interface for the permission seeder
#[derive(Parser)]
#[command(
    name = "erp-seed-permissions",
    version = env!("CARGO_PKG_VERSION"),
    about = "Seed menu permissions for every ERP user"
)]
struct Cli {
    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Only report what would be written
    #[arg(long)]
    dry_run: bool,

    /// Run pending migrations first
    #[arg(long)]
    migrate: bool,

    /// Log level (trace, debug, info, warn, error); overrides `logging.level`
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable structured JSON logging and print the report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: .env file not loaded: {e}");
    }

    let cli = Cli::parse();
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            return ExitCode::FAILURE;
        }
    };
    let logging = config
        .logging
        .clone()
        .with_overrides(cli.log_level.as_deref(), cli.json);
    if let Err(e) = erp_core::init_logging_with(&logging) {
        eprintln!("❌ {e}");
        return ExitCode::FAILURE;
    }
    info!(
        version = env!("CARGO_PKG_VERSION"),
        dry_run = cli.dry_run,
        "permission seeder starting"
    );

    match run(&cli, config).await {
        Ok(report) => {
            print_report(&report, cli.json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "permission seeding failed");
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, mut config: Config) -> Result<SeedReport> {
    if let Some(url) = &cli.database_url {
        config.database.url.clone_from(url);
    }

    let database = Database::new(&config).await?;
    database.health_check().await?;

    if cli.migrate {
        database.migrate().await?;
        info!("migrations applied");
    }

    database.seed_permissions(cli.dry_run).await
}

fn print_report(report: &SeedReport, json: bool) {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("Failed to serialize report: {e}"),
        }
        return;
    }

    let verb = if report.dry_run { "would write" } else { "wrote" };
    println!(
        "✅ {} users × {} menus ({} privileged): {verb} {} rows, removed {}",
        report.users,
        report.menus,
        report.privileged_users,
        report.rows_inserted,
        report.rows_deleted
    );
}
