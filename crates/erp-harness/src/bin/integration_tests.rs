//! Run the integration suite against a deployed backend and front end

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use clap::Parser;
use erp_core::Config;
use erp_harness::{Harness, HarnessResult, Summary, run_suite, select_cases};
use std::process::ExitCode;
use tracing::{error, info};

/// Command line interface for the integration suite
#[derive(Parser)]
#[command(
    name = "erp-integration-tests",
    version = env!("CARGO_PKG_VERSION"),
    about = "Health, auth, API, front-end and security checks for an ERP deployment"
)]
struct Cli {
    /// Backend base URL [default: `api.base_url`, http://localhost:3001]
    #[arg(long, env = "TEST_BASE_URL")]
    base_url: Option<String>,

    /// Front-end URL [default: `api.frontend_url`, http://localhost:3000]
    #[arg(long, env = "TEST_FRONTEND_URL")]
    frontend_url: Option<String>,

    /// Print details of passed cases
    #[arg(short, long)]
    verbose: bool,

    /// Run only the security cases
    #[arg(long)]
    security_only: bool,

    /// Log level (trace, debug, info, warn, error); overrides `logging.level`
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable structured JSON logging; overrides `logging.format`
    #[arg(long)]
    json_logs: bool,
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
        .with_overrides(cli.log_level.as_deref(), cli.json_logs);
    if let Err(e) = erp_core::init_logging_with(&logging) {
        eprintln!("❌ {e}");
        return ExitCode::FAILURE;
    }

    match run(&cli, config).await {
        Ok(summary) => {
            print!("{}", summary.report(cli.verbose));
            ExitCode::from(summary.exit_code())
        }
        Err(e) => {
            error!(error = %e, "integration suite could not start");
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, mut config: Config) -> HarnessResult<Summary> {
    if let Some(url) = &cli.base_url {
        config.api.base_url.clone_from(url);
    }
    if let Some(url) = &cli.frontend_url {
        config.api.frontend_url.clone_from(url);
    }

    let harness = Harness::from_config(&config)?;
    let cases = select_cases(cli.security_only);

    info!(
        base_url = harness.base_url(),
        frontend_url = harness.frontend_url(),
        cases = cases.len(),
        "running integration suite"
    );
    println!("🧪 {} cases against {}\n", cases.len(), harness.base_url());

    Ok(run_suite(&harness, &cases).await)
}
