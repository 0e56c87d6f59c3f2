//! Ramp virtual users over the record list endpoints and check thresholds

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
use erp_harness::{
    HarnessResult, LoadTarget, Ramp, RunOptions, Stage, Thresholds, load::ThresholdResult,
    run_load,
};
use serde::Serialize;
use std::{process::ExitCode, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Command line interface for the load test
#[derive(Parser)]
#[command(
    name = "erp-load-test",
    version = env!("CARGO_PKG_VERSION"),
    about = "Staged-ramp load test of the ERP REST API"
)]
struct Cli {
    /// Backend base URL [default: `api.base_url`, http://localhost:3001]
    #[arg(long, env = "BASE_URL")]
    base_url: Option<String>,

    /// Ramp stage as DURATION:TARGET (e.g. 2m:10); repeat for several stages
    #[arg(long = "stage", value_name = "DURATION:TARGET")]
    stages: Vec<Stage>,

    /// Multiply every stage duration by this factor
    #[arg(long, default_value_t = 1.0)]
    time_scale: f64,

    /// Pause between iterations of one virtual user, in milliseconds
    #[arg(long)]
    think_time_ms: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error); overrides `logging.level`
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable structured JSON logging; overrides `logging.format`
    #[arg(long)]
    json_logs: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    report: &'a erp_harness::LoadReport,
    thresholds: &'a [ThresholdResult],
    passed: bool,
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
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %e, "load test could not start");
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, mut config: Config) -> HarnessResult<bool> {
    if let Some(url) = &cli.base_url {
        config.api.base_url.clone_from(url);
    }
    let ramp = if cli.stages.is_empty() {
        Ramp::default()
    } else {
        Ramp::new(cli.stages.clone())
    }
    .scaled(cli.time_scale);
    let options = RunOptions {
        think_time: Duration::from_millis(cli.think_time_ms.unwrap_or(config.load.think_time_ms)),
        ..RunOptions::default()
    };
    let thresholds = Thresholds::from(&config.load);

    let target = LoadTarget::connect(&config).await?;
    info!(paths = ?target.paths(), "signed in; starting ramp");

    let shutdown = CancellationToken::new();
    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("received Ctrl+C, stopping virtual users");
                ctrl_c.cancel();
            }
            Err(e) => error!(error = %e, "failed to listen for Ctrl+C"),
        }
    });

    let report = run_load(target, &ramp, options, shutdown).await;
    let verdicts = thresholds.evaluate(&report);
    let passed = verdicts.iter().all(|verdict| verdict.passed);

    if cli.json {
        let output = Output {
            report: &report,
            thresholds: &verdicts,
            passed,
        };
        match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("Failed to serialize report: {e}"),
        }
    } else {
        println!(
            "requests: {} ({:.1}/s), failed: {} ({:.2}%)",
            report.requests,
            report.throughput(),
            report.failures,
            report.error_rate * 100.0
        );
        println!(
            "latency ms: p50 {:.1}, p95 {:.1}, p99 {:.1}, max {:.1}",
            report.p50_ms, report.p95_ms, report.p99_ms, report.max_ms
        );
        println!("peak VUs: {}, duration: {:.1}s\n", report.peak_vus, report.duration_secs);
        for verdict in &verdicts {
            let mark = if verdict.passed { "✅" } else { "❌" };
            println!("{mark} {} (observed {:.3})", verdict.name, verdict.observed);
        }
    }

    Ok(passed)
}
