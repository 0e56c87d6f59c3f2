//! Console front end for the ERP record pages
//!
//! Lists, filters, summarises and edits records of one page, either on the
//! bundled sample data or against a live API.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use clap::Parser;
use erp_client::{
    ApiClient,
    console::{self, Action, ConsoleContext, OutputFormat, Resource},
    render,
};
use erp_core::{
    Config,
    context_error::{ContextError, Result, ResultExt},
};
use std::{path::PathBuf, process::ExitCode, sync::Arc, time::Duration};
use tracing::{error, info};

/// Command line interface for the record console
#[derive(Parser)]
#[command(
    name = "erp-console",
    version = env!("CARGO_PKG_VERSION"),
    about = "Browse and edit ERP record pages from the terminal"
)]
struct Cli {
    /// Page to open
    resource: Resource,

    /// What to do
    #[command(subcommand)]
    action: Action,

    /// Use the live API at this URL instead of sample data
    #[arg(long, env = "ERP_API_URL", global = true)]
    api_url: Option<String>,

    /// Bearer token; signs in with the configured credentials when absent
    #[arg(long, env = "ERP_API_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Output encoding
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    output: OutputFormat,

    /// Answer yes to confirmation prompts
    #[arg(short, long, global = true)]
    yes: bool,

    /// Print the resolved configuration before running
    #[arg(long, global = true)]
    show_config: bool,

    /// Log level (trace, debug, info, warn, error); overrides `logging.level`
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable structured JSON logging; overrides `logging.format`
    #[arg(long, global = true)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: .env file not loaded: {e}");
    }

    let cli = Cli::parse();
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => return report_failure(&e),
    };
    let logging = config
        .logging
        .clone()
        .with_overrides(cli.log_level.as_deref(), cli.json_logs);
    if let Err(e) = erp_core::init_logging_with(&logging) {
        return report_failure(&e);
    }

    match run(cli, config).await {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "command failed");
            report_failure(&e)
        }
    }
}

fn report_failure(e: &ContextError) -> ExitCode {
    eprintln!("❌ {e}");
    if let Some(source) = std::error::Error::source(e) {
        eprintln!("   {source}");
    }
    ExitCode::FAILURE
}

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Config::load().with_context(|| "Failed to load configuration"),
    }
}

async fn run(cli: Cli, mut config: Config) -> Result<String> {
    if let Some(url) = &cli.api_url {
        config.api.base_url.clone_from(url);
    }

    if cli.show_config {
        eprintln!("{}", render::config(&config)?);
    }

    let client = if cli.api_url.is_some() {
        Some(Arc::new(connect(cli.token.as_deref(), &config).await?))
    } else {
        None
    };

    let ctx = ConsoleContext {
        client,
        page_size: config.records.page_size,
        delay: Duration::from_millis(config.records.simulated_delay_ms),
        output: cli.output,
        assume_yes: cli.yes,
    };

    console::run(cli.resource, &cli.action, &ctx).await
}

async fn connect(token: Option<&str>, config: &Config) -> Result<ApiClient> {
    let client = ApiClient::from_config(&config.api)?;
    if let Some(token) = token {
        return Ok(client.with_token(token));
    }

    client
        .login(&config.api.username, &config.api.password)
        .await
        .with_context(|| {
            format!(
                "Failed to sign in to {} as {}",
                config.api.base_url, config.api.username
            )
        })?;
    info!(url = %config.api.base_url, "connected to API");
    Ok(client)
}
