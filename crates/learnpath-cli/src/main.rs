//! learnpath - command line client for the learning platform.
//!
//! Signs in against the backend, keeps the session between runs and exposes
//! the course, project and dashboard views as subcommands.

mod commands;

use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{Command, Context};
use learnpath_core::Config;

// ============================================================================
// Constants
// ============================================================================

/// Log file name prefix inside `<data_dir>/logs`
const LOG_FILE_NAME: &str = "learnpath.log";

#[derive(Parser, Debug)]
#[command(name = "learnpath", version, about = "Courses, projects and dashboards from the command line")]
struct Cli {
    /// Backend API base URL
    #[arg(long, env = "LEARNPATH_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Keep credentials in memory for this run only
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Also write logs to a daily file in the data directory
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Command,
}

/// Initialize the tracing subscriber for logging
///
/// The returned guard flushes the file writer and must be held until exit.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load().context("Failed to load config")?;

    let log_dir = if cli.log_file {
        let dir = config.data_dir()?.join("logs");
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        Some(dir)
    } else {
        None
    };
    let _guard = init_tracing(log_dir.as_deref());

    let base_url = cli
        .base_url
        .clone()
        .unwrap_or_else(|| config.base_url().to_string());
    info!(base_url = %base_url, ephemeral = cli.ephemeral, "learnpath starting");

    let mut ctx = Context::new(config, &base_url, cli.ephemeral)?;
    commands::run(&mut ctx, cli.command).await
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
