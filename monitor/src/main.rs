use std::fs::OpenOptions;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod session;
mod source;

#[derive(Parser)]
#[command(name = "RunMonitor")]
#[command(about = "Headless session monitor for the run tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a live session, resuming saved state when present.
    /// Fixes are read from stdin, one JSON object per line.
    Run,
    /// Feed a GPX recording through a fresh engine and print the summary
    Replay { gpx_file: String },
    /// Print the saved session snapshot
    Status,
    /// Discard the saved session and start fresh
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    std::fs::create_dir_all("monitor/log")?;
    let log_file = "monitor/log/monitor.log";

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => session::run_live().await,
        Commands::Replay { gpx_file } => session::replay(&gpx_file).await,
        Commands::Status => session::print_status().await,
        Commands::Reset => session::reset().await,
    }
}
