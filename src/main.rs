// src/main.rs

//! lotwatch: vehicle inventory change tracker CLI
//!
//! Long-running process: polls the inventory endpoint, diffs against the
//! last observed state, and pushes change notifications to Telegram.

mod diff;
mod error;
mod fetch;
mod models;
mod notify;
mod pipeline;
mod scheduler;
mod tracker;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::fetch::FallbackController;
use crate::models::Config;
use crate::notify::Dispatcher;
use crate::notify::telegram::TelegramChannel;
use crate::pipeline::TrackerState;

#[derive(Parser, Debug)]
#[command(
    name = "lotwatch",
    version = "0.1.0",
    about = "Vehicle inventory change tracker"
)]

/// CLI Arguments
struct Cli {
    #[arg(short, long, default_value = "data/config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

/// CLI Commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Track the inventory until interrupted
    Run,
    /// Run a single check cycle and exit
    Check,
    /// Validate configuration and exit
    Validate,
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real deployments set the environment directly.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::load_or_default(&cli.config);
    config.apply_env();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.logging.level),
    )
    .init();

    config.validate()?;

    if let Command::Validate = cli.command {
        log::info!(
            "Configuration OK: {} source(s), checking every {}s",
            config.sources.len(),
            config.poller.period_secs
        );
        return Ok(());
    }

    let fetcher = FallbackController::new(&config)?;
    let channel = TelegramChannel::new(&config.telegram)?;
    let dispatcher = Dispatcher::new(Box::new(channel), config.notify.clone());
    let mut state = TrackerState::new(&config);

    if let Command::Check = cli.command {
        pipeline::run_cycle(&fetcher, &dispatcher, &mut state).await;
    } else {
        scheduler::run(&fetcher, &dispatcher, &config, &mut state).await;
    }

    Ok(())
}
