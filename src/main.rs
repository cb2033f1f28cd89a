mod commands;
mod config;
mod providers;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "calremind")]
#[command(about = "Keep calendar events in sync and get reminded when they are due")]
struct Cli {
    /// Settings file (defaults to ~/.config/calremind/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll calendars and show reminders until interrupted
    Run,
    /// Sync once and print the reminders that are due
    Once,
    /// List the calendars of every configured account
    Calendars,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = config::load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Run => commands::run::run(settings).await,
        Commands::Once => commands::once::run(settings).await,
        Commands::Calendars => commands::calendars::run(settings).await,
    }
}
