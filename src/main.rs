// src/main.rs

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    let fallback = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .init();

    match cli.command {
        Commands::Inspect => commands::cmd_inspect(),
        Commands::Validate { profile } => commands::cmd_validate(&profile),
        Commands::Generate { profile, layout } => commands::cmd_generate(&profile, &layout),
        Commands::Cook {
            profile,
            layout,
            jobs,
        } => commands::cmd_cook(&profile, &layout, jobs),
    }
}
