//! Assetry CLI - multi-application front-end asset build orchestrator
//!
//! Usage: assetry [COMMAND]
//!
//! Commands:
//!   clean   Delete every configured output directory
//!   build   Build dev, debug, e2e and concat variants
//!   dist    Minified, fingerprinted distribution builds
//!   watch   Build, then rebuild on change
//!   tasks   List the task table

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use assetry::Variant;

use crate::cli::{Cli, Commands};
use crate::commands::Context;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = Context::load(&cli.config, cli.dest.as_deref(), cli.json)?;

    match cli.command() {
        Commands::Clean => commands::clean::cmd_clean(&ctx).await,
        Commands::Build { variant, app } => {
            commands::build::cmd_build(&ctx, &variant.variants(), app.as_deref()).await
        }
        Commands::Dist { app } => {
            commands::build::cmd_build(&ctx, &[Variant::Distribution], app.as_deref()).await
        }
        Commands::Watch { variant } => commands::watch::cmd_watch(&ctx, variant.variants()).await,
        Commands::Tasks => commands::tasks::cmd_tasks(&ctx),
    }
}

/// Log to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("assetry={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
