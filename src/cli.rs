//! CLI for the Eventide server

use clap::{Parser, Subcommand};

/// Eventide server CLI
#[derive(Parser, Debug)]
#[command(name = "eventide")]
#[command(about = "Event registry with reminder scheduling")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the server (default)
    Serve,
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Serve) | None => crate::server::run().await,
    }
}
