//! Command handlers

pub mod create;
pub mod status;

use anyhow::Result;
use clap::Subcommand;

use twinverse_pipeline::Config;

#[derive(Subcommand)]
pub enum Commands {
    /// Run a full creation session: music, avatar, film, publication
    Create(create::CreateArgs),
    /// Query the current status of one job
    Status(status::StatusArgs),
}

pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Create(args) => create::run(args, config).await,
        Commands::Status(args) => status::run(args, config).await,
    }
}
