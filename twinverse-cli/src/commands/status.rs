//! One-shot status query

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::*;

use twinverse_client::{StageService, TwinverseClient};
use twinverse_core::domain::{JobId, JobStatus, Stage, StageResult};
use twinverse_pipeline::Config;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StageArg {
    Music,
    Avatar,
    Film,
    Publication,
}

impl From<StageArg> for Stage {
    fn from(arg: StageArg) -> Self {
        match arg {
            StageArg::Music => Stage::Music,
            StageArg::Avatar => Stage::Avatar,
            StageArg::Film => Stage::Film,
            StageArg::Publication => Stage::Publication,
        }
    }
}

#[derive(Args)]
pub struct StatusArgs {
    /// Which stage the job belongs to
    #[arg(value_enum)]
    pub stage: StageArg,

    /// Job identifier
    pub id: String,
}

pub async fn run(args: StatusArgs, config: &Config) -> Result<()> {
    let client = TwinverseClient::new(&config.api_url);
    let stage = Stage::from(args.stage);
    let id = JobId::from(args.id.as_str());

    let report = client
        .get_status(stage, &id)
        .await
        .with_context(|| format!("could not retrieve status for {stage} job {id}"))?;

    let status = match report.status {
        JobStatus::Completed => "completed".green(),
        JobStatus::Failed => "failed".red(),
        _ => report.status.to_string().yellow(),
    };
    println!("{} job {}: {}", stage.to_string().bold(), id, status);

    match report.result {
        Some(StageResult::Music { music_url, .. }) => println!("  music: {music_url}"),
        Some(StageResult::Avatar {
            avatar_video_url, ..
        }) => println!("  avatar video: {avatar_video_url}"),
        Some(StageResult::Film { film_url, .. }) => println!("  film: {film_url}"),
        Some(StageResult::Publication { public_url, .. }) => {
            println!("  public page: {public_url}")
        }
        None => {}
    }

    if let Some(message) = report.error_message {
        println!("  {}", message.red());
    }

    Ok(())
}
