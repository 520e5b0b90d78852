//! Full creation session
//!
//! Drives the pipeline end to end. The music stage takes its inputs from
//! the command line; the avatar stage takes a description or an image; the
//! film and publication stages need no input and are submitted as soon as
//! the chain reaches them, built entirely from upstream identifiers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Args;
use colored::*;

use twinverse_client::{StageService, TwinverseClient};
use twinverse_core::domain::{JobHandle, PipelineContext, Stage, StageResult};
use twinverse_core::dto::{
    CreateAvatarRequest, CreateFilmRequest, CreateMusicRequest, CreatePublicationRequest,
    CreateRequest,
};
use twinverse_pipeline::{
    Config, Navigator, PipelineChain, StageController, StageOutcome, TracingNavigator,
};

#[derive(Args)]
pub struct CreateArgs {
    /// Creative phrase that seeds the whole session
    pub phrase: String,

    /// Musical genre (pop, rock, rap, ...)
    #[arg(long)]
    pub genre: Option<String>,

    /// Dominant emotion for the music
    #[arg(long)]
    pub emotion: Option<String>,

    /// Audio file with your voice, blended into the track
    #[arg(long)]
    pub voice_sample: Option<PathBuf>,

    /// Avatar style (realistic, cartoon, anime, futuristic)
    #[arg(long, default_value = "realistic")]
    pub avatar_style: String,

    /// Textual description of the avatar
    #[arg(long)]
    pub avatar_description: Option<String>,

    /// Reference image the avatar is derived from
    #[arg(long)]
    pub avatar_image: Option<PathBuf>,

    /// Artist or character name shown on the publication page
    #[arg(long)]
    pub artist_name: Option<String>,
}

pub async fn run(args: CreateArgs, config: &Config) -> Result<()> {
    let service: Arc<dyn StageService> = Arc::new(TwinverseClient::new(&config.api_url));
    let navigator = TracingNavigator;
    let mut chain = PipelineChain::new();

    while let Some(stage) = chain.current_stage() {
        let request = build_request(stage, &args, chain.context())?;

        let mut controller = StageController::new(stage, Arc::clone(&service), config.poll_interval);

        println!("{}", format!("{stage}: submitting...").bold());
        if let Err(err) = controller.submit(request).await {
            controller.teardown();
            println!("{}", format!("{stage} failed: {err}").red());
            bail!("{stage} stage failed");
        }

        let outcome = controller
            .wait_terminal(|handle| {
                println!(
                    "  {} job {} is {}",
                    "·".dimmed(),
                    handle.id(),
                    handle.status()
                );
            })
            .await;

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                controller.teardown();
                bail!("{stage} stage interrupted: {err}");
            }
        };

        match outcome {
            StageOutcome::Completed(handle) => {
                print_completion(&handle);
                chain.advance(stage, handle.id().clone())?;
                navigator.go(&chain.route_after(stage)?);
            }
            StageOutcome::JobFailed { message } | StageOutcome::QueryFailed { message } => {
                println!("{}", format!("{stage} failed: {message}").red());
                bail!("{stage} stage failed: {message}");
            }
        }
    }

    println!("{}", "Your creation is published.".green().bold());
    Ok(())
}

fn build_request(
    stage: Stage,
    args: &CreateArgs,
    context: &PipelineContext,
) -> Result<CreateRequest> {
    let request = match stage {
        Stage::Music => {
            let mut request = CreateMusicRequest::new(args.phrase.clone());
            if let Some(genre) = &args.genre {
                request = request.with_genre(genre.clone());
            }
            if let Some(emotion) = &args.emotion {
                request = request.with_emotion(emotion.clone());
            }
            if let Some(path) = &args.voice_sample {
                request = request.with_voice_sample(path.clone());
            }
            CreateRequest::Music(request)
        }
        Stage::Avatar => {
            let music_id = context.require(Stage::Avatar, Stage::Music)?.clone();
            let mut request = CreateAvatarRequest::new(music_id, args.avatar_style.clone());
            if let Some(description) = &args.avatar_description {
                request = request.with_description(description.clone());
            }
            if let Some(path) = &args.avatar_image {
                request = request.with_image(path.clone());
            }
            CreateRequest::Avatar(request)
        }
        Stage::Film => CreateRequest::Film(CreateFilmRequest::from_context(context)?),
        Stage::Publication => CreateRequest::Publication(CreatePublicationRequest::from_context(
            context,
            args.artist_name.clone(),
        )?),
    };
    Ok(request)
}

fn print_completion(handle: &JobHandle) {
    println!(
        "{}",
        format!("{} completed (job {})", handle.stage(), handle.id()).green()
    );
    match handle.result() {
        Some(StageResult::Music { music_url, .. }) => {
            println!("  music: {music_url}");
        }
        Some(StageResult::Avatar {
            avatar_video_url, ..
        }) => {
            println!("  avatar video: {avatar_video_url}");
        }
        Some(StageResult::Film { film_url, .. }) => {
            println!("  film: {film_url}");
        }
        Some(StageResult::Publication {
            public_url,
            html_url,
        }) => {
            println!("  public page: {}", public_url.bold());
            if let Some(html_url) = html_url {
                println!("  rendered page: {html_url}");
            }
        }
        None => {}
    }
}
