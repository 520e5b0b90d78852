//! Wire DTOs for the per-stage Job Service API
//!
//! Create requests are validated locally before any network call; status
//! responses are normalized into [`StatusReport`]s so the orchestration
//! layer never sees raw wire shapes.

pub mod avatar;
pub mod film;
pub mod music;
pub mod publication;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{JobId, JobStatus, Stage};

pub use avatar::{AvatarStatusResponse, CreateAvatarRequest};
pub use film::{CreateFilmRequest, FilmStatusResponse};
pub use music::{CreateMusicRequest, MusicCreateResponse, MusicStatusResponse};
pub use publication::{CreatePublicationRequest, PublicationStatusResponse};

/// Local validation failures, reported before any network call is made.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("a creative phrase is required")]
    EmptyPhrase,

    #[error("provide a visual description or upload an image")]
    MissingAvatarSource,

    #[error("{consumer} requires the {missing} identifier")]
    MissingUpstreamId { consumer: Stage, missing: Stage },
}

/// Malformed status responses (well-formed JSON that violates the contract).
#[derive(Debug, Error)]
pub enum WireError {
    #[error("{stage} status response is missing `{field}` for a completed job")]
    MissingField { stage: Stage, field: &'static str },
}

/// Stage-specific create request, unified for the service seam.
#[derive(Debug, Clone)]
pub enum CreateRequest {
    Music(CreateMusicRequest),
    Avatar(CreateAvatarRequest),
    Film(CreateFilmRequest),
    Publication(CreatePublicationRequest),
}

impl CreateRequest {
    pub fn stage(&self) -> Stage {
        match self {
            CreateRequest::Music(_) => Stage::Music,
            CreateRequest::Avatar(_) => Stage::Avatar,
            CreateRequest::Film(_) => Stage::Film,
            CreateRequest::Publication(_) => Stage::Publication,
        }
    }

    /// Checks the stage-specific required fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            CreateRequest::Music(req) => req.validate(),
            CreateRequest::Avatar(req) => req.validate(),
            CreateRequest::Film(req) => req.validate(),
            CreateRequest::Publication(req) => req.validate(),
        }
    }
}

/// Normalized acknowledgement of a job creation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAck {
    pub id: JobId,
    pub status: JobStatus,
}
