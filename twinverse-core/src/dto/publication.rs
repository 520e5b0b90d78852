//! Publication stage DTOs

use serde::{Deserialize, Serialize};

use super::film::require;
use super::{ValidationError, WireError};
use crate::domain::{JobId, JobStatus, PipelineContext, Stage, StageResult, StatusReport};

/// Payload for `POST /api/publication/create`.
#[derive(Debug, Clone)]
pub struct CreatePublicationRequest {
    pub music_id: JobId,
    pub avatar_id: JobId,
    pub film_id: JobId,
    pub artist_name: Option<String>,
}

impl CreatePublicationRequest {
    /// Builds the request from the pipeline context.
    pub fn from_context(
        context: &PipelineContext,
        artist_name: Option<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            music_id: require(context, Stage::Publication, Stage::Music)?,
            avatar_id: require(context, Stage::Publication, Stage::Avatar)?,
            film_id: require(context, Stage::Publication, Stage::Film)?,
            artist_name,
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (stage, id) in [
            (Stage::Music, &self.music_id),
            (Stage::Avatar, &self.avatar_id),
            (Stage::Film, &self.film_id),
        ] {
            if id.as_str().is_empty() {
                return Err(ValidationError::MissingUpstreamId {
                    consumer: Stage::Publication,
                    missing: stage,
                });
            }
        }
        Ok(())
    }
}

/// Response to `GET /api/publication/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationStatusResponse {
    pub id: JobId,
    pub status: JobStatus,
    pub public_url: Option<String>,
    pub html_url: Option<String>,
    pub error: Option<String>,
}

impl PublicationStatusResponse {
    pub fn into_report(self) -> Result<StatusReport, WireError> {
        let result = match self.status {
            JobStatus::Completed => Some(StageResult::Publication {
                public_url: self.public_url.ok_or(WireError::MissingField {
                    stage: Stage::Publication,
                    field: "public_url",
                })?,
                html_url: self.html_url,
            }),
            _ => None,
        };
        let error_message = match self.status {
            JobStatus::Failed => {
                Some(self.error.unwrap_or_else(|| "publication failed".to_string()))
            }
            _ => None,
        };
        Ok(StatusReport {
            id: self.id,
            status: self.status,
            result,
            error_message,
        })
    }
}
