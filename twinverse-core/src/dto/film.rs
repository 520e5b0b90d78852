//! Film stage DTOs

use serde::{Deserialize, Serialize};

use super::{ValidationError, WireError};
use crate::domain::{JobId, JobStatus, PipelineContext, Stage, StageResult, StatusReport};

/// Payload for `POST /api/film/create`.
///
/// The film stage has no user-provided fields; it is derived entirely from
/// the upstream music and avatar, so views auto-submit it on entry.
#[derive(Debug, Clone)]
pub struct CreateFilmRequest {
    pub music_id: JobId,
    pub avatar_id: JobId,
}

impl CreateFilmRequest {
    pub fn new(music_id: JobId, avatar_id: JobId) -> Self {
        Self {
            music_id,
            avatar_id,
        }
    }

    /// Builds the request from the pipeline context.
    pub fn from_context(context: &PipelineContext) -> Result<Self, ValidationError> {
        Ok(Self {
            music_id: require(context, Stage::Film, Stage::Music)?,
            avatar_id: require(context, Stage::Film, Stage::Avatar)?,
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.music_id.as_str().is_empty() {
            return Err(ValidationError::MissingUpstreamId {
                consumer: Stage::Film,
                missing: Stage::Music,
            });
        }
        if self.avatar_id.as_str().is_empty() {
            return Err(ValidationError::MissingUpstreamId {
                consumer: Stage::Film,
                missing: Stage::Avatar,
            });
        }
        Ok(())
    }
}

pub(super) fn require(
    context: &PipelineContext,
    consumer: Stage,
    stage: Stage,
) -> Result<JobId, ValidationError> {
    context
        .id_for(stage)
        .cloned()
        .ok_or(ValidationError::MissingUpstreamId {
            consumer,
            missing: stage,
        })
}

/// Response to `GET /api/film/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilmStatusResponse {
    pub id: JobId,
    pub status: JobStatus,
    pub film_url: Option<String>,
    pub screenplay_url: Option<String>,
    pub storyboard_url: Option<String>,
    pub error: Option<String>,
}

impl FilmStatusResponse {
    pub fn into_report(self) -> Result<StatusReport, WireError> {
        let result = match self.status {
            JobStatus::Completed => Some(StageResult::Film {
                film_url: self.film_url.ok_or(WireError::MissingField {
                    stage: Stage::Film,
                    field: "film_url",
                })?,
                screenplay_url: self.screenplay_url,
                storyboard_url: self.storyboard_url,
            }),
            _ => None,
        };
        let error_message = match self.status {
            JobStatus::Failed => {
                Some(self.error.unwrap_or_else(|| "film generation failed".to_string()))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_context_requires_both_upstream_ids() {
        let mut context = PipelineContext::new();
        context.record(Stage::Music, JobId::from("m1")).unwrap();

        assert_eq!(
            CreateFilmRequest::from_context(&context).unwrap_err(),
            ValidationError::MissingUpstreamId {
                consumer: Stage::Film,
                missing: Stage::Avatar,
            }
        );

        context.record(Stage::Avatar, JobId::from("a1")).unwrap();
        let request = CreateFilmRequest::from_context(&context).unwrap();
        assert_eq!(request.music_id, JobId::from("m1"));
        assert_eq!(request.avatar_id, JobId::from("a1"));
    }
}
