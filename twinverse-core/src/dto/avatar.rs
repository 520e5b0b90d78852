//! Avatar stage DTOs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{ValidationError, WireError};
use crate::domain::{JobId, JobStatus, Stage, StageResult, StatusReport};

/// Payload for `POST /api/avatar/create`.
///
/// The avatar is derived either from a textual description or from an
/// uploaded reference image; at least one of the two is required.
#[derive(Debug, Clone)]
pub struct CreateAvatarRequest {
    pub music_id: JobId,
    pub style: String,
    pub description: Option<String>,
    pub image: Option<PathBuf>,
}

impl CreateAvatarRequest {
    pub fn new(music_id: JobId, style: impl Into<String>) -> Self {
        Self {
            music_id,
            style: style.into(),
            description: None,
            image: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(mut self, path: PathBuf) -> Self {
        self.image = Some(path);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let has_description = self
            .description
            .as_ref()
            .is_some_and(|d| !d.trim().is_empty());
        if !has_description && self.image.is_none() {
            return Err(ValidationError::MissingAvatarSource);
        }
        Ok(())
    }
}

/// Response to `GET /api/avatar/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarStatusResponse {
    pub id: JobId,
    pub status: JobStatus,
    pub avatar_video_url: Option<String>,
    pub avatar_model_url: Option<String>,
    pub error: Option<String>,
}

impl AvatarStatusResponse {
    pub fn into_report(self) -> Result<StatusReport, WireError> {
        let result = match self.status {
            JobStatus::Completed => Some(StageResult::Avatar {
                avatar_video_url: self.avatar_video_url.ok_or(WireError::MissingField {
                    stage: Stage::Avatar,
                    field: "avatar_video_url",
                })?,
                avatar_model_url: self.avatar_model_url,
            }),
            _ => None,
        };
        let error_message = match self.status {
            JobStatus::Failed => {
                Some(self.error.unwrap_or_else(|| "avatar generation failed".to_string()))
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
