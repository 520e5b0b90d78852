//! Music stage DTOs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{CreateAck, ValidationError, WireError};
use crate::domain::{JobId, JobStatus, Stage, StageResult, StatusReport};

/// Payload for `POST /api/music/create`.
///
/// The phrase is the only required field; genre, emotion and a voice sample
/// recording are optional refinements.
#[derive(Debug, Clone)]
pub struct CreateMusicRequest {
    pub phrase: String,
    pub genre: Option<String>,
    pub emotion: Option<String>,
    pub voice_sample: Option<PathBuf>,
}

impl CreateMusicRequest {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
            genre: None,
            emotion: None,
            voice_sample: None,
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_emotion(mut self, emotion: impl Into<String>) -> Self {
        self.emotion = Some(emotion.into());
        self
    }

    pub fn with_voice_sample(mut self, path: PathBuf) -> Self {
        self.voice_sample = Some(path);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.phrase.trim().is_empty() {
            return Err(ValidationError::EmptyPhrase);
        }
        Ok(())
    }
}

/// Response to a music creation call.
///
/// The service answers eagerly with the interpreted phrase, generated lyrics
/// and the future stream URL while the audio itself is still rendering; the
/// job is `processing` until the status endpoint says otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicCreateResponse {
    pub id: JobId,
    pub status: JobStatus,
    pub phrase: Option<String>,
    pub lyrics: Option<String>,
    pub music_url: Option<String>,
}

impl MusicCreateResponse {
    pub fn into_ack(self) -> CreateAck {
        CreateAck {
            id: self.id,
            status: self.status,
        }
    }
}

/// Response to `GET /api/music/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicStatusResponse {
    pub id: JobId,
    pub status: JobStatus,
    pub phrase: Option<String>,
    pub lyrics: Option<String>,
    pub music_url: Option<String>,
    pub error: Option<String>,
}

impl MusicStatusResponse {
    pub fn into_report(self) -> Result<StatusReport, WireError> {
        let result = match self.status {
            JobStatus::Completed => Some(StageResult::Music {
                phrase: self.phrase,
                lyrics: self.lyrics,
                music_url: self.music_url.ok_or(WireError::MissingField {
                    stage: Stage::Music,
                    field: "music_url",
                })?,
            }),
            _ => None,
        };
        let error_message = match self.status {
            JobStatus::Failed => {
                Some(self.error.unwrap_or_else(|| "music generation failed".to_string()))
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
    fn test_completed_status_maps_to_result() {
        let body: MusicStatusResponse = serde_json::from_value(serde_json::json!({
            "id": "m1",
            "status": "completed",
            "music_url": "/files/m1.mp3",
            "phrase": "sunset over the sea",
        }))
        .unwrap();

        let report = body.into_report().unwrap();
        assert_eq!(report.status, JobStatus::Completed);
        assert_eq!(
            report.result,
            Some(StageResult::Music {
                phrase: Some("sunset over the sea".to_string()),
                lyrics: None,
                music_url: "/files/m1.mp3".to_string(),
            })
        );
    }

    #[test]
    fn test_completed_without_url_is_malformed() {
        let body: MusicStatusResponse = serde_json::from_value(serde_json::json!({
            "id": "m1",
            "status": "completed",
        }))
        .unwrap();

        assert!(matches!(
            body.into_report(),
            Err(WireError::MissingField {
                stage: Stage::Music,
                field: "music_url",
            })
        ));
    }

    #[test]
    fn test_failed_status_gets_fallback_message() {
        let body: MusicStatusResponse = serde_json::from_value(serde_json::json!({
            "id": "m1",
            "status": "failed",
        }))
        .unwrap();

        let report = body.into_report().unwrap();
        assert_eq!(report.status, JobStatus::Failed);
        assert_eq!(
            report.error_message.as_deref(),
            Some("music generation failed")
        );
    }
}
