//! Music stage endpoints

use reqwest::multipart::Form;
use tracing::debug;

use crate::error::Result;
use crate::{TwinverseClient, file_part};
use twinverse_core::domain::{JobId, StatusReport};
use twinverse_core::dto::{CreateMusicRequest, MusicCreateResponse, MusicStatusResponse};

impl TwinverseClient {
    /// Submit a music creation job.
    ///
    /// The phrase, the optional genre/emotion and the optional voice sample
    /// go up as one multipart form, matching the backend's form contract.
    pub async fn create_music(&self, request: &CreateMusicRequest) -> Result<MusicCreateResponse> {
        let url = format!("{}/api/music/create", self.base_url());

        let mut form = Form::new().text("phrase", request.phrase.clone());
        if let Some(genre) = &request.genre {
            form = form.text("genre", genre.clone());
        }
        if let Some(emotion) = &request.emotion {
            form = form.text("emotion", emotion.clone());
        }
        if let Some(path) = &request.voice_sample {
            form = form.part("voice_file", file_part(path).await?);
        }

        debug!(phrase = %request.phrase, "submitting music creation");
        let response = self.http().post(&url).multipart(form).send().await?;
        self.handle_response(response).await
    }

    /// Query the status of a music job.
    pub async fn get_music_status(&self, id: &JobId) -> Result<StatusReport> {
        let url = format!("{}/api/music/{}", self.base_url(), id);
        let response = self.http().get(&url).send().await?;
        let body: MusicStatusResponse = self.handle_response(response).await?;
        body.into_report()
            .map_err(|e| crate::ClientError::ParseError(e.to_string()))
    }
}
