//! Film stage endpoints

use reqwest::multipart::Form;
use tracing::debug;

use crate::TwinverseClient;
use crate::error::Result;
use twinverse_core::domain::{JobId, StatusReport};
use twinverse_core::dto::{CreateAck, CreateFilmRequest, FilmStatusResponse};

impl TwinverseClient {
    /// Submit a film creation job from the upstream music and avatar.
    pub async fn create_film(&self, request: &CreateFilmRequest) -> Result<CreateAck> {
        let url = format!("{}/api/film/create", self.base_url());

        let form = Form::new()
            .text("music_id", request.music_id.as_str().to_string())
            .text("avatar_id", request.avatar_id.as_str().to_string());

        debug!(
            music_id = %request.music_id,
            avatar_id = %request.avatar_id,
            "submitting film creation"
        );
        let response = self.http().post(&url).multipart(form).send().await?;
        self.handle_response(response).await
    }

    /// Query the status of a film job.
    pub async fn get_film_status(&self, id: &JobId) -> Result<StatusReport> {
        let url = format!("{}/api/film/{}", self.base_url(), id);
        let response = self.http().get(&url).send().await?;
        let body: FilmStatusResponse = self.handle_response(response).await?;
        body.into_report()
            .map_err(|e| crate::ClientError::ParseError(e.to_string()))
    }
}
