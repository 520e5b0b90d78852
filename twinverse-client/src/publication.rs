//! Publication stage endpoints

use reqwest::multipart::Form;
use tracing::debug;

use crate::TwinverseClient;
use crate::error::Result;
use twinverse_core::domain::{JobId, StatusReport};
use twinverse_core::dto::{CreateAck, CreatePublicationRequest, PublicationStatusResponse};

impl TwinverseClient {
    /// Submit a publication job compiling the whole session into a page.
    pub async fn create_publication(
        &self,
        request: &CreatePublicationRequest,
    ) -> Result<CreateAck> {
        let url = format!("{}/api/publication/create", self.base_url());

        let mut form = Form::new()
            .text("music_id", request.music_id.as_str().to_string())
            .text("avatar_id", request.avatar_id.as_str().to_string())
            .text("film_id", request.film_id.as_str().to_string());
        if let Some(artist_name) = &request.artist_name {
            form = form.text("artist_name", artist_name.clone());
        }

        debug!(film_id = %request.film_id, "submitting publication creation");
        let response = self.http().post(&url).multipart(form).send().await?;
        self.handle_response(response).await
    }

    /// Query the status of a publication job.
    pub async fn get_publication_status(&self, id: &JobId) -> Result<StatusReport> {
        let url = format!("{}/api/publication/{}", self.base_url(), id);
        let response = self.http().get(&url).send().await?;
        let body: PublicationStatusResponse = self.handle_response(response).await?;
        body.into_report()
            .map_err(|e| crate::ClientError::ParseError(e.to_string()))
    }
}
