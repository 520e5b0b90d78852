//! Avatar stage endpoints

use reqwest::multipart::Form;
use tracing::debug;

use crate::error::Result;
use crate::{TwinverseClient, file_part};
use twinverse_core::domain::{JobId, StatusReport};
use twinverse_core::dto::{AvatarStatusResponse, CreateAck, CreateAvatarRequest};

impl TwinverseClient {
    /// Submit an avatar creation job.
    pub async fn create_avatar(&self, request: &CreateAvatarRequest) -> Result<CreateAck> {
        let url = format!("{}/api/avatar/create", self.base_url());

        let mut form = Form::new()
            .text("music_id", request.music_id.as_str().to_string())
            .text("style", request.style.clone());
        if let Some(description) = &request.description {
            form = form.text("visual_description", description.clone());
        }
        if let Some(path) = &request.image {
            form = form.part("image_file", file_part(path).await?);
        }

        debug!(music_id = %request.music_id, style = %request.style, "submitting avatar creation");
        let response = self.http().post(&url).multipart(form).send().await?;
        self.handle_response(response).await
    }

    /// Query the status of an avatar job.
    pub async fn get_avatar_status(&self, id: &JobId) -> Result<StatusReport> {
        let url = format!("{}/api/avatar/{}", self.base_url(), id);
        let response = self.http().get(&url).send().await?;
        let body: AvatarStatusResponse = self.handle_response(response).await?;
        body.into_report()
            .map_err(|e| crate::ClientError::ParseError(e.to_string()))
    }
}
