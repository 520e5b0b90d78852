//! The service seam the orchestration layer programs against
//!
//! Stage controllers and pollers depend on [`StageService`] rather than on
//! the concrete HTTP client, so tests can script responses without a
//! network.

use async_trait::async_trait;

use crate::TwinverseClient;
use crate::error::Result;
use twinverse_core::domain::{JobId, Stage, StatusReport};
use twinverse_core::dto::{CreateAck, CreateRequest};

/// Job Service interface, uniform across the four stages.
#[async_trait]
pub trait StageService: Send + Sync {
    /// Submit a creation job; the acknowledgement carries the new job id.
    async fn create(&self, request: CreateRequest) -> Result<CreateAck>;

    /// Query the current status of a job.
    async fn get_status(&self, stage: Stage, id: &JobId) -> Result<StatusReport>;
}

#[async_trait]
impl StageService for TwinverseClient {
    async fn create(&self, request: CreateRequest) -> Result<CreateAck> {
        match request {
            CreateRequest::Music(req) => self.create_music(&req).await.map(|r| r.into_ack()),
            CreateRequest::Avatar(req) => self.create_avatar(&req).await,
            CreateRequest::Film(req) => self.create_film(&req).await,
            CreateRequest::Publication(req) => self.create_publication(&req).await,
        }
    }

    async fn get_status(&self, stage: Stage, id: &JobId) -> Result<StatusReport> {
        match stage {
            Stage::Music => self.get_music_status(id).await,
            Stage::Avatar => self.get_avatar_status(id).await,
            Stage::Film => self.get_film_status(id).await,
            Stage::Publication => self.get_publication_status(id).await,
        }
    }
}
