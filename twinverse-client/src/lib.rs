//! Twinverse HTTP Client
//!
//! A type-safe HTTP client for the Twinverse backend API, covering the four
//! creation stages (music, avatar, film, publication) with a uniform
//! create/get-status shape per stage.
//!
//! # Example
//!
//! ```no_run
//! use twinverse_client::TwinverseClient;
//! use twinverse_core::dto::CreateMusicRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), twinverse_client::ClientError> {
//!     let client = TwinverseClient::new("http://localhost:8000");
//!
//!     let response = client
//!         .create_music(&CreateMusicRequest::new("sunset over the sea"))
//!         .await?;
//!
//!     println!("Submitted music job: {}", response.id);
//!     Ok(())
//! }
//! ```

pub mod error;
mod avatar;
mod film;
mod music;
mod publication;
mod service;

pub use error::{ClientError, Result};
pub use service::StageService;

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Error body the backend attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// HTTP client for the Twinverse backend API
///
/// One instance serves all four stages; endpoints are grouped into one
/// module per stage. Each stage exposes a creation call and a status query,
/// which is the whole surface the polling layer needs.
#[derive(Debug, Clone)]
pub struct TwinverseClient {
    /// Base URL of the backend (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl TwinverseClient {
    /// Create a new client for the given backend base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a client with a custom `reqwest` client, for configuring
    /// timeouts, proxies or TLS settings.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// Check the status code and deserialize the JSON body.
    ///
    /// Non-2xx responses are mapped to [`ClientError::ApiError`], using the
    /// backend's `detail` field when it is present.
    pub(crate) async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.detail)
                .unwrap_or(text);
            return Err(ClientError::api_error(status.as_u16(), message));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("failed to parse JSON response: {e}")))
    }
}

/// Read a local file into a multipart part, keeping its file name.
pub(crate) async fn file_part(path: &std::path::Path) -> Result<reqwest::multipart::Part> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ClientError::UploadRead {
            path: path.display().to_string(),
            source,
        })?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();
    Ok(reqwest::multipart::Part::bytes(bytes).file_name(file_name))
}
