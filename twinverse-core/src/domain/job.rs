//! Job handle and status types
//!
//! A [`JobHandle`] tracks one submitted backend job. It is created once per
//! submission, owned by the stage controller that created it, and updated by
//! applying [`StatusReport`]s produced from status queries.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::stage::Stage;

/// Opaque, stage-scoped job identifier assigned by the Job Service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Lifecycle status of a submitted job.
///
/// `Submitted` exists only on the client side, between the creation
/// acknowledgement and the first status response; the wire protocol reports
/// `processing`, `completed` or `failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Submitted,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Terminal statuses end the polling session; only a user-initiated
    /// resubmission moves past them.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobStatus::Submitted => "submitted",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Stage-specific payload of a completed job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "lowercase")]
pub enum StageResult {
    Music {
        phrase: Option<String>,
        lyrics: Option<String>,
        music_url: String,
    },
    Avatar {
        avatar_video_url: String,
        avatar_model_url: Option<String>,
    },
    Film {
        film_url: String,
        screenplay_url: Option<String>,
        storyboard_url: Option<String>,
    },
    Publication {
        public_url: String,
        html_url: Option<String>,
    },
}

impl StageResult {
    pub fn stage(&self) -> Stage {
        match self {
            StageResult::Music { .. } => Stage::Music,
            StageResult::Avatar { .. } => Stage::Avatar,
            StageResult::Film { .. } => Stage::Film,
            StageResult::Publication { .. } => Stage::Publication,
        }
    }
}

/// Normalized outcome of one status query, ready to apply to a handle.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub id: JobId,
    pub status: JobStatus,
    pub result: Option<StageResult>,
    pub error_message: Option<String>,
}

impl StatusReport {
    /// A plain `processing` report.
    pub fn processing(id: JobId) -> Self {
        Self {
            id,
            status: JobStatus::Processing,
            result: None,
            error_message: None,
        }
    }

    /// A `completed` report carrying the stage payload.
    pub fn completed(id: JobId, result: StageResult) -> Self {
        Self {
            id,
            status: JobStatus::Completed,
            result: Some(result),
            error_message: None,
        }
    }

    /// A `failed` report carrying the service's message.
    pub fn failed(id: JobId, message: impl Into<String>) -> Self {
        Self {
            id,
            status: JobStatus::Failed,
            result: None,
            error_message: Some(message.into()),
        }
    }
}

/// Violations of the handle invariants.
#[derive(Debug, Error, PartialEq)]
pub enum HandleError {
    #[error("a result payload requires completed status, got {0}")]
    ResultWithoutCompletion(JobStatus),

    #[error("an error message requires failed status, got {0}")]
    MessageWithoutFailure(JobStatus),

    #[error("result and error message are mutually exclusive")]
    ResultAndMessage,

    #[error("status report for job {report} applied to handle for job {handle}")]
    IdMismatch { handle: JobId, report: JobId },

    #[error("report carries a {report} result for a {handle} job")]
    StageMismatch { handle: Stage, report: Stage },
}

/// Tracks one submitted job: its identifier, last known status, and terminal
/// payload.
///
/// Invariants: `result` is present iff the status is `Completed`,
/// `error_message` is present iff the status is `Failed`, and the two never
/// coexist. The identifier never changes after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobHandle {
    id: JobId,
    stage: Stage,
    status: JobStatus,
    result: Option<StageResult>,
    error_message: Option<String>,
    submitted_at: chrono::DateTime<chrono::Utc>,
}

impl JobHandle {
    /// Validated construction from already-known fields.
    pub fn new(
        stage: Stage,
        id: JobId,
        status: JobStatus,
        result: Option<StageResult>,
        error_message: Option<String>,
    ) -> Result<Self, HandleError> {
        check_invariants(stage, status, result.as_ref(), error_message.as_ref())?;
        Ok(Self {
            id,
            stage,
            status,
            result,
            error_message,
            submitted_at: chrono::Utc::now(),
        })
    }

    /// A freshly acknowledged submission with no status response yet.
    pub fn submitted(stage: Stage, id: JobId) -> Self {
        Self {
            id,
            stage,
            status: JobStatus::Submitted,
            result: None,
            error_message: None,
            submitted_at: chrono::Utc::now(),
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn result(&self) -> Option<&StageResult> {
        self.result.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn submitted_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.submitted_at
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Applies a status report, replacing status/result/error_message.
    ///
    /// The report must be for this job and, when it carries a result, for
    /// this stage. Invariant violations leave the handle untouched.
    pub fn apply(&mut self, report: &StatusReport) -> Result<(), HandleError> {
        if report.id != self.id {
            return Err(HandleError::IdMismatch {
                handle: self.id.clone(),
                report: report.id.clone(),
            });
        }
        check_invariants(
            self.stage,
            report.status,
            report.result.as_ref(),
            report.error_message.as_ref(),
        )?;
        self.status = report.status;
        self.result = report.result.clone();
        self.error_message = report.error_message.clone();
        Ok(())
    }
}

fn check_invariants(
    stage: Stage,
    status: JobStatus,
    result: Option<&StageResult>,
    error_message: Option<&String>,
) -> Result<(), HandleError> {
    if result.is_some() && error_message.is_some() {
        return Err(HandleError::ResultAndMessage);
    }
    if let Some(result) = result {
        if status != JobStatus::Completed {
            return Err(HandleError::ResultWithoutCompletion(status));
        }
        if result.stage() != stage {
            return Err(HandleError::StageMismatch {
                handle: stage,
                report: result.stage(),
            });
        }
    }
    if error_message.is_some() && status != JobStatus::Failed {
        return Err(HandleError::MessageWithoutFailure(status));
    }
    Ok(())
}
