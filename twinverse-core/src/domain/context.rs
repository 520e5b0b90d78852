//! Pipeline context
//!
//! The append-only record of identifiers produced by completed stages.
//! Written exactly once per stage, read by later stages when building their
//! submission payloads and navigation routes.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::job::JobId;
use super::stage::Stage;

#[derive(Debug, Error, PartialEq)]
pub enum ContextError {
    #[error("{0} identifier is already recorded")]
    AlreadyRecorded(Stage),

    #[error("{stage} requires the {missing} identifier, which is not yet known")]
    MissingUpstream { stage: Stage, missing: Stage },
}

/// Identifiers accumulated over one creative session.
///
/// Lives for one user session; regeneration of an earlier stage starts a
/// fresh context rather than mutating this one (see `PipelineChain`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineContext {
    session_id: Uuid,
    started_at: chrono::DateTime<chrono::Utc>,
    ids: [Option<JobId>; 4],
}

impl PipelineContext {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at: chrono::Utc::now(),
            ids: [None, None, None, None],
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn started_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.started_at
    }

    /// Records the identifier produced by a completed stage.
    ///
    /// Rejects a second write for the same stage and a write whose upstream
    /// stages have not completed yet.
    pub fn record(&mut self, stage: Stage, id: JobId) -> Result<(), ContextError> {
        if self.ids[stage.index()].is_some() {
            return Err(ContextError::AlreadyRecorded(stage));
        }
        for &upstream in stage.upstream() {
            if self.ids[upstream.index()].is_none() {
                return Err(ContextError::MissingUpstream {
                    stage,
                    missing: upstream,
                });
            }
        }
        self.ids[stage.index()] = Some(id);
        Ok(())
    }

    pub fn id_for(&self, stage: Stage) -> Option<&JobId> {
        self.ids[stage.index()].as_ref()
    }

    /// The identifier for a stage, or an error naming what is missing.
    pub fn require(&self, consumer: Stage, stage: Stage) -> Result<&JobId, ContextError> {
        self.id_for(stage).ok_or(ContextError::MissingUpstream {
            stage: consumer,
            missing: stage,
        })
    }

    /// Stages whose identifiers are known, in pipeline order.
    pub fn completed_stages(&self) -> impl Iterator<Item = Stage> + '_ {
        Stage::ORDER
            .into_iter()
            .filter(|stage| self.ids[stage.index()].is_some())
    }

    /// The first stage without an identifier, if any.
    pub fn next_stage(&self) -> Option<Stage> {
        Stage::ORDER
            .into_iter()
            .find(|stage| self.ids[stage.index()].is_none())
    }

    pub fn is_complete(&self) -> bool {
        self.next_stage().is_none()
    }

    /// A fresh context for the same session retaining only the identifiers
    /// upstream of `stage`. Used when the user regenerates a stage, which
    /// conceptually invalidates everything downstream of it.
    pub fn truncated_before(&self, stage: Stage) -> Self {
        let mut ids = [None, None, None, None];
        for &upstream in stage.upstream() {
            ids[upstream.index()] = self.ids[upstream.index()].clone();
        }
        Self {
            session_id: self.session_id,
            started_at: self.started_at,
            ids,
        }
    }
}

impl Default for PipelineContext {
    fn default() -> Self {
        Self::new()
    }
}
