//! Pipeline chain
//!
//! Pure bookkeeping of the music → avatar → film → publication sequence.
//! The chain holds no timers and makes no network calls; it records which
//! identifiers are known and derives the navigation target after each
//! completed stage.

use twinverse_core::domain::{ContextError, JobId, PipelineContext, Route, Stage};

/// Tracks pipeline progress for one creative session.
#[derive(Debug, Clone, Default)]
pub struct PipelineChain {
    context: PipelineContext,
}

impl PipelineChain {
    pub fn new() -> Self {
        Self {
            context: PipelineContext::new(),
        }
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    /// The stage that should run next, or `None` once publication is done.
    pub fn current_stage(&self) -> Option<Stage> {
        self.context.next_stage()
    }

    pub fn is_complete(&self) -> bool {
        self.context.is_complete()
    }

    /// Records a completed stage's identifier and yields the next stage.
    pub fn advance(&mut self, stage: Stage, id: JobId) -> Result<Option<Stage>, ContextError> {
        self.context.record(stage, id)?;
        Ok(stage.next())
    }

    /// The route to request after `stage` completes: the next stage's
    /// creation view with every upstream identifier, or the publication
    /// preview at the end of the pipeline.
    pub fn route_after(&self, stage: Stage) -> Result<Route, ContextError> {
        let id = |s: Stage| self.context.require(stage, s).cloned();
        match stage {
            Stage::Music => Ok(Route::CreateAvatar {
                music_id: id(Stage::Music)?,
            }),
            Stage::Avatar => Ok(Route::CreateFilm {
                music_id: id(Stage::Music)?,
                avatar_id: id(Stage::Avatar)?,
            }),
            Stage::Film => Ok(Route::CreatePublication {
                music_id: id(Stage::Music)?,
                avatar_id: id(Stage::Avatar)?,
                film_id: id(Stage::Film)?,
            }),
            Stage::Publication => Ok(Route::PublicationPreview {
                publication_id: id(Stage::Publication)?,
            }),
        }
    }

    /// A fresh chain for regenerating `stage`: upstream identifiers are
    /// kept, the stage's own identifier and everything downstream are
    /// dropped and must be re-derived.
    pub fn regenerated(&self, stage: Stage) -> Self {
        Self {
            context: self.context.truncated_before(stage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_walks_the_pipeline_in_order() {
        let mut chain = PipelineChain::new();
        assert_eq!(chain.current_stage(), Some(Stage::Music));

        assert_eq!(
            chain.advance(Stage::Music, JobId::from("m1")).unwrap(),
            Some(Stage::Avatar)
        );
        assert_eq!(
            chain.advance(Stage::Avatar, JobId::from("a1")).unwrap(),
            Some(Stage::Film)
        );
        assert_eq!(
            chain.advance(Stage::Film, JobId::from("f1")).unwrap(),
            Some(Stage::Publication)
        );
        assert_eq!(
            chain.advance(Stage::Publication, JobId::from("p1")).unwrap(),
            None
        );
        assert!(chain.is_complete());
    }

    #[test]
    fn test_advance_rejects_skipping_stages() {
        let mut chain = PipelineChain::new();
        assert!(chain.advance(Stage::Avatar, JobId::from("a1")).is_err());
    }

    #[test]
    fn test_route_after_carries_all_upstream_ids() {
        let mut chain = PipelineChain::new();
        chain.advance(Stage::Music, JobId::from("m1")).unwrap();
        chain.advance(Stage::Avatar, JobId::from("a1")).unwrap();
        chain.advance(Stage::Film, JobId::from("f1")).unwrap();

        assert_eq!(
            chain.route_after(Stage::Music).unwrap(),
            Route::CreateAvatar {
                music_id: JobId::from("m1")
            }
        );
        assert_eq!(
            chain.route_after(Stage::Film).unwrap(),
            Route::CreatePublication {
                music_id: JobId::from("m1"),
                avatar_id: JobId::from("a1"),
                film_id: JobId::from("f1"),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_film_auto_submits_from_context_and_advances_to_publication() {
        use crate::controller::{StageController, StageOutcome};
        use crate::testing::{ScriptedService, ack, completed_film};
        use std::sync::Arc;
        use std::time::Duration;
        use twinverse_core::dto::{CreateFilmRequest, CreateRequest};

        let mut chain = PipelineChain::new();
        chain.advance(Stage::Music, JobId::from("m1")).unwrap();
        chain.advance(Stage::Avatar, JobId::from("a1")).unwrap();

        // The film view derives its payload from the context and submits
        // without user input.
        let request = CreateFilmRequest::from_context(chain.context()).unwrap();
        assert_eq!(request.music_id, JobId::from("m1"));
        assert_eq!(request.avatar_id, JobId::from("a1"));

        let service = Arc::new(
            ScriptedService::new()
                .create(Ok(ack("f1")))
                .status(Ok(completed_film("f1"))),
        );
        let mut controller =
            StageController::new(Stage::Film, service, Duration::from_secs(5));
        controller.submit(CreateRequest::Film(request)).await.unwrap();

        let outcome = controller.wait_terminal(|_| {}).await.unwrap();
        let StageOutcome::Completed(handle) = outcome else {
            panic!("expected completion");
        };

        let next = chain.advance(Stage::Film, handle.id().clone()).unwrap();
        assert_eq!(next, Some(Stage::Publication));
        assert_eq!(
            chain.route_after(Stage::Film).unwrap(),
            Route::CreatePublication {
                music_id: JobId::from("m1"),
                avatar_id: JobId::from("a1"),
                film_id: JobId::from("f1"),
            }
        );
    }

    #[test]
    fn test_regenerated_chain_drops_downstream_ids() {
        let mut chain = PipelineChain::new();
        chain.advance(Stage::Music, JobId::from("m1")).unwrap();
        chain.advance(Stage::Avatar, JobId::from("a1")).unwrap();
        chain.advance(Stage::Film, JobId::from("f1")).unwrap();

        let fresh = chain.regenerated(Stage::Avatar);
        assert_eq!(fresh.current_stage(), Some(Stage::Avatar));
        assert_eq!(fresh.context().id_for(Stage::Music), Some(&JobId::from("m1")));
        assert_eq!(fresh.context().id_for(Stage::Film), None);
    }
}
