//! Stage controller
//!
//! One controller drives one pipeline stage for one view: it validates the
//! submission, creates the backend job, owns the status poller for it, and
//! resolves the terminal outcome. All service failures are absorbed here
//! and surfaced as user-visible messages; nothing propagates to the chain.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

use crate::poller::{PollEvent, StatusPoller};
use twinverse_client::StageService;
use twinverse_core::domain::{JobHandle, JobStatus, Stage, StageResult, StatusReport};
use twinverse_core::dto::{CreateRequest, ValidationError};

/// Displayed lifecycle of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    Idle,
    Submitting,
    Processing,
    Completed,
    Failed,
}

/// How a polling session ended.
#[derive(Debug)]
pub enum StageOutcome {
    /// The job completed; the handle carries the stage result.
    Completed(JobHandle),
    /// The service reported the job itself as failed.
    JobFailed { message: String },
    /// A status query failed; the job's real state is unknown.
    QueryFailed { message: String },
}

#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("submission failed: {0}")]
    Submission(String),

    #[error("a {request} request was submitted to the {controller} stage")]
    StageMismatch { controller: Stage, request: Stage },

    #[error("a job is already in flight for this stage")]
    Busy,

    #[error("no job is being processed")]
    NotProcessing,

    #[error("the polling session was cancelled")]
    Cancelled,
}

/// Per-stage submission and polling state machine.
///
/// Owns the job handle it creates and the poller attached to it; tearing
/// the controller down (or dropping it) stops the poller, so no status
/// update can mutate state belonging to a dismissed view.
pub struct StageController {
    stage: Stage,
    service: Arc<dyn StageService>,
    poll_interval: Duration,
    state: StageState,
    handle: Option<JobHandle>,
    error_message: Option<String>,
    poller: Option<StatusPoller>,
    events: Option<UnboundedReceiver<PollEvent>>,
}

impl StageController {
    pub fn new(stage: Stage, service: Arc<dyn StageService>, poll_interval: Duration) -> Self {
        Self {
            stage,
            service,
            poll_interval,
            state: StageState::Idle,
            handle: None,
            error_message: None,
            poller: None,
            events: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn state(&self) -> StageState {
        self.state
    }

    pub fn handle(&self) -> Option<&JobHandle> {
        self.handle.as_ref()
    }

    pub fn result(&self) -> Option<&StageResult> {
        self.handle.as_ref().and_then(JobHandle::result)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Validates and submits a creation request, then starts polling.
    ///
    /// A validation failure makes no network call and leaves the state
    /// unchanged. A creation failure moves the stage to `Failed` with the
    /// service's message and starts no poller. Resubmission from `Failed`
    /// or `Completed` (retry/regenerate) clears the previous outcome first.
    pub async fn submit(&mut self, request: CreateRequest) -> Result<(), StageError> {
        if request.stage() != self.stage {
            return Err(StageError::StageMismatch {
                controller: self.stage,
                request: request.stage(),
            });
        }
        if matches!(self.state, StageState::Submitting | StageState::Processing) {
            return Err(StageError::Busy);
        }

        request.validate()?;

        // Reset any previous outcome before resubmitting.
        self.stop_poller();
        self.handle = None;
        self.error_message = None;
        self.state = StageState::Submitting;

        info!(stage = %self.stage, "submitting creation job");
        let ack = match self.service.create(request).await {
            Ok(ack) => ack,
            Err(err) => {
                let message = err.to_string();
                self.state = StageState::Failed;
                self.error_message = Some(message.clone());
                return Err(StageError::Submission(message));
            }
        };

        let mut handle = JobHandle::submitted(self.stage, ack.id.clone());
        if ack.status == JobStatus::Processing {
            // Cannot fail: a bare processing report for the handle's own id.
            let _ = handle.apply(&StatusReport::processing(ack.id));
        }

        info!(stage = %self.stage, job = %handle.id(), "job created, polling for status");
        let (poller, events) =
            StatusPoller::start(Arc::clone(&self.service), handle.clone(), self.poll_interval);
        self.handle = Some(handle);
        self.poller = Some(poller);
        self.events = Some(events);
        self.state = StageState::Processing;
        Ok(())
    }

    /// Explicit retry/regenerate from a terminal state.
    pub async fn regenerate(&mut self, request: CreateRequest) -> Result<(), StageError> {
        if !matches!(self.state, StageState::Failed | StageState::Completed) {
            return Err(StageError::NotProcessing);
        }
        self.submit(request).await
    }

    /// Consumes poll events until the session ends, invoking `on_update`
    /// for each non-terminal status refresh.
    pub async fn wait_terminal(
        &mut self,
        mut on_update: impl FnMut(&JobHandle),
    ) -> Result<StageOutcome, StageError> {
        match self.state {
            StageState::Completed => {
                let handle = self.handle.clone().ok_or(StageError::NotProcessing)?;
                return Ok(StageOutcome::Completed(handle));
            }
            StageState::Failed => {
                let message = self
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "stage failed".to_string());
                return Ok(StageOutcome::JobFailed { message });
            }
            StageState::Idle | StageState::Submitting => return Err(StageError::NotProcessing),
            StageState::Processing => {}
        }

        // Take ownership of the event stream; the session is consumed by
        // this call one way or another.
        let Some(mut events) = self.events.take() else {
            return Err(StageError::Cancelled);
        };

        loop {
            match events.recv().await {
                Some(PollEvent::Update(handle)) => {
                    on_update(&handle);
                    self.handle = Some(handle);
                }
                Some(PollEvent::Terminal(handle)) => {
                    self.stop_poller();
                    let outcome = if handle.status() == JobStatus::Completed {
                        self.state = StageState::Completed;
                        StageOutcome::Completed(handle.clone())
                    } else {
                        self.state = StageState::Failed;
                        self.error_message = handle.error_message().map(str::to_string);
                        StageOutcome::JobFailed {
                            message: self
                                .error_message
                                .clone()
                                .unwrap_or_else(|| "stage failed".to_string()),
                        }
                    };
                    self.handle = Some(handle);
                    return Ok(outcome);
                }
                Some(PollEvent::QueryError(err)) => {
                    self.stop_poller();
                    let message = format!("could not retrieve status: {err}");
                    self.state = StageState::Failed;
                    self.error_message = Some(message.clone());
                    return Ok(StageOutcome::QueryFailed { message });
                }
                None => {
                    self.stop_poller();
                    self.state = StageState::Idle;
                    self.handle = None;
                    return Err(StageError::Cancelled);
                }
            }
        }
    }

    /// Stops polling on view teardown or navigation away. Idempotent.
    ///
    /// Cancelling a session in flight returns the stage to `Idle` so a
    /// later submission is accepted; a terminal outcome is kept.
    pub fn teardown(&mut self) {
        self.stop_poller();
        if matches!(self.state, StageState::Submitting | StageState::Processing) {
            self.state = StageState::Idle;
            self.handle = None;
        }
    }

    fn stop_poller(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
        self.events = None;
    }
}

impl Drop for StageController {
    fn drop(&mut self) {
        self.stop_poller();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedService, ack, completed_music, failed, network_error, processing};
    use twinverse_core::domain::JobId;
    use twinverse_core::dto::{CreateAvatarRequest, CreateMusicRequest};

    const INTERVAL: Duration = Duration::from_secs(5);

    fn music_request(phrase: &str) -> CreateRequest {
        CreateRequest::Music(CreateMusicRequest::new(phrase))
    }

    fn avatar_request() -> CreateRequest {
        CreateRequest::Avatar(
            CreateAvatarRequest::new(JobId::from("m1"), "realistic")
                .with_description("a silver-haired synth player"),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_music_scenario_submit_poll_complete() {
        let service = Arc::new(
            ScriptedService::new()
                .create(Ok(ack("m1")))
                .status(Ok(processing("m1")))
                .status(Ok(completed_music("m1"))),
        );
        let mut controller = StageController::new(Stage::Music, service.clone(), INTERVAL);

        controller
            .submit(music_request("sunset over the sea"))
            .await
            .unwrap();
        assert_eq!(controller.state(), StageState::Processing);
        assert_eq!(controller.handle().unwrap().id(), &JobId::from("m1"));

        let mut updates = 0;
        let outcome = controller.wait_terminal(|_| updates += 1).await.unwrap();

        assert!(matches!(outcome, StageOutcome::Completed(_)));
        assert_eq!(updates, 1);
        assert_eq!(controller.state(), StageState::Completed);
        assert!(controller.result().is_some());
        assert!(controller.error_message().is_none());
        assert_eq!(service.create_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_phrase_never_reaches_the_service() {
        let service = Arc::new(ScriptedService::new());
        let mut controller = StageController::new(Stage::Music, service.clone(), INTERVAL);

        let err = controller.submit(music_request("   ")).await.unwrap_err();

        assert!(matches!(
            err,
            StageError::Validation(ValidationError::EmptyPhrase)
        ));
        assert_eq!(controller.state(), StageState::Idle);
        assert_eq!(service.create_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_error_fails_without_poller_and_retry_resubmits() {
        let service = Arc::new(
            ScriptedService::new()
                .create(Err(network_error()))
                .create(Ok(ack("a1"))),
        );
        let mut controller = StageController::new(Stage::Avatar, service.clone(), INTERVAL);

        let err = controller.submit(avatar_request()).await.unwrap_err();
        assert!(matches!(err, StageError::Submission(_)));
        assert_eq!(controller.state(), StageState::Failed);
        assert!(
            controller
                .error_message()
                .unwrap()
                .contains("service unavailable")
        );
        // No poller was started for the failed submission.
        assert_eq!(service.status_calls(), 0);

        controller.regenerate(avatar_request()).await.unwrap();
        assert_eq!(controller.state(), StageState::Processing);
        assert!(controller.error_message().is_none());
        assert_eq!(service.create_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_job_level_failure_is_terminal_until_regenerate() {
        let service = Arc::new(
            ScriptedService::new()
                .create(Ok(ack("a1")))
                .status(Ok(failed("a1", "render crashed")))
                .create(Ok(ack("a2")))
                .status(Ok(StatusReport::completed(
                    JobId::from("a2"),
                    twinverse_core::domain::StageResult::Avatar {
                        avatar_video_url: "/files/a2.mp4".to_string(),
                        avatar_model_url: None,
                    },
                ))),
        );
        let mut controller = StageController::new(Stage::Avatar, service.clone(), INTERVAL);

        controller.submit(avatar_request()).await.unwrap();
        let outcome = controller.wait_terminal(|_| {}).await.unwrap();
        assert!(matches!(
            outcome,
            StageOutcome::JobFailed { message } if message == "render crashed"
        ));
        assert_eq!(controller.state(), StageState::Failed);
        assert_eq!(controller.error_message(), Some("render crashed"));

        controller.regenerate(avatar_request()).await.unwrap();
        assert!(controller.error_message().is_none());

        let outcome = controller.wait_terminal(|_| {}).await.unwrap();
        assert!(matches!(outcome, StageOutcome::Completed(_)));
        assert_eq!(controller.handle().unwrap().id(), &JobId::from("a2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_error_is_distinguished_from_job_failure() {
        let service = Arc::new(
            ScriptedService::new()
                .create(Ok(ack("f1")))
                .status(Err(network_error())),
        );
        let mut controller = StageController::new(Stage::Film, service, INTERVAL);

        controller
            .submit(CreateRequest::Film(
                twinverse_core::dto::CreateFilmRequest::new(JobId::from("m1"), JobId::from("a1")),
            ))
            .await
            .unwrap();

        let outcome = controller.wait_terminal(|_| {}).await.unwrap();
        assert!(matches!(
            outcome,
            StageOutcome::QueryFailed { message } if message.contains("could not retrieve status")
        ));
        assert_eq!(controller.state(), StageState::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_while_in_flight_is_rejected() {
        let service = Arc::new(ScriptedService::new().create(Ok(ack("m1"))));
        let mut controller = StageController::new(Stage::Music, service, INTERVAL);

        controller.submit(music_request("first")).await.unwrap();
        let err = controller.submit(music_request("second")).await.unwrap_err();
        assert!(matches!(err, StageError::Busy));
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_cancels_polling() {
        let service = Arc::new(ScriptedService::new().create(Ok(ack("m1"))));
        let mut controller = StageController::new(Stage::Music, service.clone(), INTERVAL);

        controller.submit(music_request("torn down")).await.unwrap();
        controller.teardown();
        controller.teardown(); // idempotent

        assert_eq!(controller.state(), StageState::Idle);
        assert!(controller.handle().is_none());
        let err = controller.wait_terminal(|_| {}).await.unwrap_err();
        assert!(matches!(err, StageError::NotProcessing));
        assert_eq!(service.status_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmit_after_teardown_starts_a_fresh_session() {
        let service = Arc::new(
            ScriptedService::new()
                .create(Ok(ack("m1")))
                .create(Ok(ack("m2")))
                .status(Ok(completed_music("m2"))),
        );
        let mut controller = StageController::new(Stage::Music, service.clone(), INTERVAL);

        controller.submit(music_request("first try")).await.unwrap();
        controller.teardown();

        controller.submit(music_request("second try")).await.unwrap();
        assert_eq!(controller.state(), StageState::Processing);

        let outcome = controller.wait_terminal(|_| {}).await.unwrap();
        assert!(matches!(outcome, StageOutcome::Completed(_)));
        assert_eq!(controller.handle().unwrap().id(), &JobId::from("m2"));
        assert_eq!(service.create_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_stage_request_is_rejected() {
        let service = Arc::new(ScriptedService::new());
        let mut controller = StageController::new(Stage::Film, service, INTERVAL);

        let err = controller.submit(music_request("wrong")).await.unwrap_err();
        assert!(matches!(err, StageError::StageMismatch { .. }));
    }
}
