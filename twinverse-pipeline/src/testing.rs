//! Scripted stage service for poller and controller tests

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use twinverse_client::{ClientError, Result, StageService};
use twinverse_core::domain::{JobId, JobStatus, Stage, StageResult, StatusReport};
use twinverse_core::dto::{CreateAck, CreateRequest};

pub fn processing(id: &str) -> StatusReport {
    StatusReport::processing(JobId::from(id))
}

pub fn completed_music(id: &str) -> StatusReport {
    StatusReport::completed(
        JobId::from(id),
        StageResult::Music {
            phrase: Some("sunset over the sea".to_string()),
            lyrics: None,
            music_url: format!("/files/{id}.mp3"),
        },
    )
}

pub fn completed_film(id: &str) -> StatusReport {
    StatusReport::completed(
        JobId::from(id),
        StageResult::Film {
            film_url: format!("/files/{id}.mp4"),
            screenplay_url: None,
            storyboard_url: None,
        },
    )
}

pub fn failed(id: &str, message: &str) -> StatusReport {
    StatusReport::failed(JobId::from(id), message)
}

pub fn ack(id: &str) -> CreateAck {
    CreateAck {
        id: JobId::from(id),
        status: JobStatus::Processing,
    }
}

/// A [`StageService`] that answers from pre-scripted queues.
///
/// An exhausted status queue keeps answering `processing` for the queried
/// job, so tests only script the responses they care about. Creation calls
/// with an exhausted queue panic: a test that did not script a creation
/// did not expect one.
#[derive(Default)]
pub struct ScriptedService {
    create_results: Mutex<VecDeque<Result<CreateAck>>>,
    status_results: Mutex<VecDeque<Result<StatusReport>>>,
    create_calls: AtomicUsize,
    status_calls: AtomicUsize,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(self, result: Result<CreateAck>) -> Self {
        self.create_results.lock().unwrap().push_back(result);
        self
    }

    pub fn status(self, result: Result<StatusReport>) -> Self {
        self.status_results.lock().unwrap().push_back(result);
        self
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StageService for ScriptedService {
    async fn create(&self, request: CreateRequest) -> Result<CreateAck> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.create_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unscripted create call for {}", request.stage()))
    }

    async fn get_status(&self, _stage: Stage, id: &JobId) -> Result<StatusReport> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        match self.status_results.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(StatusReport::processing(id.clone())),
        }
    }
}

impl std::fmt::Debug for ScriptedService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedService")
            .field("create_calls", &self.create_calls())
            .field("status_calls", &self.status_calls())
            .finish()
    }
}

pub fn network_error() -> ClientError {
    ClientError::api_error(503, "service unavailable")
}
