//! Twinverse Pipeline
//!
//! Orchestration logic for the four-stage creation pipeline:
//! - `poller`: the owned status-polling task for one job
//! - `controller`: the per-stage submission/polling state machine
//! - `chain`: identifier bookkeeping across stages
//! - `navigator`: the navigation router boundary
//! - `config`: polling and backend connection settings

pub mod chain;
pub mod config;
pub mod controller;
pub mod navigator;
pub mod poller;

#[cfg(test)]
pub(crate) mod testing;

pub use chain::PipelineChain;
pub use config::Config;
pub use controller::{StageController, StageError, StageOutcome, StageState};
pub use navigator::{Navigator, TracingNavigator};
pub use poller::{DEFAULT_POLL_INTERVAL, PollEvent, StatusPoller};
