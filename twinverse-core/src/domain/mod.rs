//! Domain types for the creation pipeline
//!
//! These are the types the orchestration logic operates on, independent of
//! how the backend serializes them on the wire (see [`crate::dto`]).

pub mod context;
pub mod job;
pub mod route;
pub mod stage;

pub use context::{ContextError, PipelineContext};
pub use job::{HandleError, JobHandle, JobId, JobStatus, StageResult, StatusReport};
pub use route::Route;
pub use stage::Stage;
