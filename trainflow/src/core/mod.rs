//! Core data types shared across the coordinator.

mod request;
mod status;

pub use request::JobRequest;
pub use status::{JobState, JobStatus, PipelineState};
