//! # Trainflow
//!
//! A webhook-triggered coordinator for ML training pipelines.
//!
//! Trainflow authenticates inbound webhook requests, admits at most one
//! concurrent run per job name, executes a multi-stage training pipeline in
//! the background, and reports progress through a status-reporter seam:
//!
//! - **Webhook authentication**: HMAC-SHA1 over the raw request body
//! - **Payload routing**: closed set of pipeline kinds, validated upfront
//! - **Admission control**: atomic one-run-per-job-name discipline
//! - **Background execution**: fire-and-forget runs with guaranteed release
//! - **Ordered status reporting**: strictly forward-progressing run states
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use trainflow::prelude::*;
//!
//! let reporter: Arc<dyn StatusReporter> = Arc::new(LoggingStatusReporter);
//! let client = PlatformClient::new("http://platform:9090");
//! let registry = Arc::new(standard_registry(&settings, &client, &reporter));
//!
//! let executor = BackgroundExecutor::new(AdmissionRegistry::new());
//! let app = server::router(AppState::new(registry, executor, secret));
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod admission;
pub mod config;
pub mod core;
pub mod errors;
pub mod executor;
pub mod jobs;
pub mod pipeline;
pub mod pipelines;
pub mod platform;
pub mod reporting;
pub mod server;
pub mod webhook;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::admission::{AdmissionPermit, AdmissionRegistry};
    pub use crate::config::CoordinatorConfig;
    pub use crate::core::{JobRequest, JobState, JobStatus, PipelineState};
    pub use crate::errors::{
        ConfigError, CoordinatorError, StageError, ValidationError,
    };
    pub use crate::executor::BackgroundExecutor;
    pub use crate::jobs::{FnStageJob, StageInputs, StageJob};
    pub use crate::pipeline::{
        Pipeline, PipelineKind, PipelineRegistry, TrainingPipeline,
    };
    pub use crate::pipelines::{standard_registry, PipelineSettings};
    pub use crate::platform::PlatformClient;
    pub use crate::reporting::{
        CollectingStatusReporter, LoggingStatusReporter, NoOpStatusReporter,
        StatusReporter, StatusUpdate,
    };
    pub use crate::server::{router, AppState};
    pub use crate::webhook::{sign, synthesized_job_name, validate, verify, SIGNATURE_HEADER};
}
