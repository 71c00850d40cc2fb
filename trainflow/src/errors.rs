//! Error types for the trainflow coordinator.
//!
//! Errors are grouped by the boundary they cross: `CoordinatorError` for the
//! synchronous request path, `ValidationError` for payload problems,
//! `StageError` for failures raised during pipeline execution, and
//! `ConfigError` for process startup.

use thiserror::Error;

/// Errors surfaced on the synchronous request path, before any pipeline runs.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// The webhook signature was missing or did not match the request body.
    #[error("computed signature does not match signature provided in the headers")]
    Authentication,

    /// The payload failed validation before scheduling.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A pipeline run is already in flight for this job name.
    #[error("job `{job_name}` is already running")]
    DuplicateJob {
        /// The job name that was already admitted.
        job_name: String,
    },
}

/// Errors raised while validating an inbound webhook payload.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The request body could not be parsed as JSON.
    #[error("request body is not valid JSON: {0}")]
    InvalidJson(String),

    /// The payload had no `modelType` field.
    #[error("must provide `modelType` key indicating which pipeline to run; expected one of: {expected:?}")]
    MissingModelType {
        /// The pipeline kinds registered at startup.
        expected: Vec<String>,
    },

    /// The `modelType` value did not name a registered pipeline.
    #[error("unknown pipeline `{given}`; expected one of: {expected:?}")]
    UnknownPipeline {
        /// The value the caller supplied.
        given: String,
        /// The pipeline kinds registered at startup.
        expected: Vec<String>,
    },

    /// The payload had no `modelRunId` field.
    #[error("must provide `modelRunId`")]
    MissingModelRunId,

    /// The resolved pipeline rejected the payload's arguments.
    #[error("invalid pipeline arguments: {0}")]
    PipelineArgs(String),
}

/// Errors raised by a stage job during pipeline execution.
///
/// A failing stage returns `Err` rather than a failure-status result, so
/// failure handling stays centralized in the executor.
#[derive(Debug, Error)]
pub enum StageError {
    /// The external training platform rejected or failed the submitted work.
    #[error("platform error in stage `{stage}`: {message}")]
    Platform {
        /// The stage that submitted the work.
        stage: String,
        /// The platform's error message.
        message: String,
    },

    /// A stage required an artifact no previous stage produced.
    #[error("stage `{stage}` is missing required artifact `{artifact}`")]
    MissingArtifact {
        /// The stage that needed the artifact.
        stage: String,
        /// The artifact key that was absent.
        artifact: String,
    },

    /// A stage-specific failure.
    #[error("stage `{stage}` failed: {message}")]
    Execution {
        /// The stage that failed.
        stage: String,
        /// A description of the failure.
        message: String,
    },
}

impl StageError {
    /// Creates a platform error for the given stage.
    #[must_use]
    pub fn platform(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Platform {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Creates a missing-artifact error for the given stage.
    #[must_use]
    pub fn missing_artifact(stage: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self::MissingArtifact {
            stage: stage.into(),
            artifact: artifact.into(),
        }
    }

    /// Creates an execution error for the given stage.
    #[must_use]
    pub fn execution(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            stage: stage.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while loading process configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable was not set.
    #[error("missing required environment variable `{0}`")]
    MissingVar(&'static str),

    /// An environment variable held an unusable value.
    #[error("invalid value for `{var}`: {message}")]
    InvalidVar {
        /// The variable that failed to parse.
        var: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}
