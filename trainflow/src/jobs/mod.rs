//! Stage job contract.
//!
//! Stage jobs are the uniform units of work a pipeline sequences: data
//! extraction, model training, deployment, inference. Implementations may
//! block for hours on external work; the coordinator imposes no timeout.

use crate::core::JobStatus;
use crate::errors::StageError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;

/// The inputs handed to a stage job.
///
/// `artifacts` accumulates the result maps of every prior stage in the run,
/// which is how a training stage finds the ETL output location and a
/// deployment stage finds the trained model identifier.
#[derive(Debug, Clone)]
pub struct StageInputs {
    /// The model run the pipeline reports against.
    pub model_run_id: String,
    /// The display/admission name of the run.
    pub job_name: String,
    /// Artifacts produced by earlier stages, keyed by artifact name.
    pub artifacts: HashMap<String, serde_json::Value>,
}

impl StageInputs {
    /// Creates inputs for the first stage of a run.
    #[must_use]
    pub fn new(model_run_id: impl Into<String>, job_name: impl Into<String>) -> Self {
        Self {
            model_run_id: model_run_id.into(),
            job_name: job_name.into(),
            artifacts: HashMap::new(),
        }
    }

    /// Looks up an artifact produced by an earlier stage.
    #[must_use]
    pub fn artifact(&self, key: &str) -> Option<&serde_json::Value> {
        self.artifacts.get(key)
    }

    /// Looks up a string artifact, failing with a stage-attributed error.
    pub fn require_str(&self, stage: &str, key: &str) -> Result<&str, StageError> {
        self.artifacts
            .get(key)
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| StageError::missing_artifact(stage, key))
    }

    /// Merges a completed stage's result map into the artifact set.
    pub fn absorb(&mut self, result: HashMap<String, serde_json::Value>) {
        self.artifacts.extend(result);
    }
}

/// Trait for stage jobs.
///
/// A stage that fails must return `Err` rather than a failure-status
/// result, so that failure handling stays centralized in the executor.
#[async_trait]
pub trait StageJob: Send + Sync + Debug {
    /// Returns the name of the stage.
    fn name(&self) -> &str;

    /// Executes the stage.
    async fn run(&self, inputs: &StageInputs) -> Result<JobStatus, StageError>;
}

/// A function-based stage job, mainly useful in tests.
pub struct FnStageJob<F>
where
    F: Fn(&StageInputs) -> Result<JobStatus, StageError> + Send + Sync,
{
    name: String,
    func: F,
}

impl<F> FnStageJob<F>
where
    F: Fn(&StageInputs) -> Result<JobStatus, StageError> + Send + Sync,
{
    /// Creates a new function-based stage job.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Debug for FnStageJob<F>
where
    F: Fn(&StageInputs) -> Result<JobStatus, StageError> + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnStageJob").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<F> StageJob for FnStageJob<F>
where
    F: Fn(&StageInputs) -> Result<JobStatus, StageError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, inputs: &StageInputs) -> Result<JobStatus, StageError> {
        (self.func)(inputs)
    }
}
