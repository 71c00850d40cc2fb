//! The validated job request produced by the webhook router.

use crate::pipeline::PipelineKind;

/// A validated request to run one pipeline.
///
/// Constructed once per accepted webhook call and immutable afterwards.
/// `job_name` doubles as the admission key: at most one run per name may be
/// in flight at a time.
#[derive(Debug, Clone)]
pub struct JobRequest {
    job_name: String,
    model_run_id: String,
    kind: PipelineKind,
    payload: serde_json::Value,
}

impl JobRequest {
    /// Creates a new job request.
    #[must_use]
    pub fn new(
        job_name: impl Into<String>,
        model_run_id: impl Into<String>,
        kind: PipelineKind,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            job_name: job_name.into(),
            model_run_id: model_run_id.into(),
            kind,
            payload,
        }
    }

    /// The admission key for this request.
    #[must_use]
    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    /// The model run the pipeline reports status against.
    #[must_use]
    pub fn model_run_id(&self) -> &str {
        &self.model_run_id
    }

    /// The pipeline kind resolved from the payload's `modelType`.
    #[must_use]
    pub fn kind(&self) -> PipelineKind {
        self.kind
    }

    /// The raw webhook payload, for pipeline-specific argument parsing.
    #[must_use]
    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }
}
