//! Pipeline state and stage status types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The externally reported phase of a pipeline run.
///
/// States are strictly forward-progressing: `PreparingData` to
/// `TrainingModel` (possibly repeated with fresh metadata) to `Complete`,
/// or a jump from any non-terminal state to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineState {
    /// The ETL stage is extracting and staging training data.
    PreparingData,
    /// A model is being trained (or a training artifact was just produced).
    TrainingModel,
    /// The pipeline finished successfully.
    Complete,
    /// The pipeline stopped after a stage failure.
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreparingData => write!(f, "PREPARING_DATA"),
            Self::TrainingModel => write!(f, "TRAINING_MODEL"),
            Self::Complete => write!(f, "COMPLETE"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

impl PipelineState {
    /// Returns true if no further transitions can follow this state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

/// The outcome a stage job reports to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    /// The stage completed its work.
    Success,
    /// The stage finished but its work did not succeed.
    ///
    /// Stages should prefer returning an error over this state; it exists
    /// for platforms that report soft failures in-band.
    Failure,
}

/// The result returned by a stage job.
///
/// Consumed immediately by the owning pipeline, never persisted. The
/// `result` map carries artifacts for downstream stages (an ETL stage's
/// output location, a training stage's model identifier).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatus {
    /// Whether the stage succeeded.
    pub state: JobState,
    /// Artifacts produced by the stage, keyed by artifact name.
    #[serde(default)]
    pub result: HashMap<String, serde_json::Value>,
    /// Error detail for soft failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl JobStatus {
    /// Creates a successful status with no artifacts.
    #[must_use]
    pub fn success() -> Self {
        Self {
            state: JobState::Success,
            result: HashMap::new(),
            error_message: None,
        }
    }

    /// Creates a successful status carrying a single artifact.
    #[must_use]
    pub fn success_with(key: impl Into<String>, value: serde_json::Value) -> Self {
        let mut result = HashMap::new();
        result.insert(key.into(), value);
        Self {
            state: JobState::Success,
            result,
            error_message: None,
        }
    }

    /// Creates a successful status carrying the given artifacts.
    #[must_use]
    pub fn success_with_all(result: HashMap<String, serde_json::Value>) -> Self {
        Self {
            state: JobState::Success,
            result,
            error_message: None,
        }
    }

    /// Returns true if the stage reported success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.state == JobState::Success
    }
}
