//! Status reporter seam.
//!
//! The coordinator never stores pipeline state; every transition is pushed
//! to an external system of record through `StatusReporter`. Ordering is
//! guaranteed per run because the owning pipeline awaits each update before
//! executing the next stage.

use crate::core::PipelineState;
use async_trait::async_trait;
use tracing::{error, info};

/// A single state transition for one model run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StatusUpdate {
    /// The state being reported.
    pub state: PipelineState,
    /// The model run this transition belongs to.
    pub model_run_id: String,
    /// Optional state-specific metadata (e.g. the ETL output location).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    /// Failure detail, set only with [`PipelineState::Failed`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl StatusUpdate {
    /// Creates an update with no metadata.
    #[must_use]
    pub fn new(state: PipelineState, model_run_id: impl Into<String>) -> Self {
        Self {
            state,
            model_run_id: model_run_id.into(),
            metadata: None,
            error_message: None,
        }
    }

    /// Attaches metadata to the update.
    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Attaches a failure message to the update.
    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

/// Trait for status reporters.
#[async_trait]
pub trait StatusReporter: Send + Sync {
    /// Delivers one state transition to the external system of record.
    async fn update_status(&self, update: StatusUpdate);
}

/// A reporter that discards all updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpStatusReporter;

#[async_trait]
impl StatusReporter for NoOpStatusReporter {
    async fn update_status(&self, _update: StatusUpdate) {}
}

/// A reporter that logs updates through the tracing framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingStatusReporter;

#[async_trait]
impl StatusReporter for LoggingStatusReporter {
    async fn update_status(&self, update: StatusUpdate) {
        match update.state {
            PipelineState::Failed => {
                error!(
                    state = %update.state,
                    model_run_id = %update.model_run_id,
                    error_message = update.error_message.as_deref().unwrap_or(""),
                    "pipeline status update"
                );
            }
            _ => {
                info!(
                    state = %update.state,
                    model_run_id = %update.model_run_id,
                    metadata = ?update.metadata,
                    "pipeline status update"
                );
            }
        }
    }
}

/// A reporter that records updates in memory, for tests and assertions.
#[derive(Debug, Default)]
pub struct CollectingStatusReporter {
    updates: parking_lot::RwLock<Vec<StatusUpdate>>,
}

impl CollectingStatusReporter {
    /// Creates a new collecting reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded updates in delivery order.
    #[must_use]
    pub fn updates(&self) -> Vec<StatusUpdate> {
        self.updates.read().clone()
    }

    /// Returns just the recorded states, in delivery order.
    #[must_use]
    pub fn states(&self) -> Vec<PipelineState> {
        self.updates.read().iter().map(|u| u.state).collect()
    }

    /// Returns the number of recorded updates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.updates.read().len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.read().is_empty()
    }
}

#[async_trait]
impl StatusReporter for CollectingStatusReporter {
    async fn update_status(&self, update: StatusUpdate) {
        self.updates.write().push(update);
    }
}
