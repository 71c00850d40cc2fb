//! The pipeline state machine.

use crate::core::{JobRequest, PipelineState};
use crate::errors::{StageError, ValidationError};
use crate::jobs::{StageInputs, StageJob};
use crate::pipeline::PipelineKind;
use crate::reporting::{StatusReporter, StatusUpdate};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Trait for pipelines: a named, stateless composition of stage jobs.
///
/// Implementations never retry and never re-enter a completed run; any stage
/// error short-circuits the sequence and propagates to the executor, which
/// owns the `FAILED` transition.
#[async_trait]
pub trait Pipeline: Send + Sync {
    /// The kind this pipeline is registered under.
    fn kind(&self) -> PipelineKind;

    /// The reporter this pipeline emits transitions through.
    ///
    /// Exposed so the executor can report `FAILED` on the pipeline's behalf.
    fn reporter(&self) -> Arc<dyn StatusReporter>;

    /// Pipeline-specific argument validation, run at the webhook boundary.
    ///
    /// The default accepts every validated request.
    fn parse_args(&self, request: &JobRequest) -> Result<(), ValidationError> {
        let _ = request;
        Ok(())
    }

    /// Runs the stage sequence to completion, emitting ordered transitions.
    async fn run(&self, request: &JobRequest) -> Result<(), StageError>;
}

/// The standard training pipeline: ETL, training, then zero or more
/// post-training stages (deployment, inference).
///
/// A successful run emits exactly:
/// `PREPARING_DATA`, `TRAINING_MODEL` (with the ETL output location),
/// `TRAINING_MODEL` (with the trained model id), `COMPLETE`.
pub struct TrainingPipeline {
    kind: PipelineKind,
    etl: Arc<dyn StageJob>,
    training: Arc<dyn StageJob>,
    post_training: Vec<Arc<dyn StageJob>>,
    reporter: Arc<dyn StatusReporter>,
}

impl TrainingPipeline {
    /// Creates a pipeline with the two mandatory stages.
    #[must_use]
    pub fn new(
        kind: PipelineKind,
        etl: Arc<dyn StageJob>,
        training: Arc<dyn StageJob>,
        reporter: Arc<dyn StatusReporter>,
    ) -> Self {
        Self {
            kind,
            etl,
            training,
            post_training: Vec::new(),
            reporter,
        }
    }

    /// Appends a post-training stage (deployment, inference).
    #[must_use]
    pub fn with_stage(mut self, stage: Arc<dyn StageJob>) -> Self {
        self.post_training.push(stage);
        self
    }

    async fn emit(&self, update: StatusUpdate) {
        self.reporter.update_status(update).await;
    }
}

impl std::fmt::Debug for TrainingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainingPipeline")
            .field("kind", &self.kind)
            .field("etl", &self.etl.name())
            .field("training", &self.training.name())
            .field(
                "post_training",
                &self
                    .post_training
                    .iter()
                    .map(|s| s.name().to_string())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[async_trait]
impl Pipeline for TrainingPipeline {
    fn kind(&self) -> PipelineKind {
        self.kind
    }

    fn reporter(&self) -> Arc<dyn StatusReporter> {
        Arc::clone(&self.reporter)
    }

    async fn run(&self, request: &JobRequest) -> Result<(), StageError> {
        let model_run_id = request.model_run_id();
        let mut inputs = StageInputs::new(model_run_id, request.job_name());

        self.emit(StatusUpdate::new(PipelineState::PreparingData, model_run_id))
            .await;

        let etl_status = self.etl.run(&inputs).await?;
        inputs.absorb(etl_status.result);

        let mut update = StatusUpdate::new(PipelineState::TrainingModel, model_run_id);
        if let Some(etl_file) = inputs.artifact("etl_file") {
            update = update.with_metadata(serde_json::json!({
                "training_data_input": etl_file,
            }));
        }
        self.emit(update).await;

        let training_status = self.training.run(&inputs).await?;
        inputs.absorb(training_status.result);

        let mut update = StatusUpdate::new(PipelineState::TrainingModel, model_run_id);
        if let Some(model_id) = inputs.artifact("model_id") {
            update = update.with_metadata(serde_json::json!({
                "model_id": model_id,
            }));
        }
        self.emit(update).await;

        for stage in &self.post_training {
            info!(
                kind = %self.kind,
                stage = stage.name(),
                job_name = request.job_name(),
                "running post-training stage"
            );
            let status = stage.run(&inputs).await?;
            inputs.absorb(status.result);
        }

        self.emit(StatusUpdate::new(PipelineState::Complete, model_run_id))
            .await;
        Ok(())
    }
}
