//! Platform-backed stage job implementations.
//!
//! Each stage submits one task to the training platform and republishes the
//! artifacts downstream stages consume: `etl_file`, `model_id`,
//! `endpoint_id`.

use crate::core::JobStatus;
use crate::errors::StageError;
use crate::jobs::{StageInputs, StageJob};
use crate::pipeline::PipelineKind;
use crate::platform::PlatformClient;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

fn task_path(kind: PipelineKind, stage: &str) -> String {
    format!("{kind}/{stage}")
}

/// Extracts data for a model run and stages it as a training file.
#[derive(Debug)]
pub struct EtlStage {
    client: PlatformClient,
    task: String,
    gcs_bucket: String,
}

impl EtlStage {
    /// Creates the ETL stage for a pipeline kind.
    #[must_use]
    pub fn new(client: PlatformClient, kind: PipelineKind, gcs_bucket: impl Into<String>) -> Self {
        Self {
            client,
            task: task_path(kind, "etl"),
            gcs_bucket: gcs_bucket.into(),
        }
    }
}

#[async_trait]
impl StageJob for EtlStage {
    fn name(&self) -> &str {
        &self.task
    }

    async fn run(&self, inputs: &StageInputs) -> Result<JobStatus, StageError> {
        let gcs_key = format!(
            "{}/{}.jsonl",
            self.task,
            Utc::now().format("%Y-%m-%d_%H:%M:%S")
        );
        let args = json!({
            "gcs_bucket": self.gcs_bucket,
            "gcs_key": gcs_key,
            "model_run_id": inputs.model_run_id,
            "job_name": inputs.job_name,
        });
        self.client.submit(&self.task, &args).await?;

        Ok(JobStatus::success_with(
            "etl_file",
            json!(format!("gs://{}/{}", self.gcs_bucket, gcs_key)),
        ))
    }
}

/// Trains a model on the staged training file.
#[derive(Debug)]
pub struct TrainingStage {
    client: PlatformClient,
    task: String,
}

impl TrainingStage {
    /// Creates the training stage for a pipeline kind.
    #[must_use]
    pub fn new(client: PlatformClient, kind: PipelineKind) -> Self {
        Self {
            client,
            task: task_path(kind, "training"),
        }
    }
}

#[async_trait]
impl StageJob for TrainingStage {
    fn name(&self) -> &str {
        &self.task
    }

    async fn run(&self, inputs: &StageInputs) -> Result<JobStatus, StageError> {
        let etl_file = inputs.require_str(&self.task, "etl_file")?;
        let args = json!({
            "training_file": etl_file,
            "model_run_id": inputs.model_run_id,
            "job_name": inputs.job_name,
        });
        let result = self.client.submit(&self.task, &args).await?;

        let model_id = result.get("model_id").cloned().ok_or_else(|| {
            StageError::platform(&self.task, "platform response missing `model_id`")
        })?;
        Ok(JobStatus::success_with("model_id", model_id))
    }
}

/// Deploys a trained model to a serving endpoint.
#[derive(Debug)]
pub struct DeploymentStage {
    client: PlatformClient,
    task: String,
}

impl DeploymentStage {
    /// Creates the deployment stage for a pipeline kind.
    #[must_use]
    pub fn new(client: PlatformClient, kind: PipelineKind) -> Self {
        Self {
            client,
            task: task_path(kind, "deployment"),
        }
    }
}

#[async_trait]
impl StageJob for DeploymentStage {
    fn name(&self) -> &str {
        &self.task
    }

    async fn run(&self, inputs: &StageInputs) -> Result<JobStatus, StageError> {
        let model_id = inputs.require_str(&self.task, "model_id")?;
        let args = json!({
            "model_id": model_id,
            "job_name": inputs.job_name,
        });
        let result = self.client.submit(&self.task, &args).await?;

        let endpoint_id = result.get("endpoint_id").cloned().ok_or_else(|| {
            StageError::platform(&self.task, "platform response missing `endpoint_id`")
        })?;
        Ok(JobStatus::success_with("endpoint_id", endpoint_id))
    }
}

/// Runs inference with the freshly trained model against the staged data.
#[derive(Debug)]
pub struct InferenceStage {
    client: PlatformClient,
    task: String,
}

impl InferenceStage {
    /// Creates the inference stage for a pipeline kind.
    #[must_use]
    pub fn new(client: PlatformClient, kind: PipelineKind) -> Self {
        Self {
            client,
            task: task_path(kind, "inference"),
        }
    }
}

#[async_trait]
impl StageJob for InferenceStage {
    fn name(&self) -> &str {
        &self.task
    }

    async fn run(&self, inputs: &StageInputs) -> Result<JobStatus, StageError> {
        let etl_file = inputs.require_str(&self.task, "etl_file")?;
        let model_id = inputs.require_str(&self.task, "model_id")?;
        let args = json!({
            "etl_file": etl_file,
            "model_id": model_id,
            "model_run_id": inputs.model_run_id,
            "job_name": inputs.job_name,
        });
        self.client.submit(&self.task, &args).await?;

        Ok(JobStatus::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_paths_are_kind_scoped() {
        let client = PlatformClient::new("http://platform");
        let etl = EtlStage::new(client.clone(), PipelineKind::Ner, "bucket");
        assert_eq!(etl.name(), "ner/etl");

        let training = TrainingStage::new(client.clone(), PipelineKind::BoundingBox);
        assert_eq!(training.name(), "bounding_box/training");

        let deployment = DeploymentStage::new(client.clone(), PipelineKind::BoundingBox);
        assert_eq!(deployment.name(), "bounding_box/deployment");

        let inference = InferenceStage::new(client, PipelineKind::Ner);
        assert_eq!(inference.name(), "ner/inference");
    }

    #[tokio::test]
    async fn test_training_requires_etl_artifact() {
        let client = PlatformClient::new("http://platform");
        let training = TrainingStage::new(client, PipelineKind::Ner);

        let inputs = StageInputs::new("run-1", "job-1");
        let err = training.run(&inputs).await.unwrap_err();
        assert!(matches!(
            err,
            StageError::MissingArtifact { ref artifact, .. } if artifact == "etl_file"
        ));
    }

    #[tokio::test]
    async fn test_inference_requires_both_artifacts() {
        let client = PlatformClient::new("http://platform");
        let inference = InferenceStage::new(client, PipelineKind::Ner);

        let mut inputs = StageInputs::new("run-1", "job-1");
        inputs.absorb(
            [("etl_file".to_string(), json!("gs://bucket/file.jsonl"))]
                .into_iter()
                .collect(),
        );
        let err = inference.run(&inputs).await.unwrap_err();
        assert!(matches!(
            err,
            StageError::MissingArtifact { ref artifact, .. } if artifact == "model_id"
        ));
    }
}
