//! Standard pipeline compositions.

pub mod stages;

use crate::pipeline::{Pipeline, PipelineKind, PipelineRegistry, TrainingPipeline};
use crate::platform::PlatformClient;
use crate::reporting::StatusReporter;
use stages::{DeploymentStage, EtlStage, InferenceStage, TrainingStage};
use std::sync::Arc;

/// Settings shared by every standard pipeline.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Bucket the ETL stages stage training data in.
    pub gcs_bucket: String,
}

fn standard_pipeline(
    kind: PipelineKind,
    deploys: bool,
    settings: &PipelineSettings,
    client: &PlatformClient,
    reporter: &Arc<dyn StatusReporter>,
) -> Arc<dyn Pipeline> {
    let mut pipeline = TrainingPipeline::new(
        kind,
        Arc::new(EtlStage::new(
            client.clone(),
            kind,
            settings.gcs_bucket.clone(),
        )),
        Arc::new(TrainingStage::new(client.clone(), kind)),
        Arc::clone(reporter),
    );
    if deploys {
        pipeline = pipeline.with_stage(Arc::new(DeploymentStage::new(client.clone(), kind)));
    }
    pipeline = pipeline.with_stage(Arc::new(InferenceStage::new(client.clone(), kind)));
    Arc::new(pipeline)
}

/// Builds the full registry of standard pipelines.
///
/// Image and bounding-box pipelines deploy the trained model before running
/// inference; text and NER pipelines run inference directly against the
/// trained model.
#[must_use]
pub fn standard_registry(
    settings: &PipelineSettings,
    client: &PlatformClient,
    reporter: &Arc<dyn StatusReporter>,
) -> PipelineRegistry {
    let build =
        |kind, deploys| standard_pipeline(kind, deploys, settings, client, reporter);

    PipelineRegistry::new([
        build(PipelineKind::BoundingBox, true),
        build(PipelineKind::ImageSingleClassification, true),
        build(PipelineKind::ImageMultiClassification, true),
        build(PipelineKind::ImageKnnClassification, true),
        build(PipelineKind::Ner, false),
        build(PipelineKind::TextSingleClassification, false),
        build(PipelineKind::TextMultiClassification, false),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::NoOpStatusReporter;

    #[test]
    fn test_standard_registry_covers_every_kind() {
        let settings = PipelineSettings {
            gcs_bucket: "bucket".to_string(),
        };
        let client = PlatformClient::new("http://platform");
        let reporter: Arc<dyn StatusReporter> = Arc::new(NoOpStatusReporter);

        let registry = standard_registry(&settings, &client, &reporter);
        assert_eq!(registry.len(), PipelineKind::ALL.len());
        for kind in PipelineKind::ALL {
            assert!(registry.get(kind).is_some(), "missing pipeline for {kind}");
        }
    }
}
