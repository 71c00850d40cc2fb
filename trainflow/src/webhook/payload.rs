//! Webhook payload validation and routing.

use crate::core::JobRequest;
use crate::errors::ValidationError;
use crate::pipeline::{PipelineKind, PipelineRegistry};
use chrono::Utc;

/// Validates a raw webhook body and resolves it to a job request.
///
/// Checks, in order: the body parses as JSON, `modelType` is present and
/// names a registered pipeline, `modelRunId` is present. A missing
/// `job_name` is synthesized from the pipeline kind and the current time.
/// Finally the resolved pipeline's own argument parsing runs, which may
/// reject pipeline-specific fields.
///
/// Pure with respect to shared state: neither the registry nor the
/// admission set is touched.
pub fn validate(raw: &[u8], registry: &PipelineRegistry) -> Result<JobRequest, ValidationError> {
    let payload: serde_json::Value = serde_json::from_slice(raw)
        .map_err(|err| ValidationError::InvalidJson(err.to_string()))?;

    let model_type = payload
        .get("modelType")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| ValidationError::MissingModelType {
            expected: registry.kind_names(),
        })?;

    let kind = model_type
        .parse::<PipelineKind>()
        .ok()
        .filter(|kind| registry.get(*kind).is_some())
        .ok_or_else(|| ValidationError::UnknownPipeline {
            given: model_type.to_string(),
            expected: registry.kind_names(),
        })?;

    let model_run_id = payload
        .get("modelRunId")
        .and_then(serde_json::Value::as_str)
        .ok_or(ValidationError::MissingModelRunId)?;

    let job_name = payload
        .get("job_name")
        .and_then(serde_json::Value::as_str)
        .map_or_else(|| synthesized_job_name(kind), str::to_string);

    let request = JobRequest::new(job_name, model_run_id, kind, payload.clone());

    let pipeline = registry
        .get(kind)
        .ok_or_else(|| ValidationError::UnknownPipeline {
            given: model_type.to_string(),
            expected: registry.kind_names(),
        })?;
    pipeline.parse_args(&request)?;

    Ok(request)
}

/// Derives a job name from the pipeline kind and the current timestamp.
#[must_use]
pub fn synthesized_job_name(kind: PipelineKind) -> String {
    format!("{kind}_{}", Utc::now().format("%Y-%m-%d_%H:%M:%S%.6f"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::JobStatus;
    use crate::jobs::FnStageJob;
    use crate::pipeline::TrainingPipeline;
    use crate::reporting::NoOpStatusReporter;
    use std::sync::Arc;

    fn registry() -> PipelineRegistry {
        let noop = || {
            Arc::new(FnStageJob::new("noop", |_| Ok(JobStatus::success())))
                as Arc<dyn crate::jobs::StageJob>
        };
        PipelineRegistry::new([Arc::new(TrainingPipeline::new(
            PipelineKind::Ner,
            noop(),
            noop(),
            Arc::new(NoOpStatusReporter),
        )) as Arc<dyn crate::pipeline::Pipeline>])
    }

    #[test]
    fn test_valid_payload_with_job_name() {
        let body = br#"{"modelRunId":"abc123","modelType":"ner","job_name":"my_job"}"#;
        let request = validate(body, &registry()).unwrap();
        assert_eq!(request.job_name(), "my_job");
        assert_eq!(request.model_run_id(), "abc123");
        assert_eq!(request.kind(), PipelineKind::Ner);
    }

    #[test]
    fn test_job_name_synthesized_when_absent() {
        let body = br#"{"modelRunId":"abc123","modelType":"ner"}"#;
        let request = validate(body, &registry()).unwrap();
        assert!(request.job_name().starts_with("ner_"));
        assert!(request.job_name().len() > "ner_".len());
    }

    #[test]
    fn test_missing_model_type() {
        let body = br#"{"modelRunId":"abc123"}"#;
        let err = validate(body, &registry()).unwrap_err();
        assert!(matches!(err, ValidationError::MissingModelType { .. }));
        assert!(err.to_string().contains("ner"));
    }

    #[test]
    fn test_unknown_model_type() {
        let body = br#"{"modelRunId":"abc123","modelType":"sentiment"}"#;
        let err = validate(body, &registry()).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownPipeline { .. }));
    }

    #[test]
    fn test_known_kind_not_registered() {
        // bounding_box is a valid kind but this registry only carries ner.
        let body = br#"{"modelRunId":"abc123","modelType":"bounding_box"}"#;
        let err = validate(body, &registry()).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownPipeline { .. }));
    }

    #[test]
    fn test_missing_model_run_id() {
        let body = br#"{"modelType":"ner"}"#;
        let err = validate(body, &registry()).unwrap_err();
        assert!(matches!(err, ValidationError::MissingModelRunId));
    }

    #[test]
    fn test_invalid_json() {
        let err = validate(b"not json", &registry()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidJson(_)));
    }
}
