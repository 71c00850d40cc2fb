//! Background execution of admitted pipeline runs.

use crate::admission::AdmissionRegistry;
use crate::core::{JobRequest, PipelineState};
use crate::errors::CoordinatorError;
use crate::pipeline::Pipeline;
use crate::reporting::StatusUpdate;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Schedules admitted pipeline runs off the request path.
///
/// Admission happens synchronously in [`schedule`](Self::schedule), so a
/// duplicate job name is rejected before any task is spawned and the caller
/// gets a real error instead of a silent drop. Everything after admission is
/// fire-and-forget: the spawned task owns the admission permit, reports
/// `FAILED` on any stage error, and releases the slot on every exit path
/// when the permit drops.
///
/// Scheduling is unbounded by design; the per-name admission rule is the
/// only throttle on concurrent runs.
#[derive(Debug, Clone, Default)]
pub struct BackgroundExecutor {
    admission: AdmissionRegistry,
}

impl BackgroundExecutor {
    /// Creates an executor over the given admission registry.
    #[must_use]
    pub fn new(admission: AdmissionRegistry) -> Self {
        Self { admission }
    }

    /// The admission registry backing this executor.
    #[must_use]
    pub fn admission(&self) -> &AdmissionRegistry {
        &self.admission
    }

    /// Admits the request and spawns its pipeline run.
    ///
    /// Returns immediately after spawning; the pipeline outcome is only
    /// observable through the pipeline's status reporter.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinatorError::DuplicateJob`] if a run already holds the
    /// request's job name.
    pub fn schedule(
        &self,
        request: JobRequest,
        pipeline: Arc<dyn Pipeline>,
    ) -> Result<(), CoordinatorError> {
        let permit = self.admission.try_admit(request.job_name()).ok_or_else(|| {
            CoordinatorError::DuplicateJob {
                job_name: request.job_name().to_string(),
            }
        })?;

        let run_id = Uuid::new_v4();
        info!(
            run_id = %run_id,
            job_name = request.job_name(),
            kind = %request.kind(),
            model_run_id = request.model_run_id(),
            "pipeline run scheduled"
        );

        tokio::spawn(async move {
            // Dropping the permit at task end releases admission whether the
            // run succeeds or fails.
            let _permit = permit;

            match pipeline.run(&request).await {
                Ok(()) => {
                    info!(
                        run_id = %run_id,
                        job_name = request.job_name(),
                        "pipeline run completed"
                    );
                }
                Err(err) => {
                    error!(
                        run_id = %run_id,
                        job_name = request.job_name(),
                        error = %err,
                        "pipeline run failed"
                    );
                    pipeline
                        .reporter()
                        .update_status(
                            StatusUpdate::new(PipelineState::Failed, request.model_run_id())
                                .with_error(err.to_string()),
                        )
                        .await;
                }
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::JobStatus;
    use crate::errors::StageError;
    use crate::jobs::FnStageJob;
    use crate::pipeline::{PipelineKind, TrainingPipeline};
    use crate::reporting::CollectingStatusReporter;
    use std::time::Duration;

    fn request(job_name: &str) -> JobRequest {
        JobRequest::new(
            job_name,
            "run-1",
            PipelineKind::Ner,
            serde_json::json!({"modelRunId": "run-1", "modelType": "ner"}),
        )
    }

    fn pipeline(
        reporter: Arc<CollectingStatusReporter>,
        training_fails: bool,
    ) -> Arc<dyn Pipeline> {
        let etl = Arc::new(FnStageJob::new("etl", |_| {
            Ok(JobStatus::success_with("etl_file", serde_json::json!("gs://x")))
        }));
        let training: Arc<dyn crate::jobs::StageJob> = if training_fails {
            Arc::new(FnStageJob::new("training", |_| {
                Err(StageError::execution("training", "quota exceeded"))
            }))
        } else {
            Arc::new(FnStageJob::new("training", |_| {
                Ok(JobStatus::success_with("model_id", serde_json::json!("m-1")))
            }))
        };
        Arc::new(TrainingPipeline::new(
            PipelineKind::Ner,
            etl,
            training,
            reporter,
        ))
    }

    async fn wait_until(registry: &AdmissionRegistry, count: usize) {
        for _ in 0..500 {
            if registry.count() == count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("admission registry never reached count {count}");
    }

    #[tokio::test]
    async fn test_successful_run_releases_admission() {
        let executor = BackgroundExecutor::new(AdmissionRegistry::new());
        let reporter = Arc::new(CollectingStatusReporter::new());

        executor
            .schedule(request("job-ok"), pipeline(reporter.clone(), false))
            .unwrap();

        wait_until(executor.admission(), 0).await;
        assert_eq!(
            reporter.states().last(),
            Some(&PipelineState::Complete),
            "terminal state should be COMPLETE"
        );
    }

    #[tokio::test]
    async fn test_failed_run_reports_failed_and_releases() {
        let executor = BackgroundExecutor::new(AdmissionRegistry::new());
        let reporter = Arc::new(CollectingStatusReporter::new());

        executor
            .schedule(request("job-fail"), pipeline(reporter.clone(), true))
            .unwrap();

        wait_until(executor.admission(), 0).await;

        let updates = reporter.updates();
        let last = updates.last().unwrap();
        assert_eq!(last.state, PipelineState::Failed);
        assert!(last
            .error_message
            .as_deref()
            .unwrap()
            .contains("quota exceeded"));
        assert!(!reporter.states().contains(&PipelineState::Complete));
    }

    #[tokio::test]
    async fn test_duplicate_job_rejected_synchronously() {
        let executor = BackgroundExecutor::new(AdmissionRegistry::new());
        let reporter = Arc::new(CollectingStatusReporter::new());

        // Hold the slot directly so the scheduled run cannot race the check.
        let _permit = executor.admission().try_admit("job-dup").unwrap();

        let err = executor
            .schedule(request("job-dup"), pipeline(reporter.clone(), false))
            .unwrap_err();
        assert!(matches!(err, CoordinatorError::DuplicateJob { .. }));

        // The rejected duplicate never ran, so nothing was reported.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(reporter.is_empty());
    }
}
