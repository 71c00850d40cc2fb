//! The immutable pipeline registry.

use crate::pipeline::{Pipeline, PipelineKind};
use std::collections::HashMap;
use std::sync::Arc;

/// Maps pipeline kinds to their composed implementations.
///
/// Built once at startup and never mutated afterwards, so it needs no
/// synchronization; share it behind an `Arc`.
pub struct PipelineRegistry {
    inner: HashMap<PipelineKind, Arc<dyn Pipeline>>,
}

impl PipelineRegistry {
    /// Builds a registry from pipelines, keyed by each pipeline's kind.
    ///
    /// A later pipeline with the same kind replaces an earlier one.
    #[must_use]
    pub fn new(pipelines: impl IntoIterator<Item = Arc<dyn Pipeline>>) -> Self {
        let inner = pipelines
            .into_iter()
            .map(|pipeline| (pipeline.kind(), pipeline))
            .collect();
        Self { inner }
    }

    /// Resolves a pipeline by kind.
    #[must_use]
    pub fn get(&self, kind: PipelineKind) -> Option<Arc<dyn Pipeline>> {
        self.inner.get(&kind).cloned()
    }

    /// The registered kinds, sorted for deterministic listings.
    #[must_use]
    pub fn kinds(&self) -> Vec<PipelineKind> {
        let mut kinds: Vec<_> = self.inner.keys().copied().collect();
        kinds.sort();
        kinds
    }

    /// The registered kinds' wire names, sorted.
    #[must_use]
    pub fn kind_names(&self) -> Vec<String> {
        self.kinds().iter().map(ToString::to_string).collect()
    }

    /// The number of registered pipelines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if no pipelines are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl std::fmt::Debug for PipelineRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::JobStatus;
    use crate::jobs::FnStageJob;
    use crate::pipeline::TrainingPipeline;
    use crate::reporting::NoOpStatusReporter;

    fn pipeline(kind: PipelineKind) -> Arc<dyn Pipeline> {
        let noop = || {
            Arc::new(FnStageJob::new("noop", |_| Ok(JobStatus::success())))
                as Arc<dyn crate::jobs::StageJob>
        };
        Arc::new(TrainingPipeline::new(
            kind,
            noop(),
            noop(),
            Arc::new(NoOpStatusReporter),
        ))
    }

    #[test]
    fn test_get_and_kinds() {
        let registry = PipelineRegistry::new([
            pipeline(PipelineKind::Ner),
            pipeline(PipelineKind::BoundingBox),
        ]);

        assert_eq!(registry.len(), 2);
        assert!(registry.get(PipelineKind::Ner).is_some());
        assert!(registry.get(PipelineKind::TextMultiClassification).is_none());
        assert_eq!(
            registry.kinds(),
            vec![PipelineKind::BoundingBox, PipelineKind::Ner]
        );
    }

    #[test]
    fn test_empty_registry() {
        let registry = PipelineRegistry::new([]);
        assert!(registry.is_empty());
        assert!(registry.kind_names().is_empty());
    }
}
