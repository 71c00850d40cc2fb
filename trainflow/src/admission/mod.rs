//! Job admission control.
//!
//! The admission registry is the one piece of shared mutable state in the
//! coordinator: the set of job names with a run currently in flight. Both
//! admit (check-and-insert) and release are single atomic operations on the
//! underlying concurrent set.

use dashmap::DashSet;
use std::sync::Arc;

/// The concurrency-safe set of currently-executing job names.
///
/// Cloning is cheap and shares the same underlying set.
#[derive(Debug, Clone, Default)]
pub struct AdmissionRegistry {
    running: Arc<DashSet<String>>,
}

impl AdmissionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically admits a job name if no run holds it.
    ///
    /// Returns a permit whose drop releases the slot, or `None` if the name
    /// is already admitted. Between a successful admit and the permit drop,
    /// no other admit for the same name succeeds.
    #[must_use]
    pub fn try_admit(&self, job_name: &str) -> Option<AdmissionPermit> {
        if self.running.insert(job_name.to_string()) {
            Some(AdmissionPermit {
                running: Arc::clone(&self.running),
                job_name: job_name.to_string(),
            })
        } else {
            None
        }
    }

    /// Returns true if a run currently holds this job name.
    #[must_use]
    pub fn is_admitted(&self, job_name: &str) -> bool {
        self.running.contains(job_name)
    }

    /// The number of currently-executing jobs.
    #[must_use]
    pub fn count(&self) -> usize {
        self.running.len()
    }
}

/// A held admission slot.
///
/// Dropping the permit releases the slot, so release happens on every exit
/// path of the task that owns it.
#[derive(Debug)]
pub struct AdmissionPermit {
    running: Arc<DashSet<String>>,
    job_name: String,
}

impl AdmissionPermit {
    /// The job name this permit holds.
    #[must_use]
    pub fn job_name(&self) -> &str {
        &self.job_name
    }
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        self.running.remove(&self.job_name);
    }
}
