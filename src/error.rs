//! Error tiers: validation warnings that skip a task/job but keep the
//! simulation running, and fatal CLI-facing errors.

use thiserror::Error;

/// Non-fatal: the offending task or job is skipped and expansion continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("duplicate task id: {0}")]
    DuplicateTaskId(i64),

    #[error("task {0}: aperiodic task (period < 0) must have non-negative relative deadline")]
    NegativeAperiodicDeadline(i64),

    #[error("task {task_id}: release at {release_time} is not monotonic or not separated by period from the previous release")]
    NonMonotonicRelease { task_id: i64, release_time: f64 },

    #[error("task {task_id}: negative resource id {resource_id} in section list")]
    NegativeResourceId { task_id: i64, resource_id: i64 },
}

/// A validation error paired with the context it was raised in, for
/// human-readable reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    pub error: ValidationError,
}

impl ValidationWarning {
    pub fn new(error: ValidationError) -> Self {
        Self { error }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "warning: {}", self.error)
    }
}

/// Fatal, CLI-facing errors: only a missing file or a malformed task-set
/// document should turn into a non-zero exit code.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("could not read task-set file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse task-set file {path} as JSON")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
