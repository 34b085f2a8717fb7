//! Error types for verification runs

use crate::summary::BatchSummary;
use thiserror::Error;
use tt_mnist_driver::DriverError;
use tt_mnist_vectors::VectorError;

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Harness errors
///
/// Timeouts and mismatches are not errors for a single case; they are
/// recorded in [`crate::CaseResult`]. Only a whole batch with failures
/// surfaces as [`HarnessError::BatchFailure`].
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Vector could not be loaded; aborts the batch
    #[error(transparent)]
    Vector(#[from] VectorError),

    /// Driver or device failure; aborts the batch
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// Batch completed with failing cases
    #[error("{failed}/{total} tests failed")]
    BatchFailure {
        /// Failing cases
        failed: usize,
        /// Cases run
        total: usize,
        /// Full summary, failure list included
        summary: Box<BatchSummary>,
    },
}

impl HarnessError {
    /// Summary carried by a batch failure
    pub fn summary(&self) -> Option<&BatchSummary> {
        match self {
            Self::BatchFailure { summary, .. } => Some(summary.as_ref()),
            _ => None,
        }
    }

    /// True if the batch ran to the end and only the verdict failed
    pub const fn is_batch_failure(&self) -> bool {
        matches!(self, Self::BatchFailure { .. })
    }
}
