// SPDX-License-Identifier: AGPL-3.0-only

//! Batch verifier
//!
//! Runs a range of vectors strictly in order through one driver. Each
//! vector's full phase sequence finishes before the next reset, so the
//! device is never shared. Load and driver errors abort the batch at once;
//! timeouts and mismatches are folded into the summary and the batch runs on.

use crate::case::CaseVerifier;
use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::summary::BatchSummary;
use tracing::{error, info};
use tt_mnist_driver::{PinDevice, ProtocolDriver};
use tt_mnist_vectors::VectorStore;

/// Sequential multi-vector verifier
#[derive(Debug)]
pub struct BatchVerifier<D: PinDevice> {
    case: CaseVerifier<D>,
}

impl<D: PinDevice> BatchVerifier<D> {
    /// Wrap a single-case verifier.
    pub const fn new(case: CaseVerifier<D>) -> Self {
        Self { case }
    }

    /// Build the store and driver from a configuration.
    pub fn from_config(config: &HarnessConfig, device: D) -> Self {
        let store = VectorStore::new(&config.vector_dir);
        let driver = ProtocolDriver::with_timing(device, config.timing);
        Self::new(CaseVerifier::new(store, driver))
    }

    /// Underlying single-case verifier
    pub const fn case(&self) -> &CaseVerifier<D> {
        &self.case
    }

    /// Underlying single-case verifier, mutably
    pub fn case_mut(&mut self) -> &mut CaseVerifier<D> {
        &mut self.case
    }

    /// Release the single-case verifier
    pub fn into_case(self) -> CaseVerifier<D> {
        self.case
    }

    /// Verify `count` vectors starting at `start`.
    ///
    /// # Errors
    ///
    /// - [`HarnessError::Vector`] / [`HarnessError::Driver`] abort the run;
    ///   no partial summary is returned
    /// - [`HarnessError::BatchFailure`] if any case failed, carrying the
    ///   full summary
    pub fn run_range(&mut self, start: usize, count: usize) -> Result<BatchSummary> {
        self.run_indices(start..start.saturating_add(count))
    }

    /// Verify an explicit index sequence, in the order given.
    ///
    /// # Errors
    ///
    /// See [`BatchVerifier::run_range`].
    pub fn run_indices<I>(&mut self, indices: I) -> Result<BatchSummary>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut summary = BatchSummary::default();
        for index in indices {
            let result = self.case.run(index).map_err(|e| {
                error!("Batch aborted at vector {index}: {e}");
                e
            })?;
            summary.record(result);
        }

        info!(
            "Batch complete: {}/{} passed ({:.1}%)",
            summary.passed,
            summary.total,
            summary.pass_rate()
        );

        if summary.all_passed() {
            Ok(summary)
        } else {
            error!("FAILURES: {} tests failed", summary.failed);
            Err(HarnessError::BatchFailure {
                failed: summary.failed,
                total: summary.total,
                summary: Box::new(summary),
            })
        }
    }

    /// Verify every vector the store lists, ascending.
    ///
    /// # Errors
    ///
    /// Directory scan errors, then as [`BatchVerifier::run_range`].
    pub fn run_all(&mut self) -> Result<BatchSummary> {
        let indices = self.case.store().indices()?;
        self.run_indices(indices)
    }
}
