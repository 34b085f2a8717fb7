// SPDX-License-Identifier: AGPL-3.0-only

//! Single-case verifier
//!
//! Load one vector, run it through the protocol driver, compare against the
//! expected label. A timeout never passes, whatever the prediction bits say.

use crate::error::Result;
use std::fmt;
use tracing::{info, warn};
use tt_mnist_driver::pins::StatusWord;
use tt_mnist_driver::{Classification, PinDevice, ProtocolDriver};
use tt_mnist_vectors::{TestVector, VectorStore};

/// What the device answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observed {
    /// Prediction bits at the first `done` cycle
    Prediction(u8),
    /// No `done` within the cycle budget
    Timeout,
}

impl Observed {
    /// Prediction, if any
    pub const fn prediction(self) -> Option<u8> {
        match self {
            Self::Prediction(p) => Some(p),
            Self::Timeout => None,
        }
    }
}

impl fmt::Display for Observed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prediction(p) => write!(f, "{p}"),
            Self::Timeout => write!(f, "TIMEOUT"),
        }
    }
}

/// Why a case failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Budget exhausted before `done`
    Timeout,
    /// Prediction differs from the expected label
    Mismatch,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Mismatch => write!(f, "mismatch"),
        }
    }
}

/// Outcome of one vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResult {
    /// Vector index
    pub index: usize,
    /// Expected label from the output resource
    pub expected: u8,
    /// Device answer
    pub observed: Observed,
    /// Cycles from kickoff to `done` (or to the timeout)
    pub cycles_used: u64,
    /// `observed == expected`, never true for a timeout
    pub passed: bool,
    /// Dataset ground truth from metadata, if present
    pub true_label: Option<String>,
    /// Output bus at the first `done` cycle; `None` after a timeout
    pub status: Option<StatusWord>,
}

impl CaseResult {
    /// Build the result record for a vector and its classification.
    pub fn from_classification(vector: &TestVector, classification: Classification) -> Self {
        let expected = vector.expected_label();
        let (observed, status) = match classification {
            Classification::Completed {
                prediction, status, ..
            } => (Observed::Prediction(prediction), Some(status)),
            Classification::TimedOut { .. } => (Observed::Timeout, None),
        };
        Self {
            index: vector.index(),
            expected,
            observed,
            cycles_used: classification.cycles(),
            passed: observed == Observed::Prediction(expected),
            true_label: vector.true_label().map(str::to_owned),
            status,
        }
    }

    /// Failure class, `None` for a pass
    pub const fn failure(&self) -> Option<FailureKind> {
        match (self.passed, self.observed) {
            (true, _) => None,
            (false, Observed::Timeout) => Some(FailureKind::Timeout),
            (false, Observed::Prediction(_)) => Some(FailureKind::Mismatch),
        }
    }

    /// True for a timeout
    pub const fn is_timeout(&self) -> bool {
        matches!(self.observed, Observed::Timeout)
    }
}

impl fmt::Display for CaseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.passed { '✓' } else { '✗' };
        write!(
            f,
            "{mark} Test {:2}: Label={}, Expected={}, Got={}, Cycles={}",
            self.index,
            self.true_label.as_deref().unwrap_or("?"),
            self.expected,
            self.observed,
            self.cycles_used
        )
    }
}

/// Runs single vectors from a store through one driver
#[derive(Debug)]
pub struct CaseVerifier<D: PinDevice> {
    store: VectorStore,
    driver: ProtocolDriver<D>,
}

impl<D: PinDevice> CaseVerifier<D> {
    /// Pair a store with a driver.
    pub const fn new(store: VectorStore, driver: ProtocolDriver<D>) -> Self {
        Self { store, driver }
    }

    /// Vector store
    pub const fn store(&self) -> &VectorStore {
        &self.store
    }

    /// Protocol driver
    pub const fn driver(&self) -> &ProtocolDriver<D> {
        &self.driver
    }

    /// Protocol driver, mutably
    pub fn driver_mut(&mut self) -> &mut ProtocolDriver<D> {
        &mut self.driver
    }

    /// Release the driver
    pub fn into_driver(self) -> ProtocolDriver<D> {
        self.driver
    }

    /// Verify vector `index`.
    ///
    /// # Errors
    ///
    /// Vector load errors and driver errors. Timeouts and mismatches are
    /// reported in the returned [`CaseResult`].
    pub fn run(&mut self, index: usize) -> Result<CaseResult> {
        let vector = self.store.load(index)?;
        self.verify(&vector)
    }

    /// Verify an already loaded vector.
    ///
    /// # Errors
    ///
    /// Driver errors only.
    pub fn verify(&mut self, vector: &TestVector) -> Result<CaseResult> {
        let index = vector.index();
        let classification = self.driver.classify(vector.pixels())?;
        let result = CaseResult::from_classification(vector, classification);

        match result.failure() {
            None => info!("{result}"),
            Some(FailureKind::Timeout) => {
                warn!("Test {index}: TIMEOUT after {} cycles", result.cycles_used);
            }
            Some(FailureKind::Mismatch) => warn!("{result}"),
        }
        Ok(result)
    }
}
