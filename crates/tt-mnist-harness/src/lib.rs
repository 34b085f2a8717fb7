//! Conformance harness for the Tiny Tapeout MNIST accelerator.
//!
//! Joins the vector store and the protocol driver:
//!
//! - [`CaseVerifier::run`] verifies one vector and returns a [`CaseResult`]
//! - [`BatchVerifier::run_range`] verifies a range in order and returns a
//!   [`BatchSummary`], or [`HarnessError::BatchFailure`] if any case failed
//!
//! ```no_run
//! use tt_mnist_driver::SoftwareDevice;
//! use tt_mnist_harness::{BatchVerifier, HarnessConfig};
//!
//! # fn main() -> Result<(), tt_mnist_harness::HarnessError> {
//! let config = HarnessConfig::from_env();
//! let mut batch = BatchVerifier::from_config(&config, SoftwareDevice::default());
//! let summary = batch.run_range(0, 10)?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

mod batch;
mod case;
mod config;
mod error;
mod summary;

pub use batch::BatchVerifier;
pub use case::{CaseResult, CaseVerifier, FailureKind, Observed};
pub use config::{HarnessConfig, DEFAULT_VECTOR_DIR, VECTORS_ENV};
pub use error::{HarnessError, Result};
pub use summary::{BatchSummary, CycleStats};
