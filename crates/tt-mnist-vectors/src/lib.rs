//! Test-vector reader for the MNIST accelerator harness
//!
//! Vectors are pre-generated text files; this crate only consumes them.
//!
//! # Format
//!
//! Each vector is three files keyed by a zero-padded index:
//!
//! - **`test_NNN_input.txt`**: 64 pixel intensities in `0..=3`, one per line
//! - **`test_NNN_output.txt`**: the expected prediction; only the first data
//!   line is read
//! - **`test_NNN_metadata.txt`**: `key: value` lines (e.g. `True label: 7`)
//!
//! Blank lines and `#` comments are ignored in all three.
//!
//! # Example
//!
//! ```no_run
//! use tt_mnist_vectors::VectorStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = VectorStore::new("test/test_vectors/vectors");
//! let vector = store.load(0)?;
//!
//! println!("Expected: {}", vector.expected_label());
//! println!("True label: {}", vector.true_label().unwrap_or("?"));
//! print!("{}", vector.grid());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

mod error;
pub mod parser;
mod store;
mod vector;

pub use error::{Result, VectorError};
pub use store::{Resource, VectorStore, FILE_PREFIX};
pub use vector::{Grid, TestVector, VectorFault, TRUE_LABEL_KEY};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{Result, TestVector, VectorError, VectorStore};
}
