//! Device backends
//!
//! - **Software**: behavioural model of the wrapper (CI, CLI, fault injection)
//! - **Recording**: wraps any backend and keeps a per-edge pin trace
//!
//! A simulator or hardware bridge plugs in by implementing
//! [`crate::PinDevice`] directly.

pub mod classifier;
pub mod recording;
pub mod software;

pub use classifier::{Classifier, TemplateClassifier};
pub use recording::{EdgeRecord, RecordingDevice};
pub use software::{FaultMode, SoftwareDevice};
