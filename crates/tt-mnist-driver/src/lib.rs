//! Cycle-exact protocol driver for the Tiny Tapeout MNIST accelerator.
//!
//! This crate drives the wrapper's narrow synchronous pin interface through
//! one complete classification per call: reset, pre-stage, kickoff, settle,
//! 15 streaming edges, bounded completion poll, teardown.
//!
//! # Layers
//!
//! ```text
//! ProtocolDriver   phase machine, timing, result decoding
//!   PinSession     exclusive pin handle for one run, ordering checks
//!     PinDevice    drive / tick / sample
//!       SoftwareDevice    behavioural model (CI, fault injection)
//!       RecordingDevice   per-edge pin trace around any device
//! ```
//!
//! # Quick start
//!
//! ```
//! use tt_mnist_driver::{Classification, ProtocolDriver, SoftwareDevice};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let device = SoftwareDevice::with_classifier(|frame: &[u8; 64]| frame[0]);
//! let mut driver = ProtocolDriver::new(device);
//!
//! let report = driver.run(&[0u8; 64])?;
//! assert_eq!(report.protocol_edges, 17);
//! match report.classification {
//!     Classification::Completed { prediction, cycles, .. } => {
//!         println!("predicted {prediction} after {cycles} cycles");
//!     }
//!     Classification::TimedOut { cycles } => println!("timeout at {cycles}"),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

pub mod backends;
mod device;
mod error;
mod protocol;
mod session;

/// Pin contract constants (re-exported from tt-mnist-pins).
pub mod pins {
    pub use tt_mnist_pins::frame::{Frame, BATCH_COUNT, CLASS_COUNT, PIXEL_COUNT};
    pub use tt_mnist_pins::timing::{CYCLE_BUDGET, PROTOCOL_EDGES};
    pub use tt_mnist_pins::{ControlWord, InputPins, PixelBatch, StatusWord};
}

pub use backends::{
    Classifier, EdgeRecord, FaultMode, RecordingDevice, SoftwareDevice, TemplateClassifier,
};
pub use device::{DeviceKind, PinDevice};
pub use error::{DriverError, Result};
pub use protocol::{Classification, Phase, ProtocolDriver, ProtocolTiming, RunReport};
pub use session::PinSession;

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        Classification, DriverError, PinDevice, ProtocolDriver, ProtocolTiming, Result,
        RunReport, SoftwareDevice,
    };
}
