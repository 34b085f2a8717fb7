//! Error types for protocol driver operations

use crate::protocol::Phase;
use thiserror::Error;

/// Result type alias for driver operations
pub type Result<T> = std::result::Result<T, DriverError>;

/// Errors that can occur while driving the accelerator
///
/// Timeouts and wrong answers are not errors: they are outcomes of a
/// completed protocol run (see [`crate::Classification`]).
#[derive(Debug, Error)]
pub enum DriverError {
    /// The driver broke the pin protocol. Always a driver bug, never a
    /// device fault.
    #[error("Protocol violation in {phase}: {reason}")]
    ProtocolViolation {
        /// Phase the violation happened in
        phase: Phase,
        /// What was violated
        reason: String,
    },

    /// Frame handed to the driver is not 64 pixels
    #[error("Frame has {got} pixels, expected 64")]
    FrameSize {
        /// Pixels supplied
        got: usize,
    },

    /// Pixel does not fit a 2-bit lane
    #[error("Pixel {index} = {value} does not fit a 2-bit lane")]
    PixelOutOfRange {
        /// Pixel position in the frame
        index: usize,
        /// Offending value
        value: u8,
    },

    /// Device backend failed to drive, clock or sample its pins
    #[error("Device error: {reason}")]
    Device {
        /// Reason for failure
        reason: String,
    },
}

impl DriverError {
    /// Create a protocol violation error
    pub fn protocol_violation(phase: Phase, reason: impl Into<String>) -> Self {
        Self::ProtocolViolation {
            phase,
            reason: reason.into(),
        }
    }

    /// Create a device error
    pub fn device(reason: impl Into<String>) -> Self {
        Self::Device {
            reason: reason.into(),
        }
    }
}
