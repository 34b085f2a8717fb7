//! Device abstraction for the accelerator's pin interface
//!
//! One trait for anything that exposes the wrapper's pins and a clock: the
//! software model, a wrapped/recorded device, or an HDL simulator bridge.

use crate::error::Result;
use std::fmt::Debug;
use tt_mnist_pins::{InputPins, StatusWord};

/// Synchronous pin-level device
///
/// The contract mirrors a clocked testbench:
/// - `drive` sets input pin levels; they take effect at the next edge
/// - `tick` is one rising edge of the shared clock
/// - `sample` reads the output bus as it stands after the last edge
///
/// A device is a single stateful resource. The driver holds it exclusively
/// for a whole vector run through [`crate::PinSession`].
pub trait PinDevice: Debug + Send {
    /// Present input pin levels for the next rising edge.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot set its pins.
    fn drive(&mut self, pins: InputPins) -> Result<()>;

    /// Advance one rising edge.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot advance its clock.
    fn tick(&mut self) -> Result<()>;

    /// Read the output bus.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot sample its pins.
    fn sample(&mut self) -> Result<u8>;

    /// Device type for logging
    fn kind(&self) -> DeviceKind;

    /// Read and decode the output bus.
    ///
    /// # Errors
    ///
    /// Propagates [`PinDevice::sample`] errors.
    fn status(&mut self) -> Result<StatusWord> {
        self.sample().map(StatusWord::from_raw)
    }
}

impl<D: PinDevice + ?Sized> PinDevice for Box<D> {
    fn drive(&mut self, pins: InputPins) -> Result<()> {
        (**self).drive(pins)
    }

    fn tick(&mut self) -> Result<()> {
        (**self).tick()
    }

    fn sample(&mut self) -> Result<u8> {
        (**self).sample()
    }

    fn kind(&self) -> DeviceKind {
        (**self).kind()
    }

    fn status(&mut self) -> Result<StatusWord> {
        (**self).status()
    }
}

/// Device type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// Behavioural model of the wrapper, no simulator required
    Software,

    /// Any device wrapped in a pin recorder
    Recorded(&'static str),

    /// External simulator or hardware bridge
    External,
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Software => write!(f, "Software"),
            Self::Recorded(inner) => write!(f, "Recorded({inner})"),
            Self::External => write!(f, "External"),
        }
    }
}

impl DeviceKind {
    /// Short static name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Software => "Software",
            Self::Recorded(_) => "Recorded",
            Self::External => "External",
        }
    }
}
