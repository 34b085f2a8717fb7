//! Exclusive pin session for one vector run
//!
//! The session owns the only mutable borrow of the device for as long as a
//! vector is in flight, keeps a shadow of every input pin, and counts edges.
//! It also enforces the one ordering rule the device cannot check for
//! itself: start may only rise once a pixel batch is stable on the bus.

use crate::device::PinDevice;
use crate::error::{DriverError, Result};
use crate::protocol::Phase;
use tracing::trace;
use tt_mnist_pins::{ControlWord, InputPins, PixelBatch, StatusWord};

/// Exclusive handle on a device for the duration of one vector run
#[derive(Debug)]
pub struct PinSession<'d, D: PinDevice + ?Sized> {
    device: &'d mut D,
    pins: InputPins,
    edges: u64,
    staged: bool,
}

impl<'d, D: PinDevice + ?Sized> PinSession<'d, D> {
    /// Open a session. Pins start at their reset levels; nothing is driven
    /// until the first edge.
    pub fn open(device: &'d mut D) -> Self {
        Self {
            device,
            pins: InputPins::RESET,
            edges: 0,
            staged: false,
        }
    }

    /// Edges advanced since the session was opened
    pub const fn edges(&self) -> u64 {
        self.edges
    }

    /// Current shadow of the input pins
    pub const fn pins(&self) -> InputPins {
        self.pins
    }

    /// Reset sequence: enable high, buses zero, `rst_n` low for
    /// `hold_edges`, then high for `release_edges` before any signalling.
    ///
    /// # Errors
    ///
    /// Propagates device errors.
    pub fn reset(&mut self, hold_edges: u32, release_edges: u32) -> Result<()> {
        self.pins = InputPins::RESET;
        self.staged = false;
        self.advance(hold_edges)?;
        self.pins.reset_n = true;
        self.advance(release_edges)
    }

    /// Put a batch on the input bus. Takes effect at the next edge.
    pub fn stage(&mut self, batch: PixelBatch) {
        self.pins.input = batch;
        self.staged = true;
    }

    /// Raise start alongside the batch already on the bus.
    ///
    /// # Errors
    ///
    /// [`DriverError::ProtocolViolation`] if no batch has been staged since
    /// reset, or the device is still held in reset.
    pub fn assert_start(&mut self) -> Result<()> {
        if !self.pins.running() {
            return Err(DriverError::protocol_violation(
                Phase::Kickoff,
                "start asserted while the device is held in reset",
            ));
        }
        if !self.staged {
            return Err(DriverError::protocol_violation(
                Phase::Kickoff,
                "start asserted before the first pixel batch was stable on the bus",
            ));
        }
        self.pins.control = ControlWord::START;
        Ok(())
    }

    /// Drop start.
    pub fn release_start(&mut self) {
        self.pins.control = ControlWord::IDLE;
    }

    /// Drive the shadow pins and advance `edges` rising edges.
    ///
    /// # Errors
    ///
    /// Propagates device errors.
    pub fn advance(&mut self, edges: u32) -> Result<()> {
        for _ in 0..edges {
            self.device.drive(self.pins)?;
            self.device.tick()?;
            self.edges += 1;
            trace!(
                "edge {}: ui_in=0x{:02x} uio_in=0x{:02x} rst_n={}",
                self.edges,
                self.pins.input.raw(),
                self.pins.control.raw(),
                u8::from(self.pins.reset_n)
            );
        }
        Ok(())
    }

    /// Sample and decode the output bus.
    ///
    /// # Errors
    ///
    /// Propagates device errors.
    pub fn status(&mut self) -> Result<StatusWord> {
        self.device.status()
    }
}
