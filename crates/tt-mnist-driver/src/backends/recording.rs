// SPDX-License-Identifier: AGPL-3.0-only

//! Pin recorder
//!
//! Wraps any [`PinDevice`] and records the pins presented at every rising
//! edge together with the output bus after it. Used to assert pin-level
//! ordering in tests and to print edge traces from the CLI.

use crate::device::{DeviceKind, PinDevice};
use crate::error::Result;
use std::fmt;
use tt_mnist_pins::{InputPins, StatusWord};

/// One rising edge as seen on the pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRecord {
    /// Edge number, 1-based, since the recorder was created or cleared
    pub edge: u64,
    /// Input pins presented for this edge
    pub pins: InputPins,
    /// Output bus after this edge
    pub output: StatusWord,
}

impl fmt::Display for EdgeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:5}  ena={} rst_n={} ui_in=0x{:02x} uio_in=0x{:02x}  uo_out={}",
            self.edge,
            u8::from(self.pins.enable),
            u8::from(self.pins.reset_n),
            self.pins.input.raw(),
            self.pins.control.raw(),
            self.output
        )
    }
}

/// Device wrapper that records every edge
#[derive(Debug)]
pub struct RecordingDevice<D: PinDevice> {
    inner: D,
    pending: InputPins,
    edges: Vec<EdgeRecord>,
}

impl<D: PinDevice> RecordingDevice<D> {
    /// Wrap a device.
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            pending: InputPins::RESET,
            edges: Vec::new(),
        }
    }

    /// Recorded edges, oldest first
    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    /// Forget recorded edges (numbering restarts at 1).
    pub fn clear(&mut self) {
        self.edges.clear();
    }

    /// Wrapped device
    pub const fn inner(&self) -> &D {
        &self.inner
    }

    /// Wrapped device, mutably
    pub fn inner_mut(&mut self) -> &mut D {
        &mut self.inner
    }

    /// Unwrap the device, dropping the record.
    pub fn into_inner(self) -> D {
        self.inner
    }
}

impl<D: PinDevice> PinDevice for RecordingDevice<D> {
    fn drive(&mut self, pins: InputPins) -> Result<()> {
        self.pending = pins;
        self.inner.drive(pins)
    }

    fn tick(&mut self) -> Result<()> {
        self.inner.tick()?;
        let output = self.inner.status()?;
        self.edges.push(EdgeRecord {
            edge: self.edges.len() as u64 + 1,
            pins: self.pending,
            output,
        });
        Ok(())
    }

    fn sample(&mut self) -> Result<u8> {
        self.inner.sample()
    }

    fn kind(&self) -> DeviceKind {
        DeviceKind::Recorded(self.inner.kind().name())
    }
}
