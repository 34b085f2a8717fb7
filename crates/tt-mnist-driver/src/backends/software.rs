// SPDX-License-Identifier: AGPL-3.0-only

//! Software (behavioural) model of the MNIST wrapper
//!
//! Implements [`PinDevice`] with the wrapper's pin-level state machine so the
//! protocol driver and both verifiers can run without an HDL simulator:
//!
//! 1. **CI without a simulator**: every protocol test runs against this model.
//!
//! 2. **Timing reference**: the model reproduces the taped-out wrapper's
//!    latch behaviour, so a driver that skips the settle edge or streams a
//!    batch early produces a visibly different frame.
//!
//! 3. **Fault injection**: [`FaultMode`] forces timeouts and wrong answers
//!    for exercising the verifiers' failure paths.
//!
//! ## State machine
//!
//! ```text
//!            start                 16 batches               latency
//!   IDLE ───────────► LOAD ───────────────────► COMPUTE ───────────► DONE
//!    ▲   (latch_delay                                                  │
//!    │    edges before                                    start low    │
//!    └──────── first read) ◄───────────────────────────────────────────┘
//! ```
//!
//! `rst_n` low on an edge returns to IDLE and clears the output bus. `ena`
//! low freezes everything. `busy` is high in LOAD and COMPUTE; `done` is high
//! in DONE only. The prediction bits keep their last value until reset.

use crate::backends::classifier::{Classifier, TemplateClassifier};
use crate::device::{DeviceKind, PinDevice};
use crate::error::Result;
use std::fmt;
use tracing::{debug, trace};
use tt_mnist_pins::frame::{Frame, BATCH_COUNT, PIXELS_PER_BATCH, PIXEL_COUNT};
use tt_mnist_pins::timing::{PROTOCOL_EDGES, TYPICAL_CYCLES};
use tt_mnist_pins::{InputPins, PixelBatch, StatusWord};

/// Edges between the last batch and `done`, chosen so a full run takes the
/// wrapper's typical 3,940 cycles from kickoff.
pub const DEFAULT_COMPUTE_LATENCY: u32 = (TYPICAL_CYCLES - PROTOCOL_EDGES as u64) as u32;

/// Edges between the start edge and the first input read.
pub const DEFAULT_LATCH_DELAY: u32 = 1;

/// Injected device misbehaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultMode {
    /// Behave like the real wrapper
    #[default]
    Healthy,
    /// Stay in COMPUTE forever; `done` never rises
    NeverDone,
    /// Report this prediction regardless of the frame
    ForcePrediction(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Load { wait: u32, read: usize },
    Compute { remaining: u32 },
    Done,
}

/// Software model of the wrapper's pins and timing
pub struct SoftwareDevice {
    classifier: Box<dyn Classifier>,
    latch_delay: u32,
    compute_latency: u32,
    fault: FaultMode,

    pins: InputPins,
    state: State,
    frame: Frame,
    prediction: u8,
    output: StatusWord,

    edges: u64,
    classifications: u64,
}

impl fmt::Debug for SoftwareDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftwareDevice")
            .field("latch_delay", &self.latch_delay)
            .field("compute_latency", &self.compute_latency)
            .field("fault", &self.fault)
            .field("state", &self.state)
            .field("output", &self.output)
            .field("edges", &self.edges)
            .finish_non_exhaustive()
    }
}

impl Default for SoftwareDevice {
    fn default() -> Self {
        Self::with_classifier(TemplateClassifier::glyphs())
    }
}

impl SoftwareDevice {
    /// Create a device around any classifier, with the wrapper's timing.
    pub fn with_classifier(classifier: impl Classifier + 'static) -> Self {
        Self {
            classifier: Box::new(classifier),
            latch_delay: DEFAULT_LATCH_DELAY,
            compute_latency: DEFAULT_COMPUTE_LATENCY,
            fault: FaultMode::Healthy,
            pins: InputPins::RESET,
            state: State::Idle,
            frame: [0; PIXEL_COUNT],
            prediction: 0,
            output: StatusWord::default(),
            edges: 0,
            classifications: 0,
        }
    }

    /// Set the COMPUTE duration in edges (0 raises `done` on the last
    /// streaming edge).
    #[must_use]
    pub fn with_compute_latency(mut self, edges: u32) -> Self {
        self.compute_latency = edges;
        self
    }

    /// Set the number of edges between the start edge and the first read.
    #[must_use]
    pub fn with_latch_delay(mut self, edges: u32) -> Self {
        self.latch_delay = edges;
        self
    }

    /// Inject a fault.
    #[must_use]
    pub fn with_fault(mut self, fault: FaultMode) -> Self {
        self.fault = fault;
        self
    }

    /// Change the injected fault between runs.
    pub fn set_fault(&mut self, fault: FaultMode) {
        self.fault = fault;
    }

    /// Active fault
    pub const fn fault(&self) -> FaultMode {
        self.fault
    }

    /// Frame latched by the last (or current) load
    pub const fn latched_frame(&self) -> &Frame {
        &self.frame
    }

    /// Edges seen since construction
    pub const fn edges(&self) -> u64 {
        self.edges
    }

    /// Completed classifications since construction
    pub const fn classifications(&self) -> u64 {
        self.classifications
    }

    fn begin_load(&mut self, input: PixelBatch) -> State {
        trace!("SoftwareDevice: start sampled at edge {}", self.edges);
        if self.latch_delay == 0 {
            self.latch(0, input)
        } else {
            State::Load {
                wait: self.latch_delay - 1,
                read: 0,
            }
        }
    }

    fn latch(&mut self, read: usize, input: PixelBatch) -> State {
        let base = read * PIXELS_PER_BATCH;
        self.frame[base..base + PIXELS_PER_BATCH].copy_from_slice(&input.unpack());
        if read + 1 < BATCH_COUNT {
            return State::Load {
                wait: 0,
                read: read + 1,
            };
        }
        trace!("SoftwareDevice: frame complete at edge {}", self.edges);
        match (self.fault, self.compute_latency) {
            (FaultMode::NeverDone, _) => State::Compute { remaining: u32::MAX },
            (_, 0) => self.finish(),
            (_, latency) => State::Compute { remaining: latency },
        }
    }

    fn finish(&mut self) -> State {
        self.prediction = match self.fault {
            FaultMode::ForcePrediction(p) => p,
            _ => self.classifier.classify(&self.frame),
        };
        self.classifications += 1;
        debug!(
            "SoftwareDevice: prediction {} at edge {}",
            self.prediction, self.edges
        );
        State::Done
    }

    fn step(&mut self, pins: InputPins) -> State {
        let start = pins.control.start();
        match self.state {
            State::Idle if start => self.begin_load(pins.input),
            State::Idle => State::Idle,
            State::Load { wait, read } if wait > 0 => State::Load {
                wait: wait - 1,
                read,
            },
            State::Load { read, .. } => self.latch(read, pins.input),
            State::Compute { .. } if self.fault == FaultMode::NeverDone => self.state,
            State::Compute { remaining } if remaining > 1 => State::Compute {
                remaining: remaining - 1,
            },
            State::Compute { .. } => self.finish(),
            State::Done if start => State::Done,
            State::Done => State::Idle,
        }
    }
}

impl PinDevice for SoftwareDevice {
    fn drive(&mut self, pins: InputPins) -> Result<()> {
        self.pins = pins;
        Ok(())
    }

    fn tick(&mut self) -> Result<()> {
        self.edges += 1;
        let pins = self.pins;

        if !pins.enable {
            return Ok(());
        }
        if !pins.reset_n {
            self.state = State::Idle;
            self.frame = [0; PIXEL_COUNT];
            self.prediction = 0;
            self.output = StatusWord::default();
            return Ok(());
        }

        self.state = self.step(pins);
        let busy = matches!(self.state, State::Load { .. } | State::Compute { .. });
        let done = self.state == State::Done;
        self.output = StatusWord::compose(self.prediction, done, busy);
        Ok(())
    }

    fn sample(&mut self) -> Result<u8> {
        Ok(self.output.raw())
    }

    fn kind(&self) -> DeviceKind {
        DeviceKind::Software
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tt_mnist_pins::ControlWord;

    fn running(input: u8, start: bool) -> InputPins {
        InputPins {
            enable: true,
            reset_n: true,
            input: PixelBatch::from_raw(input),
            control: ControlWord::with_start(start),
        }
    }

    fn clock(dev: &mut SoftwareDevice, pins: InputPins) -> StatusWord {
        dev.drive(pins).unwrap();
        dev.tick().unwrap();
        dev.status().unwrap()
    }

    fn reset(dev: &mut SoftwareDevice) {
        for _ in 0..2 {
            clock(dev, InputPins::RESET);
        }
        clock(dev, running(0, false));
    }

    #[test]
    fn idle_after_reset() {
        let mut dev = SoftwareDevice::default();
        reset(&mut dev);
        assert_eq!(dev.sample().unwrap(), 0);
    }

    #[test]
    fn first_batch_is_read_on_the_edge_after_start() {
        let mut dev = SoftwareDevice::with_classifier(|f: &Frame| f[0]).with_compute_latency(1);
        reset(&mut dev);

        // Kickoff: start sampled, bus not yet read
        let s = clock(&mut dev, running(0b11, true));
        assert!(s.busy() && !s.done());
        assert_eq!(dev.latched_frame()[0], 0);

        // Settle: batch 0 read
        clock(&mut dev, running(0b11, true));
        assert_eq!(dev.latched_frame()[0], 3);
    }

    #[test]
    fn zero_latch_delay_reads_on_start_edge() {
        let mut dev = SoftwareDevice::with_classifier(|f: &Frame| f[0]).with_latch_delay(0);
        reset(&mut dev);
        clock(&mut dev, running(0b10, true));
        assert_eq!(dev.latched_frame()[0], 2);
    }

    #[test]
    fn done_holds_until_start_released() {
        let mut dev = SoftwareDevice::with_classifier(|_: &Frame| 6).with_compute_latency(2);
        reset(&mut dev);
        // start + settle + 15 batches = batch 15 latched on the 17th edge
        for _ in 0..17 {
            clock(&mut dev, running(0, true));
        }
        assert!(!clock(&mut dev, running(0, true)).done());
        let s = clock(&mut dev, running(0, true));
        assert!(s.done() && !s.busy());
        assert_eq!(s.prediction(), 6);

        assert!(clock(&mut dev, running(0, true)).done());
        let s = clock(&mut dev, running(0, false));
        assert!(!s.done());
        assert_eq!(s.prediction(), 6);
        assert_eq!(dev.classifications(), 1);
    }

    #[test]
    fn reset_clears_output() {
        let mut dev = SoftwareDevice::with_classifier(|_: &Frame| 9).with_compute_latency(0);
        reset(&mut dev);
        for _ in 0..17 {
            clock(&mut dev, running(0, true));
        }
        assert_eq!(dev.sample().unwrap(), 0x19);
        let s = clock(&mut dev, InputPins::RESET);
        assert_eq!(s.raw(), 0);
    }

    #[test]
    fn disabled_device_ignores_edges() {
        let mut dev = SoftwareDevice::default();
        reset(&mut dev);
        let mut pins = running(0, true);
        pins.enable = false;
        let s = clock(&mut dev, pins);
        assert!(!s.busy());
    }

    #[test]
    fn never_done_keeps_busy() {
        let mut dev = SoftwareDevice::default()
            .with_compute_latency(1)
            .with_fault(FaultMode::NeverDone);
        reset(&mut dev);
        for _ in 0..100 {
            let s = clock(&mut dev, running(0, true));
            assert!(!s.done());
        }
        assert!(dev.status().unwrap().busy());
    }

    #[test]
    fn forced_prediction_overrides_classifier() {
        let mut dev = SoftwareDevice::with_classifier(|_: &Frame| 1)
            .with_compute_latency(0)
            .with_fault(FaultMode::ForcePrediction(8));
        reset(&mut dev);
        let mut last = StatusWord::default();
        for _ in 0..17 {
            last = clock(&mut dev, running(0, true));
        }
        assert!(last.done());
        assert_eq!(last.prediction(), 8);
    }

    #[test]
    fn default_latency_matches_typical_run() {
        assert_eq!(
            u64::from(DEFAULT_COMPUTE_LATENCY) + u64::from(PROTOCOL_EDGES),
            TYPICAL_CYCLES
        );
    }
}
