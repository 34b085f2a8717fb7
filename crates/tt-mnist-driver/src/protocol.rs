//! Streaming protocol driver
//!
//! One classification is an explicit phase sequence, each phase a fixed
//! number of rising edges:
//!
//! ```text
//! Reset ─► PreStage ─► Kickoff ─► Settle ─► Stream[1..=15] ─► Poll ─► Teardown
//!  2+1       0           1          1        1 each          ≤ budget    1
//! ```
//!
//! - **PreStage** puts batch 0 on `ui_in` without an edge; start must not
//!   rise before the bus is stable because the device samples both together.
//! - **Kickoff** raises start: the device enters its load state on this edge
//!   but has not read batch 0 yet.
//! - **Settle** holds the bus unchanged so the device can read batch 0. The
//!   protocol has no ready/valid handshake; skipping this edge shifts every
//!   later batch by one.
//! - **Stream** presents batches 1..=15, one per edge, no stalls.
//! - **Poll** samples `uo_out` every edge until `done`, bounded by the cycle
//!   budget counted from the kickoff edge.
//! - **Teardown** drops start and clocks once more so the next reset never
//!   sees a stale start level.
//!
//! Edge counts live in [`ProtocolTiming`] so a device with different latch
//! timing only needs a different timing, not a different driver.

use crate::device::PinDevice;
use crate::error::{DriverError, Result};
use crate::session::PinSession;
use std::fmt;
use tracing::{debug, info, warn};
use tt_mnist_pins::batch::pack_frame;
use tt_mnist_pins::frame::{Frame, BATCH_COUNT};
use tt_mnist_pins::timing;
use tt_mnist_pins::StatusWord;

/// Protocol phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Hold `rst_n` low, then release
    Reset,
    /// First batch on the bus, start still low
    PreStage,
    /// Start raised with batch 0
    Kickoff,
    /// Dead edge(s) while the device latches batch 0
    Settle,
    /// Presenting batch `n` (1..=15)
    Stream(usize),
    /// Waiting for `done`
    Poll,
    /// Start released
    Teardown,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reset => write!(f, "reset"),
            Self::PreStage => write!(f, "pre-stage"),
            Self::Kickoff => write!(f, "kickoff"),
            Self::Settle => write!(f, "settle"),
            Self::Stream(n) => write!(f, "stream[{n}]"),
            Self::Poll => write!(f, "poll"),
            Self::Teardown => write!(f, "teardown"),
        }
    }
}

/// Edge counts per phase and the completion budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolTiming {
    /// Edges with `rst_n` low
    pub reset_edges: u32,
    /// Edges after releasing reset before pre-stage
    pub post_reset_edges: u32,
    /// Edges with start high and batch 0 on the bus
    pub kickoff_edges: u32,
    /// Dead edges holding batch 0
    pub settle_edges: u32,
    /// Edges after releasing start
    pub teardown_edges: u32,
    /// Cycles from kickoff after which polling gives up
    pub cycle_budget: u64,
}

impl Default for ProtocolTiming {
    fn default() -> Self {
        Self {
            reset_edges: timing::RESET_EDGES,
            post_reset_edges: timing::POST_RESET_EDGES,
            kickoff_edges: timing::KICKOFF_EDGES,
            settle_edges: timing::SETTLE_EDGES,
            teardown_edges: timing::TEARDOWN_EDGES,
            cycle_budget: timing::CYCLE_BUDGET,
        }
    }
}

impl ProtocolTiming {
    /// Set the completion budget.
    #[must_use]
    pub const fn with_cycle_budget(mut self, cycles: u64) -> Self {
        self.cycle_budget = cycles;
        self
    }

    /// Set the number of dead edges after kickoff.
    #[must_use]
    pub const fn with_settle_edges(mut self, edges: u32) -> Self {
        self.settle_edges = edges;
        self
    }

    /// Set the number of kickoff edges.
    #[must_use]
    pub const fn with_kickoff_edges(mut self, edges: u32) -> Self {
        self.kickoff_edges = edges;
        self
    }

    /// Edges from kickoff to the start of polling.
    pub const fn protocol_edges(&self) -> u64 {
        self.kickoff_edges as u64 + self.settle_edges as u64 + (BATCH_COUNT as u64 - 1)
    }
}

/// Outcome of one protocol run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// `done` observed within budget
    Completed {
        /// Prediction bits at the first `done` cycle
        prediction: u8,
        /// Cycles from kickoff to the first `done` cycle
        cycles: u64,
        /// Full status word at that cycle
        status: StatusWord,
    },
    /// Budget reached without `done`
    TimedOut {
        /// Cycles from kickoff when polling gave up
        cycles: u64,
    },
}

impl Classification {
    /// Cycles from kickoff to completion or timeout
    pub const fn cycles(&self) -> u64 {
        match self {
            Self::Completed { cycles, .. } | Self::TimedOut { cycles } => *cycles,
        }
    }

    /// Prediction, if the run completed
    pub const fn prediction(&self) -> Option<u8> {
        match self {
            Self::Completed { prediction, .. } => Some(*prediction),
            Self::TimedOut { .. } => None,
        }
    }

    /// True for a timeout
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}

/// Classification plus the edge accounting of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Outcome
    pub classification: Classification,
    /// Edges from kickoff to the end of streaming
    pub protocol_edges: u64,
    /// Edges spent polling
    pub poll_edges: u64,
    /// Every edge of the run, reset and teardown included
    pub total_edges: u64,
}

/// Drives one device through the streaming protocol, one vector at a time
#[derive(Debug)]
pub struct ProtocolDriver<D: PinDevice> {
    device: D,
    timing: ProtocolTiming,
    runs: u64,
}

impl<D: PinDevice> ProtocolDriver<D> {
    /// Create a driver with the default timing.
    pub fn new(device: D) -> Self {
        Self::with_timing(device, ProtocolTiming::default())
    }

    /// Create a driver with explicit timing.
    pub fn with_timing(device: D, timing: ProtocolTiming) -> Self {
        info!("Protocol driver on {} device", device.kind());
        debug!("Timing: {timing:?}");
        Self {
            device,
            timing,
            runs: 0,
        }
    }

    /// Active timing
    pub const fn timing(&self) -> &ProtocolTiming {
        &self.timing
    }

    /// Vector runs completed so far
    pub const fn runs(&self) -> u64 {
        self.runs
    }

    /// Device under test
    pub const fn device(&self) -> &D {
        &self.device
    }

    /// Device under test, mutably (e.g. to inject faults between runs)
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Release the device
    pub fn into_device(self) -> D {
        self.device
    }

    /// Classify a frame and return only the outcome.
    ///
    /// # Errors
    ///
    /// See [`ProtocolDriver::run`].
    pub fn classify(&mut self, pixels: &[u8]) -> Result<Classification> {
        self.run(pixels).map(|report| report.classification)
    }

    /// Run the full phase sequence for one frame.
    ///
    /// A timeout is an `Ok` outcome; only driver bugs, bad frames and device
    /// backend failures are errors.
    ///
    /// # Errors
    ///
    /// - [`DriverError::FrameSize`] / [`DriverError::PixelOutOfRange`] for a
    ///   frame that cannot be streamed
    /// - [`DriverError::ProtocolViolation`] if the sequence is broken
    /// - [`DriverError::Device`] from the backend
    pub fn run(&mut self, pixels: &[u8]) -> Result<RunReport> {
        let frame: &Frame = pixels
            .try_into()
            .map_err(|_| DriverError::FrameSize { got: pixels.len() })?;
        let batches = pack_frame(frame)
            .map_err(|(index, value)| DriverError::PixelOutOfRange { index, value })?;

        let timing = self.timing;
        let mut session = PinSession::open(&mut self.device);
        let mut phase = Phase::Reset;
        let mut kickoff_edge = 0;
        let mut protocol_edges = 0;
        let mut outcome = None;

        loop {
            debug!("Phase {phase} at edge {}", session.edges());
            phase = match phase {
                Phase::Reset => {
                    session.reset(timing.reset_edges, timing.post_reset_edges)?;
                    Phase::PreStage
                }
                Phase::PreStage => {
                    session.stage(batches[0]);
                    kickoff_edge = session.edges();
                    Phase::Kickoff
                }
                Phase::Kickoff => {
                    session.assert_start()?;
                    session.advance(timing.kickoff_edges)?;
                    Phase::Settle
                }
                Phase::Settle => {
                    session.advance(timing.settle_edges)?;
                    Phase::Stream(1)
                }
                Phase::Stream(n) if n < BATCH_COUNT => {
                    session.stage(batches[n]);
                    session.advance(1)?;
                    Phase::Stream(n + 1)
                }
                Phase::Stream(_) => {
                    protocol_edges = session.edges() - kickoff_edge;
                    if protocol_edges != timing.protocol_edges() {
                        return Err(DriverError::protocol_violation(
                            phase,
                            format!(
                                "streaming took {protocol_edges} edges, expected {}",
                                timing.protocol_edges()
                            ),
                        ));
                    }
                    Phase::Poll
                }
                Phase::Poll => {
                    outcome = Some(poll(&mut session, kickoff_edge, timing.cycle_budget)?);
                    Phase::Teardown
                }
                Phase::Teardown => {
                    session.release_start();
                    session.advance(timing.teardown_edges)?;
                    break;
                }
            };
        }

        let total_edges = session.edges();
        let classification = outcome.ok_or_else(|| {
            DriverError::protocol_violation(Phase::Teardown, "teardown reached without polling")
        })?;
        self.runs += 1;

        Ok(RunReport {
            classification,
            protocol_edges,
            poll_edges: classification.cycles().saturating_sub(protocol_edges),
            total_edges,
        })
    }
}

/// Sample `uo_out` every edge until `done` or the budget is reached.
///
/// `done` is checked before the budget, so a device finishing on exactly the
/// budget cycle still completes; a timeout is always reported at exactly
/// `budget` cycles (or at the end of streaming if that already exceeds it).
/// A budget-first check would call that cycle a timeout; here every
/// completed run satisfies `cycles <= budget`.
fn poll<D: PinDevice + ?Sized>(
    session: &mut PinSession<'_, D>,
    kickoff_edge: u64,
    budget: u64,
) -> Result<Classification> {
    let mut status = session.status()?;
    loop {
        let cycles = session.edges() - kickoff_edge;

        if status.done() {
            debug!("done at cycle {cycles}: {status}");
            return Ok(Classification::Completed {
                prediction: status.prediction(),
                cycles,
                status,
            });
        }
        if cycles >= budget {
            warn!("TIMEOUT: no done signal after {cycles} cycles (last status {status})");
            return Ok(Classification::TimedOut { cycles });
        }

        session.advance(1)?;
        if (cycles + 1) % timing::POLL_REPORT_INTERVAL == 0 {
            debug!("  Cycle {}: still computing...", cycles + 1);
        }
        status = session.status()?;
    }
}
