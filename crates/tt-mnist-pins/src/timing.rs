//! Edge counts of the streaming protocol.
//!
//! Every phase is measured in rising edges of the shared clock. Cycle counts
//! reported by the driver start at the kickoff edge; reset and teardown edges
//! are not counted.
//!
//! ```text
//! reset(2) → release(1) │ kickoff(1) → settle(1) → stream(15) │ poll… │ teardown(1)
//!   not counted          │ ─────── 17 protocol edges ──────── │ ≤ 5000 │ not counted
//! ```

use crate::frame::BATCH_COUNT;

/// Edges with `rst_n` low at the start of every vector run.
pub const RESET_EDGES: u32 = 2;

/// Edges after releasing reset before any signalling.
pub const POST_RESET_EDGES: u32 = 1;

/// Edges with start asserted and the first batch on the bus.
pub const KICKOFF_EDGES: u32 = 1;

/// Dead edges holding the first batch while the device finishes latching it.
pub const SETTLE_EDGES: u32 = 1;

/// Batches streamed after the settle edge, one per edge.
pub const STREAM_EDGES: u32 = BATCH_COUNT as u32 - 1;

/// Protocol edges before polling begins (kickoff + settle + stream).
pub const PROTOCOL_EDGES: u32 = KICKOFF_EDGES + SETTLE_EDGES + STREAM_EDGES;

/// Edges after releasing start, before the next vector's reset.
pub const TEARDOWN_EDGES: u32 = 1;

/// Hard completion budget, inclusive of the protocol edges.
pub const CYCLE_BUDGET: u64 = 5_000;

/// Cycles between poll progress reports.
pub const POLL_REPORT_INTERVAL: u64 = 500;

/// Bench clock period in nanoseconds (100 MHz).
pub const CLOCK_PERIOD_NS: u64 = 10;

/// Typical kickoff-to-done cycle count of the taped-out wrapper.
pub const TYPICAL_CYCLES: u64 = 3_940;
