//! Bit definitions for every bus the wrapper exposes.
//!
//! Names follow the Tiny Tapeout user-project convention: `ui_in` dedicated
//! inputs, `uio_in` bidirectional pins used as inputs, `uo_out` dedicated
//! outputs.

// ── Input bus (ui_in) ────────────────────────────────────────────────────────

/// Width of the input bus in bits.
pub const INPUT_BUS_WIDTH: u32 = 8;

/// Width of one pixel lane in bits.
pub const LANE_WIDTH: u32 = 2;

/// Number of pixel lanes on the input bus.
pub const LANE_COUNT: usize = (INPUT_BUS_WIDTH / LANE_WIDTH) as usize;

/// Mask of a single lane once shifted down to bit 0.
pub const LANE_MASK: u8 = (1 << LANE_WIDTH) - 1;

/// Bit offset of lane `lane` on the input bus.
#[must_use]
pub const fn lane_shift(lane: usize) -> u32 {
    lane as u32 * LANE_WIDTH
}

// ── Control bus (uio_in) ─────────────────────────────────────────────────────

/// Control bus bits.
pub mod control {
    /// Start a classification. Sampled on the rising edge.
    pub const START: u8 = 1 << 0;
    /// Bits defined by the streaming protocol; everything else stays zero.
    pub const DEFINED: u8 = START;
}

// ── Output bus (uo_out) ──────────────────────────────────────────────────────

/// Output bus bits.
pub mod status {
    /// Predicted class, bits 0–3.
    pub const PREDICTION_MASK: u8 = 0x0F;
    /// Classification finished; prediction bits are valid.
    pub const DONE: u8 = 1 << 4;
    /// Device is loading or computing.
    pub const BUSY: u8 = 1 << 5;
    /// Bits 6–7 are not driven by the wrapper.
    pub const UNUSED: u8 = 0xC0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lanes_tile_the_input_bus() {
        assert_eq!(LANE_COUNT, 4);
        assert_eq!(lane_shift(3) + LANE_WIDTH, INPUT_BUS_WIDTH);
        assert_eq!(LANE_MASK, 0b11);
    }

    #[test]
    fn status_fields_do_not_overlap() {
        assert_eq!(status::PREDICTION_MASK & status::DONE, 0);
        assert_eq!(status::DONE & status::BUSY, 0);
        assert_eq!(
            status::PREDICTION_MASK | status::DONE | status::BUSY | status::UNUSED,
            0xFF
        );
    }
}
