//! Pixel batches: four 2-bit pixels packed into one input-bus byte.
//!
//! ```text
//!  bit   7 6 │ 5 4 │ 3 2 │ 1 0
//!  lane   3  │  2  │  1  │  0
//!  pixel 4k+3│ 4k+2│ 4k+1│ 4k
//! ```

use crate::frame::{Frame, BATCH_COUNT, PIXELS_PER_BATCH, PIXEL_MAX};
use crate::pins::{lane_shift, LANE_MASK};

/// Four pixels packed into the 8-bit input bus.
///
/// Derived, never stored: the driver recomputes it from the next 4-pixel
/// slice every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelBatch(u8);

impl PixelBatch {
    /// All-zero batch (the idle bus value).
    pub const ZERO: Self = Self(0);

    /// Pack four pixels. Returns `None` if any pixel exceeds [`PIXEL_MAX`].
    #[must_use]
    pub const fn pack(pixels: [u8; PIXELS_PER_BATCH]) -> Option<Self> {
        let mut raw = 0u8;
        let mut lane = 0;
        while lane < PIXELS_PER_BATCH {
            if pixels[lane] > PIXEL_MAX {
                return None;
            }
            raw |= pixels[lane] << lane_shift(lane);
            lane += 1;
        }
        Some(Self(raw))
    }

    /// Reinterpret a raw bus byte as a batch. Every byte is a valid batch.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    /// Raw bus value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Pixel carried on `lane` (0..4).
    #[must_use]
    pub const fn lane(self, lane: usize) -> u8 {
        (self.0 >> lane_shift(lane)) & LANE_MASK
    }

    /// Unpack all four lanes.
    #[must_use]
    pub const fn unpack(self) -> [u8; PIXELS_PER_BATCH] {
        [self.lane(0), self.lane(1), self.lane(2), self.lane(3)]
    }
}

/// Split a frame into the 16 bus words that stream it, in bus order.
///
/// Returns the index of the first out-of-range pixel on failure.
///
/// # Errors
///
/// `Err((index, value))` for the first pixel above [`PIXEL_MAX`].
pub fn pack_frame(frame: &Frame) -> Result<[PixelBatch; BATCH_COUNT], (usize, u8)> {
    let mut batches = [PixelBatch::ZERO; BATCH_COUNT];
    for (k, chunk) in frame.chunks_exact(PIXELS_PER_BATCH).enumerate() {
        let pixels = [chunk[0], chunk[1], chunk[2], chunk[3]];
        batches[k] = PixelBatch::pack(pixels).ok_or_else(|| {
            let lane = chunk.iter().position(|&p| p > PIXEL_MAX).unwrap_or(0);
            (k * PIXELS_PER_BATCH + lane, chunk[lane])
        })?;
    }
    Ok(batches)
}

/// Reassemble a frame from its bus words.
#[must_use]
pub fn unpack_frame(batches: &[PixelBatch; BATCH_COUNT]) -> Frame {
    let mut frame = [0u8; crate::frame::PIXEL_COUNT];
    for (k, batch) in batches.iter().enumerate() {
        frame[k * PIXELS_PER_BATCH..(k + 1) * PIXELS_PER_BATCH].copy_from_slice(&batch.unpack());
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lane_order_matches_bus_layout() {
        let batch = PixelBatch::pack([1, 2, 3, 0]).unwrap();
        // (0 << 6) | (3 << 4) | (2 << 2) | 1
        assert_eq!(batch.raw(), 0b0011_1001);
        assert_eq!(batch.lane(0), 1);
        assert_eq!(batch.lane(3), 0);
    }

    #[test]
    fn every_lane_combination_survives_packing() {
        for raw in 0u16..=255 {
            let raw = raw as u8;
            let pixels = PixelBatch::from_raw(raw).unpack();
            assert!(pixels.iter().all(|&p| p <= PIXEL_MAX));
            assert_eq!(PixelBatch::pack(pixels).unwrap().raw(), raw);
        }
    }

    #[test]
    fn oversized_pixel_is_rejected() {
        assert_eq!(PixelBatch::pack([0, 4, 0, 0]), None);
    }

    #[test]
    fn pack_frame_reports_first_bad_pixel() {
        let mut frame = [1u8; 64];
        frame[37] = 9;
        frame[50] = 7;
        assert_eq!(pack_frame(&frame), Err((37, 9)));
    }

    #[test]
    fn frame_survives_streaming_layout() {
        let frame: Frame = core::array::from_fn(|i| (i % 4) as u8 ^ ((i / 4) % 4) as u8);
        let batches = pack_frame(&frame).unwrap();
        assert_eq!(batches[0].unpack(), [frame[0], frame[1], frame[2], frame[3]]);
        assert_eq!(unpack_frame(&batches), frame);
    }
}
