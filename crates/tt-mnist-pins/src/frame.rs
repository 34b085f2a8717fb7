//! Image geometry of one classification frame.

use crate::pins::{LANE_COUNT, LANE_MASK};

/// Side length of the down-sampled digit image.
pub const IMAGE_SIDE: usize = 8;

/// Pixels per frame (8×8).
pub const PIXEL_COUNT: usize = IMAGE_SIDE * IMAGE_SIDE;

/// Largest pixel intensity (2-bit quantisation).
pub const PIXEL_MAX: u8 = LANE_MASK;

/// Pixels carried by one input-bus word.
pub const PIXELS_PER_BATCH: usize = LANE_COUNT;

/// Input-bus words per frame.
pub const BATCH_COUNT: usize = PIXEL_COUNT / PIXELS_PER_BATCH;

/// Digit classes the classifier distinguishes.
pub const CLASS_COUNT: u8 = 10;

/// Largest meaningful class label.
pub const LABEL_MAX: u8 = CLASS_COUNT - 1;

/// One frame of quantised pixels, row-major.
pub type Frame = [u8; PIXEL_COUNT];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_splits_into_sixteen_batches() {
        assert_eq!(PIXEL_COUNT, 64);
        assert_eq!(BATCH_COUNT, 16);
        assert_eq!(BATCH_COUNT * PIXELS_PER_BATCH, PIXEL_COUNT);
        assert_eq!(PIXEL_MAX, 3);
    }
}
