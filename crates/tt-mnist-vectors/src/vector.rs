//! Labelled test vector

use std::collections::HashMap;
use std::fmt;
use tt_mnist_pins::frame::{Frame, IMAGE_SIDE, LABEL_MAX, PIXEL_COUNT, PIXEL_MAX};

/// Metadata key the vector generator uses for the dataset ground truth.
pub const TRUE_LABEL_KEY: &str = "True label";

/// One labelled test case.
///
/// Immutable once loaded. `expected_label` is the accelerator's reference
/// prediction, which is not necessarily the dataset's true label (see
/// [`TestVector::true_label`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestVector {
    index: usize,
    pixels: Frame,
    expected_label: u8,
    metadata: HashMap<String, String>,
}

impl TestVector {
    /// Assemble a vector, checking every invariant.
    ///
    /// # Errors
    ///
    /// Wrong pixel count, a pixel above 3, or a label above 9.
    pub fn new(
        index: usize,
        pixels: &[u8],
        expected_label: u8,
        metadata: HashMap<String, String>,
    ) -> Result<Self, VectorFault> {
        let pixels: Frame = pixels
            .try_into()
            .map_err(|_| VectorFault::PixelCount(pixels.len()))?;

        if let Some(i) = pixels.iter().position(|&p| p > PIXEL_MAX) {
            return Err(VectorFault::PixelRange {
                index: i,
                value: pixels[i],
            });
        }
        if expected_label > LABEL_MAX {
            return Err(VectorFault::LabelRange(expected_label));
        }

        Ok(Self {
            index,
            pixels,
            expected_label,
            metadata,
        })
    }

    /// Vector index within its store
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Quantised pixels, row-major
    pub const fn pixels(&self) -> &Frame {
        &self.pixels
    }

    /// Reference classification
    pub const fn expected_label(&self) -> u8 {
        self.expected_label
    }

    /// Free-form metadata
    pub const fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// Dataset ground truth from the metadata, if recorded
    pub fn true_label(&self) -> Option<&str> {
        self.metadata.get(TRUE_LABEL_KEY).map(String::as_str)
    }

    /// Render the frame as an 8×8 intensity grid.
    pub fn grid(&self) -> Grid<'_> {
        Grid(&self.pixels)
    }
}

/// Invariant a vector's content violates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorFault {
    /// Pixel list is not exactly 64 entries
    PixelCount(usize),
    /// Pixel intensity above 3
    PixelRange {
        /// Pixel position
        index: usize,
        /// Offending value
        value: u8,
    },
    /// Label above 9
    LabelRange(u8),
}

impl VectorFault {
    /// True when the fault lies in the output (label) resource
    pub const fn in_label(&self) -> bool {
        matches!(self, Self::LabelRange(_))
    }
}

impl fmt::Display for VectorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PixelCount(n) => write!(f, "expected {PIXEL_COUNT} pixels, got {n}"),
            Self::PixelRange { index, value } => {
                write!(f, "pixel {index} = {value} exceeds {PIXEL_MAX}")
            }
            Self::LabelRange(label) => write!(f, "label {label} exceeds {LABEL_MAX}"),
        }
    }
}

/// 8×8 text rendering of a frame, one glyph per intensity level.
pub struct Grid<'a>(&'a Frame);

impl fmt::Display for Grid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const SHADES: [char; 4] = ['.', ':', '+', '#'];
        for row in self.0.chunks_exact(IMAGE_SIDE) {
            for &p in row {
                write!(f, "{}", SHADES[usize::from(p.min(PIXEL_MAX))])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_pixel_count_is_rejected() {
        for n in [63, 65] {
            let err = TestVector::new(0, &vec![0; n], 0, HashMap::new()).unwrap_err();
            assert_eq!(err, VectorFault::PixelCount(n));
            assert!(err.to_string().contains(&n.to_string()), "{err}");
        }
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut px = vec![0u8; 64];
        px[10] = 4;
        assert_eq!(
            TestVector::new(0, &px, 0, HashMap::new()),
            Err(VectorFault::PixelRange { index: 10, value: 4 })
        );
        let err = TestVector::new(0, &[0; 64], 10, HashMap::new()).unwrap_err();
        assert!(err.in_label());
    }

    #[test]
    fn grid_is_eight_rows() {
        let mut px = [0u8; 64];
        px[0] = 3;
        px[63] = 1;
        let v = TestVector::new(0, &px, 1, HashMap::new()).unwrap();
        let text = v.grid().to_string();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0], "#.......");
        assert_eq!(rows[7], ".......:");
    }
}
