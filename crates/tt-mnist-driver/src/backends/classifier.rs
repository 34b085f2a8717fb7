//! Classification function behind the software device
//!
//! The software device models the wrapper's pins and timing, not its
//! datapath, so the answer it returns comes from a pluggable [`Classifier`].

use tt_mnist_pins::frame::{Frame, CLASS_COUNT, PIXEL_COUNT, PIXEL_MAX};

/// Maps a latched frame to a class
pub trait Classifier: Send + Sync {
    /// Classify one frame. Values above 15 are truncated by the status bus.
    fn classify(&self, frame: &Frame) -> u8;
}

impl<F> Classifier for F
where
    F: Fn(&Frame) -> u8 + Send + Sync,
{
    fn classify(&self, frame: &Frame) -> u8 {
        self(frame)
    }
}

/// Built-in 8×8 digit glyphs, `.` `:` `+` `#` for intensities 0..=3.
const GLYPHS: [&str; CLASS_COUNT as usize] = [
    concat!(
        "..+##+..", ".#+..+#.", ".#....#.", ".#....#.",
        ".#....#.", ".#....#.", ".#+..+#.", "..+##+..",
    ),
    concat!(
        "...##...", "..###...", ".+.##...", "...##...",
        "...##...", "...##...", "...##...", ".######.",
    ),
    concat!(
        "..###+..", ".#...+#.", ".....+#.", "....+#..",
        "...+#...", "..+#....", ".+#.....", ".######.",
    ),
    concat!(
        ".+####..", ".....##.", ".....##.", "..####..",
        ".....##.", ".....##.", ".....##.", ".+####..",
    ),
    concat!(
        "....+#..", "...+##..", "..+#.#..", ".+#..#..",
        ".######.", ".....#..", ".....#..", ".....#..",
    ),
    concat!(
        ".######.", ".#......", ".#......", ".#####..",
        "......#.", "......#.", ".#...+#.", "..####..",
    ),
    concat!(
        "..+###..", ".+#.....", ".#......", ".#####..",
        ".#....#.", ".#....#.", ".#+..+#.", "..####..",
    ),
    concat!(
        ".######.", "......#.", ".....+#.", "....+#..",
        "...+#...", "...#....", "...#....", "...#....",
    ),
    concat!(
        "..####..", ".#....#.", ".#....#.", "..####..",
        ".#....#.", ".#....#.", ".#....#.", "..####..",
    ),
    concat!(
        "..####..", ".#....#.", ".#....#.", "..#####.",
        "......#.", "......#.", ".....#..", "..###...",
    ),
];

fn glyph_frame(glyph: &str) -> Frame {
    let mut frame = [0u8; PIXEL_COUNT];
    for (pixel, ch) in frame.iter_mut().zip(glyph.chars()) {
        *pixel = match ch {
            ':' => 1,
            '+' => 2,
            '#' => PIXEL_MAX,
            _ => 0,
        };
    }
    frame
}

/// Nearest-template classifier (L1 distance, lowest class wins ties)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateClassifier {
    templates: [Frame; CLASS_COUNT as usize],
}

impl Default for TemplateClassifier {
    fn default() -> Self {
        Self::glyphs()
    }
}

impl TemplateClassifier {
    /// Templates from the built-in digit glyphs.
    pub fn glyphs() -> Self {
        Self {
            templates: GLYPHS.map(glyph_frame),
        }
    }

    /// Templates from explicit frames, one per class.
    pub const fn from_templates(templates: [Frame; CLASS_COUNT as usize]) -> Self {
        Self { templates }
    }

    /// Per-class centroids of labelled frames, rounded to the nearest
    /// intensity. Classes without samples keep their glyph.
    pub fn fit<'a, I>(samples: I) -> Self
    where
        I: IntoIterator<Item = (&'a Frame, u8)>,
    {
        let mut sums = [[0u32; PIXEL_COUNT]; CLASS_COUNT as usize];
        let mut counts = [0u32; CLASS_COUNT as usize];

        for (frame, label) in samples {
            let Some(sum) = sums.get_mut(usize::from(label)) else {
                continue;
            };
            for (acc, &p) in sum.iter_mut().zip(frame.iter()) {
                *acc += u32::from(p);
            }
            counts[usize::from(label)] += 1;
        }

        let mut fitted = Self::glyphs();
        for (class, template) in fitted.templates.iter_mut().enumerate() {
            let n = counts[class];
            if n == 0 {
                continue;
            }
            for (pixel, &sum) in template.iter_mut().zip(sums[class].iter()) {
                // round half up; sum/n never exceeds PIXEL_MAX
                #[allow(clippy::cast_possible_truncation)]
                let mean = ((2 * sum + n) / (2 * n)) as u8;
                *pixel = mean.min(PIXEL_MAX);
            }
        }
        tracing::debug!("Fitted templates from {} samples", counts.iter().sum::<u32>());
        fitted
    }

    /// Template of one class
    pub fn template(&self, class: u8) -> Option<&Frame> {
        self.templates.get(usize::from(class))
    }

    /// L1 distance between a frame and each template
    pub fn distances(&self, frame: &Frame) -> [u32; CLASS_COUNT as usize] {
        self.templates.map(|t| {
            t.iter()
                .zip(frame.iter())
                .map(|(&a, &b)| u32::from(a.abs_diff(b)))
                .sum()
        })
    }
}

impl Classifier for TemplateClassifier {
    fn classify(&self, frame: &Frame) -> u8 {
        let distances = self.distances(frame);
        let mut best = 0u8;
        for (class, &d) in (0u8..).zip(distances.iter()) {
            if d < distances[usize::from(best)] {
                best = class;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_glyph_is_eight_by_eight() {
        for (digit, glyph) in GLYPHS.iter().enumerate() {
            assert_eq!(glyph.len(), PIXEL_COUNT, "glyph {digit}");
        }
    }

    #[test]
    fn each_glyph_classifies_as_itself() {
        let clf = TemplateClassifier::glyphs();
        for digit in 0..CLASS_COUNT {
            let frame = *clf.template(digit).unwrap();
            assert_eq!(clf.classify(&frame), digit);
        }
    }

    #[test]
    fn noisy_glyph_still_matches() {
        let clf = TemplateClassifier::glyphs();
        let mut frame = *clf.template(7).unwrap();
        frame[0] = 3;
        frame[63] = 2;
        assert_eq!(clf.classify(&frame), 7);
    }

    #[test]
    fn fit_replaces_only_seen_classes() {
        let a = [1u8; PIXEL_COUNT];
        let b = [2u8; PIXEL_COUNT];
        let fitted = TemplateClassifier::fit([(&a, 4), (&b, 4)]);

        // mean of 1 and 2 rounds half up
        assert_eq!(fitted.template(4).unwrap(), &[2u8; PIXEL_COUNT]);
        assert_eq!(fitted.template(0), TemplateClassifier::glyphs().template(0));
    }

    #[test]
    fn fit_ignores_out_of_range_labels() {
        let a = [3u8; PIXEL_COUNT];
        assert_eq!(TemplateClassifier::fit([(&a, 12)]), TemplateClassifier::glyphs());
    }

    #[test]
    fn closures_are_classifiers() {
        let first_pixel = |f: &Frame| f[0];
        let mut frame = [0u8; PIXEL_COUNT];
        frame[0] = 3;
        assert_eq!(first_pixel.classify(&frame), 3);
    }
}
