//! Degraded-mode line generation.
//!
//! When no line detector is available the pipeline substitutes this
//! deterministic generator: evenly spaced, low-confidence synthetic lines
//! spanning the full page. Each synthetic ruling is a single segment, so the
//! grouping stage's two-segment minimum filters them all out; downstream
//! sees no grids, no borders and no separators, and the page degrades to
//! plain text extraction instead of failing.

use crate::geometry::LineSegment;

/// Spacing between generated lines, pixels.
const DEFAULT_SPACING: f32 = 120.0;

/// Confidence stamped on every generated segment.
const DEFAULT_CONFIDENCE: f32 = 0.2;

/// Deterministic substitute for an unavailable line detector.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticLineGenerator {
    /// Distance between consecutive lines
    pub spacing: f32,
    /// Confidence of each generated segment
    pub confidence: f32,
}

impl Default for SyntheticLineGenerator {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_SPACING,
            confidence: DEFAULT_CONFIDENCE,
        }
    }
}

impl SyntheticLineGenerator {
    /// Create a generator with default spacing and confidence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate full-extent horizontal and vertical lines for a page of the
    /// given size. Same input, same output: no randomness.
    pub fn generate(&self, width: f32, height: f32) -> Vec<LineSegment> {
        let mut lines = Vec::new();
        let mut y = self.spacing;
        while y < height {
            lines.push(LineSegment::new(0.0, y, width, y, self.confidence));
            y += self.spacing;
        }
        let mut x = self.spacing;
        while x < width {
            lines.push(LineSegment::new(x, 0.0, x, height, self.confidence));
            x += self.spacing;
        }
        log::debug!(
            "generated {} synthetic lines for {}x{} page",
            lines.len(),
            width,
            height
        );
        lines
    }
}
