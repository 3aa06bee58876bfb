//! Configuration for layout reconstruction.
//!
//! One [`LayoutConfig`] is passed explicitly per pipeline invocation; there is
//! no global configuration state. Every knob has a default tuned for scanned
//! official-document layouts and can be overridden with the builder methods.

use serde::{Deserialize, Serialize};

/// Number of border candidate lines considered per page side.
///
/// The defaults (3 top, 2 elsewhere) match the double-ruled headers common in
/// official scanned forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderCounts {
    /// Candidates taken from the top edge
    pub top: usize,
    /// Candidates taken from the bottom edge
    pub bottom: usize,
    /// Candidates taken from the left edge
    pub left: usize,
    /// Candidates taken from the right edge
    pub right: usize,
}

impl Default for BorderCounts {
    fn default() -> Self {
        Self {
            top: 3,
            bottom: 2,
            left: 2,
            right: 2,
        }
    }
}

/// Layout reconstruction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Pixel tolerance for clustering near-collinear lines into one ruling.
    pub group_tolerance: f32,

    /// Minimum intersections inside a candidate grid's bounding box.
    pub min_grid_intersections: usize,

    /// Minimum cell width in pixels; a grid box must span at least twice this.
    pub min_cell_width: f32,

    /// Minimum cell height in pixels; a grid box must span at least twice this.
    pub min_cell_height: f32,

    /// Border candidate counts per page side.
    pub border_counts: BorderCounts,

    /// Maximum distance from the horizontal center for a vertical line to
    /// count as a column separator.
    pub center_margin: f32,

    /// Minimum surviving cell count for a table to be kept.
    pub min_table_cells: usize,

    /// Minimum aggregate confidence for a table to be kept.
    pub min_table_confidence: f32,

    /// Maximum rows/columns a single cell may span through merge inference.
    pub max_merge_span: usize,

    /// IoU gate for assigning a recognized fragment to a zone or cell.
    pub iou_threshold: f32,

    /// Maximum vertical gap in pixels between blocks considered for merging.
    pub max_block_gap: f32,

    /// Text-continuity score a block pair must exceed to merge.
    pub block_similarity: f32,

    /// Minimum width in pixels below which a zone is degenerate.
    pub min_zone_width: f32,

    /// Minimum height in pixels below which a zone is degenerate.
    pub min_zone_height: f32,

    /// Confidence below which the cleaning pass discards a zone.
    pub min_zone_confidence: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self {
            group_tolerance: 5.0,
            min_grid_intersections: 4,
            min_cell_width: 30.0,
            min_cell_height: 15.0,
            border_counts: BorderCounts::default(),
            center_margin: 20.0,
            min_table_cells: 4,
            min_table_confidence: 0.7,
            max_merge_span: 4,
            iou_threshold: 0.5,
            max_block_gap: 50.0,
            block_similarity: 0.8,
            min_zone_width: 20.0,
            min_zone_height: 10.0,
            min_zone_confidence: 0.3,
        }
    }

    /// Set the line-grouping tolerance in pixels.
    pub fn with_group_tolerance(mut self, tolerance: f32) -> Self {
        self.group_tolerance = tolerance;
        self
    }

    /// Set the minimum grid intersection count.
    pub fn with_min_grid_intersections(mut self, count: usize) -> Self {
        self.min_grid_intersections = count;
        self
    }

    /// Set the minimum cell dimensions in pixels.
    pub fn with_min_cell_size(mut self, width: f32, height: f32) -> Self {
        self.min_cell_width = width;
        self.min_cell_height = height;
        self
    }

    /// Set the border candidate counts per side.
    pub fn with_border_counts(mut self, counts: BorderCounts) -> Self {
        self.border_counts = counts;
        self
    }

    /// Set the center-separator margin in pixels.
    pub fn with_center_margin(mut self, margin: f32) -> Self {
        self.center_margin = margin;
        self
    }

    /// Set the minimum surviving cell count for tables.
    pub fn with_min_table_cells(mut self, cells: usize) -> Self {
        self.min_table_cells = cells;
        self
    }

    /// Set the minimum table confidence.
    pub fn with_min_table_confidence(mut self, confidence: f32) -> Self {
        self.min_table_confidence = confidence;
        self
    }

    /// Set the maximum merge span.
    pub fn with_max_merge_span(mut self, span: usize) -> Self {
        self.max_merge_span = span;
        self
    }

    /// Set the fragment-matching IoU gate.
    pub fn with_iou_threshold(mut self, threshold: f32) -> Self {
        self.iou_threshold = threshold;
        self
    }

    /// Set the block-merging gap and similarity thresholds.
    pub fn with_block_merging(mut self, max_gap: f32, similarity: f32) -> Self {
        self.max_block_gap = max_gap;
        self.block_similarity = similarity;
        self
    }

    /// Set the degenerate-zone minimum dimensions.
    pub fn with_min_zone_size(mut self, width: f32, height: f32) -> Self {
        self.min_zone_width = width;
        self.min_zone_height = height;
        self
    }
}
