//! Document flow classification and column assignment.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::aggregation::text_block::{BlockType, TextBlock};
use crate::geometry::Rect;

/// A region counts as "wide" above this fraction of the page width.
const WIDE_FRAC: f32 = 0.6;

/// Wide-region ratio above which the page reads linearly.
const LINEAR_RATIO: f32 = 0.7;

/// Wide-region ratio below which the page reads as columns.
const COLUMNAR_RATIO: f32 = 0.3;

/// Left edge of the right column, as a fraction of the page width.
const RIGHT_COLUMN_START: f32 = 0.55;

/// Right edge of the left column, as a fraction of the page width.
const LEFT_COLUMN_END: f32 = 0.45;

/// Flow classification of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    /// Blocks follow each other top to bottom
    Linear,
    /// Blocks are laid out in columns
    Columnar,
    /// Columns plus full-width headers/footers
    Mixed,
}

impl std::fmt::Display for FlowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FlowKind::Linear => "linear",
            FlowKind::Columnar => "columnar",
            FlowKind::Mixed => "mixed",
        };
        f.write_str(name)
    }
}

/// Read-only layout summary derived from the final block set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStructure {
    /// Flow classification
    pub flow: FlowKind,
    /// Number of distinct columns occupied by blocks
    pub column_count: usize,
    /// True when any block classified as a header
    pub has_headers: bool,
    /// True when any table content is present
    pub has_tables: bool,
}

/// Classify the page flow from the ratio of wide regions to all regions.
pub fn classify_flow(blocks: &[TextBlock], page_width: f32) -> FlowKind {
    if blocks.is_empty() {
        return FlowKind::Linear;
    }
    let wide = blocks
        .iter()
        .filter(|b| b.bbox.width > WIDE_FRAC * page_width)
        .count();
    let ratio = wide as f32 / blocks.len() as f32;
    if ratio > LINEAR_RATIO {
        FlowKind::Linear
    } else if ratio < COLUMNAR_RATIO {
        FlowKind::Columnar
    } else {
        FlowKind::Mixed
    }
}

/// Assign a column index to a region.
///
/// A region starting in the right half gets column 1; one lying entirely
/// left of the right column without reaching across the left column's edge
/// gets column 0; anything else spans columns (-1).
pub fn assign_column(bbox: &Rect, page_width: f32) -> i32 {
    let right_start = RIGHT_COLUMN_START * page_width;
    let left_end = LEFT_COLUMN_END * page_width;
    if bbox.left() > right_start {
        1
    } else if bbox.right() <= right_start && !(bbox.left() < left_end && bbox.right() > left_end) {
        0
    } else {
        -1
    }
}

/// Derive the document structure summary from the final block set.
pub fn compute_structure(blocks: &[TextBlock], flow: FlowKind) -> DocumentStructure {
    let columns: IndexSet<i32> = blocks
        .iter()
        .filter(|b| b.column >= 0)
        .map(|b| b.column)
        .collect();
    let column_count = if columns.is_empty() && !blocks.is_empty() {
        1
    } else {
        columns.len()
    };
    DocumentStructure {
        flow,
        column_count,
        has_headers: blocks.iter().any(|b| b.block_type == BlockType::Header),
        has_tables: blocks.iter().any(|b| b.block_type == BlockType::Table),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::TextFragment;

    const PAGE_WIDTH: f32 = 600.0;

    fn block(x: f32, y: f32, w: f32) -> TextBlock {
        let f = TextFragment::new("text", Rect::new(x, y, w, 14.0), 0.9);
        TextBlock::from_fragments(0, &[&f]).unwrap()
    }

    #[test]
    fn test_flow_linear_when_mostly_wide() {
        // 6 of 7 regions wide: ratio 0.857 > 0.7
        let mut blocks: Vec<TextBlock> =
            (0..6).map(|i| block(20.0, i as f32 * 40.0, 500.0)).collect();
        blocks.push(block(20.0, 300.0, 100.0));
        assert_eq!(classify_flow(&blocks, PAGE_WIDTH), FlowKind::Linear);
    }

    #[test]
    fn test_flow_columnar_when_mostly_narrow() {
        let blocks: Vec<TextBlock> = (0..5).map(|i| block(20.0, i as f32 * 40.0, 240.0)).collect();
        assert_eq!(classify_flow(&blocks, PAGE_WIDTH), FlowKind::Columnar);
    }

    #[test]
    fn test_flow_mixed_in_between() {
        // 2 of 4 wide: ratio 0.5
        let blocks = vec![
            block(20.0, 0.0, 500.0),
            block(20.0, 40.0, 500.0),
            block(20.0, 80.0, 240.0),
            block(330.0, 80.0, 240.0),
        ];
        assert_eq!(classify_flow(&blocks, PAGE_WIDTH), FlowKind::Mixed);
    }

    #[test]
    fn test_flow_of_empty_page_is_linear() {
        assert_eq!(classify_flow(&[], PAGE_WIDTH), FlowKind::Linear);
    }

    #[test]
    fn test_column_right_half() {
        // Left edge beyond 55% of 600 = 330
        assert_eq!(assign_column(&Rect::new(340.0, 0.0, 200.0, 14.0), PAGE_WIDTH), 1);
    }

    #[test]
    fn test_column_left_half() {
        // Entirely left of 330, not crossing 270
        assert_eq!(assign_column(&Rect::new(20.0, 0.0, 240.0, 14.0), PAGE_WIDTH), 0);
        // Entirely between 45% and 55% still counts as left
        assert_eq!(assign_column(&Rect::new(280.0, 0.0, 40.0, 14.0), PAGE_WIDTH), 0);
    }

    #[test]
    fn test_column_spanning() {
        // Crosses the 45% edge without starting in the right half
        assert_eq!(assign_column(&Rect::new(100.0, 0.0, 250.0, 14.0), PAGE_WIDTH), -1);
        // Full-width region
        assert_eq!(assign_column(&Rect::new(20.0, 0.0, 560.0, 14.0), PAGE_WIDTH), -1);
    }

    #[test]
    fn test_structure_summary() {
        let mut header = block(20.0, 10.0, 500.0);
        header.block_type = BlockType::Header;
        header.column = -1;
        let mut left = block(20.0, 100.0, 240.0);
        left.column = 0;
        let mut right = block(330.0, 100.0, 240.0);
        right.column = 1;

        let structure = compute_structure(&[header, left, right], FlowKind::Mixed);
        assert_eq!(structure.column_count, 2);
        assert!(structure.has_headers);
        assert!(!structure.has_tables);
    }
}
