//! Integration tests for table reconstruction quality.
//!
//! Exercises reconstruction through the public API with hand-built grids:
//! merge conservation under arbitrary missing-intersection patterns, the
//! significance gates, and header detection.

use proptest::prelude::*;

use scan_oxide::extraction::{fill_table_cells, TextFragment};
use scan_oxide::geometry::{LineSegment, Point, Rect};
use scan_oxide::grids::Grid;
use scan_oxide::tables::reconstruct_table;
use scan_oxide::LayoutConfig;

// =============================================================================
// GRID FIXTURES
// =============================================================================

/// Grid over the given ruling positions with every crossing present except
/// the listed ones.
fn make_grid(h_pos: &[f32], v_pos: &[f32], missing: &[(usize, usize)]) -> Grid {
    let (x0, x1) = (v_pos[0], v_pos[v_pos.len() - 1]);
    let (y0, y1) = (h_pos[0], h_pos[h_pos.len() - 1]);
    let horizontal: Vec<LineSegment> = h_pos
        .iter()
        .map(|&y| LineSegment::new(x0, y, x1, y, 0.9))
        .collect();
    let vertical: Vec<LineSegment> = v_pos
        .iter()
        .map(|&x| LineSegment::new(x, y0, x, y1, 0.9))
        .collect();

    let mut intersections = Vec::new();
    for (i, &y) in h_pos.iter().enumerate() {
        for (j, &x) in v_pos.iter().enumerate() {
            if !missing.contains(&(i, j)) {
                intersections.push(Point::new(x, y));
            }
        }
    }

    Grid {
        horizontal,
        vertical,
        bbox: Rect::from_points(x0, y0, x1, y1),
        intersections,
        confidence: 0.9,
    }
}

fn snug_fragment(text: &str, cell: &Rect, confidence: f32) -> TextFragment {
    TextFragment::new(
        text,
        Rect::new(cell.x + 2.0, cell.y + 2.0, cell.width - 4.0, cell.height - 4.0),
        confidence,
    )
}

const H5: [f32; 5] = [100.0, 160.0, 220.0, 280.0, 340.0];
const V5: [f32; 5] = [100.0, 200.0, 300.0, 400.0, 500.0];

// =============================================================================
// MERGE CONSERVATION
// =============================================================================

mod conservation_tests {
    use super::*;

    /// Surviving spans always tile the full matrix exactly once, whatever
    /// crossings the detector missed.
    fn assert_tiles_exactly(h_pos: &[f32], v_pos: &[f32], missing: &[(usize, usize)]) {
        let grid = make_grid(h_pos, v_pos, missing);
        let config = LayoutConfig::default();
        let table = reconstruct_table(&grid, &config).unwrap();

        let rows = h_pos.len() - 1;
        let cols = v_pos.len() - 1;
        assert_eq!(table.rows, rows);
        assert_eq!(table.cols, cols);

        let mut covered = vec![0usize; rows * cols];
        for cell in &table.cells {
            assert!(cell.row_span >= 1 && cell.row_span <= config.max_merge_span);
            assert!(cell.col_span >= 1 && cell.col_span <= config.max_merge_span);
            for r in cell.row..cell.row + cell.row_span {
                for c in cell.col..cell.col + cell.col_span {
                    covered[r * cols + c] += 1;
                }
            }
        }
        assert!(
            covered.iter().all(|&n| n == 1),
            "merge left a slot uncovered or double-claimed: {:?} (missing {:?})",
            covered,
            missing
        );
    }

    #[test]
    fn test_full_grid_tiles() {
        assert_tiles_exactly(&H5, &V5, &[]);
    }

    #[test]
    fn test_single_hole_tiles() {
        assert_tiles_exactly(&H5, &V5, &[(0, 1)]);
        assert_tiles_exactly(&H5, &V5, &[(2, 0)]);
        assert_tiles_exactly(&H5, &V5, &[(2, 2)]);
    }

    #[test]
    fn test_adjacent_holes_tile() {
        assert_tiles_exactly(&H5, &V5, &[(0, 1), (0, 2), (1, 0), (2, 0)]);
    }

    proptest! {
        #[test]
        fn test_any_missing_pattern_tiles(
            missing in prop::collection::btree_set((0usize..5, 0usize..5), 0..12)
        ) {
            let missing: Vec<(usize, usize)> = missing.into_iter().collect();
            assert_tiles_exactly(&H5, &V5, &missing);
        }
    }
}

// =============================================================================
// QUALITY GATES
// =============================================================================

mod significance_tests {
    use super::*;

    #[test]
    fn test_filled_table_is_significant() {
        let grid = make_grid(&H5[..3], &V5[..3], &[]);
        let config = LayoutConfig::default();
        let mut table = reconstruct_table(&grid, &config).unwrap();

        let fragments: Vec<TextFragment> = table
            .cells
            .iter()
            .enumerate()
            .map(|(i, c)| snug_fragment(&format!("v{}", i), &c.bbox, 0.9))
            .collect();
        fill_table_cells(&mut table, &fragments, &config);
        table.finalize();

        assert!((table.confidence - 0.9).abs() < 1e-6);
        assert!(table.is_significant(&config));
    }

    #[test]
    fn test_unrecognized_table_is_not_significant() {
        let grid = make_grid(&H5[..3], &V5[..3], &[]);
        let config = LayoutConfig::default();
        let mut table = reconstruct_table(&grid, &config).unwrap();
        fill_table_cells(&mut table, &[], &config);
        table.finalize();

        assert_eq!(table.confidence, 0.0);
        assert!(!table.is_significant(&config));
    }

    #[test]
    fn test_low_confidence_recognition_rejected() {
        let grid = make_grid(&H5[..3], &V5[..3], &[]);
        let config = LayoutConfig::default();
        let mut table = reconstruct_table(&grid, &config).unwrap();

        let fragments: Vec<TextFragment> = table
            .cells
            .iter()
            .map(|c| snug_fragment("blurry", &c.bbox, 0.4))
            .collect();
        fill_table_cells(&mut table, &fragments, &config);
        table.finalize();

        assert!(!table.is_significant(&config));
    }

    #[test]
    fn test_sparse_content_still_counts() {
        // One recognized cell out of four: confidence averages over filled
        // cells only, so the table stays significant
        let grid = make_grid(&H5[..3], &V5[..3], &[]);
        let config = LayoutConfig::default();
        let mut table = reconstruct_table(&grid, &config).unwrap();

        let only = snug_fragment("lonely", &table.cells[3].bbox, 0.9);
        fill_table_cells(&mut table, &[only], &config);
        table.finalize();

        assert!((table.confidence - 0.9).abs() < 1e-6);
        assert!(table.is_significant(&config));
    }
}

// =============================================================================
// HEADER DETECTION
// =============================================================================

mod header_tests {
    use super::*;

    fn filled_table(missing_first_row_cell: bool) -> scan_oxide::Table {
        let grid = make_grid(&H5[..3], &V5[..3], &[]);
        let config = LayoutConfig::default();
        let mut table = reconstruct_table(&grid, &config).unwrap();

        let fragments: Vec<TextFragment> = table
            .cells
            .iter()
            .filter(|c| !(missing_first_row_cell && c.row == 0 && c.col == 1))
            .map(|c| snug_fragment("x", &c.bbox, 0.9))
            .collect();
        fill_table_cells(&mut table, &fragments, &config);
        table.finalize();
        table
    }

    #[test]
    fn test_full_first_row_is_a_header() {
        assert!(filled_table(false).has_header);
    }

    #[test]
    fn test_gap_in_first_row_is_not_a_header() {
        assert!(!filled_table(true).has_header);
    }

    #[test]
    fn test_merged_header_row_counts_surviving_cells() {
        // Top row merged into one wide cell; it alone carries the header
        let grid = make_grid(&H5[..3], &V5[..3], &[(0, 1)]);
        let config = LayoutConfig::default();
        let mut table = reconstruct_table(&grid, &config).unwrap();

        let fragments: Vec<TextFragment> = table
            .cells
            .iter()
            .map(|c| snug_fragment("x", &c.bbox, 0.9))
            .collect();
        fill_table_cells(&mut table, &fragments, &config);
        table.finalize();

        assert!(table.has_merged_cells);
        assert!(table.has_header);
    }
}
