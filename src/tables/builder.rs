//! Table reconstruction from validated grids.
//!
//! Builds a dense row-major cell matrix from consecutive ruling pairs, then
//! infers merged cells from missing expected intersections: a boundary whose
//! crossing point was never detected is taken as absent, so the cells on
//! either side of it are visually one.

use std::collections::HashSet;

use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};
use crate::grids::Grid;
use crate::tables::cell::{Cell, CellGrid, CellId};
use crate::tables::Table;
use crate::utils::safe_float_cmp;

/// Reconstruct the cell structure of a grid.
///
/// Fails with [`Error::DegenerateGrid`] when the grid has fewer than two
/// rulings in either orientation; the caller records the error and continues
/// with the remaining zones. The returned table carries empty cell content
/// and zero confidence until the extraction bridge fills it.
pub fn reconstruct_table(grid: &Grid, config: &LayoutConfig) -> Result<Table> {
    let mut h: Vec<f32> = grid.horizontal.iter().map(|l| l.position()).collect();
    let mut v: Vec<f32> = grid.vertical.iter().map(|l| l.position()).collect();
    h.sort_by(|a, b| safe_float_cmp(*a, *b));
    v.sort_by(|a, b| safe_float_cmp(*a, *b));

    let rows = h.len() as isize - 1;
    let cols = v.len() as isize - 1;
    if rows < 1 || cols < 1 {
        return Err(Error::DegenerateGrid { rows, cols });
    }
    let (rows, cols) = (rows as usize, cols as usize);

    let known: HashSet<(i32, i32)> = grid.intersections.iter().map(|p| p.rounded()).collect();

    let mut cells = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let bbox = Rect::from_points(v[c], h[r], v[c + 1], h[r + 1]);
            cells.push(Cell::new(CellId(r * cols + c), r, c, bbox));
        }
    }
    let mut matrix = CellGrid::from_cells(rows, cols, cells);

    // Merge outcomes are order-sensitive; the scan order is part of the
    // contract: left-to-right within a row, rows top to bottom.
    for r in 0..rows {
        for c in 0..cols {
            let anchor = match matrix.slot(r, c) {
                Some(id) => id,
                None => continue,
            };

            let col_span = extend_right(&matrix, &known, &h, &v, r, c, config.max_merge_span);
            let row_span =
                extend_down(&matrix, &known, &h, &v, r, c, col_span, config.max_merge_span);

            if col_span > 1 || row_span > 1 {
                absorb_rectangle(&mut matrix, anchor, r, c, row_span, col_span);
            }
        }
    }

    let cells = matrix.into_surviving();
    let has_merged_cells = cells.iter().any(|c| c.is_merged);
    log::debug!(
        "reconstructed {}x{} table: {} surviving cells, merged: {}",
        rows,
        cols,
        cells.len(),
        has_merged_cells
    );

    Ok(Table {
        rows,
        cols,
        cells,
        bbox: grid.bbox,
        confidence: 0.0,
        has_header: false,
        has_merged_cells,
    })
}

/// Scan rightward from (r, c), extending while the expected intersection at
/// the next column boundary is missing. Stops at a detected crossing, an
/// already-absorbed slot, the grid edge, or the configured span limit.
fn extend_right(
    matrix: &CellGrid,
    known: &HashSet<(i32, i32)>,
    h: &[f32],
    v: &[f32],
    r: usize,
    c: usize,
    max_span: usize,
) -> usize {
    let mut span = 1;
    while span < max_span && c + span < matrix.cols() {
        if matrix.slot(r, c + span).is_none() {
            break;
        }
        if known.contains(&Point::new(v[c + span], h[r]).rounded()) {
            break;
        }
        span += 1;
    }
    span
}

/// Scan downward from (r, c), extending while the expected intersection at
/// the next row boundary is missing and the whole next row of the rectangle
/// is still unabsorbed.
fn extend_down(
    matrix: &CellGrid,
    known: &HashSet<(i32, i32)>,
    h: &[f32],
    v: &[f32],
    r: usize,
    c: usize,
    col_span: usize,
    max_span: usize,
) -> usize {
    let mut span = 1;
    while span < max_span && r + span < matrix.rows() {
        let row_free = (c..c + col_span).all(|cc| matrix.slot(r + span, cc).is_some());
        if !row_free {
            break;
        }
        if known.contains(&Point::new(v[c], h[r + span]).rounded()) {
            break;
        }
        span += 1;
    }
    span
}

/// Absorb every slot of the rectangle into the anchor: record the absorbed
/// ids, clear their slots, and grow the anchor's bounding box to the union.
fn absorb_rectangle(
    matrix: &mut CellGrid,
    anchor: CellId,
    r: usize,
    c: usize,
    row_span: usize,
    col_span: usize,
) {
    let mut absorbed = Vec::new();
    for rr in r..r + row_span {
        for cc in c..c + col_span {
            if rr == r && cc == c {
                continue;
            }
            if let Some(id) = matrix.slot(rr, cc) {
                absorbed.push(id);
                matrix.clear_slot(rr, cc);
            }
        }
    }

    let mut bbox = matrix.cell(anchor).bbox;
    for id in &absorbed {
        bbox = bbox.union(&matrix.cell(*id).bbox);
    }

    let cell = matrix.cell_mut(anchor);
    cell.row_span = row_span;
    cell.col_span = col_span;
    cell.bbox = bbox;
    cell.is_merged = true;
    for id in absorbed {
        cell.merged_with.insert(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LineSegment;

    /// Grid over the given ruling positions, with every crossing present
    /// except those listed in `missing` (as integer pixel coordinates).
    fn make_grid(h_pos: &[f32], v_pos: &[f32], missing: &[(i32, i32)]) -> Grid {
        let (x0, x1) = (v_pos[0], v_pos[v_pos.len() - 1]);
        let (y0, y1) = (h_pos[0], h_pos[h_pos.len() - 1]);
        let horizontal = h_pos
            .iter()
            .map(|&y| LineSegment::new(x0, y, x1, y, 0.9))
            .collect();
        let vertical = v_pos
            .iter()
            .map(|&x| LineSegment::new(x, y0, x, y1, 0.9))
            .collect();
        let mut intersections = Vec::new();
        for &y in h_pos {
            for &x in v_pos {
                if !missing.contains(&(x as i32, y as i32)) {
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

    fn slot_sum(table: &Table) -> usize {
        table.cells.iter().map(|c| c.slot_count()).sum()
    }

    fn cell_at(table: &Table, row: usize, col: usize) -> Option<&Cell> {
        table.cells.iter().find(|c| c.row == row && c.col == col)
    }

    const H3: [f32; 4] = [100.0, 150.0, 200.0, 250.0];
    const V3: [f32; 4] = [100.0, 180.0, 260.0, 340.0];

    #[test]
    fn test_uniform_grid_no_merges() {
        let grid = make_grid(&H3, &V3, &[]);
        let table = reconstruct_table(&grid, &LayoutConfig::default()).unwrap();
        assert_eq!(table.rows, 3);
        assert_eq!(table.cols, 3);
        assert_eq!(table.cells.len(), 9);
        assert!(!table.has_merged_cells);
        assert!(table.cells.iter().all(|c| c.row_span == 1 && c.col_span == 1));
        assert_eq!(slot_sum(&table), 9);
    }

    #[test]
    fn test_missing_intersection_merges_horizontally() {
        // Crossing between the first two cells of the top row is absent
        let grid = make_grid(&H3, &V3, &[(180, 100)]);
        let table = reconstruct_table(&grid, &LayoutConfig::default()).unwrap();

        let anchor = cell_at(&table, 0, 0).unwrap();
        assert_eq!(anchor.col_span, 2);
        assert_eq!(anchor.row_span, 1);
        assert!(anchor.is_merged);
        assert!(anchor.merged_with.contains(&CellId(1)));
        // The anchor's box covers both original slots
        assert_eq!(anchor.bbox.left(), 100.0);
        assert_eq!(anchor.bbox.right(), 260.0);

        assert!(cell_at(&table, 0, 1).is_none());
        assert_eq!(table.cells.len(), 8);
        assert!(table.has_merged_cells);
        assert_eq!(slot_sum(&table), 9);
    }

    #[test]
    fn test_missing_intersection_merges_vertically() {
        let grid = make_grid(&H3, &V3, &[(100, 150)]);
        let table = reconstruct_table(&grid, &LayoutConfig::default()).unwrap();

        let anchor = cell_at(&table, 0, 0).unwrap();
        assert_eq!(anchor.row_span, 2);
        assert_eq!(anchor.col_span, 1);
        assert!(anchor.merged_with.contains(&CellId(3)));
        assert_eq!(anchor.bbox.top(), 100.0);
        assert_eq!(anchor.bbox.bottom(), 200.0);
        assert!(cell_at(&table, 1, 0).is_none());
        assert_eq!(slot_sum(&table), 9);
    }

    #[test]
    fn test_block_merge_covers_rectangle() {
        // Both the rightward and the downward boundary of (0,0) are absent
        let grid = make_grid(&H3, &V3, &[(180, 100), (100, 150)]);
        let table = reconstruct_table(&grid, &LayoutConfig::default()).unwrap();

        let anchor = cell_at(&table, 0, 0).unwrap();
        assert_eq!(anchor.col_span, 2);
        assert_eq!(anchor.row_span, 2);
        assert_eq!(anchor.merged_with.len(), 3);
        assert_eq!(table.cells.len(), 6);
        assert_eq!(slot_sum(&table), 9);
    }

    #[test]
    fn test_full_row_merge() {
        let grid = make_grid(&H3, &V3, &[(180, 100), (260, 100)]);
        let table = reconstruct_table(&grid, &LayoutConfig::default()).unwrap();

        let anchor = cell_at(&table, 0, 0).unwrap();
        assert_eq!(anchor.col_span, 3);
        assert_eq!(table.cells.len(), 7);
        assert_eq!(slot_sum(&table), 9);
    }

    #[test]
    fn test_merge_span_capped() {
        let config = LayoutConfig::default().with_max_merge_span(2);
        let grid = make_grid(&H3, &V3, &[(180, 100), (260, 100)]);
        let table = reconstruct_table(&grid, &config).unwrap();

        // Extension stops at the span limit even though the next boundary
        // is also missing
        assert_eq!(cell_at(&table, 0, 0).unwrap().col_span, 2);
        assert!(cell_at(&table, 0, 2).is_some());
        assert_eq!(slot_sum(&table), 9);
    }

    #[test]
    fn test_absorbed_slot_stops_extension() {
        // (0,1) absorbs (1,1) first; (1,0) must not extend into the hole
        let grid = make_grid(&H3, &V3, &[(180, 150)]);
        let table = reconstruct_table(&grid, &LayoutConfig::default()).unwrap();

        assert_eq!(cell_at(&table, 0, 1).unwrap().row_span, 2);
        assert_eq!(cell_at(&table, 1, 0).unwrap().col_span, 1);
        assert_eq!(slot_sum(&table), 9);
    }

    #[test]
    fn test_degenerate_grid_is_an_error() {
        let grid = make_grid(&[100.0], &V3, &[]);
        let err = reconstruct_table(&grid, &LayoutConfig::default()).unwrap_err();
        match err {
            Error::DegenerateGrid { rows, cols } => {
                assert_eq!(rows, 0);
                assert_eq!(cols, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_single_cell_grid_reconstructs() {
        // 1x1 is structurally valid; quality filters reject it later
        let grid = make_grid(&[100.0, 150.0], &[100.0, 180.0], &[]);
        let table = reconstruct_table(&grid, &LayoutConfig::default()).unwrap();
        assert_eq!(table.rows, 1);
        assert_eq!(table.cols, 1);
        assert_eq!(table.cells.len(), 1);
    }

    #[test]
    fn test_unsorted_rulings_are_sorted() {
        let grid = make_grid(&[200.0, 100.0, 150.0, 250.0], &V3, &[]);
        let table = reconstruct_table(&grid, &LayoutConfig::default()).unwrap();
        assert_eq!(table.rows, 3);
        // Cell (0,0) sits between the two topmost rulings
        let first = cell_at(&table, 0, 0).unwrap();
        assert_eq!(first.bbox.top(), 100.0);
        assert_eq!(first.bbox.bottom(), 150.0);
    }
}
