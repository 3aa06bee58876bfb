//! Cell model for reconstructed tables.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Identifier of a cell within one table.
///
/// Ids are assigned row-major at construction (`row * cols + col`), so they
/// survive merge resolution unchanged: an absorbed cell keeps its id inside
/// the anchor's `merged_with` set even though it no longer occupies a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellId(pub usize);

/// A logical table cell.
///
/// Spans default to 1×1; merge inference may widen them and record the
/// absorbed siblings in `merged_with` (insertion order preserved for stable
/// output).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Cell identifier
    pub id: CellId,
    /// Zero-based row of the anchor slot
    pub row: usize,
    /// Zero-based column of the anchor slot
    pub col: usize,
    /// Number of grid rows covered
    pub row_span: usize,
    /// Number of grid columns covered
    pub col_span: usize,
    /// Bounds; union of all covered slots after merging
    pub bbox: Rect,
    /// Recognized content, empty until the extraction bridge fills it
    pub content: String,
    /// Recognizer confidence of the content, 0 when empty
    pub confidence: f32,
    /// True when this cell absorbed at least one sibling
    pub is_merged: bool,
    /// Ids of the absorbed sibling cells
    pub merged_with: IndexSet<CellId>,
}

impl Cell {
    /// Create an unmerged, empty cell.
    pub fn new(id: CellId, row: usize, col: usize, bbox: Rect) -> Self {
        Self {
            id,
            row,
            col,
            row_span: 1,
            col_span: 1,
            bbox,
            content: String::new(),
            confidence: 0.0,
            is_merged: false,
            merged_with: IndexSet::new(),
        }
    }

    /// True when the cell carries no recognized text.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Number of grid slots this cell accounts for.
    pub fn slot_count(&self) -> usize {
        self.row_span * self.col_span
    }
}

/// Dense cell matrix used during merge resolution.
///
/// Cells live in an arena; the row-major index maps each (row, col) slot to
/// the cell occupying it, or `None` once the slot's cell has been absorbed.
/// This keeps absorbed cells explicit instead of leaving null holes in a
/// shared matrix.
#[derive(Debug)]
pub struct CellGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    index: Vec<Option<CellId>>,
}

impl CellGrid {
    /// Build a fully occupied matrix from row-major cells.
    ///
    /// The arena position of each cell must equal its id, which holds when
    /// the cells were produced row-major with `CellId(row * cols + col)`.
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), rows * cols);
        let index = cells.iter().map(|c| Some(c.id)).collect();
        Self {
            rows,
            cols,
            cells,
            index,
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Id occupying the slot, or `None` for an absorbed slot.
    pub fn slot(&self, row: usize, col: usize) -> Option<CellId> {
        self.index[row * self.cols + col]
    }

    /// Mark a slot's cell as absorbed.
    pub fn clear_slot(&mut self, row: usize, col: usize) {
        self.index[row * self.cols + col] = None;
    }

    /// Borrow a cell from the arena.
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.0]
    }

    /// Mutably borrow a cell from the arena.
    pub fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id.0]
    }

    /// Consume the matrix, returning surviving cells in row-major order.
    pub fn into_surviving(self) -> Vec<Cell> {
        let mut cells = self.cells;
        let mut out = Vec::new();
        // Walk slots row-major; each surviving id occupies exactly its own
        // anchor slot, so no id is emitted twice.
        for id in self.index.iter().flatten() {
            out.push(std::mem::replace(
                &mut cells[id.0],
                Cell::new(*id, 0, 0, Rect::new(0.0, 0.0, 0.0, 0.0)),
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cells(rows: usize, cols: usize) -> Vec<Cell> {
        let mut cells = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                let bbox = Rect::new(c as f32 * 50.0, r as f32 * 20.0, 50.0, 20.0);
                cells.push(Cell::new(CellId(r * cols + c), r, c, bbox));
            }
        }
        cells
    }

    #[test]
    fn test_new_cell_defaults() {
        let cell = Cell::new(CellId(7), 2, 1, Rect::new(50.0, 40.0, 50.0, 20.0));
        assert_eq!(cell.row_span, 1);
        assert_eq!(cell.col_span, 1);
        assert!(cell.is_empty());
        assert!(!cell.is_merged);
        assert!(cell.merged_with.is_empty());
        assert_eq!(cell.slot_count(), 1);
    }

    #[test]
    fn test_whitespace_content_counts_as_empty() {
        let mut cell = Cell::new(CellId(0), 0, 0, Rect::new(0.0, 0.0, 50.0, 20.0));
        cell.content = "   \t".to_string();
        assert!(cell.is_empty());
        cell.content = "x".to_string();
        assert!(!cell.is_empty());
    }

    #[test]
    fn test_grid_slot_lookup() {
        let grid = CellGrid::from_cells(2, 3, make_cells(2, 3));
        assert_eq!(grid.slot(0, 0), Some(CellId(0)));
        assert_eq!(grid.slot(1, 2), Some(CellId(5)));
        assert_eq!(grid.cell(CellId(4)).row, 1);
        assert_eq!(grid.cell(CellId(4)).col, 1);
    }

    #[test]
    fn test_clear_slot() {
        let mut grid = CellGrid::from_cells(2, 2, make_cells(2, 2));
        grid.clear_slot(0, 1);
        assert_eq!(grid.slot(0, 1), None);
        assert_eq!(grid.slot(0, 0), Some(CellId(0)));
    }

    #[test]
    fn test_into_surviving_row_major() {
        let mut grid = CellGrid::from_cells(2, 2, make_cells(2, 2));
        grid.clear_slot(1, 0);
        let surviving = grid.into_surviving();
        let ids: Vec<usize> = surviving.iter().map(|c| c.id.0).collect();
        assert_eq!(ids, vec![0, 1, 3]);
    }
}
