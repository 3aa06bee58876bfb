//! Table structures reconstructed from line grids.

pub mod builder;
pub mod cell;

pub use builder::reconstruct_table;
pub use cell::{Cell, CellGrid, CellId};

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::geometry::Rect;

/// A reconstructed table.
///
/// `cells` holds only the surviving cells in row-major order; slots absorbed
/// during merge resolution are represented by their anchor's spans and
/// `merged_with` set, so the spans of the surviving cells always sum to
/// `rows * cols`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Number of grid rows
    pub rows: usize,
    /// Number of grid columns
    pub cols: usize,
    /// Surviving cells, row-major
    pub cells: Vec<Cell>,
    /// Bounds of the source grid
    pub bbox: Rect,
    /// Aggregate confidence over cells with content
    pub confidence: f32,
    /// True when the first row reads as a header row
    pub has_header: bool,
    /// True when any cell absorbed a sibling
    pub has_merged_cells: bool,
}

impl Table {
    /// Recompute the aggregate confidence and header flag from cell content.
    ///
    /// Called after the extraction bridge has filled cells. Confidence is the
    /// mean over cells with non-empty content; a table with no recognized
    /// content at all scores 0. The header flag requires at least two rows
    /// and every surviving first-row cell to carry content.
    pub fn finalize(&mut self) {
        let filled: Vec<f32> = self
            .cells
            .iter()
            .filter(|c| !c.is_empty())
            .map(|c| c.confidence)
            .collect();
        self.confidence = if filled.is_empty() {
            0.0
        } else {
            filled.iter().sum::<f32>() / filled.len() as f32
        };

        let first_row: Vec<&Cell> = self.cells.iter().filter(|c| c.row == 0).collect();
        self.has_header =
            self.rows >= 2 && !first_row.is_empty() && first_row.iter().all(|c| !c.is_empty());
    }

    /// Quality gate deciding whether the table joins the result set.
    ///
    /// Rejects tables with too few cells, below-threshold confidence, or no
    /// recognized content anywhere. Rejection is a normal outcome, not an
    /// error.
    pub fn is_significant(&self, config: &LayoutConfig) -> bool {
        if self.cells.len() < config.min_table_cells {
            return false;
        }
        if self.confidence < config.min_table_confidence {
            return false;
        }
        self.cells.iter().any(|c| !c.is_empty())
    }

    /// Borrow the surviving cell anchored at (row, col), if any.
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }

    /// Plain-text rendering, one line per row with cell contents separated
    /// by single spaces. Rows without any content are skipped.
    pub fn flattened_text(&self) -> String {
        let mut lines = Vec::new();
        for row in 0..self.rows {
            let line: Vec<&str> = self
                .cells
                .iter()
                .filter(|c| c.row == row && !c.is_empty())
                .map(|c| c.content.trim())
                .collect();
            if !line.is_empty() {
                lines.push(line.join(" "));
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_table(rows: usize, cols: usize, contents: &[&str]) -> Table {
        let mut cells = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                let i = r * cols + c;
                let mut cell = Cell::new(
                    CellId(i),
                    r,
                    c,
                    Rect::new(c as f32 * 80.0, r as f32 * 30.0, 80.0, 30.0),
                );
                cell.content = contents[i].to_string();
                cell.confidence = if contents[i].is_empty() { 0.0 } else { 0.9 };
                cells.push(cell);
            }
        }
        Table {
            rows,
            cols,
            cells,
            bbox: Rect::new(0.0, 0.0, cols as f32 * 80.0, rows as f32 * 30.0),
            confidence: 0.0,
            has_header: false,
            has_merged_cells: false,
        }
    }

    #[test]
    fn test_finalize_averages_filled_cells_only() {
        let mut table = make_table(2, 2, &["a", "", "b", ""]);
        table.cells[0].confidence = 0.8;
        table.cells[2].confidence = 0.6;
        table.finalize();
        assert!((table.confidence - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_finalize_empty_table_scores_zero() {
        let mut table = make_table(2, 2, &["", "", "", ""]);
        table.finalize();
        assert_eq!(table.confidence, 0.0);
    }

    #[test]
    fn test_header_requires_full_first_row() {
        let mut table = make_table(2, 2, &["Name", "Age", "Ada", "36"]);
        table.finalize();
        assert!(table.has_header);

        let mut partial = make_table(2, 2, &["Name", "", "Ada", "36"]);
        partial.finalize();
        assert!(!partial.has_header);
    }

    #[test]
    fn test_single_row_never_a_header() {
        let mut table = make_table(1, 2, &["Name", "Age"]);
        table.finalize();
        assert!(!table.has_header);
    }

    #[test]
    fn test_significance_thresholds() {
        let config = LayoutConfig::default();

        let mut good = make_table(2, 2, &["a", "b", "c", "d"]);
        good.finalize();
        assert!(good.is_significant(&config));

        // Too few cells
        let mut tiny = make_table(1, 2, &["a", "b"]);
        tiny.finalize();
        assert!(!tiny.is_significant(&config));

        // Confidence below threshold
        let mut faint = make_table(2, 2, &["a", "b", "c", "d"]);
        for cell in &mut faint.cells {
            cell.confidence = 0.4;
        }
        faint.finalize();
        assert!(!faint.is_significant(&config));

        // No content anywhere
        let mut blank = make_table(2, 2, &["", "", "", ""]);
        blank.finalize();
        assert!(!blank.is_significant(&config));
    }

    #[test]
    fn test_flattened_text() {
        let table = make_table(2, 2, &["Name", "Age", "Ada", "36"]);
        assert_eq!(table.flattened_text(), "Name Age\nAda 36");

        let sparse = make_table(2, 2, &["Name", "", "", ""]);
        assert_eq!(sparse.flattened_text(), "Name");
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let mut table = make_table(2, 2, &["a", "b", "c", "d"]);
        table.has_merged_cells = true;
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains("\"hasMergedCells\":true"));
        assert!(json.contains("\"rowSpan\":1"));
        assert!(json.contains("\"mergedWith\":[]"));
    }
}
