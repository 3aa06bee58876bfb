//! Page border elimination.
//!
//! Official scanned documents carry decorative rules around the page edges:
//! double-ruled tops, single rules on the remaining sides. Those lines are
//! layout furniture, not content. This module picks the configured number of
//! candidate lines nearest each edge, trims the content bounding box to the
//! innermost candidate per side, and reports the discarded lines for
//! diagnostics.

use crate::config::BorderCounts;
use crate::geometry::{LineSegment, Rect};
use crate::utils::safe_float_cmp;

/// Fraction of the page dimension, measured from each edge, inside which a
/// line can qualify as a border candidate.
const BORDER_BAND_FRAC: f32 = 0.25;

/// Border lines removed from each side, kept for diagnostics only.
#[derive(Debug, Clone, Default)]
pub struct PageBorders {
    /// Candidates trimmed from the top edge
    pub top: Vec<LineSegment>,
    /// Candidates trimmed from the bottom edge
    pub bottom: Vec<LineSegment>,
    /// Candidates trimmed from the left edge
    pub left: Vec<LineSegment>,
    /// Candidates trimmed from the right edge
    pub right: Vec<LineSegment>,
}

impl PageBorders {
    /// Total number of trimmed lines across all sides.
    pub fn total(&self) -> usize {
        self.top.len() + self.bottom.len() + self.left.len() + self.right.len()
    }

    /// True when no side had any border candidates.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Trim page borders and compute the content bounding box.
///
/// For each side, up to the configured number of lines nearest that edge
/// (and within the near-edge band) become border candidates; the content box
/// trims to the innermost candidate. A side without candidates keeps the
/// page edge. Lines lying exactly on the box edge never qualify, so running
/// the elimination again on its own output changes nothing.
pub fn eliminate_borders(
    horizontal: &[LineSegment],
    vertical: &[LineSegment],
    page: &Rect,
    counts: &BorderCounts,
) -> (Rect, PageBorders) {
    let y_band = page.height * BORDER_BAND_FRAC;
    let x_band = page.width * BORDER_BAND_FRAC;

    let top = side_candidates(horizontal, counts.top, |pos| {
        let d = pos - page.top();
        (d > 0.0 && d < y_band).then_some(d)
    });
    let bottom = side_candidates(horizontal, counts.bottom, |pos| {
        let d = page.bottom() - pos;
        (d > 0.0 && d < y_band).then_some(d)
    });
    let left = side_candidates(vertical, counts.left, |pos| {
        let d = pos - page.left();
        (d > 0.0 && d < x_band).then_some(d)
    });
    let right = side_candidates(vertical, counts.right, |pos| {
        let d = page.right() - pos;
        (d > 0.0 && d < x_band).then_some(d)
    });

    let content_top = innermost(&top, page.top(), true);
    let content_bottom = innermost(&bottom, page.bottom(), false);
    let content_left = innermost(&left, page.left(), true);
    let content_right = innermost(&right, page.right(), false);

    let borders = PageBorders {
        top,
        bottom,
        left,
        right,
    };

    if content_left >= content_right || content_top >= content_bottom {
        log::warn!(
            "border trim collapsed the page ({}..{} x {}..{}); keeping full page box",
            content_left,
            content_right,
            content_top,
            content_bottom
        );
        return (*page, borders);
    }

    let content = Rect::from_points(content_left, content_top, content_right, content_bottom);
    log::debug!(
        "trimmed {} border lines; content box {:?}",
        borders.total(),
        content
    );
    (content, borders)
}

/// The `take` lines nearest an edge, by the distance function `dist`
/// (`None` excludes a line from the side entirely).
fn side_candidates<F>(lines: &[LineSegment], take: usize, dist: F) -> Vec<LineSegment>
where
    F: Fn(f32) -> Option<f32>,
{
    let mut scored: Vec<(f32, LineSegment)> = lines
        .iter()
        .filter_map(|l| dist(l.position()).map(|d| (d, *l)))
        .collect();
    scored.sort_by(|a, b| safe_float_cmp(a.0, b.0));
    scored.truncate(take);
    scored.into_iter().map(|(_, l)| l).collect()
}

/// Innermost candidate position: the maximum for top/left sides, the minimum
/// for bottom/right. Falls back to the page edge when no candidates exist.
fn innermost(candidates: &[LineSegment], edge: f32, take_max: bool) -> f32 {
    candidates
        .iter()
        .map(|l| l.position())
        .reduce(|a, b| if take_max { a.max(b) } else { a.min(b) })
        .unwrap_or(edge)
}
