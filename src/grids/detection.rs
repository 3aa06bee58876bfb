//! Grid detection from grouped rulings.
//!
//! Rulings of one orientation whose extents overlap transitively form a
//! bundle. Every (horizontal-bundle, vertical-bundle) pair is examined: the
//! pair is refined to the rulings that actually reach the other bundle's
//! span, and becomes a candidate [`Grid`] when enough known intersections
//! fall inside its bounding box and the box is large enough to hold at least
//! a 2x2 cell matrix. Detection is deliberately permissive; table
//! reconstruction and zone subtraction discard the false positives.

use crate::config::LayoutConfig;
use crate::geometry::{segment_crossing, LineSegment, Point, Rect};
use crate::grids::line_grouping::LineGroup;
use crate::utils::safe_float_cmp;

/// A compatible pairing of horizontal and vertical rulings delimiting a
/// table-like structure.
///
/// Constructed transiently during zone segmentation and discarded once a
/// table is built or rejected.
#[derive(Debug, Clone)]
pub struct Grid {
    /// Merged horizontal rulings, sorted by y
    pub horizontal: Vec<LineSegment>,
    /// Merged vertical rulings, sorted by x
    pub vertical: Vec<LineSegment>,
    /// Union bounding box of all member rulings
    pub bbox: Rect,
    /// Known intersections falling inside the bounding box
    pub intersections: Vec<Point>,
    /// Mean confidence of the member rulings
    pub confidence: f32,
}

/// Compute all axis-aligned crossings between horizontal and vertical
/// rulings.
///
/// Used when the line-detection collaborator supplies no intersection list
/// of its own.
pub fn compute_intersections(
    horizontal: &[LineSegment],
    vertical: &[LineSegment],
    tolerance: f32,
) -> Vec<Point> {
    let mut points = Vec::new();
    for h in horizontal {
        for v in vertical {
            if let Some(p) = segment_crossing(h, v, tolerance) {
                points.push(p);
            }
        }
    }
    points
}

/// Detect candidate grids from grouped rulings.
///
/// `intersections` is the page-wide crossing list (detector-supplied or
/// computed via [`compute_intersections`]).
pub fn detect_grids(
    h_groups: &[LineGroup],
    v_groups: &[LineGroup],
    intersections: &[Point],
    config: &LayoutConfig,
) -> Vec<Grid> {
    let h_bundles = bundle_rulings(h_groups, config.group_tolerance);
    let v_bundles = bundle_rulings(v_groups, config.group_tolerance);

    let mut grids = Vec::new();
    for hb in &h_bundles {
        for vb in &v_bundles {
            if let Some(grid) =
                build_candidate(h_groups, v_groups, hb, vb, intersections, config)
            {
                grids.push(grid);
            }
        }
    }
    log::debug!(
        "{} horizontal x {} vertical bundles yielded {} grid candidates",
        h_bundles.len(),
        v_bundles.len(),
        grids.len()
    );
    grids
}

/// Cluster ruling indices by transitive extent overlap.
///
/// Intervals are sorted by their low end and chained while the next interval
/// starts before the running high end (widened by `tolerance`).
fn bundle_rulings(groups: &[LineGroup], tolerance: f32) -> Vec<Vec<usize>> {
    let mut order: Vec<usize> = (0..groups.len()).collect();
    order.sort_by(|&a, &b| safe_float_cmp(groups[a].extent.0, groups[b].extent.0));

    let mut bundles: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut high = f32::NEG_INFINITY;
    for idx in order {
        let (lo, hi) = groups[idx].extent;
        if current.is_empty() || lo <= high + tolerance {
            current.push(idx);
            high = high.max(hi);
        } else {
            bundles.push(std::mem::take(&mut current));
            current.push(idx);
            high = hi;
        }
    }
    if !current.is_empty() {
        bundles.push(current);
    }
    bundles
}

fn build_candidate(
    h_groups: &[LineGroup],
    v_groups: &[LineGroup],
    h_bundle: &[usize],
    v_bundle: &[usize],
    intersections: &[Point],
    config: &LayoutConfig,
) -> Option<Grid> {
    let tol = config.group_tolerance;
    let v_span = bundle_span(v_groups, v_bundle);
    let h_span = bundle_span(h_groups, h_bundle);

    // Keep only rulings that reach the other bundle's span; stacked tables
    // sharing one orientation separate here.
    let mut horizontal: Vec<LineSegment> = h_bundle
        .iter()
        .map(|&i| &h_groups[i])
        .filter(|g| g.position >= v_span.0 - tol && g.position <= v_span.1 + tol)
        .map(|g| g.merged())
        .collect();
    let mut vertical: Vec<LineSegment> = v_bundle
        .iter()
        .map(|&i| &v_groups[i])
        .filter(|g| g.position >= h_span.0 - tol && g.position <= h_span.1 + tol)
        .map(|g| g.merged())
        .collect();

    if horizontal.len() < 2 || vertical.len() < 2 {
        return None;
    }
    horizontal.sort_by(|a, b| safe_float_cmp(a.position(), b.position()));
    vertical.sort_by(|a, b| safe_float_cmp(a.position(), b.position()));

    let bbox = horizontal
        .iter()
        .chain(vertical.iter())
        .map(LineSegment::bbox)
        .reduce(|a, b| a.union(&b))?;

    let inside: Vec<Point> = intersections
        .iter()
        .filter(|p| bbox.contains_point(p))
        .copied()
        .collect();
    if inside.len() < config.min_grid_intersections {
        log::debug!(
            "grid candidate at {:?} rejected: {} intersections inside (need {})",
            bbox,
            inside.len(),
            config.min_grid_intersections
        );
        return None;
    }

    if bbox.width <= 2.0 * config.min_cell_width || bbox.height <= 2.0 * config.min_cell_height {
        log::debug!(
            "grid candidate at {:?} rejected: smaller than two minimum cells",
            bbox
        );
        return None;
    }

    let members = (horizontal.len() + vertical.len()) as f32;
    let confidence = horizontal
        .iter()
        .chain(vertical.iter())
        .map(|l| l.confidence)
        .sum::<f32>()
        / members;

    Some(Grid {
        horizontal,
        vertical,
        bbox,
        intersections: inside,
        confidence,
    })
}

/// Union of member extents, `(lo, hi)`.
fn bundle_span(groups: &[LineGroup], bundle: &[usize]) -> (f32, f32) {
    let mut lo = f32::INFINITY;
    let mut hi = f32::NEG_INFINITY;
    for &i in bundle {
        lo = lo.min(groups[i].extent.0);
        hi = hi.max(groups[i].extent.1);
    }
    (lo, hi)
}
