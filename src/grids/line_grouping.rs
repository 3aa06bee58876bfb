//! Clustering of detected segments into rulings.
//!
//! Scanned pages rarely yield one segment per printed line: morphological
//! detectors fragment a ruling into several collinear pieces and add isolated
//! noise strokes. Grouping collects same-orientation segments whose reference
//! coordinate (y for horizontal, x for vertical) lies within a pixel
//! tolerance, splits each cluster where the fragments stop being connected
//! along the ruling axis, keeps only runs backed by at least two segments,
//! and merges each surviving run into one canonical ruling.

use crate::geometry::{LineSegment, Orientation, Point};
use crate::utils::safe_float_cmp;

/// Minimum segments a run needs to count as a ruling; smaller runs are
/// detector noise.
const MIN_GROUP_SIZE: usize = 2;

/// Maximum axis gap between consecutive fragments of one ruling. Dashes and
/// broken strokes sit well under this; collinear rulings of separate
/// structures (stacked tables sharing an x position) sit well over it.
const MAX_FRAGMENT_GAP: f32 = 50.0;

/// A run of near-collinear, axis-connected segments representing one ruling.
#[derive(Debug, Clone)]
pub struct LineGroup {
    /// Orientation shared by all member segments
    pub orientation: Orientation,
    /// Mean reference coordinate of the members
    pub position: f32,
    /// Union extent along the ruling axis as `(lo, hi)`
    pub extent: (f32, f32),
    /// Mean detector confidence of the members
    pub confidence: f32,
    /// Member segments, in axis order
    pub lines: Vec<LineSegment>,
}

impl LineGroup {
    fn from_run(orientation: Orientation, lines: Vec<LineSegment>) -> Self {
        let n = lines.len() as f32;
        let position = lines.iter().map(|l| l.position()).sum::<f32>() / n;
        let confidence = lines.iter().map(|l| l.confidence).sum::<f32>() / n;
        let mut lo = f32::INFINITY;
        let mut hi = f32::NEG_INFINITY;
        for line in &lines {
            let (a, b) = line.extent();
            lo = lo.min(a);
            hi = hi.max(b);
        }
        Self {
            orientation,
            position,
            extent: (lo, hi),
            confidence,
            lines,
        }
    }

    /// Number of member segments.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when the group has no members (never produced by grouping;
    /// useful for hand-built values in tests).
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The canonical merged segment: full union extent at the mean position,
    /// carrying the mean confidence.
    pub fn merged(&self) -> LineSegment {
        let (lo, hi) = self.extent;
        match self.orientation {
            Orientation::Horizontal => {
                LineSegment::new(lo, self.position, hi, self.position, self.confidence)
            }
            Orientation::Vertical => {
                LineSegment::new(self.position, lo, self.position, hi, self.confidence)
            }
        }
    }

    /// Midpoint of the merged ruling.
    pub fn midpoint(&self) -> Point {
        self.merged().midpoint()
    }
}

/// Cluster segments of the given orientation into rulings.
///
/// Segments are sorted by reference coordinate and chained: a segment joins
/// the current cluster while its coordinate is within `tolerance` pixels of
/// the previous member. Each cluster is then split into axis-connected runs,
/// and runs with fewer than two members are dropped.
///
/// # Arguments
///
/// * `lines` - Detected segments; members of other orientations are ignored
/// * `orientation` - Which orientation to cluster
/// * `tolerance` - Maximum reference-coordinate gap inside a cluster
pub fn group_lines(
    lines: &[LineSegment],
    orientation: Orientation,
    tolerance: f32,
) -> Vec<LineGroup> {
    let mut candidates: Vec<LineSegment> = lines
        .iter()
        .filter(|l| l.orientation() == orientation)
        .copied()
        .collect();
    candidates.sort_by(|a, b| safe_float_cmp(a.position(), b.position()));

    let mut groups = Vec::new();
    let mut cluster: Vec<LineSegment> = Vec::new();
    for line in candidates {
        match cluster.last() {
            Some(prev) if line.position() - prev.position() <= tolerance => {
                cluster.push(line);
            }
            Some(_) => {
                collect_runs(orientation, std::mem::take(&mut cluster), &mut groups);
                cluster.push(line);
            }
            None => cluster.push(line),
        }
    }
    collect_runs(orientation, cluster, &mut groups);

    log::debug!(
        "grouped {} {:?} segments into {} rulings (tolerance {}px)",
        lines.len(),
        orientation,
        groups.len(),
        tolerance
    );
    groups
}

/// Split a position cluster into axis-connected runs and keep the ones large
/// enough to be rulings.
fn collect_runs(orientation: Orientation, mut cluster: Vec<LineSegment>, out: &mut Vec<LineGroup>) {
    if cluster.is_empty() {
        return;
    }
    cluster.sort_by(|a, b| safe_float_cmp(a.extent().0, b.extent().0));

    let mut run: Vec<LineSegment> = Vec::new();
    let mut high = f32::NEG_INFINITY;
    for line in cluster {
        let (lo, hi) = line.extent();
        if !run.is_empty() && lo > high + MAX_FRAGMENT_GAP {
            if run.len() >= MIN_GROUP_SIZE {
                out.push(LineGroup::from_run(orientation, std::mem::take(&mut run)));
            } else {
                run.clear();
            }
            high = f32::NEG_INFINITY;
        }
        run.push(line);
        high = high.max(hi);
    }
    if run.len() >= MIN_GROUP_SIZE {
        out.push(LineGroup::from_run(orientation, run));
    }
}
