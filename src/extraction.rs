//! Content extraction bridge.
//!
//! Maps recognized-text fragments onto the geometric results of layout
//! analysis. Cells take their content from the single best-overlapping
//! fragment; text zones collect every fragment centered inside them and
//! cluster the fragments into paragraph-shaped groups for block building.
//! Recognition failing to match a region is a normal outcome, never an
//! error: the region stays empty with zero confidence.

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::engines::{normalize_confidence, RecognizedText};
use crate::geometry::Rect;
use crate::tables::Table;
use crate::utils::safe_float_cmp;

/// Horizontal gap, pixels, that splits one visual line into separate runs.
const LINE_SPLIT_GAP: f32 = 40.0;

/// A run may join the cluster above it when the vertical gap is at most
/// this multiple of the median fragment height.
const VERTICAL_GAP_FACTOR: f32 = 1.5;

/// A recognized text fragment in page coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// Recognized string
    pub text: String,
    /// Fragment bounds
    pub bbox: Rect,
    /// Recognizer confidence in [0, 1]
    pub confidence: f32,
}

impl TextFragment {
    /// Create a fragment.
    pub fn new(text: impl Into<String>, bbox: Rect, confidence: f32) -> Self {
        Self {
            text: text.into(),
            bbox,
            confidence,
        }
    }
}

/// Find the best fragment for a target box.
///
/// Overlap is a gate, not a ranking key: only fragments whose IoU against
/// the target strictly exceeds the threshold compete, and among those the
/// highest recognizer confidence wins (first seen on a tie). `None` means
/// the target stays empty.
pub fn best_fragment<'a>(
    target: &Rect,
    fragments: &'a [TextFragment],
    iou_threshold: f32,
) -> Option<&'a TextFragment> {
    let mut best: Option<&TextFragment> = None;
    for fragment in fragments {
        if target.iou(&fragment.bbox) <= iou_threshold {
            continue;
        }
        match best {
            Some(b) if fragment.confidence <= b.confidence => {}
            _ => best = Some(fragment),
        }
    }
    best
}

/// Fill every cell of a table from the fragment pool.
pub fn fill_table_cells(table: &mut Table, fragments: &[TextFragment], config: &LayoutConfig) {
    for cell in &mut table.cells {
        match best_fragment(&cell.bbox, fragments, config.iou_threshold) {
            Some(f) => {
                cell.content = f.text.clone();
                cell.confidence = f.confidence;
            }
            None => {
                cell.content.clear();
                cell.confidence = 0.0;
            }
        }
    }
}

/// Convert one recognition result into page-space fragments.
///
/// Word boxes are region-local and get translated by the region origin.
/// Without word boxes the whole result becomes one region-sized fragment.
/// Confidence is normalized (engines report 0-1 or 0-100).
pub fn fragments_from_recognition(recognized: &RecognizedText, region: &Rect) -> Vec<TextFragment> {
    let confidence = normalize_confidence(recognized.confidence);
    match &recognized.words {
        Some(words) if !words.is_empty() => words
            .iter()
            .filter(|w| !w.text.trim().is_empty())
            .map(|w| {
                TextFragment::new(
                    w.text.clone(),
                    Rect::new(
                        region.x + w.bbox.x,
                        region.y + w.bbox.y,
                        w.bbox.width,
                        w.bbox.height,
                    ),
                    confidence,
                )
            })
            .collect(),
        _ => {
            if recognized.text.trim().is_empty() {
                Vec::new()
            } else {
                vec![TextFragment::new(recognized.text.clone(), *region, confidence)]
            }
        }
    }
}

/// Fragments whose center lies inside the given bounds.
pub fn fragments_within<'a>(bounds: &Rect, fragments: &'a [TextFragment]) -> Vec<&'a TextFragment> {
    fragments
        .iter()
        .filter(|f| bounds.contains_point(&f.bbox.center()))
        .collect()
}

struct Run<'a> {
    frags: Vec<&'a TextFragment>,
    bbox: Rect,
}

/// Cluster fragments into paragraph-shaped groups.
///
/// Fragments sharing a vertical band form a visual line; a line splits into
/// runs at wide horizontal gaps (separate columns land in separate runs);
/// runs stack into a cluster while they overlap horizontally and the
/// vertical gap stays within reach of the median fragment height. Fragments
/// come back in reading order, line by line.
pub fn cluster_fragments<'a>(fragments: &[&'a TextFragment]) -> Vec<Vec<&'a TextFragment>> {
    if fragments.is_empty() {
        return Vec::new();
    }

    let mut heights: Vec<f32> = fragments.iter().map(|f| f.bbox.height).collect();
    heights.sort_by(|a, b| safe_float_cmp(*a, *b));
    let median_height = heights[heights.len() / 2];
    let max_vertical_gap = VERTICAL_GAP_FACTOR * median_height;

    let mut sorted: Vec<&TextFragment> = fragments.to_vec();
    sorted.sort_by(|a, b| {
        safe_float_cmp(a.bbox.top(), b.bbox.top())
            .then(safe_float_cmp(a.bbox.left(), b.bbox.left()))
    });

    // Visual lines: greedy by vertical overlap with the current band
    let mut lines: Vec<(Vec<&TextFragment>, f32, f32)> = Vec::new();
    for f in sorted {
        match lines.last_mut() {
            Some((frags, top, bottom)) if f.bbox.top() < *bottom && f.bbox.bottom() > *top => {
                frags.push(f);
                *top = top.min(f.bbox.top());
                *bottom = bottom.max(f.bbox.bottom());
            }
            _ => lines.push((vec![f], f.bbox.top(), f.bbox.bottom())),
        }
    }

    // Runs: split each line at wide horizontal gaps
    let mut runs: Vec<Run> = Vec::new();
    for (mut frags, _, _) in lines {
        frags.sort_by(|a, b| safe_float_cmp(a.bbox.left(), b.bbox.left()));
        let mut current: Vec<&TextFragment> = Vec::new();
        let mut bbox: Option<Rect> = None;
        for f in frags {
            match bbox {
                Some(b) if f.bbox.left() - b.right() > LINE_SPLIT_GAP => {
                    runs.push(Run {
                        frags: std::mem::take(&mut current),
                        bbox: b,
                    });
                    bbox = Some(f.bbox);
                    current.push(f);
                }
                Some(b) => {
                    bbox = Some(b.union(&f.bbox));
                    current.push(f);
                }
                None => {
                    bbox = Some(f.bbox);
                    current.push(f);
                }
            }
        }
        if let Some(b) = bbox {
            runs.push(Run {
                frags: current,
                bbox: b,
            });
        }
    }

    // Clusters: stack runs top-down onto the first compatible cluster
    let mut clusters: Vec<Run> = Vec::new();
    for run in runs {
        let target = clusters.iter_mut().find(|cl| {
            run.bbox.left() < cl.bbox.right()
                && run.bbox.right() > cl.bbox.left()
                && run.bbox.top() - cl.bbox.bottom() <= max_vertical_gap
        });
        match target {
            Some(cl) => {
                cl.bbox = cl.bbox.union(&run.bbox);
                cl.frags.extend(run.frags);
            }
            None => clusters.push(run),
        }
    }

    clusters.into_iter().map(|c| c.frags).collect()
}
