//! Page layout pipeline.
//!
//! Orchestrates the full reconstruction flow for one page:
//!
//! ```text
//! Raster + detected lines + recognized fragments
//!     ↓
//! [Line grouping] (segments → rulings)
//!     ↓
//! [Grid detection] → [Border elimination] → [Zone segmentation]
//!     ↓
//! [Table reconstruction] + [Content extraction]
//!     ↓
//! [Reading-order aggregation]
//!     ↓
//! PageAnalysis (text, tables, blocks, zones, structure, errors)
//! ```
//!
//! The pipeline is synchronous and single-threaded per page; every stage
//! consumes the immutable output of the previous one. Pages are independent,
//! so callers may process several in parallel with one pipeline value.
//! Recoverable problems (a degenerate grid, an unavailable engine) are
//! accumulated or worked around; the page itself never aborts once its
//! dimensions validate.

use image::GrayImage;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};

use crate::aggregation::{aggregate_blocks, DocumentStructure, TextBlock};
use crate::config::LayoutConfig;
use crate::engines::{LineDetectionParams, LineDetector, SyntheticLineGenerator, TextRecognizer};
use crate::error::{Error, Result};
use crate::extraction::{
    cluster_fragments, fill_table_cells, fragments_from_recognition, fragments_within,
    TextFragment,
};
use crate::geometry::{LineSegment, Orientation, Point, Rect};
use crate::grids::{compute_intersections, detect_grids, eliminate_borders, group_lines};
use crate::tables::{reconstruct_table, Table};
use crate::zones::{admissible_grids, clean_zones, segment_zones, Zone};

/// Detected inputs for one page.
///
/// This is the hand-off format from the collaborator engines: page size,
/// line segments, optionally the detector's own intersection list (computed
/// internally when absent), and the recognized text fragments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedPage {
    /// Page width, pixels
    pub width: f32,
    /// Page height, pixels
    pub height: f32,
    /// Detected line segments, both orientations mixed
    pub lines: Vec<LineSegment>,
    /// Detector-supplied crossings; `None` means compute them here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intersections: Option<Vec<Point>>,
    /// Recognized text fragments in page coordinates
    #[serde(default)]
    pub fragments: Vec<TextFragment>,
}

impl DetectedPage {
    /// Create an empty page of the given size.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            lines: Vec::new(),
            intersections: None,
            fragments: Vec::new(),
        }
    }

    /// Page bounds as a rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Full analysis of one page: the ordered text, reconstructed tables, the
/// final block set, zone diagnostics, the derived structure summary, and
/// any recoverable errors hit along the way.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAnalysis {
    /// Final ordered page text
    pub text: String,
    /// Tables that passed the quality gate
    pub tables: Vec<Table>,
    /// Final text blocks with layout metadata
    pub blocks: Vec<TextBlock>,
    /// All zones, kept and dropped, for diagnostics
    pub zones: Vec<Zone>,
    /// Derived layout summary
    pub structure: DocumentStructure,
    /// Recoverable errors accumulated during processing
    #[serde(serialize_with = "serialize_errors")]
    pub errors: Vec<Error>,
}

fn serialize_errors<S: Serializer>(
    errors: &[Error],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(errors.len()))?;
    for error in errors {
        seq.serialize_element(&error.to_string())?;
    }
    seq.end()
}

impl PageAnalysis {
    /// One-line description for logs.
    pub fn summary(&self) -> String {
        format!(
            "{} table(s), {} block(s), {} zone(s), {} flow, {} error(s)",
            self.tables.len(),
            self.blocks.len(),
            self.zones.iter().filter(|z| z.should_keep).count(),
            self.structure.flow,
            self.errors.len()
        )
    }
}

/// The layout reconstruction pipeline.
///
/// Holds the configuration; all per-page state lives in the invocation.
pub struct LayoutPipeline {
    config: LayoutConfig,
}

impl LayoutPipeline {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Analyze a page from already detected lines and recognized fragments.
    ///
    /// The only fatal failure is an invalid page size; everything downstream
    /// degrades or accumulates into [`PageAnalysis::errors`].
    pub fn process_detected(&self, page: &DetectedPage) -> Result<PageAnalysis> {
        if !(page.width.is_finite() && page.height.is_finite())
            || page.width <= 0.0
            || page.height <= 0.0
        {
            return Err(Error::InvalidPage(format!(
                "page size {}x{} is not positive",
                page.width, page.height
            )));
        }
        Ok(self.analyze(page))
    }

    /// Analyze a raster page using the injected collaborators.
    ///
    /// A missing or failing line detector is replaced by the deterministic
    /// synthetic generator; a missing or failing recognizer leaves the page
    /// without fragments. Neither aborts the page.
    pub fn process_image(
        &self,
        image: &GrayImage,
        detector: Option<&dyn LineDetector>,
        recognizer: Option<&dyn TextRecognizer>,
        params: &LineDetectionParams,
        languages: &[String],
    ) -> Result<PageAnalysis> {
        let (width, height) = image.dimensions();
        let (width, height) = (width as f32, height as f32);
        let page_rect = Rect::new(0.0, 0.0, width, height);

        let lines = match detector {
            Some(d) => match d.detect_lines(image, params) {
                Ok(lines) => {
                    log::debug!("{} line(s) from detector {}", lines.len(), d.name());
                    lines
                }
                Err(e) => {
                    log::warn!(
                        "line detector {} failed ({e}); substituting synthetic lines",
                        d.name()
                    );
                    SyntheticLineGenerator::new().generate(width, height)
                }
            },
            None => {
                log::warn!("no line detector available; substituting synthetic lines");
                SyntheticLineGenerator::new().generate(width, height)
            }
        };

        let fragments = match recognizer {
            Some(r) => match r.recognize(image, languages) {
                Ok(recognized) => fragments_from_recognition(&recognized, &page_rect),
                Err(e) => {
                    log::warn!("text recognizer {} failed ({e}); page stays empty", r.name());
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let detected = DetectedPage {
            width,
            height,
            lines,
            intersections: None,
            fragments,
        };
        self.process_detected(&detected)
    }

    fn analyze(&self, page: &DetectedPage) -> PageAnalysis {
        let config = &self.config;
        let page_rect = page.bounds();
        let mut errors: Vec<Error> = Vec::new();

        // Rulings
        let h_groups = group_lines(&page.lines, Orientation::Horizontal, config.group_tolerance);
        let v_groups = group_lines(&page.lines, Orientation::Vertical, config.group_tolerance);
        let h_rulings: Vec<LineSegment> = h_groups.iter().map(|g| g.merged()).collect();
        let v_rulings: Vec<LineSegment> = v_groups.iter().map(|g| g.merged()).collect();

        // Crossings: detector-supplied or computed here
        let intersections = match &page.intersections {
            Some(points) => points.clone(),
            None => compute_intersections(&h_rulings, &v_rulings, config.group_tolerance),
        };

        // Grids, borders, zones
        let grids = detect_grids(&h_groups, &v_groups, &intersections, config);
        let (content, borders) =
            eliminate_borders(&h_rulings, &v_rulings, &page_rect, &config.border_counts);
        if !borders.is_empty() {
            log::debug!(
                "trimmed {} border line(s); content box {:?}",
                borders.total(),
                content
            );
        }
        let zones = segment_zones(&page_rect, &content, &grids, &h_rulings, &v_rulings, config);
        let zones = clean_zones(zones, &content, &page_rect, config);

        // Tables: one reconstruction attempt per surviving table zone. The
        // zone with id K corresponds to the K-th admissible grid.
        let admissible = admissible_grids(&content, &grids, config.group_tolerance);
        let mut tables: Vec<Table> = Vec::new();
        for (i, grid) in admissible.iter().enumerate() {
            let kept = zones
                .iter()
                .find(|z| z.id.0 == i)
                .map(|z| z.should_keep)
                .unwrap_or(false);
            if !kept {
                continue;
            }
            match reconstruct_table(grid, config) {
                Ok(mut table) => {
                    fill_table_cells(&mut table, &page.fragments, config);
                    table.finalize();
                    if table.is_significant(config) {
                        tables.push(table);
                    } else {
                        log::debug!(
                            "table at {:?} rejected: {} cell(s), confidence {:.2}",
                            table.bbox,
                            table.cells.len(),
                            table.confidence
                        );
                    }
                }
                Err(e) => {
                    log::warn!("table reconstruction failed: {e}");
                    errors.push(e);
                }
            }
        }

        // Blocks: clustered fragments per textual zone, then table content
        let mut blocks: Vec<TextBlock> = Vec::new();
        let mut next_block_id = 0;
        for zone in zones.iter().filter(|z| z.should_keep && z.kind.is_textual()) {
            let members = fragments_within(&zone.bbox, &page.fragments);
            for cluster in cluster_fragments(&members) {
                if let Some(block) = TextBlock::from_fragments(next_block_id, &cluster) {
                    next_block_id += 1;
                    blocks.push(block);
                }
            }
        }
        for table in &tables {
            if let Some(block) = TextBlock::from_table(next_block_id, table) {
                next_block_id += 1;
                blocks.push(block);
            }
        }

        // Ordered text
        let aggregated = aggregate_blocks(blocks, &page_rect, config);
        log::info!(
            "page {}x{}: {} table(s), {} block(s), {} error(s)",
            page.width,
            page.height,
            tables.len(),
            aggregated.blocks.len(),
            errors.len()
        );

        PageAnalysis {
            text: aggregated.text,
            tables,
            blocks: aggregated.blocks,
            zones,
            structure: aggregated.structure,
            errors,
        }
    }
}

impl Default for LayoutPipeline {
    fn default() -> Self {
        Self::new()
    }
}
