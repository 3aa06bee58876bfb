//! Zone segmentation and cleaning.
//!
//! Splits the trimmed content area into table zones (one per accepted grid)
//! and text zones (split at central vertical separators), subtracts table
//! boxes from text boxes so the two never double-claim area, and runs the
//! cleaning pass — the only stage allowed to mutate zones after creation.

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::geometry::{segment_crossing, LineSegment, Rect};
use crate::grids::Grid;
use crate::utils::safe_float_cmp;

/// Minimum fraction of the content height a vertical line must span to act
/// as a column separator.
const MIN_SEPARATOR_HEIGHT_FRAC: f32 = 0.5;

/// Fraction of the page height forming the header band.
const HEADER_BAND_FRAC: f32 = 0.15;

/// Fraction of the page height forming the footer band.
const FOOTER_BAND_FRAC: f32 = 0.12;

/// Maximum zone height, as a fraction of the page height, for the cleaning
/// pass to reclassify a band zone as header or footer.
const STRIP_MAX_HEIGHT_FRAC: f32 = 0.08;

/// Identifier of a zone within one page analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub usize);

/// Classification of a page region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    /// Prose region
    Text,
    /// Region claimed by a table grid
    Table,
    /// Margin strip outside the content box
    Border,
    /// Region discarded as unusable
    Noise,
    /// Page-header band
    Header,
    /// Page-footer band
    Footer,
}

impl ZoneKind {
    /// Kinds whose content is assembled into text blocks.
    pub fn is_textual(&self) -> bool {
        matches!(self, ZoneKind::Text | ZoneKind::Header | ZoneKind::Footer)
    }
}

/// Action applied to a zone by the cleaning pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleaningAction {
    /// Bounding box clipped to the content box
    Clipped,
    /// Kind changed (header/footer band detection)
    Reclassified,
    /// Excluded from further processing
    Dropped,
}

/// A classified rectangular region of a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    /// Zone identifier, unique within one page analysis
    pub id: ZoneId,
    /// Region classification
    pub kind: ZoneKind,
    /// Region bounds
    pub bbox: Rect,
    /// Confidence in the region's existence and classification
    pub confidence: f32,
    /// False once the cleaning pass has excluded the zone
    pub should_keep: bool,
    /// Cleaning actions applied, in order
    pub cleaning: Vec<CleaningAction>,
}

impl Zone {
    fn new(id: usize, kind: ZoneKind, bbox: Rect, confidence: f32) -> Self {
        Self {
            id: ZoneId(id),
            kind,
            bbox,
            confidence,
            should_keep: true,
            cleaning: Vec::new(),
        }
    }
}

/// Grids whose bounding box fits inside the content box, in input order.
///
/// A grid assembled from border furniture spans past the content box and is
/// not a table; admitting it would subtract the whole page from the text
/// zones.
pub fn admissible_grids<'a>(content: &Rect, grids: &'a [Grid], tolerance: f32) -> Vec<&'a Grid> {
    grids
        .iter()
        .filter(|grid| {
            let fits = fits_within(&grid.bbox, content, tolerance);
            if !fits {
                log::debug!(
                    "grid at {:?} ignored: outside content box {:?}",
                    grid.bbox,
                    content
                );
            }
            fits
        })
        .collect()
}

/// Split the content box into table and text zones.
///
/// Table zones come from [`admissible_grids`] and are numbered first, in
/// grid order, starting at id 0 — the pipeline relies on this to pair a
/// surviving table zone back to its grid. Text zones come from splitting
/// the content box at central vertical separators, processed left-to-right,
/// then subtracting every table box. Margin strips between the page and the
/// content box are reported as non-kept border zones for diagnostics.
pub fn segment_zones(
    page: &Rect,
    content: &Rect,
    grids: &[Grid],
    h_rulings: &[LineSegment],
    v_rulings: &[LineSegment],
    config: &LayoutConfig,
) -> Vec<Zone> {
    let mut zones = Vec::new();
    let mut next_id = 0;

    let mut table_boxes: Vec<Rect> = Vec::new();
    for grid in admissible_grids(content, grids, config.group_tolerance) {
        // Admission bounds the box to content ± tolerance, so the clip is
        // at most a few pixels and never empties the box
        let bbox = grid.bbox.clip(content).unwrap_or(grid.bbox);
        table_boxes.push(bbox);
        zones.push(Zone::new(next_id, ZoneKind::Table, bbox, grid.confidence));
        next_id += 1;
    }

    let columns = split_at_separators(content, h_rulings, v_rulings, config);
    for bbox in subtract_tables(columns, &table_boxes) {
        if bbox.width < config.min_zone_width || bbox.height < config.min_zone_height {
            log::debug!("degenerate text region {:?} dropped", bbox);
            continue;
        }
        zones.push(Zone::new(next_id, ZoneKind::Text, bbox, 1.0));
        next_id += 1;
    }

    for strip in margin_strips(page, content) {
        let mut zone = Zone::new(next_id, ZoneKind::Border, strip, 1.0);
        zone.should_keep = false;
        zones.push(zone);
        next_id += 1;
    }

    log::debug!(
        "segmented {} zones ({} table boxes)",
        zones.len(),
        table_boxes.len()
    );
    zones
}

/// Split the content box at column separators.
///
/// A separator is a vertical ruling near the horizontal center (within the
/// configured margin) that spans at least half the content height and does
/// not cross any horizontal ruling.
fn split_at_separators(
    content: &Rect,
    h_rulings: &[LineSegment],
    v_rulings: &[LineSegment],
    config: &LayoutConfig,
) -> Vec<Rect> {
    let center_x = content.center().x;
    let mut separators: Vec<f32> = v_rulings
        .iter()
        .filter(|v| (v.position() - center_x).abs() <= config.center_margin)
        .filter(|v| {
            let (lo, hi) = v.extent();
            hi - lo >= content.height * MIN_SEPARATOR_HEIGHT_FRAC
        })
        .filter(|v| {
            h_rulings
                .iter()
                .all(|h| segment_crossing(h, v, config.group_tolerance).is_none())
        })
        .map(|v| v.position())
        .collect();
    separators.sort_by(|a, b| safe_float_cmp(*a, *b));

    if separators.is_empty() {
        return vec![*content];
    }

    let mut regions = Vec::new();
    let mut cursor = content.left();
    for x in separators {
        if x > cursor {
            regions.push(Rect::from_points(cursor, content.top(), x, content.bottom()));
            cursor = x;
        }
    }
    if cursor < content.right() {
        regions.push(Rect::from_points(
            cursor,
            content.top(),
            content.right(),
            content.bottom(),
        ));
    }
    regions
}

/// Remove every table box from the text regions, preserving the regions'
/// left-to-right order.
///
/// A region overlapping a table is replaced by its remainder slabs: above
/// and below at full region width, left and right within the table's
/// vertical span. Zero-size slabs vanish here; sub-minimum ones are dropped
/// by the caller's degenerate check.
fn subtract_tables(regions: Vec<Rect>, tables: &[Rect]) -> Vec<Rect> {
    let mut out = Vec::new();
    for region in regions {
        subtract_into(region, tables, &mut out);
    }
    out
}

fn subtract_into(region: Rect, tables: &[Rect], out: &mut Vec<Rect>) {
    for table in tables {
        let overlap = match region.intersection(table) {
            Some(r) if r.area() > 0.0 => r,
            _ => continue,
        };
        // Above
        if overlap.top() > region.top() {
            subtract_into(
                Rect::from_points(region.left(), region.top(), region.right(), overlap.top()),
                tables,
                out,
            );
        }
        // Below
        if overlap.bottom() < region.bottom() {
            subtract_into(
                Rect::from_points(
                    region.left(),
                    overlap.bottom(),
                    region.right(),
                    region.bottom(),
                ),
                tables,
                out,
            );
        }
        // Left
        if overlap.left() > region.left() {
            subtract_into(
                Rect::from_points(
                    region.left(),
                    overlap.top(),
                    overlap.left(),
                    overlap.bottom(),
                ),
                tables,
                out,
            );
        }
        // Right
        if overlap.right() < region.right() {
            subtract_into(
                Rect::from_points(
                    overlap.right(),
                    overlap.top(),
                    region.right(),
                    overlap.bottom(),
                ),
                tables,
                out,
            );
        }
        return;
    }
    out.push(region);
}

/// Margin strips between the page and the content box: top and bottom at
/// full page width, left and right between them.
fn margin_strips(page: &Rect, content: &Rect) -> Vec<Rect> {
    let mut strips = Vec::new();
    if content.top() > page.top() {
        strips.push(Rect::from_points(
            page.left(),
            page.top(),
            page.right(),
            content.top(),
        ));
    }
    if content.bottom() < page.bottom() {
        strips.push(Rect::from_points(
            page.left(),
            content.bottom(),
            page.right(),
            page.bottom(),
        ));
    }
    if content.left() > page.left() {
        strips.push(Rect::from_points(
            page.left(),
            content.top(),
            content.left(),
            content.bottom(),
        ));
    }
    if content.right() < page.right() {
        strips.push(Rect::from_points(
            content.right(),
            content.top(),
            page.right(),
            content.bottom(),
        ));
    }
    strips
}

fn fits_within(bbox: &Rect, bounds: &Rect, tolerance: f32) -> bool {
    bbox.left() >= bounds.left() - tolerance
        && bbox.right() <= bounds.right() + tolerance
        && bbox.top() >= bounds.top() - tolerance
        && bbox.bottom() <= bounds.bottom() + tolerance
}

/// Run the cleaning pass over freshly segmented zones.
///
/// Kept zones are clipped to the content box, dropped when degenerate or
/// under-confident, and text zones forming thin full-page bands are
/// reclassified as header or footer. Every action is recorded on the zone;
/// dropped zones stay in the list (not kept) for diagnostics.
pub fn clean_zones(
    mut zones: Vec<Zone>,
    content: &Rect,
    page: &Rect,
    config: &LayoutConfig,
) -> Vec<Zone> {
    for zone in zones.iter_mut().filter(|z| z.should_keep) {
        match zone.bbox.clip(content) {
            Some(clipped) => {
                if clipped != zone.bbox {
                    zone.bbox = clipped;
                    zone.cleaning.push(CleaningAction::Clipped);
                }
            }
            None => {
                drop_zone(zone, ZoneKind::Noise);
                continue;
            }
        }

        if zone.bbox.width < config.min_zone_width || zone.bbox.height < config.min_zone_height {
            drop_zone(zone, ZoneKind::Noise);
            continue;
        }

        if zone.confidence < config.min_zone_confidence {
            log::debug!(
                "zone {:?} dropped: confidence {:.2} below {:.2}",
                zone.id,
                zone.confidence,
                config.min_zone_confidence
            );
            zone.cleaning.push(CleaningAction::Dropped);
            zone.should_keep = false;
            continue;
        }

        if zone.kind == ZoneKind::Text {
            if let Some(kind) = band_kind(&zone.bbox, page) {
                zone.kind = kind;
                zone.cleaning.push(CleaningAction::Reclassified);
            }
        }
    }
    zones
}

fn drop_zone(zone: &mut Zone, kind: ZoneKind) {
    log::debug!("zone {:?} dropped as {:?}", zone.id, kind);
    zone.kind = kind;
    zone.should_keep = false;
    zone.cleaning.push(CleaningAction::Dropped);
}

/// Header/footer reclassification for thin bands at the page extremes.
fn band_kind(bbox: &Rect, page: &Rect) -> Option<ZoneKind> {
    if bbox.height > page.height * STRIP_MAX_HEIGHT_FRAC {
        return None;
    }
    if bbox.bottom() <= page.top() + page.height * HEADER_BAND_FRAC {
        Some(ZoneKind::Header)
    } else if bbox.top() >= page.bottom() - page.height * FOOTER_BAND_FRAC {
        Some(ZoneKind::Footer)
    } else {
        None
    }
}
