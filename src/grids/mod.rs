//! Line grouping, grid detection and border elimination.
//!
//! The stages between raw detected segments and zone segmentation:
//! [`line_grouping`] turns fragmented segments into rulings, [`detection`]
//! pairs ruling bundles into candidate grids, and [`borders`] strips page
//! furniture to produce the content bounding box.

pub mod borders;
pub mod detection;
pub mod line_grouping;

pub use borders::{eliminate_borders, PageBorders};
pub use detection::{compute_intersections, detect_grids, Grid};
pub use line_grouping::{group_lines, LineGroup};
