// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # Scan Oxide
//!
//! Layout reconstruction for scanned official documents: from detected line
//! segments and recognized text fragments to ordered page text and
//! merged-cell tables.
//!
//! ## Core Features
//!
//! ### Structure Recovery
//! - **Line Grouping**: fragmented detector segments clustered into rulings
//! - **Grid Detection**: ruling bundles paired into candidate table grids
//! - **Border Elimination**: decorative page frames trimmed to a content box
//! - **Zone Segmentation**: table, text, header/footer, and margin regions
//!
//! ### Table Reconstruction
//! - **Merged Cells**: rightward/downward span inference from missing
//!   intersections, with a configurable span cap
//! - **Quality Gates**: cell count, confidence, and non-empty content checks
//! - **Header Detection**: fully populated first rows flagged as headers
//!
//! ### Content & Reading Order
//! - **IoU Matching**: recognized fragments assigned to cells by overlap
//! - **Flow Classification**: linear, columnar, and mixed page layouts
//! - **Block Merging**: split paragraphs rejoined by text continuity
//! - **RTL Support**: Hebrew/Arabic blocks flagged for directionality
//!
//! ### Robustness
//! - **Degraded Mode**: synthetic rulings when line detection is unavailable
//! - **Pluggable Engines**: [`engines::LineDetector`] and
//!   [`engines::TextRecognizer`] traits for external collaborators
//! - **Error Accumulation**: recoverable failures collected per page instead
//!   of aborting the run
//!
//! ## Quick Start
//!
//! ```
//! use scan_oxide::pipeline::{DetectedPage, LayoutPipeline};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Detected inputs normally come from the line-detection and
//! // text-recognition engines; an empty page analyzes cleanly.
//! let page = DetectedPage::new(612.0, 792.0);
//!
//! let pipeline = LayoutPipeline::new();
//! let analysis = pipeline.process_detected(&page)?;
//! println!("{}", analysis.summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Geometry primitives
pub mod geometry;

// Structure recovery: rulings, grids, borders
pub mod grids;

// Zone segmentation and cleaning
pub mod zones;

// Table reconstruction
pub mod tables;

// Fragment-to-region content matching
pub mod extraction;

// Reading order and text assembly
pub mod aggregation;

// External engine traits and the degraded-mode generator
pub mod engines;

// Page-level orchestration
pub mod pipeline;

// Re-exports
pub use aggregation::{BlockType, DocumentStructure, FlowKind, TextBlock};
pub use config::{BorderCounts, LayoutConfig};
pub use error::{Error, Result};
pub use pipeline::{DetectedPage, LayoutPipeline, PageAnalysis};
pub use tables::{Cell, Table};
pub use zones::{Zone, ZoneKind};

// Internal utilities
pub(crate) mod utils {
    //! Internal utility functions for the library.

    use std::cmp::Ordering;

    /// Safely compare two floating point numbers, handling NaN cases.
    ///
    /// NaN values are treated as equal to each other and greater than all other values.
    /// This ensures that sorting operations never panic due to NaN comparisons.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// # use std::cmp::Ordering;
    /// # use scan_oxide::utils::safe_float_cmp;
    /// assert_eq!(safe_float_cmp(1.0, 2.0), Ordering::Less);
    /// assert_eq!(safe_float_cmp(2.0, 1.0), Ordering::Greater);
    /// assert_eq!(safe_float_cmp(1.0, 1.0), Ordering::Equal);
    ///
    /// // NaN handling
    /// assert_eq!(safe_float_cmp(f32::NAN, f32::NAN), Ordering::Equal);
    /// assert_eq!(safe_float_cmp(f32::NAN, 1.0), Ordering::Greater);
    /// assert_eq!(safe_float_cmp(1.0, f32::NAN), Ordering::Less);
    /// ```
    #[inline]
    pub fn safe_float_cmp(a: f32, b: f32) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater, // NaN > all numbers
            (false, true) => Ordering::Less,    // all numbers < NaN
            (false, false) => {
                // Both are normal numbers, safe to unwrap
                a.partial_cmp(&b).unwrap()
            },
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_safe_float_cmp_normal() {
            assert_eq!(safe_float_cmp(1.0, 2.0), Ordering::Less);
            assert_eq!(safe_float_cmp(2.0, 1.0), Ordering::Greater);
            assert_eq!(safe_float_cmp(1.5, 1.5), Ordering::Equal);
        }

        #[test]
        fn test_safe_float_cmp_nan() {
            assert_eq!(safe_float_cmp(f32::NAN, f32::NAN), Ordering::Equal);
            assert_eq!(safe_float_cmp(f32::NAN, 0.0), Ordering::Greater);
            assert_eq!(safe_float_cmp(0.0, f32::NAN), Ordering::Less);
        }

        #[test]
        fn test_safe_float_cmp_infinity() {
            assert_eq!(safe_float_cmp(f32::INFINITY, f32::INFINITY), Ordering::Equal);
            assert_eq!(safe_float_cmp(f32::INFINITY, 1.0), Ordering::Greater);
            assert_eq!(safe_float_cmp(f32::NEG_INFINITY, f32::INFINITY), Ordering::Less);
        }
    }
}

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
