//! Collaborator interfaces for line detection and text recognition.
//!
//! Both engines live outside this crate; the pipeline receives them as
//! injected trait objects and treats every call as fallible. When a detector
//! is absent the pipeline substitutes the deterministic generator in
//! [`degraded`] instead of failing the page.

pub mod degraded;

pub use degraded::SyntheticLineGenerator;

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::{LineSegment, Rect};

/// Tuning knobs passed to a line-detection engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDetectionParams {
    /// Binarization threshold in [0, 255]
    pub threshold: u8,
    /// Minimum segment length in pixels
    pub min_length: f32,
    /// Maximum gap bridged within one detected segment
    pub max_gap: f32,
    /// Morphological dilation passes before detection
    pub dilate_iterations: u32,
    /// Morphological erosion passes before detection
    pub erode_iterations: u32,
}

impl Default for LineDetectionParams {
    fn default() -> Self {
        Self {
            threshold: 128,
            min_length: 30.0,
            max_gap: 5.0,
            dilate_iterations: 1,
            erode_iterations: 1,
        }
    }
}

/// A pixel-level line-detection engine.
pub trait LineDetector: Send + Sync {
    /// Detect line segments in a monochrome page raster.
    fn detect_lines(
        &self,
        page: &GrayImage,
        params: &LineDetectionParams,
    ) -> Result<Vec<LineSegment>>;

    /// Engine name for logs and diagnostics.
    fn name(&self) -> &'static str;
}

/// Text recognized in a sub-image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizedText {
    /// Recognized string
    pub text: String,
    /// Recognizer confidence on the engine's native scale (0-1 or 0-100);
    /// normalized by the pipeline via [`normalize_confidence`]
    pub confidence: f32,
    /// Optional per-word boxes, in the coordinates of the recognized region
    pub words: Option<Vec<RecognizedWord>>,
}

/// A single recognized word and its box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizedWord {
    /// Word text
    pub text: String,
    /// Word bounds
    pub bbox: Rect,
}

/// A character-recognition engine.
pub trait TextRecognizer: Send + Sync {
    /// Recognize the text in a page sub-image, given language hints.
    fn recognize(&self, region: &GrayImage, languages: &[String]) -> Result<RecognizedText>;

    /// Engine name for logs and diagnostics.
    fn name(&self) -> &'static str;
}

/// Normalize a recognizer confidence to [0, 1].
///
/// Engines report either a 0-1 fraction or a 0-100 percentage; values above
/// 1 are taken as percentages. Out-of-range results clamp.
pub fn normalize_confidence(raw: f32) -> f32 {
    let c = if raw > 1.0 { raw / 100.0 } else { raw };
    c.clamp(0.0, 1.0)
}
