//! Error types for the layout reconstruction library.
//!
//! Recoverable failures are accumulated per page rather than aborting the run;
//! see [`crate::pipeline::PageAnalysis::errors`].

/// Result type alias for layout reconstruction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during layout reconstruction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A grid reached table reconstruction with too few lines to form cells
    #[error("Degenerate grid: {rows} rows x {cols} cols (need at least 1x1)")]
    DegenerateGrid {
        /// Row count derived from the grid's horizontal lines
        rows: isize,
        /// Column count derived from the grid's vertical lines
        cols: isize,
    },

    /// Page dimensions are unusable (zero, negative, or non-finite)
    #[error("Invalid page geometry: {0}")]
    InvalidPage(String),

    /// The external line-detection engine reported a failure
    #[error("Line detection failed: {0}")]
    LineDetection(String),

    /// The external text-recognition engine reported a failure
    #[error("Text recognition failed: {0}")]
    TextRecognition(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
