//! Error types for unpdf-html.

use thiserror::Error;

/// Result type alias for unpdf-html operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during layout reconstruction.
///
/// Glyph-level geometry anomalies never surface here: they are repaired
/// locally when the glyph is sanitized. These variants describe page- or
/// configuration-level problems.
#[derive(Error, Debug)]
pub enum Error {
    /// Page geometry cannot be used for analysis (non-finite or empty page box).
    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Region, paragraph or classification analysis failed for a page.
    #[error("Layout analysis error on page {page}: {message}")]
    Analysis {
        /// 1-indexed page number
        page: u32,
        /// Failure description
        message: String,
    },

    /// Error while producing markup.
    #[error("Rendering error: {0}")]
    Render(String),

    /// JSON (de)serialization of options or layout dumps failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an analysis error for a page.
    pub fn analysis(page: u32, message: impl Into<String>) -> Self {
        Error::Analysis {
            page,
            message: message.into(),
        }
    }
}
