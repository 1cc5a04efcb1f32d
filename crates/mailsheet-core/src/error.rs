//! Error types for the core library.

use thiserror::Error;

/// Errors raised by the preset persistence backend.
///
/// These never escape [`crate::PresetStore::load`]; an unreadable record is
/// treated as an empty mapping.
#[derive(Debug, Error)]
pub enum PresetError {
    /// The durable record is missing or cannot be reached.
    #[error("Preset storage unavailable: {0}")]
    Unavailable(String),

    /// I/O error while reading or writing the record.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The record is not a valid preset mapping.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Coarse classification of an [`ExportError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportErrorKind {
    /// The print document could not be handed to a viewer.
    SecondaryContextBlocked,
    /// The live preview could not be captured.
    CaptureFailed,
    /// The captured bitmap could not be encoded into a PDF.
    EncodingFailed,
    /// The Word document could not be packaged.
    PackagingFailed,
    /// The finished artifact could not be written to disk.
    SaveFailed,
}

/// Failure of one export action.
///
/// Every exporter reports through this type so the orchestrator can turn any
/// of them into the same kind of notice.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExportError {
    /// Opening the print view was refused.
    #[error("print view blocked: {0}")]
    SecondaryContextBlocked(String),

    /// Capturing the preview surface failed.
    #[error("capture failed: {0}")]
    CaptureFailed(String),

    /// Encoding the captured bitmap failed.
    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    /// Packaging the structured document failed.
    #[error("packaging failed: {0}")]
    PackagingFailed(String),

    /// Writing the export to the output directory failed.
    #[error("saving failed: {0}")]
    SaveFailed(String),
}

impl ExportError {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ExportErrorKind {
        match self {
            Self::SecondaryContextBlocked(_) => ExportErrorKind::SecondaryContextBlocked,
            Self::CaptureFailed(_) => ExportErrorKind::CaptureFailed,
            Self::EncodingFailed(_) => ExportErrorKind::EncodingFailed,
            Self::PackagingFailed(_) => ExportErrorKind::PackagingFailed,
            Self::SaveFailed(_) => ExportErrorKind::SaveFailed,
        }
    }

    /// Returns the human-readable reason carried by this error.
    #[must_use]
    pub fn diagnostic(&self) -> &str {
        match self {
            Self::SecondaryContextBlocked(reason)
            | Self::CaptureFailed(reason)
            | Self::EncodingFailed(reason)
            | Self::PackagingFailed(reason)
            | Self::SaveFailed(reason) => reason,
        }
    }
}

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Preset persistence failed.
    #[error("Preset error: {0}")]
    Preset(#[from] PresetError),

    /// An export action failed.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings or catalog definition error.
    #[error("Configuration error: {0}")]
    Settings(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_diagnostic_follow_variant() {
        let err = ExportError::CaptureFailed("surface gone".to_string());
        assert_eq!(err.kind(), ExportErrorKind::CaptureFailed);
        assert_eq!(err.diagnostic(), "surface gone");
        assert_eq!(err.to_string(), "capture failed: surface gone");
    }

    #[test]
    fn export_error_converts_into_crate_error() {
        let err: Error = ExportError::PackagingFailed("zip".to_string()).into();
        assert!(matches!(err, Error::Export(ExportError::PackagingFailed(_))));
    }
}
