//! Errors for scanning a document end to end.

use std::path::PathBuf;

use glyphscan_core::DataError;
use glyphscan_parse::BackendError;
use thiserror::Error;

/// Anything that stops one document from being scanned.
///
/// Batch scans record the error against the document and continue.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The PDF could not be opened or its glyphs extracted.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A glyph record was malformed.
    #[error(transparent)]
    Data(#[from] DataError),

    /// Building or saving the marked copy failed.
    #[error("failed to mark {}: {message}", path.display())]
    Mark { path: PathBuf, message: String },

    /// Writing an output file failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serializing the overlap export failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScanError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScanError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn mark(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        ScanError::Mark {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
