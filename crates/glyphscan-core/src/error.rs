//! Error types for glyph input validation.

use std::fmt;

/// A malformed glyph record.
///
/// Fatal to the document being processed; callers processing a batch report
/// it and move on to the next document.
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    /// A glyph record has no page number.
    MissingPage {
        /// Position of the offending record in the input list.
        index: usize,
        /// Text of the offending record.
        text: String,
    },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::MissingPage { index, text } => {
                write!(f, "glyph record {index} ({text:?}) is missing a page number")
            }
        }
    }
}

impl std::error::Error for DataError {}
