//! glyphscan-parse: glyph extraction from PDF documents.
//!
//! Loads documents with [lopdf](https://crates.io/crates/lopdf), interprets
//! page content streams, and produces [`glyphscan_core::Glyph`] records with
//! bottom-left origin boxes relative to each page's MediaBox.

pub mod cmap;
pub mod document;
pub mod error;
pub mod font;
mod interpreter;
pub mod standard_fonts;
pub mod text_state;

pub use document::{GlyphDocument, PageSize, inherited};
pub use error::BackendError;
pub use interpreter::{MAX_FORM_DEPTH, RenderedGlyph};
pub use glyphscan_core;
