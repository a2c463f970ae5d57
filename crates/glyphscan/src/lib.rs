//! glyphscan: Find overlapping glyphs in PDF documents.
//!
//! This is the public API facade crate. It runs the detection pipeline from
//! glyphscan-core over glyphs extracted by glyphscan-parse, writes a marked
//! copy of each affected PDF, and optionally exports the overlaps as JSON.
//!
//! # Architecture
//!
//! - **glyphscan-core**: Backend-independent types and the detection algorithms
//! - **glyphscan-parse**: PDF loading and content stream interpretation
//! - **glyphscan** (this crate): Options, orchestration, marking, and export
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use glyphscan::{ScanOptions, scan_document};
//!
//! let report = scan_document(Path::new("paper.pdf"), &ScanOptions::default())?;
//! println!("{} overlaps", report.total_overlaps());
//! # Ok::<(), glyphscan::ScanError>(())
//! ```

pub mod annotate;
pub mod detect;
pub mod error;
pub mod export;
pub mod options;
pub mod scan;

pub use annotate::{MarkError, PageMarks, label_anchor, mark_document};
pub use detect::{Detection, detect};
pub use error::ScanError;
pub use export::{OverlapEntry, OverlapExport, build_export, write_export};
pub use options::ScanOptions;
#[cfg(feature = "parallel")]
pub use scan::scan_batch_parallel;
pub use scan::{
    BatchReport, DocumentReport, is_marked_output, json_path_for, marked_path_for, scan_batch,
    scan_document,
};

pub use glyphscan_core;
pub use glyphscan_parse;
