//! JSON export of detected overlaps.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use glyphscan_core::{BBox, OverlapMetrics, OverlapRecord};
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// The exported document for one PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapExport {
    /// File name of the scanned PDF.
    pub pdf_file: String,
    /// Path the PDF was read from, as given.
    pub pdf_path: String,
    pub total_overlaps: usize,
    /// Overlaps keyed by 1-based page number, in ascending order.
    pub overlaps_by_page: BTreeMap<u32, Vec<OverlapEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapEntry {
    pub char_a: String,
    pub char_b: String,
    pub overlap_percentage: OverlapPercentages,
    pub position_a: Position,
    pub position_b: Position,
}

/// Overlap measures, all rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlapPercentages {
    pub overlap_area: f64,
    pub percentage_of_char_a: f64,
    pub percentage_of_char_b: f64,
    pub percentage_of_union: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<BBox> for Position {
    fn from(b: BBox) -> Self {
        Self {
            x: b.x,
            y: b.y,
            width: b.width,
            height: b.height,
        }
    }
}

impl From<OverlapMetrics> for OverlapPercentages {
    fn from(m: OverlapMetrics) -> Self {
        Self {
            overlap_area: m.overlap_area,
            percentage_of_char_a: m.percentage_of_a,
            percentage_of_char_b: m.percentage_of_b,
            percentage_of_union: m.percentage_of_union,
        }
    }
}

impl From<&OverlapRecord> for OverlapEntry {
    fn from(r: &OverlapRecord) -> Self {
        Self {
            char_a: r.char_a.clone(),
            char_b: r.char_b.clone(),
            overlap_percentage: r.metrics.into(),
            position_a: r.a.into(),
            position_b: r.b.into(),
        }
    }
}

/// Build the export document for `pdf_path`.
pub fn build_export(pdf_path: &Path, overlaps: &[OverlapRecord]) -> OverlapExport {
    let mut overlaps_by_page: BTreeMap<u32, Vec<OverlapEntry>> = BTreeMap::new();
    for record in overlaps {
        overlaps_by_page
            .entry(record.page)
            .or_default()
            .push(record.into());
    }

    OverlapExport {
        pdf_file: pdf_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        pdf_path: pdf_path.display().to_string(),
        total_overlaps: overlaps.len(),
        overlaps_by_page,
    }
}

/// Write `export` as pretty-printed JSON (two-space indent) to `out`.
///
/// # Errors
///
/// Returns [`ScanError::Io`] if the file cannot be created or flushed, or
/// [`ScanError::Json`] if serialization fails.
pub fn write_export(export: &OverlapExport, out: &Path) -> Result<(), ScanError> {
    let file = File::create(out).map_err(|e| ScanError::io(out, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, export)?;
    writer.flush().map_err(|e| ScanError::io(out, e))?;
    Ok(())
}
