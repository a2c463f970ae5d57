//! End-to-end scanning of PDF files: extract, detect, mark, export.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use glyphscan_parse::{BackendError, GlyphDocument, PageSize};

use crate::annotate::{PageMarks, mark_document};
use crate::detect::{Detection, detect};
use crate::error::ScanError;
use crate::export::{build_export, write_export};
use crate::options::ScanOptions;

const MARKED_SUFFIX: &str = "_marked.pdf";
const EXPORT_SUFFIX: &str = "_overlaps.json";

/// Outcome of scanning one PDF.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub path: PathBuf,
    pub page_count: usize,
    /// Glyphs extracted before any filtering.
    pub glyph_count: usize,
    pub detection: Detection,
    /// Set when a marked copy was written.
    pub marked_path: Option<PathBuf>,
    /// Set when an overlap export was written.
    pub json_path: Option<PathBuf>,
}

impl DocumentReport {
    pub fn total_overlaps(&self) -> usize {
        self.detection.total_overlaps()
    }
}

/// `dir/<stem>_marked.pdf` for `dir/<stem>.pdf`.
pub fn marked_path_for(path: &Path) -> PathBuf {
    sibling(path, MARKED_SUFFIX)
}

/// `dir/<stem>_overlaps.json` for `dir/<stem>.pdf`.
pub fn json_path_for(path: &Path) -> PathBuf {
    sibling(path, EXPORT_SUFFIX)
}

/// Whether `path` looks like a marked copy written by a previous scan.
pub fn is_marked_output(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(MARKED_SUFFIX))
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}{suffix}"))
}

/// Scan one PDF and write its outputs next to it.
///
/// A marked copy is written only when the number of kept overlaps exceeds
/// `overlap_threshold`. The JSON export is written when `export_json` is set
/// and at least one overlap was kept, regardless of the threshold.
///
/// # Errors
///
/// Returns [`ScanError`] if the PDF cannot be read or parsed, or if an output
/// file cannot be written.
pub fn scan_document(path: &Path, options: &ScanOptions) -> Result<DocumentReport, ScanError> {
    let document = GlyphDocument::open_file(path)?;
    let page_count = document.page_count();
    let glyphs = document.extract_glyphs()?;
    let detection = detect(&glyphs, options)?;
    let total = detection.total_overlaps();

    let marked_path = if total > options.overlap_threshold {
        let out = marked_path_for(path);
        write_marked(document, &detection, options, path, &out)?;
        Some(out)
    } else {
        None
    };

    let json_path = if options.export_json && total > 0 {
        let out = json_path_for(path);
        write_export(&build_export(path, detection.overlaps()), &out)?;
        Some(out)
    } else {
        None
    };

    tracing::info!(
        path = %path.display(),
        pages = page_count,
        overlaps = total,
        marked = marked_path.is_some(),
        "scanned document"
    );

    Ok(DocumentReport {
        path: path.to_path_buf(),
        page_count,
        glyph_count: glyphs.len(),
        detection,
        marked_path,
        json_path,
    })
}

fn write_marked(
    document: GlyphDocument,
    detection: &Detection,
    options: &ScanOptions,
    source: &Path,
    out: &Path,
) -> Result<(), ScanError> {
    let sizes = detection
        .highlights()
        .keys()
        .map(|&page| Ok((page, document.page_size(page)?)))
        .collect::<Result<Vec<(u32, PageSize)>, BackendError>>()?;
    let marks: Vec<PageMarks<'_>> = sizes
        .into_iter()
        .zip(detection.highlights().values())
        .map(|((page, size), highlights)| PageMarks {
            page,
            size,
            highlights,
        })
        .collect();

    let mut doc = document.into_inner();
    mark_document(&mut doc, &marks, options.add_labels).map_err(|e| ScanError::mark(source, e))?;

    let file = File::create(out).map_err(|e| ScanError::io(out, e))?;
    let mut writer = BufWriter::new(file);
    doc.save_to(&mut writer)
        .map_err(|e| ScanError::mark(out, e))?;
    Ok(())
}

/// Results for a list of PDFs, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub documents: Vec<(PathBuf, Result<DocumentReport, ScanError>)>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn marked_count(&self) -> usize {
        self.successes().filter(|r| r.marked_path.is_some()).count()
    }

    pub fn json_count(&self) -> usize {
        self.successes().filter(|r| r.json_path.is_some()).count()
    }

    pub fn error_count(&self) -> usize {
        self.documents.iter().filter(|(_, r)| r.is_err()).count()
    }

    fn successes(&self) -> impl Iterator<Item = &DocumentReport> {
        self.documents.iter().filter_map(|(_, r)| r.as_ref().ok())
    }
}

impl FromIterator<(PathBuf, Result<DocumentReport, ScanError>)> for BatchReport {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (PathBuf, Result<DocumentReport, ScanError>)>,
    {
        Self {
            documents: iter.into_iter().collect(),
        }
    }
}

impl Extend<(PathBuf, Result<DocumentReport, ScanError>)> for BatchReport {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (PathBuf, Result<DocumentReport, ScanError>)>,
    {
        self.documents.extend(iter);
    }
}

/// Scan each path in turn. A failing document does not stop the batch.
pub fn scan_batch(paths: &[PathBuf], options: &ScanOptions) -> BatchReport {
    paths
        .iter()
        .map(|path| (path.clone(), scan_one(path, options)))
        .collect()
}

/// Scan paths concurrently using rayon. Results keep input order.
#[cfg(feature = "parallel")]
pub fn scan_batch_parallel(paths: &[PathBuf], options: &ScanOptions) -> BatchReport {
    use rayon::prelude::*;

    let documents = paths
        .par_iter()
        .map(|path| (path.clone(), scan_one(path, options)))
        .collect();
    BatchReport { documents }
}

fn scan_one(path: &Path, options: &ScanOptions) -> Result<DocumentReport, ScanError> {
    scan_document(path, options).inspect_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "scan failed");
    })
}
