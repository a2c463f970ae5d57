use std::io::{self, Write};
use std::path::{Path, PathBuf};

use glyphscan::{BatchReport, DocumentReport, ScanError, ScanOptions};

use crate::cli::DetectionArgs;
use crate::report;
use crate::shared::{DEFAULT_INPUT_DIR, display_name, resolve_inputs};

pub fn run(
    inputs: &[String],
    no_labels: bool,
    json: bool,
    threshold: Option<usize>,
    detection: &DetectionArgs,
) -> Result<(), i32> {
    let mut options = detection.resolve()?;
    if no_labels {
        options.add_labels = false;
    }
    if json {
        options.export_json = true;
    }
    if let Some(n) = threshold {
        options.overlap_threshold = n;
    }

    let paths = resolve_inputs(inputs, Path::new(DEFAULT_INPUT_DIR))?;
    if paths.is_empty() {
        eprintln!("No PDFs found in {DEFAULT_INPUT_DIR}/ directory.");
        return Err(1);
    }

    println!("{}\n", report::header(paths.len(), &options));

    let batch: BatchReport = scan_all(&paths, &options)
        .inspect(|(path, result)| print_result(path, result, &options))
        .collect();

    if batch.len() > 1 {
        println!(
            "{}",
            report::summary(batch.len(), batch.marked_count(), batch.json_count())
        );
    }
    Ok(())
}

/// Scan documents one at a time, announcing each before it starts.
#[cfg(not(feature = "parallel"))]
fn scan_all<'a>(
    paths: &'a [PathBuf],
    options: &'a ScanOptions,
) -> impl Iterator<Item = (PathBuf, Result<DocumentReport, ScanError>)> + 'a {
    paths.iter().map(move |path| {
        announce(path);
        (path.clone(), glyphscan::scan_document(path, options))
    })
}

/// Scan all documents on the rayon pool, then report them in input order.
#[cfg(feature = "parallel")]
fn scan_all(
    paths: &[PathBuf],
    options: &ScanOptions,
) -> impl Iterator<Item = (PathBuf, Result<DocumentReport, ScanError>)> {
    glyphscan::scan_batch_parallel(paths, options)
        .documents
        .into_iter()
        .inspect(|(path, _)| announce(path))
}

fn announce(path: &Path) {
    print!("Processing: {}... ", display_name(path));
    let _ = io::stdout().flush();
}

fn print_result(
    path: &Path,
    result: &Result<DocumentReport, ScanError>,
    options: &ScanOptions,
) {
    let doc = match result {
        Ok(doc) => doc,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = ?e, "scan failed");
            println!("✗ Error: {e}");
            return;
        }
    };

    let detection = &doc.detection;
    print!("{}", report::preprocessing_notes(detection, options));
    println!("{}", report::document_line(doc, options));
    if doc.total_overlaps() == 0 {
        return;
    }
    if let Some(line) = report::union_filtered_line(detection, options) {
        println!("{line}");
    }
    if let Some(stats) = &detection.stats {
        println!("{}", report::stats_block(stats, report::TOP_CHARACTERS));
    }
}
