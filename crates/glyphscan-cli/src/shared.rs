use std::path::{Path, PathBuf};

use glyphscan::glyphscan_parse::GlyphDocument;
use glyphscan::is_marked_output;

/// Directory scanned when no `--input` is given, relative to the working directory.
pub const DEFAULT_INPUT_DIR: &str = "pdfs";

/// Open a PDF file with user-friendly error messages.
///
/// Returns `Err(1)` with a message printed to stderr if the file is not found
/// or cannot be parsed as a valid PDF.
pub fn open_pdf(file: &Path) -> Result<GlyphDocument, i32> {
    if !file.exists() {
        eprintln!("Error: File not found: {}", file.display());
        return Err(1);
    }

    GlyphDocument::open_file(file).map_err(|e| {
        eprintln!("Error: failed to open PDF: {e}");
        1
    })
}

/// Expand `--input` values into the PDFs to scan.
///
/// Values containing glob metacharacters are expanded and sorted; other
/// values must name an existing file. With no values, every `*.pdf` in
/// `default_dir` is used. Marked copies from earlier runs are skipped, and
/// a path named twice is scanned once.
pub fn resolve_inputs(inputs: &[String], default_dir: &Path) -> Result<Vec<PathBuf>, i32> {
    let mut paths = Vec::new();

    if inputs.is_empty() {
        let pattern = default_dir.join("*.pdf");
        paths.extend(expand_glob(&pattern.to_string_lossy())?);
    }

    for input in inputs {
        if is_pattern(input) {
            paths.extend(expand_glob(input)?);
        } else if Path::new(input).is_file() {
            paths.push(PathBuf::from(input));
        } else {
            eprintln!("Error: File not found: {input}");
            return Err(1);
        }
    }

    let mut unique = Vec::with_capacity(paths.len());
    for path in paths {
        if !is_marked_output(&path) && !unique.contains(&path) {
            unique.push(path);
        }
    }
    Ok(unique)
}

fn is_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>, i32> {
    let entries = glob::glob(pattern).map_err(|e| {
        eprintln!("Error: invalid glob pattern '{pattern}': {e}");
        1
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable path");
                None
            }
        })
        .filter(|p| p.is_file())
        .collect();
    paths.sort();
    Ok(paths)
}

/// Display name of a path: its file name, or the whole path if it has none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Escape a string for CSV output.
///
/// If the text contains commas, double quotes, or newlines, wraps it in
/// double quotes and escapes any internal double quotes by doubling them.
pub fn csv_escape(text: &str) -> String {
    if text.contains([',', '"', '\n']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}
