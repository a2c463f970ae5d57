use std::path::Path;

use glyphscan::glyphscan_core::Glyph;
use glyphscan::{build_export, detect};

use crate::cli::{DetectionArgs, ReportFormat};
use crate::report;
use crate::shared::display_name;

pub fn run(file: &Path, format: &ReportFormat, detection: &DetectionArgs) -> Result<(), i32> {
    let options = detection.resolve()?;
    let glyphs = load_glyphs(file)?;

    let result = detect(&glyphs, &options).map_err(|e| {
        eprintln!("✗ Error: {e}");
        1
    })?;

    match format {
        ReportFormat::Json => {
            let export = build_export(file, result.overlaps());
            let json = serde_json::to_string_pretty(&export).map_err(|e| {
                eprintln!("Error: {e}");
                1
            })?;
            println!("{json}");
        }
        ReportFormat::Text => {
            print!("Analyzing: {}... ", display_name(file));
            print!("{}", report::preprocessing_notes(&result, &options));
            match result.total_overlaps() {
                0 => println!("✓ No overlaps found"),
                n => println!("✓ {n} overlaps on {} page(s)", result.highlights().len()),
            }
            if let Some(line) = report::union_filtered_line(&result, &options) {
                println!("{line}");
            }
            if let Some(stats) = &result.stats {
                println!("{}", report::stats_block(stats, report::TOP_CHARACTERS));
            }
        }
    }
    Ok(())
}

fn load_glyphs(file: &Path) -> Result<Vec<Glyph>, i32> {
    let text = std::fs::read_to_string(file).map_err(|e| {
        eprintln!("Error: cannot read {}: {e}", file.display());
        1
    })?;
    serde_json::from_str(&text).map_err(|e| {
        eprintln!("Error: invalid glyph JSON in {}: {e}", file.display());
        1
    })
}
