//! Console text for scan and analyze results.

use std::fmt::Write;

use glyphscan::glyphscan_core::CharacterStats;
use glyphscan::{Detection, DocumentReport, ScanOptions};

use crate::shared::display_name;

/// Number of characters listed in the statistics block.
pub const TOP_CHARACTERS: usize = 10;

const RULE_WIDTH: usize = 70;

/// The line printed before any document is processed.
pub fn header(count: usize, options: &ScanOptions) -> String {
    let mut line = format!(
        "Processing {count} PDF(s)... (watermark filtering: {}",
        if options.filter_watermarks { "enabled" } else { "disabled" }
    );
    if options.overlap_threshold > 0 {
        let _ = write!(line, " | threshold: >{}", options.overlap_threshold);
    }
    if options.union_threshold > 0.0 {
        let _ = write!(line, " | union-threshold: >{}%", options.union_threshold);
    }
    if options.export_json {
        line.push_str(" | JSON export: on");
    }
    line.push(')');
    line
}

/// Notes on glyphs dropped or trimmed before the scan, or `""` if none.
pub fn preprocessing_notes(detection: &Detection, options: &ScanOptions) -> String {
    let mut notes = String::new();
    if options.filter_watermarks && detection.watermarks_filtered > 0 {
        let _ = write!(
            notes,
            "  (Filtered {} watermark glyphs) ",
            detection.watermarks_filtered
        );
    }
    if options.trim_whitespace && detection.boxes_trimmed > 0 {
        let _ = write!(notes, "  (Trimmed {} glyph boxes) ", detection.boxes_trimmed);
    }
    notes
}

/// The result line for one scanned document.
pub fn document_line(report: &DocumentReport, options: &ScanOptions) -> String {
    let total = report.total_overlaps();
    if total == 0 {
        return "✓ No overlaps found".to_string();
    }

    let mut outputs = Vec::new();
    match &report.marked_path {
        Some(path) => outputs.push(format!("marked: {}", display_name(path))),
        None => outputs.push(format!(
            "not marked (threshold: {total}<={})",
            options.overlap_threshold
        )),
    }
    if let Some(path) = &report.json_path {
        outputs.push(format!("JSON: {}", display_name(path)));
    }
    format!("✓ {total} overlaps | {}", outputs.join(" | "))
}

/// The count of pairs rejected by the union threshold, when there is one to report.
pub fn union_filtered_line(detection: &Detection, options: &ScanOptions) -> Option<String> {
    (options.union_threshold > 0.0 && detection.union_filtered() > 0).then(|| {
        format!(
            "    (Filtered {} overlaps below union threshold {}%)",
            detection.union_filtered(),
            options.union_threshold
        )
    })
}

/// The character statistics block, starting with a blank line.
pub fn stats_block(stats: &CharacterStats, top_n: usize) -> String {
    if stats.is_empty() {
        return String::new();
    }

    let top = stats.top(top_n);
    let mut out = String::new();
    let _ = writeln!(out, "\n  Character Overlap Statistics:");
    let _ = writeln!(out, "  ├─ Total unique characters: {}", stats.total_unique_chars);
    let _ = writeln!(
        out,
        "  ├─ Total character occurrences: {}",
        stats.total_character_occurrences
    );
    let _ = write!(out, "  └─ Top {} most frequent:", top.len());

    for (i, stat) in top.iter().enumerate() {
        let shown = if stat.character == " " {
            "<space>"
        } else {
            stat.character.as_str()
        };
        let bar = "█".repeat((stat.percentage / 2.0) as usize);
        let _ = write!(
            out,
            "\n     {:2}. '{}': {:3} ({:5.2}%) {}",
            i + 1,
            shown,
            stat.overlap_count,
            stat.percentage,
            bar
        );
    }
    out
}

/// Batch summary, printed when more than one document was processed.
pub fn summary(processed: usize, marked: usize, exported: usize) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = format!("\n{rule}\nSummary: {processed} PDF(s) processed");
    if marked > 0 {
        let _ = write!(out, "\n  • {marked} marked PDF(s) created");
    }
    if exported > 0 {
        let _ = write!(out, "\n  • {exported} JSON file(s) exported");
    }
    let _ = write!(out, "\n{rule}");
    out
}
