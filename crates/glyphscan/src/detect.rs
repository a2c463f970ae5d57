//! The detection pipeline: group, scan for overlaps, summarize.

use std::collections::BTreeMap;

use glyphscan_core::{
    CharacterStats, DataError, Glyph, HighlightSet, OverlapRecord, OverlapReport,
    character_statistics, find_overlaps, group_by_page,
};

use crate::options::ScanOptions;

/// Everything detection learned about one glyph list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    /// Glyphs dropped as watermarks.
    pub watermarks_filtered: usize,
    /// Glyph boxes trimmed before the scan.
    pub boxes_trimmed: usize,
    pub report: OverlapReport,
    /// Present only when at least one overlap was kept.
    pub stats: Option<CharacterStats>,
}

impl Detection {
    pub fn total_overlaps(&self) -> usize {
        self.report.total()
    }

    pub fn overlaps(&self) -> &[OverlapRecord] {
        &self.report.overlaps
    }

    pub fn highlights(&self) -> &BTreeMap<u32, HighlightSet> {
        &self.report.highlights
    }

    /// Intersecting pairs rejected by the union threshold.
    pub fn union_filtered(&self) -> usize {
        self.report.filtered
    }
}

/// Run grouping, the overlap scan, and statistics over `glyphs`.
///
/// # Errors
///
/// Returns [`DataError`] if a glyph has no page number.
pub fn detect(glyphs: &[Glyph], options: &ScanOptions) -> Result<Detection, DataError> {
    let grouping = group_by_page(glyphs, &options.group_options())?;
    let report = find_overlaps(&grouping.pages, options.union_threshold);
    let stats = (report.total() > 0).then(|| character_statistics(&report.overlaps));

    tracing::debug!(
        glyphs = glyphs.len(),
        pages = grouping.pages.len(),
        watermarks = grouping.filtered,
        overlaps = report.total(),
        below_threshold = report.filtered,
        "detection finished"
    );

    Ok(Detection {
        watermarks_filtered: grouping.filtered,
        boxes_trimmed: grouping.trimmed,
        report,
        stats,
    })
}
