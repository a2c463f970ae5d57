//! Pairwise overlap scan over grouped glyphs.
//!
//! Every unordered pair of glyphs on a page is compared exactly once. There is
//! no spatial index: per-page glyph counts in typeset documents are small
//! enough for the quadratic scan.

use std::collections::{BTreeMap, HashSet};

use crate::geometry::{BBox, OverlapMetrics};
use crate::grouping::PageGroups;

/// A pair of glyphs on one page whose overlap exceeded the threshold.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlapRecord {
    /// 1-based page number.
    pub page: u32,
    /// Box of the glyph that came first in extraction order.
    pub a: BBox,
    /// Box of the glyph that came second.
    pub b: BBox,
    pub char_a: String,
    pub char_b: String,
    /// Full overlap metrics for the pair.
    pub metrics: OverlapMetrics,
}

impl OverlapRecord {
    /// Intersection area as a percentage of the union of both boxes.
    pub fn percentage_of_union(&self) -> f64 {
        self.metrics.percentage_of_union
    }
}

/// Unique boxes on a page that take part in at least one kept overlap.
///
/// Boxes are deduplicated by value and kept in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightSet {
    boxes: Vec<BBox>,
    seen: HashSet<[u64; 4]>,
}

impl HighlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a box. Returns `false` if an equal box was already present.
    pub fn insert(&mut self, bbox: BBox) -> bool {
        if self.seen.insert(bbox.key()) {
            self.boxes.push(bbox);
            true
        } else {
            false
        }
    }

    pub fn boxes(&self) -> &[BBox] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

/// Result of [`find_overlaps`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlapReport {
    /// Kept overlaps in scan order.
    pub overlaps: Vec<OverlapRecord>,
    /// Highlight sets for pages with at least one kept overlap.
    pub highlights: BTreeMap<u32, HighlightSet>,
    /// Intersecting pairs rejected by the threshold.
    pub filtered: usize,
}

impl OverlapReport {
    /// Number of kept overlaps.
    pub fn total(&self) -> usize {
        self.overlaps.len()
    }
}

/// Scan every page for intersecting glyph pairs.
///
/// A pair is kept only when its percentage-of-union is strictly greater than
/// `union_threshold` (so a threshold of `0.0` keeps any intersection that
/// rounds to a nonzero percentage). Intersecting pairs at or below the
/// threshold are counted in [`OverlapReport::filtered`].
pub fn find_overlaps(pages: &PageGroups, union_threshold: f64) -> OverlapReport {
    let mut report = OverlapReport::default();

    for (&page, glyphs) in pages {
        let mut highlights = HighlightSet::new();

        for (i, gi) in glyphs.iter().enumerate() {
            for gj in &glyphs[i + 1..] {
                if !gi.bbox.intersects(&gj.bbox) {
                    continue;
                }

                let metrics = gi.bbox.overlap_with(&gj.bbox);
                if metrics.percentage_of_union > union_threshold {
                    highlights.insert(gi.bbox);
                    highlights.insert(gj.bbox);
                    report.overlaps.push(OverlapRecord {
                        page,
                        a: gi.bbox,
                        b: gj.bbox,
                        char_a: gi.text.clone(),
                        char_b: gj.text.clone(),
                        metrics,
                    });
                } else {
                    report.filtered += 1;
                }
            }
        }

        if !highlights.is_empty() {
            report.highlights.insert(page, highlights);
        }
    }

    report
}
