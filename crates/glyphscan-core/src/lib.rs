//! glyphscan-core: Backend-independent overlap detection for PDF glyphs.
//!
//! This crate provides the data types ([`Glyph`], [`BBox`], [`OverlapRecord`])
//! and the detection pipeline used by glyphscan: watermark filtering,
//! per-character box trimming, page grouping, the pairwise overlap scan,
//! position labels, and character statistics. It does not read PDFs; glyphs
//! come from `glyphscan-parse` or any other extractor.

pub mod error;
pub mod geometry;
pub mod glyph;
pub mod grouping;
pub mod overlap;
pub mod position;
pub mod stats;
pub mod trim;
pub mod watermark;

pub use error::DataError;
pub use geometry::{BBox, Ctm, OverlapMetrics, Point, overlap_metrics, round2};
pub use glyph::{Glyph, PlacedGlyph};
pub use grouping::{GroupOptions, Grouping, PageGroups, group_by_page};
pub use overlap::{HighlightSet, OverlapRecord, OverlapReport, find_overlaps};
pub use position::{
    HorizontalBand, PositionLabel, VerticalBand, count_positions, position_label,
};
pub use stats::{CharacterStat, CharacterStats, character_statistics};
pub use trim::{MIN_TRIMMED_DIMENSION, TrimCategory, TrimProfile, trim_bbox, trim_profile};
pub use watermark::{WatermarkOptions, is_watermark};
