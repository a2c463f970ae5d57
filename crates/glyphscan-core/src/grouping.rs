//! Per-page glyph grouping with watermark filtering and box trimming.

use std::collections::BTreeMap;

use crate::error::DataError;
use crate::glyph::{Glyph, PlacedGlyph};
use crate::trim::trim_bbox;
use crate::watermark::{WatermarkOptions, is_watermark};

/// Glyphs keyed by 1-based page number, in ascending page order.
///
/// Within a page, glyphs keep the order in which they were extracted.
pub type PageGroups = BTreeMap<u32, Vec<PlacedGlyph>>;

/// Options controlling [`group_by_page`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GroupOptions {
    /// Drop glyphs classified as watermarks. Default: `true`.
    pub filter_watermarks: bool,
    /// Watermark classification settings.
    pub watermark: WatermarkOptions,
    /// Trim glyph boxes by character category. Default: `false`.
    pub trim_whitespace: bool,
    /// Multiplier for the trim table. Default: `1.0`.
    pub trim_scale: f64,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            filter_watermarks: true,
            watermark: WatermarkOptions::default(),
            trim_whitespace: false,
            trim_scale: 1.0,
        }
    }
}

/// Result of [`group_by_page`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grouping {
    pub pages: PageGroups,
    /// Number of glyphs dropped as watermarks.
    pub filtered: usize,
    /// Number of glyph boxes trimmed.
    pub trimmed: usize,
}

/// Group a flat glyph list by page.
///
/// Each glyph must carry a page number. Watermarks are dropped when
/// `filter_watermarks` is set, and surviving boxes are trimmed once when
/// `trim_whitespace` is set.
///
/// # Errors
///
/// Returns [`DataError::MissingPage`] for the first glyph without a page.
pub fn group_by_page(glyphs: &[Glyph], options: &GroupOptions) -> Result<Grouping, DataError> {
    let mut grouping = Grouping::default();

    for (index, glyph) in glyphs.iter().enumerate() {
        let page = glyph.page.ok_or_else(|| DataError::MissingPage {
            index,
            text: glyph.text.clone(),
        })?;

        if options.filter_watermarks && is_watermark(glyph, &options.watermark) {
            grouping.filtered += 1;
            continue;
        }

        let bbox = if options.trim_whitespace {
            grouping.trimmed += 1;
            trim_bbox(&glyph.bbox, &glyph.text, options.trim_scale)
        } else {
            glyph.bbox
        };

        grouping.pages.entry(page).or_default().push(PlacedGlyph {
            text: glyph.text.clone(),
            bbox,
        });
    }

    Ok(grouping)
}
