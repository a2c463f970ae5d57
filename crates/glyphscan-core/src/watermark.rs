//! Heuristic detection of watermark glyphs.
//!
//! Proof stamps such as "UNCORRECTED PROOF" are usually set in a large font,
//! often diagonally, and their letters land on top of body text. Those glyphs
//! are dropped before the overlap scan so they do not swamp the results.

use crate::glyph::Glyph;

/// Letters that appear individually in common diagonal proof stamps.
pub const WATERMARK_LETTERS: &str = "UNCORRECTEDPROFDTALIMWY";

/// Glyphs above this size are checked against [`WATERMARK_LETTERS`].
pub const WATERMARK_LETTER_MIN_FONT_SIZE: f64 = 20.0;

/// Options for watermark classification.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WatermarkOptions {
    /// Glyphs at or above this font size are always watermarks. Default: `40.0`.
    pub font_size_threshold: f64,
    /// Whole-word stamp texts. Carried for callers that inspect them, but never
    /// matched against glyph text: classification works one glyph at a time.
    pub patterns: Vec<String>,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            font_size_threshold: 40.0,
            patterns: [
                "UNCORRECTED",
                "CORRECTED",
                "PROOF",
                "DRAFT",
                "CONFIDENTIAL",
                "PRELIMINARY",
                "WATERMARK",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Returns whether a glyph is likely part of a watermark.
///
/// True when the font size reaches `font_size_threshold`, or when the font
/// size exceeds [`WATERMARK_LETTER_MIN_FONT_SIZE`] and the glyph is a single
/// character whose uppercase form is one of [`WATERMARK_LETTERS`].
pub fn is_watermark(glyph: &Glyph, options: &WatermarkOptions) -> bool {
    if glyph.font_size >= options.font_size_threshold {
        return true;
    }

    if glyph.font_size > WATERMARK_LETTER_MIN_FONT_SIZE {
        if let Some(c) = glyph.single_char() {
            return is_watermark_letter(c);
        }
    }

    false
}

fn is_watermark_letter(c: char) -> bool {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => WATERMARK_LETTERS.contains(u),
        _ => false,
    }
}
