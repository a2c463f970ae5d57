//! Options for a scan run.

use serde::{Deserialize, Serialize};

use glyphscan_core::{GroupOptions, WatermarkOptions};

/// Settings for detection, marking, and export.
///
/// Deserializes from a partial table; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Drop watermark glyphs before the overlap scan. Default: `true`.
    pub filter_watermarks: bool,
    /// Font size at or above which any glyph is a watermark. Default: `40.0`.
    pub watermark_font_size: f64,
    /// Trim glyph boxes by character category. Default: `false`.
    pub trim_whitespace: bool,
    /// Multiplier for the trim table. Default: `1.0`.
    pub trim_scale: f64,
    /// Minimum percentage-of-union an overlap must exceed. Default: `0.0`.
    pub union_threshold: f64,
    /// A marked PDF is written only when the overlap count exceeds this.
    /// Default: `0`.
    pub overlap_threshold: usize,
    /// Draw per-region counts on marked pages. Default: `true`.
    pub add_labels: bool,
    /// Write `<stem>_overlaps.json` next to the input. Default: `false`.
    pub export_json: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            filter_watermarks: true,
            watermark_font_size: 40.0,
            trim_whitespace: false,
            trim_scale: 1.0,
            union_threshold: 0.0,
            overlap_threshold: 0,
            add_labels: true,
            export_json: false,
        }
    }
}

impl ScanOptions {
    /// The grouping stage's view of these options.
    pub fn group_options(&self) -> GroupOptions {
        GroupOptions {
            filter_watermarks: self.filter_watermarks,
            watermark: WatermarkOptions {
                font_size_threshold: self.watermark_font_size,
                ..WatermarkOptions::default()
            },
            trim_whitespace: self.trim_whitespace,
            trim_scale: self.trim_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = ScanOptions::default();
        assert!(opts.filter_watermarks);
        assert_eq!(opts.watermark_font_size, 40.0);
        assert!(!opts.trim_whitespace);
        assert_eq!(opts.trim_scale, 1.0);
        assert_eq!(opts.union_threshold, 0.0);
        assert_eq!(opts.overlap_threshold, 0);
        assert!(opts.add_labels);
        assert!(!opts.export_json);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let opts: ScanOptions =
            serde_json::from_str(r#"{"union_threshold": 12.5, "export_json": true}"#).unwrap();
        assert_eq!(opts.union_threshold, 12.5);
        assert!(opts.export_json);
        assert!(opts.filter_watermarks);
        assert_eq!(opts.trim_scale, 1.0);
    }

    #[test]
    fn group_options_carry_watermark_threshold() {
        let opts = ScanOptions {
            watermark_font_size: 30.0,
            trim_whitespace: true,
            trim_scale: 0.5,
            ..ScanOptions::default()
        };
        let group = opts.group_options();
        assert_eq!(group.watermark.font_size_threshold, 30.0);
        assert!(!group.watermark.patterns.is_empty());
        assert!(group.trim_whitespace);
        assert_eq!(group.trim_scale, 0.5);
    }
}
