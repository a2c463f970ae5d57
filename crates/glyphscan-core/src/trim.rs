//! Per-character whitespace trimming of glyph bounding boxes.
//!
//! Glyph boxes reported by PDF extractors cover the full advance width and
//! font height, so neighbouring glyphs in tight kerning appear to overlap even
//! when the inked shapes do not. Shrinking each box by a character-specific
//! fraction removes most of that false signal before the overlap scan.

use crate::geometry::BBox;

/// Smallest width or height a trimmed box can have.
pub const MIN_TRIMMED_DIMENSION: f64 = 0.1;

/// Fractions of the box removed from each side, each in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrimProfile {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl TrimProfile {
    /// Profile trimming `horizontal` from left and right, `vertical` from top and bottom.
    pub fn symmetric(horizontal: f64, vertical: f64) -> Self {
        Self {
            left: horizontal,
            right: horizontal,
            top: vertical,
            bottom: vertical,
        }
    }

    /// Shrink `bbox` by this profile.
    ///
    /// `x` moves right by the left trim and `y` moves up by the bottom trim
    /// (bottom-left origin). Width and height are floored at
    /// [`MIN_TRIMMED_DIMENSION`]. Boxes without positive area are returned as-is.
    pub fn apply(&self, bbox: &BBox) -> BBox {
        if bbox.width <= 0.0 || bbox.height <= 0.0 {
            return *bbox;
        }

        let dx_left = bbox.width * self.left;
        let dx_right = bbox.width * self.right;
        let dy_top = bbox.height * self.top;
        let dy_bottom = bbox.height * self.bottom;

        BBox {
            x: bbox.x + dx_left,
            y: bbox.y + dy_bottom,
            width: (bbox.width - dx_left - dx_right).max(MIN_TRIMMED_DIMENSION),
            height: (bbox.height - dy_top - dy_bottom).max(MIN_TRIMMED_DIMENSION),
        }
    }
}

/// Character category driving the trim amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimCategory {
    NarrowPunctuation,
    ThinStem,
    Hook,
    Bracket,
    MathOperator,
    Diacritic,
    Digit,
    Letter,
    Other,
}

impl TrimCategory {
    /// Classify glyph text. Categories are checked in declaration order.
    pub fn of(text: &str) -> Self {
        if is_one_of(text, ",.;:`'\"") {
            TrimCategory::NarrowPunctuation
        } else if is_one_of(text, "il|1t") {
            TrimCategory::ThinStem
        } else if is_one_of(text, "fj") {
            TrimCategory::Hook
        } else if is_one_of(text, "()[]{}\u{201C}\u{201D}\u{2018}\u{2019}") {
            TrimCategory::Bracket
        } else if is_one_of(text, "+-=\u{00D7}\u{00F7}/*\\") {
            TrimCategory::MathOperator
        } else if is_one_of(text, "\u{02DC}^~\u{02C7}\u{02D8}\u{00A8}\u{02DA}\u{02D9}\u{02DB}\u{02DD}") {
            TrimCategory::Diacritic
        } else if all_chars(text, is_digit) {
            TrimCategory::Digit
        } else if all_chars(text, is_letter) {
            TrimCategory::Letter
        } else {
            TrimCategory::Other
        }
    }

    /// Unscaled `(left/right, top/bottom)` trim fractions.
    pub fn fractions(self) -> (f64, f64) {
        match self {
            TrimCategory::NarrowPunctuation => (0.25, 0.25),
            TrimCategory::ThinStem => (0.12, 0.18),
            TrimCategory::Hook => (0.10, 0.12),
            TrimCategory::Bracket => (0.08, 0.10),
            TrimCategory::MathOperator => (0.10, 0.10),
            TrimCategory::Diacritic => (0.20, 0.20),
            TrimCategory::Digit => (0.06, 0.08),
            TrimCategory::Letter => (0.07, 0.10),
            TrimCategory::Other => (0.05, 0.05),
        }
    }
}

/// Trim profile for a glyph's text, with every fraction multiplied by `scale`.
pub fn trim_profile(text: &str, scale: f64) -> TrimProfile {
    let (horizontal, vertical) = TrimCategory::of(text).fractions();
    TrimProfile::symmetric(horizontal * scale, vertical * scale)
}

/// Trim `bbox` using the profile for `text`.
pub fn trim_bbox(bbox: &BBox, text: &str, scale: f64) -> BBox {
    trim_profile(text, scale).apply(bbox)
}

fn is_one_of(text: &str, set: &str) -> bool {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => set.contains(c),
        _ => false,
    }
}

/// Decimal digits and their superscript/subscript forms. Fractions and
/// letter numbers (Roman numerals and the like) are not digits.
fn is_digit(c: char) -> bool {
    c.is_numeric()
        && !matches!(
            c,
            '\u{00BC}'..='\u{00BE}'
                | '\u{16EE}'..='\u{16F0}'
                | '\u{2150}'..='\u{218F}'
                | '\u{3007}'
                | '\u{3021}'..='\u{3029}'
                | '\u{3038}'..='\u{303A}'
                | '\u{10140}'..='\u{1018F}'
                | '\u{12400}'..='\u{1247F}'
        )
}

/// Alphabetic, excluding letter numbers such as Roman numerals.
fn is_letter(c: char) -> bool {
    c.is_alphabetic() && !c.is_numeric()
}

fn all_chars(text: &str, pred: fn(char) -> bool) -> bool {
    !text.is_empty() && text.chars().all(pred)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_category_table() {
        let cases = [
            (",", TrimCategory::NarrowPunctuation),
            ("\"", TrimCategory::NarrowPunctuation),
            ("'", TrimCategory::NarrowPunctuation),
            ("i", TrimCategory::ThinStem),
            ("|", TrimCategory::ThinStem),
            ("1", TrimCategory::ThinStem),
            ("f", TrimCategory::Hook),
            ("(", TrimCategory::Bracket),
            ("\u{201C}", TrimCategory::Bracket),
            ("=", TrimCategory::MathOperator),
            ("\u{00D7}", TrimCategory::MathOperator),
            ("~", TrimCategory::Diacritic),
            ("\u{02C7}", TrimCategory::Diacritic),
            ("7", TrimCategory::Digit),
            ("\u{00B2}", TrimCategory::Digit),
            ("\u{0663}", TrimCategory::Digit),
            ("\u{00BD}", TrimCategory::Other),
            ("\u{00BE}", TrimCategory::Other),
            ("\u{2163}", TrimCategory::Other),
            ("a", TrimCategory::Letter),
            ("W", TrimCategory::Letter),
            ("é", TrimCategory::Letter),
            ("@", TrimCategory::Other),
            (" ", TrimCategory::Other),
            ("", TrimCategory::Other),
        ];
        for (text, expected) in cases {
            assert_eq!(TrimCategory::of(text), expected, "text {text:?}");
        }
    }

    #[test]
    fn test_multi_char_text() {
        assert_eq!(TrimCategory::of("fi"), TrimCategory::Letter);
        assert_eq!(TrimCategory::of("42"), TrimCategory::Digit);
        assert_eq!(TrimCategory::of("a1"), TrimCategory::Other);
        assert_eq!(TrimCategory::of("1\u{00BD}"), TrimCategory::Other);
    }

    #[test]
    fn test_profile_scaled() {
        let p = trim_profile("i", 0.5);
        assert_approx(p.left, 0.06);
        assert_approx(p.right, 0.06);
        assert_approx(p.top, 0.09);
        assert_approx(p.bottom, 0.09);
    }

    #[test]
    fn test_apply_shifts_inward() {
        let bbox = BBox::new(100.0, 200.0, 10.0, 20.0);
        let trimmed = trim_bbox(&bbox, "a", 1.0);
        assert_approx(trimmed.x, 100.7);
        assert_approx(trimmed.y, 202.0);
        assert_approx(trimmed.width, 8.6);
        assert_approx(trimmed.height, 16.0);
    }

    #[test]
    fn test_apply_floors_dimensions() {
        let bbox = BBox::new(0.0, 0.0, 4.0, 4.0);
        let trimmed = trim_bbox(&bbox, ".", 2.0);
        assert_eq!(trimmed.width, MIN_TRIMMED_DIMENSION);
        assert_eq!(trimmed.height, MIN_TRIMMED_DIMENSION);
    }

    #[test]
    fn test_degenerate_box_unchanged() {
        let bbox = BBox::new(5.0, 5.0, 0.0, 10.0);
        assert_eq!(trim_bbox(&bbox, "a", 1.0), bbox);
    }

    #[test]
    fn test_trim_invariant_holds_across_table() {
        let texts = [",", "i", "f", "(", "+", "~", "3", "g", "#"];
        let boxes = [
            BBox::new(0.0, 0.0, 10.0, 10.0),
            BBox::new(72.5, 700.25, 0.3, 12.0),
            BBox::new(-5.0, -5.0, 1.0, 0.2),
        ];
        for scale in [0.0, 0.5, 1.0, 2.0, 3.5] {
            for text in texts {
                for bbox in &boxes {
                    let t = trim_bbox(bbox, text, scale);
                    assert!(t.x >= bbox.x, "{text} {scale} {bbox:?}");
                    assert!(t.y >= bbox.y, "{text} {scale} {bbox:?}");
                    assert!(t.width >= MIN_TRIMMED_DIMENSION);
                    assert!(t.height >= MIN_TRIMMED_DIMENSION);
                    if bbox.width >= MIN_TRIMMED_DIMENSION {
                        assert!(t.width <= bbox.width);
                    }
                    if bbox.height >= MIN_TRIMMED_DIMENSION {
                        assert!(t.height <= bbox.height);
                    }
                }
            }
        }
    }

    #[test]
    fn test_zero_scale_is_identity() {
        let bbox = BBox::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(trim_bbox(&bbox, "a", 0.0), bbox);
    }
}
