use crate::geometry::BBox;

/// A single rendered text unit with a bounding box on one page.
///
/// With the `serde` feature, glyphs use the record layout produced by the
/// `glyphs` dump: `{"char": "A", "page": 1, "bbox": [x, y, w, h], "fontSize": 12.0}`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Glyph {
    /// The text content of this glyph (usually one character).
    #[cfg_attr(feature = "serde", serde(rename = "char"))]
    pub text: String,
    /// 1-based page number. `None` only for malformed external records.
    #[cfg_attr(feature = "serde", serde(default))]
    pub page: Option<u32>,
    /// Bounding box in bottom-left origin page coordinates.
    pub bbox: BBox,
    /// Font size in points.
    #[cfg_attr(feature = "serde", serde(rename = "fontSize", default))]
    pub font_size: f64,
}

impl Glyph {
    pub fn new(text: impl Into<String>, page: u32, bbox: BBox, font_size: f64) -> Self {
        Self {
            text: text.into(),
            page: Some(page),
            bbox,
            font_size,
        }
    }

    /// The glyph's text as a single `char`, if it is exactly one character long.
    pub fn single_char(&self) -> Option<char> {
        let mut chars = self.text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

/// A glyph after grouping: page is resolved and the box may have been trimmed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacedGlyph {
    pub text: String,
    pub bbox: BBox,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_char() {
        let g = Glyph::new("A", 1, BBox::new(0.0, 0.0, 1.0, 1.0), 12.0);
        assert_eq!(g.single_char(), Some('A'));

        let lig = Glyph::new("fi", 1, BBox::new(0.0, 0.0, 1.0, 1.0), 12.0);
        assert_eq!(lig.single_char(), None);

        let empty = Glyph::new("", 1, BBox::new(0.0, 0.0, 1.0, 1.0), 12.0);
        assert_eq!(empty.single_char(), None);
    }

    #[test]
    fn test_single_char_multibyte() {
        let g = Glyph::new("é", 2, BBox::new(0.0, 0.0, 1.0, 1.0), 12.0);
        assert_eq!(g.single_char(), Some('é'));
        assert_eq!(g.page, Some(2));
    }
}
