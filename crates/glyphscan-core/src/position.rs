//! Nine-region page position labels for human-readable summaries.

use std::collections::BTreeMap;
use std::fmt;

use crate::geometry::BBox;

/// Vertical third of the page (bottom-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VerticalBand {
    Bottom,
    Middle,
    Top,
}

/// Horizontal third of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HorizontalBand {
    Left,
    Center,
    Right,
}

impl VerticalBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerticalBand::Bottom => "bottom",
            VerticalBand::Middle => "middle",
            VerticalBand::Top => "top",
        }
    }
}

impl HorizontalBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            HorizontalBand::Left => "left",
            HorizontalBand::Center => "center",
            HorizontalBand::Right => "right",
        }
    }
}

/// One of nine page regions, displayed as `"<vertical>-<horizontal>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PositionLabel {
    pub vertical: VerticalBand,
    pub horizontal: HorizontalBand,
}

impl PositionLabel {
    /// Classify the point `(x, y)` on a page of the given size.
    ///
    /// Band boundaries sit at one and two thirds of each dimension. A value
    /// strictly below a boundary falls in the lower band; a value exactly on
    /// it falls in the higher one.
    pub fn classify(x: f64, y: f64, page_width: f64, page_height: f64) -> Self {
        let v_third = page_height / 3.0;
        let vertical = if y < v_third {
            VerticalBand::Bottom
        } else if y < 2.0 * v_third {
            VerticalBand::Middle
        } else {
            VerticalBand::Top
        };

        let h_third = page_width / 3.0;
        let horizontal = if x < h_third {
            HorizontalBand::Left
        } else if x < 2.0 * h_third {
            HorizontalBand::Center
        } else {
            HorizontalBand::Right
        };

        Self {
            vertical,
            horizontal,
        }
    }

    /// All nine labels, bottom row first.
    pub fn all() -> [PositionLabel; 9] {
        use HorizontalBand::*;
        use VerticalBand::*;
        [
            (Bottom, Left),
            (Bottom, Center),
            (Bottom, Right),
            (Middle, Left),
            (Middle, Center),
            (Middle, Right),
            (Top, Left),
            (Top, Center),
            (Top, Right),
        ]
        .map(|(vertical, horizontal)| PositionLabel {
            vertical,
            horizontal,
        })
    }
}

impl fmt::Display for PositionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.vertical.as_str(), self.horizontal.as_str())
    }
}

/// Label for a point, as a string such as `"top-right"`.
pub fn position_label(x: f64, y: f64, page_width: f64, page_height: f64) -> String {
    PositionLabel::classify(x, y, page_width, page_height).to_string()
}

/// Count boxes per region, classifying each box by its `(x, y)` corner.
pub fn count_positions(
    boxes: &[BBox],
    page_width: f64,
    page_height: f64,
) -> BTreeMap<PositionLabel, usize> {
    let mut counts = BTreeMap::new();
    for b in boxes {
        *counts
            .entry(PositionLabel::classify(b.x, b.y, page_width, page_height))
            .or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_and_center_labels() {
        assert_eq!(position_label(10.0, 10.0, 300.0, 300.0), "bottom-left");
        assert_eq!(position_label(290.0, 290.0, 300.0, 300.0), "top-right");
        assert_eq!(position_label(150.0, 150.0, 300.0, 300.0), "middle-center");
    }

    #[test]
    fn test_boundary_maps_to_higher_band() {
        assert_eq!(position_label(100.0, 100.0, 300.0, 300.0), "middle-center");
        assert_eq!(position_label(200.0, 200.0, 300.0, 300.0), "top-right");
        assert_eq!(position_label(199.99, 199.99, 300.0, 300.0), "middle-center");
    }

    #[test]
    fn test_non_square_page() {
        assert_eq!(position_label(500.0, 10.0, 612.0, 792.0), "bottom-right");
        assert_eq!(position_label(300.0, 700.0, 612.0, 792.0), "top-center");
        assert_eq!(position_label(0.0, 400.0, 612.0, 792.0), "middle-left");
    }

    #[test]
    fn test_all_labels_distinct() {
        let labels: Vec<String> = PositionLabel::all().iter().map(|l| l.to_string()).collect();
        assert_eq!(labels.len(), 9);
        assert_eq!(labels[0], "bottom-left");
        assert_eq!(labels[8], "top-right");
        let mut unique = labels.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 9);
    }

    #[test]
    fn test_count_positions() {
        let boxes = [
            BBox::new(10.0, 10.0, 5.0, 5.0),
            BBox::new(20.0, 20.0, 5.0, 5.0),
            BBox::new(290.0, 290.0, 5.0, 5.0),
        ];
        let counts = count_positions(&boxes, 300.0, 300.0);
        assert_eq!(counts.len(), 2);
        let bottom_left = PositionLabel::classify(0.0, 0.0, 300.0, 300.0);
        assert_eq!(counts[&bottom_left], 2);
    }
}
