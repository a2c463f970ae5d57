//! Axis-aligned rectangle primitives and overlap measurement.

/// Bounding box with bottom-left origin coordinate system.
///
/// Coordinates follow PDF user space:
/// - `x`: left edge
/// - `y`: bottom edge (y increases upward)
/// - `width`, `height`: extent to the right and upward
///
/// With the `serde` feature the box (de)serializes as a `[x, y, width, height]` array.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "[f64; 4]", into = "[f64; 4]")
)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (`x + width`).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Top edge (`y + height`).
    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether the two boxes share a region of strictly positive area.
    ///
    /// Boxes that only touch along an edge or a corner do not intersect.
    pub fn intersects(&self, other: &BBox) -> bool {
        !(self.right() <= other.x
            || other.right() <= self.x
            || self.top() <= other.y
            || other.top() <= self.y)
    }

    /// Measure how much `self` and `other` overlap.
    ///
    /// See [`overlap_metrics`].
    pub fn overlap_with(&self, other: &BBox) -> OverlapMetrics {
        overlap_metrics(self, other)
    }

    /// Bit pattern of the four fields, used for value-based deduplication.
    ///
    /// `-0.0` is folded into `0.0` so that equal boxes always share a key.
    pub(crate) fn key(&self) -> [u64; 4] {
        [
            (self.x + 0.0).to_bits(),
            (self.y + 0.0).to_bits(),
            (self.width + 0.0).to_bits(),
            (self.height + 0.0).to_bits(),
        ]
    }
}

impl From<[f64; 4]> for BBox {
    fn from([x, y, width, height]: [f64; 4]) -> Self {
        BBox::new(x, y, width, height)
    }
}

impl From<BBox> for [f64; 4] {
    fn from(b: BBox) -> Self {
        [b.x, b.y, b.width, b.height]
    }
}

/// Overlap between two boxes, all values rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlapMetrics {
    /// Area of the intersection rectangle.
    pub overlap_area: f64,
    /// Intersection area as a percentage of the first box.
    pub percentage_of_a: f64,
    /// Intersection area as a percentage of the second box.
    pub percentage_of_b: f64,
    /// Intersection area as a percentage of the union of both boxes.
    pub percentage_of_union: f64,
}

/// Intersection-based overlap metrics for a pair of boxes.
///
/// The intersection rectangle is built from the max of the left/bottom edges
/// and the min of the right/top edges. If it is inverted on either axis the
/// result is all zeros. Percentages against a zero area are reported as 0.
pub fn overlap_metrics(a: &BBox, b: &BBox) -> OverlapMetrics {
    let x_left = a.x.max(b.x);
    let y_bottom = a.y.max(b.y);
    let x_right = a.right().min(b.right());
    let y_top = a.top().min(b.top());

    if x_right < x_left || y_top < y_bottom {
        return OverlapMetrics::default();
    }

    let overlap_area = (x_right - x_left) * (y_top - y_bottom);
    let area_a = a.area();
    let area_b = b.area();
    let union_area = area_a + area_b - overlap_area;

    OverlapMetrics {
        overlap_area: round2(overlap_area),
        percentage_of_a: round2(percentage(overlap_area, area_a)),
        percentage_of_b: round2(percentage(overlap_area, area_b)),
        percentage_of_union: round2(percentage(overlap_area, union_area)),
    }
}

fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Affine transformation matrix `[a, b, c, d, e, f]`.
///
/// Maps `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`, the PDF convention
/// for the CTM and text matrices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ctm {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Ctm {
    fn default() -> Self {
        Self::identity()
    }
}

impl Ctm {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Translation-only matrix.
    pub fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self × other`: apply `self` first, then `other`.
    pub fn concat(&self, other: &Ctm) -> Ctm {
        Ctm {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn transform_point(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }
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
    fn test_bbox_edges() {
        let b = BBox::new(10.0, 20.0, 5.0, 8.0);
        assert_eq!(b.right(), 15.0);
        assert_eq!(b.top(), 28.0);
        assert_eq!(b.area(), 40.0);
    }

    #[test]
    fn test_intersects_overlapping() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let right = BBox::new(10.0, 0.0, 10.0, 10.0);
        let above = BBox::new(0.0, 10.0, 10.0, 10.0);
        let corner = BBox::new(10.0, 10.0, 5.0, 5.0);
        assert!(!a.intersects(&right));
        assert!(!a.intersects(&above));
        assert!(!a.intersects(&corner));
    }

    #[test]
    fn test_intersects_is_symmetric() {
        let boxes = [
            BBox::new(0.0, 0.0, 10.0, 10.0),
            BBox::new(9.5, 2.0, 3.0, 3.0),
            BBox::new(-4.0, -4.0, 4.0, 4.0),
            BBox::new(2.0, 2.0, 1.0, 1.0),
            BBox::new(20.0, 20.0, 1.0, 1.0),
        ];
        for a in &boxes {
            for b in &boxes {
                assert_eq!(a.intersects(b), b.intersects(a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_metrics_partial_overlap() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(5.0, 5.0, 10.0, 10.0);
        let m = overlap_metrics(&a, &b);
        assert_approx(m.overlap_area, 25.0);
        assert_approx(m.percentage_of_a, 25.0);
        assert_approx(m.percentage_of_b, 25.0);
        assert_approx(m.percentage_of_union, 14.29);
    }

    #[test]
    fn test_metrics_identical_boxes() {
        let a = BBox::new(3.0, 4.0, 7.0, 9.0);
        let m = overlap_metrics(&a, &a);
        assert_approx(m.percentage_of_a, 100.0);
        assert_approx(m.percentage_of_b, 100.0);
        assert_approx(m.percentage_of_union, 100.0);
        assert_approx(m.overlap_area, 63.0);
    }

    #[test]
    fn test_metrics_disjoint_boxes() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(50.0, 50.0, 10.0, 10.0);
        assert_eq!(overlap_metrics(&a, &b), OverlapMetrics::default());
    }

    #[test]
    fn test_metrics_contained_box() {
        let outer = BBox::new(0.0, 0.0, 10.0, 10.0);
        let inner = BBox::new(2.0, 2.0, 5.0, 5.0);
        let m = outer.overlap_with(&inner);
        assert_approx(m.overlap_area, 25.0);
        assert_approx(m.percentage_of_a, 25.0);
        assert_approx(m.percentage_of_b, 100.0);
        assert_approx(m.percentage_of_union, 25.0);
    }

    #[test]
    fn test_metrics_zero_area_guarded() {
        let flat = BBox::new(0.0, 0.0, 10.0, 0.0);
        let m = overlap_metrics(&flat, &flat);
        assert_eq!(m.overlap_area, 0.0);
        assert_eq!(m.percentage_of_a, 0.0);
        assert_eq!(m.percentage_of_union, 0.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(14.285714), 14.29);
        assert_eq!(round2(0.004), 0.0);
        assert_eq!(round2(100.0), 100.0);
    }

    #[test]
    fn test_key_folds_negative_zero() {
        let a = BBox::new(0.0, 1.0, 2.0, 3.0);
        let b = BBox::new(-0.0, 1.0, 2.0, 3.0);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_ctm_concat_and_transform() {
        let scale = Ctm::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let shift = Ctm::translate(10.0, 5.0);
        let m = scale.concat(&shift);
        let p = m.transform_point(Point::new(1.0, 1.0));
        assert_approx(p.x, 12.0);
        assert_approx(p.y, 7.0);
    }

    #[test]
    fn test_ctm_identity_default() {
        assert_eq!(Ctm::default(), Ctm::identity());
        let p = Ctm::identity().transform_point(Point::new(3.0, 4.0));
        assert_eq!(p, Point::new(3.0, 4.0));
    }
}
