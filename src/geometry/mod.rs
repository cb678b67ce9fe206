//! Geometric primitives for layout analysis.
//!
//! OCR engines report every recognized text unit as a quadrilateral whose
//! "horizontal" edges are rarely exactly horizontal. The types and functions in
//! this module snap those quadrilaterals to axis-aligned boxes and compare them
//! along one axis at a time, which is what row and column detection need.
//!
//! All ratios are directional: they are measured relative to the first
//! argument, not symmetric and not intersection-over-union.

use serde::{Deserialize, Serialize};

/// Default pixel error accepted by [`aligned_with_tolerance`].
pub const DEFAULT_ALIGNMENT_ERROR: f32 = 3.0;

/// A 2D point in page pixel space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use ocr_tables::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A quadrilateral with clockwise vertices `[TL, TR, BR, BL]`.
///
/// Boxes coming from OCR may be slightly skewed; call [`rectify`] to obtain the
/// axis-aligned box covering the same extremes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundingBox {
    /// Vertices in clockwise order starting at the top-left corner.
    pub vertices: [Point; 4],
}

/// Index of the top-left vertex.
pub const TOP_LEFT: usize = 0;
/// Index of the top-right vertex.
pub const TOP_RIGHT: usize = 1;
/// Index of the bottom-right vertex.
pub const BOTTOM_RIGHT: usize = 2;
/// Index of the bottom-left vertex.
pub const BOTTOM_LEFT: usize = 3;

impl BoundingBox {
    /// Create a box from its four vertices (TL, TR, BR, BL).
    pub fn new(tl: Point, tr: Point, br: Point, bl: Point) -> Self {
        Self {
            vertices: [tl, tr, br, bl],
        }
    }

    /// Create an axis-aligned box from two corner coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use ocr_tables::geometry::BoundingBox;
    ///
    /// let bbox = BoundingBox::from_coords(10.0, 20.0, 110.0, 70.0);
    /// assert_eq!(bbox.left(), 10.0);
    /// assert_eq!(bbox.bottom(), 70.0);
    /// assert_eq!(bbox.width(), 100.0);
    /// ```
    pub fn from_coords(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        build_bounding_box(Point::new(x0, y0), Point::new(x1, y1))
    }

    /// Top-left vertex.
    pub fn top_left(&self) -> Point {
        self.vertices[TOP_LEFT]
    }

    /// Top-right vertex.
    pub fn top_right(&self) -> Point {
        self.vertices[TOP_RIGHT]
    }

    /// Bottom-right vertex.
    pub fn bottom_right(&self) -> Point {
        self.vertices[BOTTOM_RIGHT]
    }

    /// Bottom-left vertex.
    pub fn bottom_left(&self) -> Point {
        self.vertices[BOTTOM_LEFT]
    }

    /// Left edge x-coordinate of the rectified box.
    pub fn left(&self) -> f32 {
        self.top_left().x.min(self.bottom_left().x)
    }

    /// Right edge x-coordinate of the rectified box.
    pub fn right(&self) -> f32 {
        self.top_right().x.max(self.bottom_right().x)
    }

    /// Top edge y-coordinate of the rectified box.
    pub fn top(&self) -> f32 {
        self.top_left().y.min(self.top_right().y)
    }

    /// Bottom edge y-coordinate of the rectified box.
    pub fn bottom(&self) -> f32 {
        self.bottom_left().y.max(self.bottom_right().y)
    }

    /// Width measured along the top edge.
    pub fn width(&self) -> f32 {
        (self.top_right().x - self.top_left().x).abs()
    }

    /// Height measured along the left edge.
    pub fn height(&self) -> f32 {
        (self.bottom_left().y - self.top_left().y).abs()
    }

    /// Whether every edge is exactly horizontal or vertical.
    pub fn is_axis_aligned(&self) -> bool {
        let [tl, tr, br, bl] = self.vertices;
        tl.y == tr.y && bl.y == br.y && tl.x == bl.x && tr.x == br.x
    }

    /// The top edge as a [`Line`].
    pub fn top_line(&self) -> Line {
        Line::new(self.top_left().y, self.top_right().y)
    }

    /// The bottom edge as a [`Line`].
    pub fn bottom_line(&self) -> Line {
        Line::new(self.bottom_left().y, self.bottom_right().y)
    }
}

/// Snap a near-axis-aligned quadrilateral to an axis-aligned box.
///
/// Each edge takes the extreme of its two endpoints (min for top and left, max
/// for bottom and right), so the result never shrinks below the original.
///
/// # Examples
///
/// ```
/// use ocr_tables::geometry::{rectify, BoundingBox, Point};
///
/// let skewed = BoundingBox::new(
///     Point::new(10.0, 12.0),
///     Point::new(50.0, 10.0),
///     Point::new(51.0, 30.0),
///     Point::new(9.0, 31.0),
/// );
/// let rect = rectify(&skewed);
/// assert!(rect.is_axis_aligned());
/// assert_eq!(rect.top_left(), Point::new(9.0, 10.0));
/// assert_eq!(rect.bottom_right(), Point::new(51.0, 31.0));
/// ```
pub fn rectify(bbox: &BoundingBox) -> BoundingBox {
    let mut v = bbox.vertices;

    if v[TOP_LEFT].y != v[TOP_RIGHT].y {
        let y = v[TOP_LEFT].y.min(v[TOP_RIGHT].y);
        v[TOP_LEFT].y = y;
        v[TOP_RIGHT].y = y;
    }

    if v[BOTTOM_LEFT].y != v[BOTTOM_RIGHT].y {
        let y = v[BOTTOM_LEFT].y.max(v[BOTTOM_RIGHT].y);
        v[BOTTOM_LEFT].y = y;
        v[BOTTOM_RIGHT].y = y;
    }

    if v[TOP_RIGHT].x != v[BOTTOM_RIGHT].x {
        let x = v[TOP_RIGHT].x.max(v[BOTTOM_RIGHT].x);
        v[TOP_RIGHT].x = x;
        v[BOTTOM_RIGHT].x = x;
    }

    if v[TOP_LEFT].x != v[BOTTOM_LEFT].x {
        let x = v[TOP_LEFT].x.min(v[BOTTOM_LEFT].x);
        v[TOP_LEFT].x = x;
        v[BOTTOM_LEFT].x = x;
    }

    BoundingBox { vertices: v }
}

/// Combine two boxes vertex by vertex into the box covering both.
///
/// # Examples
///
/// ```
/// use ocr_tables::geometry::{union, BoundingBox};
///
/// let a = BoundingBox::from_coords(0.0, 0.0, 50.0, 50.0);
/// let b = BoundingBox::from_coords(25.0, 25.0, 75.0, 75.0);
/// let u = union(&a, &b);
///
/// assert_eq!(u, BoundingBox::from_coords(0.0, 0.0, 75.0, 75.0));
/// ```
pub fn union(a: &BoundingBox, b: &BoundingBox) -> BoundingBox {
    let [a_tl, a_tr, a_br, a_bl] = a.vertices;
    let [b_tl, b_tr, b_br, b_bl] = b.vertices;

    BoundingBox::new(
        Point::new(a_tl.x.min(b_tl.x), a_tl.y.min(b_tl.y)),
        Point::new(a_tr.x.max(b_tr.x), a_tr.y.min(b_tr.y)),
        Point::new(a_br.x.max(b_br.x), a_br.y.max(b_br.y)),
        Point::new(a_bl.x.min(b_bl.x), a_bl.y.max(b_bl.y)),
    )
}

/// Merge a sequence of boxes into one overall bounds.
///
/// Returns `None` for an empty sequence.
pub fn bounds_of<'a, I>(boxes: I) -> Option<BoundingBox>
where
    I: IntoIterator<Item = &'a BoundingBox>,
{
    boxes.into_iter().fold(None, |acc, bbox| match acc {
        None => Some(*bbox),
        Some(current) => Some(union(&current, bbox)),
    })
}

/// Build the canonical box spanning from `begin` (top-left) to `end`
/// (bottom-right).
pub fn build_bounding_box(begin: Point, end: Point) -> BoundingBox {
    BoundingBox::new(
        Point::new(begin.x, begin.y),
        Point::new(end.x, begin.y),
        Point::new(end.x, end.y),
        Point::new(begin.x, end.y),
    )
}

/// Overlap of segment A = `[a0, a1]` against segment B = `[b0, b1]`, relative to
/// A's own length.
///
/// Returns 0 when the segments are disjoint or only touch, 1 when they are
/// identical or one contains the other, and otherwise the overlap length divided
/// by `a1 - a0`.
///
/// # Examples
///
/// ```
/// use ocr_tables::geometry::segment_overlap_ratio;
///
/// assert_eq!(segment_overlap_ratio(0.0, 10.0, 5.0, 15.0), 0.5);
/// assert_eq!(segment_overlap_ratio(0.0, 10.0, -5.0, 5.0), 0.5);
/// assert_eq!(segment_overlap_ratio(0.0, 10.0, 2.0, 8.0), 1.0);
/// assert_eq!(segment_overlap_ratio(0.0, 5.0, 10.0, 15.0), 0.0);
/// ```
pub fn segment_overlap_ratio(a0: f32, a1: f32, b0: f32, b1: f32) -> f32 {
    if a1 < b0 || b1 < a0 {
        return 0.0;
    }

    if a0 == b0 && a1 == b1 {
        return 1.0;
    }

    if (a0 <= b0 && a1 >= b1) || (a0 >= b0 && a1 <= b1) {
        return 1.0;
    }

    // B starts to the left of A
    if b0 < a0 && a0 <= b1 && b1 < a1 {
        return (b1 - a0) / (a1 - a0);
    }

    // A starts to the left of B
    if a0 < b0 && b0 <= a1 && a1 < b1 {
        return (a1 - b0) / (a1 - a0);
    }

    0.0
}

/// How much the rows of two boxes overlap: the segment ratio of their rectified
/// y-extents, relative to `a`.
pub fn horizontal_overlap_ratio(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let a = rectify(a);
    let b = rectify(b);
    segment_overlap_ratio(
        a.top_left().y,
        a.bottom_left().y,
        b.top_left().y,
        b.bottom_left().y,
    )
}

/// How much the columns of two boxes overlap: the segment ratio of their
/// rectified x-extents, relative to `a`.
pub fn vertical_overlap_ratio(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let a = rectify(a);
    let b = rectify(b);
    segment_overlap_ratio(
        a.top_left().x,
        a.top_right().x,
        b.top_left().x,
        b.top_right().x,
    )
}

/// 1 when both directional ratios are exactly 1 (one box covers the other on
/// both axes), 0 otherwise.
///
/// # Examples
///
/// ```
/// use ocr_tables::geometry::{intersection_ratio, BoundingBox};
///
/// let page = BoundingBox::from_coords(0.0, 0.0, 100.0, 100.0);
/// let inside = BoundingBox::from_coords(10.0, 10.0, 20.0, 20.0);
/// let straddling = BoundingBox::from_coords(90.0, 10.0, 120.0, 20.0);
///
/// assert_eq!(intersection_ratio(&page, &inside), 1.0);
/// assert_eq!(intersection_ratio(&page, &straddling), 0.0);
/// ```
pub fn intersection_ratio(a: &BoundingBox, b: &BoundingBox) -> f32 {
    if horizontal_overlap_ratio(a, b) == 1.0 && vertical_overlap_ratio(a, b) == 1.0 {
        1.0
    } else {
        0.0
    }
}

/// A nominally horizontal edge given by the y of its two endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// Y at the left endpoint
    pub y1: f32,
    /// Y at the right endpoint
    pub y2: f32,
}

impl Line {
    /// Create a new line from its endpoint y values.
    pub fn new(y1: f32, y2: f32) -> Self {
        Self { y1, y2 }
    }

    /// Rounded midpoint of the line.
    fn midpoint(&self) -> f32 {
        if self.y1 != self.y2 {
            ((self.y1 + self.y2) / 2.0).round()
        } else {
            self.y1
        }
    }

    /// Rounded vertical skew of the line.
    fn skew(&self) -> f32 {
        (self.y1 - self.y2).abs().round()
    }
}

/// Whether two lines sit at the same height, within `err` pixels.
///
/// The accepted error grows to the skew of either line, so a slanted OCR edge
/// is never stricter than its own slant.
///
/// # Examples
///
/// ```
/// use ocr_tables::geometry::{aligned_with_tolerance, Line};
///
/// let a = Line::new(100.0, 100.0);
/// assert!(aligned_with_tolerance(&a, &Line::new(102.0, 102.0), 3.0));
/// assert!(!aligned_with_tolerance(&a, &Line::new(104.0, 104.0), 3.0));
/// // a slanted line widens the tolerance to its own skew
/// assert!(aligned_with_tolerance(&Line::new(96.0, 108.0), &Line::new(108.0, 108.0), 3.0));
/// ```
pub fn aligned_with_tolerance(a: &Line, b: &Line, err: f32) -> bool {
    let tolerance = err.max(a.skew()).max(b.skew());
    let (mid_a, mid_b) = (a.midpoint(), b.midpoint());
    mid_b <= mid_a + tolerance && mid_b >= mid_a - tolerance
}

/// Which edge of two boxes [`are_aligned`] compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Compare the top edges.
    TopHorizontal,
    /// Compare the bottom edges.
    BottomHorizontal,
}

/// Whether the chosen horizontal edges of two boxes line up.
///
/// Exactly equal edges always align; otherwise the edges are compared with
/// [`aligned_with_tolerance`].
pub fn are_aligned(a: &BoundingBox, b: &BoundingBox, alignment: Alignment, err: f32) -> bool {
    if a == b {
        return true;
    }

    let (line_a, line_b) = match alignment {
        Alignment::TopHorizontal => (a.top_line(), b.top_line()),
        Alignment::BottomHorizontal => (a.bottom_line(), b.bottom_line()),
    };

    let exact = [line_a.y1, line_b.y1, line_b.y2]
        .iter()
        .all(|&y| y == line_a.y2);

    exact || aligned_with_tolerance(&line_a, &line_b, err)
}

/// Whether `first` lies entirely to the left of `second` on both edges.
pub fn contiguous(first: &BoundingBox, second: &BoundingBox) -> bool {
    first.top_right().x <= second.top_left().x && first.bottom_right().x <= second.bottom_left().x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skewed() -> BoundingBox {
        BoundingBox::new(
            Point::new(10.0, 12.0),
            Point::new(50.0, 10.0),
            Point::new(51.0, 30.0),
            Point::new(9.0, 31.0),
        )
    }

    #[test]
    fn test_point_creation() {
        let p = Point::new(10.0, 20.0);
        assert_eq!(p.x, 10.0);
        assert_eq!(p.y, 20.0);
    }

    #[test]
    fn test_build_bounding_box() {
        let bbox = build_bounding_box(Point::new(1.0, 2.0), Point::new(11.0, 22.0));
        assert_eq!(bbox.top_left(), Point::new(1.0, 2.0));
        assert_eq!(bbox.top_right(), Point::new(11.0, 2.0));
        assert_eq!(bbox.bottom_right(), Point::new(11.0, 22.0));
        assert_eq!(bbox.bottom_left(), Point::new(1.0, 22.0));
        assert!(bbox.is_axis_aligned());
    }

    #[test]
    fn test_rectify_skewed_box() {
        let rect = rectify(&skewed());
        assert!(rect.is_axis_aligned());
        assert_eq!(rect, BoundingBox::from_coords(9.0, 10.0, 51.0, 31.0));
    }

    #[test]
    fn test_rectify_aligned_box_unchanged() {
        let bbox = BoundingBox::from_coords(0.0, 0.0, 10.0, 5.0);
        assert_eq!(rectify(&bbox), bbox);
    }

    #[test]
    fn test_rectify_idempotent() {
        let once = rectify(&skewed());
        assert_eq!(rectify(&once), once);
    }

    #[test]
    fn test_accessors_use_extremes() {
        let bbox = skewed();
        assert_eq!(bbox.left(), 9.0);
        assert_eq!(bbox.right(), 51.0);
        assert_eq!(bbox.top(), 10.0);
        assert_eq!(bbox.bottom(), 31.0);
    }

    #[test]
    fn test_union_per_vertex() {
        let a = BoundingBox::from_coords(10.0, 0.0, 20.0, 10.0);
        let b = BoundingBox::from_coords(0.0, 5.0, 15.0, 30.0);
        assert_eq!(union(&a, &b), BoundingBox::from_coords(0.0, 0.0, 20.0, 30.0));
    }

    #[test]
    fn test_bounds_of_sequence() {
        let boxes = [
            BoundingBox::from_coords(10.0, 0.0, 20.0, 10.0),
            BoundingBox::from_coords(30.0, 2.0, 40.0, 12.0),
            BoundingBox::from_coords(0.0, 1.0, 5.0, 8.0),
        ];
        assert_eq!(
            bounds_of(boxes.iter()),
            Some(BoundingBox::from_coords(0.0, 0.0, 40.0, 12.0))
        );
        assert_eq!(bounds_of(std::iter::empty()), None);
    }

    #[test]
    fn test_segment_overlap_ratio_cases() {
        assert_eq!(segment_overlap_ratio(0.0, 10.0, 5.0, 15.0), 0.5);
        assert_eq!(segment_overlap_ratio(0.0, 10.0, -5.0, 5.0), 0.5);
        assert_eq!(segment_overlap_ratio(0.0, 10.0, 2.0, 8.0), 1.0);
        assert_eq!(segment_overlap_ratio(2.0, 8.0, 0.0, 10.0), 1.0);
        assert_eq!(segment_overlap_ratio(0.0, 5.0, 10.0, 15.0), 0.0);
        assert_eq!(segment_overlap_ratio(3.0, 7.0, 3.0, 7.0), 1.0);
    }

    #[test]
    fn test_segment_overlap_ratio_is_relative_to_first() {
        // overlap of 5 is half of A but a quarter of B
        assert_eq!(segment_overlap_ratio(0.0, 10.0, 5.0, 25.0), 0.5);
        assert_eq!(segment_overlap_ratio(5.0, 25.0, 0.0, 10.0), 0.25);
    }

    #[test]
    fn test_touching_segments_do_not_overlap() {
        assert_eq!(segment_overlap_ratio(0.0, 10.0, 10.0, 20.0), 0.0);
        assert_eq!(segment_overlap_ratio(10.0, 20.0, 0.0, 10.0), 0.0);
    }

    #[test]
    fn test_horizontal_and_vertical_ratios() {
        let a = BoundingBox::from_coords(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::from_coords(5.0, 5.0, 15.0, 15.0);
        assert_eq!(horizontal_overlap_ratio(&a, &b), 0.5);
        assert_eq!(vertical_overlap_ratio(&a, &b), 0.5);

        let below = BoundingBox::from_coords(0.0, 20.0, 10.0, 30.0);
        assert_eq!(horizontal_overlap_ratio(&a, &below), 0.0);
        assert_eq!(vertical_overlap_ratio(&a, &below), 1.0);
    }

    #[test]
    fn test_ratios_rectify_first() {
        let column = BoundingBox::from_coords(0.0, 0.0, 50.0, 10.0);
        // skewed right edge still falls inside after rectification
        let token = BoundingBox::new(
            Point::new(10.0, 20.0),
            Point::new(40.0, 20.0),
            Point::new(45.0, 30.0),
            Point::new(10.0, 30.0),
        );
        assert_eq!(vertical_overlap_ratio(&column, &token), 1.0);
    }

    #[test]
    fn test_intersection_ratio_duplicates() {
        let a = BoundingBox::from_coords(0.0, 0.0, 10.0, 10.0);
        assert_eq!(intersection_ratio(&a, &a), 1.0);
        let b = BoundingBox::from_coords(5.0, 0.0, 15.0, 10.0);
        assert_eq!(intersection_ratio(&a, &b), 0.0);
    }

    #[test]
    fn test_aligned_with_tolerance() {
        let a = Line::new(100.0, 100.0);
        assert!(aligned_with_tolerance(&a, &Line::new(97.0, 97.0), 3.0));
        assert!(!aligned_with_tolerance(&a, &Line::new(96.0, 96.0), 3.0));
        // tolerance grows with the skew of the second line too
        assert!(aligned_with_tolerance(&a, &Line::new(100.0, 110.0), 3.0));
    }

    #[test]
    fn test_are_aligned_bottom_edges() {
        let a = BoundingBox::from_coords(0.0, 0.0, 10.0, 20.0);
        let b = BoundingBox::from_coords(30.0, 5.0, 40.0, 21.0);
        let c = BoundingBox::from_coords(30.0, 5.0, 40.0, 40.0);
        assert!(are_aligned(&a, &b, Alignment::BottomHorizontal, DEFAULT_ALIGNMENT_ERROR));
        assert!(!are_aligned(&a, &c, Alignment::BottomHorizontal, DEFAULT_ALIGNMENT_ERROR));
        assert!(!are_aligned(&a, &b, Alignment::TopHorizontal, DEFAULT_ALIGNMENT_ERROR));
    }

    #[test]
    fn test_contiguous() {
        let a = BoundingBox::from_coords(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::from_coords(12.0, 0.0, 20.0, 10.0);
        assert!(contiguous(&a, &b));
        assert!(!contiguous(&b, &a));
    }
}
