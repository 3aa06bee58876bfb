//! Geometric primitives for layout reconstruction.
//!
//! This module provides the basic types and operations used throughout the
//! grid, zone and table algorithms. All coordinates are raster pixels with the
//! origin at the top-left corner of the page; y grows downward.

use serde::{Deserialize, Serialize};

/// A 2D point in page space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
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
    /// use scan_oxide::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Round to integer pixel coordinates.
    ///
    /// Used for intersection-set membership, where detected crossings and
    /// expected crossings must land on the same key despite sub-pixel noise.
    pub fn rounded(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

/// A rectangle in page space (top-left anchored).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// X coordinate of top-left corner
    pub x: f32,
    /// Y coordinate of top-left corner
    pub y: f32,
    /// Width of rectangle
    pub width: f32,
    /// Height of rectangle
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from position and dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use scan_oxide::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from two corner points.
    ///
    /// # Examples
    ///
    /// ```
    /// use scan_oxide::geometry::Rect;
    ///
    /// let rect = Rect::from_points(10.0, 20.0, 110.0, 70.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn from_points(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    /// Get the left edge x-coordinate.
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the top edge y-coordinate.
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Get the bottom edge y-coordinate.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Get the center point of the rectangle.
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Check if this rectangle intersects with another.
    ///
    /// # Examples
    ///
    /// ```
    /// use scan_oxide::geometry::Rect;
    ///
    /// let r1 = Rect::new(0.0, 0.0, 100.0, 100.0);
    /// let r2 = Rect::new(50.0, 50.0, 100.0, 100.0);
    /// let r3 = Rect::new(200.0, 200.0, 100.0, 100.0);
    ///
    /// assert!(r1.intersects(&r2));
    /// assert!(!r1.intersects(&r3));
    /// ```
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Check if this rectangle contains a point (edges inclusive).
    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Check if this rectangle contains a point strictly inside its edges.
    ///
    /// Border trimming relies on this: a line lying exactly on the current
    /// content box edge is not "inside" it, which makes re-trimming a no-op.
    pub fn contains_point_strict(&self, p: &Point) -> bool {
        p.x > self.left() && p.x < self.right() && p.y > self.top() && p.y < self.bottom()
    }

    /// Compute the union of this rectangle with another.
    ///
    /// Returns the smallest rectangle that contains both rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        let x0 = self.left().min(other.left());
        let y0 = self.top().min(other.top());
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Rect::from_points(x0, y0, x1, y1)
    }

    /// Compute the overlapping region with another rectangle, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use scan_oxide::geometry::Rect;
    ///
    /// let r1 = Rect::new(0.0, 0.0, 100.0, 100.0);
    /// let r2 = Rect::new(50.0, 50.0, 100.0, 100.0);
    /// let overlap = r1.intersection(&r2).unwrap();
    ///
    /// assert_eq!(overlap, Rect::new(50.0, 50.0, 50.0, 50.0));
    /// assert!(r1.intersection(&Rect::new(200.0, 0.0, 10.0, 10.0)).is_none());
    /// ```
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let x0 = self.left().max(other.left());
        let y0 = self.top().max(other.top());
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        Some(Rect::from_points(x0, y0, x1, y1))
    }

    /// Compute the area of the rectangle.
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Compute intersection-over-union with another rectangle.
    ///
    /// Returns a value in [0, 1]; 0 for disjoint rectangles, 1 for identical
    /// ones. Degenerate (zero-area) inputs yield 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use scan_oxide::geometry::Rect;
    ///
    /// let r = Rect::new(0.0, 0.0, 100.0, 100.0);
    /// assert_eq!(r.iou(&r), 1.0);
    /// assert_eq!(r.iou(&Rect::new(200.0, 0.0, 100.0, 100.0)), 0.0);
    /// ```
    pub fn iou(&self, other: &Rect) -> f32 {
        let overlap = match self.intersection(other) {
            Some(r) => r.area(),
            None => return 0.0,
        };
        let union = self.area() + other.area() - overlap;
        if union <= 0.0 {
            0.0
        } else {
            overlap / union
        }
    }

    /// Clip this rectangle to the given bounds.
    ///
    /// Returns `None` when nothing of the rectangle survives.
    pub fn clip(&self, bounds: &Rect) -> Option<Rect> {
        self.intersection(bounds)
    }
}

/// Orientation of a detected line segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Predominantly left-to-right
    Horizontal,
    /// Predominantly top-to-bottom
    Vertical,
}

impl Orientation {
    /// True for [`Orientation::Horizontal`].
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Orientation::Horizontal)
    }
}

/// A detected line segment.
///
/// Produced by the external line-detection engine (or the degraded-mode
/// generator) and consumed read-only by all grouping logic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    /// First endpoint
    pub start: Point,
    /// Second endpoint
    pub end: Point,
    /// Detector confidence in [0, 1]
    pub confidence: f32,
}

impl LineSegment {
    /// Create a segment from endpoint coordinates.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32, confidence: f32) -> Self {
        Self {
            start: Point::new(x0, y0),
            end: Point::new(x1, y1),
            confidence,
        }
    }

    /// Orientation derived from the relative endpoint deltas.
    ///
    /// A segment whose horizontal extent dominates (or equals) its vertical
    /// extent is horizontal; otherwise vertical. Scanner skew keeps real
    /// rulings a few degrees off axis, so the classification is by dominance,
    /// not exact axis alignment.
    pub fn orientation(&self) -> Orientation {
        let dx = (self.end.x - self.start.x).abs();
        let dy = (self.end.y - self.start.y).abs();
        if dx >= dy {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }

    /// Segment length.
    pub fn length(&self) -> f32 {
        euclidean_distance(&self.start, &self.end)
    }

    /// Angle against the x-axis in degrees, normalized to [0, 180).
    pub fn angle(&self) -> f32 {
        let dy = self.end.y - self.start.y;
        let dx = self.end.x - self.start.x;
        let deg = dy.atan2(dx).to_degrees();
        ((deg % 180.0) + 180.0) % 180.0
    }

    /// Reference coordinate used for grouping: mean y for horizontal
    /// segments, mean x for vertical ones.
    pub fn position(&self) -> f32 {
        match self.orientation() {
            Orientation::Horizontal => (self.start.y + self.end.y) / 2.0,
            Orientation::Vertical => (self.start.x + self.end.x) / 2.0,
        }
    }

    /// Extent along the segment's own axis as `(lo, hi)`: the x-range for
    /// horizontal segments, the y-range for vertical ones.
    pub fn extent(&self) -> (f32, f32) {
        match self.orientation() {
            Orientation::Horizontal => (
                self.start.x.min(self.end.x),
                self.start.x.max(self.end.x),
            ),
            Orientation::Vertical => (
                self.start.y.min(self.end.y),
                self.start.y.max(self.end.y),
            ),
        }
    }

    /// Tight bounding box of the segment.
    pub fn bbox(&self) -> Rect {
        Rect::from_points(
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
        )
    }

    /// Midpoint of the segment.
    pub fn midpoint(&self) -> Point {
        Point::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }
}

/// Axis-aligned crossing test between a horizontal and a vertical segment.
///
/// Returns the crossing point when the vertical segment's position falls
/// inside the horizontal's extent and vice versa, both widened by `tolerance`
/// pixels. Returns `None` when the orientations are not horizontal/vertical
/// respectively.
///
/// # Examples
///
/// ```
/// use scan_oxide::geometry::{segment_crossing, LineSegment};
///
/// let h = LineSegment::new(0.0, 50.0, 200.0, 50.0, 1.0);
/// let v = LineSegment::new(100.0, 0.0, 100.0, 120.0, 1.0);
///
/// let p = segment_crossing(&h, &v, 2.0).unwrap();
/// assert_eq!(p.x, 100.0);
/// assert_eq!(p.y, 50.0);
/// ```
pub fn segment_crossing(h: &LineSegment, v: &LineSegment, tolerance: f32) -> Option<Point> {
    if !h.orientation().is_horizontal() || v.orientation().is_horizontal() {
        return None;
    }
    let x = v.position();
    let y = h.position();
    let (hx0, hx1) = h.extent();
    let (vy0, vy1) = v.extent();
    if x >= hx0 - tolerance && x <= hx1 + tolerance && y >= vy0 - tolerance && y <= vy1 + tolerance
    {
        Some(Point::new(x, y))
    } else {
        None
    }
}

/// Compute the Euclidean distance between two points.
///
/// # Examples
///
/// ```
/// use scan_oxide::geometry::{euclidean_distance, Point};
///
/// let p1 = Point::new(0.0, 0.0);
/// let p2 = Point::new(3.0, 4.0);
///
/// assert_eq!(euclidean_distance(&p1, &p2), 5.0);
/// ```
pub fn euclidean_distance(p1: &Point, p2: &Point) -> f32 {
    ((p2.x - p1.x).powi(2) + (p2.y - p1.y).powi(2)).sqrt()
}
