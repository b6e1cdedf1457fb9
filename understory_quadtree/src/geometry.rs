// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry primitives and the boundary predicate used for pruning and queries.
//!
//! Coordinates are `f64` and use screen orientation: `x` grows to the right and
//! `y` grows downward. A [`Rect`] covers the closed region
//! `[x, x + width] × [y, y + height]`.
//!
//! All predicates assume finite inputs. Use [`Rect::validate`] and
//! [`Circle::validate`] to check caller-supplied geometry; the tree does this for
//! you on construction and insertion.

use core::fmt;

/// A location in the plane.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate (grows downward).
    pub y: f64,
}

impl Point {
    /// Create a point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle given by its top-left corner and extent.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent. Zero is allowed and yields a degenerate rectangle.
    pub width: f64,
    /// Vertical extent. Zero is allowed and yields a degenerate rectangle.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from its top-left corner and extent.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The unit-sized bound used when a point is inserted on its own.
    #[inline]
    pub const fn from_point(point: Point) -> Self {
        Self::new(point.x, point.y, 1.0, 1.0)
    }

    /// Right edge.
    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Split into four equal quadrants, in [`Corner`](crate::Corner) order.
    pub(crate) fn quarters(&self) -> [Self; 4] {
        let w = self.width * 0.5;
        let h = self.height * 0.5;
        [
            Self::new(self.x, self.y, w, h),
            Self::new(self.x + w, self.y, w, h),
            Self::new(self.x, self.y + h, w, h),
            Self::new(self.x + w, self.y + h, w, h),
        ]
    }

    /// Check that all coordinates are finite and the extent is non-negative.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if !(self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite())
        {
            return Err(GeometryError::NonFinite);
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(GeometryError::NegativeExtent);
        }
        Ok(())
    }
}

/// Circle given by its center and radius.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Circle {
    /// Center, horizontal coordinate.
    pub x: f64,
    /// Center, vertical coordinate.
    pub y: f64,
    /// Radius.
    pub radius: f64,
}

impl Circle {
    /// Create a circle from its center and radius.
    #[inline]
    pub const fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }

    /// Check that all coordinates are finite and the radius is non-negative.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if !(self.x.is_finite() && self.y.is_finite() && self.radius.is_finite()) {
            return Err(GeometryError::NonFinite);
        }
        if self.radius < 0.0 {
            return Err(GeometryError::NegativeExtent);
        }
        Ok(())
    }
}

/// Reason a piece of geometry was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeometryError {
    /// A coordinate, extent, or radius was NaN or infinite.
    NonFinite,
    /// A width, height, or radius was negative.
    NegativeExtent,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite => f.write_str("geometry has a non-finite coordinate"),
            Self::NegativeExtent => f.write_str("geometry has a negative extent"),
        }
    }
}

impl core::error::Error for GeometryError {}

/// Boundary predicate evaluated against axis-aligned rectangles.
///
/// The tree uses [`Boundary::intersects`] to prune quadrants and filter elements,
/// and [`Boundary::contains`] to accept every element held by a quadrant that the
/// shape fully covers.
///
/// Implementations must be conservative in one direction: `contains(r)` must imply
/// `intersects(r)`. Otherwise a fully covered quadrant could report elements that
/// the shape does not touch.
pub trait Boundary {
    /// Returns `true` if the shape overlaps `rect`. Touching edges count as overlap.
    fn intersects(&self, rect: &Rect) -> bool;

    /// Returns `true` if `rect` lies entirely inside the shape.
    fn contains(&self, rect: &Rect) -> bool;
}

impl Boundary for Rect {
    #[inline]
    fn intersects(&self, other: &Rect) -> bool {
        !(self.x > other.max_x()
            || self.max_x() < other.x
            || self.y > other.max_y()
            || self.max_y() < other.y)
    }

    /// Strict containment: `other` may not touch any edge of `self`.
    #[inline]
    fn contains(&self, other: &Rect) -> bool {
        other.x > self.x
            && other.max_x() < self.max_x()
            && other.y > self.y
            && other.max_y() < self.max_y()
    }
}

impl Boundary for Circle {
    fn intersects(&self, rect: &Rect) -> bool {
        let half_w = rect.width * 0.5;
        let half_h = rect.height * 0.5;
        let center = rect.center();
        let dx = (self.x - center.x).abs();
        let dy = (self.y - center.y).abs();

        if dx > half_w + self.radius || dy > half_h + self.radius {
            return false;
        }
        if dx <= half_w || dy <= half_h {
            return true;
        }

        let cx = dx - half_w;
        let cy = dy - half_h;
        cx * cx + cy * cy <= self.radius * self.radius
    }

    /// The radius must reach the corner of `rect` farthest from the center.
    fn contains(&self, rect: &Rect) -> bool {
        let dx = (self.x - rect.x).abs().max((rect.max_x() - self.x).abs());
        let dy = (self.y - rect.y).abs().max((rect.max_y() - self.y).abs());
        self.radius * self.radius >= dx * dx + dy * dy
    }
}

/// Closed set of built-in query shapes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle.
    Rect(Rect),
    /// Circle.
    Circle(Circle),
}

impl Shape {
    /// Check the wrapped geometry.
    pub fn validate(&self) -> Result<(), GeometryError> {
        match self {
            Self::Rect(r) => r.validate(),
            Self::Circle(c) => c.validate(),
        }
    }
}

impl Boundary for Shape {
    #[inline]
    fn intersects(&self, rect: &Rect) -> bool {
        match self {
            Self::Rect(r) => r.intersects(rect),
            Self::Circle(c) => c.intersects(rect),
        }
    }

    #[inline]
    fn contains(&self, rect: &Rect) -> bool {
        match self {
            Self::Rect(r) => r.contains(rect),
            Self::Circle(c) => c.contains(rect),
        }
    }
}

impl From<Rect> for Shape {
    fn from(rect: Rect) -> Self {
        Self::Rect(rect)
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Self::Circle(circle)
    }
}

impl<B: Boundary + ?Sized> Boundary for &B {
    #[inline]
    fn intersects(&self, rect: &Rect) -> bool {
        (**self).intersects(rect)
    }

    #[inline]
    fn contains(&self, rect: &Rect) -> bool {
        (**self).contains(rect)
    }
}

#[cfg(feature = "kurbo")]
mod kurbo_interop {
    use super::{Circle, Point, Rect};

    impl From<kurbo::Point> for Point {
        fn from(p: kurbo::Point) -> Self {
            Self::new(p.x, p.y)
        }
    }

    impl From<Point> for kurbo::Point {
        fn from(p: Point) -> Self {
            Self::new(p.x, p.y)
        }
    }

    impl From<kurbo::Rect> for Rect {
        fn from(r: kurbo::Rect) -> Self {
            let r = r.abs();
            Self::new(r.x0, r.y0, r.width(), r.height())
        }
    }

    impl From<Rect> for kurbo::Rect {
        fn from(r: Rect) -> Self {
            Self::new(r.x, r.y, r.max_x(), r.max_y())
        }
    }

    impl From<kurbo::Circle> for Circle {
        fn from(c: kurbo::Circle) -> Self {
            Self::new(c.center.x, c.center.y, c.radius)
        }
    }

    impl From<Circle> for kurbo::Circle {
        fn from(c: Circle) -> Self {
            Self::new((c.x, c.y), c.radius)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn sample_rects() -> Vec<Rect> {
        let mut out = Vec::new();
        for &x in &[-10.0, 0.0, 5.0, 10.0, 25.0] {
            for &y in &[-10.0, 0.0, 5.0, 10.0, 25.0] {
                for &(w, h) in &[(0.0, 0.0), (1.0, 1.0), (10.0, 5.0), (30.0, 30.0)] {
                    out.push(Rect::new(x, y, w, h));
                }
            }
        }
        out
    }

    #[test]
    fn rect_intersects_counts_touching_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(a.intersects(&Rect::new(0.0, 10.0, 5.0, 5.0)));
        assert!(!a.intersects(&Rect::new(10.5, 0.0, 5.0, 5.0)));
        assert!(!a.intersects(&Rect::new(0.0, -6.0, 5.0, 5.0)));
    }

    #[test]
    fn rect_contains_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.contains(&Rect::new(1.0, 1.0, 8.0, 8.0)));
        assert!(!a.contains(&Rect::new(0.0, 1.0, 5.0, 5.0)));
        assert!(!a.contains(&Rect::new(1.0, 1.0, 9.0, 5.0)));
        assert!(!a.contains(&a));
    }

    #[test]
    fn rect_intersects_is_symmetric() {
        let rects = sample_rects();
        for a in &rects {
            for b in &rects {
                assert_eq!(
                    a.intersects(b),
                    b.intersects(a),
                    "asymmetric intersects for {a:?} and {b:?}"
                );
            }
            assert!(a.intersects(a), "intersects is not reflexive for {a:?}");
        }
    }

    #[test]
    fn contains_implies_intersects() {
        let rects = sample_rects();
        let shapes = [
            Shape::Rect(Rect::new(-5.0, -5.0, 20.0, 20.0)),
            Shape::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)),
            Shape::Circle(Circle::new(5.0, 5.0, 3.0)),
            Shape::Circle(Circle::new(5.0, 5.0, 40.0)),
            Shape::Circle(Circle::new(-10.0, 20.0, 12.0)),
        ];
        for shape in &shapes {
            for r in &rects {
                if shape.contains(r) {
                    assert!(shape.intersects(r), "{shape:?} contains but misses {r:?}");
                }
            }
        }
    }

    #[test]
    fn circle_intersects_sides_and_corners() {
        let c = Circle::new(0.0, 0.0, 5.0);
        // Straight to the right, edge just within reach.
        assert!(c.intersects(&Rect::new(5.0, -1.0, 2.0, 2.0)));
        assert!(!c.intersects(&Rect::new(5.5, -1.0, 2.0, 2.0)));
        // Diagonal: corner at (3, 3) is at distance ~4.24.
        assert!(c.intersects(&Rect::new(3.0, 3.0, 2.0, 2.0)));
        // Corner at (4, 4) is at distance ~5.66.
        assert!(!c.intersects(&Rect::new(4.0, 4.0, 2.0, 2.0)));
        // Rectangle enclosing the circle.
        assert!(c.intersects(&Rect::new(-10.0, -10.0, 20.0, 20.0)));
    }

    #[test]
    fn circle_contains_uses_farthest_corner_on_both_axes() {
        let c = Circle::new(0.0, 0.0, 5.0);
        // Farthest corner (3, 3): distance ~4.24.
        assert!(c.contains(&Rect::new(-3.0, -3.0, 6.0, 6.0)));
        // Farthest corner (4, 4): distance ~5.66.
        assert!(!c.contains(&Rect::new(-4.0, -4.0, 8.0, 8.0)));
        // Off-center: x range [1, 4], y range [-4, -1]. Farthest corner (4, -4).
        assert!(!c.contains(&Rect::new(1.0, -4.0, 3.0, 3.0)));
        // Farthest corner (3, -3).
        assert!(c.contains(&Rect::new(1.0, -3.0, 2.0, 2.0)));
        // Mirror image along y yields the same answer.
        assert!(c.contains(&Rect::new(1.0, 1.0, 2.0, 2.0)));
    }

    #[test]
    fn quarters_tile_the_parent() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        let [tl, tr, bl, br] = r.quarters();
        assert_eq!(tl, Rect::new(10.0, 20.0, 50.0, 25.0));
        assert_eq!(tr, Rect::new(60.0, 20.0, 50.0, 25.0));
        assert_eq!(bl, Rect::new(10.0, 45.0, 50.0, 25.0));
        assert_eq!(br, Rect::new(60.0, 45.0, 50.0, 25.0));
    }

    #[test]
    fn validate_rejects_bad_geometry() {
        assert_eq!(Rect::new(0.0, 0.0, 0.0, 0.0).validate(), Ok(()));
        assert_eq!(
            Rect::new(f64::NAN, 0.0, 1.0, 1.0).validate(),
            Err(GeometryError::NonFinite)
        );
        assert_eq!(
            Rect::new(0.0, 0.0, f64::INFINITY, 1.0).validate(),
            Err(GeometryError::NonFinite)
        );
        assert_eq!(
            Rect::new(0.0, 0.0, -1.0, 1.0).validate(),
            Err(GeometryError::NegativeExtent)
        );
        assert_eq!(
            Circle::new(0.0, 0.0, -0.5).validate(),
            Err(GeometryError::NegativeExtent)
        );
        assert_eq!(
            Shape::Circle(Circle::new(0.0, f64::NEG_INFINITY, 1.0)).validate(),
            Err(GeometryError::NonFinite)
        );
    }

    #[cfg(feature = "kurbo")]
    #[test]
    fn kurbo_rect_conversion_normalizes() {
        let r: Rect = kurbo::Rect::new(10.0, 8.0, 2.0, 4.0).into();
        assert_eq!(r, Rect::new(2.0, 4.0, 8.0, 4.0));
        let back: kurbo::Rect = r.into();
        assert_eq!(back, kurbo::Rect::new(2.0, 4.0, 10.0, 8.0));
    }
}
