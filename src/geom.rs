//! Geometry primitives shared by the literal parsers and the path engine

use std::ops::{Add, Mul, Sub};

/// A point in user space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point reflection of `self` through `center`
    #[inline]
    pub fn reflect_through(self, center: Point) -> Point {
        Point::new(2.0 * center.x - self.x, 2.0 * center.y - self.y)
    }

    #[inline]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    #[inline]
    pub fn approx_eq(self, other: Point, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// Axis-aligned rectangle stored as edges
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    /// Degenerate rectangle covering one point
    pub const fn from_point(p: Point) -> Self {
        Self::new(p.x, p.y, p.x, p.y)
    }

    /// Bounding box of a point set; None when empty
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Rect::from_point(first), |r, p| r.include(p)))
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// True when either extent is zero or negative
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn center(&self) -> Point {
        Point::new((self.left + self.right) * 0.5, (self.top + self.bottom) * 0.5)
    }

    /// Grow to include a point
    #[must_use]
    pub fn include(self, p: Point) -> Rect {
        Rect::new(
            self.left.min(p.x),
            self.top.min(p.y),
            self.right.max(p.x),
            self.bottom.max(p.y),
        )
    }

    #[must_use]
    pub fn union(self, other: Rect) -> Rect {
        Rect::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }
}

/// 2x3 affine matrix `[a, b, c, d, e, f]`:
/// - `x' = a·x + c·y + e`
/// - `y' = b·x + d·y + f`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix(pub [f64; 6]);

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub const fn identity() -> Self {
        Self([1.0, 0.0, 0.0, 1.0, 0.0, 0.0])
    }

    pub const fn translate(tx: f64, ty: f64) -> Self {
        Self([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self([sx, 0.0, 0.0, sy, 0.0, 0.0])
    }

    /// Rotation by `degrees` about the origin
    pub fn rotate(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self([cos, sin, -sin, cos, 0.0, 0.0])
    }

    /// Rotation by `degrees` about `(cx, cy)`
    pub fn rotate_about(degrees: f64, cx: f64, cy: f64) -> Self {
        Self::translate(cx, cy)
            .multiply(&Self::rotate(degrees))
            .multiply(&Self::translate(-cx, -cy))
    }

    pub fn skew_x(degrees: f64) -> Self {
        Self([1.0, 0.0, degrees.to_radians().tan(), 1.0, 0.0, 0.0])
    }

    pub fn skew_y(degrees: f64) -> Self {
        Self([1.0, degrees.to_radians().tan(), 0.0, 1.0, 0.0, 0.0])
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// `self · other`: `other` is applied first, then `self`
    #[must_use]
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        let [a, b, c, d, e, f] = self.0;
        let [p, q, r, s, t, u] = other.0;
        Matrix([
            a * p + c * q,
            b * p + d * q,
            a * r + c * s,
            b * r + d * s,
            a * t + c * u + e,
            b * t + d * u + f,
        ])
    }

    /// Apply to a point
    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        let [a, b, c, d, e, f] = self.0;
        Point::new(a * p.x + c * p.y + e, b * p.x + d * p.y + f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_reflect_through() {
        let p = Point::new(10.0, 10.0).reflect_through(Point::new(20.0, 0.0));
        assert_eq!(p, Point::new(30.0, -10.0));
    }

    #[test]
    fn test_rect_bounds() {
        let pts = [Point::new(1.0, 5.0), Point::new(-2.0, 3.0), Point::new(4.0, 8.0)];
        let r = Rect::from_points(pts).unwrap();
        assert_eq!(r, Rect::new(-2.0, 3.0, 4.0, 8.0));
        assert!(!r.is_empty());
        assert!(Rect::from_points(std::iter::empty()).is_none());
        assert!(Rect::from_point(Point::new(1.0, 1.0)).is_empty());
    }

    #[test]
    fn test_rect_union() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(2.0, -1.0, 3.0, 0.5);
        assert_eq!(a.union(b), Rect::new(0.0, -1.0, 3.0, 1.0));
    }

    #[test]
    fn test_multiply_order() {
        // translate then scale: scale applies first to the point
        let m = Matrix::translate(10.0, 0.0).multiply(&Matrix::scale(2.0, 2.0));
        let p = m.apply(Point::new(1.0, 1.0));
        assert!(approx(p.x, 12.0));
        assert!(approx(p.y, 2.0));
    }

    #[test]
    fn test_rotate_about_pivot_is_fixed() {
        let m = Matrix::rotate_about(90.0, 5.0, 5.0);
        let p = m.apply(Point::new(5.0, 5.0));
        assert!(approx(p.x, 5.0) && approx(p.y, 5.0));
        let q = m.apply(Point::new(6.0, 5.0));
        assert!(approx(q.x, 5.0) && approx(q.y, 6.0));
    }

    #[test]
    fn test_skew() {
        let p = Matrix::skew_x(45.0).apply(Point::new(0.0, 1.0));
        assert!(approx(p.x, 1.0));
        let p = Matrix::skew_y(45.0).apply(Point::new(1.0, 0.0));
        assert!(approx(p.y, 1.0));
    }
}
