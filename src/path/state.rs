//! Pen state threaded through path resolution
//!
//! Tracks the current point and the trailing control point of the last
//! quadratic and cubic segment. A smooth segment reflects the control
//! point of its own family only; any other segment in between clears it
//! and the implied control point collapses to the current point.

use crate::geom::Point;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CurveState {
    pub current: Point,
    last_quad: Option<Point>,
    last_cubic: Option<Point>,
}

impl CurveState {
    pub fn new(start: Point) -> Self {
        Self { current: start, last_quad: None, last_cubic: None }
    }

    /// Leading control point implied by a `T`
    pub fn reflected_quad(&self) -> Point {
        self.last_quad
            .map(|c| c.reflect_through(self.current))
            .unwrap_or(self.current)
    }

    /// Leading control point implied by an `S`
    pub fn reflected_cubic(&self) -> Point {
        self.last_cubic
            .map(|c| c.reflect_through(self.current))
            .unwrap_or(self.current)
    }

    /// Pen moved without a curve (move, line, arc, close)
    pub fn move_to(&mut self, to: Point) {
        self.current = to;
        self.last_quad = None;
        self.last_cubic = None;
    }

    /// After a quadratic segment with control point `ctrl`
    pub fn quad_to(&mut self, ctrl: Point, to: Point) {
        self.current = to;
        self.last_quad = Some(ctrl);
        self.last_cubic = None;
    }

    /// After a cubic segment whose second control point is `ctrl2`
    pub fn cubic_to(&mut self, ctrl2: Point, to: Point) {
        self.current = to;
        self.last_quad = None;
        self.last_cubic = Some(ctrl2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflection_after_same_family() {
        let mut st = CurveState::new(Point::new(0.0, 0.0));
        st.quad_to(Point::new(10.0, 10.0), Point::new(20.0, 0.0));
        assert_eq!(st.reflected_quad(), Point::new(30.0, -10.0));
        // a cubic successor sees no eligible predecessor
        assert_eq!(st.reflected_cubic(), Point::new(20.0, 0.0));
    }

    #[test]
    fn test_reflection_cleared_by_line() {
        let mut st = CurveState::default();
        st.cubic_to(Point::new(5.0, 5.0), Point::new(10.0, 0.0));
        assert_eq!(st.reflected_cubic(), Point::new(15.0, -5.0));
        st.move_to(Point::new(20.0, 0.0));
        assert_eq!(st.reflected_cubic(), Point::new(20.0, 0.0));
        assert_eq!(st.reflected_quad(), Point::new(20.0, 0.0));
    }

    #[test]
    fn test_chained_smooth_quads() {
        // T after T reflects the previous implied control point
        let mut st = CurveState::default();
        st.quad_to(Point::new(10.0, 10.0), Point::new(20.0, 0.0));
        let c = st.reflected_quad();
        st.quad_to(c, Point::new(40.0, 0.0));
        assert_eq!(st.reflected_quad(), Point::new(50.0, 10.0));
    }
}
