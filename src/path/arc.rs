//! Elliptical arc endpoint-to-center conversion (SVG 1.1 appendix F.6.5)

use crate::geom::{Point, Rect};
use std::f64::consts::TAU;

/// Center parameterization of an arc segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcInfo {
    /// Bounding box of the full, unrotated ellipse
    pub rect: Rect,
    /// Radii after out-of-range correction
    pub rx: f64,
    pub ry: f64,
    /// X-axis rotation in radians
    pub rotation: f64,
    /// Angle of the start point, radians
    pub start_angle: f64,
    /// Signed angular extent: positive with the sweep flag set, negative
    /// without
    pub sweep_angle: f64,
}

impl ArcInfo {
    /// Convert an arc given by its endpoints.
    ///
    /// Returns None when either radius is zero or the endpoints
    /// coincide; SVG renders the former as a straight line and omits the
    /// latter.
    pub fn from_endpoints(
        p1: Point,
        p2: Point,
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
    ) -> Option<Self> {
        let mut rx = rx.abs();
        let mut ry = ry.abs();
        if rx == 0.0 || ry == 0.0 || !rx.is_finite() || !ry.is_finite() || p1 == p2 {
            return None;
        }

        let phi = x_axis_rotation.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();

        // Step 1: midpoint in the rotated frame
        let dx2 = (p1.x - p2.x) * 0.5;
        let dy2 = (p1.y - p2.y) * 0.5;
        let x1p = cos_phi * dx2 + sin_phi * dy2;
        let y1p = -sin_phi * dx2 + cos_phi * dy2;

        // Radii too small to span the chord are scaled up uniformly
        let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
        if lambda > 1.0 {
            let s = lambda.sqrt();
            rx *= s;
            ry *= s;
        }

        // Step 2: center in the rotated frame
        let rx2 = rx * rx;
        let ry2 = ry * ry;
        let num = rx2 * ry2 - rx2 * y1p * y1p - ry2 * x1p * x1p;
        let den = rx2 * y1p * y1p + ry2 * x1p * x1p;
        let mut coe = if den > 0.0 { (num / den).max(0.0).sqrt() } else { 0.0 };
        if large_arc == sweep {
            coe = -coe;
        }
        let cxp = coe * rx * y1p / ry;
        let cyp = -coe * ry * x1p / rx;

        // Step 3: back to user space
        let cx = cos_phi * cxp - sin_phi * cyp + (p1.x + p2.x) * 0.5;
        let cy = sin_phi * cxp + cos_phi * cyp + (p1.y + p2.y) * 0.5;

        // Step 4: angles
        let u = ((x1p - cxp) / rx, (y1p - cyp) / ry);
        let v = ((-x1p - cxp) / rx, (-y1p - cyp) / ry);
        let start_angle = angle((1.0, 0.0), u);
        let mut sweep_angle = angle(u, v).rem_euclid(TAU);
        if !sweep {
            sweep_angle -= TAU;
        }

        Some(ArcInfo {
            rect: Rect::new(cx - rx, cy - ry, cx + rx, cy + ry),
            rx,
            ry,
            rotation: phi,
            start_angle,
            sweep_angle,
        })
    }

    pub fn center(&self) -> Point {
        self.rect.center()
    }

    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep_angle
    }

    /// Point on the rotated ellipse at parametric angle `theta`
    pub fn point_at(&self, theta: f64) -> Point {
        let c = self.center();
        let (sin_phi, cos_phi) = self.rotation.sin_cos();
        let (sin_t, cos_t) = theta.sin_cos();
        let x = self.rx * cos_t;
        let y = self.ry * sin_t;
        Point::new(cos_phi * x - sin_phi * y + c.x, sin_phi * x + cos_phi * y + c.y)
    }
}

/// Signed angle from `u` to `v`; the cosine is clamped so round-off
/// cannot push it outside acos's domain
fn angle(u: (f64, f64), v: (f64, f64)) -> f64 {
    let dot = u.0 * v.0 + u.1 * v.1;
    let len = ((u.0 * u.0 + u.1 * u.1) * (v.0 * v.0 + v.1 * v.1)).sqrt();
    if len == 0.0 {
        return 0.0;
    }
    let a = (dot / len).clamp(-1.0, 1.0).acos();
    if u.0 * v.1 - u.1 * v.0 < 0.0 {
        -a
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_half_circle_center() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(10.0, 0.0);
        let arc = ArcInfo::from_endpoints(p1, p2, 5.0, 5.0, 0.0, false, true).unwrap();
        let c = arc.center();
        assert!(approx(c.x, 5.0) && approx(c.y, 0.0));
        assert!(approx(c.distance(p1), 5.0));
        assert!(approx(c.distance(p2), 5.0));
        assert!(approx(arc.sweep_angle.abs(), PI));
        assert!(arc.point_at(arc.start_angle).approx_eq(p1, 1e-9));
        assert!(arc.point_at(arc.end_angle()).approx_eq(p2, 1e-9));
    }

    #[test]
    fn test_sweep_direction() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(10.0, 0.0);
        let cw = ArcInfo::from_endpoints(p1, p2, 5.0, 5.0, 0.0, false, true).unwrap();
        let ccw = ArcInfo::from_endpoints(p1, p2, 5.0, 5.0, 0.0, false, false).unwrap();
        assert!(cw.sweep_angle > 0.0);
        assert!(ccw.sweep_angle < 0.0);
    }

    #[test]
    fn test_large_arc_picks_other_center() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(10.0, 0.0);
        let small = ArcInfo::from_endpoints(p1, p2, 10.0, 10.0, 0.0, false, true).unwrap();
        let large = ArcInfo::from_endpoints(p1, p2, 10.0, 10.0, 0.0, true, true).unwrap();
        assert!(approx(small.center().y, -large.center().y));
        assert!(small.sweep_angle.abs() < PI);
        assert!(large.sweep_angle.abs() > PI);
    }

    #[test]
    fn test_radii_scaled_up() {
        let arc = ArcInfo::from_endpoints(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            1.0,
            1.0,
            0.0,
            false,
            true,
        )
        .unwrap();
        assert!(approx(arc.rx, 5.0));
        assert!(approx(arc.ry, 5.0));
    }

    #[test]
    fn test_negative_radii_made_positive() {
        let arc = ArcInfo::from_endpoints(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            -5.0,
            -5.0,
            0.0,
            false,
            true,
        )
        .unwrap();
        assert!(approx(arc.rx, 5.0));
    }

    #[test]
    fn test_rotated_endpoints_on_ellipse() {
        let p1 = Point::new(3.0, 1.0);
        let p2 = Point::new(-4.0, 6.0);
        let arc = ArcInfo::from_endpoints(p1, p2, 8.0, 4.0, 30.0, true, false).unwrap();
        assert!(arc.point_at(arc.start_angle).approx_eq(p1, 1e-6));
        assert!(arc.point_at(arc.end_angle()).approx_eq(p2, 1e-6));
    }

    #[test]
    fn test_degenerate() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(10.0, 0.0);
        assert!(ArcInfo::from_endpoints(p1, p2, 0.0, 5.0, 0.0, false, true).is_none());
        assert!(ArcInfo::from_endpoints(p1, p2, 5.0, 0.0, 0.0, false, true).is_none());
        assert!(ArcInfo::from_endpoints(p1, p1, 5.0, 5.0, 0.0, false, true).is_none());
    }
}
