//! Path resolution and flattening
//!
//! `Path::primitives` walks the segments with a `CurveState` and yields
//! drawable primitives with every implied point made explicit (smooth
//! control points, H/V partner coordinates). Flattening turns those into
//! polylines: curves by recursive de Casteljau subdivision until the
//! control points sit within tolerance of the chord, arcs by stepping the
//! center parameterization at an angle whose sagitta fits the tolerance.
//!
//! Polylines of closed paths do not repeat the first point; consumers
//! check `Path::is_closed`.

use super::arc::ArcInfo;
use super::segment::{Path, PathData, SegmentKind};
use super::state::CurveState;
use crate::geom::{Point, Rect};

const MAX_SUBDIVISION_DEPTH: u32 = 16;
const MAX_ARC_STEPS: usize = 1024;
/// Tolerance used when computing bounds
const BOUNDS_TOLERANCE: f64 = 0.1;

/// A fully resolved drawing primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Line { from: Point, to: Point },
    Quad { from: Point, ctrl: Point, to: Point },
    Cubic { from: Point, ctrl1: Point, ctrl2: Point, to: Point },
    Arc {
        from: Point,
        to: Point,
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
    },
}

impl Primitive {
    pub fn start(&self) -> Point {
        match *self {
            Primitive::Line { from, .. }
            | Primitive::Quad { from, .. }
            | Primitive::Cubic { from, .. }
            | Primitive::Arc { from, .. } => from,
        }
    }

    pub fn end(&self) -> Point {
        match *self {
            Primitive::Line { to, .. }
            | Primitive::Quad { to, .. }
            | Primitive::Cubic { to, .. }
            | Primitive::Arc { to, .. } => to,
        }
    }

    /// Append the flattened primitive to `out`, excluding its start point
    pub fn flatten_into(&self, tolerance: f64, out: &mut Vec<Point>) {
        match *self {
            Primitive::Line { to, .. } => out.push(to),
            Primitive::Quad { from, ctrl, to } => {
                // exact degree elevation
                let c1 = from + (ctrl - from) * (2.0 / 3.0);
                let c2 = to + (ctrl - to) * (2.0 / 3.0);
                flatten_cubic(from, c1, c2, to, tolerance, 0, out);
            }
            Primitive::Cubic { from, ctrl1, ctrl2, to } => {
                flatten_cubic(from, ctrl1, ctrl2, to, tolerance, 0, out);
            }
            Primitive::Arc { from, to, rx, ry, x_axis_rotation, large_arc, sweep } => {
                if from == to {
                    return;
                }
                match ArcInfo::from_endpoints(from, to, rx, ry, x_axis_rotation, large_arc, sweep) {
                    Some(arc) => flatten_arc(&arc, to, tolerance, out),
                    None => out.push(to),
                }
            }
        }
    }
}

fn flatten_cubic(
    p0: Point,
    p1: Point,
    p2: Point,
    p3: Point,
    tolerance: f64,
    depth: u32,
    out: &mut Vec<Point>,
) {
    if depth >= MAX_SUBDIVISION_DEPTH || is_flat(p0, p1, p2, p3, tolerance) {
        out.push(p3);
        return;
    }
    let m01 = p0.midpoint(p1);
    let m12 = p1.midpoint(p2);
    let m23 = p2.midpoint(p3);
    let m012 = m01.midpoint(m12);
    let m123 = m12.midpoint(m23);
    let mid = m012.midpoint(m123);
    flatten_cubic(p0, m01, m012, mid, tolerance, depth + 1, out);
    flatten_cubic(mid, m123, m23, p3, tolerance, depth + 1, out);
}

/// Both control points within `tolerance` of the chord
fn is_flat(p0: Point, p1: Point, p2: Point, p3: Point, tolerance: f64) -> bool {
    let chord = p3 - p0;
    let len = chord.x.hypot(chord.y);
    if len < 1e-12 {
        return p1.distance(p0) <= tolerance && p2.distance(p0) <= tolerance;
    }
    let dist = |p: Point| ((p - p0).x * chord.y - (p - p0).y * chord.x).abs() / len;
    dist(p1) <= tolerance && dist(p2) <= tolerance
}

fn flatten_arc(arc: &ArcInfo, to: Point, tolerance: f64, out: &mut Vec<Point>) {
    let radius = arc.rx.max(arc.ry);
    // largest step whose chord stays within tolerance of the curve
    let step = if tolerance < radius {
        2.0 * (1.0 - tolerance / radius).acos()
    } else {
        std::f64::consts::FRAC_PI_2
    };
    let steps = ((arc.sweep_angle.abs() / step).ceil() as usize).clamp(1, MAX_ARC_STEPS);
    let delta = arc.sweep_angle / steps as f64;
    for i in 1..steps {
        out.push(arc.point_at(arc.start_angle + delta * i as f64));
    }
    // land exactly on the endpoint
    out.push(to);
}

impl Path {
    /// Resolve segments into primitives with implied points made explicit
    pub fn primitives(&self) -> Vec<Primitive> {
        let mut out = Vec::new();
        let mut st = CurveState::new(self.first_point);

        for seg in &self.segments {
            for g in seg.groups() {
                let from = st.current;
                match seg.kind {
                    SegmentKind::Move => st.move_to(Point::new(g[0], g[1])),
                    SegmentKind::Close => {}
                    SegmentKind::Line => {
                        let to = Point::new(g[0], g[1]);
                        out.push(Primitive::Line { from, to });
                        st.move_to(to);
                    }
                    SegmentKind::Horizontal => {
                        let to = Point::new(g[0], from.y);
                        out.push(Primitive::Line { from, to });
                        st.move_to(to);
                    }
                    SegmentKind::Vertical => {
                        let to = Point::new(from.x, g[0]);
                        out.push(Primitive::Line { from, to });
                        st.move_to(to);
                    }
                    SegmentKind::QuadBezier => {
                        let ctrl = Point::new(g[0], g[1]);
                        let to = Point::new(g[2], g[3]);
                        out.push(Primitive::Quad { from, ctrl, to });
                        st.quad_to(ctrl, to);
                    }
                    SegmentKind::QuadSpline => {
                        let ctrl = st.reflected_quad();
                        let to = Point::new(g[0], g[1]);
                        out.push(Primitive::Quad { from, ctrl, to });
                        st.quad_to(ctrl, to);
                    }
                    SegmentKind::CubicBezier => {
                        let ctrl1 = Point::new(g[0], g[1]);
                        let ctrl2 = Point::new(g[2], g[3]);
                        let to = Point::new(g[4], g[5]);
                        out.push(Primitive::Cubic { from, ctrl1, ctrl2, to });
                        st.cubic_to(ctrl2, to);
                    }
                    SegmentKind::CubicSpline => {
                        let ctrl1 = st.reflected_cubic();
                        let ctrl2 = Point::new(g[0], g[1]);
                        let to = Point::new(g[2], g[3]);
                        out.push(Primitive::Cubic { from, ctrl1, ctrl2, to });
                        st.cubic_to(ctrl2, to);
                    }
                    SegmentKind::Arc => {
                        let to = Point::new(g[5], g[6]);
                        out.push(Primitive::Arc {
                            from,
                            to,
                            rx: g[0],
                            ry: g[1],
                            x_axis_rotation: g[2],
                            large_arc: g[3] != 0.0,
                            sweep: g[4] != 0.0,
                        });
                        st.move_to(to);
                    }
                }
            }
        }
        out
    }

    /// Polyline within `tolerance` of the true outline once scaled by
    /// `scale`. Points stay in user space; only the tolerance is scaled.
    pub fn flatten(&self, scale: f64, tolerance: f64) -> Vec<Point> {
        let tolerance = effective_tolerance(scale, tolerance);
        let mut out = vec![self.first_point];
        for prim in self.primitives() {
            prim.flatten_into(tolerance, &mut out);
        }
        self.trim_closing_point(&mut out);
        out
    }

    /// Anchor points only, curve interiors ignored (marker placement)
    pub fn simple_polyline(&self) -> Vec<Point> {
        let mut out = vec![self.first_point];
        out.extend(self.primitives().iter().map(Primitive::end));
        self.trim_closing_point(&mut out);
        out
    }

    pub fn bounds(&self) -> Option<Rect> {
        Rect::from_points(self.flatten(1.0, BOUNDS_TOLERANCE))
    }

    fn trim_closing_point(&self, out: &mut Vec<Point>) {
        if self.is_closed && out.len() > 1 && out.last() == Some(&self.first_point) {
            out.pop();
        }
    }
}

impl PathData {
    /// One polyline per subpath
    pub fn flatten(&self, scale: f64, tolerance: f64) -> Vec<Vec<Point>> {
        self.paths.iter().map(|p| p.flatten(scale, tolerance)).collect()
    }

    pub fn simple_polylines(&self) -> Vec<Vec<Point>> {
        self.paths.iter().map(Path::simple_polyline).collect()
    }

    /// Union of the subpath bounds
    pub fn bounds(&self) -> Option<Rect> {
        self.paths
            .iter()
            .filter_map(Path::bounds)
            .reduce(Rect::union)
    }
}

fn effective_tolerance(scale: f64, tolerance: f64) -> f64 {
    let tolerance = if tolerance > 0.0 { tolerance } else { 0.25 };
    if scale > 0.0 && scale.is_finite() {
        tolerance / scale
    } else {
        tolerance
    }
}
