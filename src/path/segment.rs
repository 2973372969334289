//! Parsed path geometry
//!
//! All segment values are absolute user-space coordinates. Smooth
//! segments (`T`, `S`) store only what the data spelled out; their
//! implied leading control point is derived when the path is resolved
//! into primitives.

use crate::geom::Point;

/// Segment types, one per path command family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// `M`: `x y`
    Move,
    /// `L`: `x y`
    Line,
    /// `H`: `x`
    Horizontal,
    /// `V`: `y`
    Vertical,
    /// `A`: `rx ry x-axis-rotation large-arc-flag sweep-flag x y`
    Arc,
    /// `Q`: `x1 y1 x y`
    QuadBezier,
    /// `C`: `x1 y1 x2 y2 x y`
    CubicBezier,
    /// `T`: `x y`
    QuadSpline,
    /// `S`: `x2 y2 x y`
    CubicSpline,
    /// `Z`: no values
    Close,
}

impl SegmentKind {
    /// Map a command letter to its kind and whether it is relative
    pub fn from_command(c: u8) -> Option<(Self, bool)> {
        let kind = match c.to_ascii_uppercase() {
            b'M' => SegmentKind::Move,
            b'L' => SegmentKind::Line,
            b'H' => SegmentKind::Horizontal,
            b'V' => SegmentKind::Vertical,
            b'A' => SegmentKind::Arc,
            b'Q' => SegmentKind::QuadBezier,
            b'C' => SegmentKind::CubicBezier,
            b'T' => SegmentKind::QuadSpline,
            b'S' => SegmentKind::CubicSpline,
            b'Z' => SegmentKind::Close,
            _ => return None,
        };
        Some((kind, c.is_ascii_lowercase()))
    }

    /// Number of values in one coordinate group
    pub const fn arity(self) -> usize {
        match self {
            SegmentKind::Close => 0,
            SegmentKind::Horizontal | SegmentKind::Vertical => 1,
            SegmentKind::Move | SegmentKind::Line | SegmentKind::QuadSpline => 2,
            SegmentKind::QuadBezier | SegmentKind::CubicSpline => 4,
            SegmentKind::CubicBezier => 6,
            SegmentKind::Arc => 7,
        }
    }
}

/// One command and all its coordinate groups
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    pub kind: SegmentKind,
    pub values: Vec<f64>,
}

impl PathSegment {
    pub fn new(kind: SegmentKind) -> Self {
        Self { kind, values: Vec::new() }
    }

    /// Values split into coordinate groups
    pub fn groups(&self) -> impl Iterator<Item = &[f64]> {
        // Close has arity 0; chunks needs a nonzero size
        self.values.chunks(self.kind.arity().max(1))
    }

    /// Number of complete coordinate groups
    pub fn group_count(&self) -> usize {
        match self.kind.arity() {
            0 => 0,
            n => self.values.len() / n,
        }
    }
}

/// One subpath: starts at a move, optionally closed
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub first_point: Point,
    pub is_closed: bool,
    /// Begins with a `Move` segment holding `first_point`
    pub segments: Vec<PathSegment>,
}

impl Path {
    /// New subpath with its leading move
    pub fn starting_at(first_point: Point) -> Self {
        Self {
            first_point,
            is_closed: false,
            segments: vec![PathSegment {
                kind: SegmentKind::Move,
                values: vec![first_point.x, first_point.y],
            }],
        }
    }
}

/// Everything a `d` attribute parsed into
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathData {
    pub paths: Vec<Path>,
}

impl PathData {
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Path> {
        self.paths.iter()
    }
}

impl<'a> IntoIterator for &'a PathData {
    type Item = &'a Path;
    type IntoIter = std::slice::Iter<'a, Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}
