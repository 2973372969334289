//! Path-data parser
//!
//! Single pass over a `d` attribute. Each command letter opens a new
//! segment; further coordinate groups without a letter repeat the
//! command and extend that segment. Coordinate pairs following a move
//! are an implicit line (relative if the move was). Relative values are
//! made absolute as they are read.
//!
//! Parsing stops, keeping what was built, at an unknown command letter,
//! at a coordinate group that is cut short, or at drawing data that does
//! not start with a move.

use super::segment::{Path, PathData, PathSegment, SegmentKind};
use crate::core::scanner::Scanner;
use crate::geom::Point;
use tracing::trace;

/// Parse path data
pub fn parse_path_data(d: &[u8]) -> PathData {
    let mut parser = PathParser::new(d);
    parser.run();
    PathData { paths: parser.paths }
}

struct PathParser<'a> {
    s: Scanner<'a>,
    paths: Vec<Path>,
    current: Point,
}

impl<'a> PathParser<'a> {
    fn new(d: &'a [u8]) -> Self {
        Self { s: Scanner::new(d), paths: Vec::new(), current: Point::default() }
    }

    fn run(&mut self) {
        while self.s.skip_blanks_and_comma() {
            let Some(c) = self.s.peek() else { break };
            let Some((kind, relative)) = SegmentKind::from_command(c) else {
                trace!(position = self.s.position(), command = %(c as char), "path data stops");
                break;
            };
            self.s.advance(1);
            if !self.command(kind, relative) {
                trace!(position = self.s.position(), "path data truncated");
                break;
            }
        }
    }

    /// Handle one command letter and all its repeats. False stops parsing.
    fn command(&mut self, kind: SegmentKind, relative: bool) -> bool {
        match kind {
            SegmentKind::Move => self.move_to(relative),
            SegmentKind::Close => {
                self.close();
                true
            }
            _ => {
                let Some(path) = self.open_path() else {
                    return false;
                };
                path.segments.push(PathSegment::new(kind));
                self.read_groups(kind, relative)
            }
        }
    }

    fn move_to(&mut self, relative: bool) -> bool {
        let mut group = [0.0; 2];
        if !self.read_group(SegmentKind::Move, &mut group) {
            return false;
        }
        let mut to = Point::new(group[0], group[1]);
        if relative {
            to = to + self.current;
        }
        self.current = to;
        self.paths.push(Path::starting_at(to));

        if !self.at_number() {
            return true;
        }
        let Some(path) = self.paths.last_mut() else {
            return false;
        };
        path.segments.push(PathSegment::new(SegmentKind::Line));
        self.read_groups(SegmentKind::Line, relative)
    }

    fn close(&mut self) {
        let Some(path) = self.paths.last_mut() else {
            return;
        };
        if path.is_closed {
            return;
        }
        path.segments.push(PathSegment::new(SegmentKind::Close));
        path.is_closed = true;
        self.current = path.first_point;
    }

    /// Subpath that drawing commands extend. After a close, drawing
    /// resumes in a new subpath at the closed one's first point.
    fn open_path(&mut self) -> Option<&mut Path> {
        match self.paths.last() {
            None => return None,
            Some(p) if p.is_closed => {
                let start = p.first_point;
                self.paths.push(Path::starting_at(start));
            }
            Some(_) => {}
        }
        self.paths.last_mut()
    }

    /// Read one or more groups into the last segment of the last path.
    /// A command with no complete group is dropped along with its segment.
    fn read_groups(&mut self, kind: SegmentKind, relative: bool) -> bool {
        let mut group = [0.0; 7];
        let arity = kind.arity();
        let mut count = 0;
        loop {
            if !self.read_group(kind, &mut group[..arity]) {
                break;
            }
            if relative {
                self.make_absolute(kind, &mut group[..arity]);
            }
            self.current = end_point(kind, &group[..arity], self.current);
            if let Some(seg) = self.paths.last_mut().and_then(|p| p.segments.last_mut()) {
                seg.values.extend_from_slice(&group[..arity]);
            }
            count += 1;
            if !self.at_number() {
                return true;
            }
        }

        if count == 0 {
            if let Some(path) = self.paths.last_mut() {
                path.segments.pop();
            }
        }
        false
    }

    /// Read `out.len()` values; on failure the cursor is restored
    fn read_group(&mut self, kind: SegmentKind, out: &mut [f64]) -> bool {
        let start = self.s.position();
        for (i, slot) in out.iter_mut().enumerate() {
            if i > 0 {
                self.s.skip_blanks_and_comma();
            } else {
                self.s.skip_blanks();
            }
            let value = if kind == SegmentKind::Arc && (i == 3 || i == 4) {
                self.s.parse_flag().map(|f| if f { 1.0 } else { 0.0 })
            } else {
                self.s.parse_number()
            };
            match value {
                Some(v) => *slot = v,
                None => {
                    self.s.set_position(start);
                    return false;
                }
            }
        }
        true
    }

    fn make_absolute(&self, kind: SegmentKind, group: &mut [f64]) {
        let Point { x, y } = self.current;
        match kind {
            SegmentKind::Horizontal => group[0] += x,
            SegmentKind::Vertical => group[0] += y,
            SegmentKind::Arc => {
                group[5] += x;
                group[6] += y;
            }
            _ => {
                for pair in group.chunks_exact_mut(2) {
                    pair[0] += x;
                    pair[1] += y;
                }
            }
        }
    }

    /// True if another coordinate group follows (after optional separators)
    fn at_number(&mut self) -> bool {
        self.s.skip_blanks_and_comma();
        matches!(self.s.peek(), Some(b'0'..=b'9' | b'-' | b'+' | b'.'))
    }
}

/// Pen position after an absolute group
fn end_point(kind: SegmentKind, group: &[f64], current: Point) -> Point {
    match kind {
        SegmentKind::Horizontal => Point::new(group[0], current.y),
        SegmentKind::Vertical => Point::new(current.x, group[0]),
        SegmentKind::Close => current,
        _ => {
            let n = group.len();
            Point::new(group[n - 2], group[n - 1])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(path: &Path) -> Vec<SegmentKind> {
        path.segments.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn test_literal_triangle() {
        let data = parse_path_data(b"M10,10 L20,20 L30,10 Z");
        assert_eq!(data.len(), 1);
        let path = &data.paths[0];
        assert_eq!(path.first_point, Point::new(10.0, 10.0));
        assert!(path.is_closed);
        assert_eq!(
            kinds(path),
            vec![SegmentKind::Move, SegmentKind::Line, SegmentKind::Line, SegmentKind::Close]
        );
        assert_eq!(path.segments[1].values, vec![20.0, 20.0]);
        assert_eq!(path.segments[2].values, vec![30.0, 10.0]);
    }

    #[test]
    fn test_implicit_line_after_move() {
        let data = parse_path_data(b"M10 10 20 20 30 10");
        let path = &data.paths[0];
        assert_eq!(kinds(path), vec![SegmentKind::Move, SegmentKind::Line]);
        assert_eq!(path.segments[1].values, vec![20.0, 20.0, 30.0, 10.0]);
    }

    #[test]
    fn test_relative_move_and_lines() {
        let data = parse_path_data(b"m5,5 10,0 0,10 l-10,0");
        let path = &data.paths[0];
        assert_eq!(path.first_point, Point::new(5.0, 5.0));
        assert_eq!(path.segments[1].values, vec![15.0, 5.0, 15.0, 15.0]);
        assert_eq!(path.segments[2].values, vec![5.0, 15.0]);
    }

    #[test]
    fn test_horizontal_vertical() {
        let data = parse_path_data(b"M1 2 H10 v5 h-3 V0");
        let segs = &data.paths[0].segments;
        assert_eq!(segs[1].values, vec![10.0]);
        assert_eq!(segs[2].values, vec![7.0]);
        assert_eq!(segs[3].values, vec![7.0]);
        assert_eq!(segs[4].values, vec![0.0]);
    }

    #[test]
    fn test_repeats_extend_segment() {
        let data = parse_path_data(b"M0 0 q 1 1 2 0 1 1 2 0");
        let seg = &data.paths[0].segments[1];
        assert_eq!(seg.kind, SegmentKind::QuadBezier);
        // second group is relative to the end of the first
        assert_eq!(seg.values, vec![1.0, 1.0, 2.0, 0.0, 3.0, 1.0, 4.0, 0.0]);
    }

    #[test]
    fn test_arc_flags_compact() {
        // flags need no separators
        let data = parse_path_data(b"M0 0 a5 5 0 0110 0");
        let seg = &data.paths[0].segments[1];
        assert_eq!(seg.kind, SegmentKind::Arc);
        assert_eq!(seg.values, vec![5.0, 5.0, 0.0, 0.0, 1.0, 10.0, 0.0]);
    }

    #[test]
    fn test_compact_numbers() {
        let data = parse_path_data(b"M.5.5L-1-1");
        let path = &data.paths[0];
        assert_eq!(path.first_point, Point::new(0.5, 0.5));
        assert_eq!(path.segments[1].values, vec![-1.0, -1.0]);
    }

    #[test]
    fn test_after_close_restarts_at_first_point() {
        let data = parse_path_data(b"M10 10 L20 10 Z l0 5");
        assert_eq!(data.len(), 2);
        let second = &data.paths[1];
        assert_eq!(second.first_point, Point::new(10.0, 10.0));
        assert_eq!(second.segments[1].values, vec![10.0, 15.0]);
    }

    #[test]
    fn test_multiple_subpaths() {
        let data = parse_path_data(b"M0 0 L1 1 M5 5 L6 6 Z M9 9");
        assert_eq!(data.len(), 3);
        assert!(!data.paths[0].is_closed);
        assert!(data.paths[1].is_closed);
        assert_eq!(data.paths[2].segments.len(), 1);
    }

    #[test]
    fn test_stops_at_unknown_command() {
        let data = parse_path_data(b"M0 0 L1 1 X 5 5 L2 2");
        assert_eq!(data.paths[0].segments.len(), 2);
    }

    #[test]
    fn test_incomplete_group_dropped() {
        let data = parse_path_data(b"M0 0 L1 1 2");
        assert_eq!(data.paths[0].segments[1].values, vec![1.0, 1.0]);

        let data = parse_path_data(b"M0 0 C1 1 2 2");
        assert_eq!(data.paths[0].segments.len(), 1);
    }

    #[test]
    fn test_must_start_with_move() {
        assert!(parse_path_data(b"L10 10").is_empty());
        assert!(parse_path_data(b"").is_empty());
        assert!(parse_path_data(b"   ").is_empty());
    }
}
