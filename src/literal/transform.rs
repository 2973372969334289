//! Transform list parsing
//!
//! `translate(10,20) rotate(45 5 5) scale(2)` becomes one affine matrix.
//! Each function's matrix is right-multiplied onto the running result in
//! document order, so the last function listed is the first one applied
//! to a point. Anything malformed anywhere in the list makes the whole
//! list the identity: SVG forbids partial transforms.

use crate::core::scanner::Scanner;
use crate::geom::Matrix;
use crate::value::{MeasurementUnit, Value};

const MAX_ARGS: usize = 6;

/// Transform function families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransformFn {
    Matrix,
    Translate,
    TranslateX,
    TranslateY,
    Scale,
    Rotate,
    SkewX,
    SkewY,
}

impl TransformFn {
    fn from_name(name: &[u8]) -> Option<Self> {
        const NAMES: [(&[u8], TransformFn); 8] = [
            (b"matrix", TransformFn::Matrix),
            (b"translate", TransformFn::Translate),
            (b"translateX", TransformFn::TranslateX),
            (b"translateY", TransformFn::TranslateY),
            (b"scale", TransformFn::Scale),
            (b"rotate", TransformFn::Rotate),
            (b"skewX", TransformFn::SkewX),
            (b"skewY", TransformFn::SkewY),
        ];
        NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, f)| f)
    }

    /// Build the matrix for `args` (1..=6 values); None if the argument
    /// count does not fit the function
    fn matrix(self, args: &[f64]) -> Option<Matrix> {
        let m = match (self, args) {
            (TransformFn::Matrix, &[a, b, c, d, e, f]) => Matrix([a, b, c, d, e, f]),
            (TransformFn::Translate, &[tx]) => Matrix::translate(tx, 0.0),
            (TransformFn::Translate, &[tx, ty]) => Matrix::translate(tx, ty),
            (TransformFn::TranslateX, &[tx]) => Matrix::translate(tx, 0.0),
            (TransformFn::TranslateY, &[ty]) => Matrix::translate(0.0, ty),
            (TransformFn::Scale, &[s]) => Matrix::scale(s, s),
            (TransformFn::Scale, &[sx, sy]) => Matrix::scale(sx, sy),
            (TransformFn::Rotate, &[deg]) => Matrix::rotate(deg),
            (TransformFn::Rotate, &[deg, cx]) => Matrix::rotate_about(deg, cx, 0.0),
            (TransformFn::Rotate, &[deg, cx, cy]) => Matrix::rotate_about(deg, cx, cy),
            (TransformFn::SkewX, &[deg]) => Matrix::skew_x(deg),
            (TransformFn::SkewY, &[deg]) => Matrix::skew_y(deg),
            _ => return None,
        };
        Some(m)
    }
}

/// Parse a transform list. Empty input is the identity.
pub fn parse_transform(bytes: &[u8]) -> Matrix {
    try_parse_transform(bytes).unwrap_or_else(Matrix::identity)
}

/// As `parse_transform`, but reports a malformed list as None
pub fn try_parse_transform(bytes: &[u8]) -> Option<Matrix> {
    let mut s = Scanner::new(bytes);
    let mut result = Matrix::identity();

    while s.skip_blanks_and_comma() {
        let name = s.parse_word_extended()?;
        let func = TransformFn::from_name(s.bytes(name))?;
        s.skip_blanks();
        if !s.eat(b'(') {
            return None;
        }

        let mut args = [0.0; MAX_ARGS];
        let mut count = 0;
        s.skip_blanks();
        while s.peek() != Some(b')') {
            if count == MAX_ARGS {
                return None;
            }
            let (raw, unit) = s.parse_number_with_unit()?;
            // angles given in radians are normalized to degrees
            args[count] = match unit {
                MeasurementUnit::Radian => Value::new(raw, unit).resolve(0.0, 0.0),
                _ => raw,
            };
            count += 1;
            s.skip_blanks_and_comma();
        }
        s.advance(1);

        if count == 0 {
            return None;
        }
        result = result.multiply(&func.matrix(&args[..count])?);
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;

    fn apply(src: &[u8], x: f64, y: f64) -> Point {
        parse_transform(src).apply(Point::new(x, y))
    }

    fn approx(p: Point, x: f64, y: f64) -> bool {
        p.approx_eq(Point::new(x, y), 1e-9)
    }

    #[test]
    fn test_translate_forms() {
        assert!(approx(apply(b"translate(10,20)", 1.0, 1.0), 11.0, 21.0));
        assert!(approx(apply(b"translate(10)", 1.0, 1.0), 11.0, 1.0));
        assert!(approx(apply(b"translateX(5)", 0.0, 0.0), 5.0, 0.0));
        assert!(approx(apply(b"translateY(5)", 0.0, 0.0), 0.0, 5.0));
    }

    #[test]
    fn test_scale_defaults_sy() {
        assert!(approx(apply(b"scale(2)", 3.0, 4.0), 6.0, 8.0));
        assert!(approx(apply(b"scale(2 -1)", 3.0, 4.0), 6.0, -4.0));
    }

    #[test]
    fn test_rotate() {
        assert!(approx(apply(b"rotate(90)", 1.0, 0.0), 0.0, 1.0));
        assert!(approx(apply(b"rotate(180, 5, 5)", 0.0, 0.0), 10.0, 10.0));
        let half_turn = std::f64::consts::PI;
        let src = format!("rotate({}rad)", half_turn);
        assert!(approx(apply(src.as_bytes(), 1.0, 0.0), -1.0, 0.0));
    }

    #[test]
    fn test_matrix() {
        assert!(approx(apply(b"matrix(1 0 0 1 7 8)", 0.0, 0.0), 7.0, 8.0));
        assert!(approx(apply(b"matrix(2,0,0,3,0,0)", 1.0, 1.0), 2.0, 3.0));
    }

    #[test]
    fn test_document_order_composition() {
        // scale applies first, then translate
        assert!(approx(apply(b"translate(10,0) scale(2)", 1.0, 1.0), 12.0, 2.0));
        assert!(approx(apply(b"scale(2),translate(10,0)", 1.0, 1.0), 22.0, 2.0));
    }

    #[test]
    fn test_malformed_is_identity() {
        let cases: [&[u8]; 8] = [
            b"translate()",
            b"rotate(",
            b"scale(1) bogus(2)",
            b"matrix(1 2 3)",
            b"translate(1 2 3 4 5 6 7)",
            b"skewX(a)",
            b"translate 10",
            b"scale(1) 42",
        ];
        for src in cases {
            assert!(parse_transform(src).is_identity(), "{:?}", std::str::from_utf8(src));
            assert!(try_parse_transform(src).is_none());
        }
    }

    #[test]
    fn test_empty_is_identity() {
        assert_eq!(try_parse_transform(b"   "), Some(Matrix::identity()));
    }

    #[test]
    fn test_skew() {
        assert!(approx(apply(b"skewX(45)", 0.0, 2.0), 2.0, 2.0));
        assert!(approx(apply(b"skewY(45)", 2.0, 0.0), 2.0, 2.0));
    }
}
