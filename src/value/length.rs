//! Dimensioned values and their resolution to pixels

use super::unit::MeasurementUnit;
use crate::core::scanner::Scanner;
use std::f64::consts::{PI, SQRT_2};

/// A scalar tagged with a measurement unit.
///
/// A bare number (unit `Undefined`) is ambiguous in SVG: `0.5` on a
/// gradient offset means half the reference length, while `0.5` on a
/// stroke width means half a pixel. `percent_threshold` resolves it: a
/// bare number whose magnitude is below the threshold is a fraction of
/// the reference dimension, anything else is absolute pixels. The
/// default threshold of `0.0` makes every bare number absolute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Value {
    /// Raw number as written; NaN when unset
    pub raw: f64,
    pub unit: MeasurementUnit,
    pub percent_threshold: f64,
}

impl Default for Value {
    fn default() -> Self {
        Self::unset()
    }
}

impl Value {
    /// Threshold used for attributes where bare `0..1` values are fractions
    pub const FRACTION_THRESHOLD: f64 = 1.0;

    pub const fn new(raw: f64, unit: MeasurementUnit) -> Self {
        Self { raw, unit, percent_threshold: 0.0 }
    }

    pub const fn unset() -> Self {
        Self::new(f64::NAN, MeasurementUnit::Undefined)
    }

    pub const fn with_threshold(mut self, percent_threshold: f64) -> Self {
        self.percent_threshold = percent_threshold;
        self
    }

    /// Parse a number with optional unit suffix
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let mut scanner = Scanner::new(bytes);
        scanner.skip_blanks();
        let (raw, unit) = scanner.parse_number_with_unit()?;
        Some(Self::new(raw, unit))
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.raw.is_finite()
    }

    /// Resolve to pixels (or degrees for angles).
    ///
    /// `reference` is the length percentages and fractions apply to;
    /// `font_size` is used by `em`/`ex`.
    pub fn resolve(&self, reference: f64, font_size: f64) -> f64 {
        if !self.is_valid() {
            return 0.0;
        }
        let raw = self.raw;
        match self.unit {
            MeasurementUnit::Undefined => {
                if raw.abs() < self.percent_threshold {
                    raw * reference
                } else {
                    raw
                }
            }
            MeasurementUnit::Percent => raw * 0.01 * reference,
            MeasurementUnit::Em => raw * font_size,
            MeasurementUnit::Ex => raw * font_size * 0.5,
            MeasurementUnit::Radian => raw * 180.0 / PI,
            unit => raw * unit.pixels_per_unit().unwrap_or(1.0),
        }
    }

    /// Resolve against the diagonal of a `width` x `height` box,
    /// `hypot(width, height) / sqrt(2)`, as SVG does for lengths that
    /// are neither horizontal nor vertical (stroke widths, radii of
    /// circles).
    pub fn resolve_diagonal(&self, width: f64, height: f64, font_size: f64) -> f64 {
        self.resolve(width.hypot(height) / SQRT_2, font_size)
    }
}

/// An x/y pair of values resolved independently
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValuePoint {
    pub x: Value,
    pub y: Value,
}

impl ValuePoint {
    pub fn new(x: Value, y: Value) -> Self {
        Self { x, y }
    }

    /// X against `width`, Y against `height`
    pub fn resolve(&self, width: f64, height: f64, font_size: f64) -> (f64, f64) {
        (self.x.resolve(width, font_size), self.y.resolve(height, font_size))
    }
}

/// A rectangle of values; missing `left`/`top` resolve to 0
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValueRect {
    pub left: Value,
    pub top: Value,
    pub width: Value,
    pub height: Value,
}

/// A resolved rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResolvedRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ResolvedRect {
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl ValueRect {
    pub fn new(left: Value, top: Value, width: Value, height: Value) -> Self {
        Self { left, top, width, height }
    }

    /// Parse four numbers, as found in `viewBox`
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let mut scanner = Scanner::new(bytes);
        let mut vals = [Value::unset(); 4];
        for v in vals.iter_mut() {
            scanner.skip_blanks_and_comma();
            let (raw, unit) = scanner.parse_number_with_unit()?;
            *v = Value::new(raw, unit);
        }
        Some(Self::new(vals[0], vals[1], vals[2], vals[3]))
    }

    pub fn resolve(&self, width: f64, height: f64, font_size: f64) -> ResolvedRect {
        ResolvedRect {
            left: self.left.resolve(width, font_size),
            top: self.top.resolve(height, font_size),
            width: self.width.resolve(width, font_size),
            height: self.height.resolve(height, font_size),
        }
    }

    /// Empty when either dimension resolves to zero or less
    pub fn is_empty(&self, width: f64, height: f64, font_size: f64) -> bool {
        self.resolve(width, height, font_size).is_empty()
    }
}
