//! Color literal parsing
//!
//! Accepts, in this order, `rgb()`/`rgba()` functional notation,
//! `#rgb`/`#rrggbb` hex, and named keywords. Colors are packed ARGB,
//! alpha in the high byte.

use super::named_colors;
use crate::core::scanner::Scanner;
use crate::value::MeasurementUnit;

const OPAQUE: u32 = 0xFF00_0000;
const ALPHA_MASK: u32 = 0xFF00_0000;
const RGB_MASK: u32 = 0x00FF_FFFF;

/// Packed `0xAARRGGBB` color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    pub const TRANSPARENT: Color = Color(0);
    pub const BLACK: Color = Color(OPAQUE);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    #[inline]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Replace the alpha channel
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Color((self.0 & RGB_MASK) | ((a as u32) << 24))
    }

    /// Parse a color literal on its own
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        parse_literal(bytes).map(|(c, _)| Color(c))
    }

    /// Parse a color over an existing one.
    ///
    /// On failure `self` is left unchanged and false is returned. When
    /// the current color carries a partial alpha (set earlier by an
    /// opacity declaration) and the new literal has no alpha of its
    /// own, that alpha survives.
    pub fn parse_into(&mut self, bytes: &[u8]) -> bool {
        let Some((argb, explicit_alpha)) = parse_literal(bytes) else {
            return false;
        };
        let prior_alpha = self.alpha();
        self.0 = if !explicit_alpha && (1..=254).contains(&prior_alpha) {
            (argb & RGB_MASK) | (self.0 & ALPHA_MASK)
        } else {
            argb
        };
        true
    }
}

/// Parse a literal; the flag reports whether it spelled out an alpha
fn parse_literal(bytes: &[u8]) -> Option<(u32, bool)> {
    let mut s = Scanner::new(bytes);
    if !s.skip_blanks() {
        return None;
    }
    if s.starts_with_ignore_case(b"rgba(") {
        s.advance(5);
        return parse_functional(&mut s);
    }
    if s.starts_with_ignore_case(b"rgb(") {
        s.advance(4);
        return parse_functional(&mut s);
    }
    if s.eat(b'#') {
        return parse_hex(s.remaining()).map(|c| (c, false));
    }
    let word = s.parse_word()?;
    let argb = named_colors::lookup(s.bytes(word))?;
    // `transparent` spells out its zero alpha
    Some((argb, argb & ALPHA_MASK != OPAQUE))
}

/// `r, g, b [, a] )` with the function name already consumed
fn parse_functional(s: &mut Scanner<'_>) -> Option<(u32, bool)> {
    let mut channels = [0u8; 3];
    for (i, ch) in channels.iter_mut().enumerate() {
        if i == 0 {
            s.skip_blanks();
        } else {
            s.skip_blanks_and_comma();
        }
        let (v, unit) = s.parse_number_with_unit()?;
        *ch = channel(v, unit);
    }
    s.skip_blanks_and_comma();
    let mut alpha = None;
    if s.peek() != Some(b')') {
        let (v, unit) = s.parse_number_with_unit()?;
        alpha = Some(alpha_channel(v, unit));
        s.skip_blanks();
    }
    if !s.eat(b')') {
        return None;
    }
    let [r, g, b] = channels;
    let color = Color::from_argb(alpha.unwrap_or(255), r, g, b);
    Some((color.0, alpha.is_some()))
}

fn channel(v: f64, unit: MeasurementUnit) -> u8 {
    let v = if unit == MeasurementUnit::Percent { v * 255.0 / 100.0 } else { v };
    v.round().clamp(0.0, 255.0) as u8
}

/// Fractions in (0,1) exclusive scale to 0..255; anything else is taken
/// as a byte value
fn alpha_channel(v: f64, unit: MeasurementUnit) -> u8 {
    let v = if unit == MeasurementUnit::Percent {
        v * 255.0 / 100.0
    } else if v > 0.0 && v < 1.0 {
        v * 255.0
    } else {
        v
    };
    v.round().clamp(0.0, 255.0) as u8
}

/// `rgb` or `rrggbb`, always opaque
fn parse_hex(digits: &[u8]) -> Option<u32> {
    let len = digits.iter().take_while(|b| b.is_ascii_hexdigit()).count();
    let nibble = |b: u8| (b as char).to_digit(16).map(|d| d as u32);
    let rgb = match len {
        3 => {
            let mut rgb = 0u32;
            for &b in &digits[..3] {
                let d = nibble(b)?;
                rgb = (rgb << 8) | (d * 17);
            }
            rgb
        }
        6 => {
            let mut rgb = 0u32;
            for &b in &digits[..6] {
                rgb = (rgb << 4) | nibble(b)?;
            }
            rgb
        }
        _ => return None,
    };
    Some(OPAQUE | rgb)
}
