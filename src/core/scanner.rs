//! Byte cursor and lexical primitives
//!
//! Every parser in the crate walks its input through a `Scanner`: a
//! `(current, end)` cursor pair over a borrowed buffer. Scanners never
//! allocate; identifiers and strings come back as `Span`s into the buffer.
//!
//! Uses memchr for delimiter searches (SIMD-accelerated where available).

use super::hash::NameHasher;
use super::span::Span;
use crate::value::MeasurementUnit;
use memchr::{memchr, memchr2, memmem};

/// Byte cursor over `input[pos..end]`
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the whole input
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Scanner { input, pos: 0, end: input.len() }
    }

    /// Create a scanner restricted to `input[start..end]`.
    /// Spans produced are still relative to the start of `input`.
    #[inline]
    pub fn with_range(input: &'a [u8], start: usize, end: usize) -> Self {
        let end = end.min(input.len());
        Scanner { input, pos: start.min(end), end }
    }

    /// Scanner over the bytes a span covers
    #[inline]
    pub fn for_span(input: &'a [u8], span: Span) -> Self {
        Self::with_range(input, span.start(), span.end())
    }

    /// Get the current position
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Set the current position
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.end);
    }

    /// Get the end position (exclusive)
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// The whole underlying buffer
    #[inline]
    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    /// Check if we've reached the end
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.end
    }

    /// Get remaining bytes
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.pos..self.end]
    }

    /// Get the bytes a span covers
    #[inline]
    pub fn bytes(&self, span: Span) -> &'a [u8] {
        span.slice(self.input)
    }

    /// Peek at current byte without advancing
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        if self.pos < self.end {
            Some(self.input[self.pos])
        } else {
            None
        }
    }

    /// Peek at byte at offset from current position
    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        let p = self.pos + offset;
        if p < self.end {
            Some(self.input[p])
        } else {
            None
        }
    }

    /// Advance by n bytes
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.end);
    }

    /// Consume `b` if it is the current byte
    #[inline]
    pub fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Check if input starts with a byte sequence at current position
    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.remaining().starts_with(needle)
    }

    /// As `starts_with`, ignoring ASCII case
    #[inline]
    pub fn starts_with_ignore_case(&self, needle: &[u8]) -> bool {
        let rest = self.remaining();
        rest.len() >= needle.len() && rest[..needle.len()].eq_ignore_ascii_case(needle)
    }

    // ------------------------------------------------------------------
    // Blank skipping
    // ------------------------------------------------------------------

    /// Skip ASCII blanks (any byte <= 0x20).
    /// Returns false if the end was reached.
    #[inline]
    pub fn skip_blanks(&mut self) -> bool {
        while self.pos < self.end && self.input[self.pos] <= b' ' {
            self.pos += 1;
        }
        self.pos < self.end
    }

    /// Skip blanks and at most one comma.
    /// Returns false if the end was reached.
    pub fn skip_blanks_and_comma(&mut self) -> bool {
        if !self.skip_blanks() {
            return false;
        }
        if self.input[self.pos] == b',' {
            self.pos += 1;
            return self.skip_blanks();
        }
        true
    }

    /// Skip blanks and `/* ... */` comments (style-sheet dialect).
    /// An unterminated comment runs to the end.
    pub fn skip_style_blanks(&mut self) -> bool {
        loop {
            if !self.skip_blanks() {
                return false;
            }
            if !self.starts_with(b"/*") {
                return true;
            }
            self.pos += 2;
            match memmem::find(self.remaining(), b"*/") {
                Some(i) => self.pos += i + 2,
                None => self.pos = self.end,
            }
        }
    }

    // ------------------------------------------------------------------
    // Searching
    // ------------------------------------------------------------------

    /// Find next occurrence of a specific byte
    #[inline]
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        memchr(byte, self.remaining()).map(|i| self.pos + i)
    }

    /// Find next occurrence of either of two bytes
    #[inline]
    pub fn find_byte2(&self, b1: u8, b2: u8) -> Option<usize> {
        memchr2(b1, b2, self.remaining()).map(|i| self.pos + i)
    }

    /// Find next occurrence of a byte sequence
    #[inline]
    pub fn find_seq(&self, needle: &[u8]) -> Option<usize> {
        memmem::find(self.remaining(), needle).map(|i| self.pos + i)
    }

    /// Find tag end while handling quotes properly
    /// Returns the position of '>' that is not inside quotes
    pub fn find_tag_end_quoted(&self) -> Option<usize> {
        let mut pos = self.pos;
        let mut quote: Option<u8> = None;

        while pos < self.end {
            match (self.input[pos], quote) {
                (b'"' | b'\'', None) => quote = Some(self.input[pos]),
                (c, Some(q)) if c == q => quote = None,
                (b'>', None) => return Some(pos),
                _ => {}
            }
            pos += 1;
        }
        None
    }

    /// Span from the current position up to (not including) `delimiter`,
    /// advancing past the delimiter. None if the delimiter is missing.
    pub fn read_until(&mut self, delimiter: u8) -> Option<Span> {
        let stop = self.find_byte(delimiter)?;
        let span = Span::from_range(self.pos, stop);
        self.pos = stop + 1;
        Some(span)
    }

    // ------------------------------------------------------------------
    // Identifiers
    // ------------------------------------------------------------------

    /// Read an XML-style name (letter/underscore/colon start, then
    /// letters, digits, `-`, `_`, `.`, `:`)
    pub fn read_name(&mut self) -> Option<Span> {
        let start = self.pos;
        match self.peek() {
            Some(b) if is_name_start_char(b) => self.pos += 1,
            _ => return None,
        }
        while self.pos < self.end && is_name_char(self.input[self.pos]) {
            self.pos += 1;
        }
        Some(Span::from_range(start, self.pos))
    }

    /// Read an alphabetic word
    pub fn parse_word(&mut self) -> Option<Span> {
        let start = self.pos;
        while self.pos < self.end && self.input[self.pos].is_ascii_alphabetic() {
            self.pos += 1;
        }
        if self.pos == start {
            None
        } else {
            Some(Span::from_range(start, self.pos))
        }
    }

    /// Read an identifier that may contain digits, `-` and `_`, optionally
    /// wrapped in single or double quotes (the quotes are not part of
    /// the returned span).
    pub fn parse_word_extended(&mut self) -> Option<Span> {
        if let Some(q @ (b'"' | b'\'')) = self.peek() {
            let save = self.pos;
            self.pos += 1;
            let span = self.parse_word_extended_bare();
            if span.is_some() && self.eat(q) {
                return span;
            }
            self.pos = save;
            return None;
        }
        self.parse_word_extended_bare()
    }

    fn parse_word_extended_bare(&mut self) -> Option<Span> {
        let start = self.pos;
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() || b == b'_' || b == b'-' => self.pos += 1,
            _ => return None,
        }
        while self.pos < self.end && is_word_char(self.input[self.pos]) {
            self.pos += 1;
        }
        Some(Span::from_range(start, self.pos))
    }

    /// Hash an identifier-shaped run without materializing it. Stops at
    /// `:`, so a property name never takes its separator along.
    pub fn parse_name_hash(&mut self) -> Option<u32> {
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() || b == b'_' || b == b'-' => {}
            _ => return None,
        }
        let mut hasher = NameHasher::new();
        while self.pos < self.end && is_word_char(self.input[self.pos]) {
            hasher = hasher.push(self.input[self.pos]);
            self.pos += 1;
        }
        Some(hasher.finish())
    }

    /// Read a single- or double-quoted string; returns the inner span and
    /// leaves the cursor after the closing quote
    pub fn parse_quoted(&mut self) -> Option<Span> {
        let quote = match self.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return None,
        };
        let start = self.pos + 1;
        let stop = memchr(quote, &self.input[start..self.end])? + start;
        self.pos = stop + 1;
        Some(Span::from_range(start, stop))
    }

    // ------------------------------------------------------------------
    // Numbers
    // ------------------------------------------------------------------

    /// Parse an optionally signed decimal with optional exponent.
    /// Leaves the cursor untouched and returns None if no digits were
    /// consumed.
    pub fn parse_number(&mut self) -> Option<f64> {
        let start = self.pos;
        let mut p = self.pos;
        let input = self.input;

        if p < self.end && matches!(input[p], b'+' | b'-') {
            p += 1;
        }
        let mut digits = 0;
        while p < self.end && input[p].is_ascii_digit() {
            p += 1;
            digits += 1;
        }
        if p < self.end && input[p] == b'.' {
            let mut q = p + 1;
            let mut frac = 0;
            while q < self.end && input[q].is_ascii_digit() {
                q += 1;
                frac += 1;
            }
            if digits > 0 || frac > 0 {
                p = q;
                digits += frac;
            }
        }
        if digits == 0 {
            return None;
        }
        // Exponent only if digits follow; otherwise `e` starts a unit (em/ex)
        if p < self.end && matches!(input[p], b'e' | b'E') {
            let mut q = p + 1;
            if q < self.end && matches!(input[q], b'+' | b'-') {
                q += 1;
            }
            if q < self.end && input[q].is_ascii_digit() {
                while q < self.end && input[q].is_ascii_digit() {
                    q += 1;
                }
                p = q;
            }
        }

        let text = std::str::from_utf8(&input[start..p]).ok()?;
        let value = text.parse::<f64>().ok()?;
        self.pos = p;
        Some(value)
    }

    /// Parse a number followed by an optional unit suffix.
    ///
    /// Recognized suffixes: `%`, `cm`, `mm`, `in`, `em`, `ex`, `pt`,
    /// `pc`, `px`, `deg`, `rad`. No suffix yields `Undefined`; an
    /// unrecognized alphabetic suffix is consumed and yields `Pixel`.
    pub fn parse_number_with_unit(&mut self) -> Option<(f64, MeasurementUnit)> {
        let value = self.parse_number()?;
        if self.eat(b'%') {
            return Some((value, MeasurementUnit::Percent));
        }
        let start = self.pos;
        while self.pos < self.end && self.input[self.pos].is_ascii_alphabetic() {
            self.pos += 1;
        }
        if self.pos == start {
            return Some((value, MeasurementUnit::Undefined));
        }
        let unit = MeasurementUnit::from_suffix(&self.input[start..self.pos])
            .unwrap_or(MeasurementUnit::Pixel);
        Some((value, unit))
    }

    /// Parse an arc flag: a single decimal digit, nonzero meaning true
    pub fn parse_flag(&mut self) -> Option<bool> {
        match self.peek() {
            Some(b) if b.is_ascii_digit() => {
                self.pos += 1;
                Some(b != b'0')
            }
            _ => None,
        }
    }
}

/// Check if byte is valid name start character
/// Allows ASCII letters, underscore, colon, and non-ASCII (UTF-8 Unicode)
#[inline]
pub fn is_name_start_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

/// Check if byte is valid name character
#[inline]
pub fn is_name_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b'.' | b':') || b >= 0x80
}

/// Check if byte continues a style word or property name
#[inline]
pub fn is_word_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hash::name_hash;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_skip_blanks_and_comma() {
        let mut s = Scanner::new(b"  ,  7");
        assert!(s.skip_blanks_and_comma());
        assert_eq!(s.peek(), Some(b'7'));

        // only one comma is swallowed
        let mut s = Scanner::new(b" , , 7");
        s.skip_blanks_and_comma();
        assert_eq!(s.peek(), Some(b','));
    }

    #[test]
    fn test_skip_style_blanks() {
        let mut s = Scanner::new(b"  /* a */ /* b */ .cls");
        assert!(s.skip_style_blanks());
        assert_eq!(s.peek(), Some(b'.'));

        let mut s = Scanner::new(b" /* never closed");
        assert!(!s.skip_style_blanks());
    }

    #[test]
    fn test_read_name() {
        let mut s = Scanner::new(b"xlink:href=");
        let span = s.read_name().unwrap();
        assert_eq!(s.bytes(span), b"xlink:href");
        assert_eq!(s.peek(), Some(b'='));
    }

    #[test]
    fn test_parse_word() {
        let mut s = Scanner::new(b"translate(10)");
        let span = s.parse_word().unwrap();
        assert_eq!(s.bytes(span), b"translate");
        assert!(Scanner::new(b"42").parse_word().is_none());
    }

    #[test]
    fn test_parse_word_extended() {
        let mut s = Scanner::new(b"font-family_2 x");
        let span = s.parse_word_extended().unwrap();
        assert_eq!(s.bytes(span), b"font-family_2");

        let mut s = Scanner::new(b"'Open-Sans'");
        let span = s.parse_word_extended().unwrap();
        assert_eq!(s.bytes(span), b"Open-Sans");
        assert!(s.is_eof());

        // unbalanced quote restores the cursor
        let mut s = Scanner::new(b"'Open");
        assert!(s.parse_word_extended().is_none());
        assert_eq!(s.position(), 0);
    }

    #[test]
    fn test_parse_name_hash() {
        let mut s = Scanner::new(b"Stroke-Width:");
        assert_eq!(s.parse_name_hash(), Some(name_hash(b"stroke-width")));
        assert_eq!(s.peek(), Some(b':'));

        let mut s = Scanner::new(b"xlink:href");
        assert_eq!(s.parse_name_hash(), Some(name_hash(b"xlink")));
        assert_eq!(s.position(), 5);

        let mut s = Scanner::new(b"2px");
        assert_eq!(s.parse_name_hash(), None);
        assert_eq!(s.position(), 0);
    }

    #[test]
    fn test_parse_quoted() {
        let mut s = Scanner::new(b"\"a'b\" rest");
        let span = s.parse_quoted().unwrap();
        assert_eq!(s.bytes(span), b"a'b");
        assert_eq!(s.peek(), Some(b' '));
        assert!(Scanner::new(b"'open").parse_quoted().is_none());
    }

    #[test]
    fn test_parse_number_plain() {
        let cases: [(&[u8], f64); 6] = [
            (b"42", 42.0),
            (b"-3.25", -3.25),
            (b"+7", 7.0),
            (b".5", 0.5),
            (b"5.", 5.0),
            (b"0.001", 0.001),
        ];
        for (text, expected) in cases {
            let mut s = Scanner::new(text);
            assert!(approx(s.parse_number().unwrap(), expected), "{:?}", text);
            assert!(s.is_eof());
        }
    }

    #[test]
    fn test_parse_number_round_trip() {
        for n in [0.0, 1.0, -1.5, 123.456, 1e-4, 98765.4321, -0.0625] {
            let text = format!("{}", n);
            let mut s = Scanner::new(text.as_bytes());
            assert!(approx(s.parse_number().unwrap(), n), "{}", text);
        }
    }

    #[test]
    fn test_parse_number_exponent() {
        let mut s = Scanner::new(b"1e3");
        assert!(approx(s.parse_number().unwrap(), 1000.0));
        let mut s = Scanner::new(b"1.5e-2");
        assert!(approx(s.parse_number().unwrap(), 0.015));
        let mut s = Scanner::new(b"2E+2");
        assert!(approx(s.parse_number().unwrap(), 200.0));
    }

    #[test]
    fn test_parse_number_compact_sequences() {
        let mut s = Scanner::new(b"10-5.5.5");
        assert_eq!(s.parse_number(), Some(10.0));
        assert_eq!(s.parse_number(), Some(-5.5));
        assert_eq!(s.parse_number(), Some(0.5));
        assert!(s.is_eof());
    }

    #[test]
    fn test_parse_number_no_digits() {
        let cases: [&[u8]; 5] = [b"-", b".", b"abc", b"", b"+."];
        for text in cases {
            let mut s = Scanner::new(text);
            assert!(s.parse_number().is_none());
            assert_eq!(s.position(), 0);
        }
    }

    #[test]
    fn test_parse_number_with_unit() {
        let cases: [(&[u8], f64, MeasurementUnit); 13] = [
            (b"10", 10.0, MeasurementUnit::Undefined),
            (b"50%", 50.0, MeasurementUnit::Percent),
            (b"2cm", 2.0, MeasurementUnit::Centimeter),
            (b"3mm", 3.0, MeasurementUnit::Millimeter),
            (b"1in", 1.0, MeasurementUnit::Inch),
            (b"2em", 2.0, MeasurementUnit::Em),
            (b"2ex", 2.0, MeasurementUnit::Ex),
            (b"12pt", 12.0, MeasurementUnit::Point),
            (b"1pc", 1.0, MeasurementUnit::Pica),
            (b"5px", 5.0, MeasurementUnit::Pixel),
            (b"90deg", 90.0, MeasurementUnit::Degree),
            (b"1rad", 1.0, MeasurementUnit::Radian),
            (b"4furlongs", 4.0, MeasurementUnit::Pixel),
        ];
        for (text, value, unit) in cases {
            let mut s = Scanner::new(text);
            let (v, u) = s.parse_number_with_unit().unwrap();
            assert!(approx(v, value));
            assert_eq!(u, unit, "{:?}", std::str::from_utf8(text));
            assert!(s.is_eof());
        }
    }

    #[test]
    fn test_exponent_versus_em() {
        let mut s = Scanner::new(b"1e2em");
        let (v, u) = s.parse_number_with_unit().unwrap();
        assert!(approx(v, 100.0));
        assert_eq!(u, MeasurementUnit::Em);
    }

    #[test]
    fn test_parse_flag() {
        let mut s = Scanner::new(b"10");
        assert_eq!(s.parse_flag(), Some(true));
        assert_eq!(s.parse_flag(), Some(false));
        assert_eq!(s.parse_flag(), None);
    }

    #[test]
    fn test_find_tag_end_quoted() {
        let s = Scanner::new(b"<a attr=\">test\">content");
        assert_eq!(s.find_tag_end_quoted(), Some(15));
    }

    #[test]
    fn test_range_scanner() {
        let input = b"xx 12 yy";
        let mut s = Scanner::with_range(input, 3, 5);
        assert_eq!(s.parse_number(), Some(12.0));
        assert!(s.is_eof());
        assert_eq!(s.end(), 5);
    }
}
