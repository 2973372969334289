//! Span - offset and length into a document buffer
//!
//! Zero-copy reference to a portion of a buffer owned by the document.
//! Used for element names, attribute names/values, and text content.
//!
//! Two buffers exist per document: the original input and a small pool
//! holding bytes that had to be synthesized (merged class styles,
//! element-type default styles). `ByteRef` records which one a span
//! points into.

/// A span referencing a portion of a buffer.
///
/// Size: 8 bytes (offset: 4 bytes, len: 4 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[repr(C)]
pub struct Span {
    /// Byte offset into the buffer
    pub offset: u32,
    /// Length in bytes
    pub len: u32,
}

impl Span {
    /// Create a new span
    #[inline]
    pub const fn new(offset: u32, len: u32) -> Self {
        Self { offset, len }
    }

    /// Create a span covering `start..end`
    #[inline]
    pub fn from_range(start: usize, end: usize) -> Self {
        let end = end.max(start);
        debug_assert!(end <= u32::MAX as usize, "span end {end} exceeds u32");
        Self::new(start as u32, (end - start) as u32)
    }

    /// Create an empty span (used for "no value")
    #[inline]
    pub const fn empty() -> Self {
        Self { offset: 0, len: 0 }
    }

    /// Check if this span is empty
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the start offset
    #[inline]
    pub const fn start(&self) -> usize {
        self.offset as usize
    }

    /// Get the end offset (exclusive)
    #[inline]
    pub const fn end(&self) -> usize {
        self.offset as usize + self.len as usize
    }

    /// Extract the byte slice from the buffer
    #[inline]
    pub fn slice<'a>(&self, buffer: &'a [u8]) -> &'a [u8] {
        let start = self.start();
        let end = start.saturating_add(self.len as usize);
        if end <= buffer.len() {
            &buffer[start..end]
        } else {
            &[]
        }
    }

    /// Extract as UTF-8 string from the buffer
    #[inline]
    pub fn as_str<'a>(&self, buffer: &'a [u8]) -> Option<&'a str> {
        std::str::from_utf8(self.slice(buffer)).ok()
    }

    /// Shrink the span so it excludes leading and trailing blanks
    pub fn trim(&self, buffer: &[u8]) -> Span {
        let bytes = self.slice(buffer);
        let lead = bytes.iter().take_while(|&&b| b <= b' ').count();
        let trail = bytes[lead..].iter().rev().take_while(|&&b| b <= b' ').count();
        Span::from_range(self.start() + lead, self.end() - trail)
    }
}

/// Which buffer a span points into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Origin {
    /// The original document bytes
    #[default]
    Input,
    /// The document's pool of synthesized bytes
    Pool,
}

/// A span tagged with the buffer it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ByteRef {
    pub origin: Origin,
    pub span: Span,
}

impl ByteRef {
    #[inline]
    pub const fn input(span: Span) -> Self {
        Self { origin: Origin::Input, span }
    }

    #[inline]
    pub const fn pool(span: Span) -> Self {
        Self { origin: Origin::Pool, span }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Resolve against the two document buffers
    #[inline]
    pub fn resolve<'a>(&self, input: &'a [u8], pool: &'a [u8]) -> &'a [u8] {
        match self.origin {
            Origin::Input => self.span.slice(input),
            Origin::Pool => self.span.slice(pool),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_basic() {
        let span = Span::new(5, 10);
        assert_eq!(span.offset, 5);
        assert_eq!(span.len, 10);
        assert_eq!(span.end(), 15);
        assert!(!span.is_empty());
    }

    #[test]
    fn test_span_empty() {
        let span = Span::empty();
        assert!(span.is_empty());
        assert_eq!(span.slice(b"abc"), b"");
    }

    #[test]
    fn test_span_slice() {
        let input = b"hello world";
        let span = Span::new(6, 5);
        assert_eq!(span.slice(input), b"world");
        assert_eq!(span.as_str(input), Some("world"));
    }

    #[test]
    fn test_span_out_of_bounds() {
        let span = Span::new(8, 10);
        assert_eq!(span.slice(b"short"), b"");
    }

    #[test]
    fn test_span_trim() {
        let input = b"a:  red \n;";
        let span = Span::from_range(2, 9).trim(input);
        assert_eq!(span.slice(input), b"red");
    }

    #[test]
    fn test_byte_ref_resolve() {
        let input = b"input bytes";
        let pool = b"pool bytes";
        let a = ByteRef::input(Span::new(0, 5));
        let b = ByteRef::pool(Span::new(0, 4));
        assert_eq!(a.resolve(input, pool), b"input");
        assert_eq!(b.resolve(input, pool), b"pool");
    }
}
