//! String Pool for Synthesized Bytes
//!
//! Almost every name and value in a document is a span into the input
//! buffer. The exceptions are bytes the input does not contain at the
//! place they apply: style text pulled from the style table for a class,
//! id or element type, and text runs that had to be joined. Those are
//! copied once into the pool and referenced by `ByteRef::pool` spans.
//!
//! Identical copies are deduplicated by content hash, so a class used by
//! a thousand elements costs one copy of its style text.

use crate::core::span::{ByteRef, Span};
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};

/// Append-only byte store with content deduplication
#[derive(Debug, Default, Clone)]
pub struct StringPool {
    /// Buffer holding every copied string back to back
    data: Vec<u8>,
    /// Hash of string content -> spans with that hash (handles rare collisions)
    hash_index: HashMap<u64, Vec<Span>>,
}

impl StringPool {
    /// Create a new empty string pool
    pub fn new() -> Self {
        StringPool {
            data: Vec::with_capacity(1024),
            hash_index: HashMap::new(),
        }
    }

    /// Compute hash of byte slice
    #[inline]
    fn compute_hash(s: &[u8]) -> u64 {
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        hasher.finish()
    }

    /// Copy bytes into the pool, reusing an identical earlier copy
    pub fn intern(&mut self, s: &[u8]) -> Span {
        if s.is_empty() {
            return Span::empty();
        }

        let hash = Self::compute_hash(s);
        if let Some(spans) = self.hash_index.get(&hash) {
            for &span in spans {
                if span.slice(&self.data) == s {
                    return span;
                }
            }
        }

        let span = Span::from_range(self.data.len(), self.data.len() + s.len());
        self.data.extend_from_slice(s);
        self.hash_index.entry(hash).or_default().push(span);
        span
    }

    /// Bytes of a pool span
    #[inline]
    pub fn get(&self, span: Span) -> &[u8] {
        span.slice(&self.data)
    }

    /// Resolve a reference that may point into the input or the pool
    #[inline]
    pub fn resolve<'a>(&'a self, r: ByteRef, input: &'a [u8]) -> &'a [u8] {
        r.resolve(input, &self.data)
    }

    /// The whole backing buffer
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Total bytes stored
    pub fn bytes_used(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern() {
        let mut pool = StringPool::new();
        let span = pool.intern(b"fill:red");
        assert_eq!(pool.get(span), b"fill:red");
    }

    #[test]
    fn test_intern_duplicate() {
        let mut pool = StringPool::new();
        let a = pool.intern(b"fill:red");
        let b = pool.intern(b"fill:red");
        assert_eq!(a, b);
        assert_eq!(pool.bytes_used(), 8);
    }

    #[test]
    fn test_intern_different() {
        let mut pool = StringPool::new();
        let a = pool.intern(b"hello");
        let b = pool.intern(b"world");
        assert_ne!(a, b);
        assert_eq!(pool.get(b), b"world");
    }

    #[test]
    fn test_empty_string() {
        let mut pool = StringPool::new();
        assert!(pool.intern(b"").is_empty());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_resolve_origins() {
        let input = b"<text>hi</text>";
        let mut pool = StringPool::new();
        let pooled = pool.intern(b"copied");
        assert_eq!(pool.resolve(ByteRef::input(Span::from_range(6, 8)), input), b"hi");
        assert_eq!(pool.resolve(ByteRef::pool(pooled), input), b"copied");
    }
}
