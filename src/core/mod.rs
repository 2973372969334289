//! Core parsing primitives
//!
//! This module contains the fundamental building blocks every parser in
//! the crate shares:
//! - Span: offset+length views into the document buffer (or string pool)
//! - Hash: case-insensitive Jenkins one-at-a-time name hashing
//! - Scanner: byte cursor with memchr-accelerated delimiter search
//! - Entities: character entity decoding with in-place compaction
//! - Encoding: BOM / UTF-16 detection and conversion to UTF-8
//! - DTD: DOCTYPE internal-subset entity table

pub mod dtd;
pub mod encoding;
pub mod entities;
pub mod hash;
pub mod scanner;
pub mod span;
