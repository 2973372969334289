//! DOM Module - SVG element tree
//!
//! - `document` - owned input, recursive-descent parser, cascade
//! - `node` - elements and attributes as spans
//! - `names` - closed element/attribute sets dispatched by name hash
//! - `strings` - pool for bytes the input does not contain

pub mod document;
pub mod names;
pub mod node;
pub mod strings;

pub use document::Document;
pub use names::{AttributeKind, ElementKind};
pub use node::{Attribute, Descendants, Element};
pub use strings::StringPool;
