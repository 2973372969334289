//! RustySVG - Zero-copy SVG parsing
//!
//! Parses an SVG document into an element tree whose names, values and
//! text are spans into the input, and parses the languages embedded in
//! attribute values:
//!
//! - `dom` - document tree with DOCTYPE entities, comments, CDATA, mixed
//!   text content and the style cascade
//! - `style` - style sheets, `name:value` declarations, selector table
//! - `path` - path data, smooth curves, arcs, flattening
//! - `literal` - colors and transform lists
//! - `value` - numbers with units, resolved against reference sizes
//! - `core` - spans, name hashing, scanners, entities, encodings
//!
//! ```
//! use rustysvg::{AttributeKind, Document};
//!
//! let doc = Document::parse(r#"<svg><path d="M0 0 L10 0 L10 10 Z" fill="red"/></svg>"#);
//! let path = &doc.root().unwrap().children[0];
//! assert_eq!(path.attribute_value(&doc, AttributeKind::Fill), Some(&b"red"[..]));
//!
//! let data = doc.path_data(path).unwrap();
//! assert_eq!(data.paths[0].flatten(1.0, 0.25).len(), 3);
//! ```

pub mod batch;
pub mod core;
pub mod dom;
pub mod error;
pub mod geom;
pub mod literal;
pub mod options;
pub mod path;
pub mod style;
pub mod value;

pub use dom::{Attribute, AttributeKind, Document, Element, ElementKind};
pub use error::{LoadError, ParseError};
pub use geom::{Matrix, Point, Rect};
pub use literal::{parse_transform, Color};
pub use options::ParseOptions;
pub use path::{parse_path_data, Path, PathCache, PathData};
pub use style::ClassStyleTable;
pub use value::{MeasurementUnit, Value};
