//! Path data: parsing, curve resolution and flattening
//!
//! - `parser` - `d` attribute to segments, coordinates made absolute
//! - `state` - current point and smooth-curve reflection
//! - `arc` - endpoint to center arc conversion
//! - `flatten` - primitives, polylines and bounds
//! - `cache` - LRU of parsed paths keyed by source bytes

pub mod arc;
pub mod cache;
pub mod flatten;
pub mod parser;
pub mod segment;
pub mod state;

pub use arc::ArcInfo;
pub use cache::{CacheStats, PathCache};
pub use flatten::Primitive;
pub use parser::parse_path_data;
pub use segment::{Path, PathData, PathSegment, SegmentKind};
pub use state::CurveState;
