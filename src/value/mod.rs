//! Value/Unit model
//!
//! Numbers as written in a document carry a unit (or none). They are
//! kept in that form until a consumer knows the reference dimension and
//! font size, then resolved to pixels.

pub mod length;
pub mod unit;

pub use length::{ResolvedRect, Value, ValuePoint, ValueRect};
pub use unit::MeasurementUnit;
