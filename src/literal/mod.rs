//! Color and transform literal parsers

pub mod color;
pub mod named_colors;
pub mod transform;

pub use color::Color;
pub use transform::{parse_transform, try_parse_transform};
