//! Parallel parsing of independent inputs
//!
//! Uses Rayon. Each document owns its buffer and tables, so parses share
//! nothing but the read-only name and color tables.

use crate::dom::Document;
use crate::options::ParseOptions;
use crate::path::{parse_path_data, PathData};
use rayon::prelude::*;

/// Parse several documents in parallel; results keep input order
pub fn parse_many<B>(inputs: &[B], options: &ParseOptions) -> Vec<Document>
where
    B: AsRef<[u8]> + Sync,
{
    inputs
        .par_iter()
        .map(|input| Document::parse_with(input.as_ref(), options))
        .collect()
}

/// Parse several `d` strings in parallel
pub fn parse_paths<B>(inputs: &[B]) -> Vec<PathData>
where
    B: AsRef<[u8]> + Sync,
{
    inputs.par_iter().map(|d| parse_path_data(d.as_ref())).collect()
}
