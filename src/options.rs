//! Parser configuration

/// Ceiling on document size whatever `max_input_len` says. Spans hold
/// 32-bit offsets, and the string pool can grow to about twice the input.
pub const MAX_INPUT_LEN: usize = 1 << 30;

/// Options for document parsing.
///
/// ```
/// use rustysvg::ParseOptions;
/// let opts = ParseOptions::default().with_max_input_len(1 << 20).with_max_depth(64);
/// assert_eq!(opts.max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject buffers larger than this before parsing; capped at
    /// [`MAX_INPUT_LEN`]
    pub max_input_len: Option<usize>,
    /// Element nesting limit
    pub max_depth: usize,
    /// Limit for entities expanding into further entity references
    pub max_entity_depth: usize,
    /// Strip a UTF-8 BOM and convert UTF-16 to UTF-8 before parsing
    pub convert_encoding: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_input_len: None,
            max_depth: 512,
            max_entity_depth: 8,
            convert_encoding: true,
        }
    }
}

impl ParseOptions {
    /// The size limit actually applied
    pub fn input_limit(&self) -> usize {
        self.max_input_len.map_or(MAX_INPUT_LEN, |limit| limit.min(MAX_INPUT_LEN))
    }

    pub fn with_max_input_len(mut self, limit: usize) -> Self {
        self.max_input_len = Some(limit);
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_max_entity_depth(mut self, depth: usize) -> Self {
        self.max_entity_depth = depth;
        self
    }

    pub fn with_convert_encoding(mut self, convert: bool) -> Self {
        self.convert_encoding = convert;
        self
    }
}
