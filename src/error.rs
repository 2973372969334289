//! Error types
//!
//! Only structural failures of the document parser and resource failures
//! of loading are errors. Lexical and semantic problems inside values
//! (an unknown color, a malformed transform, a degenerate arc) resolve to
//! a documented fallback and never surface here.

use std::io;
use thiserror::Error;

/// Structural failure while building the document tree.
///
/// Every variant carries the byte offset where the problem was detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("input of {len} bytes exceeds the {limit} byte limit")]
    InputTooLarge { len: usize, limit: usize, position: usize },

    #[error("no <svg> root element found")]
    MissingRoot { position: usize },

    #[error("unterminated {what} at byte {position}")]
    Unterminated { what: &'static str, position: usize },

    #[error("malformed tag at byte {position}")]
    MalformedTag { position: usize },

    #[error("malformed attribute at byte {position}")]
    MalformedAttribute { position: usize },

    #[error("closing tag does not match <{expected}> at byte {position}")]
    MismatchedClosingTag { expected: String, position: usize },

    #[error("elements nested deeper than {limit} at byte {position}")]
    NestingTooDeep { limit: usize, position: usize },
}

impl ParseError {
    /// Byte offset in the (encoding-normalized) input
    pub fn position(&self) -> usize {
        match self {
            ParseError::InputTooLarge { position, .. }
            | ParseError::MissingRoot { position }
            | ParseError::Unterminated { position, .. }
            | ParseError::MalformedTag { position }
            | ParseError::MalformedAttribute { position }
            | ParseError::MismatchedClosingTag { position, .. }
            | ParseError::NestingTooDeep { position, .. } => *position,
        }
    }
}

/// Failure loading a document from a file or stream
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("read failed: {0}")]
    Io(#[from] io::Error),

    #[error("parse failed: {0}")]
    Parse(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position() {
        let err = ParseError::Unterminated { what: "comment", position: 42 };
        assert_eq!(err.position(), 42);
        assert_eq!(err.to_string(), "unterminated comment at byte 42");
    }

    #[test]
    fn test_mismatch_message() {
        let err = ParseError::MismatchedClosingTag { expected: "g".into(), position: 7 };
        assert_eq!(err.to_string(), "closing tag does not match <g> at byte 7");
    }

    #[test]
    fn test_load_error_from() {
        let err: LoadError = ParseError::MissingRoot { position: 0 }.into();
        assert!(matches!(err, LoadError::Parse(_)));
        let err: LoadError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(err.to_string().contains("gone"));
    }
}
