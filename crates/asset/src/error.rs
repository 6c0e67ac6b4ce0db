//! Typed parse errors shared by the OBJ and MTL parsers.

use thiserror::Error;

/// Error raised while parsing OBJ/MTL text. Line numbers are 1-based.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("Missing {field} on line {line}")]
    MissingField { line: usize, field: &'static str },

    #[error("Failed to parse {field} from '{value}' on line {line}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("Malformed face index '{token}' on line {line}: {reason}")]
    FaceIndex {
        line: usize,
        token: String,
        reason: String,
    },

    #[error("Vertex {index} has no color on line {line}, but vertex colors are in use")]
    MissingVertexColor { line: usize, index: usize },

    #[error("'{keyword}' on line {line} appears before any 'newmtl'")]
    NoActiveMaterial { line: usize, keyword: String },
}

pub type ParseResult<T> = Result<T, ParseError>;
