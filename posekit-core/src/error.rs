//! Error types for posekit

use thiserror::Error;

/// Main error type for posekit operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Header is missing the 'end_header' line")]
    MissingEndHeader,

    #[error("Truncated {section} block: expected {expected} lines, found {found}")]
    Truncated {
        section: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Build a parse error for a 1-based source line.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}
