use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The header lines of an instance file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Size,
    Target,
}

impl HeaderField {
    /// One-based line number of the field in an instance file.
    pub fn line(self) -> usize {
        match self {
            HeaderField::Size => 1,
            HeaderField::Target => 2,
        }
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderField::Size => write!(f, "size"),
            HeaderField::Target => write!(f, "target"),
        }
    }
}

/// Errors raised while building an [`crate::Instance`].
#[derive(Debug, Error)]
pub enum InstanceError {
    /// Random instances need more than two elements.
    #[error("instance size must be greater than 2, got {0}")]
    InvalidSize(i64),

    #[error("cannot open instance file {}", .path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {}: expected the {field} as a single integer, found `{content}`", .field.line())]
    MalformedHeader { field: HeaderField, content: String },

    #[error("the line listing the elements is missing")]
    TruncatedBody,

    #[error("expected {expected} elements, found {found}")]
    InsufficientElements { expected: usize, found: usize },

    #[error("{line}:{column}: element {index} is not an integer: `{token}`")]
    MalformedElement {
        index: usize,
        token: String,
        line: usize,
        column: usize,
    },

    /// The grammar rejected the input. The grammar accepts every text, so this is defensive.
    #[error("parsing error! {0}")]
    Syntax(String),
}
