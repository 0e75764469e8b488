//! Error types for xmlmap

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// Error kind for detailed categorization
///
/// The first group is produced by the XML tokenizer and carries real spans.
/// The parse-class kinds are raised by the model-level parser and identify
/// the offending field by its dotted path (e.g. `Hello.size`); the
/// render-class kind is raised when a required field has neither a value
/// nor a default at render time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidToken,
    Expected { expected: String, found: String },
    TagMismatch { expected: String, found: String },
    MissingAttribute { field: String },
    MissingElement { field: String },
    InvalidValue { field: String, expected: &'static str },
    UnknownField { field: String },
    MissingValue { field: String },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken => write!(f, "invalid token"),
            Self::Expected { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::TagMismatch { expected, found } => {
                write!(f, "root tag mismatch: expected <{expected}>, found <{found}>")
            }
            Self::MissingAttribute { field } => {
                write!(f, "missing required attribute: {field}")
            }
            Self::MissingElement { field } => {
                write!(f, "missing required element: {field}")
            }
            Self::InvalidValue { field, expected } => {
                write!(f, "invalid value for {field}: expected {expected}")
            }
            Self::UnknownField { field } => write!(f, "unknown field: {field}"),
            Self::MissingValue { field } => {
                write!(f, "no value and no default for required field: {field}")
            }
        }
    }
}

/// Main error type for xmlmap
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, offset: usize, line: u32, col: u32) -> Self {
        let pos = Pos::new(offset, line, col);
        Self::new(kind, Span::new(pos, pos))
    }

    /// Create a spanless mapping error
    pub fn mapping(kind: ErrorKind) -> Self {
        Self::new(kind, Span::empty())
    }

    /// True for errors raised while mapping XML onto a model
    pub fn is_parse(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::TagMismatch { .. }
                | ErrorKind::MissingAttribute { .. }
                | ErrorKind::MissingElement { .. }
                | ErrorKind::InvalidValue { .. }
        )
    }

    /// True for errors raised while rendering a model instance
    pub fn is_render(&self) -> bool {
        matches!(self.kind, ErrorKind::MissingValue { .. })
    }

    /// True for well-formedness errors from the XML tokenizer
    pub fn is_xml(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::InvalidToken | ErrorKind::Expected { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_xml() {
            write!(f, "error at {}: {}", self.span.start, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

/// Result type alias for xmlmap
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_display() {
        let pos = Pos::new(42, 10, 5);
        assert_eq!(pos.to_string(), "42:10:5");
    }

    #[test]
    fn test_error_creation() {
        let err = Error::at(ErrorKind::InvalidToken, 0, 1, 1);
        assert_eq!(err.kind(), &ErrorKind::InvalidToken);
        assert!(err.is_xml());
        assert!(!err.is_parse());
    }

    #[test]
    fn test_error_classification() {
        let err = Error::mapping(ErrorKind::MissingElement {
            field: "Hello.size".to_string(),
        });
        assert!(err.is_parse());
        assert!(!err.is_render());

        let err = Error::mapping(ErrorKind::MissingValue {
            field: "Hello.size".to_string(),
        });
        assert!(err.is_render());
        assert!(!err.is_parse());
    }

    #[test]
    fn test_error_display() {
        let err = Error::at(ErrorKind::InvalidToken, 10, 2, 5);
        let display = err.to_string();
        assert!(display.contains("error at"));
        assert!(display.contains("invalid token"));

        let err = Error::mapping(ErrorKind::InvalidValue {
            field: "Hello.size".to_string(),
            expected: "integer",
        });
        assert_eq!(err.to_string(), "invalid value for Hello.size: expected integer");
    }
}
