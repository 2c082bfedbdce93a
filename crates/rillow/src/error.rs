//! Error types for rillow

use std::fmt;
use thiserror::Error;

/// Position in a response body
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

/// Range in a response body
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn at(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// What went wrong while reading an XML body
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    UnexpectedEof,
    InvalidToken,
    InvalidName,
    InvalidEntity { entity: String },
    InvalidUtf8,
    MismatchedTag { expected: String, found: String },
    DuplicateAttribute { name: String },
    TrailingContent,
    MissingRoot,
    MaxDepthExceeded { max: u16 },
    MaxSizeExceeded { max: usize },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::InvalidToken => write!(f, "invalid token"),
            Self::InvalidName => write!(f, "invalid name"),
            Self::InvalidEntity { entity } => write!(f, "invalid entity: &{entity};"),
            Self::InvalidUtf8 => write!(f, "invalid utf-8"),
            Self::MismatchedTag { expected, found } => {
                write!(f, "mismatched closing tag: expected </{expected}>, found </{found}>")
            }
            Self::DuplicateAttribute { name } => write!(f, "duplicate attribute: {name}"),
            Self::TrailingContent => write!(f, "content after root element"),
            Self::MissingRoot => write!(f, "no root element"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
        }
    }
}

/// Malformed response body
#[derive(Error, Clone, Debug, PartialEq)]
pub struct ParseError {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl ParseError {
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
    pub fn at(kind: ErrorKind, pos: Pos) -> Self {
        Self::new(kind, Span::at(pos))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error at {}: {}", self.span.start, self.message)
    }
}

/// Failure to obtain a response body
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to build http client")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} returned status {status}")]
    Status { url: String, status: u16 },
}

/// An option value the web service would reject
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum OptionError {
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        min: u32,
        max: u32,
        value: u32,
    },
    #[error("{name} must not be empty")]
    Empty { name: &'static str },
    #[error("unknown {name}: {value}")]
    Unknown { name: &'static str, value: String },
}

/// Client configuration problems
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing web service id (set {0})")]
    MissingServiceId(&'static str),
    #[error("invalid base url {url}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("base url {0} cannot carry query parameters")]
    UnsupportedBaseUrl(String),
}

/// Main error type for rillow
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    InvalidOption(#[from] OptionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for rillow
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
    fn test_parse_error_display() {
        let err = ParseError::at(ErrorKind::UnexpectedEof, Pos::new(10, 2, 5));
        assert_eq!(err.to_string(), "error at 10:2:5: unexpected end of input");
        assert_eq!(err.kind(), &ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_parse_error_custom_message() {
        let err = ParseError::with_message(ErrorKind::InvalidToken, Span::empty(), "expected '>'");
        assert_eq!(err.message(), "expected '>'");
        assert_eq!(err.span(), Span::empty());
    }

    #[test]
    fn test_option_error_display() {
        let err = OptionError::OutOfRange {
            name: "width",
            min: 200,
            max: 600,
            value: 50,
        };
        assert_eq!(err.to_string(), "width must be between 200 and 600, got 50");
    }

    #[test]
    fn test_error_is_transparent() {
        let err: Error = ParseError::at(ErrorKind::MissingRoot, Pos::default()).into();
        assert!(matches!(err, Error::Parse(_)));
        assert_eq!(err.to_string(), "error at 0:0:0: no root element");
    }
}
