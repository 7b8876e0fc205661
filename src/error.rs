//! Error types for formatting and parsing URI component records.

use std::fmt;

use crate::schema::{Field, ValueKind};

/// Errors raised while checking a component record against the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The record is not an object
    NotAnObject {
        /// JSON type of the value that was supplied
        actual: &'static str,
    },
    /// A required field is absent
    MissingField {
        /// The missing field
        field: Field,
    },
    /// A field holds a value of the wrong type
    WrongType {
        /// The offending field
        field: Field,
        /// The kind of value the field accepts
        expected: ValueKind,
        /// JSON type of the value that was supplied
        actual: &'static str,
    },
    /// A field outside the closed schema is present
    UnrecognizedField {
        /// Name of the unknown field
        name: String,
    },
    /// A `query` entry is not a list of strings
    InvalidQueryValue {
        /// The query key whose values are malformed
        key: String,
        /// JSON type of the value that was supplied
        actual: &'static str,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject { actual } => {
                write!(f, "component record should be an object but is type {actual}")
            }
            Self::MissingField { field } => write!(f, "{field} is a required parameter"),
            Self::WrongType {
                field,
                expected,
                actual,
            } => write!(
                f,
                "parameter {field} should be a {expected} but is type {actual}"
            ),
            Self::UnrecognizedField { name } => {
                write!(f, "{name} is not a recognized parameter")
            }
            Self::InvalidQueryValue { key, actual } => write!(
                f,
                "query parameter {key} should be an array of strings but is type {actual}"
            ),
        }
    }
}

impl std::error::Error for SchemaError {}

/// A URI string that violates the URI grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The full string that failed to parse
    pub input: String,
    /// The specific violation
    pub kind: ParseErrorKind,
}

/// Specific grammar violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A `:` appears before any scheme character
    MissingScheme,
    /// An ASCII control character appears in the input
    ControlCharacter,
    /// A scheme-less reference has a `:` in its first path segment
    ColonInFirstSegment,
    /// An IPv6 literal host lacks its closing `]`
    MissingBracket,
    /// The text after the last `:` of the host is not a port
    InvalidPort {
        /// The offending text, including the leading `:`
        port: String,
    },
    /// The userinfo contains characters outside its grammar
    InvalidUserinfo,
    /// A `%` is not followed by two hex digits, or encodes a forbidden byte
    InvalidEscape {
        /// The offending escape sequence
        escape: String,
    },
    /// The host contains a character that must not appear there
    InvalidHostChar {
        /// The offending character
        char: char,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse {:?}: ", self.input)?;
        match &self.kind {
            ParseErrorKind::MissingScheme => write!(f, "missing protocol scheme"),
            ParseErrorKind::ControlCharacter => write!(f, "invalid control character in URL"),
            ParseErrorKind::ColonInFirstSegment => {
                write!(f, "first path segment in URL cannot contain colon")
            }
            ParseErrorKind::MissingBracket => write!(f, "missing ']' in host"),
            ParseErrorKind::InvalidPort { port } => {
                write!(f, "invalid port {port:?} after host")
            }
            ParseErrorKind::InvalidUserinfo => write!(f, "invalid userinfo"),
            ParseErrorKind::InvalidEscape { escape } => {
                write!(f, "invalid URL escape {escape:?}")
            }
            ParseErrorKind::InvalidHostChar { char } => {
                write!(f, "invalid character {:?} in host name", char.to_string())
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// A port that cannot be coerced to an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortError {
    /// A numeric port with a fractional part or outside the integer range
    NotAnInteger {
        /// The number as supplied
        value: String,
        /// The `host:port` text that was being built
        host_port: String,
    },
    /// A textual port that is not a decimal or `0x` hex integer
    Invalid {
        /// The text as supplied
        value: String,
        /// The `host:port` text that was being built
        host_port: String,
    },
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnInteger { value, host_port } => write!(
                f,
                "invalid port {value} in {host_port:?}: port must be an integer"
            ),
            Self::Invalid { value, host_port } => write!(
                f,
                "invalid port {value:?} in {host_port:?}: expected decimal or 0x-prefixed hex digits"
            ),
        }
    }
}

impl std::error::Error for PortError {}

/// Any failure of a format or parse call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    /// The component record does not match the schema
    Schema(SchemaError),
    /// A string violates the URI grammar
    Syntax(ParseError),
    /// A port could not be coerced to an integer
    Coercion(PortError),
}

impl fmt::Display for UriError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema(e) => write!(f, "{e}"),
            Self::Syntax(e) => write!(f, "{e}"),
            Self::Coercion(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for UriError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Schema(e) => Some(e),
            Self::Syntax(e) => Some(e),
            Self::Coercion(e) => Some(e),
        }
    }
}

impl From<SchemaError> for UriError {
    fn from(e: SchemaError) -> Self {
        Self::Schema(e)
    }
}

impl From<ParseError> for UriError {
    fn from(e: ParseError) -> Self {
        Self::Syntax(e)
    }
}

impl From<PortError> for UriError {
    fn from(e: PortError) -> Self {
        Self::Coercion(e)
    }
}
