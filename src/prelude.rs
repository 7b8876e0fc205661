//! Convenient re-exports for glob imports.
//!
//! ```rust
//! use uri_components::prelude::*;
//!
//! let uri = UriComponents::parse("https://example.org/a?b=c").unwrap();
//! assert_eq!(uri.mode(), Mode::Hierarchical);
//! ```
//!
//! Builder state markers (`NoAuthority`, `HasAuthority`) and the record key
//! constants are left out.

pub use crate::{
    // Core types
    Field, Mode, Port, QueryValues, UriComponents, ValueKind,
    // Validation and construction
    UnrecognizedFields, UriComponentsBuilder, Validator,
    // Errors
    ParseError, ParseErrorKind, PortError, SchemaError, UriError,
    // Entry points
    format, parse,
};
