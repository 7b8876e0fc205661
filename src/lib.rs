//! Formatting and parsing of URIs to and from component records.
//!
//! This crate converts between a structured record of a URI's components and
//! its canonical string form, in both directions. It backs the `uri.format`
//! and `uri.parse` functions of a policy evaluator: both are pure, take
//! already-decoded values, and return either a value or a [`UriError`].
//!
//! # Overview
//!
//! A component record is a JSON object with these fields:
//!
//! | Field | Type | Required |
//! |-------|------|----------|
//! | `scheme` | string | yes |
//! | `path` | string | yes |
//! | `username` | string | no |
//! | `password` | string | no |
//! | `hostname` | string | no |
//! | `port` | string or number | no |
//! | `query` | object of string arrays | no |
//! | `encoded_query` | string | no |
//! | `fragment` | string | no |
//!
//! The presence of `hostname` selects a hierarchical URI
//! (`scheme://[userinfo@]host[:port]/path`); without it `path` is written as
//! the opaque part (`scheme:path`). A string `port` may be decimal or
//! `0x`-prefixed hex. `encoded_query` takes precedence over `query`. An empty
//! `fragment` still produces a trailing `#`.
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//!
//! let uri = uri_components::format(&json!({
//!     "scheme": "https",
//!     "hostname": "www.openpolicyagent.org",
//!     "path": "",
//!     "port": "0x1BB",
//!     "query": {"id": ["7"], "sorted": ["false"]}
//! }))
//! .unwrap();
//! assert_eq!(uri, "https://www.openpolicyagent.org:443?id=7&sorted=false");
//!
//! let record = uri_components::parse(&uri).unwrap();
//! assert_eq!(record["port"], json!(443));
//! assert_eq!(record["encoded_query"], json!("id=7&sorted=false"));
//! ```
//!
//! # Typed API
//!
//! The JSON entry points are thin wrappers over [`UriComponents`]:
//!
//! ```rust
//! use uri_components::{Mode, UriComponents};
//!
//! let uri = UriComponents::parse("mailto:user@openpolicyagent.org#").unwrap();
//! assert_eq!(uri.mode(), Mode::Opaque);
//! assert_eq!(uri.fragment(), Some(""));
//! assert_eq!(uri.format().unwrap(), "mailto:user@openpolicyagent.org#");
//! ```
//!
//! # Errors
//!
//! - [`SchemaError`]: the record is missing a required field, holds a value of
//!   the wrong type, or has an unrecognized field.
//! - [`ParseError`]: a string (the input of `parse`, or the composed output of
//!   `format`) violates the URI grammar.
//! - [`PortError`]: a port cannot be coerced to an integer.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod builder;
mod builtin;
mod components;
mod constants;
mod error;
mod escape;
#[cfg(kani)]
mod kani_impls;
mod port;
pub mod prelude;
mod query;
mod reference;
mod schema;

pub use builder::{HasAuthority, NoAuthority, UriComponentsBuilder};
pub use builtin::{format, parse};
pub use components::{Mode, UriComponents};
pub use constants::{
    ENCODED_QUERY_KEY, FORMAT_FUNCTION, FRAGMENT_KEY, HOSTNAME_KEY, PARSE_FUNCTION, PASSWORD_KEY,
    PATH_KEY, PORT_KEY, QUERY_KEY, SCHEME_KEY, USERNAME_KEY,
};
pub use error::{ParseError, ParseErrorKind, PortError, SchemaError, UriError};
pub use port::Port;
pub use query::QueryValues;
pub use schema::{Field, UnrecognizedFields, Validator, ValueKind};
