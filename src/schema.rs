//! The closed schema of component records and the validator that enforces it.

use std::fmt;

use serde_json::{Map, Value};

use crate::components::UriComponents;
use crate::constants::{
    ENCODED_QUERY_KEY, FRAGMENT_KEY, HOSTNAME_KEY, PASSWORD_KEY, PATH_KEY, PORT_KEY, QUERY_KEY,
    SCHEME_KEY, USERNAME_KEY,
};
use crate::error::SchemaError;
use crate::port::Port;
use crate::query::QueryValues;

/// A recognized field of a component record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// `scheme`
    Scheme,
    /// `path`
    Path,
    /// `username`
    Username,
    /// `password`
    Password,
    /// `hostname`
    Hostname,
    /// `port`
    Port,
    /// `query`
    Query,
    /// `encoded_query`
    EncodedQuery,
    /// `fragment`
    Fragment,
}

impl Field {
    /// Returns the record key for this field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheme => SCHEME_KEY,
            Self::Path => PATH_KEY,
            Self::Username => USERNAME_KEY,
            Self::Password => PASSWORD_KEY,
            Self::Hostname => HOSTNAME_KEY,
            Self::Port => PORT_KEY,
            Self::Query => QUERY_KEY,
            Self::EncodedQuery => ENCODED_QUERY_KEY,
            Self::Fragment => FRAGMENT_KEY,
        }
    }

    /// Looks up a field by its record key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        SCHEMA
            .iter()
            .map(|rule| rule.field)
            .find(|field| field.as_str() == key)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of JSON value a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A JSON string
    String,
    /// A JSON string or number
    StringOrNumber,
    /// A JSON object
    Object,
}

impl ValueKind {
    /// Returns true if `value` is of this kind.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::StringOrNumber => value.is_string() || value.is_number(),
            Self::Object => value.is_object(),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::StringOrNumber => f.write_str("string or number"),
            Self::Object => f.write_str("object"),
        }
    }
}

/// One row of the record schema.
#[derive(Debug, Clone, Copy)]
struct FieldRule {
    field: Field,
    required: bool,
    kind: ValueKind,
}

#[rustfmt::skip]
const SCHEMA: [FieldRule; 9] = [
    FieldRule { field: Field::Scheme, required: true, kind: ValueKind::String },
    FieldRule { field: Field::Path, required: true, kind: ValueKind::String },
    FieldRule { field: Field::Username, required: false, kind: ValueKind::String },
    FieldRule { field: Field::Password, required: false, kind: ValueKind::String },
    FieldRule { field: Field::Hostname, required: false, kind: ValueKind::String },
    FieldRule { field: Field::Port, required: false, kind: ValueKind::StringOrNumber },
    FieldRule { field: Field::Query, required: false, kind: ValueKind::Object },
    FieldRule { field: Field::EncodedQuery, required: false, kind: ValueKind::String },
    FieldRule { field: Field::Fragment, required: false, kind: ValueKind::String },
];

/// What the validator does with keys outside the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnrecognizedFields {
    /// Fail with [`SchemaError::UnrecognizedField`]
    #[default]
    Reject,
    /// Skip unknown keys
    Ignore,
}

/// Checks component records against the schema and extracts them.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use uri_components::{UnrecognizedFields, Validator};
///
/// let record = json!({"scheme": "https", "hostname": "example.org", "path": "/", "extra": 1});
/// assert!(Validator::new().validate(&record).is_err());
///
/// let lenient = Validator::new().unrecognized(UnrecognizedFields::Ignore);
/// assert_eq!(lenient.validate(&record).unwrap().hostname(), Some("example.org"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    unrecognized: UnrecognizedFields,
}

impl Validator {
    /// Creates a validator that rejects unrecognized fields.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            unrecognized: UnrecognizedFields::Reject,
        }
    }

    /// Sets the policy for keys outside the schema.
    #[must_use]
    pub const fn unrecognized(mut self, policy: UnrecognizedFields) -> Self {
        self.unrecognized = policy;
        self
    }

    /// Validates `record` and extracts its fields.
    ///
    /// Required fields are checked first, then every key of the record in
    /// key order.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if the record is not an object, a required field
    /// is missing, a field has the wrong type, an unrecognized field is present
    /// (under [`UnrecognizedFields::Reject`]), or a `query` entry is not a list
    /// of strings.
    pub fn validate(&self, record: &Value) -> Result<UriComponents, SchemaError> {
        let Value::Object(object) = record else {
            return Err(SchemaError::NotAnObject {
                actual: json_type(record),
            });
        };

        for rule in SCHEMA.iter().filter(|rule| rule.required) {
            if !object.contains_key(rule.field.as_str()) {
                return Err(SchemaError::MissingField { field: rule.field });
            }
        }

        for (key, value) in object {
            let Some(rule) = SCHEMA.iter().find(|rule| rule.field.as_str() == key) else {
                match self.unrecognized {
                    UnrecognizedFields::Reject => {
                        return Err(SchemaError::UnrecognizedField { name: key.clone() });
                    }
                    UnrecognizedFields::Ignore => continue,
                }
            };
            if !rule.kind.matches(value) {
                return Err(SchemaError::WrongType {
                    field: rule.field,
                    expected: rule.kind,
                    actual: json_type(value),
                });
            }
        }

        extract(object)
    }
}

fn extract(object: &Map<String, Value>) -> Result<UriComponents, SchemaError> {
    let string = |field: Field| {
        object
            .get(field.as_str())
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    let required = |field: Field| string(field).ok_or(SchemaError::MissingField { field });

    let port = match object.get(PORT_KEY) {
        Some(Value::Number(number)) => Some(Port::Number(number.clone())),
        Some(Value::String(text)) => Some(Port::from_text(text)),
        _ => None,
    };

    let query = match object.get(QUERY_KEY) {
        Some(Value::Object(entries)) => Some(query_values(entries)?),
        _ => None,
    };

    Ok(UriComponents {
        scheme: required(Field::Scheme)?,
        path: required(Field::Path)?,
        username: string(Field::Username),
        password: string(Field::Password),
        hostname: string(Field::Hostname),
        port,
        query,
        encoded_query: string(Field::EncodedQuery),
        fragment: string(Field::Fragment),
    })
}

fn query_values(entries: &Map<String, Value>) -> Result<QueryValues, SchemaError> {
    let mut query = QueryValues::new();
    for (key, value) in entries {
        let invalid = |actual| SchemaError::InvalidQueryValue {
            key: key.clone(),
            actual,
        };
        let Value::Array(items) = value else {
            return Err(invalid(json_type(value)));
        };
        let values = items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(|| invalid(json_type(item))))
            .collect::<Result<Vec<_>, _>>()?;
        query.insert(key.clone(), values);
    }
    Ok(query)
}

/// Returns the JSON type name of `value`, as used in error messages.
pub(crate) const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
