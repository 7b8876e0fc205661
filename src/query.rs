//! Multi-valued query mapping and its `application/x-www-form-urlencoded` codec.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::escape::{Component, escape_bytes, unescape_bytes};

/// Decoded query parameters.
///
/// Keys are unique and kept sorted lexicographically, which makes the encoded
/// form deterministic. Each key maps to its values in the order they appeared,
/// so repeated parameters survive a parse/encode cycle.
///
/// # Examples
///
/// ```
/// use uri_components::QueryValues;
///
/// let query = QueryValues::parse("tag=a&id=7&tag=b");
/// assert_eq!(query.get("tag"), Some(&["a".to_string(), "b".to_string()][..]));
/// assert_eq!(query.encode(), "id=7&tag=a&tag=b");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryValues {
    params: BTreeMap<String, Vec<String>>,
}

impl QueryValues {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a raw query string (without the leading `?`).
    ///
    /// Pairs are separated by `&`. Empty pairs, pairs containing `;` and pairs
    /// with malformed `%` escapes are skipped. A pair without `=` decodes to an
    /// empty value, and `+` decodes to a space. Escapes that are not valid
    /// UTF-8 decode to U+FFFD.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self::from_raw_pairs(&decode_pairs(raw))
    }

    /// Decodes a raw query string and also returns its canonical encoding.
    ///
    /// The encoding is built from the decoded bytes, so escapes that are not
    /// valid UTF-8 are kept as they were instead of passing through U+FFFD.
    pub(crate) fn parse_with_encoding(raw: &str) -> (Self, String) {
        let pairs = decode_pairs(raw);
        (Self::from_raw_pairs(&pairs), encode_pairs(&pairs))
    }

    fn from_raw_pairs(pairs: &BTreeMap<Vec<u8>, Vec<Vec<u8>>>) -> Self {
        let mut values = Self::new();
        for (key, raw_values) in pairs {
            let key = String::from_utf8_lossy(key);
            for value in raw_values {
                values.append(&*key, String::from_utf8_lossy(value));
            }
        }
        values
    }

    /// Encodes the mapping as `key=value&…`, sorted by key.
    ///
    /// Keys and values keep unreserved characters, spaces become `+` and every
    /// other byte is percent-encoded. An empty mapping encodes to `""`.
    #[must_use]
    pub fn encode(&self) -> String {
        encode_pairs(&self.params)
    }

    /// Appends a value to the list for `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.entry(key.into()).or_default().push(value.into());
    }

    /// Replaces all values for `key`.
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.params.insert(key.into(), values);
    }

    /// Returns the values for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.params.get(key).map(Vec::as_slice)
    }

    /// Returns the first value for `key`, if any.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(<[String]>::first).map(String::as_str)
    }

    /// Returns true if no keys are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns an iterator over keys and their values, sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Converts the mapping to a JSON object of string arrays.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let object: Map<String, Value> = self
            .params
            .iter()
            .map(|(key, values)| {
                let values = values.iter().cloned().map(Value::String).collect();
                (key.clone(), Value::Array(values))
            })
            .collect();
        Value::Object(object)
    }
}

impl fmt::Display for QueryValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl<K, V> FromIterator<(K, V)> for QueryValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (key, value) in iter {
            values.append(key, value);
        }
        values
    }
}

/// Splits a raw query into decoded key/value bytes, skipping malformed pairs.
fn decode_pairs(raw: &str) -> BTreeMap<Vec<u8>, Vec<Vec<u8>>> {
    let mut pairs: BTreeMap<Vec<u8>, Vec<Vec<u8>>> = BTreeMap::new();

    for pair in raw.split('&') {
        if pair.is_empty() {
            continue;
        }
        if pair.contains(';') {
            tracing::debug!(pair, "skipping query pair with semicolon separator");
            continue;
        }

        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match (
            unescape_bytes(key, Component::Query),
            unescape_bytes(value, Component::Query),
        ) {
            (Ok(key), Ok(value)) => pairs
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned()),
            (Err(error), _) | (_, Err(error)) => {
                tracing::debug!(pair, ?error, "skipping malformed query pair");
            }
        }
    }

    pairs
}

fn encode_pairs<K: AsRef<[u8]>>(params: &BTreeMap<K, Vec<K>>) -> String {
    let mut encoded = String::new();
    for (key, values) in params {
        let key = escape_bytes(key.as_ref(), Component::Query);
        for value in values {
            if !encoded.is_empty() {
                encoded.push('&');
            }
            encoded.push_str(&key);
            encoded.push('=');
            encoded.push_str(&escape_bytes(value.as_ref(), Component::Query));
        }
    }
    encoded
}

#[cfg(feature = "serde")]
impl serde::Serialize for QueryValues {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_map(self.params.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for QueryValues {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let params = BTreeMap::<String, Vec<String>>::deserialize(deserializer)?;
        Ok(Self { params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty() {
        assert!(QueryValues::parse("").is_empty());
    }

    #[test]
    fn parse_multiple_params() {
        let query = QueryValues::parse("id=7&sorted=false");
        assert_eq!(query.first("id"), Some("7"));
        assert_eq!(query.first("sorted"), Some("false"));
        assert_eq!(query.len(), 2);
    }

    #[test]
    fn parse_repeated_keys_keeps_order() {
        let query = QueryValues::parse("k=2&k=1&k=3");
        assert_eq!(
            query.get("k"),
            Some(&["2".to_string(), "1".to_string(), "3".to_string()][..])
        );
    }

    #[test]
    fn parse_param_without_value() {
        let query = QueryValues::parse("flag");
        assert_eq!(query.first("flag"), Some(""));
    }

    #[test]
    fn parse_decodes_keys_and_values() {
        let query = QueryValues::parse("valid?=false&name=a+b%21");
        assert_eq!(query.first("valid?"), Some("false"));
        assert_eq!(query.first("name"), Some("a b!"));
    }

    #[test]
    fn parse_skips_malformed_pairs() {
        let query = QueryValues::parse("a=1&b=%GG&c=3;d=4&&e=5");
        let keys: Vec<_> = query.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "e"]);
    }

    #[test]
    fn invalid_utf8_keeps_bytes_in_encoding() {
        let (query, encoded) = QueryValues::parse_with_encoding("sig=%FF%FE&b=%E2%9C%93");
        assert_eq!(encoded, "b=%E2%9C%93&sig=%FF%FE");
        assert_eq!(query.first("sig"), Some("\u{FFFD}\u{FFFD}"));
        assert_eq!(query.first("b"), Some("\u{2713}"));
    }

    #[test]
    fn encode_sorted_by_key() {
        let query: QueryValues = [("z", "1"), ("a", "2")].into_iter().collect();
        assert_eq!(query.encode(), "a=2&z=1");
    }

    #[test]
    fn encode_escapes_keys_and_values() {
        let query: QueryValues = [("valid?", "false"), ("q", "a b&c")].into_iter().collect();
        assert_eq!(query.encode(), "q=a+b%26c&valid%3F=false");
    }

    #[test]
    fn encode_empty_value_keeps_equals_sign() {
        let query: QueryValues = [("flag", "")].into_iter().collect();
        assert_eq!(query.encode(), "flag=");
    }

    #[test]
    fn encode_then_parse_preserves_values() {
        let mut query = QueryValues::new();
        query.insert("x", vec!["1 2".to_string(), "=&".to_string()]);
        query.append("\u{e9}", "\u{fc}");
        assert_eq!(QueryValues::parse(&query.encode()), query);
    }

    #[test]
    fn to_value_builds_string_arrays() {
        let query = QueryValues::parse("id=7&id=8");
        assert_eq!(query.to_value(), serde_json::json!({"id": ["7", "8"]}));
    }
}
