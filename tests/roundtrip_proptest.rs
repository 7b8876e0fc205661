//! Property-based tests for the format and parse round trips.
//!
//! Records are generated from the component grammar, formatted, parsed back
//! and compared field by field.

use std::collections::BTreeMap;

use proptest::prelude::*;

use uri_components::{Mode, Port, QueryValues, UriComponents};

/// Strategies for generating component values that survive a round trip.
mod strategies {
    use super::*;

    /// Valid characters for DNS labels
    const DNS_LABEL_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789-";

    /// Path characters that are never escaped
    const PLAIN_PATH_CHARS: &[u8] =
        b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-._~$&+,;=:@";

    /// Generate a lower-case scheme
    pub fn scheme() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9+.-]{0,8}"
    }

    /// Generate a DNS label with alphanumeric ends
    pub fn dns_label() -> impl Strategy<Value = String> {
        (
            "[a-z0-9]",
            prop::collection::vec(prop::sample::select(DNS_LABEL_CHARS.to_vec()), 0..=10),
            "[a-z0-9]",
        )
            .prop_map(|(first, middle, last)| {
                let mut label = first;
                label.extend(middle.into_iter().map(char::from));
                label.push_str(&last);
                label
            })
    }

    /// Generate a domain name of one to three labels
    pub fn hostname() -> impl Strategy<Value = String> {
        prop::collection::vec(dns_label(), 1..=3).prop_map(|labels| labels.join("."))
    }

    /// Generate a rooted path whose characters need no escaping
    pub fn plain_path() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop::collection::vec(prop::sample::select(PLAIN_PATH_CHARS.to_vec()), 0..=8),
            0..=4,
        )
        .prop_map(|segments| {
            segments
                .into_iter()
                .map(|segment| format!("/{}", segment.into_iter().map(char::from).collect::<String>()))
                .collect::<String>()
        })
    }

    /// Generate an opaque part: non-empty, not rooted, free of `?`, `#` and `%`
    pub fn opaque_path() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9@.:_~!$&'()*+,;=-][a-zA-Z0-9@.:/_~!$&'()*+,;=-]{0,20}"
    }

    /// Generate arbitrary printable text
    pub fn text() -> impl Strategy<Value = String> {
        "\\PC{0,10}"
    }

    /// Generate a query mapping with one to three values per key
    pub fn query() -> impl Strategy<Value = BTreeMap<String, Vec<String>>> {
        prop::collection::btree_map(text(), prop::collection::vec(text(), 1..=3), 0..=4)
    }

    /// Generate a user name and optional password
    pub fn userinfo() -> impl Strategy<Value = (String, Option<String>)> {
        ("[a-zA-Z0-9 @:/?%]{1,8}", prop::option::of("[a-zA-Z0-9 @:/?%]{0,8}"))
    }
}

use strategies::*;

fn to_query_values(mapping: &BTreeMap<String, Vec<String>>) -> QueryValues {
    let mut query = QueryValues::new();
    for (key, values) in mapping {
        query.insert(key.clone(), values.clone());
    }
    query
}

mod opaque_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// Scheme and opaque path come back unchanged
        #[test]
        fn opaque_record_roundtrips(scheme in scheme(), path in opaque_path()) {
            let formatted = UriComponents::new(scheme.clone(), path.clone()).format().unwrap();
            prop_assert_eq!(&formatted, &format!("{scheme}:{path}"));

            let parsed = UriComponents::parse(&formatted).unwrap();
            prop_assert_eq!(parsed.mode(), Mode::Opaque);
            prop_assert_eq!(parsed.scheme(), scheme.as_str());
            prop_assert_eq!(parsed.path(), path.as_str());
        }
    }
}

mod query_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// Keys and per-key value order survive format then parse
        #[test]
        fn query_mapping_roundtrips(mapping in query()) {
            let expected = to_query_values(&mapping);
            let uri = UriComponents::builder("https", "/")
                .hostname("example.org")
                .query(expected.clone())
                .build();

            let parsed = UriComponents::parse(&uri.format().unwrap()).unwrap();
            prop_assert_eq!(parsed.query(), Some(&expected));
            let encoded = expected.encode();
            prop_assert_eq!(parsed.encoded_query(), Some(encoded.as_str()));
        }

        /// Parsing an encoded query and encoding it again is stable
        #[test]
        fn query_encoding_is_canonical(mapping in query()) {
            let encoded = to_query_values(&mapping).encode();
            prop_assert_eq!(QueryValues::parse(&encoded).encode(), encoded);
        }
    }
}

mod fragment_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// A present fragment, empty or not, survives with its `#`
        #[test]
        fn fragment_presence_roundtrips(fragment in prop::option::of(text())) {
            let mut builder = UriComponents::builder("https", "/a").hostname("example.org");
            if let Some(fragment) = &fragment {
                builder = builder.fragment(fragment.clone());
            }
            let formatted = builder.build().format().unwrap();
            prop_assert_eq!(formatted.contains('#'), fragment.is_some());

            let parsed = UriComponents::parse(&formatted).unwrap();
            prop_assert_eq!(parsed.fragment(), fragment.as_deref());
        }
    }
}

mod port_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        /// Hex text, decimal text and numbers format identically
        #[test]
        fn port_forms_agree(port in any::<u16>()) {
            let format_with = |port: Port| {
                UriComponents::builder("https", "")
                    .hostname("example.org")
                    .port(port)
                    .build()
                    .format()
                    .unwrap()
            };
            let from_number = format_with(Port::from(port));
            prop_assert_eq!(&from_number, &format!("https://example.org:{port}"));
            prop_assert_eq!(&format_with(Port::from_text(&format!("0x{port:X}"))), &from_number);
            prop_assert_eq!(&format_with(Port::from_text(&port.to_string())), &from_number);
        }
    }
}

mod hierarchical_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// Authority fields come back unchanged and formatting is stable
        #[test]
        fn hierarchical_record_roundtrips(
            scheme in scheme(),
            hostname in hostname(),
            port in prop::option::of(any::<u16>()),
            userinfo in prop::option::of(userinfo()),
            path in plain_path(),
        ) {
            let mut builder = UriComponents::builder(scheme.clone(), path.clone())
                .hostname(hostname.clone());
            if let Some(port) = port {
                builder = builder.port(port);
            }
            builder = match &userinfo {
                Some((username, Some(password))) => {
                    builder.user_password(username.clone(), password.clone())
                }
                Some((username, None)) => builder.user(username.clone()),
                None => builder,
            };

            let formatted = builder.build().format().unwrap();
            let parsed = UriComponents::parse(&formatted).unwrap();

            prop_assert_eq!(parsed.scheme(), scheme.as_str());
            prop_assert_eq!(parsed.hostname(), Some(hostname.as_str()));
            let expected_port = port.map(Port::from);
            prop_assert_eq!(parsed.port(), expected_port.as_ref());
            prop_assert_eq!(parsed.path(), path.as_str());
            prop_assert_eq!(parsed.username(), userinfo.as_ref().map(|(u, _)| u.as_str()));
            prop_assert_eq!(
                parsed.password(),
                userinfo.as_ref().and_then(|(_, p)| p.as_deref())
            );
            prop_assert_eq!(parsed.format().unwrap(), formatted);
        }
    }
}
