//! Percent escaping and unescaping for each URI component.
//!
//! Every component keeps the unreserved characters (`A-Z a-z 0-9 - _ . ~`) and
//! a component-specific subset of the reserved ones; everything else, including
//! all non-ASCII bytes, is written as upper-case `%XX`.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, percent_encode};

use crate::error::ParseErrorKind;

const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const PATH: &AsciiSet = &UNRESERVED
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b',')
    .remove(b'/')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'@');

const USERINFO: &AsciiSet = &UNRESERVED
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=');

const HOST: &AsciiSet = &UNRESERVED
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b':')
    .remove(b'[')
    .remove(b']')
    .remove(b'<')
    .remove(b'>')
    .remove(b'"');

// Spaces pass through here and are rewritten to `+` afterwards.
const QUERY: &AsciiSet = &UNRESERVED.remove(b' ');

const FRAGMENT: &AsciiSet = &PATH.remove(b'?').remove(b'!').remove(b'(').remove(b')').remove(b'*');

/// The URI component a string is escaped for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Component {
    Path,
    Userinfo,
    Host,
    Query,
    Fragment,
}

impl Component {
    const fn escape_set(self) -> &'static AsciiSet {
        match self {
            Self::Path => PATH,
            Self::Userinfo => USERINFO,
            Self::Host => HOST,
            Self::Query => QUERY,
            Self::Fragment => FRAGMENT,
        }
    }
}

/// Escapes `input` for use as `component`.
pub(crate) fn escape(input: &str, component: Component) -> Cow<'_, str> {
    escape_bytes(input.as_bytes(), component)
}

/// Escapes raw bytes, which need not be valid UTF-8.
pub(crate) fn escape_bytes(input: &[u8], component: Component) -> Cow<'_, str> {
    let encoded: Cow<'_, str> = percent_encode(input, component.escape_set()).into();
    if component == Component::Query && encoded.contains(' ') {
        Cow::Owned(encoded.replace(' ', "+"))
    } else {
        encoded
    }
}

/// Reverses [`escape`], rejecting malformed `%` sequences.
///
/// Escapes that do not form valid UTF-8 decode to U+FFFD.
pub(crate) fn unescape(input: &str, component: Component) -> Result<Cow<'_, str>, ParseErrorKind> {
    Ok(match unescape_bytes(input, component)? {
        Cow::Borrowed(_) => Cow::Borrowed(input),
        Cow::Owned(bytes) => Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()),
    })
}

/// Reverses [`escape_bytes`], rejecting malformed `%` sequences.
///
/// In a query component `+` decodes to a space. In a host, bare ASCII
/// characters outside the host grammar are rejected and escapes may only
/// encode non-ASCII bytes or `%` itself.
pub(crate) fn unescape_bytes(
    input: &str,
    component: Component,
) -> Result<Cow<'_, [u8]>, ParseErrorKind> {
    let bytes = input.as_bytes();
    let mut has_escape = false;
    let mut has_plus = false;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let end = (i + 3).min(bytes.len());
                let malformed = end - i < 3
                    || !bytes[i + 1].is_ascii_hexdigit()
                    || !bytes[i + 2].is_ascii_hexdigit();
                let ascii_in_host = component == Component::Host
                    && !malformed
                    && bytes[i + 1] < b'8'
                    && &bytes[i..end] != b"%25";
                if malformed || ascii_in_host {
                    return Err(ParseErrorKind::InvalidEscape {
                        escape: String::from_utf8_lossy(&bytes[i..end]).into_owned(),
                    });
                }
                has_escape = true;
                i += 3;
            }
            b'+' => {
                has_plus |= component == Component::Query;
                i += 1;
            }
            b if component == Component::Host && b.is_ascii() && !is_host_byte(b) => {
                return Err(ParseErrorKind::InvalidHostChar { char: b as char });
            }
            _ => i += 1,
        }
    }

    if !has_escape && !has_plus {
        return Ok(Cow::Borrowed(bytes));
    }

    let source = if has_plus {
        Cow::Owned(input.replace('+', " "))
    } else {
        Cow::Borrowed(input)
    };
    Ok(Cow::Owned(percent_decode_str(&source).collect()))
}

/// Returns true if `path` is already a valid escaped path and can be kept
/// verbatim instead of being re-escaped.
pub(crate) fn is_valid_escaped_path(path: &str) -> bool {
    path.bytes()
        .all(|b| b.is_ascii_alphanumeric() || b"-_.~$&+,/:;=@!'()*[]%".contains(&b))
}

/// Returns true if `userinfo` only holds characters allowed before the `@`.
pub(crate) fn is_valid_userinfo(userinfo: &str) -> bool {
    userinfo
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b"-._:~!$&'()*+,;=%@".contains(&b))
}

const fn is_host_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'-' | b'_'
                | b'.'
                | b'~'
                | b'!'
                | b'$'
                | b'&'
                | b'\''
                | b'('
                | b')'
                | b'*'
                | b'+'
                | b','
                | b';'
                | b'='
                | b':'
                | b'['
                | b']'
                | b'<'
                | b'>'
                | b'"'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_keeps_sub_delims_and_escapes_question_mark() {
        assert_eq!(escape("/a b/c;d=e?", Component::Path), "/a%20b/c;d=e%3F");
    }

    #[test]
    fn path_escapes_non_ascii_as_utf8_bytes() {
        assert_eq!(escape("/caf\u{e9}", Component::Path), "/caf%C3%A9");
    }

    #[test]
    fn userinfo_escapes_delimiters() {
        assert_eq!(escape("us:er@x/y", Component::Userinfo), "us%3Aer%40x%2Fy");
    }

    #[test]
    fn query_component_uses_plus_for_space() {
        assert_eq!(escape("a b?&=", Component::Query), "a+b%3F%26%3D");
    }

    #[test]
    fn fragment_keeps_punctuation() {
        assert_eq!(escape("sec(1)!/x?y", Component::Fragment), "sec(1)!/x?y");
        assert_eq!(escape("a#b", Component::Fragment), "a%23b");
    }

    #[test]
    fn unescape_without_escapes_borrows() {
        let out = unescape("plain", Component::Path).unwrap();
        assert!(matches!(out, Cow::Borrowed("plain")));
    }

    #[test]
    fn unescape_decodes_percent_sequences() {
        assert_eq!(unescape("a%20b%3F", Component::Path).unwrap(), "a b?");
    }

    #[test]
    fn unescape_plus_only_in_query() {
        assert_eq!(unescape("a+b", Component::Query).unwrap(), "a b");
        assert_eq!(unescape("a+b", Component::Path).unwrap(), "a+b");
        assert_eq!(unescape("a%2Bb", Component::Query).unwrap(), "a+b");
    }

    #[test]
    fn invalid_utf8_escapes_survive_as_bytes() {
        let bytes = unescape_bytes("a%FF%FE", Component::Query).unwrap();
        assert_eq!(&*bytes, b"a\xFF\xFE");
        assert_eq!(escape_bytes(&bytes, Component::Query), "a%FF%FE");
        assert_eq!(
            unescape("a%FF", Component::Query).unwrap(),
            "a\u{FFFD}"
        );
    }

    #[test]
    fn unescape_rejects_truncated_escape() {
        assert_eq!(
            unescape("abc%4", Component::Fragment),
            Err(ParseErrorKind::InvalidEscape {
                escape: "%4".to_string()
            })
        );
    }

    #[test]
    fn unescape_rejects_non_hex_escape() {
        assert_eq!(
            unescape("%zz", Component::Path),
            Err(ParseErrorKind::InvalidEscape {
                escape: "%zz".to_string()
            })
        );
    }

    #[test]
    fn host_rejects_bare_space() {
        assert_eq!(
            unescape("exa mple.org", Component::Host),
            Err(ParseErrorKind::InvalidHostChar { char: ' ' })
        );
    }

    #[test]
    fn host_rejects_escaped_ascii_but_allows_percent_and_utf8() {
        assert!(unescape("a%41", Component::Host).is_err());
        assert_eq!(unescape("a%25b", Component::Host).unwrap(), "a%b");
        assert_eq!(unescape("caf%C3%A9", Component::Host).unwrap(), "caf\u{e9}");
    }

    #[test]
    fn escaped_path_validity() {
        assert!(is_valid_escaped_path("/a%20b/(c)!"));
        assert!(!is_valid_escaped_path("/a b"));
        assert!(!is_valid_escaped_path("/caf\u{e9}"));
    }

    #[test]
    fn userinfo_validity() {
        assert!(is_valid_userinfo("user:p%40ss"));
        assert!(!is_valid_userinfo("us er"));
    }
}
