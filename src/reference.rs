//! Syntactic split and composition of URI strings.
//!
//! [`UriReference`] is the grammar-level view shared by both directions: the
//! parser decomposes input into it, and the formatter composes one from a
//! component record, serializes it, and parses the result again.

use std::borrow::Cow;
use std::fmt;

use crate::error::{ParseError, ParseErrorKind};
use crate::escape::{Component, escape, is_valid_escaped_path, is_valid_userinfo, unescape};

/// Decoded user name and optional password of an authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Userinfo {
    pub(crate) username: String,
    pub(crate) password: Option<String>,
}

impl fmt::Display for Userinfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&escape(&self.username, Component::Userinfo))?;
        if let Some(password) = &self.password {
            write!(f, ":{}", escape(password, Component::Userinfo))?;
        }
        Ok(())
    }
}

/// A URI split along the generic grammar.
///
/// Presence is explicit for the query and the fragment, so `x:y?` and
/// `x:y#` survive a parse/compose cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct UriReference {
    /// Lower-cased scheme, empty when absent
    pub(crate) scheme: String,
    /// Scheme-specific part of a URI without authority or root
    pub(crate) opaque: Option<String>,
    pub(crate) user: Option<Userinfo>,
    /// Decoded `host[:port]`
    pub(crate) host: String,
    /// Decoded path
    pub(crate) path: String,
    /// The path as it appeared in the input
    pub(crate) raw_path: Option<String>,
    /// Raw query text after `?`
    pub(crate) query: Option<String>,
    /// Decoded fragment
    pub(crate) fragment: Option<String>,
}

impl UriReference {
    /// Parses a URI string.
    pub(crate) fn parse(input: &str) -> Result<Self, ParseError> {
        Self::parse_inner(input).map_err(|kind| ParseError {
            input: input.to_string(),
            kind,
        })
    }

    fn parse_inner(input: &str) -> Result<Self, ParseErrorKind> {
        if input.bytes().any(|b| b < 0x20 || b == 0x7f) {
            return Err(ParseErrorKind::ControlCharacter);
        }

        let (rest, fragment) = match input.split_once('#') {
            Some((rest, fragment)) => (
                rest,
                Some(unescape(fragment, Component::Fragment)?.into_owned()),
            ),
            None => (input, None),
        };

        let (scheme, rest) = split_scheme(rest)?;
        let (rest, query) = match rest.split_once('?') {
            Some((rest, query)) => (rest, Some(query.to_string())),
            None => (rest, None),
        };

        let mut reference = Self {
            scheme: scheme.to_ascii_lowercase(),
            query,
            fragment,
            ..Self::default()
        };

        if !rest.starts_with('/') {
            if !reference.scheme.is_empty() {
                // Rootless paths are opaque.
                reference.opaque = Some(rest.to_string());
                return Ok(reference);
            }
            let first_segment = rest.split('/').next().unwrap_or_default();
            if first_segment.contains(':') {
                return Err(ParseErrorKind::ColonInFirstSegment);
            }
        }

        let mut rest = rest;
        if (!reference.scheme.is_empty() || !rest.starts_with("///")) && rest.starts_with("//") {
            let after = &rest[2..];
            let (authority, path) = after.find('/').map_or((after, ""), |i| after.split_at(i));
            let (user, host) = parse_authority(authority)?;
            reference.user = user;
            reference.host = host;
            rest = path;
        }

        reference.path = unescape(rest, Component::Path)?.into_owned();
        reference.raw_path = Some(rest.to_string());
        Ok(reference)
    }

    /// Returns the path in escaped form, keeping the escaping of the input when
    /// it is valid.
    pub(crate) fn escaped_path(&self) -> String {
        match &self.raw_path {
            Some(raw) if is_valid_escaped_path(raw) => raw.clone(),
            // An asterisk-form request target stays bare.
            _ if self.path == "*" => self.path.clone(),
            _ => escape(&self.path, Component::Path).into_owned(),
        }
    }

    /// Returns the host without port or IPv6 brackets.
    pub(crate) fn hostname(&self) -> &str {
        let (host, _) = self.split_host_port();
        host.strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host)
    }

    /// Returns the port digits, if a non-empty port is present.
    pub(crate) fn port(&self) -> Option<&str> {
        self.split_host_port().1.filter(|port| !port.is_empty())
    }

    fn split_host_port(&self) -> (&str, Option<&str>) {
        match self.host.rfind(':') {
            Some(i) if is_valid_optional_port(&self.host[i..]) => {
                (&self.host[..i], Some(&self.host[i + 1..]))
            }
            _ => (&self.host, None),
        }
    }

    fn compose(&self) -> String {
        let mut out = String::new();
        if !self.scheme.is_empty() {
            out.push_str(&self.scheme);
            out.push(':');
        }

        if let Some(opaque) = &self.opaque {
            out.push_str(opaque);
        } else {
            if !self.scheme.is_empty() || !self.host.is_empty() || self.user.is_some() {
                if !self.host.is_empty() || !self.path.is_empty() || self.user.is_some() {
                    out.push_str("//");
                }
                if let Some(user) = &self.user {
                    out.push_str(&user.to_string());
                    out.push('@');
                }
                out.push_str(&escape(&self.host, Component::Host));
            }

            let path = self.escaped_path();
            if !path.is_empty() && !path.starts_with('/') && !self.host.is_empty() {
                out.push('/');
            }
            // A colon in the first segment would read as a scheme.
            if out.is_empty() && path.split('/').next().is_some_and(|s| s.contains(':')) {
                out.push_str("./");
            }
            out.push_str(&path);
        }

        if let Some(query) = &self.query {
            out.push('?');
            out.push_str(query);
        }
        if let Some(fragment) = &self.fragment {
            out.push('#');
            out.push_str(&escape(fragment, Component::Fragment));
        }
        out
    }
}

impl fmt::Display for UriReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.compose())
    }
}

/// Splits `scheme:rest`. Input without a valid scheme is returned whole.
fn split_scheme(input: &str) -> Result<(&str, &str), ParseErrorKind> {
    for (i, b) in input.bytes().enumerate() {
        match b {
            b'a'..=b'z' | b'A'..=b'Z' => {}
            b'0'..=b'9' | b'+' | b'-' | b'.' if i > 0 => {}
            b':' if i == 0 => return Err(ParseErrorKind::MissingScheme),
            b':' => return Ok((&input[..i], &input[i + 1..])),
            _ => return Ok(("", input)),
        }
    }
    Ok(("", input))
}

fn parse_authority(authority: &str) -> Result<(Option<Userinfo>, String), ParseErrorKind> {
    let (userinfo, host) = match authority.rfind('@') {
        Some(i) => (Some(&authority[..i]), &authority[i + 1..]),
        None => (None, authority),
    };
    let host = parse_host(host)?;

    let Some(userinfo) = userinfo else {
        return Ok((None, host));
    };
    if !is_valid_userinfo(userinfo) {
        return Err(ParseErrorKind::InvalidUserinfo);
    }
    let (username, password) = match userinfo.split_once(':') {
        Some((username, password)) => (username, Some(password)),
        None => (userinfo, None),
    };
    let user = Userinfo {
        username: unescape(username, Component::Userinfo)?.into_owned(),
        password: password
            .map(|p| unescape(p, Component::Userinfo).map(Cow::into_owned))
            .transpose()?,
    };
    Ok((Some(user), host))
}

fn parse_host(host: &str) -> Result<String, ParseErrorKind> {
    let colon_port = if host.starts_with('[') {
        let close = host.rfind(']').ok_or(ParseErrorKind::MissingBracket)?;
        &host[close + 1..]
    } else {
        host.rfind(':').map_or("", |i| &host[i..])
    };
    if !is_valid_optional_port(colon_port) {
        return Err(ParseErrorKind::InvalidPort {
            port: colon_port.to_string(),
        });
    }
    Ok(unescape(host, Component::Host)?.into_owned())
}

/// Accepts `""` or `:` followed by digits only.
fn is_valid_optional_port(colon_port: &str) -> bool {
    colon_port.is_empty()
        || colon_port
            .strip_prefix(':')
            .is_some_and(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
}
