//! Port values and their coercion to integers.

use std::fmt;

use serde_json::Number;

use crate::error::PortError;

/// A port as supplied in a component record.
///
/// Records may carry the port either as a JSON number or as text; text is
/// classified once, by prefix, into decimal or hexadecimal form.
///
/// # Examples
///
/// ```
/// use uri_components::Port;
///
/// assert_eq!(Port::from_text("0x1BB").resolve("example.org").unwrap(), 443);
/// assert_eq!(Port::from(443_u16).resolve("example.org").unwrap(), 443);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Port {
    /// A JSON number; must be integral
    Number(Number),
    /// Decimal text, optionally signed
    Decimal(String),
    /// `0x`/`0X`-prefixed hexadecimal text, optionally signed
    Hex(String),
}

impl Port {
    /// Classifies a textual port by its prefix.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
        if unsigned.starts_with("0x") || unsigned.starts_with("0X") {
            Self::Hex(text.to_string())
        } else {
            Self::Decimal(text.to_string())
        }
    }

    /// Resolves the port to an integer.
    ///
    /// Negative values are returned as-is; the URI grammar rejects them once
    /// they are composed into an authority.
    ///
    /// # Errors
    ///
    /// Returns `PortError` if the value is not an integer in decimal or
    /// `0x` hex form. The error carries the `hostname:port` text being built.
    pub fn resolve(&self, hostname: &str) -> Result<i64, PortError> {
        match self {
            Self::Number(number) => number.as_i64().ok_or_else(|| PortError::NotAnInteger {
                value: number.to_string(),
                host_port: format!("{hostname}:{number}"),
            }),
            Self::Decimal(text) => {
                parse_signed(text, 10).ok_or_else(|| Self::invalid(text, hostname))
            }
            Self::Hex(text) => parse_signed(text, 16).ok_or_else(|| Self::invalid(text, hostname)),
        }
    }

    fn invalid(text: &str, hostname: &str) -> PortError {
        PortError::Invalid {
            value: text.to_string(),
            host_port: format!("{hostname}:{text}"),
        }
    }
}

fn parse_signed(text: &str, radix: u32) -> Option<i64> {
    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits = if radix == 16 {
        unsigned
            .strip_prefix("0x")
            .or_else(|| unsigned.strip_prefix("0X"))?
    } else {
        unsigned
    };
    // from_str_radix would accept a second sign here
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

impl From<u16> for Port {
    fn from(port: u16) -> Self {
        Self::Number(port.into())
    }
}

impl From<i64> for Port {
    fn from(port: i64) -> Self {
        Self::Number(port.into())
    }
}

impl From<&str> for Port {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Decimal(text) | Self::Hex(text) => write!(f, "{text}"),
        }
    }
}
