//! Kani proof harnesses for the escaping and port coercion properties.
//!
//! Kani is not a Cargo dependency. Install and run with:
//!
//! ```bash
//! cargo install --locked kani-verifier
//! cargo kani setup
//! cargo kani --features kani
//! ```
//!
//! This module is only compiled when using Kani (`#[cfg(kani)]`).

use crate::escape::{Component, escape, unescape};
use crate::{Port, UriComponents};

/// Unreserved and a few reserved characters; kept small for tractability
const TEXT_CHARS: &[u8] = b"az09-_.~ /?#@:%+";

fn arbitrary_text(max_len: usize) -> String {
    let len: usize = kani::any();
    let len = len % (max_len + 1);
    (0..len)
        .map(|_| {
            let idx: usize = kani::any();
            TEXT_CHARS[idx % TEXT_CHARS.len()] as char
        })
        .collect()
}

// ============================================================================
// Kani Proof Harnesses
// ============================================================================

/// Proof: Numeric ports in range resolve to themselves
#[kani::proof]
fn proof_port_number_resolves() {
    let value: u16 = kani::any();
    let port = Port::from(value);
    assert_eq!(port.resolve("h"), Ok(i64::from(value)));
}

/// Proof: Unescape inverts escape for every component
#[kani::proof]
#[kani::unwind(6)]
fn proof_escape_roundtrip() {
    let text = arbitrary_text(4);
    for component in [
        Component::Path,
        Component::Userinfo,
        Component::Query,
        Component::Fragment,
    ] {
        let escaped = escape(&text, component);
        let decoded = unescape(&escaped, component).expect("escaped text should unescape");
        assert_eq!(decoded, text);
    }
}

/// Proof: An opaque record keeps scheme and path through format then parse
#[kani::proof]
#[kani::unwind(6)]
fn proof_opaque_roundtrip() {
    let path = format!("x{}", arbitrary_text(3).replace(['#', '?', '%'], ""));
    let uri = UriComponents::new("urn", path.clone());
    let formatted = uri.format().expect("opaque record should format");
    let parsed = UriComponents::parse(&formatted).expect("formatted URI should parse");
    assert_eq!(parsed.scheme(), "urn");
    assert_eq!(parsed.path(), path);
}
