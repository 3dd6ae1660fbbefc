//! Input normalization: email address or URL-ish text to a bare hostname.
//!
//! These functions work on string slices and only allocate for the final
//! lowercased hostname.

use crate::error::{PslError, Result};

const SCHEMES: [&str; 2] = ["https://", "http://"];

/// Strip a leading `http://` or `https://`, ignoring case.
#[inline]
fn strip_scheme(s: &str) -> &str {
    for scheme in SCHEMES {
        if let Some(prefix) = s.get(..scheme.len()) {
            if prefix.eq_ignore_ascii_case(scheme) {
                return &s[scheme.len()..];
            }
        }
    }
    s
}

/// Reduce an email address or hostname to a lowercase hostname.
///
/// Steps, in order: trim, keep the part after the last `@`, drop an
/// `http(s)://` scheme, cut at the first `/`, `?` or `#`, cut at the first
/// `:`, lowercase and trim again. The character set is not validated.
///
/// Fails with [`PslError::EmptyInput`] when nothing is left.
pub fn normalize_host(raw: &str) -> Result<String> {
    let mut host = raw.trim();
    if host.is_empty() {
        return Err(PslError::EmptyInput);
    }

    if let Some(at) = host.rfind('@') {
        host = &host[at + 1..];
    }

    host = strip_scheme(host);

    if let Some(end) = host.find(['/', '?', '#']) {
        host = &host[..end];
    }

    if let Some(colon) = host.find(':') {
        host = &host[..colon];
    }

    let host = host.to_lowercase();
    let host = host.trim();
    if host.is_empty() {
        return Err(PslError::EmptyInput);
    }
    Ok(host.to_string())
}

/// Split a hostname into labels, most-significant last.
///
/// A single trailing dot (fully-qualified form) is ignored. Empty labels are
/// kept so callers can reject them.
pub fn split_labels(hostname: &str) -> Vec<&str> {
    let hostname = hostname.strip_suffix('.').unwrap_or(hostname);
    hostname.split('.').collect()
}
