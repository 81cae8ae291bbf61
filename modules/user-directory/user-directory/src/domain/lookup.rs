//! Classification of caller-supplied identifiers.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

const BEARER_PREFIX: &str = "bearer ";

/// How a raw identifier should be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupStrategy {
    /// A compact JWT; the cleaned token without any `Bearer ` prefix.
    Token(String),
    /// A provider-prefixed directory id such as `auth0|65a1`.
    CanonicalSubject(String),
    /// Anything else is treated as a username.
    Username(String),
}

/// Pick the lookup strategy for `input`.
///
/// Returns `None` for blank input. Token shape wins over the `|` check, so
/// a JWT is never mistaken for a subject.
#[must_use]
pub fn classify(input: &str) -> Option<LookupStrategy> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let candidate = strip_bearer(input);
    if looks_like_jwt(candidate) {
        return Some(LookupStrategy::Token(candidate.to_owned()));
    }

    if input.contains('|') {
        Some(LookupStrategy::CanonicalSubject(input.to_owned()))
    } else {
        Some(LookupStrategy::Username(input.to_owned()))
    }
}

/// Strip an optional, case-insensitive `Bearer ` prefix.
fn strip_bearer(input: &str) -> &str {
    match input.get(..BEARER_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(BEARER_PREFIX) => {
            input[BEARER_PREFIX.len()..].trim_start()
        }
        _ => input,
    }
}

/// `true` if `value` has the compact JWS shape with a JSON object header.
///
/// This is a cheap structural check only; signatures are verified later.
#[must_use]
pub fn looks_like_jwt(value: &str) -> bool {
    let mut segments = value.split('.');
    let (Some(header), Some(payload), Some(signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return false;
    };

    if [header, payload, signature]
        .iter()
        .any(|s| s.is_empty() || !s.bytes().all(is_base64url_byte))
    {
        return false;
    }

    URL_SAFE_NO_PAD
        .decode(header)
        .ok()
        .and_then(|bytes| serde_json::from_slice::<serde_json::Value>(&bytes).ok())
        .is_some_and(|v| v.is_object())
}

fn is_base64url_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}
