//! Accept-order content negotiation.
//!
//! # Responsibilities
//! - Normalize extension shorthand ("json") to full media types
//! - Match candidate types against the request's accept order
//! - Report a 406 with the normalized candidate list when nothing matches
//!
//! # Design Decisions
//! - The raw `Accept` header is parsed upstream; only the resulting
//!   preference order is consumed here
//! - Matching is symmetric over wildcards (`text/*` on either side)
//! - An empty accept order means "anything", the first candidate wins

use thiserror::Error;

/// Normalize a candidate key to a full media type.
///
/// Keys containing `/` pass through with parameters intact; anything else
/// is treated as a file extension and looked up, `None` when unknown.
pub fn normalize_type(key: &str) -> Option<String> {
    if key.contains('/') {
        return Some(key.to_string());
    }
    mime_guess::from_ext(key).first_raw().map(str::to_string)
}

/// True when two media types match; either side may use `*` wildcards and
/// parameters are ignored.
pub fn type_matches(a: &str, b: &str) -> bool {
    let (a_type, a_sub) = split_media(a);
    let (b_type, b_sub) = split_media(b);
    (a_type == "*" || b_type == "*" || a_type.eq_ignore_ascii_case(b_type))
        && (a_sub == "*" || b_sub == "*" || a_sub.eq_ignore_ascii_case(b_sub))
}

fn split_media(media: &str) -> (&str, &str) {
    let essence = media.split(';').next().unwrap_or(media).trim();
    match essence.split_once('/') {
        Some((t, s)) => (t, s),
        None if essence == "*" => ("*", "*"),
        None => (essence, ""),
    }
}

/// Select the best candidate for an accept order.
///
/// Returns the original candidate spelling; the caller normalizes it again
/// for the `Content-Type` it installs. Candidates that normalize to an
/// unknown type never match. The result borrows the candidate strings
/// themselves, not the slice holding them.
pub fn resolve<'a>(accept: &[String], candidates: &[&'a str]) -> Option<&'a str> {
    if candidates.is_empty() {
        return None;
    }
    if accept.is_empty() {
        return Some(candidates[0]);
    }
    for preferred in accept {
        for &candidate in candidates {
            let Some(normalized) = normalize_type(candidate) else {
                continue;
            };
            if type_matches(preferred, &normalized) {
                return Some(candidate);
            }
        }
    }
    None
}

/// No offered representation is acceptable to the client.
///
/// Routed to the continuation rather than returned; the host's error chain
/// turns it into a response.
#[derive(Debug, Error)]
#[error("not acceptable: {}", .types.join(", "))]
pub struct NegotiationError {
    /// Always `406 Not Acceptable`.
    pub status: http::StatusCode,

    /// The handler's candidates as normalized media types.
    pub types: Vec<String>,
}

impl NegotiationError {
    pub fn new(types: Vec<String>) -> Self {
        Self {
            status: http::StatusCode::NOT_ACCEPTABLE,
            types,
        }
    }
}
