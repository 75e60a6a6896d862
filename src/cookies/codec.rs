//! `Set-Cookie` serialization and signing.
//!
//! # Responsibilities
//! - Serialize name/value/attribute tuples into `Set-Cookie` strings
//! - Tag JSON payloads (`j:`) and signed values (`s:`)
//! - HMAC-SHA256 signing with the request-scoped secret
//! - Expiry math: `max_age` milliseconds become `Expires` plus whole-second
//!   `Max-Age`

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use crate::headers::encoding::encode_component;

type HmacSha256 = Hmac<Sha256>;

/// Cookie attributes. `path` defaults to `/`; clearing it to `None` omits
/// the attribute entirely.
#[derive(Debug, Clone)]
pub struct CookieOptions {
    /// Lifetime in milliseconds. When set, wins over `expires` and is
    /// re-expressed as `Expires` plus a whole-second `Max-Age`.
    pub max_age: Option<i64>,

    /// Absolute expiry.
    pub expires: Option<DateTime<Utc>>,

    pub path: Option<String>,

    pub domain: Option<String>,

    pub http_only: bool,

    pub secure: bool,

    pub same_site: Option<SameSite>,

    /// Sign the value with the request's secret.
    pub signed: bool,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            max_age: None,
            expires: None,
            path: Some("/".to_string()),
            domain: None,
            http_only: false,
            secure: false,
            same_site: None,
            signed: false,
        }
    }
}

/// `SameSite` attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl std::fmt::Display for SameSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        })
    }
}

/// Value forms a cookie can carry.
#[derive(Debug, Clone)]
pub enum CookieValue {
    Text(String),
    /// JSON payloads serialize with the legacy `j:` tag.
    Json(serde_json::Value),
}

impl From<&str> for CookieValue {
    fn from(v: &str) -> Self {
        CookieValue::Text(v.to_string())
    }
}

impl From<String> for CookieValue {
    fn from(v: String) -> Self {
        CookieValue::Text(v)
    }
}

// Numbers serialize as their decimal text.
impl From<i64> for CookieValue {
    fn from(v: i64) -> Self {
        CookieValue::Text(v.to_string())
    }
}

impl From<u64> for CookieValue {
    fn from(v: u64) -> Self {
        CookieValue::Text(v.to_string())
    }
}

impl From<serde_json::Value> for CookieValue {
    fn from(v: serde_json::Value) -> Self {
        CookieValue::Json(v)
    }
}

#[derive(Debug, Error)]
pub enum CookieError {
    /// Signing was requested but the request carries no secret.
    #[error("cookie signing requires a secret on the request")]
    MissingSecret,
}

/// Serialize one cookie into a `Set-Cookie` value.
///
/// The value is percent-encoded as a URI component after tagging and
/// signing, so the tags arrive as `j%3A` and `s%3A` on the wire.
pub fn serialize(
    name: &str,
    value: CookieValue,
    options: &CookieOptions,
    secret: Option<&str>,
) -> Result<String, CookieError> {
    let encoded = match value {
        CookieValue::Text(s) => s,
        CookieValue::Json(v) => format!("j:{v}"),
    };
    let encoded = if options.signed {
        let secret = secret.ok_or(CookieError::MissingSecret)?;
        format!("s:{}", sign(&encoded, secret))
    } else {
        encoded
    };

    let mut parts = vec![format!("{}={}", name, encode_component(&encoded))];

    let mut expires = options.expires;
    if let Some(ms) = options.max_age {
        expires = Some(Utc::now() + chrono::Duration::milliseconds(ms));
        parts.push(format!("Max-Age={}", ms.div_euclid(1000)));
    }
    if let Some(domain) = &options.domain {
        parts.push(format!("Domain={domain}"));
    }
    if let Some(path) = &options.path {
        parts.push(format!("Path={path}"));
    }
    if let Some(at) = expires {
        parts.push(format!("Expires={}", http_date(at)));
    }
    if options.http_only {
        parts.push("HttpOnly".to_string());
    }
    if options.secure {
        parts.push("Secure".to_string());
    }
    if let Some(same_site) = options.same_site {
        parts.push(format!("SameSite={same_site}"));
    }

    Ok(parts.join("; "))
}

/// Attribute defaults for clearing a cookie: expired just after the epoch.
///
/// Caller-supplied expiry settings win over the default.
pub fn expired(mut options: CookieOptions) -> CookieOptions {
    if options.max_age.is_none() && options.expires.is_none() {
        options.expires = Some(DateTime::<Utc>::from_timestamp_millis(1).unwrap_or_default());
    }
    options
}

/// Sign a value: `<value>.<base64 HMAC-SHA256>`, trailing padding stripped.
pub(crate) fn sign(value: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(value.as_bytes());
    let signature = STANDARD.encode(mac.finalize().into_bytes());
    format!("{}.{}", value, signature.trim_end_matches('='))
}

fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
