//! Body payload forms for `send` dispatch.

use bytes::Bytes;

/// Body forms [`send`](crate::response::Response::send) dispatches on.
///
/// There is no numeric conversion; `send_status` is the one spelling for
/// status-only sends.
#[derive(Debug, Clone)]
pub enum Payload {
    /// No body given.
    None,

    /// UTF-8 text; defaults `Content-Type` to `text/html`.
    Text(String),

    /// Raw bytes; defaults `Content-Type` to `application/octet-stream`.
    Binary(Bytes),

    /// A JSON value, serialized by `json`.
    Json(serde_json::Value),
}

impl From<&str> for Payload {
    fn from(v: &str) -> Self {
        Payload::Text(v.to_string())
    }
}

impl From<String> for Payload {
    fn from(v: String) -> Self {
        Payload::Text(v)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(v: Vec<u8>) -> Self {
        Payload::Binary(Bytes::from(v))
    }
}

impl From<&[u8]> for Payload {
    fn from(v: &[u8]) -> Self {
        Payload::Binary(Bytes::copy_from_slice(v))
    }
}

impl From<Bytes> for Payload {
    fn from(v: Bytes) -> Self {
        Payload::Binary(v)
    }
}

impl From<serde_json::Value> for Payload {
    fn from(v: serde_json::Value) -> Self {
        Payload::Json(v)
    }
}

impl From<bool> for Payload {
    fn from(v: bool) -> Self {
        Payload::Json(serde_json::Value::Bool(v))
    }
}
