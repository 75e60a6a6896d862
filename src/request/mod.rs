//! Inbound request facade.
//!
//! # Responsibilities
//! - Carry the request attributes response logic consults (method, headers,
//!   query, accept order, freshness, signing secret)
//! - Alias Referrer/Referer header lookups
//! - Resolve accept-order negotiation against candidate types
//! - Carry the host's continuation channel (the `next` of the legacy contract)

use std::collections::HashMap;

use http::header::HeaderMap;
use http::Method;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::negotiate::{self, NegotiationError};
use crate::sendfile::StreamError;

/// Request attributes consumed by the response emulator.
///
/// The host parses the raw request once (query string, `Accept` ordering,
/// freshness) and hands the results over; nothing here re-parses header
/// text.
#[derive(Debug)]
pub struct Request {
    /// Correlation id carried into trace events.
    pub id: Uuid,

    /// Request method; HEAD suppresses response bodies.
    pub method: Method,

    /// Inbound headers.
    pub headers: HeaderMap,

    /// Parsed query parameters, each with its ordered values.
    pub query: HashMap<String, Vec<String>>,

    /// Acceptable media types in preference order, most-preferred first.
    /// Empty when the request carried no `Accept` header.
    pub accept: Vec<String>,

    /// Whether the client's cached copy is still valid (computed by the
    /// host from conditional headers). Fresh requests finalize as 304.
    pub fresh: bool,

    /// Secret for signed cookies, when the host configured one.
    pub secret: Option<String>,

    /// Channel back to the host's handler chain.
    pub continuation: Continuation,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            method: Method::GET,
            headers: HeaderMap::new(),
            query: HashMap::new(),
            accept: Vec::new(),
            fresh: false,
            secret: None,
            continuation: Continuation::disconnected(),
        }
    }
}

impl Request {
    /// Look up a request header, first value wins.
    ///
    /// `Referrer` and `Referer` are interchangeable, whichever is present
    /// is returned for either spelling.
    pub fn get(&self, name: &str) -> Option<&str> {
        if name.eq_ignore_ascii_case("referer") || name.eq_ignore_ascii_case("referrer") {
            return self
                .header_str("referrer")
                .or_else(|| self.header_str("referer"));
        }
        self.header_str(name)
    }

    /// First value of a query parameter.
    pub fn query_first(&self, name: &str) -> Option<&str> {
        self.query
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Select the best candidate for this request's accept order.
    ///
    /// Candidates may be extensions (`"json"`) or full media types; the
    /// original candidate spelling is returned. With no `Accept` header the
    /// first candidate wins.
    pub fn accepts<'a>(&self, candidates: &[&'a str]) -> Option<&'a str> {
        negotiate::resolve(&self.accept, candidates)
    }

    fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Signal delivered to the host's handler chain.
#[derive(Debug)]
pub enum Forwarded {
    /// Pass control to the next handler.
    Next,

    /// Route an error to the host's error-handling chain.
    Error(HandlerError),
}

/// Errors routed through the continuation rather than returned.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Negotiation(#[from] NegotiationError),

    #[error(transparent)]
    Transfer(#[from] StreamError),

    #[error("json serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("render failed: {0}")]
    Render(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    /// Wrap an arbitrary handler-raised error.
    pub fn other(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Other(err.into())
    }
}

/// Clonable sender half of the handler chain, the emulated `next`.
///
/// A disconnected continuation drops signals with a log line, which lets
/// tests and fire-and-forget hosts skip wiring a receiver.
#[derive(Debug, Clone)]
pub struct Continuation {
    tx: Option<mpsc::UnboundedSender<Forwarded>>,
}

impl Continuation {
    /// Create a connected continuation and the receiver the host drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Forwarded>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A continuation with no receiver.
    pub fn disconnected() -> Self {
        Self { tx: None }
    }

    /// Pass control onward, the bare `next()` call.
    pub fn next(&self) {
        self.send(Forwarded::Next);
    }

    /// Route an error onward, the `next(err)` call.
    pub fn error(&self, err: impl Into<HandlerError>) {
        self.send(Forwarded::Error(err.into()));
    }

    fn send(&self, signal: Forwarded) {
        match &self.tx {
            Some(tx) => {
                if let Err(lost) = tx.send(signal) {
                    tracing::warn!(signal = ?lost.0, "Continuation receiver dropped, signal lost");
                }
            }
            None => {
                tracing::debug!(?signal, "Continuation disconnected, signal dropped");
            }
        }
    }
}
