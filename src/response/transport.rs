//! Transport seam and the in-memory capture implementation.
//!
//! # Responsibilities
//! - Define the byte/header sink a response writes through
//! - Buffer writes and deliver one captured response value
//! - Surface transport termination (clean or errored) to file transfers
//! - Let the host simulate peer aborts
//!
//! # Design Decisions
//! - The finished signal is a watch channel set exactly once
//! - The captured response travels over a oneshot; taking the sender is the
//!   structural "exactly once" guarantee

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, StatusCode};
use tokio::sync::{oneshot, watch};

use crate::headers::{FieldValue, HeaderStore};

/// How a transport terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFinish {
    /// Response finalized normally.
    Clean,

    /// Connection torn down with an error.
    Error {
        kind: std::io::ErrorKind,
        message: String,
    },
}

impl TransportFinish {
    pub fn from_io(err: &std::io::Error) -> Self {
        Self::Error {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Byte and header sink under a response.
///
/// The emulator drives exactly one of these per response; implementations
/// must tolerate calls after finishing by ignoring them.
pub trait Transport: Send {
    fn set_header(&mut self, name: &str, value: FieldValue);

    fn get_header(&self, name: &str) -> Option<FieldValue>;

    fn remove_header(&mut self, name: &str);

    /// Buffer body bytes ahead of finalization.
    fn write(&mut self, chunk: &[u8]);

    /// Bytes buffered so far.
    fn buffered_len(&self) -> usize;

    /// Commit status and headers, appending an optional final chunk.
    fn end(&mut self, status: StatusCode, chunk: Option<Bytes>);

    fn is_finished(&self) -> bool;

    /// Subscribe to the termination signal. `None` until the transport
    /// finishes, then set exactly once.
    fn finish_signal(&self) -> watch::Receiver<Option<TransportFinish>>;
}

/// The single response value a finished transport yields.
#[derive(Debug, Clone)]
pub struct CapturedResponse {
    pub status: StatusCode,

    /// Phrase from the canonical table, or the numeric code as text.
    pub status_message: String,

    pub headers: HeaderMap,

    pub body: Bytes,
}

impl CapturedResponse {
    /// First value of a header.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Every value of a header, in insertion order.
    pub fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// Body as UTF-8, lossy.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// In-memory transport backing the default emulation.
#[derive(Debug)]
pub struct MemoryTransport {
    headers: HeaderStore,
    buffer: BytesMut,
    captured_tx: Option<oneshot::Sender<CapturedResponse>>,
    finish_tx: Arc<watch::Sender<Option<TransportFinish>>>,
    finish_rx: watch::Receiver<Option<TransportFinish>>,
}

impl MemoryTransport {
    /// Create a transport and the host-side handle observing it.
    pub fn channel() -> (Self, TransportHandle) {
        let (captured_tx, captured_rx) = oneshot::channel();
        let (finish_tx, finish_rx) = watch::channel(None);
        let finish_tx = Arc::new(finish_tx);
        let transport = Self {
            headers: HeaderStore::new(),
            buffer: BytesMut::new(),
            captured_tx: Some(captured_tx),
            finish_tx: Arc::clone(&finish_tx),
            finish_rx,
        };
        let handle = TransportHandle {
            captured: captured_rx,
            finish_tx,
        };
        (transport, handle)
    }
}

impl Transport for MemoryTransport {
    fn set_header(&mut self, name: &str, value: FieldValue) {
        self.headers.set(name, value);
    }

    fn get_header(&self, name: &str) -> Option<FieldValue> {
        self.headers.get(name)
    }

    fn remove_header(&mut self, name: &str) {
        self.headers.remove(name);
    }

    fn write(&mut self, chunk: &[u8]) {
        if self.is_finished() {
            tracing::warn!("Write after transport finished dropped");
            return;
        }
        self.buffer.extend_from_slice(chunk);
    }

    fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    fn end(&mut self, status: StatusCode, chunk: Option<Bytes>) {
        if self.is_finished() {
            tracing::warn!("Transport already finished, end ignored");
            return;
        }
        let Some(tx) = self.captured_tx.take() else {
            return;
        };

        if let Some(chunk) = chunk {
            self.buffer.extend_from_slice(&chunk);
        }
        let response = CapturedResponse {
            status,
            status_message: status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_u16().to_string()),
            headers: std::mem::take(&mut self.headers).into_map(),
            body: self.buffer.split().freeze(),
        };
        if tx.send(response).is_err() {
            tracing::debug!("Captured response has no receiver");
        }
        self.finish_tx.send_if_modified(|state| {
            if state.is_none() {
                *state = Some(TransportFinish::Clean);
                true
            } else {
                false
            }
        });
    }

    fn is_finished(&self) -> bool {
        self.captured_tx.is_none() || self.finish_rx.borrow().is_some()
    }

    fn finish_signal(&self) -> watch::Receiver<Option<TransportFinish>> {
        self.finish_rx.clone()
    }
}

/// Host-side view of a [`MemoryTransport`].
#[derive(Debug)]
pub struct TransportHandle {
    captured: oneshot::Receiver<CapturedResponse>,
    finish_tx: Arc<watch::Sender<Option<TransportFinish>>>,
}

impl TransportHandle {
    /// Wait for the captured response. `None` when the response was dropped
    /// without finalizing.
    pub async fn captured(self) -> Option<CapturedResponse> {
        self.captured.await.ok()
    }

    /// Non-blocking check for an already-captured response.
    pub fn try_captured(&mut self) -> Option<CapturedResponse> {
        self.captured.try_recv().ok()
    }

    /// Simulate the peer tearing the connection down.
    pub fn abort(&self, err: std::io::Error) {
        let finish = TransportFinish::from_io(&err);
        let signalled = self.finish_tx.send_if_modified(|state| {
            if state.is_none() {
                *state = Some(finish.clone());
                true
            } else {
                false
            }
        });
        if !signalled {
            tracing::debug!("Abort after transport finished ignored");
        }
    }

    /// Signal a clean transport finish, as when the underlying stream
    /// closes without an error before the response was finalized.
    pub fn finish(&self) {
        self.finish_tx.send_if_modified(|state| {
            if state.is_none() {
                *state = Some(TransportFinish::Clean);
                true
            } else {
                false
            }
        });
    }
}
