//! Transfer state machine.
//!
//! # Responsibilities
//! - Bridge source events into transport writes
//! - Apply success headers immediately before the first bytes
//! - Resolve exactly one outcome per transfer
//! - Classify terminal failures with their classic errno-style codes
//!
//! # Design Decisions
//! - Source events take precedence over the finished signal (biased select)
//! - A clean transport finish with the streaming mode still unresolved is an
//!   abort, checked once more after one scheduling tick
//! - A source that drops its channel without a terminal event aborts the
//!   transfer rather than hanging it

use thiserror::Error;
use tokio::sync::{mpsc, watch};

use crate::headers::FieldValue;
use crate::response::transport::{Transport, TransportFinish};
use crate::sendfile::source::SourceEvent;

/// Argument failures raised synchronously, before any streaming starts.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("path required for file transfer")]
    MissingPath,

    #[error("relative path {0:?} requires a transfer root")]
    RelativePath(String),

    #[error("no file source configured")]
    SourceUnavailable,
}

/// Terminal transfer failures.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("path is a directory")]
    IsDirectory,

    #[error("transfer aborted by peer")]
    Aborted,

    #[error("file source failed: {0}")]
    Source(#[from] std::io::Error),

    #[error("transport write failed: {message}")]
    Write {
        kind: std::io::ErrorKind,
        message: String,
    },
}

impl StreamError {
    /// Classic errno-style code for host logging.
    pub fn code(&self) -> &'static str {
        match self {
            StreamError::IsDirectory => "EISDIR",
            StreamError::Aborted => "ECONNABORTED",
            StreamError::Source(err) => match err.kind() {
                std::io::ErrorKind::NotFound => "ENOENT",
                std::io::ErrorKind::PermissionDenied => "EACCES",
                _ => "EIO",
            },
            StreamError::Write { .. } => "EPIPE",
        }
    }
}

/// Transfer lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    /// No source event consumed yet.
    Pending,

    /// Success headers installed, bytes may flow.
    HeadersApplied,

    /// Actively streaming chunks.
    Streaming,

    Finished,

    Aborted,

    Errored,
}

/// Drives one transfer to exactly one outcome.
pub struct FileTransfer {
    state: TransferState,
    headers: Vec<(String, String)>,
    content_type: Option<String>,
    /// `Some(false)` after `File`, `Some(true)` after `Stream`; `None`
    /// means the source never declared its mode.
    streaming: Option<bool>,
}

impl FileTransfer {
    pub fn new(headers: Vec<(String, String)>, content_type: Option<String>) -> Self {
        Self {
            state: TransferState::Pending,
            headers,
            content_type,
            streaming: None,
        }
    }

    pub fn state(&self) -> TransferState {
        self.state
    }

    /// Consume source events and the transport finished signal until the
    /// transfer resolves. The outcome is delivered exactly once; the loop
    /// returns on the first terminal condition.
    pub async fn run(
        &mut self,
        transport: &mut dyn Transport,
        mut events: mpsc::UnboundedReceiver<SourceEvent>,
        mut finish: watch::Receiver<Option<TransportFinish>>,
    ) -> Result<(), StreamError> {
        // A finish that predates this subscription never wakes `changed`.
        let already_finished = finish.borrow_and_update().clone();
        if let Some(finish_state) = already_finished {
            return self.resolve_finish(transport, finish_state, &mut events).await;
        }

        loop {
            tokio::select! {
                biased;

                event = events.recv() => match event {
                    Some(event) => {
                        if let Some(outcome) = self.consume(transport, event) {
                            return outcome;
                        }
                    }
                    None => {
                        tracing::debug!("File source dropped without a terminal event");
                        self.state = TransferState::Aborted;
                        return Err(StreamError::Aborted);
                    }
                },

                changed = finish.changed() => {
                    if changed.is_err() {
                        self.state = TransferState::Aborted;
                        return Err(StreamError::Aborted);
                    }
                    let finish_state = finish.borrow_and_update().clone();
                    if let Some(finish_state) = finish_state {
                        return self.resolve_finish(transport, finish_state, &mut events).await;
                    }
                }
            }
        }
    }

    /// Apply one source event; `Some` is the transfer's outcome.
    fn consume(
        &mut self,
        transport: &mut dyn Transport,
        event: SourceEvent,
    ) -> Option<Result<(), StreamError>> {
        match event {
            SourceEvent::Directory => {
                self.state = TransferState::Errored;
                Some(Err(StreamError::IsDirectory))
            }
            SourceEvent::Error(err) => {
                self.state = TransferState::Errored;
                Some(Err(StreamError::Source(err)))
            }
            SourceEvent::End => {
                self.state = TransferState::Finished;
                tracing::debug!("File transfer complete");
                Some(Ok(()))
            }
            SourceEvent::File => {
                self.apply_headers(transport);
                self.streaming = Some(false);
                None
            }
            SourceEvent::Stream => {
                self.apply_headers(transport);
                self.streaming = Some(true);
                self.state = TransferState::Streaming;
                None
            }
            SourceEvent::Data(chunk) => {
                self.apply_headers(transport);
                transport.write(&chunk);
                None
            }
        }
    }

    /// Success headers and the extension-derived content type go in once,
    /// before the first bytes.
    fn apply_headers(&mut self, transport: &mut dyn Transport) {
        if self.state != TransferState::Pending {
            return;
        }
        if transport.get_header("content-type").is_none() {
            if let Some(content_type) = self.content_type.take() {
                transport.set_header("Content-Type", FieldValue::One(content_type));
            }
        }
        for (name, value) in &self.headers {
            transport.set_header(name, FieldValue::One(value.clone()));
        }
        self.state = TransferState::HeadersApplied;
        tracing::trace!("Transfer headers applied");
    }

    async fn resolve_finish(
        &mut self,
        transport: &mut dyn Transport,
        finish: TransportFinish,
        events: &mut mpsc::UnboundedReceiver<SourceEvent>,
    ) -> Result<(), StreamError> {
        match finish {
            TransportFinish::Error { kind, message } => {
                if kind == std::io::ErrorKind::ConnectionReset {
                    self.state = TransferState::Aborted;
                    Err(StreamError::Aborted)
                } else {
                    self.state = TransferState::Errored;
                    Err(StreamError::Write { kind, message })
                }
            }
            TransportFinish::Clean => {
                // Give a racing source one more tick to land its terminal
                // event, then drain whatever already arrived.
                tokio::task::yield_now().await;
                while let Ok(event) = events.try_recv() {
                    if let Some(outcome) = self.consume(transport, event) {
                        return outcome;
                    }
                }
                if self.streaming.is_none() {
                    self.state = TransferState::Aborted;
                    Err(StreamError::Aborted)
                } else {
                    self.state = TransferState::Finished;
                    Ok(())
                }
            }
        }
    }
}
