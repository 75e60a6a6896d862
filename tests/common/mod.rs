//! Shared fixtures for response emulation tests.

use std::path::Path;
use std::sync::{Arc, Mutex};

use http::Method;
use response_emulator::request::{Continuation, Forwarded, Request};
use response_emulator::response::{Hooks, Response, TransportHandle};
use response_emulator::sendfile::{SourceEvent, TransferOptions};
use tokio::sync::mpsc;

/// Response over a fresh in-memory transport, default request and settings.
pub fn response() -> (Response, TransportHandle) {
    Response::in_memory(Request::default())
}

/// Response for an explicit request.
pub fn response_for(req: Request) -> (Response, TransportHandle) {
    Response::in_memory(req)
}

/// Response whose continuation signals are observable on the returned
/// receiver.
#[allow(dead_code)]
pub fn response_with_continuation() -> (
    Response,
    TransportHandle,
    mpsc::UnboundedReceiver<Forwarded>,
) {
    let (continuation, rx) = Continuation::channel();
    let req = Request {
        continuation,
        ..Request::default()
    };
    let (res, handle) = Response::in_memory(req);
    (res, handle, rx)
}

/// Request whose accept order is already parsed, most-preferred first.
#[allow(dead_code)]
pub fn accepting(types: &[&str]) -> Request {
    Request {
        accept: types.iter().map(|t| t.to_string()).collect(),
        ..Request::default()
    }
}

/// Request carrying one query parameter.
#[allow(dead_code)]
pub fn with_query(name: &str, value: &str) -> Request {
    let mut req = Request::default();
    req.query.insert(name.to_string(), vec![value.to_string()]);
    req
}

/// HEAD request.
#[allow(dead_code)]
pub fn head_request() -> Request {
    Request {
        method: Method::HEAD,
        ..Request::default()
    }
}

/// Hooks whose file source replays a fixed script of events once.
#[allow(dead_code)]
pub fn scripted_source(events: Vec<SourceEvent>) -> Hooks {
    let script = Mutex::new(Some(events));
    Hooks {
        file_source: Some(Arc::new(
            move |_path: &Path, _options: &TransferOptions| {
                let (tx, rx) = mpsc::unbounded_channel();
                if let Some(events) = script.lock().unwrap().take() {
                    for event in events {
                        let _ = tx.send(event);
                    }
                }
                rx
            },
        )),
        ..Hooks::default()
    }
}
