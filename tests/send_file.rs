//! File transfer wiring: validation, completion policy, and capture.

use std::path::PathBuf;

use response_emulator::request::{Continuation, Forwarded, HandlerError, Request};
use response_emulator::response::Response;
use response_emulator::sendfile::{SourceEvent, StreamError, TransferOptions, ValidationError};
use response_emulator::Settings;

mod common;

fn scripted_response(
    events: Vec<SourceEvent>,
) -> (
    Response,
    response_emulator::response::TransportHandle,
    tokio::sync::mpsc::UnboundedReceiver<Forwarded>,
) {
    let (continuation, signals) = Continuation::channel();
    let req = Request {
        continuation,
        ..Request::default()
    };
    let (res, handle) =
        Response::in_memory_with(req, Settings::default(), common::scripted_source(events));
    (res, handle, signals)
}

#[tokio::test]
async fn test_missing_path_fails_fast() {
    let (mut res, _handle, mut signals) = scripted_response(vec![]);
    let err = res
        .send_file("", TransferOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ValidationError::MissingPath));
    assert!(signals.try_recv().is_err());
    assert!(!res.finished());
}

#[tokio::test]
async fn test_relative_path_requires_a_root() {
    let (mut res, _handle, _signals) = scripted_response(vec![]);
    let err = res
        .send_file("partial/notes.txt", TransferOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ValidationError::RelativePath(_)));
}

#[tokio::test]
async fn test_missing_source_hook_is_a_validation_error() {
    let (mut res, _handle) = common::response();
    let err = res
        .send_file("/srv/notes.txt", TransferOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ValidationError::SourceUnavailable));
}

#[tokio::test]
async fn test_directory_passes_to_the_next_handler() {
    let (mut res, _handle, mut signals) = scripted_response(vec![SourceEvent::Directory]);
    res.send_file("/srv/some-dir", TransferOptions::default())
        .await
        .unwrap();

    assert!(matches!(signals.try_recv().unwrap(), Forwarded::Next));
    assert!(!res.finished());
}

#[tokio::test]
async fn test_source_errors_route_to_the_continuation() {
    let missing = std::io::Error::from(std::io::ErrorKind::NotFound);
    let (mut res, _handle, mut signals) = scripted_response(vec![SourceEvent::Error(missing)]);
    res.send_file("/srv/gone.txt", TransferOptions::default())
        .await
        .unwrap();

    match signals.try_recv().unwrap() {
        Forwarded::Error(HandlerError::Transfer(err)) => {
            assert_eq!(err.code(), "ENOENT");
        }
        other => panic!("expected transfer error, got {other:?}"),
    }
    assert!(!res.finished());
}

#[tokio::test]
async fn test_aborted_transfer_is_swallowed() {
    // Source declares a file, streams one chunk, then drops without a
    // terminal event: the peer is gone and nobody else should hear it.
    let (mut res, mut handle, mut signals) = scripted_response(vec![
        SourceEvent::File,
        SourceEvent::Data(bytes::Bytes::from_static(b"partial")),
    ]);
    res.send_file("/srv/notes.txt", TransferOptions::default())
        .await
        .unwrap();

    assert!(signals.try_recv().is_err());
    assert!(handle.try_captured().is_none());
}

#[tokio::test]
async fn test_send_file_after_abort_is_a_no_op() {
    let (mut res, handle, mut signals) = scripted_response(vec![SourceEvent::End]);
    handle.abort(std::io::Error::from(std::io::ErrorKind::ConnectionReset));

    res.send_file("/srv/notes.txt", TransferOptions::default())
        .await
        .unwrap();
    assert!(signals.try_recv().is_err());
}

#[tokio::test]
async fn test_successful_transfer_applies_headers_and_finalizes() {
    let (mut res, handle, mut signals) = scripted_response(vec![
        SourceEvent::File,
        SourceEvent::Data(bytes::Bytes::from_static(b"abc")),
        SourceEvent::Data(bytes::Bytes::from_static(b"def")),
        SourceEvent::End,
    ]);
    let options = TransferOptions {
        headers: vec![("X-Sent-At".to_string(), "now".to_string())],
        ..TransferOptions::default()
    };
    res.send_file("/srv/notes.txt", options).await.unwrap();

    let captured = handle.captured().await.unwrap();
    assert_eq!(captured.status.as_u16(), 200);
    assert_eq!(captured.text(), "abcdef");
    assert_eq!(captured.header("content-length"), Some("6"));
    assert_eq!(captured.header("x-sent-at"), Some("now"));
    assert_eq!(
        captured.header("content-type"),
        Some("text/plain; charset=utf-8")
    );
    assert!(signals.try_recv().is_err());
}

#[tokio::test]
async fn test_relative_path_with_root_streams() {
    let (mut res, handle, _signals) = scripted_response(vec![
        SourceEvent::File,
        SourceEvent::Data(bytes::Bytes::from_static(b"ok")),
        SourceEvent::End,
    ]);
    let options = TransferOptions {
        root: Some(PathBuf::from("/srv")),
        ..TransferOptions::default()
    };
    res.send_file("partial/notes.txt", options).await.unwrap();

    let captured = handle.captured().await.unwrap();
    assert_eq!(captured.text(), "ok");
}

#[tokio::test]
async fn test_preset_content_type_wins_over_the_extension() {
    let (mut res, handle, _signals) = scripted_response(vec![
        SourceEvent::File,
        SourceEvent::Data(bytes::Bytes::from_static(b"x")),
        SourceEvent::End,
    ]);
    res.set("Content-Type", "application/x-custom");
    res.send_file("/srv/notes.txt", TransferOptions::default())
        .await
        .unwrap();

    let captured = handle.captured().await.unwrap();
    assert_eq!(captured.header("content-type"), Some("application/x-custom"));
}

#[tokio::test]
async fn test_send_file_with_hands_back_the_raw_outcome() {
    let (mut res, _handle, mut signals) = scripted_response(vec![SourceEvent::Directory]);

    let mut seen = None;
    res.send_file_with("/srv/some-dir", TransferOptions::default(), |_, outcome| {
        seen = Some(outcome);
    })
    .await
    .unwrap();

    assert!(matches!(seen, Some(Err(StreamError::IsDirectory))));
    // The raw form applies no policy of its own.
    assert!(signals.try_recv().is_err());
}

#[tokio::test]
async fn test_download_marks_the_response_as_attachment() {
    let (mut res, handle, _signals) = scripted_response(vec![
        SourceEvent::File,
        SourceEvent::Data(bytes::Bytes::from_static(b"%PDF-")),
        SourceEvent::End,
    ]);
    res.download("/srv/report.pdf", None, TransferOptions::default())
        .await
        .unwrap();

    let captured = handle.captured().await.unwrap();
    assert_eq!(
        captured.header("content-disposition"),
        Some("attachment; filename=\"report.pdf\"")
    );
    assert_eq!(captured.header("content-type"), Some("application/pdf"));
    assert_eq!(captured.text(), "%PDF-");
}

#[tokio::test]
async fn test_download_prefers_the_explicit_filename() {
    let (mut res, handle, _signals) = scripted_response(vec![
        SourceEvent::File,
        SourceEvent::Data(bytes::Bytes::from_static(b"data")),
        SourceEvent::End,
    ]);
    res.download(
        "/srv/2026-08-export.csv",
        Some("quarterly.csv"),
        TransferOptions::default(),
    )
    .await
    .unwrap();

    let captured = handle.captured().await.unwrap();
    assert_eq!(
        captured.header("content-disposition"),
        Some("attachment; filename=\"quarterly.csv\"")
    );
}
