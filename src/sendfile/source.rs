//! File-source event vocabulary.

use std::path::PathBuf;

use bytes::Bytes;

/// Events a file source pushes while serving one transfer.
#[derive(Debug)]
pub enum SourceEvent {
    /// The path resolved to a directory.
    Directory,

    /// Source-side failure (stat, open, read).
    Error(std::io::Error),

    /// All bytes delivered.
    End,

    /// Source chose the buffered whole-file path.
    File,

    /// Source switched to chunked streaming.
    Stream,

    /// A chunk of body bytes.
    Data(Bytes),
}

/// Options for one file transfer.
#[derive(Debug, Clone, Default)]
pub struct TransferOptions {
    /// Root directory for resolving relative paths; a relative path without
    /// one is rejected before any I/O.
    pub root: Option<PathBuf>,

    /// Headers applied on success, immediately before bytes flow.
    pub headers: Vec<(String, String)>,
}
