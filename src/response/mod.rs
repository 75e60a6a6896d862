//! Response assembly: payload dispatch, the transport seam, and the façade.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::sendfile::{SourceEvent, TransferOptions};

pub mod emulator;
pub mod payload;
pub mod transport;

pub use emulator::{Formats, Response};
pub use payload::Payload;
pub use transport::{
    CapturedResponse, MemoryTransport, Transport, TransportFinish, TransportHandle,
};

/// Boxed error handed back by host hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// View renderer: `(view, options) → rendered text`.
pub type RenderFn = Arc<dyn Fn(&str, &serde_json::Value) -> Result<String, BoxError> + Send + Sync>;

/// Rewrites the JSON value before serialization.
pub type JsonReplacerFn = Arc<dyn Fn(serde_json::Value) -> serde_json::Value + Send + Sync>;

/// Custom entity tag generator over the finalized body bytes.
pub type EtagFn = Arc<dyn Fn(&[u8]) -> Option<String> + Send + Sync>;

/// File source factory: yields the event stream for one transfer.
pub type FileSourceFn =
    Arc<dyn Fn(&Path, &TransferOptions) -> mpsc::UnboundedReceiver<SourceEvent> + Send + Sync>;

/// Host-provided collaborators, all optional.
#[derive(Clone, Default)]
pub struct Hooks {
    /// View renderer behind `render`; absent means views pass through by
    /// name, unrendered.
    pub render: Option<RenderFn>,

    /// Overrides the built-in entity tag generators.
    pub etag: Option<EtagFn>,

    /// Rewrites JSON values before `json`/`jsonp` serialize them.
    pub json_replacer: Option<JsonReplacerFn>,

    /// Produces file-transfer event streams for `send_file`.
    pub file_source: Option<FileSourceFn>,
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("render", &self.render.is_some())
            .field("etag", &self.etag.is_some())
            .field("json_replacer", &self.json_replacer.is_some())
            .field("file_source", &self.file_source.is_some())
            .finish()
    }
}
