//! Asynchronous file transfer bridged from a push-based source.
//!
//! # Data Flow
//! ```text
//! host file source (stat/open/read)
//!     → SourceEvent channel (Directory | Error | File | Stream | Data | End)
//!     → FileTransfer state machine
//!     → transport writes + success headers
//!     → one terminal outcome (success | EISDIR | ECONNABORTED | error)
//! ```

pub mod source;
pub mod streamer;

pub use source::{SourceEvent, TransferOptions};
pub use streamer::{FileTransfer, StreamError, TransferState, ValidationError};
