//! In-Memory HTTP Response Emulation Library

pub mod config;
pub mod cookies;
pub mod headers;
pub mod negotiate;
pub mod request;
pub mod response;
pub mod sendfile;

pub use config::Settings;
pub use request::Request;
pub use response::{CapturedResponse, Hooks, Response, TransportHandle};
