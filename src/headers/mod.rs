//! Outbound header handling.
//!
//! # Responsibilities
//! - Case-insensitive storage with list-valued fields
//! - Charset injection for content types that default to UTF-8
//! - `Vary` merging without duplication
//! - Encoding helpers for redirect bodies and cookie values

pub mod charset;
pub mod encoding;
pub mod store;
pub mod vary;

pub use store::{FieldValue, HeaderStore};
