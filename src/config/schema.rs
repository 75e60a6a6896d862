//! Emulator settings schema definitions.
//!
//! This module defines the host-tunable settings for the response emulator.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Settings consulted by every response instance.
///
/// Legacy handlers picked these up implicitly from their enclosing
/// application object; here they are explicit, loaded once by the host, and
/// handed to each response at construction.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Query parameter consulted by `jsonp` for the callback name.
    pub jsonp_callback_name: String,

    /// Indentation width for serialized JSON bodies. `None` emits compact
    /// output.
    pub json_spaces: Option<usize>,

    /// Entity tag generation mode for buffered bodies.
    pub etag: EtagMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            jsonp_callback_name: "callback".to_string(),
            json_spaces: None,
            etag: EtagMode::Weak,
        }
    }
}

/// Entity tag generation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EtagMode {
    /// Never emit an `ETag` header.
    Disabled,

    /// Weak validator over the body bytes (`W/"..."`).
    Weak,

    /// Strong validator over the body bytes.
    Strong,
}
