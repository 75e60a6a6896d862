//! Emulator settings subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → Settings (validated, immutable)
//!     → handed to each Response at construction
//! ```
//!
//! # Design Decisions
//! - Settings are immutable once loaded; hosts construct them once per app
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_settings, settings_from_str, ConfigError};
pub use schema::{EtagMode, Settings};
pub use validation::InvalidSetting;
