//! Settings validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Keep the JSONP callback parameter name matchable against parsed queries
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: Settings → Result<(), Vec<InvalidSetting>>
//! - Runs before settings are accepted into the system

use crate::config::schema::Settings;

/// A single rejected setting and the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSetting {
    pub field: &'static str,
    pub reason: String,
}

impl std::fmt::Display for InvalidSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Validate settings semantically.
pub fn validate_settings(settings: &Settings) -> Result<(), Vec<InvalidSetting>> {
    let mut errors = Vec::new();

    if settings.jsonp_callback_name.is_empty() {
        errors.push(InvalidSetting {
            field: "jsonp_callback_name",
            reason: "must not be empty".to_string(),
        });
    } else if settings
        .jsonp_callback_name
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '=' | '&' | '#'))
    {
        // Such a name can never appear as a key in a parsed query map.
        errors.push(InvalidSetting {
            field: "jsonp_callback_name",
            reason: "must not contain whitespace, '=', '&', or '#'".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
