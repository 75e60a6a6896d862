//! Default charset lookup for content types.

/// Charset to advertise for a media type when none is given.
///
/// Text types and the JSON/JavaScript application types default to UTF-8;
/// everything else carries no charset.
pub fn default_charset(content_type: &str) -> Option<&'static str> {
    let parsed: mime::Mime = content_type.parse().ok()?;
    let is_utf8 = parsed.type_() == mime::TEXT
        || (parsed.type_() == mime::APPLICATION
            && (parsed.subtype() == mime::JSON || parsed.subtype() == mime::JAVASCRIPT));
    is_utf8.then_some("utf-8")
}

/// Whether the value already carries an explicit charset parameter.
pub fn has_charset(content_type: &str) -> bool {
    content_type
        .parse::<mime::Mime>()
        .map(|m| m.get_param(mime::CHARSET).is_some())
        .unwrap_or(false)
}

/// Append the default charset parameter when the value lacks one.
///
/// Values with an explicit charset, and types with no default, pass through
/// unchanged.
pub fn ensure_charset(content_type: &str) -> String {
    if has_charset(content_type) {
        return content_type.to_string();
    }
    match default_charset(content_type) {
        Some(charset) => format!("{content_type}; charset={charset}"),
        None => content_type.to_string(),
    }
}
