//! Case-insensitive header storage.
//!
//! # Responsibilities
//! - One canonical lowercase key per header name
//! - Scalar and list-valued fields (`Set-Cookie`, `Link`)
//! - Append-merge semantics instead of overwrite
//! - Drop values that would corrupt the wire form

use http::header::{HeaderMap, HeaderName, HeaderValue};

use crate::headers::charset::ensure_charset;

/// A header field value: a single string or an ordered list.
///
/// `Many` always holds at least one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    One(String),
    Many(Vec<String>),
}

impl FieldValue {
    /// First (or only) value.
    pub fn first(&self) -> &str {
        match self {
            FieldValue::One(v) => v,
            FieldValue::Many(vs) => vs.first().map(String::as_str).unwrap_or(""),
        }
    }

    /// Flatten into an ordered list.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            FieldValue::One(v) => vec![v],
            FieldValue::Many(vs) => vs,
        }
    }

    /// Number of values held.
    pub fn len(&self) -> usize {
        match self {
            FieldValue::One(_) => 1,
            FieldValue::Many(vs) => vs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Combine with a later value, scalar + scalar becomes a two-entry list.
    pub fn merge(self, other: FieldValue) -> FieldValue {
        let mut values = self.into_vec();
        values.extend(other.into_vec());
        if values.len() == 1 {
            FieldValue::One(values.remove(0))
        } else {
            FieldValue::Many(values)
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::One(v) => f.write_str(v),
            FieldValue::Many(vs) => f.write_str(&vs.join(", ")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::One(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::One(v)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(vs: Vec<String>) -> Self {
        FieldValue::Many(vs)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(vs: Vec<&str>) -> Self {
        FieldValue::Many(vs.into_iter().map(str::to_string).collect())
    }
}

// Numeric values are stringified, `Content-Length` being the usual caller.
impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        FieldValue::One(v.to_string())
    }
}

impl From<usize> for FieldValue {
    fn from(v: usize) -> Self {
        FieldValue::One(v.to_string())
    }
}

impl PartialEq<&str> for FieldValue {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, FieldValue::One(v) if v == other)
    }
}

/// Case-insensitive header map with list support.
///
/// Names are canonicalized to lowercase by `http::HeaderName`; values that
/// still contain illegal bytes after control-character stripping are dropped
/// with a warning rather than corrupting the captured response.
#[derive(Debug, Clone, Default)]
pub struct HeaderStore {
    map: HeaderMap,
}

impl HeaderStore {
    pub fn new() -> Self {
        Self {
            map: HeaderMap::new(),
        }
    }

    /// Set a field, replacing every existing value under the name.
    ///
    /// Setting `Content-Type` without a charset parameter picks up the
    /// default charset for the media type.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) {
        let Some(header) = parse_name(name) else {
            return;
        };
        let value = value.into();
        let value = if header == http::header::CONTENT_TYPE {
            FieldValue::One(ensure_charset(value.first()))
        } else {
            value
        };

        self.map.remove(&header);
        for v in value.into_vec() {
            if let Some(hv) = clean_value(name, &v) {
                self.map.append(header.clone(), hv);
            }
        }
    }

    /// Get a field; scalar stays scalar, repeated fields come back as a list.
    pub fn get(&self, name: &str) -> Option<FieldValue> {
        let header = parse_name(name)?;
        let mut values: Vec<String> = self
            .map
            .get_all(&header)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_string))
            .collect();
        match values.len() {
            0 => None,
            1 => Some(FieldValue::One(values.remove(0))),
            _ => Some(FieldValue::Many(values)),
        }
    }

    /// Add to a field, merging with any prior value instead of overwriting.
    pub fn append(&mut self, name: &str, value: impl Into<FieldValue>) {
        let Some(header) = parse_name(name) else {
            return;
        };
        for v in value.into().into_vec() {
            if let Some(hv) = clean_value(name, &v) {
                self.map.append(header.clone(), hv);
            }
        }
    }

    pub fn remove(&mut self, name: &str) {
        if let Some(header) = parse_name(name) {
            self.map.remove(&header);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        parse_name(name).is_some_and(|header| self.map.contains_key(&header))
    }

    /// Borrow the underlying canonical map.
    pub fn as_map(&self) -> &HeaderMap {
        &self.map
    }

    /// Take the canonical map for capture.
    pub fn into_map(self) -> HeaderMap {
        self.map
    }
}

fn parse_name(name: &str) -> Option<HeaderName> {
    match HeaderName::from_bytes(name.as_bytes()) {
        Ok(header) => Some(header),
        Err(_) => {
            tracing::warn!(header = %name, "Invalid header name dropped");
            None
        }
    }
}

/// Strip CR/LF and control characters, then validate as a header value.
fn clean_value(name: &str, value: &str) -> Option<HeaderValue> {
    let cleaned: String = value
        .chars()
        .filter(|c| *c == '\t' || !c.is_control())
        .collect();
    match HeaderValue::from_str(&cleaned) {
        Ok(hv) => Some(hv),
        Err(_) => {
            tracing::warn!(header = %name, "Invalid header value dropped");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let mut store = HeaderStore::new();
        store.set("X-Custom-Header", "one");
        assert_eq!(store.get("x-custom-header"), Some(FieldValue::from("one")));
        assert_eq!(store.get("X-CUSTOM-HEADER"), Some(FieldValue::from("one")));
    }

    #[test]
    fn set_replaces_all_values() {
        let mut store = HeaderStore::new();
        store.append("warning", "a");
        store.append("warning", "b");
        store.set("warning", "c");
        assert_eq!(store.get("warning"), Some(FieldValue::from("c")));
    }

    #[test]
    fn append_merges_scalar_into_list() {
        let mut store = HeaderStore::new();
        store.set("link", "<a>");
        store.append("link", "<b>");
        assert_eq!(
            store.get("link"),
            Some(FieldValue::Many(vec!["<a>".into(), "<b>".into()]))
        );
    }

    #[test]
    fn append_extends_existing_list() {
        let mut store = HeaderStore::new();
        store.set("warning", vec!["a", "b"]);
        store.append("warning", "c");
        assert_eq!(store.get("warning").unwrap().len(), 3);
    }

    #[test]
    fn content_type_gains_default_charset() {
        let mut store = HeaderStore::new();
        store.set("Content-Type", "text/html");
        assert_eq!(
            store.get("content-type"),
            Some(FieldValue::from("text/html; charset=utf-8"))
        );
    }

    #[test]
    fn explicit_charset_is_preserved() {
        let mut store = HeaderStore::new();
        store.set("Content-Type", "text/html; charset=iso-8859-1");
        assert_eq!(
            store.get("content-type"),
            Some(FieldValue::from("text/html; charset=iso-8859-1"))
        );
    }

    #[test]
    fn numeric_values_are_stringified() {
        let mut store = HeaderStore::new();
        store.set("Content-Length", 42u64);
        assert_eq!(store.get("content-length"), Some(FieldValue::from("42")));
    }

    #[test]
    fn crlf_is_stripped_from_values() {
        let mut store = HeaderStore::new();
        store.set("X-Evil", "a\r\nSet-Cookie: hacked");
        assert_eq!(
            store.get("x-evil"),
            Some(FieldValue::from("aSet-Cookie: hacked"))
        );
    }

    #[test]
    fn invalid_name_is_dropped() {
        let mut store = HeaderStore::new();
        store.set("bad name", "v");
        assert_eq!(store.get("bad name"), None);
    }
}
