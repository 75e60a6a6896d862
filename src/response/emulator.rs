//! The response façade legacy handlers drive.
//!
//! # Responsibilities
//! - Mirror the imperative response contract: status, headers, cookies,
//!   negotiation, redirects, renders, file transfers
//! - Dispatch `send` on payload form and finalize exactly once
//! - Apply the JSONP callback-injection defenses
//! - Guard every mutation after finalization
//!
//! # Design Decisions
//! - Composition over inheritance: the transport is a boxed trait object
//! - Legacy overload-by-arity surfaces as explicit deprecated methods
//! - Errors legacy code "threw" route through the request's continuation

use std::cell::RefCell;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use http::{Method, StatusCode};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::config::{EtagMode, Settings};
use crate::cookies::codec::{self, CookieError, CookieOptions, CookieValue};
use crate::headers::charset::ensure_charset;
use crate::headers::encoding::{encode_component, encode_uri, escape_html};
use crate::headers::vary::merge_vary;
use crate::headers::FieldValue;
use crate::negotiate::{self, NegotiationError};
use crate::request::{HandlerError, Request};
use crate::response::payload::Payload;
use crate::response::transport::{MemoryTransport, Transport, TransportHandle};
use crate::response::{BoxError, FileSourceFn, Hooks};
use crate::sendfile::{FileTransfer, StreamError, TransferOptions, ValidationError};

/// Handler table for [`Response::format`].
///
/// Keys are media types or extensions; at most one handler runs. `default`
/// is the fallback when nothing matches.
pub struct Formats<'h> {
    handlers: Vec<(String, FormatHandler<'h>)>,
    fallback: Option<FormatHandler<'h>>,
}

type FormatHandler<'h> = Box<dyn FnOnce(&mut Response) + 'h>;

impl<'h> Formats<'h> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            fallback: None,
        }
    }

    /// Register a handler for a type or extension key.
    pub fn on(mut self, key: &str, handler: impl FnOnce(&mut Response) + 'h) -> Self {
        self.handlers.push((key.to_string(), Box::new(handler)));
        self
    }

    /// Fallback when no key matches; runs without setting a content type.
    pub fn default(mut self, handler: impl FnOnce(&mut Response) + 'h) -> Self {
        self.fallback = Some(Box::new(handler));
        self
    }
}

impl Default for Formats<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Stateful response object emulating the legacy imperative contract.
///
/// Handlers mutate it in any order, one terminal call captures the final
/// {status, headers, body} through the transport, and everything after
/// finalization is a guarded no-op.
pub struct Response {
    req: Request,
    transport: Box<dyn Transport>,
    status: StatusCode,
    charset: Option<String>,
    locals: serde_json::Map<String, serde_json::Value>,
    settings: Settings,
    hooks: Hooks,
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("charset", &self.charset)
            .field("locals", &self.locals)
            .field("settings", &self.settings)
            .field("finished", &self.transport.is_finished())
            .finish_non_exhaustive()
    }
}

impl Response {
    pub fn new(req: Request, settings: Settings, hooks: Hooks, transport: Box<dyn Transport>) -> Self {
        Self {
            req,
            transport,
            status: StatusCode::OK,
            charset: None,
            locals: serde_json::Map::new(),
            settings,
            hooks,
        }
    }

    /// In-memory response with default settings and hooks.
    pub fn in_memory(req: Request) -> (Self, TransportHandle) {
        Self::in_memory_with(req, Settings::default(), Hooks::default())
    }

    /// In-memory response with explicit settings and hooks.
    pub fn in_memory_with(req: Request, settings: Settings, hooks: Hooks) -> (Self, TransportHandle) {
        let (transport, handle) = MemoryTransport::channel();
        (Self::new(req, settings, hooks, Box::new(transport)), handle)
    }

    pub fn req(&self) -> &Request {
        &self.req
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    /// Per-response values merged into render options under `_locals`.
    pub fn locals(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.locals
    }

    pub fn locals_mut(&mut self) -> &mut serde_json::Map<String, serde_json::Value> {
        &mut self.locals
    }

    pub fn finished(&self) -> bool {
        self.transport.is_finished()
    }

    // ---- non-terminal mutations -------------------------------------------

    /// Set the status code. Out-of-range codes are ignored with a warning.
    pub fn status(&mut self, code: u16) -> &mut Self {
        if self.guard("status") {
            return self;
        }
        match StatusCode::from_u16(code) {
            Ok(status) => self.status = status,
            Err(_) => tracing::warn!(code, "Invalid status code ignored"),
        }
        self
    }

    /// Set a header, replacing prior values. Content types pick up their
    /// default charset.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> &mut Self {
        if self.guard("set") {
            return self;
        }
        let value = value.into();
        let value = if name.eq_ignore_ascii_case("content-type") {
            FieldValue::One(ensure_charset(value.first()))
        } else {
            value
        };
        self.transport.set_header(name, value);
        self
    }

    /// Alias for [`set`](Self::set).
    pub fn header(&mut self, name: &str, value: impl Into<FieldValue>) -> &mut Self {
        self.set(name, value)
    }

    /// Apply several headers at once.
    pub fn set_many(&mut self, entries: &[(&str, &str)]) -> &mut Self {
        for (name, value) in entries {
            self.set(name, *value);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<FieldValue> {
        self.transport.get_header(name)
    }

    /// Add to a header, merging with any prior value instead of replacing.
    pub fn append(&mut self, name: &str, value: impl Into<FieldValue>) -> &mut Self {
        if self.guard("append") {
            return self;
        }
        let merged = match self.transport.get_header(name) {
            Some(prior) => prior.merge(value.into()),
            None => value.into(),
        };
        self.set(name, merged)
    }

    pub fn remove(&mut self, name: &str) -> &mut Self {
        if self.guard("remove") {
            return self;
        }
        self.transport.remove_header(name);
        self
    }

    /// Set `Content-Type`; extensions resolve through the MIME table, and
    /// unknown extensions fall back to `application/octet-stream`.
    pub fn content_type(&mut self, kind: &str) -> &mut Self {
        let full = negotiate::normalize_type(kind.trim_start_matches('.'))
            .unwrap_or_else(|| "application/octet-stream".to_string());
        self.set("Content-Type", full)
    }

    /// Add fields to `Vary` without duplication. An empty list is an
    /// explicit no-op.
    pub fn vary(&mut self, fields: &str) -> &mut Self {
        if self.guard("vary") {
            return self;
        }
        let existing = self.get("Vary").map(|v| v.to_string());
        if let Some(merged) = merge_vary(existing.as_deref(), fields) {
            self.transport.set_header("Vary", FieldValue::One(merged));
        }
        self
    }

    /// Append rel→URL pairs onto the `Link` header.
    pub fn links(&mut self, links: &[(&str, &str)]) -> &mut Self {
        if self.guard("links") {
            return self;
        }
        let formatted: Vec<String> = links
            .iter()
            .map(|(rel, url)| format!("<{url}>; rel=\"{rel}\""))
            .collect();
        let mut value = self.get("Link").map(|v| v.to_string()).unwrap_or_default();
        if !value.is_empty() && !formatted.is_empty() {
            value.push_str(", ");
        }
        value.push_str(&formatted.join(", "));
        self.set("Link", value)
    }

    /// Set `Location`. The literal `"back"` resolves to the request's
    /// referrer, `/` when absent.
    pub fn location(&mut self, url: &str) -> &mut Self {
        let target = if url == "back" {
            self.req.get("Referrer").unwrap_or("/").to_string()
        } else {
            url.to_string()
        };
        self.set("Location", target)
    }

    /// Mark the response as an attachment, inferring the content type from
    /// the filename when one is given.
    pub fn attachment(&mut self, filename: Option<&str>) -> &mut Self {
        if let Some(filename) = filename {
            if let Some(ext) = Path::new(filename).extension().and_then(|e| e.to_str()) {
                self.content_type(ext);
            }
        }
        let disposition = content_disposition(filename);
        self.set("Content-Disposition", disposition)
    }

    /// Append a `Set-Cookie` header; prior cookies accumulate as a list.
    pub fn cookie(
        &mut self,
        name: &str,
        value: impl Into<CookieValue>,
        options: CookieOptions,
    ) -> Result<&mut Self, CookieError> {
        if self.guard("cookie") {
            return Ok(self);
        }
        let serialized = codec::serialize(name, value.into(), &options, self.req.secret.as_deref())?;
        Ok(self.append("Set-Cookie", serialized))
    }

    /// Expire a cookie: empty value, epoch expiry, caller options merged
    /// over the defaults.
    pub fn clear_cookie(
        &mut self,
        name: &str,
        options: CookieOptions,
    ) -> Result<&mut Self, CookieError> {
        self.cookie(name, "", codec::expired(options))
    }

    /// Select a representation by the request's accept order.
    ///
    /// Always varies on `Accept`. With no match and no fallback, a 406
    /// negotiation error goes to the continuation, never a panic.
    pub fn format(&mut self, mut formats: Formats<'_>) -> &mut Self {
        if self.guard("format") {
            return self;
        }
        self.vary("Accept");

        let selected = {
            let keys: Vec<&str> = formats.handlers.iter().map(|(k, _)| k.as_str()).collect();
            negotiate::resolve(&self.req.accept, &keys).map(str::to_string)
        };

        if let Some(key) = selected {
            if let Some(position) = formats.handlers.iter().position(|(k, _)| *k == key) {
                let (_, handler) = formats.handlers.remove(position);
                if let Some(full) = negotiate::normalize_type(&key) {
                    self.set("Content-Type", full);
                }
                handler(self);
            }
        } else if let Some(fallback) = formats.fallback.take() {
            fallback(self);
        } else {
            let types: Vec<String> = formats
                .handlers
                .iter()
                .map(|(k, _)| {
                    negotiate::normalize_type(k)
                        .unwrap_or_else(|| "application/octet-stream".to_string())
                })
                .collect();
            let err = NegotiationError::new(types);
            tracing::debug!(request_id = %self.req.id, "No acceptable representation");
            self.req.continuation.error(err);
        }
        self
    }

    // ---- terminal operations ----------------------------------------------

    /// Finalize with a payload, dispatching defaults on its form.
    pub fn send(&mut self, payload: impl Into<Payload>) {
        if self.guard("send") {
            return;
        }
        match payload.into() {
            Payload::Json(value) => self.json_value(value),
            Payload::Text(text) => self.send_text(text),
            Payload::Binary(bytes) => self.send_binary(bytes),
            Payload::None => self.finish_buffered(Bytes::new()),
        }
    }

    /// Serialize to JSON and send. Serialization failures route to the
    /// continuation and leave the response open.
    pub fn json(&mut self, value: impl Serialize) {
        if self.guard("json") {
            return;
        }
        match serde_json::to_value(value) {
            Ok(value) => self.json_value(value),
            Err(err) => {
                tracing::warn!(request_id = %self.req.id, error = %err, "JSON serialization failed");
                self.req.continuation.error(HandlerError::from(err));
            }
        }
    }

    /// JSON wrapped for script-tag consumption when the configured callback
    /// parameter is present on the request.
    pub fn jsonp(&mut self, value: impl Serialize) {
        if self.guard("jsonp") {
            return;
        }
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(request_id = %self.req.id, error = %err, "JSON serialization failed");
                self.req.continuation.error(HandlerError::from(err));
                return;
            }
        };
        let value = match &self.hooks.json_replacer {
            Some(replace) => replace(value),
            None => value,
        };
        let mut body = self.stringify(&value);
        let callback = self
            .req
            .query_first(&self.settings.jsonp_callback_name)
            .map(str::to_string);

        if self.get("Content-Type").is_none() {
            self.set("X-Content-Type-Options", "nosniff");
            self.set("Content-Type", "application/json");
        }

        if let Some(callback) = callback.filter(|c| !c.is_empty()) {
            // Restrict the callback to identifier characters; everything
            // else is an injection vector inside a script tag.
            let callback: String = callback
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.' | '[' | ']'))
                .collect();
            self.charset = Some("utf-8".to_string());
            self.set("X-Content-Type-Options", "nosniff");
            self.set("Content-Type", "text/javascript");

            // U+2028/U+2029 are valid JSON but terminate JavaScript lines.
            let escaped = body.replace('\u{2028}', "\\u2028").replace('\u{2029}', "\\u2029");
            body = format!("/**/ typeof {callback} === 'function' && {callback}({escaped});");
        }
        self.send_text(body);
    }

    /// Set the status and send its phrase as a plain-text body; unknown
    /// codes send the numeric code.
    pub fn send_status(&mut self, code: u16) {
        if self.guard("send_status") {
            return;
        }
        self.status(code);
        let body = StatusCode::from_u16(code)
            .ok()
            .and_then(|s| s.canonical_reason())
            .map(str::to_string)
            .unwrap_or_else(|| code.to_string());
        self.content_type("txt");
        self.send(body);
    }

    /// Redirect with 302 Found.
    pub fn redirect(&mut self, url: &str) {
        self.redirect_with_status(302, url);
    }

    /// Redirect with an explicit status, negotiating a small body across
    /// plain text and HTML.
    pub fn redirect_with_status(&mut self, status: u16, url: &str) {
        if self.guard("redirect") {
            return;
        }
        self.location(url);
        let address = self.get("Location").map(|v| v.to_string()).unwrap_or_default();
        let phrase = StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .map(str::to_string)
            .unwrap_or_else(|| status.to_string());

        let body = RefCell::new(String::new());
        self.format(
            Formats::new()
                .on("txt", |_| {
                    *body.borrow_mut() =
                        format!("{phrase}. Redirecting to {}", encode_uri(&address));
                })
                .on("html", |_| {
                    let target = escape_html(&address);
                    *body.borrow_mut() = format!(
                        "<p>{phrase}. Redirecting to <a href=\"{target}\">{target}</a></p>"
                    );
                })
                .default(|_| {}),
        );
        let body = body.into_inner();

        self.status(status);
        self.set("Content-Length", body.len());
        let chunk = if self.req.method == Method::HEAD {
            None
        } else {
            Some(Bytes::from(body))
        };
        self.finalize(chunk);
    }

    /// Render a view and send it; render failures route to the
    /// continuation and leave the response open.
    pub fn render(&mut self, view: &str, options: serde_json::Value) {
        if self.guard("render") {
            return;
        }
        match self.run_render(view, options) {
            Ok(rendered) => self.send(rendered),
            Err(err) => {
                tracing::warn!(request_id = %self.req.id, view, error = %err, "Render failed");
                self.req.continuation.error(HandlerError::Render(err));
            }
        }
    }

    /// Render a view and hand the raw outcome to `callback` instead of
    /// auto-sending.
    pub fn render_with(
        &mut self,
        view: &str,
        options: serde_json::Value,
        callback: impl FnOnce(&mut Response, Result<String, BoxError>),
    ) {
        let outcome = self.run_render(view, options);
        callback(self, outcome);
    }

    // ---- file transfer ----------------------------------------------------

    /// Stream a file through the response with the legacy completion
    /// policy: a directory passes to the next handler, aborts and write
    /// failures are swallowed, anything else goes to the error chain.
    pub async fn send_file(
        &mut self,
        path: &str,
        options: TransferOptions,
    ) -> Result<(), ValidationError> {
        if self.guard("send_file") {
            return Ok(());
        }
        let source = self.validate_transfer(path, &options)?;
        let outcome = self.run_transfer(source, path, options).await;
        match outcome {
            Ok(()) => {}
            Err(StreamError::IsDirectory) => {
                tracing::debug!(path, code = "EISDIR", "Transfer hit a directory, passing on");
                self.req.continuation.next();
            }
            Err(err @ StreamError::Aborted) | Err(err @ StreamError::Write { .. }) => {
                tracing::debug!(path, code = err.code(), "File transfer dropped");
            }
            Err(err) => {
                tracing::debug!(path, code = err.code(), "File transfer failed");
                self.req.continuation.error(err);
            }
        }
        Ok(())
    }

    /// Stream a file and hand the raw outcome to `on_done` instead of
    /// applying the completion policy.
    pub async fn send_file_with(
        &mut self,
        path: &str,
        options: TransferOptions,
        on_done: impl FnOnce(&mut Response, Result<(), StreamError>),
    ) -> Result<(), ValidationError> {
        if self.guard("send_file") {
            return Ok(());
        }
        let source = self.validate_transfer(path, &options)?;
        let outcome = self.run_transfer(source, path, options).await;
        on_done(self, outcome);
        Ok(())
    }

    /// Transfer a file as an attachment, `filename` defaulting to the path.
    pub async fn download(
        &mut self,
        path: &str,
        filename: Option<&str>,
        mut options: TransferOptions,
    ) -> Result<(), ValidationError> {
        let name = filename.unwrap_or(path);
        options
            .headers
            .push(("Content-Disposition".to_string(), content_disposition(Some(name))));
        self.send_file(path, options).await
    }

    // ---- legacy arity shims -----------------------------------------------

    /// Legacy two-argument send.
    #[deprecated(note = "use `status(code)` then `send(payload)`")]
    pub fn send_with_status(&mut self, code: u16, payload: impl Into<Payload>) {
        tracing::warn!(code, "send_with_status is deprecated, use status(code).send(body)");
        self.status(code);
        self.send(payload);
    }

    /// Legacy two-argument json.
    #[deprecated(note = "use `status(code)` then `json(value)`")]
    pub fn json_with_status(&mut self, code: u16, value: impl Serialize) {
        tracing::warn!(code, "json_with_status is deprecated, use status(code).json(value)");
        self.status(code);
        self.json(value);
    }

    /// Legacy two-argument jsonp.
    #[deprecated(note = "use `status(code)` then `jsonp(value)`")]
    pub fn jsonp_with_status(&mut self, code: u16, value: impl Serialize) {
        tracing::warn!(code, "jsonp_with_status is deprecated, use status(code).jsonp(value)");
        self.status(code);
        self.jsonp(value);
    }

    // ---- internals --------------------------------------------------------

    fn guard(&self, operation: &'static str) -> bool {
        if self.transport.is_finished() {
            tracing::warn!(
                request_id = %self.req.id,
                operation,
                "Response already finalized, call ignored"
            );
            true
        } else {
            false
        }
    }

    fn send_text(&mut self, text: String) {
        let content_type = self
            .get("Content-Type")
            .map(|v| v.first().to_string())
            .unwrap_or_else(|| "text/html".to_string());
        self.set("Content-Type", content_type);
        self.finish_buffered(Bytes::from(text));
    }

    fn send_binary(&mut self, bytes: Bytes) {
        if self.get("Content-Type").is_none() {
            self.set("Content-Type", "application/octet-stream");
        }
        self.finish_buffered(bytes);
    }

    fn json_value(&mut self, value: serde_json::Value) {
        let value = match &self.hooks.json_replacer {
            Some(replace) => replace(value),
            None => value,
        };
        let body = self.stringify(&value);
        if self.get("Content-Type").is_none() {
            self.set("Content-Type", "application/json");
        }
        self.send_text(body);
    }

    fn stringify(&self, value: &serde_json::Value) -> String {
        match self.settings.json_spaces {
            Some(spaces) if spaces > 0 => {
                let indent = " ".repeat(spaces);
                let mut out = Vec::new();
                let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
                let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
                if value.serialize(&mut serializer).is_ok() {
                    String::from_utf8(out).unwrap_or_else(|_| value.to_string())
                } else {
                    value.to_string()
                }
            }
            _ => value.to_string(),
        }
    }

    /// Common tail of every buffered terminal call.
    fn finish_buffered(&mut self, body: Bytes) {
        self.set("Content-Length", body.len());
        self.apply_etag(&body);

        if self.req.fresh {
            self.status = StatusCode::NOT_MODIFIED;
        }

        let body = if self.status == StatusCode::NO_CONTENT || self.status == StatusCode::NOT_MODIFIED
        {
            self.remove("Content-Type");
            self.remove("Content-Length");
            self.remove("Transfer-Encoding");
            Bytes::new()
        } else {
            body
        };

        let chunk = if self.req.method == Method::HEAD {
            None
        } else {
            Some(body)
        };
        self.finalize(chunk);
    }

    fn apply_etag(&mut self, body: &Bytes) {
        if self.get("ETag").is_some() {
            return;
        }
        let tag = match &self.hooks.etag {
            Some(generate) => generate(body),
            None => builtin_etag(self.settings.etag, body),
        };
        if let Some(tag) = tag {
            self.set("ETag", tag);
        }
    }

    /// Merge `locals` into the options and call the render hook. Without a
    /// hook the view name itself is the rendered output.
    fn run_render(&mut self, view: &str, options: serde_json::Value) -> Result<String, BoxError> {
        let mut map = match options {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => serde_json::Map::new(),
            _ => {
                tracing::warn!(request_id = %self.req.id, "Render options must be an object");
                serde_json::Map::new()
            }
        };
        map.insert(
            "_locals".to_string(),
            serde_json::Value::Object(self.locals.clone()),
        );
        let options = serde_json::Value::Object(map);
        match &self.hooks.render {
            Some(render) => render(view, &options),
            None => Ok(view.to_string()),
        }
    }

    fn finalize(&mut self, chunk: Option<Bytes>) {
        tracing::debug!(
            request_id = %self.req.id,
            status = %self.status,
            length = chunk.as_ref().map(Bytes::len).unwrap_or(0),
            "Finalizing response"
        );
        self.transport.end(self.status, chunk);
    }

    fn validate_transfer(
        &self,
        path: &str,
        options: &TransferOptions,
    ) -> Result<FileSourceFn, ValidationError> {
        if path.is_empty() {
            return Err(ValidationError::MissingPath);
        }
        if options.root.is_none() && Path::new(path).is_relative() {
            return Err(ValidationError::RelativePath(path.to_string()));
        }
        self.hooks
            .file_source
            .clone()
            .ok_or(ValidationError::SourceUnavailable)
    }

    async fn run_transfer(
        &mut self,
        source: FileSourceFn,
        path: &str,
        options: TransferOptions,
    ) -> Result<(), StreamError> {
        let content_type = mime_guess::from_path(path).first_raw().map(str::to_string);
        let events = source(Path::new(path), &options);
        let finish = self.transport.finish_signal();

        let mut transfer = FileTransfer::new(options.headers, content_type);
        let outcome = transfer.run(&mut *self.transport, events, finish).await;

        if outcome.is_ok() && !self.transport.is_finished() {
            let length = self.transport.buffered_len();
            self.set("Content-Length", length);
            self.finalize(None);
        }
        outcome
    }
}

/// `Content-Disposition: attachment`, quoting the filename and adding the
/// RFC 5987 extended form for non-ASCII names.
fn content_disposition(filename: Option<&str>) -> String {
    let Some(filename) = filename else {
        return "attachment".to_string();
    };
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    if name.is_ascii() && !name.contains('"') {
        format!("attachment; filename=\"{name}\"")
    } else {
        let fallback: String = name
            .chars()
            .map(|c| if c.is_ascii() && c != '"' { c } else { '?' })
            .collect();
        let extended = encode_component(name)
            .replace('\'', "%27")
            .replace('(', "%28")
            .replace(')', "%29")
            .replace('*', "%2A");
        format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{extended}")
    }
}

/// Built-in entity tags: hex length and a truncated SHA-256, weak or strong.
fn builtin_etag(mode: EtagMode, body: &[u8]) -> Option<String> {
    if mode == EtagMode::Disabled {
        return None;
    }
    let mut hasher = Sha256::new();
    hasher.update(body);
    let digest = STANDARD.encode(hasher.finalize());
    let tag = format!("\"{:x}-{}\"", body.len(), &digest[..27]);
    match mode {
        EtagMode::Weak => Some(format!("W/{tag}")),
        EtagMode::Strong => Some(tag),
        EtagMode::Disabled => None,
    }
}
