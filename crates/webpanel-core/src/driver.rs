//! Transport abstraction.
//!
//! The engine never touches a socket. Everything it needs from the hosting
//! HTTP stack goes through [`Driver`]: an output sink, the arguments of the
//! request being served, and the shared [`RevisionClock`]. One driver value
//! is threaded through every operation of a request cycle.

use std::collections::HashMap;

use crate::revision::{Revision, RevisionClock};

/// Request argument carrying the target element id (empty for a pure poll).
pub const ARG_ID: &str = "id";
/// Request argument carrying the value submitted for the target element.
pub const ARG_VALUE: &str = "value";
/// Request argument carrying the client's last known revision.
pub const ARG_REVISION: &str = "revision";

/// Longest id or revision argument copied out of a request, in bytes.
pub const MAX_ID_LEN: usize = 32;
/// Longest value argument copied out of a request, in bytes.
pub const MAX_VALUE_LEN: usize = 64;

/// What kind of response body follows the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Full HTML document (initial page load).
    FullPage,
    /// JSON delta document (request cycle).
    Json,
}

impl ContentKind {
    /// MIME type for the `Content-Type` header.
    pub fn mime_type(self) -> &'static str {
        match self {
            ContentKind::FullPage => "text/html; charset=utf-8",
            ContentKind::Json => "application/json",
        }
    }
}

/// Capabilities the engine needs from the hosting transport.
pub trait Driver {
    /// Append text to the response body.
    fn print_content(&mut self, text: &str);

    /// Emit status line / headers for the given kind of response.
    fn print_header(&mut self, kind: ContentKind);

    /// Copy the named request argument, truncated to `max_len` bytes.
    ///
    /// Missing arguments read as the empty string.
    fn get_arg(&self, name: &str, max_len: usize) -> String;

    /// The shared revision clock.
    fn clock(&self) -> &RevisionClock;

    /// The shared revision clock, mutably.
    fn clock_mut(&mut self) -> &mut RevisionClock;

    /// The working revision of the current request cycle.
    fn current_revision(&self) -> Revision {
        self.clock().current()
    }

    /// Complete the current request cycle.
    fn advance_revision(&mut self) -> Revision {
        self.clock_mut().advance()
    }
}

/// Truncate `text` to at most `max_len` bytes without splitting a character.
pub fn bounded_copy(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }
    let mut end = max_len;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

/// In-memory driver.
///
/// Buffers the whole response body and remembers which header was
/// requested. Used by the HTTP server, which converts the buffer into a
/// response once the cycle has completed, and by tests.
#[derive(Debug)]
pub struct BufferDriver<'a> {
    clock: &'a mut RevisionClock,
    args: HashMap<String, String>,
    body: String,
    kind: Option<ContentKind>,
}

impl<'a> BufferDriver<'a> {
    /// Driver for a request without arguments (e.g. a page load).
    pub fn new(clock: &'a mut RevisionClock) -> Self {
        Self::with_args(clock, HashMap::new())
    }

    /// Driver for a request carrying the given arguments.
    pub fn with_args(clock: &'a mut RevisionClock, args: HashMap<String, String>) -> Self {
        Self {
            clock,
            args,
            body: String::new(),
            kind: None,
        }
    }

    /// Set a single request argument (builder).
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    /// The header kind requested so far, if any.
    pub fn content_kind(&self) -> Option<ContentKind> {
        self.kind
    }

    /// The response body buffered so far.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Consume the driver, returning header kind and body.
    pub fn into_response(self) -> (Option<ContentKind>, String) {
        (self.kind, self.body)
    }
}

impl Driver for BufferDriver<'_> {
    fn print_content(&mut self, text: &str) {
        self.body.push_str(text);
    }

    fn print_header(&mut self, kind: ContentKind) {
        self.kind = Some(kind);
    }

    fn get_arg(&self, name: &str, max_len: usize) -> String {
        self.args
            .get(name)
            .map(|value| bounded_copy(value, max_len))
            .unwrap_or_default()
    }

    fn clock(&self) -> &RevisionClock {
        &*self.clock
    }

    fn clock_mut(&mut self) -> &mut RevisionClock {
        &mut *self.clock
    }
}
