//! The response sink abstraction and the buffered sink the server uses.
//!
//! Handlers never build a response value. They receive a `&mut dyn
//! ResponseSink` and push headers, a status, and body bytes into it, in that
//! order. Decorators may wrap the sink before passing it on.

use bytes::{Bytes, BytesMut};
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;
use tracing::{debug, warn};

// ── ContentType ───────────────────────────────────────────────────────────────

/// Content-type values written by the built-in handlers.
#[derive(Clone, Copy, Debug)]
pub enum ContentType {
    Html, // text/html; charset=utf-8
    Text, // text/plain; charset=utf-8
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html => "text/html; charset=utf-8",
            Self::Text => "text/plain; charset=utf-8",
        }
    }

    pub fn header_value(self) -> HeaderValue {
        HeaderValue::from_static(self.as_str())
    }
}

// ── ResponseSink ──────────────────────────────────────────────────────────────

/// Receives the headers, status, and body of one response.
pub trait ResponseSink {
    fn set_header(&mut self, name: HeaderName, value: HeaderValue);

    fn write(&mut self, data: &[u8]);

    fn write_status(&mut self, status: StatusCode);

    /// The status recorded by a capturing wrapper, if this sink is one.
    ///
    /// Plain sinks keep the default `None`. [`crate::capture::wrap`] uses this
    /// to avoid instrumenting a sink twice.
    fn captured_status(&self) -> Option<StatusCode> {
        None
    }
}

/// Convenience writes on top of [`ResponseSink`].
pub trait ResponseSinkExt: ResponseSink {
    fn set_content_type(&mut self, content_type: ContentType) {
        self.set_header(CONTENT_TYPE, content_type.header_value());
    }

    fn write_str(&mut self, s: &str) {
        self.write(s.as_bytes());
    }
}

impl<S: ResponseSink + ?Sized> ResponseSinkExt for S {}

// ── BufferedResponse ──────────────────────────────────────────────────────────

/// A sink that collects the whole response in memory.
///
/// Follows HTTP/1.1 wire ordering even though nothing is sent until
/// [`into_response`](Self::into_response):
///
/// - the first `write_status` is the one that counts; later calls are
///   ignored,
/// - a `write` before any status implies `200 OK`,
/// - headers set after the status are ignored.
#[derive(Debug, Default)]
pub struct BufferedResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// The status that will be sent. `200 OK` if nothing was written yet.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Lossy UTF-8 view of the body, mostly useful in tests.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn into_response(self) -> http::Response<Full<Bytes>> {
        let status = self.status();
        let mut response = http::Response::new(Full::new(self.body.freeze()));
        *response.status_mut() = status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseSink for BufferedResponse {
    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        if self.status.is_some() {
            debug!(header = %name, "header set after status was written, ignored");
            return;
        }
        self.headers.insert(name, value);
    }

    fn write(&mut self, data: &[u8]) {
        if self.status.is_none() {
            self.write_status(StatusCode::OK);
        }
        self.body.extend_from_slice(data);
    }

    fn write_status(&mut self, status: StatusCode) {
        match self.status {
            None => self.status = Some(status),
            Some(sent) => warn!(
                sent = sent.as_u16(),
                ignored = status.as_u16(),
                "superfluous write_status call"
            ),
        }
    }
}
