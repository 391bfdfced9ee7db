//! Status-capturing response wrapper.
//!
//! A sink hides the status once it has been written. Decorators that need to
//! report it afterwards (see [`Logging`](crate::middleware::Logging)) wrap the
//! sink first:
//!
//! ```rust
//! use http::StatusCode;
//! use xhttp::{BufferedResponse, ResponseSink, capture};
//!
//! let mut res = BufferedResponse::new();
//! let mut sink = capture::wrap(&mut res);
//! sink.write_status(StatusCode::NOT_FOUND);
//! assert_eq!(sink.status_code(), StatusCode::NOT_FOUND);
//! ```
//!
//! Wrapping is idempotent. A sink that already reports
//! [`captured_status`](ResponseSink::captured_status) is handed back as is,
//! so nested decorators all observe the same recorded status.

use http::StatusCode;
use http::header::{HeaderName, HeaderValue};

use crate::response::ResponseSink;

/// Records the last status written through it and forwards everything to the
/// inner sink.
pub struct StatusCapture<'a> {
    inner: &'a mut dyn ResponseSink,
    status: StatusCode,
}

impl<'a> StatusCapture<'a> {
    /// Starts at `200 OK`: a handler that only writes a body never calls
    /// `write_status` at all.
    pub fn new(inner: &'a mut dyn ResponseSink) -> Self {
        Self { inner, status: StatusCode::OK }
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }
}

impl ResponseSink for StatusCapture<'_> {
    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.inner.set_header(name, value);
    }

    fn write(&mut self, data: &[u8]) {
        self.inner.write(data);
    }

    fn write_status(&mut self, status: StatusCode) {
        self.status = status;
        self.inner.write_status(status);
    }

    fn captured_status(&self) -> Option<StatusCode> {
        Some(self.status)
    }
}

/// The result of [`wrap`]: either a new capture or the sink that was already
/// capturing.
pub enum Captured<'a> {
    Fresh(StatusCapture<'a>),
    Existing(&'a mut dyn ResponseSink),
}

impl Captured<'_> {
    pub fn status_code(&self) -> StatusCode {
        self.captured_status().unwrap_or(StatusCode::OK)
    }

    fn sink(&mut self) -> &mut dyn ResponseSink {
        match self {
            Self::Fresh(capture) => capture,
            Self::Existing(sink) => &mut **sink,
        }
    }
}

impl ResponseSink for Captured<'_> {
    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.sink().set_header(name, value);
    }

    fn write(&mut self, data: &[u8]) {
        self.sink().write(data);
    }

    fn write_status(&mut self, status: StatusCode) {
        self.sink().write_status(status);
    }

    fn captured_status(&self) -> Option<StatusCode> {
        match self {
            Self::Fresh(capture) => capture.captured_status(),
            Self::Existing(sink) => sink.captured_status(),
        }
    }
}

/// Instruments `sink` so its status can be read back, unless it already is.
pub fn wrap(sink: &mut dyn ResponseSink) -> Captured<'_> {
    if sink.captured_status().is_some() {
        Captured::Existing(sink)
    } else {
        Captured::Fresh(StatusCapture::new(sink))
    }
}
