//! The handler interface every component implements.
//!
//! # How handlers compose
//!
//! A handler receives the request and a mutable response sink. Decorators
//! hold their inner handler as a [`BoxedHandler`] and call it explicitly:
//!
//! ```text
//! Logging ──handle(req, capture)──▶ Siphon ──handle(req, capture)──▶ Template
//!   │ wraps the sink                  │ may redirect instead           │ writes the page
//!   └ logs the captured status        └ of delegating
//! ```
//!
//! The composition root owns the outermost handler; each decorator owns the
//! next one through an `Arc`, so a chain is a tree with no cycles. The server
//! clones one `Arc` per request, which costs an atomic increment.

use std::sync::Arc;

use crate::request::Request;
use crate::response::ResponseSink;

/// Handles one request by writing into `res`.
///
/// There is no error return: every failure is turned into an HTTP response
/// by the handler itself.
///
/// Plain functions and closures with the right signature are handlers too:
///
/// ```rust
/// use http::StatusCode;
/// use xhttp::{Handler, Request, ResponseSink};
///
/// fn teapot(_req: &Request, res: &mut dyn ResponseSink) {
///     res.write_status(StatusCode::IM_A_TEAPOT);
/// }
///
/// fn assert_handler(_: impl Handler) {}
/// assert_handler(teapot);
/// ```
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, req: &Request, res: &mut dyn ResponseSink);
}

/// A heap-allocated, type-erased handler shared across concurrent requests.
pub type BoxedHandler = Arc<dyn Handler>;

/// Implement `Handler` for any function with the right signature.
impl<F> Handler for F
where
    F: Fn(&Request, &mut dyn ResponseSink) + Send + Sync + 'static,
{
    fn handle(&self, req: &Request, res: &mut dyn ResponseSink) {
        self(req, res)
    }
}

/// Erases `handler` into a shareable [`BoxedHandler`].
pub fn boxed(handler: impl Handler) -> BoxedHandler {
    Arc::new(handler)
}
