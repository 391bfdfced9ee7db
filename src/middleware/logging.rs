use std::sync::Arc;

use crate::capture;
use crate::handler::{BoxedHandler, Handler};
use crate::log::{AccessRecord, SharedLogger, default_logger};
use crate::reply;
use crate::request::Request;
use crate::response::ResponseSink;

type HandleFn = Box<dyn Fn(&Request, &mut dyn ResponseSink) + Send + Sync>;

/// Logs one access record per request after delegating.
///
/// Delegates to the inner handler if one is set, else to the handler function,
/// else replies `404 page not found`. The sink is wrapped in a
/// [status capture](crate::capture) first, so the record carries the status
/// the delegate actually wrote.
pub struct Logging {
    label: String,
    handler: Option<BoxedHandler>,
    handle_fn: Option<HandleFn>,
    logger: SharedLogger,
}

impl Logging {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            handler: None,
            handle_fn: None,
            logger: default_logger(),
        }
    }

    pub fn handler(mut self, handler: impl Handler) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Like [`handler`](Self::handler), for an inner handler that is already
    /// shared elsewhere.
    pub fn shared(mut self, handler: BoxedHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Fallback used only when no inner handler is set.
    pub fn handle_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&Request, &mut dyn ResponseSink) + Send + Sync + 'static,
    {
        self.handle_fn = Some(Box::new(f));
        self
    }

    pub fn logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }
}

impl Handler for Logging {
    fn handle(&self, req: &Request, res: &mut dyn ResponseSink) {
        let mut res = capture::wrap(res);

        if let Some(handler) = &self.handler {
            handler.handle(req, &mut res);
        } else if let Some(f) = &self.handle_fn {
            f(req, &mut res);
        } else {
            reply::not_found(&mut res);
        }

        self.logger.access(&AccessRecord {
            label: &self.label,
            forwarded_for: req.header("x-forwarded-for").unwrap_or_default(),
            url: req.raw_uri(),
            status: res.status_code(),
        });
    }
}
