use std::sync::Arc;

use http::StatusCode;

use crate::handler::{BoxedHandler, Handler};
use crate::reply;
use crate::request::Request;
use crate::response::ResponseSink;

/// Funnels all traffic through one canonical URI.
///
/// A request whose raw URI is exactly `target` reaches the inner handler.
/// Anything else, query strings included, gets a `302 Found` to `target`.
pub struct Siphon {
    target: String,
    inner: BoxedHandler,
}

impl Siphon {
    pub fn new(target: impl Into<String>, inner: impl Handler) -> Self {
        Self::shared(target, Arc::new(inner))
    }

    pub fn shared(target: impl Into<String>, inner: BoxedHandler) -> Self {
        Self { target: target.into(), inner }
    }
}

impl Handler for Siphon {
    fn handle(&self, req: &Request, res: &mut dyn ResponseSink) {
        if req.raw_uri() != self.target {
            reply::redirect(res, req, &self.target, StatusCode::FOUND);
            return;
        }
        self.inner.handle(req, res);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use bytes::Bytes;

    use super::*;
    use crate::response::{BufferedResponse, ResponseSinkExt};

    /// Counts invocations and answers with a fixed body.
    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl Handler for Counting {
        fn handle(&self, _req: &Request, res: &mut dyn ResponseSink) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            res.write_str("inner");
        }
    }

    fn run(siphon: &Siphon, uri: &str) -> BufferedResponse {
        let req = Request::from(http::Request::get(uri).body(Bytes::new()).unwrap());
        let mut res = BufferedResponse::new();
        siphon.handle(&req, &mut res);
        res
    }

    #[test]
    fn other_uris_are_redirected_to_target() {
        let inner = Arc::new(Counting::default());
        let siphon = Siphon::shared("/x", inner.clone());

        for uri in ["/", "/y", "/x/", "/x?utm=1"] {
            let res = run(&siphon, uri);
            assert_eq!(res.status(), StatusCode::FOUND, "{uri}");
            assert_eq!(res.header("location"), Some("/x"), "{uri}");
        }
        assert_eq!(inner.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn target_uri_reaches_inner_handler_once() {
        let inner = Arc::new(Counting::default());
        let siphon = Siphon::shared("/x", inner.clone());

        let res = run(&siphon, "/x");

        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.header("location"), None);
        assert_eq!(res.body_text(), "inner");
    }
}
