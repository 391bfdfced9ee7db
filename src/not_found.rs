//! 404 fallback handler.

use http::StatusCode;

use crate::handler::Handler;
use crate::reply::escape_html;
use crate::request::Request;
use crate::response::{ContentType, ResponseSink, ResponseSinkExt};

/// Answers every request with a small HTML "what?" page naming the path that
/// was asked for.
#[derive(Clone, Copy, Debug, Default)]
pub struct NotFound;

impl Handler for NotFound {
    fn handle(&self, req: &Request, res: &mut dyn ResponseSink) {
        res.set_content_type(ContentType::Html);
        res.write_status(StatusCode::NOT_FOUND);
        res.write_str(&format!(
            "<html><head><title>what?</title></head><body>looking for <em>{}</em> ?</body>",
            escape_html(req.path())
        ));
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::response::BufferedResponse;

    #[test]
    fn names_the_missing_path() {
        let req = Request::from(http::Request::get("/missing").body(Bytes::new()).unwrap());
        let mut res = BufferedResponse::new();
        NotFound.handle(&req, &mut res);

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"));
        assert!(res.body_text().contains("<em>/missing</em>"));
    }

    #[test]
    fn escapes_markup_in_path() {
        let req = Request::from(http::Request::get("/it's").body(Bytes::new()).unwrap());
        let mut res = BufferedResponse::new();
        NotFound.handle(&req, &mut res);

        assert!(res.body_text().contains("<em>/it&#39;s</em>"));
    }
}
