//! Canned replies shared by the built-in handlers.

use http::header::{HeaderValue, LOCATION};
use http::{Method, StatusCode};

use crate::request::Request;
use crate::response::{ContentType, ResponseSink, ResponseSinkExt};

/// Replies with `status` and `message` as a plain-text body.
///
/// The message is followed by a newline.
pub fn error(res: &mut dyn ResponseSink, message: &str, status: StatusCode) {
    res.set_content_type(ContentType::Text);
    res.set_header(
        http::header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    res.write_status(status);
    res.write_str(message);
    res.write_str("\n");
}

/// Replies `404 page not found`.
pub fn not_found(res: &mut dyn ResponseSink) {
    error(res, "404 page not found", StatusCode::NOT_FOUND);
}

/// Replies with a redirect to `target`.
///
/// A relative `target` (no leading `/`, no scheme) is resolved against the
/// directory of the request path. `GET` requests get a short HTML body
/// linking to the new location.
pub fn redirect(res: &mut dyn ResponseSink, req: &Request, target: &str, status: StatusCode) {
    let location = resolve_location(req.path(), target);
    let value = match HeaderValue::try_from(location.as_str()) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(location = %location, "redirect target is not a valid header value: {e}");
            error(res, "invalid redirect target", StatusCode::INTERNAL_SERVER_ERROR);
            return;
        }
    };

    res.set_header(LOCATION, value);
    let method = req.method();
    if *method == Method::GET || *method == Method::HEAD {
        res.set_content_type(ContentType::Html);
    }
    res.write_status(status);

    if *method == Method::GET {
        let reason = status.canonical_reason().unwrap_or("Redirect");
        res.write_str(&format!("<a href=\"{}\">{reason}</a>.\n", escape_html(&location)));
    }
}

/// Escapes the five characters that matter inside HTML text and attributes.
pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn resolve_location(request_path: &str, target: &str) -> String {
    if target.starts_with('/') || target.contains("://") {
        return target.to_owned();
    }
    let dir = match request_path.rfind('/') {
        Some(i) => &request_path[..=i],
        None => "/",
    };
    format!("{dir}{target}")
}
