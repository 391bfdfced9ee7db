//! Incoming HTTP request type.

use bytes::Bytes;
use http::{HeaderMap, Method, Uri, Version};

/// An incoming HTTP request with its body fully buffered.
///
/// Build one from an [`http::Request<Bytes>`]:
///
/// ```rust
/// use bytes::Bytes;
/// use xhttp::Request;
///
/// let req = Request::from(http::Request::get("/about?lang=en").body(Bytes::new()).unwrap());
/// assert_eq!(req.path(), "/about");
/// assert_eq!(req.raw_uri(), "/about?lang=en");
/// ```
pub struct Request {
    method: Method,
    uri: Uri,
    raw_uri: String,
    headers: HeaderMap,
    body: Bytes,
}

impl Request {
    pub fn method(&self) -> &Method { &self.method }
    pub fn uri(&self) -> &Uri { &self.uri }
    pub fn path(&self) -> &str { self.uri.path() }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// The request-target as the client sent it, query string included.
    ///
    /// Origin form (`/path?query`) unless an HTTP/1.x request line carried an
    /// absolute URI. HTTP/2 requests always give the `:path` value, never the
    /// scheme and authority hyper folds into [`uri`](Self::uri).
    pub fn raw_uri(&self) -> &str { &self.raw_uri }

    /// Case-insensitive header lookup. Values that are not visible ASCII are
    /// treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl From<http::Request<Bytes>> for Request {
    fn from(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self {
            raw_uri: request_target(&parts.uri, parts.version),
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
        }
    }
}

fn request_target(uri: &Uri, version: Version) -> String {
    if uri.scheme().is_some() && version < Version::HTTP_2 {
        return uri.to_string();
    }
    uri.path_and_query().map_or("/", |pq| pq.as_str()).to_owned()
}
