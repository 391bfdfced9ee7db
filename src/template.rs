//! Template-rendering handler.
//!
//! Loads `root/name` from disk on every request and renders it with
//! [`minijinja`]. Nothing is cached, so edits to the file show up on the next
//! request.
//!
//! ```rust,no_run
//! use minijinja::context;
//! use xhttp::Template;
//!
//! let home = Template::new("site/templates", "index.html")
//!     .data(context! { title => "home" })
//!     .debug(cfg!(debug_assertions));
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use http::StatusCode;
use minijinja::{Environment, Value, context};
use serde::Serialize;
use tracing::debug;

use crate::error::TemplateError;
use crate::handler::Handler;
use crate::log::{SharedLogger, default_logger};
use crate::reply;
use crate::request::Request;
use crate::response::{ContentType, ResponseSink, ResponseSinkExt};

/// Where failed requests are sent when not in debug mode.
const FALLBACK_LOCATION: &str = "/";

/// Renders one template file per request.
///
/// On any failure the error is logged and the client gets either the error
/// text with a `500` (debug mode) or a `307` redirect to `/`.
pub struct Template {
    root: PathBuf,
    name: String,
    data: Value,
    debug: bool,
    logger: SharedLogger,
}

impl Template {
    pub fn new(root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            name: name.into(),
            data: context! {},
            debug: false,
            logger: default_logger(),
        }
    }

    /// The value the template is rendered against.
    pub fn data(mut self, data: impl Serialize) -> Self {
        self.data = Value::from_serialize(data);
        self
    }

    /// Expose failures to the client instead of redirecting.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    fn path(&self) -> PathBuf {
        self.root.join(&self.name)
    }

    fn render(&self) -> Result<String, TemplateError> {
        let source = read_source(&self.path(), &self.name)?;
        let env = Environment::new();
        let template = env
            .template_from_named_str(&self.name, &source)
            .map_err(|source| TemplateError::Parse { name: self.name.clone(), source })?;
        template
            .render(&self.data)
            .map_err(|source| TemplateError::Render { name: self.name.clone(), source })
    }

    fn fail(&self, req: &Request, res: &mut dyn ResponseSink, err: TemplateError) {
        self.logger.template_failure(req.path(), &err);
        if self.debug {
            reply::error(res, &err.to_string(), StatusCode::INTERNAL_SERVER_ERROR);
        } else {
            reply::redirect(res, req, FALLBACK_LOCATION, StatusCode::TEMPORARY_REDIRECT);
        }
    }
}

fn read_source(path: &Path, name: &str) -> Result<String, TemplateError> {
    fs::read_to_string(path).map_err(|source| TemplateError::Read { name: name.to_owned(), source })
}

impl Handler for Template {
    fn handle(&self, req: &Request, res: &mut dyn ResponseSink) {
        debug!(path = req.path(), uri = req.raw_uri(), template = %self.name, "rendering template");

        // Rendered into memory first: once the 200 is written there is no way
        // back to an error status.
        match self.render() {
            Ok(page) => {
                res.set_content_type(ContentType::Html);
                res.write_status(StatusCode::OK);
                res.write_str(&page);
            }
            Err(err) => self.fail(req, res, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::log::testing::MemoryLogger;
    use crate::response::BufferedResponse;

    fn get(uri: &str) -> Request {
        Request::from(http::Request::get(uri).body(Bytes::new()).unwrap())
    }

    fn write_template(dir: &Path, name: &str, source: &str) {
        fs::write(dir.join(name), source).unwrap();
    }

    fn serve(template: &Template, uri: &str) -> BufferedResponse {
        let mut res = BufferedResponse::new();
        template.handle(&get(uri), &mut res);
        res
    }

    #[test]
    fn renders_with_data() {
        let dir = tempfile::tempdir().unwrap();
        write_template(dir.path(), "hello.html", "<h1>hi {{ who }}</h1>");

        let template = Template::new(dir.path(), "hello.html").data(context! { who => "ana" });
        let res = serve(&template, "/hello");

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"));
        assert_eq!(res.body_text(), "<h1>hi ana</h1>");
    }

    #[test]
    fn html_templates_escape_data() {
        let dir = tempfile::tempdir().unwrap();
        write_template(dir.path(), "x.html", "{{ v }}");

        let template = Template::new(dir.path(), "x.html").data(context! { v => "<b>" });
        assert_eq!(serve(&template, "/").body_text(), "&lt;b&gt;");
    }

    #[test]
    fn picks_up_edits_between_requests() {
        let dir = tempfile::tempdir().unwrap();
        write_template(dir.path(), "page.html", "one");
        let template = Template::new(dir.path(), "page.html");
        assert_eq!(serve(&template, "/").body_text(), "one");

        write_template(dir.path(), "page.html", "two");
        assert_eq!(serve(&template, "/").body_text(), "two");
    }

    #[test]
    fn missing_file_redirects_home() {
        let dir = tempfile::tempdir().unwrap();
        let logger = MemoryLogger::shared();
        let template = Template::new(dir.path(), "nope.html").logger(logger.clone());

        let res = serve(&template, "/nope");

        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(res.header("location"), Some("/"));
        let lines = logger.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("/nope -> reading template nope.html"), "{lines:?}");
    }

    #[test]
    fn missing_file_in_debug_mode_shows_error() {
        let dir = tempfile::tempdir().unwrap();
        let template = Template::new(dir.path(), "nope.html")
            .debug(true)
            .logger(MemoryLogger::shared());

        let res = serve(&template, "/nope");

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.header("location"), None);
        assert!(res.body_text().contains("reading template nope.html"));
    }

    #[test]
    fn syntax_error_is_a_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        write_template(dir.path(), "broken.html", "{% if %}");
        let template = Template::new(dir.path(), "broken.html")
            .debug(true)
            .logger(MemoryLogger::shared());

        let res = serve(&template, "/");

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(res.body_text().starts_with("parsing template broken.html"));
    }

    #[test]
    fn execution_failure_redirects_without_partial_page() {
        let dir = tempfile::tempdir().unwrap();
        write_template(dir.path(), "call.html", "before {{ no_such_function() }} after");
        let logger = MemoryLogger::shared();
        let template = Template::new(dir.path(), "call.html").logger(logger.clone());

        let res = serve(&template, "/call");

        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert!(!res.body_text().contains("before"));
        assert!(logger.lines()[0].contains("executing template call.html"));
    }

    #[test]
    fn execution_failure_in_debug_mode_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        write_template(dir.path(), "call.html", "{{ no_such_function() }}");
        let template = Template::new(dir.path(), "call.html")
            .debug(true)
            .logger(MemoryLogger::shared());

        let res = serve(&template, "/");

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(res.body_text().starts_with("executing template call.html"));
    }
}
