//! # xhttp
//!
//! Small HTTP handler decorators for sites behind a reverse proxy.
//!
//! Every piece implements one interface, [`Handler`], which writes into a
//! [`ResponseSink`]. Pieces compose by nesting:
//!
//! - [`Template`] — renders a template file from disk on every request
//! - [`NotFound`] — the 404 "what?" page
//! - [`middleware::Logging`] — one access-log line per request, with the
//!   status the inner handler really wrote (via [`capture`])
//! - [`middleware::Siphon`] — redirects everything but one canonical URI
//!
//! [`Server`] hosts a single root handler on hyper. TLS, routing and body
//! limits belong to the proxy in front.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use minijinja::context;
//! use xhttp::middleware::{Logging, Siphon};
//! use xhttp::{Server, Template};
//!
//! #[tokio::main]
//! async fn main() {
//!     let home = Template::new("templates", "index.html").data(context! { title => "home" });
//!     let app = Logging::new("www").handler(Siphon::new("/", home));
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//! ```

mod error;
mod handler;
mod not_found;
mod request;
mod response;
mod server;
mod template;

pub mod capture;
pub mod log;
pub mod middleware;
pub mod reply;

pub use error::{Error, TemplateError};
pub use handler::{BoxedHandler, Handler, boxed};
pub use not_found::NotFound;
pub use request::Request;
pub use response::{BufferedResponse, ContentType, ResponseSink, ResponseSinkExt};
pub use server::Server;
pub use template::Template;
