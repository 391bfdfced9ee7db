//! A one-page site: a template at `/`, a status page at `/status`, and the
//! "what?" page for everything else.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example site
//!
//! Try:
//!   curl -i http://localhost:3000/
//!   curl -i http://localhost:3000/index.html      # 302 to /
//!   curl -i http://localhost:3000/status
//!   curl -i http://localhost:3000/nope
//!   curl -i -H 'x-forwarded-for: 10.1.2.3' http://localhost:3000/

use http::StatusCode;
use minijinja::context;
use xhttp::middleware::{Logging, Siphon};
use xhttp::{Handler, NotFound, Request, ResponseSink, ResponseSinkExt, Server, Template, boxed};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let home = Template::new(concat!(env!("CARGO_MANIFEST_DIR"), "/demos/templates"), "index.html")
        .data(context! {
            title => "xhttp demo",
            links => vec![
                context! { href => "/status", text => "status" },
                context! { href => "/nope", text => "a page that does not exist" },
            ],
        })
        .debug(cfg!(debug_assertions));

    let home = boxed(Siphon::new("/", home));
    let status_page = Logging::new("status").handle_fn(status);
    let fallback = Logging::new("fallback").handler(NotFound);

    // No router: three exact paths are enough for a site this size.
    let app = Logging::new("www").handle_fn(move |req, res| {
        match req.path() {
            "/status" => status_page.handle(req, res),
            "/" | "/index.html" => home.handle(req, res),
            _ => fallback.handle(req, res),
        }
    });

    Server::bind("0.0.0.0:3000")
        .serve(app)
        .await
        .expect("server error");
}

fn status(_req: &Request, res: &mut dyn ResponseSink) {
    res.write_status(StatusCode::OK);
    res.write_str("ok\n");
}
