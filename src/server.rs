//! HTTP server and graceful shutdown.
//!
//! The server hosts exactly one root [`Handler`]; routing, if any, is the
//! handler's business. Each request is:
//!
//! 1. read in full (bodies are small; the proxy in front enforces limits),
//! 2. handed to the root handler together with a fresh [`BufferedResponse`]
//!    on tokio's blocking pool, since handlers may read templates from disk,
//! 3. sent back as whatever the buffer holds when the handler returns.
//!
//! # Graceful shutdown
//!
//! On SIGTERM or Ctrl-C the server stops accepting, lets every in-flight
//! connection finish, then returns from [`Server::serve`].

use std::convert::Infallible;
use std::net::SocketAddr;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::{BufferedResponse, ResponseSink};

/// The HTTP server.
pub struct Server {
    addr: String,
}

impl Server {
    /// Configures the server to bind to `addr` (`host:port`) when
    /// [`serve`](Server::serve) is called.
    ///
    /// ```rust,no_run
    /// use xhttp::Server;
    /// let server = Server::bind("0.0.0.0:3000");
    /// ```
    pub fn bind(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    /// Starts accepting connections and dispatching every request to
    /// `handler`.
    ///
    /// Returns only after a full graceful shutdown, or with an error if the
    /// address is invalid or cannot be bound.
    pub async fn serve(self, handler: impl Handler) -> Result<(), Error> {
        let addr: SocketAddr = self
            .addr
            .parse()
            .map_err(|_| Error::InvalidAddress(self.addr.clone()))?;
        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "xhttp listening");

        run(listener, std::sync::Arc::new(handler), shutdown_signal()).await;

        info!("xhttp stopped");
        Ok(())
    }
}

/// Accept loop: serves connections from `listener` until `shutdown` resolves,
/// then waits for in-flight connections to finish.
async fn run(listener: TcpListener, handler: BoxedHandler, shutdown: impl Future<Output = ()>) {
    let mut tasks = tokio::task::JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            // shutdown first, so a queued backlog cannot delay it
            biased;

            () = &mut shutdown => {
                info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                break;
            }

            res = listener.accept() => {
                let (stream, remote_addr) = match res {
                    Ok(v) => v,
                    Err(e) => {
                        error!("accept error: {e}");
                        continue;
                    }
                };

                let handler = BoxedHandler::clone(&handler);
                let io = TokioIo::new(stream);

                tasks.spawn(async move {
                    let svc = service_fn(move |req| dispatch(BoxedHandler::clone(&handler), req));

                    if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                        .serve_connection(io, svc)
                        .await
                    {
                        error!(peer = %remote_addr, "connection error: {e}");
                    }
                });
            }

            Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
        }
    }

    while tasks.join_next().await.is_some() {}
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Collects the body, then runs the handler chain for one request.
///
/// Never fails towards hyper: unreadable bodies become `400`, a panicking
/// handler becomes `500`.
async fn dispatch(
    handler: BoxedHandler,
    req: hyper::Request<Incoming>,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(uri = %parts.uri, "failed to read request body: {e}");
            return Ok(status_only(StatusCode::BAD_REQUEST));
        }
    };

    Ok(respond(handler, http::Request::from_parts(parts, body)).await)
}

/// Runs `handler` against a buffered request and returns what it wrote.
pub(crate) async fn respond(
    handler: BoxedHandler,
    req: http::Request<Bytes>,
) -> http::Response<Full<Bytes>> {
    let req = Request::from(req);
    let outcome = tokio::task::spawn_blocking(move || {
        let mut res = BufferedResponse::new();
        handler.handle(&req, &mut res);
        res
    })
    .await;

    match outcome {
        Ok(res) => res.into_response(),
        Err(e) => {
            error!("handler failed: {e}");
            status_only(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn status_only(status: StatusCode) -> http::Response<Full<Bytes>> {
    let mut res = BufferedResponse::new();
    res.write_status(status);
    res.into_response()
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first SIGTERM or SIGINT the process receives.
///
/// If a handler cannot be installed, that signal is logged and ignored rather
/// than shutting the server down.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
