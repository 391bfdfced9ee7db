//! Unified error types.

use std::io;

/// The error type returned by [`Server::serve`](crate::Server::serve).
///
/// Application-level failures (404, 500, redirects) are expressed as HTTP
/// responses written by handlers, not as `Error`s. This type surfaces
/// infrastructure failures: parsing the bind address or binding the port.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("invalid socket address `{0}`")]
    InvalidAddress(String),
}

/// Failure while loading or running a template for a
/// [`Template`](crate::Template) handler.
///
/// Never crosses the handler interface: the handler logs it and turns it into
/// a 500 or a redirect.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("reading template {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("parsing template {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("executing template {name}: {source}")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}
