//! The logging collaborator injected into decorators.
//!
//! Decorators never log through a global. Each one holds a [`SharedLogger`]
//! handed to it at construction; the default, [`TracingLogger`], forwards to
//! `tracing`, so whatever subscriber the binary installs receives the events.

use std::fmt;
use std::sync::Arc;

use http::StatusCode;
use tracing::{error, info};

use crate::error::TemplateError;

/// One line of access log, emitted by [`Logging`](crate::middleware::Logging)
/// after the inner handler has finished.
#[derive(Debug)]
pub struct AccessRecord<'a> {
    pub label: &'a str,
    pub forwarded_for: &'a str,
    /// The request target, see [`Request::raw_uri`](crate::Request::raw_uri).
    pub url: &'a str,
    pub status: StatusCode,
}

/// `{label}> @{forwarded_for} -> {url} ({status})`
///
/// The `>` after the label is written even when the label is empty, so every
/// line splits the same way.
impl fmt::Display for AccessRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}> @{} -> {} ({})",
            self.label,
            self.forwarded_for,
            self.url,
            self.status.as_u16()
        )
    }
}

/// Receives the events the built-in handlers produce.
pub trait Logger: Send + Sync + 'static {
    fn access(&self, record: &AccessRecord<'_>);

    /// A template could not be loaded or rendered while serving `path`.
    fn template_failure(&self, path: &str, err: &TemplateError);
}

pub type SharedLogger = Arc<dyn Logger>;

/// Forwards every event to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn access(&self, record: &AccessRecord<'_>) {
        info!(
            label = record.label,
            forwarded_for = record.forwarded_for,
            url = record.url,
            status = record.status.as_u16(),
            "{record}"
        );
    }

    fn template_failure(&self, path: &str, err: &TemplateError) {
        error!(path, "{path} -> {err}");
    }
}

pub(crate) fn default_logger() -> SharedLogger {
    Arc::new(TracingLogger)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Keeps every formatted event in memory.
    #[derive(Default)]
    pub(crate) struct MemoryLogger {
        lines: Mutex<Vec<String>>,
    }

    impl MemoryLogger {
        pub(crate) fn shared() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub(crate) fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl Logger for MemoryLogger {
        fn access(&self, record: &AccessRecord<'_>) {
            self.lines.lock().unwrap().push(record.to_string());
        }

        fn template_failure(&self, path: &str, err: &TemplateError) {
            self.lines.lock().unwrap().push(format!("{path} -> {err}"));
        }
    }
}
