//! Decorator handlers.
//!
//! Each decorator owns an inner handler, does its own work before or after
//! delegating, and is itself a [`Handler`](crate::Handler), so decorators
//! stack by plain nesting:
//!
//! ```rust
//! use xhttp::middleware::{Logging, Siphon};
//! use xhttp::NotFound;
//!
//! let app = Logging::new("front").handler(Siphon::new("/", NotFound));
//! ```
//!
//! - [`Logging`] — one access-log line per request, with the final status
//! - [`Siphon`] — redirects everything except one canonical URI

mod logging;
mod siphon;

pub use logging::Logging;
pub use siphon::Siphon;
