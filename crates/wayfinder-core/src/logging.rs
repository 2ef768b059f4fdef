#![forbid(unsafe_code)]

//! Logging entry points.
//!
//! With the `tracing` feature the tracing macros are re-exported here (and at
//! the crate root) so downstream crates can log through `wayfinder_core`
//! without naming `tracing` directly. The `tracing-json` feature adds
//! [`init_json`], a one-call JSON subscriber for production hosts.
//!
//! All engine events use targets under `wayfinder.`:
//!
//! | target | emitted by |
//! |---|---|
//! | `wayfinder.tour` | controller transitions |
//! | `wayfinder.events` | event bus dispatch |
//! | `wayfinder.sequence` | step scanning |
//! | `wayfinder.placement` | tooltip positioning |
//! | `wayfinder.completion` | completion stores |

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Default filter used by [`init_json`] when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "wayfinder=info";

/// Install a global JSON subscriber filtered by `RUST_LOG`.
///
/// Falls back to [`DEFAULT_FILTER`]. Returns `false` if a global subscriber
/// was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
