#![forbid(unsafe_code)]

//! Error model for the tour runtime.
//!
//! Failures fall into three groups:
//!
//! - **Recoverable without an error**: malformed configuration values fall
//!   back to defaults, navigation past either end ends the tour, and an
//!   unresolvable anchor skips placement. None of these surface here.
//! - **Propagated**: a user event handler or a custom renderer failed. The
//!   transition stops where it failed and [`TourError`] is returned.
//! - **Loading**: reading a configuration file failed ([`ConfigError`]).

use std::fmt;

use wayfinder_core::event::HandlerError;

// ── Renderer ────────────────────────────────────────────────────────────

/// A renderer could not show a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderError {
    message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "render failed: {}", self.message)
    }
}

impl std::error::Error for RenderError {}

// ── Controller ──────────────────────────────────────────────────────────

/// A tour transition failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TourError {
    /// A registered event handler returned an error.
    Handler {
        /// Event being fired.
        event: String,
        source: HandlerError,
    },
    /// The renderer failed.
    Render(RenderError),
}

/// Result type for tour transitions.
pub type Result<T> = std::result::Result<T, TourError>;

impl TourError {
    /// Wrap a handler failure for `event`.
    pub fn handler(event: impl Into<String>, source: HandlerError) -> Self {
        Self::Handler {
            event: event.into(),
            source,
        }
    }

    /// Error type label for tracing.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Handler { .. } => "handler",
            Self::Render(_) => "render",
        }
    }
}

impl fmt::Display for TourError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handler { event, source } => write!(f, "{event}: {source}"),
            Self::Render(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for TourError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Handler { source, .. } => Some(source),
            Self::Render(err) => Some(err),
        }
    }
}

impl From<RenderError> for TourError {
    fn from(err: RenderError) -> Self {
        Self::Render(err)
    }
}

// ── Configuration ───────────────────────────────────────────────────────

/// Errors that can occur when loading a tour configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// TOML parse error.
    #[cfg(feature = "config-files")]
    Toml(toml::de::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}
