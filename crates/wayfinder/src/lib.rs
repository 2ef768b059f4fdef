#![forbid(unsafe_code)]

//! Wayfinder public facade crate.
//!
//! Guided product tours over a host page: an ordered list of steps, each
//! anchored to an element and shown as a positioned tip, with lifecycle
//! events and completion tracking. This crate re-exports the types an
//! embedder needs from the internal crates and offers a prelude.
//!
//! ```
//! use wayfinder::prelude::*;
//!
//! let config = TourConfiguration::from_json_str(
//!     r##"{ "tourName": "intro", "steps": [{ "target": "#search", "title": "Search" }] }"##,
//! )
//! .unwrap();
//! assert!(config.validate().is_empty());
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use wayfinder_core::event::{EventBus, EventData, EventHandler, HandlerError, LifecycleEvent};
pub use wayfinder_core::geometry::{Offset, Rect, Size, Viewport};
pub use wayfinder_core::host::{
    Anchor, AnchorResolver, CompletionOracle, MarginEdge, StepAction, StepListener, StepMarkup,
    StepNode, TipSurface, TourHost, Trigger, listener_from_fn,
};
pub use wayfinder_core::sequence::StepSequencer;
pub use wayfinder_core::step::{Placement, StepDefaults, StepDescriptor, StepSpec};

// --- Placement re-exports --------------------------------------------------

pub use wayfinder_placement::PlacementEngine;

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "state-persistence")]
pub use wayfinder_runtime::FileCompletionStore;
pub use wayfinder_runtime::{
    ConfigError, MemoryCompletion, RenderContext, RenderError, StepRenderer, TemplateRenderer,
    TourConfiguration, TourController, TourError,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Wayfinder embedders.
#[derive(Debug)]
pub enum Error {
    /// A tour transition failed.
    Tour(TourError),
    /// Configuration could not be loaded or is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tour(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tour(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<TourError> for Error {
    fn from(err: TourError) -> Self {
        Self::Tour(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for Wayfinder embedders.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Anchor, AnchorResolver, CompletionOracle, Error, EventData, HandlerError, LifecycleEvent,
        MemoryCompletion, Placement, Rect, Result, StepAction, StepSpec, TourConfiguration,
        TourController, TourHost, Trigger, Viewport,
    };

    pub use crate::{core, placement, runtime};
}

pub use wayfinder_core as core;
pub use wayfinder_placement as placement;
pub use wayfinder_runtime as runtime;
