#![forbid(unsafe_code)]

//! Runtime: the tour controller and everything it drives.
//!
//! # Role in Wayfinder
//! `wayfinder-runtime` owns the tour state machine ([`TourController`]). It
//! applies a [`TourConfiguration`], walks the steps with the sequencer from
//! `wayfinder-core`, renders each step through a [`StepRenderer`] and the
//! [`RenderContext`] hooks, positions it with `wayfinder-placement`, and
//! records completion through a [`CompletionOracle`](wayfinder_core::host::CompletionOracle).
//!
//! # Logging
//! All transitions are traced under the `wayfinder.tour` target; completion
//! stores log under `wayfinder.completion`.

pub mod completion;
pub mod config;
pub mod controller;
pub mod error;
pub mod listeners;
pub mod renderer;

pub use completion::MemoryCompletion;
#[cfg(feature = "state-persistence")]
pub use completion::FileCompletionStore;
pub use config::TourConfiguration;
pub use controller::TourController;
pub use error::{ConfigError, RenderError, Result, TourError};
pub use listeners::StepListeners;
pub use renderer::{RenderContext, StepRenderer, TemplateRenderer};
