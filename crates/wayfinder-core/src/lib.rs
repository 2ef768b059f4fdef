#![forbid(unsafe_code)]

//! Core: step model, sequencing, visibility, and lifecycle events.
//!
//! # Role in Wayfinder
//! `wayfinder-core` is the data layer of the tour engine. It owns the step
//! model and its normalization, decides which steps are reachable, scans the
//! step list for the next reachable step, and dispatches lifecycle events.
//!
//! # Primary responsibilities
//! - **Step model**: [`step::StepSpec`], [`step::StepDefaults`] and the
//!   resolved [`step::StepDescriptor`].
//! - **Visibility**: [`visibility::is_potentially_visible`].
//! - **Sequencing**: [`sequence::StepSequencer`].
//! - **Events**: [`event::EventBus`] and the reserved [`event::LifecycleEvent`] names.
//! - **Host contracts**: the traits an embedding environment implements
//!   ([`host::AnchorResolver`], [`host::TourHost`], [`host::StepNode`], ...).
//!
//! # How it fits in the system
//! `wayfinder-placement` consumes the geometry types defined here, and
//! `wayfinder-runtime` drives everything through its `TourController`. Nothing
//! in this crate touches a real page; all environment access goes through the
//! host traits.

pub mod event;
pub mod geometry;
pub mod host;
pub mod logging;
pub mod sequence;
pub mod step;
pub mod visibility;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
