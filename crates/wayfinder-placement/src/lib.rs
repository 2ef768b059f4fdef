#![forbid(unsafe_code)]

//! Tooltip placement for Wayfinder tours.
//!
//! [`compute_offset`] is the pure placement table; [`PlacementEngine`] drives a
//! live [`TipSurface`](wayfinder_core::host::TipSurface) through measure,
//! move, re-measure and viewport correction.
//!
//! # Example
//!
//! ```
//! use wayfinder_core::geometry::{Offset, Rect};
//! use wayfinder_core::step::Placement;
//! use wayfinder_placement::compute_offset;
//!
//! let anchor = Rect::new(10.0, 10.0, 100.0, 20.0);
//! assert_eq!(
//!     compute_offset(Placement::Bottom, anchor, 50.0, 30.0),
//!     Offset::new(30.0, 35.0)
//! );
//! ```

pub mod engine;
pub mod offset;

pub use engine::PlacementEngine;
pub use offset::{anchor_box, compute_offset, parse_css_px, scroll_target, viewport_delta};
