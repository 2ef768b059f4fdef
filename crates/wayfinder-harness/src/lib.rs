#![forbid(unsafe_code)]

//! Deterministic test doubles for Wayfinder.
//!
//! - [`CallJournal`]: a shared, ordered log of collaborator calls. Hand the
//!   same journal to the host, the completion oracle and event handlers to
//!   assert on cross-component ordering.
//! - [`FakeHost`]: a scripted page. Anchors, viewport and tip size are set up
//!   front and may change while a tour runs; inserted nodes, bindings,
//!   scrolls and announcements are recorded.
//! - [`RecordingCompletion`]: an in-memory completion flag that journals
//!   every mutation.
//!
//! All three are cheap `Clone` handles over shared state: keep a clone in the
//! test and move the other into the controller.
//!
//! ```
//! use wayfinder_harness::{CallJournal, FakeHost, RecordingCompletion};
//! use wayfinder_core::geometry::Rect;
//!
//! let journal = CallJournal::new();
//! let host = FakeHost::new(&journal).with_anchor("#a", Rect::new(10.0, 10.0, 100.0, 20.0));
//! let completion = RecordingCompletion::new(&journal);
//! assert!(wayfinder_core::host::AnchorResolver::has_match(&host, "#a"));
//! assert!(!wayfinder_core::host::CompletionOracle::is_marked_complete(&completion));
//! ```

mod journal;
mod page;

pub use journal::{CallJournal, recorder};
pub use page::{FakeHost, FakeNode, RecordingCompletion};
