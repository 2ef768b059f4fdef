#![forbid(unsafe_code)]

//! Scanning the step list for the next reachable step.
//!
//! [`StepSequencer`] is a borrowed view over a tour's steps and defaults. It
//! never mutates anything; the controller builds one per query.
//!
//! # Invariants
//!
//! 1. Scans are monotonic: `next` only inspects indices above the start,
//!    `previous` only indices below it, nearest first.
//! 2. Every candidate is normalized before it is tested, so defaults (e.g. a
//!    default `orphan` or `delay`) take part in reachability.
//! 3. Leaving the bounds yields `None`: the tour has no step in that
//!    direction.

use crate::host::AnchorResolver;
use crate::step::{StepDefaults, StepDescriptor, StepSpec, normalize};
use crate::visibility::is_potentially_visible;

/// Borrowed view used to look up and scan steps.
pub struct StepSequencer<'a, R: AnchorResolver + ?Sized> {
    steps: &'a [StepSpec],
    defaults: &'a StepDefaults,
    anchors: &'a R,
}

impl<'a, R: AnchorResolver + ?Sized> StepSequencer<'a, R> {
    pub fn new(steps: &'a [StepSpec], defaults: &'a StepDefaults, anchors: &'a R) -> Self {
        Self {
            steps,
            defaults,
            anchors,
        }
    }

    /// Number of configured steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Resolved descriptor for step `index`, tagged with its number.
    pub fn step(&self, index: usize) -> Option<StepDescriptor> {
        self.steps
            .get(index)
            .map(|spec| normalize(self.defaults, spec).with_step_number(index))
    }

    /// Whether step `index` exists and is potentially visible.
    pub fn is_reachable(&self, index: usize) -> bool {
        is_potentially_visible(self.step(index).as_ref(), self.anchors)
    }

    /// First reachable step after `from`. `None` as the start scans from 0.
    pub fn next(&self, from: Option<usize>) -> Option<usize> {
        let start = from.map_or(0, |i| i.saturating_add(1));
        let found = (start..self.steps.len()).find(|&i| self.is_reachable(i));
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "wayfinder.sequence", ?from, ?found, "scan forward");
        found
    }

    /// First reachable step before `from`. `None` as the start has no
    /// predecessor.
    pub fn previous(&self, from: Option<usize>) -> Option<usize> {
        let from = from?;
        let end = from.min(self.steps.len());
        let found = (0..end).rev().find(|&i| self.is_reachable(i));
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "wayfinder.sequence", from, ?found, "scan backward");
        found
    }

    /// No reachable step precedes `index`.
    pub fn is_first_step(&self, index: Option<usize>) -> bool {
        self.previous(index).is_none()
    }

    /// No reachable step follows `index`.
    pub fn is_last_step(&self, index: Option<usize>) -> bool {
        self.next(index).is_none()
    }

    /// First reachable step of the tour.
    pub fn first(&self) -> Option<usize> {
        self.next(None)
    }
}
