#![forbid(unsafe_code)]

//! Step reachability.
//!
//! A step is *potentially visible* when its precondition can eventually be
//! satisfied: it has a delay (the anchor may appear later), it is an orphan
//! (it needs no anchor), or its target resolves right now. Whether the anchor
//! is currently painted is deliberately not consulted.

use crate::host::{Anchor, AnchorResolver};
use crate::step::StepDescriptor;

/// Whether the sequencer may stop on `step`.
///
/// `None` (no such step) is never visible.
pub fn is_potentially_visible<R>(step: Option<&StepDescriptor>, anchors: &R) -> bool
where
    R: AnchorResolver + ?Sized,
{
    let Some(step) = step else {
        return false;
    };
    if step.delay_ms > 0 || step.orphan {
        return true;
    }
    step.target
        .as_deref()
        .is_some_and(|selector| anchors.has_match(selector))
}

/// The anchor a step is positioned against.
///
/// The first element matching the target; the document root for orphan steps
/// without a match; otherwise `None`, in which case placement is skipped.
pub fn step_anchor<R>(step: &StepDescriptor, anchors: &R) -> Option<Anchor>
where
    R: AnchorResolver + ?Sized,
{
    let resolved = step
        .target
        .as_deref()
        .and_then(|selector| anchors.resolve(selector).into_iter().next());
    match resolved {
        Some(anchor) => Some(anchor),
        None if step.orphan => Some(Anchor::document_root()),
        None => None,
    }
}
