#![forbid(unsafe_code)]

//! Contracts the embedding environment implements.
//!
//! The engine never touches a page directly. Everything environment-specific
//! (selector lookup, geometry reads, inserting markup, binding click handlers
//! and timers, persisting completion) is reached through the traits here.
//!
//! # Re-entry
//!
//! Bindings created with [`TourHost::bind`] fire *later*, from the host's own
//! event loop. When one fires the host calls back into the controller's public
//! API (typically `dispatch(action)`). Every binding is registered as a step
//! listener and detached synchronously when the shown step changes, so a
//! stale callback can never observe a step that is no longer current.

use std::fmt;
use std::time::Duration;

use crate::geometry::{Offset, Rect, Size, Viewport};
use crate::step::{Placement, StepDescriptor};

// ---------------------------------------------------------------------------
// Anchors
// ---------------------------------------------------------------------------

/// What kind of element an anchor is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorKind {
    /// A regular element with a reliable bounding box.
    Element,
    /// The document root/body. Its bounding box is unreliable, so placement
    /// uses the viewport instead.
    DocumentRoot,
}

/// A resolved anchor element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    /// Bounding box in document coordinates.
    pub rect: Rect,
    pub kind: AnchorKind,
}

impl Anchor {
    /// A regular element anchor.
    pub const fn element(rect: Rect) -> Self {
        Self {
            rect,
            kind: AnchorKind::Element,
        }
    }

    /// The document root.
    pub const fn document_root() -> Self {
        Self {
            rect: Rect::new(0.0, 0.0, 0.0, 0.0),
            kind: AnchorKind::DocumentRoot,
        }
    }

    pub const fn is_document_root(&self) -> bool {
        matches!(self.kind, AnchorKind::DocumentRoot)
    }
}

/// Resolves selectors to anchors and reports the viewport.
pub trait AnchorResolver {
    /// All elements matching `selector`, in document order.
    fn resolve(&self, selector: &str) -> Vec<Anchor>;

    /// Current scroll position and size of the visible window.
    fn viewport(&self) -> Viewport;

    /// Whether `selector` matches at least one element.
    fn has_match(&self, selector: &str) -> bool {
        !self.resolve(selector).is_empty()
    }
}

impl<T: AnchorResolver + ?Sized> AnchorResolver for &T {
    fn resolve(&self, selector: &str) -> Vec<Anchor> {
        (**self).resolve(selector)
    }

    fn viewport(&self) -> Viewport {
        (**self).viewport()
    }

    fn has_match(&self, selector: &str) -> bool {
        (**self).has_match(selector)
    }
}

impl<T: AnchorResolver + ?Sized> AnchorResolver for Box<T> {
    fn resolve(&self, selector: &str) -> Vec<Anchor> {
        (**self).resolve(selector)
    }

    fn viewport(&self) -> Viewport {
        (**self).viewport()
    }

    fn has_match(&self, selector: &str) -> bool {
        (**self).has_match(selector)
    }
}

// ---------------------------------------------------------------------------
// Step nodes
// ---------------------------------------------------------------------------

/// Which CSS margin to read from a tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginEdge {
    Top,
    Left,
}

/// A box that can be measured and moved: the tooltip being placed.
pub trait TipSurface {
    /// Rendered size right now. Measured again after every move.
    fn measure(&self) -> Size;

    /// Raw computed CSS margin, e.g. `"12px"`. `None` when unavailable.
    fn margin(&self, _edge: MarginEdge) -> Option<String> {
        None
    }

    /// Move the tip to `offset` (document coordinates, whole pixels).
    fn apply_offset(&mut self, offset: Offset);
}

/// An inserted step: the live positioning resource of the shown step.
pub trait StepNode: TipSurface {
    /// Remove the step from view. Called once, right before the node is released.
    fn hide(&mut self);
}

/// Structured content handed to the host for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct StepMarkup {
    pub step_number: usize,
    /// Template markup, if the tour configured one.
    pub template: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub placement: Placement,
    /// The "previous" control is disabled (first reachable step).
    pub previous_disabled: bool,
    /// The "next" control is disabled (last reachable step).
    pub next_disabled: bool,
    /// Reveal the node only after this long. The host owns the timer.
    pub delay: Option<Duration>,
}

// ---------------------------------------------------------------------------
// Listeners
// ---------------------------------------------------------------------------

/// What the host should do when a binding fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepAction {
    Next,
    Previous,
    End,
}

impl StepAction {
    /// Role name of the matching control in step markup.
    pub const fn role(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Previous => "previous",
            Self::End => "end",
        }
    }
}

/// When a binding fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// A control inside the step node with the given role is clicked.
    Role(StepAction),
    /// The anchor element matching the selector is clicked.
    TargetClick(String),
    /// A timer elapses.
    After(Duration),
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Role(action) => write!(f, "role:{}", action.role()),
            Self::TargetClick(selector) => write!(f, "click:{selector}"),
            Self::After(delay) => write!(f, "after:{}ms", delay.as_millis()),
        }
    }
}

/// An attached subscription (click handler, timer, ...).
pub trait StepListener {
    /// Stop delivering callbacks. Called exactly once.
    fn detach(&mut self);
}

struct FnListener<F: FnMut()> {
    on_detach: Option<F>,
}

impl<F: FnMut()> StepListener for FnListener<F> {
    fn detach(&mut self) {
        if let Some(mut f) = self.on_detach.take() {
            f();
        }
    }
}

/// Wrap a closure run on detach as a listener.
pub fn listener_from_fn<F>(on_detach: F) -> Box<dyn StepListener>
where
    F: FnMut() + 'static,
{
    Box::new(FnListener {
        on_detach: Some(on_detach),
    })
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

/// The embedding environment.
pub trait TourHost: AnchorResolver {
    /// Insert a step into the page, after `after` when given.
    fn insert_step(&mut self, markup: &StepMarkup, after: Option<&Anchor>) -> Box<dyn StepNode>;

    /// Register a binding. The returned listener cancels it.
    fn bind(&mut self, trigger: &Trigger, action: StepAction) -> Box<dyn StepListener>;

    /// Scroll the document so that `top` is the first visible row.
    fn scroll_to(&mut self, _top: f64) {}

    /// Announce the step to assistive technology.
    fn announce(&mut self, _step: &StepDescriptor) {}
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Tracks whether the user has finished a tour.
pub trait CompletionOracle {
    fn is_marked_complete(&self) -> bool;
    fn mark_complete(&mut self);
    fn clear_completion_flag(&mut self);
}
