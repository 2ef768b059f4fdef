#![forbid(unsafe_code)]

//! Rendering a step.
//!
//! The controller hands the resolved step to a [`StepRenderer`] together with
//! a [`RenderContext`]. The context is the renderer's only way to touch the
//! page: it inserts the step node (and positions it), registers bindings as
//! step listeners, scrolls and announces. Anything inserted or bound through
//! the context is owned by the controller and released on the next
//! transition.

use wayfinder_core::geometry::Offset;
use wayfinder_core::host::{Anchor, StepAction, StepMarkup, StepNode, TourHost, Trigger};
use wayfinder_core::step::StepDescriptor;
use wayfinder_core::visibility::step_anchor;
use wayfinder_placement::PlacementEngine;

use crate::error::RenderError;
use crate::listeners::StepListeners;

/// Renders one step through the hooks of a [`RenderContext`].
pub trait StepRenderer {
    fn render(
        &mut self,
        step: &StepDescriptor,
        cx: &mut RenderContext<'_>,
    ) -> Result<(), RenderError>;
}

impl<F> StepRenderer for F
where
    F: FnMut(&StepDescriptor, &mut RenderContext<'_>) -> Result<(), RenderError>,
{
    fn render(
        &mut self,
        step: &StepDescriptor,
        cx: &mut RenderContext<'_>,
    ) -> Result<(), RenderError> {
        self(step, cx)
    }
}

/// Hooks available while a step renders.
pub struct RenderContext<'a> {
    host: &'a mut dyn TourHost,
    listeners: &'a mut StepListeners,
    node: &'a mut Option<Box<dyn StepNode>>,
    placement: &'a PlacementEngine,
    template: Option<&'a str>,
    first: bool,
    last: bool,
    offset: Option<Offset>,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(
        host: &'a mut dyn TourHost,
        listeners: &'a mut StepListeners,
        node: &'a mut Option<Box<dyn StepNode>>,
        placement: &'a PlacementEngine,
        template: Option<&'a str>,
        first: bool,
        last: bool,
    ) -> Self {
        Self {
            host,
            listeners,
            node,
            placement,
            template,
            first,
            last,
            offset: None,
        }
    }

    /// No reachable step precedes the one being rendered.
    pub fn is_first_step(&self) -> bool {
        self.first
    }

    /// No reachable step follows the one being rendered.
    pub fn is_last_step(&self) -> bool {
        self.last
    }

    /// The tour's template markup, if configured.
    pub fn template(&self) -> Option<&str> {
        self.template
    }

    /// Markup for `step` with the navigation controls enabled or disabled.
    pub fn markup(&self, step: &StepDescriptor) -> StepMarkup {
        StepMarkup {
            step_number: step.step_number.unwrap_or_default(),
            template: self.template.map(str::to_owned),
            title: step.title.clone(),
            body: step.body.clone(),
            placement: step.placement,
            previous_disabled: self.first,
            next_disabled: self.last,
            delay: step.delay(),
        }
    }

    /// The anchor `step` is placed against.
    pub fn anchor(&self, step: &StepDescriptor) -> Option<Anchor> {
        step_anchor(step, &*self.host)
    }

    /// Insert the step node after its anchor and position it.
    ///
    /// Returns the applied offset; `None` when the step has no anchor and
    /// placement was skipped. Inserting again replaces the previous node.
    pub fn insert(&mut self, step: &StepDescriptor, markup: StepMarkup) -> Option<Offset> {
        if let Some(mut stale) = self.node.take() {
            stale.hide();
        }
        let anchor = self.anchor(step);
        let mut node = self.host.insert_step(&markup, anchor.as_ref());
        let viewport = self.host.viewport();
        self.offset = self
            .placement
            .position(step.placement, anchor.as_ref(), &viewport, &mut *node);
        *self.node = Some(node);
        self.offset
    }

    /// Register a binding for the shown step.
    pub fn bind(&mut self, trigger: Trigger, action: StepAction) {
        tracing::trace!(target: "wayfinder.tour", %trigger, action = action.role(), "bind");
        let listener = self.host.bind(&trigger, action);
        self.listeners.attach(listener);
    }

    /// Scroll so the positioned node sits in the middle of the viewport.
    ///
    /// Does nothing before [`insert`](Self::insert) positioned a node.
    pub fn scroll_into_view(&mut self) {
        let Some(offset) = self.offset else {
            return;
        };
        let viewport = self.host.viewport();
        let top = self.placement.scroll_target(offset.top, &viewport);
        self.host.scroll_to(top);
    }

    /// Announce the step to assistive technology.
    pub fn announce(&mut self, step: &StepDescriptor) {
        self.host.announce(step);
    }

    /// Offset applied by the last [`insert`](Self::insert).
    pub fn offset(&self) -> Option<Offset> {
        self.offset
    }
}

/// The built-in renderer.
///
/// Fills the template with the step's title and body, disables *previous* on
/// the first step and *next* on the last, inserts the node next to the
/// anchor, binds the navigation controls, advances on a target click when
/// `moveOnClick` is set and after `moveAfterTime` when it is non-zero, then
/// scrolls the step into view and announces it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

impl StepRenderer for TemplateRenderer {
    fn render(
        &mut self,
        step: &StepDescriptor,
        cx: &mut RenderContext<'_>,
    ) -> Result<(), RenderError> {
        let markup = cx.markup(step);
        cx.insert(step, markup);

        for action in [StepAction::Previous, StepAction::Next, StepAction::End] {
            cx.bind(Trigger::Role(action), action);
        }
        if let Some(target) = step.target.as_ref().filter(|_| step.move_on_click) {
            cx.bind(Trigger::TargetClick(target.clone()), StepAction::Next);
        }
        if let Some(after) = step.move_after() {
            cx.bind(Trigger::After(after), StepAction::Next);
        }

        cx.scroll_into_view();
        cx.announce(step);
        Ok(())
    }
}
