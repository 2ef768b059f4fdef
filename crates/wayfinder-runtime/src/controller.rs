#![forbid(unsafe_code)]

//! The tour state machine.
//!
//! # States
//!
//! ```text
//!            start_tour / goto_step / next / previous / show
//!   Idle ──────────────────────────────────────────────────▶ Showing(n)
//!    ▲                                                          │
//!    └──────────── end_tour / hide / configure / reset ─────────┘
//! ```
//!
//! # Ordering guarantees
//!
//! - Rendering a step: hide the previous step (detaching its listeners),
//!   `beforeRender`, the renderer, record the step as current, `afterRender`.
//! - Ending: `beforeEnd`, hide, mark complete, `afterEnd`.
//! - Restarting: the completion flag is cleared before the tour starts.
//!
//! Every transition returns `Result<()>`. A failing event handler or renderer
//! stops the transition at that point and the error is returned as is. A
//! failed render also hides anything the renderer had already shown.
//!
//! # Re-entry
//!
//! Host callbacks (next/previous/end controls, target clicks, timers) come
//! back in through [`TourController::dispatch`]. Transitions never re-enter
//! the controller themselves.

use std::fmt;

use wayfinder_core::event::{EventBus, EventData, HandlerError, LifecycleEvent};
use wayfinder_core::host::{CompletionOracle, StepAction, StepNode, TourHost};
use wayfinder_core::sequence::StepSequencer;
use wayfinder_core::step::{StepDefaults, StepDescriptor, StepSpec};
use wayfinder_placement::PlacementEngine;

use crate::config::TourConfiguration;
use crate::error::{Result, TourError};
use crate::listeners::StepListeners;
use crate::renderer::{RenderContext, StepRenderer, TemplateRenderer};

/// Drives a tour over a host page.
pub struct TourController {
    host: Box<dyn TourHost>,
    completion: Box<dyn CompletionOracle>,

    // Configuration.
    tour_name: Option<String>,
    steps: Vec<StepSpec>,
    original_defaults: Option<StepSpec>,
    defaults: StepDefaults,
    template: Option<String>,
    renderer: Option<Box<dyn StepRenderer>>,
    placement: PlacementEngine,

    // State.
    events: EventBus,
    listeners: StepListeners,
    node: Option<Box<dyn StepNode>>,
    current: Option<usize>,
}

impl fmt::Debug for TourController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourController")
            .field("tour_name", &self.tour_name)
            .field("steps", &self.steps.len())
            .field("defaults", &self.defaults)
            .field("template", &self.template.is_some())
            .field("custom_renderer", &self.renderer.is_some())
            .field("placement", &self.placement)
            .field("events", &self.events)
            .field("listeners", &self.listeners)
            .field("showing", &self.node.is_some())
            .field("current", &self.current)
            .finish()
    }
}

impl TourController {
    /// Controller with no steps and the library step defaults.
    pub fn new(host: Box<dyn TourHost>, completion: Box<dyn CompletionOracle>) -> Self {
        Self {
            host,
            completion,
            tour_name: None,
            steps: Vec::new(),
            original_defaults: None,
            defaults: StepDefaults::library(),
            template: None,
            renderer: None,
            placement: PlacementEngine::new(),
            events: EventBus::new(),
            listeners: StepListeners::new(),
            node: None,
            current: None,
        }
    }

    /// [`new`](Self::new) followed by [`configure`](Self::configure).
    pub fn with_config(
        host: Box<dyn TourHost>,
        completion: Box<dyn CompletionOracle>,
        config: TourConfiguration,
    ) -> Self {
        let mut controller = Self::new(host, completion);
        controller.configure(config);
        controller
    }

    // ── Configuration ───────────────────────────────────────────────────

    /// Apply `config`, discarding all tour state.
    ///
    /// The shown step is hidden, handlers and the current step are cleared
    /// and the step defaults are rebuilt. A renderer or template not named by
    /// `config` keeps its previous value.
    pub fn configure(&mut self, config: TourConfiguration) {
        self.clear_state();

        let TourConfiguration {
            tour_name,
            steps,
            step_defaults,
            template,
            viewport_padding,
            render_function,
            event_handlers,
        } = config;

        if let Some(renderer) = render_function {
            self.renderer = Some(renderer);
        }
        if let Some(template) = template {
            self.template = Some(template);
        }
        self.tour_name = tour_name;
        self.steps = steps.unwrap_or_default();
        self.original_defaults = step_defaults;
        self.reset_step_defaults(true);
        self.placement = PlacementEngine::new().with_padding(viewport_padding.unwrap_or(0.0));
        for (name, handler) in event_handlers {
            self.events.on_boxed(name, handler);
        }

        tracing::info!(
            target: "wayfinder.tour",
            tour = self.tour_name.as_deref().unwrap_or(""),
            steps = self.steps.len(),
            custom_renderer = self.renderer.is_some(),
            "configured"
        );
    }

    /// Discard all tour state, including the steps and a custom renderer.
    pub fn reset(&mut self) {
        self.clear_state();
        self.original_defaults = None;
        self.renderer = None;
        tracing::debug!(target: "wayfinder.tour", "reset");
    }

    fn clear_state(&mut self) {
        self.hide();
        self.events.clear();
        self.current = None;
        self.steps.clear();
    }

    /// Rebuild the step defaults from the library defaults, layering the
    /// configured defaults on top when `load_original` is set.
    pub fn reset_step_defaults(&mut self, load_original: bool) {
        self.defaults = match (&self.original_defaults, load_original) {
            (Some(partial), true) => StepDefaults::from_partial(partial),
            _ => StepDefaults::library(),
        };
    }

    /// Layer more defaults over the current ones.
    pub fn set_step_defaults(&mut self, partial: &StepSpec) {
        self.defaults.extend(partial);
    }

    pub fn step_defaults(&self) -> &StepDefaults {
        &self.defaults
    }

    pub fn tour_name(&self) -> Option<&str> {
        self.tour_name.as_deref()
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    // ── Events ──────────────────────────────────────────────────────────

    /// Register a handler for `name`.
    pub fn add_event_handler<F>(&mut self, name: impl AsRef<str>, handler: F)
    where
        F: FnMut(&EventData) -> std::result::Result<(), HandlerError> + 'static,
    {
        self.events.on(name, handler);
    }

    /// Fire every handler registered for `name`.
    pub fn fire_event_handlers(&mut self, name: impl AsRef<str>, data: &EventData) -> Result<()> {
        let name = name.as_ref();
        self.events.fire(name, data).map_err(|err| {
            tracing::warn!(target: "wayfinder.tour", event = name, error = %err, "handler failed");
            TourError::handler(name, err)
        })
    }

    fn fire(&mut self, event: LifecycleEvent, data: &EventData) -> Result<()> {
        self.fire_event_handlers(event, data)
    }

    // ── Step lookup ─────────────────────────────────────────────────────

    fn sequencer(&self) -> StepSequencer<'_, dyn TourHost> {
        StepSequencer::new(&self.steps, &self.defaults, &*self.host)
    }

    /// Resolved descriptor of step `n`.
    pub fn step(&self, n: usize) -> Option<StepDescriptor> {
        self.sequencer().step(n)
    }

    pub fn current_step_number(&self) -> Option<usize> {
        self.current
    }

    /// Set the current step. An index outside the step list clears it.
    pub fn set_current_step_number(&mut self, n: Option<usize>) {
        self.current = n.filter(|&i| i < self.steps.len());
    }

    /// Next reachable step after the current one (the first reachable step
    /// when there is no current step).
    pub fn next_step_number(&self) -> Option<usize> {
        self.sequencer().next(self.current)
    }

    /// Previous reachable step before the current one.
    pub fn previous_step_number(&self) -> Option<usize> {
        self.sequencer().previous(self.current)
    }

    /// Whether `n` (or the current step) has no reachable predecessor.
    pub fn is_first_step(&self, n: Option<usize>) -> bool {
        match n {
            Some(i) => self.sequencer().is_first_step(Some(i)),
            None => self.previous_step_number().is_none(),
        }
    }

    /// Whether `n` (or the current step) has no reachable successor.
    pub fn is_last_step(&self, n: Option<usize>) -> bool {
        match n {
            Some(i) => self.sequencer().is_last_step(Some(i)),
            None => self.next_step_number().is_none(),
        }
    }

    // ── Transitions ─────────────────────────────────────────────────────

    /// Start the tour at `at`, else at the current step, else at the first
    /// reachable step. Does nothing when the tour is already complete.
    pub fn start_tour(&mut self, at: Option<usize>) -> Result<()> {
        if self.completion.is_marked_complete() {
            tracing::debug!(
                target: "wayfinder.tour",
                tour = self.tour_name.as_deref().unwrap_or(""),
                "already complete; not starting"
            );
            return Ok(());
        }
        tracing::info!(target: "wayfinder.tour", ?at, "start");
        let data = EventData::Start { at };
        self.fire(LifecycleEvent::BeforeStart, &data)?;
        let target = at.or(self.current).or_else(|| self.sequencer().first());
        self.render_step(target)?;
        self.fire(LifecycleEvent::AfterStart, &data)
    }

    /// Clear the completion flag, then start from the first step.
    pub fn restart_tour(&mut self) -> Result<()> {
        self.completion.clear_completion_flag();
        self.start_tour(Some(0))
    }

    /// Show the next reachable step, or end the tour.
    pub fn next(&mut self) -> Result<()> {
        let n = self.next_step_number();
        self.render_step(n)
    }

    /// Show the previous reachable step, or end the tour.
    pub fn previous(&mut self) -> Result<()> {
        let n = self.previous_step_number();
        self.render_step(n)
    }

    /// Show step `n`; ends the tour when there is no such step.
    pub fn goto_step(&mut self, n: usize) -> Result<()> {
        self.render_step(Some(n))
    }

    fn render_step(&mut self, n: Option<usize>) -> Result<()> {
        let Some((index, step)) = n.and_then(|i| self.step(i).map(|s| (i, s))) else {
            tracing::debug!(target: "wayfinder.tour", requested = ?n, "no step; ending tour");
            return self.end_tour();
        };

        self.hide();

        let data = EventData::Step(step.clone());
        self.fire(LifecycleEvent::BeforeRender, &data)?;

        let (first, last) = {
            let seq = self.sequencer();
            (seq.is_first_step(Some(index)), seq.is_last_step(Some(index)))
        };
        let _span = tracing::debug_span!(target: "wayfinder.tour", "tour.render", step = index).entered();
        let mut cx = RenderContext::new(
            &mut *self.host,
            &mut self.listeners,
            &mut self.node,
            &self.placement,
            self.template.as_deref(),
            first,
            last,
        );
        let rendered = match self.renderer.as_mut() {
            Some(renderer) => renderer.render(&step, &mut cx),
            None => TemplateRenderer.render(&step, &mut cx),
        };
        let offset = cx.offset();
        if let Err(err) = rendered {
            // Release whatever the renderer managed to insert or bind.
            self.hide();
            tracing::warn!(target: "wayfinder.tour", step = index, error = %err, "render failed");
            return Err(err.into());
        }
        self.current = Some(index);
        tracing::debug!(
            target: "wayfinder.tour",
            step = index,
            first,
            last,
            ?offset,
            listeners = self.listeners.len(),
            "step rendered"
        );

        self.fire(LifecycleEvent::AfterRender, &data)
    }

    /// End the tour and mark it complete.
    pub fn end_tour(&mut self) -> Result<()> {
        self.fire(LifecycleEvent::BeforeEnd, &EventData::End)?;
        self.hide();
        self.completion.mark_complete();
        tracing::info!(
            target: "wayfinder.tour",
            tour = self.tour_name.as_deref().unwrap_or(""),
            "ended"
        );
        self.fire(LifecycleEvent::AfterEnd, &EventData::End)
    }

    /// Hide the shown step and detach its listeners.
    pub fn hide(&mut self) {
        if let Some(mut node) = self.node.take() {
            node.hide();
        }
        let detached = self.listeners.detach_all();
        if detached > 0 {
            tracing::trace!(target: "wayfinder.tour", detached, "listeners detached");
        }
    }

    /// Show the current step again (the first reachable step when none).
    pub fn show(&mut self) -> Result<()> {
        let n = self.current.or_else(|| self.sequencer().first());
        self.render_step(n)
    }

    /// Perform `action`. Host callbacks re-enter the controller here.
    pub fn dispatch(&mut self, action: StepAction) -> Result<()> {
        tracing::debug!(target: "wayfinder.tour", action = action.role(), "dispatch");
        match action {
            StepAction::Next => self.next(),
            StepAction::Previous => self.previous(),
            StepAction::End => self.end_tour(),
        }
    }

    // ── Introspection ───────────────────────────────────────────────────

    /// A step node is currently shown.
    pub fn is_showing(&self) -> bool {
        self.node.is_some()
    }

    /// Subscriptions attached for the shown step.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_marked_complete(&self) -> bool {
        self.completion.is_marked_complete()
    }
}
