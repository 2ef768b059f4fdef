#![forbid(unsafe_code)]

//! Named lifecycle events with synchronous dispatch.
//!
//! Registration is open: any name can carry handlers. Six names are reserved
//! for the tour lifecycle (see [`LifecycleEvent`]); the controller fires each
//! *before* event ahead of the mutation it announces and the matching *after*
//! event once the mutation is done.
//!
//! # Errors
//!
//! Handlers return `Result<(), HandlerError>`. The bus does not swallow
//! failures: [`EventBus::fire`] stops at the first failing handler and hands
//! the error back to the caller.

use std::fmt;

use ahash::AHashMap;
use serde_json::Value;

use crate::step::StepDescriptor;

/// Reserved lifecycle event names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    BeforeStart,
    AfterStart,
    BeforeRender,
    AfterRender,
    BeforeEnd,
    AfterEnd,
}

impl LifecycleEvent {
    /// All reserved events, in lifecycle order.
    pub const ALL: [LifecycleEvent; 6] = [
        Self::BeforeStart,
        Self::AfterStart,
        Self::BeforeRender,
        Self::AfterRender,
        Self::BeforeEnd,
        Self::AfterEnd,
    ];

    /// Registration name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BeforeStart => "beforeStart",
            Self::AfterStart => "afterStart",
            Self::BeforeRender => "beforeRender",
            Self::AfterRender => "afterRender",
            Self::BeforeEnd => "beforeEnd",
            Self::AfterEnd => "afterEnd",
        }
    }

    /// Look up a reserved name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.as_str() == name)
    }
}

impl AsRef<str> for LifecycleEvent {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload passed to handlers.
#[derive(Debug, Clone, PartialEq)]
pub enum EventData {
    /// `beforeStart`/`afterStart`: the requested start index.
    Start { at: Option<usize> },
    /// `beforeRender`/`afterRender`: the step being rendered.
    Step(StepDescriptor),
    /// `beforeEnd`/`afterEnd`.
    End,
    /// Anything fired by user code.
    Custom(Value),
}

/// A handler failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event handler failed: {}", self.message)
    }
}

impl std::error::Error for HandlerError {}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// A registered event handler.
pub type EventHandler = Box<dyn FnMut(&EventData) -> Result<(), HandlerError>>;

/// Name → handler-list registry.
#[derive(Default)]
pub struct EventBus {
    handlers: AHashMap<String, Vec<EventHandler>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts: Vec<(&str, usize)> = self
            .handlers
            .iter()
            .map(|(name, list)| (name.as_str(), list.len()))
            .collect();
        counts.sort_unstable();
        f.debug_struct("EventBus").field("handlers", &counts).finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler to `name`'s list, creating the list on first use.
    pub fn on<F>(&mut self, name: impl AsRef<str>, handler: F)
    where
        F: FnMut(&EventData) -> Result<(), HandlerError> + 'static,
    {
        self.on_boxed(name, Box::new(handler));
    }

    /// Append an already boxed handler.
    pub fn on_boxed(&mut self, name: impl AsRef<str>, handler: EventHandler) {
        self.handlers
            .entry(name.as_ref().to_owned())
            .or_default()
            .push(handler);
    }

    /// Invoke every handler for `name` in registration order.
    ///
    /// Unknown names are a no-op. The first handler error aborts dispatch and
    /// is returned.
    pub fn fire(&mut self, name: impl AsRef<str>, data: &EventData) -> Result<(), HandlerError> {
        let name = name.as_ref();
        let Some(list) = self.handlers.get_mut(name) else {
            return Ok(());
        };
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "wayfinder.events", event = name, handlers = list.len(), "fire");
        for handler in list.iter_mut() {
            handler(data)?;
        }
        Ok(())
    }

    /// Number of handlers registered for `name`.
    pub fn handler_count(&self, name: impl AsRef<str>) -> usize {
        self.handlers.get(name.as_ref()).map_or(0, Vec::len)
    }

    /// Names with at least one handler, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .handlers
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Drop every handler.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}
