#![forbid(unsafe_code)]

//! Listener registry for the shown step.

use std::fmt;

use wayfinder_core::host::StepListener;

/// Subscriptions owned by the currently shown step.
///
/// Every binding made while rendering lands here and is detached when the
/// step is hidden. Dropping the registry detaches whatever is left.
#[derive(Default)]
pub struct StepListeners {
    attached: Vec<Box<dyn StepListener>>,
}

impl fmt::Debug for StepListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepListeners")
            .field("attached", &self.attached.len())
            .finish()
    }
}

impl StepListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a subscription.
    pub fn attach(&mut self, listener: Box<dyn StepListener>) {
        self.attached.push(listener);
    }

    /// Detach every subscription, most recent first. Returns how many there
    /// were.
    pub fn detach_all(&mut self) -> usize {
        let count = self.attached.len();
        while let Some(mut listener) = self.attached.pop() {
            listener.detach();
        }
        count
    }

    pub fn len(&self) -> usize {
        self.attached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }
}

impl Drop for StepListeners {
    fn drop(&mut self) {
        self.detach_all();
    }
}
