#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use wayfinder_core::event::{EventData, HandlerError};

/// Ordered record of calls shared between fakes.
#[derive(Clone, Default)]
pub struct CallJournal {
    entries: Rc<RefCell<Vec<String>>>,
}

impl fmt::Debug for CallJournal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.borrow().iter()).finish()
    }
}

impl CallJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.entries.borrow_mut().push(entry.into());
    }

    /// Snapshot of every entry so far.
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Index of the first entry equal to `entry`.
    pub fn position(&self, entry: &str) -> Option<usize> {
        self.entries.borrow().iter().position(|e| e == entry)
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.position(entry).is_some()
    }

    /// Entries starting with `prefix`, in order.
    pub fn matching(&self, prefix: &str) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// `first` was recorded, and strictly before any later `second`.
    pub fn recorded_before(&self, first: &str, second: &str) -> bool {
        let entries = self.entries.borrow();
        let Some(a) = entries.iter().position(|e| e == first) else {
            return false;
        };
        entries
            .iter()
            .skip(a + 1)
            .any(|e| e == second)
    }
}

/// Event handler that records `tag` in `journal` each time it runs.
pub fn recorder(
    journal: &CallJournal,
    tag: impl Into<String>,
) -> impl FnMut(&EventData) -> Result<(), HandlerError> + 'static {
    let journal = journal.clone();
    let tag = tag.into();
    move |_| {
        journal.record(tag.clone());
        Ok(())
    }
}
