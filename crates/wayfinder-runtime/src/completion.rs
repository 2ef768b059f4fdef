#![forbid(unsafe_code)]

//! Remembering finished tours.
//!
//! [`MemoryCompletion`] lives as long as the controller. With the
//! `state-persistence` feature, [`FileCompletionStore`] keeps the names of
//! completed tours in a JSON file so a tour is not offered again in the next
//! session.

use wayfinder_core::host::CompletionOracle;

/// In-memory completion flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryCompletion {
    complete: bool,
}

impl MemoryCompletion {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CompletionOracle for MemoryCompletion {
    fn is_marked_complete(&self) -> bool {
        self.complete
    }

    fn mark_complete(&mut self) {
        self.complete = true;
    }

    fn clear_completion_flag(&mut self) {
        self.complete = false;
    }
}

#[cfg(feature = "state-persistence")]
pub use file::{DEFAULT_TOUR_NAME, FileCompletionStore};

#[cfg(feature = "state-persistence")]
mod file {
    use std::collections::BTreeSet;
    use std::path::{Path, PathBuf};

    use serde::{Deserialize, Serialize};
    use wayfinder_core::host::CompletionOracle;

    use crate::config::TourConfiguration;

    /// Completion key for configurations without a `tourName`.
    pub const DEFAULT_TOUR_NAME: &str = "tour";

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct CompletionFile {
        #[serde(default)]
        completed: BTreeSet<String>,
    }

    /// Completion flags for named tours, stored as JSON.
    ///
    /// ```json
    /// { "completed": ["onboarding", "reports"] }
    /// ```
    ///
    /// I/O failures never surface: they are logged and the in-memory state
    /// is still updated, so the tour behaves correctly for this session.
    #[derive(Debug)]
    pub struct FileCompletionStore {
        path: PathBuf,
        tour_name: String,
        completed: BTreeSet<String>,
    }

    impl FileCompletionStore {
        /// Open the store at `path` for `tour_name`. A missing or unreadable
        /// file starts empty.
        pub fn open(path: impl AsRef<Path>, tour_name: impl Into<String>) -> Self {
            let path = path.as_ref().to_path_buf();
            let completed = load(&path);
            Self {
                path,
                tour_name: tour_name.into(),
                completed,
            }
        }

        /// Open the store at `path` keyed by the configured `tourName`, or
        /// [`DEFAULT_TOUR_NAME`] when the configuration has none.
        pub fn for_config(path: impl AsRef<Path>, config: &TourConfiguration) -> Self {
            let name = config.tour_name.as_deref().unwrap_or(DEFAULT_TOUR_NAME);
            Self::open(path, name)
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        pub fn tour_name(&self) -> &str {
            &self.tour_name
        }

        /// Names of every completed tour in the file.
        pub fn completed(&self) -> impl Iterator<Item = &str> {
            self.completed.iter().map(String::as_str)
        }

        fn save(&self) {
            let file = CompletionFile {
                completed: self.completed.clone(),
            };
            let result = serde_json::to_string_pretty(&file)
                .map_err(std::io::Error::other)
                .and_then(|json| {
                    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&self.path, json)
                });
            match result {
                Ok(()) => tracing::debug!(
                    target: "wayfinder.completion",
                    path = %self.path.display(),
                    tour = %self.tour_name,
                    "completion saved"
                ),
                Err(err) => tracing::warn!(
                    target: "wayfinder.completion",
                    path = %self.path.display(),
                    error = %err,
                    "failed to save completion state"
                ),
            }
        }
    }

    fn load(path: &Path) -> BTreeSet<String> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return BTreeSet::new(),
            Err(err) => {
                tracing::warn!(
                    target: "wayfinder.completion",
                    path = %path.display(),
                    error = %err,
                    "failed to read completion state"
                );
                return BTreeSet::new();
            }
        };
        match serde_json::from_str::<CompletionFile>(&content) {
            Ok(file) => file.completed,
            Err(err) => {
                tracing::warn!(
                    target: "wayfinder.completion",
                    path = %path.display(),
                    error = %err,
                    "corrupt completion state; starting empty"
                );
                BTreeSet::new()
            }
        }
    }

    impl CompletionOracle for FileCompletionStore {
        fn is_marked_complete(&self) -> bool {
            self.completed.contains(&self.tour_name)
        }

        fn mark_complete(&mut self) {
            if self.completed.insert(self.tour_name.clone()) {
                self.save();
            }
        }

        fn clear_completion_flag(&mut self) {
            if self.completed.remove(&self.tour_name) {
                self.save();
            }
        }
    }
}
