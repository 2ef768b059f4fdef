#![forbid(unsafe_code)]

//! Tour configuration.
//!
//! A [`TourConfiguration`] bundles everything a tour needs: the steps, the
//! step defaults, the template and the viewport padding, plus the renderer
//! and event handlers, which can only be attached in code.
//!
//! # Loading
//!
//! ```json
//! {
//!   "tourName": "onboarding",
//!   "stepDefaults": { "placement": "bottom" },
//!   "steps": [
//!     { "target": "#search", "title": "Search", "body": "Find anything." },
//!     { "target": "#profile", "moveOnClick": true }
//!   ]
//! }
//! ```
//!
//! ```rust,ignore
//! let config = TourConfiguration::from_json_file("tour.json")?;
//! let config = TourConfiguration::from_toml_str(toml)?; // feature `config-files`
//! ```
//!
//! # Defaults
//!
//! Every field is optional. Malformed values are treated as absent rather
//! than rejected; [`TourConfiguration::validate`] reports them without
//! failing.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use wayfinder_core::event::{EventData, EventHandler, HandlerError};
use wayfinder_core::step::{StepDefaults, StepSpec, normalize};

use crate::error::ConfigError;
use crate::renderer::StepRenderer;

/// Input bundle for a tour.
#[derive(Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TourConfiguration {
    /// Label for the tour in logs. `FileCompletionStore::for_config` also
    /// uses it as the completion key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tour_name: Option<String>,
    /// Ordered steps. Absent keeps the tour empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<StepSpec>>,
    /// Partial defaults layered over the library defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_defaults: Option<StepSpec>,
    /// Markup handed to the renderer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Distance kept between tips and the viewport edges.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_padding"
    )]
    pub viewport_padding: Option<f64>,
    /// Custom renderer. The built-in renderer is used when unset.
    #[serde(skip)]
    pub render_function: Option<Box<dyn StepRenderer>>,
    /// Handlers registered when the configuration is applied.
    #[serde(skip)]
    pub event_handlers: Vec<(String, EventHandler)>,
}

impl fmt::Debug for TourConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers: Vec<&str> = self.event_handlers.iter().map(|(n, _)| n.as_str()).collect();
        f.debug_struct("TourConfiguration")
            .field("tour_name", &self.tour_name)
            .field("steps", &self.steps)
            .field("step_defaults", &self.step_defaults)
            .field("template", &self.template)
            .field("viewport_padding", &self.viewport_padding)
            .field("render_function", &self.render_function.is_some())
            .field("event_handlers", &handlers)
            .finish()
    }
}

impl TourConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn tour_name(mut self, name: impl Into<String>) -> Self {
        self.tour_name = Some(name.into());
        self
    }

    /// Replace the step list.
    #[must_use]
    pub fn steps(mut self, steps: impl IntoIterator<Item = StepSpec>) -> Self {
        self.steps = Some(steps.into_iter().collect());
        self
    }

    /// Append one step.
    #[must_use]
    pub fn step(mut self, step: StepSpec) -> Self {
        self.steps.get_or_insert_with(Vec::new).push(step);
        self
    }

    #[must_use]
    pub fn step_defaults(mut self, defaults: StepSpec) -> Self {
        self.step_defaults = Some(defaults);
        self
    }

    #[must_use]
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    #[must_use]
    pub fn viewport_padding(mut self, padding: f64) -> Self {
        self.viewport_padding = Some(padding);
        self
    }

    #[must_use]
    pub fn render_function(mut self, renderer: impl StepRenderer + 'static) -> Self {
        self.render_function = Some(Box::new(renderer));
        self
    }

    /// Register a handler for `name` once the configuration is applied.
    #[must_use]
    pub fn event_handler<F>(mut self, name: impl AsRef<str>, handler: F) -> Self
    where
        F: FnMut(&EventData) -> Result<(), HandlerError> + 'static,
    {
        self.event_handlers
            .push((name.as_ref().to_owned(), Box::new(handler)));
        self
    }

    /// Padding actually used: non-finite or negative values become 0.
    pub fn effective_padding(&self) -> f64 {
        match self.viewport_padding {
            Some(p) if p.is_finite() && p >= 0.0 => p,
            _ => 0.0,
        }
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Report suspicious settings.
    ///
    /// Returns a list of problems. An empty list means the config is valid.
    /// Nothing here prevents the configuration from being used.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if let Some(name) = &self.tour_name {
            if name.trim().is_empty() {
                errors.push("tourName must not be blank".to_string());
            }
        }

        if let Some(p) = self.viewport_padding {
            if !p.is_finite() || p < 0.0 {
                errors.push(format!("viewportPadding must be a non-negative number, got {p}"));
            }
        }

        let steps = self.steps.as_deref().unwrap_or_default();
        if steps.is_empty() {
            errors.push("no steps configured".to_string());
        }

        let defaults = self
            .step_defaults
            .as_ref()
            .map_or_else(StepDefaults::library, StepDefaults::from_partial);
        for (i, spec) in steps.iter().enumerate() {
            let step = normalize(&defaults, spec);
            if step.target.is_none() && !step.orphan && step.delay_ms == 0 {
                errors.push(format!(
                    "step {i} has no target and is not an orphan; it can never be shown"
                ));
            }
            if spec.extra.contains_key("stepNumber") {
                errors.push(format!("step {i}: stepNumber is assigned automatically"));
            }
        }

        errors
    }

    /// [`validate`](Self::validate) as a `Result`.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

fn lenient_padding<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_core::step::Placement;

    #[test]
    fn json_uses_camel_case_keys() {
        let config = TourConfiguration::from_json_str(
            r##"{
                "tourName": "intro",
                "stepDefaults": {"placement": "bottom", "orphan": true},
                "steps": [{"target": "#a", "moveOnClick": true, "moveAfterTime": 1500}],
                "template": "<div></div>",
                "viewportPadding": 12
            }"##,
        )
        .unwrap();
        assert_eq!(config.tour_name.as_deref(), Some("intro"));
        assert_eq!(config.effective_padding(), 12.0);
        let defaults = config.step_defaults.as_ref().unwrap();
        assert_eq!(defaults.placement, Some(Placement::Bottom));
        let step = &config.steps.as_ref().unwrap()[0];
        assert_eq!(step.move_on_click, Some(true));
        assert_eq!(step.move_after_ms, Some(1500));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn malformed_values_fall_back() {
        let config = TourConfiguration::from_json_str(
            r##"{"viewportPadding": {"x": 1}, "steps": [{"target": "#a", "delay": "soon"}]}"##,
        )
        .unwrap();
        assert_eq!(config.viewport_padding, None);
        assert_eq!(config.effective_padding(), 0.0);
        assert_eq!(config.steps.unwrap()[0].delay_ms, None);
    }

    #[test]
    fn negative_padding_is_reported_and_ignored() {
        let config = TourConfiguration::new()
            .step(StepSpec::new().target("#a"))
            .viewport_padding(-5.0);
        assert_eq!(config.effective_padding(), 0.0);
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("viewportPadding"));
    }

    #[test]
    fn validate_flags_unshowable_steps() {
        let config = TourConfiguration::new()
            .step(StepSpec::new().title("floating"))
            .step(StepSpec::new().orphan(true));
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("step 0"));
    }

    #[test]
    fn validate_uses_defaults() {
        let config = TourConfiguration::new()
            .step_defaults(StepSpec::new().orphan(true))
            .step(StepSpec::new());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn empty_config_reports_missing_steps() {
        let err = TourConfiguration::new().validated().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref e) if e == &["no steps configured"]));
    }

    #[test]
    fn builder_collects_handlers_and_renderer() {
        let config = TourConfiguration::new()
            .event_handler("afterEnd", |_| Ok(()))
            .render_function(crate::renderer::TemplateRenderer);
        assert_eq!(config.event_handlers.len(), 1);
        assert!(config.render_function.is_some());
        let debug = format!("{config:?}");
        assert!(debug.contains("afterEnd"));
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tour.json");
        std::fs::write(&path, r##"{"steps": [{"element": "#legacy"}]}"##).unwrap();
        let config = TourConfiguration::from_json_file(&path).unwrap();
        assert_eq!(config.steps.unwrap()[0].element.as_deref(), Some("#legacy"));

        let missing = TourConfiguration::from_json_file(dir.path().join("nope.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }

    #[cfg(feature = "config-files")]
    #[test]
    fn toml_loading() {
        let config = TourConfiguration::from_toml_str(
            r##"
            tourName = "toml-tour"
            viewportPadding = 4.0

            [stepDefaults]
            placement = "left"

            [[steps]]
            target = "#one"

            [[steps]]
            target = "#two"
            orphan = true
            "##,
        )
        .unwrap();
        assert_eq!(config.tour_name.as_deref(), Some("toml-tour"));
        assert_eq!(config.steps.as_ref().map(Vec::len), Some(2));
        assert_eq!(
            config.step_defaults.and_then(|d| d.placement),
            Some(Placement::Left)
        );
    }
}
