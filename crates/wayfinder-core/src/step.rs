#![forbid(unsafe_code)]

//! Step model and configuration normalization.
//!
//! A tour is an ordered list of [`StepSpec`] values, each a partial set of
//! options. Before a step is used it is merged over the tour-wide
//! [`StepDefaults`] and resolved into a [`StepDescriptor`].
//!
//! # Merge rules
//!
//! [`normalize`] is a shallow merge: every key set on the step wins over the
//! default, unset keys inherit the default, and unknown keys (kept in
//! [`StepSpec::extra`]) pass through untouched. Two legacy aliases are
//! honoured: `element` stands in for `target`, and `content` for `body`.
//!
//! # Leniency
//!
//! Malformed option values never fail deserialization. Numbers accept
//! integers, floats (rounded, negatives clamp to zero), booleans and numeric
//! strings; flags accept booleans, numbers (non-zero is set) and strings
//! (non-empty is set). Anything else is treated as unset and inherits the
//! default.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Key of the transient step number. Never carried over from source data.
const STEP_NUMBER_KEY: &str = "stepNumber";

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

/// Side of the anchor a tooltip is rendered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    Top,
    Bottom,
    Left,
    Right,
}

impl Placement {
    /// Parse a placement name. Unrecognized names resolve to [`Placement::Right`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            "left" => Self::Left,
            _ => Self::Right,
        }
    }

    /// Canonical lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Whether the tooltip sits above or below the anchor.
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Placement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Placement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(name) => Self::from_name(&name),
            _ => Self::Right,
        })
    }
}

// ---------------------------------------------------------------------------
// StepSpec
// ---------------------------------------------------------------------------

/// One step as supplied by the tour author. Every option is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StepSpec {
    /// Selector of the anchor element.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Legacy alias of `target`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Legacy alias of `body`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_placement"
    )]
    pub placement: Option<Placement>,
    /// Milliseconds before the step appears. Non-zero makes the step reachable
    /// even when its anchor does not exist yet.
    #[serde(
        rename = "delay",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_millis"
    )]
    pub delay_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_flag")]
    pub move_on_click: Option<bool>,
    /// Milliseconds after which the tour advances on its own.
    #[serde(
        rename = "moveAfterTime",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_millis"
    )]
    pub move_after_ms: Option<u64>,
    /// Step may be shown without an anchor (centred on the viewport).
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_flag")]
    pub orphan: Option<bool>,
    /// Unknown keys, passed through unchanged.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl StepSpec {
    /// Create an empty step.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn target(mut self, selector: impl Into<String>) -> Self {
        self.target = Some(selector.into());
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = Some(placement);
        self
    }

    #[must_use]
    pub fn delay_ms(mut self, ms: u64) -> Self {
        self.delay_ms = Some(ms);
        self
    }

    #[must_use]
    pub fn move_on_click(mut self, enabled: bool) -> Self {
        self.move_on_click = Some(enabled);
        self
    }

    #[must_use]
    pub fn move_after_ms(mut self, ms: u64) -> Self {
        self.move_after_ms = Some(ms);
        self
    }

    #[must_use]
    pub fn orphan(mut self, orphan: bool) -> Self {
        self.orphan = Some(orphan);
        self
    }

    /// Attach an extra, engine-agnostic key.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Shallow-merge `self` over `base`: keys set on `self` win.
    ///
    /// `element` and `content` count as `target` and `body` of the layer
    /// they are set on, so an aliased override still beats the base value.
    #[must_use]
    pub fn merged_over(&self, base: &StepSpec) -> StepSpec {
        let mut extra = base.extra.clone();
        extra.extend(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())));

        StepSpec {
            target: layer(&self.target, &self.element)
                .or_else(|| layer(&base.target, &base.element)),
            element: self.element.clone().or_else(|| base.element.clone()),
            title: self.title.clone().or_else(|| base.title.clone()),
            body: layer(&self.body, &self.content)
                .or_else(|| layer(&base.body, &base.content)),
            content: self.content.clone().or_else(|| base.content.clone()),
            placement: self.placement.or(base.placement),
            delay_ms: self.delay_ms.or(base.delay_ms),
            move_on_click: self.move_on_click.or(base.move_on_click),
            move_after_ms: self.move_after_ms.or(base.move_after_ms),
            orphan: self.orphan.or(base.orphan),
            extra,
        }
    }
}

/// Value of a key on one layer, honouring its legacy alias.
fn layer(primary: &Option<String>, alias: &Option<String>) -> Option<String> {
    match (primary, alias) {
        (Some(value), Some(alias)) if value.is_empty() && !alias.is_empty() => Some(alias.clone()),
        (Some(value), _) => Some(value.clone()),
        (None, alias) => alias.clone(),
    }
}

// ---------------------------------------------------------------------------
// StepDefaults
// ---------------------------------------------------------------------------

/// Tour-wide option defaults.
///
/// Always holds the six canonical keys; see [`StepDefaults::CANONICAL_KEYS`].
#[derive(Debug, Clone, PartialEq)]
pub struct StepDefaults {
    spec: StepSpec,
}

impl Default for StepDefaults {
    fn default() -> Self {
        Self::library()
    }
}

impl StepDefaults {
    /// Option names every defaults mapping contains.
    pub const CANONICAL_KEYS: [&'static str; 6] = [
        "target",
        "placement",
        "delay",
        "moveOnClick",
        "moveAfterTime",
        "orphan",
    ];

    /// Library defaults: no target, `top` placement, no delay, no
    /// move-on-click, no auto-advance, not orphan.
    pub fn library() -> Self {
        Self {
            spec: StepSpec {
                target: Some(String::new()),
                placement: Some(Placement::Top),
                delay_ms: Some(0),
                move_on_click: Some(false),
                move_after_ms: Some(0),
                orphan: Some(false),
                ..StepSpec::default()
            },
        }
    }

    /// Library defaults with `partial` merged on top.
    pub fn from_partial(partial: &StepSpec) -> Self {
        let mut defaults = Self::library();
        defaults.extend(partial);
        defaults
    }

    /// Merge additional defaults in; existing keys not named by `partial`
    /// are kept.
    pub fn extend(&mut self, partial: &StepSpec) {
        let mut merged = partial.merged_over(&self.spec);
        // The alias is folded into `target`; keep one canonical key.
        merged.element = None;
        merged.content = None;
        self.spec = merged;
    }

    /// The defaults as a partial step (canonical keys always set).
    pub fn as_spec(&self) -> &StepSpec {
        &self.spec
    }

    /// Default placement.
    pub fn placement(&self) -> Placement {
        self.spec.placement.unwrap_or(Placement::Top)
    }

    /// Option names currently defined, sorted by name.
    pub fn keys(&self) -> Vec<String> {
        self.to_map().into_keys().collect()
    }

    /// Whether an option is defined.
    pub fn contains_key(&self, key: &str) -> bool {
        self.to_map().contains_key(key)
    }

    /// The defaults as a JSON-style mapping.
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        match serde_json::to_value(&self.spec) {
            Ok(Value::Object(map)) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// StepDescriptor
// ---------------------------------------------------------------------------

/// A step resolved against the defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDescriptor {
    /// Position in the tour, assigned at lookup time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_number: Option<usize>,
    /// Anchor selector; `None` when empty.
    pub target: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub placement: Placement,
    #[serde(rename = "delay")]
    pub delay_ms: u64,
    pub move_on_click: bool,
    #[serde(rename = "moveAfterTime")]
    pub move_after_ms: u64,
    pub orphan: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl StepDescriptor {
    /// Resolve a merged spec. Missing canonical keys take library defaults.
    fn from_merged(merged: StepSpec) -> Self {
        let mut extra = merged.extra;
        extra.remove(STEP_NUMBER_KEY);
        Self {
            step_number: None,
            target: merged.target.filter(|t| !t.trim().is_empty()),
            title: merged.title,
            body: merged.body,
            placement: merged.placement.unwrap_or(Placement::Top),
            delay_ms: merged.delay_ms.unwrap_or(0),
            move_on_click: merged.move_on_click.unwrap_or(false),
            move_after_ms: merged.move_after_ms.unwrap_or(0),
            orphan: merged.orphan.unwrap_or(false),
            extra,
        }
    }

    /// Tag the descriptor with its position in the tour.
    #[must_use]
    pub fn with_step_number(mut self, step_number: usize) -> Self {
        self.step_number = Some(step_number);
        self
    }

    /// Delay before the step appears, if any.
    pub fn delay(&self) -> Option<Duration> {
        (self.delay_ms > 0).then(|| Duration::from_millis(self.delay_ms))
    }

    /// Time after which the tour advances on its own, if any.
    pub fn move_after(&self) -> Option<Duration> {
        (self.move_after_ms > 0).then(|| Duration::from_millis(self.move_after_ms))
    }
}

/// Merge a step over the defaults and resolve it.
pub fn normalize(defaults: &StepDefaults, step: &StepSpec) -> StepDescriptor {
    StepDescriptor::from_merged(step.merged_over(defaults.as_spec()))
}

// ---------------------------------------------------------------------------
// Lenient deserializers
// ---------------------------------------------------------------------------

fn lenient_placement<'de, D>(deserializer: D) -> Result<Option<Placement>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(name)) => Some(Placement::from_name(&name)),
        _ => None,
    })
}

fn lenient_millis<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(millis_from_value))
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(flag_from_value))
}

fn millis_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.max(0.0).round() as u64)),
        Value::Bool(b) => Some(u64::from(*b)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.max(0.0).round() as u64),
        _ => None,
    }
}

fn flag_from_value(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan())),
        Value::String(s) => Some(!s.is_empty()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(value: Value) -> StepSpec {
        serde_json::from_value(value).expect("step spec")
    }

    #[test]
    fn library_defaults_have_canonical_keys() {
        let defaults = StepDefaults::library();
        let keys = defaults.keys();
        assert_eq!(keys.len(), 6);
        for key in StepDefaults::CANONICAL_KEYS {
            assert!(defaults.contains_key(key), "missing {key}");
        }
        assert_eq!(defaults.placement(), Placement::Top);
    }

    #[test]
    fn partial_defaults_override_library_values() {
        let defaults =
            StepDefaults::from_partial(&spec(json!({"placement": "bottom", "delay": 250})));
        let map = defaults.to_map();
        assert_eq!(map["placement"], json!("bottom"));
        assert_eq!(map["delay"], json!(250));
        assert_eq!(map["orphan"], json!(false));
    }

    #[test]
    fn element_default_folds_into_target() {
        let defaults = StepDefaults::from_partial(&spec(json!({"element": "#main"})));
        let map = defaults.to_map();
        assert_eq!(map["target"], json!("#main"));
        assert!(!map.contains_key("element"));
    }

    #[test]
    fn extend_adds_extra_defaults_without_dropping_old_ones() {
        let mut defaults = StepDefaults::library();
        defaults.extend(&spec(json!({"example": "foo"})));
        assert!(defaults.contains_key("example"));
        assert!(!defaults.contains_key("foo"));

        defaults.extend(&spec(json!({"foo": "bar"})));
        assert!(defaults.contains_key("example"));
        assert!(defaults.contains_key("foo"));
    }

    #[test]
    fn normalize_override_wins_and_inherits_missing() {
        let defaults = StepDefaults::from_partial(&spec(json!({"placement": "left"})));
        let step = normalize(&defaults, &spec(json!({"target": "#a", "delay": 10})));
        assert_eq!(step.target.as_deref(), Some("#a"));
        assert_eq!(step.delay_ms, 10);
        assert_eq!(step.placement, Placement::Left);
        assert!(!step.orphan);
        assert_eq!(step.step_number, None);
    }

    #[test]
    fn normalize_passes_unknown_keys_through() {
        let defaults = StepDefaults::from_partial(&spec(json!({"theme": "dark"})));
        let step = normalize(&defaults, &spec(json!({"trackingId": 7})));
        assert_eq!(step.extra["trackingId"], json!(7));
        assert_eq!(step.extra["theme"], json!("dark"));
    }

    #[test]
    fn legacy_aliases_resolve() {
        let defaults = StepDefaults::library();
        let step = normalize(&defaults, &spec(json!({"element": ".x", "content": "hi"})));
        assert_eq!(step.target.as_deref(), Some(".x"));
        assert_eq!(step.body.as_deref(), Some("hi"));
    }

    #[test]
    fn step_element_beats_default_target() {
        let defaults = StepDefaults::from_partial(&spec(json!({"target": ".default"})));
        let step = normalize(&defaults, &spec(json!({"element": ".own"})));
        assert_eq!(step.target.as_deref(), Some(".own"));
    }

    #[test]
    fn empty_target_resolves_to_none() {
        let step = normalize(&StepDefaults::library(), &StepSpec::new());
        assert_eq!(step.target, None);
    }

    #[test]
    fn source_step_number_is_discarded() {
        let step = normalize(&StepDefaults::library(), &spec(json!({"stepNumber": 99})))
            .with_step_number(2);
        assert_eq!(step.step_number, Some(2));
        assert!(!step.extra.contains_key("stepNumber"));
    }

    #[test]
    fn malformed_values_fall_back() {
        let s = spec(json!({
            "placement": 42,
            "delay": {"nested": true},
            "orphan": null,
            "moveOnClick": "yes",
            "moveAfterTime": "1500"
        }));
        assert_eq!(s.placement, None);
        assert_eq!(s.delay_ms, None);
        assert_eq!(s.orphan, None);
        assert_eq!(s.move_on_click, Some(true));
        assert_eq!(s.move_after_ms, Some(1500));
    }

    #[test]
    fn unknown_placement_name_is_right() {
        assert_eq!(Placement::from_name("diagonal"), Placement::Right);
        assert_eq!(Placement::from_name(" Bottom "), Placement::Bottom);
        let s = spec(json!({"placement": "nowhere"}));
        assert_eq!(s.placement, Some(Placement::Right));
    }

    #[test]
    fn descriptor_durations() {
        let step = normalize(
            &StepDefaults::library(),
            &StepSpec::new().delay_ms(0).move_after_ms(1200),
        );
        assert_eq!(step.delay(), None);
        assert_eq!(step.move_after(), Some(Duration::from_millis(1200)));
    }
}
