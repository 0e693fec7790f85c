//! Configuration model and the option partitioner.
//!
//! Callers hand the pad a single [`Config`] mixing drawing-engine settings
//! (`penColor`, `minWidth`, …) with plain surface attributes (`height`,
//! `width`, `class`, …). [`partition`] routes every entry to exactly one side
//! using the fixed [`EngineOption`] allow-list:
//!
//! | Side | Keys |
//! |------|------|
//! | **Engine** | `dotSize`, `minWidth`, `maxWidth`, `throttle`, `minDistance`, `backgroundColor`, `penColor`, `velocityFilterWeight`, `onBegin`, `onEnd` |
//! | **Surface** | everything else, passed through verbatim |

use crate::error::{PadError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

// ─── Values ──────────────────────────────────────────────────────────────

/// Position of the pointer when a stroke begins or ends, in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StrokeEvent {
    pub x: f64,
    pub y: f64,
}

/// A shared stroke callback (`onBegin` / `onEnd`).
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn(&StrokeEvent)>);

impl Callback {
    pub fn new(f: impl Fn(&StrokeEvent) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, event: &StrokeEvent) {
        (self.0)(event)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

/// Two callbacks are equal only if they are the same allocation.
impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// A single configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Callback(Callback),
    /// Structured value (object or array) carried through untouched, e.g. a
    /// `style` object for the surface element.
    Json(serde_json::Value),
}

impl OptionValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_callback(&self) -> Option<&Callback> {
        match self {
            Self::Callback(cb) => Some(cb),
            _ => None,
        }
    }

    /// Host-style truthiness: zero, NaN, `false` and the empty string are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Text(s) => !s.is_empty(),
            Self::Bool(b) => *b,
            Self::Callback(_) | Self::Json(_) => true,
        }
    }
}

impl From<f64> for OptionValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for OptionValue {
    fn from(n: i32) -> Self {
        Self::Number(n as f64)
    }
}

impl From<u32> for OptionValue {
    fn from(n: u32) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Callback> for OptionValue {
    fn from(cb: Callback) -> Self {
        Self::Callback(cb)
    }
}

impl From<serde_json::Value> for OptionValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(n) => Self::Number(n),
                None => Self::Json(serde_json::Value::Number(n)),
            },
            serde_json::Value::String(s) => Self::Text(s),
            other => Self::Json(other),
        }
    }
}

// ─── Config ──────────────────────────────────────────────────────────────

/// Caller-supplied options mapping, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    entries: Vec<(String, OptionValue)>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Config::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Insert or replace an entry. Replacing keeps the original position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a JSON object of options.
    ///
    /// `null` entries are treated as absent. Nested objects and arrays are
    /// kept as [`OptionValue::Json`].
    ///
    /// # Errors
    /// Returns [`PadError::Config`] for invalid JSON or a non-object root.
    pub fn from_json(json: &str) -> Result<Self> {
        let map: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(json).map_err(|e| PadError::Config(e.to_string()))?;

        let mut config = Self::new();
        for (key, value) in map {
            if value.is_null() {
                continue;
            }
            config.entries.push((key, value.into()));
        }
        Ok(config)
    }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for Config {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = Self::new();
        for (k, v) in iter {
            config.set(k, v);
        }
        config
    }
}

// ─── Engine options ──────────────────────────────────────────────────────

/// The fixed allow-list of options understood by the drawing engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EngineOption {
    DotSize,
    MinWidth,
    MaxWidth,
    Throttle,
    MinDistance,
    BackgroundColor,
    PenColor,
    VelocityFilterWeight,
    OnBegin,
    OnEnd,
}

impl EngineOption {
    pub const ALL: [EngineOption; 10] = [
        Self::DotSize,
        Self::MinWidth,
        Self::MaxWidth,
        Self::Throttle,
        Self::MinDistance,
        Self::BackgroundColor,
        Self::PenColor,
        Self::VelocityFilterWeight,
        Self::OnBegin,
        Self::OnEnd,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::DotSize => "dotSize",
            Self::MinWidth => "minWidth",
            Self::MaxWidth => "maxWidth",
            Self::Throttle => "throttle",
            Self::MinDistance => "minDistance",
            Self::BackgroundColor => "backgroundColor",
            Self::PenColor => "penColor",
            Self::VelocityFilterWeight => "velocityFilterWeight",
            Self::OnBegin => "onBegin",
            Self::OnEnd => "onEnd",
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|opt| opt.name() == name)
    }
}

impl fmt::Display for EngineOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Options routed to the drawing engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineOptions {
    values: BTreeMap<EngineOption, OptionValue>,
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, option: EngineOption) -> Option<&OptionValue> {
        self.values.get(&option)
    }

    pub fn set(&mut self, option: EngineOption, value: impl Into<OptionValue>) {
        self.values.insert(option, value.into());
    }

    /// Field-by-field overwrite: options present in `other` win, all others
    /// keep their current value.
    pub fn merge(&mut self, other: &EngineOptions) {
        for (option, value) in &other.values {
            self.values.insert(*option, value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (EngineOption, &OptionValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn number(&self, option: EngineOption) -> Option<f64> {
        self.get(option).and_then(OptionValue::as_number)
    }

    fn text(&self, option: EngineOption) -> Option<&str> {
        self.get(option).and_then(OptionValue::as_text)
    }

    pub fn dot_size(&self) -> Option<f64> {
        self.number(EngineOption::DotSize)
    }

    pub fn min_width(&self) -> Option<f64> {
        self.number(EngineOption::MinWidth)
    }

    pub fn max_width(&self) -> Option<f64> {
        self.number(EngineOption::MaxWidth)
    }

    pub fn throttle(&self) -> Option<f64> {
        self.number(EngineOption::Throttle)
    }

    pub fn min_distance(&self) -> Option<f64> {
        self.number(EngineOption::MinDistance)
    }

    pub fn velocity_filter_weight(&self) -> Option<f64> {
        self.number(EngineOption::VelocityFilterWeight)
    }

    pub fn pen_color(&self) -> Option<&str> {
        self.text(EngineOption::PenColor)
    }

    pub fn background_color(&self) -> Option<&str> {
        self.text(EngineOption::BackgroundColor)
    }

    pub fn on_begin(&self) -> Option<&Callback> {
        self.get(EngineOption::OnBegin).and_then(OptionValue::as_callback)
    }

    pub fn on_end(&self) -> Option<&Callback> {
        self.get(EngineOption::OnEnd).and_then(OptionValue::as_callback)
    }
}

// ─── Surface options ─────────────────────────────────────────────────────

/// Everything that is not an engine option: attributes for the surface element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceOptions {
    entries: Vec<(String, OptionValue)>,
}

impl SurfaceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Numeric `height` attribute, if present, non-zero and finite.
    pub fn height(&self) -> Option<f64> {
        self.dimension("height")
    }

    /// Numeric `width` attribute, if present, non-zero and finite.
    pub fn width(&self) -> Option<f64> {
        self.dimension("width")
    }

    /// Whether the caller fixed the buffer height. Any truthy value pins it,
    /// including non-numeric ones such as `"auto"`.
    pub fn pins_height(&self) -> bool {
        self.get("height").is_some_and(OptionValue::is_truthy)
    }

    /// Whether the caller fixed the buffer width; see [`Self::pins_height`].
    pub fn pins_width(&self) -> bool {
        self.get("width").is_some_and(OptionValue::is_truthy)
    }

    fn dimension(&self, name: &str) -> Option<f64> {
        self.get(name)
            .and_then(OptionValue::as_number)
            .filter(|n| *n != 0.0 && n.is_finite())
    }
}

// ─── Partition ───────────────────────────────────────────────────────────

/// Split a configuration into engine options and surface options.
///
/// Total and deterministic: every key lands on exactly one side, decided only
/// by membership in [`EngineOption::ALL`].
pub fn partition(config: &Config) -> (EngineOptions, SurfaceOptions) {
    let mut engine = EngineOptions::new();
    let mut surface = SurfaceOptions::new();

    for (key, value) in config.iter() {
        match EngineOption::from_name(key) {
            Some(option) => engine.set(option, value.clone()),
            None => surface.set(key, value.clone()),
        }
    }

    log::trace!(
        "partitioned {} options: {} engine, {} surface",
        config.len(),
        engine.len(),
        surface.len()
    );
    (engine, surface)
}

// ─── Tests ───────────────────────────────────────────────────────────────
