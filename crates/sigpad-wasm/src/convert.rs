//! Conversions between JavaScript option objects and sigpad options.

use js_sys::{Array, Function, JSON, Object, Reflect};
use sigpad_core::{
    Callback, Config, EngineOption, EngineOptions, OptionValue, PadError, Result, StrokeEvent,
    SurfaceOptions,
};
use std::collections::BTreeMap;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

/// Closures handed to JavaScript, at most one per engine option.
///
/// A closure must outlive the object property it was assigned to, so it is
/// only dropped once that option is assigned again.
pub struct CallbackSlots<C = Closure<dyn FnMut(JsValue)>> {
    slots: BTreeMap<EngineOption, C>,
}

impl<C> Default for CallbackSlots<C> {
    fn default() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }
}

impl<C> CallbackSlots<C> {
    pub fn insert(&mut self, option: EngineOption, closure: C) {
        self.slots.insert(option, closure);
    }

    /// Apply an option update: every option in `assigned` loses its old
    /// closure, then the closures in `fresh` take their slots.
    pub fn merge(
        &mut self,
        assigned: impl IntoIterator<Item = EngineOption>,
        fresh: CallbackSlots<C>,
    ) {
        for option in assigned {
            self.slots.remove(&option);
        }
        self.slots.extend(fresh.slots);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[cfg(test)]
    pub fn get(&self, option: EngineOption) -> Option<&C> {
        self.slots.get(&option)
    }
}

/// Read a plain JS object into a [`Config`]. `null`/`undefined` (for the
/// whole object or for a value) mean absent. Functions become callbacks
/// receiving `{x, y}`. Nested objects and arrays are carried as
/// [`OptionValue::Json`]; ones that cannot be serialized are skipped.
pub fn config_from_js(options: &JsValue) -> Result<Config> {
    let mut config = Config::new();
    if options.is_null() || options.is_undefined() {
        return Ok(config);
    }
    let Some(object) = options.dyn_ref::<Object>() else {
        return Err(PadError::Config("options must be an object".to_string()));
    };

    for entry in Object::entries(object).iter() {
        let entry: Array = entry.unchecked_into();
        let Some(key) = entry.get(0).as_string() else {
            continue;
        };
        let value = entry.get(1);
        if value.is_null() || value.is_undefined() {
            continue;
        }
        let value = if let Some(n) = value.as_f64() {
            OptionValue::Number(n)
        } else if let Some(s) = value.as_string() {
            OptionValue::Text(s)
        } else if let Some(b) = value.as_bool() {
            OptionValue::Bool(b)
        } else if let Some(function) = value.dyn_ref::<Function>() {
            OptionValue::Callback(callback_from_js(function.clone()))
        } else if let Some(json) = json_from_js(&value) {
            OptionValue::Json(json)
        } else {
            log::warn!("option {key} is not serializable; skipped");
            continue;
        };
        config.set(key, value);
    }
    Ok(config)
}

fn json_from_js(value: &JsValue) -> Option<serde_json::Value> {
    let text = String::from(JSON::stringify(value).ok()?);
    serde_json::from_str(&text).ok()
}

fn json_to_js(value: &serde_json::Value) -> Option<JsValue> {
    let text = serde_json::to_string(value).ok()?;
    JSON::parse(&text).ok()
}

/// Plain JS value for `value`, or `None` for callbacks and values that do
/// not survive conversion.
fn plain_to_js(value: &OptionValue) -> Option<JsValue> {
    match value {
        OptionValue::Number(n) => Some(JsValue::from_f64(*n)),
        OptionValue::Text(s) => Some(JsValue::from_str(s)),
        OptionValue::Bool(b) => Some(JsValue::from_bool(*b)),
        OptionValue::Json(json) => json_to_js(json),
        OptionValue::Callback(_) => None,
    }
}

fn callback_from_js(function: Function) -> Callback {
    Callback::new(move |event| {
        let point = Object::new();
        let _ = Reflect::set(&point, &JsValue::from_str("x"), &JsValue::from_f64(event.x));
        let _ = Reflect::set(&point, &JsValue::from_str("y"), &JsValue::from_f64(event.y));
        if let Err(e) = function.call1(&JsValue::NULL, &point) {
            log::warn!("stroke callback threw: {e:?}");
        }
    })
}

/// Build the option object passed to the JS engine. Callbacks are wrapped in
/// closures that read `clientX`/`clientY` from the pointer event; the
/// closures are returned so the caller can keep them alive.
pub fn engine_options_to_js(options: &EngineOptions) -> (Object, CallbackSlots) {
    let object = Object::new();
    let mut closures = CallbackSlots::default();
    for (option, value) in options.iter() {
        let js = match value {
            OptionValue::Callback(cb) => {
                let cb = cb.clone();
                let closure = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
                    cb.call(&stroke_event(&event));
                });
                let function = closure.as_ref().clone();
                closures.insert(option, closure);
                function
            }
            plain => match plain_to_js(plain) {
                Some(js) => js,
                None => continue,
            },
        };
        let _ = Reflect::set(&object, &JsValue::from_str(option.name()), &js);
    }
    (object, closures)
}

fn stroke_event(event: &JsValue) -> StrokeEvent {
    let coord = |name: &str| {
        Reflect::get(event, &JsValue::from_str(name))
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    };
    StrokeEvent {
        x: coord("clientX"),
        y: coord("clientY"),
    }
}

/// Surface attributes as a plain object for the host to spread onto the
/// canvas element. Structured values (e.g. `style`) are emitted unchanged;
/// callback-valued attributes are skipped.
pub fn surface_attributes_to_js(options: &SurfaceOptions) -> Object {
    let object = Object::new();
    for (name, value) in options.iter() {
        let Some(js) = plain_to_js(value) else {
            continue;
        };
        let _ = Reflect::set(&object, &JsValue::from_str(name), &js);
    }
    object
}

/// Render a thrown JS value as an error message.
pub fn js_error(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn slots(entries: &[(EngineOption, &str)]) -> CallbackSlots<String> {
        let mut slots = CallbackSlots::default();
        for (option, name) in entries {
            slots.insert(*option, name.to_string());
        }
        slots
    }

    #[test]
    fn reassigned_callback_replaces_previous_closure() {
        let mut held = slots(&[(EngineOption::OnBegin, "begin-1"), (EngineOption::OnEnd, "end-1")]);
        for round in 2..10 {
            let name = format!("begin-{round}");
            held.merge(
                [EngineOption::OnBegin],
                slots(&[(EngineOption::OnBegin, name.as_str())]),
            );
        }
        assert_eq!(held.len(), 2);
        assert_eq!(held.get(EngineOption::OnBegin).map(String::as_str), Some("begin-9"));
        assert_eq!(held.get(EngineOption::OnEnd).map(String::as_str), Some("end-1"));
    }

    #[test]
    fn callback_overwritten_by_plain_value_is_released() {
        let mut held = slots(&[(EngineOption::OnEnd, "end")]);
        held.merge([EngineOption::OnEnd, EngineOption::PenColor], slots(&[]));
        assert_eq!(held.len(), 0);
    }
}
