//! `DrawingEngine` backed by the JavaScript `signature_pad` library.
//!
//! The library must be loaded as a global (`window.SignaturePad`), e.g. via
//! its UMD build, before a pad is attached.

use crate::convert::{CallbackSlots, engine_options_to_js, js_error};
use crate::surface::CanvasSurface;
use js_sys::{Object, Promise};
use sigpad_core::{DrawingEngine, EngineOptions, PadError, Result};
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(extends = Object, js_name = SignaturePad)]
    type JsSignaturePad;

    #[wasm_bindgen(constructor, catch, js_class = SignaturePad)]
    fn new(
        canvas: &HtmlCanvasElement,
        options: &Object,
    ) -> std::result::Result<JsSignaturePad, JsValue>;

    #[wasm_bindgen(method)]
    fn on(this: &JsSignaturePad);

    #[wasm_bindgen(method)]
    fn off(this: &JsSignaturePad);

    #[wasm_bindgen(method)]
    fn clear(this: &JsSignaturePad);

    #[wasm_bindgen(method, catch, js_name = toDataURL)]
    fn to_data_url(
        this: &JsSignaturePad,
        image_type: &str,
        quality: f64,
    ) -> std::result::Result<String, JsValue>;

    #[wasm_bindgen(method, catch, js_name = fromDataURL)]
    fn from_data_url(
        this: &JsSignaturePad,
        data_url: &str,
    ) -> std::result::Result<JsValue, JsValue>;
}

pub struct JsEngine {
    pad: JsSignaturePad,
    callbacks: CallbackSlots,
    /// Shared by every pending image import.
    on_import_error: Closure<dyn FnMut(JsValue)>,
}

impl DrawingEngine for JsEngine {
    type Surface = CanvasSurface;

    fn create(surface: &CanvasSurface, options: &EngineOptions) -> Result<Self> {
        let (js_options, callbacks) = engine_options_to_js(options);
        let pad = JsSignaturePad::new(surface.canvas(), &js_options)
            .map_err(|e| PadError::Engine(js_error(&e)))?;
        let on_import_error = Closure::<dyn FnMut(JsValue)>::new(|e: JsValue| {
            log::warn!("signature image failed to load: {}", js_error(&e));
        });
        Ok(Self {
            pad,
            callbacks,
            on_import_error,
        })
    }

    fn enable_capture(&mut self) {
        self.pad.on();
    }

    fn disable_capture(&mut self) {
        self.pad.off();
    }

    fn clear(&mut self) {
        self.pad.clear();
    }

    fn export_image(&self, image_type: &str, quality: f64) -> Result<String> {
        self.pad
            .to_data_url(image_type, quality)
            .map_err(|e| PadError::Engine(js_error(&e)))
    }

    /// Loading is asynchronous on the JS side; decode failures after the
    /// call returns are logged, not reported.
    fn import_image(&mut self, data_url: &str) -> Result<()> {
        let pending = self
            .pad
            .from_data_url(data_url)
            .map_err(|e| PadError::Engine(js_error(&e)))?;
        if let Ok(promise) = pending.dyn_into::<Promise>() {
            let _ = promise.catch(&self.on_import_error);
        }
        Ok(())
    }

    fn merge_options(&mut self, options: &EngineOptions) {
        let (js_options, callbacks) = engine_options_to_js(options);
        Object::assign(&self.pad, &js_options);
        self.callbacks.merge(options.iter().map(|(option, _)| option), callbacks);
        log::debug!(
            "merged {} engine options; holding {} callbacks",
            options.len(),
            self.callbacks.len()
        );
    }
}
