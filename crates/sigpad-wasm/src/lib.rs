//! WASM bridge for sigpad — binds canvas elements to `signature_pad`.
//!
//! Compiled via `wasm-pack build --target web`. The host page owns the
//! canvas: it spreads `canvasProps()` onto the element and passes the element
//! to `canvasRef` once mounted (and `null` on unmount).

mod console;
mod convert;
mod engine;
mod host;
mod surface;

pub use engine::JsEngine;
pub use host::BrowserHost;
pub use surface::CanvasSurface;

use js_sys::Object;
use sigpad_core::{Config, SignatureDisplay, SignaturePad};
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

/// Route `log` output to the browser console at the given level
/// (`"error"` … `"trace"`, default `"warn"`).
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: Option<String>) {
    console::init(console::parse_level(level.as_deref()));
}

/// Interactive signature pad bound to one canvas at a time.
#[wasm_bindgen]
pub struct SignaturePadHandle {
    pad: SignaturePad<JsEngine, BrowserHost>,
}

#[wasm_bindgen]
impl SignaturePadHandle {
    /// Create a pad from a plain options object. Engine options
    /// (`penColor`, `minWidth`, …) go to `signature_pad`; everything else is
    /// returned by `canvasProps()`.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<SignaturePadHandle, JsError> {
        console::console_error_panic_hook_setup();
        let config = convert::config_from_js(&options)?;
        Ok(Self {
            pad: SignaturePad::new(&config, BrowserHost),
        })
    }

    /// Create a pad from a JSON options string. Callbacks cannot be given
    /// this way.
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(options: &str) -> Result<SignaturePadHandle, JsError> {
        console::console_error_panic_hook_setup();
        let config = Config::from_json(options)?;
        Ok(Self {
            pad: SignaturePad::new(&config, BrowserHost),
        })
    }

    /// Element-attachment callback. `null` is ignored; use `detach` to unbind.
    #[wasm_bindgen(js_name = canvasRef)]
    pub fn canvas_ref(&mut self, canvas: Option<HtmlCanvasElement>) -> Result<(), JsError> {
        self.pad.attach(canvas.map(CanvasSurface::new))?;
        Ok(())
    }

    /// Stop listening for resizes and disable capture.
    pub fn detach(&mut self) {
        self.pad.detach();
    }

    /// Attributes for the canvas element (`height`, `width`, `className`, …).
    #[wasm_bindgen(js_name = canvasProps)]
    pub fn canvas_props(&self) -> Object {
        convert::surface_attributes_to_js(&self.pad.surface_attributes())
    }

    /// `"unbound"`, `"binding"` or `"listening"`.
    pub fn state(&self) -> String {
        format!("{:?}", self.pad.state()).to_lowercase()
    }

    #[wasm_bindgen(js_name = updateOptions)]
    pub fn update_options(&mut self, options: JsValue) -> Result<(), JsError> {
        let config = convert::config_from_js(&options)?;
        self.pad.update_options(&config)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), JsError> {
        self.pad.clear()?;
        Ok(())
    }

    /// Export the signature as a data URI. Defaults: `image/png`, `0.92`.
    pub fn save(
        &self,
        image_type: Option<String>,
        image_quality: Option<f64>,
    ) -> Result<String, JsError> {
        Ok(self.pad.save(image_type.as_deref(), image_quality)?)
    }
}

/// Read-only display of a saved signature.
#[wasm_bindgen]
pub struct SignatureDisplayHandle {
    display: SignatureDisplay<JsEngine>,
}

#[wasm_bindgen]
impl SignatureDisplayHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(height: Option<f64>, width: Option<f64>) -> SignatureDisplayHandle {
        console::console_error_panic_hook_setup();
        Self {
            display: SignatureDisplay::with_size(height, width),
        }
    }

    #[wasm_bindgen(js_name = canvasRef)]
    pub fn canvas_ref(&mut self, canvas: Option<HtmlCanvasElement>) -> Result<(), JsError> {
        self.display.attach(canvas.map(CanvasSurface::new))?;
        Ok(())
    }

    pub fn detach(&mut self) {
        self.display.detach();
    }

    #[wasm_bindgen(js_name = canvasProps)]
    pub fn canvas_props(&self) -> Object {
        convert::surface_attributes_to_js(self.display.surface_attributes())
    }

    /// Show `image` (a data URI). Returns `true` if it was drawn now.
    #[wasm_bindgen(js_name = setImage)]
    pub fn set_image(&mut self, image: Option<String>) -> Result<bool, JsError> {
        Ok(self.display.set_image(image.as_deref())?)
    }
}
