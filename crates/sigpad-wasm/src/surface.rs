//! `Surface` over a DOM canvas element.

use sigpad_core::Surface;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// A canvas element as seen by the sizing normalizer. Two handles are equal
/// when they wrap the same DOM node.
#[derive(Clone, Debug)]
pub struct CanvasSurface(HtmlCanvasElement);

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self(canvas)
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.0
    }

    fn context(&self) -> Option<CanvasRenderingContext2d> {
        self.0
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
    }
}

impl PartialEq for CanvasSurface {
    fn eq(&self, other: &Self) -> bool {
        let a: &JsValue = self.0.as_ref();
        let b: &JsValue = other.0.as_ref();
        a == b
    }
}

impl Surface for CanvasSurface {
    fn display_size(&self) -> (f64, f64) {
        (self.0.offset_width() as f64, self.0.offset_height() as f64)
    }

    fn buffer_size(&self) -> (u32, u32) {
        (self.0.width(), self.0.height())
    }

    fn set_buffer_width(&self, width: u32) {
        self.0.set_width(width);
    }

    fn set_buffer_height(&self, height: u32) {
        self.0.set_height(height);
    }

    fn scale_context(&self, sx: f64, sy: f64) {
        match self.context() {
            Some(ctx) => {
                if let Err(e) = ctx.scale(sx, sy) {
                    log::warn!("canvas scale failed: {e:?}");
                }
            }
            None => log::warn!("canvas has no 2d context; scale skipped"),
        }
    }
}
