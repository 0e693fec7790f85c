//! `Host` over the browser window.

use sigpad_core::{Host, Unsubscribe};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

/// Reads `window.devicePixelRatio` live and subscribes to `resize`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserHost;

impl Host for BrowserHost {
    fn device_pixel_ratio(&self) -> Option<f64> {
        web_sys::window().map(|w| w.device_pixel_ratio())
    }

    fn on_resize(&self, callback: Box<dyn FnMut()>) -> Unsubscribe {
        let Some(window) = web_sys::window() else {
            log::warn!("no window; resize notifications unavailable");
            return Box::new(|| {});
        };
        let closure = Closure::wrap(callback);
        if let Err(e) =
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
        {
            log::warn!("failed to add resize listener: {e:?}");
        }

        Box::new(move || {
            if let Err(e) = window
                .remove_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            {
                log::warn!("failed to remove resize listener: {e:?}");
            }
            drop(closure);
        })
    }
}
