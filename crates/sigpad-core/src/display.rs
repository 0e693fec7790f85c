//! Read-only playback of a saved signature.
//!
//! [`SignatureDisplay`] binds its own engine with default options and loads
//! a data URI into it whenever the payload changes. It has no clear, save or
//! reconfigure operations.

use crate::engine::DrawingEngine;
use crate::error::{PadError, Result};
use crate::options::{EngineOptions, SurfaceOptions};

struct Bound<E: DrawingEngine> {
    surface: E::Surface,
    engine: E,
}

/// Displays a previously saved signature image.
pub struct SignatureDisplay<E: DrawingEngine> {
    surface_options: SurfaceOptions,
    bound: Option<Bound<E>>,
    /// Payload the caller wants shown.
    image: Option<String>,
    /// Payload currently drawn on the bound engine.
    loaded: Option<String>,
}

impl<E: DrawingEngine> Default for SignatureDisplay<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: DrawingEngine> SignatureDisplay<E> {
    pub fn new() -> Self {
        Self {
            surface_options: SurfaceOptions::new(),
            bound: None,
            image: None,
            loaded: None,
        }
    }

    /// Display with fixed surface dimensions. Non-positive values are left out.
    pub fn with_size(height: Option<f64>, width: Option<f64>) -> Self {
        let mut display = Self::new();
        if let Some(h) = height.filter(|h| *h > 0.0) {
            display.surface_options.set("height", h);
        }
        if let Some(w) = width.filter(|w| *w > 0.0) {
            display.surface_options.set("width", w);
        }
        display
    }

    /// Attributes for the host to put on the display element.
    pub fn surface_attributes(&self) -> &SurfaceOptions {
        &self.surface_options
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Element-attachment callback. Same rules as the pad: `None` is
    /// ignored, the bound element is not rebound, a new element replaces the
    /// old binding. A payload set before attach is loaded right away.
    pub fn attach(&mut self, element: Option<E::Surface>) -> Result<()> {
        let Some(element) = element else {
            return Ok(());
        };
        if self.bound.as_ref().is_some_and(|b| b.surface == element) {
            log::debug!("display element already bound; ignoring re-attach");
            return Ok(());
        }
        self.detach();

        let mut engine = E::create(&element, &EngineOptions::default())?;
        engine.enable_capture();
        self.bound = Some(Bound {
            surface: element,
            engine,
        });
        log::debug!("signature display bound");

        self.sync().map(|_| ())
    }

    /// Disable capture and release the engine.
    pub fn detach(&mut self) {
        if let Some(mut bound) = self.bound.take() {
            bound.engine.disable_capture();
            log::debug!("signature display detached");
        }
        self.loaded = None;
    }

    /// Set the payload to display. Returns `true` if it was loaded now.
    ///
    /// An absent payload loads nothing and leaves the current drawing as is.
    ///
    /// # Errors
    /// The engine's import failure; the payload stays pending and is retried
    /// on the next change or attach.
    pub fn set_image(&mut self, image: Option<&str>) -> Result<bool> {
        self.image = image.map(str::to_string);
        self.sync()
    }

    /// Load the wanted payload if it differs from what is drawn.
    fn sync(&mut self) -> Result<bool> {
        let Some(bound) = self.bound.as_mut() else {
            return Ok(false);
        };
        let Some(image) = self.image.as_deref() else {
            self.loaded = None;
            return Ok(false);
        };
        if self.loaded.as_deref() == Some(image) {
            return Ok(false);
        }

        bound.engine.clear();
        bound.engine.import_image(image).inspect_err(|e| {
            log::warn!("failed to load signature image: {e}");
        })?;
        self.loaded = Some(image.to_string());
        Ok(true)
    }

    /// Run `f` against the bound engine.
    pub fn with_engine<R>(&mut self, f: impl FnOnce(&mut E) -> R) -> Result<R> {
        match self.bound.as_mut() {
            Some(bound) => Ok(f(&mut bound.engine)),
            None => Err(PadError::Unbound),
        }
    }
}

impl<E: DrawingEngine> Drop for SignatureDisplay<E> {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeEngine, FakeSurface};
    use pretty_assertions::assert_eq;

    type Display = SignatureDisplay<FakeEngine>;

    const IMAGE_A: &str = "data:image/png;base64,AAAA";
    const IMAGE_B: &str = "data:image/png;base64,BBBB";

    #[test]
    fn attach_enables_capture_with_default_options() {
        let mut display = Display::new();
        let surface = FakeSurface::new(300.0, 150.0);

        display.attach(Some(surface.clone())).unwrap();
        assert_eq!(surface.calls(), vec!["create", "enable"]);
        let options = display.with_engine(|e| e.options.clone()).unwrap();
        assert!(options.is_empty());
    }

    #[test]
    fn image_change_clears_then_loads_once() {
        let mut display = Display::new();
        let surface = FakeSurface::new(300.0, 150.0);
        display.attach(Some(surface.clone())).unwrap();
        surface.reset_log();

        assert!(display.set_image(Some(IMAGE_A)).unwrap());
        assert!(!display.set_image(Some(IMAGE_A)).unwrap());
        assert_eq!(surface.calls(), vec!["clear".to_string(), format!("import:{IMAGE_A}")]);

        assert!(display.set_image(Some(IMAGE_B)).unwrap());
        assert_eq!(surface.count(&format!("import:{IMAGE_B}")), 1);
    }

    #[test]
    fn absent_image_loads_nothing() {
        let mut display = Display::new();
        let surface = FakeSurface::new(300.0, 150.0);
        display.attach(Some(surface.clone())).unwrap();
        surface.reset_log();

        assert!(!display.set_image(None).unwrap());
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn image_before_attach_loads_on_attach() {
        let mut display = Display::new();
        assert!(!display.set_image(Some(IMAGE_A)).unwrap());

        let surface = FakeSurface::new(300.0, 150.0);
        display.attach(Some(surface.clone())).unwrap();
        assert_eq!(
            surface.calls(),
            vec![
                "create".to_string(),
                "enable".to_string(),
                "clear".to_string(),
                format!("import:{IMAGE_A}"),
            ]
        );
    }

    #[test]
    fn reattach_same_element_does_not_reload() {
        let mut display = Display::new();
        let surface = FakeSurface::new(300.0, 150.0);
        display.attach(Some(surface.clone())).unwrap();
        display.set_image(Some(IMAGE_A)).unwrap();

        display.attach(Some(surface.clone())).unwrap();
        assert_eq!(surface.count("create"), 1);
        assert_eq!(surface.count(&format!("import:{IMAGE_A}")), 1);
    }

    #[test]
    fn failed_import_stays_pending() {
        let mut display = Display::new();
        let surface = FakeSurface::new(300.0, 150.0);
        display.attach(Some(surface.clone())).unwrap();

        assert!(display.set_image(Some("garbage")).is_err());
        assert_eq!(display.image(), Some("garbage"));
        assert!(display.set_image(Some(IMAGE_A)).unwrap());
    }

    #[test]
    fn detach_and_drop_disable_capture() {
        let surface = FakeSurface::new(300.0, 150.0);
        {
            let mut display = Display::new();
            display.attach(Some(surface.clone())).unwrap();
            display.detach();
            assert!(!display.is_bound());
            assert_eq!(surface.count("disable"), 1);

            display.attach(Some(surface.clone())).unwrap();
        }
        assert_eq!(surface.count("disable"), 2);
    }

    #[test]
    fn with_size_sets_surface_attributes() {
        let display = Display::with_size(Some(200.0), Some(0.0));
        assert_eq!(display.surface_attributes().height(), Some(200.0));
        assert_eq!(display.surface_attributes().width(), None);
        assert_eq!(display.surface_attributes().len(), 1);
    }
}
