//! Signature pad lifecycle controller.
//!
//! [`SignaturePad`] owns the surface handle and the drawing-engine binding
//! for one mounted element and walks them through:
//!
//! ```text
//! Unbound ──attach(el)──▶ Binding ──size + capture + subscribe──▶ Listening
//!    ▲                                                              │
//!    └──────────────────── detach / drop ◀──────────────────────────┘
//! ```
//!
//! While listening, every viewport resize re-sizes the surface and clears the
//! engine, since a buffer resize wipes the pixels anyway. That also drops any
//! stroke in progress.

use crate::engine::{DEFAULT_IMAGE_QUALITY, DrawingEngine, ImageFormat};
use crate::error::{PadError, Result};
use crate::options::{Config, EngineOptions, SurfaceOptions, partition};
use crate::sizing::{Host, Unsubscribe, normalize};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Observable lifecycle state of a [`SignaturePad`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadState {
    /// No surface attached.
    Unbound,
    /// Engine constructed, capture not yet enabled.
    Binding,
    /// Capture enabled and resize notifications subscribed.
    Listening,
}

enum Binding<E: DrawingEngine> {
    Unbound,
    Bound { surface: E::Surface, engine: E },
}

struct PadInner<E: DrawingEngine> {
    engine_options: EngineOptions,
    surface_options: SurfaceOptions,
    binding: Binding<E>,
}

impl<E: DrawingEngine> PadInner<E> {
    /// Size the surface for the current display and clear the engine.
    /// Returns `false` when there is nothing bound.
    fn resize(&mut self, device_pixel_ratio: Option<f64>) -> bool {
        let Binding::Bound { surface, engine } = &mut self.binding else {
            return false;
        };
        let height_pinned = self.surface_options.pins_height();
        let width_pinned = self.surface_options.pins_width();
        normalize(height_pinned, width_pinned, &*surface, device_pixel_ratio);
        engine.clear();
        true
    }
}

/// Binds a drawing engine to a host-managed surface.
pub struct SignaturePad<E: DrawingEngine, H: Host> {
    inner: Rc<RefCell<PadInner<E>>>,
    host: Rc<H>,
    unsubscribe: Option<Unsubscribe>,
    /// Kept outside `inner` so it stays readable while an operation holds
    /// the borrow.
    state: PadState,
}

impl<E: DrawingEngine, H: Host> SignaturePad<E, H> {
    /// Create an unbound pad from a configuration mapping.
    pub fn new(config: &Config, host: H) -> Self {
        let (engine_options, surface_options) = partition(config);
        Self {
            inner: Rc::new(RefCell::new(PadInner {
                engine_options,
                surface_options,
                binding: Binding::Unbound,
            })),
            host: Rc::new(host),
            unsubscribe: None,
            state: PadState::Unbound,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn state(&self) -> PadState {
        self.state
    }

    /// Whether `element` is the surface currently bound.
    pub fn is_bound_to(&self, element: &E::Surface) -> bool {
        self.inner.try_borrow().is_ok_and(|inner| {
            matches!(&inner.binding, Binding::Bound { surface, .. } if surface == element)
        })
    }

    /// The current surface attributes, for the host to put on the element.
    pub fn surface_attributes(&self) -> SurfaceOptions {
        self.inner
            .try_borrow()
            .map(|inner| inner.surface_options.clone())
            .unwrap_or_default()
    }

    /// The engine options that a new binding would be created with.
    pub fn engine_options(&self) -> EngineOptions {
        self.inner
            .try_borrow()
            .map(|inner| inner.engine_options.clone())
            .unwrap_or_default()
    }

    /// Element-attachment callback.
    ///
    /// `None` (the host clearing its reference) is ignored; teardown goes
    /// through [`SignaturePad::detach`]. Re-attaching the element that is
    /// already bound is a no-op. A different element replaces the current
    /// binding.
    ///
    /// # Errors
    /// Propagates a construction failure from the engine, leaving the pad
    /// unbound.
    pub fn attach(&mut self, element: Option<E::Surface>) -> Result<()> {
        let Some(element) = element else {
            log::trace!("attach without element; ignoring");
            return Ok(());
        };

        if self.is_bound_to(&element) {
            log::debug!("element already bound; ignoring re-attach");
            return Ok(());
        }
        if self.state() != PadState::Unbound {
            log::debug!("new element attached; tearing down previous binding");
            self.detach();
        }

        {
            let mut inner = self.inner.try_borrow_mut().map_err(|_| PadError::Busy)?;
            let engine = E::create(&element, &inner.engine_options)?;
            inner.binding = Binding::Bound {
                surface: element,
                engine,
            };
        }
        self.state = PadState::Binding;
        log::debug!("drawing engine bound");

        self.start_listening()
    }

    /// Initial sizing pass, then capture, then the resize subscription.
    fn start_listening(&mut self) -> Result<()> {
        {
            let mut inner = self.inner.try_borrow_mut().map_err(|_| PadError::Busy)?;
            inner.resize(self.host.device_pixel_ratio());
            if let Binding::Bound { engine, .. } = &mut inner.binding {
                engine.enable_capture();
            }
        }
        self.state = PadState::Listening;

        let inner: Weak<RefCell<PadInner<E>>> = Rc::downgrade(&self.inner);
        let host: Weak<H> = Rc::downgrade(&self.host);
        self.unsubscribe = Some(self.host.on_resize(Box::new(move || {
            let (Some(inner), Some(host)) = (inner.upgrade(), host.upgrade()) else {
                return;
            };
            let Ok(mut inner) = inner.try_borrow_mut() else {
                log::warn!("resize notification during pad operation; skipped");
                return;
            };
            if inner.resize(host.device_pixel_ratio()) {
                log::debug!("surface resized");
            }
        })));
        log::debug!("signature pad listening");
        Ok(())
    }

    /// Tear down: detach the resize subscription, then disable capture and
    /// release the surface and engine. Safe to call when unbound.
    pub fn detach(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }

        let Ok(mut inner) = self.inner.try_borrow_mut() else {
            log::warn!("detach during pad operation; binding left in place");
            return;
        };
        if let Binding::Bound { mut engine, .. } =
            std::mem::replace(&mut inner.binding, Binding::Unbound)
        {
            if self.state == PadState::Listening {
                engine.disable_capture();
            }
            log::debug!("signature pad detached");
        }
        self.state = PadState::Unbound;
    }

    /// Replace the stored options and merge the engine options into a live
    /// binding. Options absent from `config` keep their value on the engine.
    /// Does not resize or clear.
    pub fn update_options(&mut self, config: &Config) -> Result<()> {
        let (engine_options, surface_options) = partition(config);
        let mut inner = self.inner.try_borrow_mut().map_err(|_| PadError::Busy)?;

        if let Binding::Bound { engine, .. } = &mut inner.binding {
            engine.merge_options(&engine_options);
            log::debug!("merged {} engine options", engine_options.len());
        }
        inner.engine_options = engine_options;
        inner.surface_options = surface_options;
        Ok(())
    }

    /// Erase the signature.
    ///
    /// # Errors
    /// [`PadError::Unbound`] before an element is attached.
    pub fn clear(&self) -> Result<()> {
        self.with_engine(|engine| engine.clear())
    }

    /// Export the signature as a data URI.
    ///
    /// Defaults to `image/png` at quality `0.92`. Neither argument is
    /// validated here; the engine's own failure is returned as-is.
    ///
    /// # Errors
    /// [`PadError::Unbound`] before an element is attached, or the engine's
    /// export error.
    pub fn save(&self, image_type: Option<&str>, image_quality: Option<f64>) -> Result<String> {
        let image_type = image_type.unwrap_or(ImageFormat::Png.mime());
        let quality = image_quality.unwrap_or(DEFAULT_IMAGE_QUALITY);
        self.with_engine(|engine| engine.export_image(image_type, quality))?
    }

    /// Run `f` against the bound engine.
    ///
    /// # Errors
    /// [`PadError::Unbound`] when nothing is bound, [`PadError::Busy`] when
    /// called from inside another pad operation.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut E) -> R) -> Result<R> {
        let mut inner = self.inner.try_borrow_mut().map_err(|_| PadError::Busy)?;
        match &mut inner.binding {
            Binding::Bound { engine, .. } => Ok(f(engine)),
            Binding::Unbound => Err(PadError::Unbound),
        }
    }
}

impl<E: DrawingEngine, H: Host> Drop for SignaturePad<E, H> {
    fn drop(&mut self) {
        self.detach();
    }
}
