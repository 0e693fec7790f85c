//! Recording collaborators for unit tests.

use crate::engine::{DrawingEngine, ImageFormat};
use crate::error::{PadError, Result};
use crate::options::EngineOptions;
use crate::sizing::{Host, Surface, Unsubscribe};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct SurfaceState {
    display: (f64, f64),
    buffer: (u32, u32),
    scales: Vec<f64>,
    calls: Vec<String>,
    fail_create: bool,
}

/// Canvas stand-in that logs every call made on it or on its engine.
#[derive(Clone)]
pub struct FakeSurface(Rc<RefCell<SurfaceState>>);

impl PartialEq for FakeSurface {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl FakeSurface {
    pub fn new(display_width: f64, display_height: f64) -> Self {
        Self(Rc::new(RefCell::new(SurfaceState {
            display: (display_width, display_height),
            buffer: (300, 150),
            ..Default::default()
        })))
    }

    pub fn failing() -> Self {
        let surface = Self::new(100.0, 100.0);
        surface.0.borrow_mut().fail_create = true;
        surface
    }

    pub fn scales(&self) -> Vec<f64> {
        self.0.borrow().scales.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.borrow().calls.clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.0.borrow().calls.iter().filter(|c| *c == call).count()
    }

    pub fn reset_log(&self) {
        let mut state = self.0.borrow_mut();
        state.calls.clear();
        state.scales.clear();
    }

    fn log(&self, call: impl Into<String>) {
        self.0.borrow_mut().calls.push(call.into());
    }
}

impl Surface for FakeSurface {
    fn display_size(&self) -> (f64, f64) {
        self.0.borrow().display
    }

    fn buffer_size(&self) -> (u32, u32) {
        self.0.borrow().buffer
    }

    fn set_buffer_width(&self, width: u32) {
        let mut state = self.0.borrow_mut();
        state.buffer.0 = width;
        state.calls.push("set_width".into());
    }

    fn set_buffer_height(&self, height: u32) {
        let mut state = self.0.borrow_mut();
        state.buffer.1 = height;
        state.calls.push("set_height".into());
    }

    fn scale_context(&self, sx: f64, _sy: f64) {
        let mut state = self.0.borrow_mut();
        state.scales.push(sx);
        state.calls.push("scale".into());
    }
}

/// Engine stand-in: remembers its options and the last imported payload.
pub struct FakeEngine {
    surface: FakeSurface,
    pub options: EngineOptions,
    pub capturing: bool,
    pub content: Option<String>,
}

impl DrawingEngine for FakeEngine {
    type Surface = FakeSurface;

    fn create(surface: &FakeSurface, options: &EngineOptions) -> Result<Self> {
        if surface.0.borrow().fail_create {
            return Err(PadError::Engine("no 2d context".into()));
        }
        surface.log("create");
        Ok(Self {
            surface: surface.clone(),
            options: options.clone(),
            capturing: false,
            content: None,
        })
    }

    fn enable_capture(&mut self) {
        self.capturing = true;
        self.surface.log("enable");
    }

    fn disable_capture(&mut self) {
        self.capturing = false;
        self.surface.log("disable");
    }

    fn clear(&mut self) {
        self.content = None;
        self.surface.log("clear");
    }

    fn export_image(&self, image_type: &str, quality: f64) -> Result<String> {
        self.surface.log("export");
        if ImageFormat::from_mime(image_type).is_none() {
            return Err(PadError::Engine(format!("unsupported type {image_type}")));
        }
        let body = self.content.as_deref().unwrap_or("blank");
        Ok(format!("data:{image_type};q={quality},{body}"))
    }

    fn import_image(&mut self, data_url: &str) -> Result<()> {
        if !data_url.starts_with("data:") {
            return Err(PadError::Engine("not a data url".into()));
        }
        self.surface.log(format!("import:{data_url}"));
        self.content = Some(data_url.to_string());
        Ok(())
    }

    fn merge_options(&mut self, options: &EngineOptions) {
        self.options.merge(options);
        self.surface.log("merge");
    }
}

type Listener = Rc<RefCell<Box<dyn FnMut()>>>;

#[derive(Default)]
struct HostState {
    ratio: Option<f64>,
    listeners: Vec<(u64, Listener)>,
    next_id: u64,
    log: Option<FakeSurface>,
}

/// Host stand-in with a settable pixel ratio and manual resize dispatch.
#[derive(Clone, Default)]
pub struct FakeHost(Rc<RefCell<HostState>>);

impl FakeHost {
    pub fn with_ratio(ratio: f64) -> Self {
        let host = Self::default();
        host.0.borrow_mut().ratio = Some(ratio);
        host
    }

    pub fn set_ratio(&self, ratio: Option<f64>) {
        self.0.borrow_mut().ratio = ratio;
    }

    /// Log `subscribe` and `unsubscribe` into `surface`'s call log.
    pub fn record_into(&self, surface: &FakeSurface) {
        self.0.borrow_mut().log = Some(surface.clone());
    }

    pub fn listener_count(&self) -> usize {
        self.0.borrow().listeners.len()
    }

    pub fn fire_resize(&self) {
        let listeners: Vec<Listener> = self
            .0
            .borrow()
            .listeners
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            (*listener.borrow_mut())();
        }
    }
}

impl Host for FakeHost {
    fn device_pixel_ratio(&self) -> Option<f64> {
        self.0.borrow().ratio
    }

    fn on_resize(&self, callback: Box<dyn FnMut()>) -> Unsubscribe {
        let (id, log) = {
            let mut state = self.0.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            state.listeners.push((id, Rc::new(RefCell::new(callback))));
            (id, state.log.clone())
        };
        if let Some(log) = &log {
            log.log("subscribe");
        }
        let state = Rc::downgrade(&self.0);
        Box::new(move || {
            if let Some(state) = state.upgrade() {
                state.borrow_mut().listeners.retain(|(l, _)| *l != id);
            }
            if let Some(log) = log {
                log.log("unsubscribe");
            }
        })
    }
}
