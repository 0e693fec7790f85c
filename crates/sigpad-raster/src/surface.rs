//! In-memory canvas.
//!
//! Mirrors the parts of an HTML canvas the pad relies on: assigning either
//! buffer dimension reallocates a transparent buffer and resets the context
//! transform, and `scale` accumulates onto the transform.

use image::{Rgba, RgbaImage};
use sigpad_core::Surface;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// Canvas default buffer size.
pub const DEFAULT_BUFFER: (u32, u32) = (300, 150);

/// Largest buffer side browsers allocate.
pub const MAX_BUFFER_SIDE: u32 = 32_767;

/// Largest buffer area, in pixels.
pub const MAX_BUFFER_AREA: u64 = 268_435_456;

/// Fit a requested buffer size within [`MAX_BUFFER_SIDE`] and
/// [`MAX_BUFFER_AREA`]. Over the area limit, the side named by `resized`
/// (0 for width, 1 for height) gives way.
fn clamp_buffer(width: u32, height: u32, resized: usize) -> (u32, u32) {
    let mut size = [width.min(MAX_BUFFER_SIDE), height.min(MAX_BUFFER_SIDE)];
    let other = size[1 - resized];
    if other > 0 && u64::from(size[resized]) * u64::from(other) > MAX_BUFFER_AREA {
        size[resized] =
            u32::try_from(MAX_BUFFER_AREA / u64::from(other)).unwrap_or(MAX_BUFFER_SIDE);
    }
    if (size[0], size[1]) != (width, height) {
        log::warn!(
            "buffer {width}x{height} exceeds canvas limits; using {}x{}",
            size[0],
            size[1]
        );
    }
    (size[0], size[1])
}

struct Canvas {
    display: (f64, f64),
    pixels: RgbaImage,
    transform: f64,
}

/// Shared handle to an in-memory canvas. Clones refer to the same canvas.
#[derive(Clone)]
pub struct MemorySurface(Rc<RefCell<Canvas>>);

impl PartialEq for MemorySurface {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for MemorySurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let canvas = self.0.borrow();
        f.debug_struct("MemorySurface")
            .field("display", &canvas.display)
            .field("buffer", &canvas.pixels.dimensions())
            .field("transform", &canvas.transform)
            .finish()
    }
}

impl MemorySurface {
    /// A surface laid out at `display_width` x `display_height` with the
    /// default 300x150 buffer.
    pub fn new(display_width: f64, display_height: f64) -> Self {
        Self::with_buffer(display_width, display_height, DEFAULT_BUFFER.0, DEFAULT_BUFFER.1)
    }

    pub fn with_buffer(display_width: f64, display_height: f64, width: u32, height: u32) -> Self {
        let (width, height) = clamp_buffer(width, height, 0);
        Self(Rc::new(RefCell::new(Canvas {
            display: (display_width, display_height),
            pixels: RgbaImage::new(width, height),
            transform: 1.0,
        })))
    }

    /// Change the layout size, as a page reflow would.
    pub fn set_display_size(&self, width: f64, height: f64) {
        self.0.borrow_mut().display = (width, height);
    }

    /// Current uniform context scale.
    pub fn transform(&self) -> f64 {
        self.0.borrow().transform
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.0.borrow().pixels.get_pixel_checked(x, y).copied()
    }

    pub fn pixels(&self) -> Ref<'_, RgbaImage> {
        Ref::map(self.0.borrow(), |c| &c.pixels)
    }

    pub fn pixels_mut(&self) -> RefMut<'_, RgbaImage> {
        RefMut::map(self.0.borrow_mut(), |c| &mut c.pixels)
    }

    /// Number of pixels with non-zero alpha.
    pub fn painted_pixels(&self) -> usize {
        self.0.borrow().pixels.pixels().filter(|p| p[3] != 0).count()
    }
}

impl Surface for MemorySurface {
    fn display_size(&self) -> (f64, f64) {
        self.0.borrow().display
    }

    fn buffer_size(&self) -> (u32, u32) {
        self.0.borrow().pixels.dimensions()
    }

    fn set_buffer_width(&self, width: u32) {
        let mut canvas = self.0.borrow_mut();
        let (width, height) = clamp_buffer(width, canvas.pixels.height(), 0);
        canvas.pixels = RgbaImage::new(width, height);
        canvas.transform = 1.0;
    }

    fn set_buffer_height(&self, height: u32) {
        let mut canvas = self.0.borrow_mut();
        let (width, height) = clamp_buffer(canvas.pixels.width(), height, 1);
        canvas.pixels = RgbaImage::new(width, height);
        canvas.transform = 1.0;
    }

    fn scale_context(&self, sx: f64, _sy: f64) {
        self.0.borrow_mut().transform *= sx;
    }
}
