//! Headless drawing engine.
//!
//! `RasterPad` implements the [`DrawingEngine`] contract over a
//! [`MemorySurface`]. Pointer samples arrive in display pixels and are mapped
//! into the buffer through the surface's context transform.
//!
//! ## Stroke pipeline
//!
//! | Step | Rule |
//! |------|------|
//! | Capture | samples are ignored while capture is disabled |
//! | Throttle | samples closer than `throttle` ms to the last accepted one are dropped |
//! | Distance | samples within `min_distance` px of the last point are dropped |
//! | Width | `max(max_width / (v + 1), min_width)` with `v` velocity-filtered |
//! | Dot | a stroke with a single point becomes a `dot_size` disc |

use crate::codec::{decode_data_url, encode_data_url};
use crate::paint::{fill, stamp_disc, stamp_segment};
use crate::stroke::{PenSettings, Stroke, StrokePoint};
use crate::surface::MemorySurface;
use image::imageops::{self, FilterType};
use kurbo::Affine;
use sigpad_core::{
    DrawingEngine, EngineOptions, ImageFormat, PadError, Result, StrokeEvent, Surface,
};

/// Per-stroke smoothing state.
struct ActiveStroke {
    last_velocity: f64,
    last_width: f64,
}

pub struct RasterPad {
    surface: MemorySurface,
    options: EngineOptions,
    settings: PenSettings,
    capturing: bool,
    strokes: Vec<Stroke>,
    active: Option<ActiveStroke>,
    /// Set once an image has been drawn via `import_image`.
    has_import: bool,
}

impl RasterPad {
    pub fn settings(&self) -> &PenSettings {
        &self.settings
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn surface(&self) -> &MemorySurface {
        &self.surface
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// `true` when nothing has been drawn or imported since the last clear.
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && !self.has_import
    }

    /// Begin a stroke. Returns `false` if capture is disabled.
    pub fn pointer_down(&mut self, x: f64, y: f64, time: f64) -> bool {
        if !self.capturing {
            return false;
        }
        if self.active.is_some() {
            self.pointer_up(x, y, time);
        }

        if let Some(cb) = self.options.on_begin() {
            cb.call(&StrokeEvent { x, y });
        }
        self.strokes
            .push(Stroke::new(self.settings.pen_color, StrokePoint::new(x, y, time)));
        self.active = Some(ActiveStroke {
            last_velocity: 0.0,
            last_width: (self.settings.min_width + self.settings.max_width) / 2.0,
        });
        true
    }

    /// Extend the current stroke. Returns `true` if a segment was drawn.
    pub fn pointer_move(&mut self, x: f64, y: f64, time: f64) -> bool {
        if !self.capturing {
            return false;
        }
        self.extend(StrokePoint::new(x, y, time), false)
    }

    /// Finish the current stroke. Returns `false` if none was in progress.
    pub fn pointer_up(&mut self, x: f64, y: f64, time: f64) -> bool {
        if self.active.is_none() {
            return false;
        }
        self.extend(StrokePoint::new(x, y, time), true);
        self.active = None;

        if let Some(stroke) = self.strokes.last()
            && stroke.is_dot()
        {
            let point = stroke.points[0];
            let color = stroke.color;
            self.draw_dot(point, color);
        }
        if let Some(cb) = self.options.on_end() {
            cb.call(&StrokeEvent { x, y });
        }
        true
    }

    fn extend(&mut self, point: StrokePoint, is_end: bool) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let Some(stroke) = self.strokes.last_mut() else {
            return false;
        };
        let Some(last) = stroke.last().copied() else {
            return false;
        };

        let throttled = self.settings.throttle > 0.0
            && point.time - last.time < self.settings.throttle
            && !is_end;
        if throttled || point.distance_to(&last) <= self.settings.min_distance {
            return false;
        }

        let velocity = self
            .settings
            .filter_velocity(point.velocity_from(&last), active.last_velocity);
        let width = self.settings.stroke_width(velocity);
        let from_width = active.last_width;
        active.last_velocity = velocity;
        active.last_width = width;

        stroke.points.push(point);
        let color = stroke.color;

        let scale = self.surface.transform();
        let to_buffer = Affine::scale(scale);
        let mut pixels = self.surface.pixels_mut();
        stamp_segment(
            &mut pixels,
            to_buffer * last.position(),
            to_buffer * point.position(),
            from_width * scale / 2.0,
            width * scale / 2.0,
            color,
        );
        true
    }

    fn draw_dot(&mut self, point: StrokePoint, color: image::Rgba<u8>) {
        let scale = self.surface.transform();
        let radius = self.settings.dot_size * scale / 2.0;
        stamp_disc(
            &mut self.surface.pixels_mut(),
            Affine::scale(scale) * point.position(),
            radius,
            color,
        );
    }
}

impl DrawingEngine for RasterPad {
    type Surface = MemorySurface;

    fn create(surface: &MemorySurface, options: &EngineOptions) -> Result<Self> {
        let mut pad = Self {
            surface: surface.clone(),
            options: options.clone(),
            settings: PenSettings::from_options(options),
            capturing: false,
            strokes: Vec::new(),
            active: None,
            has_import: false,
        };
        pad.clear();
        Ok(pad)
    }

    fn enable_capture(&mut self) {
        self.capturing = true;
    }

    fn disable_capture(&mut self) {
        self.capturing = false;
        self.active = None;
    }

    fn clear(&mut self) {
        fill(&mut self.surface.pixels_mut(), self.settings.background_color);
        self.strokes.clear();
        self.active = None;
        self.has_import = false;
    }

    fn export_image(&self, image_type: &str, quality: f64) -> Result<String> {
        let format = ImageFormat::from_mime(image_type)
            .ok_or_else(|| PadError::Engine(format!("unsupported image type: {image_type}")))?;
        encode_data_url(&self.surface.pixels(), format, quality)
    }

    /// Draws the decoded image stretched over the whole buffer, on top of
    /// whatever is already there.
    fn import_image(&mut self, data_url: &str) -> Result<()> {
        let decoded = decode_data_url(data_url)?;
        let (width, height) = self.surface.buffer_size();
        if width == 0 || height == 0 {
            return Ok(());
        }
        let scaled = if decoded.dimensions() == (width, height) {
            decoded
        } else {
            imageops::resize(&decoded, width, height, FilterType::Triangle)
        };
        imageops::overlay(&mut *self.surface.pixels_mut(), &scaled, 0, 0);
        self.has_import = true;
        log::debug!("imported {width}x{height} image");
        Ok(())
    }

    fn merge_options(&mut self, options: &EngineOptions) {
        self.options.merge(options);
        self.settings = PenSettings::from_options(&self.options);
    }
}
