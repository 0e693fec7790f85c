//! Stroke model and pen settings.

use crate::paint::{BLACK, TRANSPARENT, parse_css_color};
use image::Rgba;
use kurbo::Point;
use sigpad_core::EngineOptions;
use smallvec::SmallVec;

/// A sampled pointer position in display pixels with a millisecond timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokePoint {
    pub x: f64,
    pub y: f64,
    pub time: f64,
}

impl StrokePoint {
    pub fn new(x: f64, y: f64, time: f64) -> Self {
        Self { x, y, time }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn distance_to(&self, other: &StrokePoint) -> f64 {
        self.position().distance(other.position())
    }

    /// Pixels per millisecond from `earlier` to `self`; 0 with no elapsed time.
    pub fn velocity_from(&self, earlier: &StrokePoint) -> f64 {
        let elapsed = self.time - earlier.time;
        if elapsed > 0.0 {
            self.distance_to(earlier) / elapsed
        } else {
            0.0
        }
    }
}

/// One pen-down to pen-up gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: Rgba<u8>,
    pub points: SmallVec<[StrokePoint; 16]>,
}

impl Stroke {
    pub fn new(color: Rgba<u8>, first: StrokePoint) -> Self {
        let mut points = SmallVec::new();
        points.push(first);
        Self { color, points }
    }

    pub fn last(&self) -> Option<&StrokePoint> {
        self.points.last()
    }

    pub fn is_dot(&self) -> bool {
        self.points.len() == 1
    }
}

/// Resolved pen configuration with drawing-engine defaults filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct PenSettings {
    /// Diameter of a single-tap dot.
    pub dot_size: f64,
    pub min_width: f64,
    pub max_width: f64,
    /// Minimum milliseconds between accepted samples; 0 disables.
    pub throttle: f64,
    /// Samples closer than this to the previous one are dropped.
    pub min_distance: f64,
    pub velocity_filter_weight: f64,
    pub pen_color: Rgba<u8>,
    pub background_color: Rgba<u8>,
}

impl Default for PenSettings {
    fn default() -> Self {
        Self {
            dot_size: 1.5,
            min_width: 0.5,
            max_width: 2.5,
            throttle: 16.0,
            min_distance: 5.0,
            velocity_filter_weight: 0.7,
            pen_color: BLACK,
            background_color: TRANSPARENT,
        }
    }
}

impl PenSettings {
    /// Resolve engine options over the defaults. Unparseable colors keep
    /// the default.
    pub fn from_options(options: &EngineOptions) -> Self {
        let defaults = Self::default();
        let min_width = options.min_width().unwrap_or(defaults.min_width);
        let max_width = options.max_width().unwrap_or(defaults.max_width);

        Self {
            dot_size: options
                .dot_size()
                .unwrap_or((min_width + max_width) / 2.0),
            min_width,
            max_width,
            throttle: options.throttle().unwrap_or(defaults.throttle),
            min_distance: options.min_distance().unwrap_or(defaults.min_distance),
            velocity_filter_weight: options
                .velocity_filter_weight()
                .unwrap_or(defaults.velocity_filter_weight),
            pen_color: resolve_color(options.pen_color(), defaults.pen_color),
            background_color: resolve_color(options.background_color(), defaults.background_color),
        }
    }

    /// Line width for a filtered velocity: fast strokes thin out toward
    /// `min_width`.
    pub fn stroke_width(&self, velocity: f64) -> f64 {
        (self.max_width / (velocity + 1.0)).max(self.min_width)
    }

    /// Exponential smoothing of the velocity between samples.
    pub fn filter_velocity(&self, velocity: f64, previous: f64) -> f64 {
        self.velocity_filter_weight * velocity + (1.0 - self.velocity_filter_weight) * previous
    }
}

fn resolve_color(css: Option<&str>, fallback: Rgba<u8>) -> Rgba<u8> {
    match css {
        Some(css) => parse_css_color(css).unwrap_or_else(|| {
            log::warn!("unrecognized color {css:?}; using default");
            fallback
        }),
        None => fallback,
    }
}
