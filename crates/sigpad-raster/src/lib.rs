//! Headless reference implementation of the sigpad collaborators.
//!
//! - [`MemorySurface`]: a canvas-like handle over an RGBA buffer.
//! - [`RasterPad`]: a [`sigpad_core::DrawingEngine`] that turns pointer input
//!   into variable-width strokes and encodes/decodes data URIs.
//! - [`StaticHost`]: a host whose pixel ratio and resizes are driven by hand.

pub mod codec;
pub mod engine;
pub mod host;
pub mod paint;
pub mod stroke;
pub mod surface;

pub use engine::RasterPad;
pub use host::StaticHost;
pub use stroke::{PenSettings, Stroke, StrokePoint};
pub use surface::MemorySurface;
