//! Sigpad core — binds a freehand signature surface to a host's
//! mount/unmount cycle.
//!
//! - [`options`] splits one configuration mapping into drawing-engine
//!   options and plain surface attributes.
//! - [`sizing`] normalizes a surface's backing buffer for the display
//!   scale factor.
//! - [`pad`] is the lifecycle controller (bind, resize reaction, teardown,
//!   clear / save / update).
//! - [`display`] is the read-only playback binder for saved signatures.
//!
//! The drawing engine itself is a collaborator behind [`engine::DrawingEngine`].

pub mod display;
pub mod engine;
pub mod error;
pub mod options;
pub mod pad;
pub mod sizing;

#[cfg(test)]
pub(crate) mod testing;

pub use display::SignatureDisplay;
pub use engine::{DEFAULT_IMAGE_QUALITY, DrawingEngine, ImageFormat};
pub use error::{PadError, Result};
pub use options::{
    Callback, Config, EngineOption, EngineOptions, OptionValue, StrokeEvent, SurfaceOptions,
    partition,
};
pub use pad::{PadState, SignaturePad};
pub use sizing::{Host, Surface, Unsubscribe, effective_scale, normalize};
