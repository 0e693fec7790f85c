//! The drawing-engine collaborator contract.
//!
//! Stroke capture, smoothing, rendering and image encoding all live behind
//! [`DrawingEngine`]. The controller only constructs, toggles, clears,
//! exports, imports and reconfigures it.

use crate::error::Result;
use crate::options::EngineOptions;
use crate::sizing::Surface;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default lossy export quality.
pub const DEFAULT_IMAGE_QUALITY: f64 = 0.92;

/// Image encodings a drawing engine is expected to support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ImageFormat {
    #[default]
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/webp")]
    Webp,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 3] = [Self::Png, Self::Jpeg, Self::Webp];

    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.mime() == mime)
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// A stateful freehand-drawing binding over one surface.
///
/// A binding is tied to the surface it was created with for its whole
/// life; a different surface needs a new binding.
pub trait DrawingEngine: Sized + 'static {
    type Surface: Surface;

    /// Bind a new engine to `surface`.
    fn create(surface: &Self::Surface, options: &EngineOptions) -> Result<Self>;

    /// Start listening for pointer input on the surface.
    fn enable_capture(&mut self);

    /// Stop listening for pointer input.
    fn disable_capture(&mut self);

    /// Erase all strokes and repaint the background.
    fn clear(&mut self);

    /// Encode the current drawing as a data URI. `image_type` and `quality`
    /// are forwarded unvalidated; unsupported values fail here.
    fn export_image(&self, image_type: &str, quality: f64) -> Result<String>;

    /// Draw a previously exported data URI onto the surface.
    fn import_image(&mut self, data_url: &str) -> Result<()>;

    /// Overwrite the engine's options with every option present in `options`.
    fn merge_options(&mut self, options: &EngineOptions);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_roundtrip() {
        for format in ImageFormat::ALL {
            assert_eq!(ImageFormat::from_mime(format.mime()), Some(format));
        }
        assert_eq!(ImageFormat::from_mime("image/svg+xml"), None);
        assert_eq!(ImageFormat::default(), ImageFormat::Png);
    }

    #[test]
    fn serde_uses_mime_strings() {
        let json = serde_json::to_string(&ImageFormat::Jpeg).unwrap();
        assert_eq!(json, r#""image/jpeg""#);
        let back: ImageFormat = serde_json::from_str(r#""image/webp""#).unwrap();
        assert_eq!(back, ImageFormat::Webp);
    }
}
