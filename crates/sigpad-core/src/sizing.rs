//! Surface sizing for high-density displays.
//!
//! A surface has two sizes: its layout size in display pixels and its
//! backing buffer in physical pixels. [`normalize`] grows the buffer by the
//! display scale factor and scales the 2-D context back down so drawing code
//! keeps working in display pixels.

/// A drawable 2-D element.
///
/// Implementations are handles: cloning shares the same element, and
/// equality is element identity. Mutators take `&self` for that reason.
pub trait Surface: Clone + PartialEq + 'static {
    /// Layout size in display pixels (`offsetWidth`, `offsetHeight`).
    fn display_size(&self) -> (f64, f64);

    /// Backing buffer size in physical pixels.
    fn buffer_size(&self) -> (u32, u32);

    /// Resize the buffer width. Discards the current buffer contents.
    fn set_buffer_width(&self, width: u32);

    /// Resize the buffer height. Discards the current buffer contents.
    fn set_buffer_height(&self, height: u32);

    /// Apply a scale to the 2-D drawing context transform.
    fn scale_context(&self, sx: f64, sy: f64);
}

/// Detaches a subscription when called.
pub type Unsubscribe = Box<dyn FnOnce()>;

/// The environment that hosts the surface.
pub trait Host: 'static {
    /// Current ratio of physical to display pixels, if the host reports one.
    /// Read fresh on every sizing pass since zoom can change it.
    fn device_pixel_ratio(&self) -> Option<f64>;

    /// Register a viewport-resize listener.
    fn on_resize(&self, callback: Box<dyn FnMut()>) -> Unsubscribe;
}

/// Scale actually used for a reported device pixel ratio.
///
/// Missing, zero or NaN ratios count as 1, and the result is clamped to at
/// least 1: some browsers report ratios below 1 when zoomed out, which would
/// leave part of the buffer uncleared.
pub fn effective_scale(device_pixel_ratio: Option<f64>) -> f64 {
    let ratio = device_pixel_ratio
        .filter(|r| *r != 0.0 && !r.is_nan())
        .unwrap_or(1.0);
    ratio.max(1.0)
}

/// Size the surface buffer for the current display scale.
///
/// A no-op when both dimensions are pinned by the caller (see
/// [`SurfaceOptions::pins_height`](crate::SurfaceOptions::pins_height)).
/// Otherwise each unpinned buffer dimension becomes `display * scale`, and
/// the context is scaled by `scale`. Returns the scale applied, or `None`
/// for the no-op.
///
/// Resizing the buffer wipes it, so callers clear their drawing engine
/// afterwards.
pub fn normalize<S: Surface>(
    height_pinned: bool,
    width_pinned: bool,
    surface: &S,
    device_pixel_ratio: Option<f64>,
) -> Option<f64> {
    if height_pinned && width_pinned {
        log::trace!("surface has fixed dimensions; skipping scale");
        return None;
    }

    let scale = effective_scale(device_pixel_ratio);
    let (display_width, display_height) = surface.display_size();

    if !width_pinned {
        surface.set_buffer_width(to_buffer_px(display_width * scale));
    }
    if !height_pinned {
        surface.set_buffer_height(to_buffer_px(display_height * scale));
    }
    surface.scale_context(scale, scale);

    log::trace!(
        "normalized surface {display_width}x{display_height} @ {scale} -> {:?}",
        surface.buffer_size()
    );
    Some(scale)
}

/// Buffer dimensions are unsigned integers; fractions truncate.
fn to_buffer_px(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSurface;
    use pretty_assertions::assert_eq;

    #[test]
    fn scale_clamps_to_one() {
        assert_eq!(effective_scale(Some(0.5)), 1.0);
        assert_eq!(effective_scale(Some(1.0)), 1.0);
        assert_eq!(effective_scale(Some(2.0)), 2.0);
        assert_eq!(effective_scale(Some(0.0)), 1.0);
        assert_eq!(effective_scale(Some(f64::NAN)), 1.0);
        assert_eq!(effective_scale(None), 1.0);
    }

    #[test]
    fn both_dimensions_pinned_is_noop() {
        let surface = FakeSurface::new(400.0, 200.0);
        surface.set_buffer_width(300);
        surface.set_buffer_height(150);
        surface.reset_log();

        assert_eq!(normalize(true, true, &surface, Some(3.0)), None);
        assert_eq!(surface.buffer_size(), (300, 150));
        assert!(surface.scales().is_empty());
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn unpinned_dimensions_follow_display_size() {
        let surface = FakeSurface::new(400.0, 200.0);

        assert_eq!(normalize(false, false, &surface, Some(2.0)), Some(2.0));
        assert_eq!(surface.buffer_size(), (800, 400));
        assert_eq!(surface.scales(), vec![2.0]);
    }

    #[test]
    fn pinned_width_keeps_buffer_width() {
        let surface = FakeSurface::new(400.0, 200.0);
        surface.set_buffer_width(320);

        normalize(false, true, &surface, Some(2.0));
        assert_eq!(surface.buffer_size(), (320, 400));
        assert_eq!(surface.scales(), vec![2.0]);
    }

    #[test]
    fn pinned_height_keeps_buffer_height() {
        let surface = FakeSurface::new(100.0, 50.0);

        assert_eq!(normalize(true, false, &surface, None), Some(1.0));
        assert_eq!(surface.buffer_size(), (100, 150));
    }

    #[test]
    fn fractional_ratio_below_one_uses_one() {
        let surface = FakeSurface::new(640.0, 480.0);

        normalize(false, false, &surface, Some(0.5));
        assert_eq!(surface.buffer_size(), (640, 480));
        assert_eq!(surface.scales(), vec![1.0]);
    }

    #[test]
    fn fractional_buffer_truncates() {
        let surface = FakeSurface::new(100.5, 33.3);

        normalize(false, false, &surface, Some(1.5));
        assert_eq!(surface.buffer_size(), (150, 49));
    }
}
