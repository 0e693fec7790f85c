//! Color parsing and pixel painting primitives.

use image::{Pixel, Rgba, RgbaImage};
use kurbo::Point;
use peniko::color::{Srgb, parse_color};

pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Parse a CSS color (`#hex`, `rgb()`, `rgba()`, named colors).
pub fn parse_css_color(css: &str) -> Option<Rgba<u8>> {
    let color = parse_color(css.trim()).ok()?.to_alpha_color::<Srgb>();
    let rgba = color.to_rgba8();
    Some(Rgba([rgba.r, rgba.g, rgba.b, rgba.a]))
}

/// Overwrite every pixel with `color`.
pub fn fill(buffer: &mut RgbaImage, color: Rgba<u8>) {
    for pixel in buffer.pixels_mut() {
        *pixel = color;
    }
}

/// Paint a filled disc centred on `center` (buffer pixels). Pixels whose
/// centre lies inside the radius are blended source-over.
pub fn stamp_disc(buffer: &mut RgbaImage, center: Point, radius: f64, color: Rgba<u8>) {
    let radius = radius.max(0.5);
    let (width, height) = buffer.dimensions();
    if width == 0 || height == 0 || center.x + radius < 0.0 || center.y + radius < 0.0 {
        return;
    }

    let min_x = (center.x - radius).floor().max(0.0) as u32;
    let min_y = (center.y - radius).floor().max(0.0) as u32;
    let max_x = ((center.x + radius).ceil().max(0.0) as u32).min(width - 1);
    let max_y = ((center.y + radius).ceil().max(0.0) as u32).min(height - 1);

    let r2 = radius * radius;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            if (px - center).hypot2() <= r2 {
                buffer.get_pixel_mut(x, y).blend(&color);
            }
        }
    }
}

/// Stamp discs along a segment, interpolating the radius, so the result
/// reads as one continuous variable-width line.
pub fn stamp_segment(
    buffer: &mut RgbaImage,
    from: Point,
    to: Point,
    from_radius: f64,
    to_radius: f64,
    color: Rgba<u8>,
) {
    let steps = (from.distance(to) / 0.5).ceil().max(1.0) as u32;
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let radius = from_radius + (to_radius - from_radius) * t;
        stamp_disc(buffer, from.lerp(to, t), radius, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_common_css_colors() {
        assert_eq!(parse_css_color("red"), Some(Rgba([255, 0, 0, 255])));
        assert_eq!(parse_css_color("#00ff00"), Some(Rgba([0, 255, 0, 255])));
        assert_eq!(parse_css_color("rgb(0,0,0)"), Some(BLACK));
        assert_eq!(parse_css_color("rgba(0,0,0,0)"), Some(TRANSPARENT));
        assert_eq!(parse_css_color("not-a-color"), None);
    }

    #[test]
    fn disc_paints_only_inside_radius() {
        let mut buffer = RgbaImage::new(10, 10);
        stamp_disc(&mut buffer, Point::new(5.0, 5.0), 2.0, BLACK);

        assert_eq!(*buffer.get_pixel(5, 5), BLACK);
        assert_eq!(*buffer.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*buffer.get_pixel(9, 9), TRANSPARENT);
    }

    #[test]
    fn disc_outside_buffer_is_clipped() {
        let mut buffer = RgbaImage::new(4, 4);
        stamp_disc(&mut buffer, Point::new(-10.0, -10.0), 2.0, BLACK);
        stamp_disc(&mut buffer, Point::new(40.0, 40.0), 2.0, BLACK);
        assert!(buffer.pixels().all(|p| *p == TRANSPARENT));
    }

    #[test]
    fn segment_connects_endpoints() {
        let mut buffer = RgbaImage::new(20, 5);
        stamp_segment(
            &mut buffer,
            Point::new(1.0, 2.5),
            Point::new(18.0, 2.5),
            1.0,
            1.0,
            BLACK,
        );
        for x in 1..18 {
            assert_eq!(buffer.get_pixel(x, 2)[3], 255, "gap at x={x}");
        }
    }
}
