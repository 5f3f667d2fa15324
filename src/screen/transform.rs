// Pixel transform - maps a source color to the color actually written
//
// Every draw routine except clear and fill passes each candidate pixel through
// `pixel_transform`. Returning None means the pixel is not written.

use super::{ColorMode, VirtualScreen};
use crate::color::Color4u;

/// Resolve the color written at `(x, y)` for a source color
///
/// Transparent source pixels are never written, whatever the color mode.
#[inline]
pub fn pixel_transform(screen: &VirtualScreen, color: Color4u, x: i32, y: i32) -> Option<Color4u> {
    if color.is_transparent() {
        return None;
    }

    match screen.color_mode() {
        ColorMode::FullRgb => Some(color),
        ColorMode::YAxisBanded => screen.band_color(y),
        ColorMode::XAxisBanded => screen.band_color(x),
        ColorMode::Bitmaps => Some(screen.bitmap_color()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::colors;
    use crate::math::Vec2i;
    use crate::screen::ColorBand;

    fn screen() -> VirtualScreen {
        VirtualScreen::new(Vec2i::new(16, 16))
    }

    #[test]
    fn test_full_rgb_passthrough() {
        let screen = screen();
        assert_eq!(pixel_transform(&screen, colors::CYAN, 3, 4), Some(colors::CYAN));
    }

    #[test]
    fn test_transparent_never_written() {
        let mut screen = screen();
        let key = Color4u::new(200, 10, 10, 0);
        for mode in [
            ColorMode::FullRgb,
            ColorMode::YAxisBanded,
            ColorMode::XAxisBanded,
            ColorMode::Bitmaps,
        ] {
            screen.set_color_mode(mode);
            assert_eq!(pixel_transform(&screen, key, 1, 1), None, "{:?}", mode);
        }
    }

    #[test]
    fn test_y_banded() {
        let mut screen = screen();
        screen.set_color_mode(ColorMode::YAxisBanded);
        screen.set_color_bands(&[
            ColorBand::new(4, colors::RED),
            ColorBand::new(10, colors::GREEN),
        ]);
        assert_eq!(pixel_transform(&screen, colors::WHITE, 15, 0), Some(colors::RED));
        assert_eq!(pixel_transform(&screen, colors::WHITE, 15, 4), Some(colors::RED));
        assert_eq!(pixel_transform(&screen, colors::WHITE, 0, 5), Some(colors::GREEN));
        assert_eq!(pixel_transform(&screen, colors::WHITE, 0, 11), None);
    }

    #[test]
    fn test_x_banded() {
        let mut screen = screen();
        screen.set_color_mode(ColorMode::XAxisBanded);
        screen.set_color_bands(&[ColorBand::new(7, colors::BLUE)]);
        assert_eq!(pixel_transform(&screen, colors::WHITE, 7, 15), Some(colors::BLUE));
        assert_eq!(pixel_transform(&screen, colors::WHITE, 8, 0), None);
    }

    #[test]
    fn test_bitmap_color() {
        let mut screen = screen();
        screen.set_color_mode(ColorMode::Bitmaps);
        screen.set_bitmap_color(colors::YELLOW);
        assert_eq!(pixel_transform(&screen, colors::RED, 0, 0), Some(colors::YELLOW));
    }
}
