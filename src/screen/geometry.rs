// Screen geometry - pixel size and window position of a virtual screen
//
// Window space has its origin at the bottom-left corner of the window, in real
// (device) pixels. A screen of resolution R drawn at pixel size P covers a
// window area of P*R starting at its position.

use super::{PositionMode, SizeMode};
use crate::config::PixelSizeRange;
use crate::math::Vec2i;

/// Largest whole pixel size at which the screen still fits the window
///
/// Never less than 1, so a window smaller than the resolution still yields a
/// drawable (clipped) screen.
pub fn auto_max_pixel_size(window: Vec2i, resolution: Vec2i) -> i32 {
    let fit_x = window.x / resolution.x;
    let fit_y = window.y / resolution.y;
    fit_x.min(fit_y).max(1)
}

/// Resolve the pixel size for a size mode
pub fn pixel_size(
    mode: SizeMode,
    manual: i32,
    window: Vec2i,
    resolution: Vec2i,
    range: PixelSizeRange,
) -> i32 {
    match mode {
        SizeMode::Manual => range.clamp(manual),
        SizeMode::AutoMin => 1,
        SizeMode::AutoMax => auto_max_pixel_size(window, resolution),
    }
}

/// Position that centers the screen in the window, clamped to `[0, window]`
pub fn center_position(window: Vec2i, resolution: Vec2i, pixel_size: i32) -> Vec2i {
    let extent = resolution * pixel_size;
    Vec2i::new(
        ((window.x - extent.x) / 2).clamp(0, window.x.max(0)),
        ((window.y - extent.y) / 2).clamp(0, window.y.max(0)),
    )
}

/// Resolve the window position of the screen's bottom-left corner
pub fn screen_position(
    mode: PositionMode,
    manual: Vec2i,
    window: Vec2i,
    resolution: Vec2i,
    pixel_size: i32,
) -> Vec2i {
    let extent = resolution * pixel_size;
    match mode {
        PositionMode::Manual => manual,
        PositionMode::Center => center_position(window, resolution, pixel_size),
        PositionMode::TopLeft => Vec2i::new(0, window.y - extent.y),
        PositionMode::TopRight => Vec2i::new(window.x - extent.x, window.y - extent.y),
        PositionMode::BottomLeft => Vec2i::ZERO,
        PositionMode::BottomRight => Vec2i::new(window.x - extent.x, 0),
    }
}

/// Fill `positions` with the device position of every virtual pixel
///
/// Positions are the centers of each pixel's `pixel_size` square, stored
/// row-major from the bottom row.
pub fn layout_pixels(positions: &mut [Vec2i], resolution: Vec2i, origin: Vec2i, pixel_size: i32) {
    let center = pixel_size / 2;
    for (row, line) in positions
        .chunks_exact_mut(resolution.x as usize)
        .enumerate()
    {
        let y = origin.y + row as i32 * pixel_size + center;
        for (col, position) in line.iter_mut().enumerate() {
            *position = Vec2i::new(origin.x + col as i32 * pixel_size + center, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_max_pixel_size() {
        let res = Vec2i::new(224, 256);
        assert_eq!(auto_max_pixel_size(Vec2i::new(896, 1024), res), 4);
        assert_eq!(auto_max_pixel_size(Vec2i::new(1000, 1024), res), 4);
        assert_eq!(auto_max_pixel_size(Vec2i::new(1920, 600), res), 2);
        assert_eq!(auto_max_pixel_size(Vec2i::new(100, 100), res), 1);
    }

    #[test]
    fn test_auto_max_matches_formula() {
        for wx in [1, 7, 64, 333, 1280] {
            for wy in [1, 9, 48, 720] {
                for (rx, ry) in [(1, 1), (16, 9), (224, 256), (320, 200)] {
                    let expected = (wx / rx).min(wy / ry).max(1);
                    let got = auto_max_pixel_size(Vec2i::new(wx, wy), Vec2i::new(rx, ry));
                    assert_eq!(got, expected, "window {}x{} res {}x{}", wx, wy, rx, ry);
                }
            }
        }
    }

    #[test]
    fn test_pixel_size_modes() {
        let window = Vec2i::new(640, 480);
        let res = Vec2i::new(160, 120);
        let range = PixelSizeRange { min: 1, max: 8 };
        assert_eq!(pixel_size(SizeMode::AutoMin, 3, window, res, range), 1);
        assert_eq!(pixel_size(SizeMode::AutoMax, 3, window, res, range), 4);
        assert_eq!(pixel_size(SizeMode::Manual, 3, window, res, range), 3);
        assert_eq!(pixel_size(SizeMode::Manual, 20, window, res, range), 8);
        assert_eq!(pixel_size(SizeMode::Manual, 0, window, res, range), 1);
    }

    #[test]
    fn test_center_position() {
        let res = Vec2i::new(224, 256);
        assert_eq!(center_position(Vec2i::new(896, 1024), res, 4), Vec2i::ZERO);
        assert_eq!(center_position(Vec2i::new(1000, 1100), res, 4), Vec2i::new(52, 38));
        // Screen larger than the window clamps to the origin
        assert_eq!(center_position(Vec2i::new(100, 100), res, 1), Vec2i::ZERO);
    }

    #[test]
    fn test_corner_positions() {
        let window = Vec2i::new(800, 600);
        let res = Vec2i::new(100, 50);
        let at = |mode| screen_position(mode, Vec2i::new(7, 9), window, res, 2);
        assert_eq!(at(PositionMode::Manual), Vec2i::new(7, 9));
        assert_eq!(at(PositionMode::BottomLeft), Vec2i::new(0, 0));
        assert_eq!(at(PositionMode::BottomRight), Vec2i::new(600, 0));
        assert_eq!(at(PositionMode::TopLeft), Vec2i::new(0, 500));
        assert_eq!(at(PositionMode::TopRight), Vec2i::new(600, 500));
        assert_eq!(at(PositionMode::Center), Vec2i::new(300, 250));
    }

    #[test]
    fn test_layout_pixels() {
        let res = Vec2i::new(3, 2);
        let mut positions = vec![Vec2i::ZERO; 6];
        layout_pixels(&mut positions, res, Vec2i::new(10, 20), 4);
        assert_eq!(positions[0], Vec2i::new(12, 22));
        assert_eq!(positions[2], Vec2i::new(20, 22));
        assert_eq!(positions[3], Vec2i::new(12, 26));
        assert_eq!(positions[5], Vec2i::new(20, 26));
    }

    #[test]
    fn test_layout_odd_pixel_size() {
        let mut positions = vec![Vec2i::ZERO; 2];
        layout_pixels(&mut positions, Vec2i::new(2, 1), Vec2i::ZERO, 3);
        assert_eq!(positions, vec![Vec2i::new(1, 1), Vec2i::new(4, 1)]);
    }
}
