// Compositor - submits virtual screens to a host renderer as point primitives
//
// The host sees each enabled screen as two parallel arrays (pixel colors and
// pixel center positions in window space) plus a point size. Layering is only
// a product of draw order and color keyed skipping: a later screen's
// transparent pixels leave earlier screens visible.

use crate::color::Color4u;
use crate::math::Vec2i;
use crate::screen::VirtualScreen;

/// Host graphics API that draws square points
pub trait PointRenderer {
    /// Clear the whole window to one color
    fn clear(&mut self, color: Color4u);

    /// Draw `colors[i]` as a `point_size` square centered on `positions[i]`
    ///
    /// Points whose color is transparent must not be drawn.
    fn draw_points(&mut self, colors: &[Color4u], positions: &[Vec2i], point_size: i32);

    /// Show the finished frame
    fn swap_buffers(&mut self);
}

/// Draw every enabled screen in order, then swap buffers
///
/// # Returns
/// Number of screens submitted
pub fn present<'a, R, I>(renderer: &mut R, screens: I) -> usize
where
    R: PointRenderer + ?Sized,
    I: IntoIterator<Item = &'a VirtualScreen>,
{
    let mut submitted = 0;
    for screen in screens.into_iter().filter(|s| s.is_enabled()) {
        renderer.draw_points(screen.colors(), screen.positions(), screen.pixel_size());
        submitted += 1;
    }
    renderer.swap_buffers();
    submitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::colors;

    #[derive(Default)]
    struct RecordingRenderer {
        draws: Vec<(usize, i32)>,
        swaps: usize,
        cleared: Option<Color4u>,
    }

    impl PointRenderer for RecordingRenderer {
        fn clear(&mut self, color: Color4u) {
            self.cleared = Some(color);
        }

        fn draw_points(&mut self, colors: &[Color4u], positions: &[Vec2i], point_size: i32) {
            assert_eq!(colors.len(), positions.len());
            self.draws.push((colors.len(), point_size));
        }

        fn swap_buffers(&mut self) {
            self.swaps += 1;
        }
    }

    #[test]
    fn test_present_skips_disabled() {
        let a = VirtualScreen::new(Vec2i::new(2, 2));
        let mut b = VirtualScreen::new(Vec2i::new(3, 3));
        let c = VirtualScreen::new(Vec2i::new(4, 4));
        b.set_enabled(false);

        let mut renderer = RecordingRenderer::default();
        let submitted = present(&mut renderer, [&a, &b, &c]);

        assert_eq!(submitted, 2);
        assert_eq!(renderer.draws, vec![(4, 1), (16, 1)]);
        assert_eq!(renderer.swaps, 1);
        assert_eq!(renderer.cleared, None);
    }

    #[test]
    fn test_present_nothing_still_swaps() {
        let mut renderer = RecordingRenderer::default();
        renderer.clear(colors::BLACK);
        assert_eq!(present(&mut renderer, std::iter::empty()), 0);
        assert_eq!(renderer.swaps, 1);
        assert_eq!(renderer.cleared, Some(colors::BLACK));
    }
}
