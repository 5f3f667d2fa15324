// vscreen - resolution independent virtual screens
//
// Fixed resolution pixel buffers drawn in software (sprites, text, lines,
// points) and composited into a host window as scaled point primitives, with a
// reference counted sprite sheet and font cache that falls back to built-in
// resources when an asset fails to load.

// Public modules
pub mod bitmap;
pub mod capture;
pub mod color;
pub mod compositor;
pub mod config;
pub mod context;
pub mod display;
pub mod math;
pub mod raster;
pub mod resource;
pub mod screen;

// Re-export main types for convenience
pub use bitmap::{BitmapImage, FormatError};
pub use color::{colors, Color4u};
pub use compositor::PointRenderer;
pub use config::GfxConfig;
pub use context::GfxContext;
pub use display::FrameSurface;
pub use math::{IRect, Vec2i};
pub use resource::{Font, ResourceError, ResourceErrorKind, ResourceHandle, SpriteSheet};
pub use screen::{ColorBand, ColorMode, PositionMode, ScreenId, SizeMode, VirtualScreen};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_components() {
        // Test that the main components can be constructed together
        let mut gfx = GfxContext::initialize(GfxConfig::default());
        let id = gfx.create_screen(Vec2i::new(16, 16));
        let mut surface = FrameSurface::new(gfx.window_size());
        assert_eq!(gfx.present(&mut surface), 1);
        assert_eq!(surface.frames_presented(), 1);
        gfx.destroy_screen(id);
        gfx.shutdown();
    }
}
