// Graphics context - owner of the window size, virtual screens and resources
//
// All engine facing operations go through GfxContext. Screens are kept in
// creation order and addressed by a stable ScreenId; sprite sheets and fonts by
// a ResourceHandle. Unknown ids and handles passed to draw or query calls are
// caller bugs and panic.

use crate::color::Color4u;
use crate::compositor::{self, PointRenderer};
use crate::config::GfxConfig;
use crate::math::Vec2i;
use crate::raster;
use crate::resource::{Font, ResourceHandle, ResourceStore, SpriteSheet};
use crate::screen::{ColorBand, ColorMode, PositionMode, ScreenId, SizeMode, VirtualScreen};
use log::{debug, info};
use std::collections::BTreeMap;

/// Explicit owner of all rendering state
#[derive(Debug)]
pub struct GfxContext {
    config: GfxConfig,
    window_size: Vec2i,
    screens: BTreeMap<ScreenId, VirtualScreen>,
    next_screen: u32,
    resources: ResourceStore,
}

fn screen_entry(
    screens: &mut BTreeMap<ScreenId, VirtualScreen>,
    id: ScreenId,
) -> &mut VirtualScreen {
    screens
        .get_mut(&id)
        .unwrap_or_else(|| panic!("unknown {}", id))
}

fn sheet_entry(resources: &ResourceStore, handle: ResourceHandle) -> &SpriteSheet {
    resources
        .sprite_sheet(handle)
        .unwrap_or_else(|| panic!("sprite sheet key {} is not loaded", handle))
}

fn font_entry(resources: &ResourceStore, handle: ResourceHandle) -> &Font {
    resources
        .font(handle)
        .unwrap_or_else(|| panic!("font key {} is not loaded", handle))
}

impl GfxContext {
    /// Create a context for a window of `config.window` size
    pub fn initialize(config: GfxConfig) -> Self {
        let window_size = config.window.size();
        info!("initializing graphics; window={}", window_size);
        info!(
            "supported pixel size range=[{}, {}]",
            config.pixel_size.min, config.pixel_size.max
        );

        let resources = ResourceStore::new(config.assets.clone());

        Self {
            config,
            window_size,
            screens: BTreeMap::new(),
            next_screen: 0,
            resources,
        }
    }

    /// Free every screen and resource
    pub fn shutdown(mut self) {
        info!(
            "shutting down graphics; {} screens, {} sprite sheets, {} fonts resident",
            self.screens.len(),
            self.resources.sprite_sheet_count(),
            self.resources.font_count()
        );
        self.screens.clear();
        self.resources.clear();
    }

    pub fn config(&self) -> &GfxConfig {
        &self.config
    }

    pub fn window_size(&self) -> Vec2i {
        self.window_size
    }

    pub fn resources(&self) -> &ResourceStore {
        &self.resources
    }

    /// Record a new window size and recompute every screen's geometry
    pub fn on_window_resize(&mut self, size: Vec2i) {
        debug!("window resized to {}", size);
        self.window_size = size;
        let range = self.config.pixel_size;
        for screen in self.screens.values_mut() {
            screen.recompute(size, range);
        }
    }

    // ========================================================================
    // Screens
    // ========================================================================

    /// Create a cleared, enabled screen
    ///
    /// # Panics
    /// Panics if either resolution component is not positive
    pub fn create_screen(&mut self, resolution: Vec2i) -> ScreenId {
        let mut screen = VirtualScreen::new(resolution);
        screen.recompute(self.window_size, self.config.pixel_size);

        let id = ScreenId(self.next_screen);
        self.next_screen += 1;

        info!(
            "created {} resolution={} memory={}KiB pixel size={}",
            id,
            resolution,
            screen.memory_usage() / 1024,
            screen.pixel_size()
        );

        self.screens.insert(id, screen);
        id
    }

    /// Free a screen; its id is never handed out again
    pub fn destroy_screen(&mut self, id: ScreenId) {
        if self.screens.remove(&id).is_none() {
            panic!("destroying unknown {}", id);
        }
        info!("destroyed {}", id);
    }

    /// Borrow a screen
    ///
    /// # Panics
    /// Panics if the id is unknown
    pub fn screen(&self, id: ScreenId) -> &VirtualScreen {
        self.screens
            .get(&id)
            .unwrap_or_else(|| panic!("unknown {}", id))
    }

    /// Ids of all live screens in creation order
    pub fn screen_ids(&self) -> impl Iterator<Item = ScreenId> + '_ {
        self.screens.keys().copied()
    }

    /// Apply a mode change and recompute geometry
    fn update_screen(&mut self, id: ScreenId, recompute: bool, f: impl FnOnce(&mut VirtualScreen)) {
        let window = self.window_size;
        let range = self.config.pixel_size;
        let screen = screen_entry(&mut self.screens, id);
        f(screen);
        if recompute {
            screen.recompute(window, range);
        }
    }

    pub fn set_position_mode(&mut self, mode: PositionMode, id: ScreenId) {
        self.update_screen(id, true, |s| s.set_position_mode(mode));
    }

    pub fn set_size_mode(&mut self, mode: SizeMode, id: ScreenId) {
        self.update_screen(id, true, |s| s.set_size_mode(mode));
    }

    pub fn set_color_mode(&mut self, mode: ColorMode, id: ScreenId) {
        self.update_screen(id, false, |s| s.set_color_mode(mode));
    }

    /// Store the manual window position; applied now only in manual position mode
    pub fn set_manual_position(&mut self, position: Vec2i, id: ScreenId) {
        let manual = self.screen(id).position_mode() == PositionMode::Manual;
        self.update_screen(id, manual, |s| s.set_manual_position(position));
    }

    /// Store the manual pixel size; applied now only in manual size mode
    ///
    /// The size is clamped to the configured pixel size range when applied.
    pub fn set_manual_pixel_size(&mut self, size: i32, id: ScreenId) {
        let manual = self.screen(id).size_mode() == SizeMode::Manual;
        self.update_screen(id, manual, |s| s.set_manual_pixel_size(size));
    }

    pub fn set_color_bands(&mut self, bands: &[ColorBand], id: ScreenId) {
        self.update_screen(id, false, |s| s.set_color_bands(bands));
    }

    pub fn add_color_band(&mut self, band: ColorBand, id: ScreenId) {
        self.update_screen(id, false, |s| s.add_color_band(band));
    }

    pub fn set_bitmap_color(&mut self, color: Color4u, id: ScreenId) {
        self.update_screen(id, false, |s| s.set_bitmap_color(color));
    }

    pub fn enable_screen(&mut self, id: ScreenId) {
        self.update_screen(id, false, |s| s.set_enabled(true));
    }

    pub fn disable_screen(&mut self, id: ScreenId) {
        self.update_screen(id, false, |s| s.set_enabled(false));
    }

    pub fn is_screen_enabled(&self, id: ScreenId) -> bool {
        self.screen(id).is_enabled()
    }

    pub fn screen_resolution(&self, id: ScreenId) -> Vec2i {
        self.screen(id).resolution()
    }

    pub fn screen_pixel_size(&self, id: ScreenId) -> i32 {
        self.screen(id).pixel_size()
    }

    pub fn screen_position(&self, id: ScreenId) -> Vec2i {
        self.screen(id).position()
    }

    // ========================================================================
    // Resources
    // ========================================================================

    /// Load a sprite sheet from the sprites directory (error sheet on failure)
    pub fn load_sprite_sheet(&mut self, name: &str) -> ResourceHandle {
        self.resources.load_sprite_sheet(name)
    }

    pub fn unload_sprite_sheet(&mut self, handle: ResourceHandle) {
        self.resources.unload_sprite_sheet(handle);
    }

    /// Register a sprite sheet built in memory
    pub fn insert_sprite_sheet(&mut self, name: &str, sheet: SpriteSheet) -> ResourceHandle {
        self.resources.insert_sprite_sheet(name, sheet)
    }

    /// Load a font from the fonts directory (error font on failure)
    pub fn load_font(&mut self, name: &str) -> ResourceHandle {
        self.resources.load_font(name)
    }

    pub fn unload_font(&mut self, handle: ResourceHandle) {
        self.resources.unload_font(handle);
    }

    /// Register a font built in memory
    pub fn insert_font(&mut self, name: &str, font: Font) -> ResourceHandle {
        self.resources.insert_font(name, font)
    }

    pub fn sprite_count(&self, sheet: ResourceHandle) -> usize {
        sheet_entry(&self.resources, sheet).sprite_count()
    }

    /// Size of one sprite in pixels
    pub fn sprite_size(&self, sheet: ResourceHandle) -> Vec2i {
        sheet_entry(&self.resources, sheet).sprite_size()
    }

    /// Size of the whole sheet bitmap in pixels
    pub fn sheet_size(&self, sheet: ResourceHandle) -> Vec2i {
        sheet_entry(&self.resources, sheet).image().size()
    }

    pub fn is_error_sheet(&self, sheet: ResourceHandle) -> bool {
        sheet == self.resources.error_sheet_handle()
    }

    pub fn is_error_font(&self, font: ResourceHandle) -> bool {
        font == self.resources.error_font_handle()
    }

    /// Reference count of a resident sheet or font
    pub fn ref_count(&self, handle: ResourceHandle) -> Option<u32> {
        self.resources.ref_count(handle)
    }

    /// Size of the box `text` would occupy if drawn with `font`
    pub fn calculate_text_size(&self, text: &str, font: ResourceHandle) -> Vec2i {
        font_entry(&self.resources, font).text_size(text)
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    pub fn draw_sprite(
        &mut self,
        position: Vec2i,
        sheet: ResourceHandle,
        sprite_index: usize,
        id: ScreenId,
    ) {
        let sheet = sheet_entry(&self.resources, sheet);
        let screen = screen_entry(&mut self.screens, id);
        raster::draw_sprite(screen, sheet, sprite_index, position);
    }

    pub fn draw_sprite_column(
        &mut self,
        position: Vec2i,
        sheet: ResourceHandle,
        sprite_index: usize,
        column: usize,
        id: ScreenId,
    ) {
        let sheet = sheet_entry(&self.resources, sheet);
        let screen = screen_entry(&mut self.screens, id);
        raster::draw_sprite_column(screen, sheet, sprite_index, column, position);
    }

    pub fn draw_text(&mut self, position: Vec2i, text: &str, font: ResourceHandle, id: ScreenId) {
        let font = font_entry(&self.resources, font);
        let screen = screen_entry(&mut self.screens, id);
        raster::draw_text(screen, font, text, position);
    }

    pub fn draw_line(&mut self, p0: Vec2i, p1: Vec2i, color: Color4u, id: ScreenId) {
        raster::draw_line(screen_entry(&mut self.screens, id), p0, p1, color);
    }

    pub fn draw_point(&mut self, position: Vec2i, color: Color4u, id: ScreenId) {
        raster::draw_point(screen_entry(&mut self.screens, id), position, color);
    }

    /// Clear a screen to transparent
    pub fn clear_screen(&mut self, id: ScreenId) {
        raster::clear(screen_entry(&mut self.screens, id));
    }

    pub fn fill_shade(&mut self, shade: u8, id: ScreenId) {
        raster::fill_shade(screen_entry(&mut self.screens, id), shade);
    }

    pub fn fill_color(&mut self, color: Color4u, id: ScreenId) {
        raster::fill_color(screen_entry(&mut self.screens, id), color);
    }

    // ========================================================================
    // Presentation
    // ========================================================================

    /// Clear the host window (not any screen)
    pub fn clear_window<R: PointRenderer + ?Sized>(&self, color: Color4u, renderer: &mut R) {
        renderer.clear(color);
    }

    /// Submit every enabled screen in creation order and swap buffers
    pub fn present<R: PointRenderer + ?Sized>(&self, renderer: &mut R) -> usize {
        compositor::present(renderer, self.screens.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::colors;

    fn context() -> GfxContext {
        let mut config = GfxConfig::default();
        config.assets.root = "/nonexistent/vscreen-assets".into();
        GfxContext::initialize(config)
    }

    #[test]
    fn test_create_screen_recomputes() {
        let mut gfx = context();
        let id = gfx.create_screen(Vec2i::new(224, 256));
        assert_eq!(gfx.screen_pixel_size(id), 4);
        assert_eq!(gfx.screen_position(id), Vec2i::ZERO);
    }

    #[test]
    fn test_screen_ids_are_stable() {
        let mut gfx = context();
        let a = gfx.create_screen(Vec2i::new(8, 8));
        let b = gfx.create_screen(Vec2i::new(8, 8));
        gfx.destroy_screen(a);
        let c = gfx.create_screen(Vec2i::new(8, 8));
        assert_ne!(a, c);
        assert_eq!(gfx.screen_ids().collect::<Vec<_>>(), vec![b, c]);
    }

    #[test]
    fn test_manual_pixel_size_applies_in_manual_mode() {
        let mut gfx = context();
        let id = gfx.create_screen(Vec2i::new(100, 100));
        assert_eq!(gfx.screen_pixel_size(id), 8);

        gfx.set_manual_pixel_size(3, id);
        assert_eq!(gfx.screen_pixel_size(id), 8);

        gfx.set_size_mode(SizeMode::Manual, id);
        assert_eq!(gfx.screen_pixel_size(id), 3);

        gfx.set_manual_pixel_size(1000, id);
        assert_eq!(gfx.screen_pixel_size(id), 64);
    }

    #[test]
    fn test_manual_position_applies_in_manual_mode() {
        let mut gfx = context();
        let id = gfx.create_screen(Vec2i::new(100, 100));
        gfx.set_manual_position(Vec2i::new(5, 6), id);
        assert_eq!(gfx.screen_position(id), Vec2i::new(48, 112));

        gfx.set_position_mode(PositionMode::Manual, id);
        assert_eq!(gfx.screen_position(id), Vec2i::new(5, 6));
    }

    #[test]
    fn test_draw_with_fallback_resources() {
        let mut gfx = context();
        let id = gfx.create_screen(Vec2i::new(32, 32));
        let sheet = gfx.load_sprite_sheet("missing");
        let font = gfx.load_font("missing");
        assert!(gfx.is_error_sheet(sheet));
        assert!(gfx.is_error_font(font));

        gfx.draw_sprite(Vec2i::new(2, 2), sheet, 3, id);
        gfx.draw_text(Vec2i::new(0, 16), "hi", font, id);
        assert_eq!(gfx.screen(id).pixel(2, 2), colors::RED);
        assert_eq!(gfx.screen(id).pixel(1, 17), colors::RED);
        assert_eq!(gfx.calculate_text_size("hi", font), Vec2i::new(16, 6));
    }

    #[test]
    #[should_panic(expected = "not loaded")]
    fn test_draw_with_unloaded_sheet_panics() {
        let mut gfx = context();
        let id = gfx.create_screen(Vec2i::new(8, 8));
        let sheet = gfx.insert_sprite_sheet("tmp", SpriteSheet::error_sheet());
        gfx.unload_sprite_sheet(sheet);
        gfx.draw_sprite(Vec2i::ZERO, sheet, 0, id);
    }

    #[test]
    #[should_panic(expected = "unknown")]
    fn test_draw_on_unknown_screen_panics() {
        let mut gfx = context();
        gfx.draw_point(Vec2i::ZERO, colors::WHITE, ScreenId(42));
    }
}
