// Screen module - fixed resolution virtual screens
//
// This module provides:
// - VirtualScreen, a pixel color buffer plus the device position of every pixel
// - Position, size and color modes controlling how a screen maps to the window
// - Geometry recompute and the shared pixel transform
//
// Virtual pixel (0, 0) is the bottom-left pixel. Geometry (pixel size, window
// position and the per-pixel position buffer) is only recomputed when a screen
// is created, when the window is resized, or when a mode changes; draw calls
// never touch it.

pub mod geometry;
pub mod transform;

pub use transform::pixel_transform;

use crate::color::{colors, Color4u};
use crate::config::PixelSizeRange;
use crate::math::Vec2i;
use std::collections::BTreeMap;

/// Stable identifier of a screen within a graphics context
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScreenId(pub(crate) u32);

impl std::fmt::Display for ScreenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "screen#{}", self.0)
    }
}

/// Where a screen sits in the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionMode {
    /// Stored manual offset
    Manual,
    #[default]
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// How large each virtual pixel is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeMode {
    /// Stored manual size, clamped to the host point size range
    Manual,
    /// Always 1
    AutoMin,
    /// Largest whole size that fits the window
    #[default]
    AutoMax,
}

/// How source colors are mapped before being written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    FullRgb,
    /// Color chosen by the pixel's row
    YAxisBanded,
    /// Color chosen by the pixel's column
    XAxisBanded,
    /// Every pixel drawn in the screen's bitmap color
    Bitmaps,
}

/// A band covering every coordinate up to and including `upper_bound`
/// not covered by a band with a lower bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorBand {
    pub upper_bound: i32,
    pub color: Color4u,
}

impl ColorBand {
    pub const fn new(upper_bound: i32, color: Color4u) -> Self {
        Self { upper_bound, color }
    }
}

/// A fixed resolution pixel buffer composited into the window
#[derive(Debug, Clone)]
pub struct VirtualScreen {
    resolution: Vec2i,

    /// Pixel colors accessed `[col + row * width]`
    colors: Vec<Color4u>,

    /// Device position of each pixel's center, parallel to `colors`
    positions: Vec<Vec2i>,

    position_mode: PositionMode,
    size_mode: SizeMode,
    color_mode: ColorMode,

    /// Bands keyed by upper bound, so iteration is ascending and unique
    bands: BTreeMap<i32, Color4u>,
    bitmap_color: Color4u,

    manual_position: Vec2i,
    manual_pixel_size: i32,

    enabled: bool,

    // Cached geometry
    pixel_size: i32,
    position: Vec2i,
}

impl VirtualScreen {
    /// Create a cleared screen with default modes
    ///
    /// Geometry is left unresolved until the first `recompute`.
    ///
    /// # Panics
    /// Panics if either resolution component is not positive
    pub fn new(resolution: Vec2i) -> Self {
        assert!(
            resolution.x > 0 && resolution.y > 0,
            "screen resolution must be positive, got {}",
            resolution
        );

        let count = resolution.area() as usize;
        let mut bands = BTreeMap::new();
        bands.insert(i32::MAX, colors::WHITE);

        Self {
            resolution,
            colors: vec![Color4u::TRANSPARENT; count],
            positions: vec![Vec2i::ZERO; count],
            position_mode: PositionMode::default(),
            size_mode: SizeMode::default(),
            color_mode: ColorMode::default(),
            bands,
            bitmap_color: colors::WHITE,
            manual_position: Vec2i::ZERO,
            manual_pixel_size: 1,
            enabled: true,
            pixel_size: 1,
            position: Vec2i::ZERO,
        }
    }

    /// Recompute pixel size, position and the pixel position buffer
    pub fn recompute(&mut self, window: Vec2i, range: PixelSizeRange) {
        self.pixel_size = geometry::pixel_size(
            self.size_mode,
            self.manual_pixel_size,
            window,
            self.resolution,
            range,
        );
        self.position = geometry::screen_position(
            self.position_mode,
            self.manual_position,
            window,
            self.resolution,
            self.pixel_size,
        );
        geometry::layout_pixels(
            &mut self.positions,
            self.resolution,
            self.position,
            self.pixel_size,
        );
    }

    // ========================================================================
    // Buffers
    // ========================================================================

    pub fn resolution(&self) -> Vec2i {
        self.resolution
    }

    pub fn colors(&self) -> &[Color4u] {
        &self.colors
    }

    pub fn positions(&self) -> &[Vec2i] {
        &self.positions
    }

    /// Size of both buffers in bytes
    pub fn memory_usage(&self) -> usize {
        self.colors.len() * std::mem::size_of::<Color4u>()
            + self.positions.len() * std::mem::size_of::<Vec2i>()
    }

    /// Returns true if `(x, y)` is a pixel of this screen
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        0 <= x && x < self.resolution.x && 0 <= y && y < self.resolution.y
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        (x + y * self.resolution.x) as usize
    }

    /// Color at `(x, y)`
    ///
    /// # Panics
    /// Panics if the pixel is outside the screen
    pub fn pixel(&self, x: i32, y: i32) -> Color4u {
        assert!(
            self.contains(x, y),
            "pixel ({}, {}) outside {} screen",
            x,
            y,
            self.resolution
        );
        self.colors[self.index(x, y)]
    }

    /// Write a source color through the pixel transform
    ///
    /// Pixels outside the screen are clipped. Returns true if a pixel was
    /// written.
    #[inline]
    pub fn plot(&mut self, x: i32, y: i32, color: Color4u) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        match pixel_transform(self, color, x, y) {
            Some(out) => {
                let index = self.index(x, y);
                self.colors[index] = out;
                true
            }
            None => false,
        }
    }

    /// Set every pixel to `color`, bypassing the pixel transform
    pub fn fill(&mut self, color: Color4u) {
        self.colors.fill(color);
    }

    // ========================================================================
    // Modes
    // ========================================================================

    pub fn position_mode(&self) -> PositionMode {
        self.position_mode
    }

    pub fn set_position_mode(&mut self, mode: PositionMode) {
        self.position_mode = mode;
    }

    pub fn size_mode(&self) -> SizeMode {
        self.size_mode
    }

    pub fn set_size_mode(&mut self, mode: SizeMode) {
        self.size_mode = mode;
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.color_mode = mode;
    }

    pub fn manual_position(&self) -> Vec2i {
        self.manual_position
    }

    pub fn set_manual_position(&mut self, position: Vec2i) {
        self.manual_position = position;
    }

    pub fn manual_pixel_size(&self) -> i32 {
        self.manual_pixel_size
    }

    pub fn set_manual_pixel_size(&mut self, size: i32) {
        self.manual_pixel_size = size;
    }

    /// Replace all color bands
    ///
    /// Bands sharing an upper bound keep the last one given.
    pub fn set_color_bands(&mut self, bands: &[ColorBand]) {
        self.bands = bands.iter().map(|b| (b.upper_bound, b.color)).collect();
    }

    /// Insert a band, replacing any band with the same upper bound
    pub fn add_color_band(&mut self, band: ColorBand) {
        self.bands.insert(band.upper_bound, band.color);
    }

    /// Bands in ascending upper bound order
    pub fn color_bands(&self) -> Vec<ColorBand> {
        self.bands
            .iter()
            .map(|(&upper_bound, &color)| ColorBand::new(upper_bound, color))
            .collect()
    }

    /// Color of the band with the smallest upper bound at or above `coord`
    #[inline]
    pub fn band_color(&self, coord: i32) -> Option<Color4u> {
        self.bands.range(coord..).next().map(|(_, &color)| color)
    }

    pub fn bitmap_color(&self) -> Color4u {
        self.bitmap_color
    }

    pub fn set_bitmap_color(&mut self, color: Color4u) {
        self.bitmap_color = color;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    // ========================================================================
    // Cached geometry
    // ========================================================================

    /// Device pixels per virtual pixel
    pub fn pixel_size(&self) -> i32 {
        self.pixel_size
    }

    /// Window position of the bottom-left corner
    pub fn position(&self) -> Vec2i {
        self.position
    }

    /// Window area covered by the screen
    pub fn extent(&self) -> Vec2i {
        self.resolution * self.pixel_size
    }
}
