// Bitmap module - decoded RGBA images
//
// This module provides:
// - BitmapImage, the canonical decoded pixel grid owned by sprite sheets and fonts
// - The BMP decoder (uncompressed indexed and direct color images)
//
// Bitmaps share the coordinate space of virtual screens: the origin is the
// bottom-left pixel, rows ascend north and columns ascend east.

pub mod bmp;

pub use bmp::{decode_bmp, FormatError, BMP_FILE_EXTENSION};

use crate::color::Color4u;
use crate::math::Vec2i;

/// Decoded RGBA image
///
/// Immutable once created; owned exclusively by whichever resource decoded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapImage {
    size: Vec2i,
    /// Flattened pixel grid accessed `[col + row * width]`, row 0 at the bottom
    pixels: Vec<Color4u>,
}

impl BitmapImage {
    /// Create a bitmap from a row-major, bottom-up pixel grid
    ///
    /// # Panics
    /// Panics if `pixels.len()` does not equal `size.x * size.y`
    pub fn from_pixels(size: Vec2i, pixels: Vec<Color4u>) -> Self {
        assert!(size.x >= 0 && size.y >= 0, "negative bitmap size {}", size);
        assert_eq!(
            pixels.len() as i64,
            size.area(),
            "bitmap pixel count does not match its {} size",
            size
        );
        Self { size, pixels }
    }

    /// Create a bitmap with every pixel set to one color
    pub fn filled(size: Vec2i, color: Color4u) -> Self {
        let count = size.area().max(0) as usize;
        Self::from_pixels(size, vec![color; count])
    }

    /// Decode a BMP file held in memory
    ///
    /// # Arguments
    /// * `bytes` - The complete file contents
    /// * `max_size` - Largest accepted width and height
    pub fn decode(bytes: &[u8], max_size: Vec2i) -> Result<Self, FormatError> {
        decode_bmp(bytes, max_size)
    }

    pub fn width(&self) -> i32 {
        self.size.x
    }

    pub fn height(&self) -> i32 {
        self.size.y
    }

    pub fn size(&self) -> Vec2i {
        self.size
    }

    /// All pixels, bottom row first
    pub fn pixels(&self) -> &[Color4u] {
        &self.pixels
    }

    /// Get the pixel at column `x` of row `y`
    ///
    /// # Panics
    /// Panics if the coordinates are outside the bitmap
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Color4u {
        assert!(
            0 <= x && x < self.size.x && 0 <= y && y < self.size.y,
            "pixel ({}, {}) outside {} bitmap",
            x,
            y,
            self.size
        );
        self.pixels[(x + y * self.size.x) as usize]
    }

    /// Get one row of pixels
    #[inline]
    pub fn row(&self, y: i32) -> &[Color4u] {
        let start = (y * self.size.x) as usize;
        &self.pixels[start..start + self.size.x as usize]
    }
}
