// Color - 32-bit RGBA values used by bitmaps and virtual screens
//
// Alpha is only ever used as a color key: a pixel with alpha == ALPHA_KEY is
// skipped by every draw routine, any other alpha value is drawn fully opaque.

use serde::{Deserialize, Serialize};

/// Alpha value marking a pixel as transparent (never written by draw calls)
pub const ALPHA_KEY: u8 = 0;

/// 32-bit RGBA color
///
/// The layout is `#[repr(C)]` so a screen's color buffer can be handed to a
/// host renderer as a contiguous array of RGBA bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color4u {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color4u {
    /// Fully transparent black
    pub const TRANSPARENT: Color4u = Color4u::new(0, 0, 0, ALPHA_KEY);

    /// Create a color from its four channels
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with every channel (alpha included) set to `value`
    pub const fn shade(value: u8) -> Self {
        Self {
            r: value,
            g: value,
            b: value,
            a: value,
        }
    }

    /// Returns true if this color is the transparent color key
    #[inline]
    pub fn is_transparent(self) -> bool {
        self.a == ALPHA_KEY
    }

    /// Convert to [R, G, B, A] bytes
    #[inline]
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Pack as 0xRRGGBB, discarding alpha
    #[inline]
    pub fn to_rgb_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

impl From<[u8; 4]> for Color4u {
    fn from(rgba: [u8; 4]) -> Self {
        Color4u::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }
}

/// Named opaque colors
pub mod colors {
    use super::Color4u;

    pub const WHITE: Color4u = Color4u::rgb(255, 255, 255);
    pub const BLACK: Color4u = Color4u::rgb(0, 0, 0);
    pub const RED: Color4u = Color4u::rgb(255, 0, 0);
    pub const GREEN: Color4u = Color4u::rgb(0, 255, 0);
    pub const BLUE: Color4u = Color4u::rgb(0, 0, 255);
    pub const CYAN: Color4u = Color4u::rgb(0, 255, 255);
    pub const MAGENTA: Color4u = Color4u::rgb(255, 0, 255);
    pub const YELLOW: Color4u = Color4u::rgb(255, 255, 0);

    // greys
    pub const GAINSBORO: Color4u = Color4u::rgb(224, 224, 224);
    pub const LIGHT_GRAY: Color4u = Color4u::rgb(215, 215, 215);
    pub const SILVER: Color4u = Color4u::rgb(196, 196, 196);
    pub const GRAY: Color4u = Color4u::rgb(131, 131, 131);
    pub const DIM_GRAY: Color4u = Color4u::rgb(107, 107, 107);
    pub const JET: Color4u = Color4u::rgb(53, 53, 53);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_layout() {
        assert_eq!(std::mem::size_of::<Color4u>(), 4);
    }

    #[test]
    fn test_transparent_key() {
        assert!(Color4u::TRANSPARENT.is_transparent());
        assert!(Color4u::new(10, 20, 30, 0).is_transparent());
        assert!(!Color4u::new(0, 0, 0, 1).is_transparent());
        assert!(!colors::BLACK.is_transparent());
    }

    #[test]
    fn test_shade() {
        assert_eq!(Color4u::shade(1), Color4u::new(1, 1, 1, 1));
        assert!(Color4u::shade(0).is_transparent());
    }

    #[test]
    fn test_to_rgb_u32() {
        assert_eq!(Color4u::rgb(0x12, 0x34, 0x56).to_rgb_u32(), 0x123456);
        assert_eq!(Color4u::rgb(0x12, 0x34, 0x56).to_rgba(), [0x12, 0x34, 0x56, 0xFF]);
    }
}
