// Sprite sheets - a bitmap divided into a regular grid of equally sized sprites
//
// Sprites are addressed by a single index numbered left-to-right, bottom-to-top:
//
//    +---+---+---+---+
//    | 4 | 5 | 6 | 7 |     4x2 sprite sheet
//    +---+---+---+---+
//    | 0 | 1 | 2 | 3 |
//    +---+---+---+---+
//
// so an animation can step through its frames with an ascending index.

use super::error::ResourceError;
use crate::bitmap::BitmapImage;
use crate::color::colors;
use crate::math::{IRect, Vec2i};
use serde::{Deserialize, Serialize};

/// Edge length of the generated fallback sprite
pub const ERROR_SPRITE_SIZE: i32 = 8;

/// Sprite sheet metadata sidecar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSheetMeta {
    /// Sheet width in sprites (columns)
    pub sheet_width: i32,
    /// Sheet height in sprites (rows)
    pub sheet_height: i32,
    /// Sprite width in pixels
    pub sprite_width: i32,
    /// Sprite height in pixels
    pub sprite_height: i32,
}

/// A bitmap plus a regular sprite grid
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    image: BitmapImage,
    sheet_size: Vec2i,
    sprite_size: Vec2i,
}

impl SpriteSheet {
    /// Create a sprite sheet, checking the grid covers the bitmap exactly
    ///
    /// # Returns
    /// `MetadataMismatch` if any dimension is not positive or
    /// `sheet_size * sprite_size` differs from the bitmap size
    pub fn new(image: BitmapImage, meta: SpriteSheetMeta) -> Result<Self, ResourceError> {
        let sheet_size = Vec2i::new(meta.sheet_width, meta.sheet_height);
        let sprite_size = Vec2i::new(meta.sprite_width, meta.sprite_height);

        if sheet_size.x <= 0 || sheet_size.y <= 0 || sprite_size.x <= 0 || sprite_size.y <= 0 {
            return Err(ResourceError::MetadataMismatch(format!(
                "non-positive grid: {} sheet of {} sprites",
                sheet_size, sprite_size
            )));
        }

        let covered = Vec2i::new(
            sheet_size.x.saturating_mul(sprite_size.x),
            sheet_size.y.saturating_mul(sprite_size.y),
        );
        if covered != image.size() {
            return Err(ResourceError::MetadataMismatch(format!(
                "{} sheet of {} sprites covers {} but bitmap is {}",
                sheet_size,
                sprite_size,
                covered,
                image.size()
            )));
        }

        Ok(Self {
            image,
            sheet_size,
            sprite_size,
        })
    }

    /// Treat a whole bitmap as a sheet holding a single sprite
    pub fn single(image: BitmapImage) -> Self {
        let sprite_size = image.size();
        Self {
            image,
            sheet_size: Vec2i::new(1, 1),
            sprite_size,
        }
    }

    /// The fallback sheet: one flat red square sprite
    pub fn error_sheet() -> Self {
        Self::single(BitmapImage::filled(
            Vec2i::new(ERROR_SPRITE_SIZE, ERROR_SPRITE_SIZE),
            colors::RED,
        ))
    }

    pub fn image(&self) -> &BitmapImage {
        &self.image
    }

    /// Sheet dimensions in sprites
    pub fn sheet_size(&self) -> Vec2i {
        self.sheet_size
    }

    /// Sprite dimensions in pixels
    pub fn sprite_size(&self) -> Vec2i {
        self.sprite_size
    }

    pub fn sprite_count(&self) -> usize {
        (self.sheet_size.x * self.sheet_size.y) as usize
    }

    /// Source rectangle of a sprite within the bitmap
    ///
    /// An index past the end of the sheet selects sprite 0, so a one sprite
    /// fallback sheet can stand in for any sheet.
    pub fn sprite_rect(&self, index: usize) -> IRect {
        let index = if index < self.sprite_count() { index } else { 0 };
        let col = (index % self.sheet_size.x as usize) as i32;
        let row = (index / self.sheet_size.x as usize) as i32;
        IRect::new(
            col * self.sprite_size.x,
            row * self.sprite_size.y,
            self.sprite_size.x,
            self.sprite_size.y,
        )
    }
}
