// Bitmap fonts covering the 95 printable ASCII characters
//
// A font is a bitmap plus one glyph record per printable character (32 ' ' to
// 126 '~'). Glyphs are kept sorted by character code so lookup is a direct
// index of `code - 32`.

use super::error::ResourceError;
use crate::bitmap::BitmapImage;
use crate::color::colors;
use crate::math::{IRect, Vec2i};
use serde::{Deserialize, Serialize};

/// Number of printable ASCII characters
pub const ASCII_CHAR_COUNT: usize = 95;

/// Sum of the printable ASCII codes 32..=126
pub const ASCII_CHAR_CHECKSUM: i32 = 7505;

/// First printable ASCII character
pub const FIRST_PRINTABLE: char = ' ';

/// Last printable ASCII character
pub const LAST_PRINTABLE: char = '~';

/// A font glyph: source rectangle, draw offsets and horizontal advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Glyph {
    pub ascii: i32,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub xoffset: i32,
    pub yoffset: i32,
    pub xadvance: i32,
}

impl Glyph {
    /// Source rectangle within the font bitmap
    pub fn rect(&self) -> IRect {
        IRect::new(self.x, self.y, self.width, self.height)
    }
}

/// Font metadata sidecar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontMeta {
    pub line_height: i32,
    pub baseline: i32,
    pub glyph_space: i32,
    #[serde(default)]
    pub glyphs: Vec<Glyph>,
}

/// An ASCII bitmap font
#[derive(Debug, Clone)]
pub struct Font {
    image: BitmapImage,
    glyphs: [Glyph; ASCII_CHAR_COUNT],
    line_height: i32,
    baseline: i32,
    glyph_space: i32,
}

/// Returns true if `c` has a glyph in every font
#[inline]
pub fn is_printable(c: char) -> bool {
    (FIRST_PRINTABLE..=LAST_PRINTABLE).contains(&c)
}

impl Font {
    /// Create a font from a bitmap and its metadata
    ///
    /// Checks, in order: exactly 95 glyphs, every code printable, every glyph
    /// rectangle inside the bitmap, the code checksum, then that the sorted
    /// codes are exactly 32..=126.
    pub fn new(image: BitmapImage, meta: FontMeta) -> Result<Self, ResourceError> {
        let FontMeta {
            line_height,
            baseline,
            glyph_space,
            mut glyphs,
        } = meta;

        if glyphs.len() != ASCII_CHAR_COUNT {
            return Err(ResourceError::Integrity(format!(
                "expected {} glyphs, found {}",
                ASCII_CHAR_COUNT,
                glyphs.len()
            )));
        }

        if let Some(glyph) = glyphs
            .iter()
            .find(|g| !(FIRST_PRINTABLE as i32..=LAST_PRINTABLE as i32).contains(&g.ascii))
        {
            return Err(ResourceError::Integrity(format!(
                "glyph code {} is not printable ascii",
                glyph.ascii
            )));
        }

        glyphs.sort_by_key(|g| g.ascii);

        if let Some(glyph) = glyphs.iter().find(|g| !g.rect().fits_within(image.size())) {
            return Err(ResourceError::MetadataMismatch(format!(
                "glyph {} rect {:?} exceeds {} bitmap",
                glyph.ascii,
                glyph.rect(),
                image.size()
            )));
        }

        let checksum: i32 = glyphs.iter().map(|g| g.ascii).sum();
        if checksum != ASCII_CHAR_CHECKSUM {
            return Err(ResourceError::Integrity(format!(
                "glyph checksum {} does not match {}",
                checksum, ASCII_CHAR_CHECKSUM
            )));
        }

        // A duplicate can still balance the checksum against shifted codes
        if let Some((i, glyph)) = glyphs
            .iter()
            .enumerate()
            .find(|(i, g)| g.ascii != FIRST_PRINTABLE as i32 + *i as i32)
        {
            return Err(ResourceError::Integrity(format!(
                "glyph code {} found where {} expected",
                glyph.ascii,
                FIRST_PRINTABLE as i32 + i as i32
            )));
        }

        let glyphs: [Glyph; ASCII_CHAR_COUNT] = glyphs.try_into().map_err(|_| {
            ResourceError::Integrity(format!("expected {} glyphs", ASCII_CHAR_COUNT))
        })?;

        Ok(Self {
            image,
            glyphs,
            line_height,
            baseline,
            glyph_space,
        })
    }

    /// The fallback font: every glyph is a blank 6x6 box on an 8x8 red bitmap
    pub fn error_font() -> Self {
        let mut glyphs = [Glyph::default(); ASCII_CHAR_COUNT];
        for (i, glyph) in glyphs.iter_mut().enumerate() {
            *glyph = Glyph {
                ascii: FIRST_PRINTABLE as i32 + i as i32,
                x: 0,
                y: 0,
                width: 6,
                height: 6,
                xoffset: 1,
                yoffset: 0,
                xadvance: 8,
            };
        }

        Self {
            image: BitmapImage::filled(Vec2i::new(8, 8), colors::RED),
            glyphs,
            line_height: 8,
            baseline: 1,
            glyph_space: 0,
        }
    }

    pub fn image(&self) -> &BitmapImage {
        &self.image
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Look up the glyph for a printable character
    ///
    /// # Panics
    /// Panics if `c` is outside the printable ASCII range
    #[inline]
    pub fn glyph(&self, c: char) -> &Glyph {
        assert!(
            is_printable(c),
            "character {:?} has no glyph; fonts cover printable ascii only",
            c
        );
        &self.glyphs[(c as u32 - FIRST_PRINTABLE as u32) as usize]
    }

    pub fn line_height(&self) -> i32 {
        self.line_height
    }

    pub fn baseline(&self) -> i32 {
        self.baseline
    }

    pub fn glyph_space(&self) -> i32 {
        self.glyph_space
    }

    /// Size of the box a string occupies when drawn on one line
    ///
    /// Width is the total pen advance, height the tallest glyph. Newlines are
    /// ignored.
    pub fn text_size(&self, text: &str) -> Vec2i {
        text.chars()
            .filter(|&c| c != '\n')
            .fold(Vec2i::ZERO, |size, c| {
                let glyph = self.glyph(c);
                Vec2i::new(
                    size.x + glyph.xadvance + self.glyph_space,
                    size.y.max(glyph.height),
                )
            })
    }
}
