// Common test utilities for asset based integration tests
//
// This module provides BMP encoders and sidecar writers that build sprite
// sheet and font assets inside a throwaway directory, so the resource store
// can be exercised against real files.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use vscreen::color::{colors, Color4u};
use vscreen::config::{AssetConfig, GfxConfig};
use vscreen::math::Vec2i;
use vscreen::resource::{FontMeta, Glyph, SpriteSheetMeta, ASCII_CHAR_COUNT};
use vscreen::BitmapImage;

/// Cell size of the generated test font grid
pub const FONT_CELL: i32 = 8;

/// Size of the generated test font bitmap (16 cells x 6 rows)
pub const FONT_BITMAP: Vec2i = Vec2i::new(128, 48);

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

/// Temporary asset tree removed on drop
pub struct AssetDir {
    root: PathBuf,
    assets: AssetConfig,
}

impl AssetDir {
    /// Create an empty asset tree with sprite and font directories
    pub fn new(tag: &str) -> Self {
        let unique = NEXT_DIR.fetch_add(1, Ordering::SeqCst);
        let root = std::env::temp_dir().join(format!(
            "vscreen-{}-{}-{}",
            tag,
            std::process::id(),
            unique
        ));
        let _ = fs::remove_dir_all(&root);

        let assets = AssetConfig::with_root(&root);
        fs::create_dir_all(assets.sprites_path()).expect("Failed to create sprites dir");
        fs::create_dir_all(assets.fonts_path()).expect("Failed to create fonts dir");

        Self { root, assets }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn assets(&self) -> AssetConfig {
        self.assets.clone()
    }

    /// Default configuration pointing at this asset tree
    pub fn config(&self) -> GfxConfig {
        GfxConfig {
            assets: self.assets(),
            ..GfxConfig::default()
        }
    }

    /// Write a sprite sheet bitmap and sidecar
    pub fn write_sprite_sheet(&self, name: &str, image: &BitmapImage, meta: &SpriteSheetMeta) {
        let dir = self.assets.sprites_path();
        fs::write(dir.join(format!("{}.bmp", name)), encode_bmp32(image))
            .expect("Failed to write sprite bitmap");
        fs::write(
            dir.join(format!("{}.toml", name)),
            toml::to_string(meta).expect("Failed to serialize sprite meta"),
        )
        .expect("Failed to write sprite sidecar");
    }

    /// Write a font bitmap and sidecar
    pub fn write_font(&self, name: &str, image: &BitmapImage, meta: &FontMeta) {
        let dir = self.assets.fonts_path();
        fs::write(dir.join(format!("{}.bmp", name)), encode_bmp32(image))
            .expect("Failed to write font bitmap");
        fs::write(
            dir.join(format!("{}.toml", name)),
            toml::to_string(meta).expect("Failed to serialize font meta"),
        )
        .expect("Failed to write font sidecar");
    }

    /// Write arbitrary bytes into the sprites directory
    pub fn write_sprite_file(&self, file: &str, bytes: &[u8]) {
        fs::write(self.assets.sprites_path().join(file), bytes).expect("Failed to write file");
    }

    /// Write arbitrary bytes into the fonts directory
    pub fn write_font_file(&self, file: &str, bytes: &[u8]) {
        fs::write(self.assets.fonts_path().join(file), bytes).expect("Failed to write file");
    }
}

impl Drop for AssetDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn push_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_i32(out: &mut Vec<u8>, v: i32) {
    out.extend_from_slice(&v.to_le_bytes());
}

/// Encode a bitmap as a bottom-up 32 bpp BI_BITFIELDS BMP with alpha (v3 header)
pub fn encode_bmp32(image: &BitmapImage) -> Vec<u8> {
    const HEADER: u32 = 14 + 56;
    let data_len = (image.pixels().len() * 4) as u32;

    let mut out = Vec::with_capacity((HEADER + data_len) as usize);
    out.extend_from_slice(b"BM");
    push_u32(&mut out, HEADER + data_len);
    push_u32(&mut out, 0);
    push_u32(&mut out, HEADER);

    push_u32(&mut out, 56);
    push_i32(&mut out, image.width());
    push_i32(&mut out, image.height());
    push_u16(&mut out, 1);
    push_u16(&mut out, 32);
    push_u32(&mut out, 3); // BI_BITFIELDS
    push_u32(&mut out, data_len);
    push_i32(&mut out, 2835);
    push_i32(&mut out, 2835);
    push_u32(&mut out, 0);
    push_u32(&mut out, 0);
    push_u32(&mut out, 0x00FF_0000);
    push_u32(&mut out, 0x0000_FF00);
    push_u32(&mut out, 0x0000_00FF);
    push_u32(&mut out, 0xFF00_0000);

    for color in image.pixels() {
        out.extend_from_slice(&[color.b, color.g, color.r, color.a]);
    }
    out
}

/// Encode a bitmap as a 24 bpp BMP (v1 header), dropping alpha
///
/// `top_down` stores rows top first with a negative height.
pub fn encode_bmp24(image: &BitmapImage, top_down: bool) -> Vec<u8> {
    const HEADER: u32 = 14 + 40;
    let stride = (24 * image.width() as usize).div_ceil(32) * 4;
    let data_len = (stride * image.height() as usize) as u32;

    let mut out = Vec::with_capacity((HEADER + data_len) as usize);
    out.extend_from_slice(b"BM");
    push_u32(&mut out, HEADER + data_len);
    push_u32(&mut out, 0);
    push_u32(&mut out, HEADER);

    push_u32(&mut out, 40);
    push_i32(&mut out, image.width());
    push_i32(
        &mut out,
        if top_down {
            -image.height()
        } else {
            image.height()
        },
    );
    push_u16(&mut out, 1);
    push_u16(&mut out, 24);
    push_u32(&mut out, 0); // BI_RGB
    push_u32(&mut out, data_len);
    push_i32(&mut out, 2835);
    push_i32(&mut out, 2835);
    push_u32(&mut out, 0);
    push_u32(&mut out, 0);

    let rows: Vec<i32> = if top_down {
        (0..image.height()).rev().collect()
    } else {
        (0..image.height()).collect()
    };
    for y in rows {
        let start = out.len();
        for color in image.row(y) {
            out.extend_from_slice(&[color.b, color.g, color.r]);
        }
        out.resize(start + stride, 0);
    }
    out
}

/// Sprite sheet metadata
pub fn sheet_meta(sheet: (i32, i32), sprite: (i32, i32)) -> SpriteSheetMeta {
    SpriteSheetMeta {
        sheet_width: sheet.0,
        sheet_height: sheet.1,
        sprite_width: sprite.0,
        sprite_height: sprite.1,
    }
}

/// Two by two sprite sheet of 8x8 sprites, one solid color per sprite
///
/// Sprites 0..4 are red, green, blue and yellow. The top-right pixel of each
/// sprite is transparent.
pub fn quad_sheet() -> (BitmapImage, SpriteSheetMeta) {
    let palette = [colors::RED, colors::GREEN, colors::BLUE, colors::YELLOW];
    let size = Vec2i::new(16, 16);
    let mut pixels = Vec::with_capacity(size.area() as usize);
    for y in 0..size.y {
        for x in 0..size.x {
            let sprite = (x / 8 + (y / 8) * 2) as usize;
            let corner = x % 8 == 7 && y % 8 == 7;
            pixels.push(if corner {
                Color4u::TRANSPARENT
            } else {
                palette[sprite]
            });
        }
    }
    (
        BitmapImage::from_pixels(size, pixels),
        sheet_meta((2, 2), (8, 8)),
    )
}

/// Font metadata with `count` glyphs on an 8x8 grid, 16 cells per row
pub fn font_meta(count: usize) -> FontMeta {
    let glyphs = (0..count as i32)
        .map(|i| Glyph {
            ascii: 32 + i,
            x: (i % 16) * FONT_CELL,
            y: (i / 16) * FONT_CELL,
            width: 5,
            height: 7,
            xoffset: 0,
            yoffset: 0,
            xadvance: 6,
        })
        .collect();
    FontMeta {
        line_height: 8,
        baseline: 1,
        glyph_space: 1,
        glyphs,
    }
}

/// A complete valid font: bitmap plus 95 glyph records
pub fn full_font() -> (BitmapImage, FontMeta) {
    (
        BitmapImage::filled(FONT_BITMAP, colors::WHITE),
        font_meta(ASCII_CHAR_COUNT),
    )
}
