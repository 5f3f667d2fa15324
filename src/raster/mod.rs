// Raster module - stateless draw routines over a virtual screen
//
// Every routine writes straight into the screen's color buffer. Sprite, text,
// line and point routines route each pixel through the screen's pixel
// transform, so transparent source pixels are skipped and the color mode is
// honored. Clear and fill write the buffer directly.
//
// Pixels falling outside the screen are clipped individually; a partially
// visible sprite draws its visible part on all four edges.

use crate::bitmap::BitmapImage;
use crate::color::Color4u;
use crate::math::{IRect, Vec2i};
use crate::resource::{Font, SpriteSheet};
use crate::screen::VirtualScreen;

/// Copy a rectangle of `image` to `position`, clipped to the screen
///
/// Returns the number of pixels written.
fn blit(screen: &mut VirtualScreen, image: &BitmapImage, src: IRect, position: Vec2i) -> usize {
    let res = screen.resolution();

    // Visible part of the source rectangle in local coordinates
    let col_start = position.x.saturating_neg().max(0);
    let col_end = src.w.min(res.x.saturating_sub(position.x));
    let row_start = position.y.saturating_neg().max(0);
    let row_end = src.h.min(res.y.saturating_sub(position.y));

    let mut written = 0;
    for row in row_start..row_end {
        let line = image.row(src.y + row);
        for col in col_start..col_end {
            let color = line[(src.x + col) as usize];
            if screen.plot(position.x + col, position.y + row, color) {
                written += 1;
            }
        }
    }
    written
}

/// Draw a sprite with its bottom-left corner at `position`
///
/// An index past the end of the sheet draws sprite 0.
pub fn draw_sprite(screen: &mut VirtualScreen, sheet: &SpriteSheet, index: usize, position: Vec2i) {
    blit(screen, sheet.image(), sheet.sprite_rect(index), position);
}

/// Draw one pixel column of a sprite with its bottom pixel at `position`
///
/// A column past the sprite's width draws column 0.
pub fn draw_sprite_column(
    screen: &mut VirtualScreen,
    sheet: &SpriteSheet,
    index: usize,
    column: usize,
    position: Vec2i,
) {
    let rect = sheet.sprite_rect(index);
    let column = if column < rect.w as usize { column as i32 } else { 0 };
    let src = IRect::new(rect.x + column, rect.y, 1, rect.h);
    blit(screen, sheet.image(), src, position);
}

/// Draw a single line of text starting at `position`
///
/// Each glyph is placed at `(pen + xoffset, position.y + baseline + yoffset)`
/// and the pen then advances by the glyph's advance plus the font's glyph
/// spacing. Newlines are skipped. Drawing stops at the first glyph that starts
/// past the right edge of the screen.
///
/// # Panics
/// Panics on a character outside printable ASCII
pub fn draw_text(screen: &mut VirtualScreen, font: &Font, text: &str, position: Vec2i) {
    let right = screen.resolution().x;
    let baseline = position.y + font.baseline();
    let mut pen = position.x;

    for c in text.chars() {
        if c == '\n' {
            continue;
        }

        let glyph = font.glyph(c);
        let x = pen + glyph.xoffset;
        if x >= right {
            break;
        }

        blit(
            screen,
            font.image(),
            glyph.rect(),
            Vec2i::new(x, baseline + glyph.yoffset),
        );
        pen += glyph.xadvance + font.glyph_space();
    }
}

/// Draw a line between two points, both ends inclusive
///
/// Endpoints are clamped into the screen before drawing. Sloped lines step
/// along their major axis and round the minor coordinate.
pub fn draw_line(screen: &mut VirtualScreen, p0: Vec2i, p1: Vec2i, color: Color4u) {
    let res = screen.resolution();
    let clamp = |p: Vec2i| Vec2i::new(p.x.clamp(0, res.x - 1), p.y.clamp(0, res.y - 1));
    let (p0, p1) = (clamp(p0), clamp(p1));

    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;

    if dx == 0 {
        for y in p0.y.min(p1.y)..=p0.y.max(p1.y) {
            screen.plot(p0.x, y, color);
        }
    } else if dy == 0 {
        for x in p0.x.min(p1.x)..=p0.x.max(p1.x) {
            screen.plot(x, p0.y, color);
        }
    } else if dx.abs() >= dy.abs() {
        // y = m*x + c
        let m = dy as f64 / dx as f64;
        let c = p0.y as f64 - m * p0.x as f64;
        for x in p0.x.min(p1.x)..=p0.x.max(p1.x) {
            let y = (m * x as f64 + c).round() as i32;
            screen.plot(x, y, color);
        }
    } else {
        // x = m*y + c
        let m = dx as f64 / dy as f64;
        let c = p0.x as f64 - m * p0.y as f64;
        for y in p0.y.min(p1.y)..=p0.y.max(p1.y) {
            let x = (m * y as f64 + c).round() as i32;
            screen.plot(x, y, color);
        }
    }
}

/// Draw a single pixel (clipped)
pub fn draw_point(screen: &mut VirtualScreen, position: Vec2i, color: Color4u) {
    screen.plot(position.x, position.y, color);
}

/// Clear every pixel to transparent
pub fn clear(screen: &mut VirtualScreen) {
    screen.fill(Color4u::TRANSPARENT);
}

/// Set every channel of every pixel to `shade`
///
/// A shade of 0 is transparent, so the darkest opaque shade is 1.
pub fn fill_shade(screen: &mut VirtualScreen, shade: u8) {
    screen.fill(Color4u::shade(shade));
}

/// Set every pixel to `color`
pub fn fill_color(screen: &mut VirtualScreen, color: Color4u) {
    screen.fill(color);
}
