// Frame surface - software point renderer
//
// Rasterizes point primitives into a top-down RGBA frame that can be copied
// straight into a `pixels` buffer. Window space positions have their origin at
// the bottom-left, so rows are flipped on the way in.

use crate::color::Color4u;
use crate::compositor::PointRenderer;
use crate::math::Vec2i;

/// Top-down RGBA frame the size of the window
pub struct FrameSurface {
    size: Vec2i,
    /// RGBA bytes, row 0 at the top of the window
    frame: Vec<u8>,
    frames_presented: u64,
}

impl FrameSurface {
    /// Create a surface cleared to transparent black
    pub fn new(size: Vec2i) -> Self {
        Self {
            size,
            frame: vec![0; Self::byte_len(size)],
            frames_presented: 0,
        }
    }

    fn byte_len(size: Vec2i) -> usize {
        size.area().max(0) as usize * 4
    }

    pub fn size(&self) -> Vec2i {
        self.size
    }

    /// Resize the surface; contents are cleared
    pub fn resize(&mut self, size: Vec2i) {
        self.size = size;
        self.frame.clear();
        self.frame.resize(Self::byte_len(size), 0);
    }

    /// The frame as RGBA bytes, top row first
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    /// Number of completed `swap_buffers` calls
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Color at window position `(x, y)` (origin bottom-left)
    pub fn pixel(&self, x: i32, y: i32) -> Color4u {
        let row = self.size.y - 1 - y;
        let offset = ((x + row * self.size.x) * 4) as usize;
        Color4u::from([
            self.frame[offset],
            self.frame[offset + 1],
            self.frame[offset + 2],
            self.frame[offset + 3],
        ])
    }

    /// Copy the frame into a destination RGBA buffer of the same size
    pub fn copy_to(&self, dest: &mut [u8]) {
        let len = dest.len().min(self.frame.len());
        dest[..len].copy_from_slice(&self.frame[..len]);
    }

    fn fill_square(&mut self, center: Vec2i, point_size: i32, color: Color4u) {
        let x0 = (center.x - point_size / 2).max(0);
        let y0 = (center.y - point_size / 2).max(0);
        let x1 = (center.x - point_size / 2 + point_size).min(self.size.x);
        let y1 = (center.y - point_size / 2 + point_size).min(self.size.y);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let rgba = [color.r, color.g, color.b, 255];
        for y in y0..y1 {
            let row = (self.size.y - 1 - y) as usize;
            let start = (row * self.size.x as usize + x0 as usize) * 4;
            let end = (row * self.size.x as usize + x1 as usize) * 4;
            for pixel in self.frame[start..end].chunks_exact_mut(4) {
                pixel.copy_from_slice(&rgba);
            }
        }
    }
}

impl PointRenderer for FrameSurface {
    fn clear(&mut self, color: Color4u) {
        let rgba = [color.r, color.g, color.b, 255];
        for pixel in self.frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
    }

    fn draw_points(&mut self, colors: &[Color4u], positions: &[Vec2i], point_size: i32) {
        // Alpha test: only points with alpha > 0 reach the frame
        for (&color, &position) in colors.iter().zip(positions) {
            if !color.is_transparent() {
                self.fill_square(position, point_size, color);
            }
        }
    }

    fn swap_buffers(&mut self) {
        self.frames_presented += 1;
    }
}
