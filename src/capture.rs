// Screen capture
//
// Saves the pixel buffer of a virtual screen as a PNG file.

use crate::screen::{ScreenId, VirtualScreen};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur while capturing a screen
#[derive(Debug)]
pub enum CaptureError {
    /// I/O error
    Io(io::Error),

    /// PNG encoding error
    PngEncoding(png::EncodingError),
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::Io(e) => write!(f, "I/O error: {}", e),
            CaptureError::PngEncoding(e) => write!(f, "PNG encoding error: {}", e),
        }
    }
}

impl std::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CaptureError::Io(e) => Some(e),
            CaptureError::PngEncoding(e) => Some(e),
        }
    }
}

impl From<io::Error> for CaptureError {
    fn from(e: io::Error) -> Self {
        CaptureError::Io(e)
    }
}

impl From<png::EncodingError> for CaptureError {
    fn from(e: png::EncodingError) -> Self {
        CaptureError::PngEncoding(e)
    }
}

/// Save a screen's pixels as `screen<id>_<timestamp>.png` inside `dir`
///
/// The directory is created if needed. Transparent pixels stay transparent,
/// every other pixel is written fully opaque.
///
/// # Returns
///
/// Path of the written file
pub fn save_screen_png(
    id: ScreenId,
    screen: &VirtualScreen,
    dir: &Path,
) -> Result<PathBuf, CaptureError> {
    fs::create_dir_all(dir)?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S_%3f");
    let file_path = dir.join(format!("screen{}_{}.png", id.0, timestamp));

    let resolution = screen.resolution();
    let rgba = screen_to_rgba(screen);
    save_png(&file_path, &rgba, resolution.x as u32, resolution.y as u32)?;

    log::info!("captured {} screen to {}", resolution, file_path.display());
    Ok(file_path)
}

/// Convert a screen to top-down RGBA bytes
///
/// Screen row 0 is the bottom row, PNG row 0 is the top row.
fn screen_to_rgba(screen: &VirtualScreen) -> Vec<u8> {
    let width = screen.resolution().x as usize;
    let mut rgba = Vec::with_capacity(screen.colors().len() * 4);

    for row in screen.colors().chunks_exact(width).rev() {
        for color in row {
            let alpha = if color.is_transparent() { 0 } else { 255 };
            rgba.extend_from_slice(&[color.r, color.g, color.b, alpha]);
        }
    }

    rgba
}

fn save_png(path: &Path, data: &[u8], width: u32, height: u32) -> Result<(), CaptureError> {
    let file = fs::File::create(path)?;
    let w = io::BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(data)?;

    Ok(())
}
