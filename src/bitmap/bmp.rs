// BMP decoder - parses uncompressed Windows bitmap files
//
// Supported:
// - Info header versions 1-5 (40, 52, 56, 108 and 124 bytes)
// - Indexed images of 1, 2, 4 and 8 bits per pixel via a palette
// - Direct color images of 24 bits (BGR) and 32 bits (BGRX or BITFIELDS)
// - Bottom-up (positive height) and top-down (negative height) row order
//
// Anything else (RLE, JPEG/PNG payloads, non-sRGB color spaces, pixel data
// that does not match the declared geometry) is rejected with a FormatError.

use super::BitmapImage;
use crate::color::Color4u;
use crate::math::Vec2i;

/// File extension of bitmap assets
pub const BMP_FILE_EXTENSION: &str = "bmp";

/// "BM" read as a little-endian u16
pub const BMP_MAGIC: u16 = 0x4D42;

/// LCS_sRGB color space tag as stored in v4/v5 headers
pub const SRGB_MAGIC: u32 = 0x7352_4742;

const FILE_HEADER_SIZE: usize = 14;
const INFO_HEADER_SIZES: [u32; 5] = [40, 52, 56, 108, 124];
const COLOR_SPACE_HEADER_SIZE: u32 = 108;

const BI_RGB: u32 = 0;
const BI_BITFIELDS: u32 = 3;

/// Errors produced while decoding a bitmap
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// File ended before a header field could be read
    Truncated { needed: usize, found: usize },

    /// First two bytes are not "BM"
    BadMagic(u16),

    /// Declared file size differs from the number of bytes present
    FileSizeMismatch { declared: u32, actual: usize },

    /// Info header size does not match any supported version
    UnsupportedInfoHeader(u32),

    /// Color plane count is not 1
    UnsupportedPlanes(u16),

    /// Bits per pixel is not one of 1, 2, 4, 8, 24 or 32
    UnsupportedBitDepth(u16),

    /// Compression is not BI_RGB, or BI_BITFIELDS on a 32 bit image
    UnsupportedCompression { compression: u32, bits_per_pixel: u16 },

    /// Color space tag is not sRGB
    UnsupportedColorSpace(u32),

    /// Width is not positive or height is zero
    InvalidDimensions { width: i32, height: i32 },

    /// Image exceeds the configured maximum dimensions
    TooLarge {
        width: i32,
        height: i32,
        max_width: i32,
        max_height: i32,
    },

    /// Palette size exceeds the bit depth or overlaps the pixel data
    BadPalette { colors: u32, bits_per_pixel: u16 },

    /// A pixel references a palette entry that does not exist
    PaletteIndexOutOfRange { index: u8, palette_len: usize },

    /// Declared image size disagrees with the geometry
    ImageSizeMismatch { declared: u32, expected: usize },

    /// Pixel data runs past the end of the file
    PixelDataOutOfBounds {
        offset: u32,
        len: usize,
        file_size: usize,
    },
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatError::Truncated { needed, found } => {
                write!(f, "file truncated: needed {} bytes, found {}", needed, found)
            }
            FormatError::BadMagic(magic) => write!(f, "bad magic number 0x{:04X}", magic),
            FormatError::FileSizeMismatch { declared, actual } => write!(
                f,
                "declared file size {} does not match actual size {}",
                declared, actual
            ),
            FormatError::UnsupportedInfoHeader(size) => {
                write!(f, "unsupported info header size {}", size)
            }
            FormatError::UnsupportedPlanes(planes) => {
                write!(f, "unsupported color plane count {}", planes)
            }
            FormatError::UnsupportedBitDepth(bpp) => {
                write!(f, "unsupported bits per pixel {}", bpp)
            }
            FormatError::UnsupportedCompression {
                compression,
                bits_per_pixel,
            } => write!(
                f,
                "unsupported compression {} at {} bits per pixel",
                compression, bits_per_pixel
            ),
            FormatError::UnsupportedColorSpace(tag) => {
                write!(f, "unsupported color space 0x{:08X}", tag)
            }
            FormatError::InvalidDimensions { width, height } => {
                write!(f, "invalid dimensions {}x{}", width, height)
            }
            FormatError::TooLarge {
                width,
                height,
                max_width,
                max_height,
            } => write!(
                f,
                "image {}x{} exceeds maximum {}x{}",
                width, height, max_width, max_height
            ),
            FormatError::BadPalette {
                colors,
                bits_per_pixel,
            } => write!(
                f,
                "bad palette of {} colors at {} bits per pixel",
                colors, bits_per_pixel
            ),
            FormatError::PaletteIndexOutOfRange { index, palette_len } => write!(
                f,
                "palette index {} out of range for {} entries",
                index, palette_len
            ),
            FormatError::ImageSizeMismatch { declared, expected } => write!(
                f,
                "declared image size {} does not match expected {}",
                declared, expected
            ),
            FormatError::PixelDataOutOfBounds {
                offset,
                len,
                file_size,
            } => write!(
                f,
                "{} bytes of pixel data at offset {} exceed file size {}",
                len, offset, file_size
            ),
        }
    }
}

impl std::error::Error for FormatError {}

/// Fixed 14 byte file header
#[derive(Debug, Clone, Copy)]
struct FileHeader {
    magic: u16,
    file_size: u32,
    pixel_offset: u32,
}

/// Channel bit masks for BI_BITFIELDS images
#[derive(Debug, Clone, Copy)]
struct ChannelMasks {
    red: u32,
    green: u32,
    blue: u32,
    alpha: u32,
}

/// Fields of the info header used by the decoder
#[derive(Debug, Clone, Copy)]
struct InfoHeader {
    header_size: u32,
    width: i32,
    height: i32,
    planes: u16,
    bits_per_pixel: u16,
    compression: u32,
    image_size: u32,
    palette_colors: u32,
    masks: Option<ChannelMasks>,
    color_space: Option<u32>,
}

#[inline]
fn read_u16(bytes: &[u8], offset: usize) -> Result<u16, FormatError> {
    bytes
        .get(offset..offset + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or(FormatError::Truncated {
            needed: offset + 2,
            found: bytes.len(),
        })
}

#[inline]
fn read_u32(bytes: &[u8], offset: usize) -> Result<u32, FormatError> {
    bytes
        .get(offset..offset + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or(FormatError::Truncated {
            needed: offset + 4,
            found: bytes.len(),
        })
}

#[inline]
fn read_i32(bytes: &[u8], offset: usize) -> Result<i32, FormatError> {
    read_u32(bytes, offset).map(|v| v as i32)
}

impl FileHeader {
    fn parse(bytes: &[u8]) -> Result<Self, FormatError> {
        Ok(FileHeader {
            magic: read_u16(bytes, 0)?,
            file_size: read_u32(bytes, 2)?,
            pixel_offset: read_u32(bytes, 10)?,
        })
    }

    fn validate(&self, actual_size: usize) -> Result<(), FormatError> {
        if self.magic != BMP_MAGIC {
            return Err(FormatError::BadMagic(self.magic));
        }
        if self.file_size as usize != actual_size {
            return Err(FormatError::FileSizeMismatch {
                declared: self.file_size,
                actual: actual_size,
            });
        }
        if self.pixel_offset as usize > actual_size {
            return Err(FormatError::PixelDataOutOfBounds {
                offset: self.pixel_offset,
                len: 0,
                file_size: actual_size,
            });
        }
        Ok(())
    }
}

impl InfoHeader {
    fn parse(bytes: &[u8]) -> Result<Self, FormatError> {
        let base = FILE_HEADER_SIZE;
        let header_size = read_u32(bytes, base)?;
        if !INFO_HEADER_SIZES.contains(&header_size) {
            return Err(FormatError::UnsupportedInfoHeader(header_size));
        }
        if bytes.len() < base + header_size as usize {
            return Err(FormatError::Truncated {
                needed: base + header_size as usize,
                found: bytes.len(),
            });
        }

        let compression = read_u32(bytes, base + 16)?;

        // v1 headers store BITFIELDS masks directly after the header; later
        // versions carry them inside the header.
        let masks = if header_size >= 52 || compression == BI_BITFIELDS {
            Some(ChannelMasks {
                red: read_u32(bytes, base + 40)?,
                green: read_u32(bytes, base + 44)?,
                blue: read_u32(bytes, base + 48)?,
                alpha: if header_size >= 56 {
                    read_u32(bytes, base + 52)?
                } else {
                    0
                },
            })
        } else {
            None
        };

        let color_space = if header_size >= COLOR_SPACE_HEADER_SIZE {
            Some(read_u32(bytes, base + 56)?)
        } else {
            None
        };

        Ok(InfoHeader {
            header_size,
            width: read_i32(bytes, base + 4)?,
            height: read_i32(bytes, base + 8)?,
            planes: read_u16(bytes, base + 12)?,
            bits_per_pixel: read_u16(bytes, base + 14)?,
            compression,
            image_size: read_u32(bytes, base + 20)?,
            palette_colors: read_u32(bytes, base + 32)?,
            masks,
            color_space,
        })
    }

    fn validate(&self, max_size: Vec2i) -> Result<(), FormatError> {
        if self.planes != 1 {
            return Err(FormatError::UnsupportedPlanes(self.planes));
        }
        if !matches!(self.bits_per_pixel, 1 | 2 | 4 | 8 | 24 | 32) {
            return Err(FormatError::UnsupportedBitDepth(self.bits_per_pixel));
        }
        let compression_ok = match self.compression {
            BI_RGB => true,
            BI_BITFIELDS => self.bits_per_pixel == 32,
            _ => false,
        };
        if !compression_ok {
            return Err(FormatError::UnsupportedCompression {
                compression: self.compression,
                bits_per_pixel: self.bits_per_pixel,
            });
        }
        if let Some(tag) = self.color_space {
            if tag != SRGB_MAGIC {
                return Err(FormatError::UnsupportedColorSpace(tag));
            }
        }
        if self.width <= 0 || self.height == 0 {
            return Err(FormatError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.width > max_size.x || self.height.unsigned_abs() > max_size.y.max(0) as u32 {
            return Err(FormatError::TooLarge {
                width: self.width,
                height: self.height,
                max_width: max_size.x,
                max_height: max_size.y,
            });
        }
        Ok(())
    }

    fn is_indexed(&self) -> bool {
        self.bits_per_pixel <= 8
    }
}

/// Number of bytes in one stored row, including padding to a 4 byte boundary
#[inline]
pub fn row_stride(bits_per_pixel: u16, width: usize) -> usize {
    (bits_per_pixel as usize * width).div_ceil(32) * 4
}

/// Decode a complete BMP file into a bottom-up RGBA bitmap
///
/// # Arguments
/// * `bytes` - The whole file
/// * `max_size` - Largest accepted width and height
///
/// # Returns
/// The decoded image, or the first format violation found
pub fn decode_bmp(bytes: &[u8], max_size: Vec2i) -> Result<BitmapImage, FormatError> {
    let file_header = FileHeader::parse(bytes)?;
    file_header.validate(bytes.len())?;

    let info = InfoHeader::parse(bytes)?;
    info.validate(max_size)?;

    let width = info.width as usize;
    let height = info.height.unsigned_abs() as usize;
    let stride = row_stride(info.bits_per_pixel, width);
    let data_len = stride * height;

    if info.image_size != 0 && info.image_size as usize != data_len {
        return Err(FormatError::ImageSizeMismatch {
            declared: info.image_size,
            expected: data_len,
        });
    }

    let start = file_header.pixel_offset as usize;
    let data = bytes
        .get(start..start + data_len)
        .ok_or(FormatError::PixelDataOutOfBounds {
            offset: file_header.pixel_offset,
            len: data_len,
            file_size: bytes.len(),
        })?;

    let palette = if info.is_indexed() {
        read_palette(bytes, &info, file_header.pixel_offset)?
    } else {
        Vec::new()
    };

    let mut pixels = vec![Color4u::TRANSPARENT; width * height];
    let top_down = info.height < 0;

    for (stored_row, row_bytes) in data.chunks_exact(stride).enumerate() {
        let row = if top_down {
            height - 1 - stored_row
        } else {
            stored_row
        };
        let dest = &mut pixels[row * width..(row + 1) * width];

        match info.bits_per_pixel {
            1 | 2 | 4 | 8 => extract_indexed_row(row_bytes, info.bits_per_pixel, &palette, dest)?,
            24 => extract_bgr_row(row_bytes, dest),
            32 => match (info.compression, info.masks) {
                (BI_BITFIELDS, Some(masks)) => extract_masked_row(row_bytes, masks, dest),
                _ => extract_bgrx_row(row_bytes, dest),
            },
            bpp => return Err(FormatError::UnsupportedBitDepth(bpp)),
        }
    }

    Ok(BitmapImage::from_pixels(
        Vec2i::new(width as i32, height as i32),
        pixels,
    ))
}

/// Read the palette table that follows the info header
fn read_palette(
    bytes: &[u8],
    info: &InfoHeader,
    pixel_offset: u32,
) -> Result<Vec<Color4u>, FormatError> {
    let max_colors = 1u32 << info.bits_per_pixel;
    let colors = if info.palette_colors == 0 {
        max_colors
    } else {
        info.palette_colors
    };

    let start = FILE_HEADER_SIZE + info.header_size as usize;
    let end = start + colors as usize * 4;
    if colors > max_colors || end > pixel_offset as usize {
        return Err(FormatError::BadPalette {
            colors,
            bits_per_pixel: info.bits_per_pixel,
        });
    }

    Ok(bytes[start..end]
        .chunks_exact(4)
        .map(|bgrx| Color4u::rgb(bgrx[2], bgrx[1], bgrx[0]))
        .collect())
}

fn extract_indexed_row(
    row_bytes: &[u8],
    bits_per_pixel: u16,
    palette: &[Color4u],
    dest: &mut [Color4u],
) -> Result<(), FormatError> {
    let bpp = bits_per_pixel as usize;
    let mask = ((1u16 << bpp) - 1) as u8;

    for (col, pixel) in dest.iter_mut().enumerate() {
        let bit = col * bpp;
        let shift = 8 - bpp - (bit % 8);
        let index = (row_bytes[bit / 8] >> shift) & mask;
        *pixel = *palette
            .get(index as usize)
            .ok_or(FormatError::PaletteIndexOutOfRange {
                index,
                palette_len: palette.len(),
            })?;
    }
    Ok(())
}

fn extract_bgr_row(row_bytes: &[u8], dest: &mut [Color4u]) {
    for (pixel, bgr) in dest.iter_mut().zip(row_bytes.chunks_exact(3)) {
        *pixel = Color4u::rgb(bgr[2], bgr[1], bgr[0]);
    }
}

fn extract_bgrx_row(row_bytes: &[u8], dest: &mut [Color4u]) {
    for (pixel, bgrx) in dest.iter_mut().zip(row_bytes.chunks_exact(4)) {
        *pixel = Color4u::rgb(bgrx[2], bgrx[1], bgrx[0]);
    }
}

fn extract_masked_row(row_bytes: &[u8], masks: ChannelMasks, dest: &mut [Color4u]) {
    for (pixel, raw) in dest.iter_mut().zip(row_bytes.chunks_exact(4)) {
        let value = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
        *pixel = Color4u::new(
            extract_channel(value, masks.red),
            extract_channel(value, masks.green),
            extract_channel(value, masks.blue),
            if masks.alpha == 0 {
                255
            } else {
                extract_channel(value, masks.alpha)
            },
        );
    }
}

/// Extract the bits selected by `mask` and scale them to 8 bits
#[inline]
fn extract_channel(value: u32, mask: u32) -> u8 {
    if mask == 0 {
        return 0;
    }
    let shift = mask.trailing_zeros();
    let bits = (mask >> shift).count_ones();
    let channel = (value & mask) >> shift;
    if bits >= 8 {
        (channel >> (bits - 8)) as u8
    } else {
        ((channel * 255) / ((1 << bits) - 1)) as u8
    }
}
