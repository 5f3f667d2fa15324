// Configuration management
//
// Handles window, asset and pixel size settings and their persistence as TOML.

use crate::math::Vec2i;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default configuration file path
pub const CONFIG_FILE: &str = "vscreen.toml";

/// Top level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GfxConfig {
    /// Window settings
    pub window: WindowConfig,

    /// Asset locations and limits
    pub assets: AssetConfig,

    /// Host point size range
    pub pixel_size: PixelSizeRange,
}

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    pub title: String,

    /// Initial window width in real pixels
    pub width: i32,

    /// Initial window height in real pixels
    pub height: i32,

    /// Target frame rate
    pub target_fps: u32,

    /// Enable VSync
    pub vsync: bool,
}

/// Asset configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Root asset directory
    pub root: PathBuf,

    /// Sprite sheet directory, relative to root
    pub sprites_dir: PathBuf,

    /// Font directory, relative to root
    pub fonts_dir: PathBuf,

    /// Largest accepted bitmap width
    pub max_bitmap_width: i32,

    /// Largest accepted bitmap height
    pub max_bitmap_height: i32,
}

/// Range of point sizes the host renderer supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelSizeRange {
    pub min: i32,
    pub max: i32,
}

impl WindowConfig {
    pub fn size(&self) -> Vec2i {
        Vec2i::new(self.width, self.height)
    }
}

impl AssetConfig {
    /// Asset configuration rooted at `root` with default sub-directories
    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn sprites_path(&self) -> PathBuf {
        self.root.join(&self.sprites_dir)
    }

    pub fn fonts_path(&self) -> PathBuf {
        self.root.join(&self.fonts_dir)
    }

    pub fn max_bitmap_size(&self) -> Vec2i {
        Vec2i::new(self.max_bitmap_width, self.max_bitmap_height)
    }
}

impl PixelSizeRange {
    /// Clamp a requested pixel size into the supported range (never below 1)
    pub fn clamp(&self, size: i32) -> i32 {
        size.clamp(self.min.max(1), self.max.max(self.min).max(1))
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "vscreen".to_string(),
            width: 896,
            height: 1024,
            target_fps: 60,
            vsync: true,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            sprites_dir: PathBuf::from("sprites"),
            fonts_dir: PathBuf::from("fonts"),
            max_bitmap_width: 1024,
            max_bitmap_height: 1024,
        }
    }
}

impl Default for PixelSizeRange {
    fn default() -> Self {
        Self { min: 1, max: 64 }
    }
}

impl GfxConfig {
    /// Load configuration from file or create default
    ///
    /// If the configuration file doesn't exist, creates a default configuration
    /// and saves it to the file. An unreadable or malformed file is left as is.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load(&path).unwrap_or_else(|err| {
            log::warn!(
                "using default configuration; could not load '{}': {}",
                path.as_ref().display(),
                err
            );
            let config = Self::default();
            if err.kind() == io::ErrorKind::NotFound {
                // Try to save the default config, but don't fail if we can't
                let _ = config.save(&path);
            }
            config
        })
    }

    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, io::Error> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), io::Error> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)
    }
}
