// Resource module - reference counted sprite sheets and fonts
//
// This module provides:
// - ResourceStore, the cache of decoded sprite sheets and fonts keyed by name
// - Sprite sheet and font models with their metadata sidecars
// - Fallback resources substituted whenever a load fails
//
// Assets live on disk as a bitmap plus a TOML sidecar sharing the same name:
//
//   <root>/<sprites_dir>/<name>.bmp + <name>.toml
//   <root>/<fonts_dir>/<name>.bmp   + <name>.toml
//
// Loading never fails from the caller's point of view: any I/O, format,
// metadata or integrity error is logged and the handle of the built-in error
// sprite sheet or error font is returned instead.

pub mod cache;
pub mod error;
pub mod font;
pub mod sprite_sheet;

pub use cache::{Release, ResourceCache};
pub use error::{ResourceError, ResourceErrorKind};
pub use font::{Font, FontMeta, Glyph, ASCII_CHAR_CHECKSUM, ASCII_CHAR_COUNT};
pub use sprite_sheet::{SpriteSheet, SpriteSheetMeta};

use crate::bitmap::{BitmapImage, BMP_FILE_EXTENSION};
use crate::config::AssetConfig;
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of metadata sidecars
pub const META_FILE_EXTENSION: &str = "toml";

/// Name of the built-in fallback sprite sheet
pub const ERROR_SPRITE_SHEET_NAME: &str = "error_spritesheet";

/// Name of the built-in fallback font
pub const ERROR_FONT_NAME: &str = "error_font";

/// Opaque key identifying a cached sprite sheet or font
///
/// Sprite sheets and fonts share one key space, so a handle is never valid
/// for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceHandle(pub(crate) u32);

impl ResourceHandle {
    pub fn key(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference counted cache of sprite sheets and fonts
#[derive(Debug)]
pub struct ResourceStore {
    assets: AssetConfig,
    next_key: u32,
    sheets: ResourceCache<SpriteSheet>,
    fonts: ResourceCache<Font>,
    error_sheet: ResourceHandle,
    error_font: ResourceHandle,
}

impl ResourceStore {
    /// Create a store and generate the permanent error resources
    pub fn new(assets: AssetConfig) -> Self {
        let mut store = Self {
            assets,
            next_key: 0,
            sheets: ResourceCache::new(),
            fonts: ResourceCache::new(),
            error_sheet: ResourceHandle(0),
            error_font: ResourceHandle(0),
        };

        store.error_sheet = store.next_handle();
        store.sheets.insert(
            store.error_sheet,
            ERROR_SPRITE_SHEET_NAME,
            SpriteSheet::error_sheet(),
            0,
            true,
        );

        store.error_font = store.next_handle();
        store.fonts.insert(
            store.error_font,
            ERROR_FONT_NAME,
            Font::error_font(),
            0,
            true,
        );

        store
    }

    pub fn assets(&self) -> &AssetConfig {
        &self.assets
    }

    fn next_handle(&mut self) -> ResourceHandle {
        let handle = ResourceHandle(self.next_key);
        self.next_key += 1;
        handle
    }

    // ------------------------------------------------------------------------
    // Sprite sheets
    // ------------------------------------------------------------------------

    /// Load a sprite sheet by name
    ///
    /// A name already in the cache gains a reference and returns its existing
    /// handle. Otherwise the bitmap and sidecar are read from the sprites
    /// directory; on any failure the error sheet's handle is returned.
    pub fn load_sprite_sheet(&mut self, name: &str) -> ResourceHandle {
        info!("loading sprite sheet '{}'", name);

        if let Some(handle) = self.sheets.find_by_name(name) {
            let count = self.sheets.acquire(handle);
            info!("sprite sheet '{}' already loaded; ref count={}", name, count);
            return handle;
        }

        match self.read_sprite_sheet(name) {
            Ok(sheet) => {
                let handle = self.next_handle();
                self.sheets.insert(handle, name, sheet, 1, false);
                info!("loaded sprite sheet [name:key]=[{}:{}]", name, handle);
                handle
            }
            Err(err) => {
                error!("failed to load sprite sheet '{}': {}", name, err);
                self.use_error_sheet()
            }
        }
    }

    /// Register an in-memory sprite sheet under a name
    ///
    /// Behaves like `load_sprite_sheet` for de-duplication: an existing name
    /// gains a reference and `sheet` is dropped.
    pub fn insert_sprite_sheet(&mut self, name: &str, sheet: SpriteSheet) -> ResourceHandle {
        if let Some(handle) = self.sheets.find_by_name(name) {
            self.sheets.acquire(handle);
            return handle;
        }
        let handle = self.next_handle();
        self.sheets.insert(handle, name, sheet, 1, false);
        debug!("inserted sprite sheet [name:key]=[{}:{}]", name, handle);
        handle
    }

    /// Read and validate a sprite sheet without touching the cache
    pub fn read_sprite_sheet(&self, name: &str) -> Result<SpriteSheet, ResourceError> {
        let dir = self.assets.sprites_path();
        let image = self.read_bitmap(&asset_path(&dir, name, BMP_FILE_EXTENSION))?;
        let meta: SpriteSheetMeta = read_meta(&asset_path(&dir, name, META_FILE_EXTENSION))?;
        SpriteSheet::new(image, meta)
    }

    fn use_error_sheet(&mut self) -> ResourceHandle {
        let count = self.sheets.acquire(self.error_sheet);
        info!("using error sprite sheet; ref count={}", count);
        self.error_sheet
    }

    /// Drop one reference to a sprite sheet, freeing it at zero
    ///
    /// The error sheet is never freed. Unknown handles are logged and ignored.
    pub fn unload_sprite_sheet(&mut self, handle: ResourceHandle) {
        match self.sheets.release(handle) {
            Release::Unknown => warn!("unloading nonexistent sprite sheet; key={}", handle),
            Release::Retained(count) => {
                debug!("released sprite sheet key={}; ref count={}", handle, count)
            }
            Release::Freed(name) => {
                info!("unloaded sprite sheet [name:key]=[{}:{}]", name, handle)
            }
        }
    }

    pub fn sprite_sheet(&self, handle: ResourceHandle) -> Option<&SpriteSheet> {
        self.sheets.get(handle)
    }

    pub fn error_sheet_handle(&self) -> ResourceHandle {
        self.error_sheet
    }

    pub fn sprite_sheet_count(&self) -> usize {
        self.sheets.len()
    }

    // ------------------------------------------------------------------------
    // Fonts
    // ------------------------------------------------------------------------

    /// Load a font by name
    ///
    /// Same caching and fallback behavior as `load_sprite_sheet`, reading from
    /// the fonts directory.
    pub fn load_font(&mut self, name: &str) -> ResourceHandle {
        info!("loading font '{}'", name);

        if let Some(handle) = self.fonts.find_by_name(name) {
            let count = self.fonts.acquire(handle);
            info!("font '{}' already loaded; ref count={}", name, count);
            return handle;
        }

        match self.read_font(name) {
            Ok(font) => {
                let handle = self.next_handle();
                self.fonts.insert(handle, name, font, 1, false);
                info!("loaded font [name:key]=[{}:{}]", name, handle);
                handle
            }
            Err(err) => {
                error!("failed to load font '{}': {}", name, err);
                self.use_error_font()
            }
        }
    }

    /// Register an in-memory font under a name
    pub fn insert_font(&mut self, name: &str, font: Font) -> ResourceHandle {
        if let Some(handle) = self.fonts.find_by_name(name) {
            self.fonts.acquire(handle);
            return handle;
        }
        let handle = self.next_handle();
        self.fonts.insert(handle, name, font, 1, false);
        debug!("inserted font [name:key]=[{}:{}]", name, handle);
        handle
    }

    /// Read and validate a font without touching the cache
    pub fn read_font(&self, name: &str) -> Result<Font, ResourceError> {
        let dir = self.assets.fonts_path();
        let image = self.read_bitmap(&asset_path(&dir, name, BMP_FILE_EXTENSION))?;
        let meta: FontMeta = read_meta(&asset_path(&dir, name, META_FILE_EXTENSION))?;
        Font::new(image, meta)
    }

    fn use_error_font(&mut self) -> ResourceHandle {
        let count = self.fonts.acquire(self.error_font);
        info!("using error font; ref count={}", count);
        self.error_font
    }

    /// Drop one reference to a font, freeing it at zero
    pub fn unload_font(&mut self, handle: ResourceHandle) {
        match self.fonts.release(handle) {
            Release::Unknown => warn!("unloading nonexistent font; key={}", handle),
            Release::Retained(count) => {
                debug!("released font key={}; ref count={}", handle, count)
            }
            Release::Freed(name) => info!("unloaded font [name:key]=[{}:{}]", name, handle),
        }
    }

    pub fn font(&self, handle: ResourceHandle) -> Option<&Font> {
        self.fonts.get(handle)
    }

    pub fn error_font_handle(&self) -> ResourceHandle {
        self.error_font
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    // ------------------------------------------------------------------------
    // Shared
    // ------------------------------------------------------------------------

    /// Reference count of a sprite sheet or font, None if not resident
    pub fn ref_count(&self, handle: ResourceHandle) -> Option<u32> {
        self.sheets
            .ref_count(handle)
            .or_else(|| self.fonts.ref_count(handle))
    }

    /// Name a resource was loaded under, None if not resident
    pub fn name(&self, handle: ResourceHandle) -> Option<&str> {
        self.sheets.name(handle).or_else(|| self.fonts.name(handle))
    }

    /// Free every resource except the error resources
    pub fn clear(&mut self) {
        self.sheets.clear_transient();
        self.fonts.clear_transient();
    }

    fn read_bitmap(&self, path: &Path) -> Result<BitmapImage, ResourceError> {
        let bytes = fs::read(path)?;
        Ok(BitmapImage::decode(&bytes, self.assets.max_bitmap_size())?)
    }
}

fn asset_path(dir: &Path, name: &str, extension: &str) -> PathBuf {
    dir.join(format!("{}.{}", name, extension))
}

fn read_meta<T: DeserializeOwned>(path: &Path) -> Result<T, ResourceError> {
    let text = fs::read_to_string(path)?;
    Ok(toml::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::colors;
    use crate::math::Vec2i;

    fn store() -> ResourceStore {
        ResourceStore::new(AssetConfig::with_root("/nonexistent/vscreen-assets"))
    }

    #[test]
    fn test_error_resources_present() {
        let store = store();
        assert_eq!(store.ref_count(store.error_sheet_handle()), Some(0));
        assert_eq!(store.ref_count(store.error_font_handle()), Some(0));
        assert_ne!(store.error_sheet_handle(), store.error_font_handle());
        assert_eq!(store.name(store.error_font_handle()), Some(ERROR_FONT_NAME));
    }

    #[test]
    fn test_missing_asset_uses_error_sheet() {
        let mut store = store();
        let handle = store.load_sprite_sheet("alien");
        assert_eq!(handle, store.error_sheet_handle());
        assert_eq!(store.ref_count(handle), Some(1));

        // Failed loads are not cached under the requested name
        assert_eq!(store.load_sprite_sheet("alien"), store.error_sheet_handle());
        assert_eq!(store.ref_count(handle), Some(2));
    }

    #[test]
    fn test_missing_font_is_io_error() {
        let store = store();
        let err = store.read_font("arcade").unwrap_err();
        assert_eq!(err.kind(), ResourceErrorKind::Io);
    }

    #[test]
    fn test_error_resources_never_evicted() {
        let mut store = store();
        let handle = store.load_font("arcade");
        assert_eq!(handle, store.error_font_handle());

        store.unload_font(handle);
        store.unload_font(handle);
        assert_eq!(store.ref_count(handle), Some(0));
        assert!(store.font(handle).is_some());
    }

    #[test]
    fn test_insert_sprite_sheet_deduplicates() {
        let mut store = store();
        let sheet = SpriteSheet::single(BitmapImage::filled(Vec2i::new(4, 4), colors::GREEN));
        let a = store.insert_sprite_sheet("block", sheet.clone());
        let b = store.insert_sprite_sheet("block", sheet);
        assert_eq!(a, b);
        assert_eq!(store.ref_count(a), Some(2));

        store.unload_sprite_sheet(a);
        assert!(store.sprite_sheet(a).is_some());
        store.unload_sprite_sheet(a);
        assert!(store.sprite_sheet(a).is_none());
        assert_eq!(store.ref_count(a), None);
    }

    #[test]
    fn test_unload_unknown_handle_is_ignored() {
        let mut store = store();
        store.unload_sprite_sheet(ResourceHandle(99));
        store.unload_font(ResourceHandle(99));
        assert_eq!(store.sprite_sheet_count(), 1);
        assert_eq!(store.font_count(), 1);
    }

    #[test]
    fn test_clear_keeps_error_resources() {
        let mut store = store();
        let sheet = SpriteSheet::error_sheet();
        store.insert_sprite_sheet("one", sheet.clone());
        store.insert_sprite_sheet("two", sheet);
        store.clear();
        assert_eq!(store.sprite_sheet_count(), 1);
        assert!(store.sprite_sheet(store.error_sheet_handle()).is_some());
    }
}
