// Resource loading errors
//
// Every variant here is recovered inside the ResourceStore: the cause is logged
// and a fallback resource is substituted, so none of these ever reach callers
// of load_sprite_sheet/load_font.

use crate::bitmap::FormatError;
use std::io;

/// Errors that can occur while loading a sprite sheet or font
#[derive(Debug)]
pub enum ResourceError {
    /// Asset file missing or unreadable
    Io(io::Error),

    /// Bitmap file rejected by the decoder
    Format(FormatError),

    /// Metadata sidecar could not be parsed
    Metadata(toml::de::Error),

    /// Sidecar geometry inconsistent with the bitmap
    MetadataMismatch(String),

    /// Font glyph table failed its count, range or checksum check
    Integrity(String),
}

/// Coarse classification of a ResourceError
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceErrorKind {
    Io,
    Format,
    MetadataMismatch,
    Integrity,
}

impl ResourceError {
    /// Classify the error
    ///
    /// An unparseable sidecar is a format problem with the asset, so it is
    /// reported as `Format` alongside bitmap decoder failures.
    pub fn kind(&self) -> ResourceErrorKind {
        match self {
            ResourceError::Io(_) => ResourceErrorKind::Io,
            ResourceError::Format(_) | ResourceError::Metadata(_) => ResourceErrorKind::Format,
            ResourceError::MetadataMismatch(_) => ResourceErrorKind::MetadataMismatch,
            ResourceError::Integrity(_) => ResourceErrorKind::Integrity,
        }
    }
}

impl std::fmt::Display for ResourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceError::Io(e) => write!(f, "I/O error: {}", e),
            ResourceError::Format(e) => write!(f, "bitmap format error: {}", e),
            ResourceError::Metadata(e) => write!(f, "metadata parse error: {}", e),
            ResourceError::MetadataMismatch(msg) => write!(f, "metadata mismatch: {}", msg),
            ResourceError::Integrity(msg) => write!(f, "integrity error: {}", msg),
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Io(e) => Some(e),
            ResourceError::Format(e) => Some(e),
            ResourceError::Metadata(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ResourceError {
    fn from(e: io::Error) -> Self {
        ResourceError::Io(e)
    }
}

impl From<FormatError> for ResourceError {
    fn from(e: FormatError) -> Self {
        ResourceError::Format(e)
    }
}

impl From<toml::de::Error> for ResourceError {
    fn from(e: toml::de::Error) -> Self {
        ResourceError::Metadata(e)
    }
}
