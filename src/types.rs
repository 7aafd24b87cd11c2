//! Shared types used across the pick → convert → compress pipeline.
//!
//! [`MediaDescriptor`] is the record every public operation consumes and
//! produces. Descriptors are serialized to JSON at the CLI boundary and must
//! stay identical across the picker, converter, and compressor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Supported image formats — a closed set.
///
/// `Jpg` and `Jpeg` encode identically; they exist as distinct variants so a
/// caller's requested extension round-trips unchanged (`.jpg` stays `.jpg`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Jpg,
    Jpeg,
    Png,
    WebP,
}

impl Format {
    /// File extension, without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Jpg => "jpg",
            Format::Jpeg => "jpeg",
            Format::Png => "png",
            Format::WebP => "webp",
        }
    }

    /// MIME type string, e.g. `image/jpeg`.
    pub fn mime_type(self) -> &'static str {
        match self {
            Format::Jpg | Format::Jpeg => "image/jpeg",
            Format::Png => "image/png",
            Format::WebP => "image/webp",
        }
    }

    /// Whether the format has a lossy quality knob.
    ///
    /// PNG is lossless — a quality scalar cannot shrink it, which is why the
    /// compressor maps it to JPEG (see [`crate::normalize::resolve_compress_format`]).
    pub fn is_lossy(self) -> bool {
        !matches!(self, Format::Png)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpg" => Ok(Format::Jpg),
            "jpeg" => Ok(Format::Jpeg),
            "png" => Ok(Format::Png),
            "webp" => Ok(Format::WebP),
            other => Err(format!("unsupported format: {other}")),
        }
    }
}

/// A picked, converted, or compressed image asset.
///
/// Produced by the picker or codec; immutable once returned. The `size`
/// field on a descriptor returned by conversion or compression always
/// reflects the bytes actually written by the codec for that call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    /// Primary locator, `file://`-prefixed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Secondary locator, web-style naming. Same value as `uri` when both are set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Bare filesystem path of the encoded file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Path the asset was encoded from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Encoded size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Capture or encode time, unix milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
    /// Base64 file contents, populated only when the picker is asked for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
}

impl MediaDescriptor {
    /// Descriptor pointing at an existing file, locators set from the path.
    pub fn from_path(path: &Path) -> Self {
        let locator = format!("file://{}", path.display());
        Self {
            uri: Some(locator.clone()),
            url: Some(locator),
            path: Some(path.display().to_string()),
            file_name: path.file_name().map(|n| n.to_string_lossy().into_owned()),
            ..Self::default()
        }
    }
}
