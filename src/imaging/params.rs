//! Parameter types for codec operations.
//!
//! These structs describe *what* to encode, not *how*. They are the interface
//! between the high-level convert/compress modules (which decide what files
//! to produce) and the [`backend`](super::backend) (which does the pixel
//! work), so backends can be swapped for a mock in tests without touching
//! operation logic.

use crate::types::Format;
use std::path::PathBuf;

/// Quality scalar for lossy encoding, clamped to `[0.0, 1.0]` on construction.
///
/// `1.0` is the best quality the encoder offers, `0.0` the worst. The value
/// is a scalar rather than a percentage to match the picker/converter public
/// contract; backends map it to whatever range their encoder expects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quality(f32);

impl Quality {
    pub fn new(value: f32) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// The scalar mapped onto the 1–100 integer range used by JPEG and WebP
    /// encoders. `0.0` maps to 1, not 0 — encoders reject a zero quality.
    pub fn as_percent(self) -> u8 {
        ((self.0 * 100.0).round() as u8).max(1)
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Full specification of one encode: source, destination, format, quality,
/// and an optional downscale bound.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub format: Format,
    pub quality: Quality,
    /// When set and the source exceeds it, the image is downscaled
    /// proportionally before encoding. Never upscales.
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

impl EncodeParams {
    pub fn new(source: PathBuf, output: PathBuf, format: Format, quality: Quality) -> Self {
        Self {
            source,
            output,
            format,
            quality,
            max_width: None,
            max_height: None,
        }
    }
}
