//! Production codec built on the `image` crate, plus libwebp for lossy WebP.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` |
//! | Decode (JPEG, PNG, WebP) | `image` crate (pure Rust decoders) |
//! | Downscale | `image::DynamicImage::resize` with `Lanczos3` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (lossless, quality ignored) |
//! | Encode → WebP | `webp::Encoder` (libwebp — the `image` crate's WebP encoder is lossless-only) |

use super::backend::{CodecError, Dimensions, EncodedImage, ImageCodec};
use super::params::EncodeParams;
use crate::types::Format;
use image::imageops::FilterType;
use image::{DynamicImage, ImageEncoder, ImageReader};
use std::path::Path;

/// Extensions whose decoders are compiled in.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Codec over the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a path carries one of the decodable image extensions.
pub fn is_supported_source(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| e.eq_ignore_ascii_case(s))
        })
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, CodecError> {
    if !is_supported_source(path) {
        return Err(CodecError::UnsupportedFormat(
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("<none>")
                .to_string(),
        ));
    }
    ImageReader::open(path)
        .map_err(CodecError::Io)?
        .decode()
        .map_err(|e| CodecError::Decode(format!("{}: {}", path.display(), e)))
}

/// Downscale proportionally when the image exceeds either bound. Never upscales.
fn fit_within(img: DynamicImage, max_width: Option<u32>, max_height: Option<u32>) -> DynamicImage {
    if max_width.is_none() && max_height.is_none() {
        return img;
    }
    let bound_w = max_width.unwrap_or(u32::MAX);
    let bound_h = max_height.unwrap_or(u32::MAX);
    if img.width() > bound_w || img.height() > bound_h {
        img.resize(bound_w, bound_h, FilterType::Lanczos3)
    } else {
        img
    }
}

fn save_jpeg(img: &DynamicImage, path: &Path, quality: u8) -> Result<(), CodecError> {
    // JPEG has no alpha channel; flatten to RGB8 before encoding.
    let rgb = img.to_rgb8();
    let file = std::fs::File::create(path).map_err(CodecError::Io)?;
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality)
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| CodecError::Encode(format!("JPEG encode failed: {e}")))
}

fn save_png(img: &DynamicImage, path: &Path) -> Result<(), CodecError> {
    let file = std::fs::File::create(path).map_err(CodecError::Io)?;
    let writer = std::io::BufWriter::new(file);
    img.write_with_encoder(image::codecs::png::PngEncoder::new(writer))
        .map_err(|e| CodecError::Encode(format!("PNG encode failed: {e}")))
}

fn save_webp(img: &DynamicImage, path: &Path, quality: u8) -> Result<(), CodecError> {
    let rgb = img.to_rgb8();
    let encoder = webp::Encoder::from_rgb(rgb.as_raw(), rgb.width(), rgb.height());
    let encoded = encoder.encode(quality as f32);
    std::fs::write(path, &*encoded).map_err(CodecError::Io)
}

impl ImageCodec for RustCodec {
    fn identify(&self, path: &Path) -> Result<Dimensions, CodecError> {
        let (width, height) = image::image_dimensions(path)
            .map_err(|e| CodecError::Decode(format!("{}: {}", path.display(), e)))?;
        Ok(Dimensions { width, height })
    }

    fn encode(&self, params: &EncodeParams) -> Result<EncodedImage, CodecError> {
        let img = load_image(&params.source)?;
        let img = fit_within(img, params.max_width, params.max_height);

        match params.format {
            Format::Jpg | Format::Jpeg => {
                save_jpeg(&img, &params.output, params.quality.as_percent())?
            }
            Format::Png => save_png(&img, &params.output)?,
            Format::WebP => save_webp(&img, &params.output, params.quality.as_percent())?,
        }

        let size_bytes = std::fs::metadata(&params.output)?.len();
        Ok(EncodedImage {
            path: params.output.clone(),
            width: img.width(),
            height: img.height(),
            size_bytes,
        })
    }
}
