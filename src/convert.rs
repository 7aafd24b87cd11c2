//! Format conversion and the pick → convert orchestrator.
//!
//! [`convert_media`] re-encodes each source once at the requested quality.
//! Batch items run concurrently through rayon and join fail-fast: the first
//! per-item error rejects the whole batch. This is the converter's contract;
//! the compressor's soft-failure semantics live in [`crate::compress`].

use crate::compress::{CompressRequest, compress_media};
use crate::imaging::{CodecError, EncodeParams, EncodedImage, ImageCodec, Quality};
use crate::naming;
use crate::normalize::resolve_path;
use crate::pick::{MediaPicker, PickError, PickerOptions};
use crate::types::{Format, MediaDescriptor};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("Descriptor has no locator: neither uri nor url is set")]
    MissingLocator,
    #[error("Source image not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("Size budget must be positive")]
    InvalidBudget,
    #[error("Cannot meet a size budget with lossless {0}; pick a lossy format or enable the lossy fallback")]
    LosslessTarget(Format),
}

/// A conversion of one or more descriptors to a target format.
///
/// Unset fields fall back to format `jpeg` and quality `1.0`.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub sources: Vec<MediaDescriptor>,
    pub format: Option<Format>,
    pub quality: Option<Quality>,
}

impl ConvertRequest {
    pub fn single(source: MediaDescriptor) -> Self {
        Self::batch(vec![source])
    }

    pub fn batch(sources: Vec<MediaDescriptor>) -> Self {
        Self {
            sources,
            format: None,
            quality: None,
        }
    }
}

/// Resolve a descriptor's locator and check the file exists.
pub(crate) fn source_path(descriptor: &MediaDescriptor) -> Result<PathBuf, ConvertError> {
    let path = resolve_path(descriptor).ok_or(ConvertError::MissingLocator)?;
    if !path.exists() {
        return Err(ConvertError::SourceNotFound(path));
    }
    Ok(path)
}

/// Descriptor for a freshly encoded file. `size` is the byte count the codec
/// reported for the file it wrote.
pub(crate) fn build_descriptor(
    encoded: &EncodedImage,
    format: Format,
    source: &Path,
) -> MediaDescriptor {
    let mut descriptor = MediaDescriptor::from_path(&encoded.path);
    descriptor.mime_type = Some(format.mime_type().to_string());
    descriptor.size = Some(encoded.size_bytes);
    descriptor.width = Some(encoded.width);
    descriptor.height = Some(encoded.height);
    descriptor.original_path = Some(source.display().to_string());
    descriptor.timestamp_ms = Some(naming::timestamp_ms());
    descriptor
}

fn convert_one(
    codec: &impl ImageCodec,
    descriptor: &MediaDescriptor,
    format: Format,
    quality: Quality,
    out_dir: &Path,
) -> Result<MediaDescriptor, ConvertError> {
    let source = source_path(descriptor)?;
    let output = out_dir.join(naming::unique_name(format));
    let encoded = codec.encode(&EncodeParams::new(source.clone(), output, format, quality))?;
    Ok(build_descriptor(&encoded, format, &source))
}

/// Convert every source descriptor to the requested format.
///
/// One codec invocation per item; items run concurrently and the result
/// preserves input order. Any item failure fails the whole batch.
pub fn convert_media(
    codec: &impl ImageCodec,
    request: &ConvertRequest,
    out_dir: &Path,
) -> Result<Vec<MediaDescriptor>, ConvertError> {
    std::fs::create_dir_all(out_dir)?;
    let format = request.format.unwrap_or(Format::Jpeg);
    let quality = request.quality.unwrap_or_default();

    request
        .sources
        .par_iter()
        .map(|descriptor| convert_one(codec, descriptor, format, quality, out_dir))
        .collect()
}

/// Conversion settings for [`pick_and_convert`]. Setting `max_size_kb`
/// switches the flow from plain conversion to size-targeted compression.
#[derive(Debug, Clone)]
pub struct ConverterOptions {
    pub format: Option<Format>,
    pub quality: Option<Quality>,
    pub max_size_kb: Option<u32>,
    /// Whether a size budget may silently downgrade a lossless target format
    /// to JPEG. See [`CompressRequest::allow_lossy_fallback`].
    pub allow_lossy_fallback: bool,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            format: None,
            quality: None,
            max_size_kb: None,
            allow_lossy_fallback: true,
        }
    }
}

#[derive(Error, Debug)]
pub enum PickConvertError {
    #[error(transparent)]
    Pick(#[from] PickError),
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

/// Pick, then convert or compress.
///
/// Passes through `None` when the picker yields nothing. Delegates to the
/// compress path when `max_size_kb` is set, plain conversion otherwise.
pub fn pick_and_convert(
    picker: &impl MediaPicker,
    codec: &impl ImageCodec,
    picker_options: &PickerOptions,
    converter_options: &ConverterOptions,
    out_dir: &Path,
) -> Result<Option<Vec<MediaDescriptor>>, PickConvertError> {
    let Some(picked) = picker.pick(picker_options)? else {
        return Ok(None);
    };

    let converted = match converter_options.max_size_kb {
        Some(max_size_kb) => compress_media(
            codec,
            &CompressRequest {
                sources: picked,
                format: converter_options.format,
                max_size_kb,
                allow_lossy_fallback: converter_options.allow_lossy_fallback,
            },
            out_dir,
        )?,
        None => convert_media(
            codec,
            &ConvertRequest {
                sources: picked,
                format: converter_options.format,
                quality: converter_options.quality,
            },
            out_dir,
        )?,
    };
    Ok(Some(converted))
}
