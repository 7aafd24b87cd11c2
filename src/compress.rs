//! Size-targeted compression over a fixed descending quality ladder.
//!
//! Each item walks [`QUALITY_LADDER`] from best quality down, invoking the
//! codec once per rung; the first result at or under the byte budget wins —
//! no binary search, no re-trial. An item whose ladder is exhausted is a
//! soft failure: a warning is logged and the item is dropped from the batch
//! result, because callers batch-process inputs and must continue with the
//! remainder. Every other failure rejects the whole batch.
//!
//! Attempt files are cleaned up as the ladder descends: an over-budget
//! encode is deleted before the next rung, so on success exactly the
//! returned file remains and on exhaustion nothing does.

use crate::convert::{ConvertError, build_descriptor, source_path};
use crate::imaging::{EncodeParams, ImageCodec, Quality};
use crate::naming;
use crate::normalize::resolve_compress_format;
use crate::types::{Format, MediaDescriptor};
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, warn};

/// Quality levels tried in order until the size budget is met.
/// Constant for the process lifetime.
pub const QUALITY_LADDER: [f32; 8] = [1.0, 0.9, 0.8, 0.7, 0.6, 0.5, 0.4, 0.3];

/// A compression of one or more descriptors to a maximum size in kilobytes.
///
/// There is no quality field — quality is derived by walking the ladder.
#[derive(Debug, Clone)]
pub struct CompressRequest {
    pub sources: Vec<MediaDescriptor>,
    pub format: Option<Format>,
    /// Byte-size budget in kilobytes; must be positive.
    pub max_size_kb: u32,
    /// When `true` (the default), a requested PNG target is silently
    /// downgraded to JPEG since lossless PNG has no quality knob. When
    /// `false`, an explicit PNG request is rejected with
    /// [`ConvertError::LosslessTarget`] instead of being changed behind the
    /// caller's back.
    pub allow_lossy_fallback: bool,
}

impl CompressRequest {
    pub fn single(source: MediaDescriptor, max_size_kb: u32) -> Self {
        Self::batch(vec![source], max_size_kb)
    }

    pub fn batch(sources: Vec<MediaDescriptor>, max_size_kb: u32) -> Self {
        Self {
            sources,
            format: None,
            max_size_kb,
            allow_lossy_fallback: true,
        }
    }
}

fn compress_one(
    codec: &impl ImageCodec,
    descriptor: &MediaDescriptor,
    format: Format,
    budget_bytes: u64,
    budget_kb: u32,
    out_dir: &Path,
) -> Result<Option<MediaDescriptor>, ConvertError> {
    let source = source_path(descriptor)?;

    for &level in QUALITY_LADDER.iter() {
        let output = out_dir.join(naming::unique_name(format));
        debug!(source = %source.display(), quality = level, "compression attempt");
        let encoded = codec.encode(&EncodeParams::new(
            source.clone(),
            output,
            format,
            Quality::new(level),
        ))?;

        if encoded.size_bytes <= budget_bytes {
            return Ok(Some(build_descriptor(&encoded, format, &source)));
        }
        // Over budget: drop the attempt before trying the next rung.
        std::fs::remove_file(&encoded.path)?;
    }

    warn!(
        source = %source.display(),
        budget_kb,
        "size budget not met at any quality level, dropping item"
    );
    Ok(None)
}

/// Compress every source descriptor to at most `max_size_kb` kilobytes.
///
/// Items run concurrently; the result keeps only the items that met the
/// budget, in input order — items that never met it are absent, not nulled.
/// Locator, source, and codec failures reject the whole batch.
pub fn compress_media(
    codec: &impl ImageCodec,
    request: &CompressRequest,
    out_dir: &Path,
) -> Result<Vec<MediaDescriptor>, ConvertError> {
    if request.max_size_kb == 0 {
        return Err(ConvertError::InvalidBudget);
    }
    if !request.allow_lossy_fallback && request.format == Some(Format::Png) {
        return Err(ConvertError::LosslessTarget(Format::Png));
    }

    std::fs::create_dir_all(out_dir)?;
    let format = resolve_compress_format(request.format);
    let budget_bytes = request.max_size_kb as u64 * 1024;

    let outcomes: Vec<Option<MediaDescriptor>> = request
        .sources
        .par_iter()
        .map(|descriptor| {
            compress_one(
                codec,
                descriptor,
                format,
                budget_bytes,
                request.max_size_kb,
                out_dir,
            )
        })
        .collect::<Result<_, _>>()?;

    Ok(outcomes.into_iter().flatten().collect())
}
