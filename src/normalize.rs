//! Locator and format normalization.
//!
//! Two small contracts sit between the public API and the codec:
//!
//! - [`resolve_path`] turns a descriptor's `file://`-style locator into a
//!   bare filesystem path the codec can open.
//! - [`resolve_compress_format`] picks the encode format for a size-budgeted
//!   compression, downgrading lossless PNG to JPEG since a quality scalar
//!   cannot shrink a lossless encoding.

use crate::types::{Format, MediaDescriptor};
use std::path::PathBuf;

/// Resolve a descriptor's locator to a bare filesystem path.
///
/// The primary locator (`uri`) is preferred over the secondary (`url`).
/// Exactly one leading `file://` prefix is stripped; locators that are
/// already bare paths pass through unchanged. Returns `None` when neither
/// locator is set — the caller's codec invocation then fails at the adapter
/// boundary with a source-not-found error, not here.
pub fn resolve_path(descriptor: &MediaDescriptor) -> Option<PathBuf> {
    let locator = descriptor.uri.as_deref().or(descriptor.url.as_deref())?;
    let bare = locator.strip_prefix("file://").unwrap_or(locator);
    Some(PathBuf::from(bare))
}

/// Resolve the target format for a size-budgeted compression.
///
/// `None` and `Png` map to `Jpg`; every other format passes through.
/// Lossless PNG has no quality knob, so compression switches to a lossy
/// format rather than failing. Callers that would rather fail than lose
/// their lossless format disable the fallback on the request (see
/// [`crate::compress::CompressRequest::allow_lossy_fallback`]).
pub fn resolve_compress_format(requested: Option<Format>) -> Format {
    match requested {
        None | Some(Format::Png) => Format::Jpg,
        Some(other) => other,
    }
}
