//! # media-convert
//!
//! Image picking, format conversion, and size-targeted compression.
//!
//! Three operations over one record type, [`MediaDescriptor`]:
//!
//! ```text
//! 1. Pick      directory/camera source  →  descriptors
//! 2. Convert   descriptors              →  re-encoded files (jpg/jpeg/png/webp)
//! 3. Compress  descriptors              →  files at or under a KB budget
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`pick`] | `MediaPicker` trait + directory-backed picker |
//! | [`convert`] | Single-pass format conversion and the pick→convert orchestrator |
//! | [`compress`] | Quality-ladder search for a byte-size budget |
//! | [`normalize`] | `file://` locator stripping, compress-format resolution |
//! | [`imaging`] | `ImageCodec` trait and the `image`/`webp`-backed codec |
//! | [`naming`] | Unique output file names, default cache dir |
//! | [`types`] | `MediaDescriptor` and the closed `Format` enum |
//!
//! # Design Decisions
//!
//! ## Injected Codec
//!
//! Every operation takes an [`ImageCodec`] explicitly instead of reaching for
//! a global. That keeps convert/compress logic unit-testable against a
//! recording mock, and lets embedders substitute a platform codec without
//! touching the orchestration.
//!
//! ## Fixed Quality Ladder
//!
//! The compressor does not binary-search. It walks
//! [`QUALITY_LADDER`](compress::QUALITY_LADDER) — eight descending levels
//! from 1.0 to 0.3 — and returns the first encode at or under budget. One
//! codec call per rung, predictable worst case, no re-trials.
//!
//! ## Soft Failure for Unmet Budgets
//!
//! A source that cannot meet its budget at any ladder level is logged and
//! dropped from the batch result; it never rejects the batch. Callers
//! compress many inputs at once and need the survivors. Every other failure
//! is fail-fast across the whole batch.
//!
//! ## Attempt Files Are Cleaned Up
//!
//! Each ladder rung writes a real file. Over-budget attempts are deleted
//! before the next rung, so the output directory ends up holding exactly the
//! returned files — no orphaned intermediates.
//!
//! ## Rayon Batches
//!
//! Batch items fan out over [rayon](https://docs.rs/rayon) and join in input
//! order. Output files carry unique generated names, so concurrent items
//! share nothing but an append-only directory.

pub mod compress;
pub mod convert;
pub mod imaging;
pub mod naming;
pub mod normalize;
pub mod pick;
pub mod types;

pub use compress::{CompressRequest, QUALITY_LADDER, compress_media};
pub use convert::{
    ConvertError, ConvertRequest, ConverterOptions, PickConvertError, convert_media,
    pick_and_convert,
};
pub use imaging::{
    CodecError, Dimensions, EncodeParams, EncodedImage, ImageCodec, Quality, RustCodec,
};
pub use pick::{FilesystemPicker, MediaPicker, PickError, PickerOptions};
pub use types::{Format, MediaDescriptor};
