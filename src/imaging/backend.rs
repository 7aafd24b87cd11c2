//! Codec trait and shared types.
//!
//! [`ImageCodec`] is the boundary the convert/compress modules talk to: two
//! operations, identify and encode. The production implementation is
//! [`RustCodec`](super::rust_codec::RustCodec) — pure Rust decode plus
//! libwebp for lossy WebP. The codec is passed in explicitly wherever it is
//! used, so every operation is unit-testable against a mock without a real
//! image pipeline.

use super::params::EncodeParams;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Result of an encode: where the bytes landed and what they describe.
///
/// `size_bytes` is the size of the file actually written — descriptors built
/// from this value satisfy the size-consistency invariant on the public API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
}

/// Image codec capability: decode a source file, re-encode it to a target
/// format and quality.
///
/// `Sync` so batch operations can share one codec across rayon workers.
/// Implementations fail with a descriptive error when the source is missing,
/// unreadable, or the format is unsupported; no caller in this crate retries
/// a codec failure.
pub trait ImageCodec: Sync {
    /// Get image dimensions without a full decode where possible.
    fn identify(&self, path: &Path) -> Result<Dimensions, CodecError>;

    /// Execute one encode and report the written file.
    fn encode(&self, params: &EncodeParams) -> Result<EncodedImage, CodecError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::params::Quality;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock codec that records operations and models encoded size as
    /// `base_size × quality`, so a size budget selects a predictable rung of
    /// the quality ladder. Uses Mutex (not RefCell) so it is Sync and works
    /// with rayon's par_iter.
    ///
    /// Each encode writes a real file of the modeled size to the requested
    /// output path — compressor cleanup behavior is observable on disk.
    pub struct MockCodec {
        pub dimensions: Dimensions,
        pub default_base: u64,
        pub base_sizes: HashMap<PathBuf, u64>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Encode {
            source: String,
            output: String,
            format: crate::types::Format,
            quality: f32,
        },
    }

    impl MockCodec {
        pub fn new(default_base: u64) -> Self {
            Self {
                dimensions: Dimensions {
                    width: 800,
                    height: 600,
                },
                default_base,
                base_sizes: HashMap::new(),
                operations: Mutex::new(Vec::new()),
            }
        }

        /// Override the size model for one source path.
        pub fn with_base_size(mut self, source: impl Into<PathBuf>, base: u64) -> Self {
            self.base_sizes.insert(source.into(), base);
            self
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        /// Encode operations only, in recorded order.
        pub fn encode_qualities(&self) -> Vec<f32> {
            self.get_operations()
                .into_iter()
                .filter_map(|op| match op {
                    RecordedOp::Encode { quality, .. } => Some(quality),
                    _ => None,
                })
                .collect()
        }

        fn modeled_size(&self, source: &Path, quality: Quality) -> u64 {
            let base = self
                .base_sizes
                .get(source)
                .copied()
                .unwrap_or(self.default_base);
            (base as f64 * quality.value() as f64).round() as u64
        }
    }

    impl ImageCodec for MockCodec {
        fn identify(&self, path: &Path) -> Result<Dimensions, CodecError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(path.to_string_lossy().to_string()));
            Ok(self.dimensions)
        }

        fn encode(&self, params: &EncodeParams) -> Result<EncodedImage, CodecError> {
            self.operations.lock().unwrap().push(RecordedOp::Encode {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                format: params.format,
                quality: params.quality.value(),
            });

            let size_bytes = self.modeled_size(&params.source, params.quality);
            std::fs::write(&params.output, vec![0u8; size_bytes as usize])?;

            Ok(EncodedImage {
                path: params.output.clone(),
                width: self.dimensions.width,
                height: self.dimensions.height,
                size_bytes,
            })
        }
    }

    #[test]
    fn mock_records_identify() {
        let codec = MockCodec::new(1000);
        let dims = codec.identify(Path::new("/test/image.jpg")).unwrap();
        assert_eq!(dims.width, 800);
        assert_eq!(dims.height, 600);

        let ops = codec.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_size_scales_with_quality() {
        let tmp = tempfile::TempDir::new().unwrap();
        let codec = MockCodec::new(1000);

        let encoded = codec
            .encode(&EncodeParams::new(
                "/source.jpg".into(),
                tmp.path().join("out.jpg"),
                crate::types::Format::Jpg,
                Quality::new(0.5),
            ))
            .unwrap();

        assert_eq!(encoded.size_bytes, 500);
        assert_eq!(std::fs::metadata(&encoded.path).unwrap().len(), 500);
    }

    #[test]
    fn mock_per_source_base_size() {
        let tmp = tempfile::TempDir::new().unwrap();
        let codec = MockCodec::new(1000).with_base_size("/big.jpg", 9000);

        let encoded = codec
            .encode(&EncodeParams::new(
                "/big.jpg".into(),
                tmp.path().join("out.jpg"),
                crate::types::Format::Jpg,
                Quality::new(1.0),
            ))
            .unwrap();

        assert_eq!(encoded.size_bytes, 9000);
    }
}
