//! Image codec — decode, optional downscale, re-encode.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Decode** | `image` crate (JPEG, PNG, WebP) |
//! | **Encode → JPEG** | `image::codecs::jpeg` with quality |
//! | **Encode → PNG** | `image::codecs::png` (lossless) |
//! | **Encode → WebP** | `webp` crate (lossy, libwebp) |
//!
//! The module is split into:
//! - **Parameters**: Data structures describing one encode
//! - **Backend**: [`ImageCodec`] trait + shared types
//! - **RustCodec**: the production implementation

pub mod backend;
mod params;
pub mod rust_codec;

pub use backend::{CodecError, Dimensions, EncodedImage, ImageCodec};
pub use params::{EncodeParams, Quality};
pub use rust_codec::RustCodec;
