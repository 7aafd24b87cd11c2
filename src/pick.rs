//! Media picking.
//!
//! [`MediaPicker`] stands in for the platform camera/library prompt: an
//! implementation yields descriptors for the assets the user selected, or
//! `None` when nothing was selected. [`FilesystemPicker`] is the built-in
//! implementation — it treats a directory as the photo library, which is
//! also what the test suite runs against.

use crate::imaging::{CodecError, EncodeParams, ImageCodec, Quality};
use crate::imaging::rust_codec::is_supported_source;
use crate::naming;
use crate::types::{Format, MediaDescriptor};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum PickError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Selection options for a pick.
///
/// Localized prompt strings and cancel callbacks belong to the UI layer and
/// have no counterpart here.
#[derive(Debug, Clone)]
pub struct PickerOptions {
    /// Quality used when a picked asset has to be re-encoded to honor the
    /// max dimensions.
    pub quality: Option<Quality>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    /// Attach base64 file contents to each descriptor.
    pub include_base64: bool,
    /// Maximum number of assets to pick; `0` means unlimited.
    pub selection_limit: usize,
    /// Copy each picked asset into the cache directory, the way the camera
    /// flow saves captures to the gallery.
    pub save_to_gallery: bool,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            quality: None,
            max_width: None,
            max_height: None,
            include_base64: false,
            selection_limit: 1,
            save_to_gallery: false,
        }
    }
}

/// Source of picked media.
///
/// Returns `Ok(None)` when nothing was selected — distinct from an empty
/// batch result and from failure.
pub trait MediaPicker {
    fn pick(&self, options: &PickerOptions) -> Result<Option<Vec<MediaDescriptor>>, PickError>;
}

/// Picker over a directory of image files.
///
/// Files are taken in name order up to the selection limit; anything without
/// a supported image extension is skipped. Needs a codec to read dimensions
/// and to downscale when the options bound them.
pub struct FilesystemPicker<'a, C: ImageCodec> {
    root: PathBuf,
    cache_dir: PathBuf,
    codec: &'a C,
}

impl<'a, C: ImageCodec> FilesystemPicker<'a, C> {
    pub fn new(root: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>, codec: &'a C) -> Self {
        Self {
            root: root.into(),
            cache_dir: cache_dir.into(),
            codec,
        }
    }

    fn pick_one(
        &self,
        path: &Path,
        options: &PickerOptions,
    ) -> Result<MediaDescriptor, PickError> {
        let dims = self.codec.identify(path)?;
        let over_bounds = dims.width > options.max_width.unwrap_or(u32::MAX)
            || dims.height > options.max_height.unwrap_or(u32::MAX);

        let (file, width, height, size) = if over_bounds {
            // Re-encode a downscaled copy into the cache dir, format preserved.
            std::fs::create_dir_all(&self.cache_dir)?;
            let format = format_from_extension(path).unwrap_or(Format::Jpg);
            let mut params = EncodeParams::new(
                path.to_path_buf(),
                self.cache_dir.join(naming::unique_name(format)),
                format,
                options.quality.unwrap_or_default(),
            );
            params.max_width = options.max_width;
            params.max_height = options.max_height;
            let encoded = self.codec.encode(&params)?;
            debug!(source = %path.display(), width = encoded.width, height = encoded.height,
                "picked asset downscaled");
            (encoded.path, encoded.width, encoded.height, encoded.size_bytes)
        } else {
            let size = std::fs::metadata(path)?.len();
            (path.to_path_buf(), dims.width, dims.height, size)
        };

        let mut descriptor = MediaDescriptor::from_path(&file);
        descriptor.mime_type = format_from_extension(&file).map(|f| f.mime_type().to_string());
        descriptor.size = Some(size);
        descriptor.width = Some(width);
        descriptor.height = Some(height);
        descriptor.timestamp_ms = Some(naming::timestamp_ms());
        descriptor.original_path = Some(path.display().to_string());

        if options.save_to_gallery
            && let Some(name) = path.file_name()
        {
            std::fs::create_dir_all(&self.cache_dir)?;
            let saved = self.cache_dir.join(name);
            std::fs::copy(path, &saved)?;
            descriptor.original_path = Some(saved.display().to_string());
        }

        if options.include_base64 {
            descriptor.base64 = Some(STANDARD.encode(std::fs::read(&file)?));
        }

        Ok(descriptor)
    }
}

impl<C: ImageCodec> MediaPicker for FilesystemPicker<'_, C> {
    fn pick(&self, options: &PickerOptions) -> Result<Option<Vec<MediaDescriptor>>, PickError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1) {
            let entry = entry?;
            if entry.file_type().is_file() && is_supported_source(entry.path()) {
                files.push(entry.into_path());
            }
        }
        files.sort();
        if options.selection_limit > 0 {
            files.truncate(options.selection_limit);
        }
        if files.is_empty() {
            return Ok(None);
        }

        files
            .iter()
            .map(|path| self.pick_one(path, options))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

fn format_from_extension(path: &Path) -> Option<Format> {
    path.extension()?.to_str()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::RustCodec;
    use image::RgbImage;

    fn create_image(path: &Path, width: u32, height: u32) {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some("png") => image::ImageFormat::Png,
            _ => image::ImageFormat::Jpeg,
        };
        img.save_with_format(path, format).unwrap();
    }

    fn picker_dirs() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let tmp = tempfile::TempDir::new().unwrap();
        let library = tmp.path().join("library");
        let cache = tmp.path().join("cache");
        std::fs::create_dir_all(&library).unwrap();
        (tmp, library, cache)
    }

    #[test]
    fn picks_in_name_order_up_to_limit() {
        let (_tmp, library, cache) = picker_dirs();
        create_image(&library.join("c.jpg"), 40, 30);
        create_image(&library.join("a.jpg"), 40, 30);
        create_image(&library.join("b.png"), 40, 30);

        let codec = RustCodec::new();
        let picker = FilesystemPicker::new(&library, &cache, &codec);
        let options = PickerOptions {
            selection_limit: 2,
            ..PickerOptions::default()
        };

        let picked = picker.pick(&options).unwrap().unwrap();
        let names: Vec<&str> = picked
            .iter()
            .map(|d| d.file_name.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);
        assert_eq!(picked[0].mime_type.as_deref(), Some("image/jpeg"));
        assert_eq!((picked[0].width, picked[0].height), (Some(40), Some(30)));
        assert!(picked[0].size.unwrap() > 0);
    }

    #[test]
    fn zero_limit_picks_everything() {
        let (_tmp, library, cache) = picker_dirs();
        for name in ["a.jpg", "b.jpg", "c.jpg"] {
            create_image(&library.join(name), 20, 20);
        }

        let codec = RustCodec::new();
        let picker = FilesystemPicker::new(&library, &cache, &codec);
        let options = PickerOptions {
            selection_limit: 0,
            ..PickerOptions::default()
        };

        assert_eq!(picker.pick(&options).unwrap().unwrap().len(), 3);
    }

    #[test]
    fn empty_library_yields_none() {
        let (_tmp, library, cache) = picker_dirs();
        std::fs::write(library.join("notes.txt"), "not an image").unwrap();

        let codec = RustCodec::new();
        let picker = FilesystemPicker::new(&library, &cache, &codec);

        assert!(picker.pick(&PickerOptions::default()).unwrap().is_none());
    }

    #[test]
    fn max_dimensions_downscale_into_cache() {
        let (_tmp, library, cache) = picker_dirs();
        create_image(&library.join("big.jpg"), 400, 300);

        let codec = RustCodec::new();
        let picker = FilesystemPicker::new(&library, &cache, &codec);
        let options = PickerOptions {
            max_width: Some(200),
            max_height: Some(200),
            ..PickerOptions::default()
        };

        let picked = picker.pick(&options).unwrap().unwrap();
        let d = &picked[0];
        assert_eq!((d.width, d.height), (Some(200), Some(150)));
        assert!(d.path.as_deref().unwrap().starts_with(cache.to_str().unwrap()));
        assert_eq!(
            d.original_path.as_deref(),
            Some(library.join("big.jpg").to_str().unwrap())
        );
    }

    #[test]
    fn small_asset_is_not_reencoded() {
        let (_tmp, library, cache) = picker_dirs();
        create_image(&library.join("small.jpg"), 100, 80);

        let codec = RustCodec::new();
        let picker = FilesystemPicker::new(&library, &cache, &codec);
        let options = PickerOptions {
            max_width: Some(500),
            max_height: Some(500),
            ..PickerOptions::default()
        };

        let picked = picker.pick(&options).unwrap().unwrap();
        assert_eq!(
            picked[0].path.as_deref(),
            Some(library.join("small.jpg").to_str().unwrap())
        );
        assert!(!cache.exists());
    }

    #[test]
    fn include_base64_attaches_contents() {
        let (_tmp, library, cache) = picker_dirs();
        create_image(&library.join("a.jpg"), 20, 20);

        let codec = RustCodec::new();
        let picker = FilesystemPicker::new(&library, &cache, &codec);
        let options = PickerOptions {
            include_base64: true,
            ..PickerOptions::default()
        };

        let picked = picker.pick(&options).unwrap().unwrap();
        let encoded = picked[0].base64.as_deref().unwrap();
        let decoded = STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded.len() as u64, picked[0].size.unwrap());
    }

    #[test]
    fn save_to_gallery_copies_into_cache() {
        let (_tmp, library, cache) = picker_dirs();
        create_image(&library.join("a.jpg"), 20, 20);

        let codec = RustCodec::new();
        let picker = FilesystemPicker::new(&library, &cache, &codec);
        let options = PickerOptions {
            save_to_gallery: true,
            ..PickerOptions::default()
        };

        let picked = picker.pick(&options).unwrap().unwrap();
        let saved = cache.join("a.jpg");
        assert!(saved.exists());
        assert_eq!(
            picked[0].original_path.as_deref(),
            Some(saved.to_str().unwrap())
        );
    }
}
