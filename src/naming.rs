//! Output file naming and cache directory resolution.
//!
//! Every encode writes a new uniquely-named file, so concurrent batch items
//! never contend on the output directory. Names combine a millisecond
//! timestamp with a process-wide counter; the counter guarantees uniqueness
//! when two encodes land on the same millisecond.

use crate::types::Format;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Current time as unix milliseconds.
pub fn timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// A unique output file name for an encode in the given format,
/// e.g. `1756102433219-0007_converted.jpg`.
pub fn unique_name(format: Format) -> String {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{:04}_converted.{}", timestamp_ms(), n, format.extension())
}

/// Default output directory when the caller does not supply one.
pub fn default_cache_dir() -> PathBuf {
    std::env::temp_dir().join("media-convert")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique_across_calls() {
        let names: HashSet<String> = (0..64).map(|_| unique_name(Format::Jpg)).collect();
        assert_eq!(names.len(), 64);
    }

    #[test]
    fn name_carries_format_extension() {
        assert!(unique_name(Format::WebP).ends_with("_converted.webp"));
        assert!(unique_name(Format::Jpeg).ends_with("_converted.jpeg"));
        assert!(unique_name(Format::Png).ends_with("_converted.png"));
    }

    #[test]
    fn cache_dir_lives_under_temp() {
        assert!(default_cache_dir().starts_with(std::env::temp_dir()));
    }
}
