//! Disk helpers for the `qrtool` binary. The verification core never touches
//! the filesystem; only these helpers do.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::PipelineConfig;
use crate::models::RawImage;
use crate::recovery::recover;
use crate::symbol::SymbolDecoder;

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Read an image file into memory.
pub fn load_image_bytes<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<u8>> {
    fs::read(path)
}

/// Default dataset root from `QR_AGE_DATASET_ROOT`.
pub fn dataset_root_from_env() -> Option<PathBuf> {
    env::var_os("QR_AGE_DATASET_ROOT").map(PathBuf::from)
}

/// Iterate image paths below `root` in sorted order, optionally truncated.
pub fn dataset_iter<P: AsRef<Path>>(root: P, limit: Option<usize>) -> impl Iterator<Item = PathBuf> {
    let mut images = collect_images(root.as_ref());
    images.sort();
    if let Some(limit) = limit {
        images.truncate(limit);
    }
    images.into_iter()
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if is_image(&path) {
                images.push(path);
            }
        }
    }

    images
}

/// Outcome counts for a batch of images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadingRate {
    /// Images attempted
    pub total: usize,
    /// Images that yielded a payload
    pub decoded: usize,
    /// Images the image decoder rejected
    pub unreadable: usize,
}

impl ReadingRate {
    /// Percentage of attempted images that yielded a payload.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.decoded as f64 / self.total as f64 * 100.0
        }
    }
}

/// Run symbol recovery over every path and count successes.
///
/// Only recovery runs; payloads are dropped without being interpreted.
pub fn reading_rate<D, I>(paths: I, decoder: &D, config: &PipelineConfig) -> ReadingRate
where
    D: SymbolDecoder + ?Sized,
    I: IntoIterator<Item = PathBuf>,
{
    let mut rate = ReadingRate::default();
    for path in paths {
        rate.total += 1;
        let image = load_image_bytes(&path)
            .ok()
            .and_then(|bytes| RawImage::decode(&bytes, config.max_image_dim).ok());
        let Some(image) = image else {
            rate.unreadable += 1;
            continue;
        };
        if recover(&image, decoder, &config.normalizer).is_ok() {
            rate.decoded += 1;
        }
    }
    rate
}
