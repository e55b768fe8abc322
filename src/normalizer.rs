//! Image normalizer: a bounded, ordered, lazy sequence of transformed
//! candidates derived from one [`RawImage`].
//!
//! Cheap and most-likely transforms come first. Every transform is a pure
//! function of the source grid, so the sequence can be restarted at will and
//! two runs over the same image yield identical candidates.

use std::borrow::Cow;
use std::fmt;

use image::GrayImage;
use image::imageops;
use serde::{Deserialize, Serialize};

use crate::config::NormalizerConfig;
use crate::models::RawImage;
use crate::utils::binarization::{adaptive_binarize, otsu_binarize};
use crate::utils::enhance::{rescale, unsharp_mask};

/// Upper bound on candidates produced for one image
pub const MAX_CANDIDATES: usize = 10;

/// One deterministic image transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    /// Source grid unchanged
    Identity,
    /// Unsharp mask
    Sharpen,
    /// Global Otsu threshold
    OtsuThreshold,
    /// Quarter turn clockwise
    Rotate90,
    /// Half turn
    Rotate180,
    /// Three quarter turns clockwise
    Rotate270,
    /// Local-mean threshold
    AdaptiveThreshold,
    /// Downscale large images, upscale small ones
    Rescale,
}

impl Transform {
    /// Order used when none is configured
    pub const DEFAULT_ORDER: [Transform; 8] = [
        Transform::Identity,
        Transform::Sharpen,
        Transform::OtsuThreshold,
        Transform::Rotate90,
        Transform::Rotate180,
        Transform::Rotate270,
        Transform::AdaptiveThreshold,
        Transform::Rescale,
    ];

    /// Short label for logs and CLI output
    pub fn name(&self) -> &'static str {
        match self {
            Transform::Identity => "identity",
            Transform::Sharpen => "sharpen",
            Transform::OtsuThreshold => "otsu_threshold",
            Transform::Rotate90 => "rotate90",
            Transform::Rotate180 => "rotate180",
            Transform::Rotate270 => "rotate270",
            Transform::AdaptiveThreshold => "adaptive_threshold",
            Transform::Rescale => "rescale",
        }
    }

    /// Apply to `source`. The identity transform borrows instead of copying.
    pub fn apply<'a>(&self, source: &'a GrayImage, config: &NormalizerConfig) -> Cow<'a, GrayImage> {
        match self {
            Transform::Identity => Cow::Borrowed(source),
            Transform::Sharpen => Cow::Owned(unsharp_mask(
                source,
                config.sharpen_sigma,
                config.sharpen_amount,
            )),
            Transform::OtsuThreshold => Cow::Owned(map_raw(source, |gray, w, h| {
                otsu_binarize(gray, w, h)
            })),
            Transform::Rotate90 => Cow::Owned(imageops::rotate90(source)),
            Transform::Rotate180 => Cow::Owned(imageops::rotate180(source)),
            Transform::Rotate270 => Cow::Owned(imageops::rotate270(source)),
            Transform::AdaptiveThreshold => Cow::Owned(map_raw(source, |gray, w, h| {
                adaptive_binarize(gray, w, h, config.adaptive_block_radius, config.adaptive_offset)
            })),
            Transform::Rescale => Cow::Owned(rescale(source, config.rescale_max_dim)),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Run a same-size buffer operation over a grayscale grid
fn map_raw<F>(source: &GrayImage, op: F) -> GrayImage
where
    F: FnOnce(&[u8], usize, usize) -> Vec<u8>,
{
    let (width, height) = source.dimensions();
    let out = op(source.as_raw(), width as usize, height as usize);
    // Binarizers always return width * height bytes
    GrayImage::from_raw(width, height, out).unwrap_or_else(|| source.clone())
}

/// A transform paired with the grid it produced
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    /// Which transform produced this grid
    pub transform: Transform,
    /// Transformed pixels
    pub pixels: Cow<'a, GrayImage>,
}

/// Produces candidates for one image
#[derive(Debug, Clone)]
pub struct Normalizer<'a> {
    image: &'a RawImage,
    config: &'a NormalizerConfig,
    order: Vec<Transform>,
}

impl<'a> Normalizer<'a> {
    /// Prepare candidate generation for `image`
    pub fn new(image: &'a RawImage, config: &'a NormalizerConfig) -> Self {
        Self {
            image,
            config,
            order: config.effective_order(),
        }
    }

    /// Transforms in the order they will be tried
    pub fn order(&self) -> &[Transform] {
        &self.order
    }

    /// Number of candidates the sequence will yield
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when no transform is configured
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Fresh lazy sequence; each grid is computed only when reached
    pub fn candidates(&self) -> Candidates<'_, 'a> {
        Candidates {
            normalizer: self,
            next: 0,
        }
    }
}

/// Lazy iterator over one normalizer's candidates
#[derive(Debug)]
pub struct Candidates<'n, 'a> {
    normalizer: &'n Normalizer<'a>,
    next: usize,
}

impl<'n, 'a> Iterator for Candidates<'n, 'a> {
    type Item = Candidate<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let transform = *self.normalizer.order.get(self.next)?;
        self.next += 1;
        let pixels = transform.apply(self.normalizer.image.pixels(), self.normalizer.config);
        Some(Candidate { transform, pixels })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.normalizer.order.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Candidates<'_, '_> {}
