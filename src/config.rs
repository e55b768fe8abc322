//! Pipeline tuning knobs.
//!
//! Defaults suit phone photos of printed cards. A host can deserialize a
//! [`PipelineConfig`] from its own config source or overlay environment
//! variables with [`PipelineConfig::from_env`].

use serde::Deserialize;

use crate::normalizer::{MAX_CANDIDATES, Transform};

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
}

fn parse_env_u32(name: &str, default: u32) -> u32 {
    parse_env(name).unwrap_or(default)
}

fn parse_env_usize(name: &str, default: usize) -> usize {
    parse_env(name).unwrap_or(default)
}

fn parse_env_i32(name: &str, default: i32) -> i32 {
    parse_env(name).unwrap_or(default)
}

fn parse_env_f32(name: &str, default: f32) -> f32 {
    parse_env::<f32>(name)
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Settings for candidate generation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Transforms to try, in order. Truncated to [`MAX_CANDIDATES`].
    pub order: Vec<Transform>,
    /// Gaussian sigma for the sharpen candidate
    pub sharpen_sigma: f32,
    /// Weight of the high-pass term in the sharpen candidate
    pub sharpen_amount: f32,
    /// Half-width of the local-mean window for adaptive thresholding
    pub adaptive_block_radius: usize,
    /// Subtracted from the local mean before comparison
    pub adaptive_offset: i32,
    /// Images larger than this are shrunk by the rescale candidate
    pub rescale_max_dim: u32,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            order: Transform::DEFAULT_ORDER.to_vec(),
            sharpen_sigma: 3.0,
            sharpen_amount: 0.5,
            adaptive_block_radius: 15,
            adaptive_offset: 10,
            rescale_max_dim: 1200,
        }
    }
}

impl NormalizerConfig {
    /// Order with duplicates removed and length capped
    pub fn effective_order(&self) -> Vec<Transform> {
        let mut order = Vec::with_capacity(MAX_CANDIDATES);
        for &transform in &self.order {
            if order.len() == MAX_CANDIDATES {
                break;
            }
            if !order.contains(&transform) {
                order.push(transform);
            }
        }
        order
    }
}

/// Settings for payload detection and inflation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PayloadConfig {
    /// Bytes scanned for the legacy delimiter
    pub legacy_scan_window: usize,
    /// Upper bound on inflated output
    pub max_inflated_bytes: usize,
}

impl Default for PayloadConfig {
    fn default() -> Self {
        Self {
            legacy_scan_window: 64,
            max_inflated_bytes: 64 * 1024,
        }
    }
}

/// Full pipeline configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Largest accepted image width or height
    pub max_image_dim: u32,
    /// Candidate generation
    pub normalizer: NormalizerConfig,
    /// Detection and inflation
    pub payload: PayloadConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_image_dim: 8192,
            normalizer: NormalizerConfig::default(),
            payload: PayloadConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Defaults overlaid with `QR_AGE_*` environment variables
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Overlay `QR_AGE_*` environment variables onto `self`
    pub fn with_env_overrides(mut self) -> Self {
        self.max_image_dim = parse_env_u32("QR_AGE_MAX_IMAGE_DIM", self.max_image_dim).max(1);

        let n = &mut self.normalizer;
        n.rescale_max_dim = parse_env_u32("QR_AGE_RESCALE_MAX_DIM", n.rescale_max_dim).max(16);
        n.sharpen_sigma = parse_env_f32("QR_AGE_SHARPEN_SIGMA", n.sharpen_sigma).clamp(0.5, 10.0);
        n.adaptive_block_radius =
            parse_env_usize("QR_AGE_ADAPTIVE_RADIUS", n.adaptive_block_radius).clamp(1, 128);
        n.adaptive_offset = parse_env_i32("QR_AGE_ADAPTIVE_OFFSET", n.adaptive_offset).clamp(-64, 64);

        let p = &mut self.payload;
        p.legacy_scan_window = parse_env_usize("QR_AGE_SCAN_WINDOW", p.legacy_scan_window).max(1);
        p.max_inflated_bytes = parse_env_usize("QR_AGE_MAX_INFLATED", p.max_inflated_bytes).max(1);

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_image_dim, 8192);
        assert_eq!(config.payload.legacy_scan_window, 64);
        assert_eq!(config.normalizer.effective_order().len(), 8);
    }

    #[test]
    fn test_effective_order_dedups_and_caps() {
        let mut config = NormalizerConfig::default();
        config.order = vec![Transform::Rotate180; 3];
        assert_eq!(config.effective_order(), vec![Transform::Rotate180]);

        config.order = Transform::DEFAULT_ORDER
            .iter()
            .chain(Transform::DEFAULT_ORDER.iter())
            .copied()
            .collect();
        assert!(config.effective_order().len() <= MAX_CANDIDATES);
    }

    #[test]
    fn test_deserialize_partial_json() {
        let config: PipelineConfig = serde_json::from_str(
            r#"{"max_image_dim": 4000, "normalizer": {"order": ["identity", "rotate180"]}}"#,
        )
        .expect("valid config");
        assert_eq!(config.max_image_dim, 4000);
        assert_eq!(
            config.normalizer.order,
            vec![Transform::Identity, Transform::Rotate180]
        );
        assert_eq!(config.normalizer.rescale_max_dim, 1200);
        assert_eq!(config.payload, PayloadConfig::default());
    }
}
