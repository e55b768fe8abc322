//! Utility functions for image processing
//!
//! This module provides the pixel-level helpers used by the normalizer:
//! - Grayscale conversion (RGB to luminance, serial and row-parallel)
//! - Binarization (Otsu's method, fixed threshold, local mean)
//! - Enhancement (unsharp mask, rescaling)

/// Global and local thresholding
pub mod binarization;
/// Sharpening and rescaling
pub mod enhance;
/// RGB to luminance
pub mod grayscale;
