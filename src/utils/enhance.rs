//! Whole-image enhancement helpers built on `image::imageops`.

use image::GrayImage;
use image::imageops::{self, FilterType};

/// Unsharp mask: `(1 + amount) * I - amount * blur(I, sigma)`, clamped to 0..=255.
///
/// Recovers module edges that have bled together in high-resolution photos.
pub fn unsharp_mask(gray: &GrayImage, sigma: f32, amount: f32) -> GrayImage {
    let blurred = imageops::blur(gray, sigma);
    let mut out = GrayImage::new(gray.width(), gray.height());
    for ((dst, src), soft) in out
        .pixels_mut()
        .zip(gray.pixels())
        .zip(blurred.pixels())
    {
        let v = (1.0 + amount) * src.0[0] as f32 - amount * soft.0[0] as f32;
        dst.0[0] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Shrink so the longest side is at most `max_dim`, or double small images.
///
/// Downscaling uses a triangle filter; upscaling uses nearest-neighbour so
/// module edges stay hard.
pub fn rescale(gray: &GrayImage, max_dim: u32) -> GrayImage {
    let (width, height) = gray.dimensions();
    let longest = width.max(height);
    if longest == 0 {
        return gray.clone();
    }

    if longest > max_dim {
        let scale = max_dim as f64 / longest as f64;
        let new_w = ((width as f64 * scale).round() as u32).max(1);
        let new_h = ((height as f64 * scale).round() as u32).max(1);
        imageops::resize(gray, new_w, new_h, FilterType::Triangle)
    } else {
        imageops::resize(gray, width * 2, height * 2, FilterType::Nearest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_unsharp_keeps_flat_regions() {
        let gray = GrayImage::from_pixel(16, 16, Luma([120]));
        let sharp = unsharp_mask(&gray, 3.0, 0.5);
        assert!(sharp.pixels().all(|p| (p.0[0] as i32 - 120).abs() <= 1));
    }

    #[test]
    fn test_unsharp_increases_edge_contrast() {
        let gray = GrayImage::from_fn(32, 8, |x, _| if x < 16 { Luma([80]) } else { Luma([170]) });
        let sharp = unsharp_mask(&gray, 2.0, 0.5);
        assert!(sharp.get_pixel(15, 4).0[0] < 80);
        assert!(sharp.get_pixel(16, 4).0[0] > 170);
    }

    #[test]
    fn test_rescale_down_fits_limit() {
        let gray = GrayImage::new(400, 200);
        let small = rescale(&gray, 100);
        assert_eq!(small.dimensions(), (100, 50));
    }

    #[test]
    fn test_rescale_up_doubles() {
        let gray = GrayImage::new(40, 30);
        let big = rescale(&gray, 100);
        assert_eq!(big.dimensions(), (80, 60));
    }
}
