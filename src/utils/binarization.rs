//! Global and local thresholding over 8-bit grayscale buffers.
//!
//! Outputs are grayscale buffers again (0 = black, 255 = white) so they can be
//! handed straight to a symbol decoder as a candidate image.

const BLACK: u8 = 0;
const WHITE: u8 = 255;

/// Convert grayscale image to binary using Otsu's thresholding method
pub fn otsu_binarize(gray: &[u8], width: usize, height: usize) -> Vec<u8> {
    let threshold = calculate_otsu_threshold(gray);
    threshold_binarize(gray, width, height, threshold)
}

/// Calculate Otsu's optimal threshold
pub fn calculate_otsu_threshold(gray: &[u8]) -> u8 {
    // Build histogram
    let mut histogram = [0u64; 256];
    for &pixel in gray {
        histogram[pixel as usize] += 1;
    }

    let total_pixels = gray.len() as f64;
    if total_pixels == 0.0 {
        return 128;
    }
    let total_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut max_variance = 0.0;
    let mut optimal_threshold = 128u8;
    let mut class1_pixels = 0.0f64;
    let mut class1_sum = 0.0f64;

    // Pixels strictly below `threshold` form class 1
    for threshold in 1..=255usize {
        let count = histogram[threshold - 1] as f64;
        class1_pixels += count;
        class1_sum += (threshold - 1) as f64 * count;

        let class2_pixels = total_pixels - class1_pixels;
        if class1_pixels == 0.0 || class2_pixels == 0.0 {
            continue;
        }

        let class1_mean = class1_sum / class1_pixels;
        let class2_mean = (total_sum - class1_sum) / class2_pixels;

        let weight1 = class1_pixels / total_pixels;
        let weight2 = class2_pixels / total_pixels;

        let variance = weight1 * weight2 * (class1_mean - class2_mean).powi(2);

        if variance > max_variance {
            max_variance = variance;
            optimal_threshold = threshold as u8;
        }
    }

    optimal_threshold
}

/// Simple global threshold binarization
pub fn threshold_binarize(gray: &[u8], width: usize, height: usize, threshold: u8) -> Vec<u8> {
    gray.iter()
        .take(width * height)
        .map(|&v| if v < threshold { BLACK } else { WHITE })
        .collect()
}

/// Local-mean thresholding.
///
/// Each pixel is compared with the mean of the `(2 * block_radius + 1)` square
/// around it, minus `offset`. Uses a summed-area table so the cost is
/// independent of the radius.
pub fn adaptive_binarize(
    gray: &[u8],
    width: usize,
    height: usize,
    block_radius: usize,
    offset: i32,
) -> Vec<u8> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let integral = integral_image(gray, width, height);
    let stride = width + 1;
    let mut out = vec![WHITE; width * height];

    for y in 0..height {
        let y0 = y.saturating_sub(block_radius);
        let y1 = (y + block_radius + 1).min(height);
        for x in 0..width {
            let x0 = x.saturating_sub(block_radius);
            let x1 = (x + block_radius + 1).min(width);

            let sum = integral[y1 * stride + x1] + integral[y0 * stride + x0]
                - integral[y0 * stride + x1]
                - integral[y1 * stride + x0];
            let area = ((x1 - x0) * (y1 - y0)) as u64;
            let mean = (sum / area) as i32;

            let threshold = (mean - offset).clamp(0, 255);
            if (gray[y * width + x] as i32) < threshold {
                out[y * width + x] = BLACK;
            }
        }
    }

    out
}

/// Summed-area table with a zero first row and column
fn integral_image(gray: &[u8], width: usize, height: usize) -> Vec<u64> {
    let stride = width + 1;
    let mut integral = vec![0u64; stride * (height + 1)];
    for y in 0..height {
        let mut row_sum = 0u64;
        for x in 0..width {
            row_sum += gray[y * width + x] as u64;
            integral[(y + 1) * stride + x + 1] = integral[y * stride + x + 1] + row_sum;
        }
    }
    integral
}
