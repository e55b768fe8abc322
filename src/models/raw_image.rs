use std::io::Cursor;

use image::io::{Limits, Reader};
use image::{DynamicImage, GrayImage, ImageError};

use crate::error::{Result, VerifyError};
use crate::utils::grayscale::rgb_to_grayscale_auto;

/// Grayscale pixel grid decoded from the uploaded bytes.
///
/// Produced once per request and only borrowed by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pixels: GrayImage,
}

impl RawImage {
    /// Decode raster bytes (PNG, JPEG, ...) into a grayscale grid.
    ///
    /// Images wider or taller than `max_dim`, empty images and undecodable
    /// bytes are all rejected.
    pub fn decode(bytes: &[u8], max_dim: u32) -> Result<Self> {
        let mut reader = Reader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|err| VerifyError::InvalidImage(ImageError::IoError(err)))?;

        let mut limits = Limits::default();
        limits.max_image_width = Some(max_dim);
        limits.max_image_height = Some(max_dim);
        reader.limits(limits);

        let decoded = reader.decode().map_err(VerifyError::InvalidImage)?;
        Self::from_dynamic(decoded)
    }

    /// Reduce an already-decoded image to grayscale
    pub fn from_dynamic(image: DynamicImage) -> Result<Self> {
        let pixels = match image {
            DynamicImage::ImageLuma8(gray) => gray,
            other => {
                let rgb = other.to_rgb8();
                let (width, height) = rgb.dimensions();
                let gray = rgb_to_grayscale_auto(rgb.as_raw(), width as usize, height as usize);
                GrayImage::from_raw(width, height, gray).ok_or(VerifyError::ImageDimensions {
                    width,
                    height,
                })?
            }
        };
        Self::from_gray(pixels)
    }

    /// Wrap a grayscale grid, rejecting empty ones
    pub fn from_gray(pixels: GrayImage) -> Result<Self> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(VerifyError::ImageDimensions { width, height });
        }
        Ok(Self { pixels })
    }

    /// Borrow the pixel grid
    pub fn pixels(&self) -> &GrayImage {
        &self.pixels
    }

    /// Grid width in pixels
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Grid height in pixels
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}
