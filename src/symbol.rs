//! QR locator/decoder adapter.
//!
//! Symbol localization and error correction are a capability behind
//! [`SymbolDecoder`]; the rest of the crate never names a concrete decoder.
//! [`RqrrDecoder`] is the bundled implementation.

use std::panic::{AssertUnwindSafe, catch_unwind};

use image::GrayImage;
use tracing::{trace, warn};

use crate::models::{Point, RawPayload};
use crate::normalizer::Candidate;

/// One decoded symbol: its raw bytes and corner geometry
#[derive(Clone, PartialEq)]
pub struct DecodedSymbol {
    /// Payload bytes after error correction
    pub bytes: Vec<u8>,
    /// Corner points, clockwise from the top-left finder pattern
    pub corners: [Point; 4],
}

impl std::fmt::Debug for DecodedSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedSymbol")
            .field("len", &self.bytes.len())
            .field("corners", &self.corners)
            .finish()
    }
}

/// Capability: locate and decode QR symbols in a grayscale grid.
///
/// Returning an empty vector means "no symbol here" and is the common case,
/// not an error. Implementations must not panic on images without symbols.
pub trait SymbolDecoder {
    /// All symbols found in `pixels`
    fn decode_symbols(&self, pixels: &GrayImage) -> Vec<DecodedSymbol>;
}

/// Adapter: at most one payload for a candidate.
///
/// Picks the first symbol with a non-empty payload.
pub fn decode_candidate<D>(decoder: &D, candidate: &Candidate<'_>) -> Option<RawPayload>
where
    D: SymbolDecoder + ?Sized,
{
    let symbols = decoder.decode_symbols(&candidate.pixels);
    trace!(
        transform = %candidate.transform,
        symbols = symbols.len(),
        "candidate decoded"
    );
    symbols
        .into_iter()
        .find(|symbol| !symbol.bytes.is_empty())
        .map(|symbol| RawPayload::new(symbol.bytes, symbol.corners))
}

/// [`SymbolDecoder`] backed by the pure-Rust `rqrr` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDecoder;

impl RqrrDecoder {
    /// Create a decoder
    pub fn new() -> Self {
        Self
    }

    fn decode_inner(pixels: &GrayImage) -> Vec<DecodedSymbol> {
        let (width, height) = (pixels.width() as usize, pixels.height() as usize);
        let raw = pixels.as_raw();
        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(width, height, |x, y| raw[y * width + x]);

        let mut symbols = Vec::new();
        for grid in prepared.detect_grids() {
            let mut bytes = Vec::new();
            match grid.decode_to(&mut bytes) {
                Ok(_meta) => {
                    let corners = grid
                        .bounds
                        .map(|p| Point::new(p.x as f32, p.y as f32));
                    symbols.push(DecodedSymbol { bytes, corners });
                }
                Err(err) => {
                    trace!(error = %err, "grid failed to decode");
                }
            }
        }
        symbols
    }
}

impl SymbolDecoder for RqrrDecoder {
    fn decode_symbols(&self, pixels: &GrayImage) -> Vec<DecodedSymbol> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Vec::new();
        }
        // A panic inside the third-party decoder counts as "no symbol"
        match catch_unwind(AssertUnwindSafe(|| Self::decode_inner(pixels))) {
            Ok(symbols) => symbols,
            Err(_) => {
                warn!("symbol decoder panicked; treating candidate as empty");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::Transform;
    use image::Luma;
    use std::borrow::Cow;

    struct Fixed(Vec<DecodedSymbol>);

    impl SymbolDecoder for Fixed {
        fn decode_symbols(&self, _pixels: &GrayImage) -> Vec<DecodedSymbol> {
            self.0.clone()
        }
    }

    fn candidate(gray: &GrayImage) -> Candidate<'_> {
        Candidate {
            transform: Transform::Identity,
            pixels: Cow::Borrowed(gray),
        }
    }

    #[test]
    fn test_blank_image_has_no_symbol() {
        let gray = GrayImage::from_pixel(64, 64, Luma([255]));
        assert!(RqrrDecoder::new().decode_symbols(&gray).is_empty());
        assert!(decode_candidate(&RqrrDecoder, &candidate(&gray)).is_none());
    }

    #[test]
    fn test_empty_grid_has_no_symbol() {
        let gray = GrayImage::new(0, 0);
        assert!(RqrrDecoder.decode_symbols(&gray).is_empty());
    }

    #[test]
    fn test_adapter_skips_empty_symbols() {
        let gray = GrayImage::new(4, 4);
        let corner = [Point::new(1.0, 2.0); 4];
        let decoder = Fixed(vec![
            DecodedSymbol {
                bytes: Vec::new(),
                corners: [Point::default(); 4],
            },
            DecodedSymbol {
                bytes: b"abc".to_vec(),
                corners: corner,
            },
            DecodedSymbol {
                bytes: b"def".to_vec(),
                corners: corner,
            },
        ]);
        let payload = decode_candidate(&decoder, &candidate(&gray)).unwrap();
        assert_eq!(payload.as_bytes(), b"abc");
        assert_eq!(payload.corners(), &corner);
    }

    #[test]
    fn test_adapter_none_when_nothing_found() {
        let gray = GrayImage::new(4, 4);
        assert!(decode_candidate(&Fixed(Vec::new()), &candidate(&gray)).is_none());
    }
}
