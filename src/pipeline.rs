//! End-to-end verification: image bytes in, age result out.
//!
//! Every stage short-circuits on its first failure. Nothing a stage extracts
//! outlives the call; only [`AgeResult`] is returned.

use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use crate::age::evaluate_age;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::fields::extract_facts;
use crate::models::{AgeResult, PayloadFormat, RawImage, RawPayload, VerificationResponse};
use crate::payload::{sniff, split_payload};
use crate::recovery::{Recovered, recover};
use crate::symbol::{RqrrDecoder, SymbolDecoder};

/// Runs the pipeline with one decoder and one immutable configuration.
///
/// Holds no per-call state, so a single verifier can serve many threads when
/// its decoder is `Sync`.
#[derive(Debug, Clone, Default)]
pub struct Verifier<D = RqrrDecoder> {
    decoder: D,
    config: PipelineConfig,
}

impl Verifier<RqrrDecoder> {
    /// Verifier with the bundled decoder and default configuration
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: SymbolDecoder> Verifier<D> {
    /// Verifier with a caller-supplied decoder
    pub fn with_decoder(decoder: D) -> Self {
        Self {
            decoder,
            config: PipelineConfig::default(),
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Decode the image and locate a symbol, without interpreting its payload
    pub fn recover(&self, image_bytes: &[u8]) -> Result<Recovered> {
        let image = RawImage::decode(image_bytes, self.config.max_image_dim)?;
        debug!(width = image.width(), height = image.height(), "image decoded");
        recover(&image, &self.decoder, &self.config.normalizer)
    }

    /// Age of the document holder pictured in `image_bytes`, as of `today`
    #[instrument(skip_all, fields(image_len = image_bytes.len()))]
    pub fn verify(&self, image_bytes: &[u8], today: NaiveDate) -> Result<AgeResult> {
        let recovered = self.recover(image_bytes)?;
        debug!(
            transform = %recovered.transform,
            attempts = recovered.attempts,
            "symbol recovered"
        );
        self.verify_payload(&recovered.payload, today)
    }

    /// Interpret an already-decoded payload
    pub fn verify_payload(&self, payload: &RawPayload, today: NaiveDate) -> Result<AgeResult> {
        let sniffed = sniff(payload.as_bytes(), self.config.payload.legacy_scan_window);
        debug!(format = %sniffed.format, "payload classified");

        let table = split_payload(&sniffed, self.config.payload.max_inflated_bytes)?;
        let facts = extract_facts(&table, sniffed.format)?;
        let result = evaluate_age(&facts, today)?;

        info!(format = %sniffed.format, is_under_18 = result.is_under_18, "verification complete");
        Ok(result)
    }

    /// Boundary form of [`Verifier::verify`]. Failures carry only the error kind.
    pub fn respond(&self, image_bytes: &[u8], today: NaiveDate) -> VerificationResponse {
        let outcome = self.verify(image_bytes, today);
        if let Err(err) = &outcome {
            warn!(kind = %err.kind(), "verification failed");
            debug!(error = %err, "failure detail");
        }
        VerificationResponse::from(outcome)
    }

    /// Generation of the payload pictured in `image_bytes`
    pub fn inspect(&self, image_bytes: &[u8]) -> Result<(Recovered, PayloadFormat)> {
        let recovered = self.recover(image_bytes)?;
        let format = sniff(
            recovered.payload.as_bytes(),
            self.config.payload.legacy_scan_window,
        )
        .format;
        Ok((recovered, format))
    }
}

/// Verify with the bundled decoder and default configuration
pub fn verify_image(image_bytes: &[u8], today: NaiveDate) -> Result<AgeResult> {
    Verifier::new().verify(image_bytes, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::Point;
    use crate::symbol::DecodedSymbol;
    use crate::synth::SyntheticPayload;
    use image::{GrayImage, ImageOutputFormat, Luma};
    use std::io::Cursor;

    /// Reports the same payload for every candidate
    struct Always(Vec<u8>);

    impl SymbolDecoder for Always {
        fn decode_symbols(&self, _pixels: &GrayImage) -> Vec<DecodedSymbol> {
            vec![DecodedSymbol {
                bytes: self.0.clone(),
                corners: [Point::default(); 4],
            }]
        }
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let gray = GrayImage::from_pixel(width, height, Luma([200]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageLuma8(gray)
            .write_to(&mut out, ImageOutputFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn test_legacy_through_mock_decoder() {
        let payload = SyntheticPayload::legacy(NaiveDate::from_ymd_opt(1995, 3, 10).unwrap());
        let verifier = Verifier::with_decoder(Always(payload.to_bytes().unwrap()));
        let result = verifier.verify(&png(32, 32), today()).unwrap();
        assert_eq!(result, AgeResult { age: 29, is_under_18: false });
    }

    #[test]
    fn test_compressed_through_mock_decoder() {
        let payload = SyntheticPayload::compressed(2010);
        let verifier = Verifier::with_decoder(Always(payload.to_bytes().unwrap()));
        let result = verifier.verify(&png(32, 32), today()).unwrap();
        assert_eq!(result, AgeResult { age: 14, is_under_18: true });
    }

    #[test]
    fn test_unknown_payload() {
        let verifier = Verifier::with_decoder(Always(b"https://example.org".to_vec()));
        let err = verifier.verify(&png(16, 16), today()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownFormat);
        let (_, format) = verifier.inspect(&png(16, 16)).unwrap();
        assert_eq!(format, PayloadFormat::Unknown);
    }

    #[test]
    fn test_two_digit_year_is_schema_mismatch() {
        let verifier = Verifier::new();
        for dob in ["95-03-10", "10-03-95", "10/3/95"] {
            let payload = RawPayload::from_bytes(format!("123456|Name|M|{dob}"));
            let err = verifier.verify_payload(&payload, today()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::SchemaMismatch, "layout {dob}");
        }
    }

    #[test]
    fn test_oversized_image_rejected() {
        let config = PipelineConfig {
            max_image_dim: 16,
            ..PipelineConfig::default()
        };
        let verifier = Verifier::with_decoder(Always(Vec::new())).with_config(config);
        let err = verifier.verify(&png(32, 8), today()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidImage);
    }

    #[test]
    fn test_respond_failure_shape() {
        let response = Verifier::new().respond(b"not an image", today());
        assert_eq!(response.to_json(), r#"{"success":false,"error":"InvalidImage"}"#);
    }
}
