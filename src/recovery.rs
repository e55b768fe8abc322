//! Recovery orchestrator: try candidates in order until one decodes.

use tracing::debug;

use crate::config::NormalizerConfig;
use crate::error::{Result, VerifyError};
use crate::models::{Point, RawImage, RawPayload};
use crate::normalizer::{Normalizer, Transform};
use crate::symbol::{SymbolDecoder, decode_candidate};

/// First payload found, and how it was found
#[derive(Debug, Clone, PartialEq)]
pub struct Recovered {
    /// Decoded payload
    pub payload: RawPayload,
    /// Transform of the candidate that decoded
    pub transform: Transform,
    /// Candidates tried, including the successful one
    pub attempts: usize,
}

/// Walk the normalizer's candidates and return the first decoded payload.
///
/// Stops at the first success. Fails with `NoSymbolFound` once every
/// candidate has been tried.
pub fn recover<D>(image: &RawImage, decoder: &D, config: &NormalizerConfig) -> Result<Recovered>
where
    D: SymbolDecoder + ?Sized,
{
    let normalizer = Normalizer::new(image, config);
    let mut attempts = 0usize;

    for candidate in normalizer.candidates() {
        attempts += 1;
        debug!(transform = %candidate.transform, attempt = attempts, "trying candidate");

        if let Some(payload) = decode_candidate(decoder, &candidate) {
            let [top_left, top_right, ..] = *payload.corners();
            let center = Point::centroid(payload.corners()).unwrap_or_default();
            debug!(
                transform = %candidate.transform,
                attempt = attempts,
                payload_len = payload.len(),
                center_x = center.x,
                center_y = center.y,
                edge_px = top_left.distance(&top_right),
                "symbol decoded"
            );
            return Ok(Recovered {
                payload,
                transform: candidate.transform,
                attempts,
            });
        }
    }

    Err(VerifyError::NoSymbolFound { attempts })
}
