//! Splitter: turn a classified payload into an ordered field table.

use std::io::Read;

use flate2::read::{GzDecoder, ZlibDecoder};
use tracing::trace;

use super::detect::{Container, Sniffed};
use crate::error::{Result, VerifyError};
use crate::models::{FieldTable, PayloadFormat};

/// Inflate a compressed stream, refusing output beyond `limit` bytes
pub fn inflate(container: Container, body: &[u8], limit: usize) -> Result<Vec<u8>> {
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    let mut out = Vec::new();
    let read = match container {
        Container::Gzip => GzDecoder::new(body).take(cap).read_to_end(&mut out),
        Container::Zlib => ZlibDecoder::new(body).take(cap).read_to_end(&mut out),
    };
    read.map_err(VerifyError::CorruptPayload)?;

    if out.len() > limit {
        return Err(VerifyError::PayloadTooLarge { limit });
    }
    trace!(?container, compressed = body.len(), inflated = out.len(), "payload inflated");
    Ok(out)
}

/// Split a classified payload on its generation's delimiter.
///
/// Empty fields are kept so positions stay stable.
pub fn split_payload(sniffed: &Sniffed<'_>, max_inflated_bytes: usize) -> Result<FieldTable> {
    match (sniffed.format, sniffed.format.delimiter()) {
        (PayloadFormat::CompressedV2, Some(delimiter)) => {
            let container = sniffed.container.unwrap_or(Container::Gzip);
            let inflated = inflate(container, &sniffed.body, max_inflated_bytes)?;
            Ok(FieldTable::split(&inflated, delimiter))
        }
        (PayloadFormat::LegacyV1, Some(delimiter)) => {
            Ok(FieldTable::split(&sniffed.body, delimiter))
        }
        _ => Err(VerifyError::UnknownFormat),
    }
}
