//! Gzip inflation of raw telemetry payloads.

use crate::error::{DecodeError, DecodeResult};
use flate2::read::MultiGzDecoder;
use std::io::Read;

/// Ceiling on inflated size; a live map payload for a full server is a few hundred KiB.
pub const DEFAULT_MAX_DECOMPRESSED_BYTES: usize = 16 * 1024 * 1024;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Inflates a complete gzip payload into UTF-8 text.
///
/// The whole stream is read before returning, so a truncated payload surfaces
/// as `CorruptPayload` instead of a partial document. Concatenated gzip members
/// are inflated back to back.
pub fn decompress(bytes: &[u8], limit: usize) -> DecodeResult<String> {
    if bytes.is_empty() {
        return Err(DecodeError::CorruptPayload("empty payload".to_string()));
    }
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Err(DecodeError::CorruptPayload(
            "missing gzip header".to_string(),
        ));
    }

    // One extra byte lets us tell "exactly at the limit" from "past it".
    let mut inflated = Vec::with_capacity(bytes.len().saturating_mul(4).min(limit));
    MultiGzDecoder::new(bytes)
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut inflated)
        .map_err(|e| DecodeError::CorruptPayload(e.to_string()))?;

    if inflated.len() > limit {
        return Err(DecodeError::PayloadTooLarge { limit });
    }

    String::from_utf8(inflated)
        .map_err(|e| DecodeError::CorruptPayload(format!("inflated text is not utf-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_decompress_valid_payload() {
        let payload = gzip(br#"{"p":[],"d":{"p":[],"e":[]},"s":[]}"#);
        let text = decompress(&payload, DEFAULT_MAX_DECOMPRESSED_BYTES).unwrap();
        assert_eq!(text, r#"{"p":[],"d":{"p":[],"e":[]},"s":[]}"#);
    }

    #[test]
    fn test_decompress_empty_payload() {
        let result = decompress(&[], DEFAULT_MAX_DECOMPRESSED_BYTES);
        assert!(matches!(result, Err(DecodeError::CorruptPayload(_))));
    }

    #[test]
    fn test_decompress_plain_text_is_rejected() {
        let result = decompress(b"{\"p\":[]}", DEFAULT_MAX_DECOMPRESSED_BYTES);
        assert!(matches!(result, Err(DecodeError::CorruptPayload(_))));
    }

    #[test]
    fn test_decompress_truncated_payload() {
        let payload = gzip("a fairly long body that spans more than a header".repeat(20).as_bytes());
        let truncated = &payload[..payload.len() / 2];

        let result = decompress(truncated, DEFAULT_MAX_DECOMPRESSED_BYTES);
        assert!(matches!(result, Err(DecodeError::CorruptPayload(_))));
    }

    #[test]
    fn test_decompress_concatenated_members() {
        let mut payload = gzip(b"{\"p\":[],");
        payload.extend(gzip(b"\"s\":[]}"));

        let text = decompress(&payload, DEFAULT_MAX_DECOMPRESSED_BYTES).unwrap();
        assert_eq!(text, "{\"p\":[],\"s\":[]}");
    }

    #[test]
    fn test_decompress_limit() {
        let payload = gzip(&[b' '; 4096]);

        assert!(decompress(&payload, 4096).is_ok());
        match decompress(&payload, 4095) {
            Err(DecodeError::PayloadTooLarge { limit }) => assert_eq!(limit, 4095),
            other => panic!("expected PayloadTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_decompress_unbounded_limit() {
        let payload = gzip(br#"{"p":[],"d":{},"s":[]}"#);
        let text = decompress(&payload, usize::MAX).unwrap();
        assert_eq!(text, r#"{"p":[],"d":{},"s":[]}"#);
    }

    #[test]
    fn test_decompress_invalid_utf8() {
        let payload = gzip(&[0xff, 0xfe, 0xfd]);
        let result = decompress(&payload, DEFAULT_MAX_DECOMPRESSED_BYTES);
        assert!(matches!(result, Err(DecodeError::CorruptPayload(_))));
    }
}
