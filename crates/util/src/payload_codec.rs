//! Base64 and data URI handling for file payloads.
//!
//! Decoding is deliberately forgiving, in the same way browsers treat base64
//! text: ASCII whitespace is ignored, padding is optional and stray trailing
//! bits are accepted. Padding only counts when it completes the final
//! quantum; partial padding, characters outside the standard alphabet and a
//! dangling single symbol are rejected.

use base64::{
    Engine, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose::STANDARD},
};
use thiserror::Error;

/// Scheme marker that introduces a data URI.
pub const DATA_URI_SCHEME: &str = "data:";

const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// Error surfaced when a payload string cannot be decoded.
#[derive(Debug, Error)]
pub enum PayloadCodecError {
    #[error("payload is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// The parts of a `data:` URI relevant to a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUri<'a> {
    /// Media type declared before the first `;`, if any.
    pub content_type: Option<&'a str>,
    /// Everything after the first `,`.
    pub payload: &'a str,
}

/// A successfully decoded payload string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload<'a> {
    pub content_type: Option<&'a str>,
    pub bytes: Vec<u8>,
}

/// Encodes raw bytes as standard, padded base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Splits a `data:` URI into its media type and payload.
///
/// Returns `None` when `value` does not start with the `data:` scheme. The
/// media type is only taken when a `;` appears before the payload separator;
/// a URI without a `,` is treated as all payload.
pub fn split_data_uri(value: &str) -> Option<DataUri<'_>> {
    let rest = value.strip_prefix(DATA_URI_SCHEME)?;
    let (header, payload) = match rest.find(',') {
        Some(comma_idx) => (&rest[..comma_idx], &rest[comma_idx + 1..]),
        None => ("", rest),
    };
    let content_type = header
        .find(';')
        .map(|semicolon_idx| header[..semicolon_idx].trim())
        .filter(|content_type| !content_type.is_empty());
    Some(DataUri { content_type, payload })
}

/// Decodes base64 text using forgiving rules.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, PayloadCodecError> {
    let compact: String = text.chars().filter(|c| !is_ascii_whitespace(*c)).collect();
    // Padding is dropped only from a full final quantum; any `=` left over fails to decode.
    let unpadded = if compact.len() % 4 == 0 {
        compact.strip_suffix("==").or_else(|| compact.strip_suffix('=')).unwrap_or(&compact)
    } else {
        compact.as_str()
    };
    Ok(FORGIVING.decode(unpadded.as_bytes())?)
}

/// Decodes a payload value that is either plain base64 or a `data:` URI.
pub fn decode_payload(value: &str) -> Result<DecodedPayload<'_>, PayloadCodecError> {
    let (content_type, body) = match split_data_uri(value) {
        Some(DataUri { content_type, payload }) => (content_type, payload),
        None => (None, value),
    };
    let bytes = decode_base64(body)?;
    Ok(DecodedPayload { content_type, bytes })
}

// Whitespace set stripped by the forgiving base64 algorithm.
fn is_ascii_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0C' | '\r')
}
