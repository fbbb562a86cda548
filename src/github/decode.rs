// Content decoding for the GitHub contents API.
// File bodies arrive base64 encoded and wrapped at 60 columns.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::Result;

/// Signature of a content decoder, chosen once when the client is built.
pub type DecodeFn = fn(&str) -> Result<String>;

/// Decode a base64 file body into text.
///
/// Embedded whitespace is ignored. Invalid UTF-8 sequences are replaced
/// with U+FFFD rather than rejected.
pub fn decode_base64(encoded: &str) -> Result<String> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD.decode(compact)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
