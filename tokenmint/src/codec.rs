//! Base64url encoding (RFC 7515 §2)
//!
//! URL-safe alphabet, padding stripped. The same transform is applied to JSON
//! text and to raw signature bytes.

use crate::error::{TokenError, TokenResult};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

/// Base64 URL-safe encoding without padding
#[inline]
#[must_use]
pub fn base64_url_encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Encode bytes that must be UTF-8 text
///
/// # Errors
/// Returns `TokenError::EncodingFailure` if `input` is not valid UTF-8
pub fn base64_url_encode_text(input: &[u8]) -> TokenResult<String> {
    let text = std::str::from_utf8(input)
        .map_err(|e| TokenError::encoding(format!("text segment is not valid UTF-8: {e}")))?;
    Ok(base64_url_encode(text.as_bytes()))
}
