//! Base32 handling for keychain secrets
//!
//! Secrets are stored as padded RFC 4648 base32 text. Reading is case
//! insensitive and lenient: non-zero trailing bits are accepted and line
//! terminators inside the text are skipped, so keychains edited with CRLF
//! line endings keep working. Text typed by the user is normalized before
//! it is validated and written.

use crate::error::OtpError;
use data_encoding::{Encoding, SpecificationError, BASE32};

lazy_static::lazy_static! {
    static ref KEY_ENCODING: Result<Encoding, SpecificationError> = {
        let mut spec = BASE32.specification();
        spec.check_trailing_bits = false;
        spec.ignore.push_str("\r\n");
        spec.encoding()
    };
}

/// Strip all whitespace and pad with `=` to a multiple of 8 characters
pub fn normalize_key(input: &str) -> String {
    let mut text: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let padding_len = (8 - text.len() % 8) % 8;
    text.extend(std::iter::repeat('=').take(padding_len));
    text
}

/// Decode padded base32 text into raw key bytes, ignoring case
pub fn decode_key(input: &str) -> Result<Vec<u8>, OtpError> {
    let encoding = KEY_ENCODING
        .as_ref()
        .map_err(|e| OtpError::Encoding(e.to_string()))?;
    encoding
        .decode(input.to_ascii_uppercase().as_bytes())
        .map_err(|e| OtpError::InvalidBase32 {
            position: e.position,
        })
}
