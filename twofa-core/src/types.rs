//! Type definitions and wrappers for secure data handling
//!
//! Decoded secrets and rendered codes are wrapped with the secrecy crate
//! so they never end up in logs or debug output.

use crate::error::OtpError;
use secrecy::{ExposeSecret, Secret};
use std::fmt;

/// Number of decimal digits a key renders its codes with
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digits(u8);

impl Digits {
    pub const SIX: Digits = Digits(6);
    pub const SEVEN: Digits = Digits(7);
    pub const EIGHT: Digits = Digits(8);

    /// Parse the single-character digits field of a keychain line
    pub fn from_field(field: &[u8]) -> Option<Self> {
        match field {
            [c @ b'6'..=b'8'] => Some(Digits(c - b'0')),
            _ => None,
        }
    }

    pub fn get(self) -> u32 {
        u32::from(self.0)
    }
}

impl Default for Digits {
    fn default() -> Self {
        Self::SIX
    }
}

impl TryFrom<u32> for Digits {
    type Error = OtpError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            6..=8 => Ok(Digits(value as u8)),
            other => Err(OtpError::InvalidDigits(other)),
        }
    }
}

impl fmt::Display for Digits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decoded key bytes of a keychain entry
///
/// Decoded once at load time and never re-encoded.
pub struct KeySecret(Secret<Vec<u8>>);

impl KeySecret {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Secret::new(bytes))
    }

    /// Expose the raw key bytes (use with caution!)
    ///
    /// Only the HMAC computation should need this.
    pub fn expose(&self) -> &[u8] {
        self.0.expose_secret()
    }
}

impl fmt::Debug for KeySecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeySecret([REDACTED])")
    }
}

/// A rendered one-time code
///
/// Codes are short-lived but still sensitive, so they are only exposed
/// when printed or handed to the clipboard.
#[derive(Clone, Debug)]
pub struct OtpCode(Secret<String>);

impl OtpCode {
    pub fn new(code: String) -> Self {
        Self(Secret::new(code))
    }

    /// Expose the code text (use with caution!)
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Parameters for adding a key to the keychain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddParams {
    /// Digit count of the generated codes
    pub digits: Digits,
    /// Generate counter-based (HOTP) codes instead of time-based (TOTP) ones
    pub counter_based: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_from_field() {
        assert_eq!(Digits::from_field(b"6"), Some(Digits::SIX));
        assert_eq!(Digits::from_field(b"8"), Some(Digits::EIGHT));
        assert_eq!(Digits::from_field(b"5"), None);
        assert_eq!(Digits::from_field(b"9"), None);
        assert_eq!(Digits::from_field(b"66"), None);
        assert_eq!(Digits::from_field(b""), None);
    }

    #[test]
    fn test_digits_try_from() {
        assert_eq!(Digits::try_from(7).unwrap(), Digits::SEVEN);
        assert_eq!(Digits::try_from(9), Err(OtpError::InvalidDigits(9)));
    }

    #[test]
    fn test_key_secret_debug_is_redacted() {
        let secret = KeySecret::new(b"12345678901234567890".to_vec());
        let debug = format!("{:?}", secret);
        assert!(!debug.contains("49"));
        assert!(debug.contains("REDACTED"));
    }
}
