//! Error types for the twofa agent
//!
//! Per-line problems found while loading a keychain are not errors; they
//! are reported and skipped. Everything here is fatal to the operation
//! that produced it.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the twofa application
#[derive(Error, Debug)]
pub enum TwofaError {
    /// Errors related to resolving the keychain location
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Errors raised by keychain operations
    #[error(transparent)]
    Keychain(#[from] KeychainError),

    /// Errors related to OTP secrets
    #[error(transparent)]
    Otp(#[from] OtpError),

    /// Failure reading a key from the prompt
    #[error("error reading key: {0}")]
    Prompt(#[source] std::io::Error),

    /// Generic I/O errors (terminal output)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("HOME environment variable not set")]
    HomeNotSet,
}

/// Keychain operation errors
#[derive(Error, Debug)]
pub enum KeychainError {
    #[error("reading keychain {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("opening keychain: {0}")]
    Open(#[source] std::io::Error),

    #[error("adding key: {0}")]
    Append(#[source] std::io::Error),

    #[error("updating keychain: {0}")]
    Update(#[source] std::io::Error),

    #[error("no such key {name:?}")]
    NoSuchKey { name: String },

    #[error("malformed key counter for {name:?} ({field:?})")]
    MalformedCounter { name: String, field: String },

    #[error("counter for {name:?} is exhausted")]
    CounterExhausted { name: String },

    #[error("name must not contain spaces")]
    InvalidName { name: String },

    #[error("invalid key: {0}")]
    InvalidKey(#[source] OtpError),
}

/// OTP secret and code errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("illegal base32 data at input byte {position}")]
    InvalidBase32 { position: usize },

    #[error("base32 encoding unavailable: {0}")]
    Encoding(String),

    #[error("unsupported digit count {0} (expected 6, 7 or 8)")]
    InvalidDigits(u32),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, TwofaError>;
