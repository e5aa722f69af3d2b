//! Configuration module
//!
//! Resolves where the keychain file lives.

use crate::error::ConfigError;
use std::path::PathBuf;

/// Environment variable overriding the keychain location
pub const KEYCHAIN_ENV: &str = "TWOFA_KEYCHAIN";

/// Keychain file name under the home directory
pub const KEYCHAIN_FILE_NAME: &str = ".2fa";

/// Where to find the keychain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeychainConfig {
    pub path: PathBuf,
}

impl KeychainConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolve the keychain path from the process environment
    ///
    /// `TWOFA_KEYCHAIN` wins when set and non-empty, otherwise `$HOME/.2fa`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(
            std::env::var_os(KEYCHAIN_ENV).map(PathBuf::from),
            std::env::var_os("HOME").map(PathBuf::from),
        )
    }

    fn resolve(keychain: Option<PathBuf>, home: Option<PathBuf>) -> Result<Self, ConfigError> {
        if let Some(path) = keychain.filter(|p| !p.as_os_str().is_empty()) {
            return Ok(Self::new(path));
        }
        home.filter(|p| !p.as_os_str().is_empty())
            .map(|home| Self::new(home.join(KEYCHAIN_FILE_NAME)))
            .ok_or(ConfigError::HomeNotSet)
    }
}
