//! Plain-text keychain store
//!
//! The keychain file is loaded once per invocation into an index of named
//! keys. The loaded bytes are retained so that counter fields located
//! during parsing can later be rewritten in place, at the same offsets,
//! without rewriting the rest of the file.

mod record;

pub use record::{Key, KeyMode, COUNTER_LEN};

use crate::error::KeychainError;
use crate::otp;
use crate::types::{AddParams, OtpCode};
use record::Line;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

/// Owner-only permissions for the keychain file
#[cfg(unix)]
const KEYCHAIN_MODE: u32 = 0o600;

/// A keychain line that was skipped during load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
}

impl fmt::Display for MalformedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: malformed key", self.path.display(), self.line)
    }
}

/// One row of the show-all listing
#[derive(Debug, Clone)]
pub struct ShowAllEntry {
    pub name: String,
    /// The current code, or dashes for counter-based keys
    pub code: OtpCode,
}

/// In-memory view of a keychain file
#[derive(Debug)]
pub struct Keychain {
    path: PathBuf,
    data: Vec<u8>,
    keys: BTreeMap<String, Key>,
    malformed: Vec<MalformedLine>,
}

impl Keychain {
    /// Load the keychain at `path`
    ///
    /// A missing file yields an empty keychain. Malformed lines are
    /// reported and skipped; a later record for an already seen name
    /// replaces the earlier one.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, KeychainError> {
        let path = path.into();
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No keychain at {}, starting empty", path.display());
                Vec::new()
            }
            Err(source) => return Err(KeychainError::Read { path, source }),
        };

        let mut keys = BTreeMap::new();
        let mut malformed = Vec::new();
        let mut end = 0;
        for (index, line) in data.split_inclusive(|b| *b == b'\n').enumerate() {
            end += line.len();
            match record::parse_line(line, end) {
                Line::Blank => {}
                Line::Record { name, key } => {
                    if keys.insert(name, key).is_some() {
                        debug!("Line {} replaces an earlier key of the same name", index + 1);
                    }
                }
                Line::Malformed => {
                    let skipped = MalformedLine {
                        path: path.clone(),
                        line: index + 1,
                    };
                    warn!("{}", skipped);
                    malformed.push(skipped);
                }
            }
        }

        debug!("Loaded {} keys from {}", keys.len(), path.display());
        Ok(Self {
            path,
            data,
            keys,
            malformed,
        })
    }

    /// Lines skipped while loading
    pub fn malformed(&self) -> &[MalformedLine] {
        &self.malformed
    }

    /// Look up a key by name
    pub fn get(&self, name: &str) -> Option<&Key> {
        self.keys.get(name)
    }

    /// All key names in lexicographic order
    pub fn names(&self) -> Vec<&str> {
        self.keys.keys().map(String::as_str).collect()
    }

    /// Append a new key to the backing file
    ///
    /// The name and secret are validated before the file is touched. The
    /// in-memory index is left unchanged. A failed write is not rolled back.
    pub fn add(
        &self,
        name: &str,
        secret_text: &str,
        params: &AddParams,
    ) -> Result<(), KeychainError> {
        validate_name(name)?;

        let secret_text = otp::base32::normalize_key(secret_text);
        otp::base32::decode_key(&secret_text).map_err(KeychainError::InvalidKey)?;

        let mut line = record::format_record(name, &secret_text, params);
        if self.data.last().is_some_and(|b| *b != b'\n') {
            line.insert(0, '\n');
        }

        let mut file = open_for_append(&self.path).map_err(KeychainError::Open)?;
        restrict_permissions(&file);
        file.write_all(line.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(KeychainError::Append)?;

        debug!(
            "Added {} key {} to {}",
            if params.counter_based { "HOTP" } else { "TOTP" },
            name,
            self.path.display()
        );
        Ok(())
    }

    /// Produce the current code for `name`
    ///
    /// For counter-based keys this advances the stored counter and writes
    /// it back to the file before the code is returned.
    pub fn code(&mut self, name: &str) -> Result<OtpCode, KeychainError> {
        self.code_at(name, SystemTime::now())
    }

    /// Like [`Keychain::code`], with an explicit clock for time-based keys
    pub fn code_at(&mut self, name: &str, now: SystemTime) -> Result<OtpCode, KeychainError> {
        let key = self.keys.get(name).ok_or_else(|| KeychainError::NoSuchKey {
            name: name.to_string(),
        })?;
        let digits = key.digits.get();

        let value = match key.mode {
            KeyMode::TimeBased => otp::totp(key.secret.expose(), now, digits),
            KeyMode::CounterBased { offset } => {
                let field = self
                    .data
                    .get(offset..offset + COUNTER_LEN)
                    .unwrap_or_default();
                let counter =
                    record::parse_counter(field).ok_or_else(|| KeychainError::MalformedCounter {
                        name: name.to_string(),
                        field: String::from_utf8_lossy(field).into_owned(),
                    })?;
                let next = counter
                    .checked_add(1)
                    .ok_or_else(|| KeychainError::CounterExhausted {
                        name: name.to_string(),
                    })?;
                let value = otp::hotp(key.secret.expose(), next, digits);

                let text = record::format_counter(next);
                write_counter(&self.path, offset, text.as_bytes())
                    .map_err(KeychainError::Update)?;
                self.data[offset..offset + COUNTER_LEN].copy_from_slice(text.as_bytes());
                debug!("Advanced counter for {} to {}", name, next);
                value
            }
        };

        Ok(OtpCode::new(otp::render(value, digits)))
    }

    /// Current codes for every key, sorted by name
    ///
    /// Counter-based keys are shown as dashes; their counters are never
    /// advanced for a bulk listing.
    pub fn show_all(&self) -> Vec<ShowAllEntry> {
        self.show_all_at(SystemTime::now())
    }

    /// Like [`Keychain::show_all`], with an explicit clock
    pub fn show_all_at(&self, now: SystemTime) -> Vec<ShowAllEntry> {
        self.keys
            .iter()
            .map(|(name, key)| {
                let digits = key.digits.get();
                let code = match key.mode {
                    KeyMode::TimeBased => {
                        otp::render(otp::totp(key.secret.expose(), now, digits), digits)
                    }
                    KeyMode::CounterBased { .. } => "-".repeat(digits as usize),
                };
                ShowAllEntry {
                    name: name.clone(),
                    code: OtpCode::new(code),
                }
            })
            .collect()
    }
}

/// Render show-all rows: codes left-justified to the widest code, a tab,
/// then the name
pub fn format_show_all(entries: &[ShowAllEntry]) -> String {
    let width = entries
        .iter()
        .map(|entry| entry.code.expose().len())
        .max()
        .unwrap_or(0);
    entries
        .iter()
        .map(|entry| format!("{:<width$}\t{}\n", entry.code.expose(), entry.name))
        .collect()
}

/// Key names are single fields of the line format
pub fn validate_name(name: &str) -> Result<(), KeychainError> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(KeychainError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn open_for_append(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.append(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(KEYCHAIN_MODE);
    }
    options.open(path)
}

/// Tighten permissions on an existing keychain; failure is not fatal
fn restrict_permissions(file: &File) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) = file.set_permissions(fs::Permissions::from_mode(KEYCHAIN_MODE)) {
            warn!("Failed to restrict keychain permissions: {}", e);
        }
    }
    #[cfg(not(unix))]
    let _ = file;
}

/// Overwrite the counter field at `offset` and flush it to disk
fn write_counter(path: &Path, offset: usize, text: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;
    file.seek(SeekFrom::Start(offset as u64))?;
    file.write_all(text)?;
    file.sync_all()
}
