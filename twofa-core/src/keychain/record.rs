//! Keychain line format
//!
//! One record per line, fields separated by single spaces:
//!
//! ```text
//! <name> <digits> <base32 secret> [<20-digit counter>]
//! ```
//!
//! The counter field is fixed width so it can be rewritten in place.

use crate::otp::base32;
use crate::types::{AddParams, Digits, KeySecret};

/// Width of the on-disk counter field
pub const COUNTER_LEN: usize = 20;

/// How a key produces its codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    /// TOTP, derived from the wall clock
    TimeBased,
    /// HOTP, with the last-used counter stored at `offset` in the keychain file
    CounterBased { offset: usize },
}

/// A parsed keychain entry
#[derive(Debug)]
pub struct Key {
    pub digits: Digits,
    pub secret: KeySecret,
    pub mode: KeyMode,
}

/// Result of parsing one line of the keychain file
#[derive(Debug)]
pub(crate) enum Line {
    Blank,
    Record { name: String, key: Key },
    Malformed,
}

/// Parse `line` (including its terminator, if any), which ends at byte
/// `end` of the keychain buffer.
pub(crate) fn parse_line(line: &[u8], end: usize) -> Line {
    let terminated = line.last() == Some(&b'\n');
    let body = if terminated {
        &line[..line.len() - 1]
    } else {
        line
    };
    if body.is_empty() {
        return Line::Blank;
    }

    let fields: Vec<&[u8]> = body.split(|b| *b == b' ').collect();
    if !(3..=4).contains(&fields.len()) {
        return Line::Malformed;
    }

    let Ok(name) = std::str::from_utf8(fields[0]) else {
        return Line::Malformed;
    };
    if name.is_empty() {
        return Line::Malformed;
    }
    let Some(digits) = Digits::from_field(fields[1]) else {
        return Line::Malformed;
    };
    let Some(secret) = std::str::from_utf8(fields[2])
        .ok()
        .and_then(|text| base32::decode_key(text).ok())
    else {
        return Line::Malformed;
    };

    let mode = match fields.get(3) {
        None => KeyMode::TimeBased,
        Some(counter) if counter.len() == COUNTER_LEN && parse_counter(counter).is_some() => {
            let offset = end - COUNTER_LEN - usize::from(terminated);
            KeyMode::CounterBased { offset }
        }
        Some(_) => return Line::Malformed,
    };

    Line::Record {
        name: name.to_string(),
        key: Key {
            digits,
            secret: KeySecret::new(secret),
            mode,
        },
    }
}

/// Parse a counter field; only plain ASCII digits are accepted
pub(crate) fn parse_counter(field: &[u8]) -> Option<u64> {
    if field.is_empty() || !field.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(field).ok()?.parse().ok()
}

/// Render a counter as its fixed-width on-disk text
pub(crate) fn format_counter(counter: u64) -> String {
    format!("{:0width$}", counter, width = COUNTER_LEN)
}

/// Build the line appended for a new key, terminator included
pub(crate) fn format_record(name: &str, secret_text: &str, params: &AddParams) -> String {
    let mut line = format!("{} {} {}", name, params.digits, secret_text);
    if params.counter_based {
        line.push(' ');
        line.push_str(&format_counter(0));
    }
    line.push('\n');
    line
}
