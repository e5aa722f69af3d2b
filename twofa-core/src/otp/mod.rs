//! One-time code generation
//!
//! Pure HOTP (RFC 4226) and TOTP (RFC 6238) functions over HMAC-SHA1.
//! Nothing here touches the keychain or the filesystem.

pub mod base32;
pub mod hmac;

use std::time::{SystemTime, UNIX_EPOCH};

/// TOTP time step in seconds
pub const TIME_STEP: u64 = 30;

/// Compute the HOTP value for `counter`, reduced to `digits` decimal digits
///
/// Digit counts above 8 are clamped since a 31-bit truncated value has
/// no more useful digits.
pub fn hotp(secret: &[u8], counter: u64, digits: u32) -> u32 {
    let sum = hmac::hmac_sha1(secret, &counter.to_be_bytes());
    let offset = usize::from(sum[hmac::DIGEST_LEN - 1] & 0x0F);
    let truncated = u32::from_be_bytes([
        sum[offset],
        sum[offset + 1],
        sum[offset + 2],
        sum[offset + 3],
    ]) & 0x7FFF_FFFF;
    truncated % 10u32.pow(digits.min(8))
}

/// Compute the TOTP value for wall-clock time `now`
///
/// No skew window: the code is only accepted by a verifier whose clock
/// agrees to within one time step.
pub fn totp(secret: &[u8], now: SystemTime, digits: u32) -> u32 {
    hotp(secret, time_counter(now), digits)
}

/// Time step counter for `now`; clocks before the epoch map to step 0
pub fn time_counter(now: SystemTime) -> u64 {
    now.duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() / TIME_STEP)
        .unwrap_or(0)
}

/// Render a code as zero-padded decimal text of exactly `digits` characters
pub fn render(code: u32, digits: u32) -> String {
    format!("{:0width$}", code, width = digits as usize)
}
