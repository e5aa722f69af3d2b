//! HMAC-SHA1 (RFC 2104)
//!
//! Block size is 64 bytes for SHA-1; keys longer than a block are
//! hashed down to a digest first, shorter keys are zero padded.

use sha1::{Digest, Sha1};

const BLOCK_SIZE: usize = 64;
const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5C;

/// Length of an HMAC-SHA1 digest in bytes
pub const DIGEST_LEN: usize = 20;

/// Compute HMAC-SHA1 of `message` keyed by `key`
pub fn hmac_sha1(key: &[u8], message: &[u8]) -> [u8; DIGEST_LEN] {
    let mut key_block = [0u8; BLOCK_SIZE];
    if key.len() > BLOCK_SIZE {
        key_block[..DIGEST_LEN].copy_from_slice(&Sha1::digest(key));
    } else {
        key_block[..key.len()].copy_from_slice(key);
    }

    let inner_key = key_block.map(|b| b ^ IPAD);
    let outer_key = key_block.map(|b| b ^ OPAD);

    let inner_hash = Sha1::new()
        .chain_update(inner_key)
        .chain_update(message)
        .finalize();

    let outer_hash = Sha1::new()
        .chain_update(outer_key)
        .chain_update(inner_hash)
        .finalize();

    let mut result = [0u8; DIGEST_LEN];
    result.copy_from_slice(&outer_hash);
    result
}
