//! Random output hashes.

use std::fmt::Write;

use rand::Rng;

/// Bytes of randomness in a page hash (`<hash>.js`).
pub const PAGE_HASH_BYTES: usize = 4;

/// Bytes of randomness in a worker script hash (`w.<hash>.js`).
pub const WORKER_HASH_BYTES: usize = 8;

/// Generate `bytes` random bytes as lowercase hex.
pub fn random_hash(bytes: usize) -> String {
    let mut rng = rand::rng();
    let mut out = String::with_capacity(bytes * 2);
    for _ in 0..bytes {
        let _ = write!(out, "{:02x}", rng.random::<u8>());
    }
    out
}

/// Generate a page hash for which `taken` returns false.
pub fn fresh_page_hash(taken: impl Fn(&str) -> bool) -> String {
    loop {
        let hash = random_hash(PAGE_HASH_BYTES);
        if !taken(&hash) {
            return hash;
        }
    }
}
