//! MurmurHash3-128 boundary used for key hashing.
//!
//! The probe engine needs a fixed, keyed, 128-bit non-cryptographic hash
//! over raw key bytes. This module wraps the `mur3` crate's
//! `murmurhash3_x64_128` free function behind a single fixed seed so the
//! rest of the crate never touches the seed constant directly.

/// Seed shared by every hash the map computes. Changing it changes every
/// existing map's probe sequence, so it is a crate-wide constant rather
/// than configurable per instance.
pub const SEED: u32 = 0x4857_4c4d; // "HWLM" in hex, arbitrary but fixed

/// Hash `key` with the crate's fixed seed, returning the two 64-bit halves
/// `(h0, h1)` of the 128-bit digest.
#[inline]
pub fn keyed_hash128(key: &[u8]) -> (u64, u64) {
    mur3::murmurhash3_x64_128(key, SEED)
}
