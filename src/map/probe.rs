//! Probe engine: hash a key into an initial index and stride, then walk
//! the open-addressed table looking for the key or an empty slot.
//!
//! "Found" vs "not-found, insert here" is modeled as a sum type
//! (`ProbeResult`) rather than a signed-index encoding -- a plain `enum`
//! says the same thing without relying on the index's sign bit.

use crate::error::Error;
use crate::hash::keyed_hash128;

/// Outcome of a probe: either the slot already holding a matching key, or
/// the first empty slot encountered along the probe sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeResult {
    Found(usize),
    Empty(usize),
}

/// Computes the initial index and stride for `key` over a table of `t`
/// slots. `t` must be prime so the stride (which only satisfies
/// `1 <= stride < t`) is guaranteed coprime with it, and the probe visits
/// every slot exactly once before repeating.
fn initial_index_and_stride(key: &[u8], t: u64) -> (u64, u64) {
    let (h0, h1) = keyed_hash128(key);
    let initial_index = h0 % t;
    let stride = 1 + (h1 % (t - 1));
    (initial_index, stride)
}

/// Returns `true` if the bit for slot `i` is set in `occupied`.
#[inline]
fn is_occupied(occupied: &[u8], i: usize) -> bool {
    (occupied[i / 8] >> (i % 8)) & 1 == 1
}

/// Searches for `key` among the table's `t` slots. `key_at(i)` must return
/// the key bytes stored at slot `i` (only consulted for occupied slots).
///
/// Returns `ProbeResult::Found(i)` if `key` already occupies slot `i`, or
/// `ProbeResult::Empty(i)` for the first empty slot on the probe path. If
/// the probe returns to its starting index without resolving either way,
/// the load-factor invariant has been violated and this returns
/// `InvariantViolated` -- at `capacity <= 15/16 * t` that should never
/// actually happen.
pub fn find_key<'a>(
    key: &[u8],
    t: u64,
    occupied: &[u8],
    key_at: impl Fn(usize) -> &'a [u8],
) -> Result<ProbeResult, Error> {
    let (initial_index, stride) = initial_index_and_stride(key, t);
    let mut i = initial_index;

    loop {
        let idx = i as usize;
        if !is_occupied(occupied, idx) {
            return Ok(ProbeResult::Empty(idx));
        }
        if key_at(idx) == key {
            return Ok(ProbeResult::Found(idx));
        }

        i = (i + stride) % t;
        if i == initial_index {
            return Err(Error::invariant_violated(
                "probe completed a full cycle without finding the key or an empty slot",
            ));
        }
    }
}

/// Like `find_key`, but used only during resize on a table known to be
/// strictly under capacity: returns the first empty slot along the probe
/// sequence without ever comparing key bytes, since the destination table
/// is known to not yet contain `key`.
pub fn find_empty(key: &[u8], t: u64, occupied: &[u8]) -> Result<usize, Error> {
    let (initial_index, stride) = initial_index_and_stride(key, t);
    let mut i = initial_index;

    loop {
        let idx = i as usize;
        if !is_occupied(occupied, idx) {
            return Ok(idx);
        }

        i = (i + stride) % t;
        if i == initial_index {
            return Err(Error::invariant_violated(
                "find_empty completed a full cycle without finding an empty slot",
            ));
        }
    }
}
