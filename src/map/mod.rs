//! The `HllMap` and its small supporting primitives: the register codec,
//! the HIP updater, and the probe engine.

mod hip;
mod hll_map;
mod probe;
mod registers;

pub use hll_map::HllMap;

use crate::error::Error;

/// Capability set exposed by a keyed coupon-updatable cardinality map.
///
/// Modeled as a trait rather than an abstract base class: `HllMap` is one
/// implementation of it, and any sibling coupon-storage strategy would
/// implement the same interface rather than inherit from a common base.
pub trait CouponMap {
    /// Applies a coupon to `key`'s sketch, returning the post-update HIP
    /// estimate.
    fn update(&mut self, key: &[u8], coupon: u32) -> Result<f64, Error>;

    /// Returns the current HIP estimate for `key`, or `0.0` if absent.
    fn estimate(&self, key: &[u8]) -> Result<f64, Error>;

    /// Returns `estimate(key) * (1 + RSE)`.
    fn upper_bound(&self, key: &[u8]) -> Result<f64, Error>;

    /// Returns `estimate(key) * (1 - RSE)`.
    fn lower_bound(&self, key: &[u8]) -> Result<f64, Error>;

    /// Design-time self-reported per-entry footprint, in bytes.
    fn entry_size_bytes(&self) -> f64;

    /// Total live allocation backing this map, in bytes.
    fn memory_usage_bytes(&self) -> u64;

    /// Current table size `T`.
    fn table_entries(&self) -> u64;

    /// Current capacity (`floor(T * 15/16)`).
    fn capacity_entries(&self) -> u64;

    /// Current occupancy count.
    fn current_count_entries(&self) -> u64;
}
