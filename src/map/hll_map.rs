//! The core data structure: an open-addressed table of keys to per-key
//! HLL+HIP state, stored as six parallel arrays rather than one heap
//! object per slot, so a table scan (lookup, resize) walks flat, densely
//! packed memory instead of chasing a pointer per entry.

use crate::coupon;
use crate::error::Error;
use crate::map::hip;
use crate::map::probe::{self, ProbeResult};
use crate::map::registers;
use crate::map::CouponMap;
use crate::prime::next_prime;

/// Initial table size. Always prime; the probe stride's coprimality with
/// `T` depends on it.
const INITIAL_T: u64 = 157;

/// `capacity = floor(T * LOAD_NUMER / LOAD_DENOM)`.
const LOAD_NUMER: u64 = 15;
const LOAD_DENOM: u64 = 16;

const GROWTH_FACTOR: f64 = 2.0;

/// Fixed one-standard-deviation relative standard error, tied to `k =
/// 1024` regardless of the map's actual `k`. Preserved bug-for-bug rather
/// than silently "fixed" to scale with the configured `k` -- see
/// DESIGN.md.
fn rse() -> f64 {
    0.836 / (1024.0_f64).sqrt()
}

/// A densely packed open-addressing hash table mapping fixed-length byte
/// keys to a compact HLL register array, a split inverse-power-of-two sum,
/// and a running HIP cardinality estimate.
///
/// See spec §3 for the invariants this structure maintains after every
/// `update` and `resize`.
pub struct HllMap {
    key_bytes: usize,
    k: u32,
    l: usize,
    t: u64,
    capacity: u64,
    occupancy_count: u64,
    keys: Vec<u8>,
    registers: Vec<u64>,
    sum_hi: Vec<f64>,
    sum_lo: Vec<f64>,
    hip: Vec<f64>,
    occupied: Vec<u8>,
}

impl HllMap {
    /// Creates an empty map whose keys are `key_size_bytes` long and whose
    /// per-key sketches have `k` registers. `k` must be a positive power
    /// of two (registers are addressed by `coupon & (k - 1)`). Constant
    /// time: only the initial `T0 = 157`-slot arrays are allocated.
    pub fn new(key_size_bytes: usize, k: u32) -> Result<Self, Error> {
        if k == 0 || !k.is_power_of_two() {
            return Err(Error::bad_input(format!(
                "k must be a positive power of two, got {k}"
            )));
        }

        let t = INITIAL_T;
        let l = registers::words_for_k(k);
        let capacity = (t * LOAD_NUMER) / LOAD_DENOM;

        Ok(Self {
            key_bytes: key_size_bytes,
            k,
            l,
            t,
            capacity,
            occupancy_count: 0,
            keys: try_zeroed_vec(t as usize * key_size_bytes)?,
            registers: try_zeroed_vec(t as usize * l)?,
            sum_hi: vec![0.0; t as usize],
            sum_lo: vec![0.0; t as usize],
            hip: vec![0.0; t as usize],
            occupied: try_zeroed_vec((t as usize).div_ceil(8))?,
        })
    }

    #[inline]
    fn key_at(&self, i: usize) -> &[u8] {
        &self.keys[i * self.key_bytes..(i + 1) * self.key_bytes]
    }

    #[inline]
    fn row_at(&self, i: usize) -> &[u64] {
        &self.registers[i * self.l..(i + 1) * self.l]
    }

    #[inline]
    fn row_at_mut(&mut self, i: usize) -> &mut [u64] {
        &mut self.registers[i * self.l..(i + 1) * self.l]
    }

    #[inline]
    fn set_occupied(&mut self, i: usize) {
        self.occupied[i / 8] |= 1 << (i % 8);
    }

    #[inline]
    fn is_occupied(&self, i: usize) -> bool {
        (self.occupied[i / 8] >> (i % 8)) & 1 == 1
    }

    fn locate(&self, key: &[u8]) -> Result<ProbeResult, Error> {
        probe::find_key(key, self.t, &self.occupied, |i| self.key_at(i))
    }

    /// Initializes slot `i` as a newly occupied entry for `key`: zeroed
    /// registers, `sum_hi = k`, `sum_lo = 0`, `hip = 0` (spec invariant 4).
    fn insert_at(&mut self, i: usize, key: &[u8]) {
        self.keys[i * self.key_bytes..(i + 1) * self.key_bytes].copy_from_slice(key);
        self.set_occupied(i);
        for word in self.row_at_mut(i) {
            *word = 0;
        }
        self.sum_hi[i] = self.k as f64;
        self.sum_lo[i] = 0.0;
        self.hip[i] = 0.0;
        self.occupancy_count += 1;
    }

    /// Applies a coupon to the key already resident at slot `i`.
    fn apply_coupon_at(&mut self, i: usize, coupon_bits: u32) {
        let k = self.k;
        let l = self.l;
        let r = coupon::register_index(coupon_bits, k);
        let new_value = coupon::register_value(coupon_bits);

        // Slice the registers field directly (rather than through a
        // `&mut self` helper method) so this borrows only `self.registers`,
        // leaving `self.sum_hi`/`sum_lo`/`hip` free to borrow alongside it.
        let row = &mut self.registers[i * l..(i + 1) * l];
        let old_value = registers::read(row, r);

        hip::apply_register_update(
            k as f64,
            row,
            r,
            old_value,
            new_value,
            &mut self.sum_hi[i],
            &mut self.sum_lo[i],
            &mut self.hip[i],
        );
    }

    /// Rehashes every live slot into a new, larger prime-sized table.
    /// Triggered strictly when `occupancy_count > capacity` after an
    /// insertion. `occupancy_count` and the growth factor are unchanged by
    /// a resize; only `T`, `capacity`, and the six backing arrays change.
    fn resize(&mut self) -> Result<(), Error> {
        let new_t = next_prime((self.t as f64 * GROWTH_FACTOR).ceil() as u64);
        let new_capacity = (new_t * LOAD_NUMER) / LOAD_DENOM;

        let mut new_keys = try_zeroed_vec(new_t as usize * self.key_bytes)?;
        let mut new_registers = try_zeroed_vec(new_t as usize * self.l)?;
        let mut new_sum_hi = try_zeroed_f64_vec(new_t as usize)?;
        let mut new_sum_lo = try_zeroed_f64_vec(new_t as usize)?;
        let mut new_hip = try_zeroed_f64_vec(new_t as usize)?;
        let mut new_occupied = try_zeroed_vec((new_t as usize).div_ceil(8))?;

        for j in 0..self.t as usize {
            if !self.is_occupied(j) {
                continue;
            }
            let key = self.key_at(j);
            let dest = probe::find_empty(key, new_t, &new_occupied)?;

            new_keys[dest * self.key_bytes..(dest + 1) * self.key_bytes].copy_from_slice(key);
            new_registers[dest * self.l..(dest + 1) * self.l].copy_from_slice(self.row_at(j));
            new_sum_hi[dest] = self.sum_hi[j];
            new_sum_lo[dest] = self.sum_lo[j];
            new_hip[dest] = self.hip[j];
            new_occupied[dest / 8] |= 1 << (dest % 8);
        }

        self.keys = new_keys;
        self.registers = new_registers;
        self.sum_hi = new_sum_hi;
        self.sum_lo = new_sum_lo;
        self.hip = new_hip;
        self.occupied = new_occupied;
        self.t = new_t;
        self.capacity = new_capacity;

        Ok(())
    }

    fn check_key_len(&self, key: &[u8]) -> Result<(), Error> {
        if key.len() != self.key_bytes {
            return Err(Error::key_length_mismatch(self.key_bytes, key.len()));
        }
        Ok(())
    }
}

impl CouponMap for HllMap {
    fn update(&mut self, key: &[u8], coupon: u32) -> Result<f64, Error> {
        self.check_key_len(key)?;

        let i = match self.locate(key)? {
            ProbeResult::Found(i) => i,
            ProbeResult::Empty(i) => {
                self.insert_at(i, key);
                if self.occupancy_count > self.capacity {
                    self.resize()?;
                    match self.locate(key)? {
                        ProbeResult::Found(i) => i,
                        ProbeResult::Empty(_) => {
                            return Err(Error::invariant_violated(
                                "key vanished from the table immediately after resize",
                            ));
                        }
                    }
                } else {
                    i
                }
            }
        };

        self.apply_coupon_at(i, coupon);
        Ok(self.hip[i])
    }

    fn estimate(&self, key: &[u8]) -> Result<f64, Error> {
        match self.locate(key)? {
            ProbeResult::Found(i) => Ok(self.hip[i]),
            ProbeResult::Empty(_) => Ok(0.0),
        }
    }

    fn upper_bound(&self, key: &[u8]) -> Result<f64, Error> {
        Ok(self.estimate(key)? * (1.0 + rse()))
    }

    fn lower_bound(&self, key: &[u8]) -> Result<f64, Error> {
        Ok(self.estimate(key)? * (1.0 - rse()))
    }

    fn entry_size_bytes(&self) -> f64 {
        self.key_bytes as f64
            + 8.0 * self.l as f64
            + 24.0 // sum_hi + sum_lo + hip, one f64 each
            + self.t.div_ceil(8) as f64 / self.t as f64
    }

    fn memory_usage_bytes(&self) -> u64 {
        let keys = self.keys.len() as u64;
        let registers = self.registers.len() as u64 * 8;
        let sums_and_hip = (self.sum_hi.len() + self.sum_lo.len() + self.hip.len()) as u64 * 8;
        let occupied = self.occupied.len() as u64;
        keys + registers + sums_and_hip + occupied
    }

    fn table_entries(&self) -> u64 {
        self.t
    }

    fn capacity_entries(&self) -> u64 {
        self.capacity
    }

    fn current_count_entries(&self) -> u64 {
        self.occupancy_count
    }
}

fn try_zeroed_vec<T: Clone + Default>(len: usize) -> Result<Vec<T>, Error> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|e| Error::out_of_memory("allocation failed").set_source(e))?;
    v.resize(len, T::default());
    Ok(v)
}

fn try_zeroed_f64_vec(len: usize) -> Result<Vec<f64>, Error> {
    try_zeroed_vec(len)
}
