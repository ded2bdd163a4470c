// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! A keyed associative table of compact HyperLogLog+HIP cardinality
//! sketches.
//!
//! [`HllMap`] is a single open-addressed hash table: row `i` holds a
//! fixed-length key, a bit-packed array of 6-bit HyperLogLog registers
//! (ten per 64-bit word, see [`map`]'s register codec), a
//! numerically-stable split sum of `2^-register` across all registers, and
//! a running [HIP](https://datasketches.apache.org/docs/HLL/HIP.html)
//! cardinality estimate that is updated incrementally as coupons arrive.
//! The table rehashes into a larger prime-sized table whenever occupancy
//! exceeds 15/16 of the current size.
//!
//! Coupon generation -- hashing an arbitrary input into a 32-bit coupon --
//! is outside this crate's scope; see [`coupon`] for the narrow encode/decode
//! slice `HllMap` itself needs, and for a `coupon_for` helper that exercises
//! the map in tests and examples without a full sketch front-end.

pub mod coupon;
pub mod error;
pub mod hash;
pub mod map;
mod prime;

pub use error::{Error, ErrorKind, Result};
pub use map::{CouponMap, HllMap};
pub use prime::next_prime;
