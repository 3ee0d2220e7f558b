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

//! Bloom Filter implementation for probabilistic set membership testing.
//!
//! A Bloom filter is a space-efficient probabilistic data structure used to test whether
//! an element is a member of a set. False positive matches are possible, but false negatives
//! are not. In other words, a query returns either "possibly in set" or "definitely not in set".
//!
//! # Properties
//!
//! - **No false negatives**: If an item was added, `query()` always returns `true`
//! - **Possible false positives**: `query()` may return `true` for items never added
//! - **Fixed size**: `k` and `m` never change after construction
//! - **Monotonic**: bits only go from unset to set; there is no removal
//!
//! # Usage
//!
//! ```rust
//! use saltbloom::bloom::BloomFilter;
//! use saltbloom::bloom::false_positive_rate;
//! use saltbloom::bloom::optimal_k;
//! use saltbloom::bloom::optimal_m;
//!
//! // Plan a filter for 1000 items with a 1% false positive rate
//! let m = optimal_m(1000, 0.01).unwrap();
//! let k = optimal_k(m, 1000).unwrap();
//! assert!(false_positive_rate(k, m, 1000).unwrap() <= 0.01);
//!
//! let mut filter = BloomFilter::new(k, m as u32).unwrap();
//! filter.add("apple");
//! filter.add("banana");
//!
//! assert!(filter.query("apple"));
//! assert!(!filter.query("grape"));
//! ```
//!
//! The same plan is available in one step through
//! [`BloomFilterBuilder::with_accuracy`].
//!
//! # Salts
//!
//! Every hash function hashes its own salt together with the key. Fresh filters use the salts
//! `0..k`. [`BloomFilter::randomize_salts`] draws salts from a generator seeded by the caller and
//! [`BloomFilter::set_salts`] installs explicit ones. Neither clears the bits, so changing the
//! salts of a populated filter makes its answers meaningless.
//!
//! # Implementation Details
//!
//! - Keys and salts are hashed with XXH64 and merged by [`crate::hash::hash_combine`]
//! - Bits are packed most-significant-bit first into bytes
//! - Binary layout: `k: u32 | m: u32 | k * salt: u64 | ceil(m / 8) bytes`, little-endian
//!
//! # Concurrency
//!
//! The filter has no internal synchronization. Mutating methods take `&mut self`, read-only
//! ones take `&self`, so the borrow checker already enforces a single writer. Share across
//! threads behind a lock when writes and reads interleave.
//!
//! # References
//!
//! - Bloom, Burton H. (1970). "Space/time trade-offs in hash coding with allowable errors"

mod bit_array;
mod builder;
mod params;
mod serialization;
mod sketch;

pub use self::bit_array::BitArray;
pub use self::builder::BloomFilterBuilder;
pub use self::params::MAX_BITS_PER_ITEM;
pub use self::params::MIN_BITS_PER_ITEM;
pub use self::params::false_positive_rate;
pub use self::params::optimal_k;
pub use self::params::optimal_m;
pub use self::sketch::BloomFilter;
