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

use std::hash::Hash;

use super::BitArray;
use crate::error::Error;
use crate::hash::HashFamily;
use crate::hash::key_digest;

/// A Bloom filter for probabilistic set membership testing.
///
/// Provides fast membership queries with:
/// - No false negatives (added items always return `true`)
/// - Tunable false positive rate
/// - Fixed `k` and `m` for the life of the filter
///
/// Each of the `k` hash functions carries its own salt. Salts start at `0..k`, so two fresh
/// filters with equal parameters set identical bits for identical keys.
#[derive(Debug, Clone, PartialEq)]
pub struct BloomFilter {
    /// Number of hash functions (k)
    pub(super) num_hashes: u32,
    /// Salted hash functions, exactly `num_hashes` of them
    pub(super) hashes: HashFamily,
    /// Bit array of `capacity` bits (m)
    pub(super) bits: BitArray,
}

impl BloomFilter {
    /// Creates an empty filter with `k` hash functions over `m` bits.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if `k`
    /// or `m` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// # use saltbloom::bloom::BloomFilter;
    /// let filter = BloomFilter::new(3, 30).unwrap();
    /// assert_eq!(filter.num_hashes(), 3);
    /// assert_eq!(filter.capacity(), 30);
    /// assert_eq!(filter.salts(), &[0, 1, 2]);
    /// assert!(BloomFilter::new(0, 30).is_err());
    /// ```
    pub fn new(k: u32, m: u32) -> Result<Self, Error> {
        if k == 0 {
            return Err(Error::invalid_parameter("k must be greater than 0"));
        }
        if m == 0 {
            return Err(Error::invalid_parameter("m must be greater than 0"));
        }

        let bits = BitArray::new(m)?;
        tracing::debug!(k, m, "constructing bloom filter");
        Ok(BloomFilter {
            num_hashes: k,
            hashes: HashFamily::new(k),
            bits,
        })
    }

    /// Adds an item to the filter.
    ///
    /// After this call, `query(item)` returns `true` for as long as the salts are unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use saltbloom::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(3, 30).unwrap();
    /// filter.add("hello");
    /// filter.add(&42_u64);
    ///
    /// assert!(filter.query("hello"));
    /// assert!(filter.query(&42_u64));
    /// ```
    pub fn add<T: Hash + ?Sized>(&mut self, item: &T) {
        let capacity = self.bits.len();
        for hash in self.hashes.hashes(key_digest(item)) {
            self.bits.set(hash % capacity);
        }
    }

    /// Tests whether an item is possibly in the set, using all `k` hash functions.
    ///
    /// Returns:
    /// - `true`: Item was **possibly** added (or false positive)
    /// - `false`: Item was **definitely not** added
    ///
    /// # Examples
    ///
    /// ```
    /// # use saltbloom::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(7, 1024).unwrap();
    /// filter.add("apple");
    ///
    /// assert!(filter.query("apple"));
    /// assert!(!filter.query("grape"));
    /// ```
    pub fn query<T: Hash + ?Sized>(&self, item: &T) -> bool {
        self.query_hashes(item, self.hashes.len())
    }

    /// Tests whether an item is possibly in the set, skipping the last `skip` hash functions.
    ///
    /// Checking fewer bits can only turn a `false` into a `true`, so an added item is still
    /// always reported. `skip == k` checks nothing and reports every item.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if
    /// `skip` is greater than `k`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use saltbloom::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(3, 30).unwrap();
    /// filter.add("hello");
    ///
    /// assert!(filter.query_with_skip("hello", 1).unwrap());
    /// assert!(filter.query_with_skip("hello", 4).is_err());
    /// ```
    pub fn query_with_skip<T: Hash + ?Sized>(&self, item: &T, skip: u32) -> Result<bool, Error> {
        if skip > self.num_hashes {
            return Err(Error::invalid_parameter("skip exceeds number of hashes")
                .with_context("skip", skip)
                .with_context("k", self.num_hashes));
        }
        Ok(self.query_hashes(item, (self.num_hashes - skip) as usize))
    }

    /// Tests and adds an item in a single operation.
    ///
    /// Returns whether the item was possibly already in the set before it was added.
    ///
    /// # Examples
    ///
    /// ```
    /// # use saltbloom::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(7, 1024).unwrap();
    ///
    /// assert!(!filter.contains_and_add("apple"));
    /// assert!(filter.contains_and_add("apple"));
    /// ```
    pub fn contains_and_add<T: Hash + ?Sized>(&mut self, item: &T) -> bool {
        let capacity = self.bits.len();
        let mut was_present = true;
        for hash in self.hashes.hashes(key_digest(item)) {
            let position = hash % capacity;
            was_present &= self.bits.get(position);
            self.bits.set(position);
        }
        was_present
    }

    /// Replaces every salt with a value drawn from a generator seeded with `seed`.
    ///
    /// Equal seeds produce equal salts on any filter with the same `k`. Bits already set are
    /// kept, so filters that have been added to should be rebuilt rather than re-salted.
    ///
    /// # Examples
    ///
    /// ```
    /// # use saltbloom::bloom::BloomFilter;
    /// let mut a = BloomFilter::new(3, 30).unwrap();
    /// let mut b = BloomFilter::new(3, 30).unwrap();
    /// a.randomize_salts(7);
    /// b.randomize_salts(7);
    /// assert_eq!(a.salts(), b.salts());
    /// ```
    pub fn randomize_salts(&mut self, seed: u64) {
        self.warn_if_populated();
        self.hashes.randomize(seed);
        tracing::debug!(seed, k = self.num_hashes, "randomized salts");
    }

    /// Replaces the salts with the first `k` values of `salts`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::LengthMismatch`](crate::error::ErrorKind::LengthMismatch) if fewer
    /// than `k` salts are supplied. The filter is left unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// # use saltbloom::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(2, 30).unwrap();
    /// filter.set_salts(&[11, 12, 13]).unwrap();
    /// assert_eq!(filter.salts(), &[11, 12]);
    /// assert!(filter.set_salts(&[1]).is_err());
    /// ```
    pub fn set_salts(&mut self, salts: &[u64]) -> Result<(), Error> {
        self.hashes.replace(salts)?;
        self.warn_if_populated();
        tracing::debug!(k = self.num_hashes, "replaced salts");
        Ok(())
    }

    /// Returns whether no bit has been set yet.
    pub fn is_empty(&self) -> bool {
        self.bits.count_ones() == 0
    }

    /// Returns the number of bits set to 1.
    pub fn bits_used(&self) -> u64 {
        self.bits.count_ones()
    }

    /// Returns the total number of bits in the filter (m).
    pub fn capacity(&self) -> u32 {
        // m is fixed at construction from a u32
        self.bits.len() as u32
    }

    /// Returns the number of hash functions used (k).
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    /// Returns the salts, one per hash function.
    pub fn salts(&self) -> &[u64] {
        self.hashes.salts()
    }

    /// Returns the hash functions.
    pub fn hash_family(&self) -> &HashFamily {
        &self.hashes
    }

    /// Returns the underlying bit array.
    pub fn bit_array(&self) -> &BitArray {
        &self.bits
    }

    /// Returns the packed bits, most significant bit first.
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_bytes()
    }

    /// Returns the fraction of bits set.
    pub fn load_factor(&self) -> f64 {
        self.bits.count_ones() as f64 / self.bits.len() as f64
    }

    /// Estimates the current false positive probability as `load_factor^k`.
    ///
    /// This assumes uniform bit distribution. Use
    /// [`false_positive_rate`](super::false_positive_rate) to plan a filter instead.
    pub fn estimated_fpp(&self) -> f64 {
        self.load_factor().powf(f64::from(self.num_hashes))
    }

    fn query_hashes<T: Hash + ?Sized>(&self, item: &T, count: usize) -> bool {
        // checking no bits admits every item, even on an empty filter
        if count > 0 && self.is_empty() {
            return false;
        }

        let capacity = self.bits.len();
        self.hashes
            .hashes(key_digest(item))
            .take(count)
            .all(|hash| self.bits.get(hash % capacity))
    }

    fn warn_if_populated(&self) {
        if !self.is_empty() {
            tracing::warn!(
                bits_used = self.bits.count_ones(),
                "salts replaced on a populated filter; existing bits no longer match new hashes"
            );
        }
    }
}
