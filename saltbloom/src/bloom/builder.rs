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

use super::BloomFilter;
use super::optimal_k;
use super::optimal_m;
use crate::error::Error;

/// How the salts of a built filter are chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SaltSource {
    /// `0, 1, ..., k - 1`
    Default,
    /// Drawn from a generator seeded with the given value
    Seeded(u64),
    /// Explicit values, of which the first `k` are used
    Explicit(Vec<u64>),
}

/// Builder for creating [`BloomFilter`] instances.
///
/// Provides two construction modes:
/// - [`with_accuracy()`](Self::with_accuracy): Specify expected items and target error rate
/// - [`with_size()`](Self::with_size): Specify hash count and bit capacity directly
#[derive(Debug, Clone)]
pub struct BloomFilterBuilder {
    num_hashes: u32,
    num_bits: u32,
    salts: SaltSource,
}

impl BloomFilterBuilder {
    /// Creates a builder with the capacity and hash count planned for a target error rate.
    ///
    /// The capacity comes from [`optimal_m`] and the hash count from [`optimal_k`].
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if
    ///   `max_items` is 0, `target_error` is not positive, or the planned capacity does not fit in
    ///   a `u32`.
    /// - [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound) if the target is unreachable.
    ///
    /// # Examples
    ///
    /// ```
    /// # use saltbloom::bloom::BloomFilterBuilder;
    /// let filter = BloomFilterBuilder::with_accuracy(1000, 0.01)
    ///     .unwrap()
    ///     .salt_seed(42)
    ///     .build()
    ///     .unwrap();
    /// assert!(filter.capacity() >= 9000);
    /// ```
    pub fn with_accuracy(max_items: u64, target_error: f64) -> Result<Self, Error> {
        let num_bits = optimal_m(max_items, target_error)?;
        let num_hashes = optimal_k(num_bits, max_items)?;
        let num_bits = u32::try_from(num_bits).map_err(|_| {
            Error::invalid_parameter("planned capacity does not fit in u32")
                .with_context("m", num_bits)
        })?;

        Ok(BloomFilterBuilder {
            num_hashes,
            num_bits,
            salts: SaltSource::Default,
        })
    }

    /// Creates a builder with `k` hash functions over `m` bits.
    ///
    /// Parameters are validated by [`build()`](Self::build).
    ///
    /// # Examples
    ///
    /// ```
    /// # use saltbloom::bloom::BloomFilterBuilder;
    /// let filter = BloomFilterBuilder::with_size(3, 30).build().unwrap();
    /// assert_eq!(filter.num_hashes(), 3);
    /// assert_eq!(filter.capacity(), 30);
    /// ```
    pub fn with_size(k: u32, m: u32) -> Self {
        BloomFilterBuilder {
            num_hashes: k,
            num_bits: m,
            salts: SaltSource::Default,
        }
    }

    /// Randomizes the salts of the built filter from `seed`.
    ///
    /// Replaces any salts set with [`salts()`](Self::salts).
    pub fn salt_seed(mut self, seed: u64) -> Self {
        self.salts = SaltSource::Seeded(seed);
        self
    }

    /// Uses the first `k` of `salts` for the built filter.
    ///
    /// Replaces any seed set with [`salt_seed()`](Self::salt_seed).
    pub fn salts(mut self, salts: Vec<u64>) -> Self {
        self.salts = SaltSource::Explicit(salts);
        self
    }

    /// Returns the number of hash functions the filter will use.
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    /// Returns the number of bits the filter will have.
    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    /// Builds the Bloom filter.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if `k` or `m`
    ///   is zero.
    /// - [`ErrorKind::LengthMismatch`](crate::error::ErrorKind::LengthMismatch) if fewer than `k`
    ///   explicit salts were given.
    pub fn build(self) -> Result<BloomFilter, Error> {
        let mut filter = BloomFilter::new(self.num_hashes, self.num_bits)?;
        match self.salts {
            SaltSource::Default => {}
            SaltSource::Seeded(seed) => filter.randomize_salts(seed),
            SaltSource::Explicit(salts) => filter.set_salts(&salts)?,
        }
        Ok(filter)
    }
}
