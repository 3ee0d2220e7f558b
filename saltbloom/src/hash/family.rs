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
use std::hash::Hasher;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use xxhash_rust::xxh64::Xxh64;
use xxhash_rust::xxh64::xxh64;

use super::DEFAULT_UPDATE_SEED;
use super::fmix64;
use super::hash_combine;
use crate::error::Error;

/// A family of `k` salted hash functions.
///
/// Hash function `i` hashes its salt and the key independently with XXH64, merges the two
/// digests with [`hash_combine`] and avalanches the result. All arithmetic stays in `u64`, so
/// the result is non-negative by construction and can be reduced modulo the filter capacity
/// directly.
///
/// The salts are the only per-function state. Their digests are cached alongside them, so
/// deriving all `k` positions of a key costs a single pass over the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashFamily {
    salts: Vec<u64>,
    salt_digests: Vec<u64>,
}

impl HashFamily {
    /// Creates a family of `num_hashes` functions with the default salts `0, 1, ..., k - 1`.
    ///
    /// Two families created with the same `num_hashes` always hash identically.
    ///
    /// # Examples
    ///
    /// ```
    /// # use saltbloom::hash::HashFamily;
    /// let family = HashFamily::new(3);
    /// assert_eq!(family.salts(), &[0, 1, 2]);
    /// ```
    pub fn new(num_hashes: u32) -> Self {
        Self::from_salts((0..u64::from(num_hashes)).collect())
    }

    fn from_salts(salts: Vec<u64>) -> Self {
        let salt_digests = salts.iter().map(|salt| salt_digest(*salt)).collect();
        HashFamily {
            salts,
            salt_digests,
        }
    }

    /// Returns the number of hash functions in the family.
    pub fn len(&self) -> usize {
        self.salts.len()
    }

    /// Returns whether the family has no hash functions.
    pub fn is_empty(&self) -> bool {
        self.salts.is_empty()
    }

    /// Returns the salts, one per hash function.
    pub fn salts(&self) -> &[u64] {
        &self.salts
    }

    /// Computes hash function `index` for `item`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::OutOfBounds`](crate::error::ErrorKind::OutOfBounds) if `index` is not
    /// smaller than the number of hash functions.
    ///
    /// # Examples
    ///
    /// ```
    /// # use saltbloom::hash::HashFamily;
    /// let family = HashFamily::new(2);
    /// let h0 = family.hash(0, "hello").unwrap();
    /// assert_eq!(h0, family.hash(0, "hello").unwrap());
    /// assert_ne!(h0, family.hash(1, "hello").unwrap());
    /// assert!(family.hash(2, "hello").is_err());
    /// ```
    pub fn hash<T: Hash + ?Sized>(&self, index: usize, item: &T) -> Result<u64, Error> {
        let salt = self.salt_digests.get(index).ok_or_else(|| {
            Error::out_of_bounds("hash index", index as u64, self.salt_digests.len() as u64)
        })?;
        Ok(salted_hash(*salt, key_digest(item)))
    }

    /// Yields the hash of every function in the family for a key digest, in index order.
    pub(crate) fn hashes(&self, key: u64) -> impl Iterator<Item = u64> + '_ {
        self.salt_digests
            .iter()
            .map(move |salt| salted_hash(*salt, key))
    }

    /// Replaces every salt with a value drawn from a generator seeded with `seed`.
    ///
    /// The generator is local to this call, so equal seeds give equal salts regardless of what
    /// else in the process consumes randomness.
    pub(crate) fn randomize(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let salts = (0..self.salts.len()).map(|_| rng.random::<u64>()).collect();
        *self = Self::from_salts(salts);
    }

    /// Replaces the salts with the first `len()` values of `salts`.
    ///
    /// Nothing is modified when `salts` is too short.
    pub(crate) fn replace(&mut self, salts: &[u64]) -> Result<(), Error> {
        let num_hashes = self.salts.len();
        if salts.len() < num_hashes {
            return Err(Error::length_mismatch(num_hashes, salts.len()));
        }
        *self = Self::from_salts(salts[..num_hashes].to_vec());
        Ok(())
    }
}

#[inline]
fn salted_hash(salt: u64, key: u64) -> u64 {
    fmix64(hash_combine(salt, key))
}

/// Hashes a key once; the result feeds every function of a family.
pub(crate) fn key_digest<T: Hash + ?Sized>(item: &T) -> u64 {
    let mut hasher = Xxh64::new(DEFAULT_UPDATE_SEED);
    item.hash(&mut hasher);
    hasher.finish()
}

fn salt_digest(salt: u64) -> u64 {
    xxh64(&salt.to_le_bytes(), DEFAULT_UPDATE_SEED)
}
