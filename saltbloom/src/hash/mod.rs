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

//! Salted hashing used to derive the `k` bit positions of a key.

mod family;

pub use self::family::HashFamily;
pub(crate) use self::family::key_digest;

/// The seed 9001 used when hashing keys and salts is a prime number with no special meaning.
///
/// Two filters only agree on bit positions when they hash with the same seed and the same salts,
/// so this value must not change within the lifetime of any filter.
pub(crate) const DEFAULT_UPDATE_SEED: u64 = 9001;

/// Merges two 64-bit hashes into one.
///
/// The merge is order-sensitive: `hash_combine(a, b)` and `hash_combine(b, a)` generally differ,
/// which keeps the salt and key roles distinct.
#[inline]
pub fn hash_combine(seed: u64, value: u64) -> u64 {
    seed ^ value
        .wrapping_add(0x9e37_79b9_7f4a_7c15)
        .wrapping_add(seed << 6)
        .wrapping_add(seed >> 2)
}

/// Finalization mix: force all bits of a hash block to avalanche.
#[inline]
pub(crate) fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51afd7ed558ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ceb9fe1a85ec53);
    k ^ (k >> 33)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_combine_is_order_sensitive() {
        let a = 0x0123_4567_89ab_cdef;
        let b = 0xfedc_ba98_7654_3210;
        assert_ne!(hash_combine(a, b), hash_combine(b, a));
    }

    #[test]
    fn test_hash_combine_is_deterministic() {
        assert_eq!(hash_combine(7, 11), hash_combine(7, 11));
        assert_ne!(hash_combine(7, 11), hash_combine(7, 12));
    }

    #[test]
    fn test_fmix64_is_a_bijection_on_samples() {
        let mut mixed: Vec<u64> = (0..1024u64).map(|i| fmix64(i << 20)).collect();
        mixed.sort_unstable();
        mixed.dedup();
        assert_eq!(mixed.len(), 1024);
        assert_eq!(fmix64(0), 0);
    }
}
