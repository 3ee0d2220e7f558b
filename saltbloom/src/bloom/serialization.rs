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

//! Binary layout of a [`BloomFilter`].
//!
//! All integers are little-endian and fields follow each other without padding:
//!
//! ```text
//! k: u32 | m: u32 | salts: k * u64 | bits: ceil(m / 8) * u8
//! ```

use std::io::Cursor;
use std::io::Read;
use std::mem::size_of;

use byteorder::LE;
use byteorder::ReadBytesExt;

use super::BitArray;
use super::BloomFilter;
use crate::error::Error;
use crate::hash::HashFamily;

const HEADER_SIZE_BYTES: usize = 2 * size_of::<u32>();
const SALT_SIZE_BYTES: usize = size_of::<u64>();

impl BloomFilter {
    /// Serializes the filter to a byte vector.
    ///
    /// # Examples
    ///
    /// ```
    /// # use saltbloom::bloom::BloomFilter;
    /// let mut filter = BloomFilter::new(3, 30).unwrap();
    /// filter.add("test");
    ///
    /// let bytes = filter.serialize();
    /// assert_eq!(bytes.len(), 4 + 4 + 3 * 8 + 4);
    /// let restored = BloomFilter::deserialize(&bytes).unwrap();
    /// assert!(restored.query("test"));
    /// ```
    pub fn serialize(&self) -> Vec<u8> {
        let bit_bytes = self.bits.as_bytes();
        let capacity =
            HEADER_SIZE_BYTES + self.hashes.len() * SALT_SIZE_BYTES + bit_bytes.len();
        let mut bytes = Vec::with_capacity(capacity);

        bytes.extend_from_slice(&self.num_hashes.to_le_bytes());
        bytes.extend_from_slice(&self.capacity().to_le_bytes());
        for salt in self.hashes.salts() {
            bytes.extend_from_slice(&salt.to_le_bytes());
        }
        bytes.extend_from_slice(bit_bytes);
        bytes
    }

    /// Deserializes a filter from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidData`](crate::error::ErrorKind::InvalidData) if:
    /// - The data is truncated or has trailing bytes
    /// - `k` or `m` is zero
    /// - Bits past `m` are set in the final byte
    ///
    /// # Examples
    ///
    /// ```
    /// # use saltbloom::bloom::BloomFilter;
    /// let original = BloomFilter::new(3, 30).unwrap();
    /// let bytes = original.serialize();
    ///
    /// let restored = BloomFilter::deserialize(&bytes).unwrap();
    /// assert_eq!(original, restored);
    /// ```
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        fn make_error(tag: &'static str) -> impl FnOnce(std::io::Error) -> Error {
            move |_| Error::insufficient_data(tag)
        }

        let mut cursor = Cursor::new(bytes);
        let num_hashes = cursor.read_u32::<LE>().map_err(make_error("k"))?;
        let num_bits = cursor.read_u32::<LE>().map_err(make_error("m"))?;

        if num_hashes == 0 {
            return Err(Error::deserial("k must be greater than 0"));
        }
        if num_bits == 0 {
            return Err(Error::deserial("m must be greater than 0"));
        }

        // Check the total up front so a corrupt k cannot drive a huge allocation.
        let num_bit_bytes = u64::from(num_bits).div_ceil(8);
        let expected = HEADER_SIZE_BYTES as u64
            + u64::from(num_hashes) * SALT_SIZE_BYTES as u64
            + num_bit_bytes;
        if bytes.len() as u64 != expected {
            return Err(Error::deserial("serialized length mismatch")
                .with_context("expected", expected)
                .with_context("actual", bytes.len()));
        }

        let mut salts = Vec::with_capacity(num_hashes as usize);
        for _ in 0..num_hashes {
            salts.push(cursor.read_u64::<LE>().map_err(make_error("salts"))?);
        }

        let mut bit_bytes = vec![0u8; num_bit_bytes as usize];
        cursor
            .read_exact(&mut bit_bytes)
            .map_err(make_error("bits"))?;

        let mut hashes = HashFamily::new(num_hashes);
        hashes.replace(&salts)?;
        let bits = BitArray::from_bytes(num_bits, bit_bytes)?;

        Ok(BloomFilter {
            num_hashes,
            hashes,
            bits,
        })
    }
}
