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

use crate::error::Error;

/// A fixed-length array of bits packed most-significant-bit first.
///
/// Bit `p` lives in byte `p / 8` at bit `7 - p % 8`. Bits only ever go from unset to set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitArray {
    /// Number of addressable bits (m)
    num_bits: u64,
    /// Count of bits set to 1
    num_bits_set: u64,
    /// Length = ceil(num_bits / 8)
    bytes: Box<[u8]>,
}

// Never empty: construction rejects zero bits.
#[allow(clippy::len_without_is_empty)]
impl BitArray {
    /// Creates an array of `num_bits` unset bits.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if
    /// `num_bits` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// # use saltbloom::bloom::BitArray;
    /// let bits = BitArray::new(30).unwrap();
    /// assert_eq!(bits.len(), 30);
    /// assert_eq!(bits.as_bytes().len(), 4);
    /// assert!(BitArray::new(0).is_err());
    /// ```
    pub fn new(num_bits: u32) -> Result<Self, Error> {
        if num_bits == 0 {
            return Err(Error::invalid_parameter("num_bits must be greater than 0"));
        }
        let num_bytes = num_bits.div_ceil(8) as usize;
        Ok(BitArray {
            num_bits: u64::from(num_bits),
            num_bits_set: 0,
            bytes: vec![0u8; num_bytes].into_boxed_slice(),
        })
    }

    /// Rebuilds an array from its byte image, rejecting bits set past `num_bits`.
    pub(crate) fn from_bytes(num_bits: u32, bytes: Vec<u8>) -> Result<Self, Error> {
        if num_bits == 0 {
            return Err(Error::deserial("num_bits must be greater than 0"));
        }
        let expected = num_bits.div_ceil(8) as usize;
        if bytes.len() != expected {
            return Err(Error::deserial(format!(
                "bit data length mismatch: expected {expected} bytes, got {}",
                bytes.len()
            )));
        }

        let tail_bits = num_bits % 8;
        if tail_bits != 0 {
            let padding_mask = (1u8 << (8 - tail_bits)) - 1;
            if bytes.last().is_some_and(|last| last & padding_mask != 0) {
                return Err(Error::deserial("bits set beyond capacity")
                    .with_context("num_bits", num_bits));
            }
        }

        let num_bits_set = bytes.iter().map(|b| u64::from(b.count_ones())).sum();
        Ok(BitArray {
            num_bits: u64::from(num_bits),
            num_bits_set,
            bytes: bytes.into_boxed_slice(),
        })
    }

    /// Returns the number of addressable bits.
    pub fn len(&self) -> u64 {
        self.num_bits
    }

    /// Returns the number of bits currently set.
    pub fn count_ones(&self) -> u64 {
        self.num_bits_set
    }

    /// Returns the packed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Sets the bit at `position`. Marking an already set bit has no effect.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::OutOfBounds`](crate::error::ErrorKind::OutOfBounds) if `position` is
    /// not smaller than [`len()`](Self::len).
    ///
    /// # Examples
    ///
    /// ```
    /// # use saltbloom::bloom::BitArray;
    /// let mut bits = BitArray::new(16).unwrap();
    /// bits.mark(9).unwrap();
    /// assert!(bits.check(9).unwrap());
    /// assert_eq!(bits.as_bytes(), &[0b0000_0000, 0b0100_0000]);
    /// assert!(bits.mark(16).is_err());
    /// ```
    pub fn mark(&mut self, position: u64) -> Result<(), Error> {
        self.check_bounds(position)?;
        self.set(position);
        Ok(())
    }

    /// Returns whether the bit at `position` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::OutOfBounds`](crate::error::ErrorKind::OutOfBounds) if `position` is
    /// not smaller than [`len()`](Self::len).
    pub fn check(&self, position: u64) -> Result<bool, Error> {
        self.check_bounds(position)?;
        Ok(self.get(position))
    }

    /// Sets a bit already known to be in range and updates the count if it wasn't set.
    pub(crate) fn set(&mut self, position: u64) {
        let (byte_index, mask) = locate(position);
        let byte = &mut self.bytes[byte_index];
        if *byte & mask == 0 {
            *byte |= mask;
            self.num_bits_set += 1;
        }
    }

    /// Reads a bit already known to be in range.
    pub(crate) fn get(&self, position: u64) -> bool {
        let (byte_index, mask) = locate(position);
        self.bytes[byte_index] & mask != 0
    }

    fn check_bounds(&self, position: u64) -> Result<(), Error> {
        if position < self.num_bits {
            Ok(())
        } else {
            Err(Error::out_of_bounds("bit position", position, self.num_bits))
        }
    }
}

#[inline]
fn locate(position: u64) -> (usize, u8) {
    let byte_index = (position >> 3) as usize; // position / 8
    let mask = 0x80u8 >> (position & 7); // MSB first
    (byte_index, mask)
}
