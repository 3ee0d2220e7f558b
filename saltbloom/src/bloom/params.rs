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

//! Analytic parameter planning, independent of any filter instance.

use std::f64::consts::LN_2;

use crate::error::Error;

/// Smallest bits-per-item multiplier tried by [`optimal_m`].
pub const MIN_BITS_PER_ITEM: u64 = 2;
/// Largest bits-per-item multiplier tried by [`optimal_m`].
pub const MAX_BITS_PER_ITEM: u64 = 128;

/// Theoretical false positive probability of a filter with `k` hashes and `m` bits holding `n`
/// items.
///
/// Formula: `(1 - e^(-k * (n + 0.5) / (m - 1)))^k`
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if
/// `m <= 1`.
///
/// # Examples
///
/// ```
/// # use saltbloom::bloom::false_positive_rate;
/// let rate = false_positive_rate(3, 30, 1).unwrap();
/// assert!((rate - 0.00297).abs() < 1e-5);
/// ```
pub fn false_positive_rate(k: u32, m: u64, n: u64) -> Result<f64, Error> {
    if m <= 1 {
        return Err(Error::invalid_parameter("m must be greater than 1").with_context("m", m));
    }
    let k_f = f64::from(k);
    let exponent = -k_f * (n as f64 + 0.5) / (m - 1) as f64;
    Ok((1.0 - exponent.exp()).powf(k_f))
}

/// Number of hash functions minimising the false positive rate for `m` bits and `n` items.
///
/// Formula: `round(m / n * ln(2))`
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if
/// `n == 0`, or if the result does not fit in a `u32`.
///
/// # Examples
///
/// ```
/// # use saltbloom::bloom::optimal_k;
/// assert_eq!(optimal_k(30, 2).unwrap(), 10);
/// ```
pub fn optimal_k(m: u64, n: u64) -> Result<u32, Error> {
    if n == 0 {
        return Err(Error::invalid_parameter("n must be greater than 0"));
    }
    let k = (m as f64 / n as f64 * LN_2).round();
    if k > f64::from(u32::MAX) {
        return Err(Error::invalid_parameter("optimal k does not fit in u32")
            .with_context("m", m)
            .with_context("n", n));
    }
    Ok(k as u32)
}

/// Smallest capacity `m = n * i` with `i` in `[2, 128]` whose optimal configuration reaches
/// `target_error`.
///
/// # Errors
///
/// - [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if `n == 0`,
///   `target_error` is not a positive number, or `n * 128` overflows.
/// - [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound) if no multiplier in the range
///   meets the target.
///
/// # Examples
///
/// ```
/// # use saltbloom::bloom::false_positive_rate;
/// # use saltbloom::bloom::optimal_k;
/// # use saltbloom::bloom::optimal_m;
/// let m = optimal_m(2, 0.01).unwrap();
/// let k = optimal_k(m, 2).unwrap();
/// assert!(false_positive_rate(k, m, 2).unwrap() <= 0.01);
/// ```
pub fn optimal_m(n: u64, target_error: f64) -> Result<u64, Error> {
    if n == 0 {
        return Err(Error::invalid_parameter("n must be greater than 0"));
    }
    if target_error.is_nan() || target_error <= 0.0 {
        return Err(Error::invalid_parameter("target_error must be a positive number")
            .with_context("target_error", target_error));
    }
    if n.checked_mul(MAX_BITS_PER_ITEM).is_none() {
        return Err(Error::invalid_parameter("n is too large to plan for").with_context("n", n));
    }

    for bits_per_item in MIN_BITS_PER_ITEM..=MAX_BITS_PER_ITEM {
        let m = n * bits_per_item;
        let k = optimal_k(m, n)?;
        let error = false_positive_rate(k, m, n)?;
        if error <= target_error {
            tracing::debug!(n, m, k, error, target_error, "selected filter capacity");
            return Ok(m);
        }
    }

    tracing::warn!(n, target_error, "no capacity in search range meets target error");
    Err(
        Error::not_found("no capacity in the search range meets the target error")
            .with_context("n", n)
            .with_context("target_error", target_error)
            .with_context("max_bits_per_item", MAX_BITS_PER_ITEM),
    )
}

#[cfg(test)]
mod tests {
    use googletest::assert_that;
    use googletest::prelude::near;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_false_positive_rate_example() {
        assert_that!(false_positive_rate(3, 30, 1).unwrap(), near(0.00297, 1e-5));
    }

    #[test]
    fn test_false_positive_rate_requires_m_above_one() {
        for m in [0, 1] {
            let err = false_positive_rate(3, m, 1).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        }
    }

    #[test]
    fn test_false_positive_rate_grows_with_items() {
        let few = false_positive_rate(7, 1000, 10).unwrap();
        let many = false_positive_rate(7, 1000, 500).unwrap();
        assert!(few < many);
    }

    #[test]
    fn test_optimal_k_example() {
        assert_eq!(optimal_k(30, 2).unwrap(), 10);
        assert_eq!(optimal_k(10_000, 1000).unwrap(), 7);
    }

    #[test]
    fn test_optimal_k_requires_items() {
        assert_eq!(
            optimal_k(30, 0).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
    }

    #[test]
    fn test_optimal_m_small() {
        // i = 12 gives ~0.0130, i = 13 is the first to drop below 1%
        assert_eq!(optimal_m(2, 0.01).unwrap(), 26);
    }

    #[test]
    fn test_optimal_m_unreachable() {
        let err = optimal_m(1_000_000, 1e-40).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_optimal_m_rejects_bad_target() {
        for target in [0.0, -0.5, f64::NAN] {
            let err = optimal_m(10, target).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        }
    }

    #[test]
    fn test_optimal_m_rejects_overflow() {
        let err = optimal_m(u64::MAX / 2, 0.01).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }
}
