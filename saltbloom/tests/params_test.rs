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

use googletest::assert_that;
use googletest::prelude::ge;
use googletest::prelude::le;
use googletest::prelude::near;
use saltbloom::bloom::MAX_BITS_PER_ITEM;
use saltbloom::bloom::MIN_BITS_PER_ITEM;
use saltbloom::bloom::false_positive_rate;
use saltbloom::bloom::optimal_k;
use saltbloom::bloom::optimal_m;
use saltbloom::error::ErrorKind;

#[test]
fn test_false_positive_rate_example() {
    assert_that!(false_positive_rate(3, 30, 1).unwrap(), near(0.00297, 1e-5));
}

#[test]
fn test_false_positive_rate_bounds() {
    for (k, m, n) in [(1, 2, 0), (3, 30, 1), (7, 10_000, 1000), (20, 100, 100)] {
        let rate = false_positive_rate(k, m, n).unwrap();
        assert_that!(rate, ge(0.0));
        assert_that!(rate, le(1.0));
    }
}

#[test]
fn test_false_positive_rate_rejects_tiny_m() {
    let err = false_positive_rate(3, 1, 10).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

#[test]
fn test_optimal_k_example() {
    assert_eq!(optimal_k(30, 2).unwrap(), 10);
}

#[test]
fn test_optimal_m_termination() {
    let m = optimal_m(2, 0.01).unwrap();
    assert_that!(m, ge(2 * MIN_BITS_PER_ITEM));
    assert_that!(m, le(2 * MAX_BITS_PER_ITEM));
    let k = optimal_k(m, 2).unwrap();
    assert_that!(false_positive_rate(k, m, 2).unwrap(), le(0.01));
}

#[test]
fn test_optimal_m_is_smallest_multiple() {
    let n = 500;
    let m = optimal_m(n, 0.001).unwrap();
    assert_eq!(m % n, 0);

    let previous = m - n;
    let k = optimal_k(previous, n).unwrap();
    assert_that!(false_positive_rate(k, previous, n).unwrap(), ge(0.001));
}

#[test]
fn test_optimal_m_unreachable_target() {
    let err = optimal_m(1_000_000, 1e-40).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_optimal_m_requires_items() {
    let err = optimal_m(0, 0.01).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}
