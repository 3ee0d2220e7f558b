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

use saltbloom::bloom::BloomFilter;
use saltbloom::bloom::BloomFilterBuilder;
use saltbloom::error::ErrorKind;

#[test]
fn test_end_to_end_hello() {
    let mut first = BloomFilter::new(3, 30).unwrap();
    first.add("hello");
    assert!(first.query("hello"));

    let mut second = BloomFilter::new(3, 30).unwrap();
    second.add("hello");
    assert_eq!(second.as_bytes(), first.as_bytes());
    assert_eq!(second, first);
}

#[test]
fn test_no_false_negatives_default_salts() {
    let mut filter = BloomFilter::new(5, 2048).unwrap();
    for i in 0..300u64 {
        filter.add(&i);
    }
    for i in 0..300u64 {
        assert!(filter.query(&i), "false negative for {i}");
    }
}

#[test]
fn test_no_false_negatives_across_configurations() {
    for (k, m) in [(1, 1), (1, 7), (3, 30), (7, 64), (13, 1001)] {
        for seed in [None, Some(0), Some(12345)] {
            let mut filter = BloomFilter::new(k, m).unwrap();
            if let Some(seed) = seed {
                filter.randomize_salts(seed);
            }
            let keys: Vec<String> = (0..50).map(|i| format!("key-{i}")).collect();
            for key in &keys {
                filter.add(key.as_str());
            }
            for key in &keys {
                assert!(filter.query(key.as_str()), "k={k} m={m} seed={seed:?}");
            }
        }
    }
}

#[test]
fn test_no_false_negatives_explicit_salts() {
    let mut filter = BloomFilter::new(4, 512).unwrap();
    filter.set_salts(&[u64::MAX, 0, 1 << 63, 42]).unwrap();
    for word in ["alpha", "beta", "gamma", "delta"] {
        filter.add(word);
    }
    for word in ["alpha", "beta", "gamma", "delta"] {
        assert!(filter.query(word));
    }
}

#[test]
fn test_empty_filter_reports_nothing() {
    let filter = BloomFilter::new(3, 30).unwrap();
    for i in 0..1000u64 {
        assert!(!filter.query(&i));
    }
    assert!(!filter.query("hello"));
}

#[test]
fn test_determinism_with_shared_salts() {
    let salts = [17, 29, 31, 37];
    let mut a = BloomFilter::new(4, 256).unwrap();
    let mut b = BloomFilter::new(4, 256).unwrap();
    a.set_salts(&salts).unwrap();
    b.set_salts(&salts).unwrap();

    for i in 0..40u32 {
        a.add(&i);
        b.add(&i);
    }
    assert_eq!(a.as_bytes(), b.as_bytes());
    for i in 0..200u32 {
        assert_eq!(a.query(&i), b.query(&i));
    }
}

#[test]
fn test_randomized_salts_differ_from_default() {
    let mut seeded = BloomFilter::new(3, 30).unwrap();
    seeded.randomize_salts(7);
    assert_ne!(seeded.salts(), &[0, 1, 2]);
    assert_eq!(seeded.salts().len(), 3);

    let mut again = BloomFilter::new(3, 30).unwrap();
    again.randomize_salts(7);
    assert_eq!(seeded.salts(), again.salts());
}

#[test]
fn test_set_salts_length_enforcement() {
    let mut filter = BloomFilter::new(3, 30).unwrap();
    let err = filter.set_salts(&[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LengthMismatch);
    let err = filter.set_salts(&[1, 2]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LengthMismatch);

    filter.set_salts(&[4, 5, 6, 7, 8]).unwrap();
    assert_eq!(filter.salts(), &[4, 5, 6]);
}

#[test]
fn test_false_positive_rate_is_reasonable() {
    let mut filter = BloomFilterBuilder::with_accuracy(1000, 0.01)
        .unwrap()
        .build()
        .unwrap();
    for i in 0..1000u64 {
        filter.add(&i);
    }

    let false_positives = (1_000_000..1_010_000u64)
        .filter(|i| filter.query(i))
        .count();
    // planned for 1%, allow generous slack
    assert!(false_positives < 300, "false positives: {false_positives}");
}

#[test]
fn test_skip_weakens_but_never_loses_items() {
    let mut filter = BloomFilter::new(6, 4096).unwrap();
    for i in 0..100u64 {
        filter.add(&i);
    }

    let mut previous = 0;
    for skip in 0..=6 {
        for i in 0..100u64 {
            assert!(filter.query_with_skip(&i, skip).unwrap());
        }
        let hits = (10_000..12_000u64)
            .filter(|i| filter.query_with_skip(i, skip).unwrap())
            .count();
        assert!(hits >= previous);
        previous = hits;
    }
    assert_eq!(previous, 2_000);
}

#[test]
fn test_skip_all_hashes_admits_everything_even_when_empty() {
    let filter = BloomFilter::new(3, 30).unwrap();
    for key in ["x", "hello", "never added"] {
        assert!(filter.query_with_skip(key, 3).unwrap());
        assert!(!filter.query_with_skip(key, 0).unwrap());
    }
}

#[test]
fn test_bit_array_access() {
    let mut filter = BloomFilter::new(2, 16).unwrap();
    filter.add("x");
    let bits = filter.bit_array();
    assert_eq!(bits.len(), 16);
    let set = (0..16).filter(|p| bits.check(*p).unwrap()).count() as u64;
    assert_eq!(set, filter.bits_used());
    assert_eq!(bits.check(16).unwrap_err().kind(), ErrorKind::OutOfBounds);
}
