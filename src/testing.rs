//! Testing utilities for kvflow pipelines.
//!
//! Assertion helpers with detailed mismatch diagnostics, plus small fixture
//! builders for common test sequences.

use std::fmt::Debug;

/// Assert that two value sequences are equal in order and content.
///
/// # Panics
///
/// Panics with a detailed message if the sequences differ in length or
/// content.
pub fn assert_collections_equal<T: Debug + PartialEq>(actual: &[T], expected: &[T]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Collection length mismatch:\n  Expected length: {}\n  Actual length: {}\n  Expected: {expected:?}\n  Actual: {actual:?}",
        expected.len(),
        actual.len()
    );

    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert_eq!(
            a, e,
            "Collection mismatch at index {i}:\n  Expected: {e:?}\n  Actual: {a:?}\n  Full expected: {expected:?}\n  Full actual: {actual:?}"
        );
    }
}

/// Assert that two pair sequences are equal in order, keys and values both.
///
/// # Panics
///
/// Panics with a detailed message on the first differing pair.
pub fn assert_pairs_equal<K, V>(actual: &[(K, V)], expected: &[(K, V)])
where
    K: Debug + PartialEq,
    V: Debug + PartialEq,
{
    assert_eq!(
        actual.len(),
        expected.len(),
        "Pair sequence length mismatch:\n  Expected length: {}\n  Actual length: {}\n  Expected: {expected:?}\n  Actual: {actual:?}",
        expected.len(),
        actual.len()
    );

    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert!(
            a == e,
            "Pair mismatch at index {i}:\n  Expected: {e:?}\n  Actual: {a:?}\n  Full expected: {expected:?}\n  Full actual: {actual:?}"
        );
    }
}

/// Assert that every element satisfies `pred`.
///
/// # Panics
///
/// Panics naming the first offending element.
pub fn assert_all<T: Debug>(items: &[T], pred: impl Fn(&T) -> bool) {
    for (i, item) in items.iter().enumerate() {
        assert!(
            pred(item),
            "Predicate failed at index {i}:\n  Element: {item:?}\n  Full collection: {items:?}"
        );
    }
}

/// Assert that at least one element satisfies `pred`.
///
/// # Panics
///
/// Panics if no element matches.
pub fn assert_any<T: Debug>(items: &[T], pred: impl Fn(&T) -> bool) {
    assert!(
        items.iter().any(|item| pred(item)),
        "No element satisfied the predicate:\n  Collection: {items:?}"
    );
}

/// Pairs `(0, 1), (1, 2), …, (n-1, n)` — positional keys, one-based values.
pub fn number_pairs(n: usize) -> Vec<(usize, i64)> {
    (0..n).map(|i| (i, i as i64 + 1)).collect()
}

/// String-keyed fixture pairs in insertion order.
pub fn word_pairs() -> Vec<(String, i64)> {
    vec![
        ("a".to_string(), 1),
        ("b".to_string(), 2),
        ("c".to_string(), 3),
    ]
}
