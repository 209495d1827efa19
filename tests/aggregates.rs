use kvflow::testing::*;
use kvflow::{from_pairs, from_values, KvError};

#[test]
fn fold_matches_folding_the_materialized_values() {
    let folded = from_values(vec![1, 2, 3, 4]).fold(10, |acc, (_k, v)| acc + v);
    let expected = from_values(vec![1, 2, 3, 4])
        .to_vec()
        .into_iter()
        .fold(10, |acc, v| acc + v);
    assert_eq!(folded, expected);
}

#[test]
fn for_each_visits_every_value() {
    let mut seen = Vec::new();
    from_values(vec![1, 2, 3]).for_each(|v| seen.push(v));
    assert_collections_equal(&seen, &[1, 2, 3]);
}

#[test]
fn any_and_all_short_circuit_with_empty_defaults() {
    assert!(from_values(vec![1, 2, 3]).any(|v| *v == 2));
    assert!(!from_values(vec![1, 3]).any(|v| *v == 2));
    assert!(from_values(vec![2, 4]).all(|v| v % 2 == 0));
    assert!(!from_values(vec![2, 5]).all(|v| v % 2 == 0));

    assert!(!from_values(Vec::<i32>::new()).any(|_| true));
    assert!(from_values(Vec::<i32>::new()).all(|_| false));
}

#[test]
fn find_returns_none_as_the_not_found_sentinel() {
    assert_eq!(from_values(vec![1, 8, 3]).find(|v| *v > 5), Some(8));
    assert_eq!(from_values(vec![1, 3]).find(|v| *v > 5), None);
}

#[test]
fn first_fails_on_empty_with_a_typed_error() {
    let err = from_values(Vec::<i32>::new()).first().unwrap_err();
    assert_eq!(err.downcast_ref::<KvError>(), Some(&KvError::EmptyCollection));
}

#[test]
fn first_and_first_or() {
    assert_eq!(from_values(vec![7, 8]).first().unwrap(), 7);
    assert_eq!(from_values(Vec::<i32>::new()).first_or(9), 9);
    assert_eq!(from_values(vec![1]).first_or(9), 1);
}

#[test]
fn sum_over_keyed_values() {
    let total = from_pairs(vec![("a".to_string(), 1), ("b".to_string(), 2)]).sum();
    assert_eq!(total, 3.0);
}

#[test]
fn sum_and_avg_of_empty_sequences() {
    assert_eq!(from_values(Vec::<i32>::new()).sum(), 0.0);
    assert_eq!(from_values(Vec::<f64>::new()).avg(), 0.0);
}

#[test]
fn sum_by_accumulates_the_freshly_mapped_value() {
    let total = from_values(vec![1, 2, 3]).sum_by(|v| f64::from(v * 10));
    assert_eq!(total, 60.0);
}

#[test]
fn avg_is_the_arithmetic_mean() {
    assert_eq!(from_values(vec![1, 2, 3, 4]).avg(), 2.5);
}

#[test]
fn avg_by_falls_back_to_the_default_when_empty() {
    let got = from_values(Vec::<i32>::new()).avg_by(f64::from, -1.0);
    assert_eq!(got, -1.0);
}

#[test]
fn max_and_min_under_natural_order() {
    assert_eq!(from_values(vec![5, 3, 8, 1]).max(), Some(8));
    assert_eq!(from_values(vec![5, 3, 8, 1]).min(), Some(1));
    assert_eq!(from_values(Vec::<i32>::new()).max(), None);
    assert_eq!(from_values(Vec::<i32>::new()).min(), None);
}

#[test]
fn min_by_skips_unmapped_values_but_max_by_does_not() {
    let data = || from_values(vec![Some(5), None, Some(3)]);

    // min: the None mapping never touches the accumulator
    assert_eq!(data().min_by(|v| *v), Some(3));
    // max: None participates as the bottom element of the order
    assert_eq!(data().max_by(|v| *v), Some(5));
    // all-None input: min finds nothing, max is saturated at bottom
    assert_eq!(from_values(vec![None::<i32>]).min_by(|v| *v), None);
}

#[test]
fn float_extrema_use_a_total_order() {
    let vals = vec![2.5f64, -1.0, 7.25];
    assert_eq!(from_values(vals.clone()).max_f64(|v| *v), Some(7.25));
    assert_eq!(from_values(vals).min_f64(|v| *v), Some(-1.0));
    assert_eq!(from_values(Vec::<f64>::new()).max_f64(|v| *v), None);
}

#[test]
fn to_map_is_last_write_wins() {
    let m = from_pairs(vec![("a", 1), ("b", 2), ("a", 3)]).to_map();
    assert_eq!(m.get("a"), Some(&3));
    assert_eq!(m.get("b"), Some(&2));
    assert_eq!(m.len(), 2);
}

#[test]
fn filter_count_never_exceeds_source_count() {
    let kept = from_values(vec![1, 2, 3, 4]).filter(|v| v % 2 == 0);
    let kept_values = kept.to_vec();
    assert!(kept_values.len() <= 4);
    assert_all(&kept_values, |v| v % 2 == 0);
}
