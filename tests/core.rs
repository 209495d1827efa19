use kvflow::testing::*;
use kvflow::{from_pairs, from_values, IterCursor, LazyPipeline};
use std::collections::HashMap;

#[test]
fn map_keeps_keys_and_transforms_values() {
    let out: Vec<(usize, i32)> = from_values(vec![3, 1, 2]).map(|x| x * 2).collect();
    assert_pairs_equal(&out, &[(0, 6), (1, 2), (2, 4)]);
}

#[test]
fn map_filter_flat_map_chain() {
    let lines = from_values(vec![
        "the quick brown fox".to_string(),
        "jumps over".to_string(),
    ]);

    let words = lines
        .flat_map(|s| {
            s.split_whitespace()
                .map(str::to_string)
                .enumerate()
                .collect::<Vec<_>>()
        })
        .filter(|w| w.len() >= 5)
        .to_vec();

    assert_collections_equal(
        &words,
        &["quick".to_string(), "brown".to_string(), "jumps".to_string()],
    );
}

#[test]
fn flat_map_emits_inner_keys_as_produced() {
    let out: Vec<(char, i32)> = from_values(vec![1, 2])
        .flat_map(|x| vec![('a', x), ('b', x * 10)])
        .collect();
    assert_pairs_equal(&out, &[('a', 1), ('b', 10), ('a', 2), ('b', 20)]);
}

#[test]
fn map_with_keys_sees_the_key() {
    let out = from_pairs(word_pairs())
        .map_with_keys(|k, v| format!("{k}{v}"))
        .to_vec();
    assert_collections_equal(
        &out,
        &["a1".to_string(), "b2".to_string(), "c3".to_string()],
    );
}

#[test]
fn map_keys_keeps_values() {
    let out: Vec<(String, i64)> = from_pairs(word_pairs())
        .map_keys(|k| format!("{k}!"))
        .collect();
    assert_pairs_equal(
        &out,
        &[
            ("a!".to_string(), 1),
            ("b!".to_string(), 2),
            ("c!".to_string(), 3),
        ],
    );
}

#[test]
fn reindex_derives_keys_from_values_only() {
    let out: Vec<(i64, i64)> = from_pairs(word_pairs()).reindex(|v| v * 100).collect();
    assert_pairs_equal(&out, &[(100, 1), (200, 2), (300, 3)]);
}

#[test]
fn filter_preserves_pairs_and_order() {
    let out: Vec<(usize, i64)> = from_values(vec![1i64, 2, 3, 4, 5, 6])
        .filter(|v| v % 2 == 0)
        .collect();
    assert_pairs_equal(&out, &[(1, 2), (3, 4), (5, 6)]);
}

#[test]
fn flip_swaps_key_and_value_roles() {
    let out: Vec<(i64, String)> = from_pairs(word_pairs()).flip().collect();
    assert_pairs_equal(
        &out,
        &[
            (1, "a".to_string()),
            (2, "b".to_string()),
            (3, "c".to_string()),
        ],
    );
}

#[test]
fn keys_and_values_are_positionally_rekeyed() {
    let keys: Vec<(usize, String)> = from_pairs(word_pairs()).keys().collect();
    assert_pairs_equal(
        &keys,
        &[
            (0, "a".to_string()),
            (1, "b".to_string()),
            (2, "c".to_string()),
        ],
    );

    let values: Vec<(usize, i64)> = from_pairs(word_pairs()).values().collect();
    assert_pairs_equal(&values, &[(0, 1), (1, 2), (2, 3)]);
}

#[test]
fn to_pairs_from_pairs_reconstructs_unique_key_mapping() {
    let reconstructed = from_pairs(word_pairs()).to_pairs().from_pairs().to_map();
    let expected: HashMap<String, i64> = word_pairs().into_iter().collect();
    assert_eq!(reconstructed, expected);
}

#[test]
fn to_pairs_uses_fresh_positional_keys() {
    let out: Vec<(usize, (String, i64))> = from_pairs(word_pairs()).to_pairs().collect();
    assert_eq!(out[0], (0, ("a".to_string(), 1)));
    assert_eq!(out[2], (2, ("c".to_string(), 3)));
}

#[test]
fn merge_concatenates_in_argument_order_without_rekeying() {
    let a = from_pairs(vec![("x", 1), ("y", 2)]).into_pipeline();
    let b = from_pairs(vec![("x", 3)]).into_pipeline();
    let c = from_pairs(vec![("z", 4)]).into_pipeline();

    let out: Vec<(&str, i32)> = a.merge([b, c]).collect();
    assert_pairs_equal(&out, &[("x", 1), ("y", 2), ("x", 3), ("z", 4)]);
}

#[test]
fn reductions_emits_every_intermediate_accumulator() {
    let out = from_values(vec![1, 2, 3, 4])
        .reductions(0, |acc, (_k, v)| acc + v)
        .to_vec();
    assert_collections_equal(&out, &[1, 3, 6, 10]);
}

#[test]
fn reductions_length_equals_input_length() {
    let n = from_values(vec![5, 5, 5]).reductions(100, |acc, _| acc).count();
    assert_eq!(n, 3);
}

#[test]
fn inspect_passes_pairs_through_unchanged() {
    let out: Vec<(usize, i32)> = from_values(vec![7, 8]).inspect(|_k, _v| {}).collect();
    assert_pairs_equal(&out, &[(0, 7), (1, 8)]);
}

#[test]
fn pipeline_accepts_a_prebuilt_cursor() {
    let p = LazyPipeline::new(IterCursor::new(vec![("k", 9)].into_iter()));
    assert_eq!(p.to_vec(), vec![9]);
}

#[test]
fn map_preserves_pointwise_values_and_count() {
    let double = |x: &i64| x * 2;
    let mapped = from_values(vec![4i64, 9, 16]).map(|x| x * 2).to_vec();
    let expected: Vec<i64> = from_values(vec![4i64, 9, 16])
        .to_vec()
        .iter()
        .map(double)
        .collect();
    assert_collections_equal(&mapped, &expected);
    assert_eq!(from_values(vec![4i64, 9, 16]).map(|x| x * 2).count(), 3);
}
