use kvflow::testing::*;
use kvflow::{from_pairs, from_values, BoxCursor, EagerCollection, IterCursor, VecCursor};
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn materialized_sources_restart_to_the_same_sequence() {
    let mut c = from_values(vec![3, 1, 2]);

    let first_pass: Vec<(usize, i32)> = (&mut c).collect();
    assert!(c.restart());
    let second_pass: Vec<(usize, i32)> = (&mut c).collect();

    assert_pairs_equal(&first_pass, &second_pass);
}

#[test]
fn factory_sources_restart_by_reproducing() {
    let mut c = EagerCollection::from_factory(|| {
        Box::new(VecCursor::from_values(vec![10, 20])) as BoxCursor<usize, i32>
    });
    assert!(c.is_restartable());

    let first_pass: Vec<i32> = (&mut c).map(|(_k, v)| v).collect();
    assert!(c.restart());
    let second_pass: Vec<i32> = (&mut c).map(|(_k, v)| v).collect();

    assert_collections_equal(&first_pass, &[10, 20]);
    assert_collections_equal(&second_pass, &[10, 20]);
}

#[test]
fn one_shot_sources_report_the_capability_gap() {
    let mut c = EagerCollection::from_cursor(IterCursor::new(vec![(0usize, 1)].into_iter()));
    assert!(!c.is_restartable());

    let first_pass: Vec<(usize, i32)> = (&mut c).collect();
    assert_eq!(first_pass.len(), 1);

    // restart is a no-op: iteration resumes from whatever state remains
    assert!(!c.restart());
    let second_pass: Vec<(usize, i32)> = (&mut c).collect();
    assert!(second_pass.is_empty());
}

#[test]
fn enumeration_protocol_walks_pairs_in_order() {
    let mut c = from_pairs(word_pairs());
    let mut seen = Vec::new();
    while c.valid() {
        let k = c.key().cloned().expect("valid position has a key");
        let v = c.value().copied().expect("valid position has a value");
        seen.push((k, v));
        c.advance();
    }
    assert_pairs_equal(&seen, &word_pairs());

    // past the end advancing is a no-op, not an error
    c.advance();
    assert!(!c.valid());
}

#[test]
fn count_prefers_the_native_size() {
    let pulls = Rc::new(Cell::new(0));
    let pulls_seen = Rc::clone(&pulls);
    let source = vec![(0usize, 1), (1, 2), (2, 3), (3, 4)]
        .into_iter()
        .inspect(move |_| pulls_seen.set(pulls_seen.get() + 1));

    let c = EagerCollection::from_cursor(IterCursor::new(source));
    assert_eq!(c.count(), 4);
    // the exact size_hint answered natively; nothing was pulled
    assert_eq!(pulls.get(), 0);
}

#[test]
fn count_falls_back_to_traversal_for_one_shot_sources() {
    // hide the iterator's size so the cursor cannot answer natively
    let opaque = (0..5).filter(|_| true).map(|v| (v, v));
    let c = EagerCollection::from_cursor(IterCursor::new(opaque));
    assert_eq!(c.count(), 5);
}

#[test]
fn count_includes_a_peeked_pair() {
    let mut c = from_values(vec![1, 2, 3]);
    assert!(!c.is_empty());
    assert_eq!(c.count(), 3);
}

#[test]
fn is_empty_does_not_lose_the_probed_pair() {
    let mut c = from_values(vec![42]);
    assert!(!c.is_empty());
    assert!(!c.is_empty());
    let all: Vec<(usize, i32)> = (&mut c).collect();
    assert_pairs_equal(&all, &[(0, 42)]);

    let mut empty = from_values(Vec::<i32>::new());
    assert!(empty.is_empty());
}

#[test]
fn pipeline_spawns_fresh_passes_without_consuming() {
    let c = from_values(vec![1, 2, 3]);
    let a = c.pipeline().expect("materialized source").to_vec();
    let b = c.pipeline().expect("materialized source").to_vec();
    assert_collections_equal(&a, &b);

    let one_shot = EagerCollection::from_cursor(IterCursor::new(vec![(0usize, 1)].into_iter()));
    assert!(one_shot.pipeline().is_none());
}

#[test]
fn collected_from_a_pair_iterator() {
    let c: EagerCollection<&str, i32> = vec![("a", 1), ("b", 2)].into_iter().collect();
    assert_eq!(c.sum(), 3.0);
}

#[test]
fn eager_surface_matches_the_pipeline_surface() {
    assert_eq!(from_values(vec![1, 2, 3]).take(2).to_vec(), vec![1, 2]);
    assert_eq!(from_values(vec![1, 2, 3]).skip(1).to_vec(), vec![2, 3]);
    assert_eq!(from_values(vec![5, 3, 8, 1]).max(), Some(8));
    assert_eq!(from_values(vec![1, 2, 3, 4, 5]).chunk(2).to_vec().len(), 3);
    assert_eq!(from_pairs(word_pairs()).flip().keys().count(), 3);
}
