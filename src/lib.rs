//! # kvflow
//!
//! **Lazy key-value iteration pipelines** for Rust: a chainable collection
//! abstraction over arbitrary ordered `(key, value)` sequences, with lazy
//! transformation composition and a small set of eager terminal operations.
//!
//! ## Key Features
//!
//! - **Chainable operator surface** - map, filter, flat_map, chunk, slice,
//!   flatten, and friends, all composed lazily
//! - **Two collection variants** - a single-pass [`LazyPipeline`] and a
//!   restartable [`EagerCollection`] sharing one surface
//! - **Pull-based evaluation** - each pair flows depth-first through the
//!   stage chain exactly when a consumer asks for it
//! - **Terminal aggregates** - fold, count, sum, avg, min/max with explicit
//!   comparison capabilities
//! - **Type-safe** - generic `(K, V)` pairs, no runtime type dispatch
//!
//! ## Quick Start
//!
//! ```
//! use kvflow::from_values;
//!
//! let out = from_values(vec![1, 2, 3, 4, 5])
//!     .map(|x| x * 10)
//!     .filter(|x| *x > 10)
//!     .to_vec();
//! assert_eq!(out, vec![20, 30, 40, 50]);
//! ```
//!
//! ## Core Concepts
//!
//! ### Cursor
//!
//! A [`Cursor`] is the minimal sequence-engine primitive: a forward-only,
//! single-pass pull interface over `(key, value)` pairs, with optional
//! restart and native-size capabilities. Sources and transformation stages
//! alike are cursors.
//!
//! ### LazyPipeline
//!
//! A [`LazyPipeline`] wraps exactly one cursor. Every transformation returns
//! a *new* pipeline wrapping a newly composed stage; construction never pulls
//! a pair. Terminal operations (`fold`, `to_vec`, `count`, `first`, `sum`, …)
//! walk the whole chain once. A lazy pipeline is single-pass: once exhausted
//! it yields nothing further, and that is a documented non-error.
//!
//! ### EagerCollection
//!
//! An [`EagerCollection`] normalizes one of several source shapes — a
//! materialized pair vector, a one-shot cursor, or an indirect cursor
//! producer — into the same surface, adding `restart` for sources that are
//! natively replayable. Restartability is queryable via
//! [`is_restartable`](EagerCollection::is_restartable).
//!
//! ### Enumeration protocol
//!
//! Both variants can be driven externally without any named operator:
//! `valid` / `key` / `value` / `advance`, or a plain `for (k, v) in &mut c`
//! loop via their `Iterator` impls.
//!
//! ## Module Overview
//!
//! - [`cursor`] - the `Cursor` trait and source cursors
//! - [`pipeline`] - `LazyPipeline` and the operator surface
//! - [`eager`] - `EagerCollection` and source normalization
//! - [`nested`] - the recursive value type behind `flatten`
//! - [`error`] - the (small) error taxonomy
//! - [`testing`] - assertion helpers and fixtures for pipeline tests

pub mod cursor;
pub mod eager;
pub mod error;
pub mod nested;
pub mod pipeline;
mod stages;
pub mod testing;

pub use cursor::{BoxCursor, Cursor, IterCursor, VecCursor};
pub use eager::EagerCollection;
pub use error::KvError;
pub use nested::Nested;
pub use pipeline::LazyPipeline;

/// Build an [`EagerCollection`] from plain values, keyed `0..n`.
pub fn from_values<V>(values: impl IntoIterator<Item = V>) -> EagerCollection<usize, V> {
    EagerCollection::from_values(values)
}

/// Build an [`EagerCollection`] from `(key, value)` pairs.
pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> EagerCollection<K, V> {
    EagerCollection::from_pairs(pairs)
}
