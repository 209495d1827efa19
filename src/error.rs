//! Error taxonomy.
//!
//! Almost nothing in kvflow fails: not-found is `Option::None`, exhausted
//! cursors simply produce no further pairs, and restarting a non-restartable
//! source is a `false`-returning no-op. The one genuine precondition
//! violation gets a typed error so callers can tell it apart from any other
//! `anyhow` failure by downcasting.

use thiserror::Error;

#[derive(Error, Debug, Eq, PartialEq)]
pub enum KvError {
    /// `first()` was called on a sequence with no pairs. Use
    /// [`first_or`](crate::LazyPipeline::first_or) to opt into a default
    /// instead.
    #[error("[Empty] first() called on an empty collection")]
    EmptyCollection,
}
