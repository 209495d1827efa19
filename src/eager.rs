//! The eager, restartable collection: arbitrary sources normalized into a
//! single cursor shape, with repeatable iteration layered on top of the lazy
//! pipeline's single-pass contract.

use crate::cursor::{BoxCursor, Buffered, Cursor, VecCursor};
use crate::nested::Nested;
use crate::pipeline::LazyPipeline;
use anyhow::Result;
use std::collections::HashMap;
use std::hash::Hash;

/// The closed set of source shapes, resolved once at construction.
///
/// No runtime type probing: a source is exactly one of a materialized pair
/// vector (restartable, native size), an indirect cursor producer (restartable
/// by re-producing), or an adapted one-shot cursor (restart is a capability
/// gap, see [`EagerCollection::restart`]).
enum Source<K, V> {
    Materialized { pairs: Vec<(K, V)>, pos: usize },
    Factory {
        make: Box<dyn Fn() -> BoxCursor<K, V>>,
        cursor: BoxCursor<K, V>,
    },
    OneShot { cursor: BoxCursor<K, V> },
}

impl<K: Clone + 'static, V: Clone + 'static> Cursor<K, V> for Source<K, V> {
    fn try_advance(&mut self) -> Option<(K, V)> {
        match self {
            Source::Materialized { pairs, pos } => {
                let pair = pairs.get(*pos).cloned()?;
                *pos += 1;
                Some(pair)
            }
            Source::Factory { cursor, .. } => cursor.try_advance(),
            Source::OneShot { cursor } => cursor.try_advance(),
        }
    }

    fn restart(&mut self) -> bool {
        match self {
            Source::Materialized { pos, .. } => {
                *pos = 0;
                true
            }
            Source::Factory { make, cursor } => {
                *cursor = make();
                true
            }
            Source::OneShot { cursor } => cursor.restart(),
        }
    }

    fn restartable(&self) -> bool {
        match self {
            Source::Materialized { .. } | Source::Factory { .. } => true,
            Source::OneShot { cursor } => cursor.restartable(),
        }
    }

    fn len_hint(&self) -> Option<usize> {
        match self {
            Source::Materialized { pairs, pos } => Some(pairs.len() - *pos),
            Source::Factory { cursor, .. } => cursor.len_hint(),
            Source::OneShot { cursor } => cursor.len_hint(),
        }
    }
}

/// An eager, restartable key-value collection.
///
/// Same transformation and aggregate surface as [`LazyPipeline`] — every
/// operator delegates through [`into_pipeline`](Self::into_pipeline) — but
/// constructed from a normalized source and able to `restart` when the source
/// is natively replayable:
///
/// ```
/// use kvflow::EagerCollection;
///
/// let mut nums = EagerCollection::from_values(vec![1, 2, 3]);
/// let first_pass: Vec<_> = (&mut nums).collect();
/// assert!(nums.restart());
/// let second_pass: Vec<_> = (&mut nums).collect();
/// assert_eq!(first_pass, second_pass);
/// ```
pub struct EagerCollection<K, V> {
    source: Source<K, V>,
    head: Option<(K, V)>,
    exhausted: bool,
}

impl<K, V> EagerCollection<K, V> {
    /// Materialize a pair sequence. Restartable, native size.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Self::with_source(Source::Materialized { pairs: pairs.into_iter().collect(), pos: 0 })
    }

    /// Adapt a pre-built cursor. Single-pass unless the cursor itself can
    /// restart.
    pub fn from_cursor(cursor: impl Cursor<K, V> + 'static) -> Self {
        Self::with_source(Source::OneShot { cursor: Box::new(cursor) })
    }

    /// Adapt an indirect source: anything that can produce a fresh cursor on
    /// demand. Restart re-produces, so this is fully replayable.
    pub fn from_factory(make: impl Fn() -> BoxCursor<K, V> + 'static) -> Self {
        let cursor = make();
        Self::with_source(Source::Factory { make: Box::new(make), cursor })
    }

    fn with_source(source: Source<K, V>) -> Self {
        Self { source, head: None, exhausted: false }
    }
}

impl<V> EagerCollection<usize, V> {
    /// Materialize plain values under fresh positional keys `0..n`.
    pub fn from_values(values: impl IntoIterator<Item = V>) -> Self {
        Self::from_pairs(values.into_iter().enumerate())
    }
}

impl<K, V> FromIterator<(K, V)> for EagerCollection<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl<K: Clone + 'static, V: Clone + 'static> EagerCollection<K, V> {
    /// Whether [`restart`](Self::restart) would rewind to the first pair.
    pub fn is_restartable(&self) -> bool {
        self.source.restartable()
    }

    /// Rewind to the first pair. For a one-shot source that cannot rewind
    /// this is a no-op returning `false`: iteration simply resumes from
    /// whatever state remains. Query [`is_restartable`](Self::is_restartable)
    /// to tell the cases apart up front.
    pub fn restart(&mut self) -> bool {
        if self.source.restart() {
            self.head = None;
            self.exhausted = false;
            true
        } else {
            false
        }
    }

    /// Number of pairs remaining from the current position. Prefers the
    /// source's native size over traversal. Consumes the collection either
    /// way; use [`pipeline`](Self::pipeline) first to keep a restartable
    /// source around.
    pub fn count(mut self) -> usize {
        let buffered = usize::from(self.head.is_some());
        if self.exhausted {
            return buffered;
        }
        if let Some(n) = self.source.len_hint() {
            return n + buffered;
        }
        let mut n = 0;
        while self.next().is_some() {
            n += 1;
        }
        n
    }

    /// Hand the remaining pairs over to a lazy pipeline.
    pub fn into_pipeline(self) -> LazyPipeline<K, V> {
        match self.head {
            Some(pair) => LazyPipeline::new(Buffered::new(pair, Box::new(self.source))),
            None => LazyPipeline::new(self.source),
        }
    }

    /// Start a fresh pass from the first pair without consuming this
    /// collection. `None` for one-shot sources, which have only the pass
    /// they are on.
    pub fn pipeline(&self) -> Option<LazyPipeline<K, V>> {
        match &self.source {
            Source::Materialized { pairs, .. } => {
                Some(LazyPipeline::new(VecCursor::new(pairs.clone())))
            }
            Source::Factory { make, .. } => Some(LazyPipeline::new(make())),
            Source::OneShot { .. } => None,
        }
    }

    fn peek(&mut self) -> Option<&(K, V)> {
        if self.head.is_none() && !self.exhausted {
            self.head = self.source.try_advance();
            if self.head.is_none() {
                self.exhausted = true;
            }
        }
        self.head.as_ref()
    }

    /* ---------- enumeration protocol ---------- */

    /// Whether a current pair is available; peeks at most one pair.
    pub fn valid(&mut self) -> bool {
        self.peek().is_some()
    }

    /// The current key, if positioned on a pair.
    pub fn key(&mut self) -> Option<&K> {
        self.peek().map(|(k, _)| k)
    }

    /// The current value, if positioned on a pair.
    pub fn value(&mut self) -> Option<&V> {
        self.peek().map(|(_, v)| v)
    }

    /// Move past the current pair. Past the end this is a no-op.
    pub fn advance(&mut self) {
        self.peek();
        self.head = None;
    }

    /// `true` iff no pair is available; never consumes past the peek buffer.
    pub fn is_empty(&mut self) -> bool {
        self.peek().is_none()
    }

    /* ---------- delegated transformation surface ---------- */

    pub fn map<O: 'static, F: FnMut(V) -> O + 'static>(self, f: F) -> LazyPipeline<K, O> {
        self.into_pipeline().map(f)
    }

    pub fn map_with_keys<O: 'static, F: FnMut(&K, V) -> O + 'static>(self, f: F) -> LazyPipeline<K, O> {
        self.into_pipeline().map_with_keys(f)
    }

    pub fn map_keys<K2: 'static, F: FnMut(K) -> K2 + 'static>(self, f: F) -> LazyPipeline<K2, V> {
        self.into_pipeline().map_keys(f)
    }

    pub fn flat_map<K2: 'static, V2: 'static, I, F>(self, f: F) -> LazyPipeline<K2, V2>
    where
        F: FnMut(V) -> I + 'static,
        I: IntoIterator<Item = (K2, V2)> + 'static,
        I::IntoIter: 'static,
    {
        self.into_pipeline().flat_map(f)
    }

    pub fn reindex<K2: 'static, F: FnMut(&V) -> K2 + 'static>(self, f: F) -> LazyPipeline<K2, V> {
        self.into_pipeline().reindex(f)
    }

    pub fn filter<P: FnMut(&V) -> bool + 'static>(self, pred: P) -> LazyPipeline<K, V> {
        self.into_pipeline().filter(pred)
    }

    pub fn inspect<F: FnMut(&K, &V) + 'static>(self, f: F) -> LazyPipeline<K, V> {
        self.into_pipeline().inspect(f)
    }

    pub fn to_pairs(self) -> LazyPipeline<usize, (K, V)> {
        self.into_pipeline().to_pairs()
    }

    pub fn reductions<A, F>(self, start: A, f: F) -> LazyPipeline<usize, A>
    where
        A: Clone + 'static,
        F: FnMut(A, (K, V)) -> A + 'static,
    {
        self.into_pipeline().reductions(start, f)
    }

    pub fn merge(self, others: impl IntoIterator<Item = LazyPipeline<K, V>>) -> LazyPipeline<K, V> {
        self.into_pipeline().merge(others)
    }

    pub fn slice(self, start: usize, length: Option<usize>) -> LazyPipeline<K, V> {
        self.into_pipeline().slice(start, length)
    }

    pub fn take(self, n: usize) -> LazyPipeline<K, V> {
        self.into_pipeline().take(n)
    }

    pub fn skip(self, n: usize) -> LazyPipeline<K, V> {
        self.into_pipeline().skip(n)
    }

    pub fn take_while<P: FnMut(&V) -> bool + 'static>(self, pred: P) -> LazyPipeline<K, V> {
        self.into_pipeline().take_while(pred)
    }

    pub fn skip_while<P: FnMut(&V) -> bool + 'static>(self, pred: P) -> LazyPipeline<K, V> {
        self.into_pipeline().skip_while(pred)
    }

    pub fn keys(self) -> LazyPipeline<usize, K> {
        self.into_pipeline().keys()
    }

    pub fn values(self) -> LazyPipeline<usize, V> {
        self.into_pipeline().values()
    }

    pub fn flip(self) -> LazyPipeline<V, K> {
        self.into_pipeline().flip()
    }

    pub fn chunk(self, size: usize) -> LazyPipeline<usize, Vec<V>> {
        self.into_pipeline().chunk(size)
    }

    pub fn chunk_with_keys(self, size: usize) -> LazyPipeline<usize, Vec<(K, V)>> {
        self.into_pipeline().chunk_with_keys(size)
    }

    /* ---------- delegated terminal surface ---------- */

    pub fn for_each<F: FnMut(V)>(self, f: F) {
        self.into_pipeline().for_each(f)
    }

    pub fn fold<A, F: FnMut(A, (K, V)) -> A>(self, init: A, f: F) -> A {
        self.into_pipeline().fold(init, f)
    }

    pub fn any<P: FnMut(&V) -> bool>(self, pred: P) -> bool {
        self.into_pipeline().any(pred)
    }

    pub fn all<P: FnMut(&V) -> bool>(self, pred: P) -> bool {
        self.into_pipeline().all(pred)
    }

    pub fn find<P: FnMut(&V) -> bool>(self, pred: P) -> Option<V> {
        self.into_pipeline().find(pred)
    }

    pub fn to_vec(self) -> Vec<V> {
        self.into_pipeline().to_vec()
    }

    pub fn to_map(self) -> HashMap<K, V>
    where
        K: Eq + Hash,
    {
        self.into_pipeline().to_map()
    }

    /// See [`LazyPipeline::first`].
    pub fn first(self) -> Result<V> {
        self.into_pipeline().first()
    }

    pub fn first_or(self, default: V) -> V {
        self.into_pipeline().first_or(default)
    }

    pub fn sum(self) -> f64
    where
        V: Into<f64>,
    {
        self.into_pipeline().sum()
    }

    pub fn sum_by<F: FnMut(V) -> f64>(self, f: F) -> f64 {
        self.into_pipeline().sum_by(f)
    }

    pub fn avg(self) -> f64
    where
        V: Into<f64>,
    {
        self.into_pipeline().avg()
    }

    pub fn avg_by<F: FnMut(V) -> f64>(self, f: F, default: f64) -> f64 {
        self.into_pipeline().avg_by(f, default)
    }

    pub fn max(self) -> Option<V>
    where
        V: Ord,
    {
        self.into_pipeline().max()
    }

    pub fn min(self) -> Option<V>
    where
        V: Ord,
    {
        self.into_pipeline().min()
    }

    pub fn max_by<M: Ord, F: FnMut(&V) -> Option<M>>(self, f: F) -> Option<M> {
        self.into_pipeline().max_by(f)
    }

    pub fn min_by<M: Ord, F: FnMut(&V) -> Option<M>>(self, f: F) -> Option<M> {
        self.into_pipeline().min_by(f)
    }

    pub fn max_f64<F: FnMut(&V) -> f64>(self, f: F) -> Option<f64> {
        self.into_pipeline().max_f64(f)
    }

    pub fn min_f64<F: FnMut(&V) -> f64>(self, f: F) -> Option<f64> {
        self.into_pipeline().min_f64(f)
    }
}

impl<K: Clone + 'static, K2: 'static, V2: 'static> EagerCollection<K, (K2, V2)>
where
    (K2, V2): Clone,
{
    /// See [`LazyPipeline::from_pairs`].
    pub fn from_pairs_expanded(self) -> LazyPipeline<K2, V2> {
        self.into_pipeline().from_pairs()
    }
}

impl<K: Clone + 'static, T: 'static> EagerCollection<K, Nested<T>>
where
    Nested<T>: Clone,
{
    /// See [`LazyPipeline::flatten`].
    pub fn flatten(self, levels: Option<usize>) -> LazyPipeline<usize, Nested<T>> {
        self.into_pipeline().flatten(levels)
    }
}

impl<K: Clone + 'static, V: Clone + 'static> Iterator for EagerCollection<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        if let Some(pair) = self.head.take() {
            return Some(pair);
        }
        if self.exhausted {
            return None;
        }
        let pair = self.source.try_advance();
        if pair.is_none() {
            self.exhausted = true;
        }
        pair
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let buffered = usize::from(self.head.is_some());
        match self.source.len_hint() {
            Some(n) => (n + buffered, Some(n + buffered)),
            None => (buffered, None),
        }
    }
}
