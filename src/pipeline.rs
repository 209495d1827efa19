//! The lazy pipeline: one owned cursor chain, a chainable operator surface,
//! and the terminal operations that drive it.

use crate::cursor::{BoxCursor, Buffered, Cursor};
use crate::error::KvError;
use crate::nested::Nested;
use crate::stages;
use anyhow::Result;
use ordered_float::OrderedFloat;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::hash::Hash;

/// A lazy, forward-only, single-pass pipeline over `(K, V)` pairs.
///
/// A pipeline owns exactly one [`Cursor`] — its input stage. Every
/// transformation consumes the pipeline and returns a new one whose cursor
/// wraps the previous chain in one more stage; nothing is pulled until a
/// terminal operation (or external enumeration) drives it. Once a pair has
/// been pulled it is gone: re-enumerating an exhausted pipeline yields no
/// further pairs, it never errors. For repeatable iteration, start from an
/// [`EagerCollection`](crate::EagerCollection).
///
/// Pipelines are driven either by the named terminals ([`fold`], [`to_vec`],
/// [`count`], …), by the enumeration protocol ([`valid`] / [`key`] /
/// [`value`] / [`advance`]), or as a plain `Iterator`:
///
/// ```
/// use kvflow::from_values;
///
/// let doubled = from_values(vec![3, 1, 2]).map(|x| x * 2).to_vec();
/// assert_eq!(doubled, vec![6, 2, 4]);
/// ```
///
/// [`fold`]: LazyPipeline::fold
/// [`to_vec`]: LazyPipeline::to_vec
/// [`count`]: LazyPipeline::count
/// [`valid`]: LazyPipeline::valid
/// [`key`]: LazyPipeline::key
/// [`value`]: LazyPipeline::value
/// [`advance`]: LazyPipeline::advance
pub struct LazyPipeline<K, V> {
    cursor: BoxCursor<K, V>,
    // one-pair peek buffer for the enumeration protocol
    head: Option<(K, V)>,
    exhausted: bool,
}

impl<K: 'static, V: 'static> LazyPipeline<K, V> {
    /// Wrap a pre-built cursor. Never pulls.
    pub fn new(cursor: impl Cursor<K, V> + 'static) -> Self {
        Self {
            cursor: Box::new(cursor),
            head: None,
            exhausted: false,
        }
    }

    /// Unwrap back into a cursor, re-attaching a peeked pair if one is
    /// buffered so no element is lost across composition.
    pub(crate) fn into_cursor(self) -> BoxCursor<K, V> {
        match self.head {
            Some(pair) => Box::new(Buffered::new(pair, self.cursor)),
            None => self.cursor,
        }
    }

    fn peek(&mut self) -> Option<&(K, V)> {
        if self.head.is_none() && !self.exhausted {
            self.head = self.cursor.try_advance();
            if self.head.is_none() {
                self.exhausted = true;
            }
        }
        self.head.as_ref()
    }

    /* ---------- enumeration protocol ---------- */

    /// Whether a current pair is available. Pulls at most the one pair needed
    /// to answer, and that pair is still delivered by the next `advance` /
    /// `next`, so probing is repeatable and non-destructive.
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

    /* ---------- lazy transformations ---------- */

    /// Transform each value with `f`; keys are unchanged.
    pub fn map<O: 'static, F>(self, f: F) -> LazyPipeline<K, O>
    where
        F: FnMut(V) -> O + 'static,
    {
        LazyPipeline::new(stages::Map::new(self.into_cursor(), f))
    }

    /// Like [`map`](Self::map), but `f` also sees the key.
    pub fn map_with_keys<O: 'static, F>(self, f: F) -> LazyPipeline<K, O>
    where
        F: FnMut(&K, V) -> O + 'static,
    {
        LazyPipeline::new(stages::MapWithKeys::new(self.into_cursor(), f))
    }

    /// Transform each key with `f`; values are unchanged.
    pub fn map_keys<K2: 'static, F>(self, f: F) -> LazyPipeline<K2, V>
    where
        F: FnMut(K) -> K2 + 'static,
    {
        LazyPipeline::new(stages::MapKeys::new(self.into_cursor(), f))
    }

    /// Expand each value into a pair sequence, concatenated in place of the
    /// original pair. Inner keys are emitted exactly as produced.
    pub fn flat_map<K2: 'static, V2: 'static, I, F>(self, f: F) -> LazyPipeline<K2, V2>
    where
        F: FnMut(V) -> I + 'static,
        I: IntoIterator<Item = (K2, V2)> + 'static,
        I::IntoIter: 'static,
    {
        LazyPipeline::new(stages::FlatMap::<K, V, F, I>::new(self.into_cursor(), f))
    }

    /// Re-key each pair from its value; the old key is never inspected.
    pub fn reindex<K2: 'static, F>(self, f: F) -> LazyPipeline<K2, V>
    where
        F: FnMut(&V) -> K2 + 'static,
    {
        LazyPipeline::new(stages::Reindex::new(self.into_cursor(), f))
    }

    /// Keep only pairs whose value satisfies `pred`; order preserved.
    pub fn filter<P>(self, pred: P) -> Self
    where
        P: FnMut(&V) -> bool + 'static,
    {
        LazyPipeline::new(stages::Filter::new(self.into_cursor(), pred))
    }

    /// Side-effect peek at each pair as it flows past; pairs are unchanged.
    pub fn inspect<F>(self, f: F) -> Self
    where
        F: FnMut(&K, &V) + 'static,
    {
        LazyPipeline::new(stages::Inspect::new(self.into_cursor(), f))
    }

    /// Emit each `(key, value)` as a single value under a fresh positional
    /// key. Inverse of [`from_pairs`](LazyPipeline::from_pairs).
    pub fn to_pairs(self) -> LazyPipeline<usize, (K, V)> {
        LazyPipeline::new(stages::ToPairs::new(self.into_cursor()))
    }

    /// Emit every intermediate accumulator of a left fold, positionally
    /// keyed. Output length equals input length; `start` itself is not
    /// emitted.
    pub fn reductions<A, F>(self, start: A, f: F) -> LazyPipeline<usize, A>
    where
        A: Clone + 'static,
        F: FnMut(A, (K, V)) -> A + 'static,
    {
        LazyPipeline::new(stages::Reductions::new(self.into_cursor(), start, f))
    }

    /// Concatenate this pipeline's pairs with each of `others`, in argument
    /// order. Keys are neither deduplicated nor renumbered.
    pub fn merge(self, others: impl IntoIterator<Item = Self>) -> Self {
        let mut queue: VecDeque<BoxCursor<K, V>> = VecDeque::new();
        queue.push_back(self.into_cursor());
        for other in others {
            queue.push_back(other.into_cursor());
        }
        LazyPipeline::new(stages::Concat::new(queue))
    }

    /// Skip `start` pairs, then yield up to `length` pairs (`None` =
    /// unbounded). A `start` beyond the end of the sequence yields empty.
    pub fn slice(self, start: usize, length: Option<usize>) -> Self {
        LazyPipeline::new(stages::Slice::new(self.into_cursor(), start, length))
    }

    /// The first `n` pairs.
    pub fn take(self, n: usize) -> Self {
        self.slice(0, Some(n))
    }

    /// All but the first `n` pairs.
    pub fn skip(self, n: usize) -> Self {
        self.slice(n, None)
    }

    /// The contiguous prefix of pairs whose values satisfy `pred`; the first
    /// failing pair and everything after it are excluded.
    pub fn take_while<P>(self, pred: P) -> Self
    where
        P: FnMut(&V) -> bool + 'static,
    {
        LazyPipeline::new(stages::TakeWhile::new(self.into_cursor(), pred))
    }

    /// Drop the contiguous prefix of pairs whose values satisfy `pred`; the
    /// first failing pair and everything after it are included.
    pub fn skip_while<P>(self, pred: P) -> Self
    where
        P: FnMut(&V) -> bool + 'static,
    {
        LazyPipeline::new(stages::SkipWhile::new(self.into_cursor(), pred))
    }

    /// The keys, re-keyed positionally.
    pub fn keys(self) -> LazyPipeline<usize, K> {
        LazyPipeline::new(stages::Keys::new(self.into_cursor()))
    }

    /// The values, re-keyed `0..n`.
    pub fn values(self) -> LazyPipeline<usize, V> {
        LazyPipeline::new(stages::Values::new(self.into_cursor()))
    }

    /// Swap key and value roles for every pair.
    pub fn flip(self) -> LazyPipeline<V, K> {
        LazyPipeline::new(stages::Flip::new(self.into_cursor()))
    }

    /// Group consecutive values into materialized groups of `size` (the last
    /// group may be shorter), dropping keys. The outer sequence stays lazy
    /// and is positionally keyed. A `size` of 0 is treated as 1.
    pub fn chunk(self, size: usize) -> LazyPipeline<usize, Vec<V>> {
        LazyPipeline::new(stages::Chunk::new(self.into_cursor(), size))
    }

    /// As [`chunk`](Self::chunk), but each group retains its original keys.
    pub fn chunk_with_keys(self, size: usize) -> LazyPipeline<usize, Vec<(K, V)>> {
        LazyPipeline::new(stages::ChunkWithKeys::new(self.into_cursor(), size))
    }

    /* ---------- terminal operations ---------- */

    /// Call `f` on every value, for its side effect. Full traversal.
    pub fn for_each<F: FnMut(V)>(mut self, mut f: F) {
        while let Some((_k, v)) = self.next() {
            f(v);
        }
    }

    /// Left fold over all pairs, starting from `init`.
    pub fn fold<A, F>(mut self, init: A, mut f: F) -> A
    where
        F: FnMut(A, (K, V)) -> A,
    {
        let mut acc = init;
        while let Some(pair) = self.next() {
            acc = f(acc, pair);
        }
        acc
    }

    /// `true` iff some value satisfies `pred`. Short-circuits; `false` on an
    /// empty sequence.
    pub fn any<P: FnMut(&V) -> bool>(mut self, mut pred: P) -> bool {
        while let Some((_k, v)) = self.next() {
            if pred(&v) {
                return true;
            }
        }
        false
    }

    /// `true` iff every value satisfies `pred`. Short-circuits; `true` on an
    /// empty sequence.
    pub fn all<P: FnMut(&V) -> bool>(mut self, mut pred: P) -> bool {
        while let Some((_k, v)) = self.next() {
            if !pred(&v) {
                return false;
            }
        }
        true
    }

    /// The first value satisfying `pred`, short-circuiting. Not finding one
    /// is not an error: the sentinel is `None`.
    pub fn find<P: FnMut(&V) -> bool>(mut self, mut pred: P) -> Option<V> {
        while let Some((_k, v)) = self.next() {
            if pred(&v) {
                return Some(v);
            }
        }
        None
    }

    /// Total number of remaining pairs. Uses the cursor chain's native size
    /// when it knows one, plus any pair sitting in the peek buffer; otherwise
    /// a full traversal, which consumes single-pass sources.
    pub fn count(mut self) -> usize {
        let buffered = usize::from(self.head.is_some());
        if self.exhausted {
            return buffered;
        }
        if let Some(n) = self.cursor.len_hint() {
            return n + buffered;
        }
        let mut n = 0;
        while self.next().is_some() {
            n += 1;
        }
        n
    }

    /// `true` iff no pair is available. Only peeks: the probed pair (if any)
    /// is still delivered by subsequent traversal, so calling this any number
    /// of times never changes what a later traversal produces.
    pub fn is_empty(&mut self) -> bool {
        self.peek().is_none()
    }

    /// Materialize all values, discarding keys, in order.
    pub fn to_vec(mut self) -> Vec<V> {
        let mut out = Vec::with_capacity(self.size_hint().0);
        while let Some((_k, v)) = self.next() {
            out.push(v);
        }
        out
    }

    /// Materialize into a map. Later pairs with a colliding key overwrite
    /// earlier ones.
    pub fn to_map(mut self) -> HashMap<K, V>
    where
        K: Eq + Hash,
    {
        let mut out = HashMap::new();
        while let Some((k, v)) = self.next() {
            out.insert(k, v);
        }
        out
    }

    /// The first value.
    ///
    /// # Errors
    /// [`KvError::EmptyCollection`] when the sequence has no pairs. Use
    /// [`first_or`](Self::first_or) to opt into a default instead.
    pub fn first(mut self) -> Result<V> {
        match self.next() {
            Some((_k, v)) => Ok(v),
            None => Err(KvError::EmptyCollection.into()),
        }
    }

    /// The first value, or `default` when the sequence is empty.
    pub fn first_or(mut self, default: V) -> V {
        match self.next() {
            Some((_k, v)) => v,
            None => default,
        }
    }

    /* ---------- numeric aggregates ---------- */

    /// Arithmetic sum of all values; `0.0` on an empty sequence.
    pub fn sum(self) -> f64
    where
        V: Into<f64>,
    {
        self.sum_by(Into::into)
    }

    /// Arithmetic sum of `f`-mapped values; `0.0` on an empty sequence.
    pub fn sum_by<F: FnMut(V) -> f64>(mut self, mut f: F) -> f64 {
        let mut total = 0.0;
        while let Some((_k, v)) = self.next() {
            total += f(v);
        }
        total
    }

    /// Arithmetic mean of all values; `0.0` on an empty sequence.
    pub fn avg(self) -> f64
    where
        V: Into<f64>,
    {
        self.avg_by(Into::into, 0.0)
    }

    /// Arithmetic mean of `f`-mapped values; `default` on an empty sequence.
    pub fn avg_by<F: FnMut(V) -> f64>(mut self, mut f: F, default: f64) -> f64 {
        let mut total = 0.0;
        let mut n = 0usize;
        while let Some((_k, v)) = self.next() {
            total += f(v);
            n += 1;
        }
        if n == 0 { default } else { total / n as f64 }
    }

    /// Largest value under `V`'s total order; `None` on an empty sequence.
    pub fn max(mut self) -> Option<V>
    where
        V: Ord,
    {
        let mut best: Option<V> = None;
        while let Some((_k, v)) = self.next() {
            best = Some(match best {
                None => v,
                Some(b) => b.max(v),
            });
        }
        best
    }

    /// Smallest value under `V`'s total order; `None` on an empty sequence.
    pub fn min(mut self) -> Option<V>
    where
        V: Ord,
    {
        let mut best: Option<V> = None;
        while let Some((_k, v)) = self.next() {
            best = Some(match best {
                None => v,
                Some(b) => b.min(v),
            });
        }
        best
    }

    /// Largest `f`-mapped value. Folds with `Option`'s total order, under
    /// which `None < Some(_)`: an unmapped (`None`) element participates as
    /// the bottom element rather than being skipped. Contrast with
    /// [`min_by`](Self::min_by).
    pub fn max_by<M: Ord, F: FnMut(&V) -> Option<M>>(mut self, mut f: F) -> Option<M> {
        let mut best: Option<M> = None;
        while let Some((_k, v)) = self.next() {
            let m = f(&v);
            if m > best {
                best = m;
            }
        }
        best
    }

    /// Smallest `f`-mapped value. A `None` mapping is skipped without
    /// touching the accumulator — the documented asymmetry with
    /// [`max_by`](Self::max_by).
    pub fn min_by<M: Ord, F: FnMut(&V) -> Option<M>>(mut self, mut f: F) -> Option<M> {
        let mut best: Option<M> = None;
        while let Some((_k, v)) = self.next() {
            if let Some(m) = f(&v) {
                best = Some(match best {
                    None => m,
                    Some(b) => b.min(m),
                });
            }
        }
        best
    }

    /// Largest `f`-mapped float, compared under `total_cmp`.
    pub fn max_f64<F: FnMut(&V) -> f64>(mut self, mut f: F) -> Option<f64> {
        let mut best: Option<OrderedFloat<f64>> = None;
        while let Some((_k, v)) = self.next() {
            let m = OrderedFloat(f(&v));
            best = Some(match best {
                None => m,
                Some(b) => b.max(m),
            });
        }
        best.map(OrderedFloat::into_inner)
    }

    /// Smallest `f`-mapped float, compared under `total_cmp`.
    pub fn min_f64<F: FnMut(&V) -> f64>(mut self, mut f: F) -> Option<f64> {
        let mut best: Option<OrderedFloat<f64>> = None;
        while let Some((_k, v)) = self.next() {
            let m = OrderedFloat(f(&v));
            best = Some(match best {
                None => m,
                Some(b) => b.min(m),
            });
        }
        best.map(OrderedFloat::into_inner)
    }
}

impl<K: 'static, K2: 'static, V2: 'static> LazyPipeline<K, (K2, V2)> {
    /// Re-expand pair-shaped values back into `(key, value)` pairs,
    /// discarding the outer key. Inverse of
    /// [`to_pairs`](LazyPipeline::to_pairs).
    pub fn from_pairs(self) -> LazyPipeline<K2, V2> {
        LazyPipeline::new(stages::FromPairs::new(self.into_cursor()))
    }
}

impl<K: 'static, T: 'static> LazyPipeline<K, Nested<T>> {
    /// Recursively expand nested sequence values into a flat, positionally
    /// keyed sequence, up to `levels` deep (`None` = unbounded, leaving only
    /// leaves). A sequence at the depth limit passes through intact.
    pub fn flatten(self, levels: Option<usize>) -> LazyPipeline<usize, Nested<T>> {
        LazyPipeline::new(stages::Flatten::new(self.into_cursor(), levels))
    }
}

impl<K: 'static, V: 'static> Iterator for LazyPipeline<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        if let Some(pair) = self.head.take() {
            return Some(pair);
        }
        if self.exhausted {
            return None;
        }
        let pair = self.cursor.try_advance();
        if pair.is_none() {
            self.exhausted = true;
        }
        pair
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let buffered = usize::from(self.head.is_some());
        match self.cursor.len_hint() {
            Some(n) if !self.exhausted => (n + buffered, Some(n + buffered)),
            _ if self.exhausted => (buffered, Some(buffered)),
            _ => (buffered, None),
        }
    }
}
