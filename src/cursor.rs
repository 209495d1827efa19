//! The sequence-engine boundary: a minimal pull interface over ordered
//! (key, value) pairs, plus the source cursors the collection types are
//! built from.
//!
//! A [`Cursor`] is forward-only and single-pass unless it explicitly supports
//! [`restart`](Cursor::restart). Every transformation stage in
//! [`stages`](crate::stages) is itself a `Cursor` wrapping the one upstream
//! cursor it owns, so a whole pipeline is a chain of exclusively-owned
//! cursors pulled depth-first, one pair at a time.

/// A forward-only producer of `(key, value)` pairs.
///
/// Contract:
/// - `try_advance` returns the next pair, or `None` once the sequence is
///   exhausted. An exhausted cursor must stay exhausted (fused) — callers
///   rely on re-pulling being a cheap no-op rather than an error.
/// - `restart` rewinds to the first pair and returns `true` only when the
///   underlying source is natively replayable. The default is a `false`
///   no-op; single-pass sources keep whatever position they have.
/// - `len_hint` reports the exact number of pairs remaining when the source
///   knows it without traversal (a materialized vector, an iterator with an
///   exact `size_hint`). `None` means "traverse to find out".
pub trait Cursor<K, V> {
    /// Pull the next pair, advancing past it.
    fn try_advance(&mut self) -> Option<(K, V)>;

    /// Rewind to the first pair. Returns whether the rewind actually happened.
    fn restart(&mut self) -> bool {
        false
    }

    /// Whether [`restart`](Cursor::restart) would succeed, without calling it.
    fn restartable(&self) -> bool {
        false
    }

    /// Exact number of pairs remaining, when natively known.
    fn len_hint(&self) -> Option<usize> {
        None
    }
}

/// Owned, type-erased cursor — the form stages and pipelines store.
pub type BoxCursor<K, V> = Box<dyn Cursor<K, V>>;

impl<K, V, C: Cursor<K, V> + ?Sized> Cursor<K, V> for Box<C> {
    fn try_advance(&mut self) -> Option<(K, V)> {
        (**self).try_advance()
    }
    fn restart(&mut self) -> bool {
        (**self).restart()
    }
    fn restartable(&self) -> bool {
        (**self).restartable()
    }
    fn len_hint(&self) -> Option<usize> {
        (**self).len_hint()
    }
}

/* ===================== VecCursor ===================== */

/// Cursor over a materialized pair vector. Restartable, native size.
pub struct VecCursor<K, V> {
    pairs: Vec<(K, V)>,
    pos: usize,
}

impl<K, V> VecCursor<K, V> {
    pub fn new(pairs: Vec<(K, V)>) -> Self {
        Self { pairs, pos: 0 }
    }
}

impl<V> VecCursor<usize, V> {
    /// Wrap plain values with fresh positional keys `0..n`.
    pub fn from_values(values: impl IntoIterator<Item = V>) -> Self {
        Self::new(values.into_iter().enumerate().collect())
    }
}

impl<K: Clone, V: Clone> Cursor<K, V> for VecCursor<K, V> {
    fn try_advance(&mut self) -> Option<(K, V)> {
        let pair = self.pairs.get(self.pos).cloned()?;
        self.pos += 1;
        Some(pair)
    }

    fn restart(&mut self) -> bool {
        self.pos = 0;
        true
    }

    fn restartable(&self) -> bool {
        true
    }

    fn len_hint(&self) -> Option<usize> {
        Some(self.pairs.len() - self.pos)
    }
}

/* ===================== IterCursor ===================== */

/// One-shot cursor over any pair iterator.
///
/// Forwards an exact `size_hint` as its `len_hint`; everything else about the
/// iterator (laziness, side effects) passes through untouched.
pub struct IterCursor<I> {
    iter: I,
}

impl<I> IterCursor<I> {
    pub fn new(iter: I) -> Self {
        Self { iter }
    }
}

impl<K, V, I: Iterator<Item = (K, V)>> Cursor<K, V> for IterCursor<I> {
    fn try_advance(&mut self) -> Option<(K, V)> {
        self.iter.next()
    }

    fn len_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lo, Some(hi)) if lo == hi => Some(lo),
            _ => None,
        }
    }
}

/* ===================== Buffered ===================== */

/// A cursor with one pair re-attached in front of it.
///
/// When a pipeline has peeked a pair into its protocol buffer and is then
/// composed further, the buffered pair must flow into the new stage first.
pub(crate) struct Buffered<K, V> {
    head: Option<(K, V)>,
    rest: BoxCursor<K, V>,
}

impl<K, V> Buffered<K, V> {
    pub(crate) fn new(head: (K, V), rest: BoxCursor<K, V>) -> Self {
        Self { head: Some(head), rest }
    }
}

impl<K, V> Cursor<K, V> for Buffered<K, V> {
    fn try_advance(&mut self) -> Option<(K, V)> {
        self.head.take().or_else(|| self.rest.try_advance())
    }

    fn len_hint(&self) -> Option<usize> {
        let buffered = usize::from(self.head.is_some());
        self.rest.len_hint().map(|n| n + buffered)
    }
}
