//! Transformation stages.
//!
//! Each stage is an explicit state object: it owns its one upstream cursor
//! and implements [`Cursor`] by pulling from it on demand. Composing a
//! pipeline is just nesting these structs; no work happens until something
//! downstream pulls. A stage "pauses" between pulls simply by being a struct
//! whose fields hold its resume state.
//!
//! Stages that emit exactly one pair per input pair forward `len_hint`, so a
//! `count()` over a map-like chain can still use the source's native size.

use crate::cursor::{BoxCursor, Cursor};
use crate::nested::Nested;
use std::collections::VecDeque;
use std::marker::PhantomData;

/* ===================== Map ===================== */

pub(crate) struct Map<K, V, O, F> {
    up: BoxCursor<K, V>,
    f: F,
    _o: PhantomData<O>,
}

impl<K, V, O, F> Map<K, V, O, F> {
    pub(crate) fn new(up: BoxCursor<K, V>, f: F) -> Self {
        Self { up, f, _o: PhantomData }
    }
}

impl<K, V, O, F> Cursor<K, O> for Map<K, V, O, F>
where
    F: FnMut(V) -> O,
{
    fn try_advance(&mut self) -> Option<(K, O)> {
        let (k, v) = self.up.try_advance()?;
        Some((k, (self.f)(v)))
    }

    fn len_hint(&self) -> Option<usize> {
        self.up.len_hint()
    }
}

/* ===================== MapWithKeys ===================== */

pub(crate) struct MapWithKeys<K, V, O, F> {
    up: BoxCursor<K, V>,
    f: F,
    _o: PhantomData<O>,
}

impl<K, V, O, F> MapWithKeys<K, V, O, F> {
    pub(crate) fn new(up: BoxCursor<K, V>, f: F) -> Self {
        Self { up, f, _o: PhantomData }
    }
}

impl<K, V, O, F> Cursor<K, O> for MapWithKeys<K, V, O, F>
where
    F: FnMut(&K, V) -> O,
{
    fn try_advance(&mut self) -> Option<(K, O)> {
        let (k, v) = self.up.try_advance()?;
        let o = (self.f)(&k, v);
        Some((k, o))
    }

    fn len_hint(&self) -> Option<usize> {
        self.up.len_hint()
    }
}

/* ===================== MapKeys ===================== */

pub(crate) struct MapKeys<K, K2, V, F> {
    up: BoxCursor<K, V>,
    f: F,
    _k: PhantomData<K2>,
}

impl<K, K2, V, F> MapKeys<K, K2, V, F> {
    pub(crate) fn new(up: BoxCursor<K, V>, f: F) -> Self {
        Self { up, f, _k: PhantomData }
    }
}

impl<K, K2, V, F> Cursor<K2, V> for MapKeys<K, K2, V, F>
where
    F: FnMut(K) -> K2,
{
    fn try_advance(&mut self) -> Option<(K2, V)> {
        let (k, v) = self.up.try_advance()?;
        Some(((self.f)(k), v))
    }

    fn len_hint(&self) -> Option<usize> {
        self.up.len_hint()
    }
}

/* ===================== Reindex ===================== */

pub(crate) struct Reindex<K, K2, V, F> {
    up: BoxCursor<K, V>,
    f: F,
    _k: PhantomData<K2>,
}

impl<K, K2, V, F> Reindex<K, K2, V, F> {
    pub(crate) fn new(up: BoxCursor<K, V>, f: F) -> Self {
        Self { up, f, _k: PhantomData }
    }
}

impl<K, K2, V, F> Cursor<K2, V> for Reindex<K, K2, V, F>
where
    F: FnMut(&V) -> K2,
{
    fn try_advance(&mut self) -> Option<(K2, V)> {
        let (_k, v) = self.up.try_advance()?;
        let k2 = (self.f)(&v);
        Some((k2, v))
    }

    fn len_hint(&self) -> Option<usize> {
        self.up.len_hint()
    }
}

/* ===================== Filter ===================== */

pub(crate) struct Filter<K, V, P> {
    up: BoxCursor<K, V>,
    pred: P,
}

impl<K, V, P> Filter<K, V, P> {
    pub(crate) fn new(up: BoxCursor<K, V>, pred: P) -> Self {
        Self { up, pred }
    }
}

impl<K, V, P> Cursor<K, V> for Filter<K, V, P>
where
    P: FnMut(&V) -> bool,
{
    fn try_advance(&mut self) -> Option<(K, V)> {
        loop {
            let (k, v) = self.up.try_advance()?;
            if (self.pred)(&v) {
                return Some((k, v));
            }
        }
    }
}

/* ===================== FlatMap ===================== */

pub(crate) struct FlatMap<K, V, F, I: IntoIterator> {
    up: BoxCursor<K, V>,
    f: F,
    inner: Option<I::IntoIter>,
}

impl<K, V, F, I: IntoIterator> FlatMap<K, V, F, I> {
    pub(crate) fn new(up: BoxCursor<K, V>, f: F) -> Self {
        Self { up, f, inner: None }
    }
}

impl<K, V, K2, V2, F, I> Cursor<K2, V2> for FlatMap<K, V, F, I>
where
    F: FnMut(V) -> I,
    I: IntoIterator<Item = (K2, V2)>,
{
    fn try_advance(&mut self) -> Option<(K2, V2)> {
        loop {
            if let Some(iter) = &mut self.inner {
                if let Some(pair) = iter.next() {
                    return Some(pair);
                }
                self.inner = None;
            }
            let (_k, v) = self.up.try_advance()?;
            self.inner = Some((self.f)(v).into_iter());
        }
    }
}

/* ===================== Inspect ===================== */

pub(crate) struct Inspect<K, V, F> {
    up: BoxCursor<K, V>,
    f: F,
}

impl<K, V, F> Inspect<K, V, F> {
    pub(crate) fn new(up: BoxCursor<K, V>, f: F) -> Self {
        Self { up, f }
    }
}

impl<K, V, F> Cursor<K, V> for Inspect<K, V, F>
where
    F: FnMut(&K, &V),
{
    fn try_advance(&mut self) -> Option<(K, V)> {
        let (k, v) = self.up.try_advance()?;
        (self.f)(&k, &v);
        Some((k, v))
    }

    fn len_hint(&self) -> Option<usize> {
        self.up.len_hint()
    }
}

/* ===================== ToPairs / FromPairs ===================== */

pub(crate) struct ToPairs<K, V> {
    up: BoxCursor<K, V>,
    idx: usize,
}

impl<K, V> ToPairs<K, V> {
    pub(crate) fn new(up: BoxCursor<K, V>) -> Self {
        Self { up, idx: 0 }
    }
}

impl<K, V> Cursor<usize, (K, V)> for ToPairs<K, V> {
    fn try_advance(&mut self) -> Option<(usize, (K, V))> {
        let pair = self.up.try_advance()?;
        let i = self.idx;
        self.idx += 1;
        Some((i, pair))
    }

    fn len_hint(&self) -> Option<usize> {
        self.up.len_hint()
    }
}

pub(crate) struct FromPairs<K, K2, V2> {
    up: BoxCursor<K, (K2, V2)>,
}

impl<K, K2, V2> FromPairs<K, K2, V2> {
    pub(crate) fn new(up: BoxCursor<K, (K2, V2)>) -> Self {
        Self { up }
    }
}

impl<K, K2, V2> Cursor<K2, V2> for FromPairs<K, K2, V2> {
    fn try_advance(&mut self) -> Option<(K2, V2)> {
        let (_k, pair) = self.up.try_advance()?;
        Some(pair)
    }

    fn len_hint(&self) -> Option<usize> {
        self.up.len_hint()
    }
}

/* ===================== Reductions ===================== */

pub(crate) struct Reductions<K, V, A, F> {
    up: BoxCursor<K, V>,
    f: F,
    acc: A,
    idx: usize,
}

impl<K, V, A, F> Reductions<K, V, A, F> {
    pub(crate) fn new(up: BoxCursor<K, V>, start: A, f: F) -> Self {
        Self { up, f, acc: start, idx: 0 }
    }
}

impl<K, V, A, F> Cursor<usize, A> for Reductions<K, V, A, F>
where
    A: Clone,
    F: FnMut(A, (K, V)) -> A,
{
    fn try_advance(&mut self) -> Option<(usize, A)> {
        let pair = self.up.try_advance()?;
        let next = (self.f)(self.acc.clone(), pair);
        self.acc = next.clone();
        let i = self.idx;
        self.idx += 1;
        Some((i, next))
    }

    fn len_hint(&self) -> Option<usize> {
        self.up.len_hint()
    }
}

/* ===================== Concat ===================== */

pub(crate) struct Concat<K, V> {
    queue: VecDeque<BoxCursor<K, V>>,
}

impl<K, V> Concat<K, V> {
    pub(crate) fn new(queue: VecDeque<BoxCursor<K, V>>) -> Self {
        Self { queue }
    }
}

impl<K, V> Cursor<K, V> for Concat<K, V> {
    fn try_advance(&mut self) -> Option<(K, V)> {
        while let Some(front) = self.queue.front_mut() {
            if let Some(pair) = front.try_advance() {
                return Some(pair);
            }
            self.queue.pop_front();
        }
        None
    }

    fn len_hint(&self) -> Option<usize> {
        self.queue.iter().try_fold(0usize, |n, c| c.len_hint().map(|h| n + h))
    }
}

/* ===================== Slice ===================== */

pub(crate) struct Slice<K, V> {
    up: BoxCursor<K, V>,
    to_skip: usize,
    remaining: Option<usize>,
}

impl<K, V> Slice<K, V> {
    pub(crate) fn new(up: BoxCursor<K, V>, start: usize, length: Option<usize>) -> Self {
        Self { up, to_skip: start, remaining: length }
    }
}

impl<K, V> Cursor<K, V> for Slice<K, V> {
    fn try_advance(&mut self) -> Option<(K, V)> {
        if self.remaining == Some(0) {
            return None;
        }
        while self.to_skip > 0 {
            self.up.try_advance()?;
            self.to_skip -= 1;
        }
        let pair = self.up.try_advance()?;
        if let Some(r) = &mut self.remaining {
            *r -= 1;
        }
        Some(pair)
    }
}

/* ===================== TakeWhile / SkipWhile ===================== */

pub(crate) struct TakeWhile<K, V, P> {
    up: BoxCursor<K, V>,
    pred: P,
    done: bool,
}

impl<K, V, P> TakeWhile<K, V, P> {
    pub(crate) fn new(up: BoxCursor<K, V>, pred: P) -> Self {
        Self { up, pred, done: false }
    }
}

impl<K, V, P> Cursor<K, V> for TakeWhile<K, V, P>
where
    P: FnMut(&V) -> bool,
{
    fn try_advance(&mut self) -> Option<(K, V)> {
        if self.done {
            return None;
        }
        let (k, v) = self.up.try_advance()?;
        if (self.pred)(&v) {
            Some((k, v))
        } else {
            self.done = true;
            None
        }
    }
}

pub(crate) struct SkipWhile<K, V, P> {
    up: BoxCursor<K, V>,
    pred: P,
    skipping: bool,
}

impl<K, V, P> SkipWhile<K, V, P> {
    pub(crate) fn new(up: BoxCursor<K, V>, pred: P) -> Self {
        Self { up, pred, skipping: true }
    }
}

impl<K, V, P> Cursor<K, V> for SkipWhile<K, V, P>
where
    P: FnMut(&V) -> bool,
{
    fn try_advance(&mut self) -> Option<(K, V)> {
        loop {
            let (k, v) = self.up.try_advance()?;
            if self.skipping && (self.pred)(&v) {
                continue;
            }
            self.skipping = false;
            return Some((k, v));
        }
    }
}

/* ===================== Keys / Values / Flip ===================== */

pub(crate) struct Keys<K, V> {
    up: BoxCursor<K, V>,
    idx: usize,
}

impl<K, V> Keys<K, V> {
    pub(crate) fn new(up: BoxCursor<K, V>) -> Self {
        Self { up, idx: 0 }
    }
}

impl<K, V> Cursor<usize, K> for Keys<K, V> {
    fn try_advance(&mut self) -> Option<(usize, K)> {
        let (k, _v) = self.up.try_advance()?;
        let i = self.idx;
        self.idx += 1;
        Some((i, k))
    }

    fn len_hint(&self) -> Option<usize> {
        self.up.len_hint()
    }
}

pub(crate) struct Values<K, V> {
    up: BoxCursor<K, V>,
    idx: usize,
}

impl<K, V> Values<K, V> {
    pub(crate) fn new(up: BoxCursor<K, V>) -> Self {
        Self { up, idx: 0 }
    }
}

impl<K, V> Cursor<usize, V> for Values<K, V> {
    fn try_advance(&mut self) -> Option<(usize, V)> {
        let (_k, v) = self.up.try_advance()?;
        let i = self.idx;
        self.idx += 1;
        Some((i, v))
    }

    fn len_hint(&self) -> Option<usize> {
        self.up.len_hint()
    }
}

pub(crate) struct Flip<K, V> {
    up: BoxCursor<K, V>,
}

impl<K, V> Flip<K, V> {
    pub(crate) fn new(up: BoxCursor<K, V>) -> Self {
        Self { up }
    }
}

impl<K, V> Cursor<V, K> for Flip<K, V> {
    fn try_advance(&mut self) -> Option<(V, K)> {
        let (k, v) = self.up.try_advance()?;
        Some((v, k))
    }

    fn len_hint(&self) -> Option<usize> {
        self.up.len_hint()
    }
}

/* ===================== Chunk / ChunkWithKeys ===================== */

pub(crate) struct Chunk<K, V> {
    up: BoxCursor<K, V>,
    size: usize,
    idx: usize,
}

impl<K, V> Chunk<K, V> {
    pub(crate) fn new(up: BoxCursor<K, V>, size: usize) -> Self {
        Self { up, size: size.max(1), idx: 0 }
    }
}

impl<K, V> Cursor<usize, Vec<V>> for Chunk<K, V> {
    fn try_advance(&mut self) -> Option<(usize, Vec<V>)> {
        let mut group = Vec::with_capacity(self.size);
        while group.len() < self.size {
            match self.up.try_advance() {
                Some((_k, v)) => group.push(v),
                None => break,
            }
        }
        if group.is_empty() {
            return None;
        }
        let i = self.idx;
        self.idx += 1;
        Some((i, group))
    }
}

pub(crate) struct ChunkWithKeys<K, V> {
    up: BoxCursor<K, V>,
    size: usize,
    idx: usize,
}

impl<K, V> ChunkWithKeys<K, V> {
    pub(crate) fn new(up: BoxCursor<K, V>, size: usize) -> Self {
        Self { up, size: size.max(1), idx: 0 }
    }
}

impl<K, V> Cursor<usize, Vec<(K, V)>> for ChunkWithKeys<K, V> {
    fn try_advance(&mut self) -> Option<(usize, Vec<(K, V)>)> {
        let mut group = Vec::with_capacity(self.size);
        while group.len() < self.size {
            match self.up.try_advance() {
                Some(pair) => group.push(pair),
                None => break,
            }
        }
        if group.is_empty() {
            return None;
        }
        let i = self.idx;
        self.idx += 1;
        Some((i, group))
    }
}

/* ===================== Flatten ===================== */

pub(crate) struct Flatten<K, T> {
    up: BoxCursor<K, Nested<T>>,
    levels: Option<usize>,
    // pending inner sequences, innermost last; each with the depth of its items
    stack: Vec<(std::vec::IntoIter<Nested<T>>, usize)>,
    idx: usize,
}

impl<K, T> Flatten<K, T> {
    pub(crate) fn new(up: BoxCursor<K, Nested<T>>, levels: Option<usize>) -> Self {
        Self { up, levels, stack: Vec::new(), idx: 0 }
    }

    fn emit(&mut self, node: Nested<T>) -> (usize, Nested<T>) {
        let i = self.idx;
        self.idx += 1;
        (i, node)
    }
}

impl<K, T> Cursor<usize, Nested<T>> for Flatten<K, T> {
    fn try_advance(&mut self) -> Option<(usize, Nested<T>)> {
        loop {
            // Drain the innermost pending sequence first (depth-first order).
            let next = loop {
                match self.stack.last_mut() {
                    Some((iter, depth)) => {
                        let depth = *depth;
                        match iter.next() {
                            Some(node) => break Some((node, depth)),
                            None => {
                                self.stack.pop();
                            }
                        }
                    }
                    None => break None,
                }
            };

            let (node, depth) = match next {
                Some(pending) => pending,
                None => {
                    let (_k, node) = self.up.try_advance()?;
                    (node, 0)
                }
            };

            match node {
                Nested::Leaf(v) => return Some(self.emit(Nested::Leaf(v))),
                Nested::Seq(items) => {
                    if self.levels.is_some_and(|limit| depth >= limit) {
                        // depth budget spent: the sequence passes through intact
                        return Some(self.emit(Nested::Seq(items)));
                    }
                    self.stack.push((items.into_iter(), depth + 1));
                }
            }
        }
    }
}
