//! Recursive values for [`flatten`](crate::LazyPipeline::flatten).
//!
//! Flattening needs values that may themselves be sequences, to any depth.
//! Rather than runtime type dispatch, kvflow closes the recursion into one
//! enum: a value is either a leaf or an ordered sequence of further nested
//! values.

/// A value that may itself be an ordered sequence of values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Nested<T> {
    Leaf(T),
    Seq(Vec<Nested<T>>),
}

impl<T> Nested<T> {
    /// Wrap a plain value.
    pub fn leaf(value: T) -> Self {
        Nested::Leaf(value)
    }

    /// Wrap an ordered sequence.
    pub fn seq(items: impl IntoIterator<Item = Nested<T>>) -> Self {
        Nested::Seq(items.into_iter().collect())
    }

    /// A sequence of leaves, for the common one-level case.
    pub fn leaves(values: impl IntoIterator<Item = T>) -> Self {
        Nested::Seq(values.into_iter().map(Nested::Leaf).collect())
    }

    pub fn is_seq(&self) -> bool {
        matches!(self, Nested::Seq(_))
    }

    /// The leaf value, if this node is one.
    pub fn into_leaf(self) -> Option<T> {
        match self {
            Nested::Leaf(v) => Some(v),
            Nested::Seq(_) => None,
        }
    }
}

impl<T> From<T> for Nested<T> {
    fn from(value: T) -> Self {
        Nested::Leaf(value)
    }
}
