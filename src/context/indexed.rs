//! Container types with strongly-typed indexes.
use crate::error::Error;
use std::collections::HashMap;

/// Bidirectional map from values to dense indexes.
///
/// Values live in insertion order in a `Vec<V>`, with a `HashMap<V, I>`
/// pointing back at their slots.  Inserting a value which is already present
/// returns the existing index instead of growing the map, which is the
/// deduplication primitive behind [`Context`](crate::context::Context).
///
/// `V` must be `Clone`, because it is stored once per direction.  The index
/// type `I` is a thin `usize` wrapper, typically built with [`define_index`].
#[derive(Clone, Debug)]
pub(crate) struct IndexMap<V, I> {
    data: Vec<V>,
    map: HashMap<V, I>,
}

impl<V, I> Default for IndexMap<V, I> {
    fn default() -> Self {
        Self {
            data: vec![],
            map: HashMap::new(),
        }
    }
}

pub(crate) trait Index {
    fn new(i: usize) -> Self;
    fn get(&self) -> usize;
}

impl<V, I> IndexMap<V, I>
where
    V: Eq + std::hash::Hash + Clone,
    I: Eq + std::hash::Hash + Copy + Index,
{
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    pub fn clear(&mut self) {
        self.data.clear();
        self.map.clear();
    }
    pub fn get_by_index(&self, i: I) -> Option<&V> {
        self.data.get(i.get())
    }
    /// Inserts the given value, returning a handle.
    ///
    /// If the value is already present, the handle points at the existing
    /// instance and nothing is stored.
    pub fn insert(&mut self, v: V) -> I {
        *self.map.entry(v.clone()).or_insert_with(|| {
            let out = I::new(self.data.len());
            self.data.push(v);
            out
        })
    }

    /// Removes the last value stored in the container.
    ///
    /// This is _usually_ the most recently inserted value, except when
    /// `insert` was called on a duplicate.
    pub fn pop(&mut self) -> Result<V, Error> {
        match self.data.pop() {
            Some(v) => {
                self.map.remove(&v);
                Ok(v)
            }
            None => Err(Error::EmptyMap),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

/// A `Vec<V>` with strongly-typed indexes.
///
/// This is dense per-index scratch storage: build it with `vec![...].into()`,
/// then read and write through index types declared with [`define_index`].
#[derive(Clone, Debug)]
pub struct IndexVec<V, I> {
    data: Vec<V>,
    _phantom: std::marker::PhantomData<*const I>,
}

impl<V, I> std::ops::Index<I> for IndexVec<V, I>
where
    I: Index,
{
    type Output = V;
    fn index(&self, i: I) -> &V {
        &self.data[i.get()]
    }
}

impl<V, I> std::ops::IndexMut<I> for IndexVec<V, I>
where
    I: Index,
{
    fn index_mut(&mut self, i: I) -> &mut V {
        &mut self.data[i.get()]
    }
}

impl<V, I> From<Vec<V>> for IndexVec<V, I> {
    fn from(data: Vec<V>) -> Self {
        Self {
            data,
            _phantom: std::marker::PhantomData,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Defines an index type suitable for use in an [`IndexMap`] or [`IndexVec`].
macro_rules! define_index {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(
            Copy, Clone, Default, Debug, Eq, PartialEq, Hash, Ord, PartialOrd,
        )]
        pub struct $name(usize);
        impl crate::context::indexed::Index for $name {
            fn new(i: usize) -> Self {
                Self(i)
            }
            fn get(&self) -> usize {
                self.0
            }
        }
    };
}
pub(crate) use define_index;
