//! One-shot snapshot of a sequence.

use tracing::trace;

use crate::sequence::Sequence;

/// Elements of a sequence materialized by a single traversal.
///
/// Used by `reverse`, `to_vec` and the ordering engine. The buffer is built
/// once per consuming traversal and never shared between traversals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer<T> {
    items: Vec<T>,
}

impl<T> Buffer<T> {
    /// Traverses `source` once and stores every element.
    ///
    /// Sources that know their length are copied into an exactly sized
    /// allocation; others grow by doubling.
    pub fn from_sequence<S>(source: &S) -> Self
    where
        S: Sequence<Item = T> + ?Sized,
    {
        let items = match source.known_len() {
            Some(len) => {
                let mut items = Vec::with_capacity(len);
                items.extend(source.traverse());
                items
            }
            None => source.traverse().collect(),
        };
        trace!(len = items.len(), "buffered sequence");
        Buffer { items }
    }

    /// Number of buffered elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing was buffered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Buffered elements in traversal order.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Unwraps the buffered elements.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// Moves the elements out in the order given by `map`.
    ///
    /// `map` must be a permutation of `0..len`.
    pub fn into_permuted(self, map: &[usize]) -> Vec<T> {
        let mut slots: Vec<Option<T>> = self.items.into_iter().map(Some).collect();
        map.iter()
            .filter_map(|&index| slots[index].take())
            .collect()
    }
}
