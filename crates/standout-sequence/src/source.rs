//! Sequence sources: wrappers that make existing data repeatably traversable.

use std::marker::PhantomData;

use crate::error::{QueryError, Result};
use crate::sequence::Sequence;

/// Borrowed slice; yields `&T`.
#[derive(Debug)]
pub struct Slice<'s, T> {
    items: &'s [T],
}

impl<T> Clone for Slice<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Slice<'_, T> {}

/// Wraps a slice as a sequence of references.
pub fn from_slice<T>(items: &[T]) -> Slice<'_, T> {
    Slice { items }
}

impl<'s, T> Slice<'s, T> {
    /// Returns the wrapped slice.
    pub fn as_slice(&self) -> &'s [T] {
        self.items
    }
}

impl<'s, T> Sequence for Slice<'s, T> {
    type Item = &'s T;
    type Iter<'a> = std::slice::Iter<'s, T>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        self.items.iter()
    }

    fn known_len(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// Owned vector; every traversal yields clones of the elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owned<T> {
    items: Vec<T>,
}

/// Takes ownership of `items`; traversals yield clones.
pub fn from_vec<T: Clone>(items: Vec<T>) -> Owned<T> {
    Owned { items }
}

impl<T> Owned<T> {
    /// Returns the underlying elements.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Unwraps the underlying vector.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Clone> Sequence for Owned<T> {
    type Item = T;
    type Iter<'a> = std::iter::Cloned<std::slice::Iter<'a, T>>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        self.items.iter().cloned()
    }

    fn known_len(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// Any cloneable iterable; each traversal starts from a fresh clone.
///
/// Ranges such as `0..` make infinite sequences.
#[derive(Debug, Clone)]
pub struct FromIter<I> {
    source: I,
}

/// Wraps a cloneable iterable (a range, an iterator, a collection).
pub fn from_iter<I>(source: I) -> FromIter<I>
where
    I: IntoIterator + Clone,
{
    FromIter { source }
}

impl<I> Sequence for FromIter<I>
where
    I: IntoIterator + Clone,
{
    type Item = I::Item;
    type Iter<'a> = I::IntoIter
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        self.source.clone().into_iter()
    }
}

/// Sequence produced by calling a factory for every traversal.
#[derive(Debug, Clone)]
pub struct Generate<F> {
    factory: F,
}

/// Builds a sequence whose traversals come from `factory()`.
///
/// ```
/// use standout_sequence::{generate, Sequence};
///
/// let powers = generate(|| std::iter::successors(Some(1u32), |n| n.checked_mul(2)));
/// assert_eq!(powers.take(4).to_vec(), vec![1, 2, 4, 8]);
/// ```
pub fn generate<F, I>(factory: F) -> Generate<F>
where
    F: Fn() -> I,
    I: IntoIterator,
{
    Generate { factory }
}

impl<F, I> Sequence for Generate<F>
where
    F: Fn() -> I,
    I: IntoIterator,
{
    type Item = I::Item;
    type Iter<'a> = I::IntoIter
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        (self.factory)().into_iter()
    }
}

/// `count` consecutive integers starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSeq {
    start: i32,
    count: i32,
}

/// Creates `count` consecutive integers starting at `start`.
///
/// Fails if `count` is negative or if `start + count - 1` does not fit in
/// an `i32`.
pub fn range(start: i32, count: i32) -> Result<RangeSeq> {
    if count < 0 || i64::from(start) + i64::from(count) - 1 > i64::from(i32::MAX) {
        return Err(QueryError::OutOfRange { argument: "count" });
    }
    Ok(RangeSeq { start, count })
}

fn narrow(value: i64) -> i32 {
    value as i32
}

impl Sequence for RangeSeq {
    type Item = i32;
    type Iter<'a> = std::iter::Map<std::ops::Range<i64>, fn(i64) -> i32>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        let start = i64::from(self.start);
        let end = start + i64::from(self.count);
        (start..end).map(narrow as fn(i64) -> i32)
    }

    fn known_len(&self) -> Option<usize> {
        Some(self.count as usize)
    }
}

/// One value repeated `count` times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repeat<T> {
    value: T,
    count: usize,
}

/// Creates a sequence that yields `value` `count` times.
pub fn repeat<T: Clone>(value: T, count: usize) -> Repeat<T> {
    Repeat { value, count }
}

impl<T: Clone> Sequence for Repeat<T> {
    type Item = T;
    type Iter<'a> = std::iter::RepeatN<T>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        std::iter::repeat_n(self.value.clone(), self.count)
    }

    fn known_len(&self) -> Option<usize> {
        Some(self.count)
    }
}

/// Sequence with no elements.
#[derive(Debug)]
pub struct Empty<T> {
    _item: PhantomData<fn() -> T>,
}

impl<T> Clone for Empty<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Empty<T> {}

/// Creates an empty sequence of `T`.
pub fn empty<T>() -> Empty<T> {
    Empty { _item: PhantomData }
}

impl<T> Sequence for Empty<T> {
    type Item = T;
    type Iter<'a> = std::iter::Empty<T>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        std::iter::empty()
    }

    fn known_len(&self) -> Option<usize> {
        Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_yields_references() {
        let data = vec![1, 2, 3];
        let seq = from_slice(&data);
        assert_eq!(seq.to_vec(), vec![&1, &2, &3]);
        assert_eq!(seq.known_len(), Some(3));
    }

    #[test]
    fn owned_retraverses_from_start() {
        let seq = from_vec(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(seq.to_vec(), seq.to_vec());
    }

    #[test]
    fn from_iter_supports_infinite_ranges() {
        let naturals = from_iter(0u32..);
        assert_eq!(naturals.by_ref().take(3).to_vec(), vec![0, 1, 2]);
        assert_eq!(naturals.by_ref().take(2).to_vec(), vec![0, 1]);
    }

    #[test]
    fn range_counts_up() {
        assert_eq!(range(5, 3).unwrap().to_vec(), vec![5, 6, 7]);
        assert!(range(5, 0).unwrap().to_vec().is_empty());
    }

    #[test]
    fn range_reaches_i32_max() {
        let tail = range(i32::MAX, 1).unwrap();
        assert_eq!(tail.to_vec(), vec![i32::MAX]);
    }

    #[test]
    fn range_rejects_bad_counts() {
        assert_eq!(
            range(0, -1).unwrap_err(),
            QueryError::OutOfRange { argument: "count" }
        );
        assert!(range(i32::MAX, 2).is_err());
    }

    #[test]
    fn repeat_and_empty() {
        assert_eq!(repeat('z', 3).to_vec(), vec!['z', 'z', 'z']);
        assert_eq!(repeat('z', 0).known_len(), Some(0));
        assert!(empty::<u8>().to_vec().is_empty());
    }
}
