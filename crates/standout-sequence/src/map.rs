//! Projection nodes: `map`, `map_indexed` and the `flat_map` family.

use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::filter::advance_index;
use crate::sequence::Sequence;

/// Sequence of projected elements.
///
/// Created by [`Sequence::map`]. Mapping a `Map` again composes the two
/// projections into one node.
#[derive(Debug, Clone)]
pub struct Map<S, F> {
    source: S,
    selector: F,
}

impl<S, F> Map<S, F> {
    pub(crate) fn new(source: S, selector: F) -> Self {
        Map { source, selector }
    }
}

impl<S, F, B> Map<S, F>
where
    S: Sequence,
    F: Fn(S::Item) -> B,
{
    /// Composes `selector` after this node's projection.
    pub fn map<G, C>(self, selector: G) -> Map<S, impl Fn(S::Item) -> C>
    where
        G: Fn(B) -> C,
    {
        let first = self.selector;
        Map {
            source: self.source,
            selector: move |item: S::Item| selector(first(item)),
        }
    }
}

impl<S, F, B> Sequence for Map<S, F>
where
    S: Sequence,
    F: Fn(S::Item) -> B,
{
    type Item = B;
    type Iter<'a> = MapIter<'a, S::Iter<'a>, F>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        MapIter {
            inner: self.source.traverse(),
            selector: &self.selector,
        }
    }

    fn known_len(&self) -> Option<usize> {
        self.source.known_len()
    }
}

/// Iterator for [`Map`].
pub struct MapIter<'a, I, F> {
    inner: I,
    selector: &'a F,
}

impl<I: Clone, F> Clone for MapIter<'_, I, F> {
    fn clone(&self) -> Self {
        MapIter {
            inner: self.inner.clone(),
            selector: self.selector,
        }
    }
}

impl<I, F, B> Iterator for MapIter<'_, I, F>
where
    I: Iterator,
    F: Fn(I::Item) -> B,
{
    type Item = B;

    fn next(&mut self) -> Option<B> {
        self.inner.next().map(self.selector)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<I: FusedIterator, F: Fn(I::Item) -> B, B> FusedIterator for MapIter<'_, I, F> {}

/// Sequence of elements projected together with their index.
///
/// Created by [`Sequence::map_indexed`].
#[derive(Debug, Clone)]
pub struct MapIndexed<S, F> {
    source: S,
    selector: F,
}

impl<S, F> MapIndexed<S, F> {
    pub(crate) fn new(source: S, selector: F) -> Self {
        MapIndexed { source, selector }
    }
}

impl<S, F, B> Sequence for MapIndexed<S, F>
where
    S: Sequence,
    F: Fn(S::Item, usize) -> B,
{
    type Item = B;
    type Iter<'a> = MapIndexedIter<'a, S::Iter<'a>, F>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        MapIndexedIter {
            inner: self.source.traverse(),
            selector: &self.selector,
            index: None,
        }
    }

    fn known_len(&self) -> Option<usize> {
        self.source.known_len()
    }
}

/// Iterator for [`MapIndexed`].
pub struct MapIndexedIter<'a, I, F> {
    inner: I,
    selector: &'a F,
    index: Option<usize>,
}

impl<I, F, B> Iterator for MapIndexedIter<'_, I, F>
where
    I: Iterator,
    F: Fn(I::Item, usize) -> B,
{
    type Item = B;

    fn next(&mut self) -> Option<B> {
        let item = self.inner.next()?;
        let index = advance_index(&mut self.index);
        Some((self.selector)(item, index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Sequence that concatenates the collections produced for each element.
///
/// Created by [`Sequence::flat_map`].
#[derive(Debug, Clone)]
pub struct FlatMap<S, F> {
    source: S,
    selector: F,
}

impl<S, F> FlatMap<S, F> {
    pub(crate) fn new(source: S, selector: F) -> Self {
        FlatMap { source, selector }
    }
}

impl<S, F, U> Sequence for FlatMap<S, F>
where
    S: Sequence,
    F: Fn(S::Item) -> U,
    U: IntoIterator,
{
    type Item = U::Item;
    type Iter<'a> = std::iter::FlatMap<S::Iter<'a>, U, &'a F>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        self.source.traverse().flat_map(&self.selector)
    }
}

/// Index-aware variant of [`FlatMap`].
///
/// Created by [`Sequence::flat_map_indexed`].
#[derive(Debug, Clone)]
pub struct FlatMapIndexed<S, F> {
    source: S,
    selector: F,
}

impl<S, F> FlatMapIndexed<S, F> {
    pub(crate) fn new(source: S, selector: F) -> Self {
        FlatMapIndexed { source, selector }
    }
}

impl<S, F, U> Sequence for FlatMapIndexed<S, F>
where
    S: Sequence,
    F: Fn(S::Item, usize) -> U,
    U: IntoIterator,
{
    type Item = U::Item;
    type Iter<'a> = FlatMapIndexedIter<'a, S::Iter<'a>, F, U>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        FlatMapIndexedIter {
            outer: self.source.traverse(),
            selector: &self.selector,
            current: None,
            index: None,
        }
    }
}

/// Iterator for [`FlatMapIndexed`].
pub struct FlatMapIndexedIter<'a, I, F, U: IntoIterator> {
    outer: I,
    selector: &'a F,
    current: Option<U::IntoIter>,
    index: Option<usize>,
}

impl<I, F, U> Iterator for FlatMapIndexedIter<'_, I, F, U>
where
    I: Iterator,
    F: Fn(I::Item, usize) -> U,
    U: IntoIterator,
{
    type Item = U::Item;

    fn next(&mut self) -> Option<U::Item> {
        loop {
            if let Some(inner) = self.current.as_mut() {
                if let Some(item) = inner.next() {
                    return Some(item);
                }
                self.current = None;
            }
            let item = self.outer.next()?;
            let index = advance_index(&mut self.index);
            self.current = Some((self.selector)(item, index).into_iter());
        }
    }
}

/// Sequence pairing each element with every member of its derived collection.
///
/// Created by [`Sequence::flat_map_with`]; yields `result(&element, member)`.
pub struct FlatMapWith<S, F, R, U, T> {
    source: S,
    collection: F,
    result: R,
    _types: PhantomData<fn() -> (U, T)>,
}

impl<S, F, R, U, T> FlatMapWith<S, F, R, U, T> {
    pub(crate) fn new(source: S, collection: F, result: R) -> Self {
        FlatMapWith {
            source,
            collection,
            result,
            _types: PhantomData,
        }
    }
}

impl<S: Clone, F: Clone, R: Clone, U, T> Clone for FlatMapWith<S, F, R, U, T> {
    fn clone(&self) -> Self {
        FlatMapWith::new(
            self.source.clone(),
            self.collection.clone(),
            self.result.clone(),
        )
    }
}

impl<S: std::fmt::Debug, F, R, U, T> std::fmt::Debug for FlatMapWith<S, F, R, U, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlatMapWith")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<S, F, R, U, T> Sequence for FlatMapWith<S, F, R, U, T>
where
    S: Sequence,
    F: Fn(&S::Item) -> U,
    U: IntoIterator,
    R: Fn(&S::Item, U::Item) -> T,
{
    type Item = T;
    type Iter<'a> = FlatMapWithIter<'a, S::Iter<'a>, U, F, R, T>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        FlatMapWithIter {
            outer: self.source.traverse(),
            collection: &self.collection,
            result: &self.result,
            current: None,
            _result: PhantomData,
        }
    }
}

/// Iterator for [`FlatMapWith`].
pub struct FlatMapWithIter<'a, I: Iterator, U: IntoIterator, F, R, T> {
    outer: I,
    collection: &'a F,
    result: &'a R,
    current: Option<(I::Item, U::IntoIter)>,
    _result: PhantomData<fn() -> T>,
}

impl<I, U, F, R, T> Iterator for FlatMapWithIter<'_, I, U, F, R, T>
where
    I: Iterator,
    F: Fn(&I::Item) -> U,
    U: IntoIterator,
    R: Fn(&I::Item, U::Item) -> T,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            if let Some((item, members)) = self.current.as_mut() {
                if let Some(member) = members.next() {
                    return Some((self.result)(&*item, member));
                }
            }
            let item = self.outer.next()?;
            let members = (self.collection)(&item).into_iter();
            self.current = Some((item, members));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{from_iter, from_vec};

    #[test]
    fn map_squares() {
        assert_eq!(
            from_vec(vec![1, 2, 3]).map(|x| x * x).to_vec(),
            vec![1, 4, 9]
        );
    }

    #[test]
    fn map_preserves_known_len() {
        let seq = from_vec(vec![1, 2, 3]).map(|x| x + 1).map(|x| x * 2);
        assert_eq!(seq.known_len(), Some(3));
        assert_eq!(seq.to_vec(), vec![4, 6, 8]);
    }

    #[test]
    fn map_indexed_pairs_index() {
        let letters = from_vec(vec!["a", "b"]);
        let seq = letters.map_indexed(|s, i| format!("{i}:{s}"));
        assert_eq!(seq.to_vec(), vec!["0:a", "1:b"]);
    }

    #[test]
    fn map_over_infinite_source_is_lazy() {
        let seq = from_iter(1u64..).map(|x| x * 2);
        assert_eq!(seq.take(3).to_vec(), vec![2, 4, 6]);
    }

    #[test]
    fn flat_map_concatenates() {
        let seq = from_vec(vec![1, 2, 3]).flat_map(|n| vec![n; n]);
        assert_eq!(seq.to_vec(), vec![1, 2, 2, 3, 3, 3]);
    }

    #[test]
    fn flat_map_skips_empty_collections() {
        let seq = from_vec(vec![0usize, 2, 0, 1]).flat_map(|n| 0..n);
        assert_eq!(seq.to_vec(), vec![0, 1, 0]);
    }

    #[test]
    fn flat_map_indexed_passes_outer_index() {
        let letters = from_vec(vec!['x', 'y']);
        let seq = letters.flat_map_indexed(|c, i| vec![c; i + 1]);
        assert_eq!(seq.to_vec(), vec!['x', 'y', 'y']);
    }

    #[test]
    fn flat_map_with_projects_pairs() {
        let owners = from_vec(vec![("ann", vec!["cat", "dog"]), ("bob", vec![])]);
        let pets = owners.flat_map_with(
            |owner| owner.1.clone(),
            |owner, pet| format!("{}-{}", owner.0, pet),
        );
        assert_eq!(pets.to_vec(), vec!["ann-cat", "ann-dog"]);
    }

    #[test]
    fn flat_map_with_clones_and_debugs() {
        let tens = from_vec(vec![1u8, 2]);
        let pets = tens.flat_map_with(|n| 0..*n, |n, m| n * 10 + m);
        let copy = pets.clone();
        assert_eq!(copy.to_vec(), pets.to_vec());
        assert_eq!(copy.to_vec(), vec![10, 20, 21]);
        assert!(format!("{pets:?}").starts_with("FlatMapWith"));
    }
}
