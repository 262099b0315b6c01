//! Fused filter and filter-then-map nodes.
//!
//! Chaining `filter` on a [`Filter`] conjoins the predicates into a single
//! node, and `map` on a [`Filter`] produces a [`FilterMap`] that filters and
//! projects in one pass. Any other chain nests nodes, which behaves the same.

use std::iter::FusedIterator;

use crate::error::QueryError;
use crate::sequence::Sequence;

/// Returns the index for the next element, given the last index handed out.
///
/// Panics with the overflow message once indices would exceed `usize::MAX`.
pub(crate) fn advance_index(last: &mut Option<usize>) -> usize {
    let next = match *last {
        None => 0,
        Some(index) => index
            .checked_add(1)
            .unwrap_or_else(|| panic!("{}", QueryError::Overflow)),
    };
    *last = Some(next);
    next
}

/// Sequence of the elements that satisfy a predicate.
///
/// Created by [`Sequence::filter`].
#[derive(Debug, Clone)]
pub struct Filter<S, P> {
    source: S,
    predicate: P,
}

impl<S, P> Filter<S, P> {
    pub(crate) fn new(source: S, predicate: P) -> Self {
        Filter { source, predicate }
    }
}

impl<S, P> Filter<S, P>
where
    S: Sequence,
    P: Fn(&S::Item) -> bool,
{
    /// Adds another predicate to this node.
    ///
    /// The existing predicate runs first; `predicate` only sees elements that
    /// passed it.
    pub fn filter<Q>(self, predicate: Q) -> Filter<S, impl Fn(&S::Item) -> bool>
    where
        Q: Fn(&S::Item) -> bool,
    {
        let first = self.predicate;
        Filter {
            source: self.source,
            predicate: move |item: &S::Item| first(item) && predicate(item),
        }
    }

    /// Projects the surviving elements in the same pass.
    pub fn map<F, B>(self, selector: F) -> FilterMap<S, P, F>
    where
        F: Fn(S::Item) -> B,
    {
        FilterMap {
            source: self.source,
            predicate: self.predicate,
            selector,
        }
    }
}

impl<S, P> Sequence for Filter<S, P>
where
    S: Sequence,
    P: Fn(&S::Item) -> bool,
{
    type Item = S::Item;
    type Iter<'a> = FilterIter<'a, S::Iter<'a>, P>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        FilterIter {
            inner: self.source.traverse(),
            predicate: &self.predicate,
        }
    }
}

/// Iterator for [`Filter`].
pub struct FilterIter<'a, I, P> {
    inner: I,
    predicate: &'a P,
}

impl<I: Clone, P> Clone for FilterIter<'_, I, P> {
    fn clone(&self) -> Self {
        FilterIter {
            inner: self.inner.clone(),
            predicate: self.predicate,
        }
    }
}

impl<I, P> Iterator for FilterIter<'_, I, P>
where
    I: Iterator,
    P: Fn(&I::Item) -> bool,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        let predicate = self.predicate;
        self.inner.find(|item| predicate(item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

impl<I: FusedIterator, P: Fn(&I::Item) -> bool> FusedIterator for FilterIter<'_, I, P> {}

/// Sequence of the elements that satisfy an index-aware predicate.
///
/// Created by [`Sequence::filter_indexed`].
#[derive(Debug, Clone)]
pub struct FilterIndexed<S, P> {
    source: S,
    predicate: P,
}

impl<S, P> FilterIndexed<S, P> {
    pub(crate) fn new(source: S, predicate: P) -> Self {
        FilterIndexed { source, predicate }
    }
}

impl<S, P> Sequence for FilterIndexed<S, P>
where
    S: Sequence,
    P: Fn(&S::Item, usize) -> bool,
{
    type Item = S::Item;
    type Iter<'a> = FilterIndexedIter<'a, S::Iter<'a>, P>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        FilterIndexedIter {
            inner: self.source.traverse(),
            predicate: &self.predicate,
            index: None,
        }
    }
}

/// Iterator for [`FilterIndexed`].
pub struct FilterIndexedIter<'a, I, P> {
    inner: I,
    predicate: &'a P,
    index: Option<usize>,
}

impl<I: Clone, P> Clone for FilterIndexedIter<'_, I, P> {
    fn clone(&self) -> Self {
        FilterIndexedIter {
            inner: self.inner.clone(),
            predicate: self.predicate,
            index: self.index,
        }
    }
}

impl<I, P> Iterator for FilterIndexedIter<'_, I, P>
where
    I: Iterator,
    P: Fn(&I::Item, usize) -> bool,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        for item in self.inner.by_ref() {
            let index = advance_index(&mut self.index);
            if (self.predicate)(&item, index) {
                return Some(item);
            }
        }
        None
    }
}

/// Filter and projection fused into one node.
///
/// Created by calling `map` on a [`Filter`].
#[derive(Debug, Clone)]
pub struct FilterMap<S, P, F> {
    source: S,
    predicate: P,
    selector: F,
}

impl<S, P, F, B> FilterMap<S, P, F>
where
    S: Sequence,
    P: Fn(&S::Item) -> bool,
    F: Fn(S::Item) -> B,
{
    /// Composes another projection onto this node.
    pub fn map<G, C>(self, selector: G) -> FilterMap<S, P, impl Fn(S::Item) -> C>
    where
        G: Fn(B) -> C,
    {
        let first = self.selector;
        FilterMap {
            source: self.source,
            predicate: self.predicate,
            selector: move |item: S::Item| selector(first(item)),
        }
    }
}

impl<S, P, F, B> Sequence for FilterMap<S, P, F>
where
    S: Sequence,
    P: Fn(&S::Item) -> bool,
    F: Fn(S::Item) -> B,
{
    type Item = B;
    type Iter<'a> = FilterMapIter<'a, S::Iter<'a>, P, F>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        FilterMapIter {
            inner: self.source.traverse(),
            predicate: &self.predicate,
            selector: &self.selector,
        }
    }
}

/// Iterator for [`FilterMap`].
pub struct FilterMapIter<'a, I, P, F> {
    inner: I,
    predicate: &'a P,
    selector: &'a F,
}

impl<I: Clone, P, F> Clone for FilterMapIter<'_, I, P, F> {
    fn clone(&self) -> Self {
        FilterMapIter {
            inner: self.inner.clone(),
            predicate: self.predicate,
            selector: self.selector,
        }
    }
}

impl<I, P, F, B> Iterator for FilterMapIter<'_, I, P, F>
where
    I: Iterator,
    P: Fn(&I::Item) -> bool,
    F: Fn(I::Item) -> B,
{
    type Item = B;

    fn next(&mut self) -> Option<B> {
        let predicate = self.predicate;
        self.inner.find(|item| predicate(item)).map(self.selector)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::source::from_vec;

    #[test]
    fn filter_keeps_matching_in_order() {
        let evens = from_vec(vec![1, 2, 3, 4, 5]).filter(|x| x % 2 == 0);
        assert_eq!(evens.to_vec(), vec![2, 4]);
    }

    #[test]
    fn chained_filters_short_circuit_in_declaration_order() {
        let calls = RefCell::new(Vec::new());
        let seq = from_vec(vec![1, 2, 3, 4])
            .filter(|x| {
                calls.borrow_mut().push(("first", *x));
                x % 2 == 0
            })
            .filter(|x| {
                calls.borrow_mut().push(("second", *x));
                *x > 2
            });

        assert_eq!(seq.to_vec(), vec![4]);
        assert_eq!(
            *calls.borrow(),
            vec![
                ("first", 1),
                ("first", 2),
                ("second", 2),
                ("first", 3),
                ("first", 4),
                ("second", 4),
            ]
        );
    }

    #[test]
    fn filter_then_map_fuses_and_composes() {
        let seq = from_vec(vec![1, 2, 3, 4, 5, 6])
            .filter(|x| x % 3 == 0)
            .map(|x| x * 10)
            .map(|x| x + 1);
        assert_eq!(seq.to_vec(), vec![31, 61]);
    }

    #[test]
    fn indexed_filter_numbers_from_zero() {
        let letters = from_vec(vec!['a', 'b', 'c', 'd']);
        let seq = letters.filter_indexed(|_, i| i % 2 == 1);
        assert_eq!(seq.to_vec(), vec!['b', 'd']);
    }

    #[test]
    fn indexed_filter_restarts_numbering_per_traversal() {
        let seq = from_vec(vec![10, 20, 30]).filter_indexed(|_, i| i == 0);
        assert_eq!(seq.to_vec(), vec![10]);
        assert_eq!(seq.to_vec(), vec![10]);
    }

    #[test]
    fn cloned_iterator_forks_cursor() {
        let seq = from_vec(vec![1, 2, 3, 4]).filter(|x| *x != 2);
        let mut first = seq.traverse();
        assert_eq!(first.next(), Some(1));
        let second = first.clone();
        assert_eq!(first.collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(second.collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn advance_index_counts_up() {
        let mut last = None;
        assert_eq!(advance_index(&mut last), 0);
        assert_eq!(advance_index(&mut last), 1);
        assert_eq!(last, Some(1));
    }

    #[test]
    #[should_panic(expected = "overflow")]
    fn advance_index_panics_past_max() {
        let mut last = Some(usize::MAX);
        advance_index(&mut last);
    }
}
