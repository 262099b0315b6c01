//! Lazy set algebra: `distinct`, `union`, `intersect`, `except`.
//!
//! Every node walks its upstream incrementally and consults a [`Set`] built
//! during that traversal, so elements appear as soon as they are known to
//! qualify. `distinct` over an infinite sequence is itself infinite.

use crate::comparer::{DefaultEq, EqualityComparer};
use crate::sequence::Sequence;
use crate::set::Set;

/// Elements of a sequence with duplicates removed, in first-occurrence order.
///
/// Created by [`Sequence::distinct`].
#[derive(Debug, Clone)]
pub struct Distinct<S, C = DefaultEq> {
    source: S,
    comparer: C,
}

impl<S> Distinct<S> {
    pub(crate) fn new(source: S) -> Self {
        Distinct {
            source,
            comparer: DefaultEq,
        }
    }
}

impl<S, C> Distinct<S, C> {
    /// Replaces the equality comparer.
    pub fn with_comparer<C2>(self, comparer: C2) -> Distinct<S, C2> {
        Distinct {
            source: self.source,
            comparer,
        }
    }
}

impl<S, C> Sequence for Distinct<S, C>
where
    S: Sequence,
    S::Item: Clone,
    C: EqualityComparer<S::Item>,
{
    type Item = S::Item;
    type Iter<'a> = DistinctIter<'a, S::Iter<'a>, C>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        DistinctIter {
            inner: self.source.traverse(),
            seen: Set::new(&self.comparer),
        }
    }
}

/// Iterator for [`Distinct`] and [`Union`].
pub struct DistinctIter<'a, I: Iterator, C> {
    inner: I,
    seen: Set<I::Item, &'a C>,
}

impl<I, C> Iterator for DistinctIter<'_, I, C>
where
    I: Iterator,
    I::Item: Clone,
    C: EqualityComparer<I::Item>,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        let seen = &mut self.seen;
        self.inner.find(|item| seen.add(item.clone()))
    }
}

/// Distinct elements of two sequences, first sequence first.
///
/// Created by [`Sequence::union`].
#[derive(Debug, Clone)]
pub struct Union<A, B, C = DefaultEq> {
    first: A,
    second: B,
    comparer: C,
}

impl<A, B> Union<A, B> {
    pub(crate) fn new(first: A, second: B) -> Self {
        Union {
            first,
            second,
            comparer: DefaultEq,
        }
    }
}

impl<A, B, C> Union<A, B, C> {
    /// Replaces the equality comparer.
    pub fn with_comparer<C2>(self, comparer: C2) -> Union<A, B, C2> {
        Union {
            first: self.first,
            second: self.second,
            comparer,
        }
    }
}

impl<A, B, C> Sequence for Union<A, B, C>
where
    A: Sequence,
    B: Sequence<Item = A::Item>,
    A::Item: Clone,
    C: EqualityComparer<A::Item>,
{
    type Item = A::Item;
    type Iter<'a> = DistinctIter<'a, std::iter::Chain<A::Iter<'a>, B::Iter<'a>>, C>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        DistinctIter {
            inner: self.first.traverse().chain(self.second.traverse()),
            seen: Set::new(&self.comparer),
        }
    }
}

/// Distinct elements of the first sequence that also appear in the second.
///
/// Created by [`Sequence::intersect`]. The second sequence is read into a
/// set at the first advance.
#[derive(Debug, Clone)]
pub struct Intersect<A, B, C = DefaultEq> {
    first: A,
    second: B,
    comparer: C,
}

impl<A, B> Intersect<A, B> {
    pub(crate) fn new(first: A, second: B) -> Self {
        Intersect {
            first,
            second,
            comparer: DefaultEq,
        }
    }
}

impl<A, B, C> Intersect<A, B, C> {
    /// Replaces the equality comparer.
    pub fn with_comparer<C2>(self, comparer: C2) -> Intersect<A, B, C2> {
        Intersect {
            first: self.first,
            second: self.second,
            comparer,
        }
    }
}

impl<A, B, C> Sequence for Intersect<A, B, C>
where
    A: Sequence,
    B: Sequence<Item = A::Item>,
    C: EqualityComparer<A::Item>,
{
    type Item = A::Item;
    type Iter<'a> = IntersectIter<'a, A, B, C>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        IntersectIter {
            node: self,
            inner: self.first.traverse(),
            probe: None,
        }
    }
}

/// Iterator for [`Intersect`].
pub struct IntersectIter<'a, A: Sequence, B, C> {
    node: &'a Intersect<A, B, C>,
    inner: A::Iter<'a>,
    probe: Option<Set<A::Item, &'a C>>,
}

impl<'a, A, B, C> Iterator for IntersectIter<'a, A, B, C>
where
    A: Sequence,
    B: Sequence<Item = A::Item>,
    C: EqualityComparer<A::Item>,
{
    type Item = A::Item;

    fn next(&mut self) -> Option<A::Item> {
        let node = self.node;
        let probe = self
            .probe
            .get_or_insert_with(|| seeded_set(&node.second, &node.comparer));
        self.inner.find(|item| probe.remove(item))
    }
}

/// Distinct elements of the first sequence that do not appear in the second.
///
/// Created by [`Sequence::except`]. The second sequence is read into a set
/// at the first advance.
#[derive(Debug, Clone)]
pub struct Except<A, B, C = DefaultEq> {
    first: A,
    second: B,
    comparer: C,
}

impl<A, B> Except<A, B> {
    pub(crate) fn new(first: A, second: B) -> Self {
        Except {
            first,
            second,
            comparer: DefaultEq,
        }
    }
}

impl<A, B, C> Except<A, B, C> {
    /// Replaces the equality comparer.
    pub fn with_comparer<C2>(self, comparer: C2) -> Except<A, B, C2> {
        Except {
            first: self.first,
            second: self.second,
            comparer,
        }
    }
}

impl<A, B, C> Sequence for Except<A, B, C>
where
    A: Sequence,
    B: Sequence<Item = A::Item>,
    A::Item: Clone,
    C: EqualityComparer<A::Item>,
{
    type Item = A::Item;
    type Iter<'a> = ExceptIter<'a, A, B, C>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        ExceptIter {
            node: self,
            inner: self.first.traverse(),
            seen: None,
        }
    }
}

/// Iterator for [`Except`].
pub struct ExceptIter<'a, A: Sequence, B, C> {
    node: &'a Except<A, B, C>,
    inner: A::Iter<'a>,
    seen: Option<Set<A::Item, &'a C>>,
}

impl<'a, A, B, C> Iterator for ExceptIter<'a, A, B, C>
where
    A: Sequence,
    B: Sequence<Item = A::Item>,
    A::Item: Clone,
    C: EqualityComparer<A::Item>,
{
    type Item = A::Item;

    fn next(&mut self) -> Option<A::Item> {
        let node = self.node;
        let seen = self
            .seen
            .get_or_insert_with(|| seeded_set(&node.second, &node.comparer));
        self.inner.find(|item| seen.add(item.clone()))
    }
}

fn seeded_set<'a, S, C>(source: &'a S, comparer: &'a C) -> Set<S::Item, &'a C>
where
    S: Sequence,
    C: EqualityComparer<S::Item>,
{
    let mut set = Set::new(comparer);
    for item in source.traverse() {
        set.add(item);
    }
    set
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::comparer::by_key;
    use crate::source::{from_iter, from_vec, generate};

    #[test]
    fn distinct_keeps_first_occurrence_order() {
        let seq = from_vec(vec![3, 1, 3, 2, 1, 4]).distinct();
        assert_eq!(seq.to_vec(), vec![3, 1, 2, 4]);
    }

    #[test]
    fn distinct_is_lazy_over_infinite_input() {
        let seq = from_iter((0u64..).map(|n| n / 2)).distinct();
        assert_eq!(seq.take(4).to_vec(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn distinct_with_comparer() {
        let seq = from_vec(vec!["a", "A", "b", "B", "a"])
            .distinct()
            .with_comparer(by_key(|s: &&str| s.to_ascii_lowercase()));
        assert_eq!(seq.to_vec(), vec!["a", "b"]);
    }

    #[test]
    fn union_deduplicates_across_inputs() {
        let seq = from_vec(vec![1, 2, 2, 3]).union(from_vec(vec![3, 4, 1, 5]));
        assert_eq!(seq.to_vec(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn intersect_yields_each_match_once() {
        let others = from_vec(vec![2, 4, 4, 6]);
        let seq = from_vec(vec![1, 2, 2, 3, 4]).intersect(others);
        assert_eq!(seq.to_vec(), vec![2, 4]);
    }

    #[test]
    fn except_removes_second_and_duplicates() {
        let seq = from_vec(vec![1, 2, 2, 3, 4, 1]).except(from_vec(vec![4]));
        assert_eq!(seq.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn second_input_is_read_on_first_advance() {
        let reads = Cell::new(0);
        let second = generate(|| {
            reads.set(reads.get() + 1);
            vec![1, 2]
        });
        let seq = from_vec(vec![2, 3]).except(&second);
        let mut iter = seq.traverse();
        assert_eq!(reads.get(), 0);
        assert_eq!(iter.next(), Some(3));
        assert_eq!(reads.get(), 1);
    }

    #[test]
    fn traversals_are_independent() {
        let seq = from_vec(vec![1, 1, 2]).distinct();
        let mut first = seq.traverse();
        let mut second = seq.traverse();
        assert_eq!(first.next(), Some(1));
        assert_eq!(second.next(), Some(1));
        assert_eq!(first.next(), Some(2));
        assert_eq!(second.next(), Some(2));
    }
}
