//! The [`Sequence`] trait: a repeatably traversable source plus every
//! operator as a provided method.
//!
//! Composing operators (`filter`, `map`, `join`, `order_by`, ...) take the
//! sequence by value and return a new lazy node. Terminal operators
//! (`to_vec`, `first`, `sum`, ...) borrow it and traverse it once per call.
//! Use [`Sequence::by_ref`] to compose over a borrowed sequence.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::aggregate::{self, Numeric};
use crate::buffer::Buffer;
use crate::combine::{Cast, Concat, DefaultIfEmpty, OfType, Reverse, Zip};
use crate::comparer::{Comparer, DefaultEq, DefaultOrd, EqualityComparer};
use crate::error::{QueryError, Result};
use crate::filter::{Filter, FilterIndexed};
use crate::join::{GroupBy, GroupJoin, Identity, Join};
use crate::lookup::Lookup;
use crate::map::{FlatMap, FlatMapIndexed, FlatMapWith, Map, MapIndexed};
use crate::ordering::{Dir, Ordered, SortKey};
use crate::partition::{Skip, SkipWhile, SkipWhileIndexed, Take, TakeWhile, TakeWhileIndexed};
use crate::set_ops::{Distinct, Except, Intersect, Union};

/// A sequence that can be traversed any number of times.
///
/// Each call to [`traverse`](Sequence::traverse) returns an independent
/// iterator positioned at the start. Iterators borrow the sequence's
/// configuration and own their cursor state, so traversals may be
/// interleaved freely.
///
/// ```
/// use standout_sequence::{from_vec, Sequence};
///
/// let evens = from_vec(vec![1, 2, 3, 4, 5]).filter(|n| n % 2 == 0);
///
/// let mut first = evens.traverse();
/// let mut second = evens.traverse();
/// assert_eq!(first.next(), Some(2));
/// assert_eq!(second.next(), Some(2));
/// assert_eq!(first.next(), Some(4));
/// ```
pub trait Sequence {
    /// Element type.
    type Item;

    /// Iterator returned by [`traverse`](Sequence::traverse).
    type Iter<'a>: Iterator<Item = Self::Item>
    where
        Self: 'a;

    /// Starts a fresh traversal.
    fn traverse(&self) -> Self::Iter<'_>;

    /// Exact element count when it is known without traversing.
    fn known_len(&self) -> Option<usize> {
        None
    }

    /// Borrows the sequence so composing operators do not consume it.
    fn by_ref(&self) -> &Self {
        self
    }

    // ========================================================================
    // Filtering and projection
    // ========================================================================

    /// Elements for which `predicate` holds.
    fn filter<P>(self, predicate: P) -> Filter<Self, P>
    where
        Self: Sized,
        P: Fn(&Self::Item) -> bool,
    {
        Filter::new(self, predicate)
    }

    /// Elements for which `predicate(element, index)` holds.
    fn filter_indexed<P>(self, predicate: P) -> FilterIndexed<Self, P>
    where
        Self: Sized,
        P: Fn(&Self::Item, usize) -> bool,
    {
        FilterIndexed::new(self, predicate)
    }

    /// Projects each element.
    fn map<F, B>(self, selector: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Item) -> B,
    {
        Map::new(self, selector)
    }

    /// Projects each element together with its index.
    fn map_indexed<F, B>(self, selector: F) -> MapIndexed<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Item, usize) -> B,
    {
        MapIndexed::new(self, selector)
    }

    /// Concatenates the collections `selector` produces for each element.
    fn flat_map<F, U>(self, selector: F) -> FlatMap<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Item) -> U,
        U: IntoIterator,
    {
        FlatMap::new(self, selector)
    }

    /// Index-aware [`flat_map`](Sequence::flat_map).
    fn flat_map_indexed<F, U>(self, selector: F) -> FlatMapIndexed<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Item, usize) -> U,
        U: IntoIterator,
    {
        FlatMapIndexed::new(self, selector)
    }

    /// Yields `result(&element, member)` for every member of `collection(&element)`.
    fn flat_map_with<F, R, U, T>(self, collection: F, result: R) -> FlatMapWith<Self, F, R, U, T>
    where
        Self: Sized,
        F: Fn(&Self::Item) -> U,
        U: IntoIterator,
        R: Fn(&Self::Item, U::Item) -> T,
    {
        FlatMapWith::new(self, collection, result)
    }

    // ========================================================================
    // Set operations
    // ========================================================================

    /// Distinct elements in first-occurrence order.
    fn distinct(self) -> Distinct<Self>
    where
        Self: Sized,
        Self::Item: Clone,
    {
        Distinct::new(self)
    }

    /// Distinct elements of `self` followed by those of `other`.
    fn union<B>(self, other: B) -> Union<Self, B>
    where
        Self: Sized,
        B: Sequence<Item = Self::Item>,
    {
        Union::new(self, other)
    }

    /// Distinct elements of `self` that also occur in `other`.
    fn intersect<B>(self, other: B) -> Intersect<Self, B>
    where
        Self: Sized,
        B: Sequence<Item = Self::Item>,
    {
        Intersect::new(self, other)
    }

    /// Distinct elements of `self` that do not occur in `other`.
    fn except<B>(self, other: B) -> Except<Self, B>
    where
        Self: Sized,
        B: Sequence<Item = Self::Item>,
    {
        Except::new(self, other)
    }

    // ========================================================================
    // Joining and grouping
    // ========================================================================

    /// Inner equijoin with `inner` on `outer_key(&o) == inner_key(&i)`.
    ///
    /// ```
    /// use standout_sequence::{from_vec, Sequence};
    ///
    /// let orders = from_vec(vec![(1, "tea"), (2, "cake"), (1, "jam")]);
    /// let customers = from_vec(vec![(1, "ann"), (3, "cid")]);
    ///
    /// let joined = customers.join(orders, |c| c.0, |o| o.0, |c, o| format!("{}:{}", c.1, o.1));
    /// assert_eq!(joined.to_vec(), vec!["ann:tea", "ann:jam"]);
    /// ```
    fn join<I, OK, IK, R, K, T>(
        self,
        inner: I,
        outer_key: OK,
        inner_key: IK,
        result: R,
    ) -> Join<Self, I, OK, IK, R>
    where
        Self: Sized,
        I: Sequence,
        OK: Fn(&Self::Item) -> K,
        IK: Fn(&I::Item) -> K,
        R: Fn(&Self::Item, &I::Item) -> T,
    {
        Join::new(self, inner, outer_key, inner_key, result)
    }

    /// One `result(outer, matches)` per outer element; `matches` may be empty.
    fn group_join<I, OK, IK, R, K, T>(
        self,
        inner: I,
        outer_key: OK,
        inner_key: IK,
        result: R,
    ) -> GroupJoin<Self, I, OK, IK, R>
    where
        Self: Sized,
        I: Sequence,
        OK: Fn(&Self::Item) -> K,
        IK: Fn(&I::Item) -> K,
        R: Fn(Self::Item, &[I::Item]) -> T,
    {
        GroupJoin::new(self, inner, outer_key, inner_key, result)
    }

    /// Groups elements by key in first-occurrence order.
    fn group_by<KF, K>(self, key_selector: KF) -> GroupBy<Self, KF, Identity<Self::Item>>
    where
        Self: Sized,
        KF: Fn(&Self::Item) -> K,
    {
        GroupBy::new(self, key_selector)
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    /// Stable ascending sort by `selector`.
    fn order_by<F, K>(self, selector: F) -> Ordered<Self, SortKey<F, K, DefaultOrd>>
    where
        Self: Sized,
        F: Fn(&Self::Item) -> K,
        K: Ord,
    {
        Ordered::new(self, selector, Dir::Asc)
    }

    /// Stable descending sort by `selector`.
    fn order_by_descending<F, K>(self, selector: F) -> Ordered<Self, SortKey<F, K, DefaultOrd>>
    where
        Self: Sized,
        F: Fn(&Self::Item) -> K,
        K: Ord,
    {
        Ordered::new(self, selector, Dir::Desc)
    }

    /// Stable sort by `selector` under `comparer` in direction `dir`.
    fn order_by_with<F, K, C>(
        self,
        selector: F,
        comparer: C,
        dir: Dir,
    ) -> Ordered<Self, SortKey<F, K, C>>
    where
        Self: Sized,
        F: Fn(&Self::Item) -> K,
        C: Comparer<K>,
    {
        Ordered::with_key(self, selector, comparer, dir)
    }

    // ========================================================================
    // Partitioning
    // ========================================================================

    /// The first `count` elements.
    fn take(self, count: usize) -> Take<Self>
    where
        Self: Sized,
    {
        Take::new(self, count)
    }

    /// Everything after the first `count` elements.
    fn skip(self, count: usize) -> Skip<Self>
    where
        Self: Sized,
    {
        Skip::new(self, count)
    }

    /// Elements up to the first one failing `predicate`.
    fn take_while<P>(self, predicate: P) -> TakeWhile<Self, P>
    where
        Self: Sized,
        P: Fn(&Self::Item) -> bool,
    {
        TakeWhile::new(self, predicate)
    }

    /// Elements from the first one failing `predicate` onwards.
    fn skip_while<P>(self, predicate: P) -> SkipWhile<Self, P>
    where
        Self: Sized,
        P: Fn(&Self::Item) -> bool,
    {
        SkipWhile::new(self, predicate)
    }

    /// Index-aware [`take_while`](Sequence::take_while).
    fn take_while_indexed<P>(self, predicate: P) -> TakeWhileIndexed<Self, P>
    where
        Self: Sized,
        P: Fn(&Self::Item, usize) -> bool,
    {
        TakeWhileIndexed::new(self, predicate)
    }

    /// Index-aware [`skip_while`](Sequence::skip_while).
    fn skip_while_indexed<P>(self, predicate: P) -> SkipWhileIndexed<Self, P>
    where
        Self: Sized,
        P: Fn(&Self::Item, usize) -> bool,
    {
        SkipWhileIndexed::new(self, predicate)
    }

    // ========================================================================
    // Combining
    // ========================================================================

    /// `self` followed by `other`.
    fn concat<B>(self, other: B) -> Concat<Self, B>
    where
        Self: Sized,
        B: Sequence<Item = Self::Item>,
    {
        Concat::new(self, other)
    }

    /// `combine(a, b)` for pairs drawn in lockstep; stops at the shorter input.
    fn zip<B, F, T>(self, other: B, combine: F) -> Zip<Self, B, F>
    where
        Self: Sized,
        B: Sequence,
        F: Fn(Self::Item, B::Item) -> T,
    {
        Zip::new(self, other, combine)
    }

    /// Elements in reverse order.
    fn reverse(self) -> Reverse<Self>
    where
        Self: Sized,
    {
        Reverse::new(self)
    }

    /// The elements, or just `fallback` if there are none.
    fn default_if_empty(self, fallback: Self::Item) -> DefaultIfEmpty<Self, Self::Item>
    where
        Self: Sized,
        Self::Item: Clone,
    {
        DefaultIfEmpty::new(self, fallback)
    }

    /// Elements converted to `U` with [`Into`].
    fn cast<U>(self) -> Cast<Self, U>
    where
        Self: Sized,
        Self::Item: Into<U>,
    {
        Cast::new(self)
    }

    /// Elements that convert to `U` with [`TryFrom`].
    fn of_type<U>(self) -> OfType<Self, U>
    where
        Self: Sized,
        U: TryFrom<Self::Item>,
    {
        OfType::new(self)
    }

    // ========================================================================
    // Materialization
    // ========================================================================

    /// Collects every element into a vector.
    fn to_vec(&self) -> Vec<Self::Item> {
        Buffer::from_sequence(self).into_vec()
    }

    /// Groups every element by key into a [`Lookup`].
    fn to_lookup<F, K>(&self, key_selector: F) -> Lookup<K, Self::Item>
    where
        F: Fn(&Self::Item) -> K,
        K: Hash + Eq,
    {
        Lookup::create(self, key_selector, |item| item, DefaultEq)
    }

    /// [`to_lookup`](Sequence::to_lookup) with projected elements and a custom comparer.
    fn to_lookup_with<F, K, EF, E, C>(
        &self,
        key_selector: F,
        element_selector: EF,
        comparer: C,
    ) -> Lookup<K, E, C>
    where
        F: Fn(&Self::Item) -> K,
        EF: Fn(Self::Item) -> E,
        C: EqualityComparer<K>,
    {
        Lookup::create(self, key_selector, element_selector, comparer)
    }

    /// Collects into a map; fails with [`QueryError::DuplicateKey`] if two
    /// elements share a key.
    fn to_map<KF, VF, K, V>(&self, key_selector: KF, value_selector: VF) -> Result<FxHashMap<K, V>>
    where
        KF: Fn(&Self::Item) -> K,
        VF: Fn(Self::Item) -> V,
        K: Hash + Eq,
    {
        let mut map = FxHashMap::with_capacity_and_hasher(
            self.known_len().unwrap_or(0),
            Default::default(),
        );
        for item in self.traverse() {
            match map.entry(key_selector(&item)) {
                Entry::Occupied(_) => return Err(QueryError::DuplicateKey),
                Entry::Vacant(slot) => {
                    slot.insert(value_selector(item));
                }
            }
        }
        Ok(map)
    }

    // ========================================================================
    // Element access
    // ========================================================================

    /// The first element.
    fn first(&self) -> Result<Self::Item> {
        self.traverse().next().ok_or(QueryError::NoElements)
    }

    /// The first element, or the default value if there is none.
    fn first_or_default(&self) -> Self::Item
    where
        Self::Item: Default,
    {
        self.traverse().next().unwrap_or_default()
    }

    /// The first element satisfying `predicate`.
    fn first_where<P>(&self, predicate: P) -> Result<Self::Item>
    where
        P: Fn(&Self::Item) -> bool,
    {
        self.traverse()
            .find(|item| predicate(item))
            .ok_or(QueryError::NoMatch)
    }

    /// The first element satisfying `predicate`, or the default value.
    fn first_where_or_default<P>(&self, predicate: P) -> Self::Item
    where
        P: Fn(&Self::Item) -> bool,
        Self::Item: Default,
    {
        self.traverse()
            .find(|item| predicate(item))
            .unwrap_or_default()
    }

    /// The last element.
    fn last(&self) -> Result<Self::Item> {
        self.traverse().last().ok_or(QueryError::NoElements)
    }

    /// The last element, or the default value if there is none.
    fn last_or_default(&self) -> Self::Item
    where
        Self::Item: Default,
    {
        self.traverse().last().unwrap_or_default()
    }

    /// The last element satisfying `predicate`.
    fn last_where<P>(&self, predicate: P) -> Result<Self::Item>
    where
        P: Fn(&Self::Item) -> bool,
    {
        self.traverse()
            .filter(|item| predicate(item))
            .last()
            .ok_or(QueryError::NoMatch)
    }

    /// The last element satisfying `predicate`, or the default value.
    fn last_where_or_default<P>(&self, predicate: P) -> Self::Item
    where
        P: Fn(&Self::Item) -> bool,
        Self::Item: Default,
    {
        self.traverse()
            .filter(|item| predicate(item))
            .last()
            .unwrap_or_default()
    }

    /// The only element.
    ///
    /// Fails with [`QueryError::NoElements`] when empty and with
    /// [`QueryError::MoreThanOneElement`] as soon as a second element appears.
    fn single(&self) -> Result<Self::Item> {
        let mut iter = self.traverse();
        let only = iter.next().ok_or(QueryError::NoElements)?;
        match iter.next() {
            Some(_) => Err(QueryError::MoreThanOneElement),
            None => Ok(only),
        }
    }

    /// The only element, or the default value when empty.
    fn single_or_default(&self) -> Result<Self::Item>
    where
        Self::Item: Default,
    {
        let mut iter = self.traverse();
        match (iter.next(), iter.next()) {
            (None, _) => Ok(Self::Item::default()),
            (Some(only), None) => Ok(only),
            (Some(_), Some(_)) => Err(QueryError::MoreThanOneElement),
        }
    }

    /// The only element satisfying `predicate`.
    ///
    /// Stops at the second match.
    fn single_where<P>(&self, predicate: P) -> Result<Self::Item>
    where
        P: Fn(&Self::Item) -> bool,
    {
        let mut matches = self.traverse().filter(|item| predicate(item));
        let only = matches.next().ok_or(QueryError::NoMatch)?;
        match matches.next() {
            Some(_) => Err(QueryError::MoreThanOneMatch),
            None => Ok(only),
        }
    }

    /// The only element satisfying `predicate`, or the default value when
    /// nothing matches.
    fn single_where_or_default<P>(&self, predicate: P) -> Result<Self::Item>
    where
        P: Fn(&Self::Item) -> bool,
        Self::Item: Default,
    {
        let mut matches = self.traverse().filter(|item| predicate(item));
        match (matches.next(), matches.next()) {
            (None, _) => Ok(Self::Item::default()),
            (Some(only), None) => Ok(only),
            (Some(_), Some(_)) => Err(QueryError::MoreThanOneMatch),
        }
    }

    /// The element at `index`.
    fn element_at(&self, index: usize) -> Result<Self::Item> {
        self.traverse()
            .nth(index)
            .ok_or(QueryError::OutOfRange { argument: "index" })
    }

    /// The element at `index`, or the default value past the end.
    fn element_at_or_default(&self, index: usize) -> Self::Item
    where
        Self::Item: Default,
    {
        self.traverse().nth(index).unwrap_or_default()
    }

    // ========================================================================
    // Quantifiers and counting
    // ========================================================================

    /// Returns `true` if there is at least one element.
    fn any(&self) -> bool {
        match self.known_len() {
            Some(len) => len > 0,
            None => self.traverse().next().is_some(),
        }
    }

    /// Returns `true` if some element satisfies `predicate`.
    fn any_where<P>(&self, predicate: P) -> bool
    where
        P: Fn(&Self::Item) -> bool,
    {
        self.traverse().any(|item| predicate(&item))
    }

    /// Returns `true` if every element satisfies `predicate`.
    fn all<P>(&self, predicate: P) -> bool
    where
        P: Fn(&Self::Item) -> bool,
    {
        self.traverse().all(|item| predicate(&item))
    }

    /// Returns `true` if an element equals `value`.
    fn contains(&self, value: &Self::Item) -> bool
    where
        Self::Item: PartialEq,
    {
        self.traverse().any(|item| &item == value)
    }

    /// Returns `true` if an element equals `value` under `comparer`.
    fn contains_by<C>(&self, value: &Self::Item, comparer: C) -> bool
    where
        C: EqualityComparer<Self::Item>,
    {
        self.traverse().any(|item| comparer.equals(&item, value))
    }

    /// Number of elements.
    fn count(&self) -> usize {
        match self.known_len() {
            Some(len) => len,
            None => self.traverse().count(),
        }
    }

    /// Number of elements satisfying `predicate`.
    fn count_where<P>(&self, predicate: P) -> usize
    where
        P: Fn(&Self::Item) -> bool,
    {
        self.traverse().filter(|item| predicate(item)).count()
    }

    /// Number of elements as a `u64`.
    fn long_count(&self) -> u64 {
        match self.known_len() {
            Some(len) => len as u64,
            None => self.traverse().fold(0, |count, _| count + 1),
        }
    }

    // ========================================================================
    // Aggregation
    // ========================================================================

    /// Folds the elements with `fold`, seeded by the first element.
    fn aggregate<F>(&self, fold: F) -> Result<Self::Item>
    where
        F: Fn(Self::Item, Self::Item) -> Self::Item,
    {
        let mut iter = self.traverse();
        let first = iter.next().ok_or(QueryError::NoElements)?;
        Ok(iter.fold(first, fold))
    }

    /// Folds the elements into `seed`.
    fn aggregate_seeded<A, F>(&self, seed: A, fold: F) -> A
    where
        F: Fn(A, Self::Item) -> A,
    {
        self.traverse().fold(seed, fold)
    }

    /// Folds the elements into `seed`, then maps the total with `result`.
    fn aggregate_with<A, F, R, T>(&self, seed: A, fold: F, result: R) -> T
    where
        F: Fn(A, Self::Item) -> A,
        R: FnOnce(A) -> T,
    {
        result(self.traverse().fold(seed, fold))
    }

    /// Checked sum of the elements; zero when empty.
    fn sum(&self) -> Result<Self::Item>
    where
        Self::Item: Numeric,
    {
        aggregate::sum(self.traverse())
    }

    /// Checked sum of `selector` over the elements.
    fn sum_by<F, N>(&self, selector: F) -> Result<N>
    where
        F: Fn(Self::Item) -> N,
        N: Numeric,
    {
        aggregate::sum(self.traverse().map(selector))
    }

    /// Sum of the present values; zero when there are none.
    fn sum_nullable<N>(&self) -> Result<N>
    where
        Self: Sequence<Item = Option<N>>,
        N: Numeric,
    {
        aggregate::sum(self.traverse().flatten())
    }

    /// The smallest element under the NaN-first total order; the first wins ties.
    fn min(&self) -> Result<Self::Item>
    where
        Self::Item: PartialOrd,
    {
        aggregate::extreme(self.traverse(), Ordering::Less)
            .ok_or(QueryError::NoElements)
    }

    /// The largest element under the NaN-first total order; the first wins ties.
    fn max(&self) -> Result<Self::Item>
    where
        Self::Item: PartialOrd,
    {
        aggregate::extreme(self.traverse(), Ordering::Greater)
            .ok_or(QueryError::NoElements)
    }

    /// The element with the smallest key.
    fn min_by_key<F, K>(&self, key: F) -> Result<Self::Item>
    where
        F: Fn(&Self::Item) -> K,
        K: PartialOrd,
    {
        aggregate::extreme_by(self.traverse(), key, Ordering::Less)
            .ok_or(QueryError::NoElements)
    }

    /// The element with the largest key.
    fn max_by_key<F, K>(&self, key: F) -> Result<Self::Item>
    where
        F: Fn(&Self::Item) -> K,
        K: PartialOrd,
    {
        aggregate::extreme_by(self.traverse(), key, Ordering::Greater)
            .ok_or(QueryError::NoElements)
    }

    /// The smallest present value, if any.
    fn min_nullable<N>(&self) -> Option<N>
    where
        Self: Sequence<Item = Option<N>>,
        N: PartialOrd,
    {
        aggregate::extreme(self.traverse().flatten(), Ordering::Less)
    }

    /// The largest present value, if any.
    fn max_nullable<N>(&self) -> Option<N>
    where
        Self: Sequence<Item = Option<N>>,
        N: PartialOrd,
    {
        aggregate::extreme(self.traverse().flatten(), Ordering::Greater)
    }

    /// Arithmetic mean, accumulated in `f64`.
    fn average(&self) -> Result<f64>
    where
        Self::Item: Numeric,
    {
        aggregate::average(self.traverse())
            .ok_or(QueryError::NoElements)
    }

    /// Arithmetic mean of `selector` over the elements.
    fn average_by<F, N>(&self, selector: F) -> Result<f64>
    where
        F: Fn(Self::Item) -> N,
        N: Numeric,
    {
        aggregate::average(self.traverse().map(selector))
            .ok_or(QueryError::NoElements)
    }

    /// Mean of the present values, if any.
    fn average_nullable<N>(&self) -> Option<f64>
    where
        Self: Sequence<Item = Option<N>>,
        N: Numeric,
    {
        aggregate::average(self.traverse().flatten())
    }

    // ========================================================================
    // Equality
    // ========================================================================

    /// Returns `true` if both sequences hold equal elements in the same order.
    fn sequence_equal<B>(&self, other: B) -> bool
    where
        B: Sequence,
        Self::Item: PartialEq<B::Item>,
    {
        if let (Some(a), Some(b)) = (self.known_len(), other.known_len()) {
            if a != b {
                return false;
            }
        }
        self.traverse().eq(other.traverse())
    }

    /// [`sequence_equal`](Sequence::sequence_equal) under `comparer`.
    fn sequence_equal_by<B, C>(&self, other: B, comparer: C) -> bool
    where
        B: Sequence<Item = Self::Item>,
        C: EqualityComparer<Self::Item>,
    {
        if let (Some(a), Some(b)) = (self.known_len(), other.known_len()) {
            if a != b {
                return false;
            }
        }
        let mut left = self.traverse();
        let mut right = other.traverse();
        loop {
            match (left.next(), right.next()) {
                (Some(a), Some(b)) if comparer.equals(&a, &b) => {}
                (None, None) => return true,
                _ => return false,
            }
        }
    }
}

impl<S: Sequence + ?Sized> Sequence for &S {
    type Item = S::Item;
    type Iter<'a> = S::Iter<'a>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        S::traverse(*self)
    }

    fn known_len(&self) -> Option<usize> {
        S::known_len(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparer::by_key;
    use crate::source::{empty, from_iter, from_vec, generate, range};

    #[test]
    fn by_ref_composes_without_consuming() {
        let numbers = from_vec(vec![1, 2, 3]);
        let doubled = numbers.by_ref().map(|n| n * 2);
        assert_eq!(doubled.to_vec(), vec![2, 4, 6]);
        assert_eq!(numbers.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn first_and_last() {
        let numbers = from_vec(vec![3, 8, 5, 10]);
        assert_eq!(numbers.first(), Ok(3));
        assert_eq!(numbers.last(), Ok(10));
        assert_eq!(numbers.first_where(|n| n % 2 == 0), Ok(8));
        assert_eq!(numbers.last_where(|n| n % 2 == 1), Ok(5));
        assert_eq!(numbers.first_where(|n| *n > 99), Err(QueryError::NoMatch));
        assert_eq!(numbers.last_where_or_default(|n| *n > 99), 0);
        assert_eq!(empty::<i32>().first(), Err(QueryError::NoElements));
        assert_eq!(empty::<i32>().last_or_default(), 0);
        assert_eq!(empty::<i32>().first_or_default(), 0);
        assert_eq!(numbers.first_where_or_default(|n| *n > 9), 10);
    }

    #[test]
    fn single_variants() {
        assert_eq!(from_vec(vec![1]).single(), Ok(1));
        assert_eq!(empty::<i32>().single(), Err(QueryError::NoElements));
        assert_eq!(
            from_vec(vec![1, 2]).single(),
            Err(QueryError::MoreThanOneElement)
        );
        assert_eq!(empty::<i32>().single_or_default(), Ok(0));
        assert_eq!(
            from_vec(vec![1, 2]).single_or_default(),
            Err(QueryError::MoreThanOneElement)
        );

        let numbers = from_vec(vec![1, 2, 3, 4]);
        assert_eq!(numbers.single_where(|n| *n == 3), Ok(3));
        assert_eq!(numbers.single_where(|n| *n > 9), Err(QueryError::NoMatch));
        assert_eq!(
            numbers.single_where(|n| n % 2 == 0),
            Err(QueryError::MoreThanOneMatch)
        );
        assert_eq!(numbers.single_where_or_default(|n| *n > 9), Ok(0));
    }

    #[test]
    fn single_stops_at_second_element() {
        let naturals = from_iter(0u64..);
        assert_eq!(naturals.single(), Err(QueryError::MoreThanOneElement));
        assert_eq!(
            naturals.single_where(|n| n % 1000 == 0),
            Err(QueryError::MoreThanOneMatch)
        );
    }

    #[test]
    fn element_at() {
        let letters = from_vec(vec!['a', 'b', 'c']);
        assert_eq!(letters.element_at(1), Ok('b'));
        assert_eq!(
            letters.element_at(3),
            Err(QueryError::OutOfRange { argument: "index" })
        );
        assert_eq!(letters.element_at_or_default(7), '\0');
    }

    #[test]
    fn quantifiers() {
        let numbers = from_vec(vec![2, 4, 6]);
        assert!(numbers.any());
        assert!(!empty::<i32>().any());
        assert!(from_iter(0..).any());
        assert!(numbers.all(|n| n % 2 == 0));
        assert!(!numbers.any_where(|n| *n > 6));
        assert!(numbers.contains(&4));
        assert!(!numbers.contains(&5));
        let words = from_vec(vec!["Alpha", "beta"]);
        let folded = by_key(|s: &&str| s.to_lowercase());
        assert!(words.contains_by(&"BETA", folded));
    }

    #[test]
    fn counting() {
        let numbers = from_vec(vec![1, 2, 3, 4, 5]);
        assert_eq!(numbers.count(), 5);
        assert_eq!(numbers.by_ref().filter(|n| n % 2 == 1).count(), 3);
        assert_eq!(numbers.count_where(|n| *n > 3), 2);
        assert_eq!(numbers.long_count(), 5);
        assert_eq!(generate(|| 0..10).long_count(), 10);
    }

    #[test]
    fn aggregate_family() {
        let numbers = from_vec(vec![1, 2, 3, 4]);
        assert_eq!(numbers.aggregate(|a, b| a * b), Ok(24));
        assert_eq!(
            empty::<i32>().aggregate(|a, b| a + b),
            Err(QueryError::NoElements)
        );
        assert_eq!(numbers.aggregate_seeded(10, |a, b| a + b), 20);
        let append = |s: String, n: i32| s + &n.to_string();
        let digits = numbers.aggregate_with(String::new(), append, |s| s.len());
        assert_eq!(digits, 4);
    }

    #[test]
    fn to_map_rejects_duplicate_keys() {
        let pairs = from_vec(vec![("a", 1), ("b", 2)]);
        let map = pairs.to_map(|p| p.0, |p| p.1).unwrap();
        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(map.len(), 2);

        let dup = from_vec(vec![("a", 1), ("a", 2)]);
        assert_eq!(dup.to_map(|p| p.0, |p| p.1), Err(QueryError::DuplicateKey));
    }

    #[test]
    fn to_lookup_variants() {
        let words = from_vec(vec!["one", "two", "three"]);
        let by_len = words.to_lookup(|w| w.len());
        assert_eq!(by_len[&3], ["one", "two"]);
        let upper = words.to_lookup_with(|w| w.len(), |w| w.to_uppercase(), DefaultEq);
        assert_eq!(upper[&5], ["THREE"]);
    }

    #[test]
    fn sequence_equality() {
        let a = from_vec(vec![1, 2, 3]);
        assert!(a.sequence_equal(range(1, 3).unwrap()));
        assert!(!a.sequence_equal(from_vec(vec![1, 2])));
        assert!(!a.sequence_equal(from_iter(1..3)));
        assert!(a.sequence_equal(from_iter(1..4)));
        let by_residue = by_key(|n: &i32| n % 3);
        assert!(a.sequence_equal_by(from_vec(vec![4, 5, 6]), by_residue));
    }

    #[test]
    fn borrowed_sequences_are_sequences() {
        let numbers = from_vec(vec![5, 6]);
        let borrowed = &numbers;
        assert_eq!(borrowed.known_len(), Some(2));
        assert_eq!(borrowed.traverse().collect::<Vec<_>>(), vec![5, 6]);
    }
}
