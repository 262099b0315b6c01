//! Hash multimap from keys to ordered groups of elements.
//!
//! A [`Lookup`] stores its [`Grouping`]s in an arena whose order is the
//! order in which keys were first seen. Buckets hold the arena index of the
//! head of a chain; each grouping links to the next grouping in its bucket.
//! The same structure powers `group_by`, `to_lookup`, `join` and
//! `group_join`.

use std::ops::Index;

use tracing::trace;

use crate::comparer::{masked_hash, DefaultEq, EqualityComparer};
use crate::sequence::Sequence;
use crate::source::{from_slice, Slice};

const INITIAL_BUCKETS: usize = 7;

/// A key and the elements that share it, in insertion order.
#[derive(Debug, Clone)]
pub struct Grouping<K, E> {
    key: K,
    hash: u32,
    elements: Vec<E>,
    hash_next: Option<usize>,
}

impl<K, E> Grouping<K, E> {
    /// The key shared by every element of the group.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the group has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in insertion order.
    pub fn elements(&self) -> &[E] {
        &self.elements
    }

    /// Element at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&E> {
        self.elements.get(index)
    }

    /// Iterates the elements in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.elements.iter()
    }

    /// The elements as a sequence of references.
    pub fn as_sequence(&self) -> Slice<'_, E> {
        from_slice(&self.elements)
    }

    /// Splits the group into its key and elements.
    pub fn into_parts(self) -> (K, Vec<E>) {
        (self.key, self.elements)
    }

    fn trim(&mut self) {
        self.elements.shrink_to_fit();
    }
}

impl<K: PartialEq, E: PartialEq> PartialEq for Grouping<K, E> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.elements == other.elements
    }
}

impl<K: Eq, E: Eq> Eq for Grouping<K, E> {}

impl<K, E> Index<usize> for Grouping<K, E> {
    type Output = E;

    fn index(&self, index: usize) -> &E {
        &self.elements[index]
    }
}

impl<'g, K, E> IntoIterator for &'g Grouping<K, E> {
    type Item = &'g E;
    type IntoIter = std::slice::Iter<'g, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<K, E> IntoIterator for Grouping<K, E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

/// Immutable multimap from key to the ordered elements that produced it.
///
/// ```
/// use standout_sequence::{from_vec, Sequence};
///
/// let words = from_vec(vec!["apple", "banana", "avocado"]);
/// let by_initial = words.to_lookup(|w| w.chars().next());
///
/// assert_eq!(by_initial[&Some('a')], ["apple", "avocado"]);
/// assert!(by_initial[&Some('z')].is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Lookup<K, E, C = DefaultEq> {
    buckets: Vec<Option<usize>>,
    groupings: Vec<Grouping<K, E>>,
    comparer: C,
}

impl<K, E, C> Lookup<K, E, C>
where
    C: EqualityComparer<K>,
{
    fn empty(comparer: C) -> Self {
        Lookup {
            buckets: vec![None; INITIAL_BUCKETS],
            groupings: Vec::new(),
            comparer,
        }
    }

    /// Builds a lookup in one pass over `source`.
    ///
    /// Every item lands in the group for `key_selector(&item)`, projected by
    /// `element_selector`. Groups keep the order in which their keys first
    /// appeared.
    pub fn create<S, KF, EF>(
        source: &S,
        key_selector: KF,
        element_selector: EF,
        comparer: C,
    ) -> Self
    where
        S: Sequence + ?Sized,
        KF: Fn(&S::Item) -> K,
        EF: Fn(S::Item) -> E,
    {
        let mut lookup = Lookup::empty(comparer);
        for item in source.traverse() {
            let key = key_selector(&item);
            let index = lookup.get_or_insert(key);
            let grouping = &mut lookup.groupings[index];
            grouping.elements.push(element_selector(item));
        }
        lookup
    }

    /// Builds the inner-side lookup of a join.
    ///
    /// Identical to [`Lookup::create`] with identity elements, except that
    /// items whose key is null (per the comparer) are skipped: null keys
    /// never match.
    pub fn create_for_join<S, KF>(source: &S, key_selector: KF, comparer: C) -> Self
    where
        S: Sequence<Item = E> + ?Sized,
        KF: Fn(&E) -> K,
    {
        let mut lookup = Lookup::empty(comparer);
        for item in source.traverse() {
            let key = key_selector(&item);
            if lookup.comparer.is_null(&key) {
                continue;
            }
            let index = lookup.get_or_insert(key);
            lookup.groupings[index].elements.push(item);
        }
        lookup
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.groupings.len()
    }

    /// Returns `true` if there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groupings.is_empty()
    }

    /// Returns `true` if a group exists for `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// The group for `key`, if present.
    pub fn get_grouping(&self, key: &K) -> Option<&Grouping<K, E>> {
        self.find(key).map(|index| &self.groupings[index])
    }

    /// Elements for `key`; empty if the key is absent.
    pub fn get(&self, key: &K) -> &[E] {
        match self.find(key) {
            Some(index) => &self.groupings[index].elements,
            None => &[],
        }
    }

    /// Groups in first-insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Grouping<K, E>> {
        self.groupings.iter()
    }

    /// Groups in first-insertion order, as a sequence.
    pub fn groups(&self) -> Slice<'_, Grouping<K, E>> {
        from_slice(&self.groupings)
    }

    /// Yields `result_selector(key, elements)` for each group in insertion order.
    pub fn apply_result_selector<R, T>(self, result_selector: R) -> ApplyResults<K, E, R>
    where
        R: Fn(&K, &[E]) -> T,
    {
        ApplyResults {
            groupings: self.into_groupings(),
            result_selector,
        }
    }

    /// Consumes the lookup, yielding its groups in insertion order.
    ///
    /// Each group's storage is trimmed to its element count first.
    pub fn into_groupings(self) -> std::vec::IntoIter<Grouping<K, E>> {
        let mut groupings = self.groupings;
        for grouping in &mut groupings {
            grouping.trim();
            grouping.hash_next = None;
        }
        groupings.into_iter()
    }

    pub(crate) fn grouping_at(&self, index: usize) -> &Grouping<K, E> {
        &self.groupings[index]
    }

    pub(crate) fn find(&self, key: &K) -> Option<usize> {
        let hash = masked_hash(&self.comparer, key);
        self.find_hashed(key, hash)
    }

    fn find_hashed(&self, key: &K, hash: u32) -> Option<usize> {
        let mut current = self.buckets[hash as usize % self.buckets.len()];
        while let Some(index) = current {
            let grouping = &self.groupings[index];
            if grouping.hash == hash && self.comparer.equals(&grouping.key, key) {
                return Some(index);
            }
            current = grouping.hash_next;
        }
        None
    }

    fn get_or_insert(&mut self, key: K) -> usize {
        let hash = masked_hash(&self.comparer, &key);
        if let Some(index) = self.find_hashed(&key, hash) {
            return index;
        }
        if self.groupings.len() == self.buckets.len() {
            self.resize();
        }
        let index = self.groupings.len();
        let bucket = hash as usize % self.buckets.len();
        self.groupings.push(Grouping {
            key,
            hash,
            elements: Vec::with_capacity(1),
            hash_next: self.buckets[bucket],
        });
        self.buckets[bucket] = Some(index);
        index
    }

    fn resize(&mut self) {
        let new_size = self.groupings.len() * 2 + 1;
        trace!(from = self.buckets.len(), to = new_size, "resizing lookup");
        let mut buckets = vec![None; new_size];
        for (index, grouping) in self.groupings.iter_mut().enumerate() {
            let bucket = grouping.hash as usize % new_size;
            grouping.hash_next = buckets[bucket];
            buckets[bucket] = Some(index);
        }
        self.buckets = buckets;
    }
}

impl<K, E, C> Index<&K> for Lookup<K, E, C>
where
    C: EqualityComparer<K>,
{
    type Output = [E];

    fn index(&self, key: &K) -> &[E] {
        self.get(key)
    }
}

impl<'l, K, E, C> IntoIterator for &'l Lookup<K, E, C> {
    type Item = &'l Grouping<K, E>;
    type IntoIter = std::slice::Iter<'l, Grouping<K, E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groupings.iter()
    }
}

/// Iterator returned by [`Lookup::apply_result_selector`].
pub struct ApplyResults<K, E, R> {
    groupings: std::vec::IntoIter<Grouping<K, E>>,
    result_selector: R,
}

impl<K, E, R, T> Iterator for ApplyResults<K, E, R>
where
    R: Fn(&K, &[E]) -> T,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let grouping = self.groupings.next()?;
        Some((self.result_selector)(&grouping.key, &grouping.elements))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.groupings.size_hint()
    }
}
