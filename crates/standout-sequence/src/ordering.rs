//! Stable multi-key ordering.
//!
//! An [`Ordered`] node holds its source plus a statically composed chain of
//! sort keys: a [`SortKey`] for the root `order_by`, wrapped in one [`Then`]
//! per `then_by`. Enumerating the node buffers the source, computes one key
//! column per level, and quicksorts an index map. Ties at every level fall
//! back to the original index, which makes the sort stable.

use std::cmp::Ordering;
use std::marker::PhantomData;

use tracing::debug;

use crate::buffer::Buffer;
use crate::comparer::{Comparer, DefaultOrd};
use crate::sequence::Sequence;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Key chain
// ============================================================================

/// Computed sort keys for one buffered run, compared by element index.
pub trait CompareKeys {
    /// Compares the elements at `a` and `b` over every key level.
    fn compare_keys(&self, a: usize, b: usize) -> Ordering;
}

/// A chain of sort keys over elements of type `T`.
pub trait SortKeys<T> {
    /// Key columns for one sort run.
    type Keys<'s>: CompareKeys
    where
        Self: 's;

    /// Extracts every key level for `elements`, once per element.
    fn compute_keys<'s>(&'s self, elements: &[T]) -> Self::Keys<'s>;

    /// Number of key levels in the chain.
    fn depth(&self) -> usize;
}

/// One level of an ordering: key selector, comparer and direction.
pub struct SortKey<F, K, C> {
    selector: F,
    comparer: C,
    dir: Dir,
    _key: PhantomData<fn() -> K>,
}

impl<F, K, C> SortKey<F, K, C> {
    pub(crate) fn new(selector: F, comparer: C, dir: Dir) -> Self {
        SortKey {
            selector,
            comparer,
            dir,
            _key: PhantomData,
        }
    }

    /// Direction of this level.
    pub fn dir(&self) -> Dir {
        self.dir
    }
}

impl<F: Clone, K, C: Clone> Clone for SortKey<F, K, C> {
    fn clone(&self) -> Self {
        SortKey::new(self.selector.clone(), self.comparer.clone(), self.dir)
    }
}

impl<F, K, C: std::fmt::Debug> std::fmt::Debug for SortKey<F, K, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortKey")
            .field("comparer", &self.comparer)
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

/// Key column for one level.
pub struct KeyColumn<'s, K, C> {
    keys: Vec<K>,
    comparer: &'s C,
    dir: Dir,
}

impl<K, C: Comparer<K>> CompareKeys for KeyColumn<'_, K, C> {
    fn compare_keys(&self, a: usize, b: usize) -> Ordering {
        self.dir
            .apply(self.comparer.compare(&self.keys[a], &self.keys[b]))
    }
}

impl<T, F, K, C> SortKeys<T> for SortKey<F, K, C>
where
    F: Fn(&T) -> K,
    C: Comparer<K>,
{
    type Keys<'s> = KeyColumn<'s, K, C>
    where
        Self: 's;

    fn compute_keys<'s>(&'s self, elements: &[T]) -> Self::Keys<'s> {
        KeyColumn {
            keys: elements.iter().map(&self.selector).collect(),
            comparer: &self.comparer,
            dir: self.dir,
        }
    }

    fn depth(&self) -> usize {
        1
    }
}

/// A key chain followed by a tie-breaking level.
#[derive(Debug, Clone)]
pub struct Then<P, L> {
    primary: P,
    secondary: L,
}

/// Key columns of a [`Then`] chain.
pub struct ThenKeys<P, L> {
    primary: P,
    secondary: L,
}

impl<P: CompareKeys, L: CompareKeys> CompareKeys for ThenKeys<P, L> {
    fn compare_keys(&self, a: usize, b: usize) -> Ordering {
        self.primary
            .compare_keys(a, b)
            .then_with(|| self.secondary.compare_keys(a, b))
    }
}

impl<T, P, L> SortKeys<T> for Then<P, L>
where
    P: SortKeys<T>,
    L: SortKeys<T>,
{
    type Keys<'s> = ThenKeys<P::Keys<'s>, L::Keys<'s>>
    where
        Self: 's;

    fn compute_keys<'s>(&'s self, elements: &[T]) -> Self::Keys<'s> {
        ThenKeys {
            primary: self.primary.compute_keys(elements),
            secondary: self.secondary.compute_keys(elements),
        }
    }

    fn depth(&self) -> usize {
        self.primary.depth() + self.secondary.depth()
    }
}

// ============================================================================
// Ordered node
// ============================================================================

/// Sequence sorted by a chain of keys.
///
/// Created by [`Sequence::order_by`], [`Sequence::order_by_descending`] and
/// [`Sequence::order_by_with`]; extended with `then_by*`.
///
/// ```
/// use standout_sequence::{from_vec, Sequence};
///
/// let people = from_vec(vec![("ann", 31), ("bob", 25), ("cid", 31)]);
/// let sorted = people
///     .order_by_descending(|p| p.1)
///     .then_by(|p| p.0);
///
/// assert_eq!(sorted.to_vec(), vec![("ann", 31), ("cid", 31), ("bob", 25)]);
/// ```
#[derive(Debug, Clone)]
pub struct Ordered<S, K> {
    source: S,
    keys: K,
}

impl<S, F, K> Ordered<S, SortKey<F, K, DefaultOrd>> {
    pub(crate) fn new(source: S, selector: F, dir: Dir) -> Self {
        Ordered::with_key(source, selector, DefaultOrd, dir)
    }
}

impl<S, F, K, C> Ordered<S, SortKey<F, K, C>> {
    pub(crate) fn with_key(source: S, selector: F, comparer: C, dir: Dir) -> Self {
        Ordered {
            source,
            keys: SortKey::new(selector, comparer, dir),
        }
    }
}

impl<S, K> Ordered<S, K>
where
    S: Sequence,
    K: SortKeys<S::Item>,
{
    /// Breaks ties by `selector`, ascending.
    pub fn then_by<F, K2>(self, selector: F) -> Ordered<S, Then<K, SortKey<F, K2, DefaultOrd>>>
    where
        F: Fn(&S::Item) -> K2,
        K2: Ord,
    {
        self.then_by_with(selector, DefaultOrd, Dir::Asc)
    }

    /// Breaks ties by `selector`, descending.
    pub fn then_by_descending<F, K2>(
        self,
        selector: F,
    ) -> Ordered<S, Then<K, SortKey<F, K2, DefaultOrd>>>
    where
        F: Fn(&S::Item) -> K2,
        K2: Ord,
    {
        self.then_by_with(selector, DefaultOrd, Dir::Desc)
    }

    /// Breaks ties by `selector` under `comparer` in direction `dir`.
    pub fn then_by_with<F, K2, C>(
        self,
        selector: F,
        comparer: C,
        dir: Dir,
    ) -> Ordered<S, Then<K, SortKey<F, K2, C>>>
    where
        F: Fn(&S::Item) -> K2,
        C: Comparer<K2>,
    {
        Ordered {
            source: self.source,
            keys: Then {
                primary: self.keys,
                secondary: SortKey::new(selector, comparer, dir),
            },
        }
    }

    fn sorted(&self) -> Vec<S::Item> {
        let buffer = Buffer::from_sequence(&self.source);
        let keys = self.keys.compute_keys(buffer.as_slice());
        let mut map: Vec<usize> = (0..buffer.len()).collect();
        quick_sort(&mut map, &|a: usize, b: usize| {
            if a == b {
                Ordering::Equal
            } else {
                keys.compare_keys(a, b).then(a.cmp(&b))
            }
        });
        debug!(
            elements = buffer.len(),
            levels = self.keys.depth(),
            "sorted sequence"
        );
        buffer.into_permuted(&map)
    }
}

impl<S, K> Sequence for Ordered<S, K>
where
    S: Sequence,
    K: SortKeys<S::Item>,
{
    type Item = S::Item;
    type Iter<'a> = OrderedIter<'a, S, K>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        OrderedIter {
            node: self,
            sorted: None,
        }
    }

    fn known_len(&self) -> Option<usize> {
        self.source.known_len()
    }
}

/// Iterator for [`Ordered`]; sorts on the first advance.
pub struct OrderedIter<'a, S: Sequence, K> {
    node: &'a Ordered<S, K>,
    sorted: Option<std::vec::IntoIter<S::Item>>,
}

impl<S, K> Iterator for OrderedIter<'_, S, K>
where
    S: Sequence,
    K: SortKeys<S::Item>,
{
    type Item = S::Item;

    fn next(&mut self) -> Option<S::Item> {
        let node = self.node;
        self.sorted
            .get_or_insert_with(|| node.sorted().into_iter())
            .next()
    }
}

/// Sorts `map` in place by `compare`.
///
/// Middle-element pivot; recurses into the smaller partition and loops on
/// the larger one. Scans stay inside `left..=right`, so every pass shrinks
/// the range even when `compare` is inconsistent.
fn quick_sort<F>(map: &mut [usize], compare: &F)
where
    F: Fn(usize, usize) -> Ordering,
{
    if map.len() > 1 {
        quick_sort_range(map, 0, map.len() as isize - 1, compare);
    }
}

fn quick_sort_range<F>(map: &mut [usize], mut left: isize, mut right: isize, compare: &F)
where
    F: Fn(usize, usize) -> Ordering,
{
    loop {
        let mut i = left;
        let mut j = right;
        let pivot = map[(i + ((j - i) >> 1)) as usize];
        loop {
            while i < right && compare(pivot, map[i as usize]) == Ordering::Greater {
                i += 1;
            }
            while j > left && compare(pivot, map[j as usize]) == Ordering::Less {
                j -= 1;
            }
            if i > j {
                break;
            }
            if i < j {
                map.swap(i as usize, j as usize);
            }
            i += 1;
            j -= 1;
            if i > j {
                break;
            }
        }
        if j - left <= right - i {
            if left < j {
                quick_sort_range(map, left, j, compare);
            }
            left = i;
        } else {
            if i < right {
                quick_sort_range(map, i, right, compare);
            }
            right = j;
        }
        if left >= right {
            break;
        }
    }
}
