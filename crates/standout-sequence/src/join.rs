//! Lookup-backed operators: `join`, `group_join` and `group_by`.
//!
//! Each node builds its [`Lookup`] at the first advance of a traversal, so
//! composing a query never touches the inner source.

use crate::comparer::{DefaultEq, EqualityComparer};
use crate::lookup::{ApplyResults, Grouping, Lookup};
use crate::sequence::Sequence;

// ============================================================================
// Join
// ============================================================================

/// Inner equijoin of two sequences on matching keys.
///
/// Created by [`Sequence::join`]. For every outer element, in order, yields
/// `result(&outer, &inner)` for each matching inner element in inner order.
/// Outer elements without a match contribute nothing.
#[derive(Debug, Clone)]
pub struct Join<O, I, OK, IK, R, C = DefaultEq> {
    outer: O,
    inner: I,
    outer_key: OK,
    inner_key: IK,
    result: R,
    comparer: C,
}

impl<O, I, OK, IK, R> Join<O, I, OK, IK, R> {
    pub(crate) fn new(outer: O, inner: I, outer_key: OK, inner_key: IK, result: R) -> Self {
        Join {
            outer,
            inner,
            outer_key,
            inner_key,
            result,
            comparer: DefaultEq,
        }
    }
}

impl<O, I, OK, IK, R, C> Join<O, I, OK, IK, R, C> {
    /// Replaces the key comparer.
    pub fn with_comparer<C2>(self, comparer: C2) -> Join<O, I, OK, IK, R, C2> {
        Join {
            outer: self.outer,
            inner: self.inner,
            outer_key: self.outer_key,
            inner_key: self.inner_key,
            result: self.result,
            comparer,
        }
    }
}

impl<O, I, OK, IK, R, C, K, T> Sequence for Join<O, I, OK, IK, R, C>
where
    O: Sequence,
    I: Sequence,
    OK: Fn(&O::Item) -> K,
    IK: Fn(&I::Item) -> K,
    R: Fn(&O::Item, &I::Item) -> T,
    C: EqualityComparer<K>,
{
    type Item = T;
    type Iter<'a> = JoinIter<'a, O, I, OK, IK, R, C, K>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        JoinIter {
            node: self,
            outer: self.outer.traverse(),
            lookup: None,
            current: None,
        }
    }
}

/// Iterator for [`Join`].
pub struct JoinIter<'a, O: Sequence, I: Sequence, OK, IK, R, C, K> {
    node: &'a Join<O, I, OK, IK, R, C>,
    outer: O::Iter<'a>,
    lookup: Option<Lookup<K, I::Item, &'a C>>,
    // Outer element being expanded, its group and the next position in it.
    current: Option<(O::Item, usize, usize)>,
}

impl<'a, O, I, OK, IK, R, C, K, T> Iterator for JoinIter<'a, O, I, OK, IK, R, C, K>
where
    O: Sequence,
    I: Sequence,
    OK: Fn(&O::Item) -> K,
    IK: Fn(&I::Item) -> K,
    R: Fn(&O::Item, &I::Item) -> T,
    C: EqualityComparer<K>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let node = self.node;
        loop {
            if let (Some((item, group, position)), Some(lookup)) = (&mut self.current, &self.lookup)
            {
                let elements = lookup.grouping_at(*group).elements();
                if let Some(matched) = elements.get(*position) {
                    *position += 1;
                    return Some((node.result)(&*item, matched));
                }
                self.current = None;
            }

            let item = self.outer.next()?;
            let lookup = self.lookup.get_or_insert_with(|| {
                Lookup::create_for_join(&node.inner, &node.inner_key, &node.comparer)
            });
            let key = (node.outer_key)(&item);
            if let Some(group) = lookup.find(&key) {
                self.current = Some((item, group, 0));
            }
        }
    }
}

// ============================================================================
// GroupJoin
// ============================================================================

/// Left outer grouping join: one result per outer element.
///
/// Created by [`Sequence::group_join`]. Yields `result(outer, matches)` where
/// `matches` holds the inner elements whose key equals the outer key, and
/// may be empty.
#[derive(Debug, Clone)]
pub struct GroupJoin<O, I, OK, IK, R, C = DefaultEq> {
    outer: O,
    inner: I,
    outer_key: OK,
    inner_key: IK,
    result: R,
    comparer: C,
}

impl<O, I, OK, IK, R> GroupJoin<O, I, OK, IK, R> {
    pub(crate) fn new(outer: O, inner: I, outer_key: OK, inner_key: IK, result: R) -> Self {
        GroupJoin {
            outer,
            inner,
            outer_key,
            inner_key,
            result,
            comparer: DefaultEq,
        }
    }
}

impl<O, I, OK, IK, R, C> GroupJoin<O, I, OK, IK, R, C> {
    /// Replaces the key comparer.
    pub fn with_comparer<C2>(self, comparer: C2) -> GroupJoin<O, I, OK, IK, R, C2> {
        GroupJoin {
            outer: self.outer,
            inner: self.inner,
            outer_key: self.outer_key,
            inner_key: self.inner_key,
            result: self.result,
            comparer,
        }
    }
}

impl<O, I, OK, IK, R, C, K, T> Sequence for GroupJoin<O, I, OK, IK, R, C>
where
    O: Sequence,
    I: Sequence,
    OK: Fn(&O::Item) -> K,
    IK: Fn(&I::Item) -> K,
    R: Fn(O::Item, &[I::Item]) -> T,
    C: EqualityComparer<K>,
{
    type Item = T;
    type Iter<'a> = GroupJoinIter<'a, O, I, OK, IK, R, C, K>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        GroupJoinIter {
            node: self,
            outer: self.outer.traverse(),
            lookup: None,
        }
    }
}

/// Iterator for [`GroupJoin`].
pub struct GroupJoinIter<'a, O: Sequence, I: Sequence, OK, IK, R, C, K> {
    node: &'a GroupJoin<O, I, OK, IK, R, C>,
    outer: O::Iter<'a>,
    lookup: Option<Lookup<K, I::Item, &'a C>>,
}

impl<'a, O, I, OK, IK, R, C, K, T> Iterator for GroupJoinIter<'a, O, I, OK, IK, R, C, K>
where
    O: Sequence,
    I: Sequence,
    OK: Fn(&O::Item) -> K,
    IK: Fn(&I::Item) -> K,
    R: Fn(O::Item, &[I::Item]) -> T,
    C: EqualityComparer<K>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let node = self.node;
        let item = self.outer.next()?;
        let lookup = self.lookup.get_or_insert_with(|| {
            Lookup::create_for_join(&node.inner, &node.inner_key, &node.comparer)
        });
        let key = (node.outer_key)(&item);
        Some((node.result)(item, lookup.get(&key)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.outer.size_hint()
    }
}

// ============================================================================
// GroupBy
// ============================================================================

/// Element selector of a [`GroupBy`] that keeps elements unchanged.
pub type Identity<T> = fn(T) -> T;

/// Elements grouped by key, one [`Grouping`] per distinct key in
/// first-occurrence order.
///
/// Created by [`Sequence::group_by`]. Refine with [`GroupBy::elements`],
/// [`GroupBy::with_comparer`] and [`GroupBy::with_result`].
///
/// ```
/// use standout_sequence::{from_vec, Sequence};
///
/// let fruit = from_vec(vec!["apple", "banana", "avocado"]);
/// let sizes = fruit
///     .group_by(|f| f.chars().next())
///     .with_result(|initial, items| format!("{}:{}", initial.unwrap_or('?'), items.len()));
///
/// assert_eq!(sizes.to_vec(), vec!["a:2", "b:1"]);
/// ```
#[derive(Debug, Clone)]
pub struct GroupBy<S, KF, EF, C = DefaultEq> {
    source: S,
    key_selector: KF,
    element_selector: EF,
    comparer: C,
}

impl<S: Sequence, KF> GroupBy<S, KF, Identity<S::Item>> {
    pub(crate) fn new(source: S, key_selector: KF) -> Self {
        GroupBy {
            source,
            key_selector,
            element_selector: identity::<S::Item> as Identity<S::Item>,
            comparer: DefaultEq,
        }
    }
}

fn identity<T>(item: T) -> T {
    item
}

impl<S, KF, EF, C> GroupBy<S, KF, EF, C> {
    /// Replaces the key comparer.
    pub fn with_comparer<C2>(self, comparer: C2) -> GroupBy<S, KF, EF, C2> {
        GroupBy {
            source: self.source,
            key_selector: self.key_selector,
            element_selector: self.element_selector,
            comparer,
        }
    }
}

impl<S, KF, EF, C, K, E> GroupBy<S, KF, EF, C>
where
    S: Sequence,
    KF: Fn(&S::Item) -> K,
    EF: Fn(S::Item) -> E,
{
    /// Projects each element before it is added to its group.
    pub fn elements<EF2, E2>(self, element_selector: EF2) -> GroupBy<S, KF, EF2, C>
    where
        EF2: Fn(S::Item) -> E2,
    {
        GroupBy {
            source: self.source,
            key_selector: self.key_selector,
            element_selector,
            comparer: self.comparer,
        }
    }

    /// Yields `result(&key, &elements)` per group instead of the groups.
    pub fn with_result<R, T>(self, result: R) -> GroupByResult<S, KF, EF, C, R>
    where
        R: Fn(&K, &[E]) -> T,
    {
        GroupByResult {
            group_by: self,
            result,
        }
    }

    fn build(&self) -> Lookup<K, E, &C>
    where
        C: EqualityComparer<K>,
    {
        Lookup::create(
            &self.source,
            &self.key_selector,
            &self.element_selector,
            &self.comparer,
        )
    }
}

impl<S, KF, EF, C, K, E> Sequence for GroupBy<S, KF, EF, C>
where
    S: Sequence,
    KF: Fn(&S::Item) -> K,
    EF: Fn(S::Item) -> E,
    C: EqualityComparer<K>,
{
    type Item = Grouping<K, E>;
    type Iter<'a> = GroupByIter<'a, S, KF, EF, C, K, E>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        GroupByIter {
            node: self,
            groups: None,
        }
    }
}

/// Iterator for [`GroupBy`].
pub struct GroupByIter<'a, S, KF, EF, C, K, E> {
    node: &'a GroupBy<S, KF, EF, C>,
    groups: Option<std::vec::IntoIter<Grouping<K, E>>>,
}

impl<S, KF, EF, C, K, E> Iterator for GroupByIter<'_, S, KF, EF, C, K, E>
where
    S: Sequence,
    KF: Fn(&S::Item) -> K,
    EF: Fn(S::Item) -> E,
    C: EqualityComparer<K>,
{
    type Item = Grouping<K, E>;

    fn next(&mut self) -> Option<Grouping<K, E>> {
        let node = self.node;
        self.groups
            .get_or_insert_with(|| node.build().into_groupings())
            .next()
    }
}

/// Per-group results of a [`GroupBy`].
///
/// Created by [`GroupBy::with_result`].
#[derive(Debug, Clone)]
pub struct GroupByResult<S, KF, EF, C, R> {
    group_by: GroupBy<S, KF, EF, C>,
    result: R,
}

impl<S, KF, EF, C, R, K, E, T> Sequence for GroupByResult<S, KF, EF, C, R>
where
    S: Sequence,
    KF: Fn(&S::Item) -> K,
    EF: Fn(S::Item) -> E,
    C: EqualityComparer<K>,
    R: Fn(&K, &[E]) -> T,
{
    type Item = T;
    type Iter<'a> = GroupByResultIter<'a, S, KF, EF, C, R, K, E>
    where
        Self: 'a;

    fn traverse(&self) -> Self::Iter<'_> {
        GroupByResultIter {
            node: self,
            results: None,
        }
    }
}

/// Iterator for [`GroupByResult`].
pub struct GroupByResultIter<'a, S, KF, EF, C, R, K, E> {
    node: &'a GroupByResult<S, KF, EF, C, R>,
    results: Option<ApplyResults<K, E, &'a R>>,
}

impl<'a, S, KF, EF, C, R, K, E, T> Iterator for GroupByResultIter<'a, S, KF, EF, C, R, K, E>
where
    S: Sequence,
    KF: Fn(&S::Item) -> K,
    EF: Fn(S::Item) -> E,
    C: EqualityComparer<K>,
    R: Fn(&K, &[E]) -> T,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let node: &'a GroupByResult<S, KF, EF, C, R> = self.node;
        self.results
            .get_or_insert_with(|| {
                node.group_by
                    .build()
                    .apply_result_selector(&node.result)
            })
            .next()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::comparer::{by_key, NullableEq};
    use crate::source::{empty, from_vec, generate};

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        name: &'static str,
        city: Option<u32>,
    }

    fn people() -> crate::source::Owned<Person> {
        from_vec(vec![
            Person { name: "ann", city: Some(1) },
            Person { name: "bob", city: Some(2) },
            Person { name: "cat", city: None },
            Person { name: "dan", city: Some(1) },
        ])
    }

    fn cities() -> crate::source::Owned<(Option<u32>, &'static str)> {
        from_vec(vec![
            (Some(1), "oslo"),
            (Some(3), "rome"),
            (None, "nowhere"),
            (Some(1), "bergen"),
        ])
    }

    #[test]
    fn join_emits_matches_in_outer_then_inner_order() {
        let joined = people()
            .join(
                cities(),
                |p| p.city,
                |c| c.0,
                |p, c| format!("{}@{}", p.name, c.1),
            )
            .with_comparer(NullableEq);
        assert_eq!(
            joined.to_vec(),
            vec!["ann@oslo", "ann@bergen", "dan@oslo", "dan@bergen"]
        );
    }

    #[test]
    fn join_single_match() {
        let outer = from_vec(vec![(1, "x")]);
        let inner = from_vec(vec![(1, "y")]);
        let joined = outer.join(inner, |o| o.0, |i| i.0, |o, _| o.1);
        assert_eq!(joined.to_vec(), vec!["x"]);
    }

    #[test]
    fn group_join_yields_one_result_per_outer() {
        let grouped = people()
            .group_join(cities(), |p| p.city, |c| c.0, |p, cs| (p.name, cs.len()))
            .with_comparer(NullableEq);
        assert_eq!(
            grouped.to_vec(),
            vec![("ann", 2), ("bob", 0), ("cat", 0), ("dan", 2)]
        );
    }

    #[test]
    fn join_never_reads_inner_for_empty_outer() {
        let reads = Cell::new(0);
        let inner = generate(|| {
            reads.set(reads.get() + 1);
            vec![1, 2]
        });
        let joined = empty::<i32>().join(&inner, |o| *o, |i| *i, |o, i| o + i);
        assert!(joined.to_vec().is_empty());
        assert_eq!(reads.get(), 0);

        let grouped = empty::<i32>().group_join(&inner, |o| *o, |i| *i, |o, _| o);
        assert!(grouped.to_vec().is_empty());
        assert_eq!(reads.get(), 0);
    }

    #[test]
    fn group_by_first_letter() {
        let fruit = from_vec(vec!["apple", "banana", "avocado"]);
        let groups = fruit.group_by(|f| f.as_bytes()[0]).to_vec();
        assert_eq!(groups.len(), 2);
        assert_eq!(*groups[0].key(), b'a');
        assert_eq!(groups[0].elements(), ["apple", "avocado"]);
        assert_eq!(*groups[1].key(), b'b');
        assert_eq!(groups[1].elements(), ["banana"]);
    }

    #[test]
    fn group_by_with_elements_and_comparer() {
        let words = from_vec(vec!["Rust", "go", "rust", "Go", "zig"]);
        let groups = words
            .group_by(|w| w.to_string())
            .elements(|w| w.len())
            .with_comparer(by_key(|k: &String| k.to_lowercase()))
            .to_vec();
        let summary: Vec<(String, Vec<usize>)> = groups
            .into_iter()
            .map(|g| {
                let (key, items) = g.into_parts();
                (key, items)
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Rust".to_string(), vec![4, 4]),
                ("go".to_string(), vec![2, 2]),
                ("zig".to_string(), vec![3]),
            ]
        );
    }

    #[test]
    fn group_by_null_keys_form_one_group() {
        let groups = people()
            .group_by(|p| p.city)
            .with_comparer(NullableEq)
            .to_vec();
        let keys: Vec<Option<u32>> = groups.iter().map(|g| *g.key()).collect();
        assert_eq!(keys, vec![Some(1), Some(2), None]);
    }

    #[test]
    fn group_by_is_lazy_and_retraversable() {
        let reads = Cell::new(0);
        let source = generate(|| {
            reads.set(reads.get() + 1);
            vec![1, 2, 3, 4]
        });
        let grouped = source.group_by(|n| n % 2);
        assert_eq!(reads.get(), 0);
        assert_eq!(grouped.count(), 2);
        assert_eq!(grouped.count(), 2);
        assert_eq!(reads.get(), 2);
    }

    #[test]
    fn group_by_result_selector() {
        let totals = from_vec(vec![("a", 1), ("b", 2), ("a", 3)])
            .group_by(|p| p.0)
            .elements(|p| p.1)
            .with_result(|k, vs| (*k, vs.iter().sum::<i32>()));
        assert_eq!(totals.to_vec(), vec![("a", 4), ("b", 2)]);
    }
}
