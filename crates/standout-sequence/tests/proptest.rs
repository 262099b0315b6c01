//! Property-based tests for sequence operators using proptest.

use std::collections::HashSet;

use proptest::prelude::*;
use standout_sequence::{from_vec, Sequence};

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone)]
struct TestItem {
    group: u8,
    rank: u8,
    id: usize,
}

// Strategy to generate items with many key collisions
fn test_items_strategy() -> impl Strategy<Value = Vec<TestItem>> {
    prop::collection::vec((0u8..5, 0u8..4), 0..60).prop_map(|pairs| {
        pairs
            .into_iter()
            .enumerate()
            .map(|(id, (group, rank))| TestItem { group, rank, id })
            .collect()
    })
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Chained filters behave like one filter with both predicates.
    #[test]
    fn chained_filters_fuse(
        items in prop::collection::vec(any::<i32>(), 0..100),
        a in 1i32..10,
        b in 1i32..10,
    ) {
        let chained = from_vec(items.clone())
            .filter(|x| x % a == 0)
            .filter(|x| x % b == 0)
            .to_vec();
        let single = from_vec(items)
            .filter(|x| x % a == 0 && x % b == 0)
            .to_vec();
        prop_assert_eq!(chained, single);
    }

    /// Chained maps behave like one map of the composed functions.
    #[test]
    fn chained_maps_compose(items in prop::collection::vec(any::<i16>(), 0..100)) {
        let f = |x: i16| i64::from(x) * 3;
        let g = |x: i64| x - 7;
        let chained = from_vec(items.clone()).map(f).map(g).to_vec();
        let composed = from_vec(items).map(|x| g(f(x))).to_vec();
        prop_assert_eq!(chained, composed);
    }

    /// Filter then map matches the std iterator pipeline.
    #[test]
    fn filter_map_matches_std(items in prop::collection::vec(any::<i32>(), 0..100)) {
        let ours = from_vec(items.clone())
            .filter(|x| *x > 0)
            .map(|x| x / 2)
            .to_vec();
        let expected: Vec<i32> = items
            .into_iter()
            .filter(|x| *x > 0)
            .map(|x| x / 2)
            .collect();
        prop_assert_eq!(ours, expected);
    }

    /// Distinct keeps the first occurrence of each value, in order.
    #[test]
    fn distinct_keeps_first_occurrences(items in prop::collection::vec(0u8..20, 0..100)) {
        let distinct = from_vec(items.clone()).distinct().to_vec();

        let mut seen = HashSet::new();
        let expected: Vec<u8> = items.into_iter().filter(|x| seen.insert(*x)).collect();
        prop_assert_eq!(distinct, expected);
    }

    /// Distinct is idempotent.
    #[test]
    fn distinct_is_idempotent(items in prop::collection::vec(0u8..20, 0..100)) {
        let once = from_vec(items.clone()).distinct();
        let twice = from_vec(items).distinct().distinct();
        prop_assert_eq!(once.to_vec(), twice.to_vec());
    }

    /// Set operators agree with membership in the inputs.
    #[test]
    fn set_operators_respect_membership(
        a in prop::collection::vec(0u8..15, 0..40),
        b in prop::collection::vec(0u8..15, 0..40),
    ) {
        let in_b: HashSet<u8> = b.iter().copied().collect();
        let intersect = from_vec(a.clone()).intersect(from_vec(b.clone())).to_vec();
        let except = from_vec(a.clone()).except(from_vec(b.clone())).to_vec();
        let union = from_vec(a.clone()).union(from_vec(b)).to_vec();

        prop_assert!(intersect.iter().all(|x| in_b.contains(x)));
        prop_assert!(except.iter().all(|x| !in_b.contains(x)));

        let distinct_a = from_vec(a).distinct().to_vec();
        prop_assert_eq!(intersect.len() + except.len(), distinct_a.len());
        prop_assert_eq!(&union[..distinct_a.len()], &distinct_a[..]);
    }

    /// order_by + then_by equals a stable std sort on the same keys.
    #[test]
    fn ordering_is_stable(items in test_items_strategy()) {
        let ours: Vec<usize> = from_vec(items.clone())
            .order_by(|t| t.group)
            .then_by_descending(|t| t.rank)
            .map(|t| t.id)
            .to_vec();

        let mut expected = items;
        expected.sort_by(|a, b| a.group.cmp(&b.group).then(b.rank.cmp(&a.rank)));
        let expected: Vec<usize> = expected.into_iter().map(|t| t.id).collect();
        prop_assert_eq!(ours, expected);
    }

    /// Descending order reverses ascending order only across distinct keys.
    #[test]
    fn descending_keeps_ties_in_source_order(items in test_items_strategy()) {
        let sorted = from_vec(items).order_by_descending(|t| t.group).to_vec();
        for pair in sorted.windows(2) {
            prop_assert!(pair[0].group >= pair[1].group);
            if pair[0].group == pair[1].group {
                prop_assert!(pair[0].id < pair[1].id);
            }
        }
    }

    /// Lookups keep first-insertion key order and per-group element order.
    #[test]
    fn lookup_preserves_insertion_order(items in test_items_strategy()) {
        let lookup = from_vec(items.clone()).to_lookup(|t| t.group);

        let mut seen = HashSet::new();
        let key_order: Vec<u8> = items
            .iter()
            .map(|t| t.group)
            .filter(|g| seen.insert(*g))
            .collect();
        let keys: Vec<u8> = lookup.iter().map(|g| *g.key()).collect();
        prop_assert_eq!(keys, key_order);

        for group in &lookup {
            let ids: Vec<usize> = group.iter().map(|t| t.id).collect();
            let expected: Vec<usize> = items
                .iter()
                .filter(|t| t.group == *group.key())
                .map(|t| t.id)
                .collect();
            prop_assert_eq!(ids, expected);
        }
        prop_assert!(lookup[&200].is_empty());
    }

    /// Join yields one row per matching pair; group_join one row per outer item.
    #[test]
    fn join_cardinalities(
        outer in prop::collection::vec(0u8..6, 0..30),
        inner in prop::collection::vec(0u8..6, 0..30),
    ) {
        let expected_pairs: usize = outer
            .iter()
            .map(|o| inner.iter().filter(|i| *i == o).count())
            .sum();

        let joined = from_vec(outer.clone())
            .join(from_vec(inner.clone()), |o| *o, |i| *i, |o, i| (*o, *i));
        prop_assert_eq!(joined.count(), expected_pairs);
        prop_assert!(joined.all(|(o, i)| o == i));

        let grouped = from_vec(outer.clone())
            .group_join(from_vec(inner.clone()), |o| *o, |i| *i, |o, m| (o, m.len()))
            .to_vec();
        prop_assert_eq!(grouped.len(), outer.len());
        for (o, matched) in grouped {
            prop_assert_eq!(matched, inner.iter().filter(|i| **i == o).count());
        }
    }

    /// count agrees with a full traversal for every node shape.
    #[test]
    fn count_matches_traversal(
        items in prop::collection::vec(any::<u8>(), 0..80),
        n in 0usize..100,
    ) {
        let source = from_vec(items);
        let taken = source.by_ref().take(n);
        let skipped = source.by_ref().skip(n);
        prop_assert_eq!(taken.count(), taken.to_vec().len());
        prop_assert_eq!(skipped.count(), skipped.to_vec().len());
        prop_assert_eq!(
            source.by_ref().concat(source.by_ref()).count(),
            source.count() * 2
        );
    }

    /// reverse twice is the identity.
    #[test]
    fn double_reverse_is_identity(items in prop::collection::vec(any::<i64>(), 0..80)) {
        let back = from_vec(items.clone()).reverse().reverse().to_vec();
        prop_assert_eq!(back, items);
    }

    /// sum agrees with std whenever std does not overflow.
    #[test]
    fn sum_matches_checked_std(items in prop::collection::vec(any::<i32>(), 0..20)) {
        let expected = items.iter().try_fold(0i32, |acc, x| acc.checked_add(*x));
        let ours = from_vec(items).sum();
        prop_assert_eq!(ours.ok(), expected);
    }
}
