#![cfg(feature = "associative")]
//! Property-based tests for the binary search tree.
//!
//! These tests check that every mutation keeps the ordering, parent-link and
//! size invariants, and that the tree agrees with `BTreeMap`/`BTreeSet` as a
//! model.

use std::collections::{BTreeMap, BTreeSet};

use bst_containers::associative::{Multiset, Tree};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn small_keys(max_size: usize) -> impl Strategy<Value = Vec<i16>> {
    prop::collection::vec(-50_i16..50, 0..max_size)
}

fn build(keys: &[i16], allow_duplicates: bool) -> Tree<i16, usize> {
    let mut tree = Tree::with_duplicates(allow_duplicates);
    for (order, key) in keys.iter().enumerate() {
        tree.push(*key, order);
    }
    tree
}

// =============================================================================
// Insertion Laws
// =============================================================================

proptest! {
    /// Law: in-order traversal of a unique tree equals the sorted, deduplicated input.
    #[test]
    fn prop_unique_tree_matches_btreeset(keys in small_keys(64)) {
        let tree = build(&keys, false);
        let model: BTreeSet<i16> = keys.iter().copied().collect();
        prop_assert_eq!(tree.keys().copied().collect::<Vec<_>>(), model.into_iter().collect::<Vec<_>>());
        prop_assert_eq!(tree.check_invariants(), Ok(()));
    }

    /// Law: a tree that allows duplicates keeps every key, sorted.
    #[test]
    fn prop_duplicate_tree_is_sorted_input(keys in small_keys(64)) {
        let tree = build(&keys, true);
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        prop_assert_eq!(tree.keys().copied().collect::<Vec<_>>(), sorted);
        prop_assert_eq!(tree.len(), keys.len());
        prop_assert_eq!(tree.check_invariants(), Ok(()));
    }

    /// Law: the first inserted value wins for a repeated key.
    #[test]
    fn prop_first_value_wins(keys in small_keys(64)) {
        let tree = build(&keys, false);
        let mut model = BTreeMap::new();
        for (order, key) in keys.iter().enumerate() {
            model.entry(*key).or_insert(order);
        }
        for (key, order) in &model {
            prop_assert_eq!(tree.at(key), Ok(order));
        }
    }

    /// Law: reverse iteration is the reverse of forward iteration.
    #[test]
    fn prop_reverse_iteration(keys in small_keys(64), allow in any::<bool>()) {
        let tree = build(&keys, allow);
        let forward: Vec<i16> = tree.keys().copied().collect();
        let mut backward: Vec<i16> = tree.keys().rev().copied().collect();
        backward.reverse();
        prop_assert_eq!(forward, backward);
    }
}

// =============================================================================
// Erase Laws
// =============================================================================

proptest! {
    /// Law: erasing any subset keeps invariants and matches the model.
    #[test]
    fn prop_erase_matches_model(
        keys in small_keys(64),
        erased in small_keys(32),
        allow in any::<bool>()
    ) {
        let mut tree = build(&keys, allow);
        let mut model: Vec<i16> = tree.keys().copied().collect();
        for key in erased {
            if let Some(position) = tree.position_of(&key) {
                prop_assert_eq!(tree.erase(position).map(|(erased_key, _)| erased_key), Ok(key));
                let index = model.iter().position(|candidate| *candidate == key).unwrap();
                model.remove(index);
            }
            prop_assert_eq!(tree.check_invariants(), Ok(()));
        }
        prop_assert_eq!(tree.keys().copied().collect::<Vec<_>>(), model);
    }

    /// Law: erase invalidates only the erased position.
    #[test]
    fn prop_erase_keeps_other_positions(keys in small_keys(32), pick in any::<prop::sample::Index>()) {
        prop_assume!(!keys.is_empty());
        let mut tree = build(&keys, true);
        let positions: Vec<_> = {
            let mut cursor = tree.begin();
            let mut positions = Vec::new();
            while let Some(position) = cursor.position() {
                positions.push(position);
                cursor.move_next();
            }
            positions
        };
        let victim = positions[pick.index(positions.len())];
        tree.erase(victim).unwrap();
        for position in positions {
            prop_assert_eq!(tree.key(position).is_ok(), position != victim);
        }
    }
}

// =============================================================================
// Merge Laws
// =============================================================================

proptest! {
    /// Law: merging unique trees yields the union, leaving the intersection behind.
    #[test]
    fn prop_merge_is_union(left in small_keys(32), right in small_keys(32)) {
        let mut target = build(&left, false);
        let mut source = build(&right, false);
        target.merge(&mut source);

        let left_set: BTreeSet<i16> = left.into_iter().collect();
        let right_set: BTreeSet<i16> = right.into_iter().collect();
        prop_assert_eq!(
            target.keys().copied().collect::<BTreeSet<_>>(),
            left_set.union(&right_set).copied().collect::<BTreeSet<_>>()
        );
        prop_assert_eq!(
            source.keys().copied().collect::<BTreeSet<_>>(),
            left_set.intersection(&right_set).copied().collect::<BTreeSet<_>>()
        );
        prop_assert_eq!(target.check_invariants(), Ok(()));
        prop_assert_eq!(source.check_invariants(), Ok(()));
    }

    /// Law: multiset counts add up under merge.
    #[test]
    fn prop_multiset_merge_adds_counts(left in small_keys(32), right in small_keys(32), probe in -50_i16..50) {
        let mut target: Multiset<i16> = left.iter().copied().collect();
        let mut source: Multiset<i16> = right.iter().copied().collect();
        let expected = target.count(&probe) + source.count(&probe);
        target.merge(&mut source);
        prop_assert_eq!(target.count(&probe), expected);
        prop_assert!(source.is_empty());
    }
}
