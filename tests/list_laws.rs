#![cfg(feature = "sequential")]
//! Property-based tests for `List` and `Vector`, using `Vec` as the model.

use std::cmp::Ordering;

use bst_containers::sequential::{List, Vector};
use proptest::prelude::*;

/// A value ordered by `key` only, so that `tag` exposes reordering of equals.
#[derive(Debug, Clone, Copy)]
struct Keyed {
    key: u8,
    tag: u16,
}

impl PartialEq for Keyed {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Keyed {}

impl PartialOrd for Keyed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Keyed {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

fn keyed(keys: &[u8], first_tag: u16) -> Vec<Keyed> {
    keys.iter()
        .zip(first_tag..)
        .map(|(key, tag)| Keyed { key: *key, tag })
        .collect()
}

fn tags(values: impl IntoIterator<Item = Keyed>) -> Vec<(u8, u16)> {
    values.into_iter().map(|value| (value.key, value.tag)).collect()
}

fn values(max_size: usize) -> impl Strategy<Value = Vec<i8>> {
    prop::collection::vec(any::<i8>(), 0..max_size)
}

// =============================================================================
// List Laws
// =============================================================================

proptest! {
    /// Law: sort is a stable sort.
    #[test]
    fn prop_sort_is_stable(keys in prop::collection::vec(0_u8..8, 0..64)) {
        let input = keyed(&keys, 0);
        let mut list: List<Keyed> = input.iter().copied().collect();
        let mut model = input;
        list.sort();
        model.sort();
        prop_assert_eq!(tags(list.iter().copied()), tags(model));
    }

    /// Law: merge of sorted lists is a stable sort of their concatenation,
    /// with elements of the receiving list first among equals.
    #[test]
    fn prop_merge_is_stable(
        left in prop::collection::vec(0_u8..8, 0..32),
        right in prop::collection::vec(0_u8..8, 0..32)
    ) {
        let mut left_values = keyed(&left, 0);
        let mut right_values = keyed(&right, 1000);
        left_values.sort();
        right_values.sort();

        let mut target: List<Keyed> = left_values.iter().copied().collect();
        let mut source: List<Keyed> = right_values.iter().copied().collect();
        target.merge(&mut source);

        let mut model = left_values;
        model.extend(right_values);
        model.sort();
        prop_assert_eq!(tags(target.iter().copied()), tags(model));
        prop_assert!(source.is_empty());
    }

    /// Law: reverse matches `Vec::reverse`, from both ends.
    #[test]
    fn prop_reverse_matches_vec(input in values(64)) {
        let mut list: List<i8> = input.iter().copied().collect();
        list.reverse();
        let mut model = input;
        model.reverse();
        prop_assert_eq!(list.iter().copied().collect::<Vec<_>>(), model.clone());
        prop_assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), model.into_iter().rev().collect::<Vec<_>>());
    }

    /// Law: unique matches `Vec::dedup`.
    #[test]
    fn prop_unique_matches_dedup(input in prop::collection::vec(0_i8..4, 0..64)) {
        let mut list: List<i8> = input.iter().copied().collect();
        list.unique();
        let mut model = input;
        model.dedup();
        prop_assert_eq!(list.iter().copied().collect::<Vec<_>>(), model);
    }

    /// Law: push and pop at both ends behave like a double-ended queue.
    #[test]
    fn prop_deque_operations(operations in prop::collection::vec((0_u8..4, any::<i8>()), 0..128)) {
        let mut list = List::new();
        let mut model = std::collections::VecDeque::new();
        for (operation, value) in operations {
            match operation {
                0 => {
                    list.push_front(value);
                    model.push_front(value);
                }
                1 => {
                    list.push_back(value);
                    model.push_back(value);
                }
                2 => prop_assert_eq!(list.pop_front(), model.pop_front()),
                _ => prop_assert_eq!(list.pop_back(), model.pop_back()),
            }
            prop_assert_eq!(list.len(), model.len());
        }
        prop_assert_eq!(list.into_iter().collect::<Vec<_>>(), model.into_iter().collect::<Vec<_>>());
    }
}

// =============================================================================
// Vector Laws
// =============================================================================

proptest! {
    /// Law: capacity is always a power of two (or zero) under push-only growth.
    #[test]
    fn prop_push_capacity_is_power_of_two(input in values(200)) {
        let vector: Vector<i8> = input.iter().copied().collect();
        let capacity = vector.capacity();
        prop_assert!(capacity == 0 || capacity.is_power_of_two());
        prop_assert!(capacity >= vector.len());
        prop_assert!(capacity < 2 * vector.len().max(1));
    }

    /// Law: insert_many at an index matches `Vec::splice` at that index.
    #[test]
    fn prop_insert_many_matches_splice(
        input in values(32),
        inserted in values(16),
        pick in any::<prop::sample::Index>()
    ) {
        let index = pick.index(input.len() + 1);
        let mut vector: Vector<i8> = input.iter().copied().collect();
        let end = vector.insert_many(index, inserted.iter().copied()).unwrap();

        let mut model = input;
        model.splice(index..index, inserted.iter().copied());
        prop_assert_eq!(end, index + inserted.len());
        prop_assert_eq!(vector.as_slice(), model.as_slice());
    }
}
