#![cfg(feature = "sequential")]
//! Integration tests for `List`.

use bst_containers::ContainerError;
use bst_containers::sequential::List;
use rstest::rstest;

fn contents<T: Copy>(list: &List<T>) -> Vec<T> {
    list.iter().copied().collect()
}

// =============================================================================
// End Operations
// =============================================================================

#[rstest]
fn test_front_and_back_mut() {
    let mut list: List<i32> = [1, 2, 3].into_iter().collect();
    *list.front_mut().unwrap() = 10;
    *list.back_mut().unwrap() = 30;
    assert_eq!(contents(&list), vec![10, 2, 30]);
}

#[rstest]
fn test_insert_many_front_and_back() {
    let mut list = List::new();
    list.insert_many_back([3, 4]);
    list.insert_many_front([1, 2]);
    assert_eq!(contents(&list), vec![1, 2, 3, 4]);
    assert_eq!(list.len(), 4);
}

// =============================================================================
// Positional Operations
// =============================================================================

#[rstest]
fn test_positions_survive_unrelated_erases() {
    let mut list: List<char> = "abcde".chars().collect();
    let c = list.position_of(&'c').unwrap();
    for letter in ['a', 'e', 'b'] {
        let position = list.position_of(&letter).unwrap();
        list.erase(position).unwrap();
    }
    assert_eq!(list.get(c), Ok(&'c'));
    assert_eq!(contents(&list), vec!['c', 'd']);
}

#[rstest]
fn test_stale_position_after_clear() {
    let mut list: List<i32> = [1].into_iter().collect();
    let position = list.position_of(&1).unwrap();
    list.clear();
    list.push_back(2);
    assert_eq!(list.get(position), Err(ContainerError::StalePosition));
}

#[rstest]
fn test_cursor_walk_both_ways() {
    let list: List<i32> = (1..=4).collect();
    let mut forward = Vec::new();
    let mut cursor = list.begin();
    while let Some(value) = cursor.get() {
        forward.push(*value);
        cursor.move_next();
    }
    let mut backward = Vec::new();
    cursor.move_prev();
    while let Some(value) = cursor.get() {
        backward.push(*value);
        cursor.move_prev();
    }
    assert_eq!(forward, vec![1, 2, 3, 4]);
    assert_eq!(backward, vec![4, 3, 2, 1]);
}

// =============================================================================
// Whole-List Operations
// =============================================================================

#[rstest]
#[case(&[], &[])]
#[case(&[5, 1, 4, 2, 3], &[1, 2, 3, 4, 5])]
#[case(&[2, 2, 1, 1], &[1, 1, 2, 2])]
fn test_sort(#[case] values: &[i32], #[case] expected: &[i32]) {
    let mut list: List<i32> = values.iter().copied().collect();
    list.sort();
    assert_eq!(contents(&list), expected);
}

#[rstest]
fn test_sort_then_unique_deduplicates() {
    let mut list: List<i32> = [3, 1, 3, 2, 1].into_iter().collect();
    list.sort();
    list.unique();
    assert_eq!(contents(&list), vec![1, 2, 3]);
}

#[rstest]
fn test_merge_leaves_other_empty() {
    let mut left: List<i32> = [1, 3, 5].into_iter().collect();
    let mut right: List<i32> = [2, 4, 6, 8].into_iter().collect();
    left.merge(&mut right);
    assert_eq!(contents(&left), vec![1, 2, 3, 4, 5, 6, 8]);
    assert!(right.is_empty());
    assert_eq!(right.front(), None);
}

#[rstest]
fn test_splice_at_front_and_end() {
    let mut list: List<i32> = [3].into_iter().collect();
    let mut front: List<i32> = [1, 2].into_iter().collect();
    let mut back: List<i32> = [4, 5].into_iter().collect();
    let head = list.begin().position();
    list.splice(head, &mut front).unwrap();
    list.splice(None, &mut back).unwrap();
    assert_eq!(contents(&list), vec![1, 2, 3, 4, 5]);
    assert!(front.is_empty() && back.is_empty());
}

#[rstest]
fn test_splice_with_stale_position_fails() {
    let mut list: List<i32> = [1, 2].into_iter().collect();
    let position = list.position_of(&1).unwrap();
    list.erase(position).unwrap();
    let mut other: List<i32> = [9].into_iter().collect();
    assert_eq!(list.splice(Some(position), &mut other), Err(ContainerError::StalePosition));
    assert_eq!(other.len(), 1);
}

#[rstest]
fn test_reverse_twice_is_identity() {
    let original: List<i32> = (0..6).collect();
    let mut list = original.clone();
    list.reverse();
    assert_eq!(contents(&list), vec![5, 4, 3, 2, 1, 0]);
    list.reverse();
    assert_eq!(list, original);
}

#[rstest]
fn test_swap_and_max_size() {
    let mut left: List<i32> = [1].into_iter().collect();
    let mut right: List<i32> = [2, 3].into_iter().collect();
    left.swap(&mut right);
    assert_eq!(contents(&left), vec![2, 3]);
    assert_eq!(contents(&right), vec![1]);
    assert!(left.max_size() > 1_000_000);
}

#[rstest]
fn test_splice_rejects_position_from_another_list() {
    let donor: List<i32> = [10].into_iter().collect();
    let mut list: List<i32> = [99].into_iter().collect();
    let mut other: List<i32> = [1].into_iter().collect();
    let foreign = donor.position_of(&10);
    assert_eq!(list.splice(foreign, &mut other), Err(ContainerError::StalePosition));
    assert_eq!(contents(&list), vec![99]);
    assert_eq!(other.len(), 1);
}
