//! Doubly-linked list with stable positions.
//!
//! This module provides [`List`], a doubly-linked list whose nodes live in an
//! arena and link to their neighbours by slot index.
//!
//! # Overview
//!
//! - O(1) push and pop at both ends
//! - O(1) insert and erase at a [`ListPosition`]
//! - O(n log n) stable `sort` that relinks nodes instead of moving values
//! - O(n + m) `merge` of two sorted lists
//!
//! A [`ListPosition`] stays valid until its own element is erased, no matter
//! how the list is reordered around it.
//!
//! # Examples
//!
//! ```rust
//! use bst_containers::sequential::List;
//!
//! let mut list: List<i32> = [3, 1, 2].into_iter().collect();
//! let one = list.position_of(&1).unwrap();
//!
//! list.sort();
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
//! assert_eq!(list.get(one), Ok(&1));
//! ```

use std::fmt;
use std::iter::FusedIterator;

use tracing::debug;

use crate::arena::Arena;
use crate::error::{ContainerError, Result};

// =============================================================================
// Node and Position
// =============================================================================

#[derive(Clone, Debug)]
struct ListNode<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

/// A detached handle to one element of a [`List`].
///
/// Handles survive every operation except erasing their own element; after
/// that, list operations given the handle fail with
/// [`ContainerError::StalePosition`]. So do handles passed to a list other
/// than the one that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListPosition {
    arena: u64,
    index: usize,
    generation: u32,
}

// =============================================================================
// List Definition
// =============================================================================

/// A doubly-linked list.
///
/// Positions passed to [`List::insert`], [`List::insert_many`] and
/// [`List::splice`] name the element to insert *before*; `None` stands for
/// the end of the list.
pub struct List<T> {
    nodes: Arena<ListNode<T>>,
    head: Option<usize>,
    tail: Option<usize>,
    length: usize,
}

impl<T> List<T> {
    /// Creates an empty list.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            head: None,
            tail: None,
            length: 0,
        }
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the list is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Upper bound on the number of elements.
    #[must_use]
    pub const fn max_size(&self) -> usize {
        let node_size = std::mem::size_of::<ListNode<T>>();
        let node_size = if node_size == 0 { 1 } else { node_size };
        isize::MAX.unsigned_abs() / node_size
    }

    /// Returns the first element.
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.head.map(|index| &self.nodes[index].value)
    }

    /// Returns the last element.
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        self.tail.map(|index| &self.nodes[index].value)
    }

    /// Returns the first element mutably.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        let index = self.head?;
        Some(&mut self.nodes[index].value)
    }

    /// Returns the last element mutably.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        let index = self.tail?;
        Some(&mut self.nodes[index].value)
    }

    /// Prepends `value`.
    pub fn push_front(&mut self, value: T) {
        self.link_before(self.head, value);
    }

    /// Appends `value`.
    pub fn push_back(&mut self, value: T) {
        self.link_before(None, value);
    }

    /// Removes and returns the first element.
    pub fn pop_front(&mut self) -> Option<T> {
        self.head.map(|index| self.unlink(index))
    }

    /// Removes and returns the last element.
    pub fn pop_back(&mut self) -> Option<T> {
        self.tail.map(|index| self.unlink(index))
    }

    /// Inserts `value` before `before` (or at the end for `None`) and returns
    /// its position.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::StalePosition`] if `before` has been erased.
    pub fn insert(&mut self, before: Option<ListPosition>, value: T) -> Result<ListPosition> {
        let before = self.resolve_optional(before)?;
        let index = self.link_before(before, value);
        Ok(self.position_for(index))
    }

    /// Inserts every value of `values` before `before`, keeping their order,
    /// and returns their positions.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::StalePosition`] if `before` has been erased.
    /// Nothing is inserted in that case.
    pub fn insert_many<I>(&mut self, before: Option<ListPosition>, values: I) -> Result<Vec<ListPosition>>
    where
        I: IntoIterator<Item = T>,
    {
        let before = self.resolve_optional(before)?;
        Ok(values
            .into_iter()
            .map(|value| {
                let index = self.link_before(before, value);
                self.position_for(index)
            })
            .collect())
    }

    /// Appends every value of `values` in order.
    pub fn insert_many_back<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.push_back(value);
        }
    }

    /// Inserts every value of `values` at the front, keeping their order.
    ///
    /// ```rust
    /// use bst_containers::sequential::List;
    ///
    /// let mut list: List<i32> = [4, 5].into_iter().collect();
    /// list.insert_many_front([1, 2, 3]);
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    /// ```
    pub fn insert_many_front<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        let before = self.head;
        for value in values {
            self.link_before(before, value);
        }
    }

    /// Removes and returns the element at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::StalePosition`] if it was already erased.
    pub fn erase(&mut self, position: ListPosition) -> Result<T> {
        let index = self.resolve(position)?;
        Ok(self.unlink(index))
    }

    /// Returns the element at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::StalePosition`] if it has been erased.
    pub fn get(&self, position: ListPosition) -> Result<&T> {
        self.resolve(position).map(|index| &self.nodes[index].value)
    }

    /// Returns the element at `position` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::StalePosition`] if it has been erased.
    pub fn get_mut(&mut self, position: ListPosition) -> Result<&mut T> {
        let index = self.resolve(position)?;
        Ok(&mut self.nodes[index].value)
    }

    /// Removes every element and releases the node storage.
    ///
    /// Positions issued before the call are stale afterwards.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
        self.length = 0;
    }

    /// Exchanges the contents of two lists.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Moves every element of `other` before `before`, leaving `other` empty.
    ///
    /// Positions into `self` stay valid; positions into `other` do not carry
    /// over unless `self` was empty, in which case the lists exchange storage.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::StalePosition`] if `before` has been erased.
    pub fn splice(&mut self, before: Option<ListPosition>, other: &mut Self) -> Result<()> {
        let before = self.resolve_optional(before)?;
        if self.is_empty() {
            self.swap(other);
            debug!(moved = self.length, "spliced into empty list by exchange");
            return Ok(());
        }
        let moved = other.length;
        while let Some(value) = other.pop_front() {
            self.link_before(before, value);
        }
        debug!(moved, "spliced list");
        Ok(())
    }

    /// Reverses the order of the elements in place.
    pub fn reverse(&mut self) {
        let mut current = self.head;
        while let Some(index) = current {
            let node = &mut self.nodes[index];
            std::mem::swap(&mut node.prev, &mut node.next);
            current = node.prev;
        }
        std::mem::swap(&mut self.head, &mut self.tail);
    }

    /// Returns a cursor on the first element, or the end cursor if empty.
    #[must_use]
    pub const fn begin(&self) -> ListCursor<'_, T> {
        ListCursor {
            list: self,
            index: self.head,
        }
    }

    /// Returns the end cursor.
    #[must_use]
    pub const fn end(&self) -> ListCursor<'_, T> {
        ListCursor {
            list: self,
            index: None,
        }
    }

    /// Returns a cursor on the element at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::StalePosition`] if it has been erased.
    pub fn cursor(&self, position: ListPosition) -> Result<ListCursor<'_, T>> {
        let index = self.resolve(position)?;
        Ok(ListCursor {
            list: self,
            index: Some(index),
        })
    }

    /// Returns an iterator from front to back.
    #[must_use]
    pub fn iter(&self) -> ListIter<'_, T> {
        ListIter {
            list: self,
            front: self.head,
            back: self.tail,
            remaining: self.length,
        }
    }

    /// Returns an iterator of mutable references from front to back.
    pub fn iter_mut(&mut self) -> ListIterMut<'_, T> {
        let order = self.link_order();
        let mut occupants = self.nodes.occupants_mut();
        let values: Vec<&mut T> = order
            .into_iter()
            .filter_map(|index| occupants[index].take())
            .map(|node| &mut node.value)
            .collect();
        ListIterMut {
            values: values.into_iter(),
        }
    }

    // =========================================================================
    // Link Helpers
    // =========================================================================

    fn position_for(&self, index: usize) -> ListPosition {
        ListPosition {
            arena: self.nodes.id(),
            index,
            generation: self.nodes.slot_generation(index),
        }
    }

    fn resolve(&self, position: ListPosition) -> Result<usize> {
        if self
            .nodes
            .is_live(position.arena, position.index, position.generation)
        {
            Ok(position.index)
        } else {
            Err(ContainerError::StalePosition)
        }
    }

    fn resolve_optional(&self, position: Option<ListPosition>) -> Result<Option<usize>> {
        position.map(|position| self.resolve(position)).transpose()
    }

    fn link_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.length);
        let mut current = self.head;
        while let Some(index) = current {
            order.push(index);
            current = self.nodes[index].next;
        }
        order
    }

    /// Links a new node holding `value` before `before` (`None` = end).
    fn link_before(&mut self, before: Option<usize>, value: T) -> usize {
        let prev = match before {
            Some(next) => self.nodes[next].prev,
            None => self.tail,
        };
        let index = self.nodes.insert(ListNode {
            value,
            prev,
            next: before,
        });
        match prev {
            Some(prev) => self.nodes[prev].next = Some(index),
            None => self.head = Some(index),
        }
        match before {
            Some(next) => self.nodes[next].prev = Some(index),
            None => self.tail = Some(index),
        }
        self.length += 1;
        index
    }

    fn unlink(&mut self, index: usize) -> T {
        let ListNode { value, prev, next } = self.nodes.remove(index);
        match prev {
            Some(prev) => self.nodes[prev].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.nodes[next].prev = prev,
            None => self.tail = prev,
        }
        self.length -= 1;
        value
    }

    /// Rewrites every link so the nodes follow `order`.
    fn relink(&mut self, order: &[usize]) {
        for (offset, &index) in order.iter().enumerate() {
            let node = &mut self.nodes[index];
            node.prev = offset.checked_sub(1).map(|previous| order[previous]);
            node.next = order.get(offset + 1).copied();
        }
        self.head = order.first().copied();
        self.tail = order.last().copied();
    }
}

impl<T: PartialEq> List<T> {
    /// Returns the position of the first element equal to `value`.
    #[must_use]
    pub fn position_of(&self, value: &T) -> Option<ListPosition> {
        let mut current = self.head;
        while let Some(index) = current {
            if self.nodes[index].value == *value {
                return Some(self.position_for(index));
            }
            current = self.nodes[index].next;
        }
        None
    }

    /// Returns `true` if an element equal to `value` is present.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.position_of(value).is_some()
    }

    /// Removes every element equal to the one immediately before it.
    ///
    /// ```rust
    /// use bst_containers::sequential::List;
    ///
    /// let mut list: List<i32> = [1, 1, 2, 1, 3, 3].into_iter().collect();
    /// list.unique();
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 1, 3]);
    /// ```
    pub fn unique(&mut self) {
        let Some(mut kept) = self.head else {
            return;
        };
        let mut current = self.nodes[kept].next;
        while let Some(index) = current {
            current = self.nodes[index].next;
            if self.nodes[index].value == self.nodes[kept].value {
                self.unlink(index);
            } else {
                kept = index;
            }
        }
    }
}

impl<T: Ord> List<T> {
    /// Sorts the list in ascending order. The sort is stable.
    ///
    /// Nodes are relinked rather than moved, so every position keeps
    /// referring to the same value.
    pub fn sort(&mut self) {
        let mut order = self.link_order();
        order.sort_by(|&left, &right| self.nodes[left].value.cmp(&self.nodes[right].value));
        self.relink(&order);
        debug!(length = self.length, "sorted list");
    }

    /// Merges the sorted list `other` into this sorted list, leaving `other`
    /// empty.
    ///
    /// Equal elements keep their relative order, with those already in `self`
    /// first. If either list is unsorted the result is some interleaving of
    /// the two.
    ///
    /// ```rust
    /// use bst_containers::sequential::List;
    ///
    /// let mut left: List<i32> = [1, 3, 5].into_iter().collect();
    /// let mut right: List<i32> = [2, 3, 6].into_iter().collect();
    /// left.merge(&mut right);
    /// assert_eq!(left.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 3, 5, 6]);
    /// assert!(right.is_empty());
    /// ```
    pub fn merge(&mut self, other: &mut Self) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            self.swap(other);
            debug!(moved = self.length, "merged into empty list by exchange");
            return;
        }
        let moved = other.length;
        let mut current = self.head;
        while let Some(value) = other.pop_front() {
            while let Some(index) = current
                && self.nodes[index].value <= value
            {
                current = self.nodes[index].next;
            }
            self.link_before(current, value);
        }
        debug!(moved, length = self.length, "merged list");
    }
}

// =============================================================================
// Cursor
// =============================================================================

/// A read-only cursor over a [`List`].
///
/// The end position sits between the back and the front: moving forward from
/// end reaches the first element and moving back from end reaches the last.
pub struct ListCursor<'a, T> {
    list: &'a List<T>,
    index: Option<usize>,
}

impl<'a, T> ListCursor<'a, T> {
    /// Returns `true` if this is the end cursor.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.index.is_none()
    }

    /// Returns the element under the cursor, or `None` at end.
    #[must_use]
    pub fn get(&self) -> Option<&'a T> {
        let list = self.list;
        self.index.map(|index| &list.nodes[index].value)
    }

    /// Returns a detached handle to the element under the cursor.
    #[must_use]
    pub fn position(&self) -> Option<ListPosition> {
        self.index.map(|index| self.list.position_for(index))
    }

    /// Moves towards the back.
    pub fn move_next(&mut self) {
        self.index = match self.index {
            None => self.list.head,
            Some(index) => self.list.nodes[index].next,
        };
    }

    /// Moves towards the front.
    pub fn move_prev(&mut self) {
        self.index = match self.index {
            None => self.list.tail,
            Some(index) => self.list.nodes[index].prev,
        };
    }

    /// Returns a copy of this cursor moved towards the back.
    #[must_use]
    pub fn next_cursor(&self) -> Self {
        let mut next = *self;
        next.move_next();
        next
    }

    /// Returns a copy of this cursor moved towards the front.
    #[must_use]
    pub fn prev_cursor(&self) -> Self {
        let mut previous = *self;
        previous.move_prev();
        previous
    }
}

impl<T> Clone for ListCursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ListCursor<'_, T> {}

impl<T> PartialEq for ListCursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.list, other.list) && self.index == other.index
    }
}

impl<T> Eq for ListCursor<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for ListCursor<'_, T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => formatter.debug_tuple("ListCursor").field(value).finish(),
            None => formatter.write_str("ListCursor(end)"),
        }
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Borrowing iterator over a [`List`], front to back.
pub struct ListIter<'a, T> {
    list: &'a List<T>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for ListIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let list = self.list;
        let node = &list.nodes[self.front?];
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for ListIter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let list = self.list;
        let node = &list.nodes[self.back?];
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<T> ExactSizeIterator for ListIter<'_, T> {}

impl<T> FusedIterator for ListIter<'_, T> {}

/// Iterator of mutable references over a [`List`], front to back.
pub struct ListIterMut<'a, T> {
    values: std::vec::IntoIter<&'a mut T>,
}

impl<'a, T> Iterator for ListIterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.values.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<T> DoubleEndedIterator for ListIterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.values.next_back()
    }
}

impl<T> ExactSizeIterator for ListIterMut<'_, T> {}

/// Owning iterator over a [`List`], front to back.
pub struct ListIntoIter<T> {
    list: List<T>,
}

impl<T> Iterator for ListIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T> DoubleEndedIterator for ListIntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.list.pop_back()
    }
}

impl<T> ExactSizeIterator for ListIntoIter<T> {}

impl<T> FusedIterator for ListIntoIter<T> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies the elements into a freshly packed list.
impl<T: Clone> Clone for List<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: PartialEq> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for List<T> {}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for List<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_many_back(iter);
    }
}

impl<T> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = ListIntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        ListIntoIter { list: self }
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = ListIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut List<T> {
    type Item = &'a mut T;
    type IntoIter = ListIterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

static_assertions::assert_impl_all!(List<String>: Send, Sync);

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for List<T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for List<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let values = <Vec<T> as serde::Deserialize<'de>>::deserialize(deserializer)?;
        Ok(values.into_iter().collect())
    }
}

// =============================================================================
// Tests
// =============================================================================
