//! Ordered multiset: a set that keeps equal values side by side.

use std::borrow::Borrow;
use std::fmt;

use super::cursor::{Cursor, Position};
use super::set::{SetIntoIter, SetIter, write_braced};
use super::tree::Tree;
use crate::error::Result;

/// An ordered collection of values where equal values may repeat.
///
/// Every query that takes a value (`count`, `lower_bound`, `upper_bound`,
/// `equal_range`, `contains`) walks the values in order, so each costs O(n).
///
/// # Examples
///
/// ```rust
/// use bst_containers::associative::Multiset;
///
/// let bag: Multiset<i32> = [3, 1, 3, 2].into_iter().collect();
/// assert_eq!(bag.len(), 4);
/// assert_eq!(bag.count(&3), 2);
///
/// let (first, last) = bag.equal_range(&3);
/// assert_eq!(first.key(), Some(&3));
/// assert_eq!(last.key(), Some(&3));
/// assert_eq!(last.next_cursor(), bag.end());
/// ```
pub struct Multiset<T> {
    tree: Tree<T, ()>,
}

impl<T> Multiset<T> {
    /// Creates an empty multiset.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tree: Tree::with_duplicates(true),
        }
    }

    /// Returns the number of values, counting repeats.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the multiset is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Upper bound on the number of values.
    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.tree.max_size()
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Exchanges the contents of two multisets.
    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    /// Returns a cursor on the smallest value.
    #[must_use]
    pub fn begin(&self) -> Cursor<'_, T, ()> {
        self.tree.begin()
    }

    /// Returns the end cursor.
    #[must_use]
    pub const fn end(&self) -> Cursor<'_, T, ()> {
        self.tree.end()
    }

    /// Returns an iterator over the values in order, repeats included.
    #[must_use]
    pub fn iter(&self) -> SetIter<'_, T> {
        SetIter {
            inner: self.tree.iter(),
        }
    }

    /// Returns the value at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`StalePosition`](crate::ContainerError::StalePosition) if the
    /// value has been erased.
    pub fn get(&self, position: Position) -> Result<&T> {
        self.tree.key(position)
    }
}

impl<T: Ord> Multiset<T> {
    /// Inserts `value` and returns its position. Never rejects.
    ///
    /// A value equal to ones already present is placed before them in
    /// iteration order.
    pub fn insert(&mut self, value: T) -> Position {
        let (position, _) = self.tree.insert(value, ());
        position
    }

    /// Inserts every value of `values` and returns their positions.
    pub fn insert_many<I>(&mut self, values: I) -> Vec<Position>
    where
        I: IntoIterator<Item = T>,
    {
        values.into_iter().map(|value| self.insert(value)).collect()
    }

    /// Returns `true` if at least one equal value is present.
    #[must_use]
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains(value)
    }

    /// Returns a cursor on the first value equal to `value`, or the end cursor.
    #[must_use]
    pub fn find<Q>(&self, value: &Q) -> Cursor<'_, T, ()>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.find(value)
    }

    /// Returns the number of values equal to `value`.
    #[must_use]
    pub fn count<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.iter().filter(|item| (*item).borrow() == value).count()
    }

    /// Returns a cursor on the first value not less than `value`.
    #[must_use]
    pub fn lower_bound<Q>(&self, value: &Q) -> Cursor<'_, T, ()>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cursor = self.tree.begin();
        while cursor.key().is_some_and(|item| item.borrow() < value) {
            cursor.move_next();
        }
        cursor
    }

    /// Returns a cursor on the first value greater than `value`.
    #[must_use]
    pub fn upper_bound<Q>(&self, value: &Q) -> Cursor<'_, T, ()>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cursor = self.tree.begin();
        while cursor.key().is_some_and(|item| item.borrow() <= value) {
            cursor.move_next();
        }
        cursor
    }

    /// Returns cursors on the first and the last value equal to `value`.
    ///
    /// Both ends are inclusive, so a single occurrence yields two equal
    /// cursors. When `value` is absent both cursors are the end cursor.
    #[must_use]
    pub fn equal_range<Q>(&self, value: &Q) -> (Cursor<'_, T, ()>, Cursor<'_, T, ()>)
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let first = self.find(value);
        let mut last = first;
        loop {
            let next = last.next_cursor();
            if next.key().is_some_and(|item| item.borrow() == value) {
                last = next;
            } else {
                return (first, last);
            }
        }
    }

    /// Removes and returns the value at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`StalePosition`](crate::ContainerError::StalePosition) if the
    /// value has already been erased.
    pub fn erase(&mut self, position: Position) -> Result<T> {
        self.tree.erase(position).map(|(value, ())| value)
    }

    /// Moves every value of `other` into `self`, leaving `other` empty.
    pub fn merge(&mut self, other: &mut Self) {
        self.tree.merge(&mut other.tree);
    }
}

impl<T> Default for Multiset<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> Clone for Multiset<T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<T: PartialEq> PartialEq for Multiset<T> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<T: Eq> Eq for Multiset<T> {}

impl<T: Ord> FromIterator<T> for Multiset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut multiset = Self::new();
        multiset.extend(iter);
        multiset
    }
}

impl<T: Ord> Extend<T> for Multiset<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.tree.extend(iter.into_iter().map(|value| (value, ())));
    }
}

impl<T> IntoIterator for Multiset<T> {
    type Item = T;
    type IntoIter = SetIntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        SetIntoIter {
            inner: self.tree.into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a Multiset<T> {
    type Item = &'a T;
    type IntoIter = SetIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for Multiset<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for Multiset<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_braced(formatter, self.iter())
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for Multiset<T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for Multiset<T>
where
    T: serde::Deserialize<'de> + Ord,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let values = <Vec<T> as serde::Deserialize<'de>>::deserialize(deserializer)?;
        Ok(values.into_iter().collect())
    }
}
