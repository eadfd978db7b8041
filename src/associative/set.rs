//! Ordered set of unique values.

use std::borrow::Borrow;
use std::fmt;
use std::iter::FusedIterator;

use super::cursor::{Cursor, Position};
use super::iter::{IntoIter, Iter};
use super::tree::Tree;
use crate::error::Result;

/// An ordered set of unique values, backed by a [`Tree`] with unit values.
///
/// # Examples
///
/// ```rust
/// use bst_containers::associative::Set;
///
/// let set: Set<i32> = [3, 1, 2, 3].into_iter().collect();
/// assert_eq!(set.len(), 3);
/// assert!(set.contains(&2));
/// assert_eq!(set.to_string(), "{1, 2, 3}");
/// ```
pub struct Set<T> {
    tree: Tree<T, ()>,
}

impl<T> Set<T> {
    /// Creates an empty set.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { tree: Tree::new() }
    }

    /// Returns the number of values.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set is empty.
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

    /// Exchanges the contents of two sets.
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

    /// Returns an iterator over the values in order.
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

impl<T: Ord> Set<T> {
    /// Inserts `value` unless an equal value is present.
    ///
    /// Returns the position of the value in the set and whether it was newly
    /// inserted.
    pub fn insert(&mut self, value: T) -> (Position, bool) {
        self.tree.insert(value, ())
    }

    /// Inserts every value of `values`, reporting each outcome.
    pub fn insert_many<I>(&mut self, values: I) -> Vec<(Position, bool)>
    where
        I: IntoIterator<Item = T>,
    {
        self.tree
            .insert_many(values.into_iter().map(|value| (value, ())))
    }

    /// Returns `true` if an equal value is present.
    #[must_use]
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains(value)
    }

    /// Returns a cursor on the value equal to `value`, or the end cursor.
    #[must_use]
    pub fn find<Q>(&self, value: &Q) -> Cursor<'_, T, ()>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.find(value)
    }

    /// Returns the position of the value equal to `value`.
    #[must_use]
    pub fn position_of<Q>(&self, value: &Q) -> Option<Position>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.position_of(value)
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

    /// Moves every value absent from `self` out of `other`.
    pub fn merge(&mut self, other: &mut Self) {
        self.tree.merge(&mut other.tree);
    }
}

impl<T> Default for Set<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> Clone for Set<T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<T: PartialEq> PartialEq for Set<T> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<T: Eq> Eq for Set<T> {}

impl<T: Ord> FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for Set<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.tree.extend(iter.into_iter().map(|value| (value, ())));
    }
}

impl<T> IntoIterator for Set<T> {
    type Item = T;
    type IntoIter = SetIntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        SetIntoIter {
            inner: self.tree.into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a Set<T> {
    type Item = &'a T;
    type IntoIter = SetIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for Set<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for Set<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_braced(formatter, self.iter())
    }
}

/// Writes `{a, b, c}` using each item's `Display`.
pub(crate) fn write_braced<'a, T, I>(formatter: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    T: fmt::Display + 'a,
    I: IntoIterator<Item = &'a T>,
{
    write!(formatter, "{{")?;
    for (index, item) in items.into_iter().enumerate() {
        if index > 0 {
            write!(formatter, ", ")?;
        }
        write!(formatter, "{item}")?;
    }
    write!(formatter, "}}")
}

// =============================================================================
// Iterators
// =============================================================================

/// Borrowing iterator over the values of a [`Set`] or
/// [`Multiset`](super::Multiset) in order.
pub struct SetIter<'a, T> {
    pub(crate) inner: Iter<'a, T, ()>,
}

impl<'a, T> Iterator for SetIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(value, ())| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for SetIter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(value, ())| value)
    }
}

impl<T> ExactSizeIterator for SetIter<'_, T> {}

impl<T> FusedIterator for SetIter<'_, T> {}

/// Owning iterator over the values of a [`Set`] or
/// [`Multiset`](super::Multiset) in order.
pub struct SetIntoIter<T> {
    pub(crate) inner: IntoIter<T, ()>,
}

impl<T> Iterator for SetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(value, ())| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for SetIntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(value, ())| value)
    }
}

impl<T> ExactSizeIterator for SetIntoIter<T> {}

impl<T> FusedIterator for SetIntoIter<T> {}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for Set<T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for Set<T>
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContainerError;
    use rstest::rstest;

    #[rstest]
    fn test_insert_reports_existing_position() {
        let mut set = Set::new();
        let (first, inserted) = set.insert(4);
        assert!(inserted);
        let (again, inserted) = set.insert(4);
        assert!(!inserted);
        assert_eq!(first, again);
        assert_eq!(set.len(), 1);
    }

    #[rstest]
    fn test_erase_returns_value() {
        let mut set: Set<i32> = [2, 1, 3].into_iter().collect();
        let position = set.position_of(&2).unwrap();
        assert_eq!(set.erase(position), Ok(2));
        assert_eq!(set.get(position), Err(ContainerError::StalePosition));
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[rstest]
    #[case(&[], "{}")]
    #[case(&[7], "{7}")]
    #[case(&[3, 1, 2], "{1, 2, 3}")]
    fn test_display(#[case] values: &[i32], #[case] expected: &str) {
        let set: Set<i32> = values.iter().copied().collect();
        assert_eq!(set.to_string(), expected);
    }

    #[rstest]
    fn test_debug_matches_std_set_format() {
        let set: Set<i32> = [2, 1].into_iter().collect();
        assert_eq!(format!("{set:?}"), "{1, 2}");
    }

    #[rstest]
    fn test_find_and_iterate_from_cursor() {
        let set: Set<&str> = ["pear", "apple", "fig"].into_iter().collect();
        let cursor = set.find("fig");
        assert_eq!(cursor.next_cursor().key(), Some(&"pear"));
        assert!(set.find("kiwi").is_end());
    }
}
