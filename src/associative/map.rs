//! Ordered map with unique keys.

use std::borrow::Borrow;
use std::fmt;

use super::cursor::{Cursor, Position};
use super::iter::{IntoIter, Iter, IterMut};
use super::tree::Tree;
use crate::error::Result;

/// An ordered map from unique keys to values, backed by a [`Tree`].
///
/// Inserting a key that is already present leaves the existing value in
/// place; use [`Map::insert_or_assign`] to overwrite it.
///
/// # Examples
///
/// ```rust
/// use bst_containers::associative::Map;
///
/// let mut map = Map::new();
/// map.insert("b", 2);
/// map.insert("a", 1);
/// map.insert("a", 100);
///
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.at("a"), Ok(&1));
/// assert_eq!(map.to_string(), "{a: 1, b: 2}");
/// ```
pub struct Map<K, V> {
    tree: Tree<K, V>,
}

impl<K, V> Map<K, V> {
    /// Creates an empty map.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { tree: Tree::new() }
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Upper bound on the number of entries.
    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.tree.max_size()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Exchanges the contents of two maps.
    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    /// Returns a cursor on the smallest key.
    #[must_use]
    pub fn begin(&self) -> Cursor<'_, K, V> {
        self.tree.begin()
    }

    /// Returns the end cursor.
    #[must_use]
    pub const fn end(&self) -> Cursor<'_, K, V> {
        self.tree.end()
    }

    /// Returns an iterator over the entries in key order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.tree.iter()
    }

    /// Returns an iterator over the keys in order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.tree.keys()
    }

    /// Returns an iterator over the values in key order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.tree.values()
    }

    /// Returns an iterator over mutable values in key order.
    pub fn values_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut V> + ExactSizeIterator {
        self.tree.iter_mut().map(|(_, value)| value)
    }

    /// Returns an iterator over the entries with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.tree.iter_mut()
    }

    /// Returns the key at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`StalePosition`](crate::ContainerError::StalePosition) if the
    /// entry has been erased.
    pub fn key(&self, position: Position) -> Result<&K> {
        self.tree.key(position)
    }

    /// Returns the value at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`StalePosition`](crate::ContainerError::StalePosition) if the
    /// entry has been erased.
    pub fn value(&self, position: Position) -> Result<&V> {
        self.tree.value(position)
    }
}

impl<K: Ord, V> Map<K, V> {
    /// Inserts `value` under `key` unless the key is already present.
    ///
    /// Returns the position of the entry holding `key` and whether it was
    /// newly inserted.
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool) {
        self.tree.insert(key, value)
    }

    /// Inserts a `(key, value)` pair unless the key is already present.
    pub fn insert_entry(&mut self, entry: (K, V)) -> (Position, bool) {
        let (key, value) = entry;
        self.insert(key, value)
    }

    /// Inserts `value` under `key`, overwriting any existing value.
    ///
    /// Returns the position of the entry and `true` if the key was new.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bst_containers::associative::Map;
    ///
    /// let mut map = Map::new();
    /// map.insert(1, "one");
    /// let (_, inserted) = map.insert_or_assign(1, "uno");
    /// assert!(!inserted);
    /// assert_eq!(map.at(&1), Ok(&"uno"));
    /// ```
    pub fn insert_or_assign(&mut self, key: K, value: V) -> (Position, bool) {
        self.tree.insert_or_assign(key, value)
    }

    /// Inserts every pair of `entries`, reporting each outcome.
    pub fn insert_many<I>(&mut self, entries: I) -> Vec<(Position, bool)>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.tree.insert_many(entries)
    }

    /// Returns the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`](crate::ContainerError::NotFound) if `key` is absent.
    pub fn at<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.at(key)
    }

    /// Returns a mutable reference to the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`](crate::ContainerError::NotFound) if `key` is absent.
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.at_mut(key)
    }

    /// Returns the value for `key`, inserting `V::default()` first if absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.tree.get_or_insert_default(key)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains(key)
    }

    /// Returns a cursor on `key`, or the end cursor.
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.find(key)
    }

    /// Returns the position of `key`.
    #[must_use]
    pub fn position_of<Q>(&self, key: &Q) -> Option<Position>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.position_of(key)
    }

    /// Removes the entry at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`StalePosition`](crate::ContainerError::StalePosition) if the
    /// entry has already been erased.
    pub fn erase(&mut self, position: Position) -> Result<(K, V)> {
        self.tree.erase(position)
    }

    /// Moves every entry whose key is absent from `self` out of `other`.
    pub fn merge(&mut self, other: &mut Self) {
        self.tree.merge(&mut other.tree);
    }
}

impl<K, V> Default for Map<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone, V: Clone> Clone for Map<K, V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for Map<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<K: Eq, V: Eq> Eq for Map<K, V> {}

impl<K: Ord, V> FromIterator<(K, V)> for Map<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            tree: iter.into_iter().collect(),
        }
    }
}

impl<K: Ord, V> Extend<(K, V)> for Map<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.tree.extend(iter);
    }
}

impl<K, V> IntoIterator for Map<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}

impl<'a, K, V> IntoIterator for &'a Map<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Map<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.tree, formatter)
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Map<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        for (index, (key, value)) in self.iter().enumerate() {
            if index > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for Map<K, V>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for Map<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries = <std::collections::BTreeMap<K, V> as serde::Deserialize<'de>>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}
