//! Growable contiguous array with an explicit doubling policy.
//!
//! [`Vector`] stores its elements in a `Vec` but tracks its own logical
//! capacity: pushing into a full vector doubles the capacity (starting at 1),
//! and `reserve` grows it to exactly the requested amount. The backing
//! allocation is kept at least that large, so `capacity()` is predictable
//! across platforms and allocators.
//!
//! # Examples
//!
//! ```rust
//! use bst_containers::sequential::Vector;
//!
//! let mut vector = Vector::new();
//! assert_eq!(vector.capacity(), 0);
//! vector.push_back(1);
//! assert_eq!(vector.capacity(), 1);
//! vector.push_back(2);
//! vector.push_back(3);
//! assert_eq!(vector.capacity(), 4);
//! assert_eq!(vector.as_slice(), &[1, 2, 3]);
//! ```

use std::fmt;
use std::ops::{Index, IndexMut};

use tracing::trace;

use crate::error::{ContainerError, Result};

/// A growable array.
pub struct Vector<T> {
    elements: Vec<T>,
    capacity: usize,
}

impl<T> Vector<T> {
    /// Creates an empty vector with zero capacity.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
            capacity: 0,
        }
    }

    /// Creates an empty vector able to hold `capacity` elements without
    /// growing.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::CapacityOverflow`] if `capacity` exceeds
    /// [`Vector::max_size`].
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut vector = Self::new();
        vector.reserve(capacity)?;
        Ok(vector)
    }

    /// Creates a vector of `length` default values.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::CapacityOverflow`] if `length` exceeds
    /// [`Vector::max_size`].
    pub fn with_len(length: usize) -> Result<Self>
    where
        T: Default,
    {
        let mut vector = Self::with_capacity(length)?;
        vector.elements.resize_with(length, T::default);
        Ok(vector)
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the vector is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the number of elements the vector can hold without growing.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Upper bound on the number of elements.
    #[must_use]
    pub const fn max_size(&self) -> usize {
        let element_size = std::mem::size_of::<T>();
        let element_size = if element_size == 0 { 1 } else { element_size };
        isize::MAX.unsigned_abs() / element_size
    }

    /// Returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::OutOfRange`] if `index >= len()`.
    pub fn at(&self, index: usize) -> Result<&T> {
        let length = self.len();
        self.elements
            .get(index)
            .ok_or(ContainerError::OutOfRange { index, length })
    }

    /// Returns the element at `index` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::OutOfRange`] if `index >= len()`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let length = self.len();
        self.elements
            .get_mut(index)
            .ok_or(ContainerError::OutOfRange { index, length })
    }

    /// Returns the first element.
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.elements.first()
    }

    /// Returns the last element.
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        self.elements.last()
    }

    /// Returns the elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    /// Returns the elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.elements
    }

    /// Grows the capacity to exactly `capacity` if it is currently smaller.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::CapacityOverflow`] if `capacity` exceeds
    /// [`Vector::max_size`]. The vector is unchanged in that case.
    pub fn reserve(&mut self, capacity: usize) -> Result<()> {
        let maximum = self.max_size();
        if capacity > maximum {
            return Err(ContainerError::CapacityOverflow {
                requested: capacity,
                maximum,
            });
        }
        if capacity > self.capacity {
            self.grow_to(capacity);
        }
        Ok(())
    }

    /// Drops unused capacity so that `capacity() == len()`.
    pub fn shrink_to_fit(&mut self) {
        self.elements.shrink_to_fit();
        self.capacity = self.elements.len();
    }

    /// Removes every element. The capacity is kept.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Inserts `value` at `index`, shifting later elements right.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::OutOfRange`] if `index > len()`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        let length = self.len();
        if index > length {
            return Err(ContainerError::OutOfRange { index, length });
        }
        self.grow_for_one();
        self.elements.insert(index, value);
        Ok(())
    }

    /// Removes and returns the element at `index`, shifting later elements
    /// left.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::OutOfRange`] if `index >= len()`.
    pub fn erase(&mut self, index: usize) -> Result<T> {
        let length = self.len();
        if index >= length {
            return Err(ContainerError::OutOfRange { index, length });
        }
        Ok(self.elements.remove(index))
    }

    /// Appends `value`, doubling the capacity when full.
    pub fn push_back(&mut self, value: T) {
        self.grow_for_one();
        self.elements.push(value);
    }

    /// Removes and returns the last element.
    pub fn pop_back(&mut self) -> Option<T> {
        self.elements.pop()
    }

    /// Exchanges the contents of two vectors, capacities included.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Inserts every value of `values` starting at `index`, keeping their
    /// order, and returns the index just past the last inserted element.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::OutOfRange`] if `index > len()`. Nothing is
    /// inserted in that case.
    ///
    /// ```rust
    /// use bst_containers::sequential::Vector;
    ///
    /// let mut vector: Vector<i32> = [1, 5].into_iter().collect();
    /// assert_eq!(vector.insert_many(1, [2, 3, 4]), Ok(4));
    /// assert_eq!(vector.as_slice(), &[1, 2, 3, 4, 5]);
    /// ```
    pub fn insert_many<I>(&mut self, index: usize, values: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
    {
        let length = self.len();
        if index > length {
            return Err(ContainerError::OutOfRange { index, length });
        }
        let mut cursor = index;
        for value in values {
            self.grow_for_one();
            self.elements.insert(cursor, value);
            cursor += 1;
        }
        Ok(cursor)
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

    /// Returns an iterator over the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    /// Returns an iterator over mutable references to the elements.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.elements.iter_mut()
    }

    fn grow_for_one(&mut self) {
        if self.elements.len() == self.capacity {
            let doubled = if self.capacity == 0 {
                1
            } else {
                self.capacity.saturating_mul(2)
            };
            self.grow_to(doubled);
        }
    }

    fn grow_to(&mut self, capacity: usize) {
        trace!(from = self.capacity, to = capacity, "growing vector");
        self.elements
            .reserve_exact(capacity.saturating_sub(self.elements.len()));
        self.capacity = capacity;
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The copy's capacity equals its length.
impl<T: Clone> Clone for Vector<T> {
    fn clone(&self) -> Self {
        Self {
            elements: self.elements.clone(),
            capacity: self.elements.len(),
        }
    }
}

impl<T: PartialEq> PartialEq for Vector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl<T: Eq> Eq for Vector<T> {}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

/// Panics if `index` is out of bounds; use [`Vector::at`] for a checked access.
impl<T> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.elements[index]
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.elements[index]
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vector = Self::new();
        vector.insert_many_back(iter);
        vector
    }
}

impl<T> Extend<T> for Vector<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_many_back(iter);
    }
}

impl<T> IntoIterator for Vector<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Vector<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

static_assertions::assert_impl_all!(Vector<String>: Send, Sync, Default);

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for Vector<T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for Vector<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let elements = <Vec<T> as serde::Deserialize<'de>>::deserialize(deserializer)?;
        let capacity = elements.len();
        Ok(Self { elements, capacity })
    }
}
