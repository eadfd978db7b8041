//! Last-in, first-out stack over [`List`].

use std::fmt;

use super::list::{List, ListIter};

/// A LIFO stack. Elements are pushed and popped at the back of an inner
/// [`List`].
///
/// # Examples
///
/// ```rust
/// use bst_containers::sequential::Stack;
///
/// let mut stack = Stack::new();
/// stack.insert_many([1, 2, 3]);
/// assert_eq!(stack.top(), Some(&3));
/// assert_eq!(stack.pop(), Some(3));
/// assert_eq!(stack.len(), 2);
/// ```
pub struct Stack<T> {
    list: List<T>,
}

impl<T> Stack<T> {
    /// Creates an empty stack.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { list: List::new() }
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if the stack is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns the most recently pushed element.
    #[must_use]
    pub fn top(&self) -> Option<&T> {
        self.list.back()
    }

    /// Returns the most recently pushed element mutably.
    pub fn top_mut(&mut self) -> Option<&mut T> {
        self.list.back_mut()
    }

    /// Pushes `value` on top.
    pub fn push(&mut self, value: T) {
        self.list.push_back(value);
    }

    /// Removes and returns the top element.
    pub fn pop(&mut self) -> Option<T> {
        self.list.pop_back()
    }

    /// Pushes every value of `values` in order; the last one ends on top.
    pub fn insert_many<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.list.insert_many_back(values);
    }

    /// Exchanges the contents of two stacks.
    pub fn swap(&mut self, other: &mut Self) {
        self.list.swap(&mut other.list);
    }

    /// Returns an iterator from the bottom of the stack to the top.
    #[must_use]
    pub fn iter(&self) -> ListIter<'_, T> {
        self.list.iter()
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Stack<T> {
    fn clone(&self) -> Self {
        Self {
            list: self.list.clone(),
        }
    }
}

impl<T: PartialEq> PartialEq for Stack<T> {
    fn eq(&self, other: &Self) -> bool {
        self.list == other.list
    }
}

impl<T: Eq> Eq for Stack<T> {}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

/// Pushes the items in order, so the last item is the top.
impl<T> FromIterator<T> for Stack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            list: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for Stack<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_many(iter);
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for Stack<T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&self.list, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for Stack<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <List<T> as serde::Deserialize<'de>>::deserialize(deserializer).map(|list| Self { list })
    }
}
