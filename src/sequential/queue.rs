//! First-in, first-out queue over [`List`].

use std::fmt;

use super::list::{List, ListIter};

/// A FIFO queue. Elements enter at the back of an inner [`List`] and leave
/// from the front.
///
/// # Examples
///
/// ```rust
/// use bst_containers::sequential::Queue;
///
/// let mut queue = Queue::new();
/// queue.push("first");
/// queue.push("second");
/// assert_eq!(queue.front(), Some(&"first"));
/// assert_eq!(queue.back(), Some(&"second"));
/// assert_eq!(queue.pop(), Some("first"));
/// ```
pub struct Queue<T> {
    list: List<T>,
}

impl<T> Queue<T> {
    /// Creates an empty queue.
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

    /// Returns `true` if the queue is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns the element that will be popped next.
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.list.front()
    }

    /// Returns the most recently pushed element.
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        self.list.back()
    }

    /// Appends `value` at the back.
    pub fn push(&mut self, value: T) {
        self.list.push_back(value);
    }

    /// Removes and returns the front element.
    pub fn pop(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    /// Appends every value of `values` in order.
    pub fn insert_many_back<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.list.insert_many_back(values);
    }

    /// Exchanges the contents of two queues.
    pub fn swap(&mut self, other: &mut Self) {
        self.list.swap(&mut other.list);
    }

    /// Returns an iterator from front to back.
    #[must_use]
    pub fn iter(&self) -> ListIter<'_, T> {
        self.list.iter()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Queue<T> {
    fn clone(&self) -> Self {
        Self {
            list: self.list.clone(),
        }
    }
}

impl<T: PartialEq> PartialEq for Queue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.list == other.list
    }
}

impl<T: Eq> Eq for Queue<T> {}

impl<T: fmt::Debug> fmt::Debug for Queue<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            list: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for Queue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_many_back(iter);
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for Queue<T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&self.list, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for Queue<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <List<T> as serde::Deserialize<'de>>::deserialize(deserializer).map(|list| Self { list })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_pop_order_matches_push_order() {
        let mut queue: Queue<i32> = Queue::new();
        queue.insert_many_back([1, 2, 3]);
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), None);
        assert!(queue.front().is_none());
    }

    #[rstest]
    fn test_front_and_back_track_ends() {
        let mut queue = Queue::new();
        queue.push(1);
        assert_eq!(queue.front(), queue.back());
        queue.push(2);
        assert_eq!(queue.front(), Some(&1));
        assert_eq!(queue.back(), Some(&2));
    }
}
