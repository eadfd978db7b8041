//! Bidirectional cursors and detached positions for [`Tree`].

use std::fmt;

use super::tree::Tree;

// =============================================================================
// Position
// =============================================================================

/// A detached handle to one entry of a tree.
///
/// A `Position` does not borrow the tree, so it can be held across mutations
/// and passed back to [`Tree::erase`] or the positional accessors. Once its
/// entry is erased the handle is stale and those calls fail with
/// [`ContainerError::StalePosition`](crate::ContainerError::StalePosition),
/// even if the underlying slot has since been reused. A position handed to a
/// tree other than the one that issued it fails the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    arena: u64,
    index: usize,
    generation: u32,
}

impl Position {
    pub(crate) const fn new(arena: u64, index: usize, generation: u32) -> Self {
        Self {
            arena,
            index,
            generation,
        }
    }

    pub(crate) const fn arena(self) -> u64 {
        self.arena
    }

    pub(crate) const fn index(self) -> usize {
        self.index
    }

    pub(crate) const fn generation(self) -> u32 {
        self.generation
    }
}

// =============================================================================
// Cursor
// =============================================================================

/// A read-only cursor over a tree in key order.
///
/// A cursor either rests on an entry or is the *end* cursor, one step past
/// the largest key. Moving follows parent/child links, so each step costs
/// O(h) in the worst case.
///
/// Stepping is circular through the end position in one direction only:
///
/// - `move_next` from the largest entry reaches end, and `move_next` from end
///   wraps back to the largest entry;
/// - `move_prev` from the smallest entry reaches end, and `move_prev` from end
///   lands on the largest entry.
///
/// # Examples
///
/// ```rust
/// use bst_containers::associative::Tree;
///
/// let tree: Tree<i32, char> = [(2, 'b'), (1, 'a'), (3, 'c')].into_iter().collect();
///
/// let mut cursor = tree.begin();
/// assert_eq!(cursor.entry(), Some((&1, &'a')));
/// cursor.move_next();
/// assert_eq!(cursor.key(), Some(&2));
///
/// let mut end = tree.end();
/// end.move_next();
/// assert_eq!(end.key(), Some(&3));
/// ```
pub struct Cursor<'a, K, V> {
    tree: &'a Tree<K, V>,
    index: Option<usize>,
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) const fn new(tree: &'a Tree<K, V>, index: Option<usize>) -> Self {
        Self { tree, index }
    }

    /// Returns `true` if this is the end cursor.
    #[inline]
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.index.is_none()
    }

    /// Returns the key under the cursor, or `None` at end.
    #[must_use]
    pub fn key(&self) -> Option<&'a K> {
        let tree = self.tree;
        self.index.map(|index| &tree.node(index).key)
    }

    /// Returns the value under the cursor, or `None` at end.
    #[must_use]
    pub fn value(&self) -> Option<&'a V> {
        let tree = self.tree;
        self.index.map(|index| &tree.node(index).value)
    }

    /// Returns the entry under the cursor, or `None` at end.
    #[must_use]
    pub fn entry(&self) -> Option<(&'a K, &'a V)> {
        let tree = self.tree;
        self.index.map(|index| {
            let node = tree.node(index);
            (&node.key, &node.value)
        })
    }

    /// Returns a detached handle to the entry under the cursor.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.index.map(|index| self.tree.position_for(index))
    }

    /// Advances to the next larger entry.
    ///
    /// From the largest entry this reaches end; from end it wraps to the
    /// largest entry.
    pub fn move_next(&mut self) {
        self.index = match self.index {
            None => self.tree.last_index(),
            Some(index) => self.tree.successor(index),
        };
    }

    /// Retreats to the next smaller entry.
    ///
    /// From the smallest entry this reaches end; from end it lands on the
    /// largest entry.
    pub fn move_prev(&mut self) {
        self.index = match self.index {
            None => self.tree.last_index(),
            Some(index) => self.tree.predecessor(index),
        };
    }

    /// Returns a copy of this cursor advanced by one step.
    #[must_use]
    pub fn next_cursor(&self) -> Self {
        let mut next = *self;
        next.move_next();
        next
    }

    /// Returns a copy of this cursor moved back by one step.
    #[must_use]
    pub fn prev_cursor(&self) -> Self {
        let mut previous = *self;
        previous.move_prev();
        previous
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Cursor<'_, K, V> {}

/// Cursors are equal when they refer to the same tree and the same node.
impl<K, V> PartialEq for Cursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl<K, V> Eq for Cursor<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entry() {
            Some((key, value)) => formatter
                .debug_struct("Cursor")
                .field("key", key)
                .field("value", value)
                .finish(),
            None => formatter.write_str("Cursor(end)"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
