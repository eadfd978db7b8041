//! Unbalanced binary search tree with parent links.
//!
//! This module provides [`Tree`], the engine behind [`Map`](super::Map),
//! [`Set`](super::Set) and [`Multiset`](super::Multiset).
//!
//! # Overview
//!
//! Nodes are stored in an arena and linked by slot index: each node owns its
//! `left` and `right` children and keeps a non-owning `parent` index used for
//! upward traversal. The tree never rebalances, so inserting keys in sorted
//! order produces a degenerate chain.
//!
//! - O(h) insert descent, where h is the height of the tree
//! - O(n) keyed lookup (`at`, `contains`, `find`), performed as an in-order scan
//! - O(h) erase by [`Position`]
//! - O(1) `len` and `is_empty`
//!
//! # Placement of Equal Keys
//!
//! Insertion routes a key to the left when `key <= node.key` and to the right
//! otherwise. Every key in the left subtree of a node is therefore `<=` the
//! node's key and every key in its right subtree is strictly greater. In a tree
//! that allows duplicates, a later-inserted equal key ends up structurally to
//! the left of the earlier ones.
//!
//! # Examples
//!
//! ```rust
//! use bst_containers::associative::Tree;
//!
//! let mut tree = Tree::new();
//! for key in [5, 3, 8, 1, 4] {
//!     tree.push(key, key * 10);
//! }
//!
//! let keys: Vec<i32> = tree.keys().copied().collect();
//! assert_eq!(keys, vec![1, 3, 4, 5, 8]);
//! assert_eq!(tree.at(&4), Ok(&40));
//! ```

use std::borrow::Borrow;
use std::fmt;

use tracing::{debug, trace};

use super::cursor::{Cursor, Position};
use super::iter::{IntoIter, Iter, IterMut};
use crate::arena::Arena;
use crate::error::{ContainerError, Result};

// =============================================================================
// Node Definition
// =============================================================================

/// A tree node: one key/value pair and three links.
#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) parent: Option<usize>,
    pub(crate) left: Option<usize>,
    pub(crate) right: Option<usize>,
}

impl<K, V> Node<K, V> {
    const fn new(key: K, value: V, parent: Option<usize>) -> Self {
        Self {
            key,
            value,
            parent,
            left: None,
            right: None,
        }
    }
}

// =============================================================================
// Tree Definition
// =============================================================================

/// An unbalanced binary search tree keyed by `K`.
///
/// `Tree` owns every node exclusively. Whether equal keys may coexist is fixed
/// at construction: [`Tree::new`] rejects duplicates, while
/// [`Tree::with_duplicates`] lets the caller choose.
///
/// # Time Complexity
///
/// | Operation                     | Complexity |
/// |-------------------------------|------------|
/// | `push` / `insert`             | O(n)       |
/// | `at` / `contains` / `find`    | O(n)       |
/// | `erase`                       | O(h)       |
/// | `merge`                       | O(n * m)   |
/// | `len` / `is_empty`            | O(1)       |
///
/// `push` and `insert` scan for an existing equal key only when duplicates are
/// rejected; otherwise they cost one O(h) descent.
///
/// # Examples
///
/// ```rust
/// use bst_containers::associative::Tree;
///
/// let mut tree = Tree::with_duplicates(true);
/// tree.push(3, "first");
/// tree.push(3, "second");
/// assert_eq!(tree.len(), 2);
///
/// let mut unique = Tree::new();
/// unique.push(3, "first");
/// unique.push(3, "second");
/// assert_eq!(unique.len(), 1);
/// assert_eq!(unique.at(&3), Ok(&"first"));
/// ```
pub struct Tree<K, V> {
    nodes: Arena<Node<K, V>>,
    root: Option<usize>,
    length: usize,
    allow_duplicates: bool,
}

impl<K, V> Tree<K, V> {
    /// Creates an empty tree that rejects duplicate keys.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_duplicates(false)
    }

    /// Creates an empty tree, allowing equal keys when `allow_duplicates` is set.
    #[inline]
    #[must_use]
    pub const fn with_duplicates(allow_duplicates: bool) -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            length: 0,
            allow_duplicates,
        }
    }

    /// Returns `true` if equal keys may coexist in this tree.
    #[inline]
    #[must_use]
    pub const fn allows_duplicates(&self) -> bool {
        self.allow_duplicates
    }

    /// Returns the number of entries in the tree.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the tree holds no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Upper bound on the number of entries a tree of this type can hold.
    #[must_use]
    pub const fn max_size(&self) -> usize {
        let node_size = std::mem::size_of::<Node<K, V>>();
        let node_size = if node_size == 0 { 1 } else { node_size };
        isize::MAX.unsigned_abs() / node_size
    }

    /// Removes every entry and releases the node storage.
    ///
    /// Positions issued before the call are stale afterwards.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.length = 0;
    }

    /// Exchanges the contents of two trees, duplicate policy included.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Returns a cursor on the smallest entry, or the end cursor if empty.
    #[must_use]
    pub fn begin(&self) -> Cursor<'_, K, V> {
        Cursor::new(self, self.first_index())
    }

    /// Returns the end cursor.
    #[must_use]
    pub const fn end(&self) -> Cursor<'_, K, V> {
        Cursor::new(self, None)
    }

    /// Returns a cursor on the entry at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::StalePosition`] if the entry has been erased.
    pub fn cursor(&self, position: Position) -> Result<Cursor<'_, K, V>> {
        self.resolve(position)
            .map(|index| Cursor::new(self, Some(index)))
    }

    /// Returns the key at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::StalePosition`] if the entry has been erased.
    pub fn key(&self, position: Position) -> Result<&K> {
        self.resolve(position).map(|index| &self.nodes[index].key)
    }

    /// Returns the value at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::StalePosition`] if the entry has been erased.
    pub fn value(&self, position: Position) -> Result<&V> {
        self.resolve(position).map(|index| &self.nodes[index].value)
    }

    /// Returns a mutable reference to the value at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::StalePosition`] if the entry has been erased.
    pub fn value_mut(&mut self, position: Position) -> Result<&mut V> {
        let index = self.resolve(position)?;
        Ok(&mut self.nodes[index].value)
    }

    /// Returns an iterator over the entries in key order.
    ///
    /// Each step follows parent/child links from the previous entry; no
    /// sequence is materialized up front.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    /// Returns an iterator over the keys in order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values in key order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.iter().map(|(_, value)| value)
    }

    /// Returns an iterator over the entries in key order with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let order = self.in_order_indices();
        let mut occupants = self.nodes.occupants_mut();
        let entries = order
            .into_iter()
            .filter_map(|index| occupants[index].take())
            .map(|node| {
                let Node { key, value, .. } = node;
                let key: &K = key;
                (key, value)
            })
            .collect();
        IterMut::new(entries)
    }

    /// Removes the entry at `position` and returns its key and value.
    ///
    /// The hole is filled according to the number of children:
    ///
    /// - no children: the node is detached from its parent (or the tree
    ///   becomes empty if it was the root);
    /// - one child: the child is lifted into the node's place;
    /// - two children: the in-order successor (the leftmost node of the right
    ///   subtree) takes the node's place, adopting its parent and both
    ///   subtrees. When the successor is the node's own right child it keeps
    ///   its right subtree. In a tree that allows duplicates, if the successor
    ///   has an equal twin in the right subtree, the in-order predecessor is
    ///   used instead so that the right side stays strictly greater.
    ///
    /// Only the erased entry's position becomes stale.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::StalePosition`] if the entry has already been erased.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bst_containers::associative::Tree;
    ///
    /// let mut tree: Tree<i32, ()> = [5, 3, 8].into_iter().map(|key| (key, ())).collect();
    /// let root = tree.position_of(&5).unwrap();
    /// assert_eq!(tree.erase(root), Ok((5, ())));
    /// assert!(tree.erase(root).is_err());
    /// ```
    pub fn erase(&mut self, position: Position) -> Result<(K, V)>
    where
        K: Ord,
    {
        let index = self.resolve(position)?;
        Ok(self.erase_index(index))
    }

    pub(crate) fn erase_index(&mut self, index: usize) -> (K, V)
    where
        K: Ord,
    {
        let Node {
            parent,
            left,
            right,
            ..
        } = self.nodes[index];

        match (left, right) {
            (None, None) => {
                trace!(index, "erasing leaf node");
                self.replace_child(parent, index, None);
            }
            (Some(child), None) | (None, Some(child)) => {
                trace!(index, child, "erasing node with one child");
                self.nodes[child].parent = parent;
                self.replace_child(parent, index, Some(child));
            }
            (Some(left), Some(right)) => {
                let successor = self.leftmost(right);
                if self.allow_duplicates && self.has_equal_successor(successor, right) {
                    trace!(index, "erasing node with two children via predecessor");
                    self.splice_predecessor(index, parent, left, right);
                } else {
                    trace!(index, successor, "erasing node with two children via successor");
                    self.splice_successor(index, successor, parent, left, right);
                }
            }
        }

        self.length -= 1;
        let node = self.nodes.remove(index);
        (node.key, node.value)
    }

    // =========================================================================
    // Structural Helpers
    // =========================================================================

    pub(crate) fn node(&self, index: usize) -> &Node<K, V> {
        &self.nodes[index]
    }

    pub(crate) fn position_for(&self, index: usize) -> Position {
        Position::new(self.nodes.id(), index, self.nodes.slot_generation(index))
    }

    fn resolve(&self, position: Position) -> Result<usize> {
        if self
            .nodes
            .is_live(position.arena(), position.index(), position.generation())
        {
            Ok(position.index())
        } else {
            Err(ContainerError::StalePosition)
        }
    }

    fn leftmost(&self, mut index: usize) -> usize {
        while let Some(left) = self.nodes[index].left {
            index = left;
        }
        index
    }

    fn rightmost(&self, mut index: usize) -> usize {
        while let Some(right) = self.nodes[index].right {
            index = right;
        }
        index
    }

    pub(crate) fn first_index(&self) -> Option<usize> {
        self.root.map(|root| self.leftmost(root))
    }

    pub(crate) fn last_index(&self) -> Option<usize> {
        self.root.map(|root| self.rightmost(root))
    }

    /// In-order successor: the leftmost node of the right subtree, or the
    /// first ancestor reached from its left side.
    pub(crate) fn successor(&self, index: usize) -> Option<usize> {
        if let Some(right) = self.nodes[index].right {
            return Some(self.leftmost(right));
        }
        let mut current = index;
        while let Some(parent) = self.nodes[current].parent {
            if self.nodes[parent].right == Some(current) {
                current = parent;
            } else {
                return Some(parent);
            }
        }
        None
    }

    /// In-order predecessor, mirroring [`Self::successor`].
    pub(crate) fn predecessor(&self, index: usize) -> Option<usize> {
        if let Some(left) = self.nodes[index].left {
            return Some(self.rightmost(left));
        }
        let mut current = index;
        while let Some(parent) = self.nodes[current].parent {
            if self.nodes[parent].left == Some(current) {
                current = parent;
            } else {
                return Some(parent);
            }
        }
        None
    }

    pub(crate) fn in_order_indices(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.length);
        let mut current = self.first_index();
        while let Some(index) = current {
            order.push(index);
            current = self.successor(index);
        }
        order
    }

    /// Points `parent`'s link to `old` at `new`, or re-roots the tree.
    fn replace_child(&mut self, parent: Option<usize>, old: usize, new: Option<usize>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let node = &mut self.nodes[parent];
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    node.right = new;
                }
            }
        }
    }

    /// Returns `true` if the node after `successor` inside the subtree rooted
    /// at `subtree` carries the same key.
    fn has_equal_successor(&self, successor: usize, subtree: usize) -> bool
    where
        K: Ord,
    {
        let next = match self.nodes[successor].right {
            Some(right) => Some(self.leftmost(right)),
            None if successor != subtree => self.nodes[successor].parent,
            None => None,
        };
        next.is_some_and(|next| self.nodes[next].key == self.nodes[successor].key)
    }

    fn splice_successor(
        &mut self,
        index: usize,
        successor: usize,
        parent: Option<usize>,
        left: usize,
        right: usize,
    ) {
        if successor != right {
            // The successor is a left child deeper in the right subtree; its
            // own right subtree takes its old place.
            let successor_parent = self.nodes[successor].parent;
            let successor_right = self.nodes[successor].right;
            if let Some(successor_parent) = successor_parent {
                self.nodes[successor_parent].left = successor_right;
            }
            if let Some(successor_right) = successor_right {
                self.nodes[successor_right].parent = successor_parent;
            }
            self.nodes[successor].right = Some(right);
            self.nodes[right].parent = Some(successor);
        }
        self.nodes[successor].left = Some(left);
        self.nodes[left].parent = Some(successor);
        self.nodes[successor].parent = parent;
        self.replace_child(parent, index, Some(successor));
    }

    fn splice_predecessor(
        &mut self,
        index: usize,
        parent: Option<usize>,
        left: usize,
        right: usize,
    ) {
        let predecessor = self.rightmost(left);
        if predecessor != left {
            let predecessor_parent = self.nodes[predecessor].parent;
            let predecessor_left = self.nodes[predecessor].left;
            if let Some(predecessor_parent) = predecessor_parent {
                self.nodes[predecessor_parent].right = predecessor_left;
            }
            if let Some(predecessor_left) = predecessor_left {
                self.nodes[predecessor_left].parent = predecessor_parent;
            }
            self.nodes[predecessor].left = Some(left);
            self.nodes[left].parent = Some(predecessor);
        }
        self.nodes[predecessor].right = Some(right);
        self.nodes[right].parent = Some(predecessor);
        self.nodes[predecessor].parent = parent;
        self.replace_child(parent, index, Some(predecessor));
    }
}

impl<K: Ord, V> Tree<K, V> {
    /// Inserts `key` with `value`.
    ///
    /// If duplicates are rejected and an equal key is already present, the
    /// call does nothing and gives no signal. Use [`Tree::insert`] to learn
    /// whether the entry was added.
    pub fn push(&mut self, key: K, value: V) {
        if self.allow_duplicates || !self.contains(&key) {
            self.attach(key, value);
        }
    }

    /// Inserts `key` with `value` and reports where the key now lives.
    ///
    /// Returns the position of the new entry and `true`, or, when duplicates
    /// are rejected and the key is already present, the position of the
    /// existing entry and `false`. The existing value is left untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bst_containers::associative::Tree;
    ///
    /// let mut tree = Tree::new();
    /// let (first, inserted) = tree.insert(1, "one");
    /// assert!(inserted);
    ///
    /// let (again, inserted) = tree.insert(1, "uno");
    /// assert!(!inserted);
    /// assert_eq!(first, again);
    /// assert_eq!(tree.value(first), Ok(&"one"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool) {
        if !self.allow_duplicates
            && let Some(existing) = self.find_index(&key)
        {
            return (self.position_for(existing), false);
        }
        let index = self.attach(key, value);
        (self.position_for(index), true)
    }

    /// Overwrites the value of the first entry equal to `key`, or inserts a
    /// new entry. Returns the entry's position and `true` if it is new.
    pub(crate) fn insert_or_assign(&mut self, key: K, value: V) -> (Position, bool) {
        match self.find_index(&key) {
            Some(index) => {
                self.nodes[index].value = value;
                (self.position_for(index), false)
            }
            None => {
                let index = self.attach(key, value);
                (self.position_for(index), true)
            }
        }
    }

    /// Inserts every pair of `entries` in order, reporting each outcome.
    pub fn insert_many<I>(&mut self, entries: I) -> Vec<(Position, bool)>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        entries
            .into_iter()
            .map(|(key, value)| self.insert(key, value))
            .collect()
    }

    /// Descends from the root by `key <= node.key` and links a new leaf.
    fn attach(&mut self, key: K, value: V) -> usize {
        let Some(mut current) = self.root else {
            let index = self.nodes.insert(Node::new(key, value, None));
            self.root = Some(index);
            self.length += 1;
            return index;
        };

        loop {
            let goes_left = key <= self.nodes[current].key;
            let child = if goes_left {
                self.nodes[current].left
            } else {
                self.nodes[current].right
            };
            match child {
                Some(next) => current = next,
                None => {
                    let index = self.nodes.insert(Node::new(key, value, Some(current)));
                    if goes_left {
                        self.nodes[current].left = Some(index);
                    } else {
                        self.nodes[current].right = Some(index);
                    }
                    self.length += 1;
                    return index;
                }
            }
        }
    }

    /// Linear in-order scan for the first entry whose key equals `key`.
    fn find_index<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.first_index();
        while let Some(index) = current {
            if self.nodes[index].key.borrow() == key {
                return Some(index);
            }
            current = self.successor(index);
        }
        None
    }

    /// Returns the value for `key`.
    ///
    /// The lookup walks the entries in order rather than descending by
    /// comparison, so it costs O(n) regardless of the tree's shape.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::NotFound`] if no entry has an equal key.
    pub fn at<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_index(key)
            .map(|index| &self.nodes[index].value)
            .ok_or(ContainerError::NotFound)
    }

    /// Returns a mutable reference to the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::NotFound`] if no entry has an equal key.
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let index = self.find_index(key).ok_or(ContainerError::NotFound)?;
        Ok(&mut self.nodes[index].value)
    }

    /// Returns the value for `key`, inserting `V::default()` first if absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bst_containers::associative::Tree;
    ///
    /// let mut counts: Tree<&str, u32> = Tree::new();
    /// *counts.get_or_insert_default("apple") += 1;
    /// *counts.get_or_insert_default("apple") += 1;
    /// assert_eq!(counts.at("apple"), Ok(&2));
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let index = match self.find_index(&key) {
            Some(index) => index,
            None => self.attach(key, V::default()),
        };
        &mut self.nodes[index].value
    }

    /// Returns `true` if an entry with an equal key exists (linear scan).
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_index(key).is_some()
    }

    /// Returns a cursor on the first entry equal to `key`, or the end cursor.
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Cursor::new(self, self.find_index(key))
    }

    /// Returns the position of the first entry equal to `key`.
    #[must_use]
    pub fn position_of<Q>(&self, key: &Q) -> Option<Position>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_index(key).map(|index| self.position_for(index))
    }

    /// Moves entries from `other` into `self` in ascending key order.
    ///
    /// An entry moves only if `self` allows duplicates or holds no equal key;
    /// entries that stay behind remain in `other` untouched. When `self` is
    /// empty and can accept everything `other` holds, the two trees simply
    /// exchange their contents.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bst_containers::associative::Tree;
    ///
    /// let mut left: Tree<i32, ()> = [1, 2, 3].into_iter().map(|key| (key, ())).collect();
    /// let mut right: Tree<i32, ()> = [2, 3, 4].into_iter().map(|key| (key, ())).collect();
    /// left.merge(&mut right);
    ///
    /// assert_eq!(left.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    /// assert_eq!(right.keys().copied().collect::<Vec<_>>(), vec![2, 3]);
    /// ```
    pub fn merge(&mut self, other: &mut Self) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() && (self.allow_duplicates || !other.allow_duplicates) {
            std::mem::swap(&mut self.nodes, &mut other.nodes);
            std::mem::swap(&mut self.root, &mut other.root);
            std::mem::swap(&mut self.length, &mut other.length);
            debug!(moved = self.length, "merged into empty tree by exchange");
            return;
        }

        let mut moved = 0_usize;
        let mut current = other.first_index();
        while let Some(index) = current {
            current = other.successor(index);
            if self.allow_duplicates || !self.contains(&other.nodes[index].key) {
                let (key, value) = other.erase_index(index);
                self.attach(key, value);
                moved += 1;
            }
        }
        debug!(moved, kept = other.length, "merged tree");
    }

    /// Verifies the structural invariants, describing the first violation.
    ///
    /// Checked: the root has no parent; every child's parent link points back
    /// to its parent; left subtrees hold keys `<=` their node and right
    /// subtrees keys `>` it; the cached length matches the reachable node
    /// count; and no equal keys coexist when duplicates are rejected.
    #[doc(hidden)]
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        let Some(root) = self.root else {
            return if self.length == 0 && self.nodes.len() == 0 {
                Ok(())
            } else {
                Err(format!("empty tree reports length {}", self.length))
            };
        };
        if self.nodes[root].parent.is_some() {
            return Err("root node has a parent link".to_string());
        }

        let mut reachable = 0_usize;
        let mut stack: Vec<(usize, Option<&K>, Option<&K>)> = vec![(root, None, None)];
        while let Some((index, lower, upper)) = stack.pop() {
            reachable += 1;
            let node = &self.nodes[index];
            if lower.is_some_and(|lower| node.key <= *lower) {
                return Err(format!("node {index} is not greater than a left ancestor"));
            }
            if upper.is_some_and(|upper| node.key > *upper) {
                return Err(format!("node {index} is greater than a right ancestor"));
            }
            for child in [node.left, node.right].into_iter().flatten() {
                if self.nodes[child].parent != Some(index) {
                    return Err(format!("node {child} does not link back to parent {index}"));
                }
            }
            if let Some(left) = node.left {
                stack.push((left, lower, Some(&node.key)));
            }
            if let Some(right) = node.right {
                stack.push((right, Some(&node.key), upper));
            }
        }

        if reachable != self.length || reachable != self.nodes.len() {
            return Err(format!(
                "length {} disagrees with {reachable} reachable nodes",
                self.length
            ));
        }
        if !self.allow_duplicates {
            let keys: Vec<&K> = self.keys().collect();
            if keys.windows(2).any(|pair| pair[0] == pair[1]) {
                return Err("duplicate keys in a tree that rejects them".to_string());
            }
        }
        Ok(())
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for Tree<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Produces an independent tree by re-inserting the entries in key order.
///
/// The copy has the same entries and policy, but its shape follows the
/// insertion order: a clone of any non-empty tree is a right-leaning chain.
impl<K: Ord + Clone, V: Clone> Clone for Tree<K, V> {
    fn clone(&self) -> Self {
        let mut copy = Self::with_duplicates(self.allow_duplicates);
        for (key, value) in self {
            copy.attach(key.clone(), value.clone());
        }
        copy
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for Tree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V> Extend<(K, V)> for Tree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.push(key, value);
        }
    }
}

impl<K, V> IntoIterator for Tree<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        let entries: Vec<(K, V)> = self
            .in_order_indices()
            .into_iter()
            .map(|index| {
                let node = self.nodes.remove(index);
                (node.key, node.value)
            })
            .collect();
        IntoIter::new(entries)
    }
}

impl<'a, K, V> IntoIterator for &'a Tree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut Tree<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Two trees are equal when their in-order entry sequences are equal.
impl<K: PartialEq, V: PartialEq> PartialEq for Tree<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for Tree<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Tree<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

static_assertions::assert_impl_all!(Tree<i32, String>: Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
#[derive(serde::Serialize)]
struct TreeRepresentationRef<'a, K, V> {
    allow_duplicates: bool,
    entries: Vec<(&'a K, &'a V)>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct TreeRepresentation<K, V> {
    allow_duplicates: bool,
    entries: Vec<(K, V)>,
}

#[cfg(feature = "serde")]
impl<K, V> serde::Serialize for Tree<K, V>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let representation = TreeRepresentationRef {
            allow_duplicates: self.allow_duplicates,
            entries: self.iter().collect(),
        };
        serde::Serialize::serialize(&representation, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V> serde::Deserialize<'de> for Tree<K, V>
where
    K: serde::Deserialize<'de> + Ord,
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let representation = <TreeRepresentation<K, V> as serde::Deserialize<'de>>::deserialize(deserializer)?;
        let mut tree = Self::with_duplicates(representation.allow_duplicates);
        tree.extend(representation.entries);
        Ok(tree)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tree_of(keys: &[i32]) -> Tree<i32, i32> {
        keys.iter().map(|&key| (key, key * 10)).collect()
    }

    fn keys_of<V>(tree: &Tree<i32, V>) -> Vec<i32> {
        tree.keys().copied().collect()
    }

    // =========================================================================
    // Insertion Tests
    // =========================================================================

    #[rstest]
    fn test_new_tree_is_empty() {
        let tree: Tree<i32, i32> = Tree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(!tree.allows_duplicates());
        assert!(tree.begin() == tree.end());
    }

    #[rstest]
    fn test_first_push_becomes_root() {
        let mut tree = Tree::new();
        tree.push(7, "seven");
        assert_eq!(tree.root, Some(0));
        assert_eq!(tree.node(0).parent, None);
        assert_eq!(tree.len(), 1);
    }

    #[rstest]
    fn test_push_routes_by_less_or_equal() {
        let tree = tree_of(&[5, 3, 8]);
        let root = tree.root.unwrap();
        let left = tree.node(root).left.unwrap();
        let right = tree.node(root).right.unwrap();
        assert_eq!(tree.node(left).key, 3);
        assert_eq!(tree.node(right).key, 8);
        assert_eq!(tree.node(left).parent, Some(root));
        assert_eq!(tree.node(right).parent, Some(root));
    }

    #[rstest]
    fn test_duplicate_descends_left_of_earlier_equal_key() {
        let mut tree = Tree::with_duplicates(true);
        tree.push(5, "first");
        tree.push(5, "second");
        let root = tree.root.unwrap();
        let left = tree.node(root).left.unwrap();
        assert_eq!(tree.node(root).value, "first");
        assert_eq!(tree.node(left).value, "second");
        assert_eq!(tree.values().copied().collect::<Vec<_>>(), vec!["second", "first"]);
    }

    #[rstest]
    fn test_push_duplicate_is_silently_ignored() {
        let mut tree = Tree::new();
        tree.push(3, 30);
        tree.push(3, 31);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.nodes.len(), 1);
        assert!(tree.contains(&3));
        assert_eq!(tree.at(&3), Ok(&30));
    }

    #[rstest]
    fn test_insert_or_assign_overwrites_in_place() {
        let mut tree = tree_of(&[2, 1]);
        let existing = tree.position_of(&1).unwrap();
        assert_eq!(tree.insert_or_assign(1, 11), (existing, false));
        assert_eq!(tree.at(&1), Ok(&11));
        let (added, inserted) = tree.insert_or_assign(3, 33);
        assert!(inserted);
        assert_eq!(tree.value(added), Ok(&33));
        assert_eq!(tree.len(), 3);
    }

    #[rstest]
    fn test_sorted_pushes_build_a_chain() {
        let tree = tree_of(&[1, 2, 3, 4]);
        let mut depth = 0;
        let mut current = tree.root;
        while let Some(index) = current {
            assert!(tree.node(index).left.is_none());
            current = tree.node(index).right;
            depth += 1;
        }
        assert_eq!(depth, 4);
    }

    #[rstest]
    fn test_insert_many_reports_each_outcome() {
        let mut tree = Tree::new();
        let outcomes = tree.insert_many([(1, 'a'), (2, 'b'), (1, 'c')]);
        let flags: Vec<bool> = outcomes.iter().map(|(_, inserted)| *inserted).collect();
        assert_eq!(flags, vec![true, true, false]);
        assert_eq!(outcomes[0].0, outcomes[2].0);
        assert_eq!(tree.len(), 2);
    }

    // =========================================================================
    // Lookup Tests
    // =========================================================================

    #[rstest]
    fn test_at_on_empty_tree_is_not_found() {
        let tree: Tree<i32, i32> = Tree::new();
        assert_eq!(tree.at(&1), Err(ContainerError::NotFound));
    }

    #[rstest]
    fn test_get_or_insert_default_inserts_once() {
        let mut tree: Tree<i32, i32> = Tree::new();
        assert_eq!(*tree.get_or_insert_default(1), 0);
        *tree.get_or_insert_default(1) = 9;
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.at(&1), Ok(&9));
    }

    #[rstest]
    fn test_at_mut_updates_in_place() {
        let mut tree = tree_of(&[2, 1]);
        *tree.at_mut(&1).unwrap() = -1;
        assert_eq!(tree.at(&1), Ok(&-1));
        assert_eq!(tree.at_mut(&3), Err(ContainerError::NotFound));
    }

    #[rstest]
    fn test_lookup_borrowed_form() {
        let mut tree = Tree::new();
        tree.push("key".to_string(), 1);
        assert!(tree.contains("key"));
        assert_eq!(tree.at("key"), Ok(&1));
        assert!(tree.find("other").is_end());
    }

    // =========================================================================
    // Erase Tests
    // =========================================================================

    #[rstest]
    fn test_erase_sole_root_empties_tree() {
        let mut tree = tree_of(&[1]);
        let position = tree.position_of(&1).unwrap();
        assert_eq!(tree.erase(position), Ok((1, 10)));
        assert!(tree.is_empty());
        assert_eq!(tree.root, None);
        assert!(tree.check_invariants().is_ok());
    }

    #[rstest]
    #[case(&[5, 3, 8], 3, &[5, 8])]
    #[case(&[5, 3, 8], 8, &[3, 5])]
    #[case(&[5, 3, 1], 3, &[1, 5])]
    #[case(&[5, 8, 9], 8, &[5, 9])]
    #[case(&[5, 3], 5, &[3])]
    #[case(&[5, 8], 5, &[8])]
    #[case(&[5, 3, 8, 1, 4, 7, 9], 5, &[1, 3, 4, 7, 8, 9])]
    #[case(&[5, 3, 8, 1, 4, 7, 9], 3, &[1, 4, 5, 7, 8, 9])]
    #[case(&[5, 3, 9, 7, 6, 8], 5, &[3, 6, 7, 8, 9])]
    #[case(&[5, 3, 9, 6, 7], 5, &[3, 6, 7, 9])]
    fn test_erase_relinks_every_shape(
        #[case] keys: &[i32],
        #[case] erased: i32,
        #[case] expected: &[i32],
    ) {
        let mut tree = tree_of(keys);
        let position = tree.position_of(&erased).unwrap();
        assert_eq!(tree.erase(position), Ok((erased, erased * 10)));
        assert_eq!(keys_of(&tree), expected);
        assert_eq!(tree.len(), expected.len());
        assert_eq!(tree.check_invariants(), Ok(()));
    }

    #[rstest]
    fn test_erase_root_with_two_children_promotes_successor() {
        let mut tree = tree_of(&[5, 3, 8, 1, 4, 7, 9]);
        let position = tree.position_of(&5).unwrap();
        tree.erase(position).unwrap();
        let root = tree.root.unwrap();
        assert_eq!(tree.node(root).key, 7);
        assert_eq!(tree.node(root).parent, None);
    }

    #[rstest]
    fn test_erase_immediate_right_child_successor_keeps_its_right_subtree() {
        let mut tree = tree_of(&[5, 3, 8, 9]);
        let position = tree.position_of(&5).unwrap();
        tree.erase(position).unwrap();
        let root = tree.root.unwrap();
        assert_eq!(tree.node(root).key, 8);
        let right = tree.node(root).right.unwrap();
        assert_eq!(tree.node(right).key, 9);
        assert_eq!(keys_of(&tree), vec![3, 8, 9]);
    }

    #[rstest]
    fn test_erase_with_equal_successor_keeps_right_side_strict() {
        let mut tree = Tree::with_duplicates(true);
        for key in [5, 3, 8, 8] {
            tree.push(key, ());
        }
        let position = tree.position_of(&5).unwrap();
        tree.erase(position).unwrap();
        assert_eq!(keys_of(&tree), vec![3, 8, 8]);
        assert_eq!(tree.check_invariants(), Ok(()));
    }

    #[rstest]
    fn test_erase_stale_position_fails() {
        let mut tree = tree_of(&[2, 1, 3]);
        let position = tree.position_of(&2).unwrap();
        tree.erase(position).unwrap();
        assert_eq!(tree.erase(position), Err(ContainerError::StalePosition));
        assert_eq!(tree.value(position), Err(ContainerError::StalePosition));
        tree.push(4, 40);
        assert_eq!(tree.key(position), Err(ContainerError::StalePosition));
    }

    #[rstest]
    fn test_erase_keeps_other_positions_valid() {
        let mut tree = tree_of(&[5, 3, 8, 7]);
        let seven = tree.position_of(&7).unwrap();
        let five = tree.position_of(&5).unwrap();
        tree.erase(five).unwrap();
        assert_eq!(tree.key(seven), Ok(&7));
    }

    #[rstest]
    fn test_position_from_another_tree_is_stale() {
        let donor = tree_of(&[10]);
        let mut tree = tree_of(&[99]);
        let foreign = donor.position_of(&10).unwrap();
        assert_eq!(tree.erase(foreign), Err(ContainerError::StalePosition));
        assert_eq!(tree.key(foreign), Err(ContainerError::StalePosition));
        assert!(tree.cursor(foreign).is_err());
        assert_eq!(tree.len(), 1);
        assert_eq!(donor.key(foreign), Ok(&10));
    }

    // =========================================================================
    // Merge Tests
    // =========================================================================

    #[rstest]
    fn test_merge_moves_only_absent_keys() {
        let mut left = tree_of(&[1, 2, 3]);
        let mut right = tree_of(&[2, 3, 4]);
        left.merge(&mut right);
        assert_eq!(keys_of(&left), vec![1, 2, 3, 4]);
        assert_eq!(keys_of(&right), vec![2, 3]);
        assert_eq!(left.check_invariants(), Ok(()));
        assert_eq!(right.check_invariants(), Ok(()));
    }

    #[rstest]
    fn test_merge_into_empty_exchanges_contents() {
        let mut left: Tree<i32, i32> = Tree::new();
        let mut right = tree_of(&[2, 1, 3]);
        let position = right.position_of(&1).unwrap();
        left.merge(&mut right);
        assert!(right.is_empty());
        assert_eq!(keys_of(&left), vec![1, 2, 3]);
        assert_eq!(left.key(position), Ok(&1));
    }

    #[rstest]
    fn test_merge_with_duplicates_moves_everything() {
        let mut left = Tree::with_duplicates(true);
        let mut right = Tree::with_duplicates(true);
        for key in [1, 2] {
            left.push(key, ());
            right.push(key, ());
        }
        left.merge(&mut right);
        assert_eq!(keys_of(&left), vec![1, 1, 2, 2]);
        assert!(right.is_empty());
    }

    #[rstest]
    fn test_merge_duplicates_into_empty_unique_tree_filters() {
        let mut left: Tree<i32, ()> = Tree::new();
        let mut right = Tree::with_duplicates(true);
        for key in [1, 1, 2] {
            right.push(key, ());
        }
        left.merge(&mut right);
        assert_eq!(keys_of(&left), vec![1, 2]);
        assert_eq!(keys_of(&right), vec![1]);
        assert_eq!(left.check_invariants(), Ok(()));
    }

    // =========================================================================
    // Whole-Tree Tests
    // =========================================================================

    #[rstest]
    fn test_clear_and_reuse() {
        let mut tree = tree_of(&[3, 1, 2]);
        let before = tree.position_of(&3).unwrap();
        tree.clear();
        assert!(tree.is_empty());
        tree.push(9, 90);
        assert_eq!(keys_of(&tree), vec![9]);
        assert_eq!(tree.key(before), Err(ContainerError::StalePosition));
        assert_eq!(tree.check_invariants(), Ok(()));
    }

    #[rstest]
    fn test_swap_exchanges_policy_and_entries() {
        let mut unique = tree_of(&[1]);
        let mut multi = Tree::with_duplicates(true);
        multi.push(2, 20);
        multi.push(2, 21);
        unique.swap(&mut multi);
        assert!(unique.allows_duplicates());
        assert_eq!(unique.len(), 2);
        assert_eq!(keys_of(&multi), vec![1]);
    }

    #[rstest]
    fn test_take_leaves_source_empty() {
        let mut source = tree_of(&[2, 3]);
        let moved = std::mem::take(&mut source);
        assert!(source.is_empty());
        assert_eq!(keys_of(&moved), vec![2, 3]);
    }

    #[rstest]
    fn test_clone_is_independent_and_chain_shaped() {
        let original = tree_of(&[5, 3, 8]);
        let mut copy = original.clone();
        copy.push(1, 10);
        assert_eq!(original.len(), 3);
        assert_eq!(copy.len(), 4);
        let root = original.root.unwrap();
        assert_eq!(original.node(root).key, 5);
        let copy_root = copy.root.unwrap();
        assert_eq!(copy.node(copy_root).key, 3);
    }

    #[rstest]
    fn test_iter_mut_updates_values_in_order() {
        let mut tree = tree_of(&[2, 1, 3]);
        for (index, (_, value)) in tree.iter_mut().enumerate() {
            *value = i32::try_from(index).unwrap();
        }
        assert_eq!(tree.values().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[rstest]
    fn test_into_iter_yields_owned_entries_in_order() {
        let tree = tree_of(&[2, 3, 1]);
        let entries: Vec<(i32, i32)> = tree.into_iter().collect();
        assert_eq!(entries, vec![(1, 10), (2, 20), (3, 30)]);
    }

    #[rstest]
    fn test_equality_ignores_shape() {
        assert_eq!(tree_of(&[1, 2, 3]), tree_of(&[2, 1, 3]));
        assert_ne!(tree_of(&[1, 2]), tree_of(&[1, 2, 3]));
    }

    #[rstest]
    fn test_debug_lists_entries_in_order() {
        assert_eq!(format!("{:?}", tree_of(&[2, 1])), "{1: 10, 2: 20}");
    }
}
