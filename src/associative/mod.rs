//! Ordered associative containers built on an unbalanced binary search tree.
//!
//! - [`Tree`]: the engine, a key/value tree with an optional duplicate policy
//! - [`Map`]: unique keys mapped to values
//! - [`Set`]: unique values
//! - [`Multiset`]: values that may repeat
//!
//! All four share the same in-order traversal through [`Cursor`], and hand
//! out detached [`Position`] handles that survive unrelated mutations.
//!
//! # Examples
//!
//! ```rust
//! use bst_containers::associative::{Map, Multiset, Set};
//!
//! let mut ages = Map::new();
//! ages.insert("bob", 41);
//! ages.insert("alice", 37);
//! assert_eq!(ages.keys().copied().collect::<Vec<_>>(), vec!["alice", "bob"]);
//!
//! let primes: Set<u32> = [7, 2, 5, 3, 5].into_iter().collect();
//! assert_eq!(primes.len(), 4);
//!
//! let rolls: Multiset<u8> = [6, 1, 6].into_iter().collect();
//! assert_eq!(rolls.count(&6), 2);
//! ```

mod cursor;
mod iter;
mod map;
mod multiset;
mod set;
mod tree;

pub use cursor::{Cursor, Position};
pub use iter::{IntoIter, Iter, IterMut};
pub use map::Map;
pub use multiset::Multiset;
pub use set::{Set, SetIntoIter, SetIter};
pub use tree::Tree;
