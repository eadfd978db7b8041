//! Sequence containers.
//!
//! - [`List`]: doubly-linked list with stable [`ListPosition`] handles
//! - [`Stack`]: LIFO adaptor over [`List`]
//! - [`Queue`]: FIFO adaptor over [`List`]
//! - [`Vector`]: contiguous growable array with a doubling capacity policy
//!
//! # Examples
//!
//! ```rust
//! use bst_containers::sequential::{List, Queue, Vector};
//!
//! let mut list = List::new();
//! list.insert_many_back([3, 1, 2]);
//! list.sort();
//! assert_eq!(list.front(), Some(&1));
//!
//! let mut queue: Queue<&str> = ["a", "b"].into_iter().collect();
//! assert_eq!(queue.pop(), Some("a"));
//!
//! let vector: Vector<u8> = (1..=3).collect();
//! assert!(vector.at(5).is_err());
//! ```

mod list;
mod queue;
mod stack;
mod vector;

pub use list::{List, ListCursor, ListIntoIter, ListIter, ListIterMut, ListPosition};
pub use queue::Queue;
pub use stack::Stack;
pub use vector::Vector;
