//! # `bst_containers`
//!
//! Generic containers built on an unbalanced binary search tree, an
//! arena-backed doubly-linked list and a growable array.
//!
//! ## Overview
//!
//! - **Associative containers**: [`Tree`](associative::Tree) and the
//!   [`Map`](associative::Map), [`Set`](associative::Set) and
//!   [`Multiset`](associative::Multiset) adaptors over it, traversed in key
//!   order through bidirectional cursors
//! - **Sequential containers**: [`List`](sequential::List),
//!   [`Stack`](sequential::Stack), [`Queue`](sequential::Queue) and
//!   [`Vector`](sequential::Vector)
//!
//! Linked nodes live in a generational arena and refer to each other by slot
//! index. Handles such as [`Position`](associative::Position) carry the slot's
//! generation, so using one after its element was erased is reported as
//! [`ContainerError::StalePosition`] rather than silently reading another
//! element.
//!
//! ## Feature Flags
//!
//! - `associative`: `Tree`, `Map`, `Set`, `Multiset` (default)
//! - `sequential`: `List`, `Stack`, `Queue`, `Vector` (default)
//! - `serde`: `Serialize` and `Deserialize` for every container
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use bst_containers::prelude::*;
//!
//! let mut tree = Tree::new();
//! for key in [5, 3, 8, 1, 4] {
//!     tree.push(key, ());
//! }
//! assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![1, 3, 4, 5, 8]);
//!
//! let root = tree.position_of(&5).unwrap();
//! tree.erase(root).unwrap();
//! assert_eq!(tree.len(), 4);
//!
//! let mut stack = Stack::new();
//! stack.push(1);
//! stack.push(2);
//! assert_eq!(stack.pop(), Some(2));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports the containers, their handles and the error type. The crate's
/// `Result` alias is left out so that it does not shadow `std::result::Result`.
///
/// # Usage
///
/// ```rust
/// use bst_containers::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::ContainerError;

    #[cfg(feature = "associative")]
    pub use crate::associative::*;

    #[cfg(feature = "sequential")]
    pub use crate::sequential::*;
}

#[cfg(any(feature = "associative", feature = "sequential"))]
mod arena;

pub mod error;

#[cfg(feature = "associative")]
pub mod associative;

#[cfg(feature = "sequential")]
pub mod sequential;

pub use error::{ContainerError, Result};
