//! Error types shared by every container in the crate.
//!
//! Only failures a caller can act on are reported here. Inserting a duplicate
//! into a tree that rejects duplicates, or popping from an empty list, are not
//! errors: the former is a silent no-op and the latter returns `None`.

use thiserror::Error;

/// Errors returned by container operations.
///
/// # Examples
///
/// ```rust
/// use bst_containers::associative::Map;
/// use bst_containers::ContainerError;
///
/// let map: Map<i32, &str> = Map::new();
/// assert_eq!(map.at(&1), Err(ContainerError::NotFound));
/// assert_eq!(ContainerError::NotFound.to_string(), "key not found");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ContainerError {
    /// A keyed lookup was made for a key the container does not hold.
    #[error("key not found")]
    NotFound,

    /// A positional access was made beyond the end of a sequence.
    #[error("index {index} is out of range for length {length}")]
    OutOfRange {
        /// The requested index.
        index: usize,
        /// The length of the sequence at the time of the access.
        length: usize,
    },

    /// A position handle was used after its element had been erased.
    #[error("position refers to an element that has already been erased")]
    StalePosition,

    /// A reservation asked for more elements than the container can ever hold.
    #[error("requested capacity {requested} exceeds the maximum of {maximum}")]
    CapacityOverflow {
        /// The requested capacity.
        requested: usize,
        /// The value of `max_size()` for the container.
        maximum: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ContainerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ContainerError::NotFound, "key not found")]
    #[case(
        ContainerError::OutOfRange { index: 5, length: 3 },
        "index 5 is out of range for length 3"
    )]
    #[case(
        ContainerError::StalePosition,
        "position refers to an element that has already been erased"
    )]
    #[case(
        ContainerError::CapacityOverflow { requested: 10, maximum: 4 },
        "requested capacity 10 exceeds the maximum of 4"
    )]
    fn test_error_display(#[case] error: ContainerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn test_error_is_std_error() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>(_: &E) {}
        assert_error(&ContainerError::NotFound);
    }
}
