//! Vector error types.
//!
//! The panicking operations on [`Vector`](crate::Vector) report their
//! precondition failures through these variants' `Display` text; the
//! `try_*` operations return them directly.

use std::error::Error;
use std::fmt;

/// Errors that can occur during vector operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VectorError {
    /// Element size of zero bytes was requested at construction.
    ZeroElementSize,
    /// A position outside `[0, len)` was used to read, replace or delete.
    IndexOutOfBounds {
        /// The offending position.
        index: usize,
        /// Logical length at the time of the call.
        len: usize,
    },
    /// An insertion position outside `[0, len]`.
    InsertOutOfBounds {
        /// The offending position.
        index: usize,
        /// Logical length at the time of the call.
        len: usize,
    },
    /// A search start index outside `[0, len)` on a non-empty vector.
    StartOutOfBounds {
        /// The offending start index.
        start: usize,
        /// Logical length at the time of the call.
        len: usize,
    },
    /// Element bytes whose length differs from the vector's element size.
    SizeMismatch {
        /// The vector's element size in bytes.
        expected: usize,
        /// Length of the supplied byte slice.
        actual: usize,
    },
    /// Doubling the capacity would overflow the addressable byte range.
    CapacityOverflow {
        /// Capacity (in elements) that could not be doubled.
        capacity: usize,
    },
}

impl fmt::Display for VectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroElementSize => write!(f, "element size must be greater than zero"),
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "position {index} out of bounds for length {len}")
            }
            Self::InsertOutOfBounds { index, len } => {
                write!(f, "insert position {index} out of bounds for length {len}")
            }
            Self::StartOutOfBounds { start, len } => {
                write!(f, "search start {start} out of bounds for length {len}")
            }
            Self::SizeMismatch { expected, actual } => {
                write!(
                    f,
                    "element size mismatch: expected {expected} bytes, got {actual} bytes"
                )
            }
            Self::CapacityOverflow { capacity } => {
                write!(f, "capacity overflow: cannot grow beyond {capacity} elements")
            }
        }
    }
}

impl Error for VectorError {}
