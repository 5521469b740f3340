//! Vector configuration parameters.

use crate::error::VectorError;

/// Which slots the destructor visits when a vector is disposed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisposeScope {
    /// Only the live slots `[0, len)`.
    #[default]
    Live,
    /// Every slot of the physical capacity, live or not.
    ///
    /// Unused slots are zero-filled, so the destructor sees an all-zero
    /// element for each of them and must treat that pattern as "nothing
    /// to release".
    Capacity,
}

/// Configuration for a [`Vector`](crate::Vector).
///
/// Validated at construction; the element size is immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VectorConfig {
    /// Size of one element in bytes. Must be greater than zero.
    pub element_size: usize,

    /// Capacity (in elements) allocated up front.
    ///
    /// Zero selects [`VectorConfig::DEFAULT_INITIAL_CAPACITY`]. The
    /// resolved value is also recorded as the vector's size increment.
    pub initial_capacity: usize,

    /// Destructor coverage on disposal.
    pub dispose_scope: DisposeScope,
}

impl VectorConfig {
    /// Capacity used when zero is requested.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

    /// Create a config for elements of `element_size` bytes.
    ///
    /// Uses default values for all other parameters.
    pub fn new(element_size: usize) -> Self {
        Self {
            element_size,
            initial_capacity: 0,
            dispose_scope: DisposeScope::Live,
        }
    }

    /// Set the initial capacity in elements (0 selects the default).
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Set the destructor coverage used on disposal.
    pub fn with_dispose_scope(mut self, dispose_scope: DisposeScope) -> Self {
        self.dispose_scope = dispose_scope;
        self
    }

    /// Initial capacity after substituting the default for zero.
    pub fn resolved_capacity(&self) -> usize {
        if self.initial_capacity == 0 {
            Self::DEFAULT_INITIAL_CAPACITY
        } else {
            self.initial_capacity
        }
    }

    /// Check the config for values no vector can be built from.
    pub fn validate(&self) -> Result<(), VectorError> {
        if self.element_size == 0 {
            return Err(VectorError::ZeroElementSize);
        }
        let capacity = self.resolved_capacity();
        if capacity.checked_mul(self.element_size).is_none() {
            return Err(VectorError::CapacityOverflow { capacity });
        }
        Ok(())
    }
}
