//! The growable fixed-element-size vector.
//!
//! [`Vector`] stores elements as opaque byte blocks of one fixed size. It
//! never interprets element contents itself: ordering comes from caller
//! comparators and cleanup from an optional caller destructor.
//!
//! # Destructor discipline
//!
//! Elements are plain relocatable bytes. Moving them (growth, shifting,
//! sorting) never invokes the destructor. The destructor runs exactly once
//! per element that leaves the container through [`Vector::replace`],
//! [`Vector::delete`], [`Vector::clear`] or disposal. [`Vector::take`] and
//! [`Vector::pop`] hand the bytes back instead, so the destructor is not
//! called for them.

use std::cmp::Ordering;
use std::fmt;
use std::slice::{ChunksExact, ChunksExactMut};

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::buffer::SlotBuffer;
use crate::config::{DisposeScope, VectorConfig};
use crate::error::VectorError;
use crate::metrics::VectorStats;
use crate::search;

/// Caller-supplied cleanup for one element's bytes.
///
/// Must not assume anything about the vector it is attached to; it only
/// ever sees the bytes of a single slot.
pub type Destructor = Box<dyn FnMut(&mut [u8])>;

/// Bytes of one element removed by [`Vector::take`].
///
/// Elements up to 32 bytes stay inline.
pub type ElementBytes = SmallVec<[u8; 32]>;

/// A contiguous, growable sequence of fixed-size byte elements.
///
/// Element references returned by [`Vector::nth`] and friends borrow the
/// vector, so they cannot outlive the next mutating call (which may move
/// the buffer).
pub struct Vector {
    buffer: SlotBuffer,
    len: usize,
    size_increment: usize,
    dispose_scope: DisposeScope,
    destructor: Option<Destructor>,
    stats: VectorStats,
}

impl Vector {
    /// Create an empty vector for elements of `element_size` bytes.
    ///
    /// An `initial_capacity` of zero selects
    /// [`VectorConfig::DEFAULT_INITIAL_CAPACITY`].
    ///
    /// # Panics
    ///
    /// Panics if `element_size` is zero.
    pub fn new(
        element_size: usize,
        destructor: Option<Destructor>,
        initial_capacity: usize,
    ) -> Self {
        let config = VectorConfig::new(element_size).with_initial_capacity(initial_capacity);
        Self::with_config(config, destructor).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Create an empty vector from a validated config.
    pub fn with_config(
        config: VectorConfig,
        destructor: Option<Destructor>,
    ) -> Result<Self, VectorError> {
        config.validate()?;
        let capacity = config.resolved_capacity();
        Ok(Self {
            buffer: SlotBuffer::new(config.element_size, capacity),
            len: 0,
            size_increment: capacity,
            dispose_scope: config.dispose_scope,
            destructor,
            stats: VectorStats::default(),
        })
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no live elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current capacity in elements. Never shrinks.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Size of one element in bytes.
    pub fn element_size(&self) -> usize {
        self.buffer.element_size()
    }

    /// Capacity the vector was created with.
    pub fn size_increment(&self) -> usize {
        self.size_increment
    }

    /// Destructor coverage applied on disposal.
    pub fn dispose_scope(&self) -> DisposeScope {
        self.dispose_scope
    }

    /// Whether a destructor is attached.
    pub fn has_destructor(&self) -> bool {
        self.destructor.is_some()
    }

    /// Counters accumulated since construction.
    pub fn stats(&self) -> &VectorStats {
        &self.stats
    }

    /// Memory usage of the element buffer in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.buffer.memory_bytes()
    }

    /// The live elements as one contiguous byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.prefix(self.len)
    }

    /// Bytes of the element at `position`, or `None` if out of range.
    pub fn get(&self, position: usize) -> Option<&[u8]> {
        (position < self.len).then(|| self.buffer.slot(position))
    }

    /// Mutable bytes of the element at `position`, or `None` if out of range.
    pub fn get_mut(&mut self, position: usize) -> Option<&mut [u8]> {
        if position < self.len {
            Some(self.buffer.slot_mut(position))
        } else {
            None
        }
    }

    /// Bytes of the element at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position >= len()`.
    pub fn nth(&self, position: usize) -> &[u8] {
        match self.get(position) {
            Some(bytes) => bytes,
            None => self.fail(VectorError::IndexOutOfBounds {
                index: position,
                len: self.len,
            }),
        }
    }

    /// Mutable bytes of the element at `position`, for in-place edits.
    ///
    /// # Panics
    ///
    /// Panics if `position >= len()`.
    pub fn nth_mut(&mut self, position: usize) -> &mut [u8] {
        let len = self.len;
        if position >= len {
            self.fail(VectorError::IndexOutOfBounds {
                index: position,
                len,
            });
        }
        self.buffer.slot_mut(position)
    }

    /// Destroy the element at `position` and overwrite it with `bytes`.
    pub fn try_replace(&mut self, position: usize, bytes: &[u8]) -> Result<(), VectorError> {
        self.check_position(position)?;
        self.check_size(bytes)?;
        self.destroy_slot(position);
        self.buffer.write(position, bytes);
        Ok(())
    }

    /// Destroy the element at `position` and overwrite it with `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if `position >= len()` or `bytes` is not one element long.
    pub fn replace(&mut self, position: usize, bytes: &[u8]) {
        if let Err(e) = self.try_replace(position, bytes) {
            self.fail(e);
        }
    }

    /// Insert `bytes` at `position`, shifting later elements right.
    ///
    /// `position == len()` appends. Grows the buffer first if it is full.
    pub fn try_insert(&mut self, position: usize, bytes: &[u8]) -> Result<(), VectorError> {
        if position > self.len {
            return Err(VectorError::InsertOutOfBounds {
                index: position,
                len: self.len,
            });
        }
        self.check_size(bytes)?;
        self.grow_if_full()?;
        let shifted = self.buffer.shift_right(position, self.len);
        if shifted > 0 {
            trace!(position, bytes = shifted, "shifted elements right");
        }
        self.stats.bytes_shifted += shifted as u64;
        self.buffer.write(position, bytes);
        self.len += 1;
        Ok(())
    }

    /// Insert `bytes` at `position`, shifting later elements right.
    ///
    /// # Panics
    ///
    /// Panics if `position > len()`, `bytes` is not one element long, or
    /// the capacity cannot be doubled.
    pub fn insert(&mut self, position: usize, bytes: &[u8]) {
        if let Err(e) = self.try_insert(position, bytes) {
            self.fail(e);
        }
    }

    /// Append `bytes` after the last element.
    pub fn try_push(&mut self, bytes: &[u8]) -> Result<(), VectorError> {
        self.try_insert(self.len, bytes)
    }

    /// Append `bytes` after the last element.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is not one element long or the capacity cannot be
    /// doubled.
    pub fn push(&mut self, bytes: &[u8]) {
        if let Err(e) = self.try_push(bytes) {
            self.fail(e);
        }
    }

    /// Destroy the element at `position` and close the gap.
    ///
    /// The destructor runs exactly once, on the removed element. Elements
    /// to the right move left without being destroyed.
    pub fn try_delete(&mut self, position: usize) -> Result<(), VectorError> {
        self.check_position(position)?;
        self.destroy_slot(position);
        self.close_gap(position);
        Ok(())
    }

    /// Destroy the element at `position` and close the gap.
    ///
    /// # Panics
    ///
    /// Panics if `position >= len()`.
    pub fn delete(&mut self, position: usize) {
        if let Err(e) = self.try_delete(position) {
            self.fail(e);
        }
    }

    /// Remove the element at `position` and return its bytes.
    ///
    /// The destructor is not called: the caller now owns whatever the
    /// element refers to.
    pub fn try_take(&mut self, position: usize) -> Result<ElementBytes, VectorError> {
        self.check_position(position)?;
        let bytes = ElementBytes::from_slice(self.buffer.slot(position));
        self.close_gap(position);
        Ok(bytes)
    }

    /// Remove the element at `position` and return its bytes.
    ///
    /// # Panics
    ///
    /// Panics if `position >= len()`.
    pub fn take(&mut self, position: usize) -> ElementBytes {
        match self.try_take(position) {
            Ok(bytes) => bytes,
            Err(e) => self.fail(e),
        }
    }

    /// Remove the last element and return its bytes, if any.
    pub fn pop(&mut self) -> Option<ElementBytes> {
        let last = self.len.checked_sub(1)?;
        self.try_take(last).ok()
    }

    /// Destroy every live element and reset the length to zero.
    ///
    /// Capacity is kept.
    pub fn clear(&mut self) {
        for i in 0..self.len {
            self.destroy_slot(i);
        }
        self.buffer.prefix_mut(self.len).fill(0);
        self.len = 0;
    }

    /// Reorder the live elements according to `compare`.
    ///
    /// Not stable: equal elements may change relative order.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        if self.len < 2 {
            return;
        }
        let buffer = &self.buffer;
        let mut order: Vec<usize> = (0..self.len).collect();
        order.sort_unstable_by(|&a, &b| compare(buffer.slot(a), buffer.slot(b)));
        self.buffer.permute(&order);
    }

    /// Call `f` on every live element in index order, passing `aux` along.
    ///
    /// `f` may edit elements in place. It cannot change the length: the
    /// vector is mutably borrowed for the whole traversal.
    pub fn map<A, F>(&mut self, aux: &mut A, mut f: F)
    where
        A: ?Sized,
        F: FnMut(&mut [u8], &mut A),
    {
        for element in self.iter_mut() {
            f(element, &mut *aux);
        }
    }

    /// Iterate over the live elements' bytes.
    pub fn iter(&self) -> ChunksExact<'_, u8> {
        let es = self.element_size();
        self.buffer.prefix(self.len).chunks_exact(es)
    }

    /// Iterate mutably over the live elements' bytes.
    pub fn iter_mut(&mut self) -> ChunksExactMut<'_, u8> {
        let es = self.element_size();
        self.buffer.prefix_mut(self.len).chunks_exact_mut(es)
    }

    /// Look for `key` starting at `start`.
    ///
    /// With `is_sorted == false` this is a linear scan that returns the
    /// first index where `compare(key, element)` is `Equal`. With
    /// `is_sorted == true` it is a binary search over `[start, len)` that
    /// calls `compare(element, key)`; the caller guarantees that range is
    /// sorted ascending under `compare`.
    ///
    /// An empty vector returns `Ok(None)` without checking `start`.
    pub fn try_search<F>(
        &self,
        key: &[u8],
        mut compare: F,
        start: usize,
        is_sorted: bool,
    ) -> Result<Option<usize>, VectorError>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        if self.len == 0 {
            return Ok(None);
        }
        if start >= self.len {
            return Err(VectorError::StartOutOfBounds {
                start,
                len: self.len,
            });
        }
        let found = if is_sorted {
            search::binary(&self.buffer, self.len, key, start, &mut compare)
        } else {
            search::linear(&self.buffer, self.len, key, start, &mut compare)
        };
        Ok(found)
    }

    /// Look for `key` starting at `start`. See [`Vector::try_search`].
    ///
    /// # Panics
    ///
    /// Panics if the vector is non-empty and `start >= len()`.
    pub fn search<F>(&self, key: &[u8], compare: F, start: usize, is_sorted: bool) -> Option<usize>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        match self.try_search(key, compare, start, is_sorted) {
            Ok(found) => found,
            Err(e) => self.fail(e),
        }
    }

    /// Release the vector, running the destructor over the slots selected
    /// by its [`DisposeScope`].
    ///
    /// Dropping the vector does the same; this only makes the point of
    /// release explicit.
    pub fn dispose(self) {
        drop(self);
    }

    fn check_position(&self, position: usize) -> Result<(), VectorError> {
        if position < self.len {
            Ok(())
        } else {
            Err(VectorError::IndexOutOfBounds {
                index: position,
                len: self.len,
            })
        }
    }

    fn check_size(&self, bytes: &[u8]) -> Result<(), VectorError> {
        let expected = self.element_size();
        if bytes.len() == expected {
            Ok(())
        } else {
            Err(VectorError::SizeMismatch {
                expected,
                actual: bytes.len(),
            })
        }
    }

    fn destroy_slot(&mut self, index: usize) {
        if let Some(destructor) = self.destructor.as_mut() {
            destructor(self.buffer.slot_mut(index));
            self.stats.destructor_calls += 1;
        }
    }

    fn close_gap(&mut self, position: usize) {
        let shifted = self.buffer.shift_left(position, self.len);
        if shifted > 0 {
            trace!(position, bytes = shifted, "shifted elements left");
        }
        self.stats.bytes_shifted += shifted as u64;
        self.len -= 1;
    }

    fn grow_if_full(&mut self) -> Result<(), VectorError> {
        let capacity = self.buffer.capacity();
        if self.len < capacity {
            return Ok(());
        }
        let element_size = self.element_size();
        let new_capacity = capacity
            .checked_mul(2)
            .filter(|c| c.checked_mul(element_size).is_some())
            .ok_or(VectorError::CapacityOverflow { capacity })?;
        let carried = self.buffer.grow(new_capacity, self.len);
        self.stats.grow_events += 1;
        self.stats.bytes_relocated += carried as u64;
        debug!(
            from = capacity,
            to = new_capacity,
            element_size,
            bytes = carried,
            "vector grew"
        );
        Ok(())
    }

    #[track_caller]
    fn fail(&self, error: VectorError) -> ! {
        panic!("{error}")
    }
}

impl Drop for Vector {
    fn drop(&mut self) {
        let Some(destructor) = self.destructor.as_mut() else {
            return;
        };
        let end = match self.dispose_scope {
            DisposeScope::Live => self.len,
            DisposeScope::Capacity => self.buffer.capacity(),
        };
        for i in 0..end {
            destructor(self.buffer.slot_mut(i));
        }
        self.stats.destructor_calls += end as u64;
        debug!(
            scope = ?self.dispose_scope,
            destructor_calls = end,
            "vector disposed"
        );
    }
}

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("element_size", &self.element_size())
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("size_increment", &self.size_increment)
            .field("dispose_scope", &self.dispose_scope)
            .field("has_destructor", &self.destructor.is_some())
            .finish()
    }
}

impl<'a> IntoIterator for &'a Vector {
    type Item = &'a [u8];
    type IntoIter = ChunksExact<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
