//! Contiguous slot storage for fixed-size elements.
//!
//! A [`SlotBuffer`] is a zero-initialised `Vec<u8>` carved into equally
//! sized slots. It knows nothing about which slots are live; the owning
//! [`Vector`](crate::Vector) tracks that and calls the shift and growth
//! primitives here.

/// Zero-initialised byte storage divided into `capacity` slots of
/// `element_size` bytes each.
///
/// Slots are addressed by index. All byte arithmetic happens here so the
/// vector above deals only in element positions.
pub struct SlotBuffer {
    /// Backing storage. Always exactly `capacity * element_size` bytes.
    data: Vec<u8>,
    element_size: usize,
}

impl SlotBuffer {
    /// Allocate `capacity` zeroed slots of `element_size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `element_size` is zero or the byte size overflows `usize`.
    /// [`VectorConfig::validate`](crate::VectorConfig::validate) rules both
    /// out before a vector gets here.
    pub fn new(element_size: usize, capacity: usize) -> Self {
        assert!(element_size > 0, "slot buffer element size must be non-zero");
        let bytes = capacity
            .checked_mul(element_size)
            .unwrap_or_else(|| panic!("slot buffer of {capacity} x {element_size} bytes overflows"));
        Self {
            data: vec![0; bytes],
            element_size,
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.data.len() / self.element_size
    }

    /// Size of one slot in bytes.
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Memory usage of the backing storage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.data.len()
    }

    /// Shared view of one slot.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity()`.
    pub fn slot(&self, index: usize) -> &[u8] {
        let start = index * self.element_size;
        &self.data[start..start + self.element_size]
    }

    /// Mutable view of one slot.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity()`.
    pub fn slot_mut(&mut self, index: usize) -> &mut [u8] {
        let start = index * self.element_size;
        &mut self.data[start..start + self.element_size]
    }

    /// The first `count` slots as one contiguous slice.
    pub fn prefix(&self, count: usize) -> &[u8] {
        &self.data[..count * self.element_size]
    }

    /// The first `count` slots as one contiguous mutable slice.
    pub fn prefix_mut(&mut self, count: usize) -> &mut [u8] {
        &mut self.data[..count * self.element_size]
    }

    /// Copy `bytes` into slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `bytes.len() != element_size()` or the index is out of range.
    pub fn write(&mut self, index: usize, bytes: &[u8]) {
        self.slot_mut(index).copy_from_slice(bytes);
    }

    /// Move slots `[from, end)` one slot to the right.
    ///
    /// Slot `end` must exist. Slot `from` keeps a stale copy of its old
    /// contents until the caller overwrites it. Returns the number of bytes
    /// moved.
    pub fn shift_right(&mut self, from: usize, end: usize) -> usize {
        if from >= end {
            return 0;
        }
        let es = self.element_size;
        self.data.copy_within(from * es..end * es, (from + 1) * es);
        (end - from) * es
    }

    /// Move slots `(at, end)` one slot to the left, overwriting slot `at`,
    /// and zero the vacated slot `end - 1`.
    ///
    /// Returns the number of bytes moved.
    pub fn shift_left(&mut self, at: usize, end: usize) -> usize {
        debug_assert!(at < end);
        let es = self.element_size;
        let moved = (end - at - 1) * es;
        if moved > 0 {
            self.data.copy_within((at + 1) * es..end * es, at * es);
        }
        self.slot_mut(end - 1).fill(0);
        moved
    }

    /// Replace the storage with `new_capacity` zeroed slots, carrying the
    /// first `live` slots across byte-for-byte.
    ///
    /// The old allocation is released. Returns the number of bytes copied.
    ///
    /// # Panics
    ///
    /// Panics if `live > new_capacity` or the new byte size overflows.
    pub fn grow(&mut self, new_capacity: usize, live: usize) -> usize {
        assert!(live <= new_capacity, "cannot carry {live} slots into {new_capacity}");
        let mut next = SlotBuffer::new(self.element_size, new_capacity);
        let carried = live * self.element_size;
        next.data[..carried].copy_from_slice(&self.data[..carried]);
        *self = next;
        carried
    }

    /// Reorder the first `order.len()` slots so that slot `i` receives the
    /// contents previously held by slot `order[i]`.
    ///
    /// `order` must be a permutation of `0..order.len()`.
    pub fn permute(&mut self, order: &[usize]) {
        let mut staged = Vec::with_capacity(order.len() * self.element_size);
        for &src in order {
            staged.extend_from_slice(self.slot(src));
        }
        self.prefix_mut(order.len()).copy_from_slice(&staged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(element_size: usize, capacity: usize) -> SlotBuffer {
        let mut buf = SlotBuffer::new(element_size, capacity);
        for i in 0..capacity {
            buf.slot_mut(i).fill(i as u8 + 1);
        }
        buf
    }

    #[test]
    fn new_buffer_is_zeroed() {
        let buf = SlotBuffer::new(4, 8);
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.memory_bytes(), 32);
        assert!((0..8).all(|i| buf.slot(i) == [0, 0, 0, 0]));
    }

    #[test]
    fn write_then_read_slot() {
        let mut buf = SlotBuffer::new(3, 4);
        buf.write(2, &[7, 8, 9]);
        assert_eq!(buf.slot(2), [7, 8, 9]);
        assert_eq!(buf.slot(1), [0, 0, 0]);
        assert_eq!(buf.slot(3), [0, 0, 0]);
    }

    #[test]
    #[should_panic]
    fn write_with_wrong_length_panics() {
        let mut buf = SlotBuffer::new(3, 4);
        buf.write(0, &[1, 2]);
    }

    #[test]
    fn shift_right_opens_a_gap() {
        let mut buf = filled(2, 5);
        // live = 4, open slot 1
        let moved = buf.shift_right(1, 4);
        assert_eq!(moved, 6);
        assert_eq!(buf.slot(0), [1, 1]);
        assert_eq!(buf.slot(1), [2, 2]);
        assert_eq!(buf.slot(2), [2, 2]);
        assert_eq!(buf.slot(3), [3, 3]);
        assert_eq!(buf.slot(4), [4, 4]);
    }

    #[test]
    fn shift_right_at_end_moves_nothing() {
        let mut buf = filled(2, 3);
        assert_eq!(buf.shift_right(2, 2), 0);
        assert_eq!(buf.slot(2), [3, 3]);
    }

    #[test]
    fn shift_left_closes_gap_and_zeroes_tail() {
        let mut buf = filled(1, 4);
        let moved = buf.shift_left(1, 4);
        assert_eq!(moved, 2);
        assert_eq!(buf.prefix(4), [1, 3, 4, 0]);
    }

    #[test]
    fn shift_left_of_last_slot_only_zeroes() {
        let mut buf = filled(1, 3);
        assert_eq!(buf.shift_left(2, 3), 0);
        assert_eq!(buf.prefix(3), [1, 2, 0]);
    }

    #[test]
    fn grow_carries_live_prefix_and_zeroes_rest() {
        let mut buf = filled(2, 3);
        let carried = buf.grow(6, 2);
        assert_eq!(carried, 4);
        assert_eq!(buf.capacity(), 6);
        assert_eq!(buf.slot(0), [1, 1]);
        assert_eq!(buf.slot(1), [2, 2]);
        // Slot 2 was not live, so its old bytes are not carried.
        assert!((2..6).all(|i| buf.slot(i) == [0, 0]));
    }

    #[test]
    fn permute_reorders_prefix() {
        let mut buf = filled(1, 4);
        buf.permute(&[2, 0, 1]);
        assert_eq!(buf.prefix(4), [3, 1, 2, 4]);
    }
}
