//! Typed access on top of the byte-level [`Vector`].
//!
//! [`Element`] marks types that are plain, relocatable bytes: copying the
//! bytes is a complete copy of the value. [`TypedVector`] encodes values on
//! the way in and decodes them on the way out, so callers work with `T`
//! instead of byte slices.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

use smallvec::SmallVec;

use crate::config::{DisposeScope, VectorConfig};
use crate::error::VectorError;
use crate::metrics::VectorStats;
use crate::vector::{Destructor, Vector};

/// A fixed-size value that can be stored as raw bytes.
///
/// `encode` must write exactly [`Element::SIZE`] bytes and
/// `decode(encode(x))` must give back `x`.
pub trait Element: Copy + 'static {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Write this value's bytes into `out` (`out.len() == SIZE`).
    fn encode(&self, out: &mut [u8]);

    /// Read a value back from `bytes` (`bytes.len() == SIZE`).
    fn decode(bytes: &[u8]) -> Self;
}

macro_rules! impl_element_for_primitive {
    ($($t:ty),* $(,)?) => {
        $(
            impl Element for $t {
                const SIZE: usize = std::mem::size_of::<$t>();

                fn encode(&self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_ne_bytes());
                }

                fn decode(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$t>()];
                    raw.copy_from_slice(bytes);
                    <$t>::from_ne_bytes(raw)
                }
            }
        )*
    };
}

impl_element_for_primitive!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
);

impl<const N: usize> Element for [u8; N] {
    const SIZE: usize = N;

    fn encode(&self, out: &mut [u8]) {
        out.copy_from_slice(self);
    }

    fn decode(bytes: &[u8]) -> Self {
        let mut raw = [0u8; N];
        raw.copy_from_slice(bytes);
        raw
    }
}

type Scratch = SmallVec<[u8; 32]>;

fn encoded<T: Element>(value: &T) -> Scratch {
    let mut bytes = Scratch::from_elem(0, T::SIZE);
    value.encode(&mut bytes);
    bytes
}

/// A [`Vector`] whose elements are values of `T`.
pub struct TypedVector<T: Element> {
    inner: Vector,
    _marker: PhantomData<T>,
}

impl<T: Element> TypedVector<T> {
    /// Create an empty vector with no destructor.
    ///
    /// # Panics
    ///
    /// Panics if `T::SIZE` is zero.
    pub fn new(initial_capacity: usize) -> Self {
        Self::from_parts(VectorConfig::new(T::SIZE).with_initial_capacity(initial_capacity), None)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Create an empty vector that hands each discarded value to `cleanup`.
    ///
    /// # Panics
    ///
    /// Panics if `T::SIZE` is zero.
    pub fn with_destructor<F>(initial_capacity: usize, cleanup: F) -> Self
    where
        F: FnMut(T) + 'static,
    {
        let config = VectorConfig::new(T::SIZE).with_initial_capacity(initial_capacity);
        Self::from_parts(config, Some(typed_destructor(cleanup))).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Create an empty vector from a config and optional typed cleanup.
    ///
    /// The config's element size must equal `T::SIZE`.
    pub fn with_config<F>(config: VectorConfig, cleanup: Option<F>) -> Result<Self, VectorError>
    where
        F: FnMut(T) + 'static,
    {
        if config.element_size != T::SIZE {
            return Err(VectorError::SizeMismatch {
                expected: T::SIZE,
                actual: config.element_size,
            });
        }
        Self::from_parts(config, cleanup.map(typed_destructor))
    }

    fn from_parts(config: VectorConfig, destructor: Option<Destructor>) -> Result<Self, VectorError> {
        Ok(Self {
            inner: Vector::with_config(config, destructor)?,
            _marker: PhantomData,
        })
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether there are no live elements.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Current capacity in elements.
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Destructor coverage applied on disposal.
    pub fn dispose_scope(&self) -> DisposeScope {
        self.inner.dispose_scope()
    }

    /// Counters accumulated since construction.
    pub fn stats(&self) -> &VectorStats {
        self.inner.stats()
    }

    /// The underlying byte vector.
    pub fn as_raw(&self) -> &Vector {
        &self.inner
    }

    /// Value at `position`, or `None` if out of range.
    pub fn get(&self, position: usize) -> Option<T> {
        self.inner.get(position).map(T::decode)
    }

    /// Value at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position >= len()`.
    pub fn nth(&self, position: usize) -> T {
        T::decode(self.inner.nth(position))
    }

    /// Append `value`.
    pub fn push(&mut self, value: T) {
        self.inner.push(&encoded(&value));
    }

    /// Insert `value` at `position`, shifting later elements right.
    ///
    /// # Panics
    ///
    /// Panics if `position > len()`.
    pub fn insert(&mut self, position: usize, value: T) {
        self.inner.insert(position, &encoded(&value));
    }

    /// Checked [`TypedVector::insert`].
    pub fn try_insert(&mut self, position: usize, value: T) -> Result<(), VectorError> {
        self.inner.try_insert(position, &encoded(&value))
    }

    /// Replace the value at `position`, destroying the old one.
    ///
    /// # Panics
    ///
    /// Panics if `position >= len()`.
    pub fn set(&mut self, position: usize, value: T) {
        self.inner.replace(position, &encoded(&value));
    }

    /// Destroy the value at `position` and close the gap.
    ///
    /// # Panics
    ///
    /// Panics if `position >= len()`.
    pub fn delete(&mut self, position: usize) {
        self.inner.delete(position);
    }

    /// Checked [`TypedVector::delete`].
    pub fn try_delete(&mut self, position: usize) -> Result<(), VectorError> {
        self.inner.try_delete(position)
    }

    /// Remove and return the value at `position` without destroying it.
    ///
    /// # Panics
    ///
    /// Panics if `position >= len()`.
    pub fn take(&mut self, position: usize) -> T {
        T::decode(&self.inner.take(position))
    }

    /// Remove and return the last value without destroying it.
    pub fn pop(&mut self) -> Option<T> {
        self.inner.pop().map(|bytes| T::decode(&bytes))
    }

    /// Destroy every value and reset the length to zero.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Sort with a three-way comparator. Not stable.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.inner.sort_by(|a, b| compare(&T::decode(a), &T::decode(b)));
    }

    /// Search for `key` from `start`. See [`Vector::search`].
    ///
    /// As with the byte API, linear scans call `compare(key, element)` and
    /// binary search calls `compare(element, key)`.
    ///
    /// # Panics
    ///
    /// Panics if the vector is non-empty and `start >= len()`.
    pub fn search<F>(&self, key: &T, compare: F, start: usize, is_sorted: bool) -> Option<usize>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        match self.try_search(key, compare, start, is_sorted) {
            Ok(found) => found,
            Err(e) => panic!("{e}"),
        }
    }

    /// Checked [`TypedVector::search`].
    pub fn try_search<F>(
        &self,
        key: &T,
        mut compare: F,
        start: usize,
        is_sorted: bool,
    ) -> Result<Option<usize>, VectorError>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let key_bytes = encoded(key);
        self.inner.try_search(
            &key_bytes,
            |a, b| compare(&T::decode(a), &T::decode(b)),
            start,
            is_sorted,
        )
    }

    /// Call `f` on each value in order; the value is written back afterwards.
    pub fn map<A, F>(&mut self, aux: &mut A, mut f: F)
    where
        A: ?Sized,
        F: FnMut(&mut T, &mut A),
    {
        self.inner.map(aux, |bytes, aux| {
            let mut value = T::decode(bytes);
            f(&mut value, aux);
            value.encode(bytes);
        });
    }

    /// Iterate over the values by copy.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.inner.iter().map(T::decode)
    }

    /// Copy the live values into a `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Release the vector, running the destructor per its dispose scope.
    pub fn dispose(self) {
        self.inner.dispose();
    }
}

impl<T: Element + Ord> TypedVector<T> {
    /// Sort ascending by `T`'s natural order. Not stable.
    pub fn sort(&mut self) {
        self.sort_by(T::cmp);
    }

    /// Binary search for `key`, assuming ascending natural order.
    pub fn binary_search(&self, key: &T) -> Option<usize> {
        self.search(key, T::cmp, 0, true)
    }
}

impl<T: Element + fmt::Debug> fmt::Debug for TypedVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Element> Extend<T> for TypedVector<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

fn typed_destructor<T, F>(mut cleanup: F) -> Destructor
where
    T: Element,
    F: FnMut(T) + 'static,
{
    Box::new(move |bytes: &mut [u8]| cleanup(T::decode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn primitive_round_trip_through_bytes() {
        let mut buf = [0u8; 8];
        (-3i64).encode(&mut buf);
        assert_eq!(i64::decode(&buf), -3);

        let mut buf = [0u8; 4];
        1.5f32.encode(&mut buf);
        assert_eq!(f32::decode(&buf), 1.5);
    }

    #[test]
    fn byte_array_element_size_matches_length() {
        assert_eq!(<[u8; 12] as Element>::SIZE, 12);
    }

    #[test]
    fn push_get_and_set() {
        let mut v: TypedVector<u16> = TypedVector::new(0);
        v.extend([3, 1, 2]);
        assert_eq!(v.to_vec(), vec![3, 1, 2]);
        v.set(1, 9);
        assert_eq!(v.get(1), Some(9));
        assert_eq!(v.get(3), None);
    }

    #[test]
    fn sort_and_binary_search() {
        let mut v: TypedVector<i32> = TypedVector::new(0);
        v.extend([40, 10, 30, 20]);
        v.sort();
        assert_eq!(v.to_vec(), vec![10, 20, 30, 40]);
        assert_eq!(v.binary_search(&30), Some(2));
        assert_eq!(v.binary_search(&25), None);
    }

    #[test]
    fn float_sort_with_total_cmp() {
        let mut v: TypedVector<f64> = TypedVector::new(0);
        v.extend([2.5, -1.0, 0.0]);
        v.sort_by(f64::total_cmp);
        assert_eq!(v.to_vec(), vec![-1.0, 0.0, 2.5]);
    }

    #[test]
    fn typed_destructor_sees_decoded_values() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut v = TypedVector::with_destructor(0, move |x: u32| sink.borrow_mut().push(x));
        v.extend([1, 2, 3]);
        v.delete(0);
        v.set(0, 20);
        assert_eq!(*seen.borrow(), vec![1, 2]);
        v.dispose();
        assert_eq!(*seen.borrow(), vec![1, 2, 20, 3]);
    }

    #[test]
    fn map_writes_back_changes() {
        let mut v: TypedVector<u8> = TypedVector::new(0);
        v.extend([1, 2, 3]);
        let mut calls = 0usize;
        v.map(&mut calls, |x, calls| {
            *x *= 2;
            *calls += 1;
        });
        assert_eq!(calls, 3);
        assert_eq!(v.to_vec(), vec![2, 4, 6]);
    }

    #[test]
    fn with_config_rejects_wrong_element_size() {
        let result = TypedVector::<u64>::with_config(VectorConfig::new(4), None::<fn(u64)>);
        assert!(matches!(
            result,
            Err(VectorError::SizeMismatch {
                expected: 8,
                actual: 4
            })
        ));
    }

    #[test]
    fn take_and_pop_skip_destructor() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut v = TypedVector::with_destructor(0, move |x: i8| sink.borrow_mut().push(x));
        v.extend([5, 6, 7]);
        assert_eq!(v.take(0), 5);
        assert_eq!(v.pop(), Some(7));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn debug_lists_values() {
        let mut v: TypedVector<i32> = TypedVector::new(0);
        v.extend([1, 2]);
        assert_eq!(format!("{v:?}"), "[1, 2]");
    }
}
