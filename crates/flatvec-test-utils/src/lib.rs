//! Test fixtures for flatvec development.
//!
//! Provides an i32 byte codec, three-way comparators over encoded i32s,
//! and a [`DestructorLog`] that records every destructor invocation so
//! tests can assert exactly which elements were cleaned up.
//!
//! Nothing here depends on `flatvec` itself; destructors are handed out as
//! plain boxed closures so the fixtures work from both unit and
//! integration tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

/// Size of an encoded i32 element.
pub const I32_SIZE: usize = std::mem::size_of::<i32>();

/// Native-endian bytes of `value`.
pub fn i32_bytes(value: i32) -> [u8; I32_SIZE] {
    value.to_ne_bytes()
}

/// Decode an i32 element.
///
/// # Panics
///
/// Panics if `bytes` is not exactly four bytes long.
pub fn read_i32(bytes: &[u8]) -> i32 {
    let raw: [u8; I32_SIZE] = bytes
        .try_into()
        .unwrap_or_else(|_| panic!("expected {I32_SIZE} bytes, got {}", bytes.len()));
    i32::from_ne_bytes(raw)
}

/// Ascending three-way comparison of two encoded i32s.
pub fn cmp_i32(a: &[u8], b: &[u8]) -> Ordering {
    read_i32(a).cmp(&read_i32(b))
}

/// Descending three-way comparison of two encoded i32s.
pub fn cmp_i32_desc(a: &[u8], b: &[u8]) -> Ordering {
    cmp_i32(b, a)
}

/// Shared record of destructor invocations.
///
/// Clone the log freely: all clones observe the same record.
#[derive(Clone, Default)]
pub struct DestructorLog {
    seen: Rc<RefCell<Vec<Vec<u8>>>>,
}

impl DestructorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A destructor that appends a copy of each element's bytes to this log.
    pub fn destructor(&self) -> Box<dyn FnMut(&mut [u8])> {
        let seen = Rc::clone(&self.seen);
        Box::new(move |bytes: &mut [u8]| seen.borrow_mut().push(bytes.to_vec()))
    }

    /// Number of invocations so far.
    pub fn calls(&self) -> usize {
        self.seen.borrow().len()
    }

    /// Every element seen so far, decoded as i32.
    pub fn i32_values(&self) -> Vec<i32> {
        self.seen.borrow().iter().map(|b| read_i32(b)).collect()
    }

    /// Raw bytes of every element seen so far.
    pub fn raw(&self) -> Vec<Vec<u8>> {
        self.seen.borrow().clone()
    }
}

/// Pool of "owned resources" for elements that hold a handle into it.
///
/// Elements are encoded handle ids (i32, non-zero). A destructor built from
/// the pool releases the handle; releasing an unknown or already released
/// handle is recorded as a double free. Handle 0 is the zero-filled
/// "nothing held" pattern and is ignored.
#[derive(Clone, Default)]
pub struct HandlePool {
    state: Rc<RefCell<PoolState>>,
}

#[derive(Default)]
struct PoolState {
    live: Vec<i32>,
    next: i32,
    double_frees: usize,
}

impl PoolState {
    fn release(&mut self, id: i32) {
        match self.live.iter().position(|&h| h == id) {
            Some(i) => {
                self.live.swap_remove(i);
            }
            None => self.double_frees += 1,
        }
    }
}

impl HandlePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a fresh handle and return its element bytes.
    pub fn acquire(&self) -> [u8; I32_SIZE] {
        let mut state = self.state.borrow_mut();
        state.next += 1;
        let id = state.next;
        state.live.push(id);
        i32_bytes(id)
    }

    /// A destructor that releases the handle stored in each element.
    pub fn destructor(&self) -> Box<dyn FnMut(&mut [u8])> {
        let state = Rc::clone(&self.state);
        Box::new(move |bytes: &mut [u8]| {
            let id = read_i32(bytes);
            if id == 0 {
                return;
            }
            state.borrow_mut().release(id);
        })
    }

    /// Release a handle directly, as a caller that took ownership would.
    pub fn release(&self, bytes: &[u8]) {
        self.state.borrow_mut().release(read_i32(bytes));
    }

    /// Handles acquired and not yet released.
    pub fn live(&self) -> usize {
        self.state.borrow().live.len()
    }

    /// Releases of handles that were not live.
    pub fn double_frees(&self) -> usize {
        self.state.borrow().double_frees
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i32_codec_round_trips() {
        assert_eq!(read_i32(&i32_bytes(-17)), -17);
    }

    #[test]
    fn comparators_are_mirrored() {
        let (a, b) = (i32_bytes(1), i32_bytes(2));
        assert_eq!(cmp_i32(&a, &b), Ordering::Less);
        assert_eq!(cmp_i32_desc(&a, &b), Ordering::Greater);
    }

    #[test]
    fn log_clones_share_state() {
        let log = DestructorLog::new();
        let mut d = log.clone().destructor();
        d(&mut i32_bytes(5)[..]);
        assert_eq!(log.calls(), 1);
        assert_eq!(log.i32_values(), vec![5]);
    }

    #[test]
    fn pool_detects_double_free() {
        let pool = HandlePool::new();
        let h = pool.acquire();
        let mut d = pool.destructor();
        let (mut first, mut second) = (h, h);
        d(&mut first[..]);
        assert_eq!(pool.live(), 0);
        d(&mut second[..]);
        assert_eq!(pool.double_frees(), 1);
    }

    #[test]
    fn pool_ignores_zero_handle() {
        let pool = HandlePool::new();
        let mut d = pool.destructor();
        d(&mut [0u8; I32_SIZE][..]);
        assert_eq!(pool.double_frees(), 0);
    }
}
