//! Benchmark workloads for flatvec.
//!
//! Provides pre-built [`BenchProfile`]s and deterministic input data:
//!
//! - [`reference_profile`]: 10K four-byte elements
//! - [`wide_profile`]: 10K 64-byte records keyed by their first four bytes
//! - [`scrambled_keys`]: deterministic, seed-driven key permutation

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cmp::Ordering;

use flatvec::Vector;

/// Shape of a benchmark workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BenchProfile {
    /// Number of elements to load.
    pub count: usize,
    /// Bytes per element. At least 4: the key lives in the first 4 bytes.
    pub element_size: usize,
    /// Initial capacity handed to the vector (0 selects the default).
    pub initial_capacity: usize,
}

/// 10K i32-sized elements starting from the default capacity.
pub fn reference_profile() -> BenchProfile {
    BenchProfile {
        count: 10_000,
        element_size: 4,
        initial_capacity: 0,
    }
}

/// 10K 64-byte records, so relocation and shifting dominate.
pub fn wide_profile() -> BenchProfile {
    BenchProfile {
        count: 10_000,
        element_size: 64,
        initial_capacity: 0,
    }
}

/// Generate `n` distinct keys `0..n` in a seed-dependent order.
///
/// Uses a multiplicative stride coprime to `n`, so every key appears once.
pub fn scrambled_keys(n: usize, seed: u64) -> Vec<i32> {
    if n == 0 {
        return Vec::new();
    }
    let mut stride = (seed.wrapping_mul(6364136223846793005) % n as u64) as usize | 1;
    while gcd(stride, n) != 1 {
        stride += 2;
    }
    let offset = (seed.wrapping_add(1442695040888963407) % n as u64) as usize;
    (0..n).map(|i| ((i * stride + offset) % n) as i32).collect()
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Encode `key` into an element of `element_size` bytes.
///
/// The key occupies the first four bytes; the rest is filler derived from
/// the key so records are not all-zero.
pub fn record(key: i32, element_size: usize) -> Vec<u8> {
    let mut bytes = vec![(key & 0xff) as u8; element_size];
    bytes[..4].copy_from_slice(&key.to_ne_bytes());
    bytes
}

/// Key stored in the first four bytes of a record.
pub fn record_key(bytes: &[u8]) -> i32 {
    i32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Ascending comparison of two records by key.
pub fn cmp_records(a: &[u8], b: &[u8]) -> Ordering {
    record_key(a).cmp(&record_key(b))
}

/// Build a vector for `profile` loaded with `keys` in order.
pub fn load(profile: BenchProfile, keys: &[i32]) -> Vector {
    let mut v = Vector::new(profile.element_size, None, profile.initial_capacity);
    for &key in keys {
        v.push(&record(key, profile.element_size));
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrambled_keys_is_a_permutation() {
        let mut keys = scrambled_keys(1000, 42);
        assert_eq!(keys.len(), 1000);
        keys.sort_unstable();
        assert_eq!(keys, (0..1000).collect::<Vec<_>>());
    }

    #[test]
    fn scrambled_keys_depend_on_seed() {
        assert_ne!(scrambled_keys(100, 1), scrambled_keys(100, 2));
    }

    #[test]
    fn record_key_round_trips() {
        let r = record(-5, 64);
        assert_eq!(r.len(), 64);
        assert_eq!(record_key(&r), -5);
    }

    #[test]
    fn load_reference_profile() {
        let profile = reference_profile();
        let keys = scrambled_keys(profile.count, 7);
        let v = load(profile, &keys);
        assert_eq!(v.len(), profile.count);
        assert_eq!(record_key(v.nth(0)), keys[0]);
    }

    #[test]
    fn wide_profile_sorts_by_key() {
        let profile = BenchProfile {
            count: 50,
            ..wide_profile()
        };
        let mut v = load(profile, &scrambled_keys(profile.count, 3));
        v.sort_by(cmp_records);
        let keys: Vec<i32> = v.iter().map(record_key).collect();
        assert_eq!(keys, (0..50).collect::<Vec<_>>());
    }
}
