//! Linear and binary search over the live slots of a [`SlotBuffer`].
//!
//! Both searches take the comparator as `&mut F` so the caller can reuse
//! one closure across repeated calls. Argument order differs between the
//! two on purpose and matches the public contract of
//! [`Vector::search`](crate::Vector::search): the linear scan asks
//! `cmp(key, element)`, the binary search asks `cmp(element, key)`.

use std::cmp::Ordering;

use crate::buffer::SlotBuffer;

/// First index in `[start, len)` whose element compares equal to `key`.
pub(crate) fn linear<F>(
    buffer: &SlotBuffer,
    len: usize,
    key: &[u8],
    start: usize,
    cmp: &mut F,
) -> Option<usize>
where
    F: FnMut(&[u8], &[u8]) -> Ordering,
{
    (start..len).find(|&i| cmp(key, buffer.slot(i)) == Ordering::Equal)
}

/// Binary search over `[start, len)`, which must be sorted ascending under
/// `cmp`. Unsorted input yields an unspecified index or `None`.
pub(crate) fn binary<F>(
    buffer: &SlotBuffer,
    len: usize,
    key: &[u8],
    start: usize,
    cmp: &mut F,
) -> Option<usize>
where
    F: FnMut(&[u8], &[u8]) -> Ordering,
{
    if start >= len {
        return None;
    }
    // Closed interval [left, right].
    let mut left = start;
    let mut right = len - 1;
    while left <= right {
        let mid = left + (right - left) / 2;
        match cmp(buffer.slot(mid), key) {
            Ordering::Equal => return Some(mid),
            Ordering::Less => left = mid + 1,
            Ordering::Greater => {
                if mid == 0 {
                    break;
                }
                right = mid - 1;
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_bytes(values: &[u8]) -> SlotBuffer {
        let mut buf = SlotBuffer::new(1, values.len().max(1));
        for (i, &v) in values.iter().enumerate() {
            buf.write(i, &[v]);
        }
        buf
    }

    fn byte_cmp(a: &[u8], b: &[u8]) -> Ordering {
        a[0].cmp(&b[0])
    }

    #[test]
    fn linear_finds_first_match_from_start() {
        let buf = sorted_bytes(&[5, 3, 5, 9]);
        assert_eq!(linear(&buf, 4, &[5], 0, &mut byte_cmp), Some(0));
        assert_eq!(linear(&buf, 4, &[5], 1, &mut byte_cmp), Some(2));
        assert_eq!(linear(&buf, 4, &[5], 3, &mut byte_cmp), None);
    }

    #[test]
    fn linear_ignores_slots_past_len() {
        let buf = sorted_bytes(&[1, 2, 7]);
        assert_eq!(linear(&buf, 2, &[7], 0, &mut byte_cmp), None);
    }

    #[test]
    fn binary_finds_every_present_key() {
        let values = [1, 3, 5, 7, 9, 11, 13];
        let buf = sorted_bytes(&values);
        for (i, v) in values.iter().enumerate() {
            assert_eq!(binary(&buf, values.len(), &[*v], 0, &mut byte_cmp), Some(i));
        }
    }

    #[test]
    fn binary_misses_absent_keys_at_both_ends() {
        let buf = sorted_bytes(&[10, 20, 30]);
        assert_eq!(binary(&buf, 3, &[0], 0, &mut byte_cmp), None);
        assert_eq!(binary(&buf, 3, &[25], 0, &mut byte_cmp), None);
        assert_eq!(binary(&buf, 3, &[99], 0, &mut byte_cmp), None);
    }

    #[test]
    fn binary_respects_start_index() {
        let buf = sorted_bytes(&[1, 2, 3, 4, 5]);
        assert_eq!(binary(&buf, 5, &[2], 2, &mut byte_cmp), None);
        assert_eq!(binary(&buf, 5, &[4], 2, &mut byte_cmp), Some(3));
    }

    #[test]
    fn binary_calls_comparator_element_first() {
        let buf = sorted_bytes(&[1, 2, 3]);
        let mut seen = Vec::new();
        let mut cmp = |elem: &[u8], key: &[u8]| {
            seen.push((elem[0], key[0]));
            elem[0].cmp(&key[0])
        };
        assert_eq!(binary(&buf, 3, &[3], 0, &mut cmp), Some(2));
        assert!(seen.iter().all(|&(_, key)| key == 3));
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn binary_agrees_with_linear_on_sorted_input(
                mut values in proptest::collection::vec(any::<u8>(), 1..64),
                key in any::<u8>(),
            ) {
                values.sort_unstable();
                values.dedup();
                let buf = sorted_bytes(&values);
                let len = values.len();
                let lin = linear(&buf, len, &[key], 0, &mut byte_cmp);
                let bin = binary(&buf, len, &[key], 0, &mut byte_cmp);
                prop_assert_eq!(lin, bin);
            }
        }
    }
}
