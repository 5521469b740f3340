//! Cumulative counters for a vector's lifetime.
//!
//! [`VectorStats`] is observational only: nothing in the container reads
//! it back to make decisions.

/// Counters updated by every mutating operation on a
/// [`Vector`](crate::Vector).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VectorStats {
    /// Number of times the buffer doubled.
    pub grow_events: u64,
    /// Number of destructor invocations, including those made on disposal.
    pub destructor_calls: u64,
    /// Bytes copied into a new buffer by growth.
    pub bytes_relocated: u64,
    /// Bytes moved within the buffer by positional insert and delete.
    pub bytes_shifted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stats_are_zero() {
        let s = VectorStats::default();
        assert_eq!(s.grow_events, 0);
        assert_eq!(s.destructor_calls, 0);
        assert_eq!(s.bytes_relocated, 0);
        assert_eq!(s.bytes_shifted, 0);
    }
}
