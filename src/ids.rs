//! Instance id allocation.

use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out `embedded_NNNNNN` identifiers.
///
/// The counter only moves forward, so an id is never reused even after the
/// instance it named has been destroyed. Callers treat ids as opaque.
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Next unique id, zero-padded to six digits.
    pub fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("embedded_{n:06}")
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_zero_padded_from_one() {
        let ids = IdAllocator::new();
        assert_eq!(ids.next_id(), "embedded_000001");
        assert_eq!(ids.next_id(), "embedded_000002");
    }

    #[test]
    fn ids_are_unique_and_monotonic() {
        let ids = IdAllocator::new();
        let mut seen = Vec::new();
        for _ in 0..1000 {
            seen.push(ids.next_id());
        }
        let mut sorted = seen.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 1000);
        // lexicographic order equals allocation order while within six digits
        assert_eq!(sorted, seen);
    }

    #[test]
    fn counter_widens_past_six_digits_instead_of_wrapping() {
        let ids = IdAllocator {
            next: AtomicU64::new(999_999),
        };
        assert_eq!(ids.next_id(), "embedded_999999");
        assert_eq!(ids.next_id(), "embedded_1000000");
    }
}
