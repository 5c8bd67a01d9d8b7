//! Client transaction ids (`<clTRID>`).
//!
//! # What is a transaction id? (for beginners)
//!
//! Every EPP command carries a client-chosen identifier which the server
//! echoes back inside `<trID><clTRID>` together with its own `<svTRID>`.
//! The pair lets both sides correlate a response with the command that
//! caused it, and shows up in server logs when something goes wrong.
//!
//! Ids here look like `<prefix>-<n>`: a per-console prefix followed by a
//! counter that increases by one per command.
//!
//! # Thread safety
//!
//! The counter is an `AtomicU64`, so one generator can be shared (behind an
//! `Arc`) by every task that sends commands without a lock.

use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe source of `<prefix>-<n>` transaction ids.
///
/// # Examples
///
/// ```rust
/// use registrar_core::protocol::TransactionIdGenerator;
///
/// let ids = TransactionIdGenerator::new("abc", 1234);
/// assert_eq!(ids.next_id(), "abc-1234");
/// assert_eq!(ids.next_id(), "abc-1235");
/// ```
#[derive(Debug)]
pub struct TransactionIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl TransactionIdGenerator {
    /// Creates a generator whose first id uses the number `start`.
    pub fn new(prefix: impl Into<String>, start: u64) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(start),
        }
    }

    /// Returns the next id and advances the counter.
    ///
    /// Wraps from `u64::MAX` to 0 without panicking.
    pub fn next_id(&self) -> String {
        // Ids only need to be distinct; no other memory is published through
        // this counter, so `Relaxed` is enough.
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_first_id_uses_start_number() {
        // Arrange
        let ids = TransactionIdGenerator::new("asdf", 1235);

        // Act
        let first = ids.next_id();

        // Assert
        assert_eq!(first, "asdf-1235");
    }

    #[test]
    fn test_ids_increment_by_one() {
        let ids = TransactionIdGenerator::new("abc", 0);
        let values: Vec<String> = (0..3).map(|_| ids.next_id()).collect();
        assert_eq!(values, ["abc-0", "abc-1", "abc-2"]);
    }

    #[test]
    fn test_counter_wraps_at_u64_max() {
        // Arrange
        let ids = TransactionIdGenerator::new("w", u64::MAX);

        // Act
        let before_wrap = ids.next_id();
        let after_wrap = ids.next_id();

        // Assert
        assert_eq!(before_wrap, format!("w-{}", u64::MAX));
        assert_eq!(after_wrap, "w-0", "counter must wrap to 0 after u64::MAX");
    }

    #[test]
    fn test_ids_are_unique_across_threads() {
        // Arrange
        let ids = Arc::new(TransactionIdGenerator::new("t", 0));
        let thread_count = 8;
        let per_thread = 500;

        // Act
        let handles: Vec<_> = (0..thread_count)
            .map(|_| {
                let ids = Arc::clone(&ids);
                thread::spawn(move || (0..per_thread).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();
        let all: HashSet<String> = handles
            .into_iter()
            .flat_map(|h| h.join().expect("thread panicked"))
            .collect();

        // Assert
        assert_eq!(all.len(), thread_count * per_thread);
    }
}
