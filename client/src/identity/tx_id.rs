//! Transaction identifiers.
//!
//! A [`TxId`] is the payer's address plus the transaction's valid-start
//! time. The network deduplicates on it, so a logical transaction must keep
//! the same id across every retry and every re-signing; minting a new one
//! would turn a retry into a second, unrelated transaction.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};

use super::address::Address;
use super::timestamp::ConsensusTimeStamp;

/// Identifier of one logical transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxId {
    /// Account paying the transaction fee.
    pub payer: Address,
    /// Earliest consensus time at which the transaction is valid.
    pub valid_start: ConsensusTimeStamp,
    /// Set for the inner transaction executed by a schedule.
    pub scheduled: bool,
}

impl TxId {
    /// Creates a regular (non-scheduled) transaction id.
    pub fn new(payer: Address, valid_start: ConsensusTimeStamp) -> Self {
        Self {
            payer,
            valid_start,
            scheduled: false,
        }
    }

    /// Returns the id the network assigns to the scheduled execution of
    /// this transaction.
    pub fn as_scheduled(self) -> Self {
        Self {
            scheduled: true,
            ..self
        }
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.payer, self.valid_start)?;
        if self.scheduled {
            write!(f, "?scheduled")?;
        }
        Ok(())
    }
}

/// Source of valid-start times for new transaction ids.
///
/// Two ids for the same payer must never share a valid start, even when
/// many calls run concurrently inside the same nanosecond. The clock hands
/// out strictly increasing nanosecond values and is shared by a client and
/// every child client derived from it.
#[derive(Debug, Default)]
pub struct TxIdClock {
    last_nanos: AtomicI64,
}

impl TxIdClock {
    /// Creates a clock with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a fresh id for `payer`, valid from (at least) now.
    pub fn next(&self, payer: Address) -> TxId {
        let now = ConsensusTimeStamp::now().to_nanos().unwrap_or(i64::MAX);
        let previous = self
            .last_nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last.saturating_add(1)))
            })
            .unwrap_or_else(|last| last);
        let issued = now.max(previous.saturating_add(1));
        TxId::new(payer, ConsensusTimeStamp::from_nanos(issued))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn display_format() {
        let id = TxId::new(
            Address::new(0, 0, 2),
            ConsensusTimeStamp::new(1_600_000_000, 7).unwrap(),
        );
        assert_eq!(id.to_string(), "0.0.2@1600000000.000000007");
        assert_eq!(id.as_scheduled().to_string(), "0.0.2@1600000000.000000007?scheduled");
    }

    #[test]
    fn equality_and_hash_are_by_value() {
        let start = ConsensusTimeStamp::new(10, 20).unwrap();
        let a = TxId::new(Address::new(0, 0, 5), start);
        let b = TxId::new(Address::new(0, 0, 5), start);
        assert_eq!(a, b);
        assert_ne!(a, a.as_scheduled());

        let set: HashSet<TxId> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn clock_is_strictly_increasing() {
        let clock = TxIdClock::new();
        let payer = Address::new(0, 0, 2);
        let mut previous = clock.next(payer);
        for _ in 0..1_000 {
            let next = clock.next(payer);
            assert!(next.valid_start > previous.valid_start);
            previous = next;
        }
    }

    #[test]
    fn clock_is_unique_across_threads() {
        let clock = Arc::new(TxIdClock::new());
        let payer = Address::new(0, 0, 2);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let clock = Arc::clone(&clock);
                std::thread::spawn(move || (0..500).map(|_| clock.next(payer)).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 4_000);
    }
}
