//! # Outcome Classification & Backoff
//!
//! One table decides what every status code means to the retry engine, and
//! one [`Backoff`] decides how long to wait between attempts. Bucket
//! membership differs between network versions, so the table is a value the
//! caller can override rather than a set of scattered `match` arms.

use std::collections::HashMap;
use std::time::Duration;

use crate::config::{DEFAULT_BACKOFF_MULTIPLIER, DEFAULT_MAX_RETRY_DELAY, DEFAULT_RETRY_DELAY};
use crate::network::status::ResponseCode;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// What the engine does with a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Accepted; move on to the next stage.
    Success,
    /// The node could not take the request right now. Back off and resend.
    Transient,
    /// The network has the transaction but has not finished with it. Wait
    /// for the poll interval and ask again.
    StillProcessing,
    /// Rejected. Never retried.
    Terminal,
}

/// Maps [`ResponseCode`]s to [`Classification`]s.
///
/// Codes without an explicit entry are terminal.
///
/// # Examples
///
/// ```
/// use hashgraph_client::network::retry::{Classification, ClassificationTable};
/// use hashgraph_client::network::status::ResponseCode;
///
/// let table = ClassificationTable::default()
///     .with(ResponseCode::InvalidNodeAccount, Classification::Transient);
/// assert_eq!(table.classify(ResponseCode::InvalidNodeAccount), Classification::Transient);
/// assert_eq!(table.classify(ResponseCode::InvalidSignature), Classification::Terminal);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationTable {
    entries: HashMap<ResponseCode, Classification>,
}

impl ClassificationTable {
    /// A table with no entries: everything is terminal.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns a copy of the table with `code` mapped to `class`.
    pub fn with(mut self, code: ResponseCode, class: Classification) -> Self {
        self.entries.insert(code, class);
        self
    }

    /// Looks up the classification of `code`.
    pub fn classify(&self, code: ResponseCode) -> Classification {
        self.entries
            .get(&code)
            .copied()
            .unwrap_or(Classification::Terminal)
    }
}

impl Default for ClassificationTable {
    fn default() -> Self {
        use Classification::*;
        use ResponseCode as C;

        let accepted = C::ALL
            .iter()
            .filter(|code| code.is_success())
            .map(|code| (*code, Success));
        let retryable = [
            (C::Busy, Transient),
            (C::PlatformNotActive, Transient),
            (C::PlatformTransactionNotCreated, Transient),
            (C::Unknown, StillProcessing),
            (C::ReceiptNotFound, StillProcessing),
            (C::RecordNotFound, StillProcessing),
        ];
        accepted
            .chain(retryable)
            .fold(Self::empty(), |table, (code, class)| table.with(code, class))
    }
}

// ---------------------------------------------------------------------------
// Backoff
// ---------------------------------------------------------------------------

/// Delay schedule between retries of a transient failure.
///
/// `delay_for(n)` is the wait after the `n`th failed attempt (1-based). The
/// schedule never shrinks: `delay_for(n + 1) >= delay_for(n)` for every `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// Wait after the first failure.
    pub initial: Duration,
    /// Upper bound for any single wait.
    pub max: Duration,
    /// Growth per attempt. `1` gives a fixed delay.
    pub multiplier: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            initial: DEFAULT_RETRY_DELAY,
            max: DEFAULT_MAX_RETRY_DELAY,
            multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }
}

impl Backoff {
    /// The same delay before every retry.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            initial: delay,
            max: delay,
            multiplier: 1,
        }
    }

    /// Doubling delay starting at `initial`, capped at `max`.
    pub fn exponential(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max: max.max(initial),
            multiplier: 2,
        }
    }

    /// Wait after the `attempt`th failure.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let cap = self.max.max(self.initial);
        let exponent = attempt.saturating_sub(1);
        let factor = self.multiplier.max(1).checked_pow(exponent);
        match factor.and_then(|f| self.initial.checked_mul(f)) {
            Some(delay) => delay.min(cap),
            None => cap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_buckets() {
        let table = ClassificationTable::default();
        assert_eq!(table.classify(ResponseCode::Success), Classification::Success);
        assert_eq!(table.classify(ResponseCode::Ok), Classification::Success);
        assert_eq!(table.classify(ResponseCode::Busy), Classification::Transient);
        assert_eq!(table.classify(ResponseCode::PlatformNotActive), Classification::Transient);
        assert_eq!(table.classify(ResponseCode::Unknown), Classification::StillProcessing);
        assert_eq!(table.classify(ResponseCode::ReceiptNotFound), Classification::StillProcessing);
        assert_eq!(table.classify(ResponseCode::InvalidSignature), Classification::Terminal);
        assert_eq!(table.classify(ResponseCode::Unrecognized), Classification::Terminal);
    }

    #[test]
    fn overrides_replace_defaults_without_touching_the_original() {
        let base = ClassificationTable::default();
        let custom = base.clone().with(ResponseCode::Busy, Classification::Terminal);
        assert_eq!(custom.classify(ResponseCode::Busy), Classification::Terminal);
        assert_eq!(base.classify(ResponseCode::Busy), Classification::Transient);
    }

    #[test]
    fn exponential_backoff_is_capped() {
        let backoff = Backoff::exponential(Duration::from_millis(100), Duration::from_millis(450));
        assert_eq!(backoff.delay_for(1), Duration::from_millis(100));
        assert_eq!(backoff.delay_for(2), Duration::from_millis(200));
        assert_eq!(backoff.delay_for(3), Duration::from_millis(400));
        assert_eq!(backoff.delay_for(4), Duration::from_millis(450));
        assert_eq!(backoff.delay_for(u32::MAX), Duration::from_millis(450));
    }

    #[test]
    fn fixed_backoff_is_constant() {
        let backoff = Backoff::fixed(Duration::from_millis(250));
        for attempt in 0..50 {
            assert_eq!(backoff.delay_for(attempt), Duration::from_millis(250));
        }
    }

    #[test]
    fn delays_never_decrease() {
        let schedules = [
            Backoff::default(),
            Backoff::exponential(Duration::from_millis(1), Duration::from_secs(60)),
            Backoff {
                initial: Duration::from_millis(30),
                max: Duration::from_millis(10),
                multiplier: 3,
            },
        ];
        for backoff in schedules {
            let mut previous = Duration::ZERO;
            for attempt in 0..200 {
                let delay = backoff.delay_for(attempt);
                assert!(delay >= previous, "{backoff:?} shrank at attempt {attempt}");
                previous = delay;
            }
        }
    }
}
