//! # Call Context
//!
//! A [`Context`] is the configuration one call runs under: gateways, payer,
//! default signatory, fees, retry budget, deadline and cancellation. It is
//! a plain value. A client owns one; each call derives its own copy with
//! the caller's overrides applied, and nothing mutates a context another
//! call can see.
//!
//! [`CallScope`] is the per-call resource guard. It is held for the life of
//! a call and released on every exit path, including cancellation and
//! panics.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::config::{
    DEFAULT_CALL_DEADLINE, DEFAULT_DISPATCH_TIMEOUT, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_MAX_TRANSACTION_FEE, DEFAULT_RECEIPT_POLL_INTERVAL,
    DEFAULT_TRANSACTION_VALID_DURATION, MAX_MEMO_LENGTH,
};
use crate::error::ClientError;
use crate::identity::{Address, TxId};
use crate::network::channel::Gateway;
use crate::network::retry::{Backoff, ClassificationTable};
use crate::signing::Signatory;

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Configuration for one call (or, on a client, the defaults for every
/// call).
#[derive(Clone)]
pub struct Context {
    /// Gateway nodes, tried in order; the engine rotates past unresponsive
    /// ones.
    pub gateways: Vec<Gateway>,
    /// Account paying transaction fees.
    pub payer: Option<Address>,
    /// Default signatory, combined with any per-call signatory.
    pub signatory: Option<Signatory>,
    /// Largest fee the payer authorizes, in tinybars.
    pub max_fee: u64,
    /// How long the network accepts the transaction after its valid start.
    pub valid_duration: Duration,
    /// Memo attached to transactions.
    pub memo: Option<String>,
    /// Dispatch attempts per request, including the first.
    pub max_attempts: u32,
    pub backoff: Backoff,
    /// Wall-clock budget for a whole call.
    pub deadline: Duration,
    /// Budget for a single dispatch.
    pub dispatch_timeout: Duration,
    /// Wait between receipt polls while the network is still processing.
    pub receipt_poll_interval: Duration,
    pub classification: Arc<ClassificationTable>,
    /// Use this id instead of minting a new one.
    pub transaction_id: Option<TxId>,
    pub cancellation: Option<Cancellation>,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            gateways: Vec::new(),
            payer: None,
            signatory: None,
            max_fee: DEFAULT_MAX_TRANSACTION_FEE,
            valid_duration: DEFAULT_TRANSACTION_VALID_DURATION,
            memo: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: Backoff::default(),
            deadline: DEFAULT_CALL_DEADLINE,
            dispatch_timeout: DEFAULT_DISPATCH_TIMEOUT,
            receipt_poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
            classification: Arc::new(ClassificationTable::default()),
            transaction_id: None,
            cancellation: None,
        }
    }
}

impl Context {
    /// Returns a copy of this context with `configure` applied. `self` is
    /// left untouched.
    pub fn derive(&self, configure: impl FnOnce(&mut Context)) -> Context {
        let mut child = self.clone();
        configure(&mut child);
        child
    }

    /// The payer, or a configuration error if none is set.
    pub fn require_payer(&self) -> Result<Address, ClientError> {
        match self.payer {
            Some(payer) if !payer.is_none() => Ok(payer),
            _ => Err(ClientError::Configuration(
                "the payer account has not been configured".into(),
            )),
        }
    }

    /// The first gateway, or a configuration error if none is set.
    pub fn require_gateway(&self) -> Result<&Gateway, ClientError> {
        self.gateways.first().ok_or_else(|| {
            ClientError::Configuration("no network gateway has been configured".into())
        })
    }

    /// Checks the settings a transaction needs before anything is built.
    pub fn validate_for_transaction(&self) -> Result<Address, ClientError> {
        self.require_gateway()?;
        let payer = self.require_payer()?;
        self.validate_limits()?;
        if let Some(memo) = &self.memo {
            if memo.len() > MAX_MEMO_LENGTH {
                return Err(ClientError::Configuration(format!(
                    "memo is {} bytes, the network accepts at most {MAX_MEMO_LENGTH}",
                    memo.len()
                )));
            }
        }
        Ok(payer)
    }

    /// Checks the retry settings.
    pub fn validate_limits(&self) -> Result<(), ClientError> {
        if self.max_attempts == 0 {
            return Err(ClientError::Configuration(
                "max_attempts must allow at least one attempt".into(),
            ));
        }
        if self.deadline.is_zero() || self.dispatch_timeout.is_zero() {
            return Err(ClientError::Configuration(
                "deadline and dispatch timeout must be non-zero".into(),
            ));
        }
        Ok(())
    }

    pub fn memo(&self) -> &str {
        self.memo.as_deref().unwrap_or_default()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("gateways", &self.gateways)
            .field("payer", &self.payer)
            .field("signatory", &self.signatory)
            .field("max_fee", &self.max_fee)
            .field("max_attempts", &self.max_attempts)
            .field("deadline", &self.deadline)
            .field("transaction_id", &self.transaction_id)
            .field("cancellable", &self.cancellation.is_some())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// The receiving side of a cancellation signal. Cheap to clone; every
/// clone observes the same signal.
#[derive(Debug, Clone)]
pub struct Cancellation {
    rx: watch::Receiver<bool>,
}

/// The sending side. Dropping it without calling
/// [`cancel`](Self::cancel) never cancels.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl Cancellation {
    /// Creates a linked handle and signal.
    pub fn new() -> (CancelHandle, Cancellation) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, Cancellation { rx })
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation is requested.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                // Handle dropped without cancelling.
                std::future::pending::<()>().await;
            }
        }
    }
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

// ---------------------------------------------------------------------------
// Call scope
// ---------------------------------------------------------------------------

/// Marks one call as in flight for as long as it lives.
#[derive(Debug)]
pub struct CallScope {
    in_flight: Arc<AtomicUsize>,
}

impl CallScope {
    pub fn enter(in_flight: &Arc<AtomicUsize>) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        Self {
            in_flight: Arc::clone(in_flight),
        }
    }
}

impl Drop for CallScope {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_does_not_touch_the_parent() {
        let parent = Context::default().derive(|ctx| ctx.payer = Some(Address::new(0, 0, 2)));
        let child = parent.derive(|ctx| {
            ctx.payer = Some(Address::new(0, 0, 99));
            ctx.max_attempts = 1;
        });

        assert_eq!(parent.payer, Some(Address::new(0, 0, 2)));
        assert_eq!(parent.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(child.payer, Some(Address::new(0, 0, 99)));
        assert_eq!(child.max_attempts, 1);
    }

    #[test]
    fn missing_payer_and_gateway_are_configuration_errors() {
        let ctx = Context::default();
        assert!(matches!(ctx.require_payer(), Err(ClientError::Configuration(_))));
        assert!(matches!(ctx.require_gateway(), Err(ClientError::Configuration(_))));

        let none_payer = ctx.derive(|c| c.payer = Some(Address::NONE));
        assert!(none_payer.require_payer().is_err());
    }

    #[test]
    fn long_memo_is_rejected() {
        let ctx = Context::default().derive(|c| {
            c.gateways = vec![Gateway::new(Address::new(0, 0, 3), "node")];
            c.payer = Some(Address::new(0, 0, 2));
            c.memo = Some("x".repeat(MAX_MEMO_LENGTH + 1));
        });
        assert!(matches!(
            ctx.validate_for_transaction(),
            Err(ClientError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn cancellation_wakes_waiters() {
        let (handle, signal) = Cancellation::new();
        let waiter = tokio::spawn({
            let signal = signal.clone();
            async move { signal.cancelled().await }
        });
        assert!(!signal.is_cancelled());
        handle.cancel();
        waiter.await.unwrap();
        assert!(signal.is_cancelled());
    }

    #[test]
    fn call_scope_releases_on_drop() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let _a = CallScope::enter(&counter);
            let _b = CallScope::enter(&counter);
            assert_eq!(counter.load(Ordering::SeqCst), 2);
        }
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
