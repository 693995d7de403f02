//! # Client Configuration Defaults
//!
//! Every default the execution engine falls back on lives here. A
//! [`Context`](crate::context::Context) starts from these values and callers
//! override what they need per client or per call.
//!
//! Changing a value here changes behavior for every caller that did not
//! override it, so treat these as part of the public contract.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Submission & Retry
// ---------------------------------------------------------------------------

/// Total dispatch attempts for one logical request, including the first.
/// A node answering BUSY four times in a row still lets the fifth through.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Delay before the first retry of a transient failure.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(200);

/// Ceiling for capped-exponential backoff. Past this, every retry waits
/// the same amount.
pub const DEFAULT_MAX_RETRY_DELAY: Duration = Duration::from_secs(8);

/// Growth factor applied per retry when exponential backoff is selected.
pub const DEFAULT_BACKOFF_MULTIPLIER: u32 = 2;

/// Wall-clock budget for one logical call, from build to resolved receipt
/// (and record, if requested). Matches the default transaction valid
/// duration: past that point the network would discard the transaction
/// anyway.
pub const DEFAULT_CALL_DEADLINE: Duration = Duration::from_secs(120);

/// Per-dispatch transport timeout. A single hung RPC must not eat the
/// whole call deadline.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Consensus Resolution
// ---------------------------------------------------------------------------

/// Wait between receipt polls while the network reports the transaction
/// as still processing.
pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(500);

// ---------------------------------------------------------------------------
// Transaction Header
// ---------------------------------------------------------------------------

/// Maximum fee (tinybars) the payer authorizes for a transaction.
pub const DEFAULT_MAX_TRANSACTION_FEE: u64 = 100_000_000;

/// How long after its valid start the network will accept a transaction.
pub const DEFAULT_TRANSACTION_VALID_DURATION: Duration = Duration::from_secs(120);

/// Longest memo the network accepts, in bytes.
pub const MAX_MEMO_LENGTH: usize = 100;

/// Smallest number of token units a mint may create.
pub const MIN_MINT_AMOUNT: u64 = 1;

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Ed25519 secret key length in bytes.
pub const SIGNING_KEY_LENGTH: usize = 32;

/// Ed25519 public key length in bytes.
pub const VERIFYING_KEY_LENGTH: usize = 32;

/// Ed25519 signature length in bytes.
pub const SIGNATURE_LENGTH: usize = 64;
