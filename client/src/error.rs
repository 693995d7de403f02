//! Error taxonomy for the execution engine.
//!
//! Every public operation returns [`ClientError`]. The variants line up with
//! the stage that produced them: validation and configuration failures are
//! raised before any I/O, precheck and final-status failures carry the
//! transaction id and status code, and timeouts and cancellation are kept
//! apart so callers can tell "the network said no" from "we stopped
//! waiting".

use std::fmt;

use thiserror::Error;

use crate::identity::TxId;
use crate::network::channel::TransportError;
use crate::network::status::ResponseCode;

/// Why a call gave up waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutCause {
    /// The call's wall-clock deadline elapsed.
    Deadline,
    /// Every permitted dispatch attempt came back transient.
    AttemptsExhausted,
}

impl fmt::Display for TimeoutCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deadline => write!(f, "deadline exceeded"),
            Self::AttemptsExhausted => write!(f, "retry attempts exhausted"),
        }
    }
}

/// Errors surfaced by the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A caller-supplied argument violates a precondition.
    #[error("invalid {parameter}: {reason}")]
    InvalidInput {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// A required context setting (payer, gateway) is missing or unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The transaction kind cannot be wrapped in a scheduled transaction.
    #[error("{0}")]
    NotSchedulable(String),

    /// The gateway node rejected the signed request before consensus.
    #[error("transaction {tx_id} failed precheck with status {status}")]
    Precheck {
        /// Id of the rejected transaction.
        tx_id: TxId,
        /// Precheck status returned by the node.
        status: ResponseCode,
    },

    /// The network reached consensus and the transaction failed.
    #[error("{message}")]
    Transaction {
        /// Id of the failed transaction.
        tx_id: TxId,
        /// Final status from the receipt.
        status: ResponseCode,
        /// Kind-specific failure message with the status filled in.
        message: String,
    },

    /// The call ran out of attempts or time before resolving.
    #[error("transaction {tx_id} not resolved: {cause} after {attempts} attempt(s)")]
    Timeout {
        /// Id of the unresolved transaction.
        tx_id: TxId,
        /// Dispatch or poll attempts made.
        attempts: u32,
        /// Last status observed, if any response arrived.
        last_status: Option<ResponseCode>,
        /// Which bound was hit.
        cause: TimeoutCause,
    },

    /// The caller cancelled the call.
    #[error("call cancelled")]
    Cancelled {
        /// Id of the in-flight transaction, if one was built.
        tx_id: Option<TxId>,
    },

    /// A transport failure that retrying cannot fix.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A signatory failed to produce its signatures.
    #[error("signing failed: {0}")]
    Signing(String),

    /// A body or envelope could not be encoded or decoded.
    #[error("encoding error: {0}")]
    Encoding(String),
}

impl ClientError {
    /// Shorthand for [`ClientError::InvalidInput`].
    pub fn invalid_input(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            parameter,
            reason: reason.into(),
        }
    }

    /// Transaction id attached to the error, when there is one.
    pub fn tx_id(&self) -> Option<&TxId> {
        match self {
            Self::Precheck { tx_id, .. }
            | Self::Transaction { tx_id, .. }
            | Self::Timeout { tx_id, .. } => Some(tx_id),
            Self::Cancelled { tx_id } => tx_id.as_ref(),
            _ => None,
        }
    }

    /// Network status attached to the error, when there is one.
    pub fn status(&self) -> Option<ResponseCode> {
        match self {
            Self::Precheck { status, .. } | Self::Transaction { status, .. } => Some(*status),
            Self::Timeout { last_status, .. } => *last_status,
            _ => None,
        }
    }
}

impl From<bincode::Error> for ClientError {
    fn from(e: bincode::Error) -> Self {
        Self::Encoding(e.to_string())
    }
}

/// Fills a kind's failure template (`"... status: {status}"`) with a status.
pub fn format_failure(template: &str, status: ResponseCode) -> String {
    template.replace("{status}", &status.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{Address, ConsensusTimeStamp};

    fn tx_id() -> TxId {
        TxId::new(
            Address::new(0, 0, 2),
            ConsensusTimeStamp::new(1_600_000_000, 1).unwrap(),
        )
    }

    #[test]
    fn failure_template_is_filled() {
        let msg = format_failure("Unable to delete account, status: {status}", ResponseCode::AccountDeleted);
        assert_eq!(msg, "Unable to delete account, status: ACCOUNT_DELETED");
    }

    #[test]
    fn precheck_and_transaction_errors_carry_context() {
        let precheck = ClientError::Precheck {
            tx_id: tx_id(),
            status: ResponseCode::InvalidSignature,
        };
        assert_eq!(precheck.tx_id(), Some(&tx_id()));
        assert_eq!(precheck.status(), Some(ResponseCode::InvalidSignature));
        assert!(precheck.to_string().contains("INVALID_SIGNATURE"));

        let failed = ClientError::Transaction {
            tx_id: tx_id(),
            status: ResponseCode::InsufficientPayerBalance,
            message: "Unable to mint, status: INSUFFICIENT_PAYER_BALANCE".to_string(),
        };
        assert_eq!(failed.to_string(), "Unable to mint, status: INSUFFICIENT_PAYER_BALANCE");
    }

    #[test]
    fn timeout_display_names_the_cause() {
        let err = ClientError::Timeout {
            tx_id: tx_id(),
            attempts: 5,
            last_status: Some(ResponseCode::Busy),
            cause: TimeoutCause::AttemptsExhausted,
        };
        assert!(err.to_string().contains("retry attempts exhausted"));
        assert_eq!(err.status(), Some(ResponseCode::Busy));
    }

    #[test]
    fn validation_errors_have_no_tx_id() {
        let err = ClientError::invalid_input("amount", "must be greater than zero");
        assert!(err.tx_id().is_none());
        assert_eq!(err.to_string(), "invalid amount: must be greater than zero");
    }
}
