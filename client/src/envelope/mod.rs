//! # Transaction Envelopes
//!
//! Every transaction kind the client can submit is a body type implementing
//! [`NetworkTransaction`]. The trait is the whole contract between a kind
//! and the execution engine: wrap the body as a transaction, wrap it as a
//! scheduled transaction (or refuse), name the service method, and supply
//! the failure message. Adding a kind means adding a body, its trait impl
//! and one [`TransactionData`] variant; the engine does not change.
//!
//! ## Canonical bytes
//!
//! A [`TransactionBody`] is the header (tx id, submitting node, fee, valid
//! duration, memo) plus exactly one kind body. Its bincode encoding is the
//! byte string every signatory signs and the gateway verifies.

pub mod crypto;
pub mod file;
pub mod network;
pub mod query;
pub mod schedule;
pub mod token;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::identity::{Address, TxId};
use crate::network::rpc::RemoteMethod;

pub use crypto::CryptoDeleteBody;
pub use file::{FileDeleteBody, SystemDeleteBody, SystemUndeleteBody};
pub use network::{FreezeBody, FreezeType};
pub use query::{NetworkQuery, QueryData, ReceiptQuery, RecordQuery};
pub use schedule::ScheduleCreateBody;
pub use token::{Royalty, TokenFeeScheduleUpdateBody, TokenFreezeBody, TokenMintBody, TokenUnfreezeBody};

// ---------------------------------------------------------------------------
// Variant contract
// ---------------------------------------------------------------------------

/// The four operations every transaction kind provides.
pub trait NetworkTransaction: Send + Sync {
    /// Wraps the body for direct submission.
    fn into_transaction_data(self) -> TransactionData;

    /// Wraps the body for submission inside a schedule-create.
    ///
    /// Kinds the network will not schedule fail with
    /// [`ClientError::NotSchedulable`].
    fn into_schedulable_data(self) -> Result<SchedulableTransactionData, ClientError>;

    /// The service method that accepts this kind.
    fn remote_method(&self) -> RemoteMethod;

    /// Message used when the transaction reaches consensus but fails.
    /// `{status}` is replaced by the final status code.
    fn failure_message(&self) -> &'static str;
}

// ---------------------------------------------------------------------------
// Envelope data
// ---------------------------------------------------------------------------

/// Exactly one kind body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionData {
    CryptoDelete(CryptoDeleteBody),
    FileDelete(FileDeleteBody),
    SystemDelete(SystemDeleteBody),
    SystemUndelete(SystemUndeleteBody),
    TokenMint(TokenMintBody),
    TokenFreeze(TokenFreezeBody),
    TokenUnfreeze(TokenUnfreezeBody),
    TokenFeeScheduleUpdate(TokenFeeScheduleUpdateBody),
    Freeze(FreezeBody),
    ScheduleCreate(ScheduleCreateBody),
}

impl TransactionData {
    /// The service method for whichever kind is populated.
    pub fn remote_method(&self) -> RemoteMethod {
        match self {
            Self::CryptoDelete(body) => body.remote_method(),
            Self::FileDelete(body) => body.remote_method(),
            Self::SystemDelete(body) => body.remote_method(),
            Self::SystemUndelete(body) => body.remote_method(),
            Self::TokenMint(body) => body.remote_method(),
            Self::TokenFreeze(body) => body.remote_method(),
            Self::TokenUnfreeze(body) => body.remote_method(),
            Self::TokenFeeScheduleUpdate(body) => body.remote_method(),
            Self::Freeze(body) => body.remote_method(),
            Self::ScheduleCreate(body) => body.remote_method(),
        }
    }
}

/// The kinds that may appear inside a schedule-create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulableTransactionData {
    CryptoDelete(CryptoDeleteBody),
    FileDelete(FileDeleteBody),
    SystemDelete(SystemDeleteBody),
    SystemUndelete(SystemUndeleteBody),
    TokenMint(TokenMintBody),
    TokenFreeze(TokenFreezeBody),
    TokenUnfreeze(TokenUnfreezeBody),
}

/// Header plus body: the value whose bytes get signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBody {
    pub tx_id: TxId,
    /// Gateway node the transaction is submitted through.
    pub node: Address,
    /// Largest fee the payer agrees to, in tinybars.
    pub max_fee: u64,
    pub valid_duration_secs: u64,
    pub memo: String,
    pub data: TransactionData,
}

impl TransactionBody {
    /// Canonical encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ClientError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decodes a canonical encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ClientError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Shorthand for the not-schedulable error.
pub(crate) fn not_schedulable(message: &str) -> ClientError {
    ClientError::NotSchedulable(message.to_string())
}
