//! # Result Projection
//!
//! The engine resolves a call into a [`NetworkResult`]; callers get one of
//! the read-only projections below. Receipt projections cannot fail. Record
//! projections need a result that was resolved with its record, which the
//! engine guarantees whenever the projection asks for one
//! ([`Projection::INCLUDE_RECORD`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::identity::{timestamp, Address, ConsensusTimeStamp, TxId};
use crate::network::rpc::{RawReceipt, RawRecord, TokenTransfer};
use crate::network::status::ResponseCode;

// ---------------------------------------------------------------------------
// Engine output
// ---------------------------------------------------------------------------

/// Everything the engine learned about one resolved transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkResult {
    pub tx_id: TxId,
    /// Last precheck code seen on submission.
    pub precheck: ResponseCode,
    pub receipt: RawReceipt,
    /// Present when the caller asked for the record.
    pub record: Option<RawRecord>,
}

/// A caller-facing shape a [`NetworkResult`] can be turned into.
pub trait Projection: Sized {
    /// Whether the engine must fetch the record for this shape.
    const INCLUDE_RECORD: bool;

    fn project(result: NetworkResult) -> Result<Self, ClientError>;
}

// ---------------------------------------------------------------------------
// Receipts
// ---------------------------------------------------------------------------

/// The scheduling outcome when a call was routed through a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleReceipt {
    /// The schedule entity holding the transaction.
    pub schedule: Address,
    /// Id the transaction will execute under once fully signed.
    pub scheduled_tx_id: TxId,
}

/// Finality confirmation for a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub tx_id: TxId,
    pub status: ResponseCode,
    /// Set when the call created a schedule instead of executing directly.
    pub pending: Option<ScheduleReceipt>,
}

/// Receipt of a token supply change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenReceipt {
    #[serde(flatten)]
    pub receipt: TransactionReceipt,
    /// Total coins in circulation after the transaction.
    pub circulation: u64,
}

impl TransactionReceipt {
    /// Projects a raw receipt belonging to `tx_id`.
    pub fn from_raw(tx_id: TxId, raw: &RawReceipt) -> Self {
        let pending = match (raw.schedule, raw.scheduled_tx_id) {
            (Some(schedule), Some(scheduled_tx_id)) => Some(ScheduleReceipt {
                schedule,
                scheduled_tx_id,
            }),
            _ => None,
        };
        Self {
            tx_id,
            status: raw.status,
            pending,
        }
    }
}

impl From<&NetworkResult> for TransactionReceipt {
    fn from(result: &NetworkResult) -> Self {
        Self::from_raw(result.tx_id, &result.receipt)
    }
}

impl From<&NetworkResult> for TokenReceipt {
    fn from(result: &NetworkResult) -> Self {
        Self {
            receipt: result.into(),
            circulation: result.receipt.new_total_supply,
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Full finality detail for a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub tx_id: TxId,
    pub status: ResponseCode,
    pub pending: Option<ScheduleReceipt>,
    /// SHA-384 of the signed transaction, hex encoded.
    pub hash: String,
    #[serde(with = "timestamp::as_decimal")]
    pub consensus: ConsensusTimeStamp,
    pub memo: String,
    /// Fee charged, in tinybars.
    pub fee: u64,
    /// Net hbar movement per account, in tinybars.
    pub transfers: BTreeMap<Address, i64>,
    pub token_transfers: Vec<TokenTransfer>,
    /// Schedule that triggered this transaction, if any.
    pub schedule: Option<Address>,
}

/// Record of a token supply change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    #[serde(flatten)]
    pub record: TransactionRecord,
    pub circulation: u64,
}

impl TransactionRecord {
    /// Projects a raw record. The record carries its own tx id, which
    /// differs from the submitted one for scheduled executions.
    pub fn from_raw(raw: &RawRecord) -> Self {
        let receipt = TransactionReceipt::from_raw(raw.tx_id, &raw.receipt);
        let mut transfers = BTreeMap::new();
        for transfer in &raw.transfers {
            *transfers.entry(transfer.account).or_insert(0i64) += transfer.amount;
        }
        Self {
            tx_id: raw.tx_id,
            status: receipt.status,
            pending: receipt.pending,
            hash: hex::encode(&raw.transaction_hash),
            consensus: raw.consensus_timestamp,
            memo: raw.memo.clone(),
            fee: raw.fee,
            transfers,
            token_transfers: raw.token_transfers.clone(),
            schedule: raw.schedule,
        }
    }
}

fn require_record(result: &NetworkResult) -> Result<&RawRecord, ClientError> {
    result.record.as_ref().ok_or_else(|| {
        ClientError::Encoding(format!(
            "transaction {} was resolved without its record",
            result.tx_id
        ))
    })
}

// ---------------------------------------------------------------------------
// Projection impls
// ---------------------------------------------------------------------------

impl Projection for NetworkResult {
    const INCLUDE_RECORD: bool = false;

    fn project(result: NetworkResult) -> Result<Self, ClientError> {
        Ok(result)
    }
}

impl Projection for TransactionReceipt {
    const INCLUDE_RECORD: bool = false;

    fn project(result: NetworkResult) -> Result<Self, ClientError> {
        Ok((&result).into())
    }
}

impl Projection for TokenReceipt {
    const INCLUDE_RECORD: bool = false;

    fn project(result: NetworkResult) -> Result<Self, ClientError> {
        Ok((&result).into())
    }
}

impl Projection for TransactionRecord {
    const INCLUDE_RECORD: bool = true;

    fn project(result: NetworkResult) -> Result<Self, ClientError> {
        require_record(&result).map(TransactionRecord::from_raw)
    }
}

impl Projection for TokenRecord {
    const INCLUDE_RECORD: bool = true;

    fn project(result: NetworkResult) -> Result<Self, ClientError> {
        let raw = require_record(&result)?;
        Ok(Self {
            record: TransactionRecord::from_raw(raw),
            circulation: raw.receipt.new_total_supply,
        })
    }
}
