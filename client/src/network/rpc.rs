//! # Remote Call Definitions
//!
//! The service methods the client invokes and the typed responses they
//! return. Requests are the signed envelope ([`SignedTransaction`]) or a
//! [`QueryData`] value; both are opaque to this module.
//!
//! ## Method Index
//!
//! | Method                                     | Used for                      |
//! |--------------------------------------------|-------------------------------|
//! | `proto.CryptoService/cryptoDelete`         | Delete an account             |
//! | `proto.FileService/deleteFile`             | Delete a file                 |
//! | `proto.FileService/systemDelete`           | Administrative file delete    |
//! | `proto.FileService/systemUndelete`         | Administrative file restore   |
//! | `proto.TokenService/mintToken`             | Mint token coins              |
//! | `proto.TokenService/freezeTokenAccount`    | Suspend an account's token    |
//! | `proto.TokenService/unfreezeTokenAccount`  | Resume an account's token     |
//! | `proto.TokenService/updateTokenFeeSchedule`| Replace a token's royalties   |
//! | `proto.FreezeService/freeze`               | Network freeze and upgrades   |
//! | `proto.ScheduleService/createSchedule`     | Schedule a transaction        |
//! | `proto.CryptoService/getTransactionReceipts` | Receipt query               |
//! | `proto.CryptoService/getTxRecordByTxID`    | Record query                  |
//!
//! [`SignedTransaction`]: crate::signing::SignedTransaction
//! [`QueryData`]: crate::envelope::query::QueryData

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::{Address, ConsensusTimeStamp, TxId};
use crate::network::status::ResponseCode;

// ---------------------------------------------------------------------------
// Method Enumeration
// ---------------------------------------------------------------------------

/// A network service method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemoteMethod {
    #[serde(rename = "proto.CryptoService/cryptoDelete")]
    CryptoDelete,
    #[serde(rename = "proto.FileService/deleteFile")]
    DeleteFile,
    #[serde(rename = "proto.FileService/systemDelete")]
    SystemDelete,
    #[serde(rename = "proto.FileService/systemUndelete")]
    SystemUndelete,
    #[serde(rename = "proto.TokenService/mintToken")]
    MintToken,
    #[serde(rename = "proto.TokenService/freezeTokenAccount")]
    FreezeTokenAccount,
    #[serde(rename = "proto.TokenService/unfreezeTokenAccount")]
    UnfreezeTokenAccount,
    #[serde(rename = "proto.TokenService/updateTokenFeeSchedule")]
    UpdateTokenFeeSchedule,
    #[serde(rename = "proto.FreezeService/freeze")]
    Freeze,
    #[serde(rename = "proto.ScheduleService/createSchedule")]
    CreateSchedule,
    #[serde(rename = "proto.CryptoService/getTransactionReceipts")]
    GetTransactionReceipts,
    #[serde(rename = "proto.CryptoService/getTxRecordByTxID")]
    GetTxRecordByTxId,
}

impl RemoteMethod {
    /// Full `service/method` path.
    pub fn path(&self) -> &'static str {
        match self {
            Self::CryptoDelete => "proto.CryptoService/cryptoDelete",
            Self::DeleteFile => "proto.FileService/deleteFile",
            Self::SystemDelete => "proto.FileService/systemDelete",
            Self::SystemUndelete => "proto.FileService/systemUndelete",
            Self::MintToken => "proto.TokenService/mintToken",
            Self::FreezeTokenAccount => "proto.TokenService/freezeTokenAccount",
            Self::UnfreezeTokenAccount => "proto.TokenService/unfreezeTokenAccount",
            Self::UpdateTokenFeeSchedule => "proto.TokenService/updateTokenFeeSchedule",
            Self::Freeze => "proto.FreezeService/freeze",
            Self::CreateSchedule => "proto.ScheduleService/createSchedule",
            Self::GetTransactionReceipts => "proto.CryptoService/getTransactionReceipts",
            Self::GetTxRecordByTxId => "proto.CryptoService/getTxRecordByTxID",
        }
    }

    /// Whether the method takes a query rather than a transaction.
    pub fn is_query(&self) -> bool {
        matches!(self, Self::GetTransactionReceipts | Self::GetTxRecordByTxId)
    }
}

impl fmt::Display for RemoteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// A gateway's answer to a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResponse {
    /// Precheck verdict.
    pub precheck: ResponseCode,
    /// Fee the node would charge, when it reports one.
    #[serde(default)]
    pub cost: u64,
}

impl TransactionResponse {
    pub fn new(precheck: ResponseCode) -> Self {
        Self { precheck, cost: 0 }
    }
}

/// A gateway's answer to a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryResponse {
    Receipt {
        precheck: ResponseCode,
        /// Receipt of the transaction itself; absent while unknown.
        receipt: Option<RawReceipt>,
        #[serde(default)]
        duplicates: Vec<RawReceipt>,
        #[serde(default)]
        children: Vec<RawReceipt>,
    },
    Record {
        precheck: ResponseCode,
        record: Option<RawRecord>,
        #[serde(default)]
        duplicates: Vec<RawRecord>,
        #[serde(default)]
        children: Vec<RawRecord>,
    },
}

impl QueryResponse {
    /// Precheck verdict on the query itself.
    pub fn precheck(&self) -> ResponseCode {
        match self {
            Self::Receipt { precheck, .. } | Self::Record { precheck, .. } => *precheck,
        }
    }
}

/// Receipt as reported by the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReceipt {
    /// Final status of the transaction.
    pub status: ResponseCode,
    #[serde(default)]
    pub account: Option<Address>,
    #[serde(default)]
    pub file: Option<Address>,
    #[serde(default)]
    pub token: Option<Address>,
    #[serde(default)]
    pub schedule: Option<Address>,
    /// Id of the transaction a schedule-create scheduled.
    #[serde(default)]
    pub scheduled_tx_id: Option<TxId>,
    /// Token supply after a mint.
    #[serde(default)]
    pub new_total_supply: u64,
}

impl RawReceipt {
    /// A receipt carrying only a status.
    pub fn with_status(status: ResponseCode) -> Self {
        Self {
            status,
            account: None,
            file: None,
            token: None,
            schedule: None,
            scheduled_tx_id: None,
            new_total_supply: 0,
        }
    }
}

/// One hbar movement in a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoTransfer {
    pub account: Address,
    /// Tinybars; negative for debits.
    pub amount: i64,
}

/// One token movement in a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransfer {
    pub token: Address,
    pub account: Address,
    pub amount: i64,
}

/// Record as reported by the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub receipt: RawReceipt,
    pub tx_id: TxId,
    /// SHA-384 of the signed transaction.
    #[serde(with = "hex_bytes")]
    pub transaction_hash: Vec<u8>,
    #[serde(with = "crate::identity::timestamp::as_nanos")]
    pub consensus_timestamp: ConsensusTimeStamp,
    #[serde(default)]
    pub memo: String,
    /// Fee charged, in tinybars.
    pub fee: u64,
    #[serde(default)]
    pub transfers: Vec<CryptoTransfer>,
    #[serde(default)]
    pub token_transfers: Vec<TokenTransfer>,
    /// Schedule that triggered this transaction, if any.
    #[serde(default)]
    pub schedule: Option<Address>,
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}
