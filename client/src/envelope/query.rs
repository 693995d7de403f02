//! Receipt and record queries.
//!
//! Queries share the dispatch and classification path of transactions but
//! are not signed and carry no payment.

use serde::{Deserialize, Serialize};

use crate::identity::TxId;
use crate::network::rpc::RemoteMethod;

/// The two operations every query kind provides.
pub trait NetworkQuery: Send + Sync {
    /// Wraps the query in its envelope.
    fn into_query_data(self) -> QueryData;

    /// The service method that answers this query.
    fn remote_method(&self) -> RemoteMethod;
}

/// Asks for the receipt of `tx_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptQuery {
    pub tx_id: TxId,
    /// Also return receipts of transactions submitted with the same id.
    pub include_duplicates: bool,
    /// Also return receipts of child transactions (e.g. scheduled
    /// executions) triggered by this one.
    pub include_children: bool,
}

/// Asks for the full record of `tx_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordQuery {
    pub tx_id: TxId,
    pub include_duplicates: bool,
    pub include_children: bool,
}

impl ReceiptQuery {
    /// Receipt of `tx_id` alone.
    pub fn new(tx_id: TxId) -> Self {
        Self {
            tx_id,
            include_duplicates: false,
            include_children: false,
        }
    }

    /// Receipt of `tx_id` plus its duplicates and children.
    pub fn all(tx_id: TxId) -> Self {
        Self {
            tx_id,
            include_duplicates: true,
            include_children: true,
        }
    }
}

impl RecordQuery {
    pub fn new(tx_id: TxId) -> Self {
        Self {
            tx_id,
            include_duplicates: false,
            include_children: false,
        }
    }

    pub fn all(tx_id: TxId) -> Self {
        Self {
            tx_id,
            include_duplicates: true,
            include_children: true,
        }
    }
}

/// Exactly one query body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryData {
    Receipt(ReceiptQuery),
    Record(RecordQuery),
}

impl QueryData {
    /// Transaction the query is about.
    pub fn tx_id(&self) -> TxId {
        match self {
            Self::Receipt(q) => q.tx_id,
            Self::Record(q) => q.tx_id,
        }
    }

    /// The service method for whichever query is populated.
    pub fn remote_method(&self) -> RemoteMethod {
        match self {
            Self::Receipt(q) => q.remote_method(),
            Self::Record(q) => q.remote_method(),
        }
    }
}

impl NetworkQuery for ReceiptQuery {
    fn into_query_data(self) -> QueryData {
        QueryData::Receipt(self)
    }

    fn remote_method(&self) -> RemoteMethod {
        RemoteMethod::GetTransactionReceipts
    }
}

impl NetworkQuery for RecordQuery {
    fn into_query_data(self) -> QueryData {
        QueryData::Record(self)
    }

    fn remote_method(&self) -> RemoteMethod {
        RemoteMethod::GetTxRecordByTxId
    }
}
