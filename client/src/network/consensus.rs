//! # Consensus Resolution Loop
//!
//! After a gateway accepts a transaction, the network still has to order it
//! and execute it. This module waits for that: it polls for the receipt
//! until the network reports a final status, and fetches the full record
//! only once the receipt is final (records may not exist before then).
//!
//! A still-processing answer (status `UNKNOWN`, `RECEIPT_NOT_FOUND`, ...)
//! is not a failure and does not consume retry attempts: the loop waits the
//! poll interval and asks again, bounded only by the call deadline.
//! Transient rejections of the query itself go through the ordinary retry
//! path in [`Execution::query`].

use tracing::debug;

use crate::envelope::query::{NetworkQuery, ReceiptQuery, RecordQuery};
use crate::error::{format_failure, ClientError};
use crate::identity::TxId;
use crate::network::executor::Execution;
use crate::network::retry::{Classification, ClassificationTable};
use crate::network::rpc::{QueryResponse, RawReceipt, RawRecord};
use crate::network::status::ResponseCode;

/// A final receipt and the companions the query asked for.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedReceipt {
    pub precheck: ResponseCode,
    pub receipt: RawReceipt,
    pub duplicates: Vec<RawReceipt>,
    pub children: Vec<RawReceipt>,
}

/// A record and the companions the query asked for.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedRecord {
    pub record: RawRecord,
    pub duplicates: Vec<RawRecord>,
    pub children: Vec<RawRecord>,
}

/// Polls until the receipt for `query.tx_id` carries a final status.
///
/// The status is not checked for success here; see [`require_success`].
pub(crate) async fn resolve_receipt(
    exec: &mut Execution<'_>,
    query: ReceiptQuery,
) -> Result<ResolvedReceipt, ClientError> {
    let ctx = exec.context();
    let table = &ctx.classification;
    let mut polls = 0u32;
    loop {
        polls += 1;
        let response = exec.query(query.into_query_data()).await?;
        let QueryResponse::Receipt {
            precheck,
            receipt,
            duplicates,
            children,
        } = response
        else {
            return Err(ClientError::Encoding(
                "gateway answered a receipt query with a record".into(),
            ));
        };

        match receipt {
            Some(receipt) if !still_processing(table, precheck, receipt.status) => {
                debug!(
                    tx_id = %query.tx_id,
                    status = %receipt.status,
                    polls,
                    "receipt resolved"
                );
                return Ok(ResolvedReceipt {
                    precheck,
                    receipt,
                    duplicates,
                    children,
                });
            }
            _ => {
                debug!(tx_id = %query.tx_id, precheck = %precheck, polls, "receipt not yet available");
                exec.pause(ctx.receipt_poll_interval).await?;
            }
        }
    }
}

/// Fetches the record for `query.tx_id`. Only call after the receipt has
/// resolved.
pub(crate) async fn fetch_record(
    exec: &mut Execution<'_>,
    query: RecordQuery,
) -> Result<ResolvedRecord, ClientError> {
    let ctx = exec.context();
    let table = &ctx.classification;
    loop {
        let response = exec.query(query.into_query_data()).await?;
        let QueryResponse::Record {
            precheck,
            record,
            duplicates,
            children,
        } = response
        else {
            return Err(ClientError::Encoding(
                "gateway answered a record query with a receipt".into(),
            ));
        };

        match record {
            Some(record) if !still_processing(table, precheck, record.receipt.status) => {
                debug!(tx_id = %query.tx_id, fee = record.fee, "record fetched");
                return Ok(ResolvedRecord {
                    record,
                    duplicates,
                    children,
                });
            }
            _ => {
                debug!(tx_id = %query.tx_id, precheck = %precheck, "record not yet available");
                exec.pause(ctx.receipt_poll_interval).await?;
            }
        }
    }
}

/// Turns a final non-success status into a [`ClientError::Transaction`]
/// with the kind's failure message.
pub(crate) fn require_success(
    table: &ClassificationTable,
    tx_id: TxId,
    status: ResponseCode,
    failure_message: &str,
) -> Result<(), ClientError> {
    if table.classify(status) == Classification::Success {
        return Ok(());
    }
    Err(ClientError::Transaction {
        tx_id,
        status,
        message: format_failure(failure_message, status),
    })
}

fn still_processing(table: &ClassificationTable, precheck: ResponseCode, status: ResponseCode) -> bool {
    table.classify(precheck) == Classification::StillProcessing
        || table.classify(status) == Classification::StillProcessing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{Address, ConsensusTimeStamp};

    fn tx_id() -> TxId {
        TxId::new(Address::new(0, 0, 2), ConsensusTimeStamp::new(1, 2).unwrap())
    }

    #[test]
    fn success_passes() {
        let table = ClassificationTable::default();
        assert!(require_success(&table, tx_id(), ResponseCode::Success, "x {status}").is_ok());
    }

    #[test]
    fn failure_carries_formatted_message() {
        let table = ClassificationTable::default();
        let err = require_success(
            &table,
            tx_id(),
            ResponseCode::TokenWasDeleted,
            "Unable to Mint Token Coins, status: {status}",
        )
        .unwrap_err();
        match err {
            ClientError::Transaction { tx_id: id, status, message } => {
                assert_eq!(id, tx_id());
                assert_eq!(status, ResponseCode::TokenWasDeleted);
                assert_eq!(message, "Unable to Mint Token Coins, status: TOKEN_WAS_DELETED");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unknown_status_is_still_processing() {
        let table = ClassificationTable::default();
        assert!(still_processing(&table, ResponseCode::Ok, ResponseCode::Unknown));
        assert!(still_processing(&table, ResponseCode::ReceiptNotFound, ResponseCode::Success));
        assert!(!still_processing(&table, ResponseCode::Ok, ResponseCode::AccountDeleted));
    }
}
