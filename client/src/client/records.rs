//! Receipt and record retrieval for transactions submitted earlier, by this
//! client or anyone else.

use std::iter;

use super::Client;
use crate::context::{CallScope, Context};
use crate::envelope::query::{NetworkQuery, ReceiptQuery, RecordQuery};
use crate::error::ClientError;
use crate::identity::TxId;
use crate::network::consensus;
use crate::network::executor::Execution;
use crate::network::rpc::QueryResponse;
use crate::result::{TransactionReceipt, TransactionRecord};

impl Client {
    /// Sends one query and returns the gateway's answer as it is.
    ///
    /// Busy gateways are retried like any other dispatch, but a
    /// still-processing answer is returned rather than waited out.
    pub async fn execute_query<Q: NetworkQuery>(
        &self,
        query: Q,
        configure: impl FnOnce(&mut Context),
    ) -> Result<QueryResponse, ClientError> {
        let (ctx, _scope) = self.query_context(configure)?;
        let query = query.into_query_data();
        let mut exec = Execution::new(&ctx, &self.channels, query.tx_id());
        exec.query(query).await
    }

    /// Waits for the receipt of `tx_id`. Fails if the transaction did not
    /// succeed.
    pub async fn get_receipt(
        &self,
        tx_id: TxId,
        configure: impl FnOnce(&mut Context),
    ) -> Result<TransactionReceipt, ClientError> {
        let (ctx, _scope) = self.query_context(configure)?;
        let mut exec = Execution::new(&ctx, &self.channels, tx_id);
        let resolved = consensus::resolve_receipt(&mut exec, ReceiptQuery::new(tx_id)).await?;
        consensus::require_success(
            &ctx.classification,
            tx_id,
            resolved.receipt.status,
            "Unable to retrieve receipt, status: {status}",
        )?;
        Ok(TransactionReceipt::from_raw(tx_id, &resolved.receipt))
    }

    /// Waits for the receipt of `tx_id` and returns it with the receipts of
    /// its duplicates and children, whatever their status.
    pub async fn get_all_receipts(
        &self,
        tx_id: TxId,
        configure: impl FnOnce(&mut Context),
    ) -> Result<Vec<TransactionReceipt>, ClientError> {
        let (ctx, _scope) = self.query_context(configure)?;
        let mut exec = Execution::new(&ctx, &self.channels, tx_id);
        let resolved = consensus::resolve_receipt(&mut exec, ReceiptQuery::all(tx_id)).await?;
        Ok(iter::once(&resolved.receipt)
            .chain(&resolved.duplicates)
            .chain(&resolved.children)
            .map(|raw| TransactionReceipt::from_raw(tx_id, raw))
            .collect())
    }

    /// Waits for `tx_id` to resolve, then fetches its record. Fails if the
    /// transaction did not succeed.
    pub async fn get_transaction_record(
        &self,
        tx_id: TxId,
        configure: impl FnOnce(&mut Context),
    ) -> Result<TransactionRecord, ClientError> {
        let (ctx, _scope) = self.query_context(configure)?;
        let mut exec = Execution::new(&ctx, &self.channels, tx_id);
        consensus::resolve_receipt(&mut exec, ReceiptQuery::new(tx_id)).await?;
        let resolved = consensus::fetch_record(&mut exec, RecordQuery::new(tx_id)).await?;
        consensus::require_success(
            &ctx.classification,
            tx_id,
            resolved.record.receipt.status,
            "Unable to retrieve transaction record, status: {status}",
        )?;
        Ok(TransactionRecord::from_raw(&resolved.record))
    }

    /// Waits for `tx_id` to resolve, then returns its record with the
    /// records of its duplicates and children, whatever their status.
    pub async fn get_all_transaction_records(
        &self,
        tx_id: TxId,
        configure: impl FnOnce(&mut Context),
    ) -> Result<Vec<TransactionRecord>, ClientError> {
        let (ctx, _scope) = self.query_context(configure)?;
        let mut exec = Execution::new(&ctx, &self.channels, tx_id);
        consensus::resolve_receipt(&mut exec, ReceiptQuery::new(tx_id)).await?;
        let resolved = consensus::fetch_record(&mut exec, RecordQuery::all(tx_id)).await?;
        Ok(iter::once(&resolved.record)
            .chain(&resolved.duplicates)
            .chain(&resolved.children)
            .map(TransactionRecord::from_raw)
            .collect())
    }

    fn query_context(
        &self,
        configure: impl FnOnce(&mut Context),
    ) -> Result<(Context, CallScope), ClientError> {
        let ctx = self.context.derive(configure);
        ctx.require_gateway()?;
        ctx.validate_limits()?;
        Ok((ctx, CallScope::enter(&self.in_flight)))
    }
}
