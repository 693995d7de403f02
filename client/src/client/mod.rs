//! # Client
//!
//! The public entry point. A [`Client`] owns the default [`Context`], the
//! shared gateway channels and the transaction-id clock. Domain methods
//! (`delete_account`, `mint_token`, ...) validate their arguments, build a
//! kind body and hand it to [`Client::execute_transaction`], the single
//! sign-submit-resolve pipeline every transaction goes through.
//!
//! Every method takes an optional per-call [`Signatory`] (added to the
//! context's default) and a `configure` callback that adjusts a private copy
//! of the context for that call only.

mod crypto;
mod file;
mod network;
mod records;
mod token;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info};

use crate::context::{CallScope, Context};
use crate::envelope::query::{ReceiptQuery, RecordQuery};
use crate::envelope::{NetworkTransaction, ScheduleCreateBody, TransactionBody};
use crate::error::ClientError;
use crate::identity::{Address, TxId, TxIdClock};
use crate::network::channel::{ChannelFactory, ChannelPool};
use crate::network::consensus;
use crate::network::executor::Execution;
use crate::result::{NetworkResult, Projection};
use crate::signing::{gather_signatories, Signatory, SignedTransaction};

/// A handle to the network.
///
/// Cheap to clone; clones share channels, the id clock and configuration.
#[derive(Clone)]
pub struct Client {
    context: Arc<Context>,
    channels: Arc<ChannelPool>,
    clock: Arc<TxIdClock>,
    in_flight: Arc<AtomicUsize>,
}

impl Client {
    /// Creates a client whose channels come from `factory`.
    pub fn new(factory: Arc<dyn ChannelFactory>, configure: impl FnOnce(&mut Context)) -> Self {
        Self {
            context: Arc::new(Context::default().derive(configure)),
            channels: Arc::new(ChannelPool::new(factory)),
            clock: Arc::new(TxIdClock::new()),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A child client with its own configuration, derived from this one.
    /// Channels and the id clock stay shared; this client is unaffected.
    pub fn clone_with(&self, configure: impl FnOnce(&mut Context)) -> Self {
        Self {
            context: Arc::new(self.context.derive(configure)),
            ..self.clone()
        }
    }

    /// Replaces this client's configuration with an adjusted copy. Calls
    /// already in flight keep the configuration they started with.
    pub fn configure(&mut self, configure: impl FnOnce(&mut Context)) {
        self.context = Arc::new(self.context.derive(configure));
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Number of calls currently running on this client and its clones.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Mints a fresh transaction id for the configured payer.
    ///
    /// Useful for submitting a transaction under a known id (via
    /// [`Context::transaction_id`]) and querying it later.
    pub fn create_new_tx_id(&self, configure: impl FnOnce(&mut Context)) -> Result<TxId, ClientError> {
        let ctx = self.context.derive(configure);
        let payer = ctx.require_payer()?;
        Ok(self.clock.next(payer))
    }

    /// Signs, submits and resolves one transaction.
    ///
    /// The pipeline:
    ///
    /// 1. Derive the call context and check payer and gateways.
    /// 2. Gather signatories. If one is pending, wrap the body in a
    ///    schedule-create (failing here for kinds that cannot be scheduled).
    /// 3. Take the context's transaction id or mint one. It is used for
    ///    every attempt of this call.
    /// 4. Submit with retries, then poll for the receipt. A non-success
    ///    final status fails with the kind's failure message.
    /// 5. Fetch the record if `R` needs it, then project.
    pub async fn execute_transaction<B, R>(
        &self,
        body: B,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<R, ClientError>
    where
        B: NetworkTransaction,
        R: Projection,
    {
        let ctx = self.context.derive(configure);
        let _scope = CallScope::enter(&self.in_flight);
        let payer = ctx.validate_for_transaction()?;
        let signatories = gather_signatories(&ctx, signatory);

        let failure_message = body.failure_message();
        let data = match signatories.pending() {
            Some(pending) => {
                ScheduleCreateBody::from_pending(body.into_schedulable_data()?, pending)
                    .into_transaction_data()
            }
            None => body.into_transaction_data(),
        };
        let method = data.remote_method();
        if signatories.is_empty() {
            return Err(ClientError::Configuration(
                "a signatory is required to sign the transaction".into(),
            ));
        }

        let tx_id = ctx.transaction_id.unwrap_or_else(|| self.clock.next(payer));
        info!(tx_id = %tx_id, method = %method, "executing transaction");

        let draft = TransactionBody {
            tx_id,
            node: Address::NONE,
            max_fee: ctx.max_fee,
            valid_duration_secs: ctx.valid_duration.as_secs(),
            memo: ctx.memo().to_string(),
            data,
        };
        let sign_for = |node: Address| {
            let draft = &draft;
            let signatories = &signatories;
            async move {
                let body = TransactionBody {
                    node,
                    ..draft.clone()
                };
                let body_bytes = Bytes::from(body.to_bytes()?);
                let signatures = signatories
                    .sign(tx_id, &body.memo, body_bytes.clone())
                    .await?;
                Ok(SignedTransaction {
                    body_bytes,
                    signatures,
                })
            }
        };

        let mut exec = Execution::new(&ctx, &self.channels, tx_id);
        let response = exec.submit(method, sign_for).await?;

        let resolved = consensus::resolve_receipt(&mut exec, ReceiptQuery::new(tx_id)).await?;
        consensus::require_success(
            &ctx.classification,
            tx_id,
            resolved.receipt.status,
            failure_message,
        )?;

        let record = if R::INCLUDE_RECORD {
            Some(consensus::fetch_record(&mut exec, RecordQuery::new(tx_id)).await?.record)
        } else {
            None
        };
        debug!(tx_id = %tx_id, status = %resolved.receipt.status, "transaction resolved");

        R::project(NetworkResult {
            tx_id,
            precheck: response.precheck,
            receipt: resolved.receipt,
            record,
        })
    }
}

/// Rejects [`Address::NONE`] for a required address argument.
fn require_address(parameter: &'static str, address: Address) -> Result<Address, ClientError> {
    if address.is_none() {
        return Err(ClientError::invalid_input(parameter, "address is missing"));
    }
    Ok(address)
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("context", &self.context)
            .field("channels", &self.channels)
            .field("in_flight", &self.in_flight())
            .finish()
    }
}
