//! # Submission & Retry Engine
//!
//! Delivers one signed transaction (or one query) to the network and
//! classifies what comes back.
//!
//! ## How it works
//!
//! Each attempt targets the current gateway:
//!
//! 1. Sign the body for that gateway, unless the request already in hand
//!    was signed for it. The transaction id never changes; only the
//!    submitting-node field does, so a rotation re-signs the same logical
//!    transaction.
//! 2. Dispatch under the per-dispatch timeout.
//! 3. Classify the precheck code through the context's
//!    [`ClassificationTable`](crate::network::retry::ClassificationTable):
//!    success returns, terminal codes fail immediately, transient codes back
//!    off and resend. Transport failures that look like an unresponsive node
//!    also move to the next gateway.
//!
//! Every wait (signing, dispatch, backoff, receipt polls) races the call
//! deadline and the caller's cancellation signal. The attempt budget and
//! the deadline each end the call with a [`ClientError::Timeout`] naming
//! which one ran out.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::context::{Cancellation, Context};
use crate::envelope::query::QueryData;
use crate::error::{ClientError, TimeoutCause};
use crate::identity::{Address, TxId};
use crate::network::channel::{Channel, ChannelPool, Gateway, TransportError};
use crate::network::retry::Classification;
use crate::network::rpc::{QueryResponse, RemoteMethod, TransactionResponse};
use crate::network::status::ResponseCode;
use crate::signing::SignedTransaction;

/// The per-call state of the retry engine.
///
/// Shared by the submission and the consensus stages of one call so both
/// run against the same deadline and gateway rotation.
pub(crate) struct Execution<'a> {
    ctx: &'a Context,
    channels: &'a ChannelPool,
    tx_id: TxId,
    deadline: Instant,
    gateway: usize,
    attempts: u32,
    last_status: Option<ResponseCode>,
}

impl<'a> Execution<'a> {
    /// Starts the clock for a call about `tx_id`.
    pub(crate) fn new(ctx: &'a Context, channels: &'a ChannelPool, tx_id: TxId) -> Self {
        Self {
            ctx,
            channels,
            tx_id,
            deadline: Instant::now() + ctx.deadline,
            gateway: 0,
            attempts: 0,
            last_status: None,
        }
    }

    pub(crate) fn context(&self) -> &'a Context {
        self.ctx
    }

    // -----------------------------------------------------------------------
    // Suspension
    // -----------------------------------------------------------------------

    /// Runs `fut` unless the deadline passes or the caller cancels first.
    pub(crate) async fn guard<F: Future>(&self, fut: F) -> Result<F::Output, ClientError> {
        tokio::select! {
            biased;
            _ = cancelled(self.ctx.cancellation.as_ref()) => {
                info!(tx_id = %self.tx_id, "call cancelled");
                Err(ClientError::Cancelled { tx_id: Some(self.tx_id) })
            }
            _ = time::sleep_until(self.deadline) => {
                warn!(tx_id = %self.tx_id, attempts = self.attempts, "call deadline exceeded");
                Err(self.timeout(TimeoutCause::Deadline))
            }
            output = fut => Ok(output),
        }
    }

    /// Sleeps for `delay` under the call's deadline and cancellation.
    pub(crate) async fn pause(&self, delay: Duration) -> Result<(), ClientError> {
        self.guard(time::sleep(delay)).await
    }

    fn timeout(&self, cause: TimeoutCause) -> ClientError {
        ClientError::Timeout {
            tx_id: self.tx_id,
            attempts: self.attempts,
            last_status: self.last_status,
            cause,
        }
    }

    // -----------------------------------------------------------------------
    // Gateway selection
    // -----------------------------------------------------------------------

    fn gateway(&self) -> Result<&'a Gateway, ClientError> {
        let gateways: &'a [Gateway] = &self.ctx.gateways;
        if gateways.is_empty() {
            return Err(ClientError::Configuration(
                "no network gateway has been configured".into(),
            ));
        }
        Ok(&gateways[self.gateway % gateways.len()])
    }

    fn rotate(&mut self) {
        let count = self.ctx.gateways.len();
        if count > 1 {
            self.gateway = (self.gateway + 1) % count;
            debug!(tx_id = %self.tx_id, next = self.gateway, "rotating gateway");
        }
    }

    // -----------------------------------------------------------------------
    // Attempts
    // -----------------------------------------------------------------------

    /// One guarded, timed call on `gateway`'s channel. The outer error ends
    /// the call; the inner one is a transport outcome to classify.
    async fn dispatch<T, F, Fut>(
        &self,
        gateway: &Gateway,
        call: F,
    ) -> Result<Result<T, TransportError>, ClientError>
    where
        F: FnOnce(Arc<dyn Channel>) -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        let channel = match self.channels.get(gateway) {
            Ok(channel) => channel,
            Err(err) => return Ok(Err(err)),
        };
        match self.guard(time::timeout(self.ctx.dispatch_timeout, call(channel))).await? {
            Ok(outcome) => Ok(outcome),
            Err(_elapsed) => Ok(Err(TransportError::DeadlineExceeded)),
        }
    }

    /// Spends one retry: fails if the attempt budget is gone, otherwise
    /// waits out the backoff (on the next gateway if `rotate`).
    async fn retry_after(&mut self, rotate: bool) -> Result<(), ClientError> {
        if self.attempts >= self.ctx.max_attempts {
            warn!(
                tx_id = %self.tx_id,
                attempts = self.attempts,
                last_status = ?self.last_status,
                "retry attempts exhausted"
            );
            return Err(self.timeout(TimeoutCause::AttemptsExhausted));
        }
        if rotate {
            self.rotate();
        }
        let delay = self.ctx.backoff.delay_for(self.attempts);
        debug!(
            tx_id = %self.tx_id,
            attempt = self.attempts,
            delay_ms = delay.as_millis() as u64,
            "backing off"
        );
        self.pause(delay).await
    }

    /// Submits a transaction until a gateway accepts it.
    ///
    /// `sign_for(node)` produces the signed request naming `node` as the
    /// submitting gateway. It runs once per distinct gateway tried.
    ///
    /// Once a dispatch has timed out, the network may already hold the
    /// transaction. From then on a `DUPLICATE_TRANSACTION` answer counts as
    /// acceptance; on a first attempt it stays a precheck rejection.
    pub(crate) async fn submit<S, Fut>(
        &mut self,
        method: RemoteMethod,
        sign_for: S,
    ) -> Result<TransactionResponse, ClientError>
    where
        S: Fn(Address) -> Fut,
        Fut: Future<Output = Result<SignedTransaction, ClientError>>,
    {
        debug_assert!(!method.is_query(), "{method} is a query method");
        self.attempts = 0;
        let mut outcome_unknown = false;
        let mut signed: Option<(Address, SignedTransaction)> = None;
        loop {
            let gateway = self.gateway()?;
            let request = match signed.take() {
                Some((node, request)) if node == gateway.node => request,
                _ => self.guard(sign_for(gateway.node)).await??,
            };

            self.attempts += 1;
            debug!(
                tx_id = %self.tx_id,
                gateway = %gateway.node,
                attempt = self.attempts,
                method = %method,
                "submitting transaction"
            );
            let outcome = self
                .dispatch(gateway, |channel| {
                    let request = &request;
                    async move { channel.submit_transaction(method, request).await }
                })
                .await?;
            signed = Some((gateway.node, request));

            match outcome {
                Ok(response)
                    if outcome_unknown
                        && response.precheck == ResponseCode::DuplicateTransaction =>
                {
                    self.last_status = Some(response.precheck);
                    info!(
                        tx_id = %self.tx_id,
                        gateway = %gateway.node,
                        attempts = self.attempts,
                        "earlier attempt was accepted"
                    );
                    return Ok(response);
                }
                Ok(response) => {
                    self.last_status = Some(response.precheck);
                    match self.ctx.classification.classify(response.precheck) {
                        Classification::Success => {
                            info!(
                                tx_id = %self.tx_id,
                                gateway = %gateway.node,
                                attempts = self.attempts,
                                "transaction accepted"
                            );
                            return Ok(response);
                        }
                        Classification::Terminal => {
                            warn!(
                                tx_id = %self.tx_id,
                                status = %response.precheck,
                                "transaction rejected at precheck"
                            );
                            return Err(ClientError::Precheck {
                                tx_id: self.tx_id,
                                status: response.precheck,
                            });
                        }
                        Classification::Transient | Classification::StillProcessing => {
                            debug!(tx_id = %self.tx_id, status = %response.precheck, "transient precheck");
                            self.retry_after(false).await?;
                        }
                    }
                }
                Err(err) if err.is_transient() => {
                    warn!(tx_id = %self.tx_id, gateway = %gateway.node, error = %err, "transport failure");
                    // A timed-out dispatch may still have reached the node.
                    outcome_unknown |= err == TransportError::DeadlineExceeded;
                    self.retry_after(err.should_rotate()).await?;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Sends a query until a gateway answers it.
    ///
    /// Answers whose precheck is still-processing are returned as they are;
    /// waiting for the network is the consensus loop's job.
    pub(crate) async fn query(&mut self, query: QueryData) -> Result<QueryResponse, ClientError> {
        let method = query.remote_method();
        debug_assert!(method.is_query(), "{method} is not a query method");
        self.attempts = 0;
        loop {
            let gateway = self.gateway()?;
            self.attempts += 1;
            debug!(
                tx_id = %self.tx_id,
                gateway = %gateway.node,
                attempt = self.attempts,
                method = %method,
                "sending query"
            );
            let outcome = self
                .dispatch(gateway, |channel| async move {
                    channel.submit_query(method, &query).await
                })
                .await?;

            match outcome {
                Ok(response) => {
                    let precheck = response.precheck();
                    self.last_status = Some(precheck);
                    match self.ctx.classification.classify(precheck) {
                        Classification::Success | Classification::StillProcessing => {
                            return Ok(response)
                        }
                        Classification::Terminal => {
                            warn!(tx_id = %self.tx_id, status = %precheck, "query rejected at precheck");
                            return Err(ClientError::Precheck {
                                tx_id: self.tx_id,
                                status: precheck,
                            });
                        }
                        Classification::Transient => self.retry_after(false).await?,
                    }
                }
                Err(err) if err.is_transient() => {
                    warn!(tx_id = %self.tx_id, gateway = %gateway.node, error = %err, "transport failure");
                    self.retry_after(err.should_rotate()).await?;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

async fn cancelled(cancellation: Option<&Cancellation>) {
    match cancellation {
        Some(cancellation) => cancellation.cancelled().await,
        None => std::future::pending().await,
    }
}
