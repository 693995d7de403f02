//! Scripted in-memory network shared by the integration tests.
//!
//! Each gateway answers from scripts: a queue of submission outcomes and a
//! queue of receipt outcomes. When a queue runs dry the gateway behaves
//! like a healthy network (precheck OK, receipt SUCCESS, record available).
//! Every call is logged so tests can assert on attempt counts, ordering and
//! the transaction ids that went over the wire.

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use hashgraph_client::crypto::PrivateKey;
use hashgraph_client::envelope::query::QueryData;
use hashgraph_client::envelope::TransactionBody;
use hashgraph_client::identity::{Address, ConsensusTimeStamp, TxId};
use hashgraph_client::network::channel::{Channel, ChannelFactory, Gateway, TransportError};
use hashgraph_client::network::retry::Backoff;
use hashgraph_client::network::rpc::{
    CryptoTransfer, QueryResponse, RawReceipt, RawRecord, RemoteMethod, TransactionResponse,
};
use hashgraph_client::network::status::ResponseCode;
use hashgraph_client::signing::SignedTransaction;
use hashgraph_client::{Client, Context, Signatory};

pub const PAYER: Address = Address::new(0, 0, 2);
pub const NODE_A: Address = Address::new(0, 0, 3);
pub const NODE_B: Address = Address::new(0, 0, 4);

/// One scripted answer.
#[derive(Debug, Clone)]
pub enum Step {
    /// Answer with this precheck (and, for receipts, no receipt body).
    Precheck(ResponseCode),
    /// Answer a receipt query with a receipt carrying this status.
    Receipt(ResponseCode),
    /// Fail at the transport layer.
    Transport(TransportError),
    /// Never answer.
    Hang,
    /// Take the transaction into consensus, then never answer.
    AcceptThenHang,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Transaction,
    Receipt,
    Record,
}

/// A logged call.
#[derive(Debug, Clone)]
pub struct Call {
    pub gateway: Address,
    pub kind: CallKind,
    pub method: RemoteMethod,
    pub tx_id: TxId,
    /// Decoded body, for transactions.
    pub body: Option<TransactionBody>,
    pub signatures: usize,
    pub signatures_valid: bool,
}

#[derive(Default)]
struct State {
    submissions: VecDeque<Step>,
    receipts: VecDeque<Step>,
    records: VecDeque<Step>,
    unavailable: HashSet<Address>,
    final_status: Option<ResponseCode>,
    total_supply: u64,
    schedule: Option<Address>,
    duplicates: Vec<RawReceipt>,
    accepted: Vec<SignedTransaction>,
    calls: Vec<Call>,
}

/// The in-memory network. Clones share state.
#[derive(Clone, Default)]
pub struct TestNetwork {
    state: Arc<Mutex<State>>,
}

impl TestNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_submissions(&self, steps: impl IntoIterator<Item = Step>) {
        self.state.lock().submissions.extend(steps);
    }

    pub fn script_receipts(&self, steps: impl IntoIterator<Item = Step>) {
        self.state.lock().receipts.extend(steps);
    }

    pub fn script_records(&self, steps: impl IntoIterator<Item = Step>) {
        self.state.lock().records.extend(steps);
    }

    /// Makes `node` refuse connections-level traffic.
    pub fn take_down(&self, node: Address) {
        self.state.lock().unavailable.insert(node);
    }

    /// Status the network reaches for every transaction.
    pub fn set_final_status(&self, status: ResponseCode) {
        self.state.lock().final_status = Some(status);
    }

    pub fn set_total_supply(&self, supply: u64) {
        self.state.lock().total_supply = supply;
    }

    /// Answers every receipt as if the transaction created `schedule`.
    pub fn set_schedule(&self, schedule: Address) {
        self.state.lock().schedule = Some(schedule);
    }

    pub fn add_duplicate(&self, status: ResponseCode) {
        self.state.lock().duplicates.push(RawReceipt::with_status(status));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn calls_of(&self, kind: CallKind) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.kind == kind).collect()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    fn final_receipt(state: &State, tx_id: TxId) -> RawReceipt {
        let mut receipt = RawReceipt::with_status(state.final_status.unwrap_or(ResponseCode::Success));
        receipt.new_total_supply = state.total_supply;
        if let Some(schedule) = state.schedule {
            receipt.schedule = Some(schedule);
            receipt.scheduled_tx_id = Some(tx_id.as_scheduled());
        }
        receipt
    }

    fn record_for(state: &State, tx_id: TxId) -> RawRecord {
        let hash = state
            .accepted
            .iter()
            .rev()
            .find(|signed| signed.body().map(|b| b.tx_id == tx_id).unwrap_or(false))
            .and_then(|signed| signed.hash().ok())
            .map(|hash| hash.to_vec())
            .unwrap_or_default();
        let consensus = ConsensusTimeStamp::new(tx_id.valid_start.seconds() + 1, tx_id.valid_start.nanos())
            .unwrap_or(tx_id.valid_start);
        RawRecord {
            receipt: Self::final_receipt(state, tx_id),
            tx_id,
            transaction_hash: hash,
            consensus_timestamp: consensus,
            memo: String::new(),
            fee: 1_000,
            transfers: vec![
                CryptoTransfer { account: tx_id.payer, amount: -1_000 },
                CryptoTransfer { account: Address::new(0, 0, 98), amount: 1_000 },
            ],
            token_transfers: vec![],
            schedule: None,
        }
    }
}

impl ChannelFactory for TestNetwork {
    fn connect(&self, gateway: &Gateway) -> Result<Arc<dyn Channel>, TransportError> {
        Ok(Arc::new(TestChannel {
            node: gateway.node,
            network: self.clone(),
        }))
    }
}

struct TestChannel {
    node: Address,
    network: TestNetwork,
}

async fn hang<T>() -> T {
    std::future::pending().await
}

#[async_trait]
impl Channel for TestChannel {
    async fn submit_transaction(
        &self,
        method: RemoteMethod,
        transaction: &SignedTransaction,
    ) -> Result<TransactionResponse, TransportError> {
        let step = {
            let mut state = self.network.state.lock();
            let body = transaction.body().ok();
            state.calls.push(Call {
                gateway: self.node,
                kind: CallKind::Transaction,
                method,
                tx_id: body.as_ref().map(|b| b.tx_id).unwrap_or_else(|| TxId::new(Address::NONE, ConsensusTimeStamp::EPOCH)),
                signatures: transaction.signatures.len(),
                signatures_valid: transaction.verify_signatures(),
                body,
            });
            let tx_id = state.calls.last().map(|call| call.tx_id);
            let seen = state
                .accepted
                .iter()
                .any(|accepted| accepted.body().ok().map(|b| b.tx_id) == tx_id);
            if state.unavailable.contains(&self.node) {
                Step::Transport(TransportError::Unavailable(format!("{} is down", self.node)))
            } else if let Some(step) = state.submissions.pop_front() {
                step
            } else if seen {
                Step::Precheck(ResponseCode::DuplicateTransaction)
            } else {
                Step::Precheck(ResponseCode::Ok)
            }
        };
        match step {
            Step::Precheck(code) | Step::Receipt(code) => {
                if code == ResponseCode::Ok {
                    self.network.state.lock().accepted.push(transaction.clone());
                }
                Ok(TransactionResponse::new(code))
            }
            Step::Transport(err) => Err(err),
            Step::Hang => hang().await,
            Step::AcceptThenHang => {
                self.network.state.lock().accepted.push(transaction.clone());
                hang().await
            }
        }
    }

    async fn submit_query(
        &self,
        method: RemoteMethod,
        query: &QueryData,
    ) -> Result<QueryResponse, TransportError> {
        let (step, response) = {
            let mut state = self.network.state.lock();
            let kind = match query {
                QueryData::Receipt(_) => CallKind::Receipt,
                QueryData::Record(_) => CallKind::Record,
            };
            state.calls.push(Call {
                gateway: self.node,
                kind,
                method,
                tx_id: query.tx_id(),
                body: None,
                signatures: 0,
                signatures_valid: true,
            });
            let step = if state.unavailable.contains(&self.node) {
                Some(Step::Transport(TransportError::Unavailable(format!("{} is down", self.node))))
            } else {
                match query {
                    QueryData::Receipt(_) => state.receipts.pop_front(),
                    QueryData::Record(_) => state.records.pop_front(),
                }
            };
            let response = match query {
                QueryData::Receipt(q) => QueryResponse::Receipt {
                    precheck: ResponseCode::Ok,
                    receipt: Some(TestNetwork::final_receipt(&state, q.tx_id)),
                    duplicates: if q.include_duplicates { state.duplicates.clone() } else { vec![] },
                    children: vec![],
                },
                QueryData::Record(q) => QueryResponse::Record {
                    precheck: ResponseCode::Ok,
                    record: Some(TestNetwork::record_for(&state, q.tx_id)),
                    duplicates: vec![],
                    children: vec![],
                },
            };
            (step, response)
        };

        match (step, response) {
            (None, response) => Ok(response),
            (Some(Step::Transport(err)), _) => Err(err),
            (Some(Step::Hang | Step::AcceptThenHang), _) => hang().await,
            (Some(Step::Precheck(code)), QueryResponse::Receipt { .. }) => Ok(QueryResponse::Receipt {
                precheck: code,
                receipt: None,
                duplicates: vec![],
                children: vec![],
            }),
            (Some(Step::Precheck(code)), QueryResponse::Record { .. }) => Ok(QueryResponse::Record {
                precheck: code,
                record: None,
                duplicates: vec![],
                children: vec![],
            }),
            (Some(Step::Receipt(status)), QueryResponse::Receipt { duplicates, children, .. }) => {
                Ok(QueryResponse::Receipt {
                    precheck: ResponseCode::Ok,
                    receipt: Some(RawReceipt::with_status(status)),
                    duplicates,
                    children,
                })
            }
            (Some(Step::Receipt(status)), QueryResponse::Record { record, .. }) => {
                let record = record.map(|mut r| {
                    r.receipt.status = status;
                    r
                });
                Ok(QueryResponse::Record {
                    precheck: ResponseCode::Ok,
                    record,
                    duplicates: vec![],
                    children: vec![],
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn key(seed: u8) -> PrivateKey {
    PrivateKey::from_bytes(&[seed; 32])
}

/// Two gateways, payer 0.0.2, default signatory `key(1)`, fast timings.
pub fn test_context(ctx: &mut Context) {
    ctx.gateways = vec![
        Gateway::new(NODE_A, "node-a:50211"),
        Gateway::new(NODE_B, "node-b:50211"),
    ];
    ctx.payer = Some(PAYER);
    ctx.signatory = Some(Signatory::from(key(1)));
    ctx.backoff = Backoff::fixed(Duration::from_millis(100));
    ctx.receipt_poll_interval = Duration::from_millis(50);
    ctx.dispatch_timeout = Duration::from_secs(2);
    ctx.deadline = Duration::from_secs(30);
}

pub fn client(network: &TestNetwork) -> Client {
    Client::new(Arc::new(network.clone()), test_context)
}
