// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Hashgraph Client: Transaction Execution Engine
//!
//! A client for a hashgraph ledger network. It turns the network's
//! asynchronous confirmation model (a gateway accepts a signed transaction,
//! consensus orders it some time later, a receipt and record become
//! available after that) into one `async` call that returns the receipt or
//! record, or a precise error.
//!
//! ## Architecture
//!
//! - **identity**: addresses, consensus timestamps, transaction ids.
//! - **crypto**: Ed25519 keys and SHA-384 transaction hashes.
//! - **envelope**: one body type per transaction kind, all behind the
//!   four-operation [`NetworkTransaction`](envelope::NetworkTransaction)
//!   trait; receipt and record queries.
//! - **signing**: signatory resolution and de-duplication, signature maps,
//!   endorsements, external signing callbacks.
//! - **network**: status codes, gateway channels, outcome classification,
//!   the retry engine and the consensus resolution loop.
//! - **result**: caller-facing receipts and records.
//! - **context**: per-call configuration, cancellation, call scopes.
//! - **client**: [`Client`] and its domain call sites.
//! - **config**: every default the engine falls back on.
//! - **logging**: optional `tracing` subscriber setup.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hashgraph_client::crypto::PrivateKey;
//! use hashgraph_client::identity::Address;
//! use hashgraph_client::network::channel::{ChannelFactory, Gateway};
//! use hashgraph_client::Client;
//!
//! # async fn run(factory: Arc<dyn ChannelFactory>, key: PrivateKey) -> Result<(), hashgraph_client::ClientError> {
//! let client = Client::new(factory, |ctx| {
//!     ctx.gateways = vec![Gateway::new(Address::new(0, 0, 3), "35.237.200.180:50211")];
//!     ctx.payer = Some(Address::new(0, 0, 2));
//!     ctx.signatory = Some(key.into());
//! });
//!
//! let receipt = client
//!     .mint_token(Address::new(0, 0, 5005), 1_000, None, |_| {})
//!     .await?;
//! println!("{} now in circulation", receipt.circulation);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod context;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod identity;
pub mod logging;
pub mod network;
pub mod result;
pub mod signing;

pub use client::Client;
pub use context::{CancelHandle, Cancellation, Context};
pub use error::{ClientError, TimeoutCause};
pub use identity::{Address, ConsensusTimeStamp, TxId};
pub use result::{TokenReceipt, TokenRecord, TransactionReceipt, TransactionRecord};
pub use signing::Signatory;
