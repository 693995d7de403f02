//! # Network Module
//!
//! Everything between a signed transaction and a final receipt.
//!
//! ## Architecture
//!
//! ```text
//! status.rs      precheck and receipt status codes
//! channel.rs     Channel / ChannelFactory ports, gateways, channel pool
//! rpc.rs         remote method names and typed responses
//! retry.rs       outcome classification table and backoff schedule
//! executor.rs    submission and query dispatch with retries
//! consensus.rs   receipt polling and record fetch
//! ```
//!
//! ## Design Decisions
//!
//! - The engine never talks to a transport directly. It asks a
//!   [`ChannelPool`](channel::ChannelPool) for the gateway's shared
//!   [`Channel`](channel::Channel), so tests and alternative transports
//!   plug in through one trait.
//! - Which status codes are transient, still-processing or terminal is
//!   data ([`ClassificationTable`](retry::ClassificationTable)), carried in
//!   the call context and overridable per call.
//! - "Still processing" waits on the poll interval and is bounded only by
//!   the deadline; "transient" spends the attempt budget with backoff.

pub mod channel;
pub mod consensus;
pub mod executor;
pub mod retry;
pub mod rpc;
pub mod status;
