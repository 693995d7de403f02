//! # Identity & Time Model
//!
//! The value types every other module speaks in: entity [`Address`]es,
//! [`ConsensusTimeStamp`]s with their two exact wire forms, and the
//! [`TxId`] that ties a logical transaction together across retries.

pub mod address;
pub mod timestamp;
pub mod tx_id;

pub use address::{Address, AddressError};
pub use timestamp::{ConsensusTimeStamp, TimestampError};
pub use tx_id::{TxId, TxIdClock};
