//! Signatories: where signatures come from.
//!
//! A [`Signatory`] is either key material held in process, a callback to an
//! external signer (custody service, hardware wallet), a list of either, or
//! a request to route the transaction through a schedule instead of
//! executing it directly.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use super::{Endorsement, Invoice};
use crate::crypto::PrivateKey;
use crate::error::ClientError;
use crate::identity::Address;

/// An external signer.
///
/// The callback receives the [`Invoice`] for the transaction being signed
/// and adds one signature per key it controls. It may suspend for as long
/// as the external party takes; the call's deadline and cancellation still
/// apply around it.
#[async_trait]
pub trait SigningCallback: Send + Sync {
    async fn sign(&self, invoice: &mut Invoice) -> Result<(), ClientError>;
}

/// Parameters for wrapping a transaction in a schedule-create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingParams {
    /// Memo attached to the schedule entity.
    pub memo: Option<String>,
    /// Key allowed to delete the schedule.
    pub administrator: Option<Endorsement>,
    /// Account paying for the scheduled execution.
    pub payer: Option<Address>,
}

/// A source of signatures.
#[derive(Clone)]
pub enum Signatory {
    Ed25519(PrivateKey),
    Callback(Arc<dyn SigningCallback>),
    List(Vec<Signatory>),
    /// Not a signer. Marks the transaction for scheduling.
    Pending(PendingParams),
}

impl Signatory {
    /// Wraps an external signer.
    pub fn callback(callback: impl SigningCallback + 'static) -> Self {
        Self::Callback(Arc::new(callback))
    }

    /// Combines several signatories.
    pub fn list(signatories: impl IntoIterator<Item = Signatory>) -> Self {
        Self::List(signatories.into_iter().collect())
    }

    /// Requests scheduling with `params`.
    pub fn pending(params: PendingParams) -> Self {
        Self::Pending(params)
    }
}

impl From<PrivateKey> for Signatory {
    fn from(key: PrivateKey) -> Self {
        Self::Ed25519(key)
    }
}

impl From<Vec<Signatory>> for Signatory {
    fn from(list: Vec<Signatory>) -> Self {
        Self::List(list)
    }
}

impl fmt::Debug for Signatory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519(key) => write!(f, "Signatory::Ed25519({})", key.public_key()),
            Self::Callback(callback) => {
                write!(f, "Signatory::Callback({:p})", Arc::as_ptr(callback) as *const ())
            }
            Self::List(list) => f.debug_tuple("Signatory::List").field(list).finish(),
            Self::Pending(params) => f.debug_tuple("Signatory::Pending").field(params).finish(),
        }
    }
}
