//! # Signing Subsystem
//!
//! Resolves who signs a transaction and applies their signatures.
//!
//! The signer set for a call is the union of the context's default
//! signatory and the call's own, flattened and de-duplicated: a key that
//! appears in both signs once. Signing runs over the canonical body bytes
//! and produces a [`SignatureMap`], ordered by first appearance with one
//! entry per public key. In-process keys sign synchronously; callback
//! signers may suspend.

pub mod endorsement;
pub mod invoice;
pub mod signatory;

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::Context;
use crate::crypto::{sha384, PrivateKey, PublicKey, Signature, TRANSACTION_HASH_LENGTH};
use crate::envelope::TransactionBody;
use crate::error::ClientError;
use crate::identity::TxId;

pub use endorsement::Endorsement;
pub use invoice::Invoice;
pub use signatory::{PendingParams, Signatory, SigningCallback};

// ---------------------------------------------------------------------------
// Signature map
// ---------------------------------------------------------------------------

/// One public key and its signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePair {
    pub public_key: PublicKey,
    pub signature: Signature,
}

/// Signatures attached to a transaction, at most one per public key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureMap {
    pairs: Vec<SignaturePair>,
}

impl SignatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a signature. Returns `false`, leaving the map unchanged, if
    /// `public_key` already signed.
    pub fn insert(&mut self, public_key: PublicKey, signature: Signature) -> bool {
        if self.get(&public_key).is_some() {
            return false;
        }
        self.pairs.push(SignaturePair {
            public_key,
            signature,
        });
        true
    }

    pub fn get(&self, public_key: &PublicKey) -> Option<&Signature> {
        self.pairs
            .iter()
            .find(|pair| pair.public_key == *public_key)
            .map(|pair| &pair.signature)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignaturePair> {
        self.pairs.iter()
    }
}

// ---------------------------------------------------------------------------
// Signed transaction
// ---------------------------------------------------------------------------

/// Canonical body bytes plus their signatures: what a gateway receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub body_bytes: Bytes,
    pub signatures: SignatureMap,
}

impl SignedTransaction {
    /// Decodes the signed body.
    pub fn body(&self) -> Result<TransactionBody, ClientError> {
        TransactionBody::from_bytes(&self.body_bytes)
    }

    /// Whether every attached signature verifies against the body.
    pub fn verify_signatures(&self) -> bool {
        self.signatures
            .iter()
            .all(|pair| pair.public_key.verify(&self.body_bytes, &pair.signature))
    }

    /// SHA-384 of the encoded envelope, as reported in records.
    pub fn hash(&self) -> Result<[u8; TRANSACTION_HASH_LENGTH], ClientError> {
        Ok(sha384(&bincode::serialize(self)?))
    }
}

// ---------------------------------------------------------------------------
// Signatory resolution
// ---------------------------------------------------------------------------

#[derive(Clone)]
enum Signer {
    Key(PrivateKey),
    Callback(Arc<dyn SigningCallback>),
}

impl Signer {
    fn same_identity(&self, other: &Signer) -> bool {
        match (self, other) {
            (Signer::Key(a), Signer::Key(b)) => a.public_key() == b.public_key(),
            (Signer::Callback(a), Signer::Callback(b)) => {
                Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
            }
            _ => false,
        }
    }
}

/// The resolved, de-duplicated signers for one call.
#[derive(Clone, Default)]
pub struct SignatorySet {
    signers: Vec<Signer>,
    pending: Option<PendingParams>,
}

impl SignatorySet {
    /// Number of distinct signers.
    pub fn len(&self) -> usize {
        self.signers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }

    /// Public keys of the in-process signers, in signing order.
    pub fn public_keys(&self) -> Vec<PublicKey> {
        self.signers
            .iter()
            .filter_map(|signer| match signer {
                Signer::Key(key) => Some(key.public_key()),
                Signer::Callback(_) => None,
            })
            .collect()
    }

    /// Scheduling parameters, if a pending signatory was present.
    pub fn pending(&self) -> Option<&PendingParams> {
        self.pending.as_ref()
    }

    fn add(&mut self, signatory: &Signatory) {
        let signer = match signatory {
            Signatory::Ed25519(key) => Signer::Key(key.clone()),
            Signatory::Callback(callback) => Signer::Callback(Arc::clone(callback)),
            Signatory::List(list) => {
                list.iter().for_each(|inner| self.add(inner));
                return;
            }
            Signatory::Pending(params) => {
                self.pending = Some(params.clone());
                return;
            }
        };
        if !self.signers.iter().any(|known| known.same_identity(&signer)) {
            self.signers.push(signer);
        }
    }

    /// Collects every signer's signatures over `body_bytes`.
    pub async fn sign(
        &self,
        tx_id: TxId,
        memo: &str,
        body_bytes: Bytes,
    ) -> Result<SignatureMap, ClientError> {
        let mut invoice = Invoice::new(tx_id, memo, body_bytes);
        for signer in &self.signers {
            match signer {
                Signer::Key(key) => invoice.sign_with(key),
                Signer::Callback(callback) => callback.sign(&mut invoice).await?,
            }
        }
        let signatures = invoice.into_signatures();
        if signatures.is_empty() {
            return Err(ClientError::Signing(format!(
                "no signatures were produced for transaction {tx_id}"
            )));
        }
        debug!(tx_id = %tx_id, signatures = signatures.len(), "transaction signed");
        Ok(signatures)
    }
}

/// Unions the context's default signatory with the call's own.
///
/// Context signers come first. Keys are de-duplicated by public key and
/// callbacks by identity. A pending signatory on the call overrides one on
/// the context.
pub fn gather_signatories(ctx: &Context, per_call: Option<&Signatory>) -> SignatorySet {
    let mut set = SignatorySet::default();
    for signatory in ctx.signatory.iter().chain(per_call) {
        set.add(signatory);
    }
    set
}
