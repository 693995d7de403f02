//! The invoice handed to external signers.

use bytes::Bytes;

use super::SignatureMap;
use crate::crypto::{PrivateKey, PublicKey, Signature};
use crate::error::ClientError;
use crate::identity::TxId;

/// A transaction awaiting signatures.
///
/// Exposes the canonical body bytes and collects the signatures added to
/// them. Signatures that do not verify against the body are refused, so a
/// misbehaving signer fails the call before anything is sent.
#[derive(Debug)]
pub struct Invoice {
    tx_id: TxId,
    memo: String,
    body_bytes: Bytes,
    signatures: SignatureMap,
}

impl Invoice {
    pub(crate) fn new(tx_id: TxId, memo: impl Into<String>, body_bytes: Bytes) -> Self {
        Self {
            tx_id,
            memo: memo.into(),
            body_bytes,
            signatures: SignatureMap::new(),
        }
    }

    pub fn tx_id(&self) -> TxId {
        self.tx_id
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    /// The bytes to sign.
    pub fn body_bytes(&self) -> &[u8] {
        &self.body_bytes
    }

    /// Adds a signature made by `public_key`. A second signature from the
    /// same key is ignored.
    pub fn add_signature(
        &mut self,
        public_key: PublicKey,
        signature: Signature,
    ) -> Result<(), ClientError> {
        if !public_key.verify(&self.body_bytes, &signature) {
            return Err(ClientError::Signing(format!(
                "signature from {public_key} does not match transaction {}",
                self.tx_id
            )));
        }
        self.signatures.insert(public_key, signature);
        Ok(())
    }

    /// Signs with an in-process key.
    pub fn sign_with(&mut self, key: &PrivateKey) {
        let signature = key.sign(&self.body_bytes);
        self.signatures.insert(key.public_key(), signature);
    }

    pub(crate) fn into_signatures(self) -> SignatureMap {
        self.signatures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{Address, ConsensusTimeStamp};

    fn invoice() -> Invoice {
        let tx_id = TxId::new(Address::new(0, 0, 2), ConsensusTimeStamp::new(1, 0).unwrap());
        Invoice::new(tx_id, "", Bytes::from_static(b"body"))
    }

    #[test]
    fn rejects_signature_over_other_bytes() {
        let key = PrivateKey::generate();
        let mut invoice = invoice();
        let err = invoice
            .add_signature(key.public_key(), key.sign(b"not the body"))
            .unwrap_err();
        assert!(matches!(err, ClientError::Signing(_)));
        assert!(invoice.into_signatures().is_empty());
    }

    #[test]
    fn accepts_valid_signature_once() {
        let key = PrivateKey::generate();
        let mut invoice = invoice();
        invoice.add_signature(key.public_key(), key.sign(b"body")).unwrap();
        invoice.sign_with(&key);
        assert_eq!(invoice.into_signatures().len(), 1);
    }
}
