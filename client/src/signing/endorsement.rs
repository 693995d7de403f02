//! Endorsements: the key structure an entity requires before the network
//! will act on it.

use serde::{Deserialize, Serialize};

use super::SignatureMap;
use crate::crypto::PublicKey;

/// A required key structure.
///
/// # Examples
///
/// ```
/// use hashgraph_client::crypto::PrivateKey;
/// use hashgraph_client::signing::{Endorsement, SignatureMap};
///
/// let alice = PrivateKey::generate();
/// let bob = PrivateKey::generate();
/// let either = Endorsement::Threshold {
///     required: 1,
///     keys: vec![alice.public_key().into(), bob.public_key().into()],
/// };
///
/// let mut signatures = SignatureMap::new();
/// signatures.insert(bob.public_key(), bob.sign(b"body"));
/// assert!(either.is_satisfied_by(&signatures, b"body"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endorsement {
    /// A single Ed25519 key.
    Ed25519(PublicKey),
    /// Every member must be satisfied.
    List(Vec<Endorsement>),
    /// At least `required` members must be satisfied.
    Threshold {
        required: u32,
        keys: Vec<Endorsement>,
    },
}

impl Endorsement {
    /// Whether `signatures` contains valid signatures over `message` that
    /// meet this structure.
    pub fn is_satisfied_by(&self, signatures: &SignatureMap, message: &[u8]) -> bool {
        match self {
            Self::Ed25519(key) => signatures
                .get(key)
                .is_some_and(|signature| key.verify(message, signature)),
            Self::List(members) => members
                .iter()
                .all(|member| member.is_satisfied_by(signatures, message)),
            Self::Threshold { required, keys } => {
                let satisfied = keys
                    .iter()
                    .filter(|member| member.is_satisfied_by(signatures, message))
                    .count();
                satisfied >= *required as usize
            }
        }
    }

    /// Every public key mentioned anywhere in the structure.
    pub fn public_keys(&self) -> Vec<PublicKey> {
        match self {
            Self::Ed25519(key) => vec![*key],
            Self::List(members) | Self::Threshold { keys: members, .. } => {
                members.iter().flat_map(Endorsement::public_keys).collect()
            }
        }
    }
}

impl From<PublicKey> for Endorsement {
    fn from(key: PublicKey) -> Self {
        Self::Ed25519(key)
    }
}
