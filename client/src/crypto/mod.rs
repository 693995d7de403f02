//! # Cryptographic Primitives
//!
//! Ed25519 keys for signing transaction bodies and SHA-384 for transaction
//! hashes. Everything here is a thin wrapper over audited crates.

pub mod hash;
pub mod keys;

pub use hash::{sha384, TRANSACTION_HASH_LENGTH};
pub use keys::{KeyError, PrivateKey, PublicKey, Signature};
