//! # Hashing Utilities
//!
//! The network identifies a submitted transaction by the SHA-384 digest of
//! its signed envelope bytes; the same hash comes back in the record.

use sha2::{Digest, Sha384};

/// Length of a transaction hash in bytes.
pub const TRANSACTION_HASH_LENGTH: usize = 48;

/// SHA-384 of `data`.
///
/// # Example
///
/// ```
/// use hashgraph_client::crypto::sha384;
///
/// assert_eq!(sha384(b"envelope").len(), 48);
/// ```
pub fn sha384(data: &[u8]) -> [u8; TRANSACTION_HASH_LENGTH] {
    let mut hasher = Sha384::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vector() {
        // SHA-384("abc"), FIPS 180-2 appendix D.1.
        assert_eq!(
            hex::encode(sha384(b"abc")),
            "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed\
             8086072ba1e7cc2358baeca134c825a7"
        );
    }

    #[test]
    fn different_inputs_differ() {
        assert_ne!(sha384(b"a"), sha384(b"b"));
        assert_eq!(sha384(b""), sha384(b""));
    }
}
