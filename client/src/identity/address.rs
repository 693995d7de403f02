//! Network entity addressing.
//!
//! Accounts, files, tokens and schedules are all named by the same
//! `shard.realm.num` triple. The kind of entity is implied by where the
//! address is used, never by the address itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when parsing an [`Address`] from text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("malformed address `{0}`: expected shard.realm.num")]
    Malformed(String),
}

/// The `shard.realm.num` identifier of a network entity.
///
/// Serializes as its `shard.realm.num` string, so addresses can key JSON
/// maps.
///
/// # Examples
///
/// ```
/// use hashgraph_client::identity::Address;
///
/// let treasury: Address = "0.0.2".parse().unwrap();
/// assert_eq!(treasury, Address::new(0, 0, 2));
/// assert!(!treasury.is_none());
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Address {
    /// Shard number.
    pub shard: u64,
    /// Realm number within the shard.
    pub realm: u64,
    /// Entity number within the realm.
    pub num: u64,
}

impl Address {
    /// The all-zero address, used on the wire to mean "not set".
    pub const NONE: Address = Address::new(0, 0, 0);

    /// Creates an address from its three components.
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }

    /// Returns `true` for [`Address::NONE`].
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || AddressError::Malformed(s.to_string());
        let mut parts = s.trim().split('.');
        let mut next = || -> Result<u64, AddressError> {
            parts
                .next()
                .ok_or_else(malformed)?
                .parse::<u64>()
                .map_err(|_| malformed())
        };
        let address = Address::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(malformed());
        }
        Ok(address)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}
