//! Token kinds.

use serde::{Deserialize, Serialize};

use super::{not_schedulable, NetworkTransaction, SchedulableTransactionData, TransactionData};
use crate::error::ClientError;
use crate::identity::Address;
use crate::network::rpc::RemoteMethod;

/// Mints `amount` new coins into the token's treasury.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMintBody {
    pub token: Address,
    pub amount: u64,
}

/// Suspends `account`'s ability to transfer `token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenFreezeBody {
    pub token: Address,
    pub account: Address,
}

/// Lifts a suspension placed by [`TokenFreezeBody`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUnfreezeBody {
    pub token: Address,
    pub account: Address,
}

/// A custom fee charged on transfers of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Royalty {
    /// A flat fee per transfer, in hbar (`denomination: None`) or a token.
    Fixed {
        collector: Address,
        amount: u64,
        denomination: Option<Address>,
    },
    /// A share of every transfer, clamped to `minimum..=maximum`.
    Fractional {
        collector: Address,
        numerator: u64,
        denominator: u64,
        minimum: u64,
        maximum: u64,
    },
}

impl Royalty {
    /// Account receiving the fee.
    pub fn collector(&self) -> Address {
        match self {
            Self::Fixed { collector, .. } | Self::Fractional { collector, .. } => *collector,
        }
    }
}

/// Replaces a token's royalty schedule. An empty list clears it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenFeeScheduleUpdateBody {
    pub token: Address,
    pub royalties: Vec<Royalty>,
}

impl NetworkTransaction for TokenMintBody {
    fn into_transaction_data(self) -> TransactionData {
        TransactionData::TokenMint(self)
    }

    fn into_schedulable_data(self) -> Result<SchedulableTransactionData, ClientError> {
        Ok(SchedulableTransactionData::TokenMint(self))
    }

    fn remote_method(&self) -> RemoteMethod {
        RemoteMethod::MintToken
    }

    fn failure_message(&self) -> &'static str {
        "Unable to Mint Token Coins, status: {status}"
    }
}

impl NetworkTransaction for TokenFreezeBody {
    fn into_transaction_data(self) -> TransactionData {
        TransactionData::TokenFreeze(self)
    }

    fn into_schedulable_data(self) -> Result<SchedulableTransactionData, ClientError> {
        Ok(SchedulableTransactionData::TokenFreeze(self))
    }

    fn remote_method(&self) -> RemoteMethod {
        RemoteMethod::FreezeTokenAccount
    }

    fn failure_message(&self) -> &'static str {
        "Unable to Suspend Token, status: {status}"
    }
}

impl NetworkTransaction for TokenUnfreezeBody {
    fn into_transaction_data(self) -> TransactionData {
        TransactionData::TokenUnfreeze(self)
    }

    fn into_schedulable_data(self) -> Result<SchedulableTransactionData, ClientError> {
        Ok(SchedulableTransactionData::TokenUnfreeze(self))
    }

    fn remote_method(&self) -> RemoteMethod {
        RemoteMethod::UnfreezeTokenAccount
    }

    fn failure_message(&self) -> &'static str {
        "Unable to Resume Token, status: {status}"
    }
}

impl NetworkTransaction for TokenFeeScheduleUpdateBody {
    fn into_transaction_data(self) -> TransactionData {
        TransactionData::TokenFeeScheduleUpdate(self)
    }

    fn into_schedulable_data(self) -> Result<SchedulableTransactionData, ClientError> {
        Err(not_schedulable(
            "Updating Token Royalties is not a schedulable transaction.",
        ))
    }

    fn remote_method(&self) -> RemoteMethod {
        RemoteMethod::UpdateTokenFeeSchedule
    }

    fn failure_message(&self) -> &'static str {
        "Unable to Update Royalties, status: {status}"
    }
}
