//! Account kinds.

use serde::{Deserialize, Serialize};

use super::{NetworkTransaction, SchedulableTransactionData, TransactionData};
use crate::error::ClientError;
use crate::identity::Address;
use crate::network::rpc::RemoteMethod;

/// Deletes an account, sweeping its remaining balance to `transfer_to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoDeleteBody {
    pub account: Address,
    pub transfer_to: Address,
}

impl NetworkTransaction for CryptoDeleteBody {
    fn into_transaction_data(self) -> TransactionData {
        TransactionData::CryptoDelete(self)
    }

    fn into_schedulable_data(self) -> Result<SchedulableTransactionData, ClientError> {
        Ok(SchedulableTransactionData::CryptoDelete(self))
    }

    fn remote_method(&self) -> RemoteMethod {
        RemoteMethod::CryptoDelete
    }

    fn failure_message(&self) -> &'static str {
        "Unable to delete account, status: {status}"
    }
}
