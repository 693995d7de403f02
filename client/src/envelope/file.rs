//! File kinds: regular delete plus the administrative delete and restore
//! that only privileged accounts may sign.

use serde::{Deserialize, Serialize};

use super::{NetworkTransaction, SchedulableTransactionData, TransactionData};
use crate::error::ClientError;
use crate::identity::{Address, ConsensusTimeStamp};
use crate::network::rpc::RemoteMethod;

/// Deletes a file. Requires the file's own endorsement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDeleteBody {
    pub file: Address,
}

/// Administrative delete. The file stays restorable until `expiration`
/// (or the file's own expiry when absent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemDeleteBody {
    pub file: Address,
    pub expiration: Option<ConsensusTimeStamp>,
}

/// Administrative restore of a file removed by [`SystemDeleteBody`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemUndeleteBody {
    pub file: Address,
}

impl NetworkTransaction for FileDeleteBody {
    fn into_transaction_data(self) -> TransactionData {
        TransactionData::FileDelete(self)
    }

    fn into_schedulable_data(self) -> Result<SchedulableTransactionData, ClientError> {
        Ok(SchedulableTransactionData::FileDelete(self))
    }

    fn remote_method(&self) -> RemoteMethod {
        RemoteMethod::DeleteFile
    }

    fn failure_message(&self) -> &'static str {
        "Unable to delete file, status: {status}"
    }
}

impl NetworkTransaction for SystemDeleteBody {
    fn into_transaction_data(self) -> TransactionData {
        TransactionData::SystemDelete(self)
    }

    fn into_schedulable_data(self) -> Result<SchedulableTransactionData, ClientError> {
        Ok(SchedulableTransactionData::SystemDelete(self))
    }

    fn remote_method(&self) -> RemoteMethod {
        RemoteMethod::SystemDelete
    }

    fn failure_message(&self) -> &'static str {
        "Unable to delete file, status: {status}"
    }
}

impl NetworkTransaction for SystemUndeleteBody {
    fn into_transaction_data(self) -> TransactionData {
        TransactionData::SystemUndelete(self)
    }

    fn into_schedulable_data(self) -> Result<SchedulableTransactionData, ClientError> {
        Ok(SchedulableTransactionData::SystemUndelete(self))
    }

    fn remote_method(&self) -> RemoteMethod {
        RemoteMethod::SystemUndelete
    }

    fn failure_message(&self) -> &'static str {
        "Unable to restore file, status: {status}"
    }
}
