//! File call sites.

use super::{require_address, Client};
use crate::context::Context;
use crate::envelope::{FileDeleteBody, SystemDeleteBody, SystemUndeleteBody};
use crate::error::ClientError;
use crate::identity::{Address, ConsensusTimeStamp};
use crate::result::{TransactionReceipt, TransactionRecord};
use crate::signing::Signatory;

impl Client {
    /// Deletes `file`. The file's endorsement must sign.
    pub async fn delete_file(
        &self,
        file: Address,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<TransactionReceipt, ClientError> {
        let body = FileDeleteBody {
            file: require_address("file_to_delete", file)?,
        };
        self.execute_transaction(body, signatory, configure).await
    }

    pub async fn delete_file_with_record(
        &self,
        file: Address,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<TransactionRecord, ClientError> {
        let body = FileDeleteBody {
            file: require_address("file_to_delete", file)?,
        };
        self.execute_transaction(body, signatory, configure).await
    }

    /// Removes `file` by administrative privilege. It can be restored with
    /// [`system_restore_file`](Self::system_restore_file) until
    /// `expiration`.
    pub async fn system_delete_file(
        &self,
        file: Address,
        expiration: Option<ConsensusTimeStamp>,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<TransactionReceipt, ClientError> {
        let body = SystemDeleteBody {
            file: require_address("file_to_delete", file)?,
            expiration,
        };
        self.execute_transaction(body, signatory, configure).await
    }

    pub async fn system_delete_file_with_record(
        &self,
        file: Address,
        expiration: Option<ConsensusTimeStamp>,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<TransactionRecord, ClientError> {
        let body = SystemDeleteBody {
            file: require_address("file_to_delete", file)?,
            expiration,
        };
        self.execute_transaction(body, signatory, configure).await
    }

    /// Restores a file removed by administrative delete.
    pub async fn system_restore_file(
        &self,
        file: Address,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<TransactionReceipt, ClientError> {
        let body = SystemUndeleteBody {
            file: require_address("file_to_restore", file)?,
        };
        self.execute_transaction(body, signatory, configure).await
    }

    pub async fn system_restore_file_with_record(
        &self,
        file: Address,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<TransactionRecord, ClientError> {
        let body = SystemUndeleteBody {
            file: require_address("file_to_restore", file)?,
        };
        self.execute_transaction(body, signatory, configure).await
    }
}
