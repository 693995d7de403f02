//! Account call sites.

use super::{require_address, Client};
use crate::context::Context;
use crate::envelope::CryptoDeleteBody;
use crate::error::ClientError;
use crate::identity::Address;
use crate::result::{Projection, TransactionReceipt, TransactionRecord};
use crate::signing::Signatory;

impl Client {
    /// Deletes `address`, transferring its remaining balance to
    /// `transfer_to`. The account's own key must sign, typically via
    /// `signatory`.
    pub async fn delete_account(
        &self,
        address: Address,
        transfer_to: Address,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<TransactionReceipt, ClientError> {
        self.delete_account_as(address, transfer_to, signatory, configure)
            .await
    }

    /// [`delete_account`](Self::delete_account), returning the full record.
    pub async fn delete_account_with_record(
        &self,
        address: Address,
        transfer_to: Address,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<TransactionRecord, ClientError> {
        self.delete_account_as(address, transfer_to, signatory, configure)
            .await
    }

    async fn delete_account_as<R: Projection>(
        &self,
        address: Address,
        transfer_to: Address,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<R, ClientError> {
        let body = CryptoDeleteBody {
            account: require_address("address_to_delete", address)?,
            transfer_to: require_address("transfer_to_address", transfer_to)?,
        };
        self.execute_transaction(body, signatory, configure).await
    }
}
