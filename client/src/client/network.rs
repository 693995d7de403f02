//! Network administration call sites. These need the privileged
//! administrative accounts' signatures and return receipts only.

use super::Client;
use crate::context::Context;
use crate::envelope::FreezeBody;
use crate::error::ClientError;
use crate::identity::{Address, ConsensusTimeStamp};
use crate::result::TransactionReceipt;
use crate::signing::Signatory;

impl Client {
    /// Stops the network from processing transactions at `consensus_time`.
    pub async fn suspend_network(
        &self,
        consensus_time: ConsensusTimeStamp,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<TransactionReceipt, ClientError> {
        self.execute_transaction(FreezeBody::suspend(consensus_time), signatory, configure)
            .await
    }

    /// Stages the upgrade package stored in `file` on every node.
    /// `file_hash` is the SHA-384 of the file's contents.
    pub async fn prepare_network_upgrade(
        &self,
        file: Address,
        file_hash: &[u8],
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<TransactionReceipt, ClientError> {
        let body = FreezeBody::prepare_upgrade(file, file_hash)?;
        self.execute_transaction(body, signatory, configure).await
    }

    /// Freezes the network at `consensus_time` and applies the staged
    /// upgrade.
    pub async fn schedule_network_upgrade(
        &self,
        consensus_time: ConsensusTimeStamp,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<TransactionReceipt, ClientError> {
        let body = FreezeBody::schedule_upgrade(consensus_time);
        self.execute_transaction(body, signatory, configure).await
    }

    /// Cancels a pending suspension or upgrade.
    pub async fn abort_network_upgrade(
        &self,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<TransactionReceipt, ClientError> {
        self.execute_transaction(FreezeBody::abort(), signatory, configure)
            .await
    }

    /// Applies the telemetry upgrade in `file` at `consensus_time` without
    /// stopping the network.
    pub async fn schedule_telemetry_upgrade(
        &self,
        file: Address,
        file_hash: &[u8],
        consensus_time: ConsensusTimeStamp,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<TransactionReceipt, ClientError> {
        let body = FreezeBody::telemetry_upgrade(file, file_hash, consensus_time)?;
        self.execute_transaction(body, signatory, configure).await
    }
}
