//! Network administration kinds: freezing the network and staging
//! software upgrades.
//!
//! These commands act on the whole network at once, so the network will not
//! accept them inside a schedule.

use serde::{Deserialize, Serialize};

use super::{not_schedulable, NetworkTransaction, SchedulableTransactionData, TransactionData};
use crate::error::ClientError;
use crate::identity::{Address, ConsensusTimeStamp};
use crate::network::rpc::RemoteMethod;

/// What a [`FreezeBody`] asks the network to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FreezeType {
    /// Stop processing transactions at `start`.
    FreezeOnly,
    /// Stage the upgrade package in `update_file` on every node.
    PrepareUpgrade,
    /// Stop at `start` and apply the staged upgrade.
    FreezeUpgrade,
    /// Cancel a pending freeze or upgrade.
    FreezeAbort,
    /// Apply a telemetry upgrade at `start` without stopping the network.
    TelemetryUpgrade,
}

/// A freeze or upgrade command.
///
/// Built through the constructors, which enforce the fields each
/// [`FreezeType`] needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreezeBody {
    freeze_type: FreezeType,
    start: Option<ConsensusTimeStamp>,
    update_file: Option<Address>,
    file_hash: Vec<u8>,
}

impl FreezeBody {
    /// Suspends the network at `consensus_time`.
    pub fn suspend(consensus_time: ConsensusTimeStamp) -> Self {
        Self::at(FreezeType::FreezeOnly, consensus_time)
    }

    /// Stages an upgrade package on every node.
    pub fn prepare_upgrade(file: Address, file_hash: &[u8]) -> Result<Self, ClientError> {
        let (file, file_hash) = require_upgrade_file(file, file_hash)?;
        Ok(Self {
            freeze_type: FreezeType::PrepareUpgrade,
            start: None,
            update_file: Some(file),
            file_hash,
        })
    }

    /// Freezes at `consensus_time` and applies the staged upgrade.
    pub fn schedule_upgrade(consensus_time: ConsensusTimeStamp) -> Self {
        Self::at(FreezeType::FreezeUpgrade, consensus_time)
    }

    /// Cancels any pending freeze or upgrade.
    pub fn abort() -> Self {
        Self {
            freeze_type: FreezeType::FreezeAbort,
            start: None,
            update_file: None,
            file_hash: Vec::new(),
        }
    }

    /// Applies a telemetry upgrade from `file` at `consensus_time`.
    pub fn telemetry_upgrade(
        file: Address,
        file_hash: &[u8],
        consensus_time: ConsensusTimeStamp,
    ) -> Result<Self, ClientError> {
        let (file, file_hash) = require_upgrade_file(file, file_hash)?;
        Ok(Self {
            freeze_type: FreezeType::TelemetryUpgrade,
            start: Some(consensus_time),
            update_file: Some(file),
            file_hash,
        })
    }

    fn at(freeze_type: FreezeType, consensus_time: ConsensusTimeStamp) -> Self {
        Self {
            freeze_type,
            start: Some(consensus_time),
            update_file: None,
            file_hash: Vec::new(),
        }
    }

    pub fn freeze_type(&self) -> FreezeType {
        self.freeze_type
    }

    pub fn start(&self) -> Option<ConsensusTimeStamp> {
        self.start
    }

    pub fn update_file(&self) -> Option<Address> {
        self.update_file
    }

    pub fn file_hash(&self) -> &[u8] {
        &self.file_hash
    }
}

fn require_upgrade_file(file: Address, file_hash: &[u8]) -> Result<(Address, Vec<u8>), ClientError> {
    if file.is_none() {
        return Err(ClientError::invalid_input(
            "file",
            "The upgrade file's File Address ID is missing.",
        ));
    }
    if file_hash.is_empty() {
        return Err(ClientError::invalid_input(
            "file_hash",
            "The hash of the file contents must be included.",
        ));
    }
    Ok((file, file_hash.to_vec()))
}

impl NetworkTransaction for FreezeBody {
    fn into_transaction_data(self) -> TransactionData {
        TransactionData::Freeze(self)
    }

    fn into_schedulable_data(self) -> Result<SchedulableTransactionData, ClientError> {
        Err(not_schedulable(
            "Network freeze and upgrade commands are not schedulable transactions.",
        ))
    }

    fn remote_method(&self) -> RemoteMethod {
        RemoteMethod::Freeze
    }

    fn failure_message(&self) -> &'static str {
        "Failed to submit suspend/freeze command, status: {status}"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_upgrade_requires_file_and_hash() {
        let err = FreezeBody::prepare_upgrade(Address::NONE, b"hash").unwrap_err();
        assert!(err.to_string().contains("File Address ID is missing"));

        let err = FreezeBody::prepare_upgrade(Address::new(0, 0, 150), &[]).unwrap_err();
        assert!(err.to_string().contains("must be included"));

        let body = FreezeBody::prepare_upgrade(Address::new(0, 0, 150), b"hash").unwrap();
        assert_eq!(body.freeze_type(), FreezeType::PrepareUpgrade);
        assert_eq!(body.update_file(), Some(Address::new(0, 0, 150)));
        assert_eq!(body.file_hash(), b"hash");
        assert_eq!(body.start(), None);
    }

    #[test]
    fn constructors_set_the_freeze_type() {
        let at = ConsensusTimeStamp::new(1_700_000_000, 0).unwrap();
        assert_eq!(FreezeBody::suspend(at).freeze_type(), FreezeType::FreezeOnly);
        assert_eq!(FreezeBody::schedule_upgrade(at).start(), Some(at));
        assert_eq!(FreezeBody::abort().freeze_type(), FreezeType::FreezeAbort);
        let telemetry = FreezeBody::telemetry_upgrade(Address::new(0, 0, 159), b"h", at).unwrap();
        assert_eq!(telemetry.freeze_type(), FreezeType::TelemetryUpgrade);
    }

    #[test]
    fn freeze_commands_are_never_schedulable() {
        let err = FreezeBody::abort().into_schedulable_data().unwrap_err();
        assert!(matches!(err, ClientError::NotSchedulable(_)));
    }
}
