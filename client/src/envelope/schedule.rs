//! Schedule kinds.
//!
//! A schedule-create carries another transaction that the network holds
//! until enough signatures have been collected, then executes under a
//! scheduled transaction id.

use serde::{Deserialize, Serialize};

use super::{not_schedulable, NetworkTransaction, SchedulableTransactionData, TransactionData};
use crate::error::ClientError;
use crate::identity::Address;
use crate::network::rpc::RemoteMethod;
use crate::signing::{Endorsement, PendingParams};

/// Creates a schedule holding `scheduled`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleCreateBody {
    pub scheduled: SchedulableTransactionData,
    pub memo: String,
    /// Key allowed to delete the schedule before it executes.
    pub administrator: Option<Endorsement>,
    /// Account paying for the scheduled execution. Defaults to the payer
    /// of the schedule-create.
    pub payer: Option<Address>,
}

impl ScheduleCreateBody {
    /// Wraps `scheduled` using a pending signatory's parameters.
    pub fn from_pending(scheduled: SchedulableTransactionData, pending: &PendingParams) -> Self {
        Self {
            scheduled,
            memo: pending.memo.clone().unwrap_or_default(),
            administrator: pending.administrator.clone(),
            payer: pending.payer,
        }
    }
}

impl NetworkTransaction for ScheduleCreateBody {
    fn into_transaction_data(self) -> TransactionData {
        TransactionData::ScheduleCreate(self)
    }

    fn into_schedulable_data(self) -> Result<SchedulableTransactionData, ClientError> {
        Err(not_schedulable(
            "Creating a schedule is not a schedulable transaction.",
        ))
    }

    fn remote_method(&self) -> RemoteMethod {
        RemoteMethod::CreateSchedule
    }

    fn failure_message(&self) -> &'static str {
        "Unable to schedule transaction, status: {status}"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::FileDeleteBody;

    #[test]
    fn pending_params_fill_the_schedule() {
        let pending = PendingParams {
            memo: Some("quarterly cleanup".into()),
            administrator: None,
            payer: Some(Address::new(0, 0, 77)),
        };
        let inner = SchedulableTransactionData::FileDelete(FileDeleteBody {
            file: Address::new(0, 0, 111),
        });
        let body = ScheduleCreateBody::from_pending(inner.clone(), &pending);
        assert_eq!(body.scheduled, inner);
        assert_eq!(body.memo, "quarterly cleanup");
        assert_eq!(body.payer, Some(Address::new(0, 0, 77)));
        assert_eq!(body.remote_method(), RemoteMethod::CreateSchedule);
    }

    #[test]
    fn schedules_do_not_nest() {
        let body = ScheduleCreateBody::from_pending(
            SchedulableTransactionData::FileDelete(FileDeleteBody {
                file: Address::new(0, 0, 1),
            }),
            &PendingParams::default(),
        );
        assert!(matches!(
            body.into_schedulable_data(),
            Err(ClientError::NotSchedulable(_))
        ));
    }
}
