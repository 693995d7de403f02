//! # Network Status Codes
//!
//! Status codes returned by gateway nodes in precheck responses and by the
//! network in receipts. The set is open-ended on the network side; codes
//! this client does not know about decode as [`ResponseCode::Unrecognized`]
//! and classify as terminal.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! response_codes {
    ($( $(#[$meta:meta])* $variant:ident => $name:literal, )+) => {
        /// A precheck or receipt status code.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum ResponseCode {
            $( $(#[$meta])* $variant, )+
            /// A code introduced by the network after this client was built.
            #[serde(other)]
            Unrecognized,
        }

        impl ResponseCode {
            /// Every known code, in declaration order.
            pub const ALL: &'static [ResponseCode] = &[$(ResponseCode::$variant,)+];

            /// The wire name of the code, e.g. `"INVALID_SIGNATURE"`.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( ResponseCode::$variant => $name, )+
                    ResponseCode::Unrecognized => "UNRECOGNIZED",
                }
            }
        }
    };
}

response_codes! {
    /// Precheck passed; the node forwarded the transaction.
    Ok => "OK",
    /// The transaction reached consensus and executed.
    Success => "SUCCESS",
    /// The node is overloaded; try again shortly.
    Busy => "BUSY",
    /// The node's platform is starting up or catching up.
    PlatformNotActive => "PLATFORM_NOT_ACTIVE",
    /// The node accepted the request but could not hand it to the platform.
    PlatformTransactionNotCreated => "PLATFORM_TRANSACTION_NOT_CREATED",
    /// Consensus has not been reached yet.
    Unknown => "UNKNOWN",
    /// The receipt is not (yet) available.
    ReceiptNotFound => "RECEIPT_NOT_FOUND",
    /// The record is not (yet) available.
    RecordNotFound => "RECORD_NOT_FOUND",
    InvalidSignature => "INVALID_SIGNATURE",
    InsufficientPayerBalance => "INSUFFICIENT_PAYER_BALANCE",
    InsufficientTxFee => "INSUFFICIENT_TX_FEE",
    InvalidTransaction => "INVALID_TRANSACTION",
    InvalidTransactionStart => "INVALID_TRANSACTION_START",
    InvalidTransactionDuration => "INVALID_TRANSACTION_DURATION",
    TransactionExpired => "TRANSACTION_EXPIRED",
    DuplicateTransaction => "DUPLICATE_TRANSACTION",
    InvalidNodeAccount => "INVALID_NODE_ACCOUNT",
    InvalidPayerAccountId => "INVALID_PAYER_ACCOUNT_ID",
    MemoTooLong => "MEMO_TOO_LONG",
    InvalidAccountId => "INVALID_ACCOUNT_ID",
    AccountDeleted => "ACCOUNT_DELETED",
    TransferAccountSameAsDeleteAccount => "TRANSFER_ACCOUNT_SAME_AS_DELETE_ACCOUNT",
    InvalidFileId => "INVALID_FILE_ID",
    FileDeleted => "FILE_DELETED",
    EntityNotAllowedToDelete => "ENTITY_NOT_ALLOWED_TO_DELETE",
    InvalidTokenId => "INVALID_TOKEN_ID",
    TokenWasDeleted => "TOKEN_WAS_DELETED",
    InvalidTokenMintAmount => "INVALID_TOKEN_MINT_AMOUNT",
    TokenHasNoSupplyKey => "TOKEN_HAS_NO_SUPPLY_KEY",
    TokenHasNoFreezeKey => "TOKEN_HAS_NO_FREEZE_KEY",
    TokenHasNoFeeScheduleKey => "TOKEN_HAS_NO_FEE_SCHEDULE_KEY",
    TokenNotAssociatedToAccount => "TOKEN_NOT_ASSOCIATED_TO_ACCOUNT",
    InvalidScheduleId => "INVALID_SCHEDULE_ID",
    ScheduledTransactionNotInWhitelist => "SCHEDULED_TRANSACTION_NOT_IN_WHITELIST",
    InvalidFreezeTransactionBody => "INVALID_FREEZE_TRANSACTION_BODY",
    FreezeUpdateFileDoesNotExist => "FREEZE_UPDATE_FILE_DOES_NOT_EXIST",
    AuthorizationFailed => "AUTHORIZATION_FAILED",
    NotSupported => "NOT_SUPPORTED",
}

impl ResponseCode {
    /// `true` for the two codes that mean "accepted": `OK` and `SUCCESS`.
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseCode::Ok | ResponseCode::Success)
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_wire_name() {
        for code in ResponseCode::ALL {
            let json = serde_json::to_string(code).unwrap();
            assert_eq!(json, format!("\"{code}\""));
        }
    }

    #[test]
    fn unknown_wire_names_decode_as_unrecognized() {
        let code: ResponseCode = serde_json::from_str("\"SOME_FUTURE_CODE\"").unwrap();
        assert_eq!(code, ResponseCode::Unrecognized);
    }

    #[test]
    fn success_codes() {
        assert!(ResponseCode::Ok.is_success());
        assert!(ResponseCode::Success.is_success());
        assert!(!ResponseCode::Busy.is_success());
    }
}
