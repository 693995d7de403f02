//! Token call sites.

use super::{require_address, Client};
use crate::config::MIN_MINT_AMOUNT;
use crate::context::Context;
use crate::envelope::{
    Royalty, TokenFeeScheduleUpdateBody, TokenFreezeBody, TokenMintBody, TokenUnfreezeBody,
};
use crate::error::ClientError;
use crate::identity::Address;
use crate::result::{Projection, TokenReceipt, TokenRecord, TransactionReceipt, TransactionRecord};
use crate::signing::Signatory;

impl Client {
    /// Mints `amount` coins into the token's treasury. The token's supply
    /// key must sign. The receipt reports the new circulation.
    pub async fn mint_token(
        &self,
        token: Address,
        amount: u64,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<TokenReceipt, ClientError> {
        self.mint_token_as(token, amount, signatory, configure).await
    }

    pub async fn mint_token_with_record(
        &self,
        token: Address,
        amount: u64,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<TokenRecord, ClientError> {
        self.mint_token_as(token, amount, signatory, configure).await
    }

    async fn mint_token_as<R: Projection>(
        &self,
        token: Address,
        amount: u64,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<R, ClientError> {
        let token = require_address("token", token)?;
        if amount < MIN_MINT_AMOUNT {
            return Err(ClientError::invalid_input(
                "amount",
                "must be greater than zero",
            ));
        }
        self.execute_transaction(TokenMintBody { token, amount }, signatory, configure)
            .await
    }

    /// Suspends `account`'s ability to send or receive `token`. The token's
    /// freeze key must sign.
    pub async fn suspend_token(
        &self,
        token: Address,
        account: Address,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<TransactionReceipt, ClientError> {
        self.suspend_token_as(token, account, signatory, configure).await
    }

    pub async fn suspend_token_with_record(
        &self,
        token: Address,
        account: Address,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<TransactionRecord, ClientError> {
        self.suspend_token_as(token, account, signatory, configure).await
    }

    async fn suspend_token_as<R: Projection>(
        &self,
        token: Address,
        account: Address,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<R, ClientError> {
        let body = TokenFreezeBody {
            token: require_address("token", token)?,
            account: require_address("address", account)?,
        };
        self.execute_transaction(body, signatory, configure).await
    }

    /// Lifts a suspension placed by [`suspend_token`](Self::suspend_token).
    pub async fn resume_token(
        &self,
        token: Address,
        account: Address,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<TransactionReceipt, ClientError> {
        self.resume_token_as(token, account, signatory, configure).await
    }

    pub async fn resume_token_with_record(
        &self,
        token: Address,
        account: Address,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<TransactionRecord, ClientError> {
        self.resume_token_as(token, account, signatory, configure).await
    }

    async fn resume_token_as<R: Projection>(
        &self,
        token: Address,
        account: Address,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<R, ClientError> {
        let body = TokenUnfreezeBody {
            token: require_address("token", token)?,
            account: require_address("address", account)?,
        };
        self.execute_transaction(body, signatory, configure).await
    }

    /// Replaces the token's royalty schedule; an empty list removes every
    /// royalty. The token's fee-schedule key must sign. Cannot be
    /// scheduled.
    pub async fn update_royalties(
        &self,
        token: Address,
        royalties: Vec<Royalty>,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<TransactionReceipt, ClientError> {
        self.update_royalties_as(token, royalties, signatory, configure)
            .await
    }

    pub async fn update_royalties_with_record(
        &self,
        token: Address,
        royalties: Vec<Royalty>,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<TransactionRecord, ClientError> {
        self.update_royalties_as(token, royalties, signatory, configure)
            .await
    }

    async fn update_royalties_as<R: Projection>(
        &self,
        token: Address,
        royalties: Vec<Royalty>,
        signatory: Option<&Signatory>,
        configure: impl FnOnce(&mut Context),
    ) -> Result<R, ClientError> {
        let token = require_address("token", token)?;
        royalties.iter().try_for_each(validate_royalty)?;
        let body = TokenFeeScheduleUpdateBody { token, royalties };
        self.execute_transaction(body, signatory, configure).await
    }
}

fn validate_royalty(royalty: &Royalty) -> Result<(), ClientError> {
    require_address("royalty collector", royalty.collector())?;
    match royalty {
        Royalty::Fixed { amount: 0, .. } => Err(ClientError::invalid_input(
            "royalties",
            "a fixed royalty must charge a positive amount",
        )),
        Royalty::Fractional { denominator: 0, .. } => Err(ClientError::invalid_input(
            "royalties",
            "a fractional royalty cannot have a zero denominator",
        )),
        Royalty::Fractional {
            numerator,
            denominator,
            ..
        } if numerator > denominator => Err(ClientError::invalid_input(
            "royalties",
            "a fractional royalty cannot exceed the whole transfer",
        )),
        Royalty::Fractional {
            minimum, maximum, ..
        } if *maximum != 0 && minimum > maximum => Err(ClientError::invalid_input(
            "royalties",
            "a fractional royalty's minimum exceeds its maximum",
        )),
        _ => Ok(()),
    }
}
