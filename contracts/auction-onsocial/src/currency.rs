//! Payment in native NEAR or a NEP-141 token.
//!
//! Incoming funds are validated by [`Contract::pull`]. Outgoing funds always go through
//! [`Contract::push`], which chains `on_transfer_resolved` so a rejected transfer lands in the
//! pull-later credit ledger instead of being lost or blocking the caller.

use crate::external::ext_ft;
use crate::guards::{check_one_yocto, single_promise_succeeded};
use crate::*;
use near_sdk::NearToken;

/// `Native` is the sentinel for the chain's base asset.
#[near(serializers = [borsh, json])]
#[derive(Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    Native,
    Ft(AccountId),
}

impl Currency {
    pub fn is_native(&self) -> bool {
        matches!(self, Currency::Native)
    }

    pub(crate) fn ledger_key(&self, account_id: &AccountId) -> String {
        match self {
            Currency::Native => format!("{}{}native", account_id, DELIMITER),
            Currency::Ft(token_id) => {
                format!("{}{}ft{}{}", account_id, DELIMITER, DELIMITER, token_id)
            }
        }
    }
}

/// What actually arrived with the current call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IncomingFunds {
    Deposit(u128),
    FtTransfer { token_id: AccountId, amount: u128 },
}

impl IncomingFunds {
    pub fn attached() -> Self {
        IncomingFunds::Deposit(env::attached_deposit().as_yoctonear())
    }
}

impl Contract {
    /// Validates that `funds` deliver exactly `amount` of `currency` into the contract.
    ///
    /// NEP-141 tokens are pulled by the bidder's `ft_transfer_call`; by the time this runs the
    /// token contract has already moved them, and a failed transfer never reaches us.
    pub(crate) fn pull(
        currency: &Currency,
        funds: &IncomingFunds,
        amount: u128,
    ) -> Result<(), AuctionError> {
        let received = match (currency, funds) {
            (Currency::Native, IncomingFunds::Deposit(attached)) => *attached,
            (Currency::Ft(expected), IncomingFunds::FtTransfer { token_id, amount }) => {
                if expected != token_id {
                    return Err(AuctionError::CurrencyMismatch);
                }
                *amount
            }
            _ => return Err(AuctionError::CurrencyMismatch),
        };
        if received != amount {
            return Err(AuctionError::AmountMismatch {
                expected: U128(amount),
                attached: U128(received),
            });
        }
        Ok(())
    }

    /// Sends `amount` to `to`. When `auction_id` is set the transfer counts as outstanding for
    /// that auction until its callback runs.
    pub(crate) fn push(
        &mut self,
        currency: &Currency,
        to: &AccountId,
        amount: u128,
        auction_id: Option<u64>,
    ) -> Promise {
        if let Some(auction_id) = auction_id {
            self.begin_transfer(auction_id);
        }
        let transfer = match currency {
            Currency::Native => Promise::new(to.clone()).transfer(NearToken::from_yoctonear(amount)),
            Currency::Ft(token_id) => ext_ft::ext(token_id.clone())
                .with_attached_deposit(ONE_YOCTO)
                .with_static_gas(Gas::from_tgas(GAS_FT_TRANSFER_TGAS))
                .ft_transfer(to.clone(), U128(amount), None),
        };
        transfer.then(
            Self::ext(env::current_account_id())
                .with_static_gas(Gas::from_tgas(GAS_CALLBACK_TGAS))
                .on_transfer_resolved(to.clone(), currency.clone(), U128(amount), auction_id),
        )
    }

    pub(crate) fn resolve_transfer(
        &mut self,
        recipient: &AccountId,
        currency: &Currency,
        amount: u128,
        auction_id: Option<u64>,
        succeeded: bool,
    ) {
        if let Some(auction_id) = auction_id {
            self.end_transfer(auction_id);
        }
        if succeeded {
            AuctionEvent::TransferCompleted {
                recipient: recipient.clone(),
                currency: currency.clone(),
                amount: U128(amount),
                auction_id,
            }
            .emit();
            return;
        }
        log!("Transfer of {} to {} failed, crediting balance", amount, recipient);
        self.credit(recipient, currency, amount);
        AuctionEvent::RefundCredited {
            account_id: recipient.clone(),
            currency: currency.clone(),
            amount: U128(amount),
            auction_id,
        }
        .emit();
    }

    pub(crate) fn credit(&mut self, account_id: &AccountId, currency: &Currency, amount: u128) {
        let key = currency.ledger_key(account_id);
        let balance = self.credits.get(&key).copied().unwrap_or(0);
        self.credits.insert(key, balance.saturating_add(amount));
    }

    pub(crate) fn credit_of(&self, account_id: &AccountId, currency: &Currency) -> u128 {
        self.credits
            .get(&currency.ledger_key(account_id))
            .copied()
            .unwrap_or(0)
    }
}

#[near]
impl Contract {
    #[private]
    pub fn on_transfer_resolved(
        &mut self,
        recipient: AccountId,
        currency: Currency,
        amount: U128,
        auction_id: Option<u64>,
    ) -> bool {
        let succeeded = single_promise_succeeded(64);
        self.resolve_transfer(&recipient, &currency, amount.0, auction_id, succeeded);
        succeeded
    }

    /// Pays out the caller's credited balance in `currency`.
    #[payable]
    #[handle_result]
    pub fn withdraw(&mut self, currency: Currency) -> Result<Promise, AuctionError> {
        check_one_yocto()?;
        let account_id = env::predecessor_account_id();
        let amount = self
            .credits
            .remove(&currency.ledger_key(&account_id))
            .filter(|amount| *amount > 0)
            .ok_or_else(|| AuctionError::InvalidInput("Nothing to withdraw".into()))?;

        AuctionEvent::CreditWithdrawn {
            account_id: account_id.clone(),
            currency: currency.clone(),
            amount: U128(amount),
        }
        .emit();

        Ok(self.push(&currency, &account_id, amount, None))
    }
}
