//! Prepaid storage. Sellers deposit NEAR up front; each listing is charged the bytes it adds
//! and refunded them once the escrowed asset leaves custody.

use crate::guards::check_one_yocto;
use crate::*;
use near_sdk::NearToken;

#[inline]
pub(crate) fn storage_byte_cost() -> u128 {
    env::storage_byte_cost().as_yoctonear()
}

#[near(serializers = [borsh, json])]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StorageBalance {
    /// yoctoNEAR.
    pub balance: u128,
    /// Bytes held by this account's open listings and escrow records.
    pub used_bytes: u64,
}

impl StorageBalance {
    pub fn used_cost(&self) -> u128 {
        (self.used_bytes as u128) * storage_byte_cost()
    }

    pub fn available(&self) -> u128 {
        self.balance.saturating_sub(self.used_cost())
    }
}

#[near]
impl Contract {
    #[payable]
    #[handle_result]
    pub fn storage_deposit(&mut self, account_id: Option<AccountId>) -> Result<(), AuctionError> {
        let account_id = account_id.unwrap_or_else(env::predecessor_account_id);
        let deposit = env::attached_deposit().as_yoctonear();
        if deposit == 0 {
            return Err(AuctionError::InsufficientDeposit(
                "Requires attached deposit of at least 1 yoctoNEAR".into(),
            ));
        }

        let mut storage = self.storage_of(&account_id);
        storage.balance += deposit;
        let new_balance = storage.balance;
        self.storage_balances.insert(account_id.clone(), storage);

        AuctionEvent::StorageDeposit {
            account_id,
            amount: U128(deposit),
            new_balance: U128(new_balance),
        }
        .emit();
        Ok(())
    }

    /// Withdraws everything not backing open listings. Requires exactly 1 yoctoNEAR.
    #[payable]
    #[handle_result]
    pub fn storage_withdraw(&mut self) -> Result<Promise, AuctionError> {
        check_one_yocto()?;
        let account_id = env::predecessor_account_id();
        let storage = self.storage_of(&account_id);

        let available = storage.available();
        if available == 0 {
            return Err(AuctionError::InvalidInput(
                "No storage available to withdraw".into(),
            ));
        }

        let new_balance = storage.used_cost();
        if storage.used_bytes == 0 {
            self.storage_balances.remove(&account_id);
        } else {
            self.storage_balances.insert(
                account_id.clone(),
                StorageBalance {
                    balance: new_balance,
                    ..storage
                },
            );
        }

        AuctionEvent::StorageWithdraw {
            account_id: account_id.clone(),
            amount: U128(available),
            new_balance: U128(new_balance),
        }
        .emit();
        Ok(Promise::new(account_id).transfer(NearToken::from_yoctonear(available)))
    }

    pub fn storage_balance_of(&self, account_id: AccountId) -> U128 {
        U128(
            self.storage_balances
                .get(&account_id)
                .map(|s| s.balance)
                .unwrap_or(0),
        )
    }

    pub fn storage_available(&self, account_id: AccountId) -> U128 {
        U128(
            self.storage_balances
                .get(&account_id)
                .map(StorageBalance::available)
                .unwrap_or(0),
        )
    }

    pub fn get_storage_balance(&self, account_id: AccountId) -> Option<StorageBalance> {
        self.storage_balances.get(&account_id).cloned()
    }
}

impl Contract {
    pub(crate) fn storage_of(&self, account_id: &AccountId) -> StorageBalance {
        self.storage_balances
            .get(account_id)
            .cloned()
            .unwrap_or_default()
    }

    /// A listing may only start when the seller has room for one more auction and escrow record.
    pub(crate) fn check_listing_storage(&self, seller: &AccountId) -> Result<(), AuctionError> {
        let required = (LISTING_STORAGE_BYTES as u128) * storage_byte_cost();
        let available = self.storage_of(seller).available();
        if available < required {
            return Err(AuctionError::InsufficientStorage {
                required: U128(required),
                available: U128(available),
            });
        }
        Ok(())
    }

    // Infallible: custody has already moved when this runs. A withdrawal between the check and
    // the charge can leave the balance short until the next deposit.
    pub(crate) fn charge_storage(&mut self, account_id: &AccountId, bytes: u64) {
        if bytes == 0 {
            return;
        }
        let mut storage = self.storage_of(account_id);
        storage.used_bytes = storage.used_bytes.saturating_add(bytes);
        self.storage_balances.insert(account_id.clone(), storage);
    }

    pub(crate) fn release_storage(&mut self, account_id: &AccountId, bytes: u64) {
        if bytes == 0 {
            return;
        }
        if let Some(storage) = self.storage_balances.get_mut(account_id) {
            storage.used_bytes = storage.used_bytes.saturating_sub(bytes);
        }
    }
}
