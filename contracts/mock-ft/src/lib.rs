//! Minimal NEP-141 Mock FT for Integration Testing
//!
//! Implements only what the auction sandbox tests touch:
//! - ft_transfer_call (bids paid in tokens)
//! - ft_transfer (refunds, fee and proceeds payouts, credit withdrawals)
//! - ft_balance_of (view balance)
//! - storage_deposit (acknowledged, not tracked)

use near_sdk::json_types::U128;
use near_sdk::store::LookupMap;
use near_sdk::{env, near, AccountId, Gas, NearToken, PanicOnDefault, Promise, PromiseOrValue};

const MAX_RESOLVE_RESULT_LEN: usize = 128;

#[near(contract_state)]
#[derive(PanicOnDefault)]
pub struct MockFT {
    balances: LookupMap<AccountId, u128>,
    total_supply: u128,
    decimals: u8,
    /// Test helper: if set, the next ft_transfer will fail
    fail_next_transfer: bool,
}

#[near(serializers = [json])]
pub struct FtMetadata {
    pub spec: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

#[near(serializers = [json])]
pub struct StorageBalance {
    pub total: U128,
    pub available: U128,
}

#[near]
impl MockFT {
    #[init]
    pub fn new(owner_id: AccountId, total_supply: U128, decimals: u8) -> Self {
        let mut balances = LookupMap::new(b"b");
        balances.insert(owner_id, total_supply.0);
        Self {
            balances,
            total_supply: total_supply.0,
            decimals,
            fail_next_transfer: false,
        }
    }

    // =========================================================================
    // NEP-141 Core
    // =========================================================================

    #[payable]
    pub fn ft_transfer(&mut self, receiver_id: AccountId, amount: U128, memo: Option<String>) {
        assert_eq!(
            env::attached_deposit(),
            NearToken::from_yoctonear(1),
            "Requires 1 yoctoNEAR"
        );

        if self.fail_next_transfer {
            self.fail_next_transfer = false;
            env::panic_str("MockFT: Simulated transfer failure");
        }

        let sender_id = env::predecessor_account_id();
        self.internal_transfer(&sender_id, &receiver_id, amount.0, memo);
    }

    #[payable]
    pub fn ft_transfer_call(
        &mut self,
        receiver_id: AccountId,
        amount: U128,
        memo: Option<String>,
        msg: String,
    ) -> PromiseOrValue<U128> {
        assert_eq!(
            env::attached_deposit(),
            NearToken::from_yoctonear(1),
            "Requires 1 yoctoNEAR"
        );
        let sender_id = env::predecessor_account_id();
        self.internal_transfer(&sender_id, &receiver_id, amount.0, memo);

        Promise::new(receiver_id.clone())
            .function_call(
                "ft_on_transfer".to_string(),
                near_sdk::serde_json::json!({
                    "sender_id": sender_id,
                    "amount": amount,
                    "msg": msg
                })
                .to_string()
                .into_bytes(),
                NearToken::from_near(0),
                Gas::from_tgas(80),
            )
            .then(
                Self::ext(env::current_account_id())
                    .with_static_gas(Gas::from_tgas(10))
                    .ft_resolve_transfer(sender_id, receiver_id, amount),
            )
            .into()
    }

    pub fn ft_balance_of(&self, account_id: AccountId) -> U128 {
        U128(self.balances.get(&account_id).copied().unwrap_or(0))
    }

    pub fn ft_total_supply(&self) -> U128 {
        U128(self.total_supply)
    }

    pub fn ft_metadata(&self) -> FtMetadata {
        FtMetadata {
            spec: "ft-1.0.0".to_string(),
            name: "Mock Bid Token".to_string(),
            symbol: "BID".to_string(),
            decimals: self.decimals,
        }
    }

    // =========================================================================
    // Storage Management (simplified)
    // =========================================================================

    #[payable]
    pub fn storage_deposit(&mut self, _account_id: Option<AccountId>) -> StorageBalance {
        StorageBalance {
            total: U128(env::attached_deposit().as_yoctonear()),
            available: U128(0),
        }
    }

    pub fn storage_balance_of(&self, _account_id: AccountId) -> Option<StorageBalance> {
        Some(StorageBalance {
            total: U128(1_250_000_000_000_000_000_000), // ~0.00125 NEAR
            available: U128(0),
        })
    }

    // =========================================================================
    // Test Helpers (not in real FT)
    // =========================================================================

    /// Mint tokens to account (for testing only)
    pub fn mint(&mut self, account_id: AccountId, amount: U128) {
        let current = self.balances.get(&account_id).copied().unwrap_or(0);
        self.balances.insert(account_id, current + amount.0);
        self.total_supply += amount.0;
    }

    /// Makes the next `ft_transfer` panic, e.g. an outbid refund or a payout.
    pub fn set_fail_next_transfer(&mut self, should_fail: bool) {
        self.fail_next_transfer = should_fail;
    }

    pub fn get_fail_next_transfer(&self) -> bool {
        self.fail_next_transfer
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn internal_transfer(
        &mut self,
        sender_id: &AccountId,
        receiver_id: &AccountId,
        amount: u128,
        _memo: Option<String>,
    ) {
        let sender_balance = self.balances.get(sender_id).copied().unwrap_or(0);
        assert!(sender_balance >= amount, "Insufficient balance");

        self.balances
            .insert(sender_id.clone(), sender_balance - amount);
        let receiver_balance = self.balances.get(receiver_id).copied().unwrap_or(0);
        self.balances
            .insert(receiver_id.clone(), receiver_balance + amount);
    }

    /// A receiver that panicked gets the whole amount refunded to the sender.
    #[private]
    pub fn ft_resolve_transfer(
        &mut self,
        sender_id: AccountId,
        receiver_id: AccountId,
        amount: U128,
    ) -> U128 {
        let unused = match env::promise_result_checked(0, MAX_RESOLVE_RESULT_LEN) {
            Ok(data) => near_sdk::serde_json::from_slice::<U128>(&data)
                .map(|unused| unused.0.min(amount.0))
                .unwrap_or(0),
            Err(_) => amount.0,
        };

        if unused > 0 {
            let receiver_balance = self.balances.get(&receiver_id).copied().unwrap_or(0);
            let refund = unused.min(receiver_balance);
            if refund > 0 {
                self.balances.insert(receiver_id, receiver_balance - refund);
                let sender_balance = self.balances.get(&sender_id).copied().unwrap_or(0);
                self.balances.insert(sender_id, sender_balance + refund);
            }
        }

        U128(amount.0 - unused)
    }
}
