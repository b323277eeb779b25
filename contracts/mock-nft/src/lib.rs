//! Minimal NEP-171 Mock NFT for Integration Testing
//!
//! Implements only what the auction sandbox tests touch:
//! - nft_mint (test helper)
//! - nft_approve / nft_is_approved / nft_revoke (approval management)
//! - nft_transfer (escrow pull and release)
//! - nft_transfer_call (listing by transfer)
//! - nft_token (owner lookup)

use near_sdk::store::LookupMap;
use near_sdk::{env, near, AccountId, Gas, NearToken, PanicOnDefault, Promise, PromiseOrValue};
use std::collections::HashMap;

const MAX_RESOLVE_RESULT_LEN: usize = 16;

#[near(serializers = [borsh])]
pub struct TokenRecord {
    owner_id: AccountId,
    approvals: HashMap<AccountId, u64>,
    next_approval_id: u64,
}

#[near(serializers = [json])]
pub struct JsonToken {
    pub token_id: String,
    pub owner_id: AccountId,
    pub approved_account_ids: HashMap<AccountId, u64>,
}

#[near(contract_state)]
#[derive(PanicOnDefault)]
pub struct MockNFT {
    tokens: LookupMap<String, TokenRecord>,
    /// Test helper: if set, the next nft_transfer will fail
    fail_next_transfer: bool,
}

#[near]
impl MockNFT {
    #[init]
    pub fn new() -> Self {
        Self {
            tokens: LookupMap::new(b"t"),
            fail_next_transfer: false,
        }
    }

    // =========================================================================
    // NEP-171 Core
    // =========================================================================

    #[payable]
    pub fn nft_transfer(
        &mut self,
        receiver_id: AccountId,
        token_id: String,
        approval_id: Option<u64>,
        memo: Option<String>,
    ) {
        assert_eq!(
            env::attached_deposit(),
            NearToken::from_yoctonear(1),
            "Requires 1 yoctoNEAR"
        );

        if self.fail_next_transfer {
            self.fail_next_transfer = false;
            env::panic_str("MockNFT: Simulated transfer failure");
        }

        let sender_id = env::predecessor_account_id();
        self.internal_transfer(&sender_id, &receiver_id, &token_id, approval_id, memo);
    }

    #[payable]
    pub fn nft_transfer_call(
        &mut self,
        receiver_id: AccountId,
        token_id: String,
        approval_id: Option<u64>,
        memo: Option<String>,
        msg: String,
    ) -> PromiseOrValue<bool> {
        assert_eq!(
            env::attached_deposit(),
            NearToken::from_yoctonear(1),
            "Requires 1 yoctoNEAR"
        );
        let sender_id = env::predecessor_account_id();
        let previous_owner_id =
            self.internal_transfer(&sender_id, &receiver_id, &token_id, approval_id, memo);

        Promise::new(receiver_id.clone())
            .function_call(
                "nft_on_transfer".to_string(),
                near_sdk::serde_json::json!({
                    "sender_id": sender_id,
                    "previous_owner_id": previous_owner_id,
                    "token_id": token_id,
                    "msg": msg
                })
                .to_string()
                .into_bytes(),
                NearToken::from_near(0),
                Gas::from_tgas(60),
            )
            .then(
                Self::ext(env::current_account_id())
                    .with_static_gas(Gas::from_tgas(10))
                    .nft_resolve_transfer(previous_owner_id, receiver_id, token_id),
            )
            .into()
    }

    pub fn nft_token(&self, token_id: String) -> Option<JsonToken> {
        self.tokens.get(&token_id).map(|token| JsonToken {
            token_id: token_id.clone(),
            owner_id: token.owner_id.clone(),
            approved_account_ids: token.approvals.clone(),
        })
    }

    // =========================================================================
    // NEP-178 Approvals (no nft_on_approve callback)
    // =========================================================================

    #[payable]
    pub fn nft_approve(&mut self, token_id: String, account_id: AccountId, msg: Option<String>) {
        let _ = msg;
        let token = self
            .tokens
            .get_mut(&token_id)
            .unwrap_or_else(|| env::panic_str("Token not found"));
        assert_eq!(
            token.owner_id,
            env::predecessor_account_id(),
            "Only the owner can approve"
        );
        let approval_id = token.next_approval_id;
        token.next_approval_id += 1;
        token.approvals.insert(account_id, approval_id);
    }

    #[payable]
    pub fn nft_revoke(&mut self, token_id: String, account_id: AccountId) {
        let token = self
            .tokens
            .get_mut(&token_id)
            .unwrap_or_else(|| env::panic_str("Token not found"));
        assert_eq!(
            token.owner_id,
            env::predecessor_account_id(),
            "Only the owner can revoke"
        );
        token.approvals.remove(&account_id);
    }

    pub fn nft_is_approved(
        &self,
        token_id: String,
        approved_account_id: AccountId,
        approval_id: Option<u64>,
    ) -> bool {
        let Some(token) = self.tokens.get(&token_id) else {
            return false;
        };
        match (token.approvals.get(&approved_account_id), approval_id) {
            (Some(actual), Some(expected)) => *actual == expected,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    // =========================================================================
    // Test Helpers (not in real NFT)
    // =========================================================================

    /// Mint a token to `receiver_id` (for testing only)
    pub fn nft_mint(&mut self, token_id: String, receiver_id: AccountId) {
        assert!(
            !self.tokens.contains_key(&token_id),
            "Token already exists"
        );
        self.tokens.insert(
            token_id,
            TokenRecord {
                owner_id: receiver_id,
                approvals: HashMap::new(),
                next_approval_id: 0,
            },
        );
    }

    /// Makes the next `nft_transfer` panic, e.g. an escrow release.
    pub fn set_fail_next_transfer(&mut self, should_fail: bool) {
        self.fail_next_transfer = should_fail;
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Moves the token and clears its approvals. Returns the previous owner.
    fn internal_transfer(
        &mut self,
        sender_id: &AccountId,
        receiver_id: &AccountId,
        token_id: &str,
        approval_id: Option<u64>,
        _memo: Option<String>,
    ) -> AccountId {
        let token = self
            .tokens
            .get_mut(token_id)
            .unwrap_or_else(|| env::panic_str("Token not found"));

        if &token.owner_id != sender_id {
            let approved = match (token.approvals.get(sender_id), approval_id) {
                (Some(actual), Some(expected)) => *actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            };
            assert!(approved, "Sender is not approved");
        }
        assert_ne!(
            &token.owner_id, receiver_id,
            "Receiver is already the owner"
        );

        let previous_owner_id = std::mem::replace(&mut token.owner_id, receiver_id.clone());
        token.approvals.clear();
        previous_owner_id
    }

    /// Returns the token when the receiver asked for it back or panicked.
    /// Resolves to `true` when the token stayed with the receiver.
    #[private]
    pub fn nft_resolve_transfer(
        &mut self,
        previous_owner_id: AccountId,
        receiver_id: AccountId,
        token_id: String,
    ) -> bool {
        let give_back = match env::promise_result_checked(0, MAX_RESOLVE_RESULT_LEN) {
            Ok(data) => near_sdk::serde_json::from_slice::<bool>(&data).unwrap_or(true),
            Err(_) => true,
        };
        if !give_back {
            return true;
        }

        if let Some(token) = self.tokens.get_mut(&token_id) {
            if token.owner_id == receiver_id {
                token.owner_id = previous_owner_id;
                token.approvals.clear();
            }
        }
        false
    }
}
