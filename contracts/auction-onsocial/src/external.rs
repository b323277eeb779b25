use near_sdk::json_types::U128;
use near_sdk::{ext_contract, near, AccountId};

/// Subset of the NEP-171 token view the escrow needs.
#[near(serializers = [json])]
#[derive(Clone)]
pub struct Token {
    pub owner_id: AccountId,
}

#[ext_contract(ext_nft)]
pub trait ExtNonFungibleToken {
    fn nft_transfer(
        &mut self,
        receiver_id: AccountId,
        token_id: String,
        approval_id: Option<u64>,
        memo: Option<String>,
    );

    fn nft_is_approved(
        &self,
        token_id: String,
        approved_account_id: AccountId,
        approval_id: Option<u64>,
    ) -> bool;

    fn nft_token(&self, token_id: String) -> Option<Token>;
}

#[ext_contract(ext_ft)]
pub trait ExtFungibleToken {
    fn ft_transfer(&mut self, receiver_id: AccountId, amount: U128, memo: Option<String>);
}
