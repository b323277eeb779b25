use crate::{AssetRef, Currency};
use near_sdk::json_types::{Base58CryptoHash, U128};
use near_sdk::{near, AccountId};

#[near(event_json(standard = "nep297"))]
pub enum AuctionEvent {
    #[event_version("1.0.0")]
    ContractInitialized {
        admin: AccountId,
        fee_recipient: AccountId,
        fee_percentage_bps: u16,
    },
    #[event_version("1.0.0")]
    FeeRecipientUpdated {
        admin: AccountId,
        old_recipient: AccountId,
        new_recipient: AccountId,
    },
    #[event_version("1.0.0")]
    FeePercentageUpdated {
        admin: AccountId,
        old_bps: u16,
        new_bps: u16,
    },
    #[event_version("1.0.0")]
    AdminTransferred {
        old_admin: AccountId,
        new_admin: AccountId,
    },
    #[event_version("1.0.0")]
    ApprovedNftContractAdded {
        admin: AccountId,
        nft_contract_id: AccountId,
    },
    #[event_version("1.0.0")]
    ApprovedNftContractRemoved {
        admin: AccountId,
        nft_contract_id: AccountId,
    },
    #[event_version("1.0.0")]
    AuctionCreated {
        auction_id: u64,
        seller: AccountId,
        asset: AssetRef,
        currency: Currency,
        start_price: U128,
        min_increment_bps: u16,
        start_time: u64,
        end_time: u64,
    },
    #[event_version("1.0.0")]
    BidPlaced {
        auction_id: u64,
        bidder: AccountId,
        amount: U128,
        previous_bidder: Option<AccountId>,
        previous_bid: U128,
    },
    #[event_version("1.0.0")]
    AuctionEnded {
        auction_id: u64,
        winner: Option<AccountId>,
        winning_bid: U128,
        fee: U128,
        seller_proceeds: U128,
    },
    #[event_version("1.0.0")]
    AuctionCancelled { auction_id: u64, seller: AccountId },
    #[event_version("1.0.0")]
    TransferCompleted {
        recipient: AccountId,
        currency: Currency,
        amount: U128,
        auction_id: Option<u64>,
    },
    #[event_version("1.0.0")]
    RefundCredited {
        account_id: AccountId,
        currency: Currency,
        amount: U128,
        auction_id: Option<u64>,
    },
    #[event_version("1.0.0")]
    CreditWithdrawn {
        account_id: AccountId,
        currency: Currency,
        amount: U128,
    },
    #[event_version("1.0.0")]
    AssetReleased {
        asset: AssetRef,
        receiver: AccountId,
        auction_id: u64,
    },
    #[event_version("1.0.0")]
    AssetReleaseFailed {
        asset: AssetRef,
        receiver: AccountId,
        auction_id: u64,
    },
    #[event_version("1.0.0")]
    ContractUpgraded {
        old_version: String,
        new_version: String,
        code_hash: Option<Base58CryptoHash>,
    },
    #[event_version("1.0.0")]
    UpgradeFailed { current_version: String },
    #[event_version("1.0.0")]
    StateMigrated {
        old_version: String,
        new_version: String,
    },
    #[event_version("1.0.0")]
    StorageDeposit {
        account_id: AccountId,
        amount: U128,
        new_balance: U128,
    },
    #[event_version("1.0.0")]
    StorageWithdraw {
        account_id: AccountId,
        amount: U128,
        new_balance: U128,
    },
}
