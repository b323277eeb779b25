use near_sdk::json_types::U128;
use near_sdk::store::{IterableMap, IterableSet, LookupMap};
use near_sdk::{
    env, log, near, AccountId, BorshStorageKey, Gas, PanicOnDefault, Promise, PromiseOrValue,
};

pub mod constants;
mod errors;
mod fees;
mod guards;

mod events;
mod external;

mod access;
mod auction;
mod currency;
mod escrow;
mod proxy;
mod storage;
mod views;


pub use access::PlatformConfig;
pub use auction::{Auction, AuctionStatus, AuctionTerms, AuctionView, BidMsg};
pub use constants::*;
pub use currency::{Currency, IncomingFunds};
pub use errors::AuctionError;
pub use escrow::{AssetEscrow, AssetRef, EscrowRecord, ReleaseState};
pub use events::AuctionEvent;
pub use proxy::{DispatcherStatus, Implementation, ProxyState, UpgradeCall};
pub use storage::StorageBalance;

// Storage layout is append-only: new variants go at the end, existing ones never move.
#[near]
#[derive(BorshStorageKey)]
pub enum StorageKey {
    Auctions,
    Escrow,
    Credits,
    StorageBalances,
    ApprovedNftContracts,
}

#[near(
    contract_state,
    contract_metadata(
        version = "0.3.0",
        link = "https://github.com/OnSocial-Labs/onsocial-protocol",
        standard(standard = "nep297", version = "1.0.0"),
    )
)]
#[derive(PanicOnDefault)]
pub struct Contract {
    pub version: String,
    pub config: PlatformConfig,
    pub auctions: IterableMap<u64, Auction>,
    // Never decremented; ids stay unique across upgrades.
    pub next_auction_id: u64,
    pub(crate) escrow: AssetEscrow,
    // Added in 0.2.0. Pull-later balances for pushes that failed, keyed by `Currency::ledger_key`.
    pub(crate) credits: LookupMap<String, u128>,
    // Added in 0.3.0. Prepaid storage per seller; listings draw on it.
    pub(crate) storage_balances: LookupMap<AccountId, StorageBalance>,
    // Added in 0.3.0. Registries whose `nft_on_transfer` calls may open auctions.
    pub(crate) approved_nft_contracts: IterableSet<AccountId>,
}
