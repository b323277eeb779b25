use crate::*;
use near_sdk::borsh::{BorshDeserialize, BorshSerialize};

/// A storage layout written by an earlier release.
///
/// Layouts only ever grow at the end, so each legacy layout knows how to become the current
/// `Contract` by filling the appended fields.
pub(crate) trait LegacyState: BorshDeserialize {
    /// Newest release that wrote this layout.
    const LAST_VERSION: &'static str;

    fn version(&self) -> &str;

    fn into_current(self) -> Contract;
}

/// 0.1.x: no credit ledger.
#[derive(BorshSerialize, BorshDeserialize)]
#[borsh(crate = "near_sdk::borsh")]
pub struct StateV010 {
    pub version: String,
    pub config: PlatformConfig,
    pub auctions: IterableMap<u64, Auction>,
    pub next_auction_id: u64,
    pub escrow: AssetEscrow,
}

impl LegacyState for StateV010 {
    const LAST_VERSION: &'static str = "0.1.0";

    fn version(&self) -> &str {
        &self.version
    }

    fn into_current(self) -> Contract {
        Contract {
            version: env!("CARGO_PKG_VERSION").to_string(),
            config: self.config,
            auctions: self.auctions,
            next_auction_id: self.next_auction_id,
            escrow: self.escrow,
            credits: LookupMap::new(StorageKey::Credits),
            storage_balances: LookupMap::new(StorageKey::StorageBalances),
            approved_nft_contracts: IterableSet::new(StorageKey::ApprovedNftContracts),
        }
    }
}

/// 0.2.x: credits but no storage balances or approved registries.
#[derive(BorshSerialize, BorshDeserialize)]
#[borsh(crate = "near_sdk::borsh")]
pub struct StateV020 {
    pub version: String,
    pub config: PlatformConfig,
    pub auctions: IterableMap<u64, Auction>,
    pub next_auction_id: u64,
    pub escrow: AssetEscrow,
    pub credits: LookupMap<String, u128>,
}

impl LegacyState for StateV020 {
    const LAST_VERSION: &'static str = "0.2.0";

    fn version(&self) -> &str {
        &self.version
    }

    fn into_current(self) -> Contract {
        Contract {
            version: env!("CARGO_PKG_VERSION").to_string(),
            config: self.config,
            auctions: self.auctions,
            next_auction_id: self.next_auction_id,
            escrow: self.escrow,
            credits: self.credits,
            storage_balances: LookupMap::new(StorageKey::StorageBalances),
            approved_nft_contracts: IterableSet::new(StorageKey::ApprovedNftContracts),
        }
    }
}
