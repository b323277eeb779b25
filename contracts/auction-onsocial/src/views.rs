use crate::*;

#[near]
impl Contract {
    pub fn get_version(&self) -> &str {
        &self.version
    }

    pub fn get_auction(&self, auction_id: u64) -> Option<AuctionView> {
        self.auctions
            .get(&auction_id)
            .map(|auction| AuctionView::new(auction_id, auction, env::block_timestamp()))
    }

    /// Auctions in id order, starting at `from_index`.
    pub fn get_auctions(&self, from_index: Option<u64>, limit: Option<u64>) -> Vec<AuctionView> {
        let now = env::block_timestamp();
        let start = from_index.unwrap_or(0);
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT);
        (start..self.next_auction_id)
            .filter_map(|auction_id| {
                self.auctions
                    .get(&auction_id)
                    .map(|auction| AuctionView::new(auction_id, auction, now))
            })
            .take(limit as usize)
            .collect()
    }

    pub fn get_auction_count(&self) -> u64 {
        self.auctions.len() as u64
    }

    pub fn get_next_auction_id(&self) -> u64 {
        self.next_auction_id
    }

    /// `None` once the auction no longer accepts bids.
    pub fn minimum_bid(&self, auction_id: u64) -> Option<U128> {
        self.auctions
            .get(&auction_id)
            .filter(|auction| auction.status == AuctionStatus::Active)
            .map(|auction| U128(auction.minimum_bid()))
    }

    pub fn get_credit(&self, account_id: AccountId, currency: Currency) -> U128 {
        U128(self.credit_of(&account_id, &currency))
    }

    pub fn get_escrow(&self, contract_id: AccountId, token_id: String) -> Option<EscrowRecord> {
        let asset = AssetRef {
            contract_id,
            token_id,
        };
        self.escrow.get(&asset).cloned()
    }
}
