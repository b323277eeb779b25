//! English auction registry: creation, bidding, settlement and cancellation.

mod bid;
mod create;
mod settle;

use crate::fees::bps_of;
use crate::*;

#[near(serializers = [borsh, json])]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuctionStatus {
    Active,
    Ended,
    Cancelled,
}

#[near(serializers = [borsh, json])]
#[derive(Clone, Debug, PartialEq)]
pub struct Auction {
    pub seller: AccountId,
    pub asset: AssetRef,
    pub currency: Currency,
    pub start_price: U128,
    pub min_increment_bps: u16,
    pub start_time: u64,
    pub duration: u64,
    pub highest_bidder: Option<AccountId>,
    pub highest_bid: U128,
    pub bid_count: u32,
    pub status: AuctionStatus,
    // Re-entrancy guard: promises for this auction whose callbacks have not run yet.
    pub pending_transfers: u32,
}

impl Auction {
    pub fn end_time(&self) -> u64 {
        self.start_time.saturating_add(self.duration)
    }

    pub fn is_open_at(&self, now: u64) -> bool {
        self.status == AuctionStatus::Active && now >= self.start_time && now < self.end_time()
    }

    /// The first bid is measured against `start_price` alone; later bids must also clear the
    /// increment over the current highest bid, and at least outbid it by 1 when the increment
    /// rounds to zero. Never below 1 so a bid always moves funds.
    pub fn minimum_bid(&self) -> u128 {
        let highest = self.highest_bid.0;
        let minimum = if highest == 0 {
            self.start_price.0
        } else {
            let increment = bps_of(highest, self.min_increment_bps).max(1);
            highest.saturating_add(increment).max(self.start_price.0)
        };
        minimum.max(1)
    }
}

/// Auction terms chosen by the seller. Also the `msg` of `nft_transfer_call`.
#[near(serializers = [json])]
#[derive(Clone, Debug)]
pub struct AuctionTerms {
    pub duration: u64,
    pub start_price: U128,
    pub currency: Currency,
    #[serde(default = "default_min_increment_bps")]
    pub min_increment_bps: u16,
}

fn default_min_increment_bps() -> u16 {
    DEFAULT_MIN_INCREMENT_BPS
}

impl AuctionTerms {
    /// Independent of block time: terms accepted by `create_auction` are still accepted when
    /// custody arrives in a later receipt.
    pub fn validate(&self) -> Result<(), AuctionError> {
        if self.duration == 0 {
            return Err(AuctionError::InvalidInput(
                "duration must be greater than zero".into(),
            ));
        }
        if self.duration > MAX_AUCTION_DURATION {
            return Err(AuctionError::InvalidInput(format!(
                "duration cannot exceed {} ns",
                MAX_AUCTION_DURATION
            )));
        }
        if self.min_increment_bps > BASIS_POINTS {
            return Err(AuctionError::InvalidInput(format!(
                "min_increment_bps cannot exceed {}",
                BASIS_POINTS
            )));
        }
        Ok(())
    }
}

/// `msg` of `ft_transfer_call` for a fungible-token bid.
#[near(serializers = [json])]
#[derive(Clone, Debug)]
pub struct BidMsg {
    pub auction_id: u64,
}

#[near(serializers = [json])]
#[derive(Clone, Debug)]
pub struct AuctionView {
    pub auction_id: u64,
    #[serde(flatten)]
    pub auction: Auction,
    pub end_time: u64,
    pub minimum_bid: U128,
    pub is_open: bool,
}

impl AuctionView {
    pub fn new(auction_id: u64, auction: &Auction, now: u64) -> Self {
        Self {
            auction_id,
            auction: auction.clone(),
            end_time: auction.end_time(),
            minimum_bid: U128(auction.minimum_bid()),
            is_open: auction.is_open_at(now),
        }
    }
}

impl Contract {
    pub(crate) fn auction_mut(&mut self, auction_id: u64) -> Result<&mut Auction, AuctionError> {
        self.auctions
            .get_mut(&auction_id)
            .ok_or(AuctionError::AuctionNotFound(auction_id))
    }

    pub(crate) fn begin_transfer(&mut self, auction_id: u64) {
        if let Some(auction) = self.auctions.get_mut(&auction_id) {
            auction.pending_transfers += 1;
        }
    }

    pub(crate) fn end_transfer(&mut self, auction_id: u64) {
        if let Some(auction) = self.auctions.get_mut(&auction_id) {
            auction.pending_transfers = auction.pending_transfers.saturating_sub(1);
        }
    }

    /// Registers an auction over an asset the contract has just taken custody of. The storage
    /// the new records take is charged to the seller.
    pub(crate) fn open_auction(
        &mut self,
        seller: AccountId,
        asset: AssetRef,
        terms: AuctionTerms,
    ) -> Result<u64, AuctionError> {
        let now = env::block_timestamp();
        terms.validate()?;

        self.flush_listing_state();
        let before = env::storage_usage();

        let auction_id = self.next_auction_id;
        self.escrow.hold(&asset, &seller, auction_id)?;
        self.next_auction_id += 1;

        let auction = Auction {
            seller,
            asset,
            currency: terms.currency,
            start_price: terms.start_price,
            min_increment_bps: terms.min_increment_bps,
            start_time: now,
            duration: terms.duration,
            highest_bidder: None,
            highest_bid: U128(0),
            bid_count: 0,
            status: AuctionStatus::Active,
            pending_transfers: 0,
        };

        AuctionEvent::AuctionCreated {
            auction_id,
            seller: auction.seller.clone(),
            asset: auction.asset.clone(),
            currency: auction.currency.clone(),
            start_price: auction.start_price,
            min_increment_bps: auction.min_increment_bps,
            start_time: auction.start_time,
            end_time: auction.end_time(),
        }
        .emit();

        let seller = auction.seller.clone();
        self.auctions.insert(auction_id, auction);
        self.flush_listing_state();
        let bytes_used = env::storage_usage().saturating_sub(before);
        self.charge_storage(&seller, bytes_used);
        Ok(auction_id)
    }

    /// Writes pending auction and escrow entries so `storage_usage` reflects them.
    pub(crate) fn flush_listing_state(&mut self) {
        self.auctions.flush();
        self.escrow.flush();
    }
}
