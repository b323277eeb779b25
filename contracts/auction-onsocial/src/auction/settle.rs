use crate::fees::split_proceeds;
use crate::guards::check_one_yocto;
use crate::*;

#[near]
impl Contract {
    /// Permissionless settlement once the auction has expired.
    #[handle_result]
    pub fn end_auction(
        &mut self,
        auction_id: u64,
        asset_contract: AccountId,
    ) -> Result<(), AuctionError> {
        let now = env::block_timestamp();
        let auction = self.auction_mut(auction_id)?;
        if auction.asset.contract_id != asset_contract {
            return Err(AuctionError::AssetMismatch);
        }
        if auction.status != AuctionStatus::Active {
            return Err(AuctionError::AuctionNotActive(auction_id));
        }
        if auction.pending_transfers > 0 {
            return Err(AuctionError::AuctionLocked(auction_id));
        }
        if now < auction.end_time() {
            return Err(AuctionError::AuctionNotExpired {
                auction_id,
                end_time: auction.end_time(),
            });
        }

        // Status flips before any promise is created.
        auction.status = AuctionStatus::Ended;
        let auction = auction.clone();

        let winner = auction
            .highest_bidder
            .clone()
            .filter(|_| auction.highest_bid.0 > 0);
        let Some(winner) = winner else {
            AuctionEvent::AuctionEnded {
                auction_id,
                winner: None,
                winning_bid: U128(0),
                fee: U128(0),
                seller_proceeds: U128(0),
            }
            .emit();
            let _ = self.release_asset(&auction.asset, &auction.seller)?;
            return Ok(());
        };

        let winning_bid = auction.highest_bid.0;
        let (fee, proceeds) = split_proceeds(winning_bid, self.config.fee_percentage_bps);

        AuctionEvent::AuctionEnded {
            auction_id,
            winner: Some(winner.clone()),
            winning_bid: U128(winning_bid),
            fee: U128(fee),
            seller_proceeds: U128(proceeds),
        }
        .emit();

        let _ = self.release_asset(&auction.asset, &winner)?;
        if fee > 0 {
            let fee_recipient = self.config.fee_recipient.clone();
            let _ = self.push(&auction.currency, &fee_recipient, fee, Some(auction_id));
        }
        if proceeds > 0 {
            let _ = self.push(&auction.currency, &auction.seller, proceeds, Some(auction_id));
        }
        Ok(())
    }

    /// Seller withdraws an auction nobody has bid on; the asset goes back to the seller.
    #[payable]
    #[handle_result]
    pub fn cancel_auction(&mut self, auction_id: u64) -> Result<(), AuctionError> {
        check_one_yocto()?;
        let caller = env::predecessor_account_id();
        let auction = self.auction_mut(auction_id)?;
        if auction.seller != caller {
            return Err(AuctionError::only_seller());
        }
        if auction.status != AuctionStatus::Active {
            return Err(AuctionError::AuctionNotActive(auction_id));
        }
        if auction.highest_bid.0 > 0 {
            return Err(AuctionError::AuctionHasBids(auction_id));
        }

        auction.status = AuctionStatus::Cancelled;
        let asset = auction.asset.clone();

        AuctionEvent::AuctionCancelled {
            auction_id,
            seller: caller.clone(),
        }
        .emit();

        let _ = self.release_asset(&asset, &caller)?;
        Ok(())
    }
}
