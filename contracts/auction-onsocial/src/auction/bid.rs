use crate::*;

#[near]
impl Contract {
    /// Native-currency bid. `amount` must equal the attached deposit.
    #[payable]
    #[handle_result]
    pub fn place_bid(
        &mut self,
        amount: U128,
        auction_id: u64,
        currency: Currency,
    ) -> Result<(), AuctionError> {
        self.internal_place_bid(
            &env::predecessor_account_id(),
            auction_id,
            amount.0,
            &currency,
            &IncomingFunds::attached(),
        )
    }

    /// NEP-141 receiver: a bid paid with `ft_transfer_call`, `msg` = JSON [`BidMsg`].
    /// A rejected bid panics so the token contract refunds the whole transfer.
    pub fn ft_on_transfer(
        &mut self,
        sender_id: AccountId,
        amount: U128,
        msg: String,
    ) -> PromiseOrValue<U128> {
        let token_id = env::predecessor_account_id();
        let funds = IncomingFunds::FtTransfer {
            token_id: token_id.clone(),
            amount: amount.0,
        };
        let result = near_sdk::serde_json::from_str::<BidMsg>(&msg)
            .map_err(|e| AuctionError::InvalidInput(format!("msg is not a bid: {}", e)))
            .and_then(|bid| {
                self.internal_place_bid(
                    &sender_id,
                    bid.auction_id,
                    amount.0,
                    &Currency::Ft(token_id),
                    &funds,
                )
            });
        if let Err(err) = result {
            env::panic_str(&err.to_string());
        }
        PromiseOrValue::Value(U128(0))
    }
}

impl Contract {
    pub(crate) fn internal_place_bid(
        &mut self,
        bidder: &AccountId,
        auction_id: u64,
        amount: u128,
        currency: &Currency,
        funds: &IncomingFunds,
    ) -> Result<(), AuctionError> {
        let now = env::block_timestamp();
        let auction = self.auction_mut(auction_id)?;
        if !auction.is_open_at(now) {
            return Err(AuctionError::AuctionNotActive(auction_id));
        }
        if auction.pending_transfers > 0 {
            return Err(AuctionError::AuctionLocked(auction_id));
        }
        if currency != &auction.currency {
            return Err(AuctionError::CurrencyMismatch);
        }
        Self::pull(&auction.currency, funds, amount)?;

        let minimum = auction.minimum_bid();
        if amount < minimum {
            return Err(AuctionError::BidTooLow {
                minimum: U128(minimum),
            });
        }

        // Ledger first, refund second.
        let previous_bid = auction.highest_bid;
        let previous_bidder = auction.highest_bidder.replace(bidder.clone());
        auction.highest_bid = U128(amount);
        auction.bid_count += 1;
        let currency = auction.currency.clone();

        AuctionEvent::BidPlaced {
            auction_id,
            bidder: bidder.clone(),
            amount: U128(amount),
            previous_bidder: previous_bidder.clone(),
            previous_bid,
        }
        .emit();

        if let Some(previous_bidder) = previous_bidder {
            if previous_bid.0 > 0 {
                let _ = self.push(&currency, &previous_bidder, previous_bid.0, Some(auction_id));
            }
        }
        Ok(())
    }
}
