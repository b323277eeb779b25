use crate::external::{ext_nft, Token};
use crate::guards::{check_at_least_one_yocto, single_promise_succeeded};
use crate::*;

#[near]
impl Contract {
    /// Lists an NEP-171 token the caller owns and has approved to this contract.
    ///
    /// Ownership and approval are checked against the registry, the token is pulled into
    /// escrow, and only then is the auction recorded. The promise resolves to the new id;
    /// if any step fails nothing is recorded.
    #[payable]
    #[handle_result]
    #[allow(clippy::too_many_arguments)]
    pub fn create_auction(
        &mut self,
        duration: u64,
        start_price: U128,
        asset_contract: AccountId,
        asset_id: String,
        currency: Currency,
        min_increment_bps: Option<u16>,
        approval_id: Option<u64>,
    ) -> Result<Promise, AuctionError> {
        check_at_least_one_yocto()?;
        let seller = env::predecessor_account_id();
        let terms = AuctionTerms {
            duration,
            start_price,
            currency,
            min_increment_bps: min_increment_bps.unwrap_or(DEFAULT_MIN_INCREMENT_BPS),
        };
        terms.validate()?;
        self.check_listing_storage(&seller)?;

        let asset = AssetRef::new(asset_contract, asset_id)?;
        if self.escrow.is_held(&asset) {
            return Err(AuctionError::AlreadyEscrowed(asset.key()));
        }

        let view_gas = Gas::from_tgas(GAS_NFT_VIEW_TGAS);
        Ok(ext_nft::ext(asset.contract_id.clone())
            .with_static_gas(view_gas)
            .nft_is_approved(
                asset.token_id.clone(),
                env::current_account_id(),
                approval_id,
            )
            .and(
                ext_nft::ext(asset.contract_id.clone())
                    .with_static_gas(view_gas)
                    .nft_token(asset.token_id.clone()),
            )
            .then(
                Self::ext(env::current_account_id())
                    .with_static_gas(Gas::from_tgas(GAS_ESCROW_CALLBACK_TGAS))
                    .on_asset_verified(seller, asset, terms, approval_id),
            ))
    }

    #[private]
    #[handle_result]
    pub fn on_asset_verified(
        &mut self,
        seller: AccountId,
        asset: AssetRef,
        terms: AuctionTerms,
        approval_id: Option<u64>,
    ) -> Result<Promise, AuctionError> {
        if env::promise_results_count() != 2 {
            return Err(AuctionError::TransferFailed(
                "expected approval and owner results".into(),
            ));
        }
        let approved = env::promise_result_checked(0, 16)
            .ok()
            .and_then(|value| near_sdk::serde_json::from_slice::<bool>(&value).ok())
            .unwrap_or(false);
        let owner = env::promise_result_checked(1, MAX_TOKEN_VIEW_LEN)
            .ok()
            .and_then(|value| near_sdk::serde_json::from_slice::<Option<Token>>(&value).ok())
            .flatten()
            .map(|token| token.owner_id);

        Self::check_custody(&seller, owner.as_ref(), approved)?;
        self.check_listing_storage(&seller)?;
        if self.escrow.is_held(&asset) {
            return Err(AuctionError::AlreadyEscrowed(asset.key()));
        }

        Ok(ext_nft::ext(asset.contract_id.clone())
            .with_attached_deposit(ONE_YOCTO)
            .with_static_gas(Gas::from_tgas(GAS_NFT_TRANSFER_TGAS))
            .nft_transfer(
                env::current_account_id(),
                asset.token_id.clone(),
                approval_id,
                Some("Auction escrow".to_string()),
            )
            .then(
                Self::ext(env::current_account_id())
                    .with_static_gas(Gas::from_tgas(GAS_CALLBACK_TGAS))
                    .on_asset_escrowed(seller, asset, terms),
            ))
    }

    /// Terms were validated before the pull and validation does not read the clock, so once
    /// the token has arrived the only failure left is a missing transfer.
    #[private]
    #[handle_result]
    pub fn on_asset_escrowed(
        &mut self,
        seller: AccountId,
        asset: AssetRef,
        terms: AuctionTerms,
    ) -> Result<u64, AuctionError> {
        if !single_promise_succeeded(64) {
            return Err(AuctionError::TransferFailed(format!(
                "could not pull {} into escrow",
                asset.key()
            )));
        }
        self.open_auction(seller, asset, terms)
    }

    /// NEP-171 receiver: `nft_transfer_call` with `msg` set to JSON [`AuctionTerms`] lists the
    /// token in the same receipt custody arrives. Returns `true` to hand the token back, which
    /// includes a previous owner without enough storage balance.
    ///
    /// `previous_owner_id` is only as trustworthy as the calling registry, so the caller must be
    /// an approved NFT contract.
    pub fn nft_on_transfer(
        &mut self,
        sender_id: AccountId,
        previous_owner_id: AccountId,
        token_id: String,
        msg: String,
    ) -> PromiseOrValue<bool> {
        let asset_contract = env::predecessor_account_id();
        let created = self
            .check_approved_nft_contract(&asset_contract)
            .and_then(|_| {
                near_sdk::serde_json::from_str::<AuctionTerms>(&msg).map_err(|e| {
                    AuctionError::InvalidInput(format!("msg is not auction terms: {}", e))
                })
            })
            .and_then(|terms| {
                let asset = AssetRef::new(asset_contract, token_id)?;
                self.check_listing_storage(&previous_owner_id)?;
                self.open_auction(previous_owner_id, asset, terms)
            });

        match created {
            Ok(auction_id) => {
                log!("Auction {} opened by transfer from {}", auction_id, sender_id);
                PromiseOrValue::Value(false)
            }
            Err(err) => {
                log!("Returning token, auction not created: {}", err);
                PromiseOrValue::Value(true)
            }
        }
    }
}

impl Contract {
    pub(crate) fn check_approved_nft_contract(
        &self,
        nft_contract_id: &AccountId,
    ) -> Result<(), AuctionError> {
        if !self.approved_nft_contracts.contains(nft_contract_id) {
            return Err(AuctionError::Unauthorized(format!(
                "{} is not an approved NFT contract",
                nft_contract_id
            )));
        }
        Ok(())
    }

    /// Registry answers for `ownerOf` and `isApproved` must both favour the seller.
    pub(crate) fn check_custody(
        seller: &AccountId,
        owner: Option<&AccountId>,
        approved: bool,
    ) -> Result<(), AuctionError> {
        match owner {
            None => Err(AuctionError::TransferFailed(
                "could not read token owner".into(),
            )),
            Some(owner) if owner != seller => Err(AuctionError::Unauthorized(
                "Only the token owner can auction it".into(),
            )),
            Some(_) if !approved => Err(AuctionError::Unauthorized(
                "Auction contract is not approved for this token".into(),
            )),
            Some(_) => Ok(()),
        }
    }
}
