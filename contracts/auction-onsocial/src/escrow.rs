use crate::external::ext_nft;
use crate::guards::{check_at_least_one_yocto, single_promise_succeeded};
use crate::*;
use near_sdk::borsh::{BorshDeserialize, BorshSerialize};

#[near(serializers = [borsh, json])]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetRef {
    pub contract_id: AccountId,
    pub token_id: String,
}

impl AssetRef {
    pub fn new(contract_id: AccountId, token_id: String) -> Result<Self, AuctionError> {
        if token_id.is_empty() || token_id.len() > MAX_TOKEN_ID_LEN {
            return Err(AuctionError::InvalidInput(format!(
                "Token ID must be 1..={} characters",
                MAX_TOKEN_ID_LEN
            )));
        }
        Ok(Self {
            contract_id,
            token_id,
        })
    }

    pub fn key(&self) -> String {
        format!("{}{}{}", self.contract_id, DELIMITER, self.token_id)
    }
}

#[near(serializers = [borsh, json])]
#[derive(Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseState {
    Held,
    InFlight { receiver: AccountId },
    Failed { receiver: AccountId },
}

#[near(serializers = [borsh, json])]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscrowRecord {
    pub asset: AssetRef,
    pub depositor: AccountId,
    pub auction_id: u64,
    pub release: ReleaseState,
}

/// Custody ledger: at most one record per asset reference.
#[derive(BorshSerialize, BorshDeserialize)]
#[borsh(crate = "near_sdk::borsh")]
pub struct AssetEscrow {
    records: LookupMap<String, EscrowRecord>,
}

impl AssetEscrow {
    pub fn new() -> Self {
        Self {
            records: LookupMap::new(StorageKey::Escrow),
        }
    }

    pub fn get(&self, asset: &AssetRef) -> Option<&EscrowRecord> {
        self.records.get(&asset.key())
    }

    pub fn is_held(&self, asset: &AssetRef) -> bool {
        self.records.contains_key(&asset.key())
    }

    pub fn hold(
        &mut self,
        asset: &AssetRef,
        from: &AccountId,
        auction_id: u64,
    ) -> Result<(), AuctionError> {
        let key = asset.key();
        if self.records.contains_key(&key) {
            return Err(AuctionError::AlreadyEscrowed(key));
        }
        self.records.insert(
            key,
            EscrowRecord {
                asset: asset.clone(),
                depositor: from.clone(),
                auction_id,
                release: ReleaseState::Held,
            },
        );
        Ok(())
    }

    /// Marks the asset as leaving custody. A release already in flight counts as not held.
    pub fn begin_release(
        &mut self,
        asset: &AssetRef,
        to: &AccountId,
    ) -> Result<u64, AuctionError> {
        let key = asset.key();
        let record = self
            .records
            .get_mut(&key)
            .ok_or_else(|| AuctionError::NotEscrowed(key.clone()))?;
        if matches!(record.release, ReleaseState::InFlight { .. }) {
            return Err(AuctionError::NotEscrowed(key));
        }
        record.release = ReleaseState::InFlight {
            receiver: to.clone(),
        };
        Ok(record.auction_id)
    }

    pub fn complete_release(&mut self, asset: &AssetRef) -> Option<EscrowRecord> {
        self.records.remove(&asset.key())
    }

    pub fn fail_release(&mut self, asset: &AssetRef, to: &AccountId) {
        if let Some(record) = self.records.get_mut(&asset.key()) {
            record.release = ReleaseState::Failed {
                receiver: to.clone(),
            };
        }
    }

    pub(crate) fn flush(&mut self) {
        self.records.flush();
    }
}

impl Default for AssetEscrow {
    fn default() -> Self {
        Self::new()
    }
}

impl Contract {
    /// Sends an escrowed asset to `to`; custody is only dropped once the registry confirms.
    pub(crate) fn release_asset(
        &mut self,
        asset: &AssetRef,
        to: &AccountId,
    ) -> Result<Promise, AuctionError> {
        let auction_id = self.escrow.begin_release(asset, to)?;
        self.begin_transfer(auction_id);
        Ok(ext_nft::ext(asset.contract_id.clone())
            .with_attached_deposit(ONE_YOCTO)
            .with_static_gas(Gas::from_tgas(GAS_NFT_TRANSFER_TGAS))
            .nft_transfer(
                to.clone(),
                asset.token_id.clone(),
                None,
                Some(format!("Auction {} escrow release", auction_id)),
            )
            .then(
                Self::ext(env::current_account_id())
                    .with_static_gas(Gas::from_tgas(GAS_CALLBACK_TGAS))
                    .on_asset_released(asset.clone(), to.clone(), auction_id),
            ))
    }

    pub(crate) fn resolve_asset_release(
        &mut self,
        asset: &AssetRef,
        receiver: &AccountId,
        auction_id: u64,
        succeeded: bool,
    ) {
        self.end_transfer(auction_id);
        if succeeded {
            self.escrow.flush();
            let before = env::storage_usage();
            if let Some(record) = self.escrow.complete_release(asset) {
                self.escrow.flush();
                let freed = before.saturating_sub(env::storage_usage());
                self.release_storage(&record.depositor, freed);
            }
            AuctionEvent::AssetReleased {
                asset: asset.clone(),
                receiver: receiver.clone(),
                auction_id,
            }
            .emit();
        } else {
            env::log_str(&format!(
                "Release of {} to {} failed; asset stays in escrow",
                asset.key(),
                receiver
            ));
            self.escrow.fail_release(asset, receiver);
            AuctionEvent::AssetReleaseFailed {
                asset: asset.clone(),
                receiver: receiver.clone(),
                auction_id,
            }
            .emit();
        }
    }
}

#[near]
impl Contract {
    #[private]
    pub fn on_asset_released(
        &mut self,
        asset: AssetRef,
        receiver: AccountId,
        auction_id: u64,
    ) -> bool {
        let succeeded = single_promise_succeeded(64);
        self.resolve_asset_release(&asset, &receiver, auction_id, succeeded);
        succeeded
    }

    /// Re-sends an asset whose release failed. Only the recorded receiver can end up with it.
    #[payable]
    #[handle_result]
    pub fn retry_asset_release(
        &mut self,
        contract_id: AccountId,
        token_id: String,
    ) -> Result<Promise, AuctionError> {
        check_at_least_one_yocto()?;
        let asset = AssetRef::new(contract_id, token_id)?;
        let receiver = match self.escrow.get(&asset).map(|record| &record.release) {
            Some(ReleaseState::Failed { receiver }) => receiver.clone(),
            Some(_) => {
                return Err(AuctionError::InvalidInput(
                    "Asset has no failed release to retry".into(),
                ))
            }
            None => return Err(AuctionError::NotEscrowed(asset.key())),
        };
        self.release_asset(&asset, &receiver)
    }
}
