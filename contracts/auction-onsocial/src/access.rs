use crate::guards::check_one_yocto;
use crate::*;

#[near(serializers = [borsh, json])]
#[derive(Clone, Debug, PartialEq)]
pub struct PlatformConfig {
    pub admin: AccountId,
    pub fee_recipient: AccountId,
    pub fee_percentage_bps: u16,
}

impl PlatformConfig {
    pub fn new(
        admin: AccountId,
        fee_recipient: AccountId,
        fee_percentage_bps: u16,
    ) -> Result<Self, AuctionError> {
        validate_fee_bps(fee_percentage_bps)?;
        Ok(Self {
            admin,
            fee_recipient,
            fee_percentage_bps,
        })
    }
}

fn validate_fee_bps(fee_percentage_bps: u16) -> Result<(), AuctionError> {
    if fee_percentage_bps > BASIS_POINTS {
        return Err(AuctionError::InvalidInput(format!(
            "fee_percentage_bps cannot exceed {}",
            BASIS_POINTS
        )));
    }
    Ok(())
}

#[near]
impl Contract {
    /// One-shot setup. `admin` defaults to the caller.
    #[init(ignore_state)]
    #[handle_result]
    pub fn initialize(
        fee_recipient: AccountId,
        fee_percentage_bps: u16,
        admin: Option<AccountId>,
    ) -> Result<Self, AuctionError> {
        if env::state_exists() {
            return Err(AuctionError::AlreadyInitialized);
        }
        let admin = admin.unwrap_or_else(env::predecessor_account_id);
        let config = PlatformConfig::new(admin, fee_recipient, fee_percentage_bps)?;

        if ProxyState::read().is_none() {
            ProxyState::running().write();
        }

        AuctionEvent::ContractInitialized {
            admin: config.admin.clone(),
            fee_recipient: config.fee_recipient.clone(),
            fee_percentage_bps,
        }
        .emit();

        Ok(Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            config,
            auctions: IterableMap::new(StorageKey::Auctions),
            next_auction_id: 0,
            escrow: AssetEscrow::new(),
            credits: LookupMap::new(StorageKey::Credits),
            storage_balances: LookupMap::new(StorageKey::StorageBalances),
            approved_nft_contracts: IterableSet::new(StorageKey::ApprovedNftContracts),
        })
    }

    #[payable]
    #[handle_result]
    pub fn set_fee_recipient(&mut self, fee_recipient: AccountId) -> Result<(), AuctionError> {
        check_one_yocto()?;
        self.check_admin(&env::predecessor_account_id())?;
        let old_recipient = std::mem::replace(&mut self.config.fee_recipient, fee_recipient);
        AuctionEvent::FeeRecipientUpdated {
            admin: self.config.admin.clone(),
            old_recipient,
            new_recipient: self.config.fee_recipient.clone(),
        }
        .emit();
        Ok(())
    }

    #[payable]
    #[handle_result]
    pub fn set_fee_percentage(&mut self, fee_percentage_bps: u16) -> Result<(), AuctionError> {
        check_one_yocto()?;
        self.check_admin(&env::predecessor_account_id())?;
        validate_fee_bps(fee_percentage_bps)?;
        let old_bps = self.config.fee_percentage_bps;
        self.config.fee_percentage_bps = fee_percentage_bps;
        AuctionEvent::FeePercentageUpdated {
            admin: self.config.admin.clone(),
            old_bps,
            new_bps: fee_percentage_bps,
        }
        .emit();
        Ok(())
    }

    #[payable]
    #[handle_result]
    pub fn transfer_admin(&mut self, new_admin: AccountId) -> Result<(), AuctionError> {
        check_one_yocto()?;
        self.check_admin(&env::predecessor_account_id())?;
        if new_admin == self.config.admin {
            return Err(AuctionError::InvalidInput(
                "New admin must differ from current admin".into(),
            ));
        }
        let old_admin = std::mem::replace(&mut self.config.admin, new_admin);
        AuctionEvent::AdminTransferred {
            old_admin,
            new_admin: self.config.admin.clone(),
        }
        .emit();
        Ok(())
    }

    // --- Approved NFT contracts ---

    /// Admin only. Transfer-call listings are accepted from approved registries alone.
    #[payable]
    #[handle_result]
    pub fn add_approved_nft_contract(
        &mut self,
        nft_contract_id: AccountId,
    ) -> Result<(), AuctionError> {
        check_one_yocto()?;
        self.check_admin(&env::predecessor_account_id())?;
        self.approved_nft_contracts.insert(nft_contract_id.clone());
        AuctionEvent::ApprovedNftContractAdded {
            admin: self.config.admin.clone(),
            nft_contract_id,
        }
        .emit();
        Ok(())
    }

    /// Admin only. Auctions already open on the registry are unaffected.
    #[payable]
    #[handle_result]
    pub fn remove_approved_nft_contract(
        &mut self,
        nft_contract_id: AccountId,
    ) -> Result<(), AuctionError> {
        check_one_yocto()?;
        self.check_admin(&env::predecessor_account_id())?;
        self.approved_nft_contracts.remove(&nft_contract_id);
        AuctionEvent::ApprovedNftContractRemoved {
            admin: self.config.admin.clone(),
            nft_contract_id,
        }
        .emit();
        Ok(())
    }

    pub fn get_approved_nft_contracts(&self) -> Vec<&AccountId> {
        self.approved_nft_contracts.iter().collect()
    }

    pub fn admin(&self) -> &AccountId {
        &self.config.admin
    }

    pub fn platform_fee_recipient(&self) -> &AccountId {
        &self.config.fee_recipient
    }

    pub fn platform_fee_percentage(&self) -> u16 {
        self.config.fee_percentage_bps
    }

    pub fn get_platform_config(&self) -> &PlatformConfig {
        &self.config
    }
}
