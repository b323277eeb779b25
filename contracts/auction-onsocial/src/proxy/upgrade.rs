use super::state_versions::{LegacyState, StateV010, StateV020};
use crate::guards::{check_one_yocto, promise_succeeded};
use crate::*;
use near_sdk::json_types::{Base58CryptoHash, Base64VecU8};
use semver::Version;

#[near]
impl Contract {
    /// Replaces the contract code and runs its migration, plus `call` when given, as one
    /// action batch. If `migrate` or `call` fails the deploy is discarded with them, so the
    /// recorded implementation never points at code that did not come up.
    #[payable]
    #[handle_result]
    pub fn upgrade_to_and_call(
        &mut self,
        code: Base64VecU8,
        call: Option<UpgradeCall>,
    ) -> Result<Promise, AuctionError> {
        check_one_yocto()?;
        self.check_admin(&env::predecessor_account_id())?;
        let code = code.0;
        if code.is_empty() {
            return Err(AuctionError::InvalidInput("Missing contract code".into()));
        }

        let code_hash = Base58CryptoHash::from(env::sha256_array(&code));
        let previous = Self::implementation();
        log!(
            "Upgrading from {} by admin {}",
            previous.version,
            self.config.admin
        );

        let migrate_args = near_sdk::serde_json::json!({ "code_hash": code_hash })
            .to_string()
            .into_bytes();
        let mut batch = Promise::new(env::current_account_id())
            .deploy_contract(code)
            .function_call(
                "migrate".to_string(),
                migrate_args,
                NO_DEPOSIT,
                Gas::from_tgas(GAS_MIGRATE_TGAS),
            );

        if let Some(call) = call {
            if call.method_name.is_empty() {
                return Err(AuctionError::InvalidInput("Missing method_name".into()));
            }
            let gas_tgas = call.gas_tgas.unwrap_or(DEFAULT_UPGRADE_CALL_GAS_TGAS);
            if gas_tgas > MAX_UPGRADE_CALL_GAS_TGAS {
                return Err(AuctionError::InvalidInput(format!(
                    "gas_tgas exceeds maximum of {}",
                    MAX_UPGRADE_CALL_GAS_TGAS
                )));
            }
            batch = batch.function_call(
                call.method_name,
                call.args.map(|args| args.0).unwrap_or_default(),
                NO_DEPOSIT,
                Gas::from_tgas(gas_tgas),
            );
        }

        Ok(batch.then(
            Self::ext(env::current_account_id())
                .with_static_gas(Gas::from_tgas(GAS_CALLBACK_TGAS))
                .on_upgrade_resolved(previous),
        ))
    }

    /// Runs inside the upgrade batch, on the new code.
    #[private]
    #[init(ignore_state)]
    #[handle_result]
    pub fn migrate(code_hash: Option<Base58CryptoHash>) -> Result<Self, AuctionError> {
        let contract = Self::migrate_state()?;
        ProxyState::activate(code_hash);
        Ok(contract)
    }

    #[private]
    pub fn on_upgrade_resolved(&self, previous: Implementation) -> bool {
        // The forwarded call may return a value of any size.
        let upgraded = promise_succeeded();
        if upgraded {
            let current = Self::implementation();
            AuctionEvent::ContractUpgraded {
                old_version: previous.version,
                new_version: current.version,
                code_hash: current.code_hash,
            }
            .emit();
        } else {
            env::log_str("Upgrade batch failed; previous implementation kept");
            AuctionEvent::UpgradeFailed {
                current_version: previous.version,
            }
            .emit();
        }
        upgraded
    }
}

impl Contract {
    pub(crate) fn migrate_state() -> Result<Self, AuctionError> {
        const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");
        let current_version = Version::parse(CURRENT_VERSION)
            .map_err(|_| AuctionError::MigrationFailed("Invalid crate version".into()))?;

        let state_bytes = env::storage_read(STATE_KEY)
            .ok_or_else(|| AuctionError::MigrationFailed("No contract state to migrate".into()))?;

        if let Ok(mut state) = near_sdk::borsh::from_slice::<Contract>(&state_bytes) {
            match Version::parse(&state.version) {
                Ok(state_version) if state_version >= current_version => {
                    env::log_str("State is at current or newer version, no migration needed");
                }
                _ => {
                    log!("Layout unchanged, bumping version from {}", state.version);
                    state.version = CURRENT_VERSION.to_string();
                }
            }
            return Ok(state);
        }

        if let Some(state) = Self::try_upgrade_from::<StateV020>(&state_bytes) {
            return Ok(state);
        }
        if let Some(state) = Self::try_upgrade_from::<StateV010>(&state_bytes) {
            return Ok(state);
        }

        Err(AuctionError::MigrationFailed(
            "Unrecognized state layout".into(),
        ))
    }

    fn try_upgrade_from<S: LegacyState>(state_bytes: &[u8]) -> Option<Self> {
        let old_state = near_sdk::borsh::from_slice::<S>(state_bytes).ok()?;
        let old_version = Version::parse(old_state.version()).ok()?;
        if old_version > Version::parse(S::LAST_VERSION).ok()? {
            return None;
        }

        let old_version = old_state.version().to_string();
        log!("Migrating from state version {}", old_version);
        let state = old_state.into_current();
        AuctionEvent::StateMigrated {
            old_version,
            new_version: state.version.clone(),
        }
        .emit();
        Some(state)
    }
}
