//! Upgrade dispatcher.
//!
//! The contract account is the proxy: its storage outlives any code deployed to it, and the
//! runtime routes every call into whatever code is currently deployed. This module records
//! which implementation is live in a reserved raw storage slot that no auction data can reach,
//! and performs the admin-gated swap in [`upgrade`].

pub(crate) mod state_versions;
mod upgrade;

use crate::*;
use near_sdk::json_types::{Base58CryptoHash, Base64VecU8, U64};

/// Identity of the live logic. `code_hash` is unknown for the code deployed at genesis.
#[near(serializers = [borsh, json])]
#[derive(Clone, Debug, PartialEq)]
pub struct Implementation {
    pub version: String,
    pub code_hash: Option<Base58CryptoHash>,
    pub activated_at: U64,
}

#[near(serializers = [borsh, json])]
#[derive(Clone, Debug, PartialEq)]
pub struct ProxyState {
    pub implementation: Implementation,
    pub upgrade_count: u32,
}

impl ProxyState {
    pub fn read() -> Option<Self> {
        env::storage_read(PROXY_SLOT)
            .and_then(|bytes| near_sdk::borsh::from_slice::<Self>(&bytes).ok())
    }

    pub fn write(&self) {
        let bytes = near_sdk::borsh::to_vec(self)
            .unwrap_or_else(|_| env::panic_str("Failed to serialize proxy state"));
        env::storage_write(PROXY_SLOT, &bytes);
    }

    /// The code executing right now, as seen before any upgrade was recorded.
    pub fn running() -> Self {
        Self {
            implementation: Implementation {
                version: env!("CARGO_PKG_VERSION").to_string(),
                code_hash: None,
                activated_at: U64(env::block_timestamp()),
            },
            upgrade_count: 0,
        }
    }

    /// Records freshly deployed code as the live implementation.
    pub fn activate(code_hash: Option<Base58CryptoHash>) -> Self {
        let upgrade_count = Self::read().map_or(0, |state| state.upgrade_count) + 1;
        let state = Self {
            implementation: Implementation {
                version: env!("CARGO_PKG_VERSION").to_string(),
                code_hash,
                activated_at: U64(env::block_timestamp()),
            },
            upgrade_count,
        };
        state.write();
        state
    }
}

#[near(serializers = [json])]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatcherStatus {
    Uninitialized,
    Initialized,
}

/// Call forwarded into the new code in the same batch as the deploy.
#[near(serializers = [json])]
#[derive(Clone, Debug)]
pub struct UpgradeCall {
    pub method_name: String,
    #[serde(default)]
    pub args: Option<Base64VecU8>,
    #[serde(default)]
    pub gas_tgas: Option<u64>,
}

#[near]
impl Contract {
    // These read raw storage only, so they answer before `initialize` as well.

    pub fn implementation() -> Implementation {
        ProxyState::read()
            .unwrap_or_else(ProxyState::running)
            .implementation
    }

    pub fn proxy_state() -> Option<ProxyState> {
        ProxyState::read()
    }

    pub fn dispatcher_status() -> DispatcherStatus {
        if env::state_exists() {
            DispatcherStatus::Initialized
        } else {
            DispatcherStatus::Uninitialized
        }
    }
}
