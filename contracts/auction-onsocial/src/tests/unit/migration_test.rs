use crate::proxy::state_versions::{StateV010, StateV020};
use crate::tests::test_utils::*;
use crate::*;
use near_sdk::json_types::Base58CryptoHash;
use near_sdk::test_utils::get_logs;
use near_sdk::testing_env;

fn code_hash() -> Base58CryptoHash {
    Base58CryptoHash::from([7u8; 32])
}

/// Rewrites the stored state as the 0.1.0 layout, which had no credit ledger.
fn persist_as_v010(contract: Contract) {
    let Contract {
        config,
        mut auctions,
        next_auction_id,
        mut escrow,
        ..
    } = contract;
    auctions.flush();
    escrow.flush();
    let legacy = StateV010 {
        version: "0.1.0".to_string(),
        config,
        auctions,
        next_auction_id,
        escrow,
    };
    env::state_write(&legacy);
}

/// Rewrites the stored state as the 0.2.0 layout, which had no storage balances.
fn persist_as_v020(contract: Contract) {
    let Contract {
        config,
        mut auctions,
        next_auction_id,
        mut escrow,
        mut credits,
        ..
    } = contract;
    auctions.flush();
    escrow.flush();
    credits.flush();
    let legacy = StateV020 {
        version: "0.2.0".to_string(),
        config,
        auctions,
        next_auction_id,
        escrow,
        credits,
    };
    env::state_write(&legacy);
}

// ─── migrate: current layout ────────────────────────────────────────────────

#[test]
fn migrate_current_state_is_noop() {
    let mut contract = new_contract();
    let id = open_native_auction(&mut contract, 1_000);
    persist(&mut contract);

    testing_env!(callback_context().build());
    let migrated = Contract::migrate(Some(code_hash())).unwrap();
    assert_eq!(migrated.get_version(), env!("CARGO_PKG_VERSION"));
    assert!(migrated.get_auction(id).is_some());
    assert!(get_logs()
        .iter()
        .any(|log| log.contains("no migration needed")));
    assert!(event_logs("state_migrated").is_empty());
}

#[test]
fn migrate_bumps_older_version_with_same_layout() {
    let mut contract = new_contract();
    contract.version = "0.1.5".to_string();
    persist(&mut contract);

    testing_env!(callback_context().build());
    let migrated = Contract::migrate(None).unwrap();
    assert_eq!(migrated.version, env!("CARGO_PKG_VERSION"));
}

#[test]
fn migrate_records_new_implementation() {
    let mut contract = new_contract();
    persist(&mut contract);

    testing_env!(callback_context().block_timestamp(NOW + HOUR).build());
    Contract::migrate(Some(code_hash())).unwrap();

    let state = Contract::proxy_state().unwrap();
    assert_eq!(state.upgrade_count, 1);
    assert_eq!(state.implementation.code_hash, Some(code_hash()));
    assert_eq!(state.implementation.activated_at.0, NOW + HOUR);
}

#[test]
fn repeated_upgrades_count_up() {
    let mut contract = new_contract();
    persist(&mut contract);

    for expected in 1..=3 {
        testing_env!(callback_context().build());
        let mut migrated = Contract::migrate(Some(code_hash())).unwrap();
        persist(&mut migrated);
        assert_eq!(Contract::proxy_state().unwrap().upgrade_count, expected);
    }
}

// ─── migrate: legacy layout ─────────────────────────────────────────────────

#[test]
fn migrate_from_v010_appends_credit_ledger() {
    let mut contract = new_contract();
    let id = open_native_auction(&mut contract, 1_000);
    bid_native(&mut contract, bidder(), id, 1_000).unwrap();
    persist_as_v010(contract);

    testing_env!(callback_context().build());
    let mut migrated = Contract::migrate(Some(code_hash())).unwrap();

    assert_eq!(migrated.get_version(), env!("CARGO_PKG_VERSION"));
    assert_eq!(migrated.get_next_auction_id(), 1);
    assert_eq!(migrated.admin(), &admin());
    let view = migrated.get_auction(id).unwrap();
    assert_eq!(view.auction.highest_bidder, Some(bidder()));
    assert_eq!(view.auction.highest_bid, U128(1_000));
    assert!(migrated.get_escrow(nft(), "token-1".into()).is_some());

    assert!(get_logs()
        .iter()
        .any(|log| log == "Migrating from state version 0.1.0"));
    let events = event_logs("state_migrated");
    assert_eq!(events.len(), 1);
    assert!(events[0].contains("\"old_version\":\"0.1.0\""));

    // The appended ledger is live.
    migrated.credit(&bidder(), &Currency::Native, 5);
    assert_eq!(migrated.get_credit(bidder(), Currency::Native), U128(5));
}

#[test]
fn migrate_from_v020_appends_storage_balances() {
    let mut contract = new_contract();
    let id = open_native_auction(&mut contract, 1_000);
    contract.credit(&bidder(), &Currency::Native, 7);
    persist_as_v020(contract);

    testing_env!(callback_context().build());
    let mut migrated = Contract::migrate(Some(code_hash())).unwrap();

    assert_eq!(migrated.get_version(), env!("CARGO_PKG_VERSION"));
    assert!(migrated.get_auction(id).is_some());
    assert_eq!(migrated.get_credit(bidder(), Currency::Native), U128(7));
    let events = event_logs("state_migrated");
    assert_eq!(events.len(), 1);
    assert!(events[0].contains("\"old_version\":\"0.2.0\""));

    // The appended map is live.
    assert_eq!(migrated.storage_balance_of(second_bidder()), U128(0));
    fund_storage(&mut migrated, second_bidder(), 10);
    assert_eq!(migrated.storage_balance_of(second_bidder()), U128(10));
}

#[test]
fn migrated_state_round_trips() {
    let contract = new_contract();
    persist_as_v010(contract);

    testing_env!(callback_context().build());
    let mut migrated = Contract::migrate(None).unwrap();
    persist(&mut migrated);

    // The second pass sees the current layout.
    testing_env!(callback_context().build());
    Contract::migrate(None).unwrap();
    assert!(event_logs("state_migrated").is_empty());
}

// ─── migrate: failures ──────────────────────────────────────────────────────

#[test]
fn migrate_without_state_fails() {
    testing_env!(callback_context().build());
    let result = Contract::migrate(None);
    assert!(matches!(result, Err(AuctionError::MigrationFailed(_))));
    assert!(Contract::proxy_state().is_none());
}

#[test]
fn migrate_unknown_layout_fails() {
    testing_env!(callback_context().build());
    env::storage_write(STATE_KEY, b"definitely not a contract");
    let result = Contract::migrate(None);
    assert_eq!(
        result.err(),
        Some(AuctionError::MigrationFailed(
            "Unrecognized state layout".into()
        ))
    );
    assert!(Contract::proxy_state().is_none());
}
