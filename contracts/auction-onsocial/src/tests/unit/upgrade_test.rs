use crate::tests::test_utils::*;
use crate::*;
use near_sdk::json_types::Base64VecU8;
use near_sdk::test_utils::get_logs;
use near_sdk::{testing_env, PromiseResult};

fn wasm() -> Base64VecU8 {
    Base64VecU8(b"\0asm\x01\0\0\0".to_vec())
}

fn init_call(method_name: &str, gas_tgas: Option<u64>) -> UpgradeCall {
    UpgradeCall {
        method_name: method_name.to_string(),
        args: None,
        gas_tgas,
    }
}

// ─── upgrade_to_and_call ────────────────────────────────────────────────────

#[test]
fn admin_upgrade_builds_batch() {
    let mut contract = new_contract();
    testing_env!(context_with_deposit(admin(), 1).build());
    assert!(contract.upgrade_to_and_call(wasm(), None).is_ok());
    assert!(get_logs().iter().any(|log| log.starts_with("Upgrading from")));
}

#[test]
fn upgrade_with_init_call() {
    let mut contract = new_contract();
    testing_env!(context_with_deposit(admin(), 1).build());
    let call = init_call("set_fee_percentage", Some(MAX_UPGRADE_CALL_GAS_TGAS));
    assert!(contract.upgrade_to_and_call(wasm(), Some(call)).is_ok());
}

#[test]
fn upgrade_by_non_admin_rejected() {
    let mut contract = new_contract();
    testing_env!(context_with_deposit(seller(), 1).build());
    let result = contract.upgrade_to_and_call(wasm(), None);
    assert!(matches!(result, Err(AuctionError::Unauthorized(_))));
}

#[test]
fn upgrade_requires_one_yocto() {
    let mut contract = new_contract();
    testing_env!(context(admin()).build());
    let result = contract.upgrade_to_and_call(wasm(), None);
    assert!(matches!(result, Err(AuctionError::InsufficientDeposit(_))));
}

#[test]
fn upgrade_with_empty_code_rejected() {
    let mut contract = new_contract();
    testing_env!(context_with_deposit(admin(), 1).build());
    let result = contract.upgrade_to_and_call(Base64VecU8(vec![]), None);
    assert!(matches!(result, Err(AuctionError::InvalidInput(_))));
}

#[test]
fn upgrade_call_validation() {
    let mut contract = new_contract();

    testing_env!(context_with_deposit(admin(), 1).build());
    let result = contract.upgrade_to_and_call(wasm(), Some(init_call("", None)));
    assert!(matches!(result, Err(AuctionError::InvalidInput(_))));

    testing_env!(context_with_deposit(admin(), 1).build());
    let call = init_call("initialize", Some(MAX_UPGRADE_CALL_GAS_TGAS + 1));
    let result = contract.upgrade_to_and_call(wasm(), Some(call));
    assert!(matches!(result, Err(AuctionError::InvalidInput(_))));
}

#[test]
fn upgrade_call_json_defaults() {
    let call: UpgradeCall =
        near_sdk::serde_json::from_str(r#"{"method_name":"set_fee_percentage"}"#).unwrap();
    assert_eq!(call.method_name, "set_fee_percentage");
    assert!(call.args.is_none());
    assert!(call.gas_tgas.is_none());
}

// ─── on_upgrade_resolved ────────────────────────────────────────────────────

#[test]
fn failed_batch_keeps_previous_implementation() {
    let contract = new_contract();
    let before = Contract::implementation();

    // No promise results: the batch is treated as failed.
    testing_env!(callback_context().build());
    assert!(!contract.on_upgrade_resolved(before.clone()));

    let events = event_logs("upgrade_failed");
    assert_eq!(events.len(), 1);
    assert!(events[0].contains(&before.version));
    assert_eq!(Contract::implementation(), before);
    assert_eq!(Contract::proxy_state().unwrap().upgrade_count, 0);
}

#[test]
fn large_forwarded_call_result_counts_as_success() {
    let contract = new_contract();
    let before = Contract::implementation();

    with_promise_results(
        callback_context(),
        vec![PromiseResult::Successful(vec![0u8; 20_000])],
    );
    assert!(contract.on_upgrade_resolved(before));
    assert_eq!(event_logs("contract_upgraded").len(), 1);
    assert!(event_logs("upgrade_failed").is_empty());
}

#[test]
fn failed_forwarded_call_reports_failure() {
    let contract = new_contract();
    let before = Contract::implementation();

    with_promise_results(callback_context(), vec![PromiseResult::Failed]);
    assert!(!contract.on_upgrade_resolved(before));
    assert_eq!(event_logs("upgrade_failed").len(), 1);
}

// ─── dispatcher views ───────────────────────────────────────────────────────

#[test]
fn dispatcher_status_tracks_state() {
    testing_env!(context(admin()).build());
    assert_eq!(Contract::dispatcher_status(), DispatcherStatus::Uninitialized);
    assert!(Contract::proxy_state().is_none());
    // Without a slot the running code describes itself.
    assert_eq!(Contract::implementation().version, env!("CARGO_PKG_VERSION"));

    let mut contract = new_contract();
    persist(&mut contract);
    assert_eq!(Contract::dispatcher_status(), DispatcherStatus::Initialized);
}

#[test]
fn proxy_slot_is_separate_from_contract_state() {
    let mut contract = new_contract();
    persist(&mut contract);
    let state_before = env::storage_read(STATE_KEY).unwrap();

    ProxyState::activate(None);

    assert_eq!(env::storage_read(STATE_KEY).unwrap(), state_before);
    assert_eq!(Contract::proxy_state().unwrap().upgrade_count, 1);
}
