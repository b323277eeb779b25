// =============================================================================
// Refund & Credit Integration Tests
// =============================================================================
// NEP-141 bids through ft_transfer_call, outbid refunds that the token
// contract rejects (credited instead), withdrawal of credits, and FT payouts
// on settlement.

use anyhow::Result;
use serde_json::json;

use super::helpers::*;

const FT_START: u128 = 400_000;

struct FtSetup {
    s: Setup,
    ft: near_workspaces::Contract,
    alice: near_workspaces::Account,
    bob: near_workspaces::Account,
    auction_id: u64,
}

/// Auction priced in the mock token, with two funded bidders.
async fn setup_ft_auction() -> Result<FtSetup> {
    let s = setup().await?;
    let ft = deploy_mock_ft(&s.worker, &s.admin).await?;
    let alice = s.worker.dev_create_account().await?;
    let bob = s.worker.dev_create_account().await?;
    ft_mint(&ft, &alice, 1_000_000).await?;
    ft_mint(&ft, &bob, 1_000_000).await?;

    mint_and_approve(&s.nft, &s.seller, "art-1", &s.auction).await?;
    let result = create_auction(
        &s.auction,
        &s.seller,
        &s.nft,
        "art-1",
        AUCTION_DURATION,
        FT_START,
        ft_currency(&ft),
        Some(1_000),
    )
    .await?;
    assert!(result.is_success(), "{:?}", result.failures());
    let auction_id = result.json::<u64>()?;

    Ok(FtSetup {
        s,
        ft,
        alice,
        bob,
        auction_id,
    })
}

// =============================================================================
// FT Bidding
// =============================================================================

#[tokio::test]
async fn test_ft_bid_and_refund() -> Result<()> {
    let t = setup_ft_auction().await?;

    ft_bid(&t.ft, &t.alice, &t.s.auction, t.auction_id, 450_000)
        .await?
        .into_result()?;
    assert_eq!(ft_balance(&t.ft, t.alice.id()).await?, 550_000);
    assert_eq!(ft_balance(&t.ft, t.s.auction.id()).await?, 450_000);

    ft_bid(&t.ft, &t.bob, &t.s.auction, t.auction_id, 500_000)
        .await?
        .into_result()?;

    // Alice was pushed her bid back in full.
    assert_eq!(ft_balance(&t.ft, t.alice.id()).await?, 1_000_000);
    assert_eq!(ft_balance(&t.ft, t.s.auction.id()).await?, 500_000);

    let view = get_auction(&t.s.auction, t.auction_id).await?.expect("exists");
    assert_eq!(view.highest_bidder, Some(t.bob.id().to_string()));
    assert_eq!(view.highest_bid, "500000");
    assert_eq!(view.currency, ft_currency(&t.ft));
    Ok(())
}

#[tokio::test]
async fn test_rejected_ft_bid_is_refunded_by_token() -> Result<()> {
    let t = setup_ft_auction().await?;

    // Below the start price: the receiver panics and the token contract refunds.
    let result = ft_bid(&t.ft, &t.alice, &t.s.auction, t.auction_id, 100_000).await?;
    assert!(!result.receipt_failures().is_empty());

    assert_eq!(ft_balance(&t.ft, t.alice.id()).await?, 1_000_000);
    assert_eq!(ft_balance(&t.ft, t.s.auction.id()).await?, 0);
    let view = get_auction(&t.s.auction, t.auction_id).await?.expect("exists");
    assert_eq!(view.bid_count, 0);
    Ok(())
}

#[tokio::test]
async fn test_native_bid_on_ft_auction_rejected() -> Result<()> {
    let t = setup_ft_auction().await?;

    let result = place_bid(&t.s.auction, &t.alice, t.auction_id, near(450)).await?;
    assert!(result.is_failure(), "currency must match the auction");
    Ok(())
}

// =============================================================================
// Failed Refund → Credit → Withdraw
// =============================================================================

#[tokio::test]
async fn test_failed_refund_is_credited_and_withdrawable() -> Result<()> {
    let t = setup_ft_auction().await?;

    ft_bid(&t.ft, &t.alice, &t.s.auction, t.auction_id, 450_000)
        .await?
        .into_result()?;

    set_ft_fail_next_transfer(&t.ft).await?;
    let outbid = ft_bid(&t.ft, &t.bob, &t.s.auction, t.auction_id, 500_000).await?;
    assert!(outbid.is_success(), "{:?}", outbid.failures());
    assert_eq!(events(&outbid, "refund_credited").len(), 1);

    // The outbid still stands even though the refund bounced.
    let view = get_auction(&t.s.auction, t.auction_id).await?.expect("exists");
    assert_eq!(view.highest_bidder, Some(t.bob.id().to_string()));
    assert_eq!(view.pending_transfers, 0);

    assert_eq!(ft_balance(&t.ft, t.alice.id()).await?, 550_000);
    assert_eq!(
        get_credit(&t.s.auction, t.alice.id(), ft_currency(&t.ft)).await?,
        450_000
    );

    let withdrawn = withdraw(&t.s.auction, &t.alice, ft_currency(&t.ft)).await?;
    assert!(withdrawn.is_success(), "{:?}", withdrawn.failures());
    assert_eq!(ft_balance(&t.ft, t.alice.id()).await?, 1_000_000);
    assert_eq!(
        get_credit(&t.s.auction, t.alice.id(), ft_currency(&t.ft)).await?,
        0
    );

    let nothing_left = withdraw(&t.s.auction, &t.alice, ft_currency(&t.ft)).await?;
    assert!(nothing_left.is_failure(), "credit is paid out once");
    Ok(())
}

// =============================================================================
// FT Settlement
// =============================================================================

#[tokio::test]
async fn test_ft_settlement_pays_fee_and_seller() -> Result<()> {
    let t = setup_ft_auction().await?;

    ft_bid(&t.ft, &t.alice, &t.s.auction, t.auction_id, 450_000)
        .await?
        .into_result()?;
    ft_bid(&t.ft, &t.bob, &t.s.auction, t.auction_id, 550_000)
        .await?
        .into_result()?;

    t.s.worker.fast_forward(BLOCKS_PAST_EXPIRY).await?;

    let ended = end_auction(&t.s.auction, &t.alice, t.auction_id, &t.s.nft).await?;
    assert!(ended.is_success(), "{:?}", ended.failures());

    let ended_events = events(&ended, "auction_ended");
    assert_eq!(ended_events.len(), 1);
    assert_eq!(ended_events[0]["data"]["fee"], json!("5500"));
    assert_eq!(ended_events[0]["data"]["seller_proceeds"], json!("544500"));

    assert_eq!(ft_balance(&t.ft, t.s.fee_recipient.id()).await?, 5_500);
    assert_eq!(ft_balance(&t.ft, t.s.seller.id()).await?, 544_500);
    assert_eq!(ft_balance(&t.ft, t.s.auction.id()).await?, 0);
    assert_eq!(
        nft_owner(&t.s.nft, "art-1").await?,
        Some(t.bob.id().to_string())
    );
    Ok(())
}
