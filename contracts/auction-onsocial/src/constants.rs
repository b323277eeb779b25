use near_sdk::NearToken;

pub const BASIS_POINTS: u16 = 10_000; // 100%
pub const DEFAULT_MIN_INCREMENT_BPS: u16 = 1_000; // 10%
pub const ONE_YOCTO: NearToken = NearToken::from_yoctonear(1);
pub const NO_DEPOSIT: NearToken = NearToken::from_yoctonear(0);

pub const MAX_TOKEN_ID_LEN: usize = 256;
pub const MAX_AUCTION_DURATION: u64 = 365 * 24 * 3_600 * 1_000_000_000; // one year in ns

// Upper bound of one auction plus one escrow record; the actual charge is the measured delta.
pub const LISTING_STORAGE_BYTES: u64 = 2_000;
pub const MAX_TOKEN_VIEW_LEN: usize = 16_384;
pub const DEFAULT_PAGE_LIMIT: u64 = 50;
pub const MAX_PAGE_LIMIT: u64 = 100;

// Storage key invariant: delimiter cannot appear in NEAR account IDs, preventing escrow/credit key collisions.
pub const DELIMITER: &str = ":";

// Raw storage key of the dispatcher slot. Disjoint from `STATE` and every `StorageKey` prefix.
pub const PROXY_SLOT: &[u8] = b"__proxy__";
pub const STATE_KEY: &[u8] = b"STATE";

pub const GAS_NFT_VIEW_TGAS: u64 = 10;
pub const GAS_NFT_TRANSFER_TGAS: u64 = 20;
pub const GAS_FT_TRANSFER_TGAS: u64 = 15;
pub const GAS_CALLBACK_TGAS: u64 = 10;
pub const GAS_ESCROW_CALLBACK_TGAS: u64 = 50;
pub const GAS_MIGRATE_TGAS: u64 = 100;
pub const DEFAULT_UPGRADE_CALL_GAS_TGAS: u64 = 50;
pub const MAX_UPGRADE_CALL_GAS_TGAS: u64 = 150;
