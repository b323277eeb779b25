use near_sdk::json_types::U128;
use near_sdk_macros::NearSchema;

#[derive(NearSchema, near_sdk::FunctionError)]
#[abi(json)]
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum AuctionError {
    Unauthorized(String),
    AlreadyInitialized,
    InvalidInput(String),
    InsufficientDeposit(String),
    InsufficientStorage { required: U128, available: U128 },
    AuctionNotFound(u64),
    AuctionNotActive(u64),
    AuctionNotExpired { auction_id: u64, end_time: u64 },
    AuctionLocked(u64),
    AuctionHasBids(u64),
    AlreadyEscrowed(String),
    NotEscrowed(String),
    BidTooLow { minimum: U128 },
    AmountMismatch { expected: U128, attached: U128 },
    CurrencyMismatch,
    AssetMismatch,
    TransferFailed(String),
    MigrationFailed(String),
}

impl std::fmt::Display for AuctionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            Self::AlreadyInitialized => write!(f, "Contract is already initialized"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::InsufficientDeposit(msg) => write!(f, "Insufficient deposit: {}", msg),
            Self::InsufficientStorage {
                required,
                available,
            } => write!(
                f,
                "Insufficient storage balance: {} required, {} available",
                required.0, available.0
            ),
            Self::AuctionNotFound(id) => write!(f, "Auction {} not found", id),
            Self::AuctionNotActive(id) => write!(f, "Auction {} is not active", id),
            Self::AuctionNotExpired {
                auction_id,
                end_time,
            } => write!(f, "Auction {} has not expired (ends at {})", auction_id, end_time),
            Self::AuctionLocked(id) => {
                write!(f, "Auction {} has transfers in flight, retry shortly", id)
            }
            Self::AuctionHasBids(id) => write!(f, "Auction {} already has bids", id),
            Self::AlreadyEscrowed(key) => write!(f, "Asset already escrowed: {}", key),
            Self::NotEscrowed(key) => write!(f, "Asset not escrowed: {}", key),
            Self::BidTooLow { minimum } => write!(f, "Bid too low: minimum is {}", minimum.0),
            Self::AmountMismatch { expected, attached } => write!(
                f,
                "Amount mismatch: declared {} but received {}",
                expected.0, attached.0
            ),
            Self::CurrencyMismatch => write!(f, "Currency does not match the auction currency"),
            Self::AssetMismatch => write!(f, "Asset contract does not match the auction asset"),
            Self::TransferFailed(msg) => write!(f, "Transfer failed: {}", msg),
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {}", msg),
        }
    }
}

impl AuctionError {
    pub fn only_admin() -> Self {
        Self::Unauthorized("Only the admin can perform this action".into())
    }
    pub fn only_seller() -> Self {
        Self::Unauthorized("Only the seller can perform this action".into())
    }
}
