use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Provider error: {0}")]
    Provider(#[from] ethers::providers::ProviderError),

    #[error("Wallet error: {0}")]
    Wallet(#[from] ethers::signers::WalletError),

    #[error("Contract error: {0}")]
    Contract(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: String },

    #[error("Insufficient {asset} balance: requested {requested}, available {available}")]
    InsufficientBalance {
        asset: String,
        requested: String,
        available: String,
    },

    #[error("Transaction reverted: {0}")]
    TransactionRevert(String),

    #[error("Transaction {0:?} dropped from mempool")]
    Dropped(ethers::types::H256),

    #[error("Other: {0}")]
    Other(String),
}
