//! Error types for AvaxPay deep links

use thiserror::Error;

/// Result type alias for deep-link operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, reading or acting on payment links
#[derive(Debug, Error)]
pub enum Error {
    /// Address is not `0x` followed by 40 hex digits
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Amount is empty, non-numeric or not greater than zero
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Amount has more fractional digits than the token supports
    #[error("Amount has too many decimal places (max {max}): {amount}")]
    TooManyDecimalPlaces { amount: String, max: u8 },

    /// Batch recipients and amounts differ in length
    #[error("Recipients and amounts must have same length ({recipients} != {amounts})")]
    BatchLengthMismatch { recipients: usize, amounts: usize },

    /// Missing required link parameter
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// Link is structurally wrong (unknown target, bad chain id, ...)
    #[error("Invalid link: {0}")]
    InvalidLink(String),

    /// Chain id not present in the registry
    #[error("Unsupported chain ID: {0}")]
    UnsupportedChain(u64),

    /// No payment processor contract on the chain (zero address in the registry)
    #[error("Payment processor not deployed on chain {0}")]
    ProcessorNotDeployed(u64),

    /// Registry contents are inconsistent
    #[error("Invalid registry: {0}")]
    InvalidRegistry(String),

    /// Token symbol or address not present in the registry
    #[error("Unknown token: {0}")]
    UnknownToken(String),

    /// On-ramp currency not supported
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    /// On-ramp amount outside the configured band
    #[error("Amount must be between ${min} and ${max}")]
    AmountOutOfRange { min: f64, max: f64 },

    /// Wallet, RPC or on-ramp collaborator failure (opaque, never retried)
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Transaction was mined but reverted
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
