//! Error types for the swap executor

use thiserror::Error;

use crate::wallet::error::WalletError;

/// The error type emitted by a swap attempt
///
/// Every failure of an orchestration run is captured into the swap state as
/// one of these variants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    /// The contracts configuration could not be fetched, parsed, or is not yet
    /// loaded
    #[error("configuration unavailable: {0}")]
    ConfigUnavailable(String),
    /// No account is connected to the wallet
    #[error("wallet not connected")]
    WalletNotConnected,
    /// The wallet is on the wrong network and could not be switched
    #[error("must be on required network: {0}")]
    WrongNetwork(String),
    /// The wallet declined to sign the approval transaction
    #[error("approval rejected: {0}")]
    ApprovalRejected(String),
    /// The approval transaction could not be submitted or reverted
    #[error("approval failed: {0}")]
    ApprovalFailed(String),
    /// The wallet declined to sign the swap transaction
    #[error("submission rejected: {0}")]
    SubmissionRejected(String),
    /// The swap transaction reverted on-chain
    #[error("transaction reverted: {0}")]
    TransactionReverted(String),
    /// A token symbol is missing from the contracts configuration
    #[error("unknown token: {0}")]
    UnknownToken(String),
    /// A venue is missing from the contracts configuration
    #[error("unknown venue: {0}")]
    UnknownVenue(String),
    /// An amount could not be represented in token units
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// The quoting service could not provide options
    #[error("quote unavailable: {0}")]
    QuoteUnavailable(String),
    /// An uncategorized error passed through from the wallet or RPC layer
    #[error("{0}")]
    Unknown(String),
}

#[allow(clippy::needless_pass_by_value)]
impl SwapError {
    /// Create a config unavailable error
    pub fn config_unavailable<T: ToString>(msg: T) -> Self {
        Self::ConfigUnavailable(msg.to_string())
    }

    /// Create a wrong network error
    pub fn wrong_network<T: ToString>(msg: T) -> Self {
        Self::WrongNetwork(msg.to_string())
    }

    /// Create an invalid amount error
    pub fn invalid_amount<T: ToString>(msg: T) -> Self {
        Self::InvalidAmount(msg.to_string())
    }

    /// Create a quote unavailable error
    pub fn quote_unavailable<T: ToString>(msg: T) -> Self {
        Self::QuoteUnavailable(msg.to_string())
    }

    /// Create an uncategorized error
    pub fn unknown<T: ToString>(msg: T) -> Self {
        Self::Unknown(msg.to_string())
    }

    /// Classify a wallet error raised while approving
    pub fn from_approval(e: WalletError) -> Self {
        match e {
            WalletError::Rejected(msg) => Self::ApprovalRejected(msg),
            other => Self::ApprovalFailed(other.to_string()),
        }
    }

    /// Classify a wallet error raised while submitting the swap
    pub fn from_submission(e: WalletError) -> Self {
        match e {
            WalletError::Rejected(msg) => Self::SubmissionRejected(msg),
            other => Self::Unknown(other.to_string()),
        }
    }

    /// A short, stable name for the error kind, used as a metric tag
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigUnavailable(_) => "config_unavailable",
            Self::WalletNotConnected => "wallet_not_connected",
            Self::WrongNetwork(_) => "wrong_network",
            Self::ApprovalRejected(_) => "approval_rejected",
            Self::ApprovalFailed(_) => "approval_failed",
            Self::SubmissionRejected(_) => "submission_rejected",
            Self::TransactionReverted(_) => "transaction_reverted",
            Self::UnknownToken(_) => "unknown_token",
            Self::UnknownVenue(_) => "unknown_venue",
            Self::InvalidAmount(_) => "invalid_amount",
            Self::QuoteUnavailable(_) => "quote_unavailable",
            Self::Unknown(_) => "unknown",
        }
    }
}
