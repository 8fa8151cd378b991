//! Error types for the wallet capability

use alloy::transports::{RpcError, TransportErrorKind};
use thiserror::Error;

/// The EIP-1193 error code for a request the user declined
const USER_REJECTED_CODE: i64 = 4001;

/// An error returned by a wallet capability
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// The wallet or its user declined the request
    #[error("request rejected: {0}")]
    Rejected(String),
    /// An error interacting with the RPC node
    #[error("rpc error: {0}")]
    Rpc(String),
    /// The wallet does not support the requested operation
    #[error("unsupported: {0}")]
    Unsupported(String),
}

#[allow(clippy::needless_pass_by_value)]
impl WalletError {
    /// Create a rejected error
    pub fn rejected<T: ToString>(msg: T) -> Self {
        Self::Rejected(msg.to_string())
    }

    /// Create an rpc error
    pub fn rpc<T: ToString>(msg: T) -> Self {
        Self::Rpc(msg.to_string())
    }

    /// Create an unsupported error
    pub fn unsupported<T: ToString>(msg: T) -> Self {
        Self::Unsupported(msg.to_string())
    }
}

impl From<RpcError<TransportErrorKind>> for WalletError {
    fn from(e: RpcError<TransportErrorKind>) -> Self {
        let rejected = e.as_error_resp().is_some_and(|resp| resp.code == USER_REJECTED_CODE);
        if rejected {
            WalletError::rejected(e)
        } else {
            WalletError::rpc(e)
        }
    }
}

impl From<alloy_contract::Error> for WalletError {
    fn from(e: alloy_contract::Error) -> Self {
        WalletError::rpc(e)
    }
}
