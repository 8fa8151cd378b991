//! Defines the abstract wallet capability through which all on-chain
//! interaction flows
//!
//! The orchestrator never talks to a node directly; it reads the connected
//! account and chain, submits calls, and waits for receipts through this
//! interface

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;

use self::error::WalletError;

pub mod error;
#[cfg(test)]
pub(crate) mod mock_wallet;
pub mod rpc_wallet;

// ----------------
// | Type Aliases |
// ----------------

/// A shared, dynamically dispatched wallet capability
pub type DynWallet = Arc<dyn WalletCapability>;

// ---------
// | Types |
// ---------

/// A single contract call to be signed and submitted by the wallet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletCall {
    /// The contract being called
    pub to: Address,
    /// The ABI-encoded calldata
    pub data: Bytes,
    /// The native value attached to the call, in wei
    pub value: U256,
}

/// The outcome of a mined transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptOutcome {
    /// The hash of the mined transaction
    pub tx_hash: TxHash,
    /// Whether the transaction executed successfully
    pub success: bool,
    /// The gas used by the transaction
    pub gas_used: u64,
    /// The block in which the transaction was included
    pub block_number: Option<u64>,
}

// --------------------
// | Trait Definition |
// --------------------

/// The high-level interface of a wallet connected to an RPC provider
#[async_trait]
pub trait WalletCapability: Send + Sync {
    /// The connected account, if any
    async fn account(&self) -> Option<Address>;

    /// The id of the chain the wallet is connected to
    async fn chain_id(&self) -> Result<u64, WalletError>;

    /// Ask the wallet to switch to the given chain
    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError>;

    /// The amount of `token` that `owner` has approved `spender` to transfer
    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, WalletError>;

    /// The native asset balance of `owner`, in wei
    async fn native_balance(&self, owner: Address) -> Result<U256, WalletError>;

    /// The ERC20 balance of `owner`, in atoms of `token`
    async fn erc20_balance(&self, token: Address, owner: Address) -> Result<U256, WalletError>;

    /// Sign and submit a call, returning the transaction hash
    async fn submit(&self, call: WalletCall) -> Result<TxHash, WalletError>;

    /// Wait until the given transaction is mined and report its outcome
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<ReceiptOutcome, WalletError>;
}
