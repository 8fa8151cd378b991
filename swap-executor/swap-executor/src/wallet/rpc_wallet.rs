//! A wallet capability backed by an alloy provider and an optional local
//! private key signer

use std::{str::FromStr, time::Duration};

use alloy::{
    network::TransactionBuilder,
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::abis::IERC20;

use super::{error::WalletError, ReceiptOutcome, WalletCall, WalletCapability};

/// The default interval at which receipts are polled
pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// The configuration of an RPC-backed wallet
#[derive(Debug, Clone)]
pub struct RpcWalletConfig {
    /// The HTTP(S) url of the RPC node
    pub rpc_url: String,
    /// The hex-encoded private key of the signing account
    ///
    /// If omitted, the wallet has no connected account and can only read
    pub private_key: Option<String>,
    /// The interval at which transaction receipts are polled
    pub receipt_poll_interval: Duration,
}

/// A wallet that signs locally and submits through an RPC node
#[derive(Clone)]
pub struct RpcWallet {
    /// The underlying provider, with the signer attached when configured
    provider: DynProvider,
    /// The address of the signing account, if any
    account: Option<Address>,
    /// The interval at which transaction receipts are polled
    receipt_poll_interval: Duration,
}

impl RpcWallet {
    /// Connect a new wallet to the configured RPC node
    pub async fn new(config: RpcWalletConfig) -> Result<Self, WalletError> {
        let RpcWalletConfig { rpc_url, private_key, receipt_poll_interval } = config;

        let signer = private_key
            .as_deref()
            .map(PrivateKeySigner::from_str)
            .transpose()
            .map_err(|e| WalletError::unsupported(format!("invalid private key: {e}")))?;
        let account = signer.as_ref().map(PrivateKeySigner::address);

        let provider = match signer {
            Some(signer) => {
                DynProvider::new(ProviderBuilder::new().wallet(signer).connect(&rpc_url).await?)
            },
            None => DynProvider::new(ProviderBuilder::new().connect(&rpc_url).await?),
        };

        if let Some(account) = account {
            info!("connected wallet {account:#x} to {rpc_url}");
        } else {
            info!("connected read-only wallet to {rpc_url}");
        }

        Ok(Self { provider, account, receipt_poll_interval })
    }
}

#[async_trait]
impl WalletCapability for RpcWallet {
    async fn account(&self) -> Option<Address> {
        self.account
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        Ok(self.provider.get_chain_id().await?)
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
        // The provider is bound to a single node, which serves a single chain
        let current = self.chain_id().await?;
        if current == chain_id {
            return Ok(());
        }

        Err(WalletError::unsupported(format!(
            "rpc wallet is bound to chain {current}, cannot switch to {chain_id}"
        )))
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, WalletError> {
        let erc20 = IERC20::new(token, self.provider.clone());
        Ok(erc20.allowance(owner, spender).call().await?)
    }

    async fn native_balance(&self, owner: Address) -> Result<U256, WalletError> {
        Ok(self.provider.get_balance(owner).await?)
    }

    async fn erc20_balance(&self, token: Address, owner: Address) -> Result<U256, WalletError> {
        let erc20 = IERC20::new(token, self.provider.clone());
        Ok(erc20.balanceOf(owner).call().await?)
    }

    async fn submit(&self, call: WalletCall) -> Result<TxHash, WalletError> {
        let from = self.account.ok_or_else(|| WalletError::unsupported("no signer configured"))?;
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(call.to)
            .with_input(call.data)
            .with_value(call.value);

        let pending = self.provider.send_transaction(tx).await?;
        let tx_hash = *pending.tx_hash();
        debug!("submitted tx {tx_hash:#x}");

        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<ReceiptOutcome, WalletError> {
        let mut interval = tokio::time::interval(self.receipt_poll_interval);
        loop {
            interval.tick().await;
            let Some(receipt) = self.provider.get_transaction_receipt(tx_hash).await? else {
                continue;
            };

            return Ok(ReceiptOutcome {
                tx_hash,
                success: receipt.status(),
                gas_used: receipt.gas_used,
                block_number: receipt.block_number,
            });
        }
    }
}
