//! Ensures a venue's router may spend the input token before a swap

use alloy_primitives::U256;
use alloy_sol_types::SolCall;
use tracing::{info, instrument};

use crate::{
    abis::IERC20,
    contracts_config::ContractsConfig,
    error::SwapError,
    metrics::record_approval_submitted,
    orchestrator::state::{SwapEvent, SwapTracker},
    wallet::{DynWallet, WalletCall},
};

/// The step label while reading the current allowance
const STEP_CHECKING: &str = "checking allowance";

/// Drives token approvals for swaps
#[derive(Clone)]
pub struct AllowanceGate {
    /// The wallet used to read allowances and submit approvals
    wallet: DynWallet,
}

impl AllowanceGate {
    /// Constructor
    pub fn new(wallet: DynWallet) -> Self {
        Self { wallet }
    }

    /// Ensure the venue's router may spend `amount_needed` atoms of `token`
    ///
    /// Returns `false` once the tracker has been moved to the error status.
    /// Native input needs no approval and leaves the tracker untouched
    #[instrument(skip_all, fields(token = %token, venue = %venue))]
    pub async fn ensure_allowance(
        &self,
        config: &ContractsConfig,
        token: &str,
        venue: &str,
        amount_needed: U256,
        tracker: &SwapTracker,
    ) -> bool {
        if ContractsConfig::is_native(token) {
            return true;
        }

        tracker.apply(SwapEvent::Approving(STEP_CHECKING.to_string()));
        match self.approve_if_needed(config, token, venue, amount_needed, tracker).await {
            Ok(()) => {
                tracker.apply(SwapEvent::Approved);
                true
            },
            Err(e) => {
                tracker.apply(SwapEvent::Failed(e));
                false
            },
        }
    }

    /// Read the allowance and submit an exact approval if it falls short
    async fn approve_if_needed(
        &self,
        config: &ContractsConfig,
        token: &str,
        venue: &str,
        amount_needed: U256,
        tracker: &SwapTracker,
    ) -> Result<(), SwapError> {
        let owner = self.wallet.account().await.ok_or(SwapError::WalletNotConnected)?;
        let token_address = config.token_address(token)?;
        let spender = config.router(venue)?.address;

        let current = self
            .wallet
            .allowance(token_address, owner, spender)
            .await
            .map_err(SwapError::from_approval)?;
        if current >= amount_needed {
            info!("existing allowance of {current} covers {amount_needed}");
            return Ok(());
        }

        tracker.apply(SwapEvent::Approving(format!("approving {token}")));
        let data = IERC20::approveCall { spender, value: amount_needed }.abi_encode();
        let call = WalletCall { to: token_address, data: data.into(), value: U256::ZERO };

        let tx_hash = self.wallet.submit(call).await.map_err(SwapError::from_approval)?;
        record_approval_submitted(venue);
        info!("submitted approval {tx_hash:#x} for {amount_needed}");

        let receipt =
            self.wallet.wait_for_receipt(tx_hash).await.map_err(SwapError::from_approval)?;
        if !receipt.success {
            return Err(SwapError::ApprovalFailed(format!("approval {tx_hash:#x} reverted")));
        }

        Ok(())
    }
}
