//! Token balance queries for the connected account

use alloy_primitives::U256;
use bigdecimal::BigDecimal;

use crate::{
    contracts_config::ContractsConfig,
    error::SwapError,
    units::{format_fixed, format_units},
    wallet::WalletCapability,
};

/// The number of fractional digits in a formatted balance
pub const DISPLAY_DECIMALS: u32 = 6;

/// A token balance in each of its representations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBalance {
    /// The balance in atoms
    pub raw: U256,
    /// The balance in whole units at full precision
    pub full: BigDecimal,
    /// The balance in whole units, rounded for display
    pub formatted: String,
}

impl TokenBalance {
    /// Build a balance from an atom count
    pub fn from_atoms(raw: U256, decimals: u8) -> Self {
        let full = format_units(raw, decimals);
        let formatted = format_fixed(&full, DISPLAY_DECIMALS);
        Self { raw, full, formatted }
    }
}

/// The connected account's balance of the given symbol
///
/// A disconnected wallet has a zero balance
pub async fn token_balance(
    wallet: &dyn WalletCapability,
    config: &ContractsConfig,
    symbol: &str,
) -> Result<TokenBalance, SwapError> {
    let decimals = config.decimals(symbol);
    let Some(owner) = wallet.account().await else {
        return Ok(TokenBalance::from_atoms(U256::ZERO, decimals));
    };

    let raw = if ContractsConfig::is_native(symbol) {
        wallet.native_balance(owner).await
    } else {
        let token = config.token_address(symbol)?;
        wallet.erc20_balance(token, owner).await
    }
    .map_err(SwapError::unknown)?;

    Ok(TokenBalance::from_atoms(raw, decimals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        contracts_config::test_helpers::*, test_helpers::USER, wallet::mock_wallet::MockWallet,
    };

    /// Tests native and token balances of a connected account
    #[tokio::test]
    async fn test_connected_balances() {
        let wallet = MockWallet::new(Some(USER), 42161)
            .with_native_balance(USER, U256::from(1_500_000_000_000_000_000u64))
            .with_erc20_balance(USDT_ADDRESS, USER, U256::from(4_275_670_000u64));
        let config = mock_config();

        let eth = token_balance(&wallet, &config, "ETH").await.unwrap();
        assert_eq!(eth.formatted, "1.500000");

        let usdt = token_balance(&wallet, &config, "USDT").await.unwrap();
        assert_eq!(usdt.raw, U256::from(4_275_670_000u64));
        assert_eq!(usdt.formatted, "4275.670000");

        let res = token_balance(&wallet, &config, "DOGE").await;
        assert_eq!(res, Err(SwapError::UnknownToken("DOGE".to_string())));
    }

    /// Tests that a disconnected wallet reads a zero balance
    #[tokio::test]
    async fn test_disconnected_balance() {
        let wallet = MockWallet::new(None, 42161);
        let balance = token_balance(&wallet, &mock_config(), "USDT").await.unwrap();

        assert_eq!(balance.raw, U256::ZERO);
        assert_eq!(balance.formatted, "0.000000");
    }
}
