//! Fixtures for tests that need a contracts configuration

use std::collections::HashMap;

use alloy_primitives::{address, Address};
use async_trait::async_trait;
use swap_executor_api::config::ContractsConfigPayload;

use crate::error::SwapError;

use super::{ConfigSource, ContractsConfig};

/// The wrapped native token
pub const WETH_ADDRESS: Address = address!("0x82af49447d8a07e3bd95bd0d56f35241523fbab1");
/// A 6 decimal stablecoin
pub const USDT_ADDRESS: Address = address!("0xfd086bc7cd5c481dcc9c85ebe478a1c0b69fcbb9");
/// A second 6 decimal stablecoin
pub const USDC_ADDRESS: Address = address!("0xaf88d065e77c8cc2239327c5edb3a432268e5831");
/// A token without a decimals entry
pub const ARB_ADDRESS: Address = address!("0x912ce59144191c1204e64559fe8253a0e49e6548");
/// The fee-tiered Uniswap router
pub const UNISWAP_ROUTER: Address = address!("0xe592427a0aece92de3edee1f18e0157c05861564");
/// The fee-tiered SushiSwap router
pub const SUSHISWAP_ROUTER: Address = address!("0x8a21f6768c1f8075791d08546dadf6daa0be820c");
/// The fee-less Camelot router
pub const CAMELOT_ROUTER: Address = address!("0x1f721e2e82f6676fce4ea07a5958cf098d339e18");

/// A raw configuration payload covering every venue
pub fn mock_payload() -> ContractsConfigPayload {
    let tokens = [
        ("ETH", Address::ZERO),
        ("WETH", WETH_ADDRESS),
        ("USDT", USDT_ADDRESS),
        ("USDC", USDC_ADDRESS),
        ("ARB", ARB_ADDRESS),
    ];
    let decimals = [("ETH", 18), ("WETH", 18), ("USDT", 6), ("USDC", 6)];
    let routers =
        [("Uniswap", UNISWAP_ROUTER), ("SushiSwap", SUSHISWAP_ROUTER), ("Camelot", CAMELOT_ROUTER)];

    ContractsConfigPayload {
        tokens: tokens.iter().map(|(s, a)| (s.to_string(), a.to_string())).collect(),
        decimals: decimals.iter().map(|(s, d)| (s.to_string(), *d)).collect::<HashMap<_, _>>(),
        routers: routers.iter().map(|(v, a)| (v.to_string(), a.to_string())).collect(),
    }
}

/// The parsed form of [`mock_payload`]
pub fn mock_config() -> ContractsConfig {
    ContractsConfig::from_payload(mock_payload()).unwrap()
}

/// A configuration source serving [`mock_payload`]
pub struct StaticConfigSource;

#[async_trait]
impl ConfigSource for StaticConfigSource {
    async fn fetch(&self) -> Result<ContractsConfigPayload, SwapError> {
        Ok(mock_payload())
    }
}
