//! Quote fixtures shared across tests

use alloy_primitives::{address, Address};
use swap_executor_api::exchange::QuoteOption;

use crate::orchestrator::SwapRequest;

/// The account used as the connected user in tests
pub const USER: Address = address!("0x00000000000000000000000000000000000000aa");

/// A quoted option on the given venue
pub fn mock_option(dex: &str, dex_fee: f64, amount_from: f64, amount_to: f64) -> QuoteOption {
    QuoteOption {
        dex: dex.to_string(),
        pair: "ETH/USDT".to_string(),
        amount_from,
        amount_to,
        value_from_usd: amount_from * 4280.,
        value_to_usd: amount_to,
        dex_fee,
        liquidity: 1_000_000.,
        gas_cost: 0.12,
        slippage: None,
        percentage_change: -0.1,
    }
}

/// A swap request for the given option
pub fn mock_request(option: QuoteOption, token_from: &str, token_to: &str) -> SwapRequest {
    let amount = option.amount_from;
    SwapRequest { option, token_from: token_from.to_string(), token_to: token_to.to_string(), amount }
}
