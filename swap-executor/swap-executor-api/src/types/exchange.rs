//! API types for requesting swap quotes from the aggregator backend

use serde::{Deserialize, Serialize};

// --------------
// | Api Routes |
// --------------

/// The route to request ranked quote options for a swap
pub const EXCHANGE_ROUTE: &str = "exchange";

// -------------
// | Api Types |
// -------------

/// The request body for fetching quote options
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExchangeRequest {
    /// The symbol of the token being sold
    pub token_from: String,
    /// The symbol of the token being bought
    pub token_to: String,
    /// The amount of `token_from` to sell, in whole units
    pub amount: f64,
}

/// The response body of the exchange route
///
/// Options are ranked best-first by the backend
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExchangeResponse {
    /// The ranked quote options
    pub options: Vec<QuoteOption>,
}

/// A single quoted route, as returned by the backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteOption {
    /// The venue that would execute the swap, e.g. `Uniswap`
    pub dex: String,
    /// The pool's trading pair label, e.g. `ETH/USDT`
    pub pair: String,
    /// The amount sold, in whole units of the input token
    pub amount_from: f64,
    /// The quoted amount bought, in whole units of the output token
    pub amount_to: f64,
    /// The USD value of the input amount
    pub value_from_usd: f64,
    /// The USD value of the quoted output amount
    pub value_to_usd: f64,
    /// The pool's fee as a fraction, e.g. `0.0005` for 5bps
    pub dex_fee: f64,
    /// The liquidity of the pool backing the route
    #[serde(default)]
    pub liquidity: f64,
    /// The estimated gas cost of executing the route
    #[serde(default)]
    pub gas_cost: f64,
    /// The slippage tolerance attached to the quote as a fraction, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slippage: Option<f64>,
    /// The percentage change between the USD values of output and input
    #[serde(default)]
    pub percentage_change: f64,
}
