//! Builds venue-specific router calls from a quoted option
//!
//! Encoding is pure: given the same request, configuration, recipient and
//! clock it always produces the same plan

use alloy_primitives::{
    aliases::{U160, U24},
    Address, Bytes, U256,
};
use alloy_sol_types::SolCall;
use swap_executor_api::exchange::QuoteOption;
use tracing::warn;

use crate::{
    abis::{IAlgebraSwapRouter, ISwapRouter},
    contracts_config::{ContractsConfig, RouterInterface},
    error::SwapError,
    orchestrator::SwapRequest,
    units::{minimum_output, to_atoms},
    wallet::WalletCall,
};

// -------------
// | Constants |
// -------------

/// The slippage tolerance applied unless the quote carries a tighter one
pub const DEFAULT_SLIPPAGE_TOLERANCE: f64 = 0.005;
/// The number of seconds after which a swap expires
pub const DEADLINE_OFFSET_SECS: u64 = 1200;
/// The fee tier used when a quoted fee matches no known tier
pub const DEFAULT_FEE_TIER: u32 = 500;
/// Known fee fractions and their pool fee tiers, in hundredths of a bip
const FEE_TIERS: [(f64, u32); 4] = [(0.0001, 100), (0.0005, 500), (0.003, 3000), (0.01, 10000)];
/// The tolerance used to match a quoted fee to a tier
const FEE_EPSILON: f64 = 1e-9;

// ---------
// | Types |
// ---------

/// A single call to a router
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterCall {
    /// A fee-tiered single pool swap
    ExactInputSingle(ISwapRouter::ExactInputSingleParams),
    /// A fee-less single pool swap
    ExactInputSingleFeeless(IAlgebraSwapRouter::ExactInputSingleParams),
    /// Unwrap the router's wrapped native balance to the recipient
    UnwrapWeth9 {
        /// The minimum amount to unwrap
        amount_minimum: U256,
        /// The receiver of the native asset
        recipient: Address,
    },
}

impl RouterCall {
    /// The name of the router function invoked
    pub fn function_name(&self) -> &'static str {
        match self {
            Self::ExactInputSingle(_) | Self::ExactInputSingleFeeless(_) => "exactInputSingle",
            Self::UnwrapWeth9 { .. } => "unwrapWETH9",
        }
    }

    /// The ABI-encoded calldata of the call
    pub fn abi_encode(&self) -> Vec<u8> {
        match self {
            Self::ExactInputSingle(params) => {
                ISwapRouter::exactInputSingleCall { params: params.clone() }.abi_encode()
            },
            Self::ExactInputSingleFeeless(params) => {
                IAlgebraSwapRouter::exactInputSingleCall { params: params.clone() }.abi_encode()
            },
            Self::UnwrapWeth9 { amount_minimum, recipient } => {
                ISwapRouter::unwrapWETH9Call { amountMinimum: *amount_minimum, recipient: *recipient }
                    .abi_encode()
            },
        }
    }
}

/// The complete set of calls that executes a swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallPlan {
    /// The router the calls are sent to
    pub target: Address,
    /// The calls, executed in order
    pub calls: Vec<RouterCall>,
    /// The native value attached to the transaction
    pub native_value: U256,
}

impl CallPlan {
    /// Whether the plan batches several calls through `multicall`
    pub fn is_batch(&self) -> bool {
        self.calls.len() > 1
    }

    /// The name of the top-level function invoked on the router
    pub fn function_name(&self) -> &'static str {
        match self.calls.as_slice() {
            [call] => call.function_name(),
            _ => "multicall",
        }
    }

    /// The calldata of the transaction
    pub fn calldata(&self) -> Bytes {
        match self.calls.as_slice() {
            [call] => call.abi_encode().into(),
            calls => {
                let data = calls.iter().map(|c| Bytes::from(c.abi_encode())).collect();
                ISwapRouter::multicallCall { data }.abi_encode().into()
            },
        }
    }

    /// The plan as a single wallet call
    pub fn to_wallet_call(&self) -> WalletCall {
        WalletCall { to: self.target, data: self.calldata(), value: self.native_value }
    }
}

// ------------
// | Encoding |
// ------------

/// The pool fee tier for a quoted fee fraction
pub fn fee_tier(dex_fee: f64) -> U24 {
    let tier = FEE_TIERS
        .iter()
        .find(|(fee, _)| (fee - dex_fee).abs() < FEE_EPSILON)
        .map(|(_, tier)| *tier)
        .unwrap_or(DEFAULT_FEE_TIER);

    U24::from(tier)
}

/// The slippage tolerance for a quoted option
///
/// A quote may only tighten the default, never widen it
pub fn slippage_tolerance(option: &QuoteOption) -> f64 {
    match option.slippage {
        Some(s) if s > 0. && s < DEFAULT_SLIPPAGE_TOLERANCE => s,
        _ => DEFAULT_SLIPPAGE_TOLERANCE,
    }
}

/// Encode the router calls executing a swap
pub fn encode(
    request: &SwapRequest,
    config: &ContractsConfig,
    recipient: Address,
    now_secs: u64,
) -> Result<CallPlan, SwapError> {
    let SwapRequest { option, token_from, token_to, amount } = request;
    let router = config.router(&option.dex)?;
    let native_in = ContractsConfig::is_native(token_from);
    let native_out = ContractsConfig::is_native(token_to);

    let token_in = config.swap_token_address(token_from)?;
    let token_out = config.swap_token_address(token_to)?;
    let amount_in = to_atoms(*amount, config.decimals(token_from))?;
    let amount_out_minimum =
        minimum_output(option.amount_to, slippage_tolerance(option), config.decimals(token_to))?;
    let deadline = U256::from(now_secs + DEADLINE_OFFSET_SECS);

    let calls = match router.interface {
        RouterInterface::FeeTiered => {
            // Unwrapping requires the router to hold the output first
            let swap_recipient = if native_out { router.address } else { recipient };
            let swap = RouterCall::ExactInputSingle(ISwapRouter::ExactInputSingleParams {
                tokenIn: token_in,
                tokenOut: token_out,
                fee: fee_tier(option.dex_fee),
                recipient: swap_recipient,
                deadline,
                amountIn: amount_in,
                amountOutMinimum: amount_out_minimum,
                sqrtPriceLimitX96: U160::ZERO,
            });

            if native_out {
                let unwrap =
                    RouterCall::UnwrapWeth9 { amount_minimum: amount_out_minimum, recipient };
                vec![swap, unwrap]
            } else {
                vec![swap]
            }
        },
        RouterInterface::Feeless => {
            if native_out {
                warn!(venue = %option.dex, "fee-less router cannot unwrap, output stays wrapped");
            }

            vec![RouterCall::ExactInputSingleFeeless(IAlgebraSwapRouter::ExactInputSingleParams {
                tokenIn: token_in,
                tokenOut: token_out,
                recipient,
                deadline,
                amountIn: amount_in,
                amountOutMinimum: amount_out_minimum,
                limitSqrtPrice: U160::ZERO,
            })]
        },
    };

    let native_value = if native_in { amount_in } else { U256::ZERO };
    Ok(CallPlan { target: router.address, calls, native_value })
}
