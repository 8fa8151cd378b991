//! The swap executor: executes quoted token swaps against DEX router
//! contracts through a wallet capability, and records confirmed swaps
#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]
#![deny(unsafe_code)]
#![deny(clippy::needless_pass_by_ref_mut)]
#![deny(clippy::needless_pass_by_value)]

pub mod abis;
pub mod allowance;
pub mod balances;
pub mod cli;
pub mod contracts_config;
pub mod error;
pub mod history;
pub mod metrics;
pub mod orchestrator;
pub mod quote_client;
pub mod route_encoder;
pub mod units;
pub mod wallet;

#[cfg(test)]
pub(crate) mod test_helpers;
