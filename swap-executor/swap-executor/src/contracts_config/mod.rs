//! The resolved contracts configuration: token addresses and decimals, and
//! the router of each venue

use std::{collections::HashMap, str::FromStr};

use alloy_primitives::Address;
use swap_executor_api::config::ContractsConfigPayload;

use crate::error::SwapError;

pub mod resolver;
#[cfg(test)]
pub(crate) mod test_helpers;

pub use resolver::{ConfigSource, ContractsConfigResolver, HttpConfigSource};

// -------------
// | Constants |
// -------------

/// The symbol of the chain's native asset
pub const NATIVE_SYMBOL: &str = "ETH";
/// The symbol of the wrapped native asset
pub const WRAPPED_NATIVE_SYMBOL: &str = "WETH";
/// The decimals assumed for a token missing from the decimals table
pub const DEFAULT_DECIMALS: u8 = 18;
/// The venues whose routers take no fee tier (Algebra-style routers)
const FEELESS_VENUES: &[&str] = &["Camelot"];

// ---------
// | Types |
// ---------

/// The call interface exposed by a venue's router
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterInterface {
    /// A Uniswap V3 style router, pools are keyed by fee tier
    FeeTiered,
    /// An Algebra style router with dynamic fees
    Feeless,
}

impl RouterInterface {
    /// The interface of the router deployed by the given venue
    pub fn for_venue(venue: &str) -> Self {
        if FEELESS_VENUES.contains(&venue) {
            Self::Feeless
        } else {
            Self::FeeTiered
        }
    }
}

/// A venue's router
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterInfo {
    /// The router's address
    pub address: Address,
    /// The router's call interface
    pub interface: RouterInterface,
}

/// The contracts configuration for a session
#[derive(Debug, Clone, Default)]
pub struct ContractsConfig {
    /// Token addresses keyed by symbol
    tokens: HashMap<String, Address>,
    /// Token decimals keyed by symbol
    decimals: HashMap<String, u8>,
    /// Routers keyed by venue name
    routers: HashMap<String, RouterInfo>,
}

impl ContractsConfig {
    /// Constructor
    pub fn new(
        tokens: HashMap<String, Address>,
        decimals: HashMap<String, u8>,
        routers: HashMap<String, Address>,
    ) -> Self {
        let routers = routers
            .into_iter()
            .map(|(venue, address)| {
                let interface = RouterInterface::for_venue(&venue);
                (venue, RouterInfo { address, interface })
            })
            .collect();

        Self { tokens, decimals, routers }
    }

    /// Parse a raw payload, failing on any malformed address
    pub fn from_payload(payload: ContractsConfigPayload) -> Result<Self, SwapError> {
        let ContractsConfigPayload { tokens, decimals, routers } = payload;
        let tokens = parse_addresses(tokens, "token")?;
        let routers = parse_addresses(routers, "router")?;

        Ok(Self::new(tokens, decimals, routers))
    }

    /// Whether the symbol refers to the chain's native asset
    pub fn is_native(symbol: &str) -> bool {
        symbol == NATIVE_SYMBOL
    }

    /// The address of the given token
    pub fn token_address(&self, symbol: &str) -> Result<Address, SwapError> {
        self.tokens.get(symbol).copied().ok_or_else(|| SwapError::UnknownToken(symbol.to_string()))
    }

    /// The decimals of the given token
    pub fn decimals(&self, symbol: &str) -> u8 {
        self.decimals.get(symbol).copied().unwrap_or(DEFAULT_DECIMALS)
    }

    /// The address of the wrapped native token
    ///
    /// Falls back to the native asset's entry when no wrapped entry exists
    pub fn wrapped_native(&self) -> Result<Address, SwapError> {
        self.token_address(WRAPPED_NATIVE_SYMBOL).or_else(|_| self.token_address(NATIVE_SYMBOL))
    }

    /// The address a router sees for the given symbol
    ///
    /// The native asset is swapped as its wrapped token
    pub fn swap_token_address(&self, symbol: &str) -> Result<Address, SwapError> {
        if Self::is_native(symbol) {
            self.wrapped_native()
        } else {
            self.token_address(symbol)
        }
    }

    /// The router of the given venue
    pub fn router(&self, venue: &str) -> Result<RouterInfo, SwapError> {
        self.routers.get(venue).copied().ok_or_else(|| SwapError::UnknownVenue(venue.to_string()))
    }

    /// Check that every symbol and venue of a swap resolves
    pub fn validate_request(
        &self,
        token_from: &str,
        token_to: &str,
        venue: &str,
    ) -> Result<(), SwapError> {
        self.swap_token_address(token_from)?;
        self.swap_token_address(token_to)?;
        self.router(venue)?;
        Ok(())
    }
}

// -----------
// | Helpers |
// -----------

/// Parse a map of hex address strings
fn parse_addresses(
    raw: HashMap<String, String>,
    kind: &str,
) -> Result<HashMap<String, Address>, SwapError> {
    raw.into_iter()
        .map(|(name, addr)| {
            let address = Address::from_str(&addr).map_err(|e| {
                SwapError::config_unavailable(format!("invalid {kind} address for {name}: {e}"))
            })?;
            Ok((name, address))
        })
        .collect()
}
