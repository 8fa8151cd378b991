//! API types for the contracts configuration served by the backend

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The route serving the contracts configuration
pub const CONFIG_ROUTE: &str = "api/config";

/// The raw contracts configuration payload
///
/// Addresses are kept as strings here; they are parsed and validated when the
/// payload is resolved into a typed configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ContractsConfigPayload {
    /// A mapping from token symbol to token address
    pub tokens: HashMap<String, String>,
    /// A mapping from token symbol to token decimals
    #[serde(default)]
    pub decimals: HashMap<String, u8>,
    /// A mapping from venue name to router address
    pub routers: HashMap<String, String>,
}
