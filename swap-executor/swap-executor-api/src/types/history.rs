//! The persisted record layout of completed swaps

use alloy_primitives::TxHash;
use serde::{Deserialize, Serialize};

/// The status recorded for a history entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStatus {
    /// The swap was confirmed on-chain
    Success,
}

/// An immutable record of a confirmed swap
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// The unique id of the entry, `<tx_hash>_<timestamp>`
    pub id: String,
    /// Milliseconds since the UNIX epoch at which the swap was confirmed
    pub timestamp: i64,
    /// The hash of the swap transaction
    pub tx_hash: TxHash,
    /// The symbol of the token sold
    pub token_from: String,
    /// The symbol of the token bought
    pub token_to: String,
    /// The amount sold, in whole units
    pub amount_from: f64,
    /// The quoted amount bought, in whole units
    pub amount_to: f64,
    /// The USD value of the amount sold
    #[serde(rename = "valueUSD")]
    pub value_usd: f64,
    /// The venue that executed the swap
    pub dex: String,
    /// The venue fee fraction of the executed route
    pub fee: f64,
    /// The quoted gas cost of the route
    pub gas_used: f64,
    /// The quoted percentage change between output and input USD values
    pub percentage_change: f64,
    /// The status of the swap
    pub status: HistoryStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests that entries serialize with the persisted field names
    #[test]
    fn test_entry_field_names() {
        let entry = HistoryEntry {
            id: "0x01_1".to_string(),
            timestamp: 1,
            tx_hash: TxHash::ZERO,
            token_from: "ETH".to_string(),
            token_to: "USDT".to_string(),
            amount_from: 1.0,
            amount_to: 4275.67,
            value_usd: 4280.0,
            dex: "Uniswap".to_string(),
            fee: 0.0005,
            gas_used: 0.12,
            percentage_change: -0.1,
            status: HistoryStatus::Success,
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["valueUSD"], 4280.0);
        assert!(value.get("txHash").is_some());
        assert!(value.get("percentageChange").is_some());
    }
}
