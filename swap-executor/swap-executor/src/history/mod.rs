//! A bounded, newest-first log of confirmed swaps
//!
//! Every operation is total: storage failures are logged and otherwise
//! swallowed, so a broken store never fails a swap

use alloy_primitives::TxHash;
use swap_executor_api::history::{HistoryEntry, HistoryStatus};
use tracing::{error, warn};

use crate::{metrics::record_history_write_failure, orchestrator::SwapRequest};

use self::{backend::HistoryBackend, error::HistoryError};

pub mod backend;
pub mod error;
#[cfg(test)]
pub(crate) mod test_helpers;

/// The key under which the history is stored
pub const HISTORY_KEY: &str = "swap_executor.swap_history";
/// The maximum number of entries retained
pub const MAX_HISTORY_ENTRIES: usize = 100;

/// Criteria for selecting history entries, unset fields match everything
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    /// The symbol of the token sold
    pub token_from: Option<String>,
    /// The symbol of the token bought
    pub token_to: Option<String>,
    /// The venue that executed the swap
    pub dex: Option<String>,
}

impl HistoryFilter {
    /// Whether the entry satisfies every set field
    pub fn matches(&self, entry: &HistoryEntry) -> bool {
        let field_matches =
            |want: &Option<String>, have: &str| want.as_deref().map_or(true, |w| w == have);

        field_matches(&self.token_from, &entry.token_from)
            && field_matches(&self.token_to, &entry.token_to)
            && field_matches(&self.dex, &entry.dex)
    }
}

/// Build the record of a confirmed swap
pub fn entry_for_swap(request: &SwapRequest, tx_hash: TxHash, timestamp_ms: i64) -> HistoryEntry {
    let option = &request.option;
    HistoryEntry {
        id: format!("{tx_hash:#x}_{timestamp_ms}"),
        timestamp: timestamp_ms,
        tx_hash,
        token_from: request.token_from.clone(),
        token_to: request.token_to.clone(),
        amount_from: request.amount,
        amount_to: option.amount_to,
        value_usd: option.value_from_usd,
        dex: option.dex.clone(),
        fee: option.dex_fee,
        gas_used: option.gas_cost,
        percentage_change: option.percentage_change,
        status: HistoryStatus::Success,
    }
}

/// The swap history, persisted through a key-value backend
pub struct HistoryStore {
    /// The storage backend
    backend: Box<dyn HistoryBackend>,
}

impl HistoryStore {
    /// Constructor
    pub fn new(backend: Box<dyn HistoryBackend>) -> Self {
        Self { backend }
    }

    /// Record a swap at the head of the log, evicting the oldest entries past
    /// the bound
    ///
    /// A malformed log is replaced, but a log that cannot be read is left
    /// untouched and the entry dropped
    pub async fn append(&self, entry: HistoryEntry) {
        let mut entries = match self.load().await {
            Ok(entries) => entries,
            Err(e @ HistoryError::Serialization(_)) => {
                warn!("replacing malformed swap history: {e}");
                Vec::new()
            },
            Err(e @ HistoryError::Storage(_)) => {
                error!("failed to read swap history, dropping entry: {e}");
                record_history_write_failure();
                return;
            },
        };
        entries.insert(0, entry);
        entries.truncate(MAX_HISTORY_ENTRIES);

        if let Err(e) = self.store(&entries).await {
            error!("failed to persist swap history: {e}");
            record_history_write_failure();
        }
    }

    /// All entries, newest first
    pub async fn list(&self) -> Vec<HistoryEntry> {
        match self.load().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("treating unreadable swap history as empty: {e}");
                Vec::new()
            },
        }
    }

    /// The entries matching the filter, newest first
    pub async fn filtered(&self, filter: &HistoryFilter) -> Vec<HistoryEntry> {
        self.list().await.into_iter().filter(|e| filter.matches(e)).collect()
    }

    /// Remove every entry
    pub async fn clear(&self) {
        if let Err(e) = self.backend.remove(HISTORY_KEY).await {
            error!("failed to clear swap history: {e}");
        }
    }

    /// Read and parse the stored log
    async fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let Some(raw) = self.backend.read(HISTORY_KEY).await? else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&raw).map_err(HistoryError::serialization)
    }

    /// Serialize and write the log
    async fn store(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let raw = serde_json::to_string(entries).map_err(HistoryError::serialization)?;
        self.backend.write(HISTORY_KEY, &raw).await
    }
}
