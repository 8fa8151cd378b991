//! Swap outcome metrics
//!
//! Recording is a no-op unless the embedding application installs a
//! `metrics` recorder

use crate::error::SwapError;

use self::labels::{
    APPROVALS_SUBMITTED_METRIC_NAME, ERROR_KIND_TAG, HISTORY_WRITE_FAILURES_METRIC_NAME, PAIR_TAG,
    SWAP_ATTEMPTS_METRIC_NAME, SWAP_FAILURES_METRIC_NAME, SWAP_GAS_USED_METRIC_NAME,
    SWAP_SUCCESSES_METRIC_NAME, VENUE_TAG,
};

pub mod labels;

/// Derive the labels of a swap
fn swap_labels(venue: &str, token_from: &str, token_to: &str) -> Vec<(String, String)> {
    vec![
        (VENUE_TAG.to_string(), venue.to_string()),
        (PAIR_TAG.to_string(), format!("{token_from}/{token_to}")),
    ]
}

/// Record the start of a swap attempt
pub fn record_swap_attempt(venue: &str, token_from: &str, token_to: &str) {
    let labels = swap_labels(venue, token_from, token_to);
    metrics::counter!(SWAP_ATTEMPTS_METRIC_NAME, &labels).increment(1);
}

/// Record a confirmed swap and its gas usage
pub fn record_swap_success(venue: &str, token_from: &str, token_to: &str, gas_used: u64) {
    let labels = swap_labels(venue, token_from, token_to);
    metrics::counter!(SWAP_SUCCESSES_METRIC_NAME, &labels).increment(1);
    metrics::histogram!(SWAP_GAS_USED_METRIC_NAME, &labels).record(gas_used as f64);
}

/// Record a swap ending in an error
pub fn record_swap_failure(venue: &str, token_from: &str, token_to: &str, error: &SwapError) {
    let mut labels = swap_labels(venue, token_from, token_to);
    labels.push((ERROR_KIND_TAG.to_string(), error.kind().to_string()));
    metrics::counter!(SWAP_FAILURES_METRIC_NAME, &labels).increment(1);
}

/// Record an approval transaction submitted to the given venue's router
pub fn record_approval_submitted(venue: &str) {
    metrics::counter!(APPROVALS_SUBMITTED_METRIC_NAME, VENUE_TAG => venue.to_string()).increment(1);
}

/// Record a history write that failed to persist
pub fn record_history_write_failure() {
    metrics::counter!(HISTORY_WRITE_FAILURES_METRIC_NAME).increment(1);
}
