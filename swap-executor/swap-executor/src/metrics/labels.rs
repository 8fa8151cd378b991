//! Constants for metric labels and metric names

/// Metric counting swap attempts that passed the idle check
pub const SWAP_ATTEMPTS_METRIC_NAME: &str = "swap_attempts";

/// Metric counting swaps confirmed on-chain
pub const SWAP_SUCCESSES_METRIC_NAME: &str = "swap_successes";

/// Metric counting swaps that ended in an error
pub const SWAP_FAILURES_METRIC_NAME: &str = "swap_failures";

/// Metric counting approval transactions submitted ahead of a swap
pub const APPROVALS_SUBMITTED_METRIC_NAME: &str = "approvals_submitted";

/// Metric for the gas used by a confirmed swap transaction
pub const SWAP_GAS_USED_METRIC_NAME: &str = "swap_gas_used";

/// Metric counting history writes that failed to persist
pub const HISTORY_WRITE_FAILURES_METRIC_NAME: &str = "history_write_failures";

/// Metric tag for the venue that executed a swap
pub const VENUE_TAG: &str = "venue";

/// Metric tag for the kind of error that ended a swap
pub const ERROR_KIND_TAG: &str = "error_kind";

/// Metric tag for the trading pair, as `<from>/<to>`
pub const PAIR_TAG: &str = "pair";
