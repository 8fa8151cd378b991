//! The CLI for the swap executor

use std::{path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::{
    error::SwapError,
    orchestrator::OrchestratorSettings,
    wallet::rpc_wallet::RpcWalletConfig,
};

/// Executes quoted token swaps against DEX routers
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    // --- Services --- //
    /// The base URL of the aggregator backend, serving quotes and the
    /// contracts configuration
    #[arg(long, env = "BACKEND_URL", default_value = "http://localhost:8000")]
    pub backend_url: String,
    /// The RPC URL for blockchain interaction
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: Option<String>,
    /// The private key of the trading account
    ///
    /// Without one the wallet is disconnected
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    // --- Execution --- //
    /// The chain swaps must execute on
    #[arg(long, env = "CHAIN_ID", default_value_t = 42161)]
    pub chain_id: u64,
    /// The bound on a chain switch request, in seconds
    #[arg(long, env = "CHAIN_SWITCH_TIMEOUT_SECS", default_value_t = 30)]
    pub chain_switch_timeout_secs: u64,
    /// The interval at which transaction receipts are polled, in milliseconds
    #[arg(long, env = "RECEIPT_POLL_INTERVAL_MS", default_value_t = 1000)]
    pub receipt_poll_interval_ms: u64,

    // --- Storage --- //
    /// The directory in which the swap history is stored
    #[arg(long, env = "HISTORY_DIR", default_value = ".swap-executor")]
    pub history_dir: PathBuf,

    // --- Telemetry --- //
    /// Whether to emit JSON formatted logs
    #[arg(long, env = "JSON_LOGS")]
    pub json_logs: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The commands of the swap executor
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch the ranked quote options for a swap
    Quote {
        /// The symbol of the token to sell
        #[arg(long)]
        from: String,
        /// The symbol of the token to buy
        #[arg(long)]
        to: String,
        /// The amount to sell, in whole units
        #[arg(long)]
        amount: f64,
    },
    /// Quote and execute a swap
    Swap {
        /// The symbol of the token to sell
        #[arg(long)]
        from: String,
        /// The symbol of the token to buy
        #[arg(long)]
        to: String,
        /// The amount to sell, in whole units
        #[arg(long)]
        amount: f64,
        /// The index of the quote option to execute, the best is 0
        #[arg(long, default_value_t = 0)]
        option_index: usize,
    },
    /// Show the connected account's balance of a token
    Balance {
        /// The token symbol
        symbol: String,
    },
    /// Inspect or clear the swap history
    History {
        /// The history command
        #[command(subcommand)]
        command: HistoryCommand,
    },
}

/// The history subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List recorded swaps, newest first
    List {
        /// Only swaps selling this token
        #[arg(long)]
        from: Option<String>,
        /// Only swaps buying this token
        #[arg(long)]
        to: Option<String>,
        /// Only swaps executed on this venue
        #[arg(long)]
        dex: Option<String>,
    },
    /// Remove every recorded swap
    Clear,
}

impl Cli {
    /// Configure logging from the CLI
    pub fn configure_telemetry(&self) {
        let filter =
            EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy();
        let fmt_layer = fmt::layer().with_file(true).with_line_number(true);
        let registry = tracing_subscriber::registry().with(filter);

        if self.json_logs {
            registry.with(fmt_layer.json().flatten_event(true)).init();
        } else {
            registry.with(fmt_layer).init();
        }
    }

    /// The orchestrator settings
    pub fn orchestrator_settings(&self) -> OrchestratorSettings {
        OrchestratorSettings {
            target_chain_id: self.chain_id,
            chain_switch_timeout: Duration::from_secs(self.chain_switch_timeout_secs),
        }
    }

    /// The wallet configuration, requiring an RPC URL
    pub fn wallet_config(&self) -> Result<RpcWalletConfig, SwapError> {
        let rpc_url = self
            .rpc_url
            .clone()
            .ok_or_else(|| SwapError::unknown("RPC_URL is required for this command"))?;

        Ok(RpcWalletConfig {
            rpc_url,
            private_key: self.private_key.clone(),
            receipt_poll_interval: Duration::from_millis(self.receipt_poll_interval_ms),
        })
    }
}
