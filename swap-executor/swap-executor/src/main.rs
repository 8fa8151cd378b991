//! Entrypoint for the swap executor CLI
#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]
#![deny(unsafe_code)]

use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use swap_executor::{
    balances::token_balance,
    cli::{Cli, Command, HistoryCommand},
    contracts_config::{ContractsConfigResolver, HttpConfigSource},
    error::SwapError,
    history::{backend::FileBackend, HistoryFilter, HistoryStore},
    orchestrator::{state::SwapStatus, SwapOrchestrator},
    quote_client::QuoteClient,
    wallet::{rpc_wallet::RpcWallet, DynWallet},
};
use tracing::info;

// -----------
// | Helpers |
// -----------

/// Print a value as pretty JSON
fn print_json<T: Serialize>(value: &T) -> Result<(), SwapError> {
    let out = serde_json::to_string_pretty(value).map_err(SwapError::unknown)?;
    println!("{out}");
    Ok(())
}

/// Resolve the session's contracts configuration from the backend
async fn resolve_config(cli: &Cli) -> Result<Arc<ContractsConfigResolver>, SwapError> {
    let source = HttpConfigSource::new(cli.backend_url.clone())?;
    let resolver = Arc::new(ContractsConfigResolver::new(Box::new(source)));
    resolver.resolve().await?;
    Ok(resolver)
}

/// Connect the wallet described by the CLI
async fn connect_wallet(cli: &Cli) -> Result<DynWallet, SwapError> {
    let wallet = RpcWallet::new(cli.wallet_config()?).await.map_err(SwapError::unknown)?;
    Ok(Arc::new(wallet))
}

/// The swap history store
fn history_store(cli: &Cli) -> HistoryStore {
    HistoryStore::new(Box::new(FileBackend::new(cli.history_dir.clone())))
}

// ------------
// | Commands |
// ------------

/// Quote and execute a swap
async fn run_swap(
    cli: &Cli,
    from: &str,
    to: &str,
    amount: f64,
    option_index: usize,
) -> Result<(), SwapError> {
    let config = resolve_config(cli).await?;
    let wallet = connect_wallet(cli).await?;

    let quotes = QuoteClient::new(cli.backend_url.clone())?.get_quotes(from, to, amount).await?;
    let option = quotes.get(option_index).cloned().ok_or_else(|| {
        SwapError::quote_unavailable(format!("no quote option at index {option_index}"))
    })?;
    info!(dex = %option.dex, amount_to = option.amount_to, "selected quote option");

    let history = Arc::new(history_store(cli));
    let mut orchestrator =
        SwapOrchestrator::new(wallet, config, history, cli.orchestrator_settings());

    // Log progress as the swap advances
    let mut progress = orchestrator.subscribe();
    tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let state = progress.borrow_and_update().clone();
            info!(status = %state.status, step = ?state.step, "swap progress");
        }
    });

    let state = orchestrator.execute(option, from, to, amount).await;
    if let Some(tx_hash) = state.tx_hash {
        println!("tx: {tx_hash:#x}");
    }
    println!("status: {}", state.status);

    match state.error {
        Some(e) if state.status == SwapStatus::Error => Err(e),
        _ => Ok(()),
    }
}

/// Show the connected account's balance of a token
async fn run_balance(cli: &Cli, symbol: &str) -> Result<(), SwapError> {
    let config = resolve_config(cli).await?.resolve().await?;
    let wallet = connect_wallet(cli).await?;

    let balance = token_balance(wallet.as_ref(), &config, symbol).await?;
    println!("{} {symbol}", balance.formatted);
    Ok(())
}

// --------------
// | Entrypoint |
// --------------

#[tokio::main]
async fn main() -> Result<(), SwapError> {
    let cli = Cli::parse();
    cli.configure_telemetry();

    match &cli.command {
        Command::Quote { from, to, amount } => {
            let client = QuoteClient::new(cli.backend_url.clone())?;
            let quotes = client.get_quotes(from, to, *amount).await?;
            print_json(&quotes)
        },
        Command::Swap { from, to, amount, option_index } => {
            run_swap(&cli, from, to, *amount, *option_index).await
        },
        Command::Balance { symbol } => run_balance(&cli, symbol).await,
        Command::History { command: HistoryCommand::List { from, to, dex } } => {
            let filter =
                HistoryFilter { token_from: from.clone(), token_to: to.clone(), dex: dex.clone() };
            print_json(&history_store(&cli).filtered(&filter).await)
        },
        Command::History { command: HistoryCommand::Clear } => {
            history_store(&cli).clear().await;
            info!("cleared swap history");
            Ok(())
        },
    }
}
