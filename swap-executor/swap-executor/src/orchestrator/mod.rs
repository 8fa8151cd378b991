//! The swap orchestrator
//!
//! Sequences a single swap: chain validation, the allowance gate, route
//! encoding, submission, confirmation, and history recording. Progress and
//! the terminal outcome are reported through the swap state rather than as
//! errors

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use swap_executor_api::{exchange::QuoteOption, history::HistoryEntry};
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

use crate::{
    allowance::AllowanceGate,
    contracts_config::ContractsConfigResolver,
    error::SwapError,
    history::{entry_for_swap, HistoryStore},
    metrics::{record_swap_attempt, record_swap_failure, record_swap_success},
    route_encoder::encode,
    units::to_atoms,
    wallet::DynWallet,
};

use self::state::{SwapEvent, SwapState, SwapStatus, SwapTracker};

pub mod state;

// -------------
// | Constants |
// -------------

/// The default chain swaps execute on, Arbitrum One
pub const DEFAULT_CHAIN_ID: u64 = 42161;
/// The default bound on a chain switch request
pub const DEFAULT_CHAIN_SWITCH_TIMEOUT: Duration = Duration::from_secs(30);

/// The step label while switching chains
const STEP_SWITCHING: &str = "switching network";
/// The error message when the configuration has not been resolved
const ERR_CONFIG_NOT_LOADED: &str = "configuration not loaded";

// ---------
// | Types |
// ---------

/// A request to execute a quoted swap
#[derive(Debug, Clone, PartialEq)]
pub struct SwapRequest {
    /// The selected quote
    pub option: QuoteOption,
    /// The symbol of the token sold
    pub token_from: String,
    /// The symbol of the token bought
    pub token_to: String,
    /// The amount sold, in whole units
    pub amount: f64,
}

/// Orchestrator settings
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorSettings {
    /// The chain swaps must execute on
    pub target_chain_id: u64,
    /// The bound on a chain switch request
    pub chain_switch_timeout: Duration,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            target_chain_id: DEFAULT_CHAIN_ID,
            chain_switch_timeout: DEFAULT_CHAIN_SWITCH_TIMEOUT,
        }
    }
}

/// The unsuccessful control flow branches of a swap run
#[derive(Debug, Clone)]
enum SwapControlFlow {
    /// A step already moved the tracker to the error status
    Aborted,
    /// Fail the swap with the given error
    Error(SwapError),
}

impl From<SwapError> for SwapControlFlow {
    fn from(e: SwapError) -> Self {
        SwapControlFlow::Error(e)
    }
}

// ----------------
// | Orchestrator |
// ----------------

/// Executes swaps for a single wallet session
pub struct SwapOrchestrator {
    /// The wallet through which all on-chain interaction flows
    wallet: DynWallet,
    /// The session's contracts configuration
    config: Arc<ContractsConfigResolver>,
    /// The approval driver
    allowance_gate: AllowanceGate,
    /// The log of confirmed swaps
    history: Arc<HistoryStore>,
    /// The live swap state
    tracker: SwapTracker,
    /// The orchestrator settings
    settings: OrchestratorSettings,
}

impl SwapOrchestrator {
    /// Constructor
    pub fn new(
        wallet: DynWallet,
        config: Arc<ContractsConfigResolver>,
        history: Arc<HistoryStore>,
        settings: OrchestratorSettings,
    ) -> Self {
        let allowance_gate = AllowanceGate::new(wallet.clone());
        Self { wallet, config, allowance_gate, history, tracker: SwapTracker::default(), settings }
    }

    /// A snapshot of the current swap state
    pub fn state(&self) -> SwapState {
        self.tracker.state()
    }

    /// Subscribe to swap state updates
    pub fn subscribe(&self) -> watch::Receiver<SwapState> {
        self.tracker.subscribe()
    }

    /// Return a finished swap to idle
    #[allow(clippy::needless_pass_by_ref_mut)]
    pub fn reset(&mut self) {
        self.tracker.apply(SwapEvent::Reset);
    }

    /// Execute a quoted swap, returning its terminal state
    ///
    /// Never fails; errors are reported in the returned state. A call while a
    /// previous swap has not been reset is ignored
    #[allow(clippy::needless_pass_by_ref_mut)]
    #[instrument(skip_all, fields(dex = %option.dex, %token_from, %token_to, %amount))]
    pub async fn execute(
        &mut self,
        option: QuoteOption,
        token_from: &str,
        token_to: &str,
        amount: f64,
    ) -> SwapState {
        let current = self.tracker.state();
        if current.status != SwapStatus::Idle {
            warn!(status = %current.status, "swap already in progress or awaiting reset");
            return current;
        }

        let request = SwapRequest {
            option,
            token_from: token_from.to_string(),
            token_to: token_to.to_string(),
            amount,
        };
        let venue = request.option.dex.clone();
        record_swap_attempt(&venue, token_from, token_to);

        match self.run(&request).await {
            Ok((entry, gas_used)) => {
                self.history.append(entry).await;
                self.tracker.apply(SwapEvent::Confirmed);
                record_swap_success(&venue, token_from, token_to, gas_used);
                info!("swap confirmed");
            },
            Err(flow) => {
                if let SwapControlFlow::Error(e) = flow {
                    self.tracker.apply(SwapEvent::Failed(e));
                }

                let state = self.tracker.state();
                if let Some(e) = &state.error {
                    record_swap_failure(&venue, token_from, token_to, e);
                    error!("swap failed: {e}");
                }
            },
        }

        self.tracker.state()
    }

    /// Run a swap through to confirmation, returning the record to persist
    /// and the gas used by the swap transaction
    async fn run(&self, request: &SwapRequest) -> Result<(HistoryEntry, u64), SwapControlFlow> {
        let user = self.wallet.account().await.ok_or(SwapError::WalletNotConnected)?;
        self.ensure_chain().await?;

        let config =
            self.config.get().ok_or_else(|| SwapError::config_unavailable(ERR_CONFIG_NOT_LOADED))?;
        let SwapRequest { option, token_from, token_to, amount } = request;
        config.validate_request(token_from, token_to, &option.dex)?;

        let amount_in = to_atoms(*amount, config.decimals(token_from))?;
        let approved = self
            .allowance_gate
            .ensure_allowance(&config, token_from, &option.dex, amount_in, &self.tracker)
            .await;
        if !approved {
            return Err(SwapControlFlow::Aborted);
        }

        let now = Utc::now();
        let plan = encode(request, &config, user, now.timestamp().max(0) as u64)?;
        self.tracker.apply(SwapEvent::Swapping);
        info!(
            router = %plan.target,
            function = plan.function_name(),
            value = %plan.native_value,
            "submitting swap"
        );

        let tx_hash =
            self.wallet.submit(plan.to_wallet_call()).await.map_err(SwapError::from_submission)?;
        self.tracker.apply(SwapEvent::Submitted(tx_hash));
        info!("swap submitted: {tx_hash:#x}");

        let receipt = self.wallet.wait_for_receipt(tx_hash).await.map_err(SwapError::unknown)?;
        if !receipt.success {
            let msg = format!("swap {tx_hash:#x} reverted");
            return Err(SwapError::TransactionReverted(msg).into());
        }

        info!(gas_used = receipt.gas_used, block = ?receipt.block_number, "swap mined");
        let entry = entry_for_swap(request, tx_hash, Utc::now().timestamp_millis());
        Ok((entry, receipt.gas_used))
    }

    /// Ensure the wallet is on the target chain, switching if needed
    async fn ensure_chain(&self) -> Result<(), SwapError> {
        let target = self.settings.target_chain_id;
        let current = self.wallet.chain_id().await.map_err(SwapError::unknown)?;
        if current == target {
            return Ok(());
        }

        info!("wallet on chain {current}, switching to {target}");
        self.tracker.apply(SwapEvent::Approving(STEP_SWITCHING.to_string()));
        let switch = self.wallet.switch_chain(target);
        match tokio::time::timeout(self.settings.chain_switch_timeout, switch).await {
            Ok(Ok(())) => {},
            Ok(Err(e)) => {
                warn!("chain switch failed: {e}");
                return Err(SwapError::wrong_network(format!("chain {target}, switch failed")));
            },
            Err(_) => {
                let msg = format!("chain {target}, switch timed out");
                return Err(SwapError::wrong_network(msg));
            },
        }

        // A wallet may accept the request without switching
        let current = self.wallet.chain_id().await.map_err(SwapError::unknown)?;
        if current != target {
            return Err(SwapError::wrong_network(format!("chain {target}, wallet on {current}")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;
    use alloy_sol_types::SolCall;
    use swap_executor_api::history::HistoryStatus;

    use super::*;
    use crate::{
        abis::{IERC20, ISwapRouter},
        contracts_config::test_helpers::*,
        history::{backend::MemoryBackend, test_helpers::FaultyBackend},
        test_helpers::{mock_option, USER},
        wallet::mock_wallet::{MockWallet, SwitchBehavior},
    };

    /// The chain swaps target in tests
    const CHAIN_ID: u64 = 42161;

    /// The pieces of an orchestrator under test
    struct Harness {
        /// The orchestrator
        orchestrator: SwapOrchestrator,
        /// The wallet it drives
        wallet: Arc<MockWallet>,
        /// The history it writes
        history: Arc<HistoryStore>,
    }

    /// Build an orchestrator over the given wallet
    async fn harness(wallet: MockWallet, load_config: bool) -> Harness {
        let history = HistoryStore::new(Box::<MemoryBackend>::default());
        harness_with_history(wallet, load_config, history).await
    }

    /// Build an orchestrator over the given wallet and history
    async fn harness_with_history(
        wallet: MockWallet,
        load_config: bool,
        history: HistoryStore,
    ) -> Harness {
        let wallet = Arc::new(wallet);
        let resolver = Arc::new(ContractsConfigResolver::new(Box::new(StaticConfigSource)));
        if load_config {
            resolver.resolve().await.unwrap();
        }

        let history = Arc::new(history);
        let settings = OrchestratorSettings {
            target_chain_id: CHAIN_ID,
            chain_switch_timeout: Duration::from_millis(50),
        };
        let orchestrator =
            SwapOrchestrator::new(wallet.clone(), resolver, history.clone(), settings);

        Harness { orchestrator, wallet, history }
    }

    /// A connected wallet on the target chain
    fn connected_wallet() -> MockWallet {
        MockWallet::new(Some(USER), CHAIN_ID)
    }

    /// Tests a native input swap end to end
    #[tokio::test]
    async fn test_native_swap() {
        let mut h = harness(connected_wallet(), true).await;
        let option = mock_option("Uniswap", 0.0005, 1.0, 4275.67);

        let state = h.orchestrator.execute(option, "ETH", "USDT", 1.0).await;
        assert_eq!(state.status, SwapStatus::Success);
        assert_eq!(state.error, None);

        // No approval, a single swap carrying the native value
        let calls = h.wallet.submitted_calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].to, UNISWAP_ROUTER);
        assert_eq!(calls[0].value, U256::from(10u64.pow(18)));

        let entries = h.history.list().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, HistoryStatus::Success);
        assert_eq!(Some(entries[0].tx_hash), state.tx_hash);
        assert_eq!(entries[0].token_from, "ETH");
        assert_eq!(entries[0].dex, "Uniswap");
    }

    /// Tests a token input swap that needs an approval first
    #[tokio::test]
    async fn test_token_swap_with_approval() {
        let mut h = harness(connected_wallet(), true).await;
        let option = mock_option("Uniswap", 0.0005, 1000., 0.2335);

        let state = h.orchestrator.execute(option, "USDT", "ETH", 1000.).await;
        assert_eq!(state.status, SwapStatus::Success);

        let calls = h.wallet.submitted_calls().await;
        assert_eq!(calls.len(), 2);

        let approve = IERC20::approveCall::abi_decode(&calls[0].data).unwrap();
        assert_eq!(calls[0].to, USDT_ADDRESS);
        assert_eq!(approve.spender, UNISWAP_ROUTER);
        assert_eq!(approve.value, U256::from(1_000_000_000u64));

        let batch = ISwapRouter::multicallCall::abi_decode(&calls[1].data).unwrap();
        assert_eq!(calls[1].to, UNISWAP_ROUTER);
        assert_eq!(calls[1].value, U256::ZERO);
        assert_eq!(batch.data.len(), 2);
        assert_eq!(h.history.list().await.len(), 1);
    }

    /// Tests that a history write failure does not fail a confirmed swap
    #[tokio::test]
    async fn test_history_write_failure() {
        let history = HistoryStore::new(Box::new(FaultyBackend::failing_mutations()));
        let mut h = harness_with_history(connected_wallet(), true, history).await;
        let option = mock_option("Uniswap", 0.0005, 1.0, 4275.67);

        let state = h.orchestrator.execute(option, "ETH", "USDT", 1.0).await;
        assert_eq!(state.status, SwapStatus::Success);
        assert_eq!(state.error, None);
        assert!(state.tx_hash.is_some());
        assert!(h.history.list().await.is_empty());
    }

    /// Tests that a reverted swap records no history and keeps its hash
    #[tokio::test]
    async fn test_reverted_swap() {
        let wallet = connected_wallet().reverting_calls_to(UNISWAP_ROUTER);
        let mut h = harness(wallet, true).await;
        let option = mock_option("Uniswap", 0.0005, 1.0, 4275.67);

        let state = h.orchestrator.execute(option, "ETH", "USDT", 1.0).await;
        assert_eq!(state.status, SwapStatus::Error);
        assert!(matches!(state.error, Some(SwapError::TransactionReverted(_))));
        assert!(state.tx_hash.is_some());
        assert!(h.history.list().await.is_empty());
    }

    /// Tests that a declined swap is reported as rejected
    #[tokio::test]
    async fn test_rejected_submission() {
        let mut h = harness(connected_wallet().rejecting_submissions(), true).await;
        let option = mock_option("Uniswap", 0.0005, 1.0, 4275.67);

        let state = h.orchestrator.execute(option, "ETH", "USDT", 1.0).await;
        assert!(matches!(state.error, Some(SwapError::SubmissionRejected(_))));
        assert_eq!(state.tx_hash, None);
        assert!(h.history.list().await.is_empty());
    }

    /// Tests that a declined approval aborts before the swap
    #[tokio::test]
    async fn test_rejected_approval() {
        let mut h = harness(connected_wallet().rejecting_submissions(), true).await;
        let option = mock_option("Uniswap", 0.0005, 1000., 0.2335);

        let state = h.orchestrator.execute(option, "USDT", "ETH", 1000.).await;
        assert_eq!(state.status, SwapStatus::Error);
        assert!(matches!(state.error, Some(SwapError::ApprovalRejected(_))));
        assert!(h.wallet.submitted_calls().await.is_empty());
        assert!(h.history.list().await.is_empty());
    }

    /// Tests that a disconnected wallet fails the swap
    #[tokio::test]
    async fn test_wallet_not_connected() {
        let mut h = harness(MockWallet::new(None, CHAIN_ID), true).await;
        let option = mock_option("Uniswap", 0.0005, 1.0, 4275.67);

        let state = h.orchestrator.execute(option, "ETH", "USDT", 1.0).await;
        assert_eq!(state.status, SwapStatus::Error);
        assert_eq!(state.error, Some(SwapError::WalletNotConnected));
    }

    /// Tests chain switching on success, rejection, and timeout
    #[tokio::test]
    async fn test_chain_switch() {
        let option = mock_option("Uniswap", 0.0005, 1.0, 4275.67);

        let wallet = MockWallet::new(Some(USER), 1);
        let mut h = harness(wallet, true).await;
        let state = h.orchestrator.execute(option.clone(), "ETH", "USDT", 1.0).await;
        assert_eq!(state.status, SwapStatus::Success);

        for behavior in [SwitchBehavior::Reject, SwitchBehavior::Hang] {
            let wallet = MockWallet::new(Some(USER), 1).with_switch_behavior(behavior);
            let mut h = harness(wallet, true).await;

            let state = h.orchestrator.execute(option.clone(), "ETH", "USDT", 1.0).await;
            assert!(matches!(state.error, Some(SwapError::WrongNetwork(_))));
            assert!(h.wallet.submitted_calls().await.is_empty());
        }
    }

    /// Tests that a run in progress is visible while the chain switches
    #[tokio::test]
    async fn test_switching_state() {
        let wallet = MockWallet::new(Some(USER), 1).with_switch_behavior(SwitchBehavior::Hang);
        let mut h = harness(wallet, true).await;
        let option = mock_option("Uniswap", 0.0005, 1.0, 4275.67);
        let mut rx = h.orchestrator.subscribe();

        let observe = async move {
            rx.changed().await.unwrap();
            rx.borrow_and_update().clone()
        };
        let (end, switching) =
            tokio::join!(h.orchestrator.execute(option, "ETH", "USDT", 1.0), observe);

        assert_eq!(switching.status, SwapStatus::Approving);
        assert_eq!(switching.step.as_deref(), Some("switching network"));
        assert!(matches!(end.error, Some(SwapError::WrongNetwork(_))));
    }

    /// Tests that the configuration must be resolved ahead of the swap
    #[tokio::test]
    async fn test_config_not_loaded() {
        let mut h = harness(connected_wallet(), false).await;
        let option = mock_option("Uniswap", 0.0005, 1.0, 4275.67);

        let state = h.orchestrator.execute(option, "ETH", "USDT", 1.0).await;
        assert_eq!(
            state.error,
            Some(SwapError::ConfigUnavailable("configuration not loaded".to_string()))
        );
    }

    /// Tests that an unknown venue fails fast
    #[tokio::test]
    async fn test_unknown_venue() {
        let mut h = harness(connected_wallet(), true).await;
        let option = mock_option("Balancer", 0.0005, 1000., 0.2335);

        let state = h.orchestrator.execute(option, "USDT", "ETH", 1000.).await;
        assert_eq!(state.error, Some(SwapError::UnknownVenue("Balancer".to_string())));
        assert!(h.wallet.submitted_calls().await.is_empty());
    }

    /// Tests that a finished swap must be reset before the next one
    #[tokio::test]
    async fn test_reset_between_swaps() {
        let mut h = harness(connected_wallet(), true).await;
        let option = mock_option("Uniswap", 0.0005, 1000., 0.2335);
        let mut rx = h.orchestrator.subscribe();

        let first = h.orchestrator.execute(option.clone(), "USDT", "ETH", 1000.).await;
        assert_eq!(first.status, SwapStatus::Success);
        assert_eq!(rx.borrow_and_update().status, SwapStatus::Success);

        // Ignored while awaiting reset
        let ignored = h.orchestrator.execute(option.clone(), "USDT", "ETH", 1000.).await;
        assert_eq!(ignored, first);
        assert_eq!(h.wallet.submitted_calls().await.len(), 2);

        h.orchestrator.reset();
        assert_eq!(h.orchestrator.state(), SwapState::default());

        // The first approval covers the second swap
        let second = h.orchestrator.execute(option, "USDT", "ETH", 1000.).await;
        assert_eq!(second.status, SwapStatus::Success);
        assert_eq!(h.wallet.submitted_calls().await.len(), 3);
        assert_eq!(h.history.list().await.len(), 2);
    }
}
