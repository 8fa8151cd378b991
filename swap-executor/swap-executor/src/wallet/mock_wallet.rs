//! A mock wallet implementation for testing

use std::collections::{HashMap, HashSet};

use alloy_primitives::{keccak256, Address, TxHash, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::abis::IERC20;

use super::{error::WalletError, ReceiptOutcome, WalletCall, WalletCapability};

/// The gas reported for every mined mock transaction
pub const MOCK_GAS_USED: u64 = 150_000;

// ---------
// | Types |
// ---------

/// How the mock responds to a chain switch request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchBehavior {
    /// Switch to the requested chain
    Succeed,
    /// Reject the switch request
    Reject,
    /// Never respond to the switch request
    Hang,
}

/// The mutable state of the mock wallet
struct MockWalletState {
    /// The connected account
    account: Option<Address>,
    /// The current chain
    chain_id: u64,
    /// The response to chain switch requests
    switch_behavior: SwitchBehavior,
    /// Allowances keyed by `(token, owner, spender)`
    allowances: HashMap<(Address, Address, Address), U256>,
    /// Native balances keyed by owner
    native_balances: HashMap<Address, U256>,
    /// ERC20 balances keyed by `(token, owner)`
    erc20_balances: HashMap<(Address, Address), U256>,
    /// Whether submissions are declined
    reject_submissions: bool,
    /// Call targets whose transactions revert
    reverting_targets: HashSet<Address>,
    /// Every call submitted, in order
    submitted: Vec<WalletCall>,
    /// The receipt status of every submitted transaction
    receipts: HashMap<TxHash, bool>,
}

// ---------------
// | Mock Wallet |
// ---------------

/// A mock wallet used for testing
///
/// Submitted approvals update the recorded allowance once mined, so a
/// second swap of the same token observes the first approval
pub struct MockWallet {
    /// The wallet state, wrapped in a mutex for thread-safe mutable access
    state: Mutex<MockWalletState>,
}

impl MockWallet {
    /// Create a mock wallet with the given account on the given chain
    pub fn new(account: Option<Address>, chain_id: u64) -> Self {
        let state = MockWalletState {
            account,
            chain_id,
            switch_behavior: SwitchBehavior::Succeed,
            allowances: HashMap::new(),
            native_balances: HashMap::new(),
            erc20_balances: HashMap::new(),
            reject_submissions: false,
            reverting_targets: HashSet::new(),
            submitted: Vec::new(),
            receipts: HashMap::new(),
        };

        Self { state: Mutex::new(state) }
    }

    /// Set the response to chain switch requests
    pub fn with_switch_behavior(mut self, behavior: SwitchBehavior) -> Self {
        self.state.get_mut().switch_behavior = behavior;
        self
    }

    /// Set an existing allowance
    pub fn with_allowance(
        mut self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Self {
        self.state.get_mut().allowances.insert((token, owner, spender), amount);
        self
    }

    /// Set a native balance
    pub fn with_native_balance(mut self, owner: Address, amount: U256) -> Self {
        self.state.get_mut().native_balances.insert(owner, amount);
        self
    }

    /// Set an ERC20 balance
    pub fn with_erc20_balance(mut self, token: Address, owner: Address, amount: U256) -> Self {
        self.state.get_mut().erc20_balances.insert((token, owner), amount);
        self
    }

    /// Decline every submission
    pub fn rejecting_submissions(mut self) -> Self {
        self.state.get_mut().reject_submissions = true;
        self
    }

    /// Revert every transaction sent to the given target
    pub fn reverting_calls_to(mut self, target: Address) -> Self {
        self.state.get_mut().reverting_targets.insert(target);
        self
    }

    /// All submitted calls, in order
    pub async fn submitted_calls(&self) -> Vec<WalletCall> {
        self.state.lock().await.submitted.clone()
    }
}

// -------------------------------
// | Wallet Trait Implementation |
// -------------------------------

#[async_trait]
impl WalletCapability for MockWallet {
    async fn account(&self) -> Option<Address> {
        self.state.lock().await.account
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        Ok(self.state.lock().await.chain_id)
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
        let behavior = self.state.lock().await.switch_behavior;
        match behavior {
            SwitchBehavior::Succeed => {
                self.state.lock().await.chain_id = chain_id;
                Ok(())
            },
            SwitchBehavior::Reject => Err(WalletError::rejected("user rejected chain switch")),
            SwitchBehavior::Hang => std::future::pending().await,
        }
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, WalletError> {
        let state = self.state.lock().await;
        Ok(state.allowances.get(&(token, owner, spender)).copied().unwrap_or_default())
    }

    async fn native_balance(&self, owner: Address) -> Result<U256, WalletError> {
        let state = self.state.lock().await;
        Ok(state.native_balances.get(&owner).copied().unwrap_or_default())
    }

    async fn erc20_balance(&self, token: Address, owner: Address) -> Result<U256, WalletError> {
        let state = self.state.lock().await;
        Ok(state.erc20_balances.get(&(token, owner)).copied().unwrap_or_default())
    }

    async fn submit(&self, call: WalletCall) -> Result<TxHash, WalletError> {
        let mut state = self.state.lock().await;
        if state.reject_submissions {
            return Err(WalletError::rejected("user rejected transaction"));
        }

        let nonce = state.submitted.len() as u64;
        let tx_hash = keccak256(nonce.to_be_bytes());
        let success = !state.reverting_targets.contains(&call.to);

        // A mined approval updates the allowance
        let approval = IERC20::approveCall::abi_decode(&call.data).ok().filter(|_| success);
        if let (Some(approve), Some(owner)) = (approval, state.account) {
            state.allowances.insert((call.to, owner, approve.spender), approve.value);
        }

        state.receipts.insert(tx_hash, success);
        state.submitted.push(call);
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<ReceiptOutcome, WalletError> {
        let state = self.state.lock().await;
        let success = state
            .receipts
            .get(&tx_hash)
            .copied()
            .ok_or_else(|| WalletError::rpc(format!("unknown transaction {tx_hash:#x}")))?;

        Ok(ReceiptOutcome { tx_hash, success, gas_used: MOCK_GAS_USED, block_number: Some(1) })
    }
}
