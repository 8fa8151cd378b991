//! The swap state machine
//!
//! A swap advances by applying discrete events to the current state. The
//! transition function is pure; the tracker publishes each accepted state to
//! its subscribers

use std::fmt::{self, Display};

use alloy_primitives::TxHash;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::SwapError;

/// The step label while waiting for the swap to be signed and sent
const STEP_SUBMITTING: &str = "submitting swap";
/// The step label while waiting for the swap to be mined
const STEP_CONFIRMING: &str = "waiting for confirmation";

// ---------
// | Types |
// ---------

/// The status of a swap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SwapStatus {
    /// No swap is in progress
    #[default]
    Idle,
    /// An approval is being checked or submitted
    Approving,
    /// The router holds a sufficient allowance
    Approved,
    /// The swap transaction is being submitted
    Swapping,
    /// The swap transaction is waiting to be mined
    Confirming,
    /// The swap was confirmed
    Success,
    /// The swap failed
    Error,
}

impl SwapStatus {
    /// Whether the swap has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

impl Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Approving => "approving",
            Self::Approved => "approved",
            Self::Swapping => "swapping",
            Self::Confirming => "confirming",
            Self::Success => "success",
            Self::Error => "error",
        };
        write!(f, "{s}")
    }
}

/// A snapshot of a swap's progress
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapState {
    /// The status of the swap
    pub status: SwapStatus,
    /// A human readable label of the current step
    pub step: Option<String>,
    /// The error that ended the swap, set only in the error status
    pub error: Option<SwapError>,
    /// The hash of the swap transaction, once submitted
    pub tx_hash: Option<TxHash>,
}

/// An event advancing a swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapEvent {
    /// Relabel the current step without changing status
    Progress(String),
    /// An approval step began
    Approving(String),
    /// The allowance is sufficient
    Approved,
    /// The swap is being submitted
    Swapping,
    /// The swap was submitted with the given hash
    Submitted(TxHash),
    /// The swap was confirmed
    Confirmed,
    /// The swap failed
    Failed(SwapError),
    /// Return a finished swap to idle
    Reset,
}

impl SwapState {
    /// The state following the given event, or `None` if the event is illegal
    /// in the current state
    pub fn transition(&self, event: &SwapEvent) -> Option<SwapState> {
        use SwapStatus::*;

        let next = match (self.status, event) {
            (status, SwapEvent::Progress(step)) if !status.is_terminal() => {
                SwapState { step: Some(step.clone()), ..self.clone() }
            },
            (Idle | Approving, SwapEvent::Approving(step)) => {
                SwapState { status: Approving, step: Some(step.clone()), ..self.clone() }
            },
            (Approving, SwapEvent::Approved) => {
                SwapState { status: Approved, step: None, ..self.clone() }
            },
            (Idle | Approving | Approved, SwapEvent::Swapping) => SwapState {
                status: Swapping,
                step: Some(STEP_SUBMITTING.to_string()),
                ..self.clone()
            },
            (Swapping, SwapEvent::Submitted(tx_hash)) => SwapState {
                status: Confirming,
                step: Some(STEP_CONFIRMING.to_string()),
                error: None,
                tx_hash: Some(*tx_hash),
            },
            (Confirming, SwapEvent::Confirmed) => {
                SwapState { status: Success, step: None, ..self.clone() }
            },
            // The hash is kept, the transaction may still land
            (status, SwapEvent::Failed(err)) if !status.is_terminal() => SwapState {
                status: Error,
                step: None,
                error: Some(err.clone()),
                tx_hash: self.tx_hash,
            },
            (Success | Error, SwapEvent::Reset) => SwapState::default(),
            _ => return None,
        };

        Some(next)
    }
}

// -----------
// | Tracker |
// -----------

/// Holds the live swap state and publishes it to subscribers
#[derive(Debug)]
pub struct SwapTracker {
    /// The sending half of the state channel
    sender: watch::Sender<SwapState>,
}

impl Default for SwapTracker {
    fn default() -> Self {
        let (sender, _) = watch::channel(SwapState::default());
        Self { sender }
    }
}

impl SwapTracker {
    /// A snapshot of the current state
    pub fn state(&self) -> SwapState {
        self.sender.borrow().clone()
    }

    /// Subscribe to state updates
    pub fn subscribe(&self) -> watch::Receiver<SwapState> {
        self.sender.subscribe()
    }

    /// Apply an event, returning whether it was accepted
    #[allow(clippy::needless_pass_by_value)]
    pub fn apply(&self, event: SwapEvent) -> bool {
        let current = self.state();
        let Some(next) = current.transition(&event) else {
            warn!(status = %current.status, ?event, "ignoring illegal swap state transition");
            return false;
        };

        debug!(from = %current.status, to = %next.status, "swap state transition");
        self.sender.send_replace(next);
        true
    }
}
