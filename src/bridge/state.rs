use std::fmt;

/// Progress of a bridge submission.
///
/// ```text
/// Idle -> EstimatingGas -> AwaitingApproval -> ApprovalPending
///      -> AwaitingBridgeCall -> BridgePending -> Completed
/// ```
///
/// Any step may end in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BridgeTransactionState {
    #[default]
    Idle,
    EstimatingGas,
    AwaitingApproval,
    /// Approve broadcast, waiting for one confirmation.
    ApprovalPending,
    AwaitingBridgeCall,
    /// Bridge call broadcast, waiting for one confirmation.
    BridgePending,
    Completed,
    Failed(String),
}

impl BridgeTransactionState {
    /// `true` while a submission is between `Idle` and a terminal state.
    pub fn is_in_flight(&self) -> bool {
        !matches!(self, Self::Idle | Self::Completed | Self::Failed(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed(_))
    }

    /// Failure reason, if the submission failed.
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

impl fmt::Display for BridgeTransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::EstimatingGas => write!(f, "Estimating gas"),
            Self::AwaitingApproval => write!(f, "Awaiting approval"),
            Self::ApprovalPending => write!(f, "Approval pending"),
            Self::AwaitingBridgeCall => write!(f, "Awaiting bridge call"),
            Self::BridgePending => write!(f, "Bridge pending"),
            Self::Completed => write!(f, "Completed"),
            Self::Failed(reason) => write!(f, "Failed: {reason}"),
        }
    }
}
