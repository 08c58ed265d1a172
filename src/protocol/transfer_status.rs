use serde::{Deserialize, Serialize};
use std::fmt;

/// On-chain status of a bridge transfer, as reported by `getTransactionStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    /// The contract has no record of the transfer.
    Unknown,
    Pending,
    Completed,
    Failed,
}

impl TransferStatus {
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl From<u8> for TransferStatus {
    fn from(raw: u8) -> Self {
        match raw {
            1 => Self::Pending,
            2 => Self::Completed,
            3 => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
