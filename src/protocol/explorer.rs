use serde::{Deserialize, Serialize};

/// Envelope used by the `/stats/*` endpoints.
///
/// A present `error` means the backend could not produce `data`; the client
/// turns it into [`SnowprintError::Api`](crate::SnowprintError::Api).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseResponse<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    pub block_number: u64,
    /// Gas price in wei, as a decimal string.
    pub gas_price: String,
    pub tps: f64,
    pub active_addresses: u64,
    pub total_transactions24h: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub number: u64,
    pub hash: String,
    /// Unix seconds.
    pub timestamp: u64,
    pub transactions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub hash: String,
    pub from: String,
    /// `None` for contract creations.
    pub to: Option<String>,
    pub value: String,
    pub timestamp: u64,
    pub block_number: u64,
    pub gas_used: String,
    pub status: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossChainStatus {
    Completed,
    Pending,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossChainKind {
    Bridge,
    Swap,
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossChainTx {
    pub source_chain: String,
    pub destination_chain: String,
    pub hash: String,
    pub timestamp: u64,
    pub amount: String,
    pub token: String,
    pub status: CrossChainStatus,
    #[serde(rename = "type")]
    pub kind: CrossChainKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    Active,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: ProposalStatus,
    pub voting_ends: String,
    pub votes_for: u64,
    pub votes_against: u64,
    pub proposer: String,
    pub link: String,
}

/// Body of `GET /community/proposals`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalsResponse {
    pub total_active: u64,
    pub proposals: Vec<Proposal>,
    /// Unix milliseconds.
    pub last_updated: u64,
}

impl ProposalsResponse {
    pub fn active(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals
            .iter()
            .filter(|p| p.status == ProposalStatus::Active)
    }
}
