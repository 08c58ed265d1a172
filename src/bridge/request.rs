use alloy_primitives::{Address, TxHash, U256};
use bon::Builder;

use crate::chain::{BridgeChain, TokenSymbol};

/// A user's request to move tokens between chains.
///
/// `amount` is kept as the decimal string the user typed; it is parsed
/// against the token's decimals during validation.
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct BridgeRequest {
    source_chain: BridgeChain,
    destination_chain: BridgeChain,
    token: TokenSymbol,
    #[builder(into)]
    amount: String,
    requester: Address,
}

impl BridgeRequest {
    pub fn source_chain(&self) -> BridgeChain {
        self.source_chain
    }

    pub fn destination_chain(&self) -> BridgeChain {
        self.destination_chain
    }

    pub fn token(&self) -> TokenSymbol {
        self.token
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn requester(&self) -> Address {
        self.requester
    }
}

/// A request that passed every pre-flight check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTransfer {
    pub request: BridgeRequest,
    /// Source-chain token contract.
    pub token_address: Address,
    /// Source-chain bridge contract.
    pub bridge_address: Address,
    /// Requested amount in the token's base units.
    pub amount: U256,
    pub balance: U256,
}

/// Outcome of a completed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionResult {
    pub approve_tx: TxHash,
    pub bridge_tx: TxHash,
    /// Amount bridged, in base units.
    pub amount: U256,
    pub bridge_block: Option<u64>,
    /// Transfer id from the `BridgeInitiated` event, if the contract emitted one.
    pub transfer_id: Option<TxHash>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_request_builder() {
        let request = BridgeRequest::builder()
            .source_chain(BridgeChain::Ethereum)
            .destination_chain(BridgeChain::Avalanche)
            .token(TokenSymbol::Usdc)
            .amount("1.5")
            .requester(Address::ZERO)
            .build();

        assert_eq!(request.source_chain(), BridgeChain::Ethereum);
        assert_eq!(request.destination_chain(), BridgeChain::Avalanche);
        assert_eq!(request.token(), TokenSymbol::Usdc);
        assert_eq!(request.amount(), "1.5");
        assert_eq!(request.requester(), Address::ZERO);
    }
}
