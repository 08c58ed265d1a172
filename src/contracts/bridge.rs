//! Bridge contract bindings and wrapper
//!
//! This module contains the fixed ABI of the explorer's token bridge contract:
//! the payable `bridge` entry point, its read-only guards (pause flag and
//! per-token limits), fee quoting, transfer status and the lifecycle events.

use alloy_primitives::{Address, Bytes, FixedBytes, Log, U256};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use alloy_sol_types::{sol, SolCall, SolEvent};
use tracing::{debug, info};

use crate::error::{Result, SnowprintError};
use crate::protocol::TransferStatus;
use crate::spans;
use crate::traits::ChainProvider;

use AvalancheBridge::{
    bridgeCall, estimateFeeCall, getMaxAmountCall, getMinAmountCall, getTransactionStatusCall,
    isPausedCall, isSupportedCall, BridgeInitiated,
};

/// Bridge contract wrapper over a [`ChainProvider`]
pub struct BridgeContract<'a, C: ?Sized> {
    address: Address,
    provider: &'a C,
}

impl<'a, C: ChainProvider + ?Sized> BridgeContract<'a, C> {
    /// Create a new BridgeContract.
    pub fn new(address: Address, provider: &'a C) -> Self {
        debug!(
            contract_address = %address,
            event = "bridge_contract_initialized"
        );
        Self { address, provider }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    async fn read<T: SolCall>(&self, call: T) -> Result<T::Return> {
        let output = self
            .provider
            .call(self.address, Bytes::from(call.abi_encode()))
            .await
            .map_err(|e| match e {
                SnowprintError::ProviderUnavailable => e,
                e => SnowprintError::ChainCall(format!("{} failed: {e}", T::SIGNATURE)),
            })?;
        Ok(T::abi_decode_returns(&output)?)
    }

    /// Whether the bridge currently rejects transfers.
    pub async fn is_paused(&self) -> Result<bool> {
        let paused = self.read(isPausedCall {}).await?;
        debug!(
            paused = paused,
            contract_address = %self.address,
            event = "bridge_pause_state_retrieved"
        );
        Ok(paused)
    }

    /// Whether this bridge routes transfers to `destination_chain_id`.
    pub async fn is_supported(&self, destination_chain_id: u64) -> Result<bool> {
        let supported = self
            .read(isSupportedCall {
                destinationChainId: U256::from(destination_chain_id),
            })
            .await?;
        debug!(
            destination_chain_id = destination_chain_id,
            supported = supported,
            contract_address = %self.address,
            event = "bridge_route_checked"
        );
        Ok(supported)
    }

    /// Smallest transferable amount of `token`, in base units.
    pub async fn min_amount(&self, token: Address) -> Result<U256> {
        self.read(getMinAmountCall { token }).await
    }

    /// Largest transferable amount of `token`, in base units.
    pub async fn max_amount(&self, token: Address) -> Result<U256> {
        self.read(getMaxAmountCall { token }).await
    }

    /// Native-currency fee quoted by the contract for a transfer.
    pub async fn estimate_fee(&self, destination_chain_id: u64, amount: U256) -> Result<U256> {
        let fee = self
            .read(estimateFeeCall {
                destinationChainId: U256::from(destination_chain_id),
                amount,
            })
            .await?;
        info!(
            destination_chain_id = destination_chain_id,
            amount = %amount,
            fee = %fee,
            contract_address = %self.address,
            event = "bridge_fee_quoted"
        );
        Ok(fee)
    }

    /// Status of a transfer identified by the id emitted in `BridgeInitiated`.
    pub async fn transaction_status(&self, transfer_id: FixedBytes<32>) -> Result<TransferStatus> {
        let raw = self
            .read(getTransactionStatusCall {
                txHash: transfer_id,
            })
            .await?;
        Ok(TransferStatus::from(raw))
    }

    /// Create the transaction request for the payable `bridge` function.
    ///
    /// `fee` is attached as the transaction value.
    pub fn bridge_transaction(
        &self,
        from: Address,
        token: Address,
        amount: U256,
        fee: U256,
    ) -> TransactionRequest {
        let span = spans::bridge_call(&from, &token, &amount, &fee);
        let _guard = span.enter();

        info!(
            from = %from,
            token = %token,
            amount = %amount,
            fee = %fee,
            contract_address = %self.address,
            event = "bridge_transaction_created"
        );

        let input = bridgeCall { token, amount }.abi_encode();
        TransactionRequest::default()
            .from(from)
            .to(self.address)
            .value(fee)
            .input(TransactionInput::new(Bytes::from(input)))
    }
}

/// Finds the `BridgeInitiated` event emitted by `bridge` in a receipt's logs.
pub fn find_bridge_initiated(bridge: Address, logs: &[Log]) -> Option<BridgeInitiated> {
    logs.iter()
        .filter(|log| log.address == bridge)
        .filter(|log| {
            log.data
                .topics()
                .first()
                .is_some_and(|topic| *topic == BridgeInitiated::SIGNATURE_HASH)
        })
        .find_map(|log| BridgeInitiated::decode_log_data(&log.data).ok())
}

sol!(
    #[allow(missing_docs)]
    #[allow(non_snake_case)]
    contract AvalancheBridge {
        function bridge(address token, uint256 amount) external payable;
        function isPaused() external view returns (bool);
        function isSupported(uint256 destinationChainId) external view returns (bool);
        function getMinAmount(address token) external view returns (uint256);
        function getMaxAmount(address token) external view returns (uint256);
        function estimateFee(uint256 destinationChainId, uint256 amount) external view returns (uint256);
        function getTransactionStatus(bytes32 txHash) external view returns (uint8);
        function getValidators() external view returns (address[]);

        event BridgeInitiated(address indexed token, address indexed from, uint256 amount, bytes32 txHash);
        event BridgeCompleted(address indexed token, address indexed to, uint256 amount, bytes32 txHash);
        event BridgeFailed(bytes32 indexed txHash, string reason);
        event BridgePaused(address indexed operator);
        event BridgeUnpaused(address indexed operator);
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeChainProvider;
    use alloy_primitives::address;

    const BRIDGE: Address = address!("50006BDf00000000000000000000000000000000");
    const TOKEN: Address = address!("B97EF9Ef8734C71904D8002F8b6Bc66Dd9c48a6E");

    #[test]
    fn test_bridge_transaction_attaches_fee() {
        let provider = FakeChainProvider::new(43113);
        let from = address!("1111111111111111111111111111111111111111");
        let fee = U256::from(10_000_000_000_000_000u64);

        let tx = BridgeContract::new(BRIDGE, &provider).bridge_transaction(
            from,
            TOKEN,
            U256::from(5u64),
            fee,
        );

        assert_eq!(tx.value, Some(fee));
        assert_eq!(tx.to, Some(BRIDGE.into()));
        let decoded = bridgeCall::abi_decode(tx.input.input().unwrap()).unwrap();
        assert_eq!(decoded.token, TOKEN);
        assert_eq!(decoded.amount, U256::from(5u64));
    }

    #[tokio::test]
    async fn test_guards_read_through_provider() {
        let provider = FakeChainProvider::new(43113);
        provider.set_paused(BRIDGE, true);
        provider.set_limits(BRIDGE, TOKEN, U256::from(10u64), U256::from(1000u64));

        let bridge = BridgeContract::new(BRIDGE, &provider);
        assert!(bridge.is_paused().await.unwrap());
        assert_eq!(bridge.min_amount(TOKEN).await.unwrap(), U256::from(10u64));
        assert_eq!(bridge.max_amount(TOKEN).await.unwrap(), U256::from(1000u64));
    }

    #[tokio::test]
    async fn test_route_support() {
        let provider = FakeChainProvider::new(43113);
        let bridge = BridgeContract::new(BRIDGE, &provider);
        assert!(bridge.is_supported(11155111).await.unwrap());

        provider.set_unsupported_destination(BRIDGE, 11155111);
        assert!(!bridge.is_supported(11155111).await.unwrap());
        assert!(bridge.is_supported(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_wallet_is_not_a_call_failure() {
        let provider = FakeChainProvider::new(43113);
        provider.set_unavailable(true);

        let err = BridgeContract::new(BRIDGE, &provider)
            .is_paused()
            .await
            .unwrap_err();
        assert!(matches!(err, SnowprintError::ProviderUnavailable));
    }

    #[test]
    fn test_find_bridge_initiated() {
        let event = BridgeInitiated {
            token: TOKEN,
            from: address!("1111111111111111111111111111111111111111"),
            amount: U256::from(7u64),
            txHash: FixedBytes::from([9u8; 32]),
        };
        let logs = vec![
            Log {
                address: address!("3333333333333333333333333333333333333333"),
                data: event.encode_log_data(),
            },
            Log {
                address: BRIDGE,
                data: event.encode_log_data(),
            },
        ];

        let found = find_bridge_initiated(BRIDGE, &logs).unwrap();
        assert_eq!(found.txHash, FixedBytes::from([9u8; 32]));
        assert_eq!(found.amount, U256::from(7u64));

        assert!(find_bridge_initiated(BRIDGE, &logs[..1]).is_none());
    }
}
