//! Alloy-based wallet provider implementation.

use alloy_network::Ethereum;
use alloy_primitives::{Address, Bytes, TxHash};
use alloy_provider::Provider;
use alloy_rpc_types::{ReceiptEnvelope, TransactionInput, TransactionReceipt, TransactionRequest};
use async_trait::async_trait;
use tracing::{debug, instrument, trace};

use crate::error::Result;
use crate::traits::{ChainProvider, TxReceipt};

/// Production chain provider wrapping Alloy's [`Provider`] trait.
///
/// The wrapped provider must be able to sign for the connected account, e.g.
/// a provider built with a wallet filler or one talking to a node that manages
/// the account's keys.
///
/// # Examples
///
/// ```rust,no_run
/// use snowprint::providers::AlloyChainProvider;
/// use alloy_provider::ProviderBuilder;
///
/// let provider = ProviderBuilder::new()
///     .connect_http("https://api.avax-test.network/ext/bc/C/rpc".parse().unwrap());
/// let chain = AlloyChainProvider::new(provider);
/// ```
#[derive(Debug, Clone)]
pub struct AlloyChainProvider<P>
where
    P: Provider<Ethereum> + Clone,
{
    provider: P,
}

impl<P> AlloyChainProvider<P>
where
    P: Provider<Ethereum> + Clone,
{
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Returns a reference to the underlying Alloy provider.
    pub fn inner(&self) -> &P {
        &self.provider
    }
}

#[async_trait]
impl<P> ChainProvider for AlloyChainProvider<P>
where
    P: Provider<Ethereum> + Clone + Send + Sync,
{
    #[instrument(skip(self))]
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        trace!("Requesting wallet accounts");
        let accounts: Vec<Address> = self
            .provider
            .raw_request("eth_requestAccounts".into(), ())
            .await?;
        debug!(account_count = accounts.len(), "Wallet accounts granted");
        Ok(accounts)
    }

    #[instrument(skip(self))]
    async fn accounts(&self) -> Result<Vec<Address>> {
        Ok(self.provider.get_accounts().await?)
    }

    #[instrument(skip(self))]
    async fn chain_id(&self) -> Result<u64> {
        let chain_id = self.provider.get_chain_id().await?;
        debug!(chain_id = chain_id, "Chain id retrieved");
        Ok(chain_id)
    }

    #[instrument(skip(self))]
    async fn gas_price(&self) -> Result<u128> {
        let gas_price = self.provider.get_gas_price().await?;
        debug!(gas_price = gas_price, "Gas price retrieved");
        Ok(gas_price)
    }

    #[instrument(skip(self, input), fields(to = %to, input_len = input.len()))]
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes> {
        trace!("Executing eth_call");
        let request = TransactionRequest::default()
            .to(to)
            .input(TransactionInput::new(input));
        Ok(self.provider.call(request).await?)
    }

    #[instrument(skip(self, tx))]
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash> {
        let pending = self.provider.send_transaction(tx).await?;
        let tx_hash = *pending.tx_hash();
        debug!(tx_hash = %tx_hash, "Transaction broadcast");
        Ok(tx_hash)
    }

    #[instrument(skip(self), fields(tx_hash = %tx_hash))]
    async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<TxReceipt>> {
        trace!("Fetching transaction receipt");
        let receipt = self.provider.get_transaction_receipt(tx_hash).await?;

        if receipt.is_some() {
            debug!("Transaction receipt found");
        } else {
            debug!("Transaction receipt not found");
        }

        Ok(receipt.map(|r| into_receipt(&r)))
    }
}

fn into_receipt(receipt: &TransactionReceipt) -> TxReceipt {
    let logs = match &receipt.inner {
        ReceiptEnvelope::Eip1559(r) => &r.receipt.logs,
        ReceiptEnvelope::Eip2930(r) => &r.receipt.logs,
        ReceiptEnvelope::Legacy(r) => &r.receipt.logs,
        ReceiptEnvelope::Eip4844(r) => &r.receipt.logs,
        ReceiptEnvelope::Eip7702(r) => &r.receipt.logs,
    };

    TxReceipt {
        tx_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
        success: receipt.status(),
        logs: logs.iter().map(|log| log.inner.clone()).collect(),
    }
}
