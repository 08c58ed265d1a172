// SPDX-FileCopyrightText: 2025 Snowprint Contributors
//
// SPDX-License-Identifier: Apache-2.0
//! ERC20 contract bindings for approval and balance operations
//!
//! This module provides utilities for reading token balances and building the
//! approval transaction that must be confirmed before the bridge call.

use alloy_primitives::{Address, Bytes, U256};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use alloy_sol_types::{sol, SolCall};
use tracing::{debug, info};

use crate::error::{Result, SnowprintError};
use crate::traits::ChainProvider;

use Erc20::{approveCall, balanceOfCall};

/// ERC20 contract wrapper over a [`ChainProvider`]
///
/// # Example
///
/// ```rust,ignore
/// use snowprint::Erc20Contract;
///
/// let erc20 = Erc20Contract::new(usdc, &provider);
/// let balance = erc20.balance_of(owner).await?;
/// let tx = erc20.approve_transaction(owner, bridge, balance);
/// ```
pub struct Erc20Contract<'a, C: ?Sized> {
    address: Address,
    provider: &'a C,
}

impl<'a, C: ChainProvider + ?Sized> Erc20Contract<'a, C> {
    /// Create a new ERC20 contract wrapper
    pub fn new(address: Address, provider: &'a C) -> Self {
        debug!(
            contract_address = %address,
            event = "erc20_contract_initialized"
        );
        Self { address, provider }
    }

    /// Get the token balance of an address
    ///
    /// # Arguments
    ///
    /// * `account` - The address to check the balance of
    ///
    /// # Returns
    ///
    /// The token balance in base units
    pub async fn balance_of(&self, account: Address) -> Result<U256> {
        debug!(
            account = %account,
            contract_address = %self.address,
            event = "checking_balance"
        );

        let input = balanceOfCall { account }.abi_encode();
        let output = self
            .provider
            .call(self.address, Bytes::from(input))
            .await
            .map_err(|e| match e {
                SnowprintError::ProviderUnavailable => e,
                e => SnowprintError::ChainCall(format!("balanceOf failed: {e}")),
            })?;
        let balance = balanceOfCall::abi_decode_returns(&output)?;

        info!(
            account = %account,
            balance = %balance,
            contract_address = %self.address,
            event = "balance_retrieved"
        );

        Ok(balance)
    }

    /// Create a transaction request to approve a spender
    ///
    /// This creates but does not send the approval transaction.
    ///
    /// # Arguments
    ///
    /// * `from` - The address that owns the tokens and will sign the transaction
    /// * `spender` - The address to approve for spending
    /// * `amount` - The amount to approve, in base units
    pub fn approve_transaction(
        &self,
        from: Address,
        spender: Address,
        amount: U256,
    ) -> TransactionRequest {
        info!(
            from = %from,
            spender = %spender,
            amount = %amount,
            contract_address = %self.address,
            event = "approve_transaction_created"
        );

        let input = approveCall { spender, amount }.abi_encode();
        TransactionRequest::default()
            .from(from)
            .to(self.address)
            .input(TransactionInput::new(Bytes::from(input)))
    }

    /// Returns the contract address
    pub fn address(&self) -> Address {
        self.address
    }
}

// Fixed ERC20 interface used by the bridge flow
sol!(
    #[allow(missing_docs)]
    contract Erc20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
    }
);
