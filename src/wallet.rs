//! Wallet session
//!
//! One [`WalletSession`] per wallet connection. It owns the chain provider,
//! publishes the connected account and chain id on a watch channel, and holds
//! the signer lock that serializes transaction submission.

use alloy_primitives::Address;
use tokio::sync::{watch, Mutex, MutexGuard};
use tracing::{info, warn};

use crate::error::{Result, SnowprintError};
use crate::traits::ChainProvider;

/// Snapshot of the wallet connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalletState {
    pub account: Option<Address>,
    pub chain_id: Option<u64>,
}

impl WalletState {
    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }
}

/// Shared handle to a wallet connection.
///
/// Observers call [`subscribe`](Self::subscribe) and receive every state
/// change; wallet events are fed in through
/// [`accounts_changed`](Self::accounts_changed) and
/// [`chain_changed`](Self::chain_changed).
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use snowprint::WalletSession;
/// use snowprint::testing::FakeChainProvider;
///
/// # async fn example() -> snowprint::Result<()> {
/// let provider = FakeChainProvider::new(43113);
/// let session = Arc::new(WalletSession::new(provider));
/// let account = session.connect().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct WalletSession<P> {
    provider: P,
    state: watch::Sender<WalletState>,
    signer: Mutex<()>,
}

impl<P: ChainProvider> WalletSession<P> {
    pub fn new(provider: P) -> Self {
        let (state, _) = watch::channel(WalletState::default());
        Self {
            provider,
            state,
            signer: Mutex::new(()),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Requests account access and records the first account and the chain id.
    ///
    /// # Errors
    ///
    /// Returns [`SnowprintError::ProviderUnavailable`] if no wallet is
    /// reachable or it exposes no account.
    pub async fn connect(&self) -> Result<Address> {
        let accounts = self.provider.request_accounts().await?;
        let Some(account) = accounts.first().copied() else {
            warn!(event = "wallet_no_accounts");
            return Err(SnowprintError::ProviderUnavailable);
        };
        let chain_id = self.provider.chain_id().await?;

        self.state.send_replace(WalletState {
            account: Some(account),
            chain_id: Some(chain_id),
        });

        info!(
            account = %account,
            chain_id = chain_id,
            event = "wallet_connected"
        );
        Ok(account)
    }

    pub fn disconnect(&self) {
        self.state.send_replace(WalletState::default());
        info!(event = "wallet_disconnected");
    }

    /// Applies an `accountsChanged` wallet event.
    ///
    /// An empty list means the user revoked access.
    pub fn accounts_changed(&self, accounts: &[Address]) {
        match accounts.first().copied() {
            Some(account) => {
                self.state.send_modify(|state| state.account = Some(account));
                info!(account = %account, event = "wallet_account_changed");
            }
            None => self.disconnect(),
        }
    }

    /// Applies a `chainChanged` wallet event.
    pub fn chain_changed(&self, chain_id: u64) {
        self.state.send_if_modified(|state| {
            if !state.is_connected() || state.chain_id == Some(chain_id) {
                return false;
            }
            state.chain_id = Some(chain_id);
            true
        });
        info!(chain_id = chain_id, event = "wallet_chain_changed");
    }

    pub fn state(&self) -> WalletState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<WalletState> {
        self.state.subscribe()
    }

    pub fn is_connected(&self) -> bool {
        self.state.borrow().is_connected()
    }

    /// The connected account.
    ///
    /// # Errors
    ///
    /// Returns [`SnowprintError::ProviderUnavailable`] when not connected.
    pub fn account(&self) -> Result<Address> {
        self.state
            .borrow()
            .account
            .ok_or(SnowprintError::ProviderUnavailable)
    }

    /// Waits for exclusive use of the signer.
    ///
    /// Held for the whole of a submission, so transactions from concurrent
    /// submissions on one session never interleave.
    pub async fn lock_signer(&self) -> MutexGuard<'_, ()> {
        self.signer.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeChainProvider;
    use alloy_primitives::address;

    const ALICE: Address = address!("1111111111111111111111111111111111111111");
    const BOB: Address = address!("2222222222222222222222222222222222222222");

    #[tokio::test]
    async fn test_connect_records_account_and_chain() {
        let session = WalletSession::new(FakeChainProvider::new(43113).with_account(ALICE));
        let mut rx = session.subscribe();

        assert_eq!(session.connect().await.unwrap(), ALICE);
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            *rx.borrow_and_update(),
            WalletState {
                account: Some(ALICE),
                chain_id: Some(43113),
            }
        );
    }

    #[tokio::test]
    async fn test_connect_without_accounts() {
        let session = WalletSession::new(FakeChainProvider::new(43113));
        let err = session.connect().await.unwrap_err();
        assert!(matches!(err, SnowprintError::ProviderUnavailable));
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn test_wallet_events() {
        let session = WalletSession::new(FakeChainProvider::new(1).with_account(ALICE));
        session.connect().await.unwrap();

        session.accounts_changed(&[BOB]);
        assert_eq!(session.account().unwrap(), BOB);

        session.chain_changed(43114);
        assert_eq!(session.state().chain_id, Some(43114));

        session.accounts_changed(&[]);
        assert!(!session.is_connected());
        assert!(matches!(
            session.account(),
            Err(SnowprintError::ProviderUnavailable)
        ));
    }

    #[test]
    fn test_chain_change_ignored_while_disconnected() {
        let session = WalletSession::new(FakeChainProvider::new(1));
        session.chain_changed(5);
        assert_eq!(session.state(), WalletState::default());
    }
}
